//! # Fragments (Trait Models)
//!
//! A fragment is one independent slice of tag behavior: the attributes it owns and the
//! actions that may change them. Tags are built by composing fragments (see
//! [`crate::compose`]); no fragment knows which tag it ends up in.
//!
//! | Fragment | Attributes | Actions |
//! |----------|------------|---------|
//! | [`selection`] | `selection`, `displayed_selection`, `selection_fill`, `strategy` | `select`, `deselect`, `clear`, `onChange` |
//! | [`geometry`] | `x`, `y`, `width`, `height` | `setPosition`, `setSize`, `moveBy` |
//! | [`labeling`] | `labels` | `addLabel`, `removeLabel`, `toggleLabel`, `clearLabels` |
//! | [`selected`] | `selected` | `setSelected`, `toggleSelected` |
//! | [`templated`] | `value`, `resolved_value` | `updateValue` |
//! | [`playback`] | `playing` | `play`, `pause`, `onHotKey` |
//!
//! Tag-specific attributes (a control's `name`, a video's `width`) are fragments too,
//! usually with no actions; see [`Fragment::attrs`].
//!
//! ## Ownership
//!
//! Actions and hooks run with an [`ActionContext`] that can read every attribute of the
//! instance but can only write `State` and `Derived` attributes declared by the
//! fragment the action belongs to. Anything else fails with
//! [`AnnotagError::AttributeNotOwned`] and the action's changes are discarded.
//!
//! ## Hooks
//!
//! - `after_create`: runs once when an instance is created, after authored attributes
//!   are applied. Also re-run when a snapshot resets the fragment to defaults.
//! - `on_task`: runs when the owning document's task context changes.
//! - `on_restore`: runs after a snapshot wrote the fragment's persisted attributes, to
//!   bring dependent attributes back in line. An error here makes the snapshot loader
//!   treat the fragment's data as malformed.

use serde_json::Value;
use std::sync::Arc;

use crate::attributes::AttributeSpec;
use crate::error::{AnnotagError, Result};
use crate::instance::{ActionContext, TaskContext};

pub mod geometry;
pub mod labeling;
pub mod playback;
pub mod selected;
pub mod selection;
pub mod templated;

pub type ActionFn = Arc<dyn Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync>;
pub type Hook = Arc<dyn Fn(&mut ActionContext<'_>) -> Result<()> + Send + Sync>;
pub type TaskHook = Arc<dyn Fn(&mut ActionContext<'_>, &TaskContext) -> Result<()> + Send + Sync>;

#[derive(Clone)]
pub struct ActionSpec {
    pub name: &'static str,
    pub handler: ActionFn,
}

impl std::fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSpec").field("name", &self.name).finish()
    }
}

#[derive(Clone)]
pub struct Fragment {
    pub name: &'static str,
    pub attributes: Vec<AttributeSpec>,
    pub actions: Vec<ActionSpec>,
    pub after_create: Option<Hook>,
    pub on_task: Option<TaskHook>,
    pub on_restore: Option<Hook>,
}

impl Fragment {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            actions: Vec::new(),
            after_create: None,
            on_task: None,
            on_restore: None,
        }
    }

    /// A fragment made only of attributes, e.g. a tag's authored attributes.
    pub fn attrs(name: &'static str, attributes: Vec<AttributeSpec>) -> Self {
        Self {
            attributes,
            ..Self::new(name)
        }
    }

    pub fn attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    pub fn action<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.push(ActionSpec {
            name,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn after_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.after_create = Some(Arc::new(hook));
        self
    }

    pub fn on_task<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, &TaskContext) -> Result<()> + Send + Sync + 'static,
    {
        self.on_task = Some(Arc::new(hook));
        self
    }

    pub fn on_restore<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.on_restore = Some(Arc::new(hook));
        self
    }
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("actions", &self.actions)
            .finish()
    }
}

/// Argument decoding shared by the built-in fragments.
pub(crate) mod args {
    use super::*;

    fn invalid(action: &str, reason: impl Into<String>) -> AnnotagError {
        AnnotagError::InvalidActionArgs {
            action: action.to_string(),
            reason: reason.into(),
        }
    }

    pub fn string(action: &str, args: &Value) -> Result<String> {
        match args {
            Value::String(s) => Ok(s.clone()),
            Value::Array(items) if items.len() == 1 => string(action, &items[0]),
            other => Err(invalid(action, format!("expected a string, got {}", other))),
        }
    }

    pub fn strings(action: &str, args: &Value) -> Result<Vec<String>> {
        match args {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(action, format!("expected strings, got {}", item)))
                })
                .collect(),
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Null => Ok(Vec::new()),
            other => Err(invalid(action, format!("expected a list, got {}", other))),
        }
    }

    pub fn boolean(action: &str, args: &Value) -> Result<bool> {
        match args {
            Value::Bool(b) => Ok(*b),
            Value::Array(items) if items.len() == 1 => boolean(action, &items[0]),
            other => Err(invalid(action, format!("expected a boolean, got {}", other))),
        }
    }

    /// Two numbers, given either as `[a, b]` or as an object with the named keys.
    pub fn pair(action: &str, args: &Value, keys: (&str, &str)) -> Result<(f64, f64)> {
        let (a, b) = match args {
            Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
            Value::Object(map) => match (map.get(keys.0), map.get(keys.1)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(invalid(
                        action,
                        format!("expected keys '{}' and '{}'", keys.0, keys.1),
                    ))
                }
            },
            other => return Err(invalid(action, format!("expected two numbers, got {}", other))),
        };
        match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(invalid(action, "expected numeric values")),
        }
    }

    pub fn none(action: &str, args: &Value) -> Result<()> {
        match args {
            Value::Null => Ok(()),
            Value::Array(items) if items.is_empty() => Ok(()),
            other => Err(invalid(action, format!("takes no arguments, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::args;
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_attributes_and_actions() {
        use crate::attributes::AttributeKind;
        let fragment = Fragment::new("demo")
            .attribute(AttributeSpec::state("count", AttributeKind::Number))
            .action("bump", |_, _| Ok(()))
            .after_create(|_| Ok(()));
        assert_eq!(fragment.attributes.len(), 1);
        assert_eq!(fragment.actions[0].name, "bump");
        assert!(fragment.after_create.is_some());
        assert!(fragment.on_task.is_none());
    }

    #[test]
    fn string_args_accept_bare_or_single_element_list() {
        assert_eq!(args::string("select", &json!("a")).unwrap(), "a");
        assert_eq!(args::string("select", &json!(["a"])).unwrap(), "a");
        assert!(args::string("select", &json!(3)).is_err());
    }

    #[test]
    fn strings_args_accept_lists() {
        assert_eq!(
            args::strings("onChange", &json!(["a", "b"])).unwrap(),
            vec!["a", "b"]
        );
        assert!(args::strings("onChange", &json!(null)).unwrap().is_empty());
        assert!(args::strings("onChange", &json!([1])).is_err());
    }

    #[test]
    fn pair_args_accept_list_or_object() {
        assert_eq!(
            args::pair("setPosition", &json!([1, 2]), ("x", "y")).unwrap(),
            (1.0, 2.0)
        );
        assert_eq!(
            args::pair("setPosition", &json!({"x": 3, "y": 4.5}), ("x", "y")).unwrap(),
            (3.0, 4.5)
        );
        assert!(args::pair("setPosition", &json!({"x": 3}), ("x", "y")).is_err());
    }

    #[test]
    fn none_args_reject_payloads() {
        assert!(args::none("clear", &json!(null)).is_ok());
        assert!(args::none("clear", &json!([])).is_ok());
        assert!(args::none("clear", &json!("x")).is_err());
    }
}
