//! # Tag Composition
//!
//! [`compose`] merges an ordered list of [`Fragment`]s into one [`TagModel`], the
//! type-level description every instance of a tag is created from.
//!
//! ## Merge Rules
//!
//! - **Attributes**: namespaces are merged by name. When two fragments declare the same
//!   attribute with the same shape and origin, the later declaration wins (its default,
//!   flags and persistence key) and both fragments co-own the attribute. A different
//!   shape or origin is a [`CompositionConflict`](AnnotagError::CompositionConflict).
//! - **Actions**: unioned by name. Two fragments declaring the same action name is a
//!   conflict; order never decides which one is callable.
//! - **Hooks**: kept in fragment order.
//!
//! All of this is checked here, when the tag is composed and registered, so a bad tag
//! definition fails at startup rather than on first use.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::attributes::{AttrOrigin, AttrValue, AttributeSpec};
use crate::error::{AnnotagError, Result};
use crate::fragments::{ActionFn, Fragment, Hook, TaskHook};
use crate::id::IdSource;
use crate::instance::{AttrMap, TagInstance};
use crate::snapshot::SnapshotRoute;

/// Attributes as written in the authoring document, keyed by attribute name.
pub type Props = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct ComposedAttribute {
    pub spec: AttributeSpec,
    pub owners: Vec<&'static str>,
}

impl ComposedAttribute {
    pub fn owned_by(&self, fragment: &str) -> bool {
        self.owners.iter().any(|owner| *owner == fragment)
    }
}

#[derive(Clone)]
pub struct ComposedAction {
    pub owner: &'static str,
    pub handler: ActionFn,
}

/// The composed state model of one tag type.
pub struct TagModel {
    name: String,
    fragments: Vec<&'static str>,
    attributes: Vec<ComposedAttribute>,
    index: BTreeMap<&'static str, usize>,
    actions: BTreeMap<&'static str, ComposedAction>,
    create_hooks: Vec<(&'static str, Hook)>,
    task_hooks: Vec<(&'static str, TaskHook)>,
    restore_hooks: Vec<(&'static str, Hook)>,
    route: SnapshotRoute,
}

pub fn compose(name: &str, fragments: Vec<Fragment>) -> Result<TagModel> {
    let conflict = |detail: String| AnnotagError::CompositionConflict {
        tag: name.to_string(),
        detail,
    };

    let mut model = TagModel {
        name: name.to_string(),
        fragments: Vec::new(),
        attributes: Vec::new(),
        index: BTreeMap::new(),
        actions: BTreeMap::new(),
        create_hooks: Vec::new(),
        task_hooks: Vec::new(),
        restore_hooks: Vec::new(),
        route: SnapshotRoute::Own,
    };

    for fragment in fragments {
        if model.fragments.contains(&fragment.name) {
            return Err(conflict(format!(
                "fragment '{}' is included twice",
                fragment.name
            )));
        }

        for spec in fragment.attributes {
            if !spec.default.fits(&spec.kind) {
                return Err(conflict(format!(
                    "default of '{}' does not match its {} shape",
                    spec.name,
                    spec.kind.label()
                )));
            }
            match model.index.get(spec.name) {
                Some(&slot) => {
                    let existing = &mut model.attributes[slot];
                    if existing.spec.kind != spec.kind || existing.spec.origin != spec.origin {
                        return Err(conflict(format!(
                            "attribute '{}' is declared as {} ({:?}) by '{}' and as {} ({:?}) by '{}'",
                            spec.name,
                            existing.spec.kind.label(),
                            existing.spec.origin,
                            existing.owners.join(", "),
                            spec.kind.label(),
                            spec.origin,
                            fragment.name
                        )));
                    }
                    existing.spec = spec;
                    existing.owners.push(fragment.name);
                }
                None => {
                    model.index.insert(spec.name, model.attributes.len());
                    model.attributes.push(ComposedAttribute {
                        spec,
                        owners: vec![fragment.name],
                    });
                }
            }
        }

        for action in fragment.actions {
            if let Some(existing) = model.actions.get(action.name) {
                return Err(conflict(format!(
                    "action '{}' is declared by both '{}' and '{}'",
                    action.name, existing.owner, fragment.name
                )));
            }
            model.actions.insert(
                action.name,
                ComposedAction {
                    owner: fragment.name,
                    handler: action.handler,
                },
            );
        }

        if let Some(hook) = fragment.after_create {
            model.create_hooks.push((fragment.name, hook));
        }
        if let Some(hook) = fragment.on_task {
            model.task_hooks.push((fragment.name, hook));
        }
        if let Some(hook) = fragment.on_restore {
            model.restore_hooks.push((fragment.name, hook));
        }
        model.fragments.push(fragment.name);
    }

    tracing::debug!(
        tag = %model.name,
        attributes = model.attributes.len(),
        actions = model.actions.len(),
        "composed tag model"
    );
    Ok(model)
}

impl TagModel {
    pub fn with_snapshot_route(mut self, route: SnapshotRoute) -> Self {
        self.route = route;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fragments(&self) -> &[&'static str] {
        &self.fragments
    }

    pub fn attributes(&self) -> &[ComposedAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&ComposedAttribute> {
        self.index.get(name).map(|&slot| &self.attributes[slot])
    }

    pub fn action(&self, name: &str) -> Option<&ComposedAction> {
        self.actions.get(name)
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    pub fn snapshot_route(&self) -> SnapshotRoute {
        self.route
    }

    pub(crate) fn create_hooks(&self) -> &[(&'static str, Hook)] {
        &self.create_hooks
    }

    pub(crate) fn task_hooks(&self) -> &[(&'static str, TaskHook)] {
        &self.task_hooks
    }

    pub(crate) fn restore_hooks(&self) -> &[(&'static str, Hook)] {
        &self.restore_hooks
    }

    /// Default values for every attribute.
    pub(crate) fn defaults(&self) -> AttrMap {
        self.attributes
            .iter()
            .map(|attr| (attr.spec.name, attr.spec.default.clone()))
            .collect()
    }

    /// Creates an instance from the attributes found in the authoring document.
    ///
    /// Prop names are matched case-insensitively (`toName` sets `toname`). Only
    /// authored attributes can be set this way; anything else is ignored with a
    /// warning, or rejected when `strict` is set.
    pub fn create(self: &Arc<Self>, props: &Props, ids: &dyn IdSource, strict: bool) -> Result<TagInstance> {
        let mut attrs = self.defaults();
        let mut supplied: BTreeSet<&'static str> = BTreeSet::new();

        for (raw_name, raw_value) in props {
            let key = raw_name.to_ascii_lowercase();
            let attr = match self.attribute(&key) {
                Some(attr) if attr.spec.is_authored() => attr,
                _ => {
                    if strict {
                        return Err(AnnotagError::UnknownAttribute {
                            tag: self.name.clone(),
                            attribute: raw_name.clone(),
                        });
                    }
                    tracing::warn!(tag = %self.name, attribute = %raw_name, "ignoring unknown attribute");
                    continue;
                }
            };
            let value = AttrValue::parse_prop(&attr.spec.kind, raw_value).map_err(|reason| {
                AnnotagError::InvalidAttribute {
                    attribute: attr.spec.name.to_string(),
                    reason,
                }
            })?;
            attrs.insert(attr.spec.name, value);
            supplied.insert(attr.spec.name);
        }

        if let Some(missing) = self
            .attributes
            .iter()
            .find(|attr| attr.spec.required && !supplied.contains(attr.spec.name))
        {
            return Err(AnnotagError::MissingAttribute {
                tag: self.name.clone(),
                attribute: missing.spec.name.to_string(),
            });
        }

        TagInstance::new(ids.next_id(), Arc::clone(self), attrs)
    }

    pub fn describe(&self) -> TagDescription {
        TagDescription {
            name: self.name.clone(),
            fragments: self.fragments.iter().map(|f| f.to_string()).collect(),
            attributes: self
                .attributes
                .iter()
                .map(|attr| AttributeDescription {
                    name: attr.spec.name.to_string(),
                    kind: attr.spec.kind.label().to_string(),
                    origin: match attr.spec.origin {
                        AttrOrigin::Authored => "authored",
                        AttrOrigin::State => "state",
                        AttrOrigin::Derived => "derived",
                    }
                    .to_string(),
                    default: attr.spec.default.to_json(),
                    required: attr.spec.required,
                    persisted_as: attr.spec.persisted_key().map(str::to_string),
                    owners: attr.owners.iter().map(|o| o.to_string()).collect(),
                })
                .collect(),
            actions: self
                .actions
                .iter()
                .map(|(name, action)| ActionDescription {
                    name: name.to_string(),
                    fragment: action.owner.to_string(),
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for TagModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagModel")
            .field("name", &self.name)
            .field("fragments", &self.fragments)
            .field("actions", &self.action_names())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagDescription {
    pub name: String,
    pub fragments: Vec<String>,
    pub attributes: Vec<AttributeDescription>,
    pub actions: Vec<ActionDescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeDescription {
    pub name: String,
    pub kind: String,
    pub origin: String,
    pub default: Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted_as: Option<String>,
    pub owners: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionDescription {
    pub name: String,
    pub fragment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeKind;
    use crate::id::SequentialSource;
    use serde_json::json;

    fn counter() -> Fragment {
        Fragment::new("counter")
            .attribute(AttributeSpec::state("count", AttributeKind::Number))
            .action("bump", |ctx, _| {
                let next = ctx.number("count").unwrap_or(0.0) + 1.0;
                ctx.set("count", AttrValue::Number(next))
            })
    }

    fn props(pairs: &[(&str, &str)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn duplicate_action_names_fail_at_composition() {
        let other = Fragment::new("other").action("bump", |_, _| Ok(()));
        let err = compose("demo", vec![counter(), other]).unwrap_err();
        match err {
            AnnotagError::CompositionConflict { tag, detail } => {
                assert_eq!(tag, "demo");
                assert!(detail.contains("bump"));
            }
            other => panic!("expected CompositionConflict, got {other:?}"),
        }
    }

    #[test]
    fn same_shape_attribute_later_default_wins() {
        let first = Fragment::attrs(
            "first",
            vec![AttributeSpec::authored("width", AttributeKind::Text)
                .with_default(AttrValue::Text("100".into()))],
        );
        let second = Fragment::attrs(
            "second",
            vec![AttributeSpec::authored("width", AttributeKind::Text)
                .with_default(AttrValue::Text("320".into()))],
        );
        let model = compose("demo", vec![first, second]).unwrap();
        let attr = model.attribute("width").unwrap();
        assert_eq!(attr.spec.default, AttrValue::Text("320".into()));
        assert_eq!(attr.owners, vec!["first", "second"]);
    }

    #[test]
    fn conflicting_shapes_fail() {
        let first = Fragment::attrs(
            "first",
            vec![AttributeSpec::authored("width", AttributeKind::Text)],
        );
        let second = Fragment::attrs(
            "second",
            vec![AttributeSpec::state("width", AttributeKind::Number)],
        );
        assert!(matches!(
            compose("demo", vec![first, second]),
            Err(AnnotagError::CompositionConflict { .. })
        ));
    }

    #[test]
    fn conflicting_origins_fail() {
        let first = Fragment::attrs(
            "first",
            vec![AttributeSpec::authored("flag", AttributeKind::Bool)],
        );
        let second = Fragment::attrs(
            "second",
            vec![AttributeSpec::state("flag", AttributeKind::Bool)],
        );
        assert!(compose("demo", vec![first, second]).is_err());
    }

    #[test]
    fn order_does_not_change_callable_actions() {
        let labels = || Fragment::new("labels").action("tag", |_, _| Ok(()));
        let a = compose("demo", vec![counter(), labels()]).unwrap();
        let b = compose("demo", vec![labels(), counter()]).unwrap();
        assert_eq!(a.action_names(), b.action_names());
    }

    #[test]
    fn bad_default_is_rejected() {
        let fragment = Fragment::attrs(
            "bad",
            vec![AttributeSpec::state("count", AttributeKind::Number)
                .with_default(AttrValue::Text("x".into()))],
        );
        assert!(compose("demo", vec![fragment]).is_err());
    }

    #[test]
    fn fragment_included_twice_fails() {
        assert!(compose("demo", vec![counter(), counter()]).is_err());
    }

    #[test]
    fn create_applies_props_case_insensitively() {
        let attrs = Fragment::attrs(
            "attrs",
            vec![
                AttributeSpec::authored("name", AttributeKind::Text).required(),
                AttributeSpec::authored("toname", AttributeKind::OptText),
            ],
        );
        let model = Arc::new(compose("demo", vec![attrs, counter()]).unwrap());
        let ids = SequentialSource::new("t");
        let instance = model
            .create(&props(&[("name", "ch"), ("toName", "txt-1")]), &ids, false)
            .unwrap();
        assert_eq!(instance.id().as_str(), "t-1");
        assert_eq!(instance.text("toname"), Some("txt-1"));
        assert_eq!(instance.get("count"), Some(&AttrValue::Number(0.0)));
    }

    #[test]
    fn create_requires_required_attributes() {
        let attrs = Fragment::attrs(
            "attrs",
            vec![AttributeSpec::authored("name", AttributeKind::Text).required()],
        );
        let model = Arc::new(compose("demo", vec![attrs]).unwrap());
        let err = model
            .create(&Props::new(), &SequentialSource::new("t"), false)
            .unwrap_err();
        assert!(matches!(err, AnnotagError::MissingAttribute { .. }));
    }

    #[test]
    fn create_cannot_set_state_attributes() {
        let model = Arc::new(compose("demo", vec![counter()]).unwrap());
        let ids = SequentialSource::new("t");

        let lenient = model.create(&props(&[("count", "9")]), &ids, false).unwrap();
        assert_eq!(lenient.get("count"), Some(&AttrValue::Number(0.0)));

        let strict = model.create(&props(&[("count", "9")]), &ids, true);
        assert!(matches!(strict, Err(AnnotagError::UnknownAttribute { .. })));
    }

    #[test]
    fn create_rejects_malformed_props() {
        let attrs = Fragment::attrs(
            "attrs",
            vec![AttributeSpec::authored("showinline", AttributeKind::Bool)],
        );
        let model = Arc::new(compose("demo", vec![attrs]).unwrap());
        let err = model
            .create(&props(&[("showinline", "sometimes")]), &SequentialSource::new("t"), false)
            .unwrap_err();
        assert!(matches!(err, AnnotagError::InvalidAttribute { .. }));
    }

    #[test]
    fn describe_lists_attributes_and_actions() {
        let model = compose("demo", vec![counter()]).unwrap();
        let description = model.describe();
        assert_eq!(description.name, "demo");
        assert_eq!(description.actions[0].name, "bump");
        assert_eq!(description.attributes[0].default, json!(0.0));
        assert_eq!(description.attributes[0].origin, "state");
    }
}
