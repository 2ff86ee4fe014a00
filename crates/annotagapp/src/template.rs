//! # Template Resolution
//!
//! Tag attributes in an authoring document may point into the task's data instead of
//! carrying a literal value:
//!
//! ```text
//! <Video name="video" value="$video"/>     value resolves to task.data["video"]
//! <Video name="video" value="clip.mp4"/>   value is the literal "clip.mp4"
//! ```
//!
//! Resolution is a single lookup. The text after the sigil is a key in the task data
//! object; the value found there is used as-is, even if it looks like another template.
//!
//! A missing key is not an error. It resolves to `None` so that renderers can treat the
//! attribute as "no value yet" and render nothing. Nothing here retries: the document
//! resolves templates once per task change and lives with the result.

use serde_json::{Map, Value};

/// The task data object templates resolve against.
pub type TaskData = Map<String, Value>;

pub const DEFAULT_SIGIL: char = '$';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    Literal(String),
    Field(String),
}

impl TemplateRef {
    /// Parses a raw attribute value. A lone sigil is kept as a literal.
    pub fn parse(raw: &str, sigil: char) -> Self {
        match raw.strip_prefix(sigil) {
            Some(field) if !field.is_empty() => TemplateRef::Field(field.to_string()),
            _ => TemplateRef::Literal(raw.to_string()),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TemplateRef::Field(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    sigil: char,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            sigil: DEFAULT_SIGIL,
        }
    }
}

impl Resolver {
    pub fn new(sigil: char) -> Self {
        Self { sigil }
    }

    pub fn sigil(&self) -> char {
        self.sigil
    }

    /// Resolves `raw` against `data`.
    pub fn resolve(&self, raw: &str, data: &TaskData) -> Option<Value> {
        resolve(&TemplateRef::parse(raw, self.sigil), data)
    }

    /// Like [`Resolver::resolve`], narrowed to something displayable.
    pub fn resolve_string(&self, raw: &str, data: &TaskData) -> Option<String> {
        self.resolve(raw, data).and_then(|value| display_value(&value))
    }
}

pub fn resolve(template: &TemplateRef, data: &TaskData) -> Option<Value> {
    match template {
        TemplateRef::Literal(text) => Some(Value::String(text.clone())),
        TemplateRef::Field(field) => match data.get(field) {
            Some(Value::Null) | None => {
                tracing::debug!(field = %field, "template field missing from task data");
                None
            }
            Some(value) => Some(value.clone()),
        },
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> TaskData {
        match value {
            Value::Object(map) => map,
            _ => panic!("task data must be an object"),
        }
    }

    #[test]
    fn literal_resolves_to_itself() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve("literal", &data(json!({"literal": "nope"}))),
            Some(json!("literal"))
        );
        assert_eq!(
            resolver.resolve_string("literal", &TaskData::new()),
            Some("literal".to_string())
        );
    }

    #[test]
    fn missing_field_is_soft_absence() {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve("$missing", &TaskData::new()), None);
        assert_eq!(resolver.resolve_string("$missing", &TaskData::new()), None);
    }

    #[test]
    fn null_field_is_absent() {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve("$clip", &data(json!({"clip": null}))), None);
    }

    #[test]
    fn field_resolves_from_task_data() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve_string("$field", &data(json!({"field": "x"}))),
            Some("x".to_string())
        );
    }

    #[test]
    fn resolution_is_one_level_only() {
        let resolver = Resolver::default();
        let task = data(json!({"a": "$b", "b": "deep"}));
        assert_eq!(resolver.resolve_string("$a", &task), Some("$b".to_string()));
    }

    #[test]
    fn bare_sigil_is_literal() {
        assert_eq!(
            TemplateRef::parse("$", DEFAULT_SIGIL),
            TemplateRef::Literal("$".to_string())
        );
        assert!(TemplateRef::parse("$x", DEFAULT_SIGIL).is_reference());
    }

    #[test]
    fn custom_sigil() {
        let resolver = Resolver::new('@');
        let task = data(json!({"clip": "v.mp4"}));
        assert_eq!(resolver.resolve_string("@clip", &task), Some("v.mp4".into()));
        assert_eq!(resolver.resolve_string("$clip", &task), Some("$clip".into()));
    }

    #[test]
    fn scalars_display_but_structures_do_not() {
        let resolver = Resolver::default();
        let task = data(json!({"n": 3, "flag": true, "list": [1, 2]}));
        assert_eq!(resolver.resolve_string("$n", &task), Some("3".into()));
        assert_eq!(resolver.resolve_string("$flag", &task), Some("true".into()));
        assert_eq!(resolver.resolve_string("$list", &task), None);
        assert_eq!(resolver.resolve("$list", &task), Some(json!([1, 2])));
    }
}
