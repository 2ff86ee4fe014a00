//! Attribute specifications.
//!
//! This module defines the schema for attributes: what shape of value they hold,
//! where their value comes from, and how they are persisted.

use super::value::AttrValue;

/// The shape of value an attribute holds.
///
/// Two fragments may both declare an attribute only if they agree on its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Simple boolean (e.g., `showinline`)
    Bool,

    /// Floating point number (e.g., geometry `x`)
    Number,

    /// Text that is always present (e.g., `name` on a control)
    Text,

    /// Text that may be absent (e.g., `toname`, `hotkey`)
    OptText,

    /// One of a closed set of values (e.g., `choice`)
    Enum(&'static [&'static str]),

    /// Ordered list of strings (e.g., `selection`, `labels`)
    List,
}

impl AttributeKind {
    /// The value an attribute of this shape holds when nothing else is specified.
    pub fn zero(&self) -> AttrValue {
        match self {
            AttributeKind::Bool => AttrValue::Bool(false),
            AttributeKind::Number => AttrValue::Number(0.0),
            AttributeKind::Text => AttrValue::Text(String::new()),
            AttributeKind::OptText => AttrValue::OptText(None),
            AttributeKind::Enum(variants) => {
                AttrValue::Enum(variants.first().copied().unwrap_or_default().to_string())
            }
            AttributeKind::List => AttrValue::List(Vec::new()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "bool",
            AttributeKind::Number => "number",
            AttributeKind::Text => "text",
            AttributeKind::OptText => "text?",
            AttributeKind::Enum(_) => "enum",
            AttributeKind::List => "list",
        }
    }
}

/// Where an attribute's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOrigin {
    /// Set from the authoring document when the instance is created.
    Authored,

    /// Owned by a fragment; only that fragment's actions may change it.
    State,

    /// Recomputed from the task context. Transient, never persisted.
    Derived,
}

/// Specification for a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    /// The internal attribute name (e.g., "selection", "toname")
    pub name: &'static str,

    pub kind: AttributeKind,

    pub origin: AttrOrigin,

    /// Value used when the authoring document or snapshot says nothing.
    pub default: AttrValue,

    /// Authored attributes only: must the authoring document supply it?
    pub required: bool,

    /// Authored attributes only: may it be changed after creation?
    pub editable: bool,

    /// Key under the snapshot's `value` object. `None` means not persisted.
    pub persist_as: Option<&'static str>,
}

impl AttributeSpec {
    fn new(name: &'static str, kind: AttributeKind, origin: AttrOrigin) -> Self {
        Self {
            name,
            kind,
            origin,
            default: kind.zero(),
            required: false,
            editable: false,
            persist_as: None,
        }
    }

    pub fn authored(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttrOrigin::Authored)
    }

    pub fn state(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttrOrigin::State)
    }

    pub fn derived(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttrOrigin::Derived)
    }

    pub fn with_default(mut self, default: AttrValue) -> Self {
        self.default = default;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Persist under `key`. Ignored for derived attributes.
    pub fn persist_as(mut self, key: &'static str) -> Self {
        self.persist_as = Some(key);
        self
    }

    /// The snapshot key, if this attribute takes part in snapshots at all.
    pub fn persisted_key(&self) -> Option<&'static str> {
        match self.origin {
            AttrOrigin::Derived => None,
            _ => self.persist_as,
        }
    }

    pub fn is_authored(&self) -> bool {
        self.origin == AttrOrigin::Authored
    }
}
