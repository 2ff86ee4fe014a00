//! Attribute value types.
//!
//! This module defines the runtime representation of attribute values and the
//! conversions between them, authoring-document strings, and JSON.

use serde_json::Value;

use super::spec::AttributeKind;

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
    OptText(Option<String>),
    /// Enum value as string (e.g., `choice` = "single" | "single-radio" | "multiple")
    Enum(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Does this value have the given shape? Enum values must also be a valid variant.
    pub fn fits(&self, kind: &AttributeKind) -> bool {
        match (self, kind) {
            (AttrValue::Bool(_), AttributeKind::Bool)
            | (AttrValue::Number(_), AttributeKind::Number)
            | (AttrValue::Text(_), AttributeKind::Text)
            | (AttrValue::OptText(_), AttributeKind::OptText)
            | (AttrValue::List(_), AttributeKind::List) => true,
            (AttrValue::Enum(v), AttributeKind::Enum(variants)) => variants.contains(&v.as_str()),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text of a `Text`, present `OptText`, or `Enum` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) | AttrValue::Enum(s) => Some(s),
            AttrValue::OptText(s) => s.as_deref(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Bool(v) => Value::Bool(*v),
            AttrValue::Number(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttrValue::Text(s) | AttrValue::Enum(s) => Value::String(s.clone()),
            AttrValue::OptText(s) => s.clone().map(Value::String).unwrap_or(Value::Null),
            AttrValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Reads a JSON value as the given shape. `None` when the JSON doesn't fit.
    pub fn from_json(kind: &AttributeKind, value: &Value) -> Option<AttrValue> {
        let parsed = match (kind, value) {
            (AttributeKind::Bool, Value::Bool(b)) => AttrValue::Bool(*b),
            (AttributeKind::Number, Value::Number(n)) => AttrValue::Number(n.as_f64()?),
            (AttributeKind::Text, Value::String(s)) => AttrValue::Text(s.clone()),
            (AttributeKind::OptText, Value::String(s)) => AttrValue::OptText(Some(s.clone())),
            (AttributeKind::OptText, Value::Null) => AttrValue::OptText(None),
            (AttributeKind::Enum(_), Value::String(s)) => AttrValue::Enum(s.clone()),
            (AttributeKind::List, Value::Array(items)) => AttrValue::List(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()?,
            ),
            _ => return None,
        };
        parsed.fits(kind).then_some(parsed)
    }

    /// Parses an attribute as written in an authoring document.
    ///
    /// Lists are comma separated; surrounding whitespace around items is dropped.
    pub fn parse_prop(kind: &AttributeKind, raw: &str) -> Result<AttrValue, String> {
        match kind {
            AttributeKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(AttrValue::Bool(true)),
                "false" | "no" | "0" => Ok(AttrValue::Bool(false)),
                other => Err(format!("expected a boolean, found '{}'", other)),
            },
            AttributeKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(AttrValue::Number)
                .ok_or_else(|| format!("expected a finite number, found '{}'", raw)),
            AttributeKind::Text => Ok(AttrValue::Text(raw.to_string())),
            AttributeKind::OptText => Ok(AttrValue::OptText(Some(raw.to_string()))),
            AttributeKind::Enum(variants) => {
                if variants.contains(&raw) {
                    Ok(AttrValue::Enum(raw.to_string()))
                } else {
                    Err(format!(
                        "expected one of [{}], found '{}'",
                        variants.join(", "),
                        raw
                    ))
                }
            }
            AttributeKind::List => Ok(AttrValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}
