//! # Views
//!
//! A view renderer is a pure function from a [`StateView`] to a UI description. It
//! reads state and refers to actions by name; it never mutates anything. The result
//! is a [`ViewNode`] tree that any rendering technology can interpret, or `None` when
//! the tag has nothing to show.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::instance::StateView;

pub type ViewRenderer = fn(&StateView) -> Option<ViewNode>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            props: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }

    /// Wires a UI event to one of the tag's actions.
    pub fn bind(self, event: &str, action: &str) -> Self {
        self.prop(event, json!({ "action": action }))
    }

    pub fn child(mut self, node: ViewNode) -> Self {
        self.children.push(node);
        self
    }

    /// The action bound to `event`, if any.
    pub fn binding(&self, event: &str) -> Option<&str> {
        self.props.get(event)?.get("action")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_named_actions() {
        let node = ViewNode::new("button")
            .prop("label", "Play")
            .bind("onClick", "onHotKey");
        assert_eq!(node.binding("onClick"), Some("onHotKey"));
        assert_eq!(node.binding("label"), None);
        assert_eq!(node.binding("onHover"), None);
    }

    #[test]
    fn empty_collections_are_not_serialized() {
        let node = ViewNode::new("div").child(ViewNode::new("span"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, json!({"kind": "div", "children": [{"kind": "span"}]}));
    }
}
