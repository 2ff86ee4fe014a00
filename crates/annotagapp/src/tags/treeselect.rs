//! `treeselect`: a hierarchical classification control.
//!
//! ```text
//! <TreeSelect name="category" toName="txt-1" strategy="show-parent"/>
//! ```
//!
//! Composed from labeling, geometry, the tag's own attributes, a selection over
//! [`category_tree`] (starting at `0-0-0`) and the highlight state. The view is a
//! checkable tree fed by `displayed_selection`, with `onChange` wired back to the
//! selection action.

use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};

use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};
use crate::compose::{compose, TagModel};
use crate::error::Result;
use crate::fragments::selection::{SelectionTree, TreeNode};
use crate::fragments::{geometry, labeling, selected, selection, Fragment};
use crate::instance::StateView;
use crate::views::ViewNode;

pub const NAME: &str = "treeselect";
pub const CHOICES: &[&str] = &["single", "single-radio", "multiple"];
pub const INITIAL_SELECTION: &str = "0-0-0";

/// The category hierarchy the control offers.
pub fn category_tree() -> Arc<SelectionTree> {
    static TREE: OnceLock<Arc<SelectionTree>> = OnceLock::new();
    let tree = TREE.get_or_init(|| {
        Arc::new(SelectionTree::new(vec![
            TreeNode::branch(
                "0-0",
                "Category 1",
                vec![TreeNode::leaf("0-0-0", "Subcategory 1.1")],
            ),
            TreeNode::branch(
                "0-1",
                "Category 2",
                vec![
                    TreeNode::leaf("0-1-0", "Subcategory 2.1"),
                    TreeNode::branch(
                        "0-1-1",
                        "Subcategory 2.2",
                        vec![
                            TreeNode::leaf("0-1-1-0", "2.2.1"),
                            TreeNode::leaf("0-1-1-1", "2.2.2"),
                        ],
                    ),
                    TreeNode::leaf("0-1-2", "Subcategory 2.3"),
                ],
            ),
        ]))
    });
    Arc::clone(tree)
}

fn attrs() -> Fragment {
    Fragment::attrs(
        NAME,
        vec![
            AttributeSpec::authored("name", AttributeKind::Text).required(),
            AttributeSpec::authored("toname", AttributeKind::OptText),
            AttributeSpec::authored("showinline", AttributeKind::Bool),
            AttributeSpec::authored("choice", AttributeKind::Enum(CHOICES))
                .with_default(AttrValue::Enum("single".to_string())),
        ],
    )
}

pub fn model() -> Result<TagModel> {
    compose(
        NAME,
        vec![
            labeling::fragment(),
            geometry::fragment(),
            attrs(),
            selection::fragment(category_tree(), vec![INITIAL_SELECTION.to_string()]),
            selected::fragment(),
        ],
    )
}

fn tree_data(nodes: &[TreeNode]) -> Value {
    Value::Array(
        nodes
            .iter()
            .map(|node| {
                let mut entry = json!({
                    "title": node.title,
                    "value": node.key,
                    "key": node.key,
                });
                if !node.children.is_empty() {
                    entry["children"] = tree_data(&node.children);
                }
                entry
            })
            .collect(),
    )
}

pub fn render(state: &StateView) -> Option<ViewNode> {
    let tree = category_tree();
    let node = ViewNode::new("tree-select")
        .prop("name", state.text("name").unwrap_or_default())
        .prop("treeData", tree_data(tree.roots()))
        .prop("value", state.list("displayed_selection").to_vec())
        .bind("onChange", "onChange")
        .prop("treeCheckable", true)
        .prop("multiple", true)
        .prop("showCheckedStrategy", state.text("strategy").unwrap_or("as-selected"))
        .prop("showInline", state.flag("showinline"))
        .prop("highlighted", state.flag("selected"))
        .prop("searchPlaceholder", "Please select");
    Some(node)
}
