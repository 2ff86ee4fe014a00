//! Selection over a fixed universe of keys.
//!
//! The fragment keeps two lists that are always written together:
//!
//! - `selection`: the canonical selection, in the order the user chose the keys.
//!   This is what snapshots persist (as `choices`).
//! - `displayed_selection`: what the control shows, derived from the canonical
//!   selection by the tag's aggregation `strategy`.
//!
//! ## Aggregation
//!
//! Over a tree of keys, checking a node checks all of its descendants, and a node
//! whose children are all checked counts as checked itself. The strategy decides
//! which checked nodes are displayed:
//!
//! | Strategy | Displayed |
//! |----------|-----------|
//! | `as-selected` | exactly the canonical selection |
//! | `show-parent` | checked nodes whose parent is not checked |
//! | `show-all` | every checked node |
//! | `show-child` | checked leaves only |
//!
//! With an empty universe the fragment accepts any key and every strategy displays
//! the canonical selection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};
use crate::error::Result;
use crate::instance::ActionContext;

pub const STRATEGIES: &[&str] = &["as-selected", "show-parent", "show-all", "show-child"];
pub const FILLS: &[&str] = &["empty", "partial", "full"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    AsSelected,
    ShowParent,
    ShowAll,
    ShowChild,
}

impl Strategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "as-selected" => Some(Strategy::AsSelected),
            "show-parent" => Some(Strategy::ShowParent),
            "show-all" => Some(Strategy::ShowAll),
            "show-child" => Some(Strategy::ShowChild),
            _ => None,
        }
    }
}

/// Where the selection stands relative to its universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFill {
    Empty,
    Partial,
    Full,
}

impl SelectionFill {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionFill::Empty => "empty",
            SelectionFill::Partial => "partial",
            SelectionFill::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub title: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(key: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            children: Vec::new(),
        }
    }

    pub fn branch(key: &str, title: &str, children: Vec<TreeNode>) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            children,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NodeLinks {
    parent: Option<String>,
    children: Vec<String>,
}

/// The universe of selectable keys, with their hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SelectionTree {
    roots: Vec<TreeNode>,
    links: BTreeMap<String, NodeLinks>,
    order: Vec<String>,
}

impl SelectionTree {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        let mut tree = Self {
            roots,
            ..Self::default()
        };
        let roots = tree.roots.clone();
        for node in &roots {
            tree.index(node, None);
        }
        tree
    }

    /// A flat universe: every key is a leaf.
    pub fn flat<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            keys.into_iter()
                .map(|key| TreeNode::leaf(key.as_ref(), key.as_ref()))
                .collect(),
        )
    }

    fn index(&mut self, node: &TreeNode, parent: Option<&str>) {
        self.order.push(node.key.clone());
        self.links.insert(
            node.key.clone(),
            NodeLinks {
                parent: parent.map(str::to_string),
                children: node.children.iter().map(|c| c.key.clone()).collect(),
            },
        );
        for child in &node.children {
            self.index(child, Some(&node.key));
        }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.links.contains_key(key)
    }

    pub fn parent(&self, key: &str) -> Option<&str> {
        self.links.get(key).and_then(|l| l.parent.as_deref())
    }

    fn children(&self, key: &str) -> &[String] {
        self.links
            .get(key)
            .map(|l| l.children.as_slice())
            .unwrap_or(&[])
    }

    fn is_leaf(&self, key: &str) -> bool {
        self.children(key).is_empty()
    }

    fn descendants(&self, key: &str, out: &mut BTreeSet<String>) {
        for child in self.children(key) {
            out.insert(child.clone());
            self.descendants(child, out);
        }
    }

    /// `selected` with `key` and its descendants unchecked. A selected ancestor
    /// of `key` is split into its children that are off the path to `key`.
    fn without(&self, selected: &[String], key: &str) -> Vec<String> {
        let mut path = vec![key.to_string()];
        let mut cursor = key;
        while let Some(parent) = self.parent(cursor) {
            path.push(parent.to_string());
            cursor = parent;
        }
        let mut dropped = BTreeSet::new();
        self.descendants(key, &mut dropped);
        dropped.insert(key.to_string());

        let mut remaining = Vec::new();
        for entry in selected.iter().filter(|k| !dropped.contains(*k)) {
            match path.iter().position(|step| step == entry) {
                Some(depth) => {
                    for level in (1..=depth).rev() {
                        let next = &path[level - 1];
                        remaining.extend(
                            self.children(&path[level])
                                .iter()
                                .filter(|child| *child != next)
                                .cloned(),
                        );
                    }
                }
                None => remaining.push(entry.clone()),
            }
        }
        dedup(remaining)
    }

    /// Every node implied by `selected`: the keys, their descendants, and any
    /// ancestor whose children are all checked.
    fn checked(&self, selected: &[String]) -> BTreeSet<String> {
        let mut checked = BTreeSet::new();
        for key in selected.iter().filter(|k| self.contains(k)) {
            checked.insert(key.clone());
            self.descendants(key, &mut checked);
        }
        // Post-order so children settle before their parents.
        for key in self.order.iter().rev() {
            let children = self.children(key);
            if !children.is_empty() && children.iter().all(|c| checked.contains(c)) {
                checked.insert(key.clone());
            }
        }
        checked
    }

    /// What the control displays for `selected` under `strategy`.
    pub fn aggregate(&self, selected: &[String], strategy: Strategy) -> Vec<String> {
        if self.is_empty() || strategy == Strategy::AsSelected {
            return selected.to_vec();
        }
        let checked = self.checked(selected);
        self.order
            .iter()
            .filter(|key| checked.contains(*key))
            .filter(|key| match strategy {
                Strategy::ShowAll | Strategy::AsSelected => true,
                Strategy::ShowParent => self
                    .parent(key)
                    .map_or(true, |parent| !checked.contains(parent)),
                Strategy::ShowChild => self.is_leaf(key),
            })
            .cloned()
            .collect()
    }

    pub fn fill(&self, selected: &[String]) -> SelectionFill {
        if selected.is_empty() {
            return SelectionFill::Empty;
        }
        if self.is_empty() {
            return SelectionFill::Partial;
        }
        let checked = self.checked(selected);
        let all_leaves = self
            .order
            .iter()
            .filter(|key| self.is_leaf(key))
            .all(|key| checked.contains(key));
        if all_leaves {
            SelectionFill::Full
        } else {
            SelectionFill::Partial
        }
    }
}

/// Keeps insertion order, drops repeats.
fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

fn check_keys(ctx: &ActionContext<'_>, tree: &SelectionTree, keys: &[String]) -> Result<()> {
    if tree.is_empty() {
        return Ok(());
    }
    match keys.iter().find(|key| !tree.contains(key)) {
        Some(unknown) => Err(ctx.invalid_args(format!("'{}' is not a selectable key", unknown))),
        None => Ok(()),
    }
}

/// Writes the canonical selection and everything derived from it.
fn write(ctx: &mut ActionContext<'_>, tree: &SelectionTree, selection: Vec<String>) -> Result<()> {
    let strategy = ctx
        .text("strategy")
        .and_then(Strategy::parse)
        .unwrap_or(Strategy::AsSelected);
    let displayed = tree.aggregate(&selection, strategy);
    let fill = tree.fill(&selection);
    ctx.set("selection", AttrValue::List(selection))?;
    ctx.set("displayed_selection", AttrValue::List(displayed))?;
    ctx.set("selection_fill", AttrValue::Enum(fill.as_str().to_string()))
}

pub fn fragment(tree: Arc<SelectionTree>, defaults: Vec<String>) -> Fragment {
    let on_select = Arc::clone(&tree);
    let on_deselect = Arc::clone(&tree);
    let on_clear = Arc::clone(&tree);
    let on_change = Arc::clone(&tree);
    let on_create = Arc::clone(&tree);
    let on_restore = Arc::clone(&tree);

    Fragment::new("selection")
        .attribute(
            AttributeSpec::authored("strategy", AttributeKind::Enum(STRATEGIES))
                .with_default(AttrValue::Enum("as-selected".to_string())),
        )
        .attribute(
            AttributeSpec::state("selection", AttributeKind::List)
                .with_default(AttrValue::List(defaults.clone()))
                .persist_as("choices"),
        )
        .attribute(
            AttributeSpec::state("displayed_selection", AttributeKind::List)
                .with_default(AttrValue::List(defaults)),
        )
        .attribute(AttributeSpec::state(
            "selection_fill",
            AttributeKind::Enum(FILLS),
        ))
        .action("select", move |ctx, args| {
            let key = args::string(ctx.action(), args)?;
            check_keys(ctx, &on_select, std::slice::from_ref(&key))?;
            let mut selection = ctx.list("selection");
            if !selection.contains(&key) {
                selection.push(key);
            }
            write(ctx, &on_select, selection)
        })
        .action("deselect", move |ctx, args| {
            let key = args::string(ctx.action(), args)?;
            check_keys(ctx, &on_deselect, std::slice::from_ref(&key))?;
            let selection = on_deselect.without(&ctx.list("selection"), &key);
            write(ctx, &on_deselect, selection)
        })
        .action("clear", move |ctx, args| {
            args::none(ctx.action(), args)?;
            write(ctx, &on_clear, Vec::new())
        })
        .action("onChange", move |ctx, args| {
            let keys = args::strings(ctx.action(), args)?;
            check_keys(ctx, &on_change, &keys)?;
            write(ctx, &on_change, dedup(keys))
        })
        .after_create(move |ctx| {
            let selection = dedup(ctx.list("selection"));
            write(ctx, &on_create, selection)
        })
        .on_restore(move |ctx| {
            let selection = ctx.list("selection");
            check_keys(ctx, &on_restore, &selection)?;
            write(ctx, &on_restore, dedup(selection))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose, Props};
    use crate::id::SequentialSource;
    use crate::instance::TagInstance;
    use serde_json::json;

    fn sample_tree() -> SelectionTree {
        SelectionTree::new(vec![
            TreeNode::branch("0-0", "Category 1", vec![TreeNode::leaf("0-0-0", "1.1")]),
            TreeNode::branch(
                "0-1",
                "Category 2",
                vec![
                    TreeNode::leaf("0-1-0", "2.1"),
                    TreeNode::branch(
                        "0-1-1",
                        "2.2",
                        vec![
                            TreeNode::leaf("0-1-1-0", "2.2.1"),
                            TreeNode::leaf("0-1-1-1", "2.2.2"),
                        ],
                    ),
                    TreeNode::leaf("0-1-2", "2.3"),
                ],
            ),
        ])
    }

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn instance_with(tree: SelectionTree, strategy: &str) -> TagInstance {
        let model = compose("sel", vec![fragment(Arc::new(tree), keys(&["0-0-0"]))]).unwrap();
        let mut props = Props::new();
        props.insert("strategy".into(), strategy.into());
        Arc::new(model)
            .create(&props, &SequentialSource::new("s"), false)
            .unwrap()
    }

    #[test]
    fn show_parent_collapses_complete_branches() {
        let tree = sample_tree();
        assert_eq!(
            tree.aggregate(&keys(&["0-1-1-0", "0-1-1-1"]), Strategy::ShowParent),
            keys(&["0-1-1"])
        );
        assert_eq!(
            tree.aggregate(&keys(&["0-1-0", "0-1-1"]), Strategy::ShowParent),
            keys(&["0-1-0", "0-1-1"])
        );
    }

    #[test]
    fn show_child_expands_to_leaves() {
        let tree = sample_tree();
        assert_eq!(
            tree.aggregate(&keys(&["0-1-1"]), Strategy::ShowChild),
            keys(&["0-1-1-0", "0-1-1-1"])
        );
    }

    #[test]
    fn show_all_lists_every_checked_node() {
        let tree = sample_tree();
        assert_eq!(
            tree.aggregate(&keys(&["0-0-0"]), Strategy::ShowAll),
            keys(&["0-0", "0-0-0"])
        );
    }

    #[test]
    fn as_selected_and_flat_trees_pass_through() {
        let tree = sample_tree();
        let picked = keys(&["0-1-1", "0-0-0"]);
        assert_eq!(tree.aggregate(&picked, Strategy::AsSelected), picked);
        let open = SelectionTree::default();
        assert_eq!(open.aggregate(&picked, Strategy::ShowChild), picked);
    }

    #[test]
    fn fill_moves_between_states() {
        let tree = sample_tree();
        assert_eq!(tree.fill(&[]), SelectionFill::Empty);
        assert_eq!(tree.fill(&keys(&["0-1"])), SelectionFill::Partial);
        assert_eq!(tree.fill(&keys(&["0-0", "0-1"])), SelectionFill::Full);
    }

    #[test]
    fn defaults_apply_on_create() {
        let inst = instance_with(sample_tree(), "as-selected");
        assert_eq!(inst.list("selection"), Some(&keys(&["0-0-0"])[..]));
        assert_eq!(inst.list("displayed_selection"), Some(&keys(&["0-0-0"])[..]));
        assert_eq!(inst.text("selection_fill"), Some("partial"));
    }

    #[test]
    fn strategy_shapes_the_initial_display() {
        let inst = instance_with(sample_tree(), "show-parent");
        assert_eq!(inst.list("selection"), Some(&keys(&["0-0-0"])[..]));
        assert_eq!(inst.list("displayed_selection"), Some(&keys(&["0-0"])[..]));
    }

    #[test]
    fn select_is_idempotent() {
        let mut inst = instance_with(sample_tree(), "as-selected");
        inst.call("select", &json!("0-1-2")).unwrap();
        let once = inst.list("selection").unwrap().to_vec();
        let event = inst.call("select", &json!("0-1-2")).unwrap();
        assert!(event.is_empty());
        assert_eq!(inst.list("selection").unwrap(), &once[..]);
    }

    #[test]
    fn clear_after_selects_is_empty() {
        let mut inst = instance_with(sample_tree(), "show-all");
        inst.call("select", &json!("0-1-0")).unwrap();
        inst.call("select", &json!("0-1-1")).unwrap();
        inst.call("clear", &json!(null)).unwrap();
        assert!(inst.list("selection").unwrap().is_empty());
        assert!(inst.list("displayed_selection").unwrap().is_empty());
        assert_eq!(inst.text("selection_fill"), Some("empty"));
    }

    #[test]
    fn deselect_drops_key_and_descendants() {
        let mut inst = instance_with(sample_tree(), "as-selected");
        inst.call("onChange", &json!(["0-1-1", "0-1-1-0", "0-0-0"]))
            .unwrap();
        inst.call("deselect", &json!("0-1-1")).unwrap();
        assert_eq!(inst.list("selection"), Some(&keys(&["0-0-0"])[..]));
    }

    #[test]
    fn deselect_implied_child_splits_its_ancestor() {
        let mut inst = instance_with(sample_tree(), "show-all");
        inst.call("onChange", &json!(["0-1-1"])).unwrap();
        assert!(inst
            .list("displayed_selection")
            .unwrap()
            .contains(&"0-1-1-0".to_string()));

        let event = inst.call("deselect", &json!("0-1-1-0")).unwrap();
        assert!(!event.is_empty());
        assert_eq!(inst.list("selection"), Some(&keys(&["0-1-1-1"])[..]));
        assert_eq!(inst.list("displayed_selection"), Some(&keys(&["0-1-1-1"])[..]));
    }

    #[test]
    fn deselect_deep_child_splits_every_level() {
        let tree = sample_tree();
        assert_eq!(
            tree.without(&keys(&["0-0-0", "0-1"]), "0-1-1-0"),
            keys(&["0-0-0", "0-1-0", "0-1-2", "0-1-1-1"])
        );
        assert_eq!(
            tree.without(&keys(&["0-1", "0-1-1-1"]), "0-1-1-0"),
            keys(&["0-1-0", "0-1-2", "0-1-1-1"])
        );
    }

    #[test]
    fn unknown_keys_are_rejected_without_changes() {
        let mut inst = instance_with(sample_tree(), "as-selected");
        assert!(inst.call("select", &json!("9-9")).is_err());
        assert!(inst.call("onChange", &json!(["0-1-0", "9-9"])).is_err());
        assert_eq!(inst.list("selection"), Some(&keys(&["0-0-0"])[..]));
        assert_eq!(inst.version(), 0);
    }

    #[test]
    fn on_change_dedups_and_keeps_order() {
        let mut inst = instance_with(SelectionTree::default(), "as-selected");
        inst.call("onChange", &json!(["b", "a", "b"])).unwrap();
        assert_eq!(inst.list("selection"), Some(&keys(&["b", "a"])[..]));
        assert_eq!(inst.list("displayed_selection"), Some(&keys(&["b", "a"])[..]));
    }
}
