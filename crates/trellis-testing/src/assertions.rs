//! Assertion helpers over built trees.

use trellis_core::{VTree, Widget};

use crate::recorders::{EventLog, PortEvent};

/// Concatenated text content of a tree, descending into rendered widgets.
pub fn tree_text(tree: &VTree) -> String {
    let mut out = String::new();
    collect_text(tree, &mut out);
    out
}

fn collect_text(tree: &VTree, out: &mut String) {
    match tree {
        VTree::Text(text) => out.push_str(text),
        VTree::List(items) => items.iter().flatten().for_each(|t| collect_text(t, out)),
        VTree::Node(node) => node
            .children
            .iter()
            .flatten()
            .for_each(|t| collect_text(t, out)),
        VTree::Widget(widget) => {
            if let Some(rendered) = widget.rendered() {
                collect_text(rendered, out);
            }
        }
    }
}

/// Every widget in the tree, depth-first, including those inside rendered
/// widget subtrees.
pub fn find_widgets(tree: &VTree) -> Vec<&Widget> {
    let mut found = Vec::new();
    collect_widgets(tree, &mut found);
    found
}

fn collect_widgets<'a>(tree: &'a VTree, found: &mut Vec<&'a Widget>) {
    match tree {
        VTree::Text(_) => {}
        VTree::List(items) => items
            .iter()
            .flatten()
            .for_each(|t| collect_widgets(t, found)),
        VTree::Node(node) => node
            .children
            .iter()
            .flatten()
            .for_each(|t| collect_widgets(t, found)),
        VTree::Widget(widget) => {
            found.push(widget);
            if let Some(rendered) = widget.rendered() {
                collect_widgets(rendered, found);
            }
        }
    }
}

/// Widgets whose component has the given name.
pub fn find_widgets_named<'a>(tree: &'a VTree, name: &str) -> Vec<&'a Widget> {
    find_widgets(tree)
        .into_iter()
        .filter(|w| w.component().name() == name)
        .collect()
}

pub fn assert_tree_text(tree: Option<&VTree>, expected: &str, msg: &str) {
    let actual = tree.map(tree_text).unwrap_or_default();
    assert_eq!(actual, expected, "{}: text content differs", msg);
}

pub fn assert_markup(tree: Option<&VTree>, expected: &str, msg: &str) {
    let actual = tree.map(VTree::to_markup).unwrap_or_default();
    assert_eq!(actual, expected, "{}: markup differs", msg);
}

/// Asserts that, ignoring other events, commits and render requests occur
/// as the given sequence of `"commit"` / `"render"` labels.
pub fn assert_commit_render_order(log: &EventLog, expected: &[&str], msg: &str) {
    let actual: Vec<&str> = log
        .events()
        .iter()
        .filter_map(|e| match e {
            PortEvent::Commit { .. } => Some("commit"),
            PortEvent::RenderRequested => Some("render"),
            _ => None,
        })
        .collect();
    assert_eq!(actual, expected, "{}: commit/render order differs", msg);
}
