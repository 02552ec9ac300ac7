//! Renderable output of a pass and the node constructor port.

use crate::value::{Props, Value};
use crate::widget::Widget;

/// A built, renderable tree.
#[derive(Debug, Clone)]
pub enum VTree {
    Text(String),
    /// Output of a descriptor list; absent entries stay in place as `None`.
    List(Vec<Option<VTree>>),
    Node(VNode),
    Widget(Widget),
}

/// An intrinsic node with normalized props and built children.
#[derive(Debug, Clone)]
pub struct VNode {
    pub tag: String,
    pub props: Props,
    pub children: Vec<Option<VTree>>,
}

impl VTree {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VTree::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&VNode> {
        match self {
            VTree::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            VTree::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Option<VTree>]> {
        match self {
            VTree::List(items) => Some(items),
            _ => None,
        }
    }

    /// Debug markup. Widgets print their rendered subtree, or a
    /// `<!--Name-->` placeholder until the host has initialized them.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            VTree::Text(text) => out.push_str(text),
            VTree::List(items) => {
                for item in items.iter().flatten() {
                    item.write_markup(out);
                }
            }
            VTree::Node(node) => node.write_markup(out),
            VTree::Widget(widget) => match widget.rendered() {
                Some(tree) => tree.write_markup(out),
                None if widget.is_initialized() => {}
                None => {
                    out.push_str("<!--");
                    out.push_str(widget.component().name());
                    out.push_str("-->");
                }
            },
        }
    }
}

impl VNode {
    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.props {
            match value {
                Value::Callback(_) | Value::Null | Value::Map(_) => {}
                Value::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                Value::Bool(false) => {}
                other => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&other.to_display_string());
                    out.push('"');
                }
            }
        }
        out.push('>');
        for child in self.children.iter().flatten() {
            child.write_markup(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Constructs intrinsic nodes: `make_node(tag, normalized_props, built_children)`.
///
/// Pure construction; no validation beyond shape.
pub trait NodeFactory: 'static {
    fn make_node(&self, tag: &str, props: Props, children: Vec<Option<VTree>>) -> VTree;
}

/// Default factory producing [`VNode`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hyperscript;

impl NodeFactory for Hyperscript {
    fn make_node(&self, tag: &str, props: Props, children: Vec<Option<VTree>>) -> VTree {
        VTree::Node(VNode {
            tag: tag.to_string(),
            props,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::props;

    #[test]
    fn markup_skips_absent_children_and_handler_props() {
        let tree = Hyperscript.make_node(
            "p",
            props([
                ("className", Value::from("lead")),
                ("hidden", Value::from(true)),
                ("onclick", Value::Callback(crate::Callback::new(|_| {}))),
            ]),
            vec![
                Some(VTree::Text("a".into())),
                None,
                Some(VTree::Text("b".into())),
            ],
        );
        assert_eq!(tree.to_markup(), "<p className=\"lead\" hidden>ab</p>");
    }
}
