//! Declarative element descriptors.
//!
//! An [`Element`] is what a component's render returns and what
//! [`Pass::build`](crate::Pass::build) consumes. Descriptors are plain data,
//! produced fresh on every render.

use crate::component::ComponentDef;
use crate::identity::ComponentId;
use crate::value::{Props, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Element {
    Text(String),
    Number(f64),
    /// No output. Keeps its position inside lists.
    #[default]
    Empty,
    List(Vec<Element>),
    Node(NodeElement),
}

/// What a structured node renders as.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// A primitive node such as `div`, handed to the node factory.
    Intrinsic(String),
    /// A component, turned into a [`Widget`](crate::Widget).
    Component(ComponentDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeElement {
    pub tag: Tag,
    pub props: Props,
    pub children: Vec<Element>,
    /// Sibling key; replaces the positional index in identity derivation.
    pub key: Option<String>,
    /// Explicit state slot, bypassing the identity policy.
    pub id: Option<ComponentId>,
}

impl Element {
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    /// An intrinsic node.
    pub fn node(tag: impl Into<String>, props: Props, children: Vec<Element>) -> Self {
        Element::Node(NodeElement {
            tag: Tag::Intrinsic(tag.into()),
            props,
            children,
            key: None,
            id: None,
        })
    }

    /// A component node. Its children are handed to the component unbuilt.
    pub fn component(component: &ComponentDef, props: Props, children: Vec<Element>) -> Self {
        Element::Node(NodeElement {
            tag: Tag::Component(component.clone()),
            props,
            children,
            key: None,
            id: None,
        })
    }

    /// Attaches a sibling key. No effect on non-node descriptors.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let Element::Node(node) = &mut self {
            node.key = Some(key.into());
        }
        self
    }

    /// Pins the state slot of a component node. No effect on other descriptors.
    pub fn with_id(mut self, id: ComponentId) -> Self {
        if let Element::Node(node) = &mut self {
            node.id = Some(id);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Empty)
    }

    pub fn as_node(&self) -> Option<&NodeElement> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl NodeElement {
    pub fn is_component(&self) -> bool {
        matches!(self.tag, Tag::Component(_))
    }

    /// Tag name for intrinsic nodes, component name otherwise.
    pub fn tag_name(&self) -> &str {
        match &self.tag {
            Tag::Intrinsic(name) => name,
            Tag::Component(component) => component.name(),
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Text(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Text(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::Number(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::Number(f64::from(value))
    }
}

impl From<Vec<Element>> for Element {
    fn from(value: Vec<Element>) -> Self {
        Element::List(value)
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(value: Option<T>) -> Self {
        value.map_or(Element::Empty, Into::into)
    }
}

/// Shorthand for an intrinsic node: `h("div", props, children)`.
pub fn h(tag: impl Into<String>, props: Props, children: Vec<Element>) -> Element {
    Element::node(tag, props, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::props;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(Element::from("hi"), Element::Text("hi".into()));
        assert_eq!(Element::from(3), Element::Number(3.0));
        assert_eq!(Element::from(None::<&str>), Element::Empty);
        assert_eq!(
            Element::from(vec![Element::from("a")]),
            Element::List(vec![Element::Text("a".into())])
        );
    }

    #[test]
    fn keys_attach_only_to_nodes() {
        let keyed = h("li", props([("class", "row")]), vec![]).with_key("a");
        assert_eq!(keyed.as_node().and_then(|n| n.key.as_deref()), Some("a"));
        assert_eq!(Element::from("x").with_key("a"), Element::from("x"));
    }
}
