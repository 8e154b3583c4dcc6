//! Core graph types
//!
//! This module contains the element types a graph description is made of:
//! nodes, edges, clusters and the enums describing how they are drawn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Visual attributes keyed by Graphviz attribute name.
///
/// Ordered so that serialization never depends on hashing.
pub type Attributes = BTreeMap<String, String>;

/// Layout orientation of the whole graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LeftToRight,
    #[default]
    TopToBottom,
    BottomToTop,
}

impl Direction {
    /// Graphviz `rankdir` value
    pub fn rankdir(self) -> &'static str {
        match self {
            Direction::LeftToRight => "LR",
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Box,
    Record,
    Component,
    Tab,
    Note,
    Box3d,
    Ellipse,
    Folder,
    Cylinder,
    Plaintext,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Record => "record",
            Shape::Component => "component",
            Shape::Tab => "tab",
            Shape::Note => "note",
            Shape::Box3d => "box3d",
            Shape::Ellipse => "ellipse",
            Shape::Folder => "folder",
            Shape::Cylinder => "cylinder",
            Shape::Plaintext => "plaintext",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
}

/// Which end of an edge carries the arrowhead.
///
/// `Reversed` keeps the declared source and target for ranking but draws the
/// arrow at the source, the usual convention for inheritance and realization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    #[default]
    Forward,
    Reversed,
}

/// Display text of an element.
///
/// Plain text may contain Graphviz escapes (`\n`, `\l`, `\<`) and record
/// markup; those are passed through untouched. HTML-like labels are emitted
/// between angle brackets instead of quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Html { html: String },
}

impl Label {
    pub fn text(text: impl Into<String>) -> Self {
        Label::Text(text.into())
    }

    pub fn html(html: impl Into<String>) -> Self {
        Label::Html { html: html.into() }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: Label,
    pub shape: Option<Shape>,
    pub attributes: Attributes,
}

impl Node {
    /// Create a node whose label defaults to its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: Label::Text(id.clone()),
            id,
            shape: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: Option<Label>,
    pub style: EdgeStyle,
    pub direction: EdgeDirection,
    pub attributes: Attributes,
}

impl Edge {
    /// Create a solid forward edge between two node or cluster references.
    ///
    /// A reference is either a bare id or `cluster::id`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            style: EdgeStyle::default(),
            direction: EdgeDirection::default(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn dashed(self) -> Self {
        self.with_style(EdgeStyle::Dashed)
    }

    pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn reversed(self) -> Self {
        self.with_direction(EdgeDirection::Reversed)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub label: Option<Label>,
    pub attributes: Attributes,
    /// Ids of grouped nodes and nested clusters, in emission order
    pub children: Vec<String>,
}

impl Cluster {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Handle to a node added to a graph description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) usize);

/// Handle to an edge added to a graph description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle(pub(crate) usize);

/// Handle to a cluster added to a graph description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterHandle(pub(crate) usize);

/// Target of an attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Graph,
    NodeDefaults,
    EdgeDefaults,
    Node(NodeHandle),
    Edge(EdgeHandle),
    Cluster(ClusterHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_label_defaults_to_id() {
        let node = Node::new("App");
        assert_eq!(node.label, Label::Text("App".to_string()));
        assert_eq!(node.shape, None);
    }

    #[test]
    fn test_label_deserializes_text_and_html() {
        #[derive(Deserialize)]
        struct Holder {
            plain: Label,
            rich: Label,
        }

        let holder: Holder =
            toml::from_str("plain = \"Usuario\"\nrich = { html = \"<b>App</b>\" }").unwrap();
        assert_eq!(holder.plain, Label::text("Usuario"));
        assert_eq!(holder.rich, Label::html("<b>App</b>"));
    }

    #[test]
    fn test_direction_rankdir() {
        assert_eq!(Direction::LeftToRight.rankdir(), "LR");
        assert_eq!(Direction::default().rankdir(), "TB");
        assert_eq!(Direction::BottomToTop.rankdir(), "BT");
    }
}
