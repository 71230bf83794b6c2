use serde::{Deserialize, Serialize};

use super::attributes::Attributes;

/// Index of a node inside its [`super::Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    pub attributes: Attributes,
    /// Out-of-band children (attached shadow root). Nodes listed here have
    /// no parent until they are spliced into the regular child list.
    pub shadow_root: Option<Vec<NodeId>>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Attributes::new(),
            shadow_root: None,
        }
    }
}

/// Opaque non-element, non-text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherData {
    /// Node type label, e.g. `comment`
    pub kind: String,
    pub content: String,
}

/// Tagged node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
    Other(OtherData),
}

/// Arena slot
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Node in the source document this node was cloned from
    pub(crate) origin: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            origin: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) | NodeData::Other(_) => None,
        }
    }
}
