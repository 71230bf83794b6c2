use super::attributes::Attributes;
use super::node::{ElementData, Node, NodeData, NodeId, OtherData};
use crate::errors::{DomSlimError, Result};
use crate::tree::{DomTree, NodeKind};

/// Arena-backed document tree
///
/// Nodes are allocated once and never freed while the document lives; a
/// removed node is simply detached (no parent). Not thread-safe, designed
/// for a single mutator.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of allocated nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_element_with(&mut self, tag: &str, attributes: Attributes) -> NodeId {
        let mut data = ElementData::new(tag);
        data.attributes = attributes;
        self.alloc(NodeData::Element(data))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    pub fn create_other(&mut self, kind: &str, content: &str) -> NodeId {
        self.alloc(NodeData::Other(OtherData {
            kind: kind.to_string(),
            content: content.to_string(),
        }))
    }

    /// Get a node by id
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the id was not allocated by this document.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or_else(|| not_found(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or_else(|| not_found(id))
    }

    pub fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) | NodeData::Other(_) => Err(not_element(id)),
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) | NodeData::Other(_) => Err(not_element(id)),
        }
    }

    /// Borrowed child list (use [`DomTree::children`] for a snapshot)
    pub fn child_slice(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Rename an element in place, keeping attributes and children
    pub fn set_tag_name(&mut self, id: NodeId, tag: &str) -> Result<()> {
        self.element_mut(id)?.tag = tag.to_ascii_lowercase();
        Ok(())
    }

    pub(crate) fn set_origin(&mut self, id: NodeId, origin: Option<NodeId>) -> Result<()> {
        self.node_mut(id)?.origin = origin;
        Ok(())
    }

    /// Attach a shadow root holding `nodes` to `host`
    ///
    /// Each node is detached from wherever it was first.
    pub fn attach_shadow(&mut self, host: NodeId, nodes: Vec<NodeId>) -> Result<()> {
        self.element(host)?;
        for &node in &nodes {
            self.node(node)?;
            self.check_not_ancestor(node, host)?;
            self.detach(node)?;
        }
        let el = self.element_mut(host)?;
        el.shadow_root.get_or_insert_with(Vec::new).extend(nodes);
        Ok(())
    }

    pub fn shadow_children(&self, host: NodeId) -> Result<&[NodeId]> {
        Ok(self
            .element(host)?
            .shadow_root
            .as_deref()
            .unwrap_or_default())
    }

    /// Remove and return the shadow root contents, leaving no shadow root
    pub fn take_shadow_root(&mut self, host: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.element_mut(host)?.shadow_root.take().unwrap_or_default())
    }

    /// Fails if `node` is `parent` itself or one of its ancestors
    ///
    /// Walks up from `parent`, unless `node` is childless and so cannot be
    /// anybody's ancestor.
    fn check_not_ancestor(&self, node: NodeId, parent: NodeId) -> Result<()> {
        let mut current = if self.node(node)?.children.is_empty() && node != parent {
            None
        } else {
            Some(parent)
        };
        while let Some(id) = current {
            if id == node {
                return Err(DomSlimError::CycleDetected {
                    node: node.to_string(),
                    parent: parent.to_string(),
                });
            }
            current = self.node(id)?.parent;
        }
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        self.node(child)?;
        self.check_not_ancestor(child, parent)
    }
}

fn not_found(id: NodeId) -> DomSlimError {
    DomSlimError::NodeNotFound {
        node: id.to_string(),
    }
}

fn not_element(id: NodeId) -> DomSlimError {
    DomSlimError::NotAnElement {
        node: id.to_string(),
    }
}

impl DomTree for Document {
    type NodeId = NodeId;
    type Origin = NodeId;

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(match self.node(node)?.data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Other(_) => NodeKind::Other,
        })
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).ok().map(|el| el.tag.clone())
    }

    fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn detach(&mut self, node: NodeId) -> Result<()> {
        let Some(parent) = self.node(node)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != node);
        self.node_mut(node)?.parent = None;
        Ok(())
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        if !self.node(parent)?.children.contains(&reference) {
            return Err(DomSlimError::ReferenceNotChild {
                parent: parent.to_string(),
                reference: reference.to_string(),
            });
        }
        if child == reference {
            return Ok(());
        }

        self.detach(child)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn hoist_children(&mut self, node: NodeId) -> Result<Vec<NodeId>> {
        let Some(parent) = self.node(node)?.parent else {
            return Err(DomSlimError::UnfoldRoot {
                node: self.describe(node),
            });
        };
        let pos = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == node)
            .ok_or_else(|| DomSlimError::ReferenceNotChild {
                parent: parent.to_string(),
                reference: node.to_string(),
            })?;

        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for &child in &children {
            self.node_mut(child)?.parent = Some(parent);
        }
        let siblings = &mut self.node_mut(parent)?.children;
        let tail = siblings.split_off(pos);
        siblings.extend_from_slice(&children);
        siblings.extend(tail);
        Ok(children)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|el| el.attributes.to_vec())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)
            .ok()
            .and_then(|el| el.attributes.get(name).map(str::to_string))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node)?.attributes.set(name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.element_mut(node)?.attributes.remove(name);
        Ok(())
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text(text) => Some(text.clone()),
            NodeData::Element(_) | NodeData::Other(_) => None,
        }
    }

    fn set_text(&mut self, node: NodeId, value: &str) -> Result<()> {
        match &mut self.node_mut(node)?.data {
            NodeData::Text(text) => {
                *text = value.to_string();
                Ok(())
            }
            NodeData::Element(_) | NodeData::Other(_) => Err(DomSlimError::NotText {
                node: node.to_string(),
            }),
        }
    }

    fn origin(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.origin)
    }

    fn describe(&self, node: NodeId) -> String {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(el)) => format!("<{}{}>", el.tag, node),
            Some(NodeData::Text(_)) => format!("text{}", node),
            Some(NodeData::Other(other)) => format!("{}{}", other.kind, node),
            None => format!("unknown{}", node),
        }
    }
}
