//! Capability surface the engine needs from a tree representation
//!
//! The engine, the rule contracts and the mutation helpers in [`crate::ops`]
//! only talk to trees through [`DomTree`]. [`crate::model::Document`] is the
//! arena implementation shipped with this crate.

use std::fmt::Debug;
use std::hash::Hash;

use crate::errors::{DomSlimError, Result};

/// Node variant as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    /// Opaque non-element, non-text node (comments, processing instructions)
    Other,
}

/// Mutable, single-rooted tree addressed by copyable node ids
///
/// Implementations must keep the tree acyclic, give each node at most one
/// parent and never reuse an id for a different node while the tree lives.
pub trait DomTree {
    /// Node identity
    type NodeId: Copy + Eq + Hash + Debug;

    /// Non-owning back-reference to the node a node was cloned from
    type Origin: Clone + Debug;

    fn kind(&self, node: Self::NodeId) -> Result<NodeKind>;

    /// Lowercase tag name; `None` for non-elements
    fn tag_name(&self, node: Self::NodeId) -> Option<String>;

    /// Snapshot of the current child sequence
    ///
    /// The returned vector is owned, so iterating it never observes
    /// mutations made afterwards.
    fn children(&self, node: Self::NodeId) -> Result<Vec<Self::NodeId>>;

    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Remove the node from its parent's child list. Detaching a parentless
    /// node is a no-op.
    fn detach(&mut self, node: Self::NodeId) -> Result<()>;

    /// Move `child` into `parent` directly before `reference`
    ///
    /// # Errors
    ///
    /// `ReferenceNotChild` if `reference` is not a child of `parent`,
    /// `CycleDetected` if `child` is `parent` or one of its ancestors.
    fn insert_before(
        &mut self,
        parent: Self::NodeId,
        child: Self::NodeId,
        reference: Self::NodeId,
    ) -> Result<()>;

    /// Move `child` to the end of `parent`'s child list
    fn append_child(&mut self, parent: Self::NodeId, child: Self::NodeId) -> Result<()>;

    /// Move all children of `node` into its parent, directly before `node`,
    /// in their current order. Returns the moved children.
    ///
    /// Moving a grandchild up one level cannot close a cycle, so
    /// implementations may skip the ancestor walk of `insert_before`.
    ///
    /// # Errors
    ///
    /// `UnfoldRoot` if `node` has no parent.
    fn hoist_children(&mut self, node: Self::NodeId) -> Result<Vec<Self::NodeId>> {
        let parent = self.parent(node).ok_or_else(|| DomSlimError::UnfoldRoot {
            node: self.describe(node),
        })?;
        let children = self.children(node)?;
        for &child in &children {
            self.insert_before(parent, child, node)?;
        }
        Ok(children)
    }

    /// Attributes in stored order; empty for non-elements
    fn attributes(&self, node: Self::NodeId) -> Vec<(String, String)>;

    fn attribute(&self, node: Self::NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: Self::NodeId, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&mut self, node: Self::NodeId, name: &str) -> Result<()>;

    /// Text payload of a text node
    fn text(&self, node: Self::NodeId) -> Option<String>;

    fn set_text(&mut self, node: Self::NodeId, value: &str) -> Result<()>;

    fn origin(&self, node: Self::NodeId) -> Option<Self::Origin>;

    /// Short label used in diagnostics, e.g. `<div#12>`
    fn describe(&self, node: Self::NodeId) -> String;

    fn is_element(&self, node: Self::NodeId) -> bool {
        matches!(self.kind(node), Ok(NodeKind::Element))
    }
}
