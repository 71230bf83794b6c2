//! Cloning service: isolated copies with origin back-references

use crate::errors::{DomSlimError, Result};
use crate::model::{Document, NodeData, NodeId};
use crate::traversal::{preorder, ShadowMode};
use crate::tree::DomTree;

/// Deep-clone the subtree at `root` into a fresh document
///
/// Every cloned node's origin points at the node it was copied from, shadow
/// roots included. The engine can then mutate the clone while classifiers
/// keep answering questions about the untouched source.
///
/// # Errors
///
/// * `NodeNotFound` - If `root` is not part of `source`
/// * `CloneCountMismatch` - If the source and clone preorders differ in length
pub fn deep_clone_with_references(source: &Document, root: NodeId) -> Result<(Document, NodeId)> {
    let mut clone = Document::new();
    let clone_root = copy_node(source, root, &mut clone)?;

    // (source node, cloned node) pairs whose children still need copying
    let mut pending = vec![(root, clone_root)];
    while let Some((src, dst)) = pending.pop() {
        let src_node = source.node(src)?;

        for &child in src_node.children() {
            let copied = copy_node(source, child, &mut clone)?;
            clone.append_child(dst, copied)?;
            pending.push((child, copied));
        }

        if let Some(shadow_root) = src_node.as_element().and_then(|el| el.shadow_root.as_ref()) {
            let mut copies = Vec::with_capacity(shadow_root.len());
            for &child in shadow_root {
                let copied = copy_node(source, child, &mut clone)?;
                pending.push((child, copied));
                copies.push(copied);
            }
            clone.attach_shadow(dst, copies)?;
        }
    }

    let source_order = preorder(source, root, ShadowMode::Include)?;
    let cloned_order = preorder(&clone, clone_root, ShadowMode::Include)?;
    link_origins(&mut clone, &source_order, &cloned_order)?;

    Ok((clone, clone_root))
}

/// Pair two preorders position by position and record each clone's origin
///
/// The copy loop and [`preorder`] must agree on which nodes (shadow content
/// included) belong to the subtree; a length difference means they do not.
fn link_origins(clone: &mut Document, source_order: &[NodeId], cloned_order: &[NodeId]) -> Result<()> {
    if source_order.len() != cloned_order.len() {
        return Err(DomSlimError::CloneCountMismatch {
            source_count: source_order.len(),
            cloned_count: cloned_order.len(),
        });
    }
    for (&src, &dst) in source_order.iter().zip(cloned_order) {
        clone.set_origin(dst, Some(src))?;
    }
    Ok(())
}

/// Copy a node's payload (not its children)
fn copy_node(source: &Document, id: NodeId, clone: &mut Document) -> Result<NodeId> {
    let copied = match &source.node(id)?.data {
        NodeData::Element(el) => clone.create_element_with(&el.tag, el.attributes.clone()),
        NodeData::Text(text) => clone.create_text(text),
        NodeData::Other(other) => clone.create_other(&other.kind, &other.content),
    };
    Ok(copied)
}

/// Follow a node's origin, falling back to the node itself when it was not
/// cloned
pub fn original_node(doc: &Document, node: NodeId) -> NodeId {
    doc.origin(node).unwrap_or(node)
}
