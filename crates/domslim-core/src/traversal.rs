use crate::errors::Result;
use crate::model::{Document, NodeId};
use crate::tree::DomTree;

/// Whether a traversal descends into attached shadow roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowMode {
    Include,
    Exclude,
}

/// Preorder node list of the subtree at `root`
///
/// With [`ShadowMode::Include`] a host's shadow subtree follows its regular
/// children. Iterative, so arbitrarily deep trees are fine.
///
/// # Errors
///
/// Returns `NodeNotFound` if `root` does not belong to the document.
pub fn preorder(doc: &Document, root: NodeId, shadow: ShadowMode) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        let node = doc.node(id)?;
        out.push(id);

        if shadow == ShadowMode::Include {
            if let Some(el) = node.as_element() {
                if let Some(shadow_root) = &el.shadow_root {
                    stack.extend(shadow_root.iter().rev());
                }
            }
        }
        stack.extend(node.children().iter().rev());
    }

    Ok(out)
}

/// Preorder node list of any [`DomTree`] (no out-of-band content)
///
/// # Errors
///
/// Propagates child access failures.
pub fn descendants<T: DomTree>(tree: &T, root: T::NodeId) -> Result<Vec<T::NodeId>> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(tree.children(id)?.into_iter().rev());
    }

    Ok(out)
}

/// Number of nodes attached under `root`, `root` included
///
/// # Errors
///
/// Propagates child access failures.
pub fn subtree_len<T: DomTree>(tree: &T, root: T::NodeId) -> Result<usize> {
    descendants(tree, root).map(|nodes| nodes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder_visits_shadow_after_children() {
        let mut doc = Document::new();
        let host = doc.create_element("x-card");
        let light = doc.create_element("p");
        let light_text = doc.create_text("light");
        let shadow = doc.create_element("slot");
        doc.append_child(host, light).unwrap();
        doc.append_child(light, light_text).unwrap();
        doc.attach_shadow(host, vec![shadow]).unwrap();

        let with = preorder(&doc, host, ShadowMode::Include).unwrap();
        let without = preorder(&doc, host, ShadowMode::Exclude).unwrap();

        assert_eq!(with, vec![host, light, light_text, shadow]);
        assert_eq!(without, vec![host, light, light_text]);
    }

    #[test]
    fn test_descendants_handles_deep_chains() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let mut current = root;
        for _ in 0..5_000 {
            let next = doc.create_element("div");
            doc.append_child(current, next).unwrap();
            current = next;
        }

        assert_eq!(subtree_len(&doc, root).unwrap(), 5_001);
    }
}
