use super::merge::{concat_properties_from, PropertySelection};
use crate::errors::{DomSlimError, Result};
use crate::tree::DomTree;

/// Replace `node` with its children at the same position in its parent
///
/// Children keep their relative order. When `merge` is set, the node's
/// attributes are merged into each element child before any child moves.
/// The node itself ends up detached. Returns the promoted children.
///
/// # Errors
///
/// * `UnfoldRoot` - If the node has no parent to promote into
/// * Tree errors from the underlying mutation primitives
pub fn unfold<T: DomTree>(
    tree: &mut T,
    node: T::NodeId,
    merge: Option<&PropertySelection>,
) -> Result<Vec<T::NodeId>> {
    let parent = tree.parent(node).ok_or_else(|| DomSlimError::UnfoldRoot {
        node: tree.describe(node),
    })?;

    if let Some(selection) = merge {
        for child in tree.children(node)? {
            concat_properties_from(tree, node, child, selection)?;
        }
    }
    let promoted = tree.hoist_children(node)?;
    tree.detach(node)?;
    debug_assert!(promoted.iter().all(|&c| tree.parent(c) == Some(parent)));

    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    #[test]
    fn test_unfold_promotes_children_in_place() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let before = doc.create_text("before");
        let wrapper = doc.create_element("div");
        let after = doc.create_text("after");
        let a = doc.create_element("a");
        let b = doc.create_text("b");
        doc.append_child(root, before).unwrap();
        doc.append_child(root, wrapper).unwrap();
        doc.append_child(root, after).unwrap();
        doc.append_child(wrapper, a).unwrap();
        doc.append_child(wrapper, b).unwrap();

        let promoted = unfold(&mut doc, wrapper, None).unwrap();

        assert_eq!(promoted, vec![a, b]);
        assert_eq!(doc.child_slice(root).unwrap(), &[before, a, b, after]);
        assert_eq!(doc.parent(wrapper), None);
        assert!(doc.child_slice(wrapper).unwrap().is_empty());
    }

    #[test]
    fn test_unfold_without_merge_leaves_attributes() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let wrapper = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(root, wrapper).unwrap();
        doc.append_child(wrapper, span).unwrap();
        doc.set_attribute(wrapper, "class", "outer").unwrap();

        unfold(&mut doc, wrapper, None).unwrap();

        assert_eq!(doc.attribute(span, "class"), None);
    }

    #[test]
    fn test_unfold_merges_into_element_children() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let wrapper = doc.create_element("div");
        let span = doc.create_element("span");
        let text = doc.create_text("t");
        doc.append_child(root, wrapper).unwrap();
        doc.append_child(wrapper, span).unwrap();
        doc.append_child(wrapper, text).unwrap();
        doc.set_attribute(wrapper, "class", "a").unwrap();
        doc.set_attribute(span, "class", "b").unwrap();

        unfold(&mut doc, wrapper, Some(&PropertySelection::All)).unwrap();

        assert_eq!(doc.attribute(span, "class").as_deref(), Some("b a"));
        assert_eq!(doc.child_slice(root).unwrap(), &[span, text]);
    }

    #[test]
    fn test_unfold_root_is_an_error() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_text("x");
        doc.append_child(root, child).unwrap();

        let result = unfold(&mut doc, root, None);

        assert!(matches!(result, Err(DomSlimError::UnfoldRoot { .. })));
        assert_eq!(doc.child_slice(root).unwrap(), &[child]);
    }
}
