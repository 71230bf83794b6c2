use domslim_core::render::to_compact_markup;
use domslim_core::{Document, DomTree, ElementUnfoldRule, NodeId, NodeRemoveRule};

/// Create an element, appending it to `parent` when given
#[allow(dead_code)]
pub fn element(doc: &mut Document, parent: Option<NodeId>, tag: &str) -> NodeId {
    let id = doc.create_element(tag);
    if let Some(parent) = parent {
        doc.append_child(parent, id).unwrap();
    }
    id
}

/// Create an element with attributes under `parent`
#[allow(dead_code)]
pub fn element_with(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    attributes: &[(&str, &str)],
) -> NodeId {
    let id = element(doc, Some(parent), tag);
    for (name, value) in attributes {
        doc.set_attribute(id, name, value).unwrap();
    }
    id
}

/// Create a text node under `parent`
#[allow(dead_code)]
pub fn text(doc: &mut Document, parent: NodeId, value: &str) -> NodeId {
    let id = doc.create_text(value);
    doc.append_child(parent, id).unwrap();
    id
}

/// Single-line markup of the subtree at `root`
#[allow(dead_code)]
pub fn compact(doc: &Document, root: NodeId) -> String {
    to_compact_markup(doc, root).unwrap()
}

/// "Unfold a div with exactly one child"
#[allow(dead_code)]
pub fn unfold_single_child_divs(propagate: bool) -> ElementUnfoldRule<Document> {
    ElementUnfoldRule::when("unfold single-child div", |doc: &Document, node: NodeId| {
        doc.tag_name(node).as_deref() == Some("div")
            && doc.child_slice(node).map(|c| c.len() == 1).unwrap_or(false)
    })
    .propagate_attributes(propagate)
}

/// Remove elements with the given tag after their children
#[allow(dead_code)]
pub fn remove_tag(tag: &'static str) -> NodeRemoveRule<Document> {
    NodeRemoveRule::when(format!("remove {tag}"), move |doc: &Document, node: NodeId| {
        doc.tag_name(node).as_deref() == Some(tag)
    })
}
