//! Page snapshot loading
//!
//! A snapshot is a JSON capture of a rendered page: the element/text tree
//! plus per-element layout facts. Loading it yields a [`Document`] and a
//! [`LayoutSnapshot`] keyed by the new document's node ids.

use serde::Deserialize;

use crate::classify::{LayoutSnapshot, RenderInfo, Size};
use crate::errors::{DomSlimError, Result};
use crate::model::{Attributes, Document, NodeId};
use crate::tree::DomTree;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSnapshot {
    pub viewport: Size,
    pub page: Size,
    pub root: SnapshotNode,
}

/// One captured node, tagged by `"type"` in JSON
///
/// Dropping a node releases its subtree iteratively, so arbitrarily deep
/// captures never recurse on the host stack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub enum SnapshotNode {
    Element {
        tag: String,
        /// `[name, value]` pairs in document order
        attributes: Vec<(String, String)>,
        layout: Option<RenderInfo>,
        children: Vec<SnapshotNode>,
        shadow_children: Option<Vec<SnapshotNode>>,
    },
    Text {
        text: String,
    },
    Other {
        kind: String,
        content: String,
    },
}

impl SnapshotNode {
    /// Detach light and shadow children, light first
    fn take_children(&mut self) -> (Vec<SnapshotNode>, Option<Vec<SnapshotNode>>) {
        match self {
            SnapshotNode::Element {
                children,
                shadow_children,
                ..
            } => (std::mem::take(children), shadow_children.take()),
            _ => (Vec::new(), None),
        }
    }
}

impl Drop for SnapshotNode {
    fn drop(&mut self) {
        let (children, shadow) = self.take_children();
        let mut pending = children;
        pending.extend(shadow.into_iter().flatten());
        while let Some(mut node) = pending.pop() {
            let (children, shadow) = node.take_children();
            pending.extend(children);
            pending.extend(shadow.into_iter().flatten());
        }
    }
}

/// Wire shape of a node
///
/// A flat struct streams straight off the deserializer; an internally
/// tagged enum would buffer every subtree first.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(rename = "type")]
    node_type: String,
    tag: Option<String>,
    #[serde(default)]
    attributes: Vec<(String, String)>,
    #[serde(default)]
    layout: Option<RenderInfo>,
    #[serde(default)]
    children: Vec<SnapshotNode>,
    #[serde(default)]
    shadow_children: Option<Vec<SnapshotNode>>,
    text: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    content: String,
}

impl TryFrom<RawNode> for SnapshotNode {
    type Error = String;

    fn try_from(raw: RawNode) -> std::result::Result<Self, Self::Error> {
        match raw.node_type.as_str() {
            "element" => Ok(SnapshotNode::Element {
                tag: raw.tag.ok_or("element node without `tag`")?,
                attributes: raw.attributes,
                layout: raw.layout,
                children: raw.children,
                shadow_children: raw.shadow_children,
            }),
            "text" => Ok(SnapshotNode::Text {
                text: raw.text.ok_or("text node without `text`")?,
            }),
            "other" => Ok(SnapshotNode::Other {
                kind: raw.kind.ok_or("other node without `kind`")?,
                content: raw.content,
            }),
            unknown => Err(format!("unknown node type `{unknown}`")),
        }
    }
}

/// A snapshot turned into a live document
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub document: Document,
    pub root: NodeId,
    pub layout: LayoutSnapshot,
}

impl PageSnapshot {
    /// # Errors
    ///
    /// * `Serialization` - If the JSON does not match the snapshot shape
    pub fn from_json(raw: &str) -> Result<Self> {
        // Each tree level costs two JSON nesting levels; grow the stack on
        // demand instead of capping the depth.
        let mut de = serde_json::Deserializer::from_str(raw);
        de.disable_recursion_limit();
        let snapshot = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(snapshot)
    }

    /// Build the document and layout map
    ///
    /// # Errors
    ///
    /// * `InvalidSnapshot` - Non-element root, empty tag name or a page
    ///   size that is negative or not finite
    pub fn into_document(self) -> Result<LoadedPage> {
        check_size("viewport", self.viewport)?;
        check_size("page", self.page)?;
        if !matches!(self.root, SnapshotNode::Element { .. }) {
            return Err(DomSlimError::InvalidSnapshot {
                reason: "root must be an element".to_string(),
            });
        }

        let mut document = Document::new();
        let mut layout = LayoutSnapshot::new(self.viewport, self.page);

        let root = load_node(&mut document, &mut layout, self.root)?;

        Ok(LoadedPage {
            document,
            root,
            layout,
        })
    }
}

fn check_size(what: &str, size: Size) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(size.width) && valid(size.height) {
        Ok(())
    } else {
        Err(DomSlimError::InvalidSnapshot {
            reason: format!("{what} size {}x{} is not valid", size.width, size.height),
        })
    }
}

/// Where a created node goes once its payload exists
enum Slot {
    Root,
    Child(NodeId),
    Shadow(NodeId),
}

fn load_node(
    document: &mut Document,
    layout: &mut LayoutSnapshot,
    root: SnapshotNode,
) -> Result<NodeId> {
    let mut root_id = None;
    let mut pending = vec![(root, Slot::Root)];

    while let Some((mut node, slot)) = pending.pop() {
        let (children, shadow) = node.take_children();
        let id = match &mut node {
            SnapshotNode::Element {
                tag,
                attributes,
                layout: info,
                ..
            } => {
                if tag.trim().is_empty() {
                    return Err(DomSlimError::InvalidSnapshot {
                        reason: "element with empty tag name".to_string(),
                    });
                }
                let attributes: Attributes = std::mem::take(attributes).into_iter().collect();
                let id = document.create_element_with(tag, attributes);
                if let Some(info) = info.take() {
                    layout.insert(id, info);
                }
                id
            }
            SnapshotNode::Text { text } => document.create_text(text),
            SnapshotNode::Other { kind, content } => document.create_other(kind, content),
        };

        match slot {
            Slot::Root => root_id = Some(id),
            Slot::Child(parent) => document.append_child(parent, id)?,
            Slot::Shadow(host) => document.attach_shadow(host, vec![id])?,
        }

        // Reverse so the stack pops children in document order
        if let Some(shadow) = shadow {
            pending.extend(shadow.into_iter().rev().map(|c| (c, Slot::Shadow(id))));
        }
        pending.extend(children.into_iter().rev().map(|c| (c, Slot::Child(id))));
    }

    root_id.ok_or_else(|| DomSlimError::InvalidSnapshot {
        reason: "snapshot has no root".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::{preorder, ShadowMode};

    const SAMPLE: &str = r#"{
        "viewport": {"width": 800, "height": 600},
        "page": {"width": 800, "height": 1600},
        "root": {
            "type": "element",
            "tag": "body",
            "children": [
                {"type": "element", "tag": "div", "attributes": [["class", "card"], ["data-x", "1"]],
                 "layout": {"rect": {"x": 0, "y": 0, "width": 100, "height": 40},
                            "offsetWidth": 100, "offsetHeight": 40,
                            "style": {"cursor": "pointer"}},
                 "children": [{"type": "text", "text": "Buy"}]},
                {"type": "other", "kind": "comment", "content": "x"},
                {"type": "element", "tag": "x-widget",
                 "shadowChildren": [{"type": "element", "tag": "span"}]}
            ]
        }
    }"#;

    #[test]
    fn test_load_builds_tree_in_document_order() {
        let page = PageSnapshot::from_json(SAMPLE)
            .unwrap()
            .into_document()
            .unwrap();
        let doc = &page.document;

        let order = preorder(doc, page.root, ShadowMode::Include).unwrap();
        let labels: Vec<_> = order
            .iter()
            .map(|&n| doc.tag_name(n).unwrap_or_else(|| "#".to_string()))
            .collect();
        assert_eq!(labels, vec!["body", "div", "#", "#", "x-widget", "span"]);

        let div = order[1];
        assert_eq!(
            doc.attributes(div),
            vec![
                ("class".to_string(), "card".to_string()),
                ("data-x".to_string(), "1".to_string())
            ]
        );
        let info = page.layout.get(div).unwrap();
        assert_eq!(info.style.cursor, "pointer");
        assert_eq!(info.style.display, "block");
        assert_eq!(page.layout.len(), 1);
    }

    #[test]
    fn test_text_root_is_rejected() {
        let raw = r#"{"viewport": {"width": 1, "height": 1}, "page": {"width": 1, "height": 1},
                      "root": {"type": "text", "text": "hi"}}"#;
        let err = PageSnapshot::from_json(raw)
            .unwrap()
            .into_document()
            .unwrap_err();
        assert!(matches!(err, DomSlimError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_negative_page_size_is_rejected() {
        let raw = r#"{"viewport": {"width": 1, "height": 1}, "page": {"width": -1, "height": 1},
                      "root": {"type": "element", "tag": "body"}}"#;
        let err = PageSnapshot::from_json(raw)
            .unwrap()
            .into_document()
            .unwrap_err();
        assert!(matches!(err, DomSlimError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        let err = PageSnapshot::from_json("{\"viewport\": 3}").unwrap_err();
        assert!(matches!(err, DomSlimError::Serialization { .. }));
    }

    fn nested_divs(depth: usize) -> String {
        let mut raw = String::from(
            r#"{"viewport": {"width": 800, "height": 600}, "page": {"width": 800, "height": 600},
                "root": {"type": "element", "tag": "body", "children": ["#,
        );
        for _ in 0..depth {
            raw.push_str(r#"{"type": "element", "tag": "div", "children": ["#);
        }
        raw.push_str(r#"{"type": "text", "text": "leaf"}"#);
        for _ in 0..depth {
            raw.push_str("]}");
        }
        raw.push_str("]}}");
        raw
    }

    #[test]
    fn test_deeply_nested_page_loads() {
        let page = PageSnapshot::from_json(&nested_divs(600))
            .unwrap()
            .into_document()
            .unwrap();

        let order = preorder(&page.document, page.root, ShadowMode::Include).unwrap();
        assert_eq!(order.len(), 602);
        assert_eq!(page.document.text(order[601]).as_deref(), Some("leaf"));
    }

    #[test]
    fn test_very_deep_snapshot_parses_and_drops() {
        let snapshot = PageSnapshot::from_json(&nested_divs(20_000)).unwrap();
        assert!(matches!(snapshot.root, SnapshotNode::Element { .. }));
        drop(snapshot);
    }

    #[test]
    fn test_unknown_node_type_is_a_serialization_error() {
        let raw = r#"{"viewport": {"width": 1, "height": 1}, "page": {"width": 1, "height": 1},
                      "root": {"type": "element", "tag": "body",
                               "children": [{"type": "doctype"}]}}"#;
        let err = PageSnapshot::from_json(raw).unwrap_err();
        assert!(matches!(err, DomSlimError::Serialization { .. }));
    }

    #[test]
    fn test_element_without_tag_is_a_serialization_error() {
        let raw = r#"{"viewport": {"width": 1, "height": 1}, "page": {"width": 1, "height": 1},
                      "root": {"type": "element"}}"#;
        assert!(PageSnapshot::from_json(raw).is_err());
    }
}
