//! Markup serialisation of a document subtree
//!
//! Shadow roots are not part of the light tree and are not rendered.

use crate::errors::Result;
use crate::model::{Document, NodeData, NodeId};

/// Elements written as `<tag/>`
pub const VOID_ELEMENTS: &[&str] = &["img", "input", "br", "hr", "meta", "link", "source"];

const INDENT: &str = "  ";

/// Render `root` as indented markup, one node per line
///
/// # Errors
///
/// * `NodeNotFound` - If `root` or a descendant is missing
pub fn to_markup(doc: &Document, root: NodeId) -> Result<String> {
    render(doc, root, true)
}

/// Render `root` on a single line without indentation
///
/// # Errors
///
/// * `NodeNotFound` - If `root` or a descendant is missing
pub fn to_compact_markup(doc: &Document, root: NodeId) -> Result<String> {
    render(doc, root, false)
}

enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

fn render(doc: &Document, root: NodeId, pretty: bool) -> Result<String> {
    let mut out = String::new();
    let mut steps = vec![Step::Open(root, 0)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Open(id, depth) => {
                let node = doc.node(id)?;
                match &node.data {
                    NodeData::Text(text) => {
                        let text = collapse_whitespace(text);
                        if !text.is_empty() {
                            line(&mut out, depth, &escape(&text), pretty);
                        }
                    }
                    NodeData::Other(other) => {
                        line(&mut out, depth, &format!("<!--{}-->", other.content), pretty);
                    }
                    NodeData::Element(el) => {
                        let mut open = format!("<{}", el.tag);
                        for (name, value) in el.attributes.iter() {
                            open.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                        }

                        let children: Vec<NodeId> = node
                            .children()
                            .iter()
                            .copied()
                            .filter(|&c| !is_blank_text(doc, c))
                            .collect();

                        if children.is_empty() {
                            if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                                open.push_str("/>");
                            } else {
                                open.push_str(&format!("></{}>", el.tag));
                            }
                            line(&mut out, depth, &open, pretty);
                        } else {
                            open.push('>');
                            line(&mut out, depth, &open, pretty);
                            steps.push(Step::Close(id, depth));
                            steps.extend(
                                children
                                    .into_iter()
                                    .rev()
                                    .map(|child| Step::Open(child, depth + 1)),
                            );
                        }
                    }
                }
            }
            Step::Close(id, depth) => {
                let tag = &doc.element(id)?.tag;
                line(&mut out, depth, &format!("</{tag}>"), pretty);
            }
        }
    }

    Ok(out)
}

fn line(out: &mut String, depth: usize, content: &str, pretty: bool) {
    if pretty {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&INDENT.repeat(depth));
    }
    out.push_str(content);
}

fn is_blank_text(doc: &Document, id: NodeId) -> bool {
    matches!(doc.node(id).map(|n| &n.data), Ok(NodeData::Text(t)) if t.trim().is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DomTree;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.create_element("body");
        let p = doc.create_element("p");
        let text = doc.create_text("  Fish &\n chips ");
        let blank = doc.create_text("\n   ");
        let img = doc.create_element("img");
        doc.set_attribute(p, "title", "say \"hi\"").unwrap();
        doc.set_attribute(img, "src", "a.png").unwrap();
        doc.append_child(body, p).unwrap();
        doc.append_child(body, blank).unwrap();
        doc.append_child(body, img).unwrap();
        doc.append_child(p, text).unwrap();
        (doc, body)
    }

    #[test]
    fn test_to_markup_indents_children() {
        let (doc, body) = sample();
        let expected = [
            "<body>",
            "  <p title=\"say &quot;hi&quot;\">",
            "    Fish &amp; chips",
            "  </p>",
            "  <img src=\"a.png\"/>",
            "</body>",
        ]
        .join("\n");

        assert_eq!(to_markup(&doc, body).unwrap(), expected);
    }

    #[test]
    fn test_to_compact_markup_is_single_line() {
        let (doc, body) = sample();
        assert_eq!(
            to_compact_markup(&doc, body).unwrap(),
            "<body><p title=\"say &quot;hi&quot;\">Fish &amp; chips</p><img src=\"a.png\"/></body>"
        );
    }

    #[test]
    fn test_empty_elements_and_comments() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        let comment = doc.create_other("comment", " note ");
        doc.append_child(div, span).unwrap();
        doc.append_child(div, comment).unwrap();

        assert_eq!(
            to_compact_markup(&doc, div).unwrap(),
            "<div><span></span><!-- note --></div>"
        );
    }
}
