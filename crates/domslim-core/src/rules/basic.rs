//! The stock rule set for captured web pages
//!
//! Runs against a clone made by [`crate::clone::deep_clone_with_references`];
//! layout questions go to a [`Classifier`] about the clone node's origin.

use std::rc::Rc;

use crate::classify::{independent_meaning, Classifier};
use crate::clone::original_node;
use crate::model::{Document, NodeId};
use crate::ops::file_name;
use crate::rules::tailwind::filter_tailwind_classes;
use crate::rules::{
    ElementRemovePreChildrenRule, ElementUnfoldRule, NodeRemoveRule, PreChildrenAction, RuleSet,
};
use crate::tree::{DomTree, NodeKind};

/// Container tags whose structure is kept even with a single child
pub const SEMANTIC_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "table", "tr", "td", "th", "tbody",
    "thead", "tfoot", "dl", "dt", "dd", "blockquote", "address", "article", "aside", "details",
    "dialog", "summary", "fieldset", "figure", "figcaption", "footer", "header", "main", "mark",
    "nav", "section", "time",
];

/// Elements that never render anything worth keeping
pub const NON_VISUAL_TAGS: &[&str] = &["script", "object", "noscript", "meta", "style", "source"];

/// Attributes that survive "Remove unnecessary attributes"
pub const KEPT_ATTRIBUTES: &[&str] = &[
    "class",
    "id",
    "src",
    "value",
    "placeholder",
    "title",
    "aria-label",
    "href",
];

fn tag_is(doc: &Document, node: NodeId, tag: &str) -> bool {
    doc.tag_name(node).as_deref() == Some(tag)
}

/// Clickable by tag (in the working tree) or by cursor (in the source)
fn is_clickable(doc: &Document, classifier: &dyn Classifier, node: NodeId) -> bool {
    matches!(doc.tag_name(node).as_deref(), Some("button") | Some("a"))
        || classifier.is_clickable(original_node(doc, node))
}

fn is_image_div(doc: &Document, classifier: &dyn Classifier, node: NodeId) -> bool {
    tag_is(doc, node, "div") && classifier.is_image(original_node(doc, node))
}

/// Media, interactive or textual content that stands on its own
pub fn has_independent_meaning(doc: &Document, classifier: &dyn Classifier, node: NodeId) -> bool {
    let Ok(kind) = doc.kind(node) else {
        return false;
    };
    independent_meaning(kind, doc.tag_name(node).as_deref(), doc.text(node).as_deref())
        || is_image_div(doc, classifier, node)
}

/// A wrapper whose only job is layout
///
/// Not an image div, not clickable (unless its parent already is), and not
/// one of [`SEMANTIC_TAGS`].
pub fn is_non_semantic_container(
    doc: &Document,
    classifier: &dyn Classifier,
    node: NodeId,
) -> bool {
    let Some(tag) = doc.tag_name(node) else {
        return false;
    };
    let parent_clickable = doc
        .parent(node)
        .is_some_and(|parent| is_clickable(doc, classifier, parent));

    !is_image_div(doc, classifier, node)
        && (!is_clickable(doc, classifier, node) || parent_clickable)
        && !SEMANTIC_TAGS.contains(&tag.as_str())
}

fn matched(hit: bool) -> Option<bool> {
    hit.then_some(true)
}

/// The pass root has no parent and must never be removed or unfolded
fn attached(doc: &Document, node: NodeId) -> bool {
    doc.parent(node).is_some()
}

/// Build the basic rule set around a shared classifier
pub fn basic_rule_set(classifier: Rc<dyn Classifier>) -> RuleSet<Document> {
    let c = Rc::clone(&classifier);
    let unfold_single_child = ElementUnfoldRule::new(
        "Unfold div containers with only one child",
        move |doc: &Document, node: NodeId| {
            Ok(matched(
                attached(doc, node)
                    && doc.child_slice(node)?.len() == 1
                    && is_non_semantic_container(doc, &*c, node),
            ))
        },
    )
    .propagate_attributes(true);

    let c = Rc::clone(&classifier);
    let remove_hidden = ElementRemovePreChildrenRule::new(
        "Remove non-visible elements",
        move |doc: &Document, node: NodeId| {
            Ok(matched(
                attached(doc, node) && c.is_hidden_subtree(original_node(doc, node)),
            ))
        },
    );

    let c = Rc::clone(&classifier);
    let remove_invisible_leaves = NodeRemoveRule::new(
        "Remove non-visible childrenless elements",
        move |doc: &Document, node: NodeId| {
            let origin = original_node(doc, node);
            Ok(matched(
                attached(doc, node)
                    && doc.child_slice(node)?.is_empty()
                    && !has_independent_meaning(doc, &*c, node)
                    && !c.has_pseudo_element(origin)
                    && !c.is_visible_on_screen(origin),
            ))
        },
    )
    .silent();

    let c = Rc::clone(&classifier);
    let synthetic_background = PreChildrenAction::new(
        "Synthetic background-image style",
        move |doc: &mut Document, node: NodeId| {
            let origin = original_node(doc, node);
            let (Some(image), Some(color)) = (c.background_image(origin), c.background_color(origin))
            else {
                return Ok(());
            };
            if color.is_empty() {
                return Ok(());
            }
            let style = match crate::classify::css_url(&image) {
                Some(url) => format!("background-image: url({})", file_name(url)),
                None => format!("background-color: {color}"),
            };
            doc.set_attribute(node, "style", &style)
        },
    );

    let c = Rc::clone(&classifier);
    let clickable_div_to_button = PreChildrenAction::new(
        "Replace clickable div with button",
        move |doc: &mut Document, node: NodeId| {
            let origin = original_node(doc, node);
            let element_clickable = matches!(
                doc.tag_name(node).as_deref(),
                Some("button") | Some("a")
            ) || c.is_element_clickable(origin);
            let parent_clickable = doc
                .parent(node)
                .is_some_and(|parent| is_clickable(doc, &*c, parent));

            if is_clickable(doc, &*c, node) && !element_clickable && !parent_clickable {
                doc.set_tag_name(node, "button")?;
            }
            Ok(())
        },
    );

    RuleSet::new()
        .with_unfold(unfold_single_child)
        .with_pre_children_removal(ElementRemovePreChildrenRule::when(
            "Remove SVGs",
            |doc: &Document, node: NodeId| tag_is(doc, node, "svg"),
        ))
        .with_pre_children_removal(ElementRemovePreChildrenRule::when(
            "Remove inherently non-visible elements",
            |doc: &Document, node: NodeId| {
                doc.tag_name(node)
                    .is_some_and(|tag| NON_VISUAL_TAGS.contains(&tag.as_str()))
            },
        ))
        .with_pre_children_removal(ElementRemovePreChildrenRule::when(
            "Remove iframe",
            |doc: &Document, node: NodeId| tag_is(doc, node, "iframe"),
        ))
        .with_pre_children_removal(remove_hidden)
        .with_node_removal(
            NodeRemoveRule::when("Remove non-text non-element", |doc: &Document, node: NodeId| {
                matches!(doc.kind(node), Ok(NodeKind::Other))
            })
            .silent(),
        )
        .with_node_removal(
            NodeRemoveRule::when("Remove empty text", |doc: &Document, node: NodeId| {
                doc.text(node).is_some_and(|t| t.trim().is_empty())
            })
            .silent(),
        )
        .with_node_removal(remove_invisible_leaves)
        .with_action(PreChildrenAction::new(
            "Remove tailwind classes",
            |doc: &mut Document, node: NodeId| match doc.attribute(node, "class") {
                Some(class) => doc.set_attribute(node, "class", &filter_tailwind_classes(&class)),
                None => Ok(()),
            },
        ))
        .with_action(PreChildrenAction::new(
            "Extract shadowroot",
            |doc: &mut Document, node: NodeId| {
                let shadow = doc.take_shadow_root(node)?;
                if shadow.is_empty() {
                    return Ok(());
                }
                tracing::debug!(
                    host = %doc.describe(node),
                    origin = ?doc.origin(node),
                    extracted = shadow.len(),
                    "extracting shadow root"
                );
                for child in shadow {
                    doc.append_child(node, child)?;
                }
                Ok(())
            },
        ))
        .with_action(PreChildrenAction::new(
            "Remove unnecessary attributes",
            |doc: &mut Document, node: NodeId| {
                for (name, _) in doc.attributes(node) {
                    if !KEPT_ATTRIBUTES.contains(&name.as_str()) {
                        doc.remove_attribute(node, &name)?;
                    }
                }
                Ok(())
            },
        ))
        .with_action(synthetic_background)
        .with_action(PreChildrenAction::new(
            "Simplify src path",
            |doc: &mut Document, node: NodeId| match doc.attribute(node, "src") {
                Some(src) if !src.is_empty() => {
                    let name = file_name(&src).to_string();
                    doc.set_attribute(node, "src", &name)
                }
                _ => Ok(()),
            },
        ))
        .with_action(clickable_div_to_button)
        .with_action(PreChildrenAction::new(
            "Remove newlines from classnames",
            |doc: &mut Document, node: NodeId| match doc.attribute(node, "class") {
                Some(class) if class.contains('\n') => {
                    doc.set_attribute(node, "class", &class.replace('\n', " "))
                }
                _ => Ok(()),
            },
        ))
        .with_action(PreChildrenAction::new(
            "Remove empty class attribute",
            |doc: &mut Document, node: NodeId| match doc.attribute(node, "class") {
                Some(class) if class.is_empty() => doc.remove_attribute(node, "class"),
                _ => Ok(()),
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{LayoutClassifier, LayoutSnapshot, Size};

    fn no_layout(doc: &Document) -> Rc<dyn Classifier> {
        Rc::new(LayoutClassifier::new(
            doc.clone(),
            LayoutSnapshot::new(Size::new(800.0, 600.0), Size::new(800.0, 600.0)),
        ))
    }

    #[test]
    fn test_rule_order_matches_phase_lists() {
        let doc = Document::new();
        let rules = basic_rule_set(no_layout(&doc));

        let pre: Vec<_> = rules
            .element_remove_pre_children_rules
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            pre,
            vec![
                "Remove SVGs",
                "Remove inherently non-visible elements",
                "Remove iframe",
                "Remove non-visible elements",
            ]
        );
        let actions: Vec<_> = rules
            .pre_children_actions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(actions.len(), 8);
        assert_eq!(actions[0], "Remove tailwind classes");
        assert_eq!(actions[7], "Remove empty class attribute");
        assert!(rules.node_remove_rules.iter().all(|r| !r.log));
        assert!(rules.element_unfold_rules[0].propagate_attributes);
    }

    #[test]
    fn test_semantic_tags_are_not_containers() {
        let mut doc = Document::new();
        let nav = doc.create_element("nav");
        let div = doc.create_element("div");
        let classifier = no_layout(&doc);

        assert!(!is_non_semantic_container(&doc, &*classifier, nav));
        assert!(is_non_semantic_container(&doc, &*classifier, div));
    }

    #[test]
    fn test_button_inside_link_is_still_a_container() {
        let mut doc = Document::new();
        let link = doc.create_element("a");
        let inner = doc.create_element("button");
        doc.append_child(link, inner).unwrap();
        let classifier = no_layout(&doc);

        assert!(is_non_semantic_container(&doc, &*classifier, inner));
        assert!(!is_non_semantic_container(&doc, &*classifier, link));
    }

    #[test]
    fn test_independent_meaning_uses_working_tree_tag() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let classifier = no_layout(&doc);
        assert!(!has_independent_meaning(&doc, &*classifier, div));

        doc.set_tag_name(div, "button").unwrap();
        assert!(has_independent_meaning(&doc, &*classifier, div));
    }
}
