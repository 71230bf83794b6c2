#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::rc::Rc;

use common::compact;
use domslim_core::render::to_markup;
use domslim_core::{
    basic_rule_set, deep_clone_with_references, Classifier, CollectingReporter, Document,
    DomTree, LayoutClassifier, PageSnapshot, Simplifier,
};

const PRODUCT_PAGE: &str = r#"{
    "viewport": {"width": 1280, "height": 800},
    "page": {"width": 1280, "height": 3000},
    "root": {
        "type": "element", "tag": "body",
        "layout": {"rect": {"x": 0, "y": 0, "width": 1280, "height": 3000},
                   "offsetWidth": 1280, "offsetHeight": 3000},
        "children": [
            {"type": "text", "text": "\n    "},
            {"type": "element", "tag": "div",
             "attributes": [["class", "wrapper px-4 md:flex"], ["data-track", "hero"]],
             "children": [
                {"type": "element", "tag": "div", "attributes": [["class", "card"]],
                 "children": [
                    {"type": "text", "text": "Buy now"},
                    {"type": "element", "tag": "svg", "children": [{"type": "element", "tag": "path"}]},
                    {"type": "element", "tag": "script", "children": [{"type": "text", "text": "track()"}]}
                 ]}
             ]},
            {"type": "other", "kind": "comment", "content": " promo "},
            {"type": "element", "tag": "div",
             "layout": {"style": {"display": "none"}},
             "children": [{"type": "text", "text": "secret"}]},
            {"type": "element", "tag": "img",
             "attributes": [["src", "https://cdn.test/a/logo.png?v=2"], ["alt", "Logo"]],
             "layout": {"rect": {"x": 10, "y": 10, "width": 64, "height": 64},
                        "offsetWidth": 64, "offsetHeight": 64}},
            {"type": "element", "tag": "div", "attributes": [["onclick", "go()"]],
             "layout": {"style": {"cursor": "pointer"},
                        "rect": {"x": 10, "y": 100, "width": 80, "height": 30},
                        "offsetWidth": 80, "offsetHeight": 30},
             "children": [{"type": "text", "text": "Go"}]},
            {"type": "element", "tag": "span"}
        ]
    }
}"#;

const SHADOW_PAGE: &str = r#"{
    "viewport": {"width": 800, "height": 600},
    "page": {"width": 800, "height": 600},
    "root": {
        "type": "element", "tag": "body",
        "children": [
            {"type": "element", "tag": "x-buy-box",
             "shadowChildren": [
                {"type": "element", "tag": "button", "attributes": [["part", "cta"]],
                 "children": [{"type": "text", "text": "Open"}]}
             ]},
            {"type": "element", "tag": "p", "children": [{"type": "text", "text": "Details"}]}
        ]
    }
}"#;

const HERO_PAGE: &str = r#"{
    "viewport": {"width": 800, "height": 600},
    "page": {"width": 800, "height": 600},
    "root": {
        "type": "element", "tag": "body",
        "children": [
            {"type": "element", "tag": "div",
             "layout": {"style": {"backgroundImage": "url(\"https://cdn.test/img/product.jpg\")",
                                  "backgroundColor": "rgba(0, 0, 0, 0)"},
                        "rect": {"x": 0, "y": 0, "width": 200, "height": 200},
                        "offsetWidth": 200, "offsetHeight": 200}},
            {"type": "element", "tag": "div",
             "layout": {"style": {"backgroundImage": "url(/img/hero-bg.jpg)",
                                  "backgroundColor": "white"},
                        "rect": {"x": 0, "y": 200, "width": 200, "height": 200},
                        "offsetWidth": 200, "offsetHeight": 200}}
        ]
    }
}"#;

/// Load, clone and simplify a snapshot the way the CLI does
fn simplify_page(raw: &str) -> (Document, domslim_core::NodeId, Vec<String>) {
    let page = PageSnapshot::from_json(raw).unwrap().into_document().unwrap();
    let (mut working, root) = deep_clone_with_references(&page.document, page.root).unwrap();
    let classifier: Rc<dyn Classifier> = Rc::new(LayoutClassifier::new(page.document, page.layout));
    let rules = basic_rule_set(classifier);

    let mut reporter: CollectingReporter<Document> = CollectingReporter::new();
    Simplifier::new(&rules)
        .with_reporter(&mut reporter)
        .run(&mut working, root)
        .unwrap();
    let names = reporter.rule_names().into_iter().map(String::from).collect();
    (working, root, names)
}

#[test]
fn test_product_page_is_reduced_to_meaningful_nodes() {
    let (doc, root, matched) = simplify_page(PRODUCT_PAGE);

    assert_eq!(
        compact(&doc, root),
        "<body>Buy now<img src=\"logo.png\"/><button>Go</button></body>"
    );
    assert!(matched.contains(&"Remove SVGs".to_string()));
    assert!(matched.contains(&"Remove inherently non-visible elements".to_string()));
    assert!(matched.contains(&"Remove non-visible elements".to_string()));
    assert_eq!(
        matched
            .iter()
            .filter(|n| *n == "Unfold div containers with only one child")
            .count(),
        2
    );
    // node removals are silent
    assert!(!matched.iter().any(|n| n == "Remove non-visible childrenless elements"));
}

#[test]
fn test_source_document_is_untouched() {
    let page = PageSnapshot::from_json(PRODUCT_PAGE)
        .unwrap()
        .into_document()
        .unwrap();
    let before = compact(&page.document, page.root);
    let (mut working, root) = deep_clone_with_references(&page.document, page.root).unwrap();
    let source = page.document.clone();
    let classifier: Rc<dyn Classifier> = Rc::new(LayoutClassifier::new(page.document, page.layout));

    Simplifier::new(&basic_rule_set(classifier))
        .run(&mut working, root)
        .unwrap();

    assert_eq!(compact(&source, page.root), before);
    assert_ne!(compact(&working, root), before);
}

#[test]
fn test_shadow_content_is_extracted_and_wrappers_unfolded() {
    let (doc, root, _) = simplify_page(SHADOW_PAGE);

    assert_eq!(
        compact(&doc, root),
        "<body><button>Open</button>Details</body>"
    );
    assert!(doc.shadow_children(root).unwrap().is_empty());
}

#[test]
fn test_image_divs_survive_with_synthetic_style() {
    let (doc, root, _) = simplify_page(HERO_PAGE);

    let children = doc.child_slice(root).unwrap().to_vec();
    assert_eq!(children.len(), 1, "{}", to_markup(&doc, root).unwrap());
    assert_eq!(
        doc.attribute(children[0], "style").as_deref(),
        Some("background-image: url(product.jpg)")
    );
}
