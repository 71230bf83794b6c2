//! Classification service
//!
//! Answers layout questions (visibility, clickability, media-ness) about the
//! nodes of a captured page. Everything is keyed by the *source* document's
//! node identity; rules running against a clone resolve the clone node's
//! origin first.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeData, NodeId};
use crate::ops::file_name;
use crate::tree::{DomTree, NodeKind};

/// Smallest on-screen area (px²) that counts as visible
pub const MIN_VISIBLE_AREA: f64 = 5.0;

/// Tags that carry meaning regardless of their children
pub const INDEPENDENT_TAGS: &[&str] = &[
    "img", "svg", "input", "button", "a", "select", "option", "video",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Border box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if any part of the rect overlaps `bounds` anchored at the origin
    pub fn is_in(&self, bounds: Size) -> bool {
        let horizontal = (self.left() >= 0.0 && self.left() < bounds.width)
            || (self.right() > 0.0 && self.right() <= bounds.width)
            || (self.left() <= 0.0 && self.right() >= bounds.width);
        let vertical = (self.top() >= 0.0 && self.top() < bounds.height)
            || (self.bottom() > 0.0 && self.bottom() <= bounds.height)
            || (self.top() <= 0.0 && self.bottom() >= bounds.height);
        horizontal && vertical
    }
}

/// The subset of computed CSS the heuristics look at, as raw CSS strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
    pub overflow: String,
    pub cursor: String,
    pub background_image: String,
    pub background_color: String,
    pub content: String,
    pub clip: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
            overflow: "visible".to_string(),
            cursor: "auto".to_string(),
            background_image: "none".to_string(),
            background_color: String::new(),
            content: "normal".to_string(),
            clip: "auto".to_string(),
        }
    }
}

impl ComputedStyle {
    /// `visibility:hidden`, `display:none` or `opacity:0`
    pub fn is_hidden(&self) -> bool {
        self.visibility == "hidden" || self.display == "none" || self.opacity == "0"
    }

    /// Area of a `rect(top, right, bottom, left)` clip, if one is set and
    /// parses
    pub fn clip_area(&self) -> Option<f64> {
        if matches!(self.clip.as_str(), "auto" | "initial" | "inherit" | "none" | "") {
            return None;
        }
        let inner = self.clip.strip_prefix("rect(")?.strip_suffix(')')?;
        let parts: Vec<f64> = inner
            .split(',')
            .map(parse_css_number)
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [a, b, c, d] => Some((c - a) * (d - b)),
            _ => None,
        }
    }
}

/// Leading number of a CSS length such as `12.5px`
fn parse_css_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse().ok()
}

/// URL inside a `url(...)` CSS value, without surrounding quotes
pub fn css_url(value: &str) -> Option<&str> {
    let start = value.find("url(")? + "url(".len();
    let end = value.rfind(')')?;
    if end <= start {
        return None;
    }
    let url = value[start..end].trim().trim_matches(|c| c == '"' || c == '\'');
    (!url.is_empty()).then_some(url)
}

/// Layout facts captured for one element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderInfo {
    pub style: ComputedStyle,
    pub rect: Rect,
    pub offset_width: f64,
    pub offset_height: f64,
    /// `type` of an `<input>`
    pub input_type: Option<String>,
}

/// Render information for a whole page, keyed by source node
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    pub viewport: Size,
    pub page: Size,
    nodes: HashMap<NodeId, RenderInfo>,
}

impl LayoutSnapshot {
    pub fn new(viewport: Size, page: Size) -> Self {
        Self {
            viewport,
            page,
            nodes: HashMap::new(),
        }
    }

    pub fn insert(&mut self, node: NodeId, info: RenderInfo) {
        self.nodes.insert(node, info);
    }

    pub fn get(&self, node: NodeId) -> Option<&RenderInfo> {
        self.nodes.get(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Layout predicates over source nodes
///
/// Methods take `&self` so a classifier can be shared by several rules;
/// implementations that memoise use interior mutability and expose
/// [`Classifier::invalidate`] to drop stale answers.
pub trait Classifier {
    fn is_visible_on_screen(&self, node: NodeId) -> bool;

    /// Not visible and cannot have visible children
    fn is_hidden_subtree(&self, node: NodeId) -> bool;

    fn is_css_clickable(&self, node: NodeId) -> bool;

    fn is_element_clickable(&self, node: NodeId) -> bool;

    fn is_clickable(&self, node: NodeId) -> bool {
        self.is_css_clickable(node) || self.is_element_clickable(node)
    }

    fn has_independent_meaning(&self, node: NodeId) -> bool;

    fn has_pseudo_element(&self, node: NodeId) -> bool;

    /// A `div` drawn as a picture through its background image
    fn is_image(&self, node: NodeId) -> bool;

    /// Raw `background-image` value when one is set
    fn background_image(&self, node: NodeId) -> Option<String>;

    /// Raw `background-color` value
    fn background_color(&self, node: NodeId) -> Option<String>;

    fn invalidate(&self, node: NodeId);

    fn invalidate_all(&self);
}

/// Text-or-tag meaning test shared by source and clone checks
pub fn independent_meaning(kind: NodeKind, tag: Option<&str>, text: Option<&str>) -> bool {
    match kind {
        NodeKind::Text => text.is_some_and(|t| !t.trim().is_empty()),
        NodeKind::Element => tag.is_some_and(|t| INDEPENDENT_TAGS.contains(&t)),
        NodeKind::Other => false,
    }
}

/// Whether a background-image value points at a picture rather than a
/// decorative backdrop
pub fn is_image_background(background_image: &str) -> bool {
    if background_image == "none" {
        return false;
    }
    css_url(background_image).is_some_and(|url| {
        let name = file_name(url);
        !name.contains("bg") && !name.contains("background")
    })
}

/// [`Classifier`] backed by a captured [`LayoutSnapshot`]
pub struct LayoutClassifier {
    document: Document,
    layout: LayoutSnapshot,
    visibility: RefCell<HashMap<NodeId, bool>>,
}

impl LayoutClassifier {
    pub fn new(document: Document, layout: LayoutSnapshot) -> Self {
        Self {
            document,
            layout,
            visibility: RefCell::new(HashMap::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> &LayoutSnapshot {
        &self.layout
    }

    /// Number of memoised visibility answers
    pub fn cached_len(&self) -> usize {
        self.visibility.borrow().len()
    }

    fn info(&self, node: NodeId) -> Option<&RenderInfo> {
        self.layout.get(node)
    }

    fn style(&self, node: NodeId) -> Option<&ComputedStyle> {
        self.info(node).map(|i| &i.style)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.document.element(node).ok().map(|el| el.tag.as_str())
    }

    fn compute_visibility(&self, node: NodeId) -> bool {
        let Ok(n) = self.document.node(node) else {
            return false;
        };
        if !matches!(n.data, NodeData::Element(_)) {
            return n
                .parent()
                .is_some_and(|parent| self.is_visible_on_screen(parent));
        }
        let Some(info) = self.info(node) else {
            return false;
        };

        let has_offset = info.offset_width != 0.0 && info.offset_height != 0.0;
        let clip_ok = match info.style.clip_area() {
            Some(area) => area >= MIN_VISIBLE_AREA,
            None => true,
        };
        let is_svg = self.tag(node) == Some("svg");
        let is_div = self.tag(node) == Some("div");

        info.rect.area() >= MIN_VISIBLE_AREA
            && info.rect.is_in(self.layout.page)
            && !info.style.is_hidden()
            && clip_ok
            && (is_svg || has_offset)
            && (!is_div || self.is_image(node))
    }
}

impl Classifier for LayoutClassifier {
    fn is_visible_on_screen(&self, node: NodeId) -> bool {
        if let Some(&cached) = self.visibility.borrow().get(&node) {
            return cached;
        }
        let visible = self.compute_visibility(node);
        self.visibility.borrow_mut().insert(node, visible);
        visible
    }

    fn is_hidden_subtree(&self, node: NodeId) -> bool {
        let Some(info) = self.info(node) else {
            return false;
        };
        if info.style.is_hidden() {
            return true;
        }
        (info.rect.width == 0.0 || info.rect.height == 0.0) && info.style.overflow == "hidden"
    }

    fn is_css_clickable(&self, node: NodeId) -> bool {
        self.style(node).is_some_and(|s| s.cursor == "pointer")
    }

    fn is_element_clickable(&self, node: NodeId) -> bool {
        match self.tag(node) {
            Some("button") | Some("a") => true,
            Some("input") => self
                .info(node)
                .and_then(|i| i.input_type.as_deref())
                .is_some_and(|t| t.eq_ignore_ascii_case("submit")),
            _ => false,
        }
    }

    fn has_independent_meaning(&self, node: NodeId) -> bool {
        let Ok(kind) = self.document.kind(node) else {
            return false;
        };
        let text = self.document.text(node);
        independent_meaning(kind, self.tag(node), text.as_deref())
            || (self.tag(node) == Some("div") && self.is_image(node))
    }

    fn has_pseudo_element(&self, node: NodeId) -> bool {
        self.style(node)
            .is_some_and(|s| s.content.contains("::before") || s.content.contains("::after"))
    }

    fn is_image(&self, node: NodeId) -> bool {
        self.style(node)
            .is_some_and(|s| is_image_background(&s.background_image))
    }

    fn background_image(&self, node: NodeId) -> Option<String> {
        self.style(node)
            .map(|s| s.background_image.clone())
            .filter(|bg| bg != "none" && !bg.is_empty())
    }

    fn background_color(&self, node: NodeId) -> Option<String> {
        self.style(node).map(|s| s.background_color.clone())
    }

    fn invalidate(&self, node: NodeId) {
        self.visibility.borrow_mut().remove(&node);
    }

    fn invalidate_all(&self) {
        self.visibility.borrow_mut().clear();
    }
}
