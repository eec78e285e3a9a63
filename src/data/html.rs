// ============================================================
// Layer 4 — HTML Block Tree
// ============================================================
// Wraps one parsed news block (or one training document) and
// answers the structural questions the core asks of a DOM tree:
//
//   - which elements are candidates for classification
//   - who is a node's parent (the synthetic root does not count)
//   - how deep is a node
//   - what is a node's cleaned visible text
//
// Markup is parsed with scraper as an HTML fragment. The
// fragment's wrapper <html> element plays the role of the
// document root: it is never a candidate, never a parent and
// never counted as an ancestor.

use scraper::{ElementRef, Html};

use crate::data::preprocessor::Preprocessor;

pub struct HtmlBlock {
    html: Html,
}

impl HtmlBlock {
    /// Parse block markup. Parsing is lenient and never fails;
    /// malformed markup yields whatever tree the HTML5 algorithm builds.
    pub fn parse(markup: &str) -> Self {
        Self { html: Html::parse_fragment(markup) }
    }

    /// The synthetic document root.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn is_root(&self, node: ElementRef<'_>) -> bool {
        node.id() == self.root().id()
    }

    /// Every element below the root, in document order.
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        self.root()
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }

    /// Elements eligible for classification, in document order:
    /// those whose own string is absent or not blank.
    pub fn candidates(&self) -> Vec<ElementRef<'_>> {
        self.elements()
            .into_iter()
            .filter(|el| own_string(*el).map_or(true, |s| !s.trim().is_empty()))
            .collect()
    }

    /// Parent element, or None when the parent is the synthetic root.
    pub fn parent_of<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        node.parent()
            .and_then(ElementRef::wrap)
            .filter(|p| p.id() != self.root().id())
    }

    /// Number of element ancestors, excluding the synthetic root.
    pub fn depth(&self, node: ElementRef<'_>) -> usize {
        let mut depth   = 0;
        let mut current = node;
        while let Some(parent) = self.parent_of(current) {
            depth  += 1;
            current = parent;
        }
        depth
    }
}

/// A node's own string: its single text child, or the own string of
/// its single element child. None when the node has zero or several
/// children.
pub fn own_string(node: ElementRef<'_>) -> Option<&str> {
    let mut children = node.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    if let Some(text) = only.value().as_text() {
        return Some(&**text);
    }
    ElementRef::wrap(only).and_then(own_string)
}

/// Cleaned visible text of a node and its descendants.
pub fn visible_text(node: ElementRef<'_>) -> String {
    Preprocessor::new().join_pieces(node.text())
}

/// Tag name of a node, lower-case as produced by the HTML parser.
pub fn tag_name<'a>(node: ElementRef<'a>) -> &'a str {
    node.value().name()
}

/// Non-blank value of an attribute.
pub fn non_blank_attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"<div class="item">
        <div class="volanta">  </div>
        <h2 class="titulo"><a href="/x">HELLO WORLD</a></h2>
        <div class="imagen"><a href="/x"><img src="/y.jpg"></a></div>
    </div>"#;

    fn names(nodes: &[ElementRef<'_>]) -> Vec<String> {
        nodes.iter().map(|n| tag_name(*n).to_string()).collect()
    }

    #[test]
    fn test_elements_in_document_order() {
        let block = HtmlBlock::parse(BLOCK);
        assert_eq!(
            names(&block.elements()),
            vec!["div", "div", "h2", "a", "div", "a", "img"]
        );
    }

    #[test]
    fn test_blank_own_string_is_not_a_candidate() {
        let block = HtmlBlock::parse(BLOCK);
        // the whitespace-only kicker div is skipped; containers with
        // several children and the childless img are kept
        assert_eq!(
            names(&block.candidates()),
            vec!["div", "h2", "a", "div", "a", "img"]
        );
    }

    #[test]
    fn test_parent_and_depth_exclude_root() {
        let block = HtmlBlock::parse(BLOCK);
        let els   = block.elements();
        let outer = els[0];
        let img   = *els.last().unwrap();

        assert!(block.parent_of(outer).is_none());
        assert_eq!(block.depth(outer), 0);
        assert_eq!(tag_name(block.parent_of(img).unwrap()), "a");
        assert_eq!(block.depth(img), 3);
    }

    #[test]
    fn test_own_string_recurses_through_single_child() {
        let block = HtmlBlock::parse("<h2><a>Title</a></h2><p>a<b>b</b></p>");
        let els   = block.elements();
        assert_eq!(own_string(els[0]), Some("Title"));
        assert_eq!(own_string(els[2]), None);
    }

    #[test]
    fn test_visible_text() {
        let block = HtmlBlock::parse("<div>\n  <span>BREAKING</span>\n <b>news\u{00A0}today</b></div>");
        assert_eq!(visible_text(block.elements()[0]), "BREAKING news today");
    }

    #[test]
    fn test_non_blank_attr() {
        let block = HtmlBlock::parse(r#"<a href="  ">x</a><a href="/ok">y</a>"#);
        let els   = block.elements();
        assert_eq!(non_blank_attr(els[0], "href"), None);
        assert_eq!(non_blank_attr(els[1], "href"), Some("/ok"));
    }
}
