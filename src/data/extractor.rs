// ============================================================
// Layer 4 — Feature Extractor
// ============================================================
// One function, shared by training and inference, that turns a
// DOM node into a FeatureVector. It is total: attribute lookups
// default to absent, and a tokenizer failure leaves the word
// features at zero instead of propagating.
//
//   node ──► structure   (tag, children, parent, depth)
//        ──► attributes  (href, src, class flags)
//        ──► text        (length, tokens, uppercase, stopwords)

use scraper::ElementRef;

use crate::data::html::{tag_name, visible_text, HtmlBlock};
use crate::domain::features::{FeatureVector, NONE_TAG};
use crate::domain::traits::TextAnalyzer;

const TITLE_MARKERS:  [&str; 2] = ["title", "titulo"];
const KICKER_MARKERS: [&str; 2] = ["kicker", "volanta"];
const IMAGE_MARKERS:  [&str; 2] = ["image", "imagen"];

pub struct FeatureExtractor<'a> {
    analyzer: &'a dyn TextAnalyzer,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(analyzer: &'a dyn TextAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Feature vector of `node`, read from its position in `block`.
    pub fn extract(&self, node: ElementRef<'_>, block: &HtmlBlock) -> FeatureVector {
        let tag   = tag_name(node);
        let el    = node.value();

        // ── Step 1: Structure ────────────────────────────────────────────────
        let num_children = node.children().filter_map(ElementRef::wrap).count();
        let parent_tag   = block
            .parent_of(node)
            .map_or(NONE_TAG, tag_name)
            .to_string();

        // ── Step 2: Text ─────────────────────────────────────────────────────
        let text   = visible_text(node);
        let tokens = match self.analyzer.tokenize(&text) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!("Tokenizer failed on <{}>, word features default to 0: {}", tag, e);
                Vec::new()
            }
        };
        let (uppercase_ratio, stopword_ratio) = self.token_ratios(&tokens);

        // ── Step 3: Class markers ────────────────────────────────────────────
        let classes = el.classes().collect::<Vec<_>>().join(" ").to_lowercase();
        let marked  = |markers: &[&str]| markers.iter().any(|m| classes.contains(m));

        let features = FeatureVector {
            tag_name:              tag.to_string(),
            num_children:          num_children as u32,
            parent_tag,
            has_href:              el.attr("href").is_some(),
            has_src:               el.attr("src").is_some(),
            text_length:           text.chars().count() as u32,
            word_count:            tokens.len() as u32,
            uppercase_ratio,
            stopword_ratio,
            depth:                 block.depth(node) as u32,
            is_h2:                 tag == "h2",
            is_div:                tag == "div",
            is_a:                  tag == "a",
            is_img:                tag == "img",
            class_contains_title:  marked(&TITLE_MARKERS),
            class_contains_kicker: marked(&KICKER_MARKERS),
            class_contains_image:  marked(&IMAGE_MARKERS),
        };
        tracing::trace!(tag, features = ?features.entries(), "extracted");
        features
    }

    /// (uppercase_ratio, stopword_ratio), both 0.0 for no tokens.
    fn token_ratios(&self, tokens: &[String]) -> (f64, f64) {
        if tokens.is_empty() {
            return (0.0, 0.0);
        }
        let total = tokens.len() as f64;

        let upper = tokens
            .iter()
            .filter(|t| t.chars().count() > 1 && is_all_upper(t))
            .count();
        let stops = tokens
            .iter()
            .filter(|t| self.analyzer.is_stopword(&t.to_lowercase()))
            .count();

        (upper as f64 / total, stops as f64 / total)
    }
}

/// At least one cased character, and no lower-case ones.
fn is_all_upper(token: &str) -> bool {
    let mut cased = false;
    for c in token.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ScrapeError;
    use crate::domain::features::FEATURE_NAMES;
    use crate::infra::tokenizer_store::WordAnalyzer;

    struct BrokenAnalyzer;

    impl TextAnalyzer for BrokenAnalyzer {
        fn tokenize(&self, _: &str) -> Result<Vec<String>, ScrapeError> {
            Err(ScrapeError::TokenizeFailure("offline".into()))
        }
        fn is_stopword(&self, _: &str) -> bool {
            false
        }
    }

    fn find<'a>(block: &'a HtmlBlock, tag: &str) -> ElementRef<'a> {
        block.elements().into_iter().find(|e| tag_name(*e) == tag).unwrap()
    }

    #[test]
    fn test_anchor_inside_heading() {
        let analyzer = WordAnalyzer::for_language("english").unwrap();
        let fx       = FeatureExtractor::new(&analyzer);
        let block    = HtmlBlock::parse(
            r#"<div class="item"><h2 class="titulo"><a href="/x">HELLO WORLD of the IGaming</a></h2></div>"#,
        );

        let v = fx.extract(find(&block, "a"), &block);
        assert_eq!(v.tag_name, "a");
        assert_eq!(v.parent_tag, "h2");
        assert_eq!(v.num_children, 0);
        assert!(v.has_href);
        assert!(!v.has_src);
        assert!(v.is_a && !v.is_h2 && !v.is_div && !v.is_img);
        assert_eq!(v.depth, 2);
        assert_eq!(v.text_length, 26);
        assert_eq!(v.word_count, 5);
        // HELLO, WORLD → 2 of 5; "IGaming" has lower-case letters
        assert!((v.uppercase_ratio - 0.4).abs() < 1e-12);
        // of, the → 2 of 5
        assert!((v.stopword_ratio - 0.4).abs() < 1e-12);
        // the anchor has no class of its own
        assert!(!v.class_contains_title);
    }

    #[test]
    fn test_class_marker_is_case_insensitive_substring() {
        let analyzer = WordAnalyzer::for_language("english").unwrap();
        let fx       = FeatureExtractor::new(&analyzer);
        let block    = HtmlBlock::parse(r#"<h2 class="MODULE-TITULO-destacado big">News</h2>"#);

        let v = fx.extract(find(&block, "h2"), &block);
        assert!(v.class_contains_title);
        assert!(!v.class_contains_kicker);
        assert!(!v.class_contains_image);
        assert_eq!(v.parent_tag, NONE_TAG);
        assert_eq!(v.depth, 0);
    }

    #[test]
    fn test_single_letter_capitals_do_not_count() {
        let analyzer = WordAnalyzer::for_language("english").unwrap();
        let fx       = FeatureExtractor::new(&analyzer);
        let block    = HtmlBlock::parse("<p>A B CD</p>");

        let v = fx.extract(find(&block, "p"), &block);
        assert_eq!(v.word_count, 3);
        assert!((v.uppercase_ratio - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_image_node() {
        let analyzer = WordAnalyzer::for_language("english").unwrap();
        let fx       = FeatureExtractor::new(&analyzer);
        let block    = HtmlBlock::parse(
            r#"<div class="imagen"><a href="/x"><img src="/y.jpg" class="Main-Image"></a></div>"#,
        );

        let v = fx.extract(find(&block, "img"), &block);
        assert!(v.is_img && v.has_src && !v.has_href);
        assert_eq!(v.text_length, 0);
        assert_eq!(v.word_count, 0);
        assert_eq!(v.uppercase_ratio, 0.0);
        assert_eq!(v.stopword_ratio, 0.0);
        assert!(v.class_contains_image);

        let div = fx.extract(find(&block, "div"), &block);
        assert_eq!(div.num_children, 1);
        assert!(div.class_contains_image);
    }

    #[test]
    fn test_tokenizer_failure_defaults_to_zero() {
        let fx    = FeatureExtractor::new(&BrokenAnalyzer);
        let block = HtmlBlock::parse("<h2>BIG NEWS</h2>");

        let v = fx.extract(find(&block, "h2"), &block);
        assert_eq!(v.text_length, 8);
        assert_eq!(v.word_count, 0);
        assert_eq!(v.uppercase_ratio, 0.0);
        assert_eq!(v.stopword_ratio, 0.0);
    }

    #[test]
    fn test_extraction_is_deterministic_with_full_schema() {
        let analyzer = WordAnalyzer::for_language("english").unwrap();
        let fx       = FeatureExtractor::new(&analyzer);
        let block    = HtmlBlock::parse(
            r#"<div><span>x</span><h2>Title</h2><img src="a.png"></div>"#,
        );

        for node in block.candidates() {
            let a = fx.extract(node, &block);
            let b = fx.extract(node, &block);
            assert_eq!(a, b);
            let keys: Vec<&str> = a.entries().iter().map(|(k, _)| *k).collect();
            assert_eq!(keys, FEATURE_NAMES.to_vec());
        }
    }
}
