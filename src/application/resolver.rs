// ============================================================
// Layer 2 — Role Resolver
// ============================================================
// Turns one news block into zero or one ExtractedRecord.
//
// Per block:
//   Nodes Collected     candidate nodes in document order
//   Features Extracted  one FeatureVector per node
//   Roles Predicted     one Role per node
//   Fields Resolved     selection + field rules below
//   → Accepted | Rejected
//
// Selection (first match in document order wins):
//   Title  — first node predicted Title
//   Kicker — first node predicted Kicker
//   Image  — first node predicted Image_URL whose tag is <img>;
//            Image_URL on any other tag is ignored
//
// Fields:
//   title  — cleaned visible text of the Title node
//   link   — Title node's href, else the href of the Image
//            node's parent; joined against the base URL
//   kicker — cleaned visible text of the Kicker node, else N/A
//   image  — Image node's src joined against the base URL, else N/A
//
// A record is accepted only with both a title and a link.

use scraper::ElementRef;
use url::Url;

use crate::data::extractor::FeatureExtractor;
use crate::data::html::{non_blank_attr, tag_name, visible_text, HtmlBlock};
use crate::domain::error::{BlockStage, ScrapeError};
use crate::domain::features::FeatureVector;
use crate::domain::record::{ExtractedRecord, ResolvedFields};
use crate::domain::role::Role;
use crate::ml::inferencer::RolePredictor;

/// Site the listing pages come from; relative links resolve against it.
pub const DEFAULT_BASE_URL: &str = "https://www.yogonet.com";

/// The nodes chosen for each role in one block.
#[derive(Debug, Default, Clone, Copy)]
pub struct Selection<'a> {
    pub title:  Option<ElementRef<'a>>,
    pub kicker: Option<ElementRef<'a>>,
    pub image:  Option<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    /// Apply the first-match policy to `(node, role)` pairs in document order.
    pub fn choose(nodes: &[ElementRef<'a>], roles: &[Role]) -> Self {
        let first = |wanted: Role, extra: &dyn Fn(ElementRef<'a>) -> bool| {
            nodes
                .iter()
                .zip(roles)
                .find(|(n, r)| **r == wanted && extra(**n))
                .map(|(n, _)| *n)
        };
        Self {
            title:  first(Role::Title, &|_| true),
            kicker: first(Role::Kicker, &|_| true),
            image:  first(Role::ImageUrl, &|n| tag_name(n) == "img"),
        }
    }
}

pub struct RoleResolver<'p> {
    predictor: &'p RolePredictor,
    base_url:  Url,
}

impl<'p> RoleResolver<'p> {
    pub fn new(predictor: &'p RolePredictor, base_url: Url) -> Self {
        Self { predictor, base_url }
    }

    /// Resolve block number `index` (0-based) from its outer HTML.
    /// Ok(None) is a rejected block; Err is a failed one.
    pub fn resolve(&self, index: usize, markup: &str) -> Result<Option<ExtractedRecord>, ScrapeError> {
        let fields = self.resolve_fields(index, markup)?;
        let shown  = fields.describe();

        match fields.into_record() {
            Some(record) => {
                tracing::debug!(block = index + 1, "Accepted: {}", shown);
                Ok(Some(record))
            }
            None => {
                tracing::debug!(block = index + 1, "Rejected (missing title or link): {}", shown);
                Ok(None)
            }
        }
    }

    pub fn resolve_fields(&self, index: usize, markup: &str) -> Result<ResolvedFields, ScrapeError> {
        let fail = |stage, reason: String| ScrapeError::BlockProcessing { block: index + 1, stage, reason };

        // ── Nodes Collected ──────────────────────────────────────────────────
        let block = HtmlBlock::parse(markup);
        let nodes = block.candidates();
        if nodes.is_empty() {
            return Err(fail(BlockStage::CollectingNodes, "block has no element nodes".into()));
        }

        // ── Features Extracted ───────────────────────────────────────────────
        let extractor = FeatureExtractor::new(self.predictor.analyzer());
        let features: Vec<FeatureVector> = nodes.iter().map(|n| extractor.extract(*n, &block)).collect();

        let encoded = self
            .predictor
            .encode_all(&features)
            .map_err(|e| fail(BlockStage::ExtractingFeatures, format!("{} nodes, {e}", nodes.len())))?;

        // ── Roles Predicted ──────────────────────────────────────────────────
        let roles = self
            .predictor
            .classify_all(&encoded)
            .map_err(|e| fail(BlockStage::PredictingRoles, e.to_string()))?;

        // ── Fields Resolved ──────────────────────────────────────────────────
        let selection = Selection::choose(&nodes, &roles);
        Ok(self.fields_from(&block, selection))
    }

    /// Field rules over an already chosen selection.
    pub fn fields_from(&self, block: &HtmlBlock, selection: Selection<'_>) -> ResolvedFields {
        let title = selection.title.map(visible_text).filter(|t| !t.is_empty());

        let link = selection
            .title
            .and_then(|t| attr(t, "href"))
            .or_else(|| {
                selection
                    .image
                    .and_then(|img| block.parent_of(img))
                    .and_then(|parent| attr(parent, "href"))
            })
            .and_then(|href| self.absolute(href));

        let kicker = selection.kicker.map(visible_text).filter(|k| !k.is_empty());

        let image_url = selection
            .image
            .and_then(|img| attr(img, "src"))
            .and_then(|src| self.absolute(src));

        ResolvedFields { title, kicker, image_url, link }
    }

    fn absolute(&self, reference: &str) -> Option<String> {
        match self.base_url.join(reference) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Cannot resolve '{}' against {}: {}", reference, self.base_url, e);
                None
            }
        }
    }
}

/// Non-blank attribute value; an absent or blank one is unresolved.
fn attr<'a>(node: ElementRef<'a>, name: &'static str) -> Option<&'a str> {
    match non_blank_attr(node, name).ok_or(ScrapeError::MissingAttribute(name)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("<{}>: {}", tag_name(node), e);
            None
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::NOT_FOUND;
    use crate::ml::inferencer::tests::toy_artifact;

    fn predictor() -> RolePredictor {
        RolePredictor::new(toy_artifact()).unwrap()
    }

    fn base() -> Url {
        Url::parse(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn test_anchor_wrapped_heading_with_image() {
        let p = predictor();
        let r = RoleResolver::new(&p, base());
        let block = r#"<div class="item">
            <h2><a href="/x">HELLO WORLD</a></h2>
            <a href="/x"><img src="/y.jpg"></a>
        </div>"#;

        let record = r.resolve(0, block).unwrap().unwrap();
        assert_eq!(
            record,
            ExtractedRecord {
                title:     "HELLO WORLD".into(),
                kicker:    NOT_FOUND.into(),
                image_url: "https://www.yogonet.com/y.jpg".into(),
                link:      "https://www.yogonet.com/x".into(),
            }
        );
    }

    #[test]
    fn test_link_comes_from_anchor_predicted_as_title() {
        let p     = predictor();
        let r     = RoleResolver::new(&p, base());
        let block = HtmlBlock::parse(r#"<div><h2><a href="/x">HELLO WORLD</a></h2><img src="/y.jpg"></div>"#);
        let nodes = block.candidates();
        let roles: Vec<Role> = nodes
            .iter()
            .map(|n| match tag_name(*n) {
                "a"   => Role::Title,
                "img" => Role::ImageUrl,
                _     => Role::Other,
            })
            .collect();

        let fields = r.fields_from(&block, Selection::choose(&nodes, &roles));
        assert_eq!(
            fields.into_record(),
            Some(ExtractedRecord {
                title:     "HELLO WORLD".into(),
                kicker:    NOT_FOUND.into(),
                image_url: "https://www.yogonet.com/y.jpg".into(),
                link:      "https://www.yogonet.com/x".into(),
            })
        );
    }

    #[test]
    fn test_no_title_href_and_plain_image_parent_drops_block() {
        let p     = predictor();
        let r     = RoleResolver::new(&p, base());
        let block = HtmlBlock::parse(r#"<div><h2>Headline</h2><span><img src="/y.jpg"></span></div>"#);
        let nodes = block.candidates();
        let roles: Vec<Role> = nodes
            .iter()
            .map(|n| match tag_name(*n) {
                "h2"  => Role::Title,
                "img" => Role::ImageUrl,
                _     => Role::Other,
            })
            .collect();

        let fields = r.fields_from(&block, Selection::choose(&nodes, &roles));
        assert_eq!(fields.title.as_deref(), Some("Headline"));
        assert_eq!(fields.image_url.as_deref(), Some("https://www.yogonet.com/y.jpg"));
        assert!(fields.link.is_none());
        assert!(fields.into_record().is_none());
    }

    #[test]
    fn test_title_without_any_link_is_rejected() {
        let p = predictor();
        let r = RoleResolver::new(&p, base());
        let block = r#"<div><h2>Only a headline</h2><img src="/y.jpg"></div>"#;
        assert_eq!(r.resolve(0, block).unwrap(), None);
    }

    #[test]
    fn test_kicker_is_resolved() {
        let p = predictor();
        let r = RoleResolver::new(&p, base());
        let block = r#"<div>
            <div class="volanta">Regulation</div>
            <h2>Headline</h2>
            <a href="https://other.example/story"><img src="pic.png"></a>
        </div>"#;

        let record = r.resolve(3, block).unwrap().unwrap();
        assert_eq!(record.kicker, "Regulation");
        assert_eq!(record.link, "https://other.example/story");
        assert_eq!(record.image_url, "https://www.yogonet.com/pic.png");
    }

    #[test]
    fn test_first_match_wins_and_image_needs_img_tag() {
        let p     = predictor();
        let r     = RoleResolver::new(&p, base());
        let block = HtmlBlock::parse(
            r#"<div><h2 href="/first">First</h2><h2 href="/second">Second</h2>
               <span src="/not-img.png"></span><img src="/real.png"></div>"#,
        );
        let nodes = block.candidates();
        let roles: Vec<Role> = nodes
            .iter()
            .map(|n| match tag_name(*n) {
                "h2"          => Role::Title,
                "span" | "img" => Role::ImageUrl,
                _             => Role::Other,
            })
            .collect();

        let selection = Selection::choose(&nodes, &roles);
        let fields    = r.fields_from(&block, selection);
        assert_eq!(fields.title.as_deref(), Some("First"));
        assert_eq!(fields.link.as_deref(), Some("https://www.yogonet.com/first"));
        assert_eq!(fields.image_url.as_deref(), Some("https://www.yogonet.com/real.png"));
    }

    #[test]
    fn test_blank_href_counts_as_unresolved() {
        let p     = predictor();
        let r     = RoleResolver::new(&p, base());
        let block = HtmlBlock::parse(r#"<div><a href="  ">Title</a></div>"#);
        let nodes = block.candidates();
        let roles = vec![Role::Other, Role::Title];

        let fields = r.fields_from(&block, Selection::choose(&nodes, &roles));
        assert_eq!(fields.title.as_deref(), Some("Title"));
        assert!(fields.link.is_none());
        assert!(fields.into_record().is_none());
    }

    #[test]
    fn test_empty_block_fails_with_index() {
        let p   = predictor();
        let r   = RoleResolver::new(&p, base());
        let err = r.resolve(4, "just text").unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::BlockProcessing { block: 5, stage: BlockStage::CollectingNodes, .. }
        ));
    }
}
