// ============================================================
// Layer 4 — Training Dataset
// ============================================================
// Turns labelled documents into rows the classifier can learn
// from. For each document:
//
//   1. parse the markup and bind labels to nodes by positional
//      identifier (unmatched nodes are Other)
//   2. walk the candidate nodes in document order
//   3. extract a FeatureVector per node and pair it with its role
//
// Labels whose identifier matches no node are reported, not
// fatal: the markup drifted since labelling and those labels are
// lost.

use std::collections::{BTreeMap, HashMap};

use crate::data::extractor::FeatureExtractor;
use crate::data::html::HtmlBlock;
use crate::data::loader::TrainingDocument;
use crate::data::xpath;
use crate::domain::features::FeatureVector;
use crate::domain::role::Role;

/// Minimum examples a non-Other role should have before a warning.
pub const SPARSE_ROLE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub features: FeatureVector,
    pub role:     Role,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingDataset {
    examples: Vec<LabeledExample>,
}

impl TrainingDataset {
    /// Wrap examples, normalising every feature vector.
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        let examples = examples
            .into_iter()
            .map(|ex| LabeledExample { features: ex.features.fill_missing(), role: ex.role })
            .collect();
        Self { examples }
    }

    /// Build the dataset from labelled documents, in document order.
    pub fn from_documents(docs: &[TrainingDocument], extractor: &FeatureExtractor<'_>) -> Self {
        let mut examples = Vec::new();

        for doc in docs {
            let block = HtmlBlock::parse(&doc.markup);

            // ── Step 1: Bind labels to identifiers ──────────────────────────
            // Later duplicates overwrite earlier ones.
            let label_map: HashMap<&str, Role> = doc
                .labels
                .iter()
                .map(|l| (l.xpath.as_str(), l.role))
                .collect();

            let unmatched: Vec<&str> = label_map
                .keys()
                .copied()
                .filter(|path| xpath::locate(&block, path).is_none())
                .collect();
            if !unmatched.is_empty() {
                tracing::warn!(
                    document = %doc.name,
                    "{} label(s) match no node and fall back to Other: {:?}",
                    unmatched.len(),
                    unmatched
                );
            }

            // ── Step 2: Walk candidates and extract ─────────────────────────
            let before = examples.len();
            for node in block.candidates() {
                let id   = xpath::identify(&block, node);
                let role = label_map.get(id.as_str()).copied().unwrap_or(Role::Other);
                examples.push(LabeledExample { features: extractor.extract(node, &block), role });
            }

            tracing::debug!("{}: {} nodes", doc.name, examples.len() - before);
        }

        let dataset = Self::new(examples);
        if dataset.is_empty() {
            tracing::warn!("No candidate nodes found in {} documents", docs.len());
        }
        tracing::info!(
            "Dataset created with {} nodes and {} features",
            dataset.len(),
            crate::domain::features::FEATURE_NAMES.len()
        );
        dataset
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn into_examples(self) -> Vec<LabeledExample> {
        self.examples
    }

    /// Examples per role; roles with no examples are absent.
    pub fn class_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for ex in &self.examples {
            *counts.entry(ex.role).or_insert(0) += 1;
        }
        counts
    }

    /// Non-Other roles with fewer than SPARSE_ROLE_THRESHOLD examples.
    pub fn sparse_roles(&self) -> Vec<(Role, usize)> {
        let counts = self.class_counts();
        Role::ALL
            .iter()
            .filter(|r| **r != Role::Other)
            .map(|r| (*r, counts.get(r).copied().unwrap_or(0)))
            .filter(|(_, n)| *n < SPARSE_ROLE_THRESHOLD)
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::LabelEntry;
    use crate::infra::tokenizer_store::WordAnalyzer;

    fn doc(name: &str, markup: &str, labels: &[(&str, Role)]) -> TrainingDocument {
        TrainingDocument {
            name:   name.into(),
            markup: markup.into(),
            labels: labels
                .iter()
                .map(|(x, r)| LabelEntry { xpath: x.to_string(), role: *r })
                .collect(),
        }
    }

    const BLOCK: &str = r#"<div class="item">
        <div class="volanta">Casinos</div>
        <h2 class="titulo"><a href="/n/1">Big win</a></h2>
        <div class="imagen"><a href="/n/1"><img src="/i.jpg"></a></div>
    </div>"#;

    #[test]
    fn test_labels_bind_by_identifier() {
        let analyzer  = WordAnalyzer::for_language("english").unwrap();
        let extractor = FeatureExtractor::new(&analyzer);
        let docs = vec![doc(
            "block_1.html",
            BLOCK,
            &[
                ("/div[1]/div[1]", Role::Kicker),
                ("/div[1]/h2[1]", Role::Title),
                ("/div[1]/div[2]/a[1]/img[1]", Role::ImageUrl),
            ],
        )];

        let ds = TrainingDataset::from_documents(&docs, &extractor);
        let roles: Vec<(String, Role)> = ds
            .into_examples()
            .into_iter()
            .map(|e| (e.features.tag_name, e.role))
            .collect();

        assert_eq!(
            roles,
            vec![
                ("div".to_string(), Role::Other),
                ("div".to_string(), Role::Kicker),
                ("h2".to_string(), Role::Title),
                ("a".to_string(), Role::Other),
                ("div".to_string(), Role::Other),
                ("a".to_string(), Role::Other),
                ("img".to_string(), Role::ImageUrl),
            ]
        );
    }

    #[test]
    fn test_drifted_labels_fall_back_to_other() {
        let analyzer  = WordAnalyzer::for_language("english").unwrap();
        let extractor = FeatureExtractor::new(&analyzer);
        let docs      = vec![doc("b.html", BLOCK, &[("/div[1]/h2[7]", Role::Title)])];

        let ds = TrainingDataset::from_documents(&docs, &extractor);
        assert_eq!(ds.len(), 7);
        assert!(ds.into_examples().iter().all(|e| e.role == Role::Other));
    }

    #[test]
    fn test_class_counts_and_sparse_roles() {
        let analyzer  = WordAnalyzer::for_language("english").unwrap();
        let extractor = FeatureExtractor::new(&analyzer);
        let docs      = vec![doc("b.html", BLOCK, &[("/div[1]/h2[1]", Role::Title)])];

        let ds     = TrainingDataset::from_documents(&docs, &extractor);
        let counts = ds.class_counts();
        assert_eq!(counts[&Role::Title], 1);
        assert_eq!(counts[&Role::Other], 6);
        assert!(!counts.contains_key(&Role::Kicker));

        let sparse = ds.sparse_roles();
        assert_eq!(sparse, vec![(Role::Title, 1), (Role::Kicker, 0), (Role::ImageUrl, 0)]);
    }

    #[test]
    fn test_new_fills_missing_categories() {
        let mut features = FeatureVector::default();
        features.parent_tag = String::new();
        let ds = TrainingDataset::new(vec![LabeledExample { features, role: Role::Other }]);
        assert_eq!(ds.into_examples()[0].features.parent_tag, "Missing");
    }
}
