// ============================================================
// Layer 3 — FeatureVector Domain Type
// ============================================================
// The fixed-schema summary of one DOM node that the classifier
// consumes. The same struct is produced for training and for
// inference, and the column groups below are the only names a
// fitted transform may refer to.
//
// Column groups:
//   numeric     — standardised (zero mean, unit variance)
//   categorical — one-hot encoded, unseen values ignored
//   binary      — 0/1 flags passed through unchanged
//
// Any change to the fields or their meaning must bump
// FEATURE_SCHEMA_VERSION so stale artifacts are rejected.

use serde::{Deserialize, Serialize};

/// Version of the feature schema; embedded in every artifact.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Placeholder for an absent tag or parent tag.
pub const NONE_TAG: &str = "None";

/// Placeholder for a categorical value left empty when assembling a dataset.
pub const MISSING_CATEGORY: &str = "Missing";

pub const NUMERIC_FEATURES: [&str; 6] = [
    "num_children",
    "text_length",
    "word_count",
    "uppercase_ratio",
    "stopword_ratio",
    "depth",
];

pub const CATEGORICAL_FEATURES: [&str; 2] = ["tag_name", "parent_tag"];

pub const BINARY_FEATURES: [&str; 9] = [
    "has_href",
    "has_src",
    "is_h2",
    "is_div",
    "is_a",
    "is_img",
    "class_contains_title",
    "class_contains_kicker",
    "class_contains_image",
];

/// Every feature name, in schema order.
pub const FEATURE_NAMES: [&str; 17] = [
    "tag_name",
    "num_children",
    "parent_tag",
    "has_href",
    "has_src",
    "text_length",
    "word_count",
    "uppercase_ratio",
    "stopword_ratio",
    "depth",
    "is_h2",
    "is_div",
    "is_a",
    "is_img",
    "class_contains_title",
    "class_contains_kicker",
    "class_contains_image",
];

/// A single typed feature value, borrowed from a FeatureVector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Category(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub tag_name:              String,
    pub num_children:          u32,
    pub parent_tag:            String,
    pub has_href:              bool,
    pub has_src:               bool,
    pub text_length:           u32,
    pub word_count:            u32,
    pub uppercase_ratio:       f64,
    pub stopword_ratio:        f64,
    pub depth:                 u32,
    pub is_h2:                 bool,
    pub is_div:                bool,
    pub is_a:                  bool,
    pub is_img:                bool,
    pub class_contains_title:  bool,
    pub class_contains_kicker: bool,
    pub class_contains_image:  bool,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            tag_name:              NONE_TAG.to_string(),
            num_children:          0,
            parent_tag:            NONE_TAG.to_string(),
            has_href:              false,
            has_src:               false,
            text_length:           0,
            word_count:            0,
            uppercase_ratio:       0.0,
            stopword_ratio:        0.0,
            depth:                 0,
            is_h2:                 false,
            is_div:                false,
            is_a:                  false,
            is_img:                false,
            class_contains_title:  false,
            class_contains_kicker: false,
            class_contains_image:  false,
        }
    }
}

impl FeatureVector {
    /// Look up a feature by its schema name. Returns None for names
    /// outside the schema.
    pub fn value(&self, name: &str) -> Option<FeatureValue<'_>> {
        use FeatureValue::{Category, Number};

        let flag = |b: bool| Number(if b { 1.0 } else { 0.0 });
        let v = match name {
            "tag_name"              => Category(&self.tag_name),
            "num_children"          => Number(self.num_children as f64),
            "parent_tag"            => Category(&self.parent_tag),
            "has_href"              => flag(self.has_href),
            "has_src"               => flag(self.has_src),
            "text_length"           => Number(self.text_length as f64),
            "word_count"            => Number(self.word_count as f64),
            "uppercase_ratio"       => Number(self.uppercase_ratio),
            "stopword_ratio"        => Number(self.stopword_ratio),
            "depth"                 => Number(self.depth as f64),
            "is_h2"                 => flag(self.is_h2),
            "is_div"                => flag(self.is_div),
            "is_a"                  => flag(self.is_a),
            "is_img"                => flag(self.is_img),
            "class_contains_title"  => flag(self.class_contains_title),
            "class_contains_kicker" => flag(self.class_contains_kicker),
            "class_contains_image"  => flag(self.class_contains_image),
            _ => return None,
        };
        Some(v)
    }

    /// All (name, value) pairs in schema order.
    pub fn entries(&self) -> Vec<(&'static str, FeatureValue<'_>)> {
        FEATURE_NAMES
            .iter()
            .filter_map(|&name| self.value(name).map(|v| (name, v)))
            .collect()
    }

    /// Replace values a dataset cannot hold: non-finite ratios become 0,
    /// empty categories become "Missing".
    pub fn fill_missing(mut self) -> Self {
        for ratio in [&mut self.uppercase_ratio, &mut self.stopword_ratio] {
            if !ratio.is_finite() {
                *ratio = 0.0;
            }
        }
        for category in [&mut self.tag_name, &mut self.parent_tag] {
            if category.trim().is_empty() {
                *category = MISSING_CATEGORY.to_string();
            }
        }
        self
    }
}

/// Human-readable identifier of the schema, e.g. "v1[tag_name,num_children,...]".
pub fn schema_signature(version: u32, names: &[impl AsRef<str>]) -> String {
    let joined: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    format!("v{version}[{}]", joined.join(","))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entries_cover_schema_exactly() {
        let v = FeatureVector::default();
        let keys: Vec<&str> = v.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_column_groups_partition_schema() {
        let mut groups: Vec<&str> = NUMERIC_FEATURES.to_vec();
        groups.extend(CATEGORICAL_FEATURES);
        groups.extend(BINARY_FEATURES);

        let a: HashSet<&str> = groups.iter().copied().collect();
        let b: HashSet<&str> = FEATURE_NAMES.iter().copied().collect();
        assert_eq!(groups.len(), FEATURE_NAMES.len());
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_name_has_no_value() {
        assert!(FeatureVector::default().value("class_list").is_none());
    }

    #[test]
    fn test_fill_missing() {
        let v = FeatureVector {
            tag_name:        String::new(),
            uppercase_ratio: f64::NAN,
            ..FeatureVector::default()
        }
        .fill_missing();
        assert_eq!(v.tag_name, MISSING_CATEGORY);
        assert_eq!(v.parent_tag, NONE_TAG);
        assert_eq!(v.uppercase_ratio, 0.0);
    }
}
