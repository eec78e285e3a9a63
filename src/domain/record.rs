// ============================================================
// Layer 3 — ExtractedRecord Domain Type
// ============================================================
// One news item pulled out of one block. Kicker and image may
// carry the NOT_FOUND sentinel; an accepted record always has a
// real title and link.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Sentinel for a kicker or image that could not be resolved.
pub const NOT_FOUND: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title:     String,
    pub kicker:    String,
    pub image_url: String,
    pub link:      String,
}

/// Fields gathered for a block before the acceptance rule is applied.
/// `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub title:     Option<String>,
    pub kicker:    Option<String>,
    pub image_url: Option<String>,
    pub link:      Option<String>,
}

impl ResolvedFields {
    /// A record exists iff both title and link were resolved.
    pub fn into_record(self) -> Option<ExtractedRecord> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let link  = self.link.filter(|l| !l.is_empty())?;
        Some(ExtractedRecord {
            title,
            link,
            kicker:    self.kicker.filter(|k| !k.is_empty()).unwrap_or_else(|| NOT_FOUND.to_string()),
            image_url: self.image_url.filter(|i| !i.is_empty()).unwrap_or_else(|| NOT_FOUND.to_string()),
        })
    }

    /// Short one-line description for rejection logs.
    pub fn describe(&self) -> String {
        let show = |v: &Option<String>| match v {
            Some(s) => format!("'{}'", s.chars().take(40).collect::<String>()),
            None    => NOT_FOUND.to_string(),
        };
        format!(
            "title={} link={} kicker={} image={}",
            show(&self.title),
            show(&self.link),
            show(&self.kicker),
            show(&self.image_url),
        )
    }
}

/// Post-processing statistics over an accepted record's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleStats {
    pub word_count:      usize,
    pub char_count:      usize,
    pub capital_words:   Vec<String>,
}

impl TitleStats {
    pub fn of(title: &str) -> Self {
        let capital_words = capitalised_word_pattern()
            .map(|re| re.find_iter(title).map(|m| m.as_str().to_string()).collect())
            .unwrap_or_default();

        Self {
            word_count: title.split_whitespace().count(),
            char_count: title.chars().count(),
            capital_words,
        }
    }
}

/// Words that start with an upper-case ASCII letter at a word boundary;
/// inner apostrophes and hyphens are kept ("O'Neil", "Jean-Luc").
fn capitalised_word_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z'-]*\b").ok())
        .as_ref()
}

/// An accepted record with optional title statistics, as written by `extract`.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    #[serde(flatten)]
    pub record: ExtractedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_stats: Option<TitleStats>,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: Option<&str>, link: Option<&str>) -> ResolvedFields {
        ResolvedFields {
            title: title.map(String::from),
            link:  link.map(String::from),
            ..ResolvedFields::default()
        }
    }

    #[test]
    fn test_acceptance_requires_title_and_link() {
        assert!(fields(Some("t"), Some("https://x/y")).into_record().is_some());
        assert!(fields(None, Some("https://x/y")).into_record().is_none());
        assert!(fields(Some("t"), None).into_record().is_none());
        assert!(fields(Some(""), Some("https://x/y")).into_record().is_none());
        assert!(fields(None, None).into_record().is_none());
    }

    #[test]
    fn test_sentinels_fill_optional_fields() {
        let record = fields(Some("t"), Some("l")).into_record().unwrap();
        assert_eq!(record.kicker, NOT_FOUND);
        assert_eq!(record.image_url, NOT_FOUND);
    }

    #[test]
    fn test_title_stats() {
        let stats = TitleStats::of("Casino Royale opens in Las Vegas' strip");
        assert_eq!(stats.word_count, 7);
        assert_eq!(stats.char_count, 39);
        assert_eq!(stats.capital_words, vec!["Casino", "Royale", "Las", "Vegas"]);
    }

    #[test]
    fn test_title_stats_capitals_need_word_boundaries() {
        assert!(TitleStats::of("A1B wins").capital_words.is_empty());
        assert_eq!(
            TitleStats::of("Jean-Luc O'Neil joins McDonald's").capital_words,
            vec!["Jean-Luc", "O'Neil", "McDonald's"]
        );
    }

    #[test]
    fn test_output_record_flattens() {
        let out = OutputRecord {
            record: fields(Some("t"), Some("l")).into_record().unwrap(),
            title_stats: None,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["title"], "t");
        assert!(json.get("title_stats").is_none());
    }
}
