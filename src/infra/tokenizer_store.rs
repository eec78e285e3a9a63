// ============================================================
// Layer 6 — Word Analyzer (tokenizer + stopword store)
// ============================================================
// The text capability injected into the feature extractor.
//
// Tokenization uses the HuggingFace `Whitespace` pre-tokenizer,
// which splits on the pattern `\w+|[^\w\s]+`:
//
//   "Breaking: SLOTS up 12%"  →  ["Breaking", ":", "SLOTS", "up", "12", "%"]
//
// Stopword lists ship inside the binary (resources/stopwords/)
// so training and inference always see the same set. The
// language name is stored in the classifier artifact and the
// analyzer is rebuilt from it at inference.

use std::collections::HashSet;

use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::domain::error::ScrapeError;
use crate::domain::traits::TextAnalyzer;

/// Languages with an embedded stopword list.
pub const STOPWORD_LANGUAGES: [&str; 2] = ["english", "spanish"];

pub struct WordAnalyzer {
    language:  String,
    stopwords: HashSet<String>,
    splitter:  Whitespace,
}

impl WordAnalyzer {
    /// Build an analyzer for one of the embedded stopword languages.
    pub fn for_language(language: &str) -> Result<Self, ScrapeError> {
        let lang = language.trim().to_lowercase();
        let list = stopword_list(&lang).ok_or_else(|| ScrapeError::UnknownStopwordLanguage {
            language:  language.to_string(),
            available: STOPWORD_LANGUAGES.join(", "),
        })?;

        let stopwords: HashSet<String> = list
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("Loaded {} '{}' stopwords", stopwords.len(), lang);
        Ok(Self { language: lang, stopwords, splitter: Whitespace::default() })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

impl TextAnalyzer for WordAnalyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, ScrapeError> {
        let mut pre = PreTokenizedString::from(text);
        self.splitter
            .pre_tokenize(&mut pre)
            .map_err(|e| ScrapeError::TokenizeFailure(e.to_string()))?;

        Ok(pre
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(token, _, _)| token.to_string())
            .collect())
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

fn stopword_list(language: &str) -> Option<&'static str> {
    match language {
        "english" => Some(include_str!("../../resources/stopwords/english.txt")),
        "spanish" => Some(include_str!("../../resources/stopwords/spanish.txt")),
        _         => None,
    }
}
