//! Word-level tokenizers for lexical retrieval.
//!
//! Campaign descriptions are mostly unsegmented Chinese with embedded Latin
//! words and numbers (`"暑期档+IP联动"`). [`DictionaryTokenizer`] segments Han
//! runs with the jieba dictionary and splits everything else on word
//! boundaries. [`WordBoundaryTokenizer`] is the cheaper choice for corpora
//! that are purely space-delimited.
//!
//! Both drop tokens that carry no alphanumeric character (whitespace, `+`,
//! `%`), since those appear in nearly every document and only add noise to
//! term statistics. Token order is preserved.

use std::fmt;

use jieba_rs::Jieba;
use serde::{Deserialize, Serialize};

/// Turns free text into an ordered sequence of word tokens.
///
/// Implementations must be deterministic: the same text always yields the
/// same tokens, since indexing and querying share one tokenizer.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Stable name for logging.
    fn name(&self) -> &'static str;
}

/// Which tokenizer a retrieval index should be built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Dictionary segmentation for CJK, word boundaries elsewhere.
    #[default]
    Dictionary,
    /// Split on non-alphanumeric characters and lowercase.
    WordBoundary,
}

impl TokenizerKind {
    /// Construct the tokenizer this kind names.
    pub fn build(self) -> Box<dyn Tokenizer> {
        match self {
            TokenizerKind::Dictionary => Box::new(DictionaryTokenizer::new()),
            TokenizerKind::WordBoundary => Box::new(WordBoundaryTokenizer),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerKind::Dictionary => write!(f, "dictionary"),
            TokenizerKind::WordBoundary => write!(f, "word_boundary"),
        }
    }
}

fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// jieba-based segmentation with HMM discovery of out-of-vocabulary words.
///
/// Loading the embedded dictionary takes a noticeable fraction of a second,
/// so build one per index, not per query.
pub struct DictionaryTokenizer {
    jieba: Jieba,
}

impl DictionaryTokenizer {
    pub fn new() -> Self {
        let jieba = Jieba::new();
        log::debug!("tokenizer=dictionary jieba dictionary loaded");
        Self { jieba }
    }
}

impl Default for DictionaryTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for DictionaryTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(str::trim)
            .filter(|t| is_word(t))
            .map(String::from)
            .collect()
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

/// Splits on every non-alphanumeric character and lowercases.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordBoundaryTokenizer;

impl Tokenizer for WordBoundaryTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    fn name(&self) -> &'static str {
        "word_boundary"
    }
}
