//! Numeric and lexical primitives shared by the growth advisor engines.

pub mod bm25;
pub mod policy;
pub mod stats;
pub mod tokenizer;

pub use bm25::{Bm25Corpus, Bm25Params};
pub use stats::{
    mean, normalize_by_max, pct_change, sample_std_dev, substitute_zero_spread,
    trailing_window_stats, WindowStats,
};
pub use tokenizer::{DictionaryTokenizer, Tokenizer, TokenizerKind, WordBoundaryTokenizer};
