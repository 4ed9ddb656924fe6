//! Lexical retrieval over the historical campaign catalog.
//!
//! A [`CampaignIndex`] owns the catalog, its BM25 statistics and the tokenizer
//! used to build them; queries always go through that same tokenizer.
//! [`CaseRetriever`] wraps an index in a build-once cell for callers that
//! load the catalog after construction.

use std::fmt;
use std::sync::OnceLock;

use growth_engine::policy::DEFAULT_TOP_K;
use growth_engine::stats::normalize_by_max;
use growth_engine::{Bm25Corpus, Bm25Params, Tokenizer, TokenizerKind};
use serde::{Deserialize, Serialize};

use crate::components::top_k_selector::TopKSelector;
use crate::error::{AdvisorError, AdvisorResult};
use crate::selector::Selector;
use crate::types::{Campaign, CaseCandidate, RetrievalResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub tokenizer: TokenizerKind,
    pub bm25: Bm25Params,
    /// Result count when a search does not specify one.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::default(),
            bm25: Bm25Params::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Immutable BM25 index over a campaign catalog.
pub struct CampaignIndex {
    campaigns: Vec<Campaign>,
    corpus: Bm25Corpus,
    tokenizer: Box<dyn Tokenizer>,
}

impl CampaignIndex {
    /// Index with the default dictionary tokenizer and BM25 parameters.
    pub fn build(catalog: Vec<Campaign>) -> Self {
        Self::with_config(catalog, &RetrievalConfig::default())
    }

    pub fn with_config(catalog: Vec<Campaign>, config: &RetrievalConfig) -> Self {
        Self::with_tokenizer(catalog, config.tokenizer.build(), config.bm25)
    }

    pub fn with_tokenizer(
        catalog: Vec<Campaign>,
        tokenizer: Box<dyn Tokenizer>,
        params: Bm25Params,
    ) -> Self {
        let documents: Vec<Vec<String>> = catalog
            .iter()
            .map(|c| tokenizer.tokenize(&c.search_text()))
            .collect();
        let corpus = Bm25Corpus::new(&documents, params);

        log::info!(
            "campaigns={} tokenizer={} avg_doc_len={:.2} case index built",
            catalog.len(),
            tokenizer.name(),
            corpus.avg_doc_len()
        );

        Self {
            campaigns: catalog,
            corpus,
            tokenizer,
        }
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// Look up a catalog entry by id.
    pub fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.campaign_id == campaign_id)
    }

    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    /// Rank the catalog against `query` and return at most `top_k` matches.
    ///
    /// Equal scores keep catalog order. `similarity_score` is the raw score
    /// divided by the best score in the returned set; when nothing matches
    /// the scores stay 0.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        if top_k == 0 || self.is_empty() {
            return Vec::new();
        }

        let tokens = self.tokenizer.tokenize(query);
        let candidates: Vec<CaseCandidate> = self
            .corpus
            .scores(&tokens)
            .into_iter()
            .enumerate()
            .map(|(position, score)| CaseCandidate { position, score })
            .collect();

        let selected = TopKSelector { k: top_k }.select(candidates);
        let raw: Vec<f64> = selected.iter().map(|c| c.score).collect();
        let normalized = normalize_by_max(&raw);

        log::debug!(
            "query_tokens={} candidates={} returned={}",
            tokens.len(),
            self.len(),
            selected.len()
        );

        selected
            .iter()
            .zip(normalized)
            .enumerate()
            .map(|(i, (candidate, similarity_score))| {
                let campaign = &self.campaigns[candidate.position];
                RetrievalResult {
                    rank: i + 1,
                    campaign_id: campaign.campaign_id.clone(),
                    similarity_score,
                    raw_score: candidate.score,
                    strategy_tag: campaign.strategy_tag.clone(),
                    target_segment: campaign.target_segment.clone(),
                    roi: campaign.roi,
                    arpu_lift: campaign.arpu_lift,
                    success_factors: campaign.success_factors.clone(),
                }
            })
            .collect()
    }
}

impl fmt::Debug for CampaignIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CampaignIndex")
            .field("campaigns", &self.campaigns.len())
            .field("tokenizer", &self.tokenizer.name())
            .field("avg_doc_len", &self.corpus.avg_doc_len())
            .finish()
    }
}

/// Build an index over `catalog` with default settings.
pub fn build_index(catalog: Vec<Campaign>) -> CampaignIndex {
    CampaignIndex::build(catalog)
}

pub fn search(index: &CampaignIndex, query: &str, top_k: usize) -> Vec<RetrievalResult> {
    index.search(query, top_k)
}

/// Build-once holder for a campaign index.
///
/// `build_index` may succeed once per retriever. Searches before that fail
/// with [`AdvisorError::IndexNotBuilt`]. Once built, the index is shared
/// read-only across threads.
#[derive(Debug, Default)]
pub struct CaseRetriever {
    config: RetrievalConfig,
    index: OnceLock<CampaignIndex>,
}

impl CaseRetriever {
    pub fn new(config: RetrievalConfig) -> Self {
        Self {
            config,
            index: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn build_index(&self, catalog: Vec<Campaign>) -> AdvisorResult<()> {
        if self.is_ready() {
            return Err(AdvisorError::IndexAlreadyBuilt);
        }
        let index = CampaignIndex::with_config(catalog, &self.config);
        self.index
            .set(index)
            .map_err(|_| AdvisorError::IndexAlreadyBuilt)
    }

    pub fn is_ready(&self) -> bool {
        self.index.get().is_some()
    }

    pub fn index(&self) -> AdvisorResult<&CampaignIndex> {
        self.index.get().ok_or(AdvisorError::IndexNotBuilt)
    }

    /// Search the built index. `top_k` falls back to the configured default.
    pub fn search(&self, query: &str, top_k: Option<usize>) -> AdvisorResult<Vec<RetrievalResult>> {
        let index = self.index()?;
        Ok(index.search(query, top_k.unwrap_or(self.config.top_k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: &str, tag: &str, segment: &str, mix: &str, factors: &str) -> Campaign {
        Campaign {
            campaign_id: id.into(),
            strategy_tag: tag.into(),
            target_segment: segment.into(),
            content_mix: mix.into(),
            resource_positions: String::new(),
            discount: String::new(),
            roi: 1.0,
            arpu_lift: 0.01,
            success_factors: factors.into(),
            start_date: None,
            end_date: None,
            revenue_lift: None,
            budget_used: None,
        }
    }

    fn word_boundary() -> RetrievalConfig {
        RetrievalConfig {
            tokenizer: TokenizerKind::WordBoundary,
            ..RetrievalConfig::default()
        }
    }

    fn english_catalog() -> Vec<Campaign> {
        vec![
            campaign("a", "family promo", "family heavy", "drama", "friday peak"),
            campaign("b", "anime free", "kids parents", "anime", "holiday hotspot"),
            campaign("c", "variety week", "light users", "variety", "new show launch"),
        ]
    }

    #[test]
    fn single_document_scores_one() {
        let index = CampaignIndex::with_config(
            vec![campaign("only", "family promo", "all", "drama", "peak")],
            &word_boundary(),
        );
        let results = index.search("family", 3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].campaign_id, "only");
        assert_eq!(results[0].similarity_score, 1.0);
        assert_eq!(results[0].rank, 1);
        assert!(results[0].raw_score > 0.0);
    }

    #[test]
    fn top_k_zero_returns_nothing() {
        let index = CampaignIndex::with_config(english_catalog(), &word_boundary());
        assert!(index.search("family", 0).is_empty());
    }

    #[test]
    fn empty_catalog_returns_nothing() {
        let index = CampaignIndex::with_config(Vec::new(), &word_boundary());
        assert!(index.is_empty());
        assert!(index.search("family", 3).is_empty());
    }

    #[test]
    fn success_factors_find_their_campaign() {
        let index = CampaignIndex::with_config(english_catalog(), &word_boundary());
        for c in english_catalog() {
            let results = index.search(&c.success_factors, 3);
            assert_eq!(results[0].campaign_id, c.campaign_id);
            assert_eq!(results[0].similarity_score, 1.0);
        }
    }

    #[test]
    fn no_overlap_keeps_catalog_order_and_zero_scores() {
        let index = CampaignIndex::with_config(english_catalog(), &word_boundary());
        let results = index.search("unrelated words", 2);
        let ids: Vec<&str> = results.iter().map(|r| r.campaign_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(results.iter().all(|r| r.similarity_score == 0.0));
    }

    #[test]
    fn scores_are_normalized_and_descending() {
        let index = CampaignIndex::with_config(english_catalog(), &word_boundary());
        let results = index.search("family anime peak", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].similarity_score, 1.0);
        for pair in results.windows(2) {
            assert!(pair[0].raw_score >= pair[1].raw_score);
            assert!((0.0..=1.0).contains(&pair[1].similarity_score));
        }
    }

    #[test]
    fn campaign_lookup_by_id() {
        let index = CampaignIndex::with_config(english_catalog(), &word_boundary());
        assert_eq!(index.campaign("b").unwrap().strategy_tag, "anime free");
        assert!(index.campaign("zzz").is_none());
        assert_eq!(index.tokenizer_name(), "word_boundary");
    }

    #[test]
    fn retriever_requires_build() {
        let retriever = CaseRetriever::new(word_boundary());
        assert!(!retriever.is_ready());
        assert_eq!(
            retriever.search("family", None),
            Err(AdvisorError::IndexNotBuilt)
        );
    }

    #[test]
    fn retriever_builds_once() {
        let retriever = CaseRetriever::new(word_boundary());
        assert_eq!(retriever.config().tokenizer, TokenizerKind::WordBoundary);
        retriever.build_index(english_catalog()).unwrap();
        assert!(retriever.is_ready());
        assert_eq!(
            retriever.build_index(english_catalog()),
            Err(AdvisorError::IndexAlreadyBuilt)
        );
        let results = retriever.search("variety", None).unwrap();
        assert_eq!(results.len(), DEFAULT_TOP_K);
        assert_eq!(results[0].campaign_id, "c");
    }

    #[test]
    fn concurrent_searches_agree() {
        let retriever = CaseRetriever::new(word_boundary());
        retriever.build_index(english_catalog()).unwrap();
        let expected = retriever.search("holiday anime", Some(2)).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| retriever.search("holiday anime", Some(2)).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn config_deserializes_with_partial_overrides() {
        let config: RetrievalConfig =
            serde_json::from_str(r#"{"tokenizer": "word_boundary", "bm25": {"k1": 1.2}}"#)
                .unwrap();
        assert_eq!(config.tokenizer, TokenizerKind::WordBoundary);
        assert_eq!(config.bm25.k1, 1.2);
        assert_eq!(config.bm25.b, 0.75);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }
}
