use growth_engine::policy::DEFAULT_TOP_K;

use crate::selector::Selector;
use crate::types::CaseCandidate;

/// Keeps the `k` highest-scoring catalog entries.
pub struct TopKSelector {
    pub k: usize,
}

impl Default for TopKSelector {
    fn default() -> Self {
        Self { k: DEFAULT_TOP_K }
    }
}

impl Selector<CaseCandidate> for TopKSelector {
    fn score(&self, candidate: &CaseCandidate) -> f64 {
        candidate.score
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
