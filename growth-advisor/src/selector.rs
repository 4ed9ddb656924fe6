use std::cmp::Ordering;

use crate::util;

/// Final ranking stage: order scored candidates and cut the list.
///
/// Case retrieval hands over one candidate per catalog entry, in catalog
/// order, and relies on two properties of the default `sort`: it is stable,
/// which is what breaks score ties by catalog position, and NaN scores never
/// reach the top of the result.
pub trait Selector<C>: Send + Sync
where
    C: Clone + Send + Sync + 'static,
{
    /// Sort, then truncate to `size()` when set.
    fn select(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Score used for ordering. For catalog candidates this is the raw BM25
    /// score, before max-normalization.
    fn score(&self, candidate: &C) -> f64;

    /// Sort candidates by score, descending.
    ///
    /// `sort_by` is stable: candidates with equal scores keep the order they
    /// arrived in. Overriding this must preserve that, or retrieval ties stop
    /// being deterministic.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let sa = self.score(a);
            let sb = self.score(b);
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
            }
        });
        sorted
    }

    /// Maximum number of candidates to keep. No truncation by default.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
