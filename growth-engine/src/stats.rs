//! Descriptive statistics shared by the detection and ranking engines.
//!
//! Means are computed relative to the first observation of the slice. A
//! constant slice therefore yields its value exactly and a spread of exactly
//! zero, which the detector relies on to tell a flat window from a noisy one.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (&first, _) = values.split_first()?;
    let shifted: f64 = values.iter().map(|v| v - first).sum();
    Some(first + shifted / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// `None` when fewer than two observations are available, matching the
/// convention that a single point has no measurable spread.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    let n = values.len() as f64;
    let shifted_mean = values.iter().map(|v| v - first).sum::<f64>() / n;
    let sum_sq: f64 = values
        .iter()
        .map(|v| {
            let d = (v - first) - shifted_mean;
            d * d
        })
        .sum();
    Some((sum_sq / (n - 1.0)).sqrt())
}

/// Trailing-window mean and sample standard deviation for one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    /// Number of observations that fell inside the window.
    pub observations: usize,
    pub mean: f64,
    /// `None` while the window holds a single observation.
    pub std_dev: Option<f64>,
}

/// Rolling statistics over a trailing window with a minimum of one
/// observation: the first `window - 1` positions use whatever history exists.
///
/// Returns one entry per input value. A `window` of zero is treated as one.
pub fn trailing_window_stats(values: &[f64], window: usize) -> Vec<WindowStats> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            WindowStats {
                observations: slice.len(),
                // Slice is never empty: it always contains values[i].
                mean: mean(slice).unwrap_or(values[i]),
                std_dev: sample_std_dev(slice),
            }
        })
        .collect()
}

/// Percent change from `previous` to `current`.
///
/// A zero previous value has no defined relative change and yields `0.0`, the
/// same neutral value the first row of a series receives.
pub fn pct_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Replace an exactly-zero spread with `fallback`.
///
/// Non-zero spreads pass through untouched. A missing spread stays missing.
pub fn substitute_zero_spread(spread: Option<f64>, fallback: Option<f64>) -> Option<f64> {
    match spread {
        Some(s) if s == 0.0 => fallback,
        other => other,
    }
}

/// Divide every score by the maximum score.
///
/// A non-positive or missing maximum normalizes by 1, so scores with no
/// signal degrade to themselves (typically 0) instead of becoming undefined.
pub fn normalize_by_max(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let divisor = if max > 0.0 { max } else { 1.0 };
    scores.iter().map(|s| s / divisor).collect()
}
