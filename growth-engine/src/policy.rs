//! Centralized policy constants for the growth decision engines.
//!
//! These values are calibrated for a long-video membership business with a
//! daily active base of roughly 4.7M users. Changing a value here changes the
//! defaults of `DetectorConfig`, `SimulationPolicy` and `RetrievalConfig` in
//! `growth-advisor`; none of the algorithms hard-code them.

// ---------------------------------------------------------------------------
// Anomaly detection
// ---------------------------------------------------------------------------

/// Absolute z-score above which a day is considered anomalous.
pub const ANOMALY_Z_THRESHOLD: f64 = 1.5;

/// Trailing window (rows) for the moving average and standard deviation.
pub const ANOMALY_WINDOW: usize = 7;

/// Absolute day-over-day DAU change (percent) at or above which an ARPU swing
/// is attributed to dilution/concentration and not flagged.
pub const DAU_GUARD_PCT: f64 = 30.0;

/// Severity bands on absolute z-score. Independent of the anomaly threshold.
pub const SEVERE_Z: f64 = 2.5;
pub const MODERATE_Z: f64 = 2.0;
pub const MILD_Z: f64 = 1.5;

/// Window used for the cached `arpu_moving_*_7d` fields on each metric row.
pub const METRIC_MOVING_WINDOW: usize = 7;

// ---------------------------------------------------------------------------
// Effect simulation
// ---------------------------------------------------------------------------

/// Baseline ARPU used when the caller does not supply one.
pub const BASELINE_ARPU: f64 = 0.092;

/// Primary content category (family drama) and its bonus rule.
pub const PRIMARY_CONTENT: &str = "家庭剧";
pub const PRIMARY_CONTENT_MIN_SHARE: f64 = 60.0;
pub const PRIMARY_CONTENT_BONUS: f64 = 0.10;

/// Secondary content category (animation) and its bonus rule.
pub const SECONDARY_CONTENT: &str = "动漫";
pub const SECONDARY_CONTENT_MIN_SHARE: f64 = 30.0;
pub const SECONDARY_CONTENT_BONUS: f64 = 0.05;

/// Share of a position's max capacity above which the plan is penalized.
pub const CAPACITY_SAFETY_RATIO: f64 = 0.8;

/// Global ARPU multiplier applied once any position breaches its safety ratio.
pub const CAPACITY_PENALTY: f64 = 0.85;

/// Assumed reachable daily audience for cost and revenue projection.
pub const REACH_BASE: f64 = 4_700_000.0;

/// Cost table unit: cost is quoted per this many reached users.
pub const REACH_UNIT: f64 = 10_000.0;

/// Assumed campaign length in days for revenue projection.
pub const CAMPAIGN_DAYS: f64 = 7.0;

// ---------------------------------------------------------------------------
// Case retrieval
// ---------------------------------------------------------------------------

/// BM25 term-frequency saturation.
pub const BM25_K1: f64 = 1.5;

/// BM25 document-length normalization strength.
pub const BM25_B: f64 = 0.75;

/// Number of similar campaigns returned when the caller does not say.
pub const DEFAULT_TOP_K: usize = 3;
