use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use growth_engine::policy::{MILD_Z, MODERATE_Z, SEVERE_Z};

// ---------------------------------------------------------------------------
// Daily metrics
// ---------------------------------------------------------------------------

/// One raw row of the daily metrics feed, as handed over by the loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricRow {
    pub date: NaiveDate,
    #[serde(alias = "dau")]
    pub daily_active_users: u64,
    pub revenue: f64,
    #[serde(default)]
    pub is_holiday: bool,
    /// Newly paying members that day, when the feed carries it.
    #[serde(default)]
    pub new_members: Option<u64>,
    #[serde(default)]
    pub renew_members: Option<u64>,
}

/// A validated daily row with derived fields cached at series construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub daily_active_users: u64,
    pub revenue: f64,
    pub is_holiday: bool,
    pub new_members: Option<u64>,
    pub renew_members: Option<u64>,

    // Derived fields (populated by MetricSeries::new)
    /// Revenue per daily active user.
    pub arpu: f64,
    /// Day-over-day change in percent; 0 on the first row.
    pub arpu_change_pct: f64,
    pub dau_change_pct: f64,
    pub revenue_change_pct: f64,
    /// Trailing 7-row mean of raw ARPU (expanding at the start).
    pub arpu_moving_avg_7d: f64,
    /// Trailing 7-row sample standard deviation of raw ARPU. A one-row window
    /// takes the full-series value; absent only for a single-row series.
    pub arpu_moving_stddev_7d: Option<f64>,
    /// New plus renewed members per hundred DAU. Absent unless both counts
    /// are present.
    pub conversion_rate: Option<f64>,
}

/// Snapshot of the most recent day, for headline cards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub date: NaiveDate,
    pub daily_active_users: u64,
    pub revenue: f64,
    pub arpu: f64,
    pub dau_change_pct: f64,
    pub revenue_change_pct: f64,
    pub arpu_change_pct: f64,
    pub conversion_rate: Option<f64>,
}

// ---------------------------------------------------------------------------
// Anomaly detection output
// ---------------------------------------------------------------------------

/// How far a day's ARPU sits from its local trend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Classify an absolute z-score. An undefined z-score is Normal.
    pub fn from_z_score(z: Option<f64>) -> Self {
        match z.map(f64::abs) {
            Some(z) if z > SEVERE_Z => Severity::Severe,
            Some(z) if z > MODERATE_Z => Severity::Moderate,
            Some(z) if z > MILD_Z => Severity::Mild,
            _ => Severity::Normal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "Normal"),
            Severity::Mild => write!(f, "Mild"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Severe => write!(f, "Severe"),
        }
    }
}

/// An anomalous day, as returned to the orchestration layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub date: NaiveDate,
    pub arpu: f64,
    pub z_score: f64,
    pub severity: Severity,
    #[serde(rename = "dau")]
    pub daily_active_users: u64,
    pub revenue: f64,
}

/// Detector annotation for one row of the series, anomalous or not.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredDay {
    pub date: NaiveDate,
    pub arpu: f64,
    /// ARPU with the holiday baseline shift removed.
    pub adjusted_arpu: f64,
    pub moving_average: f64,
    /// Trailing spread after zero-substitution. Absent for one-row windows.
    pub moving_stddev: Option<f64>,
    /// Absent when the spread is undefined or zero.
    pub z_score: Option<f64>,
    pub severity: Severity,
    pub dau_change_pct: f64,
    pub is_anomaly: bool,
}

// ---------------------------------------------------------------------------
// Effect simulation
// ---------------------------------------------------------------------------

/// One row of the resource-capacity table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourcePosition {
    #[serde(alias = "resource_position")]
    pub name: String,
    /// Share of total traffic this slot can carry, in (0, 1].
    #[serde(alias = "max_capacity")]
    pub max_capacity_fraction: f64,
    #[serde(alias = "cost_per_10k")]
    pub cost_per_10k_reach: f64,
    /// Marginal ARPU lift per unit of usage fraction.
    pub elasticity: f64,
}

/// Projected outcome of a campaign plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub estimated_arpu: f64,
    pub arpu_lift_absolute: f64,
    pub arpu_lift_pct: f64,
    pub total_cost: f64,
    pub estimated_revenue: f64,
    pub roi: f64,
    pub capacity_warning: bool,
}

// ---------------------------------------------------------------------------
// Case retrieval
// ---------------------------------------------------------------------------

/// A historical campaign in the experience catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub strategy_tag: String,
    pub target_segment: String,
    /// Free-text content mix, e.g. `"家庭剧70%+动漫30%"`.
    pub content_mix: String,
    pub resource_positions: String,
    pub discount: String,
    pub roi: f64,
    pub arpu_lift: f64,
    pub success_factors: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Display text such as `"+18%"`.
    #[serde(default)]
    pub revenue_lift: Option<String>,
    #[serde(default)]
    pub budget_used: Option<f64>,
}

impl Campaign {
    /// The text indexed for lexical retrieval.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.strategy_tag, self.target_segment, self.success_factors, self.content_mix
        )
    }
}

/// A catalog entry with its raw BM25 score, before selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaseCandidate {
    /// Position in the catalog.
    pub position: usize,
    pub score: f64,
}

/// A catalog match for a free-text query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrievalResult {
    /// 1-based position in the result list.
    pub rank: usize,
    pub campaign_id: String,
    /// Score divided by the best score in this result set, in [0, 1].
    pub similarity_score: f64,
    /// Unnormalized BM25 score.
    pub raw_score: f64,
    pub strategy_tag: String,
    pub target_segment: String,
    pub roi: f64,
    pub arpu_lift: f64,
    pub success_factors: String,
}
