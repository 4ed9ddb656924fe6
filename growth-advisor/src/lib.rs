//! Decision support for membership growth operations.
//!
//! Three engines over resident data:
//!
//! - [`anomaly_detector`]: holiday-adjusted rolling z-scores on daily ARPU;
//! - [`effect_simulator`]: projected ARPU, cost and ROI for a campaign plan;
//! - [`case_retrieval`]: BM25 search over the historical campaign catalog.
//!
//! All engines are synchronous and side-effect free apart from logging.

pub mod anomaly_detector;
pub mod capacity;
pub mod case_retrieval;
pub mod components;
pub mod effect_simulator;
pub mod error;
pub mod metric_series;
pub mod selector;
pub mod types;
pub mod util;

pub use anomaly_detector::{anomaly_dates, detect_anomalies, AnomalyDetector, DetectorConfig};
pub use capacity::CapacityTable;
pub use case_retrieval::{build_index, search, CampaignIndex, CaseRetriever, RetrievalConfig};
pub use components::top_k_selector::TopKSelector;
pub use effect_simulator::{simulate, ContentRatio, EffectSimulator, ResourceUsage, SimulationPolicy};
pub use error::{AdvisorError, AdvisorResult};
pub use metric_series::MetricSeries;
pub use selector::Selector;
pub use types::{
    AnomalyRecord, Campaign, CaseCandidate, DailyMetric, DailyMetricRow, MetricsSummary,
    ResourcePosition, RetrievalResult, ScoredDay, Severity, SimulationResult,
};
