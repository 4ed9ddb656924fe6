//! Calendar-aware ARPU anomaly detection.
//!
//! # Algorithm
//!
//! 1. Split the series into holiday and workday rows and take the mean ARPU of
//!    each (an empty subset falls back to the overall mean).
//! 2. Remove the holiday baseline shift: holiday rows subtract
//!    `holiday_mean - workday_mean`, workday rows pass through.
//! 3. Rolling mean and sample standard deviation of the adjusted ARPU over a
//!    trailing window that expands from one observation.
//! 4. A spread of exactly zero is replaced by the full-series standard
//!    deviation of the raw ARPU.
//! 5. `z = (adjusted - mean) / spread`. Undefined spreads leave `z` undefined.
//! 6. A day is anomalous when `|z|` exceeds the threshold and the DAU moved
//!    less than the guard percentage. A large DAU swing explains an ARPU
//!    swing by dilution, so those days are left to the DAU monitor.
//! 7. Severity bands are assigned from `|z|` on every row, flagged or not.

use chrono::NaiveDate;
use growth_engine::policy::{ANOMALY_WINDOW, ANOMALY_Z_THRESHOLD, DAU_GUARD_PCT};
use growth_engine::stats::{mean, sample_std_dev, substitute_zero_spread, trailing_window_stats};
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, AdvisorResult};
use crate::metric_series::MetricSeries;
use crate::types::{AnomalyRecord, ScoredDay, Severity};

/// Tunables for the detector. Every field falls back to its policy default
/// when omitted from a config document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Absolute z-score a day must exceed to be flagged.
    pub threshold: f64,
    /// Trailing window, in rows.
    pub window: usize,
    /// Days whose |DAU change %| reaches this value are never flagged.
    pub dau_guard_pct: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: ANOMALY_Z_THRESHOLD,
            window: ANOMALY_WINDOW,
            dau_guard_pct: DAU_GUARD_PCT,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> AdvisorResult<()> {
        if self.window == 0 {
            return Err(AdvisorError::InvalidWindow);
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(AdvisorError::InvalidThreshold(self.threshold));
        }
        if !self.dau_guard_pct.is_finite() || self.dau_guard_pct < 0.0 {
            return Err(AdvisorError::InvalidDauGuard(self.dau_guard_pct));
        }
        Ok(())
    }
}

/// Stateless detector; safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> AdvisorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Annotate every row of the series. The input is left untouched.
    pub fn score_series(&self, series: &MetricSeries) -> Vec<ScoredDay> {
        let arpu = series.arpu();
        let adjusted = holiday_adjusted_arpu(series);
        let window_stats = trailing_window_stats(&adjusted, self.config.window);
        let fallback_spread = sample_std_dev(&arpu);

        let scored: Vec<ScoredDay> = series
            .iter()
            .zip(adjusted.iter().zip(window_stats.iter()))
            .map(|(row, (&adjusted_arpu, stats))| {
                let spread = substitute_zero_spread(stats.std_dev, fallback_spread);
                let z_score = z_score(adjusted_arpu, stats.mean, spread);
                let severity = Severity::from_z_score(z_score);
                let is_anomaly = match z_score {
                    Some(z) => {
                        z.abs() > self.config.threshold
                            && row.dau_change_pct.abs() < self.config.dau_guard_pct
                    }
                    None => false,
                };

                ScoredDay {
                    date: row.date,
                    arpu: row.arpu,
                    adjusted_arpu,
                    moving_average: stats.mean,
                    moving_stddev: spread,
                    z_score,
                    severity,
                    dau_change_pct: row.dau_change_pct,
                    is_anomaly,
                }
            })
            .collect();

        log::debug!(
            "scored_days={} anomalies={} window={} threshold={}",
            scored.len(),
            scored.iter().filter(|d| d.is_anomaly).count(),
            self.config.window,
            self.config.threshold
        );

        scored
    }

    /// Anomalous days in date order. Empty when nothing crosses the threshold.
    pub fn detect(&self, series: &MetricSeries) -> Vec<AnomalyRecord> {
        self.score_series(series)
            .into_iter()
            .zip(series.iter())
            .filter(|(scored, _)| scored.is_anomaly)
            .filter_map(|(scored, row)| {
                scored.z_score.map(|z_score| AnomalyRecord {
                    date: row.date,
                    arpu: row.arpu,
                    z_score,
                    severity: scored.severity,
                    daily_active_users: row.daily_active_users,
                    revenue: row.revenue,
                })
            })
            .collect()
    }

    /// Dates of the anomalous days only.
    pub fn anomaly_dates(&self, series: &MetricSeries) -> Vec<NaiveDate> {
        self.detect(series).into_iter().map(|a| a.date).collect()
    }
}

/// Detect anomalies with optional overrides of the default threshold and window.
pub fn detect_anomalies(
    series: &MetricSeries,
    threshold: Option<f64>,
    window: Option<usize>,
) -> AdvisorResult<Vec<AnomalyRecord>> {
    Ok(detector_with(threshold, window)?.detect(series))
}

/// Dates of the anomalous days, with the same overrides as [`detect_anomalies`].
pub fn anomaly_dates(
    series: &MetricSeries,
    threshold: Option<f64>,
    window: Option<usize>,
) -> AdvisorResult<Vec<NaiveDate>> {
    Ok(detector_with(threshold, window)?.anomaly_dates(series))
}

fn detector_with(threshold: Option<f64>, window: Option<usize>) -> AdvisorResult<AnomalyDetector> {
    let defaults = DetectorConfig::default();
    AnomalyDetector::new(DetectorConfig {
        threshold: threshold.unwrap_or(defaults.threshold),
        window: window.unwrap_or(defaults.window),
        ..defaults
    })
}

/// ARPU with the holiday baseline shift removed.
fn holiday_adjusted_arpu(series: &MetricSeries) -> Vec<f64> {
    let arpu = series.arpu();
    let (holiday, workday): (Vec<_>, Vec<_>) = series
        .iter()
        .map(|r| (r.is_holiday, r.arpu))
        .partition(|(is_holiday, _)| *is_holiday);
    let holiday: Vec<f64> = holiday.into_iter().map(|(_, a)| a).collect();
    let workday: Vec<f64> = workday.into_iter().map(|(_, a)| a).collect();

    // Series is non-empty, so the overall mean exists.
    let overall = mean(&arpu).unwrap_or_default();
    let holiday_mean = mean(&holiday).unwrap_or(overall);
    let workday_mean = mean(&workday).unwrap_or(overall);
    let shift = holiday_mean - workday_mean;

    series
        .iter()
        .map(|r| if r.is_holiday { r.arpu - shift } else { r.arpu })
        .collect()
}

fn z_score(value: f64, mean: f64, spread: Option<f64>) -> Option<f64> {
    match spread {
        Some(s) if s > 0.0 && s.is_finite() => Some((value - mean) / s),
        _ => None,
    }
}
