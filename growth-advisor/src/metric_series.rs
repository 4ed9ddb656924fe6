//! Validated daily metric series with cached derived fields.
//!
//! Construction is the single validation point for the time series: once a
//! `MetricSeries` exists, every row has `dau > 0`, finite non-negative revenue
//! and a date strictly after its predecessor.

use std::ops::Index;

use chrono::NaiveDate;
use growth_engine::policy::METRIC_MOVING_WINDOW;
use growth_engine::stats::{pct_change, sample_std_dev, trailing_window_stats};
use serde::Serialize;

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::{DailyMetric, DailyMetricRow, MetricsSummary};

/// Read-only, date-ascending daily metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSeries {
    rows: Vec<DailyMetric>,
}

impl MetricSeries {
    /// Validate raw rows and compute derived fields once.
    pub fn new(rows: Vec<DailyMetricRow>) -> AdvisorResult<Self> {
        if rows.is_empty() {
            return Err(AdvisorError::EmptySeries);
        }

        for (i, row) in rows.iter().enumerate() {
            if row.daily_active_users == 0 {
                return Err(AdvisorError::ZeroDau { date: row.date });
            }
            if !row.revenue.is_finite() || row.revenue < 0.0 {
                return Err(AdvisorError::InvalidRevenue {
                    date: row.date,
                    value: row.revenue,
                });
            }
            if i > 0 && rows[i - 1].date >= row.date {
                return Err(AdvisorError::UnorderedDates {
                    previous: rows[i - 1].date,
                    current: row.date,
                });
            }
        }

        let arpu: Vec<f64> = rows
            .iter()
            .map(|r| r.revenue / r.daily_active_users as f64)
            .collect();
        let full_std = sample_std_dev(&arpu);
        let moving = trailing_window_stats(&arpu, METRIC_MOVING_WINDOW);

        let derived = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let (arpu_change_pct, dau_change_pct, revenue_change_pct) = if i == 0 {
                    (0.0, 0.0, 0.0)
                } else {
                    let prev = &rows[i - 1];
                    (
                        pct_change(arpu[i - 1], arpu[i]),
                        pct_change(prev.daily_active_users as f64, row.daily_active_users as f64),
                        pct_change(prev.revenue, row.revenue),
                    )
                };
                DailyMetric {
                    date: row.date,
                    daily_active_users: row.daily_active_users,
                    revenue: row.revenue,
                    is_holiday: row.is_holiday,
                    new_members: row.new_members,
                    renew_members: row.renew_members,
                    arpu: arpu[i],
                    arpu_change_pct,
                    dau_change_pct,
                    revenue_change_pct,
                    arpu_moving_avg_7d: moving[i].mean,
                    arpu_moving_stddev_7d: moving[i].std_dev.or(full_std),
                    conversion_rate: conversion_rate(row),
                }
            })
            .collect();

        Ok(Self { rows: derived })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyMetric> {
        self.rows.iter()
    }

    pub fn arpu(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.arpu).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Headline figures for the latest day.
    pub fn latest_summary(&self) -> MetricsSummary {
        // Non-empty by construction.
        let latest = &self.rows[self.rows.len() - 1];
        MetricsSummary {
            date: latest.date,
            daily_active_users: latest.daily_active_users,
            revenue: latest.revenue,
            arpu: latest.arpu,
            dau_change_pct: latest.dau_change_pct,
            revenue_change_pct: latest.revenue_change_pct,
            arpu_change_pct: latest.arpu_change_pct,
            conversion_rate: latest.conversion_rate,
        }
    }
}

/// Members gained or renewed per hundred daily active users.
fn conversion_rate(row: &DailyMetricRow) -> Option<f64> {
    let converted = row.new_members? + row.renew_members?;
    Some(converted as f64 / row.daily_active_users as f64 * 100.0)
}

impl Index<usize> for MetricSeries {
    type Output = DailyMetric;

    fn index(&self, index: usize) -> &DailyMetric {
        &self.rows[index]
    }
}

impl<'a> IntoIterator for &'a MetricSeries {
    type Item = &'a DailyMetric;
    type IntoIter = std::slice::Iter<'a, DailyMetric>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
