//! Deterministic campaign effect projection.
//!
//! The model is multiplicative around a baseline ARPU:
//!
//!   arpu = baseline × content_effect × resource_effect × capacity_penalty
//!
//! - content effect: fixed bonuses when the primary or secondary content
//!   category crosses its share threshold;
//! - resource effect: `1 + Σ usage × elasticity` over known positions;
//! - capacity penalty: a single global multiplier once any position runs
//!   above its safety share of max capacity.
//!
//! Cost is priced per 10k reached users against an assumed reachable base;
//! revenue assumes that base for the whole campaign length.

use std::collections::BTreeMap;

use growth_engine::policy::{
    BASELINE_ARPU, CAMPAIGN_DAYS, CAPACITY_PENALTY, CAPACITY_SAFETY_RATIO, PRIMARY_CONTENT,
    PRIMARY_CONTENT_BONUS, PRIMARY_CONTENT_MIN_SHARE, REACH_BASE, REACH_UNIT, SECONDARY_CONTENT,
    SECONDARY_CONTENT_BONUS, SECONDARY_CONTENT_MIN_SHARE,
};
use serde::{Deserialize, Serialize};

use crate::capacity::CapacityTable;
use crate::error::{AdvisorError, AdvisorResult};
use crate::types::SimulationResult;

/// Content category → share in percent. Shares need not sum to 100.
pub type ContentRatio = BTreeMap<String, f64>;

/// Resource position → usage fraction in [0, 1].
pub type ResourceUsage = BTreeMap<String, f64>;

/// Fixed policy constants of the simulation model.
///
/// The content bonus matches exactly two named categories. Adding categories
/// to the catalog does not extend it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationPolicy {
    pub primary_content: String,
    pub primary_min_share: f64,
    pub primary_bonus: f64,
    pub secondary_content: String,
    pub secondary_min_share: f64,
    pub secondary_bonus: f64,
    pub capacity_safety_ratio: f64,
    pub capacity_penalty: f64,
    /// Reachable daily audience assumed for cost and revenue.
    pub reach_base: f64,
    pub campaign_days: f64,
}

impl Default for SimulationPolicy {
    fn default() -> Self {
        Self {
            primary_content: PRIMARY_CONTENT.to_string(),
            primary_min_share: PRIMARY_CONTENT_MIN_SHARE,
            primary_bonus: PRIMARY_CONTENT_BONUS,
            secondary_content: SECONDARY_CONTENT.to_string(),
            secondary_min_share: SECONDARY_CONTENT_MIN_SHARE,
            secondary_bonus: SECONDARY_CONTENT_BONUS,
            capacity_safety_ratio: CAPACITY_SAFETY_RATIO,
            capacity_penalty: CAPACITY_PENALTY,
            reach_base: REACH_BASE,
            campaign_days: CAMPAIGN_DAYS,
        }
    }
}

/// Projects ARPU, cost and ROI for a content/resource plan.
#[derive(Clone, Debug)]
pub struct EffectSimulator {
    baseline_arpu: f64,
    policy: SimulationPolicy,
}

impl Default for EffectSimulator {
    fn default() -> Self {
        Self {
            baseline_arpu: BASELINE_ARPU,
            policy: SimulationPolicy::default(),
        }
    }
}

impl EffectSimulator {
    pub fn new(baseline_arpu: f64) -> AdvisorResult<Self> {
        Self::with_policy(baseline_arpu, SimulationPolicy::default())
    }

    pub fn with_policy(baseline_arpu: f64, policy: SimulationPolicy) -> AdvisorResult<Self> {
        if !baseline_arpu.is_finite() || baseline_arpu <= 0.0 {
            return Err(AdvisorError::InvalidBaseline(baseline_arpu));
        }
        Ok(Self {
            baseline_arpu,
            policy,
        })
    }

    pub fn baseline_arpu(&self) -> f64 {
        self.baseline_arpu
    }

    pub fn policy(&self) -> &SimulationPolicy {
        &self.policy
    }

    pub fn simulate(
        &self,
        content_ratio: &ContentRatio,
        resource_usage: &ResourceUsage,
        capacity: &CapacityTable,
    ) -> AdvisorResult<SimulationResult> {
        for (position, &usage) in resource_usage {
            if !(0.0..=1.0).contains(&usage) {
                return Err(AdvisorError::InvalidUsage {
                    position: position.clone(),
                    value: usage,
                });
            }
        }

        let policy = &self.policy;
        let content_effect = self.content_effect(content_ratio);

        let mut resource_effect = 1.0;
        let mut capacity_penalty = 1.0;
        let mut total_cost = 0.0;

        for (name, &usage) in resource_usage {
            let Some(position) = capacity.get(name) else {
                log::debug!("resource_position={} not in capacity table, ignored", name);
                continue;
            };

            resource_effect += usage * position.elasticity;

            if usage > policy.capacity_safety_ratio * position.max_capacity_fraction {
                log::debug!(
                    "resource_position={} usage={} exceeds {}x max_capacity={}",
                    name,
                    usage,
                    policy.capacity_safety_ratio,
                    position.max_capacity_fraction
                );
                capacity_penalty = policy.capacity_penalty;
            }

            total_cost += (policy.reach_base / REACH_UNIT) * usage * position.cost_per_10k_reach;
        }

        let estimated_arpu =
            self.baseline_arpu * content_effect * resource_effect * capacity_penalty;
        let estimated_revenue = estimated_arpu * policy.reach_base * policy.campaign_days;
        let roi = if total_cost > 0.0 {
            estimated_revenue / total_cost
        } else {
            0.0
        };
        let arpu_lift_absolute = estimated_arpu - self.baseline_arpu;

        Ok(SimulationResult {
            estimated_arpu,
            arpu_lift_absolute,
            arpu_lift_pct: arpu_lift_absolute / self.baseline_arpu * 100.0,
            total_cost,
            estimated_revenue,
            roi,
            capacity_warning: capacity_penalty < 1.0,
        })
    }

    fn content_effect(&self, content_ratio: &ContentRatio) -> f64 {
        let policy = &self.policy;
        let share = |category: &str| content_ratio.get(category).copied().unwrap_or(0.0);

        let mut effect = 1.0;
        if share(&policy.primary_content) > policy.primary_min_share {
            effect += policy.primary_bonus;
        }
        if share(&policy.secondary_content) > policy.secondary_min_share {
            effect += policy.secondary_bonus;
        }
        effect
    }
}

/// Simulate a plan against the default policy.
pub fn simulate(
    content_ratio: &ContentRatio,
    resource_usage: &ResourceUsage,
    capacity_table: &CapacityTable,
    baseline_arpu: f64,
) -> AdvisorResult<SimulationResult> {
    EffectSimulator::new(baseline_arpu)?.simulate(content_ratio, resource_usage, capacity_table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourcePosition;

    fn capacity() -> CapacityTable {
        CapacityTable::new(vec![
            ResourcePosition {
                name: "首页位1".into(),
                max_capacity_fraction: 0.8,
                cost_per_10k_reach: 150.0,
                elasticity: 0.12,
            },
            ResourcePosition {
                name: "首页位3".into(),
                max_capacity_fraction: 0.7,
                cost_per_10k_reach: 100.0,
                elasticity: 0.10,
            },
            ResourcePosition {
                name: "详情页推荐".into(),
                max_capacity_fraction: 0.6,
                cost_per_10k_reach: 60.0,
                elasticity: 0.08,
            },
        ])
        .unwrap()
    }

    fn ratio(pairs: &[(&str, f64)]) -> ContentRatio {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn default_simulator_uses_policy_baseline() {
        let sim = EffectSimulator::default();
        assert_eq!(sim.baseline_arpu(), BASELINE_ARPU);
        assert_eq!(sim.policy(), &SimulationPolicy::default());
    }

    #[test]
    fn empty_plan_costs_nothing() {
        let result = simulate(&ContentRatio::new(), &ResourceUsage::new(), &capacity(), 0.092)
            .unwrap();
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.roi, 0.0);
        assert!((result.estimated_arpu - 0.092).abs() < 1e-15);
        assert_eq!(result.arpu_lift_absolute, 0.0);
        assert!(!result.capacity_warning);
    }

    #[test]
    fn family_drama_plan_matches_hand_computation() {
        let content = ratio(&[("家庭剧", 70.0), ("动漫", 20.0), ("综艺", 10.0)]);
        let usage = ratio(&[("首页位1", 0.6)]);
        let result = simulate(&content, &usage, &capacity(), 0.092).unwrap();

        let arpu = 0.092 * 1.10 * (1.0 + 0.6 * 0.12);
        let cost = 470.0 * 0.6 * 150.0;
        let revenue = arpu * 4_700_000.0 * 7.0;
        assert!((result.estimated_arpu - arpu).abs() < 1e-12);
        assert!((result.total_cost - cost).abs() < 1e-6);
        assert!((result.estimated_revenue - revenue).abs() < 1e-6);
        assert!((result.roi - revenue / cost).abs() < 1e-9);
        assert!((result.arpu_lift_pct - (arpu - 0.092) / 0.092 * 100.0).abs() < 1e-9);
        assert!(!result.capacity_warning);
    }

    #[test]
    fn both_content_bonuses_stack() {
        let content = ratio(&[("家庭剧", 61.0), ("动漫", 31.0)]);
        let result = simulate(&content, &ResourceUsage::new(), &capacity(), 0.1).unwrap();
        assert!((result.estimated_arpu - 0.1 * 1.15).abs() < 1e-12);
    }

    #[test]
    fn content_thresholds_are_strict() {
        let content = ratio(&[("家庭剧", 60.0), ("动漫", 30.0)]);
        let result = simulate(&content, &ResourceUsage::new(), &capacity(), 0.1).unwrap();
        assert_eq!(result.estimated_arpu, 0.1);
    }

    #[test]
    fn unknown_positions_are_ignored() {
        let usage = ratio(&[("开屏广告", 0.9)]);
        let result = simulate(&ContentRatio::new(), &usage, &capacity(), 0.092).unwrap();
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.roi, 0.0);
        assert!(!result.capacity_warning);
    }

    #[test]
    fn over_capacity_applies_single_penalty() {
        // Both positions above 80% of max; penalty still applied once.
        let usage = ratio(&[("首页位1", 0.7), ("首页位3", 0.6)]);
        let result = simulate(&ContentRatio::new(), &usage, &capacity(), 0.092).unwrap();
        let expected = 0.092 * (1.0 + 0.7 * 0.12 + 0.6 * 0.10) * 0.85;
        assert!(result.capacity_warning);
        assert!((result.estimated_arpu - expected).abs() < 1e-12);
    }

    #[test]
    fn usage_at_safety_ratio_is_not_penalized() {
        let table = CapacityTable::new(vec![ResourcePosition {
            name: "slot".into(),
            max_capacity_fraction: 1.0,
            cost_per_10k_reach: 10.0,
            elasticity: 0.0,
        }])
        .unwrap();
        let at = simulate(&ContentRatio::new(), &ratio(&[("slot", 0.8)]), &table, 0.1).unwrap();
        let over = simulate(&ContentRatio::new(), &ratio(&[("slot", 0.81)]), &table, 0.1).unwrap();
        assert!(!at.capacity_warning);
        assert!(over.capacity_warning);
        assert_eq!(over.estimated_arpu, at.estimated_arpu * 0.85);
    }

    #[test]
    fn rejects_bad_baseline_and_usage() {
        assert_eq!(
            simulate(&ContentRatio::new(), &ResourceUsage::new(), &capacity(), 0.0),
            Err(AdvisorError::InvalidBaseline(0.0))
        );
        assert!(matches!(
            simulate(&ContentRatio::new(), &ratio(&[("首页位1", 1.2)]), &capacity(), 0.092),
            Err(AdvisorError::InvalidUsage { .. })
        ));
        assert!(matches!(
            simulate(&ContentRatio::new(), &ratio(&[("首页位1", f64::NAN)]), &capacity(), 0.092),
            Err(AdvisorError::InvalidUsage { .. })
        ));
    }

    #[test]
    fn custom_policy_changes_reach_and_days() {
        let policy = SimulationPolicy {
            reach_base: 1_000_000.0,
            campaign_days: 3.0,
            ..SimulationPolicy::default()
        };
        let sim = EffectSimulator::with_policy(0.1, policy).unwrap();
        assert_eq!(sim.baseline_arpu(), 0.1);
        assert_eq!(sim.policy().campaign_days, 3.0);
        assert_eq!(sim.policy().primary_content, "家庭剧");
        let result = sim
            .simulate(&ContentRatio::new(), &ratio(&[("详情页推荐", 0.3)]), &capacity())
            .unwrap();
        let arpu = 0.1 * (1.0 + 0.3 * 0.08);
        assert!((result.total_cost - 100.0 * 0.3 * 60.0).abs() < 1e-9);
        assert!((result.estimated_revenue - arpu * 3_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn policy_deserializes_with_partial_overrides() {
        let policy: SimulationPolicy =
            serde_json::from_str(r#"{"campaign_days": 14, "capacity_penalty": 0.9}"#).unwrap();
        assert_eq!(policy.campaign_days, 14.0);
        assert_eq!(policy.capacity_penalty, 0.9);
        assert_eq!(policy.primary_content, "家庭剧");
        assert_eq!(policy.reach_base, 4_700_000.0);
    }
}
