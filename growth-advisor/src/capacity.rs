//! Resource-position capacity table.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::ResourcePosition;

/// Validated lookup of resource positions by name, in feed order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CapacityTable {
    positions: Vec<ResourcePosition>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl CapacityTable {
    /// Validate every row: capacity in (0, 1], finite non-negative cost,
    /// finite elasticity, unique names.
    pub fn new(positions: Vec<ResourcePosition>) -> AdvisorResult<Self> {
        let mut by_name = HashMap::with_capacity(positions.len());

        for (i, p) in positions.iter().enumerate() {
            let cap = p.max_capacity_fraction;
            if !(cap > 0.0 && cap <= 1.0) {
                return Err(AdvisorError::InvalidCapacity {
                    position: p.name.clone(),
                    value: cap,
                });
            }
            if !p.cost_per_10k_reach.is_finite() || p.cost_per_10k_reach < 0.0 {
                return Err(AdvisorError::InvalidPositionParameter {
                    position: p.name.clone(),
                    field: "cost_per_10k_reach",
                    value: p.cost_per_10k_reach,
                });
            }
            if !p.elasticity.is_finite() {
                return Err(AdvisorError::InvalidPositionParameter {
                    position: p.name.clone(),
                    field: "elasticity",
                    value: p.elasticity,
                });
            }
            if by_name.insert(p.name.clone(), i).is_some() {
                return Err(AdvisorError::DuplicatePosition(p.name.clone()));
            }
        }

        Ok(Self { positions, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&ResourcePosition> {
        self.by_name.get(name).map(|&i| &self.positions[i])
    }

    pub fn positions(&self) -> &[ResourcePosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
