/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Analysis horizon of a lowered system.
//!
//! The hyperperiod is the LCM of the periods of every periodic target node
//! (data generators and timers).  After one hyperperiod the release pattern of
//! the whole system repeats, so it bounds the horizon the model checker has to
//! explore.  Subscribers inherit their activation from upstream and add no
//! period of their own.

pub mod math;

use thiserror::Error;
use tracing::{info, warn};

use crate::lowering::target::TargetSystem;
use math::lcm_of_slice;

/// Default upper bound on the hyperperiod, in model time units.
pub const DEFAULT_HYPERPERIOD_LIMIT: u64 = 3_600_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HyperperiodError {
    /// No target node has a non-zero period.
    #[error("no periodic node with a non-zero period")]
    NoPeriodicNodes,

    #[error("LCM overflow computing lcm({a}, {b})")]
    Overflow { a: u64, b: u64 },

    /// The result exceeds the configured limit.  The caller decides whether
    /// this is fatal.
    #[error("hyperperiod {value} exceeds limit {limit}")]
    TooLarge { value: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    pub hyperperiod: u64,
    /// Sorted and deduplicated.
    pub unique_periods: Vec<u64>,
    /// Number of periodic nodes that contributed.
    pub node_count: usize,
}

impl HyperperiodInfo {
    /// How many times a node with `period` is released per hyperperiod.
    pub fn releases(&self, period: u64) -> u64 {
        if period == 0 {
            0
        } else {
            self.hyperperiod / period
        }
    }
}

/// Hyperperiod of `target`, rejected if above `limit`.
pub fn hyperperiod(target: &TargetSystem, limit: u64) -> Result<HyperperiodInfo, HyperperiodError> {
    let mut periods: Vec<u64> = target
        .nodes
        .iter()
        .filter_map(|n| n.period())
        .filter(|&p| p > 0)
        .collect();
    let node_count = periods.len();
    if node_count == 0 {
        warn!(system = %target.name, "no periodic nodes, hyperperiod undefined");
        return Err(HyperperiodError::NoPeriodicNodes);
    }

    periods.sort_unstable();
    periods.dedup();

    let value = lcm_of_slice(&periods)?;
    if value > limit {
        warn!(system = %target.name, hyperperiod = value, limit, "hyperperiod exceeds limit");
        return Err(HyperperiodError::TooLarge { value, limit });
    }

    info!(
        system = %target.name,
        hyperperiod = value,
        periodic_nodes = node_count,
        unique_periods = periods.len(),
        "hyperperiod computed"
    );

    Ok(HyperperiodInfo {
        hyperperiod: value,
        unique_periods: periods,
        node_count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
