/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Utilisation check of the lowered system.
//!
//! All target nodes share one single-threaded executor, so the executor is
//! overloaded in the long run when
//!
//! $$U = \sum_i \frac{C_i}{T_i} > 1$$
//!
//! where `C_i` is a task's WCET and `T_i` its activation period.  Periodic
//! nodes activate at their own period.  A subscriber activates at the period
//! of the periodic node found by following its trigger topic upstream; a
//! sub-task likewise at the period of the producer of its topic.  Tasks whose
//! period cannot be resolved contribute nothing.
//!
//! `U ≤ 1` is necessary, not sufficient: the model checker decides
//! schedulability.  Exceeding it is reported as a warning only.

use std::collections::BTreeMap;

use super::target::{Activation, TargetNode, TargetSystem};

/// Period of the periodic node at the head of the chain producing `topic`.
fn topic_period<'a>(target: &'a TargetSystem, mut topic: &'a str) -> Option<u64> {
    // Bounded walk: a producer chain longer than the node count is a cycle.
    for _ in 0..=target.nodes.len() {
        let producer = target.producer_of(topic)?;
        match &producer.activation {
            Activation::Periodic { period, .. } => return (*period > 0).then_some(*period),
            Activation::Topic { topic: upstream } => topic = upstream,
        }
    }
    None
}

/// Activation period of `node`, if resolvable.
pub fn activation_period(target: &TargetSystem, node: &TargetNode) -> Option<u64> {
    match &node.activation {
        Activation::Periodic { period, .. } => (*period > 0).then_some(*period),
        Activation::Topic { topic } => topic_period(target, topic),
    }
}

/// Resolved activation period per node name.
pub fn activation_periods(target: &TargetSystem) -> BTreeMap<String, u64> {
    target
        .nodes
        .iter()
        .filter_map(|n| activation_period(target, n).map(|p| (n.name.clone(), p)))
        .collect()
}

/// Executor utilisation of main tasks and sub-tasks.
pub fn utilization(target: &TargetSystem) -> f64 {
    let mut total = 0.0;
    for node in &target.nodes {
        if let Some(period) = activation_period(target, node) {
            total += node.wcet as f64 / period as f64;
        }
        for sub in &node.sub_tasks {
            if let Some(period) = topic_period(target, &sub.topic) {
                total += sub.wcet as f64 / period as f64;
            }
        }
    }
    total
}

/// `Some(U)` when the executor is overloaded (`U > 1`), `None` otherwise.
pub fn check_utilization(target: &TargetSystem) -> Option<f64> {
    let u = utilization(target);
    (u > 1.0).then_some(u)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::target::{ArchetypeKind, Monitor, SubTask, DEFAULT_DATA_SOURCE};

    fn target_node(name: &str, wcet: u64, activation: Activation, publishes: &str) -> TargetNode {
        TargetNode {
            kind: match activation {
                Activation::Periodic { .. } => ArchetypeKind::DataGenerator,
                Activation::Topic { .. } => ArchetypeKind::Subscriber,
            },
            name: name.into(),
            wcet,
            activation,
            publishes: publishes.into(),
            sub_tasks: vec![],
            data_source: DEFAULT_DATA_SOURCE.into(),
            priority: 0,
        }
    }

    fn topic(t: &str) -> Activation {
        Activation::Topic { topic: t.into() }
    }

    fn every(period: u64) -> Activation {
        Activation::Periodic { period, delay: 0 }
    }

    fn system(nodes: Vec<TargetNode>) -> TargetSystem {
        TargetSystem {
            name: "sys".into(),
            deterministic: true,
            monitor: Monitor::default(),
            nodes,
        }
    }

    #[test]
    fn subscriber_inherits_period_through_chain() {
        let target = system(vec![
            target_node("S1", 10, every(50), "SENSOR1"),
            target_node("F1", 5, topic("SENSOR1"), "FILTER1"),
            target_node("ACT", 5, topic("FILTER1"), "COMMAND"),
        ]);
        let periods = activation_periods(&target);
        assert_eq!(periods["S1"], 50);
        assert_eq!(periods["F1"], 50);
        assert_eq!(periods["ACT"], 50);
        assert!((utilization(&target) - 0.4).abs() < 1e-9);
        assert_eq!(check_utilization(&target), None);
    }

    #[test]
    fn sub_tasks_count_at_their_producer_period() {
        let mut fu = target_node("FU", 10, every(100), "FUSION");
        fu.sub_tasks.push(SubTask {
            topic: "SENSOR1".into(),
            wcet: 25,
        });
        let target = system(vec![target_node("S1", 0, every(50), "SENSOR1"), fu]);
        // 10/100 + 25/50
        assert!((utilization(&target) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn overload_is_reported() {
        let target = system(vec![
            target_node("S1", 40, every(50), "SENSOR1"),
            target_node("F1", 30, topic("SENSOR1"), "FILTER1"),
        ]);
        let u = check_utilization(&target).unwrap();
        assert!((u - 1.4).abs() < 1e-9);
    }

    #[test]
    fn unresolvable_topics_contribute_nothing() {
        let target = system(vec![
            target_node("A", 5, topic("B_OUT"), "A_OUT"),
            target_node("B", 5, topic("A_OUT"), "B_OUT"),
            target_node("C", 5, topic("NOBODY"), "C_OUT"),
        ]);
        assert!(activation_periods(&target).is_empty());
        assert_eq!(utilization(&target), 0.0);
    }
}
