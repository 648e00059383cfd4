/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Reduced target model consumed by the timed-automaton analysis.
//!
//! ```text
//! System ──(validate, classify)──► Classification ──(lower)──► TargetSystem
//!  ↑ input, signed model units                                    ↑ output, unsigned
//! ```
//!
//! Every construct is one node of the single executor.  Channel names (topics)
//! are upper-cased, the convention of the target notation.

use serde::Serialize;

/// Data-source identifier used when a node has no hand-off variable: the
/// default variable carried along the synchronous channel.
pub const DEFAULT_DATA_SOURCE: &str = "pd";

// ── Archetype tag ─────────────────────────────────────────────────────────────

/// The three node shapes the target template library supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    /// Periodic source: one timer, one callback, no inputs.
    DataGenerator,
    /// Periodic aggregator: timer-driven main task fed by subscribed sub-tasks.
    Timer,
    /// Reactive node driven by a subscription.
    Subscriber,
}

impl ArchetypeKind {
    /// Position of the trigger kind in the executor's wait set: timers are
    /// considered before subscriptions.
    pub fn wait_set_rank(self) -> u8 {
        match self {
            ArchetypeKind::DataGenerator | ArchetypeKind::Timer => 0,
            ArchetypeKind::Subscriber => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArchetypeKind::DataGenerator => "data_generator",
            ArchetypeKind::Timer => "timer",
            ArchetypeKind::Subscriber => "subscriber",
        }
    }
}

// ── Target node ───────────────────────────────────────────────────────────────

/// How a target node is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// Timer-driven (data generators and timers).
    Periodic { period: u64, delay: u64 },
    /// Driven by messages on a topic (subscribers).
    Topic { topic: String },
}

/// A callback feeding the hand-off variable from a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubTask {
    pub topic: String,
    pub wcet: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetNode {
    pub kind: ArchetypeKind,
    pub name: String,
    /// WCET of the main task.
    pub wcet: u64,
    pub activation: Activation,
    /// Topic the main task publishes to.
    pub publishes: String,
    pub sub_tasks: Vec<SubTask>,
    pub data_source: String,
    /// Higher runs first when several nodes are ready in the same pass.
    pub priority: usize,
}

impl TargetNode {
    pub fn period(&self) -> Option<u64> {
        match self.activation {
            Activation::Periodic { period, .. } => Some(period),
            Activation::Topic { .. } => None,
        }
    }

    pub fn delay(&self) -> Option<u64> {
        match self.activation {
            Activation::Periodic { delay, .. } => Some(delay),
            Activation::Topic { .. } => None,
        }
    }

    pub fn trigger_topic(&self) -> Option<&str> {
        match &self.activation {
            Activation::Topic { topic } => Some(topic),
            Activation::Periodic { .. } => None,
        }
    }
}

// ── Target system ─────────────────────────────────────────────────────────────

/// Monitored actuator and the period it is observed with.  Carried through
/// unchanged for the analysis front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Monitor {
    pub actuator: Option<String>,
    pub period: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSystem {
    pub name: String,
    /// Execution times are fixed at their WCET (no best-case variation).
    pub deterministic: bool,
    pub monitor: Monitor,
    /// In priority order, highest first.
    pub nodes: Vec<TargetNode>,
}

impl TargetSystem {
    pub fn node(&self, name: &str) -> Option<&TargetNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Node publishing `topic` (already in target notation).
    pub fn producer_of(&self, topic: &str) -> Option<&TargetNode> {
        self.nodes.iter().find(|n| n.publishes == topic)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Channel name of `topic` in the target notation.
pub fn target_topic(topic: &str) -> String {
    topic.to_uppercase()
}

/// Hand-off data-source identifier: node name, `x`, source topic, `_data`.
pub fn data_source_id(node: &str, target_topic: &str) -> String {
    format!("{node}x{target_topic}_data")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
