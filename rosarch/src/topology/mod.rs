/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Interface resolution: a global, non-hierarchical index of communication.
//!
//! For every topic and service name the resolver records which nodes use it,
//! on four channels:
//!
//! | Channel | Source |
//! |---|---|
//! | `TopicsPublished` | `Node::publishers[*].topic` |
//! | `TopicsSubscribed` | `Node::subscriptions[*].topic` |
//! | `ServicesOffered` | `Node::services[*].name` |
//! | `ServicesRequested` | `Node::clients[*].service` |
//!
//! Two checks are built on top of the index:
//! * the subset law (every consumed name has a producer), part of
//!   well-formedness;
//! * single producer per topic, a lowering precondition only.
//!
//! The data-flow graph used by [`cycle`] is derived from the same index.

pub mod cycle;

use std::collections::BTreeMap;

use tracing::debug;

use crate::diag::{DiagKind, Diagnostic};
use crate::model::System;

// ── Channels ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InterfaceChannel {
    TopicsPublished,
    TopicsSubscribed,
    ServicesOffered,
    ServicesRequested,
}

impl InterfaceChannel {
    pub fn label(self) -> &'static str {
        match self {
            InterfaceChannel::TopicsPublished => "topics published to",
            InterfaceChannel::TopicsSubscribed => "topics subscribed to",
            InterfaceChannel::ServicesOffered => "services offered",
            InterfaceChannel::ServicesRequested => "services requested",
        }
    }
}

/// Interface name → owning node names, in model order.  A node appears once
/// per name, however many of its entities use it.
pub type ChannelIndex = BTreeMap<String, Vec<String>>;

// ── Interfaces ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interfaces {
    channels: BTreeMap<InterfaceChannel, ChannelIndex>,
}

/// Build the interface index for every node of `system`.
///
/// Entries with an empty topic / service name are skipped; the validator
/// reports them as naming errors.  The validator itself records interfaces
/// entity by entity so that subtrees it rejected stay out of the index.
pub fn resolve(system: &System) -> Interfaces {
    let mut interfaces = Interfaces::default();

    for node in system.nodes() {
        for publisher in &node.publishers {
            interfaces.record(InterfaceChannel::TopicsPublished, &publisher.topic, &node.name);
        }
        for subscription in &node.subscriptions {
            interfaces.record(InterfaceChannel::TopicsSubscribed, &subscription.topic, &node.name);
        }
        for service in &node.services {
            interfaces.record(InterfaceChannel::ServicesOffered, &service.name, &node.name);
        }
        for client in &node.clients {
            interfaces.record(InterfaceChannel::ServicesRequested, &client.service, &node.name);
        }
    }

    interfaces.log_summary();
    interfaces
}

impl Interfaces {
    /// Record that `node` uses `name` on `channel`.  Empty names are ignored
    /// and a node already listed for `name` is not added again.
    pub fn record(&mut self, channel: InterfaceChannel, name: &str, node: &str) {
        if name.is_empty() {
            return;
        }
        let nodes = self
            .channels
            .entry(channel)
            .or_default()
            .entry(name.to_string())
            .or_default();
        if !nodes.iter().any(|n| n == node) {
            nodes.push(node.to_string());
        }
    }

    pub(crate) fn log_summary(&self) {
        debug!(
            published = self.channel(InterfaceChannel::TopicsPublished).len(),
            subscribed = self.channel(InterfaceChannel::TopicsSubscribed).len(),
            offered = self.channel(InterfaceChannel::ServicesOffered).len(),
            requested = self.channel(InterfaceChannel::ServicesRequested).len(),
            "interfaces resolved"
        );
    }

    /// Index of one channel (empty if nothing was recorded on it).
    pub fn channel(&self, channel: InterfaceChannel) -> &ChannelIndex {
        static EMPTY: ChannelIndex = BTreeMap::new();
        self.channels.get(&channel).unwrap_or(&EMPTY)
    }

    pub fn publishers_by_topic(&self) -> &ChannelIndex {
        self.channel(InterfaceChannel::TopicsPublished)
    }

    pub fn subscribers_by_topic(&self) -> &ChannelIndex {
        self.channel(InterfaceChannel::TopicsSubscribed)
    }

    /// Nodes publishing to `topic`.
    pub fn producers(&self, topic: &str) -> &[String] {
        self.publishers_by_topic()
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes subscribing to `topic`.
    pub fn consumers(&self, topic: &str) -> &[String] {
        self.subscribers_by_topic()
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Subset law: every subscribed topic is published and every requested
    /// service is offered.  One diagnostic per dangling name.
    pub fn check_subset(&self) -> Vec<Diagnostic> {
        let mut out = self.dangling(
            InterfaceChannel::TopicsSubscribed,
            InterfaceChannel::TopicsPublished,
        );
        out.extend(self.dangling(
            InterfaceChannel::ServicesRequested,
            InterfaceChannel::ServicesOffered,
        ));
        out
    }

    fn dangling(&self, consumed: InterfaceChannel, produced: InterfaceChannel) -> Vec<Diagnostic> {
        let producers = self.channel(produced);
        self.channel(consumed)
            .iter()
            .filter(|(name, _)| !producers.contains_key(*name))
            .map(|(name, nodes)| {
                Diagnostic::error(
                    DiagKind::Topology,
                    format!(
                        "Dangling consumer: '{}' is among {} (by {}) but not among {}",
                        name,
                        consumed.label(),
                        nodes.join(", "),
                        produced.label()
                    ),
                )
            })
            .collect()
    }

    /// Lowering precondition: every published topic has exactly one
    /// producing node.  Reports each ambiguous topic with all producers.
    pub fn check_single_producers(&self) -> Vec<Diagnostic> {
        self.publishers_by_topic()
            .iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(topic, nodes)| {
                Diagnostic::error(
                    DiagKind::Precondition,
                    format!(
                        "Ambiguous producer: topic '{}' is published by {} ({}); \
                         each topic must have exactly one publisher",
                        topic,
                        nodes.len(),
                        nodes.join(", ")
                    ),
                )
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
