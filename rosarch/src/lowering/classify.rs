/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Node archetype classification.
//!
//! [`classify`] is a single total function from a node to a closed
//! [`Archetype`].  Shape constraints are all evaluated, so an unsupported node
//! reports every violation at once.  Only then are the archetype predicates
//! tried, in priority order:
//!
//! | archetype      | timers | subscriptions | callbacks | variables |
//! |----------------|--------|---------------|-----------|-----------|
//! | DataGenerator  | 1      | 0             | 1         | 0         |
//! | Timer          | 1      | ≥ 1           | > 1       | 1         |
//! | Subscriber     | 0      | ≥ 1           | any       | ≤ 1       |
//!
//! Several sub-tasks may write the one hand-off variable (fan-in), provided
//! each is subscribed to its own topic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::diag::{DiagKind, Diagnostic};
use crate::model::{Callback, Node, System};

use super::target::ArchetypeKind;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Entity counts of a node, attached to unsupported classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeShape {
    pub timers: usize,
    pub subscriptions: usize,
    pub callbacks: usize,
    pub variables: usize,
    pub publishers: usize,
}

impl NodeShape {
    pub fn of(node: &Node) -> Self {
        Self {
            timers: node.timers.len(),
            subscriptions: node.subscriptions.len(),
            callbacks: node.callbacks.len(),
            variables: node.variables.len(),
            publishers: node.publishers.len(),
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timers: {}, subscriptions: {}, callbacks: {}, variables: {}, publishers: {}",
            self.timers, self.subscriptions, self.callbacks, self.variables, self.publishers
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    pub violations: Vec<String>,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archetype {
    DataGenerator,
    Timer,
    Subscriber,
    Unsupported(Unsupported),
}

impl Archetype {
    /// `None` for [`Archetype::Unsupported`].
    pub fn kind(&self) -> Option<ArchetypeKind> {
        match self {
            Archetype::DataGenerator => Some(ArchetypeKind::DataGenerator),
            Archetype::Timer => Some(ArchetypeKind::Timer),
            Archetype::Subscriber => Some(ArchetypeKind::Subscriber),
            Archetype::Unsupported(_) => None,
        }
    }
}

/// Task decomposition of a node whose shape constraints hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec<'a> {
    /// The one callback that owns the node's publisher.
    pub main_task: &'a Callback,
    /// Callbacks without a publisher, in declaration order.
    pub sub_tasks: Vec<&'a Callback>,
    /// Variable read by the main task and written by the sub-tasks.  Only set
    /// when sub-tasks exist.
    pub handoff: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub node: &'a Node,
    pub archetype: Archetype,
    /// `Some` whenever `archetype` is supported.
    pub spec: Option<NodeSpec<'a>>,
}

impl Classification<'_> {
    pub fn kind(&self) -> Option<ArchetypeKind> {
        self.archetype.kind()
    }

    /// Classification error for an unsupported node.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        let Archetype::Unsupported(unsupported) = &self.archetype else {
            return None;
        };
        let mut message = format!(
            "Node '{}' matches no supported archetype ({})",
            self.node.name, unsupported.shape
        );
        if !unsupported.violations.is_empty() {
            message.push_str(": ");
            message.push_str(&unsupported.violations.join("; "));
        }
        Some(Diagnostic::error(DiagKind::Classification, message))
    }
}

/// Node name → classification.
pub type ClassificationMap<'a> = BTreeMap<String, Classification<'a>>;

// ── Classification ────────────────────────────────────────────────────────────

/// Classify one node.
pub fn classify(node: &Node) -> Classification<'_> {
    let shape = NodeShape::of(node);
    let (violations, spec) = decompose(node);

    let archetype = if !violations.is_empty() {
        Archetype::Unsupported(Unsupported { violations, shape })
    } else if shape.timers == 1
        && shape.subscriptions == 0
        && shape.callbacks == 1
        && shape.variables == 0
    {
        Archetype::DataGenerator
    } else if shape.timers == 1
        && shape.subscriptions >= 1
        && shape.variables == 1
        && shape.callbacks > 1
    {
        Archetype::Timer
    } else if shape.timers == 0 && shape.subscriptions >= 1 && shape.variables <= 1 {
        Archetype::Subscriber
    } else {
        Archetype::Unsupported(Unsupported {
            violations: Vec::new(),
            shape,
        })
    };

    let spec = if matches!(archetype, Archetype::Unsupported(_)) {
        None
    } else {
        spec
    };

    debug!(
        node = %node.name,
        archetype = archetype.kind().map_or("unsupported", ArchetypeKind::as_str),
        "classified node"
    );

    Classification {
        node,
        archetype,
        spec,
    }
}

/// Classify every node of `system`.
pub fn classify_all(system: &System) -> ClassificationMap<'_> {
    system
        .nodes()
        .map(|node| (node.name.clone(), classify(node)))
        .collect()
}

/// Evaluate every shape constraint.  The decomposition is returned whenever
/// a unique main task exists, even if other constraints fail.
fn decompose(node: &Node) -> (Vec<String>, Option<NodeSpec<'_>>) {
    let mut violations = capability_violations(node);

    if node.publishers.len() != 1 {
        violations.push(format!(
            "has {} publishers, exactly one is required",
            node.publishers.len()
        ));
    }

    let mut mains: Vec<&Callback> = Vec::new();
    let mut sub_tasks: Vec<&Callback> = Vec::new();
    for cb in &node.callbacks {
        match cb.publishers.len() {
            0 => sub_tasks.push(cb),
            1 => mains.push(cb),
            n => violations.push(format!("callback '{}' references {} publishers", cb.name, n)),
        }
        if cb.read_variables.len() > 1 {
            violations.push(format!(
                "callback '{}' reads {} variables",
                cb.name,
                cb.read_variables.len()
            ));
        }
        if cb.write_variables.len() > 1 {
            violations.push(format!(
                "callback '{}' writes {} variables",
                cb.name,
                cb.write_variables.len()
            ));
        }
        if !cb.calls.is_empty() {
            violations.push(format!("callback '{}' calls other callbacks", cb.name));
        }
    }

    let main_task = match mains.as_slice() {
        [main] => Some(*main),
        _ => {
            violations.push(format!(
                "has {} main tasks, exactly one is required",
                mains.len()
            ));
            None
        }
    };

    for sub in &sub_tasks {
        if !sub.read_variables.is_empty() {
            violations.push(format!("sub-task '{}' reads variables", sub.name));
        }
    }

    let Some(main_task) = main_task else {
        return (violations, None);
    };

    if !main_task.write_variables.is_empty() {
        violations.push(format!("main task '{}' writes variables", main_task.name));
    }

    let main_triggers = node.timers_of(&main_task.name).count()
        + node.subscriptions_of(&main_task.name).count();
    if main_triggers != 1 {
        violations.push(format!(
            "main task '{}' has {} triggers, exactly one is required",
            main_task.name, main_triggers
        ));
    }

    let handoff = if sub_tasks.is_empty() {
        None
    } else {
        violations.extend(handoff_violations(node, main_task, &sub_tasks));
        main_task.read_variables.first().map(String::as_str)
    };

    let spec = NodeSpec {
        main_task,
        sub_tasks,
        handoff,
    };
    (violations, Some(spec))
}

fn capability_violations(node: &Node) -> Vec<String> {
    let mut violations = Vec::new();
    let counted = [
        ("services", node.services.len()),
        ("clients", node.clients.len()),
        ("actions", node.actions.len()),
        ("external inputs", node.external_inputs.len()),
        ("external outputs", node.external_outputs.len()),
    ];
    for (what, n) in counted {
        if n > 0 {
            violations.push(format!("has {n} {what}"));
        }
    }
    for cb in &node.callbacks {
        if !cb.requests.is_empty() {
            violations.push(format!("callback '{}' issues service requests", cb.name));
        }
        if !cb.external_outputs.is_empty() {
            violations.push(format!("callback '{}' writes external outputs", cb.name));
        }
    }
    violations
}

/// Sub-tasks must write the main task's single read variable, each from its
/// own subscribed topic.
fn handoff_violations(node: &Node, main_task: &Callback, sub_tasks: &[&Callback]) -> Vec<String> {
    let mut violations = Vec::new();

    let handoff = match main_task.read_variables.as_slice() {
        [var] => Some(var.as_str()),
        reads => {
            violations.push(format!(
                "main task '{}' reads {} variables, exactly one hand-off variable is required",
                main_task.name,
                reads.len()
            ));
            None
        }
    };

    let mut topics: BTreeSet<&str> = BTreeSet::new();
    for sub in sub_tasks {
        if let Some(var) = handoff {
            if sub.write_variables.as_slice() != [var] {
                violations.push(format!(
                    "sub-task '{}' does not write hand-off variable '{}'",
                    sub.name, var
                ));
            }
        }

        let timers = node.timers_of(&sub.name).count();
        let subscriptions: Vec<&str> = node
            .subscriptions_of(&sub.name)
            .map(|s| s.topic.as_str())
            .collect();
        match (timers, subscriptions.as_slice()) {
            (0, [topic]) => {
                if !topics.insert(topic) {
                    violations.push(format!(
                        "sub-task '{}' shares topic '{}' with another sub-task",
                        sub.name, topic
                    ));
                }
            }
            _ => violations.push(format!(
                "sub-task '{}' must be triggered by exactly one subscription",
                sub.name
            )),
        }
    }
    violations
}

// ── Tests ─────────────────────────────────────────────────────────────────────
