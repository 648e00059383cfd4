/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lowering of a well-formed model into the reduced target model.
//!
//! # Preconditions
//! [`check_preconditions`] reports, as diagnostics, everything that keeps a
//! well-formed model from being lowered:
//!
//! * more than one host or executor;
//! * an executor other than `SingleThreadedExecutor`, or a distribution whose
//!   wait set does not order timers before subscriptions;
//! * services, clients, actions or external I/O;
//! * a topic with more than one producer, or a data-flow cycle;
//! * a node matching no archetype;
//! * a buffer depth below one (error) or different from the depth the target
//!   model assumes (warning).
//!
//! # Priorities
//! Inside the single-threaded wait set, timers are taken before
//! subscriptions and, within a trigger kind, entities in registration order.
//! [`lower`] therefore sorts nodes by `(wait-set rank, seq)` and hands out
//! priorities from the node count downwards.  Nothing depends on container
//! iteration order, so two runs over the same model emit identical
//! priorities.

pub mod classify;
pub mod error;
pub mod feasibility;
pub mod target;

use tracing::{debug, info};

use crate::diag::{DiagKind, Diagnostic, Report};
use crate::model::{Executor, Node, System, TimeUnit, DEFAULT_EXECUTOR, DEFAULT_QOS_DEPTH};
use crate::topology::cycle::find_cycle;
use crate::topology::Interfaces;
use crate::validate::qos::PRE_JAZZY_DISTRIBUTIONS;

pub use classify::{classify, classify_all, Archetype, Classification, ClassificationMap, NodeSpec};
pub use error::LowerError;
pub use target::{
    Activation, ArchetypeKind, Monitor, SubTask, TargetNode, TargetSystem, DEFAULT_DATA_SOURCE,
};

use target::{data_source_id, target_topic};

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Queue depth the target model is built for.
    pub buffer_depth: i64,
    /// Node whose output the analysis observes.
    pub monitor_actuator: Option<String>,
    pub monitor_period: u64,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            buffer_depth: DEFAULT_QOS_DEPTH,
            monitor_actuator: None,
            monitor_period: 0,
        }
    }
}

// ── Preconditions ─────────────────────────────────────────────────────────────

/// Lowering-only checks.  A clean report has no errors and no warnings.
pub fn check_preconditions(
    system: &System,
    interfaces: &Interfaces,
    classes: &ClassificationMap<'_>,
    options: &LoweringOptions,
) -> Report {
    let mut diagnostics = check_deployment(system);

    for node in system.nodes() {
        if let Some(d) = check_capabilities(node) {
            diagnostics.push(d);
        }
    }

    diagnostics.extend(interfaces.check_single_producers());

    let names: Vec<&str> = system.nodes().map(|n| n.name.as_str()).collect();
    if let Some(path) = find_cycle(
        &names,
        interfaces.publishers_by_topic(),
        interfaces.subscribers_by_topic(),
    ) {
        diagnostics.push(Diagnostic::error(
            DiagKind::Topology,
            format!("Data-flow cycle: {}", path.join(" -> ")),
        ));
    }

    for node in system.nodes() {
        match classes.get(&node.name) {
            Some(c) => diagnostics.extend(c.diagnostic()),
            None => diagnostics.push(Diagnostic::error(
                DiagKind::Classification,
                format!("Node '{}' has not been classified", node.name),
            )),
        }
    }

    diagnostics.extend(check_buffer_depths(system, options.buffer_depth));

    if let Some(actuator) = &options.monitor_actuator {
        if !names.contains(&actuator.as_str()) {
            diagnostics.push(Diagnostic::error(
                DiagKind::Precondition,
                format!("Monitored actuator '{actuator}' is not a node of the system"),
            ));
        }
    }

    let report = Report::from_diagnostics(diagnostics);
    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "lowering preconditions checked"
    );
    report
}

fn check_deployment(system: &System) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if system.hosts.len() != 1 {
        diagnostics.push(Diagnostic::error(
            DiagKind::Precondition,
            format!(
                "System must have exactly one host for lowering (found {})",
                system.hosts.len()
            ),
        ));
    }
    let executors = system.executor_count();
    if executors != 1 {
        diagnostics.push(Diagnostic::error(
            DiagKind::Precondition,
            format!("System must have exactly one executor for lowering (found {executors})"),
        ));
    }

    for executor in system.hosts.iter().flat_map(|h| &h.executors) {
        if executor.implementation != DEFAULT_EXECUTOR {
            diagnostics.push(Diagnostic::error(
                DiagKind::Precondition,
                format!(
                    "Executor '{}' is a {}; only {} can be lowered",
                    executor.name, executor.implementation, DEFAULT_EXECUTOR
                ),
            ));
        }
        if !PRE_JAZZY_DISTRIBUTIONS.contains(&executor.ros_distribution.as_str()) {
            diagnostics.push(Diagnostic::error(
                DiagKind::Precondition,
                format!(
                    "Executor '{}' runs {}; lowering assumes the wait-set order of distributions before Jazzy",
                    executor.name, executor.ros_distribution
                ),
            ));
        }
    }
    diagnostics
}

fn check_capabilities(node: &Node) -> Option<Diagnostic> {
    if !node.has_unsupported_capabilities() {
        return None;
    }
    let present: Vec<&str> = [
        ("services", node.services.len()),
        ("clients", node.clients.len()),
        ("actions", node.actions.len()),
        ("external inputs", node.external_inputs.len()),
        ("external outputs", node.external_outputs.len()),
    ]
    .into_iter()
    .filter(|(_, n)| *n > 0)
    .map(|(what, _)| what)
    .collect();
    Some(Diagnostic::error(
        DiagKind::Precondition,
        format!(
            "Node '{}' has {}, which cannot be lowered",
            node.name,
            present.join(", ")
        ),
    ))
}

/// Depth of every QoS record against the depth the target model assumes.
fn check_buffer_depths(system: &System, assumed: i64) -> Vec<Diagnostic> {
    let mut records: Vec<(String, i64)> = vec![(format!("System '{}'", system.name), system.qos.depth)];
    for node in system.nodes() {
        for p in &node.publishers {
            records.push((format!("Publisher '{}'", p.name), p.qos_offered.depth));
        }
        for s in &node.subscriptions {
            records.push((
                format!("Subscription of '{}' on {}", node.name, s.topic),
                s.qos_requested.depth,
            ));
        }
    }

    records
        .into_iter()
        .filter_map(|(owner, depth)| {
            if depth < 1 {
                Some(Diagnostic::error(
                    DiagKind::Precondition,
                    format!("{owner} has buffer depth {depth}; at least 1 is required"),
                ))
            } else if depth != assumed {
                Some(Diagnostic::warning(
                    DiagKind::Qos,
                    format!(
                        "{owner} has buffer depth {depth}, which differs from the fixed value {assumed} assumed by the target model"
                    ),
                ))
            } else {
                None
            }
        })
        .collect()
}

// ── Mapper ────────────────────────────────────────────────────────────────────

/// Lower `system` into the target model.
///
/// Defined only when [`check_preconditions`] is clean.  Outside that set an
/// `Err` is returned instead of an approximate model.
pub fn lower(
    system: &System,
    classes: &ClassificationMap<'_>,
    options: &LoweringOptions,
) -> Result<TargetSystem, LowerError> {
    let executor = single_executor(system)?;

    let mut ranked: Vec<(&Node, &Classification<'_>, ArchetypeKind)> =
        Vec::with_capacity(executor.nodes.len());
    for node in &executor.nodes {
        let class = classes.get(&node.name).ok_or_else(|| LowerError::Unclassified {
            node: node.name.clone(),
        })?;
        let kind = class.kind().ok_or_else(|| LowerError::UnsupportedNode {
            node: node.name.clone(),
        })?;
        ranked.push((node, class, kind));
    }
    ranked.sort_by_key(|(node, _, kind)| (kind.wait_set_rank(), node.seq));

    let mut max_priority = ranked.len();
    let mut nodes = Vec::with_capacity(ranked.len());
    for (node, class, kind) in ranked {
        let lowered = lower_node(node, class, kind, max_priority)?;
        info!(
            node = %lowered.name,
            kind = kind.as_str(),
            priority = lowered.priority,
            sub_tasks = lowered.sub_tasks.len(),
            "lowered node"
        );
        nodes.push(lowered);
        max_priority -= 1;
    }

    Ok(TargetSystem {
        name: system.name.clone(),
        deterministic: true,
        monitor: Monitor {
            actuator: options.monitor_actuator.clone(),
            period: options.monitor_period,
        },
        nodes,
    })
}

fn single_executor(system: &System) -> Result<&Executor, LowerError> {
    let mismatch = || LowerError::NotSingleExecutor {
        hosts: system.hosts.len(),
        executors: system.executor_count(),
    };
    match system.hosts.as_slice() {
        [host] => match host.executors.as_slice() {
            [executor] => Ok(executor),
            _ => Err(mismatch()),
        },
        _ => Err(mismatch()),
    }
}

fn time(node: &Node, field: &'static str, value: TimeUnit) -> Result<u64, LowerError> {
    u64::try_from(value).map_err(|_| LowerError::NegativeTime {
        node: node.name.clone(),
        field,
        value,
    })
}

fn lower_node(
    node: &Node,
    class: &Classification<'_>,
    kind: ArchetypeKind,
    priority: usize,
) -> Result<TargetNode, LowerError> {
    let spec = class.spec.as_ref().ok_or_else(|| LowerError::UnsupportedNode {
        node: node.name.clone(),
    })?;
    let main = spec.main_task;

    let publishes = main
        .publishers
        .first()
        .and_then(|p| node.publisher(p))
        .map(|p| target_topic(&p.topic))
        .ok_or_else(|| LowerError::MissingPublisher {
            node: node.name.clone(),
            callback: main.name.clone(),
        })?;

    let missing = |callback: &str, expected: &'static str| LowerError::MissingTrigger {
        node: node.name.clone(),
        callback: callback.to_string(),
        expected,
    };

    let activation = match kind {
        ArchetypeKind::DataGenerator | ArchetypeKind::Timer => {
            let timer = node
                .timers_of(&main.name)
                .next()
                .ok_or_else(|| missing(&main.name, "timer"))?;
            Activation::Periodic {
                period: time(node, "timer period", timer.period)?,
                delay: time(node, "timer offset", timer.offset)?,
            }
        }
        ArchetypeKind::Subscriber => {
            let sub = node
                .subscriptions_of(&main.name)
                .next()
                .ok_or_else(|| missing(&main.name, "subscription"))?;
            Activation::Topic {
                topic: target_topic(&sub.topic),
            }
        }
    };

    let mut sub_tasks = Vec::with_capacity(spec.sub_tasks.len());
    for sub in &spec.sub_tasks {
        let written = sub.write_variables.first().map(String::as_str);
        if written != spec.handoff {
            return Err(LowerError::HandoffMismatch {
                node: node.name.clone(),
                sub_task: sub.name.clone(),
                written: written.map(str::to_string),
                expected: spec.handoff.map(str::to_string),
            });
        }
        let subscription = node
            .subscriptions_of(&sub.name)
            .next()
            .ok_or_else(|| missing(&sub.name, "subscription"))?;
        sub_tasks.push(SubTask {
            topic: target_topic(&subscription.topic),
            wcet: time(node, "sub-task wcet", sub.wcet)?,
        });
    }

    let data_source = sub_tasks
        .first()
        .map(|s| data_source_id(&node.name, &s.topic))
        .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string());

    Ok(TargetNode {
        kind,
        name: node.name.clone(),
        wcet: time(node, "wcet", main.wcet)?,
        activation,
        publishes,
        sub_tasks,
        data_source,
        priority,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
