/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Well-formedness checking of an architecture model.
//!
//! [`validate`] runs two passes over the ownership tree:
//!
//! 1. **Registration** – pre-order walk System → Host → Executor → Node →
//!    children.  Every named entity is registered under its owner.  A missing
//!    or duplicate name yields a naming error and the entity's subtree is not
//!    looked at again, so one bad name does not cascade into a flood of
//!    follow-up errors.  Value checks that need no cross-reference (tags,
//!    QoS, WCET, periods, trigger/callback counts) run inline.
//! 2. **References** – for every entity that survived registration, each
//!    name it references is checked against the registry: it must exist and
//!    be owned by the same node.
//!
//! Interfaces are recorded during registration, so a rejected subtree adds
//! nothing to the index.  The subset law is checked on that index last.
//!
//! The validator never stops early; the returned [`Validation`] holds every
//! defect found in one run.

pub mod qos;
pub mod registry;

use tracing::{debug, info};

use crate::diag::{DiagKind, Diagnostic, Report};
use crate::model::{Callback, Executor, ExternalInput, Host, Node, Service, System, Timer};
use crate::topology::{InterfaceChannel, Interfaces};

use qos::{check_tag, validate_qos, TagKind};
use registry::{EntityKind, Registry};

/// Sentinel message of a well-formed system.
pub const WELL_FORMED: &str = "System is well formed";

// ── Result type ───────────────────────────────────────────────────────────────

/// Outcome of [`validate`]: diagnostics plus the indexes later stages reuse.
#[derive(Debug, Clone)]
pub struct Validation {
    pub report: Report,
    pub registry: Registry,
    pub interfaces: Interfaces,
}

impl Validation {
    pub fn is_well_formed(&self) -> bool {
        self.report.is_clean()
    }

    /// Human-readable outcome: the error messages, or the single
    /// [`WELL_FORMED`] sentinel when there are none.
    pub fn messages(&self) -> Vec<String> {
        if self.is_well_formed() {
            vec![WELL_FORMED.to_string()]
        } else {
            self.report.error_messages()
        }
    }
}

// ── Pass bookkeeping ──────────────────────────────────────────────────────────

/// Entities of one node that survived registration.  Only these have their
/// references checked in the second pass.
struct NodeScope<'a> {
    node: &'a Node,
    callbacks: Vec<&'a Callback>,
    timers: Vec<&'a Timer>,
    services: Vec<&'a Service>,
    external_inputs: Vec<&'a ExternalInput>,
}

struct Walk<'a> {
    registry: Registry,
    interfaces: Interfaces,
    scopes: Vec<NodeScope<'a>>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Check `system` for well-formedness.
pub fn validate(system: &System) -> Validation {
    let mut walk = Walk {
        registry: Registry::new(),
        interfaces: Interfaces::default(),
        scopes: Vec::new(),
    };

    let mut diagnostics = walk.register_system(system);
    for scope in &walk.scopes {
        diagnostics.extend(verify_node(scope, &walk.registry));
    }

    let interfaces = walk.interfaces;
    interfaces.log_summary();
    diagnostics.extend(interfaces.check_subset());

    let report = Report::from_diagnostics(diagnostics);

    info!(
        system = %system.name,
        registered = walk.registry.len(),
        nodes = walk.registry.count(EntityKind::Node),
        errors = report.errors.len(),
        "validation finished"
    );

    Validation {
        report,
        registry: walk.registry,
        interfaces,
    }
}

// ── Pass 1: registration ──────────────────────────────────────────────────────

impl<'a> Walk<'a> {
    fn register(&mut self, name: &str, kind: EntityKind, owner: &str) -> Result<(), Diagnostic> {
        self.registry.register(name, kind, owner)
    }

    fn register_system(&mut self, system: &'a System) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        if system.name.is_empty() {
            out.push(Diagnostic::error(DiagKind::Naming, "System must have a name"));
        }
        out.extend(check_tag(TagKind::Dds, &system.dds_implementation));
        out.extend(validate_qos(&system.qos, &system.name));

        if system.hosts.is_empty() {
            out.push(Diagnostic::error(
                DiagKind::Value,
                "System must have at least one host",
            ));
        }
        for host in &system.hosts {
            out.extend(self.register_host(host, &system.name));
        }
        out
    }

    fn register_host(&mut self, host: &'a Host, owner: &str) -> Vec<Diagnostic> {
        if let Err(d) = self.register(&host.name, EntityKind::Host, owner) {
            return vec![d];
        }

        let mut out = Vec::new();
        out.extend(check_tag(TagKind::OperatingSystem, &host.operating_system));
        out.extend(check_tag(TagKind::Architecture, &host.architecture));

        if host.executors.is_empty() {
            out.push(Diagnostic::error(
                DiagKind::Value,
                format!("Host '{}' must have at least one executor", host.name),
            ));
        }
        for executor in &host.executors {
            out.extend(self.register_executor(executor, &host.name));
        }
        out
    }

    fn register_executor(&mut self, executor: &'a Executor, owner: &str) -> Vec<Diagnostic> {
        if let Err(d) = self.register(&executor.name, EntityKind::Executor, owner) {
            return vec![d];
        }

        let mut out = Vec::new();
        out.extend(check_tag(TagKind::Distribution, &executor.ros_distribution));
        out.extend(check_tag(TagKind::Executor, &executor.implementation));

        if executor.nodes.is_empty() {
            out.push(Diagnostic::error(
                DiagKind::Value,
                format!("Executor '{}' must have at least one node", executor.name),
            ));
        }
        for node in &executor.nodes {
            out.extend(self.register_node(node, &executor.name));
        }
        out
    }

    fn register_node(&mut self, node: &'a Node, owner: &str) -> Vec<Diagnostic> {
        if let Err(d) = self.register(&node.name, EntityKind::Node, owner) {
            return vec![d];
        }

        let name = node.name.as_str();
        let mut out = Vec::new();
        let mut scope = NodeScope {
            node,
            callbacks: Vec::new(),
            timers: Vec::new(),
            services: Vec::new(),
            external_inputs: Vec::new(),
        };

        // outputs
        for client in &node.clients {
            match self.register(&client.name, EntityKind::Client, name) {
                Ok(()) => {
                    out.extend(validate_qos(&client.qos_profile, &client.name));
                    if client.service.is_empty() {
                        out.push(missing_interface("Service", &client.name));
                    }
                    self.interfaces
                        .record(InterfaceChannel::ServicesRequested, &client.service, name);
                }
                Err(d) => out.push(d),
            }
        }
        for publisher in &node.publishers {
            match self.register(&publisher.name, EntityKind::Publisher, name) {
                Ok(()) => {
                    out.extend(validate_qos(&publisher.qos_offered, &publisher.name));
                    if publisher.topic.is_empty() {
                        out.push(missing_interface("Topic", &publisher.name));
                    }
                    self.interfaces
                        .record(InterfaceChannel::TopicsPublished, &publisher.topic, name);
                }
                Err(d) => out.push(d),
            }
        }

        // internal
        for variable in &node.variables {
            out.extend(self.register(&variable.name, EntityKind::Variable, name).err());
        }
        for output in &node.external_outputs {
            out.extend(self.register(&output.name, EntityKind::ExternalOutput, name).err());
        }
        if node.callbacks.is_empty() {
            out.push(Diagnostic::error(
                DiagKind::Value,
                format!("Node '{name}' must have at least one callback"),
            ));
        }
        for callback in &node.callbacks {
            match self.register(&callback.name, EntityKind::Callback, name) {
                Ok(()) => {
                    out.extend(check_callback_values(callback));
                    scope.callbacks.push(callback);
                }
                Err(d) => out.push(d),
            }
        }

        // triggers
        for input in &node.external_inputs {
            match self.register(&input.name, EntityKind::ExternalInput, name) {
                Ok(()) => scope.external_inputs.push(input),
                Err(d) => out.push(d),
            }
        }
        for subscription in &node.subscriptions {
            out.extend(validate_qos(&subscription.qos_requested, name));
            if subscription.topic.is_empty() {
                out.push(missing_interface("Topic", name));
            }
            self.interfaces
                .record(InterfaceChannel::TopicsSubscribed, &subscription.topic, name);
        }
        for timer in &node.timers {
            match self.register(&timer.name, EntityKind::Timer, name) {
                Ok(()) => {
                    if timer.period < 0 {
                        out.push(Diagnostic::error(
                            DiagKind::Value,
                            format!("Timer '{}' must not have a negative period", timer.name),
                        ));
                    }
                    if timer.offset < 0 {
                        out.push(Diagnostic::error(
                            DiagKind::Value,
                            format!("Timer '{}' must not have a negative offset", timer.name),
                        ));
                    }
                    scope.timers.push(timer);
                }
                Err(d) => out.push(d),
            }
        }
        for service in &node.services {
            match self.register(&service.name, EntityKind::Service, name) {
                Ok(()) => {
                    out.extend(validate_qos(&service.qos_requested, &service.name));
                    self.interfaces
                        .record(InterfaceChannel::ServicesOffered, &service.name, name);
                    scope.services.push(service);
                }
                Err(d) => out.push(d),
            }
        }
        for action in &node.actions {
            out.extend(self.register(&action.name, EntityKind::Action, name).err());
        }
        if node.trigger_count() == 0 {
            out.push(Diagnostic::error(
                DiagKind::Value,
                format!("Node '{name}' must have at least one trigger"),
            ));
        }

        debug!(
            node = name,
            callbacks = scope.callbacks.len(),
            timers = scope.timers.len(),
            subscriptions = node.subscriptions.len(),
            "node registered"
        );
        self.scopes.push(scope);
        out
    }
}

fn missing_interface(kind: &str, container: &str) -> Diagnostic {
    Diagnostic::error(
        DiagKind::Naming,
        format!("{kind} inside '{container}' is missing name."),
    )
}

/// Value checks on a callback that need no registry lookup.
fn check_callback_values(callback: &Callback) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if callback.wcet < 0 {
        out.push(Diagnostic::error(
            DiagKind::Value,
            format!("Callback '{}' has a negative wcet", callback.name),
        ));
    }
    for request in &callback.requests {
        if request.timeout < 0 {
            out.push(Diagnostic::error(
                DiagKind::Value,
                format!(
                    "A request of callback '{}' to client '{}' has a negative timeout",
                    callback.name, request.client
                ),
            ));
        }
    }
    out
}

// ── Pass 2: references ────────────────────────────────────────────────────────

fn verify_node(scope: &NodeScope<'_>, registry: &Registry) -> Vec<Diagnostic> {
    let owner = scope.node.name.as_str();
    let check = |name: &str, kind: EntityKind, referrer: &str| {
        registry.verify_registration(name, kind, owner, referrer)
    };
    let mut out = Vec::new();

    for callback in &scope.callbacks {
        let cb = callback.name.as_str();
        for publisher in &callback.publishers {
            out.extend(check(publisher, EntityKind::Publisher, cb));
        }
        for variable in callback.read_variables.iter().chain(&callback.write_variables) {
            out.extend(check(variable, EntityKind::Variable, cb));
        }
        for output in &callback.external_outputs {
            out.extend(check(output, EntityKind::ExternalOutput, cb));
        }
        for request in &callback.requests {
            out.extend(check(&request.client, EntityKind::Client, cb));
        }
        for called in &callback.calls {
            out.extend(check(called, EntityKind::Callback, cb));
        }
    }

    for subscription in &scope.node.subscriptions {
        let referrer = format!("{} subscription on {}", owner, subscription.topic);
        out.extend(check(&subscription.callback, EntityKind::Callback, &referrer));
    }
    for timer in &scope.timers {
        out.extend(check(&timer.callback, EntityKind::Callback, &timer.name));
    }
    for service in &scope.services {
        out.extend(check(&service.callback, EntityKind::Callback, &service.name));
    }
    for input in &scope.external_inputs {
        out.extend(check(&input.callback, EntityKind::Callback, &input.name));
    }

    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::model::{Callback, Node, QosProfile};

    fn messages_containing<'r>(v: &'r Validation, needle: &str) -> Vec<&'r str> {
        v.report
            .errors
            .iter()
            .map(|d| d.message.as_str())
            .filter(|m| m.contains(needle))
            .collect()
    }

    // ── Happy path ────────────────────────────────────────────────────────────

    #[test]
    fn sensor_pipeline_is_well_formed() {
        let v = validate(&fixtures::sensor_pipeline());
        assert!(v.is_well_formed(), "unexpected errors: {:?}", v.report.errors);
        assert_eq!(v.messages(), vec![WELL_FORMED.to_string()]);
    }

    #[test]
    fn registry_records_owners() {
        let v = validate(&fixtures::sensor_pipeline());
        assert_eq!(v.registry.owner_of(EntityKind::Callback, "S1cb"), Some("S1"));
        assert_eq!(v.registry.owner_of(EntityKind::Node, "S1"), Some("exec"));
        assert_eq!(v.registry.owner_of(EntityKind::Executor, "exec"), Some("host"));
        assert_eq!(v.registry.owner_of(EntityKind::Host, "host"), Some("pipeline"));
        assert_eq!(v.registry.owner_of(EntityKind::Variable, "var1"), Some("FU"));
    }

    // ── Naming ────────────────────────────────────────────────────────────────

    #[test]
    fn duplicate_names_across_nodes_are_rejected() {
        let mut a = fixtures::data_generator("A", "ta", 10, 0, 1);
        a.add_variable("shared");
        let mut b = fixtures::data_generator("B", "tb", 10, 0, 1);
        b.add_variable("shared");
        let v = validate(&fixtures::single_executor_system(vec![a, b]));

        let dups = messages_containing(&v, "variable 'shared' has multiple owners");
        assert_eq!(dups.len(), 1);
        assert_eq!(v.report.errors.len(), 1);
    }

    #[test]
    fn duplicate_node_skips_subtree_without_cascade() {
        // Second "A" would otherwise produce duplicate callback/timer/publisher
        // errors for every child.
        let a1 = fixtures::data_generator("A", "ta", 10, 0, 1);
        let a2 = fixtures::data_generator("A", "tb", 10, 0, 1);
        let c = fixtures::data_generator("C", "tc", 10, 0, 1);
        let v = validate(&fixtures::single_executor_system(vec![a1, a2, c]));

        assert_eq!(v.report.errors.len(), 1, "{:?}", v.report.errors);
        assert!(v.report.errors[0].message.contains("node 'A' has multiple owners"));
        // sibling after the bad subtree is still registered
        assert!(v.registry.contains(EntityKind::Callback, "Ccb"));
    }

    #[test]
    fn duplicate_node_interfaces_stay_out_of_the_subset_law() {
        let a1 = fixtures::data_generator("A", "ta", 10, 0, 1);
        let mut a2 = Node::new("A");
        a2.add_subscription("nowhere", "A2cb")
            .add_callback(Callback::new("A2cb", 1));
        let v = validate(&fixtures::single_executor_system(vec![a1, a2]));

        assert_eq!(v.report.errors.len(), 1, "{:?}", v.report.errors);
        assert!(v.report.errors[0].message.contains("node 'A' has multiple owners"));
        assert!(v.interfaces.consumers("nowhere").is_empty());
    }

    #[test]
    fn skipped_duplicate_cannot_satisfy_a_consumer() {
        // The rejected second "B" publishes the topic "C" needs.
        let b1 = fixtures::data_generator("B", "tb", 10, 0, 1);
        let mut b2 = Node::new("B");
        b2.add_publisher("B2pub", "wanted")
            .add_timer("B2t", 10, 0, "B2cb")
            .add_callback(Callback::new("B2cb", 1).publishes("B2pub"));
        let c = fixtures::subscriber("C", "wanted", "tc", 1);
        let v = validate(&fixtures::single_executor_system(vec![b1, b2, c]));

        let dangling = messages_containing(&v, "Dangling consumer: 'wanted'");
        assert_eq!(dangling.len(), 1, "{:?}", v.report.errors);
        assert!(v.interfaces.producers("wanted").is_empty());
    }

    #[test]
    fn missing_node_name_is_naming_error() {
        let v = validate(&fixtures::single_executor_system(vec![Node::new("")]));
        let errs: Vec<_> = v.report.errors_of(DiagKind::Naming).collect();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("node owned by 'exec' is missing name"));
    }

    #[test]
    fn missing_system_name_and_hosts() {
        let v = validate(&System::new("", "Cyclone"));
        let msgs = v.messages();
        assert!(msgs.contains(&"System must have a name".to_string()));
        assert!(msgs.contains(&"System must have at least one host".to_string()));
    }

    #[test]
    fn missing_topic_name_is_reported() {
        let mut n = Node::new("N");
        n.add_publisher("Npub", "")
            .add_timer("Nt", 10, 0, "Ncb")
            .add_callback(Callback::new("Ncb", 1).publishes("Npub"));
        let v = validate(&fixtures::single_executor_system(vec![n]));
        assert_eq!(messages_containing(&v, "Topic inside 'Npub' is missing name").len(), 1);
    }

    // ── References ────────────────────────────────────────────────────────────

    #[test]
    fn callback_using_foreign_publisher_names_both_parties() {
        let a = fixtures::data_generator("A", "ta", 10, 0, 1);
        let mut b = Node::new("B");
        b.add_timer("Bt", 10, 0, "Bcb")
            .add_callback(Callback::new("Bcb", 1).publishes("Apub"));
        let v = validate(&fixtures::single_executor_system(vec![a, b]));

        let errs = messages_containing(&v, "crosses ownership boundary");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("'Bcb'"));
        assert!(errs[0].contains("'Apub'"));
        assert!(errs[0].contains("'A'"));
        assert!(errs[0].contains("'B'"));
    }

    #[test]
    fn dangling_references_of_every_kind() {
        let mut n = Node::new("N");
        n.add_timer("Nt", 10, 0, "ghost_cb")
            .add_subscription("ta", "ghost_cb2")
            .add_external_input("Nin", "ghost_cb3")
            .add_callback(
                Callback::new("Ncb", 1)
                    .publishes("ghost_pub")
                    .reads("ghost_var")
                    .writes("ghost_var2")
                    .calls("ghost_call")
                    .outputs("ghost_out")
                    .requests("ghost_client", 1),
            );
        let a = fixtures::data_generator("A", "ta", 10, 0, 1);
        let v = validate(&fixtures::single_executor_system(vec![a, n]));

        let dangling = messages_containing(&v, "Dangling reference");
        assert_eq!(dangling.len(), 9, "{dangling:#?}");
        for ghost in [
            "ghost_cb'",
            "ghost_cb2",
            "ghost_cb3",
            "ghost_pub",
            "ghost_var'",
            "ghost_var2",
            "ghost_call",
            "ghost_out",
            "ghost_client",
        ] {
            assert!(
                dangling.iter().any(|m| m.contains(ghost)),
                "no dangling reference for {ghost}"
            );
        }
    }

    #[test]
    fn calls_must_stay_inside_node() {
        let a = fixtures::data_generator("A", "ta", 10, 0, 1);
        let mut b = Node::new("B");
        b.add_subscription("ta", "Bcb")
            .add_callback(Callback::new("Bcb", 1).calls("Acb"));
        let v = validate(&fixtures::single_executor_system(vec![a, b]));
        let errs = messages_containing(&v, "callback 'Acb'");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("crosses ownership boundary"));
    }

    #[test]
    fn references_from_skipped_subtree_are_not_checked() {
        // Node "A" duplicated: the duplicate's callback would dangle, but its
        // subtree is skipped.
        let a1 = fixtures::data_generator("A", "ta", 10, 0, 1);
        let mut a2 = Node::new("A");
        a2.add_timer("other_t", 10, 0, "nowhere")
            .add_callback(Callback::new("other_cb", 1).publishes("nowhere"));
        let v = validate(&fixtures::single_executor_system(vec![a1, a2]));
        assert!(messages_containing(&v, "Dangling").is_empty());
        assert!(!v.registry.contains(EntityKind::Timer, "other_t"));
    }

    // ── Values / QoS ──────────────────────────────────────────────────────────

    #[test]
    fn negative_times_are_value_errors() {
        let mut n = Node::new("N");
        n.add_client("Nclient", "srv")
            .add_publisher("Npub", "tn")
            .add_timer("Nt", -10, -1, "Ncb")
            .add_callback(
                Callback::new("Ncb", -3)
                    .publishes("Npub")
                    .requests("Nclient", -1),
            );
        let mut s = Node::new("S");
        s.add_service("srv", "Scb").add_callback(Callback::new("Scb", 1));
        let v = validate(&fixtures::single_executor_system(vec![n, s]));

        let values: Vec<_> = v.report.errors_of(DiagKind::Value).collect();
        assert_eq!(values.len(), 4, "{values:#?}");
        assert_eq!(messages_containing(&v, "negative wcet").len(), 1);
        assert_eq!(messages_containing(&v, "negative period").len(), 1);
        assert_eq!(messages_containing(&v, "negative offset").len(), 1);
        assert_eq!(messages_containing(&v, "negative timeout").len(), 1);
    }

    #[test]
    fn invalid_qos_is_reported_inline() {
        let mut n = fixtures::data_generator("N", "tn", 10, 0, 1);
        n.publishers[0].qos_offered = QosProfile {
            reliability: "sometimes".into(),
            depth: -1,
            ..QosProfile::default()
        };
        let v = validate(&fixtures::single_executor_system(vec![n]));
        let qos: Vec<_> = v.report.errors_of(DiagKind::Qos).collect();
        assert_eq!(qos.len(), 2);
        assert!(qos.iter().all(|d| d.message.contains("'Npub'")));
    }

    #[test]
    fn node_without_callbacks_or_triggers() {
        let v = validate(&fixtures::single_executor_system(vec![Node::new("empty")]));
        let msgs = v.messages();
        assert!(msgs.contains(&"Node 'empty' must have at least one callback".to_string()));
        assert!(msgs.contains(&"Node 'empty' must have at least one trigger".to_string()));
    }

    #[test]
    fn invalid_tags_are_reported() {
        let mut system = fixtures::sensor_pipeline();
        system.dds_implementation = "Opaque".into();
        system.hosts[0].operating_system = "ubuntu 1".into();
        system.hosts[0].executors[0].ros_distribution = "Zesty".into();
        let v = validate(&system);
        assert_eq!(v.report.errors_of(DiagKind::Value).count(), 3);
    }

    #[test]
    fn empty_host_and_executor_are_reported() {
        let mut system = System::new("sys", "Cyclone");
        system.add_host("h1", "Ubuntu", "amd64");
        system
            .add_host("h2", "Ubuntu", "amd64")
            .add_executor("e2", "SingleThreadedExecutor", "Humble");
        let msgs = validate(&system).messages();
        assert!(msgs.contains(&"Host 'h1' must have at least one executor".to_string()));
        assert!(msgs.contains(&"Executor 'e2' must have at least one node".to_string()));
    }

    // ── Interfaces ────────────────────────────────────────────────────────────

    #[test]
    fn subscription_without_publisher_is_dangling_consumer() {
        let mut n = Node::new("N");
        n.add_subscription("nowhere", "Ncb")
            .add_callback(Callback::new("Ncb", 1));
        let v = validate(&fixtures::single_executor_system(vec![n]));
        let topo: Vec<_> = v.report.errors_of(DiagKind::Topology).collect();
        assert_eq!(topo.len(), 1);
        assert!(topo[0].message.contains("'nowhere'"));
    }

    #[test]
    fn ambiguous_producer_is_not_a_wellformedness_error() {
        let v = validate(&fixtures::ambiguous_producers());
        assert!(v.is_well_formed(), "{:?}", v.report.errors);
    }

    #[test]
    fn multi_host_system_can_be_well_formed() {
        let mut system = fixtures::sensor_pipeline();
        system
            .add_host("host2", "Debian", "arm64")
            .add_executor("exec2", "MultiThreadedExecutor", "Jazzy")
            .add_node(fixtures::data_generator("S9", "sensor9", 100, 0, 5));
        assert!(validate(&system).is_well_formed());
    }
}
