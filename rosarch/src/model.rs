/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Architecture model of a publish/subscribe middleware deployment.
//!
//! The model is a strict ownership tree:
//!
//! ```text
//! System ─► Host ─► Executor ─► Node ─► { Publisher, Subscription, Timer,
//!                                         Callback, Variable, Service, Client,
//!                                         Action, ExternalInput, ExternalOutput }
//! ```
//!
//! # Ownership model
//! Entities never point at their parents or siblings.  Every relationship that
//! crosses the tree (a callback publishing through a publisher, a timer firing
//! a callback, ...) is a **name key**.  The validator reconstructs ownership from
//! a registry keyed by `(EntityKind, name)` instead of chasing pointers, so the
//! model has no cyclic ownership and is trivially `Send + Sync`.
//!
//! The builder methods at the bottom of each `impl` are conveniences for tests
//! and programmatic construction; files are loaded through
//! [`ModelLoader`](crate::config::ModelLoader).  Nothing in the pipeline
//! mutates a model after it has been built.

use serde::Deserialize;

// ── Scalar aliases ────────────────────────────────────────────────────────────

/// Time in model units.  Signed so that negative values can be represented and
/// rejected by the validator instead of wrapping silently.
pub type TimeUnit = i64;

/// A topic is identified purely by its name.
pub type Topic = String;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Executor implementation used when none is given.
pub const DEFAULT_EXECUTOR: &str = "SingleThreadedExecutor";

/// Middleware distribution used when none is given.
pub const DEFAULT_DISTRIBUTION: &str = "Rolling";

/// Tag used for operating system / architecture / DDS when not specified.
pub const UNSPECIFIED: &str = "Generic";

/// History depth of the default QoS profile.
pub const DEFAULT_QOS_DEPTH: i64 = 10;

// ── Quality of service ────────────────────────────────────────────────────────

/// Quality-of-service record of a publish/subscribe or service channel.
///
/// Policy fields are kept as the raw tags found in the input; the validator
/// checks them against the fixed enumerations in
/// [`validate::qos`](crate::validate::qos).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QosProfile {
    pub history: String,
    pub depth: i64,
    pub reliability: String,
    pub durability: String,
    pub deadline: TimeUnit,
    pub lifespan: TimeUnit,
    pub liveliness: String,
    pub liveliness_lease_duration: TimeUnit,
}

impl Default for QosProfile {
    fn default() -> Self {
        Self {
            history: "keep_last".into(),
            depth: DEFAULT_QOS_DEPTH,
            reliability: "reliable".into(),
            durability: "volatile".into(),
            deadline: 0,
            lifespan: 0,
            liveliness: "automatic".into(),
            liveliness_lease_duration: 0,
        }
    }
}

impl QosProfile {
    /// Default profile with a different history depth.
    pub fn with_depth(depth: i64) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

// ── Node children ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Publisher {
    pub name: String,
    pub topic: Topic,
    #[serde(default)]
    pub qos_offered: QosProfile,
}

/// Subscriptions are not named; they are identified by `(node, topic)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    pub topic: Topic,
    pub callback: String,
    #[serde(default)]
    pub qos_requested: QosProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Timer {
    pub name: String,
    pub period: TimeUnit,
    /// Release offset (delay) of the first activation.
    #[serde(default)]
    pub offset: TimeUnit,
    pub callback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable {
    pub name: String,
}

/// A service request issued by a callback through one of its node's clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    pub client: String,
    #[serde(default)]
    pub timeout: TimeUnit,
}

/// A unit of computation with a worst-case execution time.
///
/// Every list holds names of entities owned by the same node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Callback {
    pub name: String,
    pub wcet: TimeUnit,
    pub read_variables: Vec<String>,
    pub write_variables: Vec<String>,
    pub calls: Vec<String>,
    pub publishers: Vec<String>,
    pub external_outputs: Vec<String>,
    pub requests: Vec<Request>,
}

impl Callback {
    pub fn new(name: impl Into<String>, wcet: TimeUnit) -> Self {
        Self {
            name: name.into(),
            wcet,
            ..Default::default()
        }
    }

    pub fn publishes(mut self, publisher: impl Into<String>) -> Self {
        self.publishers.push(publisher.into());
        self
    }

    pub fn reads(mut self, variable: impl Into<String>) -> Self {
        self.read_variables.push(variable.into());
        self
    }

    pub fn writes(mut self, variable: impl Into<String>) -> Self {
        self.write_variables.push(variable.into());
        self
    }

    pub fn calls(mut self, callback: impl Into<String>) -> Self {
        self.calls.push(callback.into());
        self
    }

    pub fn outputs(mut self, output: impl Into<String>) -> Self {
        self.external_outputs.push(output.into());
        self
    }

    pub fn requests(mut self, client: impl Into<String>, timeout: TimeUnit) -> Self {
        self.requests.push(Request {
            client: client.into(),
            timeout,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    pub name: String,
    pub callback: String,
    #[serde(default)]
    pub qos_requested: QosProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Client {
    pub name: String,
    /// Name of the service this client requests.
    pub service: String,
    #[serde(default)]
    pub qos_profile: QosProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Action {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalInput {
    pub name: String,
    pub callback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalOutput {
    pub name: String,
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A middleware node: the unit of registration with an executor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Node {
    pub name: String,

    /// Registration order inside the owning executor (0-based).
    ///
    /// Carried explicitly so that priority assignment never depends on
    /// container iteration order.  Set by [`Executor::add_node`] or by the
    /// loader from document order.
    #[serde(skip)]
    pub seq: usize,

    pub publishers: Vec<Publisher>,
    pub subscriptions: Vec<Subscription>,
    pub timers: Vec<Timer>,
    pub callbacks: Vec<Callback>,
    pub variables: Vec<Variable>,
    pub services: Vec<Service>,
    pub clients: Vec<Client>,
    pub actions: Vec<Action>,
    pub external_inputs: Vec<ExternalInput>,
    pub external_outputs: Vec<ExternalOutput>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of activation sources: timers, subscriptions, external inputs,
    /// services and actions.
    pub fn trigger_count(&self) -> usize {
        self.timers.len()
            + self.subscriptions.len()
            + self.external_inputs.len()
            + self.services.len()
            + self.actions.len()
    }

    /// Returns `true` if the node holds any capability the lowering step
    /// cannot express (services, clients, actions, external I/O).
    pub fn has_unsupported_capabilities(&self) -> bool {
        !self.services.is_empty()
            || !self.clients.is_empty()
            || !self.actions.is_empty()
            || !self.external_inputs.is_empty()
            || !self.external_outputs.is_empty()
    }

    pub fn callback(&self, name: &str) -> Option<&Callback> {
        self.callbacks.iter().find(|c| c.name == name)
    }

    pub fn publisher(&self, name: &str) -> Option<&Publisher> {
        self.publishers.iter().find(|p| p.name == name)
    }

    /// Subscriptions whose callback is `callback`, in declaration order.
    pub fn subscriptions_of<'a>(
        &'a self,
        callback: &'a str,
    ) -> impl Iterator<Item = &'a Subscription> + 'a {
        self.subscriptions
            .iter()
            .filter(move |s| s.callback == callback)
    }

    /// Timers whose callback is `callback`, in declaration order.
    pub fn timers_of<'a>(&'a self, callback: &'a str) -> impl Iterator<Item = &'a Timer> + 'a {
        self.timers.iter().filter(move |t| t.callback == callback)
    }

    // ── Builder conveniences ──────────────────────────────────────────────────

    pub fn add_publisher(&mut self, name: impl Into<String>, topic: impl Into<Topic>) -> &mut Self {
        self.publishers.push(Publisher {
            name: name.into(),
            topic: topic.into(),
            qos_offered: QosProfile::default(),
        });
        self
    }

    pub fn add_subscription(
        &mut self,
        topic: impl Into<Topic>,
        callback: impl Into<String>,
    ) -> &mut Self {
        self.subscriptions.push(Subscription {
            topic: topic.into(),
            callback: callback.into(),
            qos_requested: QosProfile::default(),
        });
        self
    }

    pub fn add_timer(
        &mut self,
        name: impl Into<String>,
        period: TimeUnit,
        offset: TimeUnit,
        callback: impl Into<String>,
    ) -> &mut Self {
        self.timers.push(Timer {
            name: name.into(),
            period,
            offset,
            callback: callback.into(),
        });
        self
    }

    pub fn add_variable(&mut self, name: impl Into<String>) -> &mut Self {
        self.variables.push(Variable { name: name.into() });
        self
    }

    pub fn add_callback(&mut self, callback: Callback) -> &mut Self {
        self.callbacks.push(callback);
        self
    }

    pub fn add_service(&mut self, name: impl Into<String>, callback: impl Into<String>) -> &mut Self {
        self.services.push(Service {
            name: name.into(),
            callback: callback.into(),
            qos_requested: QosProfile::default(),
        });
        self
    }

    pub fn add_client(&mut self, name: impl Into<String>, service: impl Into<String>) -> &mut Self {
        self.clients.push(Client {
            name: name.into(),
            service: service.into(),
            qos_profile: QosProfile::default(),
        });
        self
    }

    pub fn add_action(&mut self, name: impl Into<String>) -> &mut Self {
        self.actions.push(Action { name: name.into() });
        self
    }

    pub fn add_external_input(
        &mut self,
        name: impl Into<String>,
        callback: impl Into<String>,
    ) -> &mut Self {
        self.external_inputs.push(ExternalInput {
            name: name.into(),
            callback: callback.into(),
        });
        self
    }

    pub fn add_external_output(&mut self, name: impl Into<String>) -> &mut Self {
        self.external_outputs.push(ExternalOutput { name: name.into() });
        self
    }
}

// ── Executor / Host / System ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Executor {
    pub name: String,
    #[serde(default = "default_executor")]
    pub implementation: String,
    #[serde(default = "default_distribution")]
    pub ros_distribution: String,
    /// Nodes in registration order.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Executor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implementation: DEFAULT_EXECUTOR.into(),
            ros_distribution: DEFAULT_DISTRIBUTION.into(),
            nodes: Vec::new(),
        }
    }

    /// Register `node` with this executor, stamping its sequence index.
    pub fn add_node(&mut self, mut node: Node) -> &mut Node {
        node.seq = self.nodes.len();
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default = "default_unspecified")]
    pub operating_system: String,
    #[serde(default = "default_unspecified")]
    pub architecture: String,
    #[serde(default)]
    pub executors: Vec<Executor>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operating_system: UNSPECIFIED.into(),
            architecture: UNSPECIFIED.into(),
            executors: Vec::new(),
        }
    }

    /// Add an executor with the given implementation and distribution tags.
    pub fn add_executor(
        &mut self,
        name: impl Into<String>,
        implementation: impl Into<String>,
        ros_distribution: impl Into<String>,
    ) -> &mut Executor {
        let mut executor = Executor::new(name);
        executor.implementation = implementation.into();
        executor.ros_distribution = ros_distribution.into();
        self.executors.push(executor);
        let last = self.executors.len() - 1;
        &mut self.executors[last]
    }
}

/// Root of the architecture model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct System {
    pub name: String,
    #[serde(default = "default_unspecified")]
    pub dds_implementation: String,
    #[serde(default)]
    pub hosts: Vec<Host>,
    /// Global default QoS.
    #[serde(default)]
    pub qos: QosProfile,
}

impl System {
    pub fn new(name: impl Into<String>, dds_implementation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dds_implementation: dds_implementation.into(),
            hosts: Vec::new(),
            qos: QosProfile::default(),
        }
    }

    pub fn add_host(
        &mut self,
        name: impl Into<String>,
        operating_system: impl Into<String>,
        architecture: impl Into<String>,
    ) -> &mut Host {
        let mut host = Host::new(name);
        host.operating_system = operating_system.into();
        host.architecture = architecture.into();
        self.hosts.push(host);
        let last = self.hosts.len() - 1;
        &mut self.hosts[last]
    }

    /// Every node of every executor of every host, in model order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.hosts
            .iter()
            .flat_map(|h| h.executors.iter())
            .flat_map(|e| e.nodes.iter())
    }

    /// Number of executors across all hosts.
    pub fn executor_count(&self) -> usize {
        self.hosts.iter().map(|h| h.executors.len()).sum()
    }
}

fn default_executor() -> String {
    DEFAULT_EXECUTOR.into()
}

fn default_distribution() -> String {
    DEFAULT_DISTRIBUTION.into()
}

fn default_unspecified() -> String {
    UNSPECIFIED.into()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
