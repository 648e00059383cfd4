/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Model fixtures shared by the unit tests.

use crate::model::{Callback, Node, System, TimeUnit};

/// One host, one `SingleThreadedExecutor` on Humble, nodes in the given order.
pub fn single_executor_system(nodes: Vec<Node>) -> System {
    let mut system = System::new("pipeline", "Cyclone");
    let exec = system
        .add_host("host", "Ubuntu", "amd64")
        .add_executor("exec", "SingleThreadedExecutor", "Humble");
    for node in nodes {
        exec.add_node(node);
    }
    system
}

/// Periodic generator: timer `<name>timer` → callback `<name>cb` → publisher
/// `<name>pub` on `topic`.
pub fn data_generator(
    name: &str,
    topic: &str,
    period: TimeUnit,
    offset: TimeUnit,
    wcet: TimeUnit,
) -> Node {
    let mut node = Node::new(name);
    node.add_publisher(format!("{name}pub"), topic)
        .add_callback(Callback::new(format!("{name}cb"), wcet).publishes(format!("{name}pub")))
        .add_timer(format!("{name}timer"), period, offset, format!("{name}cb"));
    node
}

/// Reactive node: subscription on `input` → callback `<name>cb` → publisher
/// `<name>pub` on `output`.
pub fn subscriber(name: &str, input: &str, output: &str, wcet: TimeUnit) -> Node {
    let mut node = Node::new(name);
    node.add_publisher(format!("{name}pub"), output)
        .add_callback(Callback::new(format!("{name}cb"), wcet).publishes(format!("{name}pub")))
        .add_subscription(input, format!("{name}cb"));
    node
}

/// Fusion node without a timer: main task on `filter1`, one sub-task on
/// `filter2` handing data over through `var1`.
pub fn fusion_subscriber() -> Node {
    let mut fu = Node::new("FU");
    fu.add_variable("var1")
        .add_publisher("pub5", "fusion")
        .add_callback(Callback::new("FUsub", 30).writes("var1"))
        .add_callback(Callback::new("FUmain", 30).reads("var1").publishes("pub5"))
        .add_subscription("filter1", "FUmain")
        .add_subscription("filter2", "FUsub");
    fu
}

/// Fusion node with a timer: main task periodic, two sub-tasks (fan-in on
/// `var1`) on `filter1` and `filter2`.
pub fn fusion_timer(period: TimeUnit) -> Node {
    let mut fu = Node::new("FU");
    fu.add_variable("var1")
        .add_publisher("pub5", "fusion")
        .add_callback(Callback::new("FUsub1", 10).writes("var1"))
        .add_callback(Callback::new("FUsub2", 12).writes("var1"))
        .add_callback(Callback::new("FUmain", 30).reads("var1").publishes("pub5"))
        .add_timer("FUtimer", period, 5, "FUmain")
        .add_subscription("filter1", "FUsub1")
        .add_subscription("filter2", "FUsub2");
    fu
}

/// Two sensors, two filters, fusion (subscriber shape) and an actuator.
/// Sensor periods 500 and 1000.
///
/// ```text
/// S1 ─sensor1─► F1 ─filter1─┐
///                           FU ─fusion─► ACT ─command─►
/// S2 ─sensor2─► F2 ─filter2─┘
/// ```
pub fn sensor_pipeline() -> System {
    single_executor_system(vec![
        data_generator("S1", "sensor1", 500, 0, 30),
        data_generator("S2", "sensor2", 1000, 10, 20),
        subscriber("F1", "sensor1", "filter1", 10),
        subscriber("F2", "sensor2", "filter2", 15),
        fusion_subscriber(),
        subscriber("ACT", "fusion", "command", 5),
    ])
}

/// Same pipeline with the timer-driven fusion node.
pub fn timed_sensor_pipeline(fusion_period: TimeUnit) -> System {
    single_executor_system(vec![
        data_generator("S1", "sensor1", 500, 0, 30),
        data_generator("S2", "sensor2", 1000, 10, 20),
        subscriber("F1", "sensor1", "filter1", 10),
        subscriber("F2", "sensor2", "filter2", 15),
        fusion_timer(fusion_period),
        subscriber("ACT", "fusion", "command", 5),
    ])
}

/// `S1` and `S1b` both publish `sensor1`.
pub fn ambiguous_producers() -> System {
    single_executor_system(vec![
        data_generator("S1", "sensor1", 50, 0, 30),
        data_generator("S1b", "sensor1", 50, 0, 30),
        subscriber("F1", "sensor1", "filter1", 10),
    ])
}

/// `A` publishes `t1` and subscribes `t2`; `B` the other way round.
pub fn cyclic_pair() -> System {
    single_executor_system(vec![
        subscriber("A", "t2", "t1", 10),
        subscriber("B", "t1", "t2", 10),
    ])
}
