/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Data-flow cycle detection over the node graph.
//!
//! Vertices are node names.  An edge runs from the node publishing a topic to
//! every node subscribing to it.  Only topics with exactly one publishing
//! node contribute edges, and a topic nobody subscribes to contributes none.
//! Variable and callback-call edges are not part of this graph: callbacks only
//! call siblings and recursion is not modelled.
//!
//! The walk is an iterative depth-first search with an explicit on-stack mark,
//! so deep chains cannot overflow the call stack.  O(V + E).

use std::collections::{BTreeMap, HashMap};

use super::ChannelIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Settled,
}

/// Producer → consumers adjacency, deterministic order.
fn build_edges<'a>(
    publishers_by_topic: &'a ChannelIndex,
    subscribers_by_topic: &'a ChannelIndex,
) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut adj: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (topic, producers) in publishers_by_topic {
        let Some((producer, rest)) = producers.split_first() else {
            continue;
        };
        if rest.iter().any(|p| p != producer) {
            continue;
        }
        let Some(consumers) = subscribers_by_topic.get(topic) else {
            continue;
        };
        adj.entry(producer.as_str())
            .or_default()
            .extend(consumers.iter().map(String::as_str));
    }
    adj
}

/// Returns `true` iff the publish/subscribe graph has a directed cycle.
pub fn has_cycle(
    nodes: &[&str],
    publishers_by_topic: &ChannelIndex,
    subscribers_by_topic: &ChannelIndex,
) -> bool {
    find_cycle(nodes, publishers_by_topic, subscribers_by_topic).is_some()
}

/// Like [`has_cycle`] but returns the first cycle found as a closed path,
/// e.g. `["A", "B", "A"]`.
///
/// Roots are tried in the order of `nodes`.  Vertices reachable only through
/// edges (not listed in `nodes`) are still explored.
pub fn find_cycle(
    nodes: &[&str],
    publishers_by_topic: &ChannelIndex,
    subscribers_by_topic: &ChannelIndex,
) -> Option<Vec<String>> {
    let adj = build_edges(publishers_by_topic, subscribers_by_topic);
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for &root in nodes {
        if marks.contains_key(root) {
            continue;
        }

        // (vertex, index of the next successor to visit)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::OnStack);

        while let Some(frame) = stack.last_mut() {
            let vertex = frame.0;
            let successors = adj.get(vertex).map(Vec::as_slice).unwrap_or(&[]);

            let Some(&next) = successors.get(frame.1) else {
                // No unvisited successors left: settle.
                marks.insert(vertex, Mark::Settled);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks.get(next) {
                Some(Mark::OnStack) => {
                    let start = stack.iter().position(|(v, _)| *v == next).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|(v, _)| v.to_string()).collect();
                    path.push(next.to_string());
                    return Some(path);
                }
                Some(Mark::Settled) => {}
                None => {
                    marks.insert(next, Mark::OnStack);
                    stack.push((next, 0));
                }
            }
        }
    }

    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
