/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type of [`lower()`](super::lower).
//!
//! Model defects are reported as diagnostics by
//! [`check_preconditions`](super::check_preconditions) before lowering is
//! attempted.  A `LowerError` therefore means one of two things:
//!
//! * `lower()` was called on a system outside its precondition set (the
//!   caller skipped the checks), or
//! * the classifier accepted a node the mapper cannot express, which is a
//!   defect in the classifier/mapper pairing.  [`LowerError::is_defect`]
//!   tells the two apart.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    /// Lowering needs exactly one host with exactly one executor.
    #[error("system must have exactly one host with one executor (found {hosts} host(s), {executors} executor(s))")]
    NotSingleExecutor { hosts: usize, executors: usize },

    /// A node of the executor has no entry in the classification map.
    #[error("node '{node}' has not been classified")]
    Unclassified { node: String },

    /// A node was classified as unsupported.
    #[error("node '{node}' matches no supported archetype")]
    UnsupportedNode { node: String },

    /// A time value that must be non-negative is not.
    #[error("node '{node}': {field} must not be negative (got {value})")]
    NegativeTime {
        node: String,
        field: &'static str,
        value: i64,
    },

    /// A classified task lacks the trigger its archetype implies.
    #[error("classifier defect in node '{node}': callback '{callback}' has no {expected} trigger")]
    MissingTrigger {
        node: String,
        callback: String,
        expected: &'static str,
    },

    /// The main task's publisher could not be resolved.
    #[error("classifier defect in node '{node}': main task '{callback}' has no resolvable publisher")]
    MissingPublisher { node: String, callback: String },

    /// A sub-task writes something other than the designated hand-off.
    #[error(
        "classifier defect in node '{node}': sub-task '{sub_task}' writes {written:?} \
         but the main task reads {expected:?}"
    )]
    HandoffMismatch {
        node: String,
        sub_task: String,
        written: Option<String>,
        expected: Option<String>,
    },
}

impl LowerError {
    /// `true` for contradictions that can only come from a classifier bug.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            LowerError::MissingTrigger { .. }
                | LowerError::MissingPublisher { .. }
                | LowerError::HandoffMismatch { .. }
        )
    }
}
