/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rosarch – architecture model validation and lowering for timed-automaton
//! analysis of single-executor publish/subscribe systems.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── model         – architecture model (ownership tree, name-keyed references)
//! ├── config/       – YAML model loading
//! ├── diag          – diagnostics and reports
//! ├── validate/     – registry, reference and QoS checks (well-formedness)
//! ├── topology/     – interface resolution and data-flow cycle detection
//! ├── lowering/     – archetype classification, preconditions, target model
//! ├── hyperperiod/  – LCM / GCD helpers over the target model
//! └── pipeline      – validate → lower → analyse in one call
//! ```

pub mod config;
pub mod diag;
pub mod hyperperiod;
pub mod lowering;
pub mod model;
pub mod pipeline;
pub mod topology;
pub mod validate;

#[cfg(test)]
mod fixtures;
