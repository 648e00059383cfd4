/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Architecture model loading from YAML.
//!
//! The expected document has a single outer `System` key:
//! ```yaml
//! System:
//!   name: pipeline
//!   dds_implementation: Cyclone
//!   hosts:
//!     - name: ecu
//!       operating_system: Ubuntu
//!       architecture: amd64
//!       executors:
//!         - name: exec
//!           implementation: SingleThreadedExecutor
//!           ros_distribution: Humble
//!           nodes:
//!             - name: S1
//!               publishers:
//!                 - { name: S1pub, topic: sensor1 }
//!               timers:
//!                 - { name: S1timer, period: 50, offset: 0, callback: S1cb }
//!               callbacks:
//!                 - { name: S1cb, wcet: 30, publishers: [S1pub] }
//! ```
//!
//! Optional fields take the same defaults as the builder API.  Only the
//! document structure is checked here; names and references are left to
//! [`validate`](crate::validate::validate) so that every defect is reported
//! in one run.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::model::System;

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(rename = "System")]
    system: System,
}

// ── ModelLoader ───────────────────────────────────────────────────────────────

/// Reads architecture models from YAML documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelLoader;

impl ModelLoader {
    /// Parse the model stored at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a structurally
    /// valid model document.
    pub fn load_from_file(path: &Path) -> Result<System> {
        info!("Loading architecture model from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open model file: {}", path.display()))?;

        Self::load_from_str(&content)
            .with_context(|| format!("Failed to parse model file: {}", path.display()))
    }

    /// Parse a model from an in-memory YAML document.
    pub fn load_from_str(content: &str) -> Result<System> {
        let file: ModelFile =
            serde_yaml::from_str(content).context("Invalid architecture model document")?;
        let mut system = file.system;

        // Registration order is document order.
        for executor in system.hosts.iter_mut().flat_map(|h| h.executors.iter_mut()) {
            for (seq, node) in executor.nodes.iter_mut().enumerate() {
                node.seq = seq;
            }
            debug!(
                executor = %executor.name,
                nodes = executor.nodes.len(),
                "executor loaded"
            );
        }

        info!(
            system = %system.name,
            hosts = system.hosts.len(),
            executors = system.executor_count(),
            nodes = system.nodes().count(),
            "architecture model loaded"
        );
        Ok(system)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
