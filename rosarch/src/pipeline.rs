/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! End-to-end run: validate, check lowering preconditions, lower, analyse.
//!
//! ```text
//! validate ──✗──► Malformed
//!    │ ✓
//! classify + check_preconditions ──✗──► Rejected
//!    │ ✓
//! lower ──► feasibility, hyperperiod ──► Lowered
//! ```
//!
//! Each stage runs to completion before the next starts.  Indexes built on
//! the way are dropped at the end of the call; nothing is shared between
//! runs.

use tracing::{info, warn};

use crate::diag::{DiagKind, Diagnostic, Report};
use crate::hyperperiod::{self, HyperperiodInfo, DEFAULT_HYPERPERIOD_LIMIT};
use crate::lowering::{self, feasibility, LowerError, LoweringOptions, TargetSystem};
use crate::model::System;
use crate::validate::{self, Validation};

/// A successfully lowered system with its analysis results.
#[derive(Debug, Clone)]
pub struct Lowered {
    pub target: TargetSystem,
    /// Precondition and feasibility warnings.
    pub warnings: Vec<Diagnostic>,
    /// Executor utilisation of the target system.
    pub utilization: f64,
    /// `None` when there is no periodic node or the limit is exceeded.
    pub hyperperiod: Option<HyperperiodInfo>,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Well-formedness failed; lowering was not attempted.
    Malformed(Validation),
    /// Well-formed, but outside the lowering preconditions.
    Rejected { validation: Validation, report: Report },
    Lowered(Lowered),
}

impl PipelineOutcome {
    pub fn is_lowered(&self) -> bool {
        matches!(self, PipelineOutcome::Lowered(_))
    }

    pub fn target(&self) -> Option<&TargetSystem> {
        match self {
            PipelineOutcome::Lowered(l) => Some(&l.target),
            _ => None,
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            PipelineOutcome::Malformed(v) => &v.report.errors,
            PipelineOutcome::Rejected { report, .. } => &report.errors,
            PipelineOutcome::Lowered(_) => &[],
        }
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        match self {
            PipelineOutcome::Malformed(v) => &v.report.warnings,
            PipelineOutcome::Rejected { report, .. } => &report.warnings,
            PipelineOutcome::Lowered(l) => &l.warnings,
        }
    }
}

/// Run the whole pipeline over `system`.
///
/// Model defects come back inside the outcome.  `Err` is reserved for
/// contradictions between classifier and mapper, which no input can cause.
pub fn run(system: &System, options: &LoweringOptions) -> Result<PipelineOutcome, LowerError> {
    let validation = validate::validate(system);
    if !validation.is_well_formed() {
        warn!(
            system = %system.name,
            errors = validation.report.errors.len(),
            "model is not well formed, lowering skipped"
        );
        return Ok(PipelineOutcome::Malformed(validation));
    }

    let classes = lowering::classify_all(system);
    let report = lowering::check_preconditions(system, &validation.interfaces, &classes, options);
    if !report.is_clean() {
        warn!(
            system = %system.name,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "lowering preconditions not met"
        );
        return Ok(PipelineOutcome::Rejected { validation, report });
    }

    let target = lowering::lower(system, &classes, options)?;
    let mut warnings = report.warnings;

    let utilization = feasibility::utilization(&target);
    if let Some(u) = feasibility::check_utilization(&target) {
        warn!(system = %target.name, utilization = u, "executor overloaded");
        warnings.push(Diagnostic::warning(
            DiagKind::Precondition,
            format!("Executor utilisation {u:.2} exceeds 1.0; the target system is overloaded"),
        ));
    }

    let hyperperiod = match hyperperiod::hyperperiod(&target, DEFAULT_HYPERPERIOD_LIMIT) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(system = %target.name, "hyperperiod unavailable: {e}");
            None
        }
    };

    info!(
        system = %target.name,
        nodes = target.nodes.len(),
        utilization,
        warnings = warnings.len(),
        "lowering finished"
    );

    Ok(PipelineOutcome::Lowered(Lowered {
        target,
        warnings,
        utilization,
        hyperperiod,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
