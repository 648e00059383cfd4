/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Diagnostics shared by every pipeline stage.
//!
//! Model defects are never raised as errors.  Each validating function returns
//! its own `Vec<Diagnostic>` and the caller concatenates them, so one run
//! reports every defect in the model.

use std::fmt;

// ── Kind / level ──────────────────────────────────────────────────────────────

/// Which family of defect a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagKind {
    /// Missing or duplicate entity name.
    Naming,
    /// Dangling reference, or reference across an ownership boundary.
    Reference,
    /// QoS field outside its enumerated / ranged domain.
    Qos,
    /// Tag or numeric field outside its domain (distribution, OS, WCET, ...).
    Value,
    /// Dangling consumer, ambiguous producer or data-flow cycle.
    Topology,
    /// Node matches no supported archetype.
    Classification,
    /// Lowering-only violation (multi-host, unsupported capability, ...).
    Precondition,
}

impl DiagKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagKind::Naming => "naming",
            DiagKind::Reference => "reference",
            DiagKind::Qos => "qos",
            DiagKind::Value => "value",
            DiagKind::Topology => "topology",
            DiagKind::Classification => "classification",
            DiagKind::Precondition => "precondition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    /// Informational; never blocks lowering.
    Warning,
}

// ── Diagnostic ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagKind,
    pub level: DiagLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            level: DiagLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            level: DiagLevel::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        write!(f, "{}[{}]: {}", level, self.kind.label(), self.message)
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Ordered diagnostics split into errors and warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Report {
    /// Partition `diagnostics` by level, preserving order inside each level.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let (errors, warnings) = diagnostics.into_iter().partition(Diagnostic::is_error);
        Self { errors, warnings }
    }

    pub fn extend(&mut self, diagnostics: Vec<Diagnostic>) {
        for d in diagnostics {
            if d.is_error() {
                self.errors.push(d);
            } else {
                self.warnings.push(d);
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors of one kind, in order.
    pub fn errors_of(&self, kind: DiagKind) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(move |d| d.kind == kind)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|d| d.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|d| d.message.clone()).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_level_and_kind() {
        let d = Diagnostic::error(DiagKind::Naming, "node owned by 'e' is missing name");
        assert_eq!(
            d.to_string(),
            "error[naming]: node owned by 'e' is missing name"
        );
        let w = Diagnostic::warning(DiagKind::Qos, "depth differs");
        assert_eq!(w.to_string(), "warning[qos]: depth differs");
    }

    #[test]
    fn report_partitions_and_keeps_order() {
        let report = Report::from_diagnostics(vec![
            Diagnostic::error(DiagKind::Naming, "e1"),
            Diagnostic::warning(DiagKind::Qos, "w1"),
            Diagnostic::error(DiagKind::Reference, "e2"),
        ]);
        assert_eq!(report.error_messages(), vec!["e1", "e2"]);
        assert_eq!(report.warning_messages(), vec!["w1"]);
        assert!(!report.is_clean());
        assert_eq!(report.errors_of(DiagKind::Reference).count(), 1);
    }

    #[test]
    fn warnings_alone_keep_report_clean() {
        let mut report = Report::default();
        report.extend(vec![Diagnostic::warning(DiagKind::Qos, "w")]);
        assert!(report.is_clean());
    }
}
