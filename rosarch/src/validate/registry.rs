/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-kind name registry: `(EntityKind, name) → owner name`.
//!
//! Names are unique per kind across the whole system, not just inside their
//! owner.  Ownership is recovered from here rather than from parent links.

use std::collections::BTreeMap;
use std::fmt;

use crate::diag::{DiagKind, Diagnostic};

/// Every named entity kind in the architecture model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Host,
    Executor,
    Node,
    Publisher,
    Timer,
    Callback,
    Variable,
    Service,
    Client,
    Action,
    ExternalInput,
    ExternalOutput,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Host => "host",
            EntityKind::Executor => "executor",
            EntityKind::Node => "node",
            EntityKind::Publisher => "publisher",
            EntityKind::Timer => "timer",
            EntityKind::Callback => "callback",
            EntityKind::Variable => "variable",
            EntityKind::Service => "service",
            EntityKind::Client => "client",
            EntityKind::Action => "action",
            EntityKind::ExternalInput => "external_input",
            EntityKind::ExternalOutput => "external_output",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name registry built by the validator's first pass.
///
/// `BTreeMap` at both levels so iteration (and therefore any report built from
/// it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<EntityKind, BTreeMap<String, String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` of `kind` as owned by `owner`.
    ///
    /// Returns a naming error if the name is empty or already registered for
    /// this kind; the caller must then skip the entity's subtree.
    pub fn register(&mut self, name: &str, kind: EntityKind, owner: &str) -> Result<(), Diagnostic> {
        if name.is_empty() {
            return Err(Diagnostic::error(
                DiagKind::Naming,
                format!("{kind} owned by '{owner}' is missing name. Skipping validation of branch."),
            ));
        }

        let names = self.entries.entry(kind).or_default();
        if names.contains_key(name) {
            return Err(Diagnostic::error(
                DiagKind::Naming,
                format!(
                    "{kind} '{name}' has multiple owners, or name is not unique among {kind}s. \
                     Skipping validation of branch."
                ),
            ));
        }

        names.insert(name.to_string(), owner.to_string());
        Ok(())
    }

    /// Check that `name` of `kind` is registered under `expected_owner`.
    ///
    /// `referrer` is the entity holding the reference; it is named in the
    /// message together with the referenced entity.
    pub fn verify_registration(
        &self,
        name: &str,
        kind: EntityKind,
        expected_owner: &str,
        referrer: &str,
    ) -> Option<Diagnostic> {
        match self.owner_of(kind, name) {
            None => Some(Diagnostic::error(
                DiagKind::Reference,
                format!(
                    "Dangling reference: '{referrer}' expects {kind} '{name}', \
                     which is not registered to any owner"
                ),
            )),
            Some(owner) if owner != expected_owner => Some(Diagnostic::error(
                DiagKind::Reference,
                format!(
                    "Reference crosses ownership boundary: '{referrer}' expects {kind} '{name}' \
                     inside '{expected_owner}', but it is owned by '{owner}'"
                ),
            )),
            Some(_) => None,
        }
    }

    pub fn owner_of(&self, kind: EntityKind, name: &str) -> Option<&str> {
        self.entries
            .get(&kind)
            .and_then(|m| m.get(name))
            .map(String::as_str)
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.owner_of(kind, name).is_some()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entries.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Total number of registered entities across all kinds.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
