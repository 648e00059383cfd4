/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! QoS policy domains and tag catalogues.
//!
//! The model keeps policies and tags as raw strings (that is what the input
//! carries); this module owns the fixed enumerations they must be drawn from.
//! Policy spellings follow the middleware's QoS string conversions.

use crate::diag::{DiagKind, Diagnostic};
use crate::model::QosProfile;

// ── Policy enumerations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    SystemDefault,
    KeepLast,
    KeepAll,
}

impl History {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_default" => Some(History::SystemDefault),
            "keep_last" => Some(History::KeepLast),
            "keep_all" => Some(History::KeepAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    SystemDefault,
    BestAvailable,
    Reliable,
    BestEffort,
}

impl Reliability {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_default" => Some(Reliability::SystemDefault),
            "best_available" => Some(Reliability::BestAvailable),
            "reliable" => Some(Reliability::Reliable),
            "best_effort" => Some(Reliability::BestEffort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    SystemDefault,
    BestAvailable,
    Volatile,
    TransientLocal,
}

impl Durability {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_default" => Some(Durability::SystemDefault),
            "best_available" => Some(Durability::BestAvailable),
            "volatile" => Some(Durability::Volatile),
            "transient_local" => Some(Durability::TransientLocal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveliness {
    Automatic,
    ManualByTopic,
    SystemDefault,
    BestAvailable,
}

impl Liveliness {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "automatic" => Some(Liveliness::Automatic),
            "manual_by_topic" => Some(Liveliness::ManualByTopic),
            "system_default" => Some(Liveliness::SystemDefault),
            "best_available" => Some(Liveliness::BestAvailable),
            _ => None,
        }
    }
}

/// Check every field of `qos`; `owner` names the entity carrying the record.
pub fn validate_qos(qos: &QosProfile, owner: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut bad = |policy: &str| {
        out.push(Diagnostic::error(
            DiagKind::Qos,
            format!("'{owner}' has invalid qos {policy} policy"),
        ))
    };

    if History::parse(&qos.history).is_none() {
        bad("history");
    }
    if qos.depth < 0 {
        bad("depth");
    }
    if Reliability::parse(&qos.reliability).is_none() {
        bad("reliability");
    }
    if Durability::parse(&qos.durability).is_none() {
        bad("durability");
    }
    if qos.deadline < 0 {
        bad("deadline");
    }
    if qos.lifespan < 0 {
        bad("lifespan");
    }
    if Liveliness::parse(&qos.liveliness).is_none() {
        bad("liveliness");
    }
    if qos.liveliness_lease_duration < 0 {
        bad("liveliness_lease_duration");
    }
    out
}

// ── Tag catalogues ────────────────────────────────────────────────────────────

pub const DDS_IMPLEMENTATIONS: &[&str] = &["Generic", "Cyclone", "Fast", "RTI connext", "Gurum"];

pub const EXECUTORS: &[&str] = &[
    "SingleThreadedExecutor",
    "MultiThreadedExecutor",
    "StaticSingleThreadedExecutor",
    "EventsExecutor",
];

pub const OPERATING_SYSTEMS: &[&str] = &[
    "Generic",
    "Windows",
    "Debian",
    "MacOS",
    "Ubuntu",
    "OpenEmbedded",
];

pub const ARCHITECTURES: &[&str] = &["Generic", "amd64", "arm64", "arm32"];

/// Distributions, newest first, short and long spellings.
pub const DISTRIBUTIONS: &[&str] = &[
    "Rolling",
    "Kilted",
    "Jazzy",
    "Iron",
    "Humble",
    "Galactic",
    "Foxy",
    "Eloquent",
    "Dashing",
    "Crystal",
    "Bouncy",
    "Ardent",
    "Rolling Ridley",
    "Kilted Kaiju",
    "Jazzy Jalisco",
    "Iron Irwini",
    "Humble Hawksbill",
    "Galactic Geochelone",
    "Foxy Fitzroy",
    "Eloquent Elusor",
    "Dashing Diademata",
    "Crystal Clemmys",
    "Bouncy Bolson",
    "Ardent Apalone",
];

/// Distributions whose single-threaded executor still uses the fixed
/// timers-before-subscriptions wait-set order.  Jazzy changed it.
pub const PRE_JAZZY_DISTRIBUTIONS: &[&str] = &[
    "Iron",
    "Humble",
    "Galactic",
    "Foxy",
    "Eloquent",
    "Dashing",
    "Crystal",
    "Bouncy",
    "Ardent",
    "Iron Irwini",
    "Humble Hawksbill",
    "Galactic Geochelone",
    "Foxy Fitzroy",
    "Eloquent Elusor",
    "Dashing Diademata",
    "Crystal Clemmys",
    "Bouncy Bolson",
    "Ardent Apalone",
];

/// Which catalogue a tag is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Dds,
    Distribution,
    OperatingSystem,
    Architecture,
    Executor,
}

impl TagKind {
    pub fn label(self) -> &'static str {
        match self {
            TagKind::Dds => "dds",
            TagKind::Distribution => "distribution",
            TagKind::OperatingSystem => "os",
            TagKind::Architecture => "architecture",
            TagKind::Executor => "executor",
        }
    }

    pub fn catalogue(self) -> &'static [&'static str] {
        match self {
            TagKind::Dds => DDS_IMPLEMENTATIONS,
            TagKind::Distribution => DISTRIBUTIONS,
            TagKind::OperatingSystem => OPERATING_SYSTEMS,
            TagKind::Architecture => ARCHITECTURES,
            TagKind::Executor => EXECUTORS,
        }
    }
}

/// `None` if `value` is in the catalogue for `kind`.
pub fn check_tag(kind: TagKind, value: &str) -> Option<Diagnostic> {
    if kind.catalogue().contains(&value) {
        None
    } else {
        Some(Diagnostic::error(
            DiagKind::Value,
            format!(
                "{} '{}' not among {:?}",
                kind.label(),
                value,
                kind.catalogue()
            ),
        ))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert!(validate_qos(&QosProfile::default(), "p").is_empty());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let qos = QosProfile {
            history: "keep_some".into(),
            depth: -1,
            reliability: "maybe".into(),
            durability: "forever".into(),
            deadline: -5,
            lifespan: -5,
            liveliness: "zombie".into(),
            liveliness_lease_duration: -1,
        };
        let diags = validate_qos(&qos, "pub1");
        assert_eq!(diags.len(), 8);
        assert!(diags.iter().all(|d| d.kind == DiagKind::Qos));
        assert!(diags[0].message.contains("'pub1' has invalid qos history policy"));
        assert!(diags[7]
            .message
            .contains("liveliness_lease_duration"));
    }

    #[test]
    fn zero_durations_are_in_range() {
        let qos = QosProfile {
            depth: 0,
            ..QosProfile::default()
        };
        assert!(validate_qos(&qos, "p").is_empty());
    }

    #[test]
    fn policy_parsers_cover_all_spellings() {
        assert_eq!(History::parse("keep_all"), Some(History::KeepAll));
        assert_eq!(Reliability::parse("best_effort"), Some(Reliability::BestEffort));
        assert_eq!(Durability::parse("transient_local"), Some(Durability::TransientLocal));
        assert_eq!(Liveliness::parse("manual_by_topic"), Some(Liveliness::ManualByTopic));
        assert_eq!(History::parse("KEEP_ALL"), None);
    }

    #[test]
    fn check_tag_accepts_catalogue_values() {
        assert!(check_tag(TagKind::Dds, "Cyclone").is_none());
        assert!(check_tag(TagKind::Distribution, "Humble Hawksbill").is_none());
        assert!(check_tag(TagKind::Executor, "EventsExecutor").is_none());
    }

    #[test]
    fn check_tag_rejects_unknown_value() {
        let d = check_tag(TagKind::OperatingSystem, "ubuntu 1").unwrap();
        assert_eq!(d.kind, DiagKind::Value);
        assert!(d.message.starts_with("os 'ubuntu 1' not among"));
    }

    #[test]
    fn pre_jazzy_distributions_are_valid_distributions() {
        for d in PRE_JAZZY_DISTRIBUTIONS {
            assert!(DISTRIBUTIONS.contains(d), "{d} missing from catalogue");
        }
        assert!(!PRE_JAZZY_DISTRIBUTIONS.contains(&"Jazzy"));
        assert!(!PRE_JAZZY_DISTRIBUTIONS.contains(&"Rolling"));
    }
}
