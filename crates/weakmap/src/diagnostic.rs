//! Non-fatal data-quality findings.
//!
//! The layout core degrades gracefully on bad input instead of failing. Every
//! place where it has to guess (a dangling reference, a duplicate id, a cycle
//! that forced a layer rescue) is recorded as a [`Diagnostic`], logged at
//! `warn` level, and handed back to the caller with the finished map.

use std::fmt;

use serde::Serialize;

use weakmap_core::identifier::Id;

/// Which reference list of a topic a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Prerequisite,
    Dependency,
}

impl ReferenceKind {
    /// The list the other side of the relation is expected to use.
    pub fn inverse(self) -> Self {
        match self {
            Self::Prerequisite => Self::Dependency,
            Self::Dependency => Self::Prerequisite,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prerequisite => f.write_str("prerequisite"),
            Self::Dependency => f.write_str("dependency"),
        }
    }
}

/// Why the layerizer had to seed a frontier by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RescueReason {
    /// Every topic has an incoming edge, so there is no root to start from.
    NoRoots,
    /// Unplaced topics remain but none has all of its prerequisites placed.
    Stalled,
}

/// A non-fatal finding about the input topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A reference matched neither a topic id nor a topic name.
    UnresolvedReference {
        topic: Id,
        reference: Id,
        list: ReferenceKind,
    },

    /// A topic references itself.
    SelfReference { topic: Id, list: ReferenceKind },

    /// A topic id appeared more than once; the later record at `position` was dropped.
    DuplicateTopic { id: Id, position: usize },

    /// `topic` lists `other` in `list`, but `other` does not list `topic` back.
    InconsistentDependency {
        topic: Id,
        other: Id,
        list: ReferenceKind,
    },

    /// The layerizer placed `topic` without its prerequisites being placed first.
    LayerRescue {
        topic: Id,
        layer: usize,
        reason: RescueReason,
    },

    /// Topics that depend on each other in a cycle.
    Cycle { members: Vec<Id> },
}

impl Diagnostic {
    /// A stable short code, used for log keys and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::SelfReference { .. } => "self_reference",
            Self::DuplicateTopic { .. } => "duplicate_topic",
            Self::InconsistentDependency { .. } => "inconsistent_dependency",
            Self::LayerRescue { .. } => "layer_rescue",
            Self::Cycle { .. } => "cycle",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference {
                topic,
                reference,
                list,
            } => write!(
                f,
                "topic `{topic}` has {list} `{reference}` that matches no topic id or name"
            ),
            Self::SelfReference { topic, list } => {
                write!(f, "topic `{topic}` lists itself as a {list}")
            }
            Self::DuplicateTopic { id, position } => {
                write!(f, "duplicate topic id `{id}` at position {position} was ignored")
            }
            Self::InconsistentDependency { topic, other, list } => write!(
                f,
                "topic `{topic}` lists `{other}` as a {list}, but `{other}` does not list `{topic}` as a {}",
                list.inverse()
            ),
            Self::LayerRescue {
                topic,
                layer,
                reason,
            } => match reason {
                RescueReason::NoRoots => write!(
                    f,
                    "no topic is free of prerequisites; started from `{topic}` at layer {layer}"
                ),
                RescueReason::Stalled => write!(
                    f,
                    "topic `{topic}` was placed at layer {layer} before all of its prerequisites"
                ),
            },
            Self::Cycle { members } => {
                let names: Vec<String> = members.iter().map(Id::to_string).collect();
                write!(f, "prerequisite cycle between {}", names.join(", "))
            }
        }
    }
}
