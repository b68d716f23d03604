/// Run phase definitions for tracking an extraction run
///
/// A run moves strictly forward through these phases; any phase may abort.
use std::fmt;

/// Represents the current phase of an extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    // ===== Setup =====
    /// Nothing has been done yet
    Idle,

    /// robots.txt permitted the run
    PolicyChecked,

    /// The identifier catalog has been fetched
    CatalogResolved,

    // ===== Extraction =====
    /// Identifiers are still being handed to the worker pool
    Dispatching,

    /// Every identifier has been handed out; waiting on the last tasks
    Draining,

    // ===== Terminal =====
    /// Every identifier has been accounted for
    Done,

    /// Stopped early by a fatal error or an interrupt
    Aborted,
}

impl RunPhase {
    /// Returns true if the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true while worker tasks may be in flight
    pub fn is_extracting(&self) -> bool {
        matches!(self, Self::Dispatching | Self::Draining)
    }

    /// Whether moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        match (self, next) {
            (from, Self::Aborted) => !from.is_terminal(),
            (Self::Idle, Self::PolicyChecked)
            | (Self::PolicyChecked, Self::CatalogResolved)
            | (Self::CatalogResolved, Self::Dispatching)
            | (Self::Dispatching, Self::Draining)
            | (Self::Draining, Self::Done) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PolicyChecked => "policy_checked",
            Self::CatalogResolved => "catalog_resolved",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Returns all phases in run order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::PolicyChecked,
            Self::CatalogResolved,
            Self::Dispatching,
            Self::Draining,
            Self::Done,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
