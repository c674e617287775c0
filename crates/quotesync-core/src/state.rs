//! Shared sync state types.

use std::fmt;

/// Phase of the sync orchestrator.
///
/// A cycle walks `Idle -> Fetching -> Merging -> Committing -> Idle`; cycles
/// that fetch nothing or change nothing return to `Idle` early.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
    Merging,
    Committing,
}

impl SyncPhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Merging => "merging",
            Self::Committing => "committing",
        };
        f.write_str(label)
    }
}

/// What started a sync cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Recurring timer tick
    Timer,
    /// Explicit user request
    Manual,
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::Manual => f.write_str("manual"),
        }
    }
}
