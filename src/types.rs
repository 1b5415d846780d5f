//! Shared types used by the image chores and the CLI output layer.

use crate::imaging::Outcome;
use std::fmt;
use std::path::PathBuf;

/// Progress reported by the image chores while they run.
///
/// Sent over an `mpsc` channel so a printer thread can show output as it
/// happens; the pipelines themselves never print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A new output file was written and verified.
    Created { path: PathBuf },
    /// Writing an output failed; the partial file was removed.
    Failed { path: PathBuf, reason: String },
    /// A source could not be identified, so none of its outputs were planned.
    Unreadable { source: PathBuf, reason: String },
    /// A stale file was deleted.
    Removed { path: PathBuf },
}

/// Counts for one run of an image chore.
///
/// Everything that is not `created` counts as skipped in the summary line;
/// the breakdown is kept for tests and verbose output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub created: u32,
    /// Outputs that were already present.
    pub existing: u32,
    /// Rendition widths larger than their original.
    pub too_small: u32,
    /// Outputs that failed to encode or verify.
    pub failed: u32,
}

impl RunStats {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let mut stats = Self::default();
        match outcome {
            Outcome::Created => stats.created = 1,
            Outcome::Existing => stats.existing = 1,
            Outcome::Failed(_) => stats.failed = 1,
        }
        stats
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            created: self.created + other.created,
            existing: self.existing + other.existing,
            too_small: self.too_small + other.too_small,
            failed: self.failed + other.failed,
        }
    }

    pub fn skipped(&self) -> u32 {
        self.existing + self.too_small + self.failed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "created: {}, skipped: {}", self.created, self.skipped())
    }
}
