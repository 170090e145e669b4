//! Validation errors raised by the input adapter.
//!
//! Only malformed input is an error. A payload that is merely *absent*
//! (no before/after snapshot, empty class list) is the no-data condition
//! and surfaces as `Ok(None)` from the adapter, never as a variant here.

use thiserror::Error;

/// Which of the two snapshots a length mismatch was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSide {
    Before,
    After,
}

impl std::fmt::Display for SnapshotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Malformed-input failures. Raised before any calculator runs; a failed
/// validation never produces partial results.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A probability vector does not match the class-name list in length.
    /// Silent truncation or zero-padding would mask upstream bugs, so this
    /// is a hard failure.
    #[error("{which} probabilities have length {actual}, expected {expected} (one per class)")]
    ProbabilityLengthMismatch {
        which: SnapshotSide,
        expected: usize,
        actual: usize,
    },

    /// A probability entry falls outside [0, 1].
    #[error("{which} probability at class index {class_index} is {value}, outside [0, 1]")]
    ProbabilityOutOfRange {
        which: SnapshotSide,
        class_index: usize,
        value: f64,
    },

    /// A snapshot confidence falls outside [0, 1].
    #[error("{which} confidence is {value}, outside [0, 1]")]
    ConfidenceOutOfRange { which: SnapshotSide, value: f64 },

    /// The after-image year precedes the before-image year.
    #[error("after_year {after} precedes before_year {before}")]
    YearOrder { before: i32, after: i32 },

    /// Assumed ground area must be a positive, finite number of km².
    #[error("assumed area must be positive and finite, got {value} km²")]
    InvalidArea { value: f64 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
