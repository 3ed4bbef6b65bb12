//! Placement error types.

use thiserror::Error;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that can occur during placement.
///
/// Malformed telemetry is never an error: extreme or missing metrics are
/// absorbed by clamping and optimistic defaults inside scoring. The only
/// runtime failure is an empty eligible set.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Every candidate was excluded (or none were offered). The counts
    /// let the orchestrator log why the fleet had nothing to offer.
    #[error(
        "no eligible server: {candidates} candidate(s), {overloaded} critically overloaded, {draining} draining"
    )]
    NoEligibleServer {
        candidates: usize,
        overloaded: usize,
        draining: usize,
    },

    /// Scoring weights must sum to 1.0 and be non-negative.
    #[error("invalid scoring weights: sum is {sum}, expected 1.0")]
    InvalidWeights { sum: f64 },
}
