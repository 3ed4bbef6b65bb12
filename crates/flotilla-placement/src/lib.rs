//! flotilla-placement — fleet scoring and placement selection.
//!
//! Decides where the next deployment lands: every candidate server is
//! scored on live resource pressure, critically overloaded and draining
//! machines are excluded outright, and the best survivor wins. This
//! crate is pure and synchronous — no I/O, no locking, no retries —
//! so it is safe to call from any number of concurrent placement
//! requests. Reserving the chosen server against races is the
//! orchestrator's job, not this crate's.
//!
//! # Components
//!
//! ```text
//! FleetSelector
//!   ├── QueueDepthSource (injected backlog lookup)
//!   ├── is_critically_overloaded() + drain filter  → eligibility
//!   ├── score_server() → ServerScore (weighted, 0..=100)
//!   ├── rank() → best-first, deterministic tie-break
//!   └── select_best() → &Server | NoEligibleServer
//! ```
//!
//! Scoring weights: CPU 0.30, memory 0.30, disk 0.20, container density
//! 0.10, queued backlog 0.10 — they sum to 1.0, which bounds the
//! composite score to `0.0..=100.0` given clamped sub-scores.

pub mod error;
pub mod queue;
pub mod scorer;
pub mod selector;

pub use error::{PlacementError, PlacementResult};
pub use queue::{QueueDepthFn, QueueDepthSource};
pub use scorer::{ScoreBreakdown, ScoringWeights, ServerScore, score_server};
pub use selector::{FleetSelector, OVERLOAD_THRESHOLD_PERCENT, is_critically_overloaded};
