//! flotilla-state — fleet telemetry types and registry for Flotilla.
//!
//! Holds the domain types the placement engine consumes (servers and
//! their most recent health samples) and the `FleetRegistry`, the
//! in-process boundary object that external collaborators write into:
//!
//! ```text
//! Health collector ──► record_health()  ┐
//! Deployment queue ──► set_queue_depth() ├─► FleetRegistry ──► snapshot()
//! Ops / drain flow ──► set_draining()   ┘        │
//!                                                └─► flotilla-placement
//! ```
//!
//! The registry keeps only the latest sample per server; it is not a
//! time series and does not persist anything. It is `Clone + Send +
//! Sync` (a handle over shared state) so collectors and placement
//! requests can share it across threads without coordination.

pub mod registry;
pub mod types;

pub use registry::FleetRegistry;
pub use types::{HealthSample, Server, ServerId};
