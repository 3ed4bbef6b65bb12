//! Domain types for the Flotilla fleet.
//!
//! These types describe placement candidates as the rest of the control
//! plane reports them: a server identity plus the most recent health
//! sample observed for it. All types are JSON-serializable so the
//! control plane can log, persist, or ship them over its API unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a server in the fleet.
pub type ServerId = String;

/// Container state name used for density scoring.
pub const RUNNING_STATE: &str = "running";

// ── Server ─────────────────────────────────────────────────────────

/// A candidate placement target.
///
/// `health` is the latest sample the health collector stored for this
/// server, or `None` if the server has never reported. The placement
/// engine treats a missing sample as a fully idle server so that
/// brand-new machines are not excluded from selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    pub id: ServerId,
    /// Ownership / team metadata. Opaque to placement, carried for callers.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Most recent health sample, if the server has ever reported one.
    #[serde(default)]
    pub health: Option<HealthSample>,
    /// Draining servers are being emptied for maintenance or scale-down
    /// and must not receive new deployments.
    #[serde(default)]
    pub draining: bool,
}

impl Server {
    /// A server that has never reported health.
    pub fn new(id: impl Into<ServerId>) -> Self {
        Self {
            id: id.into(),
            labels: HashMap::new(),
            health: None,
            draining: false,
        }
    }

    /// Same server with the given health sample attached.
    pub fn with_health(mut self, sample: HealthSample) -> Self {
        self.health = Some(sample);
        self
    }
}

// ── HealthSample ───────────────────────────────────────────────────

/// A point-in-time resource-utilization snapshot for one server.
///
/// Percentages are reported as-is by the collector and are NOT clamped
/// at the source: measurement anomalies can push them above 100 or
/// below 0. Consumers must clamp before deriving anything from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthSample {
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub disk_usage_percent: f64,
    /// Container state name → count. A `null` in the wire format and an
    /// empty map mean the same thing: nothing is running.
    #[serde(default)]
    pub container_counts: Option<HashMap<String, u32>>,
}

impl HealthSample {
    /// Sample with only utilization percentages set.
    pub fn utilization(cpu: f64, memory: f64, disk: f64) -> Self {
        Self {
            cpu_usage_percent: cpu,
            memory_usage_percent: memory,
            disk_usage_percent: disk,
            container_counts: None,
        }
    }

    /// Count of containers currently in the `running` state.
    ///
    /// Absent or empty `container_counts` both report zero.
    pub fn running_containers(&self) -> u32 {
        self.container_counts
            .as_ref()
            .and_then(|counts| counts.get(RUNNING_STATE))
            .copied()
            .unwrap_or(0)
    }
}
