//! Weighted fitness scoring for placement candidates.
//!
//! Produces a comparable score in `0.0..=100.0` per server from five
//! pressure signals: CPU, memory, and disk utilization from the latest
//! health sample, running-container density, and queued deployment
//! backlog. 100 means completely idle, 0 means saturated.
//!
//! A server with no health sample scores as fully idle on the sampled
//! axes. Unknown load is optimistic by design: a machine that has never
//! reported must still be placeable.

use serde::{Deserialize, Serialize};

use flotilla_state::Server;

use crate::error::{PlacementError, PlacementResult};

/// Points of container sub-score lost per running container.
/// Saturates at 50 running containers.
pub const CONTAINER_PENALTY: f64 = 2.0;

/// Points of queue sub-score lost per queued deployment.
/// Saturates at 10 queued deployments.
pub const QUEUE_PENALTY: f64 = 10.0;

/// Tolerance for the unit-sum check on weights.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

// ── Weights ────────────────────────────────────────────────────────

/// Weights for the five score components.
///
/// Structural invariant: the weights are non-negative and sum to 1.0,
/// which is what keeps the composite score inside `0.0..=100.0`. The
/// fields stay private and the validating constructor is the only way
/// to build a non-default set.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    cpu: f64,
    memory: f64,
    disk: f64,
    containers: f64,
    queued: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            cpu: 0.30,
            memory: 0.30,
            disk: 0.20,
            containers: 0.10,
            queued: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Build a custom weight set, rejecting anything that would break
    /// the unit-sum invariant.
    pub fn new(cpu: f64, memory: f64, disk: f64, containers: f64, queued: f64) -> PlacementResult<Self> {
        let weights = Self {
            cpu,
            memory,
            disk,
            containers,
            queued,
        };
        let sum = weights.sum();
        let non_negative = cpu >= 0.0 && memory >= 0.0 && disk >= 0.0 && containers >= 0.0 && queued >= 0.0;
        if !non_negative || (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(PlacementError::InvalidWeights { sum });
        }
        Ok(weights)
    }

    pub fn sum(&self) -> f64 {
        self.cpu + self.memory + self.disk + self.containers + self.queued
    }
}

// ── Scoring ────────────────────────────────────────────────────────

/// Per-component sub-scores, each already clamped to `0.0..=100.0`.
/// Exposed alongside the composite score for observability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub containers: f64,
    pub queued: f64,
}

/// Scored result for a single server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerScore {
    pub server_id: String,
    /// Composite fitness, higher is better. Range: `0.0..=100.0`.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Headroom left on a utilization axis, clamped into `0.0..=100.0`.
///
/// Collectors report raw percentages that can exceed 100 or go negative
/// under measurement anomalies; the clamp keeps the composite bounded.
fn headroom(usage_percent: f64) -> f64 {
    (100.0 - usage_percent).clamp(0.0, 100.0)
}

/// Score a single server from its latest health sample and the queued
/// deployment count supplied by the caller.
pub fn score_server(server: &Server, queued_deployments: u32, weights: &ScoringWeights) -> ServerScore {
    // No sample: zero load on every sampled axis.
    let (cpu_pct, memory_pct, disk_pct, running) = match &server.health {
        Some(sample) => (
            sample.cpu_usage_percent,
            sample.memory_usage_percent,
            sample.disk_usage_percent,
            sample.running_containers(),
        ),
        None => (0.0, 0.0, 0.0, 0),
    };

    let breakdown = ScoreBreakdown {
        cpu: headroom(cpu_pct),
        memory: headroom(memory_pct),
        disk: headroom(disk_pct),
        containers: (100.0 - f64::from(running) * CONTAINER_PENALTY).clamp(0.0, 100.0),
        queued: (100.0 - f64::from(queued_deployments) * QUEUE_PENALTY).clamp(0.0, 100.0),
    };

    let score = breakdown.cpu * weights.cpu
        + breakdown.memory * weights.memory
        + breakdown.disk * weights.disk
        + breakdown.containers * weights.containers
        + breakdown.queued * weights.queued;

    ServerScore {
        server_id: server.id.clone(),
        score,
        breakdown,
    }
}
