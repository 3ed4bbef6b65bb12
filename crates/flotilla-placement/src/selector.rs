//! Fleet selection — overload guard, ranking, and best-server choice.
//!
//! Eligibility is decided before any weighting: a server past the
//! critical-overload threshold on a single axis is excluded no matter
//! how good its composite score would look, and draining servers never
//! receive new work. Only the survivors are scored and ranked.

use std::cmp::Ordering;

use tracing::{debug, warn};

use flotilla_state::Server;

use crate::error::{PlacementError, PlacementResult};
use crate::queue::QueueDepthSource;
use crate::scorer::{ScoringWeights, ServerScore, score_server};

/// A server above this utilization on any single axis is excluded from
/// placement outright. Strictly greater-than: exactly 90% still counts
/// as eligible.
pub const OVERLOAD_THRESHOLD_PERCENT: f64 = 90.0;

/// True if any single utilization axis is past the critical threshold.
///
/// A server with no health sample is never critically overloaded, the
/// same optimistic default scoring applies to unknown load.
pub fn is_critically_overloaded(server: &Server) -> bool {
    match &server.health {
        Some(sample) => {
            sample.cpu_usage_percent > OVERLOAD_THRESHOLD_PERCENT
                || sample.memory_usage_percent > OVERLOAD_THRESHOLD_PERCENT
                || sample.disk_usage_percent > OVERLOAD_THRESHOLD_PERCENT
        }
        None => false,
    }
}

/// Ranks a fleet of candidate servers and picks placement targets.
///
/// The queue-depth source is injected so the selector stays a pure
/// function of its inputs; see [`QueueDepthSource`].
pub struct FleetSelector<Q> {
    queue: Q,
    weights: ScoringWeights,
}

impl<Q: QueueDepthSource> FleetSelector<Q> {
    /// Selector with the default weight set.
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            weights: ScoringWeights::default(),
        }
    }

    /// Selector with a custom (already validated) weight set.
    pub fn with_weights(queue: Q, weights: ScoringWeights) -> Self {
        Self { queue, weights }
    }

    /// Composite fitness score for one server, in `0.0..=100.0`.
    pub fn score(&self, server: &Server) -> ServerScore {
        let queued = self.queue.queued_deployments(&server.id);
        score_server(server, queued, &self.weights)
    }

    /// Score every eligible candidate and return them best-first.
    ///
    /// Overloaded and draining servers are filtered out before scoring.
    /// Ties break on the lexicographically smallest server id, so the
    /// ordering is deterministic regardless of input order.
    pub fn rank(&self, candidates: &[Server]) -> Vec<ServerScore> {
        let mut scores: Vec<ServerScore> = candidates
            .iter()
            .filter(|server| {
                if server.draining {
                    debug!(server = %server.id, "skipping draining server");
                    return false;
                }
                if is_critically_overloaded(server) {
                    debug!(server = %server.id, "skipping critically overloaded server");
                    return false;
                }
                true
            })
            .map(|server| {
                let scored = self.score(server);
                debug!(server = %scored.server_id, score = scored.score, "scored candidate");
                scored
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.server_id.cmp(&b.server_id))
        });
        scores
    }

    /// The best eligible placement target.
    ///
    /// Fails with [`PlacementError::NoEligibleServer`] when the
    /// candidate list is empty or every candidate is excluded; never
    /// falls back to an overloaded or draining server.
    pub fn select_best<'a>(&self, candidates: &'a [Server]) -> PlacementResult<&'a Server> {
        let ranked = self.rank(candidates);

        let Some(best) = ranked.first() else {
            let overloaded = candidates.iter().filter(|s| is_critically_overloaded(s)).count();
            let draining = candidates.iter().filter(|s| s.draining).count();
            warn!(
                candidates = candidates.len(),
                overloaded, draining, "no eligible server in fleet"
            );
            return Err(PlacementError::NoEligibleServer {
                candidates: candidates.len(),
                overloaded,
                draining,
            });
        };

        debug!(server = %best.server_id, score = best.score, "selected placement target");
        // rank() only emits ids taken from `candidates`.
        Ok(candidates
            .iter()
            .find(|s| s.id == best.server_id)
            .expect("ranked id missing from candidates"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flotilla_state::HealthSample;
    use std::collections::HashMap;

    fn server(id: &str, cpu: f64, memory: f64, disk: f64) -> Server {
        Server::new(id).with_health(HealthSample::utilization(cpu, memory, disk))
    }

    fn selector() -> FleetSelector<HashMap<String, u32>> {
        FleetSelector::new(HashMap::new())
    }

    #[test]
    fn ninety_percent_exactly_is_not_overloaded() {
        assert!(!is_critically_overloaded(&server("s", 90.0, 90.0, 90.0)));
    }

    #[test]
    fn any_axis_past_ninety_is_overloaded() {
        assert!(is_critically_overloaded(&server("s", 90.1, 0.0, 0.0)));
        assert!(is_critically_overloaded(&server("s", 0.0, 91.0, 0.0)));
        assert!(is_critically_overloaded(&server("s", 0.0, 0.0, 95.0)));
    }

    #[test]
    fn server_without_sample_is_never_overloaded() {
        assert!(!is_critically_overloaded(&Server::new("fresh")));
    }

    #[test]
    fn select_best_prefers_highest_score() {
        let fleet = vec![
            server("loaded", 70.0, 70.0, 70.0),
            server("idle", 5.0, 5.0, 5.0),
            server("medium", 40.0, 40.0, 40.0),
        ];

        let best = selector().select_best(&fleet).unwrap();
        assert_eq!(best.id, "idle");
    }

    #[test]
    fn overloaded_server_is_never_selected_even_with_best_score() {
        // 95% CPU but otherwise untouched: its weighted score beats the
        // moderately loaded alternative, the guard must still win.
        let fleet = vec![
            server("cpu-pegged", 95.0, 0.0, 0.0),
            server("honest", 50.0, 50.0, 50.0),
        ];

        let sel = selector();
        let overloaded_score = sel.score(&fleet[0]).score;
        let honest_score = sel.score(&fleet[1]).score;
        assert!(overloaded_score > honest_score);

        let best = sel.select_best(&fleet).unwrap();
        assert_eq!(best.id, "honest");
    }

    #[test]
    fn all_overloaded_fleet_reports_no_eligible_server() {
        let fleet = vec![
            server("a", 99.0, 0.0, 0.0),
            server("b", 0.0, 99.0, 0.0),
        ];

        let err = selector().select_best(&fleet).unwrap_err();
        match err {
            PlacementError::NoEligibleServer {
                candidates,
                overloaded,
                draining,
            } => {
                assert_eq!(candidates, 2);
                assert_eq!(overloaded, 2);
                assert_eq!(draining, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_fleet_reports_no_eligible_server() {
        let err = selector().select_best(&[]).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::NoEligibleServer { candidates: 0, .. }
        ));
    }

    #[test]
    fn draining_server_is_excluded() {
        let mut draining = server("drained", 1.0, 1.0, 1.0);
        draining.draining = true;
        let fleet = vec![draining, server("worker", 60.0, 60.0, 60.0)];

        let best = selector().select_best(&fleet).unwrap();
        assert_eq!(best.id, "worker");

        let ranked = selector().rank(&fleet);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn ties_break_on_smallest_id_regardless_of_input_order() {
        let twin_a = server("alpha", 30.0, 30.0, 30.0);
        let twin_b = server("beta", 30.0, 30.0, 30.0);

        let fleet = [twin_b.clone(), twin_a.clone()];
        let best = selector().select_best(&fleet).unwrap();
        assert_eq!(best.id, "alpha");

        let fleet = [twin_a, twin_b];
        let best = selector().select_best(&fleet).unwrap();
        assert_eq!(best.id, "alpha");
    }

    #[test]
    fn rank_orders_descending_and_skips_excluded() {
        let fleet = vec![
            server("hot", 92.0, 0.0, 0.0),
            server("busy", 80.0, 80.0, 80.0),
            server("calm", 10.0, 10.0, 10.0),
        ];

        let ranked = selector().rank(&fleet);
        let ids: Vec<_> = ranked.iter().map(|s| s.server_id.as_str()).collect();

        assert_eq!(ids, vec!["calm", "busy"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn queue_backlog_shifts_the_ranking() {
        // Identical telemetry, only the backlog differs.
        let fleet = vec![
            server("queued-up", 20.0, 20.0, 20.0),
            server("quiet", 20.0, 20.0, 20.0),
        ];
        let mut depths = HashMap::new();
        depths.insert("queued-up".to_string(), 8);

        let best = FleetSelector::new(depths).select_best(&fleet).unwrap();
        assert_eq!(best.id, "quiet");
    }

    #[test]
    fn selector_reads_depths_through_a_registry() {
        use flotilla_state::FleetRegistry;

        let registry = FleetRegistry::new();
        registry.record_health("srv-a", HealthSample::utilization(10.0, 10.0, 10.0));
        registry.record_health("srv-b", HealthSample::utilization(10.0, 10.0, 10.0));
        registry.set_queue_depth("srv-a", 6);

        let fleet = registry.snapshot();
        let best = FleetSelector::new(registry).select_best(&fleet).unwrap();
        assert_eq!(best.id, "srv-b");
    }

    #[test]
    fn custom_weights_change_the_outcome() {
        // Disk-heavy weighting flips the winner.
        let fleet = vec![
            server("disk-full", 10.0, 10.0, 85.0),
            server("cpu-hot", 85.0, 10.0, 10.0),
        ];

        let default_best = selector().select_best(&fleet).unwrap().id.clone();

        let disk_heavy = ScoringWeights::new(0.05, 0.05, 0.80, 0.05, 0.05).unwrap();
        let weighted = FleetSelector::with_weights(HashMap::new(), disk_heavy);
        let weighted_best = weighted.select_best(&fleet).unwrap().id.clone();

        assert_ne!(default_best, weighted_best);
        assert_eq!(weighted_best, "cpu-hot");
    }
}
