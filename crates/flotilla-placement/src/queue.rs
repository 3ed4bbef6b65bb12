//! Queued-deployment lookup seam.
//!
//! The deployment queue is an external collaborator: placement only
//! reads an integer backlog per server. The lookup is injected so the
//! scorer stays pure and tests can substitute a fixed table.

use std::collections::HashMap;

use flotilla_state::FleetRegistry;

/// Source of the queued/in-flight deployment count for a server.
///
/// Unknown ids must report zero, matching the optimistic default for
/// missing health samples.
pub trait QueueDepthSource {
    fn queued_deployments(&self, server_id: &str) -> u32;
}

impl QueueDepthSource for FleetRegistry {
    fn queued_deployments(&self, server_id: &str) -> u32 {
        self.queue_depth(server_id)
    }
}

/// Fixed table, handy in tests and simulations.
impl QueueDepthSource for HashMap<String, u32> {
    fn queued_deployments(&self, server_id: &str) -> u32 {
        self.get(server_id).copied().unwrap_or(0)
    }
}

/// Adapter turning a plain function or closure into a source.
pub struct QueueDepthFn<F>(pub F);

impl<F> QueueDepthSource for QueueDepthFn<F>
where
    F: Fn(&str) -> u32,
{
    fn queued_deployments(&self, server_id: &str) -> u32 {
        (self.0)(server_id)
    }
}
