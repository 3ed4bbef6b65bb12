//! FleetRegistry — latest-known telemetry per server.
//!
//! The registry is the seam between the external collaborators (health
//! collector, deployment queue, drain workflows) and the placement
//! engine. Writers overwrite in place; readers take point-in-time
//! snapshots. There is no history and no persistence.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::types::{HealthSample, Server, ServerId};

#[derive(Debug, Default)]
struct FleetInner {
    /// BTreeMap keeps snapshots in stable id order.
    servers: BTreeMap<ServerId, Server>,
    queue_depths: BTreeMap<ServerId, u32>,
}

/// Thread-safe registry of the latest fleet state.
///
/// Cloning is cheap: all clones share the same underlying state. Lock
/// scope is confined to each method, so the registry can be shared
/// between the health collector and concurrent placement requests.
#[derive(Debug, Clone, Default)]
pub struct FleetRegistry {
    inner: Arc<RwLock<FleetInner>>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server to the fleet, or replace its record entirely.
    pub fn upsert_server(&self, server: Server) {
        let mut inner = self.inner.write().expect("fleet registry lock poisoned");
        debug!(server = %server.id, "server upserted");
        inner.servers.insert(server.id.clone(), server);
    }

    /// Store the most recent health sample for a server.
    ///
    /// Unknown ids are registered on the fly: a collector may observe a
    /// machine before the control plane formally registers it.
    pub fn record_health(&self, id: &str, sample: HealthSample) {
        let mut inner = self.inner.write().expect("fleet registry lock poisoned");
        debug!(server = id, cpu = sample.cpu_usage_percent, "health sample recorded");
        inner
            .servers
            .entry(id.to_string())
            .or_insert_with(|| Server::new(id))
            .health = Some(sample);
    }

    /// Store the current queued-deployment count for a server.
    pub fn set_queue_depth(&self, id: &str, depth: u32) {
        let mut inner = self.inner.write().expect("fleet registry lock poisoned");
        inner.queue_depths.insert(id.to_string(), depth);
    }

    /// Mark a server as draining (or clear the flag).
    ///
    /// No-op for unknown ids; draining a server the registry has never
    /// seen has nothing to exclude.
    pub fn set_draining(&self, id: &str, draining: bool) {
        let mut inner = self.inner.write().expect("fleet registry lock poisoned");
        if let Some(server) = inner.servers.get_mut(id) {
            debug!(server = id, draining, "drain flag updated");
            server.draining = draining;
        }
    }

    /// Remove a server and its queue-depth record.
    pub fn remove_server(&self, id: &str) {
        let mut inner = self.inner.write().expect("fleet registry lock poisoned");
        inner.servers.remove(id);
        inner.queue_depths.remove(id);
        debug!(server = id, "server removed");
    }

    /// Latest record for one server.
    pub fn get(&self, id: &str) -> Option<Server> {
        let inner = self.inner.read().expect("fleet registry lock poisoned");
        inner.servers.get(id).cloned()
    }

    /// Queued-deployment count for a server. Unknown ids report zero,
    /// consistent with the optimistic default for missing health data.
    pub fn queue_depth(&self, id: &str) -> u32 {
        let inner = self.inner.read().expect("fleet registry lock poisoned");
        inner.queue_depths.get(id).copied().unwrap_or(0)
    }

    /// Point-in-time snapshot of every server, in id order.
    pub fn snapshot(&self) -> Vec<Server> {
        let inner = self.inner.read().expect("fleet registry lock poisoned");
        inner.servers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().expect("fleet registry lock poisoned");
        inner.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
