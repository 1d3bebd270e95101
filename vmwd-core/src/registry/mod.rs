//! In-memory domain registry.
//!
//! The registry owns every known domain. Callers get shared handles to
//! individual domain objects and lock them for the duration of an update.

use crate::observability::metrics;
use crate::types::{DomainDef, DomainObject};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

/// Shared, lockable handle to a registered domain.
pub type DomainHandle = Arc<Mutex<DomainObject>>;

/// Domain registry keyed by domain name.
///
/// Uses RwLock for read-heavy workloads (many lookups, few writes).
#[derive(Clone, Default)]
pub struct DomainRegistry {
    domains: Arc<RwLock<HashMap<String, DomainHandle>>>,
}

impl DomainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def`, or replace the definition of the domain with the same name.
    ///
    /// A replaced domain keeps its handle, private data, state and
    /// persistence. Its runtime id carries over unless `def` sets one.
    #[instrument(skip(self, def), fields(domain = %def.name))]
    pub async fn add(&self, def: DomainDef) -> DomainHandle {
        let name = def.name.clone();

        let (handle, replaced) = {
            let mut domains = self.domains.write().await;
            if let Some(existing) = domains.get(&name).cloned() {
                (existing, Some(def))
            } else {
                let handle = Arc::new(Mutex::new(DomainObject::new(def)));
                domains.insert(name.clone(), handle.clone());
                metrics::set_domain_count(domains.len());
                (handle, None)
            }
        };

        match replaced {
            Some(mut def) => {
                let mut obj = handle.lock().await;
                if def.id.is_none() {
                    def.id = obj.def.id;
                }
                obj.def = def;
                debug!("Replaced domain definition");
            }
            None => info!("Registered domain: {}", name),
        }

        handle
    }

    /// Look up a domain by name.
    pub async fn get(&self, name: &str) -> Option<DomainHandle> {
        self.domains.read().await.get(name).cloned()
    }

    /// Look up a running domain by its id.
    pub async fn find_by_id(&self, id: i32) -> Option<DomainHandle> {
        for handle in self.handles().await {
            if handle.lock().await.def.id == Some(id) {
                return Some(handle);
            }
        }
        None
    }

    /// Snapshot of every registered domain, sorted by name.
    pub async fn list(&self) -> Vec<DomainObject> {
        let mut objects = Vec::new();
        for handle in self.handles().await {
            objects.push(handle.lock().await.clone());
        }
        objects.sort_by(|a, b| a.def.name.cmp(&b.def.name));
        objects
    }

    /// Remove a domain by name, returning its handle if it was registered.
    #[instrument(skip(self))]
    pub async fn remove(&self, name: &str) -> Option<DomainHandle> {
        let mut domains = self.domains.write().await;
        let removed = domains.remove(name);
        if removed.is_some() {
            metrics::set_domain_count(domains.len());
            info!("Removed domain: {}", name);
        }
        removed
    }

    /// Number of registered domains.
    pub async fn len(&self) -> usize {
        self.domains.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.domains.read().await.is_empty()
    }

    // Clone the handles out so no domain lock is taken under the map lock.
    async fn handles(&self) -> Vec<DomainHandle> {
        self.domains.read().await.values().cloned().collect()
    }
}
