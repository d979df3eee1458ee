//! Identity cache
//!
//! Maps an entity id to the one live wrapper for that id. Lookups hand out
//! clones of the same `Arc`, so a mutation through one handle is visible
//! through every other.

use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::EntityId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

/// Registry of live wrappers for one entity type
pub struct IdentityCache<E: LiveEntity> {
    name: &'static str,
    entries: DashMap<EntityId, Arc<E>>,
}

impl<E: LiveEntity> IdentityCache<E> {
    /// Create an empty cache; `name` only appears in logs
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    /// Wrapper for `id`, constructing and registering it if needed
    pub fn create(&self, id: EntityId) -> Arc<E> {
        self.create_with(id, |_| {})
    }

    /// Like [`create`](Self::create), running `init` on a freshly
    /// constructed wrapper only
    ///
    /// An existing wrapper keeps its live state untouched.
    pub fn create_with<F>(&self, id: EntityId, init: F) -> Arc<E>
    where
        F: FnOnce(&E),
    {
        if let Some(existing) = self.entries.get(&id) {
            return Arc::clone(existing.value());
        }
        match self.entries.entry(id) {
            Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            Entry::Vacant(vacant) => {
                let entity = Arc::new(E::bind(id));
                init(&entity);
                vacant.insert(Arc::clone(&entity));
                debug!(cache = self.name, %id, "live wrapper created");
                entity
            }
        }
    }

    /// Registered wrapper for `id`, if any
    pub fn get(&self, id: &EntityId) -> Option<Arc<E>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the wrapper for `id`, returning it
    pub fn remove(&self, id: &EntityId) -> Option<Arc<E>> {
        self.entries.remove(id).map(|(_, entity)| entity)
    }

    /// Remove registered wrappers, returning how many were removed
    ///
    /// Without `force`, wrappers still referenced elsewhere (a live registry,
    /// a caller) are kept so that no second wrapper can appear for their id.
    pub fn clear(&self, force: bool) -> usize {
        let before = self.entries.len();
        if force {
            self.entries.clear();
        } else {
            self.entries
                .retain(|_, entity| Arc::strong_count(entity) > 1);
        }
        let removed = before.saturating_sub(self.entries.len());
        debug!(cache = self.name, removed, force, "identity cache cleared");
        removed
    }

    /// Whether a wrapper is registered for `id`
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered wrappers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no wrapper is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: LiveEntity> std::fmt::Debug for IdentityCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCache")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .finish()
    }
}
