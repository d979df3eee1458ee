//! Single-flight loading
//!
//! Concurrent loads for the same key collapse into one run of the work. The
//! first caller (the leader) starts the work on its own task; later callers
//! attach to the shared result until the work finishes and the in-flight
//! record is removed. This is de-duplication of concurrent requests, not
//! memoization: a load after completion starts a new cycle.

use cq_domain::error::{Error, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tracing::trace;

type SharedLoad<V> = Shared<BoxFuture<'static, std::result::Result<V, Arc<Error>>>>;

struct Flight<V> {
    cycle: u64,
    load: SharedLoad<V>,
}

/// Removes the in-flight record of one cycle, on success, failure or panic
struct FlightGuard<K, V>
where
    K: Eq + Hash,
{
    flights: Arc<DashMap<K, Flight<V>>>,
    key: K,
    cycle: u64,
}

impl<K, V> Drop for FlightGuard<K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.flights
            .remove_if(&self.key, |_, flight| flight.cycle == self.cycle);
    }
}

/// Per-key de-duplication of concurrent loads
pub struct SingleFlight<K, V>
where
    K: Eq + Hash,
{
    flights: Arc<DashMap<K, Flight<V>>>,
    next_cycle: AtomicU64,
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
            next_cycle: AtomicU64::new(0),
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `key`, running `work` only if no load for `key` is in flight
    ///
    /// Every caller of one cycle receives a clone of the same value, or the
    /// same error wrapped in [`Error::Shared`].
    pub async fn load<F, Fut>(&self, key: K, work: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (load, leader) = match self.flights.entry(key.clone()) {
            Entry::Occupied(occupied) => {
                trace!(key = ?key, "attaching to in-flight load");
                (occupied.get().load.clone(), None)
            }
            Entry::Vacant(vacant) => {
                let cycle = self.next_cycle.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = oneshot::channel();
                let load = rx
                    .map(|received| {
                        received.unwrap_or_else(|_| {
                            Err(Arc::new(Error::internal(
                                "in-flight load ended without a result",
                            )))
                        })
                    })
                    .boxed()
                    .shared();
                vacant.insert(Flight {
                    cycle,
                    load: load.clone(),
                });
                (load, Some((cycle, tx)))
            }
        };

        if let Some((cycle, tx)) = leader {
            trace!(key = ?key, cycle, "starting load");
            let guard = FlightGuard {
                flights: Arc::clone(&self.flights),
                key,
                cycle,
            };
            let work = work();
            tokio::spawn(async move {
                let result = work.await.map_err(Arc::new);
                drop(guard);
                let _ = tx.send(result);
            });
        }

        load.await.map_err(Error::Shared)
    }

    /// Whether a load for `key` is currently in flight
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.flights.contains_key(key)
    }

    /// Number of keys currently loading
    pub fn in_flight_count(&self) -> usize {
        self.flights.len()
    }

    /// Number of load cycles started so far
    pub fn cycles_started(&self) -> u64 {
        self.next_cycle.load(Ordering::Relaxed)
    }
}

impl<K, V> Debug for SingleFlight<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.flights.len())
            .field("cycles", &self.next_cycle.load(Ordering::Relaxed))
            .finish()
    }
}
