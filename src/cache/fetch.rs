//! In-memory fetch cache with a freshness window and single-flight loads
//!
//! Provides a `FetchCache` that hands out shared values for a key while they are
//! younger than the freshness window, and otherwise runs the caller's loader.
//! Concurrent callers for a key that is already loading wait on the same load.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default maximum age of a cached value (5 minutes)
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// A load shared by every caller waiting on the same key
type Flight<V, E> = Shared<BoxFuture<'static, Result<Arc<V>, E>>>;

/// Freshness of the entry stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Nothing has been loaded successfully for this key
    Absent,
    /// The entry is younger than the freshness window
    Fresh,
    /// The entry has outlived the freshness window and will be reloaded on next access
    Stale,
}

/// A single cached value with the time it was fetched
struct CacheEntry<V> {
    value: Arc<V>,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    fn is_fresh(&self, window: Duration, now: Instant) -> bool {
        self.age(now) < window
    }
}

struct Table<V, E> {
    entries: HashMap<String, CacheEntry<V>>,
    in_flight: HashMap<String, Flight<V, E>>,
}

/// Time-based cache of loaded values keyed by request identity
///
/// Entries are replaced whole on every successful load and are never removed;
/// a failed load leaves whatever was stored before untouched. Cloning the cache
/// yields another handle onto the same table.
pub struct FetchCache<V, E> {
    freshness_window: Duration,
    table: Arc<Mutex<Table<V, E>>>,
}

impl<V, E> Clone for FetchCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            freshness_window: self.freshness_window,
            table: Arc::clone(&self.table),
        }
    }
}

impl<V, E> Default for FetchCache<V, E> {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_WINDOW)
    }
}

fn lock<V, E>(table: &Mutex<Table<V, E>>) -> MutexGuard<'_, Table<V, E>> {
    // The table holds no invariants a panicking holder could break halfway.
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<V, E> FetchCache<V, E> {
    /// Creates an empty cache whose entries stay fresh for `freshness_window`
    pub fn new(freshness_window: Duration) -> Self {
        Self {
            freshness_window,
            table: Arc::new(Mutex::new(Table {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    /// Returns the freshness window this cache was created with
    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Reports whether `key` is absent, fresh or stale without loading anything
    pub fn state(&self, key: &str) -> EntryState {
        let table = lock(&self.table);
        match table.entries.get(key) {
            None => EntryState::Absent,
            Some(entry) if entry.is_fresh(self.freshness_window, Instant::now()) => {
                EntryState::Fresh
            }
            Some(_) => EntryState::Stale,
        }
    }

    /// Time elapsed since the entry for `key` was fetched
    pub fn age(&self, key: &str) -> Option<Duration> {
        let table = lock(&self.table);
        table.entries.get(key).map(|entry| entry.age(Instant::now()))
    }

    /// Number of keys with a stored entry, fresh or stale
    pub fn len(&self) -> usize {
        lock(&self.table).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V, E> FetchCache<V, E>
where
    V: Send + Sync + 'static,
    E: Clone + Display + Send + Sync + 'static,
{
    /// Returns the value for `key`, running `loader` only when no fresh entry exists
    ///
    /// # Arguments
    /// * `key` - Stable identity of the resource, including any query parameters
    /// * `loader` - Produces the value when the cache cannot answer
    ///
    /// # Returns
    /// * `Ok(Arc<V>)` - The cached value, or the freshly loaded one
    /// * `Err(E)` - The loader's error, unchanged; the stored entry is not modified
    ///
    /// # Behavior
    /// - A fresh entry is returned without calling `loader`
    /// - If a load for `key` is already running, this call waits for it and
    ///   `loader` is dropped uncalled
    /// - Otherwise `loader` runs on a spawned task and a success replaces the entry
    /// - The load finishes and is recorded even if this caller stops waiting
    ///
    /// # Panics
    /// Must be called from within a tokio runtime.
    pub async fn get<F, Fut>(&self, key: &str, loader: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let joined = {
            let table = lock(&self.table);
            if let Some(entry) = table.entries.get(key) {
                if entry.is_fresh(self.freshness_window, Instant::now()) {
                    debug!(key, "cache hit");
                    return Ok(Arc::clone(&entry.value));
                }
            }
            table.in_flight.get(key).cloned()
        };

        let flight = match joined {
            Some(flight) => {
                debug!(key, "joining in-flight load");
                flight
            }
            None => {
                let pending = loader();
                let mut table = lock(&self.table);
                // Another thread may have started this key while the loader was being built.
                match table.in_flight.get(key) {
                    Some(flight) => flight.clone(),
                    None => {
                        debug!(key, "cache miss, loading");
                        let flight = self.start_flight(key.to_string(), pending);
                        table.in_flight.insert(key.to_string(), flight.clone());
                        flight
                    }
                }
            }
        };

        flight.await
    }

    /// Runs a load on its own task and returns the handle callers wait on
    ///
    /// The task records the outcome, so the load completes and is stored even
    /// when every caller has stopped waiting. The entry is stamped with the
    /// time the load started.
    fn start_flight<Fut>(&self, key: String, pending: Fut) -> Flight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let table: Weak<Mutex<Table<V, E>>> = Arc::downgrade(&self.table);
        let started = Instant::now();

        let task = tokio::spawn(async move {
            let outcome = pending.await;

            let Some(shared) = table.upgrade() else {
                return outcome.map(Arc::new);
            };
            let mut table = lock(&shared);
            table.in_flight.remove(&key);

            match outcome {
                Ok(value) => {
                    let value = Arc::new(value);
                    table.entries.insert(
                        key,
                        CacheEntry {
                            value: Arc::clone(&value),
                            fetched_at: started,
                        },
                    );
                    Ok(value)
                }
                Err(error) => {
                    warn!(key = %key, error = %error, "load failed, cached entry left unchanged");
                    Err(error)
                }
            }
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => match join_error.try_into_panic() {
                    Ok(payload) => std::panic::resume_unwind(payload),
                    // Only happens while the runtime shuts down.
                    Err(_) => futures::future::pending().await,
                },
            }
        }
        .boxed()
        .shared()
    }
}
