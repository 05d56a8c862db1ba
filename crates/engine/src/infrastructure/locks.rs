//! Keyed async mutexes.
//!
//! Lock order across the engine is always round, then location.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use skirmish_domain::{LocationId, RoundId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on first use and dropped once nobody
/// holds or waits for it.
pub struct KeyedLocks<K>
where
    K: Eq + Hash,
{
    locks: DashMap<K, Arc<Mutex<()>>>,
}

/// Exclusive access to one key. Releasing it prunes the key's mutex when no
/// other caller is waiting on it.
pub struct KeyedLockGuard<'a, K>
where
    K: Eq + Hash,
{
    guard: Option<OwnedMutexGuard<()>>,
    key: K,
    locks: &'a DashMap<K, Arc<Mutex<()>>>,
}

impl<K> Drop for KeyedLockGuard<'_, K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        // Release first so the guard's own Arc no longer counts.
        drop(self.guard.take());
        // Waiters clone the Arc under the shard lock, so a count of one means
        // only the map still refers to it.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `key`. Released when the guard drops.
    pub async fn lock(&self, key: &K) -> KeyedLockGuard<'_, K> {
        // Clone the Arc out so the shard guard is released before awaiting.
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyedLockGuard {
            guard: Some(mutex.lock_owned().await),
            key: key.clone(),
            locks: &self.locks,
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes round and event creation at a location.
pub type LocationLocks = KeyedLocks<LocationId>;

/// Serializes submit, resolve and cancel on one round.
pub type RoundLocks = KeyedLocks<RoundId>;
