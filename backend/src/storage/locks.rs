//! Per-key async locks.
//!
//! The record store has no unique indexes, so services hold the lock for a
//! uniqueness key (or an enrollment's client/activity pair) across the
//! check and the write. The guarantee is per process only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Held for as long as the key must stay locked
pub type KeyGuard = OwnedMutexGuard<()>;

#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = self.entry(key);
        trace!("Acquiring key lock {}", key);
        lock.lock_owned().await
    }

    /// Lock several keys at once, in a fixed order so two callers cannot deadlock
    pub async fn acquire_many(&self, keys: &[String]) -> Vec<KeyGuard> {
        let mut ordered: Vec<&String> = keys.iter().collect();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            guards.push(self.acquire(key).await);
        }
        guards
    }

    fn entry(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Drop locks nobody holds or waits on
        entries.retain(|_, lock| Arc::strong_count(lock) > 1);

        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
