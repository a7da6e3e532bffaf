// src/store/history.rs

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    config::DEFAULT_HISTORY_CAPACITY,
    error::AppError,
    models::history::{HistoryEntry, NewHistoryEntry},
};

/// Storage for recorded quiz attempts, most recent first.
///
/// Implementations must assign ids and timestamps inside `append`, so that
/// concurrent writers never observe duplicate ids or a half-applied eviction.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores an entry at the head of the ledger and returns it with its id and timestamp.
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, AppError>;

    /// Up to `limit` entries, most recent first.
    async fn list(&self, limit: usize) -> Result<Vec<HistoryEntry>, AppError>;

    /// Drops the oldest entries until at most `keep` remain. Returns how many were dropped.
    async fn evict_oldest(&self, keep: usize) -> Result<usize, AppError>;

    async fn len(&self) -> Result<usize, AppError>;
}

#[derive(Debug)]
struct Ledger {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
}

impl Ledger {
    fn truncate(&mut self, keep: usize) -> usize {
        let evicted = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        evicted
    }
}

/// Process-lifetime ledger bounded to `capacity` entries. Lost on restart.
#[derive(Debug)]
pub struct InMemoryHistory {
    capacity: usize,
    inner: RwLock<Ledger>,
}

impl InMemoryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(Ledger {
                entries: VecDeque::with_capacity(capacity.max(1) + 1),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, AppError> {
        let mut ledger = self.inner.write().await;

        let id = ledger.next_id;
        ledger.next_id += 1;

        let entry = entry.into_entry(id, Utc::now());
        ledger.entries.push_front(entry.clone());

        let evicted = ledger.truncate(self.capacity);
        if evicted > 0 {
            tracing::debug!("History ledger full, evicted {} oldest entries", evicted);
        }

        Ok(entry)
    }

    async fn list(&self, limit: usize) -> Result<Vec<HistoryEntry>, AppError> {
        let ledger = self.inner.read().await;
        Ok(ledger.entries.iter().take(limit).cloned().collect())
    }

    async fn evict_oldest(&self, keep: usize) -> Result<usize, AppError> {
        let mut ledger = self.inner.write().await;
        Ok(ledger.truncate(keep))
    }

    async fn len(&self) -> Result<usize, AppError> {
        Ok(self.inner.read().await.entries.len())
    }
}
