use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use skirmish_domain::EventId;

use crate::infrastructure::ports::{RepoError, SessionStatePort};

/// Records which sessions are suspended and since when.
#[derive(Default)]
pub struct InMemorySessionStore {
    snapshots: DashMap<EventId, DateTime<Utc>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_taken_at(&self, event_id: EventId) -> Option<DateTime<Utc>> {
        self.snapshots.get(&event_id).map(|at| *at)
    }
}

#[async_trait]
impl SessionStatePort for InMemorySessionStore {
    async fn snapshot(&self, event_id: EventId, at: DateTime<Utc>) -> Result<(), RepoError> {
        self.snapshots.insert(event_id, at);
        Ok(())
    }

    async fn restore(&self, event_id: EventId) -> Result<(), RepoError> {
        self.snapshots
            .remove(&event_id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("SessionSnapshot", event_id))
    }
}
