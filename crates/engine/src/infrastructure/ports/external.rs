//! Ports for collaborators outside the engine's own state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skirmish_domain::{DomainEvent, EventId};

use super::RepoError;

/// External store that suspends and restores a live session while its event
/// is frozen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStatePort: Send + Sync {
    async fn snapshot(&self, event_id: EventId, at: DateTime<Utc>) -> Result<(), RepoError>;
    async fn restore(&self, event_id: EventId) -> Result<(), RepoError>;
}

/// Push channel for state transitions. Best effort: publishing never fails
/// the transition that triggered it.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    fn publish(&self, event: DomainEvent);
}
