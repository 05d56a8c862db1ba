use std::collections::HashMap;

use async_trait::async_trait;
use skirmish_domain::{Event, EventId, LocationId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{EventRepo, RepoError};

#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepo for InMemoryEventStore {
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn save(&self, event: &Event) -> Result<(), RepoError> {
        self.events.write().await.insert(event.id(), event.clone());
        Ok(())
    }

    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Event>, RepoError> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .find(|e| e.location_id() == location_id && e.is_active())
            .cloned())
    }
}
