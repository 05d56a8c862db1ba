//! Event persistence.

use std::sync::Arc;

use skirmish_domain::{self as domain, EventId, LocationId};

use crate::infrastructure::ports::{EventRepo, RepoError};

pub struct Event {
    repo: Arc<dyn EventRepo>,
}

impl Event {
    pub fn new(repo: Arc<dyn EventRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: EventId) -> Result<Option<domain::Event>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn save(&self, event: &domain::Event) -> Result<(), RepoError> {
        self.repo.save(event).await
    }

    pub async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<domain::Event>, RepoError> {
        self.repo.get_active_in_location(location_id).await
    }
}
