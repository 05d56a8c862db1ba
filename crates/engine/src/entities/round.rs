//! Combat round persistence.

use std::sync::Arc;

use skirmish_domain::{CombatRound, EventId, LocationId, RoundId};

use crate::infrastructure::ports::{RepoError, RoundRepo};

pub struct Round {
    repo: Arc<dyn RoundRepo>,
}

impl Round {
    pub fn new(repo: Arc<dyn RoundRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: RoundId) -> Result<Option<CombatRound>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn save(&self, round: &CombatRound) -> Result<(), RepoError> {
        self.repo.save(round).await
    }

    pub async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<CombatRound>, RepoError> {
        self.repo.get_active_in_location(location_id).await
    }

    pub async fn get_active_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Option<CombatRound>, RepoError> {
        self.repo.get_active_for_event(event_id).await
    }

    pub async fn list_resolved(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<CombatRound>, RepoError> {
        self.repo.list_resolved(location_id, limit).await
    }

    pub async fn next_round_number(&self, location_id: LocationId) -> Result<u32, RepoError> {
        self.repo.next_round_number(location_id).await
    }
}
