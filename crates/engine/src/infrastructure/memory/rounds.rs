use std::collections::HashMap;

use async_trait::async_trait;
use skirmish_domain::{CombatRound, EventId, LocationId, RoundId, RoundStatus};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RepoError, RoundRepo};

#[derive(Default)]
pub struct InMemoryRoundStore {
    rounds: RwLock<HashMap<RoundId, CombatRound>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundRepo for InMemoryRoundStore {
    async fn get(&self, id: RoundId) -> Result<Option<CombatRound>, RepoError> {
        Ok(self.rounds.read().await.get(&id).cloned())
    }

    async fn save(&self, round: &CombatRound) -> Result<(), RepoError> {
        self.rounds.write().await.insert(round.id(), round.clone());
        Ok(())
    }

    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<CombatRound>, RepoError> {
        Ok(self
            .rounds
            .read()
            .await
            .values()
            .find(|r| r.location_id() == location_id && r.is_active())
            .cloned())
    }

    async fn get_active_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Option<CombatRound>, RepoError> {
        Ok(self
            .rounds
            .read()
            .await
            .values()
            .find(|r| r.event_id() == event_id && r.is_active())
            .cloned())
    }

    async fn list_resolved(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<CombatRound>, RepoError> {
        let mut resolved: Vec<CombatRound> = self
            .rounds
            .read()
            .await
            .values()
            .filter(|r| r.location_id() == location_id && r.status() == RoundStatus::Resolved)
            .cloned()
            .collect();
        resolved.sort_by(|a, b| {
            b.resolved_at()
                .cmp(&a.resolved_at())
                .then_with(|| b.round_number().cmp(&a.round_number()))
        });
        resolved.truncate(limit as usize);
        Ok(resolved)
    }

    async fn next_round_number(&self, location_id: LocationId) -> Result<u32, RepoError> {
        let highest = self
            .rounds
            .read()
            .await
            .values()
            .filter(|r| r.location_id() == location_id)
            .map(CombatRound::round_number)
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }
}
