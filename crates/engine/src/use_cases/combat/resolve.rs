//! Round resolution.
//!
//! Every action is scored against a snapshot of the round before the round is
//! touched. A failed counter read or a bad roll aborts with the round still
//! active.
//!
//! Writes then go round, event rollup, usage counters. The counter batch is
//! atomic and keyed by round, so it is the last step: if it fails, the round
//! and event are written back as they were and the caller gets `Dependency`.

use std::collections::HashMap;
use std::sync::Arc;

use skirmish_domain::{ActionId, ActionScore, DomainEvent, ResolutionData, RoundId};

use super::{apply_to_event, restore_event, restore_round, CombatError};
use crate::entities::{Event, Progression, Round};
use crate::infrastructure::locks::{LocationLocks, RoundLocks};
use crate::infrastructure::ports::{ClockPort, NotificationPort, RandomPort};

pub struct ResolveRound {
    round: Arc<Round>,
    event: Arc<Event>,
    progression: Arc<Progression>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    notifier: Arc<dyn NotificationPort>,
    round_locks: Arc<RoundLocks>,
    location_locks: Arc<LocationLocks>,
}

impl ResolveRound {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        round: Arc<Round>,
        event: Arc<Event>,
        progression: Arc<Progression>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        notifier: Arc<dyn NotificationPort>,
        round_locks: Arc<RoundLocks>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            round,
            event,
            progression,
            clock,
            random,
            notifier,
            round_locks,
            location_locks,
        }
    }

    pub async fn execute(&self, round_id: RoundId) -> Result<ResolutionData, CombatError> {
        let _round_guard = self.round_locks.lock(&round_id).await;

        let mut round = self
            .round
            .get(round_id)
            .await?
            .ok_or_else(|| CombatError::not_found("Round", round_id))?;
        if !round.is_active() {
            return Err(CombatError::PreconditionFailed(format!(
                "Round {} is {}",
                round_id,
                round.status().as_str()
            )));
        }

        let mut scores: HashMap<ActionId, ActionScore> = HashMap::new();
        for action in round.actions() {
            let counts = self
                .progression
                .counts(action.character().id, action.skill())
                .await?;
            let score = action
                .score_with(counts, |min, max| self.random.gen_range(min, max))
                .map_err(|e| CombatError::Dependency(format!("Random source: {}", e)))?;
            scores.insert(action.id(), score);
        }

        let prior_round = round.clone();
        let resolved = round.resolve(scores, self.clock.now())?;
        let total = resolved.resolution.total_actions;

        let location_guard = self.location_locks.lock(&round.location_id()).await;
        self.round.save(&round).await?;

        let prior_event = match apply_to_event(&self.event, round.event_id(), |event| {
            event.record_round_resolved(total)
        })
        .await
        {
            Ok(prior) => prior,
            Err(e) => {
                restore_round(&self.round, &prior_round).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.progression.record_round(&round).await {
            tracing::warn!(error = %e, round_id = %round_id, "Usage counters not recorded");
            restore_event(&self.event, &prior_event).await;
            restore_round(&self.round, &prior_round).await;
            return Err(e.into());
        }
        drop(location_guard);

        tracing::info!(
            round_id = %round_id,
            location_id = %round.location_id(),
            total_actions = resolved.resolution.total_actions,
            clash_count = resolved.resolution.clash_count,
            independent_count = resolved.resolution.independent_count,
            "Combat round resolved"
        );
        self.notifier.publish(DomainEvent::RoundResolved { round });
        Ok(resolved.resolution)
    }
}
