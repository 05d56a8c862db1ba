//! Combat round use cases.
//!
//! A round's life:
//! 1. CreateRound opens it under the location's active, unfrozen event
//! 2. SubmitAction appends snapshotted actions while it is active
//! 3. ResolveRound scores every action at once, or CancelRound discards them
//!
//! Creation is serialized per location. Submit, resolve and cancel are
//! serialized per round. When both locks are needed the round lock is taken
//! first.
//!
//! A use case that writes more than one record puts back the ones it already
//! wrote when a later write fails, so a `Dependency` error leaves stored
//! state as it was and the call can be retried.

use std::sync::Arc;

use skirmish_domain::{
    CharacterId, CombatAction, CombatRound, DomainError, DomainEvent, EventId, LocationId, RoundId,
    SkillId,
};

mod resolve;

pub use resolve::ResolveRound;

use crate::entities::{Character, Event, Round, Skill};
use crate::infrastructure::locks::{LocationLocks, RoundLocks};
use crate::infrastructure::ports::{ClockPort, NotificationPort, RepoError};

/// Container for combat use cases.
pub struct CombatUseCases {
    pub create_round: Arc<CreateRound>,
    pub submit_action: Arc<SubmitAction>,
    pub resolve_round: Arc<ResolveRound>,
    pub cancel_round: Arc<CancelRound>,
    pub queries: Arc<RoundQueries>,
}

impl CombatUseCases {
    pub fn new(
        create_round: Arc<CreateRound>,
        submit_action: Arc<SubmitAction>,
        resolve_round: Arc<ResolveRound>,
        cancel_round: Arc<CancelRound>,
        queries: Arc<RoundQueries>,
    ) -> Self {
        Self {
            create_round,
            submit_action,
            resolve_round,
            cancel_round,
            queries,
        }
    }
}

// =============================================================================
// Create
// =============================================================================

/// Open a new round under the location's active event.
pub struct CreateRound {
    round: Arc<Round>,
    event: Arc<Event>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    location_locks: Arc<LocationLocks>,
}

impl CreateRound {
    pub fn new(
        round: Arc<Round>,
        event: Arc<Event>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            round,
            event,
            clock,
            notifier,
            location_locks,
        }
    }

    pub async fn execute(
        &self,
        location_id: LocationId,
        event_id: EventId,
    ) -> Result<CombatRound, CombatError> {
        let _location_guard = self.location_locks.lock(&location_id).await;

        let mut event = match self.event.get_active_in_location(location_id).await? {
            Some(event) if event.id() == event_id => event,
            _ => {
                return Err(CombatError::PreconditionFailed(format!(
                    "Event {} is not the active event at location {}",
                    event_id, location_id
                )))
            }
        };
        if event.is_frozen() {
            return Err(CombatError::PreconditionFailed(format!(
                "Event {} is frozen",
                event_id
            )));
        }
        if let Some(active) = self.round.get_active_for_event(event_id).await? {
            return Err(CombatError::PreconditionFailed(format!(
                "Round {} is already active for event {}",
                active.id(),
                event_id
            )));
        }

        let round_number = self.round.next_round_number(location_id).await?;
        let round = CombatRound::new(event_id, location_id, round_number, self.clock.now());

        let prior_event = event.clone();
        event.record_round_started();
        self.event.save(&event).await?;
        if let Err(e) = self.round.save(&round).await {
            restore_event(&self.event, &prior_event).await;
            return Err(e.into());
        }

        tracing::info!(
            round_id = %round.id(),
            location_id = %location_id,
            event_id = %event_id,
            round_number,
            "Combat round created"
        );
        self.notifier.publish(DomainEvent::RoundCreated {
            round: round.clone(),
        });
        Ok(round)
    }
}

// =============================================================================
// Submit
// =============================================================================

/// Append an actor's skill use to an active round.
pub struct SubmitAction {
    round: Arc<Round>,
    character: Arc<Character>,
    skill: Arc<Skill>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    round_locks: Arc<RoundLocks>,
}

impl SubmitAction {
    pub fn new(
        round: Arc<Round>,
        character: Arc<Character>,
        skill: Arc<Skill>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        round_locks: Arc<RoundLocks>,
    ) -> Self {
        Self {
            round,
            character,
            skill,
            clock,
            notifier,
            round_locks,
        }
    }

    pub async fn execute(
        &self,
        round_id: RoundId,
        character_id: CharacterId,
        skill_id: SkillId,
        target_id: Option<CharacterId>,
    ) -> Result<CombatAction, CombatError> {
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

        let actor = self
            .character
            .get(character_id)
            .await?
            .ok_or_else(|| CombatError::not_found("Character", character_id))?;
        if !actor.is_active {
            return Err(CombatError::Validation(format!(
                "Character {} is not its owner's active character",
                character_id
            )));
        }
        let skill = self
            .skill
            .get(skill_id)
            .await?
            .ok_or_else(|| CombatError::not_found("Skill", skill_id))?;

        let target = match skill.target.resolve(actor.id, target_id)? {
            None => None,
            Some(id) if id == actor.id => Some(actor.as_target()),
            Some(id) => {
                let target = self
                    .character
                    .get(id)
                    .await?
                    .ok_or_else(|| CombatError::not_found("Character", id))?;
                Some(target.as_target())
            }
        };

        let action = CombatAction::new(actor.snapshot(), skill, target, self.clock.now());
        round.submit_action(action.clone())?;
        self.round.save(&round).await?;

        tracing::info!(
            round_id = %round_id,
            action_id = %action.id(),
            character_id = %character_id,
            skill_id = %skill_id,
            "Action submitted"
        );
        self.notifier.publish(DomainEvent::ActionSubmitted {
            round_id,
            location_id: round.location_id(),
            action: action.clone(),
        });
        Ok(action)
    }
}

// =============================================================================
// Cancel
// =============================================================================

/// Abandon an active round. Its actions are never scored or counted.
pub struct CancelRound {
    round: Arc<Round>,
    event: Arc<Event>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    round_locks: Arc<RoundLocks>,
    location_locks: Arc<LocationLocks>,
}

impl CancelRound {
    pub fn new(
        round: Arc<Round>,
        event: Arc<Event>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        round_locks: Arc<RoundLocks>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            round,
            event,
            clock,
            notifier,
            round_locks,
            location_locks,
        }
    }

    pub async fn execute(&self, round_id: RoundId) -> Result<(), CombatError> {
        let _round_guard = self.round_locks.lock(&round_id).await;

        let mut round = self
            .round
            .get(round_id)
            .await?
            .ok_or_else(|| CombatError::not_found("Round", round_id))?;
        let prior_round = round.clone();
        let cancelled = round.cancel(self.clock.now())?;

        let location_guard = self.location_locks.lock(&round.location_id()).await;
        self.round.save(&round).await?;
        if let Err(e) = apply_to_event(&self.event, round.event_id(), |event| {
            event.record_round_cancelled()
        })
        .await
        {
            restore_round(&self.round, &prior_round).await;
            return Err(e.into());
        }
        drop(location_guard);

        tracing::info!(
            round_id = %round_id,
            location_id = %round.location_id(),
            discarded_actions = cancelled.discarded_actions,
            "Combat round cancelled"
        );
        self.notifier
            .publish(DomainEvent::RoundCancelled { round });
        Ok(())
    }
}

/// Apply a rollup change to the round's event and persist it.
///
/// Returns the event as it was before the change. Callers hold the location
/// lock.
pub(crate) async fn apply_to_event(
    events: &Event,
    event_id: EventId,
    apply: impl FnOnce(&mut skirmish_domain::Event),
) -> Result<skirmish_domain::Event, RepoError> {
    let mut event = events
        .get(event_id)
        .await?
        .ok_or_else(|| RepoError::not_found("Event", event_id))?;
    let prior = event.clone();
    apply(&mut event);
    events.save(&event).await?;
    Ok(prior)
}

/// Write back an event after a later step failed.
pub(crate) async fn restore_event(events: &Event, prior: &skirmish_domain::Event) {
    if let Err(e) = events.save(prior).await {
        tracing::error!(
            error = %e,
            event_id = %prior.id(),
            "Failed to restore event after an aborted round operation"
        );
    }
}

/// Write back a round after a later step failed.
pub(crate) async fn restore_round(rounds: &Round, prior: &CombatRound) {
    if let Err(e) = rounds.save(prior).await {
        tracing::error!(
            error = %e,
            round_id = %prior.id(),
            "Failed to restore round after an aborted round operation"
        );
    }
}

// =============================================================================
// Queries
// =============================================================================

pub struct RoundQueries {
    round: Arc<Round>,
    max_list_limit: u32,
}

impl RoundQueries {
    pub fn new(round: Arc<Round>, max_list_limit: u32) -> Self {
        Self {
            round,
            max_list_limit: max_list_limit.max(1),
        }
    }

    pub async fn active(&self, location_id: LocationId) -> Result<Option<CombatRound>, CombatError> {
        Ok(self.round.get_active_in_location(location_id).await?)
    }

    /// Newest first. `limit` is clamped to `1..=max_list_limit`; absent means the max.
    pub async fn resolved(
        &self,
        location_id: LocationId,
        limit: Option<u32>,
    ) -> Result<Vec<CombatRound>, CombatError> {
        let limit = limit
            .unwrap_or(self.max_list_limit)
            .clamp(1, self.max_list_limit);
        Ok(self.round.list_resolved(location_id, limit).await?)
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Dependency failed: {0}")]
    Dependency(String),
}

impl CombatError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<RepoError> for CombatError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Dependency(other.to_string()),
        }
    }
}

impl From<DomainError> for CombatError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            e if e.is_state_error() => Self::PreconditionFailed(e.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests;
