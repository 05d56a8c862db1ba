//! Repository ports.
//!
//! Every collaborator is modeled as a fallible async call, whether it is
//! backed by memory or by a remote service.

use async_trait::async_trait;
use skirmish_domain::{
    Character, CharacterId, CombatRound, Event, EventId, LocationId, RoundId, Skill, SkillBranch,
    SkillId, SkillUse,
};

use super::RepoError;

// =============================================================================
// Catalog Ports (read-only, owned by other services)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepo: Send + Sync {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError>;
}

// =============================================================================
// Usage Counters
// =============================================================================

/// Monotonic usage counters.
///
/// Increments arrive as one batch per resolved round. Two rounds resolving at
/// once may touch the same character, so each key must be updated atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageRepo: Send + Sync {
    async fn skill_uses(&self, character_id: CharacterId, skill_id: SkillId)
        -> Result<u32, RepoError>;
    async fn branch_uses(
        &self,
        character_id: CharacterId,
        branch: &SkillBranch,
    ) -> Result<u32, RepoError>;


    /// Count every use in `uses`, all or nothing.
    ///
    /// Applied at most once per `round_id`: a repeated batch changes nothing
    /// and returns `Ok(false)`.
    async fn record_round_uses(
        &self,
        round_id: RoundId,
        uses: &[SkillUse],
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Round and Event Stores
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundRepo: Send + Sync {
    async fn get(&self, id: RoundId) -> Result<Option<CombatRound>, RepoError>;
    async fn save(&self, round: &CombatRound) -> Result<(), RepoError>;

    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<CombatRound>, RepoError>;
    async fn get_active_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Option<CombatRound>, RepoError>;
    /// Resolved rounds, newest first.
    async fn list_resolved(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<CombatRound>, RepoError>;
    /// One past the highest round number ever used at the location.
    async fn next_round_number(&self, location_id: LocationId) -> Result<u32, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepo: Send + Sync {
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError>;
    async fn save(&self, event: &Event) -> Result<(), RepoError>;
    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Event>, RepoError>;
}
