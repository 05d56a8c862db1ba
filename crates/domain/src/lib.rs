extern crate self as skirmish_domain;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    ActionScore, ClashRecord, CombatAction, CombatRound, Event, EventSession, EventStats,
    EventStatus, EventType, ResolutionData, RoundStatus, SessionStatus,
};
pub use entities::{
    Character, CharacterSnapshot, DerivedResources, Race, Skill, SkillBranch, SkillTarget,
    TargetSnapshot,
};
pub use error::DomainError;
pub use events::{DomainEvent, EventStateChange, RoundCancelled, RoundResolved};
pub use game_systems::{
    ClashOutcome, OutcomeTiers, RankMultiplier, RankTier, RollQuality, RolledOutcome, SkillUse,
    UsageCounts,
};
pub use ids::{ActionId, CharacterId, EventId, LocationId, RaceId, RoundId, SkillId, UserId};
pub use value_objects::{StatBlock, StatCatalog, StatCategory, StatDefinition, StatKey};
