//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts
//! - Exposes behavior through methods, not public fields
//! - Returns domain events from mutations
//!
//! Aggregates never read the clock; callers pass `now` in.

pub mod combat_round;
pub mod event;

pub use combat_round::{
    ActionScore, ClashRecord, CombatAction, CombatRound, ResolutionData, RoundStatus,
};
pub use event::{Event, EventSession, EventStats, EventStatus, EventType, SessionStatus};
