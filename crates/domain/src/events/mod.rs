//! Domain Events
//!
//! Two kinds live here:
//!
//! - Return types from aggregate mutations (`combat_events`, `event_events`),
//!   telling the caller what a transition did.
//! - [`DomainEvent`], the coarse notification published to everyone watching
//!   a location once a transition has been persisted.

pub mod combat_events;
pub mod event_events;

pub use combat_events::*;
pub use event_events::*;

use serde::{Deserialize, Serialize};

use crate::aggregates::{CombatAction, CombatRound, Event};
use crate::{LocationId, RoundId};

/// Notification for a persisted state change, scoped to one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainEvent {
    // Rounds
    RoundCreated {
        round: CombatRound,
    },
    ActionSubmitted {
        round_id: RoundId,
        location_id: LocationId,
        action: CombatAction,
    },
    RoundResolved {
        round: CombatRound,
    },
    RoundCancelled {
        round: CombatRound,
    },

    // Events
    EventCreated {
        event: Event,
    },
    EventClosed {
        event: Event,
    },
    EventFrozen {
        event: Event,
    },
    EventUnfrozen {
        event: Event,
    },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RoundCreated { .. } => "round_created",
            Self::ActionSubmitted { .. } => "action_submitted",
            Self::RoundResolved { .. } => "round_resolved",
            Self::RoundCancelled { .. } => "round_cancelled",
            Self::EventCreated { .. } => "event_created",
            Self::EventClosed { .. } => "event_closed",
            Self::EventFrozen { .. } => "event_frozen",
            Self::EventUnfrozen { .. } => "event_unfrozen",
        }
    }

    pub fn location_id(&self) -> LocationId {
        match self {
            Self::RoundCreated { round }
            | Self::RoundResolved { round }
            | Self::RoundCancelled { round } => round.location_id(),
            Self::ActionSubmitted { location_id, .. } => *location_id,
            Self::EventCreated { event }
            | Self::EventClosed { event }
            | Self::EventFrozen { event }
            | Self::EventUnfrozen { event } => event.location_id(),
        }
    }
}
