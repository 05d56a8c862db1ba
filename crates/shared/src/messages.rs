//! Push messages sent to everyone watching a location
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown variants deserialize to `Unknown`

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skirmish_domain::DomainEvent;

use crate::dto::{ActionDto, EventDto, RoundDto};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoundCreated {
        round: RoundDto,
    },
    ActionSubmitted {
        round_id: Uuid,
        location_id: Uuid,
        action: ActionDto,
    },
    RoundResolved {
        round: RoundDto,
    },
    RoundCancelled {
        round: RoundDto,
    },
    EventCreated {
        event: EventDto,
    },
    EventClosed {
        event: EventDto,
    },
    EventFrozen {
        event: EventDto,
    },
    EventUnfrozen {
        event: EventDto,
    },
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl From<&DomainEvent> for ServerMessage {
    fn from(event: &DomainEvent) -> Self {
        match event {
            DomainEvent::RoundCreated { round } => Self::RoundCreated {
                round: round.into(),
            },
            DomainEvent::ActionSubmitted {
                round_id,
                location_id,
                action,
            } => Self::ActionSubmitted {
                round_id: round_id.to_uuid(),
                location_id: location_id.to_uuid(),
                action: action.into(),
            },
            DomainEvent::RoundResolved { round } => Self::RoundResolved {
                round: round.into(),
            },
            DomainEvent::RoundCancelled { round } => Self::RoundCancelled {
                round: round.into(),
            },
            DomainEvent::EventCreated { event } => Self::EventCreated {
                event: event.into(),
            },
            DomainEvent::EventClosed { event } => Self::EventClosed {
                event: event.into(),
            },
            DomainEvent::EventFrozen { event } => Self::EventFrozen {
                event: event.into(),
            },
            DomainEvent::EventUnfrozen { event } => Self::EventUnfrozen {
                event: event.into(),
            },
        }
    }
}
