//! Event lifecycle mutation outcomes.

use chrono::{DateTime, Utc};

use crate::EventId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStateChange {
    Closed { event_id: EventId, at: DateTime<Utc> },
    Frozen { event_id: EventId, at: DateTime<Utc> },
    Unfrozen { event_id: EventId, at: DateTime<Utc> },
}

impl EventStateChange {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::Closed { event_id, .. }
            | Self::Frozen { event_id, .. }
            | Self::Unfrozen { event_id, .. } => *event_id,
        }
    }
}
