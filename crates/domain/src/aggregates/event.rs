//! Event aggregate - the gathering that hosts combat rounds at a location
//!
//! Two orthogonal state machines:
//!
//! - lifecycle: `Active -> Closed` (terminal)
//! - session, only meaningful while active: `Open <-> Frozen`
//!
//! Running statistics are rolled up from the rounds the event hosts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::EventStateChange;
use crate::{DomainError, EventId, LocationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Lore,
    Duel,
    Quest,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lore => "lore",
            Self::Duel => "duel",
            Self::Quest => "quest",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lore" => Ok(Self::Lore),
            "duel" => Ok(Self::Duel),
            "quest" => Ok(Self::Quest),
            other => Err(DomainError::parse(format!("Unknown event type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSession {
    pub status: SessionStatus,
    pub frozen_at: Option<DateTime<Utc>>,
}

impl Default for EventSession {
    fn default() -> Self {
        Self {
            status: SessionStatus::Open,
            frozen_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_rounds: u32,
    pub resolved_rounds: u32,
    pub cancelled_rounds: u32,
    pub total_actions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    title: String,
    event_type: EventType,
    description: Option<String>,
    location_id: LocationId,
    status: EventStatus,
    session: EventSession,
    stats: EventStats,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Start a new active, open event. The title must not be blank.
    pub fn new(
        title: impl Into<String>,
        event_type: EventType,
        location_id: LocationId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("Event title cannot be empty"));
        }

        Ok(Self {
            id: EventId::new(),
            title,
            event_type,
            description: None,
            location_id,
            status: EventStatus::Active,
            session: EventSession::default(),
            stats: EventStats::default(),
            created_at: now,
            closed_at: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn session(&self) -> &EventSession {
        &self.session
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    pub fn is_frozen(&self) -> bool {
        self.session.status == SessionStatus::Frozen
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn ensure_active(&self, operation: &str) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "cannot {} event {}: event is closed",
                operation, self.id
            )))
        }
    }

    pub fn close(&mut self, now: DateTime<Utc>) -> Result<EventStateChange, DomainError> {
        self.ensure_active("close")?;
        self.status = EventStatus::Closed;
        self.closed_at = Some(now);
        Ok(EventStateChange::Closed {
            event_id: self.id,
            at: now,
        })
    }

    pub fn freeze(&mut self, now: DateTime<Utc>) -> Result<EventStateChange, DomainError> {
        self.ensure_active("freeze")?;
        if self.is_frozen() {
            return Err(DomainError::invalid_state_transition(format!(
                "event {} is already frozen",
                self.id
            )));
        }
        self.session = EventSession {
            status: SessionStatus::Frozen,
            frozen_at: Some(now),
        };
        Ok(EventStateChange::Frozen {
            event_id: self.id,
            at: now,
        })
    }

    pub fn unfreeze(&mut self, now: DateTime<Utc>) -> Result<EventStateChange, DomainError> {
        self.ensure_active("unfreeze")?;
        if !self.is_frozen() {
            return Err(DomainError::invalid_state_transition(format!(
                "event {} is not frozen",
                self.id
            )));
        }
        self.session = EventSession::default();
        Ok(EventStateChange::Unfrozen {
            event_id: self.id,
            at: now,
        })
    }

    // Rollups are bookkeeping for rounds that already passed their own
    // transitions, so they do not check the lifecycle.

    pub fn record_round_started(&mut self) {
        self.stats.total_rounds += 1;
    }

    pub fn record_round_resolved(&mut self, action_count: u32) {
        self.stats.resolved_rounds += 1;
        self.stats.total_actions += action_count;
    }

    pub fn record_round_cancelled(&mut self) {
        self.stats.cancelled_rounds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event::new("Bridge Duel", EventType::Duel, LocationId::new(), Utc::now()).expect("event")
    }

    #[test]
    fn new_event_is_active_and_open() {
        let event = event();
        assert!(event.is_active());
        assert!(!event.is_frozen());
        assert_eq!(event.stats(), &EventStats::default());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Event::new("   ", EventType::Lore, LocationId::new(), Utc::now())
            .expect_err("blank title");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn close_is_terminal() {
        let mut event = event();
        let now = Utc::now();
        assert_eq!(
            event.close(now),
            Ok(EventStateChange::Closed {
                event_id: event.id(),
                at: now
            })
        );
        assert_eq!(event.closed_at(), Some(now));
        assert!(event.close(now).is_err());
        assert!(event.freeze(now).is_err());
        assert!(event.unfreeze(now).is_err());
    }

    #[test]
    fn freeze_and_unfreeze_alternate() {
        let mut event = event();
        let now = Utc::now();

        assert!(event.unfreeze(now).is_err());
        event.freeze(now).expect("freeze");
        assert!(event.is_frozen());
        assert_eq!(event.session().frozen_at, Some(now));
        assert!(event.freeze(now).is_err());

        event.unfreeze(now).expect("unfreeze");
        assert!(!event.is_frozen());
        assert_eq!(event.session().frozen_at, None);
    }

    #[test]
    fn rollup_counts_rounds_and_actions() {
        let mut event = event();
        event.record_round_started();
        event.record_round_resolved(2);
        event.record_round_started();
        event.record_round_cancelled();

        assert_eq!(
            *event.stats(),
            EventStats {
                total_rounds: 2,
                resolved_rounds: 1,
                cancelled_rounds: 1,
                total_actions: 2,
            }
        );
    }

    #[test]
    fn event_type_parses_case_insensitively() {
        assert_eq!("Quest".parse::<EventType>(), Ok(EventType::Quest));
        assert!("raid".parse::<EventType>().is_err());
    }

    #[test]
    fn serializes_type_field_in_snake_case() {
        let json = serde_json::to_value(event()).expect("serialize");
        assert_eq!(json["eventType"], "duel");
        assert_eq!(json["session"]["status"], "open");
    }
}
