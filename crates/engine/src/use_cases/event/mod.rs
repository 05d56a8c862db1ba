//! Event lifecycle use cases.
//!
//! Every event mutation at a location runs under that location's lock, the
//! same one round creation takes, so a round can never start under an event
//! that is closing or freezing.

use std::sync::Arc;

use skirmish_domain::{self as domain, DomainError, DomainEvent, EventId, EventType, LocationId};

use crate::entities::{Event, Round};
use crate::infrastructure::locks::LocationLocks;
use crate::infrastructure::ports::{ClockPort, NotificationPort, RepoError, SessionStatePort};

/// Container for event use cases.
pub struct EventUseCases {
    pub create: Arc<CreateEvent>,
    pub close: Arc<CloseEvent>,
    pub freeze: Arc<FreezeEvent>,
    pub unfreeze: Arc<UnfreezeEvent>,
    pub get_active: Arc<GetActiveEvent>,
}

impl EventUseCases {
    pub fn new(
        create: Arc<CreateEvent>,
        close: Arc<CloseEvent>,
        freeze: Arc<FreezeEvent>,
        unfreeze: Arc<UnfreezeEvent>,
        get_active: Arc<GetActiveEvent>,
    ) -> Self {
        Self {
            create,
            close,
            freeze,
            unfreeze,
            get_active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventInput {
    pub title: String,
    /// `lore`, `duel` or `quest`
    pub event_type: String,
    pub description: Option<String>,
    pub location_id: LocationId,
}

pub struct CreateEvent {
    event: Arc<Event>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    location_locks: Arc<LocationLocks>,
}

impl CreateEvent {
    pub fn new(
        event: Arc<Event>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            event,
            clock,
            notifier,
            location_locks,
        }
    }

    pub async fn execute(&self, input: CreateEventInput) -> Result<domain::Event, EventError> {
        let event_type: EventType = input.event_type.parse()?;
        let mut event =
            domain::Event::new(input.title, event_type, input.location_id, self.clock.now())?;
        if let Some(description) = input.description {
            event = event.with_description(description);
        }

        let _location_guard = self.location_locks.lock(&input.location_id).await;
        if let Some(existing) = self.event.get_active_in_location(input.location_id).await? {
            return Err(EventError::PreconditionFailed(format!(
                "Event {} is already active at location {}",
                existing.id(),
                input.location_id
            )));
        }
        self.event.save(&event).await?;

        tracing::info!(
            event_id = %event.id(),
            location_id = %input.location_id,
            event_type = %event_type,
            "Event created"
        );
        self.notifier.publish(DomainEvent::EventCreated {
            event: event.clone(),
        });
        Ok(event)
    }
}

/// Close an event. Refused while one of its rounds is still active.
pub struct CloseEvent {
    event: Arc<Event>,
    round: Arc<Round>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    location_locks: Arc<LocationLocks>,
}

impl CloseEvent {
    pub fn new(
        event: Arc<Event>,
        round: Arc<Round>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            event,
            round,
            clock,
            notifier,
            location_locks,
        }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<(), EventError> {
        let current = load(&self.event, event_id).await?;
        let _location_guard = self.location_locks.lock(&current.location_id()).await;
        // Reload under the lock; the first read only located the lock.
        let mut event = load(&self.event, event_id).await?;

        if let Some(round) = self.round.get_active_for_event(event_id).await? {
            return Err(EventError::PreconditionFailed(format!(
                "Round {} of event {} is still active",
                round.id(),
                event_id
            )));
        }

        event.close(self.clock.now())?;
        self.event.save(&event).await?;

        tracing::info!(
            event_id = %event_id,
            location_id = %event.location_id(),
            total_rounds = event.stats().total_rounds,
            "Event closed"
        );
        self.notifier.publish(DomainEvent::EventClosed { event });
        Ok(())
    }
}

/// Snapshot the live session, then mark the event frozen.
pub struct FreezeEvent {
    event: Arc<Event>,
    session: Arc<dyn SessionStatePort>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    location_locks: Arc<LocationLocks>,
}

impl FreezeEvent {
    pub fn new(
        event: Arc<Event>,
        session: Arc<dyn SessionStatePort>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            event,
            session,
            clock,
            notifier,
            location_locks,
        }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<(), EventError> {
        let current = load(&self.event, event_id).await?;
        let _location_guard = self.location_locks.lock(&current.location_id()).await;
        let mut event = load(&self.event, event_id).await?;

        let now = self.clock.now();
        // Transition a copy first so a refused freeze never reaches the session store.
        let mut frozen = event.clone();
        frozen.freeze(now)?;

        self.session
            .snapshot(event_id, now)
            .await
            .map_err(|e| EventError::Dependency(format!("Session snapshot failed: {}", e)))?;

        event = frozen;
        self.event.save(&event).await?;

        tracing::info!(event_id = %event_id, location_id = %event.location_id(), "Event frozen");
        self.notifier.publish(DomainEvent::EventFrozen { event });
        Ok(())
    }
}

/// Restore the suspended session, then reopen the event.
pub struct UnfreezeEvent {
    event: Arc<Event>,
    session: Arc<dyn SessionStatePort>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
    location_locks: Arc<LocationLocks>,
}

impl UnfreezeEvent {
    pub fn new(
        event: Arc<Event>,
        session: Arc<dyn SessionStatePort>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
        location_locks: Arc<LocationLocks>,
    ) -> Self {
        Self {
            event,
            session,
            clock,
            notifier,
            location_locks,
        }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<(), EventError> {
        let current = load(&self.event, event_id).await?;
        let _location_guard = self.location_locks.lock(&current.location_id()).await;
        let mut event = load(&self.event, event_id).await?;

        let mut reopened = event.clone();
        reopened.unfreeze(self.clock.now())?;

        self.session
            .restore(event_id)
            .await
            .map_err(|e| EventError::Dependency(format!("Session restore failed: {}", e)))?;

        event = reopened;
        self.event.save(&event).await?;

        tracing::info!(event_id = %event_id, location_id = %event.location_id(), "Event unfrozen");
        self.notifier.publish(DomainEvent::EventUnfrozen { event });
        Ok(())
    }
}

pub struct GetActiveEvent {
    event: Arc<Event>,
}

impl GetActiveEvent {
    pub fn new(event: Arc<Event>) -> Self {
        Self { event }
    }

    pub async fn execute(&self, location_id: LocationId) -> Result<Option<domain::Event>, EventError> {
        Ok(self.event.get_active_in_location(location_id).await?)
    }
}

async fn load(events: &Event, event_id: EventId) -> Result<domain::Event, EventError> {
    events
        .get(event_id)
        .await?
        .ok_or_else(|| EventError::not_found("Event", event_id))
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
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

impl EventError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<RepoError> for EventError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Dependency(other.to_string()),
        }
    }
}

impl From<DomainError> for EventError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            e if e.is_state_error() => Self::PreconditionFailed(e.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}
