//! Application state and composition.

use std::sync::Arc;

use crate::entities;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    locks::{LocationLocks, RoundLocks},
    notifications::BroadcastNotifier,
    ports::{
        CharacterRepo, ClockPort, EventRepo, NotificationPort, RandomPort, RoundRepo,
        SessionStatePort, SkillRepo, UsageRepo,
    },
};
use crate::use_cases;

/// Main application state.
///
/// Holds all use cases and the notification hub.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub notifications: Arc<BroadcastNotifier>,
}

/// Every port the engine needs, already built.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub skill: Arc<dyn SkillRepo>,
    pub usage: Arc<dyn UsageRepo>,
    pub round: Arc<dyn RoundRepo>,
    pub event: Arc<dyn EventRepo>,
    pub session: Arc<dyn SessionStatePort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub combat: use_cases::CombatUseCases,
    pub event: use_cases::EventUseCases,
    pub progress: Arc<use_cases::GetSkillProgress>,
}

impl App {
    /// Create a new App on the system clock and thread RNG.
    pub fn new(
        repos: Repositories,
        notifications: Arc<BroadcastNotifier>,
        resolved_rounds_limit: u32,
    ) -> Self {
        Self::with_ports(
            repos,
            notifications,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            resolved_rounds_limit,
        )
    }

    /// Create a new App with explicit time and randomness.
    pub fn with_ports(
        repos: Repositories,
        notifications: Arc<BroadcastNotifier>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        resolved_rounds_limit: u32,
    ) -> Self {
        let notifier: Arc<dyn NotificationPort> = notifications.clone();
        let location_locks = Arc::new(LocationLocks::new());
        let round_locks = Arc::new(RoundLocks::new());

        // Entity modules
        let character = Arc::new(entities::Character::new(repos.character));
        let skill = Arc::new(entities::Skill::new(repos.skill));
        let progression = Arc::new(entities::Progression::new(repos.usage));
        let round = Arc::new(entities::Round::new(repos.round));
        let event = Arc::new(entities::Event::new(repos.event));

        let combat = use_cases::CombatUseCases::new(
            Arc::new(use_cases::combat::CreateRound::new(
                round.clone(),
                event.clone(),
                clock.clone(),
                notifier.clone(),
                location_locks.clone(),
            )),
            Arc::new(use_cases::combat::SubmitAction::new(
                round.clone(),
                character.clone(),
                skill.clone(),
                clock.clone(),
                notifier.clone(),
                round_locks.clone(),
            )),
            Arc::new(use_cases::combat::ResolveRound::new(
                round.clone(),
                event.clone(),
                progression.clone(),
                clock.clone(),
                random,
                notifier.clone(),
                round_locks.clone(),
                location_locks.clone(),
            )),
            Arc::new(use_cases::combat::CancelRound::new(
                round.clone(),
                event.clone(),
                clock.clone(),
                notifier.clone(),
                round_locks,
                location_locks.clone(),
            )),
            Arc::new(use_cases::combat::RoundQueries::new(
                round.clone(),
                resolved_rounds_limit,
            )),
        );

        let event_use_cases = use_cases::EventUseCases::new(
            Arc::new(use_cases::event::CreateEvent::new(
                event.clone(),
                clock.clone(),
                notifier.clone(),
                location_locks.clone(),
            )),
            Arc::new(use_cases::event::CloseEvent::new(
                event.clone(),
                round,
                clock.clone(),
                notifier.clone(),
                location_locks.clone(),
            )),
            Arc::new(use_cases::event::FreezeEvent::new(
                event.clone(),
                repos.session.clone(),
                clock.clone(),
                notifier.clone(),
                location_locks.clone(),
            )),
            Arc::new(use_cases::event::UnfreezeEvent::new(
                event.clone(),
                repos.session,
                clock,
                notifier,
                location_locks,
            )),
            Arc::new(use_cases::event::GetActiveEvent::new(event)),
        );

        let progress = Arc::new(use_cases::GetSkillProgress::new(
            character,
            skill,
            progression,
        ));

        Self {
            use_cases: UseCases {
                combat,
                event: event_use_cases,
                progress,
            },
            notifications,
        }
    }
}
