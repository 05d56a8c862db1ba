//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Catalog reads (in-memory seed or the remote character/skill service)
//! - Round, event and usage storage
//! - Session snapshots and push notifications
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::RepoError;
pub use external::{NotificationPort, SessionStatePort};
pub use repos::{CharacterRepo, EventRepo, RoundRepo, SkillRepo, UsageRepo};
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use external::{MockNotificationPort, MockSessionStatePort};
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockEventRepo, MockRoundRepo, MockSkillRepo, MockUsageRepo};
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};
