//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod combat;
pub mod event;
pub mod progression;

pub use combat::{CombatError, CombatUseCases};
pub use event::{EventError, EventUseCases};
pub use progression::{GetSkillProgress, ProgressionError, SkillProgress};
