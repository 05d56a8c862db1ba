//! Skirmish engine library.
//!
//! Server side of the combat round engine: round and event lifecycles,
//! action scoring, and the push stream watched by clients at a location.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping repository ports
//! - `use_cases/` - User story orchestration across entities
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by the API tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
