//! In-memory adapters for every storage port.
//!
//! Used by the binary when no remote catalog is configured, and by tests.

mod catalog;
mod events;
mod rounds;
mod session;
mod usage;

pub use catalog::InMemoryCatalog;
pub use events::InMemoryEventStore;
pub use rounds::InMemoryRoundStore;
pub use session::InMemorySessionStore;
pub use usage::InMemoryUsageStore;
