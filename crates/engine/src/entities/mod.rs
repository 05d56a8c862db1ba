//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps operations for a domain entity type.
//! They depend on repository ports and provide the building blocks for use cases.

pub mod character;
pub mod event;
pub mod progression;
pub mod round;
pub mod skill;

pub use character::Character;
pub use event::Event;
pub use progression::Progression;
pub use round::Round;
pub use skill::Skill;
