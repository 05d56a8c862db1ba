//! Domain entities - Core business objects with identity

mod character;
mod race;
mod skill;

pub use character::{Character, CharacterSnapshot, TargetSnapshot};
pub use race::{DerivedResources, Race};
pub use skill::{Skill, SkillBranch, SkillTarget};
