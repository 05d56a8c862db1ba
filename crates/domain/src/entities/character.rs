//! Character entity - the actor behind combat actions
//!
//! Characters are owned by the external character service. The engine only
//! reads them and freezes a [`CharacterSnapshot`] into each submitted action,
//! so later edits never change how an already-submitted action scores.

use serde::{Deserialize, Serialize};

use crate::entities::race::{DerivedResources, Race};
use crate::value_objects::{StatBlock, StatCatalog};
use crate::{CharacterId, DomainError, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub owner_id: UserId,
    pub name: String,
    pub race: Race,
    /// Allocated stat values, before racial bonuses
    pub stats: StatBlock,
    /// Derived from experience by the character service
    pub rank: u32,
    pub skill_points: u32,
    pub stat_points: u32,
    /// At most one active character per user; enforced by the character service
    pub is_active: bool,
}

impl Character {
    pub fn new(owner_id: UserId, name: impl Into<String>, race: Race) -> Self {
        Self {
            id: CharacterId::new(),
            owner_id,
            name: name.into(),
            race,
            stats: StatBlock::new(),
            rank: 1,
            skill_points: 0,
            stat_points: 0,
            is_active: true,
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    /// Check the allocated stats against the active stat definitions.
    pub fn validate_stats(&self, catalog: &StatCatalog) -> Result<(), DomainError> {
        catalog.validate_block(&self.stats)
    }

    /// Allocated stats plus racial bonuses; the values skills scale from.
    pub fn effective_stats(&self) -> StatBlock {
        self.race.apply_bonuses(&self.stats)
    }

    pub fn resources(&self) -> DerivedResources {
        self.race.derived_resources()
    }

    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            id: self.id,
            name: self.name.clone(),
            stats: self.effective_stats(),
        }
    }

    pub fn as_target(&self) -> TargetSnapshot {
        TargetSnapshot {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Actor data frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    /// Effective stats (racial bonuses included)
    pub stats: StatBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSnapshot {
    pub id: CharacterId,
    pub name: String,
}
