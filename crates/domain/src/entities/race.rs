//! Race entity - base resources and primary stat bonuses
//!
//! Races are reference data: characters hold a copy, gameplay never mutates it.

use serde::{Deserialize, Serialize};

use crate::value_objects::{StatBlock, StatKey};
use crate::RaceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    pub base_hp: i32,
    pub base_aether: i32,
    pub base_speed: i32,
    pub base_aether_regen: i32,
    /// Bonus added to each primary stat
    #[serde(default)]
    pub stat_bonuses: StatBlock,
}

/// Resources a character starts a fight with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedResources {
    pub hp: i32,
    pub aether: i32,
    pub speed: i32,
    pub aether_regen: i32,
}

impl Race {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RaceId::new(),
            name: name.into(),
            base_hp: 0,
            base_aether: 0,
            base_speed: 0,
            base_aether_regen: 0,
            stat_bonuses: StatBlock::new(),
        }
    }

    pub fn with_bases(mut self, hp: i32, aether: i32, speed: i32, aether_regen: i32) -> Self {
        self.base_hp = hp;
        self.base_aether = aether;
        self.base_speed = speed;
        self.base_aether_regen = aether_regen;
        self
    }

    pub fn with_bonus(mut self, stat: StatKey, bonus: i32) -> Self {
        self.stat_bonuses = self
            .stat_bonuses
            .plus(&[(stat, bonus)].into_iter().collect());
        self
    }

    pub fn bonus(&self, stat: &StatKey) -> i32 {
        self.stat_bonuses.get(stat)
    }

    /// `stats` with this race's bonuses added on top.
    pub fn apply_bonuses(&self, stats: &StatBlock) -> StatBlock {
        stats.plus(&self.stat_bonuses)
    }

    pub fn derived_resources(&self) -> DerivedResources {
        DerivedResources {
            hp: self.base_hp,
            aether: self.base_aether,
            speed: self.base_speed,
            aether_regen: self.base_aether_regen,
        }
    }
}
