//! Rank multipliers derived from usage counts.
//!
//! Skill rank grows quickly with uses of one skill; branch rank grows slowly
//! with uses of any skill in the branch. The two multipliers are summed by the
//! outcome resolver, not multiplied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::SkillBranch;
use crate::{CharacterId, SkillId};

/// A multiplier stored in hundredths (`135` = 1.35) so tiers stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankMultiplier(u32);

impl RankMultiplier {
    pub const ONE: Self = Self(100);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for RankMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// (uses below which the tier applies, multiplier in hundredths)
const SKILL_RANK_TIERS: [(u32, u32); 4] = [(20, 100), (35, 130), (60, 170), (100, 220)];
const SKILL_RANK_MAX: u32 = 280;

const BRANCH_RANK_TIERS: [(u32, u32); 9] = [
    (75, 100),
    (150, 105),
    (250, 110),
    (375, 115),
    (525, 120),
    (700, 125),
    (900, 130),
    (1125, 135),
    (1375, 140),
];
const BRANCH_RANK_MAX: u32 = 150;

/// Position of a usage count within a tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankTier {
    /// 0-based tier index
    pub tier: u8,
    pub multiplier: RankMultiplier,
    /// Use count at which the next tier starts, `None` at the top tier
    pub next_threshold: Option<u32>,
}

impl RankTier {
    pub fn uses_to_next(&self, uses: u32) -> Option<u32> {
        self.next_threshold.map(|t| t.saturating_sub(uses))
    }
}

fn lookup(table: &[(u32, u32)], max: u32, uses: u32) -> RankTier {
    for (index, (below, hundredths)) in table.iter().enumerate() {
        if uses < *below {
            return RankTier {
                tier: index as u8,
                multiplier: RankMultiplier(*hundredths),
                next_threshold: Some(*below),
            };
        }
    }
    RankTier {
        tier: table.len() as u8,
        multiplier: RankMultiplier(max),
        next_threshold: None,
    }
}

pub fn skill_rank_tier(skill_uses: u32) -> RankTier {
    lookup(&SKILL_RANK_TIERS, SKILL_RANK_MAX, skill_uses)
}

pub fn branch_rank_tier(branch_uses: u32) -> RankTier {
    lookup(&BRANCH_RANK_TIERS, BRANCH_RANK_MAX, branch_uses)
}

pub fn skill_rank_multiplier(skill_uses: u32) -> RankMultiplier {
    skill_rank_tier(skill_uses).multiplier
}

pub fn branch_rank_multiplier(branch_uses: u32) -> RankMultiplier {
    branch_rank_tier(branch_uses).multiplier
}

/// Usage counters for one (character, skill) pair and its branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounts {
    pub skill_uses: u32,
    pub branch_uses: u32,
}

impl UsageCounts {
    pub fn skill_multiplier(&self) -> RankMultiplier {
        skill_rank_multiplier(self.skill_uses)
    }

    pub fn branch_multiplier(&self) -> RankMultiplier {
        branch_rank_multiplier(self.branch_uses)
    }
}

/// One resolved use of a skill, counted against the skill and its branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillUse {
    pub character_id: CharacterId,
    pub skill_id: SkillId,
    pub branch: SkillBranch,
}
