//! Read-only view of a character's rank in one skill and its branch.

use std::sync::Arc;

use skirmish_domain::game_systems::{branch_rank_tier, skill_rank_tier};
use skirmish_domain::{CharacterId, RankTier, SkillBranch, SkillId, UsageCounts};

use crate::entities::{Character, Progression, Skill};
use crate::infrastructure::ports::RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillProgress {
    pub character_id: CharacterId,
    pub skill_id: SkillId,
    pub branch: SkillBranch,
    pub usage: UsageCounts,
    pub skill_tier: RankTier,
    pub branch_tier: RankTier,
}

impl SkillProgress {
    pub fn uses_to_next_skill_tier(&self) -> Option<u32> {
        self.skill_tier.uses_to_next(self.usage.skill_uses)
    }

    pub fn uses_to_next_branch_tier(&self) -> Option<u32> {
        self.branch_tier.uses_to_next(self.usage.branch_uses)
    }
}

pub struct GetSkillProgress {
    character: Arc<Character>,
    skill: Arc<Skill>,
    progression: Arc<Progression>,
}

impl GetSkillProgress {
    pub fn new(
        character: Arc<Character>,
        skill: Arc<Skill>,
        progression: Arc<Progression>,
    ) -> Self {
        Self {
            character,
            skill,
            progression,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        skill_id: SkillId,
    ) -> Result<SkillProgress, ProgressionError> {
        self.character
            .get(character_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Character", character_id))?;
        let skill = self
            .skill
            .get(skill_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Skill", skill_id))?;

        let usage = self.progression.counts(character_id, &skill).await?;
        Ok(SkillProgress {
            character_id,
            skill_id,
            branch: skill.branch,
            usage,
            skill_tier: skill_rank_tier(usage.skill_uses),
            branch_tier: branch_rank_tier(usage.branch_uses),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Dependency failed: {0}")]
    Dependency(String),
}

impl From<RepoError> for ProgressionError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Dependency(other.to_string()),
        }
    }
}
