//! Usage counters and the rank multipliers they drive.

use std::sync::Arc;

use skirmish_domain::{CharacterId, CombatRound, Skill, UsageCounts};

use crate::infrastructure::ports::{RepoError, UsageRepo};

pub struct Progression {
    usage: Arc<dyn UsageRepo>,
}

impl Progression {
    pub fn new(usage: Arc<dyn UsageRepo>) -> Self {
        Self { usage }
    }

    /// Current counters for `skill` and its branch.
    pub async fn counts(
        &self,
        character_id: CharacterId,
        skill: &Skill,
    ) -> Result<UsageCounts, RepoError> {
        let skill_uses = self.usage.skill_uses(character_id, skill.id).await?;
        let branch_uses = self.usage.branch_uses(character_id, &skill.branch).await?;
        Ok(UsageCounts {
            skill_uses,
            branch_uses,
        })
    }

    /// Count every action of a resolved round against its skill and branch.
    ///
    /// Safe to repeat: a round already counted is skipped by the store.
    pub async fn record_round(&self, round: &CombatRound) -> Result<(), RepoError> {
        let uses = round.skill_uses();
        if uses.is_empty() {
            return Ok(());
        }
        let applied = self.usage.record_round_uses(round.id(), &uses).await?;
        if !applied {
            tracing::debug!(round_id = %round.id(), "Round usage already counted");
        }
        Ok(())
    }
}
