use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use skirmish_domain::{CharacterId, RoundId, SkillBranch, SkillId, SkillUse};

use crate::infrastructure::ports::{RepoError, UsageRepo};

/// Usage counters keyed per (character, skill) and (character, branch).
///
/// Increments go through a `DashMap` entry, which holds the shard lock for
/// the read-modify-write, so each key is updated atomically. Rounds already
/// counted are remembered so a repeated batch is a no-op.
#[derive(Default)]
pub struct InMemoryUsageStore {
    skills: DashMap<(CharacterId, SkillId), u32>,
    branches: DashMap<(CharacterId, SkillBranch), u32>,
    recorded_rounds: DashSet<RoundId>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepo for InMemoryUsageStore {
    async fn skill_uses(
        &self,
        character_id: CharacterId,
        skill_id: SkillId,
    ) -> Result<u32, RepoError> {
        Ok(self
            .skills
            .get(&(character_id, skill_id))
            .map(|count| *count)
            .unwrap_or(0))
    }

    async fn branch_uses(
        &self,
        character_id: CharacterId,
        branch: &SkillBranch,
    ) -> Result<u32, RepoError> {
        Ok(self
            .branches
            .get(&(character_id, branch.clone()))
            .map(|count| *count)
            .unwrap_or(0))
    }

    async fn record_round_uses(
        &self,
        round_id: RoundId,
        uses: &[SkillUse],
    ) -> Result<bool, RepoError> {
        if !self.recorded_rounds.insert(round_id) {
            return Ok(false);
        }
        for skill_use in uses {
            let mut count = self
                .skills
                .entry((skill_use.character_id, skill_use.skill_id))
                .or_insert(0);
            *count = count.saturating_add(1);
            drop(count);

            let mut count = self
                .branches
                .entry((skill_use.character_id, skill_use.branch.clone()))
                .or_insert(0);
            *count = count.saturating_add(1);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn counts_start_at_zero() {
        let store = InMemoryUsageStore::new();
        let branch = SkillBranch::new("blade").expect("branch");
        assert_eq!(
            store.skill_uses(CharacterId::new(), SkillId::new()).await.expect("read"),
            0
        );
        assert_eq!(
            store.branch_uses(CharacterId::new(), &branch).await.expect("read"),
            0
        );
    }

    fn blade_use(character_id: CharacterId, skill_id: SkillId) -> SkillUse {
        SkillUse {
            character_id,
            skill_id,
            branch: SkillBranch::new("blade").expect("branch"),
        }
    }

    #[tokio::test]
    async fn a_round_is_counted_once() {
        let store = InMemoryUsageStore::new();
        let character = CharacterId::new();
        let skill = SkillId::new();
        let round = RoundId::new();
        let uses = vec![blade_use(character, skill), blade_use(character, skill)];

        assert!(store.record_round_uses(round, &uses).await.expect("first"));
        assert!(!store.record_round_uses(round, &uses).await.expect("repeat"));

        assert_eq!(store.skill_uses(character, skill).await.expect("read"), 2);
        let branch = SkillBranch::new("blade").expect("branch");
        assert_eq!(store.branch_uses(character, &branch).await.expect("read"), 2);
    }

    #[tokio::test]
    async fn concurrent_rounds_do_not_lose_increments() {
        let store = Arc::new(InMemoryUsageStore::new());
        let character = CharacterId::new();
        let skill = SkillId::new();
        let branch = SkillBranch::new("blade").expect("branch");

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .record_round_uses(RoundId::new(), &[blade_use(character, skill)])
                        .await
                        .expect("record");
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("task");
        }

        assert_eq!(store.skill_uses(character, skill).await.expect("read"), 64);
        assert_eq!(store.branch_uses(character, &branch).await.expect("read"), 64);
    }
}
