//! Skill entity operations.

use std::sync::Arc;

use skirmish_domain::{self as domain, SkillId};

use crate::infrastructure::ports::{RepoError, SkillRepo};

/// Skill catalog operations.
pub struct Skill {
    repo: Arc<dyn SkillRepo>,
}

impl Skill {
    pub fn new(repo: Arc<dyn SkillRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: SkillId) -> Result<Option<domain::Skill>, RepoError> {
        self.repo.get(id).await
    }
}
