//! Character entity operations.

use std::sync::Arc;

use skirmish_domain::{self as domain, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// Read access to the character service.
pub struct Character {
    repo: Arc<dyn CharacterRepo>,
}

impl Character {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: CharacterId) -> Result<Option<domain::Character>, RepoError> {
        self.repo.get(id).await
    }
}
