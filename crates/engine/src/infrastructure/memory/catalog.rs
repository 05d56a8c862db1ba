use std::collections::HashMap;

use async_trait::async_trait;
use skirmish_domain::{Character, CharacterId, Skill, SkillId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CharacterRepo, RepoError, SkillRepo};

/// Characters and skills held in memory.
#[derive(Default)]
pub struct InMemoryCatalog {
    characters: RwLock<HashMap<CharacterId, Character>>,
    skills: RwLock<HashMap<SkillId, Skill>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_character(&self, character: Character) {
        self.characters.write().await.insert(character.id, character);
    }

    pub async fn insert_skill(&self, skill: Skill) {
        self.skills.write().await.insert(skill.id, skill);
    }

    pub async fn counts(&self) -> (usize, usize) {
        (
            self.characters.read().await.len(),
            self.skills.read().await.len(),
        )
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCatalog {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl SkillRepo for InMemoryCatalog {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError> {
        Ok(self.skills.read().await.get(&id).cloned())
    }
}
