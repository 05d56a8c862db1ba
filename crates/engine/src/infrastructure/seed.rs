//! JSON seed for the in-memory catalog.
//!
//! ```json
//! {
//!   "stats":      [ { "internalName": "FOR", ... } ],
//!   "characters": [ { "id": "...", "name": "Ada", ... } ],
//!   "skills":     [ { "id": "...", "name": "Strike", ... } ]
//! }
//! ```
//!
//! When `stats` is present, every character's stats and every skill's scaling
//! stats must be defined in it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use skirmish_domain::{Character, DomainError, Skill, StatCatalog, StatDefinition};

use crate::infrastructure::memory::InMemoryCatalog;

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog seed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog seed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog entry {entry}: {source}")]
    Invalid {
        entry: String,
        #[source]
        source: DomainError,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSeed {
    #[serde(default)]
    pub stats: Vec<StatDefinition>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl CatalogSeed {
    pub fn from_json(raw: &str) -> Result<Self, CatalogLoadError> {
        let seed: Self = serde_json::from_str(raw)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<(), CatalogLoadError> {
        let catalog = StatCatalog::new(self.stats.iter().cloned())
            .map_err(invalid("stats".to_string()))?;
        let check_stats = !self.stats.is_empty();

        for skill in &self.skills {
            skill
                .validate()
                .map_err(invalid(format!("skill '{}'", skill.name)))?;
            if check_stats {
                if let Some(unknown) = skill.scaling_stats.iter().find(|s| catalog.get(s).is_none())
                {
                    return Err(CatalogLoadError::Invalid {
                        entry: format!("skill '{}'", skill.name),
                        source: DomainError::validation(format!("Unknown stat: {}", unknown)),
                    });
                }
            }
        }

        if check_stats {
            for character in &self.characters {
                character
                    .validate_stats(&catalog)
                    .map_err(invalid(format!("character '{}'", character.name)))?;
            }
        }
        Ok(())
    }

    /// Move every entry into `catalog`.
    pub async fn load_into(self, catalog: &InMemoryCatalog) {
        for character in self.characters {
            catalog.insert_character(character).await;
        }
        for skill in self.skills {
            catalog.insert_skill(skill).await;
        }
    }
}

fn invalid(entry: String) -> impl FnOnce(DomainError) -> CatalogLoadError {
    move |source| CatalogLoadError::Invalid { entry, source }
}
