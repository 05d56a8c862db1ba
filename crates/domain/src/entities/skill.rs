//! Skill entity - catalog definitions used by combat actions
//!
//! Skills are created by administrators and referenced by id when an action
//! is submitted; the action then carries its own copy of the skill.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::StatKey;
use crate::{CharacterId, DomainError, SkillId};

/// A usable skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_power: i32,
    /// Ordered set of stats the skill scales from (no duplicates)
    #[serde(default)]
    pub scaling_stats: Vec<StatKey>,
    pub target: SkillTarget,
    /// Grouping used for branch-rank tracking
    pub branch: SkillBranch,
    /// Flavor classification (e.g. "offensive", "ward")
    #[serde(rename = "type", default)]
    pub skill_type: String,
    #[serde(default)]
    pub aether_cost: u32,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        base_power: i32,
        target: SkillTarget,
        branch: SkillBranch,
    ) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            description: String::new(),
            base_power,
            scaling_stats: Vec::new(),
            target,
            branch,
            skill_type: String::new(),
            aether_cost: 0,
        }
    }

    /// Append a scaling stat. Adding the same stat twice is rejected.
    pub fn with_scaling_stat(mut self, stat: StatKey) -> Result<Self, DomainError> {
        if self.scaling_stats.contains(&stat) {
            return Err(DomainError::validation(format!(
                "Skill '{}' already scales from {}",
                self.name, stat
            )));
        }
        self.scaling_stats.push(stat);
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, skill_type: impl Into<String>) -> Self {
        self.skill_type = skill_type.into();
        self
    }

    pub fn with_aether_cost(mut self, cost: u32) -> Self {
        self.aether_cost = cost;
        self
    }

    /// Checks invariants for skills that arrive already built (seed files, remote catalog).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Skill name cannot be empty"));
        }
        for (i, stat) in self.scaling_stats.iter().enumerate() {
            if self.scaling_stats[..i].contains(stat) {
                return Err(DomainError::validation(format!(
                    "Skill '{}' lists scaling stat {} twice",
                    self.name, stat
                )));
            }
        }
        Ok(())
    }
}

/// Who a skill may be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTarget {
    /// Always the actor
    #[serde(rename = "self")]
    SelfOnly,
    /// Another character; a target is required
    Other,
    /// No target at all
    None,
    /// Optional target, anyone
    Any,
}

impl SkillTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfOnly => "self",
            Self::Other => "other",
            Self::None => "none",
            Self::Any => "any",
        }
    }

    /// Work out the effective target of an action, or reject the request.
    pub fn resolve(
        self,
        actor: CharacterId,
        requested: Option<CharacterId>,
    ) -> Result<Option<CharacterId>, DomainError> {
        match (self, requested) {
            (Self::SelfOnly, None) => Ok(Some(actor)),
            (Self::SelfOnly, Some(target)) if target == actor => Ok(Some(actor)),
            (Self::SelfOnly, Some(_)) => Err(DomainError::validation(
                "Skill can only target its user",
            )),
            (Self::Other, None) => Err(DomainError::validation("Skill requires a target")),
            (Self::Other, Some(target)) if target == actor => Err(DomainError::validation(
                "Skill cannot target its user",
            )),
            (Self::Other, Some(target)) => Ok(Some(target)),
            (Self::None, None) => Ok(None),
            (Self::None, Some(_)) => Err(DomainError::validation("Skill takes no target")),
            (Self::Any, requested) => Ok(requested),
        }
    }
}

/// Branch a skill belongs to, e.g. "pyromancy".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillBranch(String);

impl SkillBranch {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Skill branch cannot be empty"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SkillBranch {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SkillBranch> for String {
    fn from(value: SkillBranch) -> Self {
        value.0
    }
}
