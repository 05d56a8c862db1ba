//! Stat value objects - keys, definitions, and per-character stat blocks.
//!
//! Provides type safety for stat references instead of raw strings: a
//! [`StatKey`] is validated and normalized once, and writes into a
//! [`StatBlock`] are checked against the active [`StatCatalog`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a stat (`internalName`), e.g. `FOR`, `RES`, `AETHER_REGEN`.
///
/// Always non-empty, ASCII alphanumeric or `_`, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatKey(String);

impl StatKey {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Stat key cannot be empty"));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DomainError::validation(format!(
                "Stat key '{}' may only contain letters, digits and '_'",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StatKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StatKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StatKey> for String {
    fn from(value: StatKey) -> Self {
        value.0
    }
}

/// How a stat is used by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    /// Raised with stat points, receives racial bonuses
    PrimaryStat,
    /// Pools such as HP or aether
    Resource,
    /// Only referenced by skill scaling
    ScalingStat,
}

/// Administrator-defined reference data for one stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDefinition {
    pub internal_name: StatKey,
    pub display_name: String,
    pub category: StatCategory,
    pub default_value: i32,
    pub min_value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i32>,
    pub is_active: bool,
    pub sort_order: u32,
}

impl StatDefinition {
    pub fn new(key: StatKey, display_name: impl Into<String>, category: StatCategory) -> Self {
        Self {
            internal_name: key,
            display_name: display_name.into(),
            category,
            default_value: 0,
            min_value: 0,
            max_value: None,
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn with_default(mut self, value: i32) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_range(mut self, min: i32, max: Option<i32>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_sort_order(mut self, order: u32) -> Self {
        self.sort_order = order;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Check that `value` lies within `[min_value, max_value]`.
    pub fn check(&self, value: i32) -> Result<(), DomainError> {
        if value < self.min_value {
            return Err(DomainError::validation(format!(
                "{} must be at least {} (got {})",
                self.internal_name, self.min_value, value
            )));
        }
        if let Some(max) = self.max_value {
            if value > max {
                return Err(DomainError::validation(format!(
                    "{} must be at most {} (got {})",
                    self.internal_name, max, value
                )));
            }
        }
        Ok(())
    }
}

/// The set of stat definitions that stat writes are validated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatCatalog {
    definitions: BTreeMap<StatKey, StatDefinition>,
}

impl StatCatalog {
    pub fn new(definitions: impl IntoIterator<Item = StatDefinition>) -> Result<Self, DomainError> {
        let mut map = BTreeMap::new();
        for definition in definitions {
            let key = definition.internal_name.clone();
            if map.insert(key.clone(), definition).is_some() {
                return Err(DomainError::validation(format!(
                    "Duplicate stat definition: {}",
                    key
                )));
            }
        }
        Ok(Self { definitions: map })
    }

    pub fn get(&self, key: &StatKey) -> Option<&StatDefinition> {
        self.definitions.get(key)
    }

    /// Active definitions in display order.
    pub fn active(&self) -> Vec<&StatDefinition> {
        let mut active: Vec<_> = self.definitions.values().filter(|d| d.is_active).collect();
        active.sort_by_key(|d| (d.sort_order, d.internal_name.clone()));
        active
    }

    /// Reject unknown keys, inactive keys, and out-of-range values.
    pub fn validate(&self, key: &StatKey, value: i32) -> Result<(), DomainError> {
        let definition = self
            .definitions
            .get(key)
            .ok_or_else(|| DomainError::validation(format!("Unknown stat: {}", key)))?;
        if !definition.is_active {
            return Err(DomainError::validation(format!("Stat {} is not active", key)));
        }
        definition.check(value)
    }

    pub fn validate_block(&self, block: &StatBlock) -> Result<(), DomainError> {
        block
            .iter()
            .try_for_each(|(key, value)| self.validate(key, value))
    }

    /// A block with every active stat at its default value.
    pub fn default_block(&self) -> StatBlock {
        self.active()
            .into_iter()
            .map(|d| (d.internal_name.clone(), d.default_value))
            .collect()
    }
}

/// Per-character stat values keyed by [`StatKey`].
///
/// Reading a stat the block does not hold yields 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock(BTreeMap<StatKey, i32>);

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &StatKey) -> i32 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &StatKey) -> bool {
        self.0.contains_key(key)
    }

    /// Write a stat value after validating it against the catalog.
    pub fn set(
        &mut self,
        catalog: &StatCatalog,
        key: StatKey,
        value: i32,
    ) -> Result<(), DomainError> {
        catalog.validate(&key, value)?;
        self.0.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatKey, i32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds `other` onto this block key by key.
    pub fn plus(&self, other: &StatBlock) -> StatBlock {
        let mut combined = self.0.clone();
        for (key, value) in other.iter() {
            let slot = combined.entry(key.clone()).or_insert(0);
            *slot = slot.saturating_add(value);
        }
        Self(combined)
    }
}

impl FromIterator<(StatKey, i32)> for StatBlock {
    fn from_iter<T: IntoIterator<Item = (StatKey, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
