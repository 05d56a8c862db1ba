//! Outcome resolution - rank multipliers, roll quality, and the final output.
//!
//! The d20 draw is injected as a closure taking an inclusive `(min, max)`
//! range, so callers decide where randomness comes from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_systems::progression::RankMultiplier;
use crate::DomainError;

/// Faces on the quality die.
pub const QUALITY_DIE: i32 = 20;

/// Highest roll that is still poor.
const POOR_MAX: u8 = 3;
/// Lowest roll that is critical.
const CRITICAL_MIN: u8 = 18;

const POOR_PERCENT: i64 = 60;
const CRITICAL_PERCENT: i64 = 140;

/// Which pre-computed output tier a roll selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollQuality {
    Poor,
    Standard,
    Critical,
}

impl RollQuality {
    /// 1-3 poor, 4-17 standard, 18-20 critical.
    pub fn from_d20(roll: u8) -> Result<Self, DomainError> {
        match roll {
            1..=POOR_MAX => Ok(Self::Poor),
            CRITICAL_MIN..=20 => Ok(Self::Critical),
            4..=17 => Ok(Self::Standard),
            _ => Err(DomainError::validation(format!(
                "Quality roll must be between 1 and {} (got {})",
                QUALITY_DIE, roll
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Standard => "standard",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RollQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three possible outputs of one skill use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeTiers {
    pub poor: i64,
    pub standard: i64,
    pub critical: i64,
}

impl OutcomeTiers {
    pub fn for_quality(&self, quality: RollQuality) -> i64 {
        match quality {
            RollQuality::Poor => self.poor,
            RollQuality::Standard => self.standard,
            RollQuality::Critical => self.critical,
        }
    }
}

/// Scale `base_impact` by the summed rank multipliers and derive each tier.
///
/// `base = impact * (skill + branch)`; poor, standard and critical are
/// `floor(base * 0.6)`, `floor(base)` and `floor(base * 1.4)`. All arithmetic
/// runs in hundredths so `27 * 2.35` gives exactly 63.45.
pub fn resolve_outcome(
    base_impact: i64,
    skill: RankMultiplier,
    branch: RankMultiplier,
) -> OutcomeTiers {
    let combined = i64::from(skill.hundredths()) + i64::from(branch.hundredths());
    let base_hundredths = base_impact * combined;

    OutcomeTiers {
        poor: (base_hundredths * POOR_PERCENT).div_euclid(100 * 100),
        standard: base_hundredths.div_euclid(100),
        critical: (base_hundredths * CRITICAL_PERCENT).div_euclid(100 * 100),
    }
}

/// A d20 draw and the output it selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolledOutcome {
    pub roll: u8,
    pub quality: RollQuality,
    pub output: i64,
}

/// Draw a quality die with `roll` and pick the matching tier.
pub fn roll_outcome(
    tiers: &OutcomeTiers,
    roll: impl FnOnce(i32, i32) -> i32,
) -> Result<RolledOutcome, DomainError> {
    let raw = roll(1, QUALITY_DIE);
    let face = u8::try_from(raw).map_err(|_| {
        DomainError::validation(format!("Quality roll out of range: {}", raw))
    })?;
    let quality = RollQuality::from_d20(face)?;
    Ok(RolledOutcome {
        roll: face,
        quality,
        output: tiers.for_quality(quality),
    })
}
