//! Combat rules
//!
//! Pure functions that turn a skill use into a number:
//!
//! 1. [`impact`] - base power plus weighted scaling stats
//! 2. [`progression`] - skill and branch rank multipliers from usage counts
//! 3. [`outcome`] - multiplied tiers and the d20 quality roll
//! 4. [`clash`] - pairing and adjudicating mutually targeting actions
//!
//! Nothing here performs I/O or owns a random source.

pub mod clash;
pub mod impact;
pub mod outcome;
pub mod progression;

pub use clash::{pair_clashes, resolve_clash, ClashOutcome, ClashSide, Engagement};
pub use impact::{compute_base_impact, scaling_weights};
pub use outcome::{
    resolve_outcome, roll_outcome, OutcomeTiers, RollQuality, RolledOutcome, QUALITY_DIE,
};
pub use progression::{
    branch_rank_multiplier, branch_rank_tier, skill_rank_multiplier, skill_rank_tier,
    RankMultiplier, RankTier, SkillUse, UsageCounts,
};
