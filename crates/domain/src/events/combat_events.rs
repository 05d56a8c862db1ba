//! Combat round mutation outcomes.

use crate::aggregates::ResolutionData;
use crate::RoundId;

/// Returned by [`CombatRound::resolve`](crate::aggregates::CombatRound::resolve).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResolved {
    pub round_id: RoundId,
    pub resolution: ResolutionData,
}

/// Returned by [`CombatRound::cancel`](crate::aggregates::CombatRound::cancel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCancelled {
    pub round_id: RoundId,
    /// Submitted actions that will never be scored
    pub discarded_actions: u32,
}
