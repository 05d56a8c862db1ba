//! Clash adjudication between two actions that target each other.

use serde::{Deserialize, Serialize};

use crate::{ActionId, CharacterId};

/// One side of a clash: the action and its final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClashSide {
    pub action_id: ActionId,
    pub output: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClashOutcome {
    /// The higher output wins and deals the difference
    #[serde(rename_all = "camelCase")]
    Victory {
        winner: ActionId,
        loser: ActionId,
        damage: i64,
    },
    /// Equal outputs; nobody takes damage
    Tie,
}

impl ClashOutcome {
    pub fn damage(&self) -> i64 {
        match self {
            Self::Victory { damage, .. } => *damage,
            Self::Tie => 0,
        }
    }

    pub fn winner(&self) -> Option<ActionId> {
        match self {
            Self::Victory { winner, .. } => Some(*winner),
            Self::Tie => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Victory { .. } => "Victory",
            Self::Tie => "Tie",
        }
    }
}

/// Compare two outputs. Argument order never changes the result.
pub fn resolve_clash(a: ClashSide, b: ClashSide) -> ClashOutcome {
    let damage = (a.output - b.output).abs();
    match a.output.cmp(&b.output) {
        std::cmp::Ordering::Greater => ClashOutcome::Victory {
            winner: a.action_id,
            loser: b.action_id,
            damage,
        },
        std::cmp::Ordering::Less => ClashOutcome::Victory {
            winner: b.action_id,
            loser: a.action_id,
            damage,
        },
        std::cmp::Ordering::Equal => ClashOutcome::Tie,
    }
}

/// Who acted on whom, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub actor: CharacterId,
    pub target: Option<CharacterId>,
}

impl Engagement {
    fn mirrors(&self, other: &Engagement) -> bool {
        self.actor != other.actor
            && self.target == Some(other.actor)
            && other.target == Some(self.actor)
    }
}

/// Pair mutually targeting actions.
///
/// Returns index pairs into `engagements` and the indices left independent.
/// Each action joins at most one clash; earlier submissions pair first.
pub fn pair_clashes(engagements: &[Engagement]) -> (Vec<(usize, usize)>, Vec<usize>) {
    let mut paired = vec![false; engagements.len()];
    let mut clashes = Vec::new();

    for i in 0..engagements.len() {
        if paired[i] {
            continue;
        }
        let partner = (i + 1..engagements.len())
            .find(|&j| !paired[j] && engagements[i].mirrors(&engagements[j]));
        if let Some(j) = partner {
            paired[i] = true;
            paired[j] = true;
            clashes.push((i, j));
        }
    }

    let independent = (0..engagements.len()).filter(|&i| !paired[i]).collect();
    (clashes, independent)
}
