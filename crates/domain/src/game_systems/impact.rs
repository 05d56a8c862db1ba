//! Impact calculation - base power plus weighted scaling stats.

use crate::entities::Skill;
use crate::value_objects::StatBlock;

/// Positional weights in hundredths, indexed by how many stats a skill scales from.
const WEIGHTS_ONE: [i64; 1] = [100];
const WEIGHTS_TWO: [i64; 2] = [70, 30];
const WEIGHTS_THREE: [i64; 3] = [60, 25, 15];

/// Weights (hundredths) for a skill with `count` scaling stats.
///
/// Skills with more than three scaling stats use the three-stat weights, so
/// only their three highest stats contribute.
pub fn scaling_weights(count: usize) -> &'static [i64] {
    match count {
        0 => &[],
        1 => &WEIGHTS_ONE,
        2 => &WEIGHTS_TWO,
        _ => &WEIGHTS_THREE,
    }
}

/// Base impact of `skill` used by an actor with `stats`.
///
/// Scaling stat values are sorted high to low before weights are assigned,
/// so the strongest stat always gets the largest weight. Each contribution is
/// floored on its own.
pub fn compute_base_impact(skill: &Skill, stats: &StatBlock) -> i64 {
    let mut values: Vec<i64> = skill
        .scaling_stats
        .iter()
        .map(|stat| i64::from(stats.get(stat)))
        .collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let weights = scaling_weights(values.len());
    let scaled: i64 = values
        .iter()
        .zip(weights)
        .map(|(value, weight)| (value * weight).div_euclid(100))
        .sum();

    i64::from(skill.base_power) + scaled
}
