//! CombatRound aggregate - simultaneous action submission and batch resolution
//!
//! A round starts `Active`, collects actions, and ends exactly once as either
//! `Resolved` or `Cancelled`.
//!
//! # Invariants
//!
//! - Status only moves forward: `Active -> Resolved` or `Active -> Cancelled`
//! - Actions are only appended while `Active`
//! - `final_output` is set on every action iff the round is `Resolved`
//! - Resolution is all-or-nothing: a missing score leaves the round untouched

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CharacterSnapshot, Skill, TargetSnapshot};
use crate::events::{RoundCancelled, RoundResolved};
use crate::game_systems::{
    compute_base_impact, pair_clashes, resolve_clash, resolve_outcome, roll_outcome, ClashOutcome,
    ClashSide, Engagement, OutcomeTiers, RankMultiplier, RollQuality, RolledOutcome, SkillUse,
    UsageCounts,
};
use crate::{ActionId, DomainError, EventId, LocationId, RoundId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Active,
    Resolved,
    Cancelled,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }
}

/// How an action's final output was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionScore {
    pub base_impact: i64,
    pub usage: UsageCounts,
    pub skill_multiplier: RankMultiplier,
    pub branch_multiplier: RankMultiplier,
    pub tiers: OutcomeTiers,
    pub rolled: RolledOutcome,
}

/// One actor's submitted skill use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatAction {
    id: ActionId,
    character: CharacterSnapshot,
    skill: Skill,
    target: Option<TargetSnapshot>,
    submitted_at: DateTime<Utc>,
    final_output: Option<i64>,
    roll_quality: Option<RollQuality>,
    score: Option<ActionScore>,
}

impl CombatAction {
    pub fn new(
        character: CharacterSnapshot,
        skill: Skill,
        target: Option<TargetSnapshot>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActionId::new(),
            character,
            skill,
            target,
            submitted_at,
            final_output: None,
            roll_quality: None,
            score: None,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn character(&self) -> &CharacterSnapshot {
        &self.character
    }

    pub fn skill(&self) -> &Skill {
        &self.skill
    }

    pub fn target(&self) -> Option<&TargetSnapshot> {
        self.target.as_ref()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn final_output(&self) -> Option<i64> {
        self.final_output
    }

    pub fn roll_quality(&self) -> Option<RollQuality> {
        self.roll_quality
    }

    pub fn score(&self) -> Option<&ActionScore> {
        self.score.as_ref()
    }

    /// Run this action through impact, rank multipliers and the quality roll.
    ///
    /// Uses the snapshots taken at submission, never live catalog data.
    pub fn score_with(
        &self,
        usage: UsageCounts,
        roll: impl FnOnce(i32, i32) -> i32,
    ) -> Result<ActionScore, DomainError> {
        let base_impact = compute_base_impact(&self.skill, &self.character.stats);
        let skill_multiplier = usage.skill_multiplier();
        let branch_multiplier = usage.branch_multiplier();
        let tiers = resolve_outcome(base_impact, skill_multiplier, branch_multiplier);
        let rolled = roll_outcome(&tiers, roll)?;

        Ok(ActionScore {
            base_impact,
            usage,
            skill_multiplier,
            branch_multiplier,
            tiers,
            rolled,
        })
    }

    fn engagement(&self) -> Engagement {
        Engagement {
            actor: self.character.id,
            target: self.target.as_ref().map(|t| t.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashRecord {
    pub first: ActionId,
    pub second: ActionId,
    pub outcome: ClashOutcome,
}

/// Aggregate summary written when a round resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionData {
    pub total_actions: u32,
    pub clash_count: u32,
    pub independent_count: u32,
    #[serde(default)]
    pub clashes: Vec<ClashRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatRound {
    id: RoundId,
    event_id: EventId,
    location_id: LocationId,
    /// Monotonic per location
    round_number: u32,
    status: RoundStatus,
    actions: Vec<CombatAction>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    resolution_data: Option<ResolutionData>,
}

impl CombatRound {
    pub fn new(
        event_id: EventId,
        location_id: LocationId,
        round_number: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RoundId::new(),
            event_id,
            location_id,
            round_number,
            status: RoundStatus::Active,
            actions: Vec::new(),
            created_at: now,
            resolved_at: None,
            cancelled_at: None,
            resolution_data: None,
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn actions(&self) -> &[CombatAction] {
        &self.actions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn resolution_data(&self) -> Option<&ResolutionData> {
        self.resolution_data.as_ref()
    }

    fn ensure_active(&self, operation: &str) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "cannot {} round {}: round is {}",
                operation,
                self.id,
                self.status.as_str()
            )))
        }
    }

    /// Append an action. Scoring waits for resolution.
    pub fn submit_action(&mut self, action: CombatAction) -> Result<(), DomainError> {
        self.ensure_active("submit an action to")?;
        self.actions.push(action);
        Ok(())
    }

    /// Apply scores to every action, pair clashes, and close the round.
    ///
    /// `scores` must hold an entry for every action; otherwise nothing changes.
    pub fn resolve(
        &mut self,
        mut scores: HashMap<ActionId, ActionScore>,
        now: DateTime<Utc>,
    ) -> Result<RoundResolved, DomainError> {
        self.ensure_active("resolve")?;
        if let Some(missing) = self.actions.iter().find(|a| !scores.contains_key(&a.id)) {
            return Err(DomainError::validation(format!(
                "no score supplied for action {}",
                missing.id
            )));
        }

        for action in &mut self.actions {
            if let Some(score) = scores.remove(&action.id) {
                action.final_output = Some(score.rolled.output);
                action.roll_quality = Some(score.rolled.quality);
                action.score = Some(score);
            }
        }

        let engagements: Vec<Engagement> =
            self.actions.iter().map(CombatAction::engagement).collect();
        let (pairs, independent) = pair_clashes(&engagements);

        let clashes: Vec<ClashRecord> = pairs
            .iter()
            .map(|&(i, j)| {
                let first = &self.actions[i];
                let second = &self.actions[j];
                ClashRecord {
                    first: first.id,
                    second: second.id,
                    outcome: resolve_clash(
                        ClashSide {
                            action_id: first.id,
                            output: first.final_output.unwrap_or(0),
                        },
                        ClashSide {
                            action_id: second.id,
                            output: second.final_output.unwrap_or(0),
                        },
                    ),
                }
            })
            .collect();

        let resolution = ResolutionData {
            total_actions: self.actions.len() as u32,
            clash_count: clashes.len() as u32,
            independent_count: independent.len() as u32,
            clashes,
        };

        self.status = RoundStatus::Resolved;
        self.resolved_at = Some(now);
        self.resolution_data = Some(resolution.clone());

        Ok(RoundResolved {
            round_id: self.id,
            resolution,
        })
    }

    /// Counter increments owed by a resolved round, one per action.
    ///
    /// Active and cancelled rounds owe nothing.
    pub fn skill_uses(&self) -> Vec<SkillUse> {
        if self.status != RoundStatus::Resolved {
            return Vec::new();
        }
        self.actions
            .iter()
            .map(|action| SkillUse {
                character_id: action.character.id,
                skill_id: action.skill.id,
                branch: action.skill.branch.clone(),
            })
            .collect()
    }

    /// Abandon the round. Submitted actions are never scored.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<RoundCancelled, DomainError> {
        self.ensure_active("cancel")?;
        self.status = RoundStatus::Cancelled;
        self.cancelled_at = Some(now);
        Ok(RoundCancelled {
            round_id: self.id,
            discarded_actions: self.actions.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SkillBranch, SkillTarget};
    use crate::value_objects::{StatBlock, StatKey};
    use crate::CharacterId;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("timestamp")
    }

    fn key(raw: &str) -> StatKey {
        StatKey::new(raw).expect("valid key")
    }

    fn strike() -> Skill {
        Skill::new(
            "Strike",
            10,
            SkillTarget::Other,
            SkillBranch::new("blade").expect("branch"),
        )
        .with_scaling_stat(key("FOR"))
        .and_then(|s| s.with_scaling_stat(key("RES")))
        .expect("skill")
    }

    fn fighter(name: &str, force: i32) -> CharacterSnapshot {
        CharacterSnapshot {
            id: CharacterId::new(),
            name: name.to_string(),
            stats: [(key("FOR"), force), (key("RES"), 10)]
                .into_iter()
                .collect::<StatBlock>(),
        }
    }

    fn target_of(snapshot: &CharacterSnapshot) -> TargetSnapshot {
        TargetSnapshot {
            id: snapshot.id,
            name: snapshot.name.clone(),
        }
    }

    fn round() -> CombatRound {
        CombatRound::new(EventId::new(), LocationId::new(), 1, now())
    }

    fn score_all(round: &CombatRound, roll: i32) -> HashMap<ActionId, ActionScore> {
        round
            .actions()
            .iter()
            .map(|a| {
                let score = a
                    .score_with(UsageCounts::default(), |_, _| roll)
                    .expect("score");
                (a.id(), score)
            })
            .collect()
    }

    #[test]
    fn new_round_is_active_and_empty() {
        let round = round();
        assert_eq!(round.status(), RoundStatus::Active);
        assert!(round.actions().is_empty());
        assert!(round.resolution_data().is_none());
    }

    #[test]
    fn score_follows_the_pipeline() {
        let actor = fighter("Ada", 20);
        let action = CombatAction::new(actor, strike(), None, now());
        let usage = UsageCounts {
            skill_uses: 25,
            branch_uses: 80,
        };

        let score = action.score_with(usage, |_, _| 10).expect("score");
        assert_eq!(score.base_impact, 27);
        assert_eq!(score.tiers.standard, 63);
        assert_eq!(score.rolled.quality, RollQuality::Standard);
        assert_eq!(score.rolled.output, 63);

        let critical = action.score_with(usage, |_, _| 19).expect("score");
        assert_eq!(critical.rolled.output, 88);
        let poor = action.score_with(usage, |_, _| 2).expect("score");
        assert_eq!(poor.rolled.output, 38);
    }

    #[test]
    fn resolving_mutual_targets_counts_one_clash() {
        let mut round = round();
        let a = fighter("Ada", 20);
        let b = fighter("Bo", 12);
        round
            .submit_action(CombatAction::new(a.clone(), strike(), Some(target_of(&b)), now()))
            .expect("submit a");
        round
            .submit_action(CombatAction::new(b.clone(), strike(), Some(target_of(&a)), now()))
            .expect("submit b");

        let scores = score_all(&round, 10);
        let resolved = round.resolve(scores, now()).expect("resolve");

        assert_eq!(resolved.resolution.total_actions, 2);
        assert_eq!(resolved.resolution.clash_count, 1);
        assert_eq!(resolved.resolution.independent_count, 0);
        assert_eq!(round.status(), RoundStatus::Resolved);
        assert_eq!(round.resolved_at(), Some(now()));

        // Ada: 10 + 14 + 3 = 27 -> 54; Bo: 10 + 8 + 3 = 21 -> 42
        let clash = &resolved.resolution.clashes[0];
        assert_eq!(clash.outcome.winner(), Some(round.actions()[0].id()));
        assert_eq!(clash.outcome.damage(), 12);
        assert!(round.actions().iter().all(|a| a.final_output().is_some()));
    }

    #[test]
    fn resolving_without_actions_yields_zero_counts() {
        let mut round = round();
        let resolved = round.resolve(HashMap::new(), now()).expect("resolve");
        assert_eq!(resolved.resolution, ResolutionData::default());
        assert_eq!(round.status(), RoundStatus::Resolved);
    }

    #[test]
    fn missing_score_leaves_round_untouched() {
        let mut round = round();
        round
            .submit_action(CombatAction::new(fighter("Ada", 20), strike(), None, now()))
            .expect("submit");
        let before = round.clone();

        let err = round.resolve(HashMap::new(), now()).expect_err("must fail");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(round, before);
    }

    #[test]
    fn terminal_states_reject_everything() {
        let mut resolved = round();
        resolved.resolve(HashMap::new(), now()).expect("resolve");
        assert!(resolved.resolve(HashMap::new(), now()).is_err());
        assert!(resolved.cancel(now()).is_err());
        assert!(resolved
            .submit_action(CombatAction::new(fighter("Late", 1), strike(), None, now()))
            .is_err());

        let mut cancelled = round();
        cancelled.cancel(now()).expect("cancel");
        assert!(cancelled.cancel(now()).is_err());
        assert!(cancelled.resolve(HashMap::new(), now()).is_err());
        let err = cancelled
            .submit_action(CombatAction::new(fighter("Late", 1), strike(), None, now()))
            .expect_err("submit after cancel");
        assert!(err.is_state_error());
    }

    #[test]
    fn cancel_discards_actions_without_scoring() {
        let mut round = round();
        round
            .submit_action(CombatAction::new(fighter("Ada", 20), strike(), None, now()))
            .expect("submit");

        let cancelled = round.cancel(now()).expect("cancel");
        assert_eq!(cancelled.discarded_actions, 1);
        assert_eq!(round.status(), RoundStatus::Cancelled);
        assert!(round.actions().iter().all(|a| a.final_output().is_none()));
        assert!(round.resolution_data().is_none());
    }

    #[test]
    fn only_a_resolved_round_owes_skill_uses() {
        let ada = fighter("Ada", 20);
        let mut active = round();
        active
            .submit_action(CombatAction::new(ada.clone(), strike(), None, now()))
            .expect("submit");
        active
            .submit_action(CombatAction::new(ada.clone(), strike(), None, now()))
            .expect("submit again");
        assert!(active.skill_uses().is_empty());

        let mut cancelled = active.clone();
        cancelled.cancel(now()).expect("cancel");
        assert!(cancelled.skill_uses().is_empty());

        let scores = score_all(&active, 10);
        active.resolve(scores, now()).expect("resolve");
        let uses = active.skill_uses();
        assert_eq!(uses.len(), 2);
        assert!(uses
            .iter()
            .all(|u| u.character_id == ada.id && u.branch.as_str() == "blade"));
    }

    #[test]
    fn serde_round_trip_preserves_state() {
        let mut round = round();
        round
            .submit_action(CombatAction::new(fighter("Ada", 20), strike(), None, now()))
            .expect("submit");
        let json = serde_json::to_string(&round).expect("serialize");
        let restored: CombatRound = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, round);
    }
}
