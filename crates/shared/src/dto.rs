//! Response DTOs and their conversions from domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skirmish_domain::{
    ActionScore, CharacterSnapshot, ClashOutcome, ClashRecord, CombatAction, CombatRound, Event,
    ResolutionData, Skill, TargetSnapshot,
};

// =============================================================================
// Rounds
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub location_id: Uuid,
    pub round_number: u32,
    /// `active`, `resolved` or `cancelled`
    pub status: String,
    pub actions: Vec<ActionDto>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_data: Option<ResolutionDataDto>,
}

impl From<&CombatRound> for RoundDto {
    fn from(round: &CombatRound) -> Self {
        Self {
            id: round.id().to_uuid(),
            event_id: round.event_id().to_uuid(),
            location_id: round.location_id().to_uuid(),
            round_number: round.round_number(),
            status: round.status().as_str().to_string(),
            actions: round.actions().iter().map(ActionDto::from).collect(),
            created_at: round.created_at(),
            resolved_at: round.resolved_at(),
            cancelled_at: round.cancelled_at(),
            resolution_data: round.resolution_data().map(ResolutionDataDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    pub id: Uuid,
    pub character_data: CharacterSnapshotDto,
    pub skill_data: SkillDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_data: Option<TargetSnapshotDto>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ActionBreakdownDto>,
}

impl From<&CombatAction> for ActionDto {
    fn from(action: &CombatAction) -> Self {
        Self {
            id: action.id().to_uuid(),
            character_data: action.character().into(),
            skill_data: action.skill().into(),
            target_data: action.target().map(TargetSnapshotDto::from),
            submitted_at: action.submitted_at(),
            final_output: action.final_output(),
            roll_quality: action.roll_quality().map(|q| q.as_str().to_string()),
            breakdown: action.score().map(ActionBreakdownDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshotDto {
    pub id: Uuid,
    pub name: String,
    pub stats: BTreeMap<String, i32>,
}

impl From<&CharacterSnapshot> for CharacterSnapshotDto {
    fn from(snapshot: &CharacterSnapshot) -> Self {
        Self {
            id: snapshot.id.to_uuid(),
            name: snapshot.name.clone(),
            stats: snapshot
                .stats
                .iter()
                .map(|(key, value)| (key.as_str().to_string(), value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSnapshotDto {
    pub id: Uuid,
    pub name: String,
}

impl From<&TargetSnapshot> for TargetSnapshotDto {
    fn from(target: &TargetSnapshot) -> Self {
        Self {
            id: target.id.to_uuid(),
            name: target.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_power: i32,
    pub scaling_stats: Vec<String>,
    pub target: String,
    pub branch: String,
    #[serde(rename = "type", default)]
    pub skill_type: String,
    pub aether_cost: u32,
}

impl From<&Skill> for SkillDto {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id.to_uuid(),
            name: skill.name.clone(),
            description: skill.description.clone(),
            base_power: skill.base_power,
            scaling_stats: skill
                .scaling_stats
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            target: skill.target.as_str().to_string(),
            branch: skill.branch.as_str().to_string(),
            skill_type: skill.skill_type.clone(),
            aether_cost: skill.aether_cost,
        }
    }
}

/// How an action's output was reached, for damage logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBreakdownDto {
    pub base_impact: i64,
    pub skill_uses: u32,
    pub branch_uses: u32,
    pub skill_multiplier: f64,
    pub branch_multiplier: f64,
    pub roll: u8,
    pub poor: i64,
    pub standard: i64,
    pub critical: i64,
}

impl From<&ActionScore> for ActionBreakdownDto {
    fn from(score: &ActionScore) -> Self {
        Self {
            base_impact: score.base_impact,
            skill_uses: score.usage.skill_uses,
            branch_uses: score.usage.branch_uses,
            skill_multiplier: score.skill_multiplier.as_f64(),
            branch_multiplier: score.branch_multiplier.as_f64(),
            roll: score.rolled.roll,
            poor: score.tiers.poor,
            standard: score.tiers.standard,
            critical: score.tiers.critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDataDto {
    pub total_actions: u32,
    pub clash_count: u32,
    pub independent_count: u32,
    #[serde(default)]
    pub clashes: Vec<ClashDto>,
}

impl From<&ResolutionData> for ResolutionDataDto {
    fn from(data: &ResolutionData) -> Self {
        Self {
            total_actions: data.total_actions,
            clash_count: data.clash_count,
            independent_count: data.independent_count,
            clashes: data.clashes.iter().map(ClashDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashDto {
    pub first_action_id: Uuid,
    pub second_action_id: Uuid,
    /// `Victory` or `Tie`
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_action_id: Option<Uuid>,
    pub damage: i64,
}

impl From<&ClashRecord> for ClashDto {
    fn from(record: &ClashRecord) -> Self {
        let winner_action_id = match record.outcome {
            ClashOutcome::Victory { winner, .. } => Some(winner.to_uuid()),
            ClashOutcome::Tie => None,
        };
        Self {
            first_action_id: record.first.to_uuid(),
            second_action_id: record.second.to_uuid(),
            result: record.outcome.label().to_string(),
            winner_action_id,
            damage: record.outcome.damage(),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_id: Uuid,
    /// `active` or `closed`
    pub status: String,
    pub session: EventSessionDto,
    pub event_data: EventStatsDto,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSessionDto {
    /// `open` or `frozen`
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsDto {
    pub total_rounds: u32,
    pub resolved_rounds: u32,
    pub cancelled_rounds: u32,
    pub total_actions: u32,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        let stats = event.stats();
        Self {
            id: event.id().to_uuid(),
            title: event.title().to_string(),
            event_type: event.event_type().as_str().to_string(),
            description: event.description().map(str::to_string),
            location_id: event.location_id().to_uuid(),
            status: if event.is_active() { "active" } else { "closed" }.to_string(),
            session: EventSessionDto {
                status: if event.is_frozen() { "frozen" } else { "open" }.to_string(),
                frozen_at: event.session().frozen_at,
            },
            event_data: EventStatsDto {
                total_rounds: stats.total_rounds,
                resolved_rounds: stats.resolved_rounds,
                cancelled_rounds: stats.cancelled_rounds,
                total_actions: stats.total_actions,
            },
            created_at: event.created_at(),
            closed_at: event.closed_at(),
        }
    }
}

// =============================================================================
// Progression
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgressDto {
    pub character_id: Uuid,
    pub skill_id: Uuid,
    pub branch: String,
    pub skill_uses: u32,
    pub branch_uses: u32,
    pub skill_tier: u8,
    pub branch_tier: u8,
    pub skill_multiplier: f64,
    pub branch_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_to_next_skill_tier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_to_next_branch_tier: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_domain::{EventId, EventType, LocationId};

    #[test]
    fn event_dto_uses_wire_vocabulary() {
        let event = Event::new("Ambush", EventType::Quest, LocationId::new(), Utc::now())
            .expect("event");
        let json = serde_json::to_value(EventDto::from(&event)).expect("serialize");

        assert_eq!(json["type"], "quest");
        assert_eq!(json["status"], "active");
        assert_eq!(json["session"]["status"], "open");
        assert_eq!(json["eventData"]["totalRounds"], 0);
        assert!(json.get("closedAt").is_none());
    }

    #[test]
    fn active_round_omits_resolution() {
        let round = CombatRound::new(EventId::new(), LocationId::new(), 3, Utc::now());
        let json = serde_json::to_value(RoundDto::from(&round)).expect("serialize");

        assert_eq!(json["status"], "active");
        assert_eq!(json["roundNumber"], 3);
        assert!(json.get("resolutionData").is_none());
    }
}
