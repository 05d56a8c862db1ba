//! HTTP request bodies and query strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundRequest {
    pub location_id: Uuid,
    pub event_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionRequest {
    pub character_id: Uuid,
    pub skill_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    /// `lore`, `duel` or `quest`
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_id: Uuid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoundsQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_action_target_is_optional() {
        let json = serde_json::json!({
            "characterId": Uuid::nil(),
            "skillId": Uuid::nil(),
        });
        let request: SubmitActionRequest = serde_json::from_value(json).expect("deserialize");
        assert_eq!(request.target_id, None);
    }

    #[test]
    fn create_event_reads_type_field() {
        let json = serde_json::json!({
            "title": "Bridge Duel",
            "type": "duel",
            "locationId": Uuid::nil(),
        });
        let request: CreateEventRequest = serde_json::from_value(json).expect("deserialize");
        assert_eq!(request.event_type, "duel");
        assert_eq!(request.description, None);
    }
}
