//! Response envelopes and the error vocabulary shared by every endpoint.

use serde::{Deserialize, Serialize};

use crate::dto::{EventDto, ResolutionDataDto, RoundDto};

// =============================================================================
// Success Envelopes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoundResponse {
    pub success: bool,
    pub round: RoundDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRoundResponse {
    pub success: bool,
    pub resolution_data: ResolutionDataDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub success: bool,
    pub event: EventDto,
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // === Client Errors (4xx) ===
    /// Request was malformed
    BadRequest,
    /// Requested resource not found
    NotFound,
    /// Request data failed validation
    ValidationError,
    /// Operation is not allowed in the current state
    PreconditionFailed,

    // === Server Errors (5xx) ===
    /// A collaborator (store, catalog) failed
    DependencyFailed,
    /// Internal server error
    InternalError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_uses_snake_case_codes() {
        let body = ErrorBody::new(ErrorCode::PreconditionFailed, "no active event");
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["code"], "precondition_failed");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn unknown_codes_degrade_gracefully() {
        let code: ErrorCode = serde_json::from_str("\"teapot\"").expect("deserialize");
        assert_eq!(code, ErrorCode::Unknown);
    }
}
