//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use skirmish_domain::{CharacterId, EventId, LocationId, RoundId, SkillId};
use skirmish_shared::{
    ActionDto, CreateEventRequest, CreateEventResponse, CreateRoundRequest, CreateRoundResponse,
    ErrorBody, ErrorCode, EventDto, ResolveRoundResponse, ResolvedRoundsQuery, RoundDto,
    SkillProgressDto, SubmitActionRequest, SuccessResponse,
};

use crate::app::App;
use crate::use_cases::event::CreateEventInput;
use crate::use_cases::{CombatError, EventError, ProgressionError, SkillProgress};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Rounds
        .route(
            "/api/locations/{location_id}/rounds/active",
            get(get_active_round),
        )
        .route(
            "/api/locations/{location_id}/rounds/resolved",
            get(list_resolved_rounds),
        )
        .route("/api/rounds", post(create_round))
        .route("/api/rounds/{round_id}/actions", post(submit_action))
        .route("/api/rounds/{round_id}/resolve", post(resolve_round))
        .route("/api/rounds/{round_id}/cancel", post(cancel_round))
        // Events
        .route(
            "/api/locations/{location_id}/events/active",
            get(get_active_event),
        )
        .route("/api/events", post(create_event))
        .route("/api/events/{event_id}/close", post(close_event))
        .route("/api/events/{event_id}/freeze", post(freeze_event))
        .route("/api/events/{event_id}/unfreeze", post(unfreeze_event))
        // Progression
        .route(
            "/api/characters/{character_id}/skills/{skill_id}/progress",
            get(get_skill_progress),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Rounds
// =============================================================================

async fn get_active_round(
    State(app): State<Arc<App>>,
    Path(location_id): Path<Uuid>,
) -> Result<Json<Option<RoundDto>>, ApiError> {
    let round = app
        .use_cases
        .combat
        .queries
        .active(LocationId::from_uuid(location_id))
        .await?;
    Ok(Json(round.as_ref().map(RoundDto::from)))
}

async fn list_resolved_rounds(
    State(app): State<Arc<App>>,
    Path(location_id): Path<Uuid>,
    Query(query): Query<ResolvedRoundsQuery>,
) -> Result<Json<Vec<RoundDto>>, ApiError> {
    let rounds = app
        .use_cases
        .combat
        .queries
        .resolved(LocationId::from_uuid(location_id), query.limit)
        .await?;
    Ok(Json(rounds.iter().map(RoundDto::from).collect()))
}

async fn create_round(
    State(app): State<Arc<App>>,
    payload: Result<Json<CreateRoundRequest>, JsonRejection>,
) -> Result<Json<CreateRoundResponse>, ApiError> {
    let Json(request) = payload?;
    let round = app
        .use_cases
        .combat
        .create_round
        .execute(
            LocationId::from_uuid(request.location_id),
            EventId::from_uuid(request.event_id),
        )
        .await?;
    Ok(Json(CreateRoundResponse {
        success: true,
        round: RoundDto::from(&round),
    }))
}

async fn submit_action(
    State(app): State<Arc<App>>,
    Path(round_id): Path<Uuid>,
    payload: Result<Json<SubmitActionRequest>, JsonRejection>,
) -> Result<Json<ActionDto>, ApiError> {
    let Json(request) = payload?;
    let action = app
        .use_cases
        .combat
        .submit_action
        .execute(
            RoundId::from_uuid(round_id),
            CharacterId::from_uuid(request.character_id),
            SkillId::from_uuid(request.skill_id),
            request.target_id.map(CharacterId::from_uuid),
        )
        .await?;
    Ok(Json(ActionDto::from(&action)))
}

async fn resolve_round(
    State(app): State<Arc<App>>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<ResolveRoundResponse>, ApiError> {
    let resolution = app
        .use_cases
        .combat
        .resolve_round
        .execute(RoundId::from_uuid(round_id))
        .await?;
    Ok(Json(ResolveRoundResponse {
        success: true,
        resolution_data: (&resolution).into(),
    }))
}

async fn cancel_round(
    State(app): State<Arc<App>>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    app.use_cases
        .combat
        .cancel_round
        .execute(RoundId::from_uuid(round_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

// =============================================================================
// Events
// =============================================================================

async fn get_active_event(
    State(app): State<Arc<App>>,
    Path(location_id): Path<Uuid>,
) -> Result<Json<Option<EventDto>>, ApiError> {
    let event = app
        .use_cases
        .event
        .get_active
        .execute(LocationId::from_uuid(location_id))
        .await?;
    Ok(Json(event.as_ref().map(EventDto::from)))
}

async fn create_event(
    State(app): State<Arc<App>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<CreateEventResponse>, ApiError> {
    let Json(request) = payload?;
    let event = app
        .use_cases
        .event
        .create
        .execute(CreateEventInput {
            title: request.title,
            event_type: request.event_type,
            description: request.description,
            location_id: LocationId::from_uuid(request.location_id),
        })
        .await?;
    Ok(Json(CreateEventResponse {
        success: true,
        event: EventDto::from(&event),
    }))
}

async fn close_event(
    State(app): State<Arc<App>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    app.use_cases
        .event
        .close
        .execute(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn freeze_event(
    State(app): State<Arc<App>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    app.use_cases
        .event
        .freeze
        .execute(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn unfreeze_event(
    State(app): State<Arc<App>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    app.use_cases
        .event
        .unfreeze
        .execute(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

// =============================================================================
// Progression
// =============================================================================

async fn get_skill_progress(
    State(app): State<Arc<App>>,
    Path((character_id, skill_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SkillProgressDto>, ApiError> {
    let progress = app
        .use_cases
        .progress
        .execute(
            CharacterId::from_uuid(character_id),
            SkillId::from_uuid(skill_id),
        )
        .await?;
    Ok(Json(progress_dto(&progress)))
}

fn progress_dto(progress: &SkillProgress) -> SkillProgressDto {
    SkillProgressDto {
        character_id: progress.character_id.to_uuid(),
        skill_id: progress.skill_id.to_uuid(),
        branch: progress.branch.as_str().to_string(),
        skill_uses: progress.usage.skill_uses,
        branch_uses: progress.usage.branch_uses,
        skill_tier: progress.skill_tier.tier,
        branch_tier: progress.branch_tier.tier,
        skill_multiplier: progress.skill_tier.multiplier.as_f64(),
        branch_multiplier: progress.branch_tier.multiplier.as_f64(),
        uses_to_next_skill_tier: progress.uses_to_next_skill_tier(),
        uses_to_next_branch_tier: progress.uses_to_next_branch_tier(),
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Validation(String),
    NotFound(String),
    PreconditionFailed(String),
    Dependency(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            ApiError::PreconditionFailed(msg) => {
                (StatusCode::CONFLICT, ErrorCode::PreconditionFailed, msg)
            }
            ApiError::Dependency(msg) => {
                // Collaborator details stay in the log.
                tracing::error!(error = %msg, "Dependency failure");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::DependencyFailed,
                    "A dependency failed".to_string(),
                )
            }
        };
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<CombatError> for ApiError {
    fn from(e: CombatError) -> Self {
        match e {
            CombatError::Validation(msg) => ApiError::Validation(msg),
            CombatError::PreconditionFailed(msg) => ApiError::PreconditionFailed(msg),
            e @ CombatError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            CombatError::Dependency(msg) => ApiError::Dependency(msg),
        }
    }
}

impl From<EventError> for ApiError {
    fn from(e: EventError) -> Self {
        match e {
            EventError::Validation(msg) => ApiError::Validation(msg),
            EventError::PreconditionFailed(msg) => ApiError::PreconditionFailed(msg),
            e @ EventError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            EventError::Dependency(msg) => ApiError::Dependency(msg),
        }
    }
}

impl From<ProgressionError> for ApiError {
    fn from(e: ProgressionError) -> Self {
        match e {
            e @ ProgressionError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ProgressionError::Dependency(msg) => ApiError::Dependency(msg),
        }
    }
}
