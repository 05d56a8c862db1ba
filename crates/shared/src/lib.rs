//! Skirmish Shared - wire types for the combat engine
//!
//! This crate contains every type that crosses the engine boundary:
//! - Request bodies for the HTTP API
//! - Response DTOs and envelopes
//! - Push messages sent over the location WebSocket
//!
//! # Design Principles
//!
//! 1. **No business logic** - pure data types and serialization
//! 2. **No domain IDs on the wire** - DTOs carry raw `uuid::Uuid`
//! 3. **camelCase JSON** everywhere

pub mod dto;
pub mod messages;
pub mod requests;
pub mod responses;

pub use dto::{
    ActionBreakdownDto, ActionDto, CharacterSnapshotDto, ClashDto, EventDto, EventSessionDto,
    EventStatsDto, ResolutionDataDto, RoundDto, SkillDto, SkillProgressDto, TargetSnapshotDto,
};
pub use messages::ServerMessage;
pub use requests::{
    CreateEventRequest, CreateRoundRequest, ResolvedRoundsQuery, SubmitActionRequest,
};
pub use responses::{
    CreateEventResponse, CreateRoundResponse, ErrorBody, ErrorCode, ResolveRoundResponse,
    SuccessResponse,
};
