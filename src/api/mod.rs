//! Platform API
//!
//! Client side of the team/jury platform REST API.
//!
//! - **client**: typed endpoint calls
//! - **transport**: the [`Transport`] seam and its reqwest implementation
//! - **dto**: request/response bodies
//! - **error**: [`ApiError`]

pub mod client;
pub mod dto;
pub mod error;
pub mod transport;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use dto::{
    ArtifactReview, Credentials, LoginResponse, NewTeam, NewUser, RoleChange, TeamArtifacts,
    TeamInvite, SCORE_RANGE,
};
pub use error::{ApiError, ApiResult};
pub use transport::{ApiRequest, HttpTransport, Transport};
