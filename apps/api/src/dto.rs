use axum::extract::FromRequest;
use serde::Serialize;
use ts_rs::TS;

use crate::error::ApiError;

mod auth;
mod notifications;
mod profile;
mod roles;

pub use auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse, UserSummary};
pub use notifications::{NotificationListResponse, NotificationResponse};
pub use profile::{CurrentUserResponse, RoleSummary, UpdateProfileRequest, WhoamiResponse};
pub use roles::{RoleChangeRequest, RoleChangeResponse};

/// JSON body extractor whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic success payload carrying a human-readable message.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/message-response.ts"
)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}
