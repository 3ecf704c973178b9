use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use schoolhub_application::{AuthenticatedPrincipal, ProfileUpdate};

use crate::dto::{
    ApiJson, CurrentUserResponse, MessageResponse, UpdateProfileRequest, WhoamiResponse,
};
use crate::error::ApiResult;
use crate::middleware::request_context;
use crate::state::AppState;

/// GET /api/auth/me - Current account as stored, not as the token claims.
pub async fn whoami_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> ApiResult<Json<WhoamiResponse>> {
    let user = state
        .credential_service
        .current_user(principal.subject())
        .await?;

    Ok(Json(WhoamiResponse {
        status: "success",
        user: CurrentUserResponse::from(user),
    }))
}

/// PUT /api/profile - Partial update of the caller's own profile.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .credential_service
        .update_profile(
            principal.subject(),
            ProfileUpdate {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                password: payload.password,
            },
            &request_context(&headers),
        )
        .await?;

    Ok(Json(MessageResponse::success("profile updated")))
}
