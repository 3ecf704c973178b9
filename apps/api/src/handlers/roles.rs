use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use schoolhub_application::{AuthenticatedPrincipal, RoleAction};
use schoolhub_domain::UserId;

use crate::dto::{ApiJson, RoleChangeRequest, RoleChangeResponse};
use crate::error::ApiResult;
use crate::middleware::request_context;
use crate::state::AppState;

/// POST /api/roles - Grant or revoke one role on a principal.
pub async fn change_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPrincipal>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<RoleChangeRequest>,
) -> ApiResult<Json<RoleChangeResponse>> {
    let principal_id = UserId::from_str(payload.user_id.trim())?;
    let action = RoleAction::from_str(payload.action.trim())?;

    let roles = state
        .role_assignment_service
        .apply(
            &actor,
            principal_id,
            payload.role_name.trim(),
            action,
            &request_context(&headers),
        )
        .await?;

    Ok(Json(RoleChangeResponse {
        status: "success",
        roles: roles
            .role_names()
            .iter()
            .map(|role| role.as_str().to_owned())
            .collect(),
    }))
}
