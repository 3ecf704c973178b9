use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use schoolhub_application::{LoginParams, SignupParams};
use schoolhub_core::{AuthError, NonEmptyString};

use crate::dto::{ApiJson, LoginRequest, LoginResponse, SignupRequest, SignupResponse, UserSummary};
use crate::error::ApiResult;
use crate::middleware::request_context;
use crate::state::AppState;

/// POST /api/auth/login - Exchange email and password for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = NonEmptyString::for_field("email", payload.email)?;
    if payload.password.is_empty() {
        return Err(AuthError::Validation("password must not be empty".to_owned()).into());
    }

    let outcome = state
        .credential_service
        .login(LoginParams {
            email: email.into(),
            password: payload.password,
            context: request_context(&headers),
        })
        .await?;

    Ok(Json(LoginResponse {
        status: "success",
        user: UserSummary::from(&outcome.user),
        roles: outcome
            .roles
            .iter()
            .map(|role| role.as_str().to_owned())
            .collect(),
        token: outcome.token,
    }))
}

/// POST /api/auth/signup - Register an account awaiting activation.
pub async fn signup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let user_id = state
        .credential_service
        .signup(SignupParams {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            context: request_context(&headers),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            status: "success",
            message: "account created; an administrator must activate it".to_owned(),
            user_id: user_id.to_string(),
        }),
    ))
}
