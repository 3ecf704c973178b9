use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use schoolhub_application::{AuthenticatedPrincipal, RequestContext};
use schoolhub_core::AuthError;
use schoolhub_domain::RoleName;

use crate::error::ApiResult;
use crate::state::AppState;

/// Verifies the bearer token and exposes the principal to handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = extract_bearer(request.headers())?;
    let principal = state.token_authorizer.authorize(token)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Rejects principals that hold neither `admin` nor `maintainer`.
pub async fn require_role_admin_surface(request: Request, next: Next) -> ApiResult<Response> {
    let principal = request
        .extensions()
        .get::<AuthenticatedPrincipal>()
        .ok_or(AuthError::Unauthenticated)?;
    principal.require_any_role(&[RoleName::Admin, RoleName::Maintainer])?;

    Ok(next.run(request).await)
}

/// Captures caller metadata for the audit trail.
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let header_value = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    RequestContext {
        ip_address: header_value("x-forwarded-for").and_then(|forwarded| {
            forwarded
                .split(',')
                .next()
                .map(|first| first.trim().to_owned())
        }),
        user_agent: header_value(header::USER_AGENT.as_str()),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?
        .to_str()
        .map_err(|_| AuthError::Unauthenticated)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(token)
}
