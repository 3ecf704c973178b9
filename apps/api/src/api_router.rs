use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use schoolhub_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;


pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let role_admin_routes = Router::new()
        .route("/api/roles", post(handlers::roles::change_role_handler))
        .route_layer(from_fn(middleware::require_role_admin_surface));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::profile::whoami_handler))
        .route(
            "/api/profile",
            put(handlers::profile::update_profile_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            post(handlers::notifications::mark_notification_read_handler),
        )
        .merge(role_admin_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route("/api/auth/signup", post(handlers::auth::signup_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
