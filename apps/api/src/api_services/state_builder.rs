use std::sync::Arc;

use chrono::Duration;
use schoolhub_application::{
    AuthEventRepository, AuthEventService, CredentialService, NotificationRepository,
    NotificationService, PasswordHasher, RoleAssignmentService, TokenAuthorizer, TokenCodec,
    TokenSettings, UserRepository,
};
use schoolhub_core::AppError;
use schoolhub_infrastructure::{
    Argon2PasswordHasher, JwtTokenCodec, PostgresAuthEventRepository,
    PostgresNotificationRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct Ports {
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
    auth_events: Arc<dyn AuthEventRepository>,
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let ttl = Duration::try_hours(config.token_ttl_hours).ok_or_else(|| {
        AppError::Validation(format!(
            "TOKEN_TTL_HOURS is out of range: {}",
            config.token_ttl_hours
        ))
    })?;

    Ok(assemble(
        Ports {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
            auth_events: Arc::new(PostgresAuthEventRepository::new(pool)),
        },
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenCodec::new(&config.jwt_secret)),
        TokenSettings::new(ttl),
    ))
}

/// Wires every port to one in-memory store.
#[cfg(test)]
pub fn build_in_memory_state(
    store: Arc<schoolhub_infrastructure::InMemoryUserRepository>,
    jwt_secret: &str,
) -> AppState {
    assemble(
        Ports {
            users: store.clone(),
            notifications: store.clone(),
            auth_events: store,
        },
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenCodec::new(jwt_secret)),
        TokenSettings::default(),
    )
}

fn assemble(
    ports: Ports,
    password_hasher: Arc<dyn PasswordHasher>,
    token_codec: Arc<dyn TokenCodec>,
    token_settings: TokenSettings,
) -> AppState {
    let auth_event_service = AuthEventService::new(ports.auth_events);

    AppState {
        credential_service: CredentialService::new(
            ports.users.clone(),
            password_hasher,
            token_codec.clone(),
            auth_event_service.clone(),
            token_settings,
        ),
        token_authorizer: TokenAuthorizer::new(token_codec),
        role_assignment_service: RoleAssignmentService::new(ports.users, auth_event_service),
        notification_service: NotificationService::new(ports.notifications),
    }
}
