//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_user_repository;
mod jwt_token_codec;
mod postgres_auth_event_repository;
mod postgres_notification_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use jwt_token_codec::JwtTokenCodec;
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
