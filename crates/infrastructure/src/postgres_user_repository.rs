//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use schoolhub_application::{PendingAccount, ProfileChanges, UserRecord, UserRepository};
use schoolhub_core::{AppError, AppResult};
use schoolhub_domain::{RoleCodeRegistry, RoleState, RoleTransition, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    account_enabled: bool,
    role_codes: Vec<i32>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            account_enabled: row.account_enabled,
            roles: RoleState::from_granted(RoleCodeRegistry::names_for_codes(&row.role_codes)),
        }
    }
}

/// Projection shared by every user lookup. Callers append a `WHERE` clause.
const USER_SELECT: &str = r#"
    SELECT u.id, u.first_name, u.last_name, u.email, u.password_hash, u.account_enabled,
           COALESCE(
               (SELECT array_agg(ur.role_code ORDER BY ur.role_code)
                FROM user_roles ur
                WHERE ur.user_id = u.id),
               '{}'
           ) AS role_codes
    FROM users u
"#;

mod account;
mod lookup;
mod roles;


#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create_pending_account(&self, account: PendingAccount) -> AppResult<UserId> {
        self.create_pending_account_impl(account).await
    }

    async fn transition_roles(
        &self,
        user_id: UserId,
        transition: RoleTransition,
    ) -> AppResult<RoleState> {
        self.transition_roles_impl(user_id, transition).await
    }

    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> AppResult<()> {
        self.update_profile_impl(user_id, changes).await
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
