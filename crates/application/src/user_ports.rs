//! Persistence and cryptography ports for principals.

use async_trait::async_trait;

use schoolhub_core::AppResult;
use schoolhub_domain::{AdminNotice, RoleState, RoleTransition, UserId};

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Canonical lowercase email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Account-level switch. Disabled accounts cannot authenticate and are
    /// independent of the `inactive` role.
    pub account_enabled: bool,
    /// Current role grants.
    pub roles: RoleState,
}

/// Input for the atomic signup bundle.
#[derive(Debug, Clone)]
pub struct PendingAccount {
    /// Validated given name.
    pub first_name: String,
    /// Validated family name.
    pub last_name: String,
    /// Validated canonical email.
    pub email: String,
    /// Hash of the chosen password.
    pub password_hash: String,
    /// Notice delivered to every current administrator.
    pub admin_notice: AdminNotice,
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New canonical email.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    /// Returns `true` when no field is being changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

/// Repository port for principal persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates the user, grants `inactive`, and notifies every `admin` holder
    /// as one all-or-nothing unit. Unique email violations surface as
    /// `AppError::Conflict`.
    async fn create_pending_account(&self, account: PendingAccount) -> AppResult<UserId>;

    /// Applies a role transition under the store's row lock and returns the
    /// resulting state. Missing users surface as `AppError::NotFound`.
    async fn transition_roles(
        &self,
        user_id: UserId,
        transition: RoleTransition,
    ) -> AppResult<RoleState>;

    /// Applies a partial profile update to an enabled account; a missing or
    /// disabled account is `NotFound`.
    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    /// Must run in constant time regardless of validity.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
