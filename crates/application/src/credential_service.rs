//! Credential checks and access token issuance.
//!
//! Owns signup, password login, and self-service profile changes. Follows
//! OWASP guidelines for generic error messages and constant-time responses.

use std::sync::Arc;

use chrono::Utc;

use schoolhub_core::{AuthError, AuthResult, NonEmptyString};
use schoolhub_domain::{EmailAddress, RoleCodeRegistry, RoleName, UserId, validate_password};

use crate::{
    AccessTokenClaims, AuthEventKind, AuthEventService, PasswordHasher, RequestContext,
    TokenCodec, TokenSettings, UserRecord, UserRepository,
};

mod login;
mod profile;
mod signup;


// ---------------------------------------------------------------------------
// Request and outcome types
// ---------------------------------------------------------------------------

/// Parameters for password login.
#[derive(Debug, Clone)]
pub struct LoginParams {
    /// Email address as typed by the user.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Caller metadata for the audit trail.
    pub context: RequestContext,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated principal.
    pub user: UserRecord,
    /// Role names granted at issuance.
    pub roles: Vec<RoleName>,
    /// Signed access token.
    pub token: String,
}

/// Parameters for self-registration.
#[derive(Debug, Clone)]
pub struct SignupParams {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password (validated against OWASP rules).
    pub password: String,
    /// Caller metadata for the audit trail.
    pub context: RequestContext,
}

/// Partial self-service profile update.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service that authenticates principals and mints access tokens.
#[derive(Clone)]
pub struct CredentialService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_codec: Arc<dyn TokenCodec>,
    auth_event_service: AuthEventService,
    token_settings: TokenSettings,
}

impl CredentialService {
    /// Creates a new credential service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn TokenCodec>,
        auth_event_service: AuthEventService,
        token_settings: TokenSettings,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_codec,
            auth_event_service,
            token_settings,
        }
    }

    /// Returns the current profile of an enabled principal.
    ///
    /// Reads the store, so the roles reflect current grants rather than the
    /// caller's token snapshot.
    pub async fn current_user(&self, user_id: UserId) -> AuthResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .filter(|user| user.account_enabled)
            .ok_or_else(|| AuthError::NotFound("user not found".to_owned()))
    }

    fn issue_token(&self, user: &UserRecord) -> AuthResult<String> {
        let role_names: Vec<&str> = user
            .roles
            .role_names()
            .iter()
            .map(RoleName::as_str)
            .collect();
        let claims = AccessTokenClaims::new(
            user.id.to_string(),
            RoleCodeRegistry::codes_for_names(&role_names),
            Utc::now(),
            self.token_settings.ttl(),
        );

        Ok(self.token_codec.encode(&claims)?)
    }

    async fn record(
        &self,
        kind: AuthEventKind,
        outcome: &'static str,
        subject: Option<UserId>,
        context: &RequestContext,
    ) -> AuthResult<()> {
        Ok(self
            .auth_event_service
            .record(kind, outcome, subject, context)
            .await?)
    }
}

fn required_name(field: &str, value: String) -> AuthResult<String> {
    Ok(NonEmptyString::for_field(field, value)?.into())
}

fn validated_email(value: &str) -> AuthResult<EmailAddress> {
    Ok(EmailAddress::new(value)?)
}

fn validated_password(value: &str) -> AuthResult<()> {
    Ok(validate_password(value)?)
}
