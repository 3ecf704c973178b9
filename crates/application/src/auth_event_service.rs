//! Audit trail for authentication and account lifecycle events.

use std::sync::Arc;

use async_trait::async_trait;

use schoolhub_core::AppResult;
use schoolhub_domain::UserId;

/// Caller metadata captured at the HTTP boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Caller IP address if available.
    pub ip_address: Option<String>,
    /// Caller user-agent if available.
    pub user_agent: Option<String>,
}

/// Kind of audited event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    /// Password login attempt.
    Login,
    /// Self-registration.
    Signup,
    /// Own profile modification.
    ProfileUpdate,
    /// Role grant or revocation by an administrator.
    RoleChange,
}

impl AuthEventKind {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::ProfileUpdate => "profile_update",
            Self::RoleChange => "role_change",
        }
    }
}

/// Authentication event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Principal the event concerns, when known.
    pub subject: Option<UserId>,
    /// Event kind.
    pub kind: AuthEventKind,
    /// Outcome label, e.g. `success` or `invalid_password`.
    pub outcome: &'static str,
    /// Caller metadata.
    pub context: RequestContext,
}

/// Repository port for auth event persistence.
#[async_trait]
pub trait AuthEventRepository: Send + Sync {
    /// Appends an auth event entry.
    async fn append_event(&self, event: AuthEvent) -> AppResult<()>;
}

/// Application service for auth event recording.
#[derive(Clone)]
pub struct AuthEventService {
    repository: Arc<dyn AuthEventRepository>,
}

impl AuthEventService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthEventRepository>) -> Self {
        Self { repository }
    }

    /// Persists an auth event.
    pub async fn record(
        &self,
        kind: AuthEventKind,
        outcome: &'static str,
        subject: Option<UserId>,
        context: &RequestContext,
    ) -> AppResult<()> {
        self.repository
            .append_event(AuthEvent {
                subject,
                kind,
                outcome,
                context: context.clone(),
            })
            .await
    }
}
