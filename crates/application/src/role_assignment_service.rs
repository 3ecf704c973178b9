//! Role grant and revocation use-cases.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use schoolhub_core::{AuthError, AuthResult};
use schoolhub_domain::{RoleName, RoleState, RoleTransition, UserId};

use crate::{
    AuthEventKind, AuthEventService, AuthenticatedPrincipal, RequestContext, UserRepository,
};

/// Direction of a role change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    /// Grant the role.
    Assign,
    /// Revoke the role.
    Remove,
}

impl FromStr for RoleAction {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assign" => Ok(Self::Assign),
            "remove" => Ok(Self::Remove),
            _ => Err(AuthError::Validation(format!(
                "action must be 'assign' or 'remove', got '{value}'"
            ))),
        }
    }
}

/// Application service mutating a principal's role grants.
///
/// Admins may change any role. Maintainers may only grant or revoke `admin`.
#[derive(Clone)]
pub struct RoleAssignmentService {
    user_repository: Arc<dyn UserRepository>,
    auth_event_service: AuthEventService,
}

impl RoleAssignmentService {
    /// Creates a new role assignment service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            user_repository,
            auth_event_service,
        }
    }

    /// Grants `role_name` to `principal_id`. Idempotent.
    pub async fn assign(
        &self,
        actor: &AuthenticatedPrincipal,
        principal_id: UserId,
        role_name: &str,
        context: &RequestContext,
    ) -> AuthResult<RoleState> {
        self.apply(actor, principal_id, role_name, RoleAction::Assign, context)
            .await
    }

    /// Revokes `role_name` from `principal_id`. Idempotent.
    pub async fn remove(
        &self,
        actor: &AuthenticatedPrincipal,
        principal_id: UserId,
        role_name: &str,
        context: &RequestContext,
    ) -> AuthResult<RoleState> {
        self.apply(actor, principal_id, role_name, RoleAction::Remove, context)
            .await
    }

    /// Applies a role change and returns the principal's resulting grants.
    pub async fn apply(
        &self,
        actor: &AuthenticatedPrincipal,
        principal_id: UserId,
        role_name: &str,
        action: RoleAction,
        context: &RequestContext,
    ) -> AuthResult<RoleState> {
        let role = RoleName::from_str(role_name)
            .map_err(|_| AuthError::UnknownRole(role_name.to_owned()))?;
        require_privilege(actor, role)?;

        let transition = match action {
            RoleAction::Assign => RoleTransition::Assign(role),
            RoleAction::Remove => RoleTransition::Remove(role),
        };
        let state = self
            .user_repository
            .transition_roles(principal_id, transition)
            .await?;

        self.auth_event_service
            .record(
                AuthEventKind::RoleChange,
                match action {
                    RoleAction::Assign => "assigned",
                    RoleAction::Remove => "removed",
                },
                Some(principal_id),
                context,
            )
            .await?;
        info!(
            actor = %actor.subject(),
            %principal_id,
            role = role.as_str(),
            roles = ?state.role_names(),
            "role grants changed"
        );

        Ok(state)
    }
}

fn require_privilege(actor: &AuthenticatedPrincipal, role: RoleName) -> AuthResult<()> {
    if actor.has_any_role(&[RoleName::Admin]) {
        return Ok(());
    }

    if role == RoleName::Admin && actor.has_any_role(&[RoleName::Maintainer]) {
        return Ok(());
    }

    Err(AuthError::Unauthorized)
}
