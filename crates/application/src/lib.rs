//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_event_service;
mod credential_service;
mod notification_service;
mod role_assignment_service;
mod token_authorizer;
mod token_ports;
mod user_ports;

#[cfg(test)]
mod test_support;

pub use auth_event_service::{
    AuthEvent, AuthEventKind, AuthEventRepository, AuthEventService, RequestContext,
};
pub use credential_service::{
    CredentialService, LoginOutcome, LoginParams, ProfileUpdate, SignupParams,
};
pub use notification_service::{
    NOTIFICATION_PAGE_LIMIT, NotificationRepository, NotificationService,
};
pub use role_assignment_service::{RoleAction, RoleAssignmentService};
pub use token_authorizer::{AuthenticatedPrincipal, TokenAuthorizer};
pub use token_ports::{AccessTokenClaims, DEFAULT_TOKEN_TTL_HOURS, TokenCodec, TokenSettings};
pub use user_ports::{PasswordHasher, PendingAccount, ProfileChanges, UserRecord, UserRepository};
