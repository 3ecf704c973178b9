use schoolhub_application::{
    CredentialService, NotificationService, RoleAssignmentService, TokenAuthorizer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub credential_service: CredentialService,
    pub token_authorizer: TokenAuthorizer,
    pub role_assignment_service: RoleAssignmentService,
    pub notification_service: NotificationService,
}
