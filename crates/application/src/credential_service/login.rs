use tracing::{info, warn};

use super::*;

impl CredentialService {
    /// Authenticates with email and password and issues an access token.
    ///
    /// Unknown email, disabled account and wrong password all return
    /// `AuthError::InvalidCredentials` to prevent enumeration.
    pub async fn login(&self, params: LoginParams) -> AuthResult<LoginOutcome> {
        let user = self
            .user_repository
            .find_by_email(params.email.trim())
            .await?
            .filter(|user| user.account_enabled);

        let Some(user) = user else {
            // OWASP: always hash to prevent timing attacks even when user not found.
            let _ = self.password_hasher.hash_password(&params.password);
            self.record(AuthEventKind::Login, "unknown_account", None, &params.context)
                .await?;
            return Err(AuthError::InvalidCredentials);
        };

        let password_valid = self
            .password_hasher
            .verify_password(&params.password, &user.password_hash)?;

        if !password_valid {
            warn!(user_id = %user.id, "login rejected");
            self.record(
                AuthEventKind::Login,
                "invalid_password",
                Some(user.id),
                &params.context,
            )
            .await?;
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        let roles = user.roles.role_names();

        self.record(AuthEventKind::Login, "success", Some(user.id), &params.context)
            .await?;
        info!(user_id = %user.id, roles = ?roles, "access token issued");

        Ok(LoginOutcome { user, roles, token })
    }
}
