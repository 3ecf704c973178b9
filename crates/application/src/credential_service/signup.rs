use schoolhub_core::AppError;
use schoolhub_domain::AdminNotice;
use tracing::{info, warn};

use crate::PendingAccount;

use super::*;

impl CredentialService {
    /// Registers a new principal holding only the `inactive` role and notifies
    /// every administrator.
    ///
    /// The account row, its `inactive` grant and the admin notifications are
    /// written as one unit; on failure none of them persist.
    pub async fn signup(&self, params: SignupParams) -> AuthResult<UserId> {
        let first_name = required_name("first_name", params.first_name)?;
        let last_name = required_name("last_name", params.last_name)?;
        let email = validated_email(&params.email)?;
        validated_password(&params.password)?;

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            // Still hash the password to prevent timing side-channels.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let admin_notice = AdminNotice::pending_activation(&first_name, &last_name, email.as_str());

        let user_id = self
            .user_repository
            .create_pending_account(PendingAccount {
                first_name,
                last_name,
                email: email.into(),
                password_hash,
                admin_notice,
            })
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => AuthError::EmailTaken,
                other => {
                    warn!(error = %other, "signup rolled back");
                    AuthError::TransactionFailure(other.to_string())
                }
            })?;

        self.record(AuthEventKind::Signup, "success", Some(user_id), &params.context)
            .await?;
        info!(%user_id, "account created, awaiting activation");

        Ok(user_id)
    }
}
