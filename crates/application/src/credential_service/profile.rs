use schoolhub_core::AppError;

use crate::ProfileChanges;

use super::*;

impl CredentialService {
    /// Applies a partial update to the caller's own profile.
    ///
    /// Moving to an address owned by another account is a `Conflict`; a
    /// disabled account is `NotFound`, as in [`CredentialService::current_user`].
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
        context: &RequestContext,
    ) -> AuthResult<()> {
        self.current_user(user_id).await?;

        let mut changes = ProfileChanges {
            first_name: update
                .first_name
                .map(|value| required_name("first_name", value))
                .transpose()?,
            last_name: update
                .last_name
                .map(|value| required_name("last_name", value))
                .transpose()?,
            ..ProfileChanges::default()
        };

        if let Some(email) = update.email {
            let email = validated_email(&email)?;
            let owner = self.user_repository.find_by_email(email.as_str()).await?;
            if owner.is_some_and(|owner| owner.id != user_id) {
                return Err(email_in_use());
            }
            changes.email = Some(email.into());
        }

        if let Some(password) = update.password {
            validated_password(&password)?;
            changes.password_hash = Some(self.password_hasher.hash_password(&password)?);
        }

        if changes.is_empty() {
            return Err(AuthError::Validation(
                "no profile changes provided".to_owned(),
            ));
        }

        self.user_repository
            .update_profile(user_id, changes)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => email_in_use(),
                other => AuthError::from(other),
            })?;

        self.record(AuthEventKind::ProfileUpdate, "success", Some(user_id), context)
            .await
    }
}

fn email_in_use() -> AuthError {
    AuthError::Conflict("email address is already in use".to_owned())
}
