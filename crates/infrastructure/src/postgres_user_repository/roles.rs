use tracing::debug;

use super::*;

impl PostgresUserRepository {
    /// Locks the user row, applies `transition` to the stored grants and
    /// rewrites them. Concurrent transitions on one user serialize on the lock.
    pub(super) async fn transition_roles_impl(
        &self,
        user_id: UserId,
        transition: RoleTransition,
    ) -> AppResult<RoleState> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin role transaction: {error}"))
        })?;

        let locked = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock user: {error}")))?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        let stored_codes = sqlx::query_scalar::<_, i32>(
            "SELECT role_code FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        let current = RoleState::from_granted(RoleCodeRegistry::names_for_codes(&stored_codes));
        let next = current.apply(transition);
        let next_codes = next.role_codes();

        let mut stored_sorted = stored_codes;
        stored_sorted.sort_unstable();
        let mut next_sorted = next_codes.clone();
        next_sorted.sort_unstable();

        if stored_sorted != next_sorted {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND NOT (role_code = ANY($2))")
                .bind(user_id.as_uuid())
                .bind(&next_codes)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to revoke role grants: {error}"))
                })?;

            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_code)
                SELECT $1, UNNEST($2::INTEGER[])
                ON CONFLICT (user_id, role_code) DO NOTHING
                "#,
            )
            .bind(user_id.as_uuid())
            .bind(&next_codes)
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to grant roles: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit role transaction: {error}"))
        })?;

        debug!(%user_id, ?transition, roles = ?next.role_names(), "role grants rewritten");
        Ok(next)
    }
}
