use chrono::Utc;
use schoolhub_domain::RoleName;
use tracing::debug;

use super::*;

impl PostgresUserRepository {
    /// Inserts the user, its `inactive` grant and one notification per enabled
    /// admin in a single transaction.
    pub(super) async fn create_pending_account_impl(
        &self,
        account: PendingAccount,
    ) -> AppResult<UserId> {
        let user_id = UserId::new();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin signup transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, LOWER($4), $5)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .execute(&mut *transaction)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        sqlx::query("INSERT INTO user_roles (user_id, role_code) VALUES ($1, $2)")
            .bind(user_id.as_uuid())
            .bind(RoleName::Inactive.code())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to grant inactive role: {error}"))
            })?;

        let admin_ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT ur.user_id
            FROM user_roles ur
            JOIN users u ON u.id = ur.user_id
            WHERE ur.role_code = $1 AND u.account_enabled
            "#,
        )
        .bind(RoleName::Admin.code())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list admins: {error}")))?;

        let created_at = Utc::now();
        for admin_id in &admin_ids {
            let notification = account
                .admin_notice
                .addressed_to(UserId::from_uuid(*admin_id), created_at);

            sqlx::query(
                r#"
                INSERT INTO notifications (id, recipient_id, title, message, created_at, read)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(notification.id)
            .bind(notification.recipient.as_uuid())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.created_at)
            .bind(notification.read)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to notify administrator: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit signup transaction: {error}"))
        })?;

        debug!(%user_id, notified = admin_ids.len(), "pending account stored");
        Ok(user_id)
    }

    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE(LOWER($4), email),
                password_hash = COALESCE($5, password_hash),
                updated_at = now()
            WHERE id = $1 AND account_enabled
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update profile"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        Ok(())
    }
}
