use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use schoolhub_application::NotificationRepository;
use schoolhub_core::{AppError, AppResult};
use schoolhub_domain::{Notification, UserId};

/// PostgreSQL-backed repository for in-app notifications.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    title: String,
    message: String,
    created_at: DateTime<Utc>,
    read: bool,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            recipient: UserId::from_uuid(row.recipient_id),
            title: row.title,
            message: row.message,
            created_at: row.created_at,
            read: row.read,
        }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn list_for_recipient(
        &self,
        recipient: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, title, message, created_at, read
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(recipient.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list notifications: {error}")))?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, recipient: UserId, notification_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND recipient_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(recipient.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to mark notification read: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
