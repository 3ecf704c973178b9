use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use schoolhub_core::{AppResult, AuthError, AuthResult};
use schoolhub_domain::{Notification, UserId};

use crate::AuthenticatedPrincipal;

/// Maximum notifications returned per listing.
pub const NOTIFICATION_PAGE_LIMIT: usize = 50;

/// Repository port for notification reads.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Lists the newest notifications addressed to `recipient`.
    async fn list_for_recipient(
        &self,
        recipient: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>>;

    /// Marks a notification read. Returns `false` when the recipient does not
    /// own a notification with that id.
    async fn mark_read(&self, recipient: UserId, notification_id: Uuid) -> AppResult<bool>;
}

/// Application service exposing a principal's own notifications.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list_for(&self, actor: &AuthenticatedPrincipal) -> AuthResult<Vec<Notification>> {
        Ok(self
            .repository
            .list_for_recipient(actor.subject(), NOTIFICATION_PAGE_LIMIT)
            .await?)
    }

    /// Marks one of the caller's notifications read.
    pub async fn mark_read(
        &self,
        actor: &AuthenticatedPrincipal,
        notification_id: Uuid,
    ) -> AuthResult<()> {
        if self
            .repository
            .mark_read(actor.subject(), notification_id)
            .await?
        {
            Ok(())
        } else {
            Err(AuthError::NotFound(format!(
                "notification '{notification_id}' was not found"
            )))
        }
    }
}
