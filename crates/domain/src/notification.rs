//! In-app notifications delivered to principals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UserId;

/// Notification stored for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable notification identifier.
    pub id: Uuid,
    /// Principal the notification is addressed to.
    pub recipient: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the recipient has acknowledged it.
    pub read: bool,
}

/// Notification template fanned out to every administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotice {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl AdminNotice {
    /// Builds the notice sent when a self-registered account awaits activation.
    #[must_use]
    pub fn pending_activation(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            title: "New account awaiting activation".to_owned(),
            message: format!(
                "{first_name} {last_name} ({email}) signed up and needs a role before they can use the system."
            ),
        }
    }

    /// Materializes the notice for one recipient.
    #[must_use]
    pub fn addressed_to(&self, recipient: UserId, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient,
            title: self.title.clone(),
            message: self.message.clone(),
            created_at,
            read: false,
        }
    }
}
