use schoolhub_domain::Notification;
use serde::Serialize;
use ts_rs::TS;

/// API representation of a notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub created_at: String,
    pub read: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            title: notification.title,
            message: notification.message,
            created_at: notification.created_at.to_rfc3339(),
            read: notification.read,
        }
    }
}

/// Notification listing envelope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-list-response.ts"
)]
pub struct NotificationListResponse {
    pub status: &'static str,
    pub notifications: Vec<NotificationResponse>,
}
