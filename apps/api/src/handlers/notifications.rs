use axum::Json;
use axum::extract::{Extension, Path, State};
use schoolhub_application::AuthenticatedPrincipal;
use uuid::Uuid;

use crate::dto::{MessageResponse, NotificationListResponse, NotificationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/notifications - The caller's newest notifications.
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> ApiResult<Json<NotificationListResponse>> {
    let notifications = state.notification_service.list_for(&principal).await?;

    Ok(Json(NotificationListResponse {
        status: "success",
        notifications: notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    }))
}

/// POST /api/notifications/{notification_id}/read
pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .notification_service
        .mark_read(&principal, notification_id)
        .await?;

    Ok(Json(MessageResponse::success("notification marked read")))
}
