use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a role grant or revocation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-change-request.ts"
)]
pub struct RoleChangeRequest {
    pub user_id: String,
    pub role_name: String,
    /// `assign` or `remove`.
    pub action: String,
}

/// Resulting grants after a role change.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-change-response.ts"
)]
pub struct RoleChangeResponse {
    pub status: &'static str,
    pub roles: Vec<String>,
}
