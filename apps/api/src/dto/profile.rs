use schoolhub_application::UserRecord;
use schoolhub_domain::RoleName;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role as exposed to the client: numeric code plus name.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-summary.ts"
)]
pub struct RoleSummary {
    pub id: i32,
    pub name: String,
}

impl From<RoleName> for RoleSummary {
    fn from(role: RoleName) -> Self {
        Self {
            id: role.code(),
            name: role.as_str().to_owned(),
        }
    }
}

/// Current account with its stored role grants.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/current-user-response.ts"
)]
pub struct CurrentUserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<RoleSummary>,
}

impl From<UserRecord> for CurrentUserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            roles: user
                .roles
                .role_names()
                .into_iter()
                .map(RoleSummary::from)
                .collect(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// Whoami envelope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/whoami-response.ts"
)]
pub struct WhoamiResponse {
    pub status: &'static str,
    pub user: CurrentUserResponse,
}

/// Partial self-service profile update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
