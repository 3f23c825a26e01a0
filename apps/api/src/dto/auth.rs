use csrd_application::RegisterParams;
use csrd_domain::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for login by NNI or email.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Incoming payload for self-registration.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub nni: String,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub password: String,
}

impl From<RegisterRequest> for RegisterParams {
    fn from(value: RegisterRequest) -> Self {
        Self {
            nni: value.nni,
            email: value.email,
            last_name: value.last_name,
            first_name: value.first_name,
            password: value.password,
        }
    }
}

/// Incoming payload for team assignment.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-team-request.ts"
)]
pub struct AssignTeamRequest {
    pub team_id: String,
}

/// API representation of a directory user. Never carries the password.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub nni: String,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: String,
    pub role: String,
    pub status: String,
    pub team_id: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            nni: value.nni().to_string(),
            email: value.email().as_str().to_owned(),
            last_name: value.last_name().to_owned(),
            first_name: value.first_name().to_owned(),
            display_name: value.display_name(),
            role: value.role().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            team_id: value.team().map(ToString::to_string),
        }
    }
}
