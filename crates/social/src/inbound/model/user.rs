use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ╔════════════════════════════╗
// ║    User                    ║
// ╚════════════════════════════╝

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

// ╔════════════════════════════╗
// ║    Ensure User             ║
// ╚════════════════════════════╝

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUserRequest {
    #[serde(alias = "uid")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
}

// ╔════════════════════════════╗
// ║    Update User             ║
// ╚════════════════════════════╝

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub display_name: Option<String>,
}
