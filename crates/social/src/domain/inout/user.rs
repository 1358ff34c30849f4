use validator::Validate;

use crate::domain::entity::user::User;

// ╔════════════════════════════╗
// ║        Ensure User         ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct EnsureUserInput {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    pub display_name: String,
}

#[derive(Debug)]
pub struct EnsureUserOutput {
    pub user: User,
    pub created: bool,
}

// ╔════════════════════════════╗
// ║          Get User          ║
// ╚════════════════════════════╝

#[derive(Debug)]
pub struct GetUserInput {
    pub user_id: String,
}

// ╔════════════════════════════╗
// ║        Update User         ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct UpdateUserInput {
    pub user_id: String,

    #[validate(length(min = 1, message = "display name cannot be empty"))]
    pub display_name: Option<String>,
}
