use validator::Validate;

use crate::domain::entity::profile::Profile;

/// A photo received with a create or update request, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

// ╔════════════════════════════╗
// ║      Create Profile        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct CreateProfileInput {
    pub owner_id: String,

    #[validate(length(min = 1, message = "display name is required"))]
    pub display_name: String,

    pub bio: Option<String>,

    pub photo: Option<PhotoUpload>,
}

#[derive(Debug)]
pub struct CreateProfileOutput {
    pub profile: Profile,
    /// `true` when the owner already had a profile and nothing was written.
    pub exists: bool,
}

// ╔════════════════════════════╗
// ║        Get Profile         ║
// ╚════════════════════════════╝

#[derive(Debug)]
pub struct GetProfileInput {
    pub owner_id: String,
}

// ╔════════════════════════════╗
// ║      Update Profile        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct UpdateProfileInput {
    pub owner_id: String,

    #[validate(length(min = 1, message = "display name cannot be empty"))]
    pub display_name: Option<String>,

    pub bio: Option<String>,

    pub photo: Option<PhotoUpload>,
}
