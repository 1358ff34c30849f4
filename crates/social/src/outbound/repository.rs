use app_core::error::AppError;
use async_trait::async_trait;

use crate::domain::entity::profile::{NewProfile, Profile, ProfileUpdatePayload};
use crate::domain::entity::user::{NewUser, User, UserUpdatePayload};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile owned by `owner_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Profile))` if the owner has a profile.
    /// * `Ok(None)` otherwise.
    async fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, AppError>;

    /// Inserts `profile` unless its owner already has one.
    ///
    /// Uniqueness is enforced by the store, so two concurrent calls for the
    /// same owner write at most one row.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the row was written.
    /// * `Ok(false)` if a profile for the owner already existed.
    async fn insert_profile_if_absent(&self, profile: &NewProfile) -> Result<bool, AppError>;

    /// Applies the provided fields and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the owner has no profile.
    async fn update_profile(&self, payload: ProfileUpdatePayload) -> Result<(), AppError>;

    /// Returns up to `limit` profiles not owned by `owner_id`, newest first.
    async fn find_profiles_excluding(&self, owner_id: &str, limit: u64) -> Result<Vec<Profile>, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Inserts `user` unless a record with the same id exists. Returns whether
    /// the row was written.
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<bool, AppError>;

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no user has the given id.
    async fn update_user(&self, payload: UserUpdatePayload) -> Result<(), AppError>;
}
