//! In-memory store used by service and router tests to exercise the full
//! request path without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use app_core::error::AppError;
use async_trait::async_trait;

use super::repository::{ProfileRepository, UserRepository};
use crate::domain::entity::profile::{NewProfile, Profile, ProfileUpdatePayload};
use crate::domain::entity::user::{NewUser, User, UserUpdatePayload};

#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, Profile>>,
    users: Mutex<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.lock().unwrap().get(owner_id).cloned())
    }

    async fn insert_profile_if_absent(&self, profile: &NewProfile) -> Result<bool, AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.owner_id) {
            return Ok(false);
        }
        profiles.insert(profile.owner_id.clone(), Profile::from(profile.clone()));
        Ok(true)
    }

    async fn update_profile(&self, payload: ProfileUpdatePayload) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile =
            profiles.get_mut(&payload.owner_id).ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        if let Some(display_name) = payload.display_name {
            profile.display_name = display_name;
        }
        if let Some(bio) = payload.bio {
            profile.bio = Some(bio);
        }
        if let Some(photo_ref) = payload.photo_ref {
            profile.photo_ref = Some(photo_ref);
        }
        profile.updated_at = Some(payload.updated_at);

        Ok(())
    }

    async fn find_profiles_excluding(&self, owner_id: &str, limit: u64) -> Result<Vec<Profile>, AppError> {
        let mut others: Vec<Profile> =
            self.profiles.lock().unwrap().values().filter(|p| p.owner_id != owner_id).cloned().collect();
        others.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        others.truncate(limit as usize);
        Ok(others)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.id) {
            return Ok(false);
        }
        users.insert(user.id.clone(), User::from(user.clone()));
        Ok(true)
    }

    async fn update_user(&self, payload: UserUpdatePayload) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&payload.id).ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(display_name) = payload.display_name {
            user.display_name = display_name;
        }
        user.updated_at = Some(payload.updated_at);

        Ok(())
    }
}
