use std::sync::Arc;

use app_core::error::AppError;
use app_core::storage::StorageService;
use async_trait::async_trait;
use app_core::time;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entity::profile::{NewProfile, Profile, ProfileUpdatePayload};
use crate::domain::inout::prelude::*;
use crate::outbound::repository::ProfileRepository;

const PROFILE_NOT_FOUND_MSG: &str = "Profile not found";

// File upload constants
const PHOTO_DIR: &str = "photos";
const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024; // 5MB
const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileUseCase: Send + Sync {
    /// Creates the caller's profile, or returns the existing one with
    /// `exists: true` without writing anything.
    async fn create_profile(&self, input: CreateProfileInput) -> Result<CreateProfileOutput, AppError>;
    async fn get_profile(&self, input: GetProfileInput) -> Result<Profile, AppError>;
    /// Applies only the provided fields and always refreshes `updated_at`.
    async fn update_profile(&self, input: UpdateProfileInput) -> Result<Profile, AppError>;
}

/// A photo written to storage, kept around so it can be removed again if the
/// record that should point at it is never written.
struct StoredPhoto {
    key: String,
    reference: String,
}

#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn StorageService>,
    repo: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn StorageService>, repo: Arc<dyn ProfileRepository>) -> Self {
        Self { storage, repo }
    }

    async fn get_profile_by_owner(&self, owner_id: &str) -> Result<Profile, AppError> {
        self.repo
            .find_profile_by_owner(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND_MSG.to_string()))
    }

    fn validate_photo_file(&self, file_name: &str, owner_id: &str, data: &[u8]) -> Result<(String, String), AppError> {
        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::ValidationStr("Photo file too large (max 5MB)".to_string()));
        }

        let content_type = mime_guess::from_path(file_name).first_or_octet_stream().to_string();

        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::ValidationStr(
                "Invalid photo format. Only JPEG, PNG, WebP and GIF are allowed".to_string(),
            ));
        }

        let file_extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "jpg".to_string());

        // Owner ids come from the identity provider; keep the key path-safe.
        let safe_owner: String = owner_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        let secure_filename = format!("{}/{}-{}.{}", PHOTO_DIR, safe_owner, Uuid::new_v4(), file_extension);

        Ok((secure_filename, content_type))
    }

    async fn upload_photo(&self, owner_id: &str, photo: PhotoUpload) -> Result<StoredPhoto, AppError> {
        let (key, content_type) = self.validate_photo_file(&photo.file_name, owner_id, &photo.data)?;

        let reference = self.storage.upload_file(&key, photo.data, &content_type).await?;

        Ok(StoredPhoto { key, reference })
    }

    async fn upload_optional_photo(
        &self,
        owner_id: &str,
        photo: Option<PhotoUpload>,
    ) -> Result<Option<StoredPhoto>, AppError> {
        match photo {
            Some(photo) => Ok(Some(self.upload_photo(owner_id, photo).await?)),
            None => Ok(None),
        }
    }

    /// Best-effort removal of a photo no record refers to.
    async fn discard_photo(&self, photo: Option<StoredPhoto>) {
        let Some(photo) = photo else {
            return;
        };

        if let Err(err) = self.storage.delete_file(&photo.key).await {
            tracing::error!("Failed to remove orphaned photo {}: {:?}", photo.key, err);
        }
    }

    /// Best-effort removal of the photo a profile pointed at before it was
    /// replaced. References that do not carry a photo key are left alone.
    async fn discard_replaced_photo(&self, previous_ref: Option<&str>) {
        let Some(key) = previous_ref.and_then(photo_key) else {
            return;
        };

        if let Err(err) = self.storage.delete_file(key).await {
            tracing::error!("Failed to remove replaced photo {}: {:?}", key, err);
        }
    }
}

/// Recovers the storage key from a stored photo reference (`{base_url}/{key}`).
fn photo_key(reference: &str) -> Option<&str> {
    reference.rfind(&format!("{PHOTO_DIR}/")).map(|idx| &reference[idx..])
}

#[async_trait]
impl ProfileUseCase for ProfileService {
    async fn create_profile(&self, input: CreateProfileInput) -> Result<CreateProfileOutput, AppError> {
        input.validate()?;

        if let Some(profile) = self.repo.find_profile_by_owner(&input.owner_id).await? {
            tracing::info!("Profile already exists for owner: {}", input.owner_id);
            return Ok(CreateProfileOutput { profile, exists: true });
        }

        let photo = self.upload_optional_photo(&input.owner_id, input.photo).await?;

        let new_profile = NewProfile {
            owner_id: input.owner_id,
            display_name: input.display_name,
            bio: input.bio,
            photo_ref: photo.as_ref().map(|p| p.reference.clone()),
            created_at: time::now(),
        };

        let inserted = match self.repo.insert_profile_if_absent(&new_profile).await {
            Ok(inserted) => inserted,
            Err(err) => {
                self.discard_photo(photo).await;
                return Err(err);
            },
        };

        if inserted {
            tracing::info!("Profile created for owner: {}", new_profile.owner_id);
            return Ok(CreateProfileOutput { profile: new_profile.into(), exists: false });
        }

        // A concurrent request created the profile between the lookup and the insert.
        self.discard_photo(photo).await;
        tracing::info!("Profile already exists for owner: {}", new_profile.owner_id);

        let profile = self.get_profile_by_owner(&new_profile.owner_id).await?;

        Ok(CreateProfileOutput { profile, exists: true })
    }

    async fn get_profile(&self, input: GetProfileInput) -> Result<Profile, AppError> {
        self.get_profile_by_owner(&input.owner_id).await
    }

    async fn update_profile(&self, input: UpdateProfileInput) -> Result<Profile, AppError> {
        input.validate()?;

        let profile = self.get_profile_by_owner(&input.owner_id).await?;

        let photo = self.upload_optional_photo(&profile.owner_id, input.photo).await?;

        let payload = ProfileUpdatePayload {
            owner_id: profile.owner_id.clone(),
            display_name: input.display_name,
            bio: input.bio,
            photo_ref: photo.as_ref().map(|p| p.reference.clone()),
            updated_at: time::now(),
        };

        if let Err(err) = self.repo.update_profile(payload).await {
            self.discard_photo(photo).await;
            return Err(err);
        }

        tracing::info!("Profile updated successfully for owner: {}", profile.owner_id);

        if photo.is_some() {
            self.discard_replaced_photo(profile.photo_ref.as_deref()).await;
        }

        self.get_profile_by_owner(&profile.owner_id).await
    }
}
