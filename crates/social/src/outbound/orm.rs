use std::sync::Arc;

use app_core::error::AppError;
use app_core::time::{fixed_offset_to_utc, utc_to_fixed_offset};
use app_orm::prelude::{Profiles, Users};
use app_orm::{profiles, users};
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::repository::{ProfileRepository, UserRepository};
use crate::domain::entity::profile::{NewProfile, Profile, ProfileUpdatePayload};
use crate::domain::entity::user::{NewUser, User, UserUpdatePayload};

/// `SocialORM` is the SeaORM-backed store for users and profiles.
///
/// Both tables are keyed by the identity provider's subject id, and every
/// "create once" path goes through `INSERT .. ON CONFLICT DO NOTHING` so the
/// primary key decides who wins a concurrent create.
pub struct SocialORM {
    db: Arc<DatabaseConnection>,
}

impl SocialORM {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ===== Mappers from database models to domain entities =====

    fn to_profile(&self, model: profiles::Model) -> Profile {
        Profile {
            owner_id: model.owner_id,
            display_name: model.display_name,
            bio: model.bio,
            photo_ref: model.photo_ref,
            created_at: fixed_offset_to_utc(model.created_at),
            updated_at: model.updated_at.map(fixed_offset_to_utc),
        }
    }

    fn to_user(&self, model: users::Model) -> User {
        User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            created_at: fixed_offset_to_utc(model.created_at),
            updated_at: model.updated_at.map(fixed_offset_to_utc),
        }
    }
}

#[async_trait]
impl ProfileRepository for SocialORM {
    async fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, AppError> {
        let profile = Profiles::find_by_id(owner_id.to_owned()).one(self.db.as_ref()).await?;

        Ok(profile.map(|m| self.to_profile(m)))
    }

    async fn insert_profile_if_absent(&self, profile: &NewProfile) -> Result<bool, AppError> {
        let model = profiles::ActiveModel {
            owner_id: ActiveValue::Set(profile.owner_id.clone()),
            display_name: ActiveValue::Set(profile.display_name.clone()),
            bio: ActiveValue::Set(profile.bio.clone()),
            photo_ref: ActiveValue::Set(profile.photo_ref.clone()),
            created_at: ActiveValue::Set(utc_to_fixed_offset(&profile.created_at)),
            updated_at: ActiveValue::Set(None),
        };

        let rows_affected = Profiles::insert(model)
            .on_conflict(OnConflict::column(profiles::Column::OwnerId).do_nothing().to_owned())
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(rows_affected > 0)
    }

    async fn update_profile(&self, payload: ProfileUpdatePayload) -> Result<(), AppError> {
        let mut active_model = profiles::ActiveModel {
            updated_at: ActiveValue::Set(Some(utc_to_fixed_offset(&payload.updated_at))),
            ..Default::default()
        };

        if let Some(display_name) = payload.display_name {
            active_model.display_name = ActiveValue::Set(display_name);
        }
        if let Some(bio) = payload.bio {
            active_model.bio = ActiveValue::Set(Some(bio));
        }
        if let Some(photo_ref) = payload.photo_ref {
            active_model.photo_ref = ActiveValue::Set(Some(photo_ref));
        }

        let result = Profiles::update_many()
            .set(active_model)
            .filter(profiles::Column::OwnerId.eq(payload.owner_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }

        Ok(())
    }

    async fn find_profiles_excluding(&self, owner_id: &str, limit: u64) -> Result<Vec<Profile>, AppError> {
        let models = Profiles::find()
            .filter(profiles::Column::OwnerId.ne(owner_id))
            .order_by_desc(profiles::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(|m| self.to_profile(m)).collect())
    }
}

#[async_trait]
impl UserRepository for SocialORM {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = Users::find_by_id(id.to_owned()).one(self.db.as_ref()).await?;

        Ok(user.map(|m| self.to_user(m)))
    }

    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<bool, AppError> {
        let model = users::ActiveModel {
            id: ActiveValue::Set(user.id.clone()),
            email: ActiveValue::Set(user.email.clone()),
            display_name: ActiveValue::Set(user.display_name.clone()),
            created_at: ActiveValue::Set(utc_to_fixed_offset(&user.created_at)),
            updated_at: ActiveValue::Set(None),
        };

        let rows_affected = Users::insert(model)
            .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(rows_affected > 0)
    }

    async fn update_user(&self, payload: UserUpdatePayload) -> Result<(), AppError> {
        let mut active_model = users::ActiveModel {
            updated_at: ActiveValue::Set(Some(utc_to_fixed_offset(&payload.updated_at))),
            ..Default::default()
        };

        if let Some(display_name) = payload.display_name {
            active_model.display_name = ActiveValue::Set(display_name);
        }

        let result = Users::update_many()
            .set(active_model)
            .filter(users::Column::Id.eq(payload.id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
