use std::sync::Arc;

use app_core::error::AppError;
use async_trait::async_trait;
use app_core::time;
use validator::Validate;

use crate::domain::entity::user::{NewUser, User, UserUpdatePayload};
use crate::domain::inout::prelude::*;
use crate::outbound::repository::UserRepository;

const USER_NOT_FOUND_MSG: &str = "User not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserUseCase: Send + Sync {
    /// Returns the stored record for `input.id`, creating it on first contact.
    async fn ensure_user(&self, input: EnsureUserInput) -> Result<EnsureUserOutput, AppError>;
    async fn get_user(&self, input: GetUserInput) -> Result<User, AppError>;
    async fn update_user(&self, input: UpdateUserInput) -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<User, AppError> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MSG.to_string()))
    }
}

#[async_trait]
impl UserUseCase for UserService {
    async fn ensure_user(&self, input: EnsureUserInput) -> Result<EnsureUserOutput, AppError> {
        input.validate()?;

        if let Some(user) = self.repo.find_user_by_id(&input.id).await? {
            return Ok(EnsureUserOutput { user, created: false });
        }

        let new_user =
            NewUser { id: input.id, email: input.email, display_name: input.display_name, created_at: time::now() };

        if self.repo.insert_user_if_absent(&new_user).await? {
            tracing::info!("User ensured: {}", new_user.id);
            return Ok(EnsureUserOutput { user: new_user.into(), created: true });
        }

        let user = self.get_user_by_id(&new_user.id).await?;

        Ok(EnsureUserOutput { user, created: false })
    }

    async fn get_user(&self, input: GetUserInput) -> Result<User, AppError> {
        self.get_user_by_id(&input.user_id).await
    }

    async fn update_user(&self, input: UpdateUserInput) -> Result<User, AppError> {
        input.validate()?;

        self.repo
            .update_user(UserUpdatePayload {
                id: input.user_id.clone(),
                display_name: input.display_name,
                updated_at: time::now(),
            })
            .await?;

        tracing::info!("User updated successfully: {}", input.user_id);

        self.get_user_by_id(&input.user_id).await
    }
}
