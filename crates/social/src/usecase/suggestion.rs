use std::sync::Arc;

use app_core::config::Config;
use app_core::error::AppError;
use async_trait::async_trait;

use crate::domain::entity::profile::Profile;
use crate::domain::inout::prelude::*;
use crate::outbound::repository::ProfileRepository;

const DEFAULT_LIMIT: u64 = 5;
const DEFAULT_MAX_LIMIT: u64 = 50;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionUseCase: Send + Sync {
    /// Returns up to `limit` profiles of other users. Never includes the
    /// caller and yields an empty list when there is nobody to suggest.
    async fn suggest(&self, input: SuggestInput) -> Result<Vec<Profile>, AppError>;
}

#[derive(Clone)]
pub struct SuggestionService {
    config: Arc<Config>,
    repo: Arc<dyn ProfileRepository>,
}

impl SuggestionService {
    pub fn new(config: Arc<Config>, repo: Arc<dyn ProfileRepository>) -> Self {
        Self { config, repo }
    }

    fn resolve_limit(&self, requested: Option<u64>) -> Result<u64, AppError> {
        let max_limit = self.config.get_or("suggestion.max_limit", DEFAULT_MAX_LIMIT);

        match requested {
            Some(limit) if limit == 0 || limit > max_limit => {
                Err(AppError::ValidationStr(format!("limit must be between 1 and {max_limit}")))
            },
            Some(limit) => Ok(limit),
            None => Ok(self.config.get_or("suggestion.limit", DEFAULT_LIMIT).clamp(1, max_limit.max(1))),
        }
    }
}

#[async_trait]
impl SuggestionUseCase for SuggestionService {
    async fn suggest(&self, input: SuggestInput) -> Result<Vec<Profile>, AppError> {
        let limit = self.resolve_limit(input.limit)?;

        self.repo.find_profiles_excluding(&input.caller_id, limit).await
    }
}
