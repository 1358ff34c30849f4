use std::sync::Arc;

use app_core::config::Config;

use crate::usecase::profile::ProfileUseCase;
use crate::usecase::suggestion::SuggestionUseCase;
use crate::usecase::user::UserUseCase;

#[derive(Clone)]
pub struct SocialState {
    pub config: Arc<Config>,
    pub profile: Arc<dyn ProfileUseCase>,
    pub suggestion: Arc<dyn SuggestionUseCase>,
    pub user: Arc<dyn UserUseCase>,
}

impl SocialState {
    pub fn new(
        config: Arc<Config>,
        profile: Arc<dyn ProfileUseCase>,
        suggestion: Arc<dyn SuggestionUseCase>,
        user: Arc<dyn UserUseCase>,
    ) -> Self {
        Self { config, profile, suggestion, user }
    }
}
