//! Profiles, profile suggestions and user records, exposed over HTTP.

mod domain;
mod inbound;
mod outbound;
mod usecase;

use std::sync::Arc;

use app_core::config::Config;
use app_core::storage::StorageService;
pub use inbound::router::create_router;
pub use inbound::state::SocialState;
pub use outbound::schema::ensure_schema;
use sea_orm::DatabaseConnection;

use crate::outbound::orm::SocialORM;
use crate::usecase::profile::ProfileService;
use crate::usecase::suggestion::SuggestionService;
use crate::usecase::user::UserService;

pub struct Dependency {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<Config>,
    pub storage: Arc<dyn StorageService>,
}

pub fn new(dep: Dependency) -> SocialState {
    let repo = Arc::new(SocialORM::new(dep.db));

    let profile_svc = Arc::new(ProfileService::new(dep.storage, repo.clone()));
    let suggestion_svc = Arc::new(SuggestionService::new(dep.config.clone(), repo.clone()));
    let user_svc = Arc::new(UserService::new(repo));

    SocialState::new(dep.config, profile_svc, suggestion_svc, user_svc)
}
