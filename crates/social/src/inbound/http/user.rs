use app_core::extractors::{AppJson, AppPath};
use app_core::identity::Identity;
use app_core::response::Response;
use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::inout::prelude::*;
use crate::inbound::model::prelude::*;
use crate::inbound::state::SocialState;

#[debug_handler]
pub async fn ensure_user(
    State(state): State<SocialState>,
    AppJson(req): AppJson<EnsureUserRequest>,
) -> impl IntoResponse {
    state
        .user
        .ensure_user(EnsureUserInput {
            id: req.id,
            email: req.email,
            display_name: req.display_name.unwrap_or_default(),
        })
        .await
        .map(|output| {
            let body = UserResponse::from(output.user);

            if output.created { Response::created(body) } else { Response::from(body) }
        })
}

#[debug_handler]
pub async fn get_current_user(State(state): State<SocialState>, identity: Identity) -> impl IntoResponse {
    state
        .user
        .get_user(GetUserInput { user_id: identity.subject })
        .await
        .map(UserResponse::from)
        .map(Response::from)
}

#[debug_handler]
pub async fn get_user(State(state): State<SocialState>, AppPath(user_id): AppPath<String>) -> impl IntoResponse {
    state.user.get_user(GetUserInput { user_id }).await.map(UserResponse::from).map(Response::from)
}

#[debug_handler]
pub async fn update_current_user(
    State(state): State<SocialState>,
    identity: Identity,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> impl IntoResponse {
    state
        .user
        .update_user(UpdateUserInput { user_id: identity.subject, display_name: req.display_name })
        .await
        .map(UserResponse::from)
        .map(Response::from)
}
