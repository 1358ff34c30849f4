use app_core::extractors::AppQuery;
use app_core::identity::Identity;
use app_core::response::Response;
use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::inout::prelude::*;
use crate::inbound::model::prelude::*;
use crate::inbound::state::SocialState;

#[debug_handler]
pub async fn create_profile(
    State(state): State<SocialState>,
    identity: Identity,
    form: ProfileForm,
) -> impl IntoResponse {
    state
        .profile
        .create_profile(CreateProfileInput {
            owner_id: identity.subject,
            display_name: form.display_name.unwrap_or_default(),
            bio: form.bio,
            photo: form.photo,
        })
        .await
        .map(|output| {
            let exists = output.exists;
            let body = CreateProfileResponse { profile: output.profile.into(), exists };

            if exists { Response::from(body) } else { Response::created(body) }
        })
}

#[debug_handler]
pub async fn get_profile(State(state): State<SocialState>, identity: Identity) -> impl IntoResponse {
    state
        .profile
        .get_profile(GetProfileInput { owner_id: identity.subject })
        .await
        .map(ProfileResponse::from)
        .map(Response::from)
}

#[debug_handler]
pub async fn update_profile(
    State(state): State<SocialState>,
    identity: Identity,
    form: ProfileForm,
) -> impl IntoResponse {
    state
        .profile
        .update_profile(UpdateProfileInput {
            owner_id: identity.subject,
            display_name: form.display_name,
            bio: form.bio,
            photo: form.photo,
        })
        .await
        .map(ProfileResponse::from)
        .map(Response::from)
}

#[debug_handler]
pub async fn suggest_profiles(
    State(state): State<SocialState>,
    identity: Identity,
    AppQuery(query): AppQuery<SuggestProfilesRequest>,
) -> impl IntoResponse {
    state
        .suggestion
        .suggest(SuggestInput { caller_id: identity.subject, limit: query.limit })
        .await
        .map(|profiles| profiles.into_iter().map(ProfileResponse::from).collect::<Vec<_>>())
        .map(Response::from)
}
