use app_core::error::AppError;
use app_core::extractors::AppJson;
use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::{Request, header};
use serde::{Deserialize, Serialize};

use crate::domain::entity::profile::Profile;
use crate::domain::inout::prelude::PhotoUpload;

// ╔════════════════════════════╗
// ║    Profile                 ║
// ╚════════════════════════════╝

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub owner_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub photo_ref: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            owner_id: profile.owner_id,
            display_name: profile.display_name,
            bio: profile.bio,
            photo_ref: profile.photo_ref,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

// ╔════════════════════════════╗
// ║    Create / Update Form    ║
// ╚════════════════════════════╝

/// Body of `POST /profile` and `PUT /profile`, read either from
/// `multipart/form-data` (with an optional photo) or from JSON.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<PhotoUpload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileJson {
    #[serde(default, alias = "name")]
    display_name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

impl From<ProfileJson> for ProfileForm {
    fn from(body: ProfileJson) -> Self {
        Self { display_name: body.display_name.map(|name| name.trim().to_string()), bio: body.bio, photo: None }
    }
}

/// Blank form fields are treated as not sent.
fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

impl ProfileForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "displayName" | "name" => {
                    form.display_name = non_blank(field.text().await?);
                },
                "bio" => {
                    form.bio = non_blank(field.text().await?);
                },
                "photo" | "profilePhoto" => {
                    let file_name = field.file_name().unwrap_or("photo").to_string();
                    let data = field.bytes().await?.to_vec();
                    if !data.is_empty() {
                        form.photo = Some(PhotoUpload { file_name, data });
                    }
                },
                _ => (),
            }
        }

        Ok(form)
    }
}

impl<S> FromRequest<S> for ProfileForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await?;
            return Self::from_multipart(multipart).await;
        }

        let AppJson(body) = AppJson::<ProfileJson>::from_request(req, state).await?;
        Ok(body.into())
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub profile: ProfileResponse,
    pub exists: bool,
}

// ╔════════════════════════════╗
// ║    Suggested Profiles      ║
// ╚════════════════════════════╝

#[derive(Debug, Deserialize)]
pub struct SuggestProfilesRequest {
    pub limit: Option<u64>,
}
