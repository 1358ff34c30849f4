use std::sync::Arc;

use app_core::identity::IdentityVerifier;
use app_core::middleware::auth;
use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::inbound::http::profile::*;
use crate::inbound::http::user::*;
use crate::inbound::state::SocialState;

pub fn create_router(state: SocialState, verifier: Arc<dyn IdentityVerifier>) -> Router {
    let protected_routes = Router::new()
        // profile scope
        .route("/profile", get(get_profile).post(create_profile).put(update_profile))
        .route("/profile/suggested", get(suggest_profiles))
        // user scope
        .route("/users/me", get(get_current_user).put(update_current_user))
        .route("/users/{user_id}", get(get_user))
        .route_layer(middleware::from_fn_with_state(verifier, auth));

    let public_routes = Router::new()
        // first sign-in bootstrap, called before the client holds a session
        .route("/users/ensure", post(ensure_user));

    Router::new().merge(public_routes).merge(protected_routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use app_core::config::test_utils::TestConfigBuilder;
    use app_core::error::AppError;
    use app_core::identity::{Identity, MockIdentityVerifier, VerifyError};
    use app_core::storage::MockStorageService;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use sea_orm::DbErr;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::outbound::memory::MemoryStore;
    use crate::usecase::profile::{MockProfileUseCase, ProfileService};
    use crate::usecase::suggestion::{MockSuggestionUseCase, SuggestionService};
    use crate::usecase::user::{MockUserUseCase, UserService};

    const BOUNDARY: &str = "X-SOCIAL-BOUNDARY";

    /// Accepts `token-<subject>` and rejects everything else.
    fn verifier() -> Arc<dyn IdentityVerifier> {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .returning(|token| token.strip_prefix("token-").map(Identity::new).ok_or(VerifyError::InvalidToken));
        Arc::new(verifier)
    }

    fn app_with_storage(storage: MockStorageService) -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = Arc::new(TestConfigBuilder::new().build());

        let state = SocialState::new(
            config.clone(),
            Arc::new(ProfileService::new(Arc::new(storage), store.clone())),
            Arc::new(SuggestionService::new(config, store.clone())),
            Arc::new(UserService::new(store.clone())),
        );

        (create_router(state, verifier()), store)
    }

    fn app() -> (Router, Arc<MemoryStore>) {
        app_with_storage(MockStorageService::new())
    }

    async fn send(app: &Router, method: Method, uri: &str, subject: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(subject) = subject {
            builder = builder.header("authorization", format!("Bearer token-{subject}"));
        }

        let request = match body {
            Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        read(app.clone().oneshot(request).await.unwrap()).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    async fn create(app: &Router, subject: &str, display_name: &str) -> (StatusCode, Value) {
        send(app, Method::POST, "/profile", Some(subject), Some(json!({ "displayName": display_name }))).await
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let (app, _) = app();

        for (method, uri) in [
            (Method::GET, "/profile"),
            (Method::POST, "/profile"),
            (Method::PUT, "/profile"),
            (Method::GET, "/profile/suggested"),
            (Method::GET, "/users/me"),
            (Method::PUT, "/users/me"),
            (Method::GET, "/users/u2"),
        ] {
            let (status, body) = send(&app, method.clone(), uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["kind"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (app, _) = app();

        let request =
            Request::builder().uri("/profile").header("authorization", "Bearer forged").body(Body::empty()).unwrap();
        let (status, body) = read(app.oneshot(request).await.unwrap()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], "unauthorized");
    }

    #[tokio::test]
    async fn test_create_profile_is_idempotent() {
        let (app, store) = app();

        let (status, body) = create(&app, "u1", "Ann").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["exists"], false);
        assert_eq!(body["data"]["profile"]["ownerId"], "u1");
        assert_eq!(body["data"]["profile"]["displayName"], "Ann");
        assert_eq!(body["data"]["profile"]["bio"], Value::Null);
        assert_eq!(body["data"]["profile"]["photoRef"], Value::Null);
        assert_eq!(body["data"]["profile"]["updatedAt"], Value::Null);
        let first = body["data"]["profile"].clone();

        let (status, body) = create(&app, "u1", "Not Ann").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["exists"], true);
        assert_eq!(body["data"]["profile"], first);

        assert_eq!(store.profile_count(), 1);
    }

    #[tokio::test]
    async fn test_create_profile_without_display_name_is_bad_request() {
        let (app, store) = app();

        let (status, body) = send(&app, Method::POST, "/profile", Some("u1"), Some(json!({ "bio": "hi" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert!(body["details"]["display_name"].is_array());
        assert_eq!(store.profile_count(), 0);
    }

    #[tokio::test]
    async fn test_create_profile_with_multipart_photo() {
        let mut storage = MockStorageService::new();
        storage
            .expect_upload_file()
            .withf(|key, _, content_type| key.starts_with("photos/u1-") && content_type == "image/jpeg")
            .times(1)
            .returning(|key, _, _| Ok(format!("/uploads/{key}")));
        let (app, _) = app_with_storage(storage);

        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nAnn\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"profilePhoto\"; filename=\"me.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nnot-really-a-jpeg\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/profile")
            .header("authorization", "Bearer token-u1")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();

        let (status, body) = read(app.oneshot(request).await.unwrap()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["profile"]["displayName"], "Ann");
        assert!(body["data"]["profile"]["photoRef"].as_str().unwrap().starts_with("/uploads/photos/u1-"));
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (app, _) = app();

        let (status, body) = send(&app, Method::GET, "/profile", Some("u1"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["message"], "Profile not found");

        create(&app, "u1", "Ann").await;

        let (status, body) = send(&app, Method::GET, "/profile", Some("u1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully");
        assert_eq!(body["data"]["displayName"], "Ann");
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let (app, store) = app();

        let (status, body) = send(&app, Method::PUT, "/profile", Some("u1"), Some(json!({ "bio": "hello" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(store.profile_count(), 0);

        create(&app, "u1", "Ann").await;

        let (status, body) = send(&app, Method::PUT, "/profile", Some("u1"), Some(json!({ "bio": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bio"], "hello");
        assert_eq!(body["data"]["displayName"], "Ann");
        assert!(body["data"]["updatedAt"].is_string());

        let (status, body) = send(&app, Method::PUT, "/profile", Some("u1"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bio"], "hello");
        assert_eq!(body["data"]["displayName"], "Ann");
    }

    #[tokio::test]
    async fn test_suggested_profiles_exclude_caller() {
        let (app, _) = app();
        for (subject, name) in [("u1", "Ann"), ("u2", "Bo"), ("u3", "Cid")] {
            create(&app, subject, name).await;
        }

        let (status, body) = send(&app, Method::GET, "/profile/suggested", Some("u1"), None).await;
        assert_eq!(status, StatusCode::OK);

        let mut owners: Vec<_> =
            body["data"].as_array().unwrap().iter().map(|p| p["ownerId"].as_str().unwrap().to_string()).collect();
        owners.sort();
        assert_eq!(owners, vec!["u2", "u3"]);

        let (_, body) = send(&app, Method::GET, "/profile/suggested?limit=1", Some("u1"), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_suggested_profiles_empty_store() {
        let (app, _) = app();

        let (status, body) = send(&app, Method::GET, "/profile/suggested", Some("u1"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_suggested_profiles_rejects_bad_limit() {
        let (app, _) = app();

        let (status, body) = send(&app, Method::GET, "/profile/suggested?limit=0", Some("u1"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) = send(&app, Method::GET, "/profile/suggested?limit=many", Some("u1"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");
    }

    #[tokio::test]
    async fn test_ensure_user_without_auth() {
        let (app, store) = app();
        let payload = json!({ "id": "u1", "email": "ann@example.com", "displayName": "Ann" });

        let (status, body) = send(&app, Method::POST, "/users/ensure", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], "u1");
        assert_eq!(body["data"]["displayName"], "Ann");
        let first = body["data"].clone();

        let (status, body) = send(&app, Method::POST, "/users/ensure", None, Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], first);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_ensure_user_accepts_uid_and_name() {
        let (app, _) = app();
        let payload = json!({ "uid": "u1", "email": "ann@example.com", "name": "Ann" });

        let (status, body) = send(&app, Method::POST, "/users/ensure", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], "u1");
        assert_eq!(body["data"]["displayName"], "Ann");
    }

    #[tokio::test]
    async fn test_current_user_routes() {
        let (app, _) = app();

        let (status, _) = send(&app, Method::GET, "/users/me", Some("u1"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let payload = json!({ "id": "u1", "email": "ann@example.com", "displayName": "Ann" });
        send(&app, Method::POST, "/users/ensure", None, Some(payload)).await;

        let (status, body) = send(&app, Method::GET, "/users/me", Some("u1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "ann@example.com");

        let (status, body) =
            send(&app, Method::PUT, "/users/me", Some("u1"), Some(json!({ "displayName": "Annie" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["displayName"], "Annie");
        assert!(body["data"]["updatedAt"].is_string());

        let (status, body) = send(&app, Method::GET, "/users/u1", Some("u2"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["displayName"], "Annie");

        let (status, body) = send(&app, Method::GET, "/users/nobody", Some("u1"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque_internal_error() {
        let mut user = MockUserUseCase::new();
        user.expect_ensure_user().returning(|_| {
            Err(AppError::Database(DbErr::Conn(sea_orm::RuntimeErr::Internal("pg at 10.0.0.5 refused".to_string()))))
        });

        let state = SocialState::new(
            Arc::new(TestConfigBuilder::new().build()),
            Arc::new(MockProfileUseCase::new()),
            Arc::new(MockSuggestionUseCase::new()),
            Arc::new(user),
        );
        let app = create_router(state, verifier());

        let payload = json!({ "id": "u1", "email": "ann@example.com", "displayName": "Ann" });
        let (status, body) = send(&app, Method::POST, "/users/ensure", None, Some(payload)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "internal_error");
        assert_eq!(body["message"], "An internal server error occurred");
        assert!(!body.to_string().contains("10.0.0.5"));
    }
}
