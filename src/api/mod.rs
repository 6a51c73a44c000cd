// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{FromRequest, FromRequestParts},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        ChirpRequest, CredentialsRequest, LoginResponse, PolkaWebhookData, PolkaWebhookRequest,
        TokenResponse, UserResponse, ValidateChirpResponse,
    },
    state::AppState,
    storage::{Chirp, SortOrder},
};

pub mod admin;
pub mod chirps;
pub mod health;
pub mod sessions;
pub mod users;
pub mod webhooks;

/// JSON body extractor whose rejection uses the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejection uses the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor whose rejection uses the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Run store and bcrypt work off the async runtime.
pub(crate) async fn blocking<T, E>(
    work: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Blocking task failed");
            ApiError::internal()
        })?
        .map_err(Into::into)
}

pub fn router(state: AppState) -> Router {
    let assets = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(state.clone(), admin::count_hit))
        .layer(middleware::from_fn_with_state(state.clone(), admin::hide_store_files))
        .service(ServeDir::new(&state.config.assets_dir));

    let api_routes = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/api/reset", get(admin::reset_hits))
        .route("/admin/metrics", get(admin::metrics))
        .route("/api/validate_chirp", post(chirps::validate_chirp))
        .route("/api/users", post(users::create_user).put(users::update_user))
        .route("/api/login", post(sessions::login))
        .route("/api/refresh", post(sessions::refresh))
        .route("/api/revoke", post(sessions::revoke))
        .route(
            "/api/chirps",
            get(chirps::list_chirps).post(chirps::create_chirp),
        )
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
        .route("/api/polka/webhooks", post(webhooks::polka_webhook))
        .nest_service("/app", assets)
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "ApiKey <key>",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        admin::metrics,
        admin::reset_hits,
        users::create_user,
        users::update_user,
        sessions::login,
        sessions::refresh,
        sessions::revoke,
        chirps::create_chirp,
        chirps::list_chirps,
        chirps::get_chirp,
        chirps::delete_chirp,
        chirps::validate_chirp,
        webhooks::polka_webhook
    ),
    components(
        schemas(
            Chirp,
            SortOrder,
            ChirpRequest,
            ValidateChirpResponse,
            CredentialsRequest,
            UserResponse,
            LoginResponse,
            TokenResponse,
            PolkaWebhookRequest,
            PolkaWebhookData
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Admin", description = "Static asset hit counter"),
        (name = "Users", description = "Account registration and profile"),
        (name = "Sessions", description = "Login, token refresh and revocation"),
        (name = "Chirps", description = "Posting and reading chirps"),
        (name = "Webhooks", description = "Polka payment events")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, TEST_POLKA_KEY};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn bearer(token: &Value) -> String {
        format!("Bearer {}", token.as_str().unwrap())
    }

    /// Sign up and log in, returning the login response.
    async fn sign_up_and_login(app: &Router, email: &str, password: &str) -> Value {
        let credentials = json!({"email": email, "password": password});
        let response = send(app, Method::POST, "/api/users", None, Some(credentials.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(app, Method::POST, "/api/login", None, Some(credentials)).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn healthz_is_plain_text() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = send(&app, Method::GET, "/api/healthz", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(text_body(response).await, "OK");
    }

    #[tokio::test]
    async fn login_refresh_revoke_cycle() {
        let (state, _dir) = test_state();
        let app = router(state);

        let login = sign_up_and_login(&app, "a@x.com", "pw1").await;
        assert_eq!(login["id"], 1);
        assert_eq!(login["email"], "a@x.com");
        assert_eq!(login["is_chirpy_red"], false);
        assert!(login.get("password").is_none());

        let refresh_auth = bearer(&login["refresh_token"]);
        let response = send(&app, Method::POST, "/api/refresh", Some(&refresh_auth), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let refreshed = json_body(response).await;

        // The refreshed access token authorizes posting.
        let response = send(
            &app,
            Method::POST,
            "/api/chirps",
            Some(&bearer(&refreshed["token"])),
            Some(json!({"body": "hello"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(&app, Method::POST, "/api/revoke", Some(&refresh_auth), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::POST, "/api/refresh", Some(&refresh_auth), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"error": "invalid or expired token"})
        );
    }

    #[tokio::test]
    async fn token_kinds_are_enforced_over_http() {
        let (state, _dir) = test_state();
        let app = router(state);
        let login = sign_up_and_login(&app, "a@x.com", "pw1").await;

        // Refresh token cannot post.
        let response = send(
            &app,
            Method::POST,
            "/api/chirps",
            Some(&bearer(&login["refresh_token"])),
            Some(json!({"body": "hello"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Access token cannot refresh.
        let response = send(
            &app,
            Method::POST,
            "/api/refresh",
            Some(&bearer(&login["token"])),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // No header at all.
        let response = send(
            &app,
            Method::POST,
            "/api/chirps",
            None,
            Some(json!({"body": "hello"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_login_hides_which_field_was_wrong() {
        let (state, _dir) = test_state();
        let app = router(state);
        sign_up_and_login(&app, "a@x.com", "pw1").await;

        for credentials in [
            json!({"email": "a@x.com", "password": "wrong"}),
            json!({"email": "nobody@x.com", "password": "pw1"}),
        ] {
            let response = send(&app, Method::POST, "/api/login", None, Some(credentials)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                json_body(response).await,
                json!({"error": "incorrect email or password"})
            );
        }
    }

    #[tokio::test]
    async fn chirp_rules_and_ownership() {
        let (state, _dir) = test_state();
        let app = router(state);
        let alice = sign_up_and_login(&app, "alice@x.com", "pw1").await;
        let bob = sign_up_and_login(&app, "bob@x.com", "pw2").await;
        let alice_auth = bearer(&alice["token"]);
        let bob_auth = bearer(&bob["token"]);

        let response = send(
            &app,
            Method::POST,
            "/api/chirps",
            Some(&alice_auth),
            Some(json!({"body": "x".repeat(141)})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Chirp is too long"}));

        let response = send(
            &app,
            Method::POST,
            "/api/chirps",
            Some(&alice_auth),
            Some(json!({"body": "what a kerfuffle"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let chirp = json_body(response).await;
        assert_eq!(chirp, json!({"id": 1, "author_id": 1, "body": "what a ****"}));

        let response = send(&app, Method::DELETE, "/api/chirps/1", Some(&bob_auth), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, Method::DELETE, "/api/chirps/1", Some(&alice_auth), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/api/chirps/1", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/api/chirps/abc", None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chirp_listing_filters() {
        let (state, _dir) = test_state();
        let app = router(state);
        let alice = sign_up_and_login(&app, "alice@x.com", "pw1").await;
        let bob = sign_up_and_login(&app, "bob@x.com", "pw2").await;

        for (login, text) in [(&alice, "a1"), (&bob, "b1"), (&alice, "a2")] {
            let response = send(
                &app,
                Method::POST,
                "/api/chirps",
                Some(&bearer(&login["token"])),
                Some(json!({"body": text})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&app, Method::GET, "/api/chirps?author_id=1&sort=desc", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bodies: Vec<String> = json_body(response)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(bodies, vec!["a2", "a1"]);

        let response = send(&app, Method::GET, "/api/chirps?sort=sideways", None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_email_and_profile_update() {
        let (state, _dir) = test_state();
        let app = router(state);
        let login = sign_up_and_login(&app, "a@x.com", "pw1").await;

        let response = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"email": "a@x.com", "password": "other"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::PUT,
            "/api/users",
            Some(&bearer(&login["token"])),
            Some(json!({"email": "new@x.com", "password": "pw2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "email": "new@x.com", "is_chirpy_red": false})
        );

        let response = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "new@x.com", "password": "pw2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (state, _dir) = test_state();
        let app = router(state);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn polka_upgrade_over_http() {
        let (state, _dir) = test_state();
        let app = router(state);
        sign_up_and_login(&app, "a@x.com", "pw1").await;
        let event = json!({"event": "user.upgraded", "data": {"user_id": 1}});

        let response = send(
            &app,
            Method::POST,
            "/api/polka/webhooks",
            Some("ApiKey wrong"),
            Some(event.clone()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, Method::POST, "/api/polka/webhooks", None, Some(event.clone())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({"error": "invalid API key"}));

        let response = send(
            &app,
            Method::POST,
            "/api/polka/webhooks",
            Some(&format!("ApiKey {TEST_POLKA_KEY}")),
            Some(event),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "a@x.com", "password": "pw1"})),
        )
        .await;
        assert_eq!(json_body(response).await["is_chirpy_red"], true);
    }

    #[tokio::test]
    async fn static_assets_are_counted() {
        let (state, dir) = test_state();
        std::fs::write(dir.path().join("index.html"), "<h1>Chirpy</h1>").unwrap();
        let app = router(state.clone());

        let response = send(&app, Method::GET, "/app/index.html", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, "<h1>Chirpy</h1>");
        send(&app, Method::GET, "/app/index.html", None, None).await;

        let response = send(&app, Method::GET, "/admin/metrics", None, None).await;
        assert!(text_body(response)
            .await
            .contains("Chirpy has been visited 2 times!"));

        let response = send(&app, Method::GET, "/api/reset", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.hits.get(), 0);
    }

    #[tokio::test]
    async fn database_file_is_not_served_from_assets() {
        let (state, dir) = test_state();
        assert!(state.store.path().starts_with(dir.path()));
        let app = router(state.clone());
        sign_up_and_login(&app, "a@x.com", "pw1").await;
        std::fs::write(state.store.temp_path(), b"{}").unwrap();

        for uri in [
            "/app/database.json",
            "/app/database%2Ejson",
            "/app/./database.json",
            "/app/database.tmp",
        ] {
            let response = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = text_body(response).await;
            assert!(!body.contains("$2b$"), "{uri}");
        }

        std::fs::write(dir.path().join("logo.txt"), "chirp").unwrap();
        let response = send(&app, Method::GET, "/app/logo.txt", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/chirps/{chirp_id}"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
