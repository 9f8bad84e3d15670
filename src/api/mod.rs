use crate::users::UserService;
use anyhow::{Context, Result};
use axum::{
    Extension, Json, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
};
use handlers::{assets, health, method_not_allowed, user_login, user_register};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

pub mod handlers;
mod openapi;

pub use handlers::assets::PublicDir;
pub use openapi::openapi;

/// Build the application router with its middleware stack.
///
/// JSON endpoints live under `/api`; everything else falls through to the
/// static file handler.
#[must_use]
pub fn router(service: Arc<UserService>, public: PublicDir) -> Router {
    Router::new()
        .route(
            "/api/register",
            post(user_register::register).fallback(method_not_allowed),
        )
        .route(
            "/api/login",
            post(user_login::login).fallback(method_not_allowed),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(openapi()) }).fallback(method_not_allowed),
        )
        .route("/health", get(health::health).options(health::health))
        .fallback(assets::serve)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(service))
                .layer(Extension(Arc::new(public))),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, service: Arc<UserService>, public: PublicDir) -> Result<()> {
    let app = router(service, public);

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{MemoryStore, RegistrationProfile, Sha256Hasher};
    use anyhow::Result;
    use axum::{
        body::to_bytes,
        http::{Method, StatusCode},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with(profile: RegistrationProfile, public: &std::path::Path) -> Router {
        let service = UserService::new(Arc::new(MemoryStore::new()), Arc::new(Sha256Hasher))
            .with_profile(profile);
        router(Arc::new(service), PublicDir::new(public))
    }

    fn app() -> Router {
        app_with(RegistrationProfile::Basic, std::path::Path::new("public"))
    }

    fn post_json(uri: &str, body: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))?)
    }

    async fn json_body(response: Response) -> Result<Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tokio::test]
    async fn register_duplicate_and_login_flow() -> Result<()> {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/register",
                r#"{"email":"a@x.com","password":"secret"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await?,
            json!({"success": true, "user": {"email": "a@x.com", "name": "a"}})
        );

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/register",
                r#"{"email":"a@x.com","password":"other"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"success": false, "message": "Email already exists"})
        );

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/login",
                r#"{"email":"a@x.com","password":"wrong"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await?,
            json!({"success": false, "message": "Invalid email or password"})
        );

        let response = app
            .oneshot(post_json(
                "/api/login",
                r#"{"email":"a@x.com","password":"secret"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await?,
            json!({"success": true, "user": {"email": "a@x.com", "name": "a"}})
        );
        Ok(())
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() -> Result<()> {
        for uri in ["/api/register", "/api/login"] {
            let response = app().oneshot(post_json(uri, "{nope")?).await?;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await?,
                json!({"success": false, "message": "Invalid JSON"})
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn array_bodies_are_invalid_json() -> Result<()> {
        let app = app();
        let cases = [
            ("/api/register", r#"["a@x.com","secret",null,null]"#),
            ("/api/login", r#"["a@x.com","secret"]"#),
        ];
        for (uri, body) in cases {
            let response = app.clone().oneshot(post_json(uri, body)?).await?;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await?,
                json!({"success": false, "message": "Invalid JSON"})
            );
        }

        // the positional register must not have created an account
        let response = app
            .oneshot(post_json(
                "/api/login",
                r#"{"email":"a@x.com","password":"secret"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn body_without_content_type_is_parsed() -> Result<()> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/register")
            .body(Body::from(r#"{"email":"a@x.com","password":"secret"}"#))?;
        let response = app().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn empty_password_is_missing_field() -> Result<()> {
        let response = app()
            .oneshot(post_json(
                "/api/register",
                r#"{"email":"a@x.com","password":""}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"success": false, "message": "Email and password are required"})
        );

        let response = app()
            .oneshot(post_json("/api/login", r#"{"email":"a@x.com"}"#)?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn extended_profile_reports_mismatch() -> Result<()> {
        let app = app_with(
            RegistrationProfile::Extended,
            std::path::Path::new("public"),
        );
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/register",
                r#"{"name":"Alice","email":"a@x.com","password":"pw1","confirmPassword":"pw2"}"#,
            )?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"success": false, "message": "Passwords do not match"})
        );

        let response = app
            .oneshot(post_json(
                "/api/register",
                r#"{"name":"Alice","email":"a@x.com","password":"pw1","confirmPassword":"pw1"}"#,
            )?)
            .await?;
        assert_eq!(
            json_body(response).await?,
            json!({"success": true, "user": {"email": "a@x.com", "name": "Alice"}})
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_post_on_api_is_method_not_allowed() -> Result<()> {
        for (method, uri) in [
            (Method::GET, "/api/register"),
            (Method::PUT, "/api/login"),
            (Method::DELETE, "/api/register"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())?;
            let response = app().oneshot(request).await?;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                json_body(response).await?,
                json!({"success": false, "message": "Method Not Allowed"})
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn static_files_are_served() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>")?;
        let app = app_with(RegistrationProfile::Basic, dir.path());

        let request = Request::builder().uri("/").body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(HeaderValue::as_bytes),
            Some("text/html".as_bytes())
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&bytes[..], b"<h1>hi</h1>");

        let request = Request::builder().uri("/missing.css").body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&bytes[..], b"404 Not Found");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/index.html")
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }

    #[tokio::test]
    async fn request_id_is_propagated() -> Result<()> {
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())?;
        let response = app().oneshot(request).await?;
        assert_eq!(
            response.headers().get("x-request-id").map(HeaderValue::as_bytes),
            Some("req-123".as_bytes())
        );

        let request = Request::builder().uri("/health").body(Body::empty())?;
        let response = app().oneshot(request).await?;
        assert!(response.headers().contains_key("x-request-id"));
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_store_status() -> Result<()> {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-app"));
        let body = json_body(response).await?;
        assert_eq!(body["store"], "ok");
        assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_is_served() -> Result<()> {
        let response = app()
            .oneshot(Request::builder().uri("/api/openapi.json").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await?;
        assert!(body["paths"].get("/api/login").is_some());
        Ok(())
    }
}
