use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self as axum_mw, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::metrics::stream;
use crate::AppState;

/// Builds the collector `Router`: ingestion, query routes and CORS.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Ingestion ───────────────────────────────────────────
        .route("/stream", get(stream::stream_handler))
        // ── Query ───────────────────────────────────────────────
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::list_metrics))
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(cors_policy())
        .layer(axum_mw::from_fn(answer_options))
}

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Any origin, GET/POST/OPTIONS, `Content-Type` only.
fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Outermost layer: every OPTIONS request ends here with an empty 204
/// carrying the same allow headers `cors_policy` puts on other responses.
async fn answer_options(req: Request, next: Next) -> Response {
    if req.method() != Method::OPTIONS {
        return next.run(req).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
