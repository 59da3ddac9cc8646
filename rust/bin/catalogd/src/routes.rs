//! Route registration: module routes plus public system endpoints.

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use tracing::info;

use catalog_core::json_response;

/// Build the complete router.
///
/// System endpoints are matched before any module route and sit outside
/// the API-key check. Module routers carry their own middleware.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        info!("Mounting {} module routes", name);
        app = app.merge(router);
    }
    app
}

async fn health() -> Response {
    json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

async fn version() -> Response {
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "name": "catalogd",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}
