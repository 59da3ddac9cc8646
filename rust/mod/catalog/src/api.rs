use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Extension, Router};
use tracing::error;

use catalog_core::{Authenticator, Principal, ServiceError};
use catalog_sql::SQLStore;

use crate::auth::api_key_middleware;
use crate::dispatch::{Dispatcher, RequestContext};

/// Request bodies above this size are refused with 413.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sql: Arc<dyn SQLStore>,
    pub auth: Arc<dyn Authenticator>,
}

/// Build the catalog router.
///
/// Every path is handed to the dispatcher, which owns resource routing.
/// The API-key middleware wraps all of them.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handle))
        .route("/{*path}", any(handle))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn handle(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    principal: Option<Extension<Principal>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return ServiceError::PayloadTooLarge(MAX_BODY_BYTES).into_response();
        }
        Err(rejection) => {
            return ServiceError::internal(format!("failed to read request body: {}", rejection.body_text()))
                .into_response();
        }
    };

    let ctx = RequestContext {
        method,
        path: uri.path().to_string(),
        headers,
        body,
        principal: principal.map(|Extension(p)| p),
    };

    match Dispatcher::new(state.sql.as_ref()).dispatch(&ctx) {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            if e.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
                error!("{} {} failed: {} ({})", ctx.method, ctx.path, e, e.error_code());
            }
            e.into_response()
        }
    }
}
