use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use catalog_core::{Authenticator, Principal, ServiceError, api_key_from_headers};
use catalog_sql::SQLStore;

use crate::api::AppState;
use crate::gateway::ApiKeyGateway;

/// Authenticates callers against `tbl_apikeys`.
pub struct ApiKeyAuthenticator {
    sql: Arc<dyn SQLStore>,
}

impl ApiKeyAuthenticator {
    pub fn new(sql: Arc<dyn SQLStore>) -> Self {
        Self { sql }
    }
}

impl Authenticator for ApiKeyAuthenticator {
    fn authenticate(&self, api_key: &str) -> Result<Principal, ServiceError> {
        match ApiKeyGateway::new(self.sql.as_ref()).get_by_api_key(api_key)? {
            Some(key) => Ok(key.principal()),
            None => Err(ServiceError::Unauthorized("Invalid API key".into())),
        }
    }
}

/// API-key middleware.
///
/// Runs before any resource is touched. On success the [`Principal`] is
/// stored as a request extension.
pub async fn api_key_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let outcome = api_key_from_headers(req.headers()).and_then(|key| state.auth.authenticate(key));

    match outcome {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => {
            warn!("rejected {} {}: {}", req.method(), req.uri().path(), e);
            e.into_response()
        }
    }
}
