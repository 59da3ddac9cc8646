//! API-key authentication.
//!
//! The HTTP layer only knows this trait. The concrete lookup (a key table
//! in the store) is injected at startup.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::ServiceError;

/// Request header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

/// Pluggable authenticator, called once per request before any resource
/// is touched.
pub trait Authenticator: Send + Sync + 'static {
    /// Resolve an API key to its owner, or reject it.
    fn authenticate(&self, api_key: &str) -> Result<Principal, ServiceError>;
}

/// Extract the API key from request headers.
///
/// A missing, empty or non-ASCII header is reported as a missing key.
pub fn api_key_from_headers(headers: &HeaderMap) -> Result<&str, ServiceError> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ServiceError::MissingApiKey)
}

/// Accepts any key. Used for testing.
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn authenticate(&self, _api_key: &str) -> Result<Principal, ServiceError> {
        Ok(Principal {
            id: 0,
            username: "anonymous".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_lookup() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            api_key_from_headers(&headers),
            Err(ServiceError::MissingApiKey)
        ));

        headers.insert("X-API-Key", HeaderValue::from_static("  "));
        assert!(matches!(
            api_key_from_headers(&headers),
            Err(ServiceError::MissingApiKey)
        ));

        headers.insert("X-API-Key", HeaderValue::from_static("abc123"));
        assert_eq!(api_key_from_headers(&headers).unwrap(), "abc123");
    }

    #[test]
    fn allow_all_accepts_any_key() {
        assert_eq!(AllowAll.authenticate("k").unwrap().id, 0);
    }
}
