//! Per-resource request handling, generic over the gateway.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use catalog_core::{ServiceError, json_response, parse_field_map};

use crate::field::Mode;
use crate::gateway::Gateway;
use crate::validate::validate;

const COLLECTION_METHODS: &str = "GET, POST";
const ITEM_METHODS: &str = "GET, PATCH, DELETE";

/// A successful outcome: status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl Reply {
    fn ok(body: serde_json::Value) -> Self {
        Self { status: StatusCode::OK, body }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        json_response(self.status, &self.body)
    }
}

/// Maps a method and optional item id onto gateway calls for one resource.
pub struct Controller<G> {
    gateway: G,
}

impl<G: Gateway> Controller<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Handle one request against the collection (`item` is `None`) or a
    /// single item within `scope`.
    pub fn process_request(
        &self,
        method: &Method,
        scope: &G::Scope,
        item: Option<&str>,
        body: &[u8],
    ) -> Result<Reply, ServiceError> {
        match item {
            None => self.collection(method, scope, body),
            Some(raw) => self.item(method, scope, raw, body),
        }
    }

    fn collection(&self, method: &Method, scope: &G::Scope, body: &[u8]) -> Result<Reply, ServiceError> {
        match *method {
            Method::GET => Ok(Reply::ok(to_json(&self.gateway.list_all(scope)?)?)),
            Method::POST => {
                let fields = parse_field_map(body);
                let errors = validate(G::FIELDS, &fields, Mode::Create);
                if !errors.is_empty() {
                    return Err(ServiceError::Validation(errors));
                }
                let key = self.gateway.create(scope, &fields)?;
                Ok(Reply {
                    status: StatusCode::CREATED,
                    body: G::created_body(&key),
                })
            }
            _ => Err(ServiceError::MethodNotAllowed(COLLECTION_METHODS)),
        }
    }

    fn item(&self, method: &Method, scope: &G::Scope, raw: &str, body: &[u8]) -> Result<Reply, ServiceError> {
        let not_found = || ServiceError::NotFound(G::not_found_message(scope, raw));

        // Anything but a canonical id can never match a row.
        let id = parse_id(raw).ok_or_else(not_found)?;
        let key = G::key_in(scope, id);
        let record = self.gateway.get_single(&key)?.ok_or_else(not_found)?;

        match *method {
            Method::GET => Ok(Reply::ok(to_json(&record)?)),
            Method::PATCH => {
                let fields = parse_field_map(body);
                let errors = validate(G::FIELDS, &fields, Mode::Update);
                if !errors.is_empty() {
                    return Err(ServiceError::Validation(errors));
                }
                let rows = self.gateway.update(&key, &fields)?;
                Ok(Reply::ok(serde_json::json!({
                    "message": format!("{} updated", G::NAME),
                    "rows": rows,
                })))
            }
            Method::DELETE => {
                let rows = self.gateway.delete(&key)?;
                Ok(Reply::ok(serde_json::json!({
                    "message": format!("{} deleted", G::NAME),
                    "rows": rows,
                })))
            }
            _ => Err(ServiceError::MethodNotAllowed(ITEM_METHODS)),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::internal(e.to_string()))
}

/// Parse a path id. Only canonical decimal digits are ids, so `+1`, `01`
/// and ` 1` never alias `1`.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if canonical { raw.parse().ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{CategoryGateway, PlanGateway};
    use crate::schema::init_schema;
    use catalog_sql::SqliteStore;
    use serde_json::json;

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        init_schema(&s).unwrap();
        s
    }

    #[test]
    fn create_then_get() {
        let s = store();
        let c = Controller::new(CategoryGateway::new(&s));
        let created = c
            .process_request(&Method::POST, &(), None, br#"{"colName":"Hosting"}"#)
            .unwrap();
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body, json!({"message": "Category created", "id": "1"}));

        let got = c.process_request(&Method::GET, &(), Some("1"), b"").unwrap();
        assert_eq!(got.body["colName"], "Hosting");
        assert_eq!(got.body["colTsFlag"], false);
    }

    #[test]
    fn post_with_invalid_body_is_validated_as_empty() {
        let s = store();
        let c = Controller::new(CategoryGateway::new(&s));
        let err = c.process_request(&Method::POST, &(), None, b"not json").unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert_eq!(errors, vec!["Category is required."]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn collection_rejects_other_methods() {
        let s = store();
        let c = Controller::new(CategoryGateway::new(&s));
        assert!(matches!(
            c.process_request(&Method::PUT, &(), None, b""),
            Err(ServiceError::MethodNotAllowed("GET, POST"))
        ));
    }

    #[test]
    fn missing_item_is_checked_before_method() {
        let s = store();
        let c = Controller::new(CategoryGateway::new(&s));
        let err = c.process_request(&Method::PUT, &(), Some("5"), b"").unwrap_err();
        assert_eq!(err.to_string(), "Category with ID 5 not found");

        c.process_request(&Method::POST, &(), None, br#"{"colName":"x"}"#).unwrap();
        assert!(matches!(
            c.process_request(&Method::PUT, &(), Some("1"), b""),
            Err(ServiceError::MethodNotAllowed("GET, PATCH, DELETE"))
        ));
    }

    #[test]
    fn non_numeric_item_is_not_found() {
        let s = store();
        let c = Controller::new(PlanGateway::new(&s));
        let err = c.process_request(&Method::GET, &4, Some("abc"), b"").unwrap_err();
        assert_eq!(err.to_string(), "Plan in category 4 with ID abc not found");
    }

    #[test]
    fn only_canonical_ids_parse() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("120"), Some(120));
        for raw in ["", "+1", "-1", "01", "00", " 1", "1.0", "1e2", "99999999999999999999"] {
            assert_eq!(parse_id(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn aliased_item_id_is_not_found() {
        let s = store();
        let c = Controller::new(CategoryGateway::new(&s));
        c.process_request(&Method::POST, &(), None, br#"{"colName":"x"}"#).unwrap();
        for raw in ["+1", "01"] {
            let err = c.process_request(&Method::GET, &(), Some(raw), b"").unwrap_err();
            assert_eq!(err.to_string(), format!("Category with ID {raw} not found"));
        }
    }

    #[test]
    fn patch_with_no_qualifying_fields_reports_zero_rows() {
        let s = store();
        let c = Controller::new(PlanGateway::new(&s));
        c.process_request(&Method::POST, &1, None, br#"{"colTier1term":"monthly"}"#)
            .unwrap();
        let reply = c
            .process_request(&Method::PATCH, &1, Some("1"), br#"{"unknown": 1}"#)
            .unwrap();
        assert_eq!(reply.body, json!({"message": "Plan updated", "rows": 0}));
    }
}
