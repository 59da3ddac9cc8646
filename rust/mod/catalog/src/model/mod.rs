//! Resource records and their field descriptor tables.
//!
//! Field names on the wire are the column names (`colId`, `colName`, ...).

pub mod addon;
pub mod api_key;
pub mod category;
pub mod plan;

pub use addon::Addon;
pub use api_key::ApiKey;
pub use category::Category;
pub use plan::Plan;

use catalog_core::ServiceError;
use catalog_sql::Row;

/// Read a column that the schema declares NOT NULL.
#[track_caller]
pub(crate) fn required_i64(row: &Row, column: &str) -> Result<i64, ServiceError> {
    match row.get_i64(column) {
        Some(v) => Ok(v),
        None => Err(ServiceError::internal(format!("column {} is missing or not an integer", column))),
    }
}

#[track_caller]
pub(crate) fn required_str(row: &Row, column: &str) -> Result<String, ServiceError> {
    match row.get_str(column) {
        Some(v) => Ok(v.to_string()),
        None => Err(ServiceError::internal(format!("column {} is missing or not text", column))),
    }
}

/// Optional text column. Non-text storage (a number written into a text
/// column) is rendered as text.
pub(crate) fn optional_str(row: &Row, column: &str) -> Option<String> {
    use catalog_sql::Value;
    match row.get(column)? {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        _ => None,
    }
}
