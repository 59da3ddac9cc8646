use catalog_core::ServiceError;
use catalog_sql::{SQLStore, Value};

use super::StoreResultExt;
use crate::model::ApiKey;

/// Lookups on `tbl_apikeys`.
pub struct ApiKeyGateway<'a> {
    sql: &'a dyn SQLStore,
}

impl<'a> ApiKeyGateway<'a> {
    pub fn new(sql: &'a dyn SQLStore) -> Self {
        Self { sql }
    }

    pub fn get_by_api_key(&self, key: &str) -> Result<Option<ApiKey>, ServiceError> {
        self.fetch("SELECT * FROM tbl_apikeys WHERE colApikey = ?1", Value::from(key))
    }

    pub fn get_by_username(&self, username: &str) -> Result<Option<ApiKey>, ServiceError> {
        self.fetch("SELECT * FROM tbl_apikeys WHERE colUsername = ?1", Value::from(username))
    }

    /// Register a key. A duplicate username or key is a conflict.
    pub fn insert(&self, username: &str, key: &str) -> Result<i64, ServiceError> {
        let row = self
            .sql
            .query_one(
                "INSERT INTO tbl_apikeys (colUsername, colApikey) VALUES (?1, ?2) RETURNING colId",
                &[Value::from(username), Value::from(key)],
            )
            .or_fault()?;
        row.and_then(|r| r.get_i64("colId"))
            .ok_or_else(|| ServiceError::internal("api key insert returned no id"))
    }

    fn fetch(&self, sql: &str, param: Value) -> Result<Option<ApiKey>, ServiceError> {
        let row = self.sql.query_one(sql, &[param]).or_fault()?;
        row.as_ref().map(ApiKey::from_row).transpose()
    }
}
