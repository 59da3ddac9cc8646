use catalog_core::{Principal, ServiceError};
use catalog_sql::Row;

use super::{required_i64, required_str};

/// A registered API key and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub col_id: i64,
    pub col_username: String,
    pub col_apikey: String,
}

impl ApiKey {
    pub fn from_row(row: &Row) -> Result<Self, ServiceError> {
        Ok(Self {
            col_id: required_i64(row, "colId")?,
            col_username: required_str(row, "colUsername")?,
            col_apikey: required_str(row, "colApikey")?,
        })
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.col_id,
            username: self.col_username.clone(),
        }
    }
}
