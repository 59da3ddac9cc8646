use serde::Serialize;

use catalog_core::ServiceError;
use catalog_sql::Row;

use super::{optional_str, required_i64};
use crate::field::FieldDef;

/// Addon: an optional extra sold within a category.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub col_id: i64,
    pub col_pid: i64,
    pub col_title: Option<String>,
    pub col_cost: Option<f64>,
    pub col_sku: Option<i64>,
}

pub const FIELDS: &[FieldDef] = &[
    FieldDef::text("colTitle", "Title", 100),
    FieldDef::real("colCost", "Addon cost"),
    FieldDef::integer("colSku", "Addon SKU"),
];

impl Addon {
    pub fn from_row(row: &Row) -> Result<Self, ServiceError> {
        Ok(Self {
            col_id: required_i64(row, "colId")?,
            col_pid: required_i64(row, "colPid")?,
            col_title: optional_str(row, "colTitle"),
            col_cost: row.get_f64("colCost"),
            col_sku: row.get_i64("colSku"),
        })
    }
}
