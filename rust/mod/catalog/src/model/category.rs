use serde::Serialize;

use catalog_core::ServiceError;
use catalog_sql::Row;

use super::{required_i64, required_str};
use crate::field::FieldDef;

/// Category: top-level grouping that owns plans and addons.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Server-assigned, sequential.
    pub col_id: i64,

    pub col_name: String,

    /// Stored as 0/1, always rendered as a boolean.
    pub col_ts_flag: bool,

    pub col_ts_percent: Option<f64>,
}

pub const FIELDS: &[FieldDef] = &[
    FieldDef::text("colName", "Category", 50).required(),
    FieldDef::flag("colTsFlag", "TS flag").write_when_present(),
    FieldDef::number("colTsPercent", "TS percent").write_when_present(),
];

impl Category {
    pub fn from_row(row: &Row) -> Result<Self, ServiceError> {
        Ok(Self {
            col_id: required_i64(row, "colId")?,
            col_name: required_str(row, "colName")?,
            col_ts_flag: row.get_bool("colTsFlag").unwrap_or(false),
            col_ts_percent: row.get_f64("colTsPercent"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_sql::Value;

    #[test]
    fn flag_renders_as_bool() {
        let row = Row {
            columns: vec![
                ("colId".into(), Value::Integer(3)),
                ("colName".into(), Value::Text("Hosting".into())),
                ("colTsFlag".into(), Value::Integer(1)),
                ("colTsPercent".into(), Value::Real(7.5)),
            ],
        };
        let json = serde_json::to_value(Category::from_row(&row).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "colId": 3,
                "colName": "Hosting",
                "colTsFlag": true,
                "colTsPercent": 7.5,
            })
        );
    }

    #[test]
    fn null_flag_reads_false() {
        let row = Row {
            columns: vec![
                ("colId".into(), Value::Integer(1)),
                ("colName".into(), Value::Text("x".into())),
                ("colTsFlag".into(), Value::Null),
                ("colTsPercent".into(), Value::Null),
            ],
        };
        let c = Category::from_row(&row).unwrap();
        assert!(!c.col_ts_flag);
        assert_eq!(c.col_ts_percent, None);
    }

    #[test]
    fn missing_id_is_internal_error() {
        let row = Row { columns: vec![] };
        assert!(matches!(
            Category::from_row(&row),
            Err(ServiceError::Internal(_))
        ));
    }
}
