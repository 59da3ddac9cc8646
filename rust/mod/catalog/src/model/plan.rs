use serde::Serialize;

use catalog_core::ServiceError;
use catalog_sql::Row;

use super::{optional_str, required_i64};
use crate::field::FieldDef;

/// Plan: a priced offering inside a category, with up to two billing tiers.
///
/// Identified by `(colPid, colId)`: the owning category and the plan's
/// ordinal within it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub col_id: i64,
    pub col_pid: i64,
    pub col_name: Option<String>,
    pub col_min: Option<f64>,
    pub col_max: Option<f64>,
    pub col_tier1term: Option<String>,
    pub col_tier1cost: Option<f64>,
    pub col_tier1sku: Option<i64>,
    pub col_tier2term: Option<String>,
    pub col_tier2cost: Option<f64>,
    pub col_tier2sku: Option<i64>,
}

pub const FIELDS: &[FieldDef] = &[
    FieldDef::text("colName", "Plan", 100),
    FieldDef::real("colMin", "Minimum cost"),
    FieldDef::real("colMax", "Maximum cost"),
    FieldDef::text("colTier1term", "Tier 1 term", 10).required(),
    FieldDef::real("colTier1cost", "Tier 1 cost"),
    FieldDef::integer("colTier1sku", "Tier 1 SKU"),
    FieldDef::text("colTier2term", "Tier 2 term", 10).gated_by("colTier2term"),
    FieldDef::real("colTier2cost", "Tier 2 cost").gated_by("colTier2term"),
    FieldDef::integer("colTier2sku", "Tier 2 SKU").gated_by("colTier2term"),
];

impl Plan {
    pub fn from_row(row: &Row) -> Result<Self, ServiceError> {
        Ok(Self {
            col_id: required_i64(row, "colId")?,
            col_pid: required_i64(row, "colPid")?,
            col_name: optional_str(row, "colName"),
            col_min: row.get_f64("colMin"),
            col_max: row.get_f64("colMax"),
            col_tier1term: optional_str(row, "colTier1term"),
            col_tier1cost: row.get_f64("colTier1cost"),
            col_tier1sku: row.get_i64("colTier1sku"),
            col_tier2term: optional_str(row, "colTier2term"),
            col_tier2cost: row.get_f64("colTier2cost"),
            col_tier2sku: row.get_i64("colTier2sku"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_sql::Value;

    #[test]
    fn wire_names_match_columns() {
        let row = Row {
            columns: vec![
                ("colId".into(), Value::Integer(2)),
                ("colPid".into(), Value::Integer(1)),
                ("colTier1term".into(), Value::Text("monthly".into())),
                ("colTier1sku".into(), Value::Integer(100)),
            ],
        };
        let json = serde_json::to_value(Plan::from_row(&row).unwrap()).unwrap();
        assert_eq!(json["colId"], 2);
        assert_eq!(json["colPid"], 1);
        assert_eq!(json["colTier1term"], "monthly");
        assert_eq!(json["colTier1sku"], 100);
        assert!(json["colTier2term"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 11);
    }
}
