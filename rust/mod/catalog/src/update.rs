//! Partial-update builder.
//!
//! Turns a sparse field map into the ordered column list of an UPDATE or
//! INSERT. Column names only ever come from the descriptor table, never
//! from the payload, and every value is bound as a parameter.

use serde_json::Value as JsonValue;

use catalog_core::FieldMap;
use catalog_sql::Value;

use crate::field::{FieldDef, FieldKind, UpdateRule, present};
use crate::validate::numeric;

/// Ordered `(column, value)` pairs, in descriptor order.
pub type Columns = Vec<(&'static str, Value)>;

/// Columns an UPDATE should set for this payload.
///
/// `NonEmpty` fields are included only when their value is non-empty;
/// `Present` fields whenever the key exists. An empty result means there
/// is nothing to write.
pub fn build_update(defs: &[FieldDef], fields: &FieldMap) -> Columns {
    defs.iter()
        .filter_map(|def| {
            let value = match def.update {
                UpdateRule::NonEmpty => present(fields, def.name)?,
                UpdateRule::Present => fields.get(def.name)?,
            };
            Some((def.name, to_sql_value(def.kind, value)))
        })
        .collect()
}

/// Columns an INSERT should write: every recognized key with a non-null
/// value. Absent columns fall back to the table default.
pub fn build_insert(defs: &[FieldDef], fields: &FieldMap) -> Columns {
    defs.iter()
        .filter_map(|def| {
            let value = fields.get(def.name).filter(|v| !v.is_null())?;
            Some((def.name, to_sql_value(def.kind, value)))
        })
        .collect()
}

/// Render `UPDATE table SET a = ?1, b = ?2 WHERE k1 = ?3 AND k2 = ?4`.
///
/// The caller binds the column values first, then the key values, in the
/// order given.
pub fn update_statement(table: &str, columns: &Columns, keys: &[&str]) -> String {
    let sets: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{} = ?{}", col, i + 1))
        .collect();
    let conds: Vec<String> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| format!("{} = ?{}", key, columns.len() + i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        sets.join(", "),
        conds.join(" AND ")
    )
}

/// Convert a JSON value for a column of the given kind into a bind value.
///
/// Strings for a [`FieldKind::Number`] column bind as reals, or as NULL
/// when blank. Other strings stay text and are left to the column's
/// affinity.
pub fn to_sql_value(kind: FieldKind, value: &JsonValue) -> Value {
    match (kind, value) {
        (_, JsonValue::Null) => Value::Null,
        (FieldKind::Flag, v) => Value::Bool(truthy(v)),
        (FieldKind::Number, JsonValue::String(_)) => numeric(value).map_or(Value::Null, Value::Real),
        (_, JsonValue::String(s)) => Value::Text(s.clone()),
        (FieldKind::Text { .. }, v) => Value::Text(v.to_string()),
        (FieldKind::Integer, JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Real),
        },
        (FieldKind::Real | FieldKind::Number, JsonValue::Number(n)) => {
            n.as_f64().map_or(Value::Null, Value::Real)
        }
        (_, JsonValue::Bool(b)) => Value::Integer(*b as i64),
        (_, v) => Value::Text(v.to_string()),
    }
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty() && s != "0",
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}
