//! Payload validation against a field descriptor table.
//!
//! Pure: no I/O. Every rule for every field is evaluated and all failures
//! are returned, in table order.

use serde_json::Value;

use catalog_core::FieldMap;

use crate::field::{FieldDef, FieldKind, Mode, present};

/// Collect every validation error for `fields` under `mode`.
///
/// Required checks only apply on [`Mode::Create`]. Type and length checks
/// apply to any field that is present with a non-empty value; absent
/// fields are never flagged by them. A gated field is skipped entirely
/// unless its gate field is present.
pub fn validate(defs: &[FieldDef], fields: &FieldMap, mode: Mode) -> Vec<String> {
    let mut errors = Vec::new();

    for def in defs {
        if let Some(gate) = def.gate {
            if present(fields, gate).is_none() {
                continue;
            }
        }

        match present(fields, def.name) {
            None => {
                if mode == Mode::Create && def.required {
                    errors.push(format!("{} is required.", def.label));
                }
            }
            Some(value) => {
                if let Some(err) = check_kind(def, value) {
                    errors.push(err);
                }
            }
        }
    }

    errors
}

fn check_kind(def: &FieldDef, value: &Value) -> Option<String> {
    match def.kind {
        FieldKind::Text { max_len } => match value.as_str() {
            Some(s) if s.chars().count() > max_len => Some(format!(
                "{} length is too long. Max of {} characters.",
                def.label, max_len
            )),
            Some(_) => None,
            None => Some(invalid(def)),
        },
        FieldKind::Real => (!value.is_f64()).then(|| invalid(def)),
        FieldKind::Integer => (!(value.is_i64() || value.is_u64())).then(|| invalid(def)),
        FieldKind::Number => numeric(value).is_none().then(|| invalid(def)),
        FieldKind::Flag => None,
    }
}

/// The numeric reading of a JSON number or of a string holding one.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn invalid(def: &FieldDef) -> String {
    format!("{} is not a valid value.", def.label)
}
