//! Field descriptor tables.
//!
//! Each resource declares one static `&[FieldDef]`. The validator and the
//! partial-update builder both walk the same table, so the set of
//! recognized fields, their types and their write rules live in one place.

use serde_json::Value;

use catalog_core::FieldMap;

/// Semantic type of a column as seen from the JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String with a maximum length in characters.
    Text { max_len: usize },
    /// Must be a JSON number with a fractional representation (`5.0`, not `5`).
    Real,
    /// Must be a JSON integer.
    Integer,
    /// A JSON number or a string holding one (`7`, `7.5`, `"7.5"`).
    Number,
    /// Boolean stored as 0/1.
    Flag,
}

/// When a field takes part in a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRule {
    /// Only when the value is non-empty (see [`is_empty_value`]).
    NonEmpty,
    /// Whenever the key is present; `null` writes SQL NULL.
    Present,
}

/// Whether a payload creates a record or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// One recognized request field, which is also a column of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    /// Human label used in validation messages.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-empty on create.
    pub required: bool,
    /// Field is only validated when this other field is present.
    pub gate: Option<&'static str>,
    pub update: UpdateRule,
}

impl FieldDef {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            gate: None,
            update: UpdateRule::NonEmpty,
        }
    }

    pub const fn text(name: &'static str, label: &'static str, max_len: usize) -> Self {
        Self::new(name, label, FieldKind::Text { max_len })
    }

    pub const fn real(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Real)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub const fn flag(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn gated_by(mut self, gate: &'static str) -> Self {
        self.gate = Some(gate);
        self
    }

    pub const fn write_when_present(mut self) -> Self {
        self.update = UpdateRule::Present;
        self
    }
}

/// JSON emptiness: null, `""`, `false`, numeric zero, `[]` and `{}`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// The field's value when it is present and non-empty.
pub fn present<'a>(fields: &'a FieldMap, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !is_empty_value(v))
}
