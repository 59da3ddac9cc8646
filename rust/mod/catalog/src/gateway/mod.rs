//! Resource gateways: the only code that issues SQL.
//!
//! A gateway borrows the store for the lifetime of one request. Plans and
//! addons share the child-table helpers below; they differ only in table
//! name, descriptor table and record type.

pub mod addon;
pub mod api_key;
pub mod category;
pub mod plan;

pub use addon::AddonGateway;
pub use api_key::ApiKeyGateway;
pub use category::CategoryGateway;
pub use plan::PlanGateway;

use std::fmt;
use std::panic::Location;

use serde::Serialize;
use tracing::debug;

use catalog_core::{Fault, FieldMap, ServiceError};
use catalog_sql::{Row, SQLError, SQLStore, Value};

use crate::field::FieldDef;
use crate::update::{Columns, build_insert, build_update, update_statement};

/// CRUD surface shared by every resource.
///
/// `Scope` is what a collection lives under: nothing for categories, the
/// owning category id for plans and addons. `Key` fully identifies one
/// record.
pub trait Gateway {
    type Scope;
    type Key: fmt::Display;
    type Record: Serialize;

    /// Resource name used in response messages ("Category", "Plan", ...).
    const NAME: &'static str;

    /// Descriptor table shared by the validator and the update builder.
    const FIELDS: &'static [FieldDef];

    fn list_all(&self, scope: &Self::Scope) -> Result<Vec<Self::Record>, ServiceError>;

    /// `None` is the not-found signal.
    fn get_single(&self, key: &Self::Key) -> Result<Option<Self::Record>, ServiceError>;

    fn create(&self, scope: &Self::Scope, fields: &FieldMap) -> Result<Self::Key, ServiceError>;

    /// Apply a partial update. Returns 0 without touching the store when
    /// no field qualifies.
    fn update(&self, key: &Self::Key, fields: &FieldMap) -> Result<u64, ServiceError>;

    fn delete(&self, key: &Self::Key) -> Result<u64, ServiceError>;

    /// The key of item `id` within `scope`.
    fn key_in(scope: &Self::Scope, id: i64) -> Self::Key;

    /// Success body for a create.
    fn created_body(key: &Self::Key) -> serde_json::Value;

    /// Message for an item that does not exist. `id` is echoed as given.
    fn not_found_message(scope: &Self::Scope, id: &str) -> String;
}

/// Identity of a plan or addon: owning category plus per-category ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildKey {
    pub category: i64,
    pub id: i64,
}

impl fmt::Display for ChildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.id)
    }
}

// ── Store error conversion ──────────────────────────────────────────

/// Converts store results into service results.
///
/// A constraint violation becomes [`ServiceError::Conflict`]; anything
/// else is a storage fault tagged with the caller's source location.
pub(crate) trait StoreResultExt<T> {
    #[track_caller]
    fn or_fault(self) -> Result<T, ServiceError>;
}

impl<T> StoreResultExt<T> for Result<T, SQLError> {
    #[track_caller]
    fn or_fault(self) -> Result<T, ServiceError> {
        let location = Location::caller();
        self.map_err(|e| match e {
            SQLError::Constraint(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Storage(Fault::at(other.to_string(), location)),
        })
    }
}

// ── Child tables (plan, addon) ──────────────────────────────────────

/// A table whose rows are keyed by `(colPid, colId)`.
pub(crate) struct ChildTable<'a> {
    pub sql: &'a dyn SQLStore,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl ChildTable<'_> {
    pub fn list(&self, category: i64) -> Result<Vec<Row>, ServiceError> {
        let sql = format!("SELECT * FROM {} WHERE colPid = ?1 ORDER BY colId", self.table);
        self.sql.query(&sql, &[Value::Integer(category)]).or_fault()
    }

    pub fn get(&self, key: &ChildKey) -> Result<Option<Row>, ServiceError> {
        let sql = format!("SELECT * FROM {} WHERE colPid = ?1 AND colId = ?2", self.table);
        self.sql
            .query_one(&sql, &[Value::Integer(key.category), Value::Integer(key.id)])
            .or_fault()
    }

    /// Allocate the next ordinal and insert in one statement, so no other
    /// writer can observe the same sibling count in between.
    ///
    /// The ordinal is the sibling count plus one. Once a non-last sibling
    /// has been deleted that value is still live; the primary key rejects
    /// it and the insert is retried once past the highest ordinal in use.
    pub fn create(&self, category: i64, fields: &FieldMap) -> Result<ChildKey, ServiceError> {
        let columns = build_insert(self.fields, fields);

        let mut params = Vec::with_capacity(columns.len() + 1);
        params.push(Value::Integer(category));
        params.extend(columns.iter().map(|(_, v)| v.clone()));

        let sql = ordinal_insert_statement(self.table, &columns, NEXT_BY_COUNT);
        let row = match self.sql.query_one(&sql, &params) {
            Err(e) if e.is_constraint() => {
                debug!("{}: ordinal reissued in category {}, retrying", self.table, category);
                let sql = ordinal_insert_statement(self.table, &columns, NEXT_AFTER_MAX);
                self.sql.query_one(&sql, &params).or_fault()?
            }
            other => other.or_fault()?,
        };
        let id = row
            .and_then(|r| r.get_i64("colId"))
            .ok_or_else(|| ServiceError::internal(format!("insert into {} returned no id", self.table)))?;
        Ok(ChildKey { category, id })
    }

    pub fn update(&self, key: &ChildKey, fields: &FieldMap) -> Result<u64, ServiceError> {
        let columns = build_update(self.fields, fields);
        if columns.is_empty() {
            return Ok(0);
        }
        let sql = update_statement(self.table, &columns, &["colPid", "colId"]);
        let mut params: Vec<Value> = columns.into_iter().map(|(_, v)| v).collect();
        params.push(Value::Integer(key.category));
        params.push(Value::Integer(key.id));
        self.sql.exec(&sql, &params).or_fault()
    }

    pub fn delete(&self, key: &ChildKey) -> Result<u64, ServiceError> {
        let sql = format!("DELETE FROM {} WHERE colPid = ?1 AND colId = ?2", self.table);
        self.sql
            .exec(&sql, &[Value::Integer(key.category), Value::Integer(key.id)])
            .or_fault()
    }
}

/// Ordinal expressions for [`ordinal_insert_statement`].
const NEXT_BY_COUNT: &str = "COUNT(*) + 1";
const NEXT_AFTER_MAX: &str = "COALESCE(MAX(colId), 0) + 1";

/// `INSERT INTO t (colId, colPid, a, b) SELECT <next>, ?1, ?2, ?3
/// FROM t WHERE colPid = ?1 RETURNING colId`
fn ordinal_insert_statement(table: &str, columns: &Columns, next: &str) -> String {
    let mut names = vec!["colId", "colPid"];
    let mut values = vec![next.to_string(), "?1".to_string()];
    for (i, (col, _)) in columns.iter().enumerate() {
        names.push(*col);
        values.push(format!("?{}", i + 2));
    }
    format!(
        "INSERT INTO {table} ({}) SELECT {} FROM {table} WHERE colPid = ?1 RETURNING colId",
        names.join(", "),
        values.join(", "),
    )
}
