use catalog_core::{FieldMap, ServiceError};
use catalog_sql::SQLStore;

use super::{ChildKey, ChildTable, Gateway};
use crate::field::FieldDef;
use crate::model::{Addon, addon};

/// Gateway to `tbl_addons`.
pub struct AddonGateway<'a> {
    table: ChildTable<'a>,
}

impl<'a> AddonGateway<'a> {
    pub fn new(sql: &'a dyn SQLStore) -> Self {
        Self {
            table: ChildTable {
                sql,
                table: "tbl_addons",
                fields: addon::FIELDS,
            },
        }
    }
}

impl Gateway for AddonGateway<'_> {
    type Scope = i64;
    type Key = ChildKey;
    type Record = Addon;

    const NAME: &'static str = "Addon";
    const FIELDS: &'static [FieldDef] = addon::FIELDS;

    fn list_all(&self, category: &i64) -> Result<Vec<Addon>, ServiceError> {
        self.table.list(*category)?.iter().map(Addon::from_row).collect()
    }

    fn get_single(&self, key: &ChildKey) -> Result<Option<Addon>, ServiceError> {
        self.table.get(key)?.as_ref().map(Addon::from_row).transpose()
    }

    fn create(&self, category: &i64, fields: &FieldMap) -> Result<ChildKey, ServiceError> {
        self.table.create(*category, fields)
    }

    fn update(&self, key: &ChildKey, fields: &FieldMap) -> Result<u64, ServiceError> {
        self.table.update(key, fields)
    }

    fn delete(&self, key: &ChildKey) -> Result<u64, ServiceError> {
        self.table.delete(key)
    }

    fn key_in(category: &i64, id: i64) -> ChildKey {
        ChildKey { category: *category, id }
    }

    fn created_body(key: &ChildKey) -> serde_json::Value {
        serde_json::json!({ "message": "Addon created", "Category-Addon": key.to_string() })
    }

    fn not_found_message(category: &i64, id: &str) -> String {
        format!("Addon in category {} with ID {} not found", category, id)
    }
}
