use catalog_core::{FieldMap, ServiceError};
use catalog_sql::{SQLStore, Value};

use super::{Gateway, StoreResultExt};
use crate::field::FieldDef;
use crate::model::{Category, category};
use crate::update::{build_insert, build_update, update_statement};

const TABLE: &str = "tbl_category";

/// Gateway to `tbl_category`.
pub struct CategoryGateway<'a> {
    sql: &'a dyn SQLStore,
}

impl<'a> CategoryGateway<'a> {
    pub fn new(sql: &'a dyn SQLStore) -> Self {
        Self { sql }
    }
}

impl Gateway for CategoryGateway<'_> {
    type Scope = ();
    type Key = i64;
    type Record = Category;

    const NAME: &'static str = "Category";
    const FIELDS: &'static [FieldDef] = category::FIELDS;

    fn list_all(&self, _scope: &()) -> Result<Vec<Category>, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM tbl_category ORDER BY colId", &[])
            .or_fault()?;
        rows.iter().map(Category::from_row).collect()
    }

    fn get_single(&self, id: &i64) -> Result<Option<Category>, ServiceError> {
        let row = self
            .sql
            .query_one("SELECT * FROM tbl_category WHERE colId = ?1", &[Value::Integer(*id)])
            .or_fault()?;
        row.as_ref().map(Category::from_row).transpose()
    }

    fn create(&self, _scope: &(), fields: &FieldMap) -> Result<i64, ServiceError> {
        let columns = build_insert(category::FIELDS, fields);
        let names: Vec<&str> = columns.iter().map(|(c, _)| *c).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING colId",
            TABLE,
            names.join(", "),
            placeholders.join(", "),
        );
        let params: Vec<Value> = columns.into_iter().map(|(_, v)| v).collect();

        let row = self.sql.query_one(&sql, &params).or_fault()?;
        row.and_then(|r| r.get_i64("colId"))
            .ok_or_else(|| ServiceError::internal("category insert returned no id"))
    }

    fn update(&self, id: &i64, fields: &FieldMap) -> Result<u64, ServiceError> {
        let columns = build_update(category::FIELDS, fields);
        if columns.is_empty() {
            return Ok(0);
        }
        let sql = update_statement(TABLE, &columns, &["colId"]);
        let mut params: Vec<Value> = columns.into_iter().map(|(_, v)| v).collect();
        params.push(Value::Integer(*id));
        self.sql.exec(&sql, &params).or_fault()
    }

    fn delete(&self, id: &i64) -> Result<u64, ServiceError> {
        self.sql
            .exec("DELETE FROM tbl_category WHERE colId = ?1", &[Value::Integer(*id)])
            .or_fault()
    }

    fn key_in(_scope: &(), id: i64) -> i64 {
        id
    }

    fn created_body(id: &i64) -> serde_json::Value {
        serde_json::json!({ "message": "Category created", "id": id.to_string() })
    }

    fn not_found_message(_scope: &(), id: &str) -> String {
        format!("Category with ID {} not found", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;
    use catalog_sql::SqliteStore;
    use serde_json::json;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        init_schema(&store).unwrap();
        store
    }

    fn map(v: serde_json::Value) -> FieldMap {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn create_get_list() {
        let s = store();
        let gw = CategoryGateway::new(&s);
        let a = gw.create(&(), &map(json!({"colName": "Hosting", "colTsFlag": true, "colTsPercent": 7.5}))).unwrap();
        let b = gw.create(&(), &map(json!({"colName": "Email"}))).unwrap();
        assert_eq!((a, b), (1, 2));

        let got = gw.get_single(&a).unwrap().unwrap();
        assert_eq!(got.col_name, "Hosting");
        assert!(got.col_ts_flag);
        assert_eq!(got.col_ts_percent, Some(7.5));

        // Defaults apply to columns that were not sent.
        let email = gw.get_single(&b).unwrap().unwrap();
        assert!(!email.col_ts_flag);
        assert_eq!(email.col_ts_percent, None);

        let all = gw.list_all(&()).unwrap();
        assert_eq!(all.iter().map(|c| c.col_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn get_missing_is_none() {
        let s = store();
        assert!(CategoryGateway::new(&s).get_single(&42).unwrap().is_none());
    }

    #[test]
    fn update_without_qualifying_fields_is_noop() {
        let s = store();
        let gw = CategoryGateway::new(&s);
        let id = gw.create(&(), &map(json!({"colName": "Hosting"}))).unwrap();
        assert_eq!(gw.update(&id, &map(json!({"colName": "", "other": 1}))).unwrap(), 0);
        assert_eq!(gw.get_single(&id).unwrap().unwrap().col_name, "Hosting");
    }

    #[test]
    fn update_writes_flag_and_null_percent() {
        let s = store();
        let gw = CategoryGateway::new(&s);
        let id = gw
            .create(&(), &map(json!({"colName": "Hosting", "colTsFlag": true, "colTsPercent": 5.0})))
            .unwrap();
        let rows = gw
            .update(&id, &map(json!({"colTsFlag": false, "colTsPercent": null})))
            .unwrap();
        assert_eq!(rows, 1);
        let got = gw.get_single(&id).unwrap().unwrap();
        assert!(!got.col_ts_flag);
        assert_eq!(got.col_ts_percent, None);
    }

    #[test]
    fn delete_reports_rows() {
        let s = store();
        let gw = CategoryGateway::new(&s);
        let id = gw.create(&(), &map(json!({"colName": "Hosting"}))).unwrap();
        assert_eq!(gw.delete(&id).unwrap(), 1);
        assert_eq!(gw.delete(&id).unwrap(), 0);
    }

    #[test]
    fn messages() {
        assert_eq!(
            CategoryGateway::created_body(&3),
            json!({"message": "Category created", "id": "3"})
        );
        assert_eq!(
            CategoryGateway::not_found_message(&(), "9"),
            "Category with ID 9 not found"
        );
    }
}
