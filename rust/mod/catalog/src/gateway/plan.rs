use catalog_core::{FieldMap, ServiceError};
use catalog_sql::SQLStore;

use super::{ChildKey, ChildTable, Gateway};
use crate::field::FieldDef;
use crate::model::{Plan, plan};

/// Gateway to `tbl_plan`.
pub struct PlanGateway<'a> {
    table: ChildTable<'a>,
}

impl<'a> PlanGateway<'a> {
    pub fn new(sql: &'a dyn SQLStore) -> Self {
        Self {
            table: ChildTable {
                sql,
                table: "tbl_plan",
                fields: plan::FIELDS,
            },
        }
    }
}

impl Gateway for PlanGateway<'_> {
    type Scope = i64;
    type Key = ChildKey;
    type Record = Plan;

    const NAME: &'static str = "Plan";
    const FIELDS: &'static [FieldDef] = plan::FIELDS;

    fn list_all(&self, category: &i64) -> Result<Vec<Plan>, ServiceError> {
        self.table.list(*category)?.iter().map(Plan::from_row).collect()
    }

    fn get_single(&self, key: &ChildKey) -> Result<Option<Plan>, ServiceError> {
        self.table.get(key)?.as_ref().map(Plan::from_row).transpose()
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
        serde_json::json!({ "message": "Plan created", "Category-Plan": key.to_string() })
    }

    fn not_found_message(category: &i64, id: &str) -> String {
        format!("Plan in category {} with ID {} not found", category, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;
    use catalog_sql::SqliteStore;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        init_schema(&store).unwrap();
        store
    }

    fn map(v: serde_json::Value) -> FieldMap {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn ordinals_are_scoped_per_category() {
        let s = store();
        let gw = PlanGateway::new(&s);
        let body = map(json!({"colTier1term": "monthly"}));
        assert_eq!(gw.create(&1, &body).unwrap(), ChildKey { category: 1, id: 1 });
        assert_eq!(gw.create(&1, &body).unwrap(), ChildKey { category: 1, id: 2 });
        assert_eq!(gw.create(&2, &body).unwrap(), ChildKey { category: 2, id: 1 });
        assert_eq!(gw.list_all(&1).unwrap().len(), 2);
        assert_eq!(gw.list_all(&2).unwrap().len(), 1);
        assert!(gw.list_all(&3).unwrap().is_empty());
    }

    #[test]
    fn create_writes_given_columns() {
        let s = store();
        let gw = PlanGateway::new(&s);
        let key = gw
            .create(
                &5,
                &map(json!({
                    "colName": "Starter",
                    "colMin": 1.5,
                    "colTier1term": "monthly",
                    "colTier1sku": 100,
                })),
            )
            .unwrap();
        let plan = gw.get_single(&key).unwrap().unwrap();
        assert_eq!(plan.col_pid, 5);
        assert_eq!(plan.col_name.as_deref(), Some("Starter"));
        assert_eq!(plan.col_min, Some(1.5));
        assert_eq!(plan.col_tier1sku, Some(100));
        assert_eq!(plan.col_tier2term, None);
    }

    #[test]
    fn create_after_deleting_a_middle_sibling() {
        let s = store();
        let gw = PlanGateway::new(&s);
        let body = map(json!({"colTier1term": "monthly"}));
        for _ in 0..3 {
            gw.create(&1, &body).unwrap();
        }
        gw.delete(&ChildKey { category: 1, id: 2 }).unwrap();

        // Two siblings left; ordinal 3 is live, so the next free one is 4.
        assert_eq!(gw.create(&1, &body).unwrap(), ChildKey { category: 1, id: 4 });
        assert_eq!(gw.create(&1, &body).unwrap(), ChildKey { category: 1, id: 5 });
        let ids: Vec<i64> = gw.list_all(&1).unwrap().iter().map(|p| p.col_id).collect();
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[test]
    fn concurrent_creates_get_distinct_ordinals() {
        let s = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = s.clone();
                std::thread::spawn(move || {
                    let body = map(json!({"colTier1term": format!("t{i}")}));
                    PlanGateway::new(s.as_ref()).create(&1, &body)
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap().id)
            .collect();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(PlanGateway::new(s.as_ref()).list_all(&1).unwrap().len(), 8);
    }

    #[test]
    fn update_is_keyed_on_both_ids() {
        let s = store();
        let gw = PlanGateway::new(&s);
        let body = map(json!({"colTier1term": "monthly"}));
        let a = gw.create(&1, &body).unwrap();
        let b = gw.create(&2, &body).unwrap();
        assert_eq!(a.id, b.id);

        assert_eq!(gw.update(&a, &map(json!({"colName": "Renamed"}))).unwrap(), 1);
        assert_eq!(gw.get_single(&a).unwrap().unwrap().col_name.as_deref(), Some("Renamed"));
        assert_eq!(gw.get_single(&b).unwrap().unwrap().col_name, None);
        assert_eq!(gw.update(&a, &map(json!({"colName": ""}))).unwrap(), 0);
    }

    #[test]
    fn messages() {
        let key = ChildKey { category: 3, id: 2 };
        assert_eq!(
            PlanGateway::created_body(&key),
            json!({"message": "Plan created", "Category-Plan": "3-2"})
        );
        assert_eq!(
            PlanGateway::not_found_message(&3, "7"),
            "Plan in category 3 with ID 7 not found"
        );
    }
}
