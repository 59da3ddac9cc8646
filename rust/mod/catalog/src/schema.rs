use catalog_core::ServiceError;
use catalog_sql::SQLStore;

/// SQL DDL statements to initialize the catalog database schema.
///
/// Plans and addons are keyed by `(colPid, colId)`; the composite key is
/// what rejects a reissued ordinal. `colTsFlag` is nullable because an
/// explicit `null` in a PATCH is written through.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tbl_category (
        colId INTEGER PRIMARY KEY AUTOINCREMENT,
        colName TEXT NOT NULL,
        colTsFlag INTEGER DEFAULT 0,
        colTsPercent REAL
    )",
    "CREATE TABLE IF NOT EXISTS tbl_plan (
        colId INTEGER NOT NULL,
        colPid INTEGER NOT NULL,
        colName TEXT,
        colMin REAL,
        colMax REAL,
        colTier1term TEXT,
        colTier1cost REAL,
        colTier1sku INTEGER,
        colTier2term TEXT,
        colTier2cost REAL,
        colTier2sku INTEGER,
        PRIMARY KEY (colPid, colId)
    )",
    "CREATE TABLE IF NOT EXISTS tbl_addons (
        colId INTEGER NOT NULL,
        colPid INTEGER NOT NULL,
        colTitle TEXT,
        colCost REAL,
        colSku INTEGER,
        PRIMARY KEY (colPid, colId)
    )",
    "CREATE TABLE IF NOT EXISTS tbl_apikeys (
        colId INTEGER PRIMARY KEY AUTOINCREMENT,
        colUsername TEXT NOT NULL UNIQUE,
        colApikey TEXT NOT NULL UNIQUE
    )",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_sql::SqliteStore;

    #[test]
    fn init_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        init_schema(&store).unwrap();
        init_schema(&store).unwrap();
        let rows = store
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'tbl_%' ORDER BY name",
                &[],
            )
            .unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r.get_str("name")).collect();
        assert_eq!(names, vec!["tbl_addons", "tbl_apikeys", "tbl_category", "tbl_plan"]);
    }
}
