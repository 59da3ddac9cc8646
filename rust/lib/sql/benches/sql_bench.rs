use criterion::{black_box, criterion_group, criterion_main, Criterion};

use catalog_sql::{SQLStore, SqliteStore, Value};

const PLAN_TABLE: &str = "CREATE TABLE plan (
    colId INTEGER NOT NULL,
    colPid INTEGER NOT NULL,
    colName TEXT,
    colMin REAL,
    PRIMARY KEY (colPid, colId)
)";

fn bench_ordinal_insert(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(PLAN_TABLE, &[]).unwrap();

    let mut parent = 0i64;
    c.bench_function("sqlite_ordinal_insert", |b| {
        b.iter(|| {
            // Spread inserts over 100 parents so the count stays small.
            parent = (parent + 1) % 100;
            store
                .query(
                    "INSERT INTO plan (colId, colPid, colName, colMin) \
                     SELECT COUNT(*) + 1, ?1, ?2, ?3 FROM plan WHERE colPid = ?1 \
                     RETURNING colId",
                    &[
                        Value::Integer(black_box(parent)),
                        Value::Text("bench".to_string()),
                        Value::Real(9.99),
                    ],
                )
                .unwrap();
        });
    });
}

fn bench_get_by_composite_key(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(PLAN_TABLE, &[]).unwrap();

    for pid in 0..100i64 {
        for id in 1..=100i64 {
            store
                .exec(
                    "INSERT INTO plan (colId, colPid, colName, colMin) VALUES (?1, ?2, ?3, ?4)",
                    &[
                        Value::Integer(id),
                        Value::Integer(pid),
                        Value::Text(format!("plan-{}-{}", pid, id)),
                        Value::Real(id as f64 * 1.5),
                    ],
                )
                .unwrap();
        }
    }

    let mut i = 0i64;
    c.bench_function("sqlite_get_by_composite_key", |b| {
        b.iter(|| {
            let row = store
                .query_one(
                    "SELECT * FROM plan WHERE colPid = ?1 AND colId = ?2",
                    &[
                        Value::Integer(black_box(i % 100)),
                        Value::Integer(black_box(i % 100 + 1)),
                    ],
                )
                .unwrap();
            assert!(row.is_some());
            i += 1;
        });
    });
}

fn bench_list_for_parent(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(PLAN_TABLE, &[]).unwrap();

    for id in 1..=100i64 {
        store
            .exec(
                "INSERT INTO plan (colId, colPid, colName) VALUES (?1, 1, ?2)",
                &[Value::Integer(id), Value::Text(format!("plan-{}", id))],
            )
            .unwrap();
    }

    c.bench_function("sqlite_list_for_parent_100", |b| {
        b.iter(|| {
            let rows = store
                .query(
                    "SELECT * FROM plan WHERE colPid = ?1 ORDER BY colId",
                    &[Value::Integer(black_box(1))],
                )
                .unwrap();
            assert_eq!(rows.len(), 100);
        });
    });
}

criterion_group!(
    benches,
    bench_ordinal_insert,
    bench_get_by_composite_key,
    bench_list_for_parent
);
criterion_main!(benches);
