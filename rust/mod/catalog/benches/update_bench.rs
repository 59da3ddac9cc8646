use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use catalog::field::Mode;
use catalog::model::plan;
use catalog::update::{build_update, update_statement};
use catalog::validate::validate;
use catalog_core::FieldMap;

fn full_plan() -> FieldMap {
    serde_json::from_value(json!({
        "colName": "Business",
        "colMin": 10.5,
        "colMax": 99.5,
        "colTier1term": "monthly",
        "colTier1cost": 19.99,
        "colTier1sku": 1001,
        "colTier2term": "yearly",
        "colTier2cost": 199.99,
        "colTier2sku": 1002,
        "ignored": "field",
    }))
    .unwrap()
}

fn bench_validate(c: &mut Criterion) {
    let fields = full_plan();
    c.bench_function("validate_plan_create", |b| {
        b.iter(|| validate(plan::FIELDS, black_box(&fields), Mode::Create));
    });
}

fn bench_build_update(c: &mut Criterion) {
    let fields = full_plan();
    c.bench_function("build_update_plan_full", |b| {
        b.iter(|| {
            let columns = build_update(plan::FIELDS, black_box(&fields));
            update_statement("tbl_plan", &columns, &["colPid", "colId"])
        });
    });

    let sparse: FieldMap = serde_json::from_value(json!({"colName": "", "colMax": 5.5})).unwrap();
    c.bench_function("build_update_plan_sparse", |b| {
        b.iter(|| build_update(plan::FIELDS, black_box(&sparse)));
    });
}

criterion_group!(benches, bench_validate, bench_build_update);
criterion_main!(benches);
