mod helpers;

use std::cmp::Ordering;

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowvalue::{LogicalType, RawValue, TypeDescriptor};

use helpers::harness::{descriptor, lazy};
use helpers::init_tracing_for_tests;

fn random_cell(rng: &mut StdRng, logical_type: LogicalType) -> RawValue {
    if rng.random_bool(0.15) {
        return RawValue::Null;
    }
    match logical_type {
        LogicalType::Integer => RawValue::integer(rng.random_range(-50..50)),
        LogicalType::Number => RawValue::number(f64::from(rng.random_range(-400i32..400)) / 8.0),
        LogicalType::String => {
            let len = rng.random_range(1..4);
            RawValue::string(
                (0..len)
                    .map(|_| char::from(rng.random_range(b'a'..=b'd')))
                    .collect::<String>(),
            )
        }
        LogicalType::Date => {
            let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
            RawValue::date(base + Duration::days(rng.random_range(-30..30)))
        }
        other => panic!("no generator for {other}"),
    }
}

fn check_antisymmetry(meta: &TypeDescriptor, rng: &mut StdRng) {
    for _ in 0..500 {
        let a = random_cell(rng, meta.logical_type());
        let b = random_cell(rng, meta.logical_type());

        let ab = meta.compare(&a, &b).unwrap();
        let ba = meta.compare(&b, &a).unwrap();
        assert_eq!(ab, ba.reverse(), "{a:?} vs {b:?}");
        assert_eq!(meta.compare(&a, &a).unwrap(), Ordering::Equal);

        if ab == Ordering::Equal {
            assert_eq!(meta.hash_value(&a).unwrap(), meta.hash_value(&b).unwrap());
        }
    }
}

#[test]
fn comparison_is_antisymmetric() {
    init_tracing_for_tests();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for logical_type in [
        LogicalType::Integer,
        LogicalType::Number,
        LogicalType::String,
        LogicalType::Date,
    ] {
        let mut meta = descriptor(logical_type);
        check_antisymmetry(&meta, &mut rng);

        meta.set_sorted_descending(true);
        check_antisymmetry(&meta, &mut rng);
    }
}

#[test]
fn descending_flips_only_non_null_outcomes() {
    let mut rng = StdRng::seed_from_u64(42);
    let ascending = descriptor(LogicalType::Integer);
    let mut descending = descriptor(LogicalType::Integer);
    descending.set_sorted_descending(true);

    for _ in 0..300 {
        let a = random_cell(&mut rng, LogicalType::Integer);
        let b = random_cell(&mut rng, LogicalType::Integer);

        let up = ascending.compare(&a, &b).unwrap();
        let down = descending.compare(&a, &b).unwrap();
        if a.is_absent() || b.is_absent() {
            assert_eq!(up, down);
        } else {
            assert_eq!(up, down.reverse());
        }
    }
    assert_eq!(
        descending.compare(&RawValue::Null, &RawValue::Null).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn sorting_with_nulls_first() {
    let meta = descriptor(LogicalType::Integer);
    let mut cells = vec![
        RawValue::integer(5),
        RawValue::Null,
        RawValue::integer(-2),
        RawValue::integer(11),
        RawValue::Null,
    ];
    cells.sort_by(|a, b| meta.compare(a, b).unwrap());
    assert_eq!(
        cells,
        vec![
            RawValue::Null,
            RawValue::Null,
            RawValue::integer(-2),
            RawValue::integer(5),
            RawValue::integer(11),
        ]
    );
}

#[test]
fn storage_does_not_change_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let normal = descriptor(LogicalType::Integer);
    let stored = lazy(LogicalType::Integer, None, None);

    for _ in 0..200 {
        let a: i64 = rng.random_range(-999..999);
        let b: i64 = rng.random_range(-999..999);

        let native = normal.compare(&RawValue::integer(a), &RawValue::integer(b)).unwrap();
        let encoded = stored
            .compare(
                &RawValue::binary_string(a.to_string().into_bytes()),
                &RawValue::binary_string(b.to_string().into_bytes()),
            )
            .unwrap();
        assert_eq!(native, encoded, "{a} vs {b}");
        assert_eq!(
            normal.hash_value(&RawValue::integer(a)).unwrap(),
            stored
                .hash_value(&RawValue::binary_string(a.to_string().into_bytes()))
                .unwrap()
        );
    }
}
