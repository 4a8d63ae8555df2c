mod helpers;

use maplit::hashmap;
use rowvalue::jdbc::sql_types as sql;
use rowvalue::jdbc::{DialectKind, GenericDialect, SqlColumn, infer_descriptor};
use rowvalue::{LogicalType, RawValue, StorageType};

use helpers::harness::factory;
use helpers::init_tracing_for_tests;

fn result_set() -> Vec<SqlColumn> {
    vec![
        SqlColumn::new("id", sql::BIGINT),
        SqlColumn::new("name", sql::VARCHAR).with_display_size(20),
        SqlColumn::new("price", sql::DECIMAL).with_precision_and_scale(9, 2),
        SqlColumn::new("created", sql::TIMESTAMP).with_precision_and_scale(26, 6),
        SqlColumn::new("active", sql::BOOLEAN),
    ]
}

#[test]
fn result_set_inference_per_dialect() {
    init_tracing_for_tests();
    let factory = factory();

    let expected = [
        LogicalType::Integer,
        LogicalType::String,
        LogicalType::Number,
        LogicalType::Timestamp,
        LogicalType::Boolean,
    ];
    for kind in [
        DialectKind::Generic,
        DialectKind::MySql,
        DialectKind::PostgreSql,
        DialectKind::Oracle,
    ] {
        let dialect = GenericDialect::new(kind);
        let types: Vec<_> = result_set()
            .iter()
            .map(|c| infer_descriptor(&factory, &dialect, c, false, false).logical_type())
            .collect();
        assert_eq!(types, expected, "{kind:?}");
    }
}

#[test]
fn lazily_converted_strings_decode_on_demand() {
    let factory = factory();
    let dialect = GenericDialect::new(DialectKind::PostgreSql);
    let column = SqlColumn::new("name", sql::VARCHAR).with_display_size(8);

    let meta = infer_descriptor(&factory, &dialect, &column, false, true);
    assert_eq!(meta.storage_type(), StorageType::BinaryString);
    assert!(meta.is_identical_format());

    let raw = RawValue::binary_string(b"widget".to_vec());
    assert_eq!(meta.binary_string_conversions(), 0);
    assert_eq!(meta.get_string(&raw).unwrap().as_deref(), Some("widget"));
    assert_eq!(meta.get_binary_string(&raw).unwrap(), Some(b"widget".to_vec()));

    let normal = meta.convert_to_normal_storage(&raw).unwrap();
    assert_eq!(normal, RawValue::string("widget"));
}

#[test]
fn mysql_year_columns_follow_connection_properties() {
    let factory = factory();
    let year = SqlColumn::new("model_year", sql::DATE).with_type_name("YEAR");

    let as_integer = GenericDialect::new(DialectKind::MySql).with_properties(hashmap! {
        "yearIsDateType".to_string() => "false".to_string(),
        "useSSL".to_string() => "true".to_string(),
    });
    let meta = infer_descriptor(&factory, &as_integer, &year, false, false);
    assert_eq!(meta.signature(), "Integer(4)");

    let as_date = GenericDialect::new(DialectKind::MySql).with_properties(hashmap! {
        "yearIsDateType".to_string() => "true".to_string(),
    });
    let meta = infer_descriptor(&factory, &as_date, &year, false, false);
    assert_eq!(meta.logical_type(), LogicalType::Date);
}
