mod helpers;

use std::io::Cursor;

use rowvalue::{LogicalType, RawValue, StorageType, TrimType, Value};

use helpers::data::{XML_TYPES, samples};
use helpers::harness::{binary_roundtrip, descriptor, factory, lazy, meta_roundtrip, xml_roundtrip};
use helpers::init_tracing_for_tests;

#[test]
fn binary_data_roundtrips_every_type() {
    init_tracing_for_tests();
    for logical_type in LogicalType::ALL {
        let meta = descriptor(logical_type);
        for value in samples(logical_type) {
            let raw = RawValue::Native(value);
            assert_eq!(binary_roundtrip(&meta, &raw), raw, "{logical_type}");
        }
        assert_eq!(binary_roundtrip(&meta, &RawValue::Null), RawValue::Null);
    }
}

#[test]
fn xml_data_roundtrips_text_friendly_types() {
    for logical_type in XML_TYPES {
        let meta = descriptor(logical_type);
        for value in samples(logical_type) {
            let raw = RawValue::Native(value);
            let once = xml_roundtrip(&meta, &raw);
            assert_eq!(once, raw, "{logical_type}");
            assert_eq!(xml_roundtrip(&meta, &once), once);
        }
    }
}

#[test]
fn stream_of_records_ends_cleanly() {
    let meta = descriptor(LogicalType::Integer);
    let mut buf = Vec::new();
    for i in [3, -1, 99] {
        meta.write_data(&mut buf, &RawValue::integer(i)).unwrap();
    }
    meta.write_data(&mut buf, &RawValue::Null).unwrap();

    let mut input = Cursor::new(buf);
    let mut read = Vec::new();
    loop {
        match meta.read_data(&mut input) {
            Ok(raw) => read.push(raw),
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => panic!("unexpected {err}"),
        }
    }
    assert_eq!(
        read,
        vec![
            RawValue::integer(3),
            RawValue::integer(-1),
            RawValue::integer(99),
            RawValue::Null,
        ]
    );
}

#[test]
fn configured_descriptor_survives_both_codecs() {
    let mut meta = factory().create_with_length("price", LogicalType::Number, 12, 3);
    meta.set_origin(Some("orders.csv".to_string()));
    meta.set_comments(Some("unit price".to_string()));
    meta.set_conversion_mask(Some("#,##0.000".to_string()));
    meta.set_decimal_symbol(Some(",".to_string()));
    meta.set_grouping_symbol(Some(".".to_string()));
    meta.set_currency_symbol(Some("EUR".to_string()));
    meta.set_trim_type(TrimType::Both);
    meta.set_sorted_descending(true);
    meta.set_date_format_time_zone(Some("Europe/Brussels".to_string()));
    meta.set_lenient_string_to_number(true);

    let check = |copy: &rowvalue::TypeDescriptor| {
        assert_eq!(copy.signature(), meta.signature());
        assert_eq!(copy.name(), "price");
        assert_eq!(copy.origin(), Some("orders.csv"));
        assert_eq!(copy.comments(), Some("unit price"));
        assert_eq!(copy.conversion_mask(), Some("#,##0.000"));
        assert_eq!(copy.decimal_symbol(), Some(","));
        assert_eq!(copy.grouping_symbol(), Some("."));
        assert_eq!(copy.currency_symbol(), Some("EUR"));
        assert_eq!(copy.trim_type(), TrimType::Both);
        assert!(copy.is_sorted_descending());
        assert_eq!(copy.date_format_time_zone(), Some("Europe/Brussels"));
        assert!(copy.is_lenient_string_to_number());
    };

    check(&meta_roundtrip(&meta));

    let xml = meta.meta_to_xml().unwrap();
    check(&factory().meta_from_xml(&xml).unwrap());
}

#[test]
fn lazy_cells_keep_their_bytes() {
    let meta = lazy(LogicalType::Integer, None, None);
    assert_eq!(meta.storage_type(), StorageType::BinaryString);

    let raw = RawValue::binary_string(b"00042".to_vec());
    assert_eq!(binary_roundtrip(&meta, &raw), raw);
    assert_eq!(xml_roundtrip(&meta, &raw), raw);

    let copy = meta_roundtrip(&meta);
    assert_eq!(copy.get_integer(&raw).unwrap(), Some(42));
}

#[test]
fn indexed_dictionary_survives_metadata_roundtrip() {
    let mut meta = descriptor(LogicalType::Integer);
    meta.set_storage_type(StorageType::Indexed);
    meta.set_index(Some(vec![Some(Value::Integer(10)), None, Some(Value::Integer(30))]))
        .unwrap();

    let copy = meta_roundtrip(&meta);
    assert_eq!(copy.get_integer(&RawValue::Index(2)).unwrap(), Some(30));
    assert_eq!(copy.get_integer(&RawValue::Index(1)).unwrap(), None);

    let xml = meta.meta_to_xml().unwrap();
    let from_xml = factory().meta_from_xml(&xml).unwrap();
    assert_eq!(from_xml.index().map(|i| i.len()), Some(3));
}
