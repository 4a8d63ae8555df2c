#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::error::ValueError;
    use crate::meta::{DescriptorFactory, TypeDescriptor};
    use crate::types::{LogicalType, RawValue, StorageType, TrimType};

    #[test]
    fn precision_is_fixed_for_some_types() {
        let mut integer = TypeDescriptor::with_length("i", LogicalType::Integer, 9, 4);
        assert_eq!(integer.precision(), 0);
        integer.set_precision(7);
        assert_eq!(integer.precision(), 0);

        let string = TypeDescriptor::with_length("s", LogicalType::String, 10, 3);
        assert_eq!(string.precision(), -1);

        let number = TypeDescriptor::with_length("n", LogicalType::Number, 10, 3);
        assert_eq!(number.precision(), 3);
    }

    #[test]
    fn signature_and_display() {
        let number = TypeDescriptor::with_length("amount", LogicalType::Number, 10, 2);
        assert_eq!(number.signature(), "Number(10, 2)");
        assert_eq!(number.to_string(), "amount Number(10, 2)");

        let mut code = TypeDescriptor::with_length("code", LogicalType::String, 5, -1);
        code.use_binary_string_storage();
        assert_eq!(code.signature(), "String(5)<binary-string>");

        assert_eq!(TypeDescriptor::new("d", LogicalType::Date).signature(), "Date");
        assert_eq!(
            TypeDescriptor::with_length("n", LogicalType::Number, 7, 0).signature(),
            "Number(7)"
        );
    }

    #[test]
    fn defaults_come_from_config() {
        let factory = DescriptorFactory::new(
            EngineConfig::default()
                .with_symbols(',', '.')
                .with_time_zone("Europe/Brussels"),
        );

        let number = factory.create("n", LogicalType::Number);
        assert_eq!(number.decimal_symbol(), Some(","));
        assert_eq!(number.grouping_symbol(), Some("."));
        assert_eq!(number.date_format_time_zone(), Some("Europe/Brussels"));
        assert!(number.is_collator_disabled());
        assert_eq!(number.collator_strength(), 0);
        assert!(number.is_identical_format());

        // big numbers always use a plain point
        let big = factory.create("b", LogicalType::BigNumber);
        assert_eq!(big.decimal_symbol(), Some("."));
        assert_eq!(big.grouping_symbol(), None);
    }

    #[test]
    fn factory_lookups() {
        let factory = DescriptorFactory::default();

        let by_code = factory.create_by_code("x", 6).unwrap();
        assert_eq!(by_code.logical_type(), LogicalType::BigNumber);

        let by_name = factory.create_by_description("y", "internet address").unwrap();
        assert_eq!(by_name.logical_type(), LogicalType::InternetAddress);

        assert!(matches!(
            factory.create_by_code("z", 99),
            Err(ValueError::Config { .. })
        ));
        assert!(factory.create_by_description("z", "Varchar").is_err());
    }

    #[test]
    fn clone_starts_with_fresh_state() {
        let mut meta = TypeDescriptor::with_length("n", LogicalType::Number, -1, -1);
        meta.use_binary_string_storage();
        meta.set_comments(Some("from file".to_string()));

        meta.get_number(&RawValue::binary_string(b"12.5".to_vec())).unwrap();
        assert_eq!(meta.binary_string_conversions(), 1);

        let copy = meta.clone();
        assert_eq!(copy.binary_string_conversions(), 0);
        assert_eq!(copy.comments(), Some("from file"));
        assert_eq!(copy.storage_type(), StorageType::BinaryString);
        assert_eq!(
            copy.get_number(&RawValue::binary_string(b"12.5".to_vec())).unwrap(),
            Some(12.5)
        );
    }

    #[test]
    fn identical_format_tracks_storage_rules() {
        let mut meta = TypeDescriptor::new("n", LogicalType::Number);
        meta.use_binary_string_storage();
        assert!(meta.is_identical_format());

        meta.set_conversion_mask(Some("#,##0.00".to_string()));
        assert!(!meta.is_identical_format());

        meta.set_conversion_mask(None);
        assert!(meta.is_identical_format());

        meta.set_trim_type(TrimType::Both);
        assert!(!meta.is_identical_format());
    }

    #[test]
    fn changing_the_mask_rebuilds_formatters() {
        let mut meta = TypeDescriptor::new("n", LogicalType::Number);
        let value = RawValue::number(1234.5);
        assert_eq!(meta.get_string(&value).unwrap().as_deref(), Some("1234.5"));

        meta.set_conversion_mask(Some("#,##0.00".to_string()));
        assert_eq!(meta.get_string(&value).unwrap().as_deref(), Some("1,234.50"));

        meta.set_grouping_symbol(Some(" ".to_string()));
        assert_eq!(meta.get_string(&value).unwrap().as_deref(), Some("1 234.50"));
    }

    #[test]
    fn empty_mask_means_none() {
        let mut meta = TypeDescriptor::new("d", LogicalType::Date);
        meta.set_conversion_mask(Some(String::new()));
        assert_eq!(meta.conversion_mask(), None);
        assert_eq!(meta.format_mask().as_deref(), Some("yyyy/MM/dd HH:mm:ss.SSS"));
    }

    #[test]
    fn unknown_time_zone_falls_back() {
        let mut meta = TypeDescriptor::new("d", LogicalType::Date);
        meta.set_date_format_time_zone(Some("Mars/Olympus".to_string()));
        assert_eq!(meta.time_zone(), chrono_tz::Tz::UTC);
    }

    #[test]
    fn dictionary_entries_must_match_type() {
        let mut meta = TypeDescriptor::new("color", LogicalType::String);
        let err = meta
            .set_index(Some(vec![Some(crate::types::Value::Integer(1))]))
            .unwrap_err();
        assert!(matches!(err, ValueError::StorageType { .. }));
    }
}
