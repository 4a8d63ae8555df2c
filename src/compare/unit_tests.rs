#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::compare::{java_bytes_hash, java_string_hash};
    use crate::meta::TypeDescriptor;
    use crate::types::{LogicalType, RawValue, StorageType, Value};

    // -------- nulls and direction --------

    #[test]
    fn nulls_first_regardless_of_direction() {
        let mut meta = TypeDescriptor::new("n", LogicalType::Integer);
        let one = RawValue::integer(1);
        let two = RawValue::integer(2);

        assert_eq!(meta.compare(&RawValue::Null, &one).unwrap(), Ordering::Less);
        assert_eq!(meta.compare(&one, &two).unwrap(), Ordering::Less);

        meta.set_sorted_descending(true);
        assert_eq!(meta.compare(&RawValue::Null, &one).unwrap(), Ordering::Less);
        assert_eq!(meta.compare(&one, &RawValue::Null).unwrap(), Ordering::Greater);
        assert_eq!(meta.compare(&RawValue::Null, &RawValue::Null).unwrap(), Ordering::Equal);
        assert_eq!(meta.compare(&one, &two).unwrap(), Ordering::Greater);
    }

    #[test]
    fn empty_string_sorts_as_null() {
        let meta = TypeDescriptor::new("s", LogicalType::String);
        assert_eq!(
            meta.compare(&RawValue::string(""), &RawValue::Null).unwrap(),
            Ordering::Equal
        );
    }

    // -------- strings --------

    #[test]
    fn string_modes() {
        let mut meta = TypeDescriptor::new("s", LogicalType::String);
        let lower = RawValue::string("abc");
        let upper = RawValue::string("ABC");

        assert_eq!(meta.compare(&upper, &lower).unwrap(), Ordering::Less);

        meta.set_case_insensitive(true);
        assert_eq!(meta.compare(&upper, &lower).unwrap(), Ordering::Equal);
    }

    #[test]
    fn collator_strength_controls_case_and_accents() {
        let mut meta = TypeDescriptor::new("s", LogicalType::String);
        meta.set_collator_disabled(false);
        meta.set_collator_locale(Some("en_US".to_string()));
        meta.set_collator_strength(0);

        let plain = RawValue::string("resume");
        let accented = RawValue::string("Résumé");
        assert_eq!(meta.compare(&plain, &accented).unwrap(), Ordering::Equal);

        meta.set_collator_strength(2);
        assert_ne!(meta.compare(&plain, &accented).unwrap(), Ordering::Equal);
        assert_eq!(
            meta.compare(&RawValue::string("apple"), &RawValue::string("Banana")).unwrap(),
            Ordering::Less
        );
    }

    // -------- other types --------

    #[test]
    fn binary_is_lexicographic_shorter_first() {
        let meta = TypeDescriptor::new("b", LogicalType::Binary);
        let ab = RawValue::binary(b"ab".to_vec());
        let abc = RawValue::binary(b"abc".to_vec());
        let b = RawValue::binary(b"b".to_vec());

        assert_eq!(meta.compare(&ab, &abc).unwrap(), Ordering::Less);
        assert_eq!(meta.compare(&b, &abc).unwrap(), Ordering::Greater);
    }

    #[test]
    fn booleans_false_before_true() {
        let meta = TypeDescriptor::new("b", LogicalType::Boolean);
        assert_eq!(
            meta.compare(&RawValue::boolean(false), &RawValue::boolean(true)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn serializable_cannot_be_ordered() {
        let meta = TypeDescriptor::new("o", LogicalType::Serializable);
        let raw = RawValue::Native(Value::Serializable(vec![1]));
        assert!(meta.compare(&raw, &raw).is_err());
    }

    // -------- across descriptors --------

    #[test]
    fn integer_against_number_keeps_fraction() {
        let int = TypeDescriptor::new("i", LogicalType::Integer);
        let num = TypeDescriptor::new("n", LogicalType::Number);

        assert_eq!(
            int.compare_with(&RawValue::integer(2), &num, &RawValue::number(2.4)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn integer_against_number_follows_number_direction() {
        let int = TypeDescriptor::new("i", LogicalType::Integer);
        let mut num = TypeDescriptor::new("n", LogicalType::Number);
        num.set_sorted_descending(true);

        assert_eq!(
            int.compare_with(&RawValue::integer(2), &num, &RawValue::number(2.4)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            int.compare_with(&RawValue::Null, &num, &RawValue::number(2.4)).unwrap(),
            Ordering::Less
        );

        let mut descending_int = TypeDescriptor::new("i", LogicalType::Integer);
        descending_int.set_sorted_descending(true);
        let ascending_num = TypeDescriptor::new("n", LogicalType::Number);
        assert_eq!(
            descending_int
                .compare_with(&RawValue::integer(2), &ascending_num, &RawValue::number(2.4))
                .unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn other_types_convert_into_ours() {
        let text = TypeDescriptor::new("s", LogicalType::String);
        let int = TypeDescriptor::new("i", LogicalType::Integer);

        // "10" vs "9" as text
        assert_eq!(
            text.compare_with(&RawValue::string("10"), &int, &RawValue::integer(9)).unwrap(),
            Ordering::Less
        );
        // 10 vs 9 as numbers
        assert_eq!(
            int.compare_with(&RawValue::integer(10), &text, &RawValue::string("9")).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn storage_types_are_reconciled() {
        let normal = TypeDescriptor::new("n", LogicalType::Number);
        let mut lazy = TypeDescriptor::new("n", LogicalType::Number);
        lazy.use_binary_string_storage();

        let mut indexed = TypeDescriptor::new("n", LogicalType::Number);
        indexed.set_storage_type(StorageType::Indexed);
        indexed
            .set_index(Some(vec![Some(Value::Number(1.5)), Some(Value::Number(42.5))]))
            .unwrap();

        let plain = RawValue::number(42.5);
        assert_eq!(
            normal.compare_with(&plain, &lazy, &RawValue::binary_string("42.5")).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            lazy.compare_with(&RawValue::binary_string("42.5"), &indexed, &RawValue::Index(1)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            indexed.compare_with(&RawValue::Index(0), &normal, &plain).unwrap(),
            Ordering::Less
        );
    }

    // -------- hashing --------

    #[test]
    fn null_hashes_are_type_sentinels() {
        let cases = [
            (LogicalType::Boolean, 1),
            (LogicalType::Date, 2),
            (LogicalType::Number, 4),
            (LogicalType::String, 8),
            (LogicalType::Integer, 16),
            (LogicalType::BigNumber, 32),
        ];
        for (ty, sentinel) in cases {
            let meta = TypeDescriptor::new("x", ty);
            assert_eq!(meta.hash_value(&RawValue::Null).unwrap(), sentinel, "{ty}");
        }
    }

    #[test]
    fn native_hashes_match_jvm() {
        assert_eq!(java_string_hash("abc"), 96354);
        assert_eq!(java_bytes_hash(&[1, 2, 3]), 30817);

        let int = TypeDescriptor::new("i", LogicalType::Integer);
        assert_eq!(int.hash_value(&RawValue::integer(42)).unwrap(), 42);
        assert_eq!(int.hash_value(&RawValue::integer(-1)).unwrap(), 0);

        let num = TypeDescriptor::new("n", LogicalType::Number);
        assert_eq!(num.hash_value(&RawValue::number(1.0)).unwrap(), 1_072_693_248);

        let flag = TypeDescriptor::new("b", LogicalType::Boolean);
        assert_eq!(flag.hash_value(&RawValue::boolean(true)).unwrap(), 1231);
        assert_eq!(flag.hash_value(&RawValue::boolean(false)).unwrap(), 1237);
    }

    #[test]
    fn equal_cells_hash_equal_across_storage() {
        let normal = TypeDescriptor::new("s", LogicalType::String);
        let mut lazy = TypeDescriptor::new("s", LogicalType::String);
        lazy.use_binary_string_storage();

        assert_eq!(
            normal.hash_value(&RawValue::string("hello")).unwrap(),
            lazy.hash_value(&RawValue::binary_string("hello")).unwrap()
        );
    }
}
