#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    use crate::config::EngineConfig;
    use crate::format::{
        DatePattern, DecimalPattern, DecimalSymbols, FormatError, MaskContext, resolve_mask,
        synthesize_integer_mask, synthesize_number_mask,
    };
    use crate::types::LogicalType;

    fn pattern(p: &str) -> DecimalPattern {
        DecimalPattern::compile(p, DecimalSymbols::default()).unwrap()
    }

    // -------- mask synthesis --------

    #[test]
    fn number_mask_places_point_from_length_and_precision() {
        let mask = synthesize_number_mask(8, 2);
        assert_eq!(mask, " 000000.00;-000000.00");

        let positive = mask.split(';').next().unwrap();
        assert_eq!(positive.chars().nth(7), Some('.'));
        assert!(mask.split(';').nth(1).unwrap().starts_with('-'));
    }

    #[test]
    fn number_mask_without_precision_uses_two_decimals() {
        assert_eq!(synthesize_number_mask(5, -1), " 00000.00;-00000.00");
    }

    #[test]
    fn integer_mask_mirrors_zeros() {
        assert_eq!(synthesize_integer_mask(4), " 0000;-0000");
    }

    #[test]
    fn resolver_priority() {
        let config = EngineConfig::default();

        let explicit = MaskContext {
            explicit: Some("#.##"),
            descriptor_type: LogicalType::Number,
            length: 10,
            precision: 2,
        };
        assert_eq!(
            resolve_mask(explicit, LogicalType::Number, &config).as_deref(),
            Some("#.##")
        );

        let no_length = MaskContext {
            explicit: None,
            descriptor_type: LogicalType::Integer,
            length: -1,
            precision: -1,
        };
        assert_eq!(
            resolve_mask(no_length, LogicalType::Integer, &config).as_deref(),
            Some("####0;-####0")
        );

        let synthesized = MaskContext {
            explicit: Some(""),
            descriptor_type: LogicalType::Number,
            length: 8,
            precision: 2,
        };
        assert_eq!(
            resolve_mask(synthesized, LogicalType::Number, &config).as_deref(),
            Some(" 000000.00;-000000.00")
        );

        let string_side = MaskContext {
            explicit: None,
            descriptor_type: LogicalType::String,
            length: 20,
            precision: -1,
        };
        assert_eq!(
            resolve_mask(string_side, LogicalType::Number, &config).as_deref(),
            Some("####0.0#########")
        );
        assert_eq!(resolve_mask(string_side, LogicalType::Boolean, &config), None);
    }

    // -------- decimal patterns --------

    #[test]
    fn formats_with_synthesized_mask() {
        let p = pattern(&synthesize_number_mask(10, 2));
        assert_eq!(p.format_f64(1234.5), " 00001234.50");
        assert_eq!(p.format_f64(-1234.5), "-00001234.50");
    }

    #[test]
    fn default_number_mask_drops_float_noise() {
        let p = pattern("####0.0#########;-####0.0#########");
        assert_eq!(p.format_f64(1234.5), "1234.5");
        assert_eq!(p.format_f64(3.0), "3.0");
        assert_eq!(p.format_f64(0.1 + 0.2), "0.3");
        assert_eq!(p.format_f64(-0.0), "0.0");
    }

    #[test]
    fn grouping_and_rounding() {
        let p = pattern("#,##0.00");
        assert_eq!(p.format_f64(1234567.891), "1,234,567.89");
        assert_eq!(p.format_i64(-1000), "-1,000.00");

        let whole = pattern("0");
        assert_eq!(whole.format_f64(2.5), "2");
        assert_eq!(whole.format_f64(3.5), "4");
        assert_eq!(whole.format_f64(9.9), "10");
    }

    #[test]
    fn percent_scales_both_ways() {
        let p = pattern("0%");
        assert_eq!(p.format_f64(0.25), "25%");
        assert_eq!(p.parse("25%").unwrap().to_f64(), 0.25);
    }

    #[test]
    fn parse_stops_at_first_foreign_char() {
        let p = pattern("####0");
        let parsed = p.parse("123x").unwrap();
        assert_eq!(parsed.end, 3);
        assert_eq!(parsed.to_i64(), 123);

        let err = p.parse("abc").unwrap_err();
        assert!(matches!(err, FormatError::Unparseable { offset: 0, .. }));
    }

    #[test]
    fn parse_honours_localized_symbols() {
        let symbols = DecimalSymbols {
            decimal: ',',
            grouping: Some('.'),
            currency: "EUR".to_string(),
        };
        let p = DecimalPattern::compile("#,##0.00", symbols).unwrap();
        assert_eq!(p.parse("1.234,5").unwrap().to_f64(), 1234.5);
        assert_eq!(p.format_f64(1234.5), "1.234,50");
    }

    #[test]
    fn blank_positive_prefix_is_optional() {
        let p = pattern(&synthesize_integer_mask(4));
        assert_eq!(p.parse("-0042").unwrap().to_i64(), -42);
        assert_eq!(p.parse("42").unwrap().to_i64(), 42);
        assert_eq!(p.parse(" 0042").unwrap().end, 5);
    }

    #[test]
    fn parse_keeps_big_values_exact() {
        let p = pattern("######0.0###################");
        let parsed = p.parse("123456789012345678.123456789").unwrap();
        assert_eq!(parsed.to_plain_string(), "123456789012345678.123456789");
        assert_eq!(
            parsed.to_decimal().unwrap().to_string(),
            "123456789012345678.123456789"
        );
    }

    #[test]
    fn pattern_without_digits_is_rejected() {
        let err = DecimalPattern::compile("abc", DecimalSymbols::default()).unwrap_err();
        assert!(matches!(err, FormatError::InvalidPattern { .. }));
    }

    #[test]
    fn scientific_input_bounds_the_exponent() {
        let p = pattern("#0.###");
        assert_eq!(p.parse("1.5E3").unwrap().to_i64(), 1500);
        assert_eq!(p.parse("25E-2").unwrap().to_f64(), 0.25);

        for text in ["1E2147483647", "1E999999999", "1E-2147483648", "1E401"] {
            let err = p.parse(text).unwrap_err();
            assert!(
                matches!(err, FormatError::Unparseable { offset: 1, .. }),
                "{text}: {err:?}"
            );
        }

        let percent = pattern("0%");
        assert!(percent.parse("1E-400%").is_ok());
    }

    // -------- date patterns --------

    #[test]
    fn date_format_and_parse_roundtrip() {
        let p = DatePattern::compile("yyyy/MM/dd HH:mm:ss.SSS").unwrap();
        let instant = Utc.with_ymd_and_hms(2020, 1, 31, 13, 45, 6).unwrap()
            + chrono::Duration::milliseconds(7);

        let text = p.format(&instant, Tz::UTC);
        assert_eq!(text, "2020/01/31 13:45:06.007");

        let (back, end) = p.parse(&text, Tz::UTC, false).unwrap();
        assert_eq!(back, instant);
        assert_eq!(end, text.chars().count());
    }

    #[test]
    fn nanosecond_fraction() {
        let p = DatePattern::compile("yyyy/MM/dd HH:mm:ss.SSSSSSSSS").unwrap();
        let instant = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let text = p.format(&instant, Tz::UTC);
        assert_eq!(text, "2021/03/04 05:06:07.123456789");
        assert_eq!(p.parse(&text, Tz::UTC, false).unwrap().0, instant);
    }

    #[test]
    fn strict_rejects_out_of_range_lenient_rolls_over() {
        let p = DatePattern::compile("yyyy-MM-dd").unwrap();

        let err = p.parse("2020-13-01", Tz::UTC, false).unwrap_err();
        assert!(matches!(err, FormatError::Unparseable { offset: 5, .. }));

        let (rolled, _) = p.parse("2020-13-01", Tz::UTC, true).unwrap();
        assert_eq!(rolled, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn lenient_year_overflow_is_an_error() {
        let p = DatePattern::compile("yyyy/MM/dd HH:mm:ss.SSS").unwrap();

        let err = p
            .parse("99999999999999999999/01/01 00:00:00.000", Tz::UTC, true)
            .unwrap_err();
        assert!(matches!(err, FormatError::Unparseable { offset: 0, .. }));

        assert!(p.parse("300000/01/01 00:00:00.000", Tz::UTC, true).is_err());
        assert!(p.parse("2020/99999999999999999999/01 00:00:00.000", Tz::UTC, true).is_err());

        let (rolled, _) = p.parse("2020/25/01 00:00:00.000", Tz::UTC, true).unwrap();
        assert_eq!(rolled, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn strict_fraction_must_fit_a_second() {
        let p = DatePattern::compile("yyyy/MM/dd HH:mm:ss.SSS").unwrap();

        let err = p.parse("2020/01/01 00:00:00.4295", Tz::UTC, false).unwrap_err();
        assert!(matches!(err, FormatError::Unparseable { offset: 20, .. }));
        assert!(p.parse("2020/01/01 00:00:00.1000", Tz::UTC, false).is_err());

        let (ok, _) = p.parse("2020/01/01 00:00:00.999", Tz::UTC, false).unwrap();
        assert_eq!(
            ok,
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(999)
        );
    }

    #[test]
    fn adjacent_numeric_fields_use_fixed_width() {
        let p = DatePattern::compile("yyyyMMdd").unwrap();
        let (d, end) = p.parse("20200131", Tz::UTC, false).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2020, 1, 31, 0, 0, 0).unwrap());
        assert_eq!(end, 8);
    }

    #[test]
    fn zone_and_names() {
        let paris: Tz = "Europe/Paris".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();

        let p = DatePattern::compile("dd MMM yyyy HH:mm Z").unwrap();
        assert_eq!(p.format(&instant, paris), "01 Jun 2020 14:00 +0200");

        let (back, _) = p.parse("01 jun 2020 14:00 +0200", Tz::UTC, false).unwrap();
        assert_eq!(back, instant);

        let (local, _) = DatePattern::compile("yyyy-MM-dd HH:mm")
            .unwrap()
            .parse("2020-06-01 14:00", paris, false)
            .unwrap();
        assert_eq!(local, instant);
    }

    #[test]
    fn twelve_hour_clock() {
        let p = DatePattern::compile("yyyy-MM-dd hh:mm a").unwrap();
        let (d, _) = p.parse("2020-01-01 01:30 PM", Tz::UTC, false).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2020, 1, 1, 13, 30, 0).unwrap());
        assert_eq!(p.format(&d, Tz::UTC), "2020-01-01 01:30 PM");
    }

    #[test]
    fn quoted_literals_and_illegal_letters() {
        let p = DatePattern::compile("yyyy-MM-dd'T'HH:mm").unwrap();
        let instant = Utc.with_ymd_and_hms(2022, 2, 3, 4, 5, 0).unwrap();
        assert_eq!(p.format(&instant, Tz::UTC), "2022-02-03T04:05");

        assert!(matches!(
            DatePattern::compile("yyyy-qq"),
            Err(FormatError::InvalidPattern { .. })
        ));
    }
}
