//! Engine-wide defaults injected into every descriptor at construction.
//!
//! Nothing in the engine reads process state; whoever builds the
//! [`DescriptorFactory`](crate::meta::DescriptorFactory) decides these.

use crate::types::LogicalType;

pub const DEFAULT_INTEGER_FORMAT_MASK: &str = "####0;-####0";
pub const DEFAULT_NUMBER_FORMAT_MASK: &str = "####0.0#########;-####0.0#########";
pub const DEFAULT_BIG_NUMBER_FORMAT_MASK: &str =
    "######0.0###################;-######0.0###################";
pub const DEFAULT_DATE_FORMAT_MASK: &str = "yyyy/MM/dd HH:mm:ss.SSS";
pub const DEFAULT_TIMESTAMP_FORMAT_MASK: &str = "yyyy/MM/dd HH:mm:ss.SSSSSSSSS";

pub const DEFAULT_INTEGER_PARSE_MASK: &str = "####0";
pub const DEFAULT_NUMBER_PARSE_MASK: &str = "####0.0#########";
pub const DEFAULT_BIG_NUMBER_PARSE_MASK: &str = "######0.0###################";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub integer_format_mask: String,
    pub number_format_mask: String,
    pub big_number_format_mask: String,
    pub date_format_mask: String,
    pub timestamp_format_mask: String,

    pub integer_parse_mask: String,
    pub number_parse_mask: String,
    pub big_number_parse_mask: String,

    /// Accept a numeric prefix and ignore trailing text when parsing numbers.
    pub lenient_string_to_number: bool,
    /// When false, empty strings and zero-length byte strings count as null.
    pub empty_string_differs_from_null: bool,
    pub date_format_lenient: bool,

    pub date_locale: String,
    pub collator_locale: String,
    pub time_zone: String,
    pub encoding: String,

    pub decimal_symbol: char,
    pub grouping_symbol: char,
    pub currency_symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integer_format_mask: DEFAULT_INTEGER_FORMAT_MASK.to_string(),
            number_format_mask: DEFAULT_NUMBER_FORMAT_MASK.to_string(),
            big_number_format_mask: DEFAULT_BIG_NUMBER_FORMAT_MASK.to_string(),
            date_format_mask: DEFAULT_DATE_FORMAT_MASK.to_string(),
            timestamp_format_mask: DEFAULT_TIMESTAMP_FORMAT_MASK.to_string(),
            integer_parse_mask: DEFAULT_INTEGER_PARSE_MASK.to_string(),
            number_parse_mask: DEFAULT_NUMBER_PARSE_MASK.to_string(),
            big_number_parse_mask: DEFAULT_BIG_NUMBER_PARSE_MASK.to_string(),
            lenient_string_to_number: false,
            empty_string_differs_from_null: false,
            date_format_lenient: false,
            date_locale: "en-US".to_string(),
            collator_locale: "en-US".to_string(),
            time_zone: "UTC".to_string(),
            encoding: "UTF-8".to_string(),
            decimal_symbol: '.',
            grouping_symbol: ',',
            currency_symbol: "$".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_lenient_string_to_number(mut self, lenient: bool) -> Self {
        self.lenient_string_to_number = lenient;
        self
    }

    pub fn with_empty_string_differs_from_null(mut self, differs: bool) -> Self {
        self.empty_string_differs_from_null = differs;
        self
    }

    pub fn with_date_format_lenient(mut self, lenient: bool) -> Self {
        self.date_format_lenient = lenient;
        self
    }

    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = zone.into();
        self
    }

    pub fn with_date_locale(mut self, locale: impl Into<String>) -> Self {
        self.date_locale = locale.into();
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_symbols(mut self, decimal: char, grouping: char) -> Self {
        self.decimal_symbol = decimal;
        self.grouping_symbol = grouping;
        self
    }

    /// Built-in format mask used when a descriptor has no mask and no usable length.
    pub fn format_mask(&self, ty: LogicalType) -> Option<&str> {
        match ty {
            LogicalType::Integer => Some(&self.integer_format_mask),
            LogicalType::Number => Some(&self.number_format_mask),
            LogicalType::BigNumber => Some(&self.big_number_format_mask),
            LogicalType::Date => Some(&self.date_format_mask),
            LogicalType::Timestamp => Some(&self.timestamp_format_mask),
            _ => None,
        }
    }

    /// Mask used by string-typed descriptors when parsing into `ty`.
    pub fn parse_mask(&self, ty: LogicalType) -> Option<&str> {
        match ty {
            LogicalType::Integer => Some(&self.integer_parse_mask),
            LogicalType::Number => Some(&self.number_parse_mask),
            LogicalType::BigNumber => Some(&self.big_number_parse_mask),
            LogicalType::Date => Some(&self.date_format_mask),
            LogicalType::Timestamp => Some(&self.timestamp_format_mask),
            _ => None,
        }
    }
}
