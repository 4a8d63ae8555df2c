//! Logical (semantic) column types.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    None,
    Number,
    String,
    Date,
    Boolean,
    Integer,
    BigNumber,
    Serializable,
    Binary,
    Timestamp,
    InternetAddress,
}

impl LogicalType {
    pub const ALL: [LogicalType; 11] = [
        LogicalType::None,
        LogicalType::Number,
        LogicalType::String,
        LogicalType::Date,
        LogicalType::Boolean,
        LogicalType::Integer,
        LogicalType::BigNumber,
        LogicalType::Serializable,
        LogicalType::Binary,
        LogicalType::Timestamp,
        LogicalType::InternetAddress,
    ];

    /// Stable type code used by the factory and the wire formats.
    pub fn code(self) -> i32 {
        match self {
            LogicalType::None => 0,
            LogicalType::Number => 1,
            LogicalType::String => 2,
            LogicalType::Date => 3,
            LogicalType::Boolean => 4,
            LogicalType::Integer => 5,
            LogicalType::BigNumber => 6,
            LogicalType::Serializable => 7,
            LogicalType::Binary => 8,
            LogicalType::Timestamp => 9,
            LogicalType::InternetAddress => 10,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    pub fn description(self) -> &'static str {
        match self {
            LogicalType::None => "-",
            LogicalType::Number => "Number",
            LogicalType::String => "String",
            LogicalType::Date => "Date",
            LogicalType::Boolean => "Boolean",
            LogicalType::Integer => "Integer",
            LogicalType::BigNumber => "BigNumber",
            LogicalType::Serializable => "Serializable",
            LogicalType::Binary => "Binary",
            LogicalType::Timestamp => "Timestamp",
            LogicalType::InternetAddress => "Internet Address",
        }
    }

    /// Case-insensitive lookup by description.
    pub fn from_description(desc: &str) -> Option<Self> {
        let desc = desc.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.description().eq_ignore_ascii_case(desc))
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            LogicalType::Number | LogicalType::Integer | LogicalType::BigNumber
        )
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, LogicalType::Date | LogicalType::Timestamp)
    }

    /// Types whose string form is driven by a format mask.
    pub fn is_masked(self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Values of these types cannot be copied faithfully through text.
    pub fn requires_real_clone(self) -> bool {
        matches!(self, LogicalType::Binary | LogicalType::Serializable)
    }

    /// Hash contribution of a null value of this type.
    pub(crate) fn null_hash_sentinel(self) -> i32 {
        match self {
            LogicalType::Boolean => 1,
            LogicalType::Date => 2,
            LogicalType::Number => 4,
            LogicalType::String => 8,
            LogicalType::Integer => 16,
            LogicalType::BigNumber => 32,
            LogicalType::Timestamp => 64,
            LogicalType::Binary => 128,
            LogicalType::InternetAddress => 256,
            LogicalType::Serializable => 512,
            LogicalType::None => 0,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
