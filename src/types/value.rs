//! Native values and the raw cells carried in rows.
//!
//! A `Value` is always the native form of its logical type. A `RawValue` is
//! what a row actually holds, which depends on the descriptor's storage type.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::types::LogicalType;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Integer(i64),
    BigNumber(Decimal),

    // Instants; dates keep millisecond precision, timestamps keep nanoseconds
    Date(DateTime<Utc>),
    Timestamp(DateTime<Utc>),

    Boolean(bool),
    Binary(Vec<u8>),
    InternetAddress(IpAddr),
    Serializable(Vec<u8>),
}

impl Value {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::String(_) => LogicalType::String,
            Value::Number(_) => LogicalType::Number,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigNumber(_) => LogicalType::BigNumber,
            Value::Date(_) => LogicalType::Date,
            Value::Timestamp(_) => LogicalType::Timestamp,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::Binary(_) => LogicalType::Binary,
            Value::InternetAddress(_) => LogicalType::InternetAddress,
            Value::Serializable(_) => LogicalType::Serializable,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "{v}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::BigNumber(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Timestamp(v) => {
                write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Binary(v) | Value::Serializable(v) => write!(f, "<{} bytes>", v.len()),
            Value::InternetAddress(v) => write!(f, "{v}"),
        }
    }
}

/// A cell as stored in a row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Native(Value),
    /// Encoded string form, see the descriptor's storage metadata.
    BinaryString(Vec<u8>),
    /// Dictionary code under indexed storage.
    Index(i32),
}

impl RawValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        RawValue::Native(Value::String(s.into()))
    }

    pub fn number(v: f64) -> Self {
        RawValue::Native(Value::Number(v))
    }

    pub fn integer(v: i64) -> Self {
        RawValue::Native(Value::Integer(v))
    }

    pub fn big_number(v: Decimal) -> Self {
        RawValue::Native(Value::BigNumber(v))
    }

    pub fn boolean(v: bool) -> Self {
        RawValue::Native(Value::Boolean(v))
    }

    pub fn date(v: DateTime<Utc>) -> Self {
        RawValue::Native(Value::Date(v))
    }

    pub fn timestamp(v: DateTime<Utc>) -> Self {
        RawValue::Native(Value::Timestamp(v))
    }

    pub fn binary(v: impl Into<Vec<u8>>) -> Self {
        RawValue::Native(Value::Binary(v.into()))
    }

    pub fn binary_string(v: impl Into<Vec<u8>>) -> Self {
        RawValue::BinaryString(v.into())
    }

    pub fn as_native(&self) -> Option<&Value> {
        match self {
            RawValue::Native(v) => Some(v),
            _ => None,
        }
    }

    /// Text used when a raw value shows up in an error.
    pub fn describe(&self) -> String {
        match self {
            RawValue::Null => "null".to_string(),
            RawValue::Native(v) => v.to_string(),
            RawValue::BinaryString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            RawValue::Index(code) => format!("#{code}"),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::Native(value)
    }
}

impl From<Option<Value>> for RawValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(RawValue::Null, RawValue::Native)
    }
}
