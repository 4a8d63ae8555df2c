use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use rowvalue::{LogicalType, Value};

#[allow(dead_code)]
pub fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 31, 8, 9, 10).unwrap() + Duration::milliseconds(123)
}

#[allow(dead_code)]
pub fn precise_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 15, 23, 59, 1).unwrap() + Duration::nanoseconds(987_654_321)
}

/// A few representative values per logical type.
#[allow(dead_code)]
pub fn samples(logical_type: LogicalType) -> Vec<Value> {
    match logical_type {
        LogicalType::String => vec![
            Value::String("alpha".into()),
            Value::String("Ünïcödé ✓".into()),
            Value::String(" padded ".into()),
        ],
        LogicalType::Number => vec![
            Value::Number(0.0),
            Value::Number(1234.5),
            Value::Number(-0.125),
            Value::Number(1e-3),
        ],
        LogicalType::Integer => vec![
            Value::Integer(0),
            Value::Integer(42),
            Value::Integer(-7),
            Value::Integer(i64::MAX),
        ],
        LogicalType::BigNumber => vec![
            Value::BigNumber(Decimal::from_str("123456789012345678.123456789").unwrap()),
            Value::BigNumber(Decimal::from_str("-0.5").unwrap()),
            Value::BigNumber(Decimal::ZERO),
        ],
        LogicalType::Boolean => vec![Value::Boolean(true), Value::Boolean(false)],
        LogicalType::Date => vec![
            Value::Date(instant()),
            Value::Date(Utc.with_ymd_and_hms(1969, 12, 31, 23, 0, 0).unwrap()),
        ],
        LogicalType::Timestamp => vec![
            Value::Timestamp(precise_instant()),
            Value::Timestamp(instant()),
        ],
        LogicalType::Binary => vec![Value::Binary(vec![0, 1, 2, 254, 255]), Value::Binary(vec![])],
        LogicalType::Serializable => vec![Value::Serializable(vec![0xca, 0xfe, 0xba, 0xbe])],
        LogicalType::InternetAddress => vec![
            Value::InternetAddress(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
            Value::InternetAddress(IpAddr::V6(Ipv6Addr::LOCALHOST)),
        ],
        LogicalType::None => vec![],
    }
}

/// Types whose values survive a trip through XML text unchanged.
#[allow(dead_code)]
pub const XML_TYPES: [LogicalType; 9] = [
    LogicalType::String,
    LogicalType::Number,
    LogicalType::Integer,
    LogicalType::BigNumber,
    LogicalType::Boolean,
    LogicalType::Date,
    LogicalType::Timestamp,
    LogicalType::Binary,
    LogicalType::InternetAddress,
];
