use std::net::IpAddr;

use crate::error::ValueResult;
use crate::meta::TypeDescriptor;
use crate::types::{RawValue, Value};

impl TypeDescriptor {
    /// 32-bit hash of a cell. Nulls hash to the per-type sentinel; other
    /// values hash their native form with the usual JVM hash functions so
    /// that hashes agree with rows partitioned by other engines.
    pub fn hash_value(&self, raw: &RawValue) -> ValueResult<i32> {
        if self.is_null(raw)? {
            return Ok(self.logical_type().null_hash_sentinel());
        }
        let value = self.get_as(raw, self.logical_type())?;
        Ok(value.as_ref().map_or_else(
            || self.logical_type().null_hash_sentinel(),
            native_hash,
        ))
    }
}

fn native_hash(value: &Value) -> i32 {
    match value {
        Value::String(s) => java_string_hash(s),
        Value::Number(f) => {
            let bits = if f.is_nan() {
                0x7ff8_0000_0000_0000
            } else {
                f.to_bits()
            };
            fold_u64(bits)
        }
        Value::Integer(i) => fold_u64(*i as u64),
        Value::BigNumber(d) => java_string_hash(&d.normalize().to_string()),
        Value::Date(dt) | Value::Timestamp(dt) => fold_u64(dt.timestamp_millis() as u64),
        Value::Boolean(b) => {
            if *b {
                1231
            } else {
                1237
            }
        }
        Value::Binary(bytes) | Value::Serializable(bytes) => java_bytes_hash(bytes),
        Value::InternetAddress(addr) => match addr {
            IpAddr::V4(v4) => u32::from(*v4) as i32,
            IpAddr::V6(v6) => java_bytes_hash(&v6.octets()),
        },
    }
}

fn fold_u64(v: u64) -> i32 {
    (v ^ (v >> 32)) as i32
}

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units, wrapping.
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Polynomial 31 over signed bytes, seeded with 1.
pub fn java_bytes_hash(bytes: &[u8]) -> i32 {
    bytes
        .iter()
        .fold(1i32, |h, b| h.wrapping_mul(31).wrapping_add(i32::from(*b as i8)))
}
