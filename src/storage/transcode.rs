//! Moving cells between storage representations, plus the
//! locale-independent rendering used by the XML codec.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::convert::charset;
use crate::error::ValueResult;
use crate::meta::TypeDescriptor;
use crate::types::{LogicalType, RawValue, StorageType, Value};

/// Fixed masks (UTC) for the locale-independent rendering.
pub const COMPATIBLE_DATE_MASK: &str = "yyyy/MM/dd HH:mm:ss.SSS";
pub const COMPATIBLE_TIMESTAMP_MASK: &str = "yyyy/MM/dd HH:mm:ss.SSSSSSSSS";

const CHRONO_DATE: &str = "%Y/%m/%d %H:%M:%S%.3f";
const CHRONO_TIMESTAMP: &str = "%Y/%m/%d %H:%M:%S%.9f";
const CHRONO_PARSE: &str = "%Y/%m/%d %H:%M:%S%.f";

impl TypeDescriptor {
    /// Resolves a cell held under any storage into a normal-storage cell.
    pub fn convert_to_normal_storage(&self, raw: &RawValue) -> ValueResult<RawValue> {
        match (self.storage_type(), raw) {
            (StorageType::Normal, _) => Ok(raw.clone()),
            _ => Ok(self.native_value(raw)?.into()),
        }
    }

    /// Encodes a native value the way binary-string storage expects it:
    /// rendered with the storage metadata's rules and charset, or our own
    /// when there is no storage metadata.
    pub fn convert_normal_storage_to_binary_string(&self, value: &Value) -> ValueResult<Vec<u8>> {
        let renderer = self.storage_metadata().unwrap_or(self);
        let text = match renderer.convert_value(value, LogicalType::String)? {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        Ok(charset::encode(renderer.encoding()?, &text))
    }

    /// Re-expresses a cell under binary-string storage.
    pub fn convert_to_binary_string_storage(&self, raw: &RawValue) -> ValueResult<RawValue> {
        match (self.storage_type(), raw) {
            (_, RawValue::Null) => Ok(RawValue::Null),
            (StorageType::BinaryString, RawValue::BinaryString(_)) => Ok(raw.clone()),
            _ => match self.native_value(raw)? {
                Some(value) => Ok(RawValue::BinaryString(
                    self.convert_normal_storage_to_binary_string(&value)?,
                )),
                None => Ok(RawValue::Null),
            },
        }
    }

    /// Deep copy of a cell. Dictionary codes stay codes.
    pub fn clone_value(&self, raw: &RawValue) -> RawValue {
        raw.clone()
    }

    /// Rendering that reads back without this descriptor's masks: dates in
    /// a fixed UTC pattern, numbers in plain decimal notation.
    pub fn get_compatible_string(&self, raw: &RawValue) -> ValueResult<Option<String>> {
        if !self.logical_type().is_masked() {
            return self.get_string(raw);
        }
        Ok(self
            .get_as(raw, self.logical_type())?
            .as_ref()
            .and_then(compatible_text))
    }
}

/// Locale-independent text for numeric and temporal values.
pub(crate) fn compatible_text(value: &Value) -> Option<String> {
    match value {
        Value::Date(d) => Some(d.format(CHRONO_DATE).to_string()),
        Value::Timestamp(t) => Some(t.format(CHRONO_TIMESTAMP).to_string()),
        Value::Number(f) => Some(format!("{f:?}")),
        Value::Integer(i) => Some(i.to_string()),
        Value::BigNumber(d) => Some(d.normalize().to_string()),
        Value::InternetAddress(a) => Some(a.to_string()),
        _ => None,
    }
}

/// Reads text produced by [`TypeDescriptor::get_compatible_string`] for
/// Date and Timestamp.
pub(crate) fn parse_compatible_instant(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), CHRONO_PARSE)
        .ok()
        .map(|naive| naive.and_utc())
}
