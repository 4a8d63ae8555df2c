use std::net::IpAddr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::trace;

use crate::convert::charset;
use crate::error::ValueResult;
use crate::meta::TypeDescriptor;
use crate::types::{LogicalType, RawValue, StorageType, Value};

impl TypeDescriptor {
    /// Resolves a raw cell to its native value.
    ///
    /// A cell whose shape does not match the storage type is a storage error.
    pub fn native_value(&self, raw: &RawValue) -> ValueResult<Option<Value>> {
        match (self.storage_type(), raw) {
            (_, RawValue::Null) => Ok(None),
            (StorageType::Normal, RawValue::Native(v)) => Ok(Some(v.clone())),
            (StorageType::BinaryString, RawValue::BinaryString(bytes)) => {
                self.convert_binary_string_to_native(bytes)
            }
            (StorageType::Indexed, RawValue::Index(code)) => self.lookup_index(*code),
            (storage, other) => Err(self.storage_error(format!(
                "raw value '{}' does not match {storage} storage",
                other.describe()
            ))),
        }
    }

    fn lookup_index(&self, code: i32) -> ValueResult<Option<Value>> {
        let index = self
            .index()
            .ok_or_else(|| self.storage_error("indexed storage without a dictionary"))?;
        usize::try_from(code)
            .ok()
            .and_then(|i| index.get(i))
            .cloned()
            .ok_or_else(|| {
                self.storage_error(format!(
                    "dictionary code {code} out of range (size {})",
                    index.len()
                ))
            })
    }

    /// Decodes binary-string bytes through the storage metadata, then
    /// parses them under the storage metadata's masks.
    pub fn convert_binary_string_to_native(&self, bytes: &[u8]) -> ValueResult<Option<Value>> {
        let storage = self
            .storage_metadata()
            .ok_or_else(|| self.storage_error("binary-string storage without storage metadata"))?;
        self.count_binary_string_conversion();

        if bytes.is_empty() && !(self.is_string() && self.config.empty_string_differs_from_null) {
            return Ok(None);
        }

        let text = charset::decode(storage.encoding()?, bytes);
        trace!(descriptor = %self.name(), text = %text, "decoded binary string");

        if self.is_string() {
            return Ok(Some(Value::String(self.trim_type().apply(&text).to_string())));
        }
        storage.convert_value(&Value::String(text), self.logical_type())
    }

    /// Whether the cell counts as null. Unless the engine treats empty
    /// strings as distinct, empty text and zero-length bytes are null too.
    pub fn is_null(&self, raw: &RawValue) -> ValueResult<bool> {
        let empty_is_null = !self.config.empty_string_differs_from_null;
        Ok(match raw {
            RawValue::Null => true,
            RawValue::BinaryString(bytes) => empty_is_null && bytes.is_empty(),
            RawValue::Native(Value::String(s)) => empty_is_null && s.is_empty(),
            RawValue::Native(Value::Binary(b)) => empty_is_null && b.is_empty(),
            RawValue::Native(_) => false,
            RawValue::Index(code) => match self.lookup_index(*code)? {
                None => true,
                Some(Value::String(s)) => empty_is_null && s.is_empty(),
                Some(_) => false,
            },
        })
    }

    /// Native value converted to `target`.
    pub fn get_as(&self, raw: &RawValue, target: LogicalType) -> ValueResult<Option<Value>> {
        if target == LogicalType::String {
            return Ok(self.get_string(raw)?.map(Value::String));
        }
        match self.native_value(raw)? {
            Some(value) => self.convert_value(&value, target),
            None => Ok(None),
        }
    }

    /// String rendering under this descriptor's masks, trim type and
    /// output padding.
    pub fn get_string(&self, raw: &RawValue) -> ValueResult<Option<String>> {
        let rendered = match (self.storage_type(), raw) {
            // bytes already hold our own rendering
            (StorageType::BinaryString, RawValue::BinaryString(bytes))
                if self.is_identical_format() && !bytes.is_empty() =>
            {
                let storage = self.storage_metadata().ok_or_else(|| {
                    self.storage_error("binary-string storage without storage metadata")
                })?;
                Some(charset::decode(storage.encoding()?, bytes))
            }
            _ => match self.native_value(raw)? {
                Some(value) => match self.convert_value(&value, LogicalType::String)? {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                },
                None => None,
            },
        };

        let rendered = match rendered {
            Some(s) if self.is_string() => Some(self.trim_type().apply(&s).to_string()),
            other => other,
        };
        Ok(self.pad_output(rendered))
    }

    fn pad_output(&self, rendered: Option<String>) -> Option<String> {
        let length = usize::try_from(self.length()).unwrap_or(0);
        if !self.is_output_padding() || length == 0 {
            return rendered;
        }
        match rendered {
            None if matches!(self.logical_type(), LogicalType::Number | LogicalType::Integer) => {
                Some(" ".repeat(length))
            }
            None => None,
            Some(s) => {
                let count = s.chars().count();
                if count >= length {
                    if self.is_string() {
                        Some(s.chars().take(length).collect())
                    } else {
                        Some(s)
                    }
                } else {
                    Some(format!("{s}{}", " ".repeat(length - count)))
                }
            }
        }
    }

    pub fn get_number(&self, raw: &RawValue) -> ValueResult<Option<f64>> {
        Ok(match self.get_as(raw, LogicalType::Number)? {
            Some(Value::Number(f)) => Some(f),
            _ => None,
        })
    }

    pub fn get_integer(&self, raw: &RawValue) -> ValueResult<Option<i64>> {
        Ok(match self.get_as(raw, LogicalType::Integer)? {
            Some(Value::Integer(i)) => Some(i),
            _ => None,
        })
    }

    pub fn get_big_number(&self, raw: &RawValue) -> ValueResult<Option<Decimal>> {
        Ok(match self.get_as(raw, LogicalType::BigNumber)? {
            Some(Value::BigNumber(d)) => Some(d),
            _ => None,
        })
    }

    pub fn get_boolean(&self, raw: &RawValue) -> ValueResult<Option<bool>> {
        Ok(match self.get_as(raw, LogicalType::Boolean)? {
            Some(Value::Boolean(b)) => Some(b),
            _ => None,
        })
    }

    pub fn get_date(&self, raw: &RawValue) -> ValueResult<Option<DateTime<Utc>>> {
        Ok(match self.get_as(raw, LogicalType::Date)? {
            Some(Value::Date(d)) => Some(d),
            _ => None,
        })
    }

    pub fn get_timestamp(&self, raw: &RawValue) -> ValueResult<Option<DateTime<Utc>>> {
        Ok(match self.get_as(raw, LogicalType::Timestamp)? {
            Some(Value::Timestamp(t)) => Some(t),
            _ => None,
        })
    }

    /// Binary form; only Binary and String descriptors have one.
    pub fn get_binary(&self, raw: &RawValue) -> ValueResult<Option<Vec<u8>>> {
        Ok(match self.get_as(raw, LogicalType::Binary)? {
            Some(Value::Binary(b)) => Some(b),
            _ => None,
        })
    }

    pub fn get_internet_address(&self, raw: &RawValue) -> ValueResult<Option<IpAddr>> {
        Ok(match self.get_as(raw, LogicalType::InternetAddress)? {
            Some(Value::InternetAddress(a)) => Some(a),
            _ => None,
        })
    }

    /// Encoded string form.
    ///
    /// Binary-string cells are returned as-is when the identical-format
    /// flag says no re-encoding is needed.
    pub fn get_binary_string(&self, raw: &RawValue) -> ValueResult<Option<Vec<u8>>> {
        if let (StorageType::BinaryString, RawValue::BinaryString(bytes)) = (self.storage_type(), raw) {
            if self.is_identical_format() {
                return Ok(Some(bytes.clone()));
            }
        }
        match self.get_string(raw)? {
            Some(s) => Ok(Some(charset::encode(self.encoding()?, &s))),
            None => Ok(None),
        }
    }
}
