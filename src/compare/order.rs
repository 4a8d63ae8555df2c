use std::cmp::Ordering;

use tracing::trace;

use crate::error::ValueResult;
use crate::meta::TypeDescriptor;
use crate::types::{LogicalType, RawValue, StorageType, Value};

impl TypeDescriptor {
    /// Compares two cells held under this descriptor.
    pub fn compare(&self, a: &RawValue, b: &RawValue) -> ValueResult<Ordering> {
        // same-format strings compare on their bytes
        if let (RawValue::BinaryString(x), RawValue::BinaryString(y)) = (a, b) {
            if self.storage_type() == StorageType::BinaryString
                && self.is_string()
                && self.is_identical_format()
                && self.is_collator_disabled()
                && !self.is_case_insensitive()
                && self.storage_metadata().is_some_and(|s| s.is_single_byte_encoding())
                && !x.is_empty()
                && !y.is_empty()
            {
                return Ok(self.directed(x.as_slice().cmp(y.as_slice())));
            }
        }
        let left = self.native_value(a)?;
        let right = self.native_value(b)?;
        self.compare_values(left.as_ref(), right.as_ref())
    }

    /// Compares a cell of ours with a cell held under `other`.
    ///
    /// Storage is reconciled by decoding each side through its own
    /// descriptor. A differing logical type is converted into ours, except
    /// Integer against Number which compares as numbers under the Number
    /// side's rules.
    pub fn compare_with(&self, a: &RawValue, other: &TypeDescriptor, b: &RawValue) -> ValueResult<Ordering> {
        if self.logical_type() == other.logical_type() {
            if self.storage_type() == other.storage_type() && self.storage_type() == StorageType::Normal {
                return self.compare(a, b);
            }
            trace!(
                left = %self, right = %other,
                "comparing across storage types"
            );
            let left = self.native_value(a)?;
            let right = other.native_value(b)?;
            return self.compare_values(left.as_ref(), right.as_ref());
        }

        if self.logical_type() == LogicalType::Integer && other.logical_type() == LogicalType::Number {
            let left = self.get_number(a)?.map(Value::Number);
            let right = other.get_number(b)?.map(Value::Number);
            return other.compare_values(left.as_ref(), right.as_ref());
        }

        let left = self.native_value(a)?;
        let right = other.get_as(b, self.logical_type())?;
        self.compare_values(left.as_ref(), right.as_ref())
    }

    /// Orders two native values with this descriptor's rules.
    pub(crate) fn compare_values(&self, a: Option<&Value>, b: Option<&Value>) -> ValueResult<Ordering> {
        let a = a.filter(|v| !self.counts_as_null(v));
        let b = b.filter(|v| !self.counts_as_null(v));

        let (a, b) = match (a, b) {
            (None, None) => return Ok(Ordering::Equal),
            (None, Some(_)) => return Ok(Ordering::Less),
            (Some(_), None) => return Ok(Ordering::Greater),
            (Some(a), Some(b)) => (a, b),
        };

        let ordering = match (a, b) {
            (Value::String(x), Value::String(y)) => self.compare_strings(x, y)?,
            (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
            (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
            (Value::BigNumber(x), Value::BigNumber(y)) => x.cmp(y),
            (Value::Date(x), Value::Date(y))
            | (Value::Timestamp(x), Value::Timestamp(y))
            | (Value::Date(x), Value::Timestamp(y))
            | (Value::Timestamp(x), Value::Date(y)) => x.cmp(y),
            (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
            (Value::Binary(x), Value::Binary(y)) => x.cmp(y),
            (Value::InternetAddress(x), Value::InternetAddress(y)) => x.cmp(y),
            // mixed native types under normal storage: compare in our type
            _ => {
                let target = self.logical_type();
                if a.logical_type() == target && b.logical_type() == target {
                    return Err(self.unsupported(a, target));
                }
                let x = self.convert_value(a, target)?;
                let y = self.convert_value(b, target)?;
                return self.compare_values(x.as_ref(), y.as_ref());
            }
        };
        Ok(self.directed(ordering))
    }

    fn counts_as_null(&self, value: &Value) -> bool {
        if self.config.empty_string_differs_from_null {
            return false;
        }
        match value {
            Value::String(s) => s.is_empty(),
            Value::Binary(b) => b.is_empty(),
            _ => false,
        }
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        if self.is_sorted_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }
}
