//! Big-endian binary records for descriptors and cells.
//!
//! Metadata record:
//!
//! ```text
//! type:i32 storage:i32 [dictionary | has-storage-meta:bool storage-meta]
//! name length:i32 precision:i32 origin comments mask decimal grouping currency
//! trim:i32 case-insensitive:bool collator-locale collator-disabled:bool
//! collator-strength:i32 descending:bool padding:bool date-lenient:bool
//! date-locale date-zone lenient-number:bool
//! ```
//!
//! Strings are `len:i32` (-1 for null) followed by UTF-8 bytes. A data
//! record starts with a null flag; running out of input exactly there is a
//! clean end of stream.

use std::io::{ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{ValueError, ValueResult};
use crate::meta::{DescriptorFactory, TypeDescriptor};
use crate::types::{LogicalType, RawValue, StorageType, TrimType, Value};

// -------- primitives --------

struct Output<'a, W: Write> {
    inner: &'a mut W,
    signature: String,
}

impl<W: Write> Output<'_, W> {
    fn bytes(&mut self, bytes: &[u8]) -> ValueResult<()> {
        self.inner.write_all(bytes).map_err(|e| io_failure(&self.signature, e))
    }

    fn int(&mut self, v: i32) -> ValueResult<()> {
        self.bytes(&v.to_be_bytes())
    }

    fn long(&mut self, v: i64) -> ValueResult<()> {
        self.bytes(&v.to_be_bytes())
    }

    fn double(&mut self, v: f64) -> ValueResult<()> {
        self.bytes(&v.to_bits().to_be_bytes())
    }

    fn boolean(&mut self, v: bool) -> ValueResult<()> {
        self.bytes(&[u8::from(v)])
    }

    fn blob(&mut self, v: Option<&[u8]>) -> ValueResult<()> {
        match v {
            None => self.int(-1),
            Some(bytes) => {
                let len = i32::try_from(bytes.len()).map_err(|_| ValueError::StreamCorruption {
                    signature: self.signature.clone(),
                    reason: format!("field of {} bytes is too large", bytes.len()),
                })?;
                self.int(len)?;
                self.bytes(bytes)
            }
        }
    }

    fn string(&mut self, v: Option<&str>) -> ValueResult<()> {
        self.blob(v.map(str::as_bytes))
    }
}

/// Upper bound on capacity reserved from a length read off the stream.
const MAX_PREALLOCATION: usize = 64 * 1024;

struct Input<'a, R: Read> {
    inner: &'a mut R,
    signature: String,
}

impl<R: Read> Input<'_, R> {
    /// Reads the first field of a record; no input at all is a clean end.
    fn leading(&mut self, buf: &mut [u8]) -> ValueResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Err(ValueError::EndOfStream),
                Ok(0) => return Err(self.corrupt("record truncated in its first field")),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(io_failure(&self.signature, e)),
            }
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) -> ValueResult<()> {
        self.inner.read_exact(buf).map_err(|e| io_failure(&self.signature, e))
    }

    fn int(&mut self) -> ValueResult<i32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn long(&mut self) -> ValueResult<i64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    fn double(&mut self) -> ValueResult<f64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(f64::from_bits(u64::from_be_bytes(buf)))
    }

    fn boolean(&mut self) -> ValueResult<bool> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0] != 0)
    }

    fn blob(&mut self) -> ValueResult<Option<Vec<u8>>> {
        let len = self.int()?;
        if len == -1 {
            return Ok(None);
        }
        let len = usize::try_from(len).map_err(|_| self.corrupt(format!("negative length {len}")))?;
        // the declared length is untrusted; grow with the data actually read
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        self.inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| io_failure(&self.signature, e))?;
        if buf.len() < len {
            let got = buf.len();
            return Err(self.corrupt(format!("field truncated after {got} of {len} bytes")));
        }
        Ok(Some(buf))
    }

    fn string(&mut self) -> ValueResult<Option<String>> {
        match self.blob()? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| self.corrupt("string field is not valid UTF-8")),
        }
    }

    fn required_string(&mut self, what: &str) -> ValueResult<String> {
        self.string()?
            .ok_or_else(|| self.corrupt(format!("{what} must not be null")))
    }

    fn corrupt(&self, reason: impl Into<String>) -> ValueError {
        ValueError::StreamCorruption {
            signature: self.signature.clone(),
            reason: reason.into(),
        }
    }
}

fn io_failure(signature: &str, err: std::io::Error) -> ValueError {
    match err.kind() {
        ErrorKind::UnexpectedEof => ValueError::StreamCorruption {
            signature: signature.to_string(),
            reason: "unexpected end of stream inside a record".to_string(),
        },
        ErrorKind::TimedOut | ErrorKind::WouldBlock => ValueError::Timeout {
            signature: signature.to_string(),
        },
        _ => ValueError::Io {
            signature: signature.to_string(),
            source: err,
        },
    }
}

// -------- metadata records --------

impl TypeDescriptor {
    pub fn write_meta<W: Write>(&self, out: &mut W) -> ValueResult<()> {
        let mut out = Output {
            inner: out,
            signature: self.to_string(),
        };
        self.write_meta_to(&mut out)
    }

    fn write_meta_to<W: Write>(&self, out: &mut Output<'_, W>) -> ValueResult<()> {
        out.int(self.logical_type().code())?;
        out.int(self.storage_type().id())?;

        match self.storage_type() {
            StorageType::Indexed => match self.index() {
                None => out.int(-1)?,
                Some(entries) => {
                    out.int(entries.len() as i32)?;
                    for entry in entries.iter() {
                        out.boolean(entry.is_none())?;
                        if let Some(value) = entry {
                            self.write_native(out, value)?;
                        }
                    }
                }
            },
            StorageType::BinaryString => match self.storage_metadata() {
                None => out.boolean(false)?,
                Some(storage) => {
                    out.boolean(true)?;
                    storage.write_meta_to(out)?;
                }
            },
            StorageType::Normal => {}
        }

        out.string(Some(self.name()))?;
        out.int(self.length())?;
        out.int(self.precision())?;
        out.string(self.origin())?;
        out.string(self.comments())?;
        out.string(self.conversion_mask())?;
        out.string(self.decimal_symbol())?;
        out.string(self.grouping_symbol())?;
        out.string(self.currency_symbol())?;
        out.int(self.trim_type().id())?;
        out.boolean(self.is_case_insensitive())?;
        out.string(self.collator_locale().map(bcp47).as_deref())?;
        out.boolean(self.is_collator_disabled())?;
        out.int(self.collator_strength())?;
        out.boolean(self.is_sorted_descending())?;
        out.boolean(self.is_output_padding())?;
        out.boolean(self.is_date_format_lenient())?;
        out.string(self.date_format_locale().map(bcp47).as_deref())?;
        out.string(self.date_format_time_zone())?;
        out.boolean(self.is_lenient_string_to_number())
    }

    // -------- data records --------

    pub fn write_data<W: Write>(&self, out: &mut W, raw: &RawValue) -> ValueResult<()> {
        let mut out = Output {
            inner: out,
            signature: self.to_string(),
        };

        out.boolean(raw.is_absent())?;
        match (self.storage_type(), raw) {
            (_, RawValue::Null) => Ok(()),
            (StorageType::BinaryString, RawValue::BinaryString(bytes)) => out.blob(Some(bytes.as_slice())),
            (StorageType::Indexed, RawValue::Index(code)) => out.int(*code),
            (StorageType::Normal, RawValue::Native(value)) => {
                let value = if value.logical_type() == self.logical_type() {
                    value.clone()
                } else {
                    self.convert_value(value, self.logical_type())?
                        .ok_or_else(|| self.unsupported(value, self.logical_type()))?
                };
                self.write_native(&mut out, &value)
            }
            (storage, other) => Err(self.storage_error(format!(
                "cannot write '{}' under {storage} storage",
                other.describe()
            ))),
        }
    }

    pub fn read_data<R: Read>(&self, input: &mut R) -> ValueResult<RawValue> {
        let mut input = Input {
            inner: input,
            signature: self.to_string(),
        };

        let mut flag = [0u8; 1];
        input.leading(&mut flag)?;
        if flag[0] != 0 {
            return Ok(RawValue::Null);
        }

        match self.storage_type() {
            StorageType::BinaryString => Ok(input
                .blob()?
                .map_or(RawValue::Null, RawValue::BinaryString)),
            StorageType::Indexed => Ok(RawValue::Index(input.int()?)),
            StorageType::Normal => Ok(self.read_native(&mut input)?.into()),
        }
    }

    fn write_native<W: Write>(&self, out: &mut Output<'_, W>, value: &Value) -> ValueResult<()> {
        match value {
            Value::String(s) => out.string(Some(s.as_str())),
            Value::Number(f) => out.double(*f),
            Value::Integer(i) => out.long(*i),
            Value::BigNumber(d) => out.string(Some(d.to_string().as_str())),
            Value::Date(dt) => out.long(dt.timestamp_millis()),
            Value::Timestamp(ts) => {
                out.long(ts.timestamp_millis())?;
                out.int(ts.timestamp_subsec_nanos() as i32)
            }
            Value::Boolean(b) => out.boolean(*b),
            Value::Binary(bytes) | Value::Serializable(bytes) => out.blob(Some(bytes.as_slice())),
            Value::InternetAddress(IpAddr::V4(v4)) => out.blob(Some(v4.octets().as_slice())),
            Value::InternetAddress(IpAddr::V6(v6)) => out.blob(Some(v6.octets().as_slice())),
        }
    }

    fn read_native<R: Read>(&self, input: &mut Input<'_, R>) -> ValueResult<Option<Value>> {
        Ok(Some(match self.logical_type() {
            LogicalType::String => return Ok(input.string()?.map(Value::String)),
            LogicalType::Number => Value::Number(input.double()?),
            LogicalType::Integer => Value::Integer(input.long()?),
            LogicalType::BigNumber => {
                let Some(text) = input.string()? else {
                    return Ok(None);
                };
                let d = Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|_| input.corrupt(format!("invalid big number '{text}'")))?;
                Value::BigNumber(d)
            }
            LogicalType::Date => {
                let ms = input.long()?;
                Value::Date(
                    DateTime::from_timestamp_millis(ms)
                        .ok_or_else(|| input.corrupt(format!("date out of range: {ms}")))?,
                )
            }
            LogicalType::Timestamp => {
                let ms = input.long()?;
                let nanos = input.int()?;
                Value::Timestamp(timestamp_from_parts(ms, nanos).ok_or_else(|| {
                    input.corrupt(format!("timestamp out of range: {ms} ms, {nanos} ns"))
                })?)
            }
            LogicalType::Boolean => Value::Boolean(input.boolean()?),
            LogicalType::Binary => return Ok(input.blob()?.map(Value::Binary)),
            LogicalType::Serializable => return Ok(input.blob()?.map(Value::Serializable)),
            LogicalType::InternetAddress => {
                let Some(octets) = input.blob()? else {
                    return Ok(None);
                };
                Value::InternetAddress(address_from_octets(&octets).ok_or_else(|| {
                    input.corrupt(format!("address of {} bytes", octets.len()))
                })?)
            }
            LogicalType::None => {
                return Err(input.corrupt("values of type None carry no payload"));
            }
        }))
    }
}

impl DescriptorFactory {
    /// Reads one metadata record.
    ///
    /// Returns [`ValueError::EndOfStream`] when the input is exhausted
    /// before the record starts.
    pub fn read_meta<R: Read>(&self, input: &mut R) -> ValueResult<TypeDescriptor> {
        let mut input = Input {
            inner: input,
            signature: "value-meta".to_string(),
        };
        let mut head = [0u8; 4];
        input.leading(&mut head)?;
        self.read_meta_from(&mut input, i32::from_be_bytes(head))
    }

    fn read_meta_from<R: Read>(&self, input: &mut Input<'_, R>, code: i32) -> ValueResult<TypeDescriptor> {
        let logical_type = LogicalType::from_code(code)
            .ok_or_else(|| input.corrupt(format!("unknown type code {code}")))?;
        let storage_id = input.int()?;
        let storage_type = StorageType::from_id(storage_id)
            .ok_or_else(|| input.corrupt(format!("unknown storage type {storage_id}")))?;

        let mut meta = self.create("", logical_type);
        meta.set_storage_type(storage_type);

        match storage_type {
            StorageType::Indexed => {
                let count = input.int()?;
                if count >= 0 {
                    let mut entries = Vec::with_capacity((count as usize).min(MAX_PREALLOCATION));
                    for _ in 0..count {
                        let is_null = input.boolean()?;
                        entries.push(if is_null {
                            None
                        } else {
                            meta.read_native(input)?
                        });
                    }
                    meta.set_index(Some(entries))?;
                }
            }
            StorageType::BinaryString => {
                if input.boolean()? {
                    let code = input.int()?;
                    let storage = self.read_meta_from(input, code)?;
                    meta.set_storage_metadata(Some(storage))?;
                }
            }
            StorageType::Normal => {}
        }

        meta.set_name(input.required_string("name")?);
        let length = input.int()?;
        let precision = input.int()?;
        meta.set_length_and_precision(length, precision);
        meta.set_origin(input.string()?);
        meta.set_comments(input.string()?);
        meta.set_conversion_mask(input.string()?);
        meta.set_decimal_symbol(input.string()?);
        meta.set_grouping_symbol(input.string()?);
        meta.set_currency_symbol(input.string()?);
        meta.set_trim_type(TrimType::from_id(input.int()?));
        meta.set_case_insensitive(input.boolean()?);
        meta.set_collator_locale(input.string()?);
        meta.set_collator_disabled(input.boolean()?);
        meta.set_collator_strength(input.int()?);
        meta.set_sorted_descending(input.boolean()?);
        meta.set_output_padding(input.boolean()?);
        meta.set_date_format_lenient(input.boolean()?);
        meta.set_date_format_locale(input.string()?);
        meta.set_date_format_time_zone(input.string()?);
        meta.set_lenient_string_to_number(input.boolean()?);
        Ok(meta)
    }
}

/// `en_US` style tags become `en-US`.
pub(crate) fn bcp47(tag: &str) -> String {
    tag.replace('_', "-")
}

pub(crate) fn timestamp_from_parts(ms: i64, nanos: i32) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(nanos).ok().filter(|n| *n < 1_000_000_000)?;
    DateTime::from_timestamp(ms.div_euclid(1000), nanos)
}

pub(crate) fn address_from_octets(octets: &[u8]) -> Option<IpAddr> {
    match octets.len() {
        4 => {
            let arr: [u8; 4] = octets.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(arr)))
        }
        16 => {
            let arr: [u8; 16] = octets.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(arr)))
        }
        _ => None,
    }
}
