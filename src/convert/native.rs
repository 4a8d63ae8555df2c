//! Pairwise conversions between native values.
//!
//! The descriptor that *holds* the value supplies the rules: its masks,
//! symbols, zone, trim type and leniency. Each source type has one function
//! mapping it to every target it supports; anything else is an
//! `UnsupportedConversion`.

use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use encoding_rs::Encoding;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::trace;

use crate::convert::charset;
use crate::error::{ValueError, ValueResult};
use crate::format::{FormatError, ParsedNumber};
use crate::meta::TypeDescriptor;
use crate::types::{LogicalType, Value};

impl TypeDescriptor {
    /// Converts a native value held under this descriptor into `target`.
    ///
    /// `Ok(None)` means the value maps to null (for example blank text
    /// parsed as a number).
    pub fn convert_value(&self, value: &Value, target: LogicalType) -> ValueResult<Option<Value>> {
        match value {
            Value::String(s) => self.convert_string(s, target),
            Value::Number(f) => self.convert_number(*f, target),
            Value::Integer(i) => self.convert_integer(*i, target),
            Value::BigNumber(d) => self.convert_big_number(d, target),
            Value::Date(dt) => self.convert_date(dt, target),
            Value::Timestamp(ts) => self.convert_timestamp(ts, target),
            Value::Boolean(b) => self.convert_boolean(*b, target),
            Value::Binary(bytes) => self.convert_binary(bytes, target),
            Value::InternetAddress(addr) => self.convert_address(addr, target),
            Value::Serializable(bytes) => match target {
                LogicalType::Serializable => Ok(Some(value.clone())),
                LogicalType::String => Ok(Some(Value::String(hex(bytes)))),
                _ => Err(self.unsupported(value, target)),
            },
        }
    }

    /// Charset used to encode and decode this descriptor's strings.
    pub fn encoding(&self) -> ValueResult<&'static Encoding> {
        let label = self
            .string_encoding()
            .unwrap_or(self.config.encoding.as_str());
        charset::lookup(label).ok_or_else(|| ValueError::Encoding {
            signature: self.to_string(),
            encoding: label.to_string(),
        })
    }

    pub fn is_single_byte_encoding(&self) -> bool {
        self.encoding().is_ok_and(charset::is_single_byte)
    }

    // -------- String --------

    fn convert_string(&self, s: &str, target: LogicalType) -> ValueResult<Option<Value>> {
        match target {
            LogicalType::String => Ok(Some(Value::String(self.trim_type().apply(s).to_string()))),
            LogicalType::Number => Ok(self
                .parse_number(s, LogicalType::Number)?
                .map(|p| Value::Number(p.to_f64()))),
            LogicalType::Integer => Ok(self
                .parse_number(s, LogicalType::Integer)?
                .map(|p| Value::Integer(p.to_i64()))),
            LogicalType::BigNumber => self.parse_big_number(s),
            LogicalType::Date => Ok(self
                .parse_date(s, LogicalType::Date)?
                .map(|dt| Value::Date(truncate_to_millis(dt)))),
            LogicalType::Timestamp => Ok(self
                .parse_date(s, LogicalType::Timestamp)?
                .map(Value::Timestamp)),
            LogicalType::Boolean => Ok(parse_boolean(self.trim_type().apply(s)).map(Value::Boolean)),
            LogicalType::Binary => Ok(Some(Value::Binary(charset::encode(self.encoding()?, s)))),
            LogicalType::InternetAddress => {
                let text = self.trim_type().apply(s);
                if text.is_empty() {
                    return Ok(None);
                }
                IpAddr::from_str(text.trim())
                    .map(|addr| Some(Value::InternetAddress(addr)))
                    .map_err(|e| self.parse_error(s, 0, e.to_string()))
            }
            LogicalType::Serializable | LogicalType::None => Err(self.unsupported(s, target)),
        }
    }

    /// Parses `s` with the number mask this descriptor uses for `target`.
    ///
    /// Trailing text is an error unless lenient string-to-number parsing is on.
    pub(crate) fn parse_number(&self, s: &str, target: LogicalType) -> ValueResult<Option<ParsedNumber>> {
        let text = self.trim_type().apply(s);
        if text.is_empty() {
            return Ok(None);
        }

        let format = self.number_format(target)?;
        let parsed = format.parse(text).map_err(|e| self.format_failure(s, e))?;

        let consumed_all = parsed.end >= text.chars().count();
        if !consumed_all {
            if !self.is_lenient_string_to_number() {
                return Err(self.parse_error(
                    s,
                    parsed.end,
                    format!("non-numeric character found at position {}", parsed.end + 1),
                ));
            }
            trace!(descriptor = %self.name(), value = s, end = parsed.end, "lenient parse ignored trailing text");
        }
        Ok(Some(parsed))
    }

    fn parse_big_number(&self, s: &str) -> ValueResult<Option<Value>> {
        match self.parse_number(s, LogicalType::BigNumber) {
            Ok(None) => Ok(None),
            Ok(Some(parsed)) => parsed
                .to_decimal()
                .map(|d| Some(Value::BigNumber(d)))
                .ok_or_else(|| self.parse_error(s, 0, "value out of range for BigNumber")),
            Err(err) => {
                // plain decimal text is always accepted
                let text = self.trim_type().apply(s).trim();
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .map(|d| Some(Value::BigNumber(d)))
                    .map_err(|_| err)
            }
        }
    }

    pub(crate) fn parse_date(&self, s: &str, target: LogicalType) -> ValueResult<Option<DateTime<Utc>>> {
        let text = self.trim_type().apply(s);
        if text.is_empty() {
            return Ok(None);
        }

        let formatter = self.date_format(target)?;
        let (instant, end) = formatter
            .pattern
            .parse(text, formatter.zone, formatter.lenient)
            .map_err(|e| self.format_failure(s, e))?;

        if !formatter.lenient {
            let rest: String = text.chars().skip(end).collect();
            if !rest.trim().is_empty() {
                return Err(self.parse_error(
                    s,
                    end,
                    format!("unexpected trailing text '{}'", rest.trim()),
                ));
            }
        }
        Ok(Some(instant))
    }

    fn format_failure(&self, s: &str, err: FormatError) -> ValueError {
        match err {
            FormatError::Unparseable { offset, reason } => self.parse_error(s, offset, reason),
            other => self.parse_error(s, 0, other.to_string()),
        }
    }

    // -------- Number --------

    fn convert_number(&self, f: f64, target: LogicalType) -> ValueResult<Option<Value>> {
        Ok(Some(match target {
            LogicalType::String => Value::String(self.number_format(LogicalType::Number)?.format_f64(f)),
            LogicalType::Number => Value::Number(f),
            LogicalType::Integer => Value::Integer(round_half_up(f)),
            LogicalType::BigNumber => Value::BigNumber(
                f64_to_decimal(f).ok_or_else(|| self.unsupported(f, target))?,
            ),
            LogicalType::Boolean => Value::Boolean(f != 0.0),
            LogicalType::Date => Value::Date(self.from_millis(f as i64, target)?),
            LogicalType::Timestamp => Value::Timestamp(self.from_millis(f as i64, target)?),
            _ => return Err(self.unsupported(f, target)),
        }))
    }

    // -------- Integer --------

    fn convert_integer(&self, i: i64, target: LogicalType) -> ValueResult<Option<Value>> {
        Ok(Some(match target {
            LogicalType::String => Value::String(self.number_format(LogicalType::Integer)?.format_i64(i)),
            LogicalType::Number => Value::Number(i as f64),
            LogicalType::Integer => Value::Integer(i),
            LogicalType::BigNumber => Value::BigNumber(Decimal::from(i)),
            LogicalType::Boolean => Value::Boolean(i != 0),
            LogicalType::Date => Value::Date(self.from_millis(i, target)?),
            LogicalType::Timestamp => Value::Timestamp(self.from_millis(i, target)?),
            _ => return Err(self.unsupported(i, target)),
        }))
    }

    // -------- BigNumber --------

    fn convert_big_number(&self, d: &Decimal, target: LogicalType) -> ValueResult<Option<Value>> {
        Ok(Some(match target {
            LogicalType::String => {
                Value::String(self.number_format(LogicalType::BigNumber)?.format_decimal(d))
            }
            LogicalType::Number => Value::Number(d.to_f64().ok_or_else(|| self.unsupported(d, target))?),
            LogicalType::Integer => {
                Value::Integer(decimal_half_up(d).ok_or_else(|| self.unsupported(d, target))?)
            }
            LogicalType::BigNumber => Value::BigNumber(*d),
            LogicalType::Boolean => Value::Boolean(!d.is_zero()),
            LogicalType::Date => {
                let ms = decimal_half_up(d).ok_or_else(|| self.unsupported(d, target))?;
                Value::Date(self.from_millis(ms, target)?)
            }
            LogicalType::Timestamp => {
                let whole = d.floor();
                let ms = whole.to_i64().ok_or_else(|| self.unsupported(d, target))?;
                let sub_ms_nanos = ((d - whole) * Decimal::from(1_000_000))
                    .trunc()
                    .to_i64()
                    .unwrap_or(0);
                Value::Timestamp(self.from_millis(ms, target)? + Duration::nanoseconds(sub_ms_nanos))
            }
            _ => return Err(self.unsupported(d, target)),
        }))
    }

    // -------- Date / Timestamp --------

    fn convert_date(&self, dt: &DateTime<Utc>, target: LogicalType) -> ValueResult<Option<Value>> {
        let ms = dt.timestamp_millis();
        Ok(Some(match target {
            LogicalType::String => {
                let formatter = self.date_format(LogicalType::Date)?;
                Value::String(formatter.pattern.format(dt, formatter.zone))
            }
            LogicalType::Number => Value::Number(ms as f64),
            LogicalType::Integer => Value::Integer(ms),
            LogicalType::BigNumber => Value::BigNumber(Decimal::from(ms)),
            LogicalType::Boolean => Value::Boolean(ms != 0),
            LogicalType::Date => Value::Date(*dt),
            LogicalType::Timestamp => Value::Timestamp(*dt),
            _ => return Err(self.unsupported(Value::Date(*dt), target)),
        }))
    }

    fn convert_timestamp(&self, ts: &DateTime<Utc>, target: LogicalType) -> ValueResult<Option<Value>> {
        let ms = ts.timestamp_millis();
        Ok(Some(match target {
            LogicalType::String => {
                let formatter = self.date_format(LogicalType::Timestamp)?;
                Value::String(formatter.pattern.format(ts, formatter.zone))
            }
            LogicalType::Number => Value::Number(ms as f64),
            LogicalType::Integer => Value::Integer(ms),
            LogicalType::BigNumber => {
                let sub_ms_nanos = i64::from(ts.timestamp_subsec_nanos() % 1_000_000);
                Value::BigNumber(Decimal::from(ms) + Decimal::new(sub_ms_nanos, 6))
            }
            LogicalType::Boolean => Value::Boolean(ms != 0),
            LogicalType::Date => Value::Date(truncate_to_millis(*ts)),
            LogicalType::Timestamp => Value::Timestamp(*ts),
            _ => return Err(self.unsupported(Value::Timestamp(*ts), target)),
        }))
    }

    fn from_millis(&self, ms: i64, target: LogicalType) -> ValueResult<DateTime<Utc>> {
        DateTime::from_timestamp_millis(ms).ok_or_else(|| self.unsupported(ms, target))
    }

    // -------- Boolean --------

    fn convert_boolean(&self, b: bool, target: LogicalType) -> ValueResult<Option<Value>> {
        Ok(Some(match target {
            LogicalType::String => Value::String(self.boolean_text(b).to_string()),
            LogicalType::Number => Value::Number(if b { 1.0 } else { 0.0 }),
            LogicalType::Integer => Value::Integer(i64::from(b)),
            LogicalType::BigNumber => Value::BigNumber(if b { Decimal::ONE } else { Decimal::ZERO }),
            LogicalType::Boolean => Value::Boolean(b),
            _ => return Err(self.unsupported(b, target)),
        }))
    }

    /// `true`/`false` when the length allows three characters, `Y`/`N` otherwise.
    fn boolean_text(&self, b: bool) -> &'static str {
        match (self.length() >= 3, b) {
            (true, true) => "true",
            (true, false) => "false",
            (false, true) => "Y",
            (false, false) => "N",
        }
    }

    // -------- Binary --------

    fn convert_binary(&self, bytes: &[u8], target: LogicalType) -> ValueResult<Option<Value>> {
        match target {
            LogicalType::Binary => Ok(Some(Value::Binary(bytes.to_vec()))),
            LogicalType::String => Ok(Some(Value::String(charset::decode(self.encoding()?, bytes)))),
            _ => Err(self.unsupported(Value::Binary(bytes.to_vec()), target)),
        }
    }

    // -------- Internet address --------

    fn convert_address(&self, addr: &IpAddr, target: LogicalType) -> ValueResult<Option<Value>> {
        let numeric = || -> u128 {
            match addr {
                IpAddr::V4(v4) => u128::from(u32::from(*v4)),
                IpAddr::V6(v6) => u128::from(*v6),
            }
        };
        Ok(Some(match target {
            LogicalType::String => Value::String(addr.to_string()),
            LogicalType::InternetAddress => Value::InternetAddress(*addr),
            LogicalType::Integer => Value::Integer(
                i64::try_from(numeric()).map_err(|_| self.unsupported(addr, target))?,
            ),
            LogicalType::Number => Value::Number(numeric() as f64),
            LogicalType::BigNumber => Value::BigNumber(
                Decimal::from_u128(numeric()).ok_or_else(|| self.unsupported(addr, target))?,
            ),
            _ => return Err(self.unsupported(addr, target)),
        }))
    }
}

/// `Y`, `YES`, `TRUE` (any case) and `1` are true; blank is null.
pub(crate) fn parse_boolean(s: &str) -> Option<bool> {
    if s.is_empty() {
        return None;
    }
    Some(
        s.eq_ignore_ascii_case("Y")
            || s.eq_ignore_ascii_case("YES")
            || s.eq_ignore_ascii_case("TRUE")
            || s == "1",
    )
}

/// Half-up rounding toward positive infinity on ties, saturating at the i64 bounds.
pub(crate) fn round_half_up(f: f64) -> i64 {
    if f.is_nan() {
        return 0;
    }
    (f + 0.5).floor() as i64
}

/// Same rounding as [`round_half_up`]; `None` when the result leaves i64.
fn decimal_half_up(d: &Decimal) -> Option<i64> {
    d.checked_add(Decimal::new(5, 1))?.floor().to_i64()
}

pub(crate) fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_str(&f.to_string())
        .or_else(|_| Decimal::from_scientific(&format!("{f:e}")))
        .ok()
}

pub(crate) fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
