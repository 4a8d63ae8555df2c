//! Decimal pattern engine.
//!
//! Patterns follow the familiar `#,##0.00;(#,##0.00)` syntax:
//! - `0` mandatory digit, `#` optional digit
//! - `,` grouping separator, `.` decimal separator
//! - `%` and `‰` scale by 100 and 1000, `¤` inserts the currency symbol
//! - `'...'` quotes literal affix text, `''` is a single quote
//! - an optional `;` clause supplies the negative prefix and suffix
//!
//! Formatting rounds half-even. Parsing reports the offset where it stopped.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::format::errors::{FormatError, FormatResult};

const DIGIT_CHARS: [char; 4] = ['#', '0', ',', '.'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalSymbols {
    pub decimal: char,
    pub grouping: Option<char>,
    pub currency: String,
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        Self {
            decimal: '.',
            grouping: Some(','),
            currency: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalPattern {
    pattern: String,
    symbols: DecimalSymbols,

    positive_prefix: String,
    positive_suffix: String,
    negative_prefix: String,
    negative_suffix: String,

    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping_size: usize,
    /// Power of ten applied before formatting (`%` = 2, `‰` = 3).
    scale: i32,
    decimal_always_shown: bool,
}

#[derive(Debug, Default)]
struct Clause {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping_size: usize,
    scale: i32,
    decimal_always_shown: bool,
    has_digits: bool,
}

impl DecimalPattern {
    pub fn compile(pattern: &str, symbols: DecimalSymbols) -> FormatResult<Self> {
        let (positive, negative) = split_clauses(pattern);

        let pos = parse_clause(positive, &symbols)?;
        if !pos.has_digits {
            return Err(FormatError::invalid(format!(
                "'{pattern}' contains no digit placeholders"
            )));
        }

        let (negative_prefix, negative_suffix) = match negative {
            Some(neg) => {
                let neg = parse_clause(neg, &symbols)?;
                (neg.prefix, neg.suffix)
            }
            None => (format!("-{}", pos.prefix), pos.suffix.clone()),
        };

        Ok(Self {
            pattern: pattern.to_string(),
            symbols,
            positive_prefix: pos.prefix,
            positive_suffix: pos.suffix,
            negative_prefix,
            negative_suffix,
            min_int: pos.min_int,
            min_frac: pos.min_frac,
            max_frac: pos.max_frac,
            grouping_size: pos.grouping_size,
            scale: pos.scale,
            decimal_always_shown: pos.decimal_always_shown,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn max_fraction_digits(&self) -> usize {
        self.max_frac
    }

    pub fn format_f64(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let (prefix, suffix) = self.affixes(value < 0.0);
            return format!("{prefix}\u{221e}{suffix}");
        }
        self.format_digits(Digits::from_f64(value))
    }

    pub fn format_i64(&self, value: i64) -> String {
        self.format_digits(Digits::from_plain(&value.to_string()))
    }

    pub fn format_decimal(&self, value: &Decimal) -> String {
        self.format_digits(Digits::from_plain(&value.to_string()))
    }

    fn affixes(&self, negative: bool) -> (&str, &str) {
        if negative {
            (&self.negative_prefix, &self.negative_suffix)
        } else {
            (&self.positive_prefix, &self.positive_suffix)
        }
    }

    fn format_digits(&self, mut digits: Digits) -> String {
        digits.point += self.scale;
        digits.round_half_even(self.max_frac);

        let (int_digits, frac_digits) = digits.split();

        let mut int_part: String = int_digits.iter().map(|d| char::from(b'0' + d)).collect();
        while int_part.len() < self.min_int {
            int_part.insert(0, '0');
        }

        let mut frac_part: String = frac_digits.iter().map(|d| char::from(b'0' + d)).collect();
        while frac_part.len() < self.min_frac {
            frac_part.push('0');
        }

        if int_part.is_empty() && frac_part.is_empty() {
            int_part.push('0');
        }

        let mut out = String::new();
        let (prefix, suffix) = self.affixes(digits.negative && !digits.is_zero());
        out.push_str(prefix);
        out.push_str(&self.group(&int_part));
        if !frac_part.is_empty() || self.decimal_always_shown {
            out.push(self.symbols.decimal);
        }
        out.push_str(&frac_part);
        out.push_str(suffix);
        out
    }

    fn group(&self, int_part: &str) -> String {
        let Some(sep) = self.symbols.grouping else {
            return int_part.to_string();
        };
        if self.grouping_size == 0 || int_part.len() <= self.grouping_size {
            return int_part.to_string();
        }

        let mut out = String::with_capacity(int_part.len() + int_part.len() / self.grouping_size);
        let len = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % self.grouping_size == 0 {
                out.push(sep);
            }
            out.push(c);
        }
        out
    }

    /// Parses the longest numeric prefix of `text`.
    ///
    /// The returned [`ParsedNumber::end`] is the char offset just past the
    /// consumed region; callers decide whether trailing text is acceptable.
    pub fn parse(&self, text: &str) -> FormatResult<ParsedNumber> {
        let chars: Vec<char> = text.chars().collect();

        let pos_match = starts_with(&chars, 0, &self.positive_prefix);
        let neg_match = starts_with(&chars, 0, &self.negative_prefix);
        let pos_len = self.positive_prefix.chars().count();
        let neg_len = self.negative_prefix.chars().count();

        let (negative, mut pos) = match (pos_match, neg_match) {
            (true, true) if neg_len > pos_len => (true, neg_len),
            (true, _) => (false, pos_len),
            (false, true) => (true, neg_len),
            // a blank positive prefix (synthesized masks) is optional on input
            (false, false) if self.positive_prefix.trim().is_empty() => (false, 0),
            (false, false) => {
                return Err(FormatError::unparseable(0, "unparseable number"));
            }
        };

        let start = pos;
        let mut int_digits = Vec::new();
        let mut frac_digits = Vec::new();
        let mut seen_decimal = false;
        let mut exponent: i32 = 0;
        let mut exponent_at = None;

        while pos < chars.len() {
            let c = chars[pos];
            if let Some(d) = c.to_digit(10) {
                if seen_decimal {
                    frac_digits.push(d as u8);
                } else {
                    int_digits.push(d as u8);
                }
                pos += 1;
            } else if c == self.symbols.decimal && !seen_decimal {
                seen_decimal = true;
                pos += 1;
            } else if Some(c) == self.symbols.grouping
                && self.grouping_size > 0
                && !seen_decimal
                && !int_digits.is_empty()
            {
                pos += 1;
            } else if c == 'E' && !(int_digits.is_empty() && frac_digits.is_empty()) {
                match parse_exponent(&chars, pos + 1) {
                    Some((exp, next)) => {
                        exponent = exp;
                        exponent_at = Some(pos);
                        pos = next;
                    }
                    None => break,
                }
                break;
            } else {
                break;
            }
        }

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(FormatError::unparseable(start, "no digits found"));
        }

        // a trailing decimal separator with nothing after it is not consumed
        if seen_decimal && frac_digits.is_empty() && pos > start && chars[pos - 1] == self.symbols.decimal
        {
            pos -= 1;
        }

        let (_, suffix) = self.affixes(negative);
        if !suffix.is_empty() {
            if starts_with(&chars, pos, suffix) {
                pos += suffix.chars().count();
            } else if !suffix.trim().is_empty() {
                return Err(FormatError::unparseable(
                    pos,
                    format!("expected suffix '{suffix}'"),
                ));
            }
        }

        let mut digits = Digits {
            negative,
            point: int_digits.len() as i32,
            digits: int_digits,
        };
        digits.digits.extend(frac_digits);
        digits.normalize();
        let out_of_range =
            || FormatError::unparseable(exponent_at.unwrap_or(start), "exponent out of range");
        if exponent.unsigned_abs() > MAX_EXPONENT {
            return Err(out_of_range());
        }
        digits.point = digits
            .point
            .checked_add(exponent - self.scale)
            .ok_or_else(out_of_range)?;

        Ok(ParsedNumber { digits, end: pos })
    }
}

/// Result of a successful parse: the value plus the char offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    digits: Digits,
    pub end: usize,
}

impl ParsedNumber {
    pub fn to_plain_string(&self) -> String {
        self.digits.to_plain_string()
    }

    pub fn to_f64(&self) -> f64 {
        // plain decimal text always parses as f64
        self.to_plain_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Integral values that fit are exact; anything else truncates toward
    /// zero and saturates at the i64 bounds.
    pub fn to_i64(&self) -> i64 {
        if self.digits.is_integral() {
            if let Ok(v) = self.to_plain_string().parse::<i64>() {
                return v;
            }
        }
        self.to_f64() as i64
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        let plain = self.to_plain_string();
        Decimal::from_str(&plain)
            .or_else(|_| Decimal::from_scientific(&plain))
            .ok()
    }
}

/// Sign, significant digits, and the position of the decimal point
/// relative to the first digit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Digits {
    negative: bool,
    digits: Vec<u8>,
    point: i32,
}

impl Digits {
    fn from_f64(value: f64) -> Self {
        // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3"
        let sci = format!("{:e}", value.abs());
        let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let digits: Vec<u8> = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();

        let mut d = Digits {
            negative: value.is_sign_negative(),
            digits,
            point: exp + 1,
        };
        d.normalize();
        d
    }

    fn from_plain(text: &str) -> Self {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
        let point = digits.len() as i32;
        digits.extend(frac_part.bytes().map(|b| b - b'0'));

        let mut d = Digits {
            negative,
            digits,
            point,
        };
        d.normalize();
        d
    }

    fn normalize(&mut self) {
        let leading = self.digits.iter().take_while(|&&d| d == 0).count();
        self.digits.drain(..leading);
        self.point -= leading as i32;

        while self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        if self.digits.is_empty() {
            self.point = 0;
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    fn is_integral(&self) -> bool {
        self.digits.len() as i32 <= self.point || self.is_zero()
    }

    fn round_half_even(&mut self, max_frac: usize) {
        let keep = self.point + max_frac as i32;
        if keep >= self.digits.len() as i32 {
            return;
        }
        if keep < 0 {
            self.digits.clear();
            self.point = 0;
            return;
        }

        let keep = keep as usize;
        let first_dropped = self.digits[keep];
        let rest_nonzero = self.digits[keep + 1..].iter().any(|&d| d != 0);
        let prev_odd = keep > 0 && self.digits[keep - 1] % 2 == 1;
        let round_up = first_dropped > 5 || (first_dropped == 5 && (rest_nonzero || prev_odd));

        self.digits.truncate(keep);
        if round_up {
            let mut i = keep;
            loop {
                if i == 0 {
                    self.digits.insert(0, 1);
                    self.point += 1;
                    break;
                }
                i -= 1;
                if self.digits[i] == 9 {
                    self.digits[i] = 0;
                } else {
                    self.digits[i] += 1;
                    break;
                }
            }
        }
        self.normalize();
    }

    /// Integer digits (no leading zeros) and fraction digits (no trailing zeros).
    fn split(&self) -> (Vec<u8>, Vec<u8>) {
        if self.is_zero() {
            return (Vec::new(), Vec::new());
        }
        let point = self.point;
        let len = self.digits.len() as i32;

        let int_digits = if point <= 0 {
            Vec::new()
        } else if point >= len {
            let mut v = self.digits.clone();
            v.resize(point as usize, 0);
            v
        } else {
            self.digits[..point as usize].to_vec()
        };

        let frac_digits = if point >= len {
            Vec::new()
        } else if point < 0 {
            let mut v = vec![0; (-point) as usize];
            v.extend_from_slice(&self.digits);
            v
        } else {
            self.digits[point as usize..].to_vec()
        };

        (int_digits, frac_digits)
    }

    fn to_plain_string(&self) -> String {
        let (int_digits, frac_digits) = self.split();
        let mut out = String::new();
        if self.negative && !self.is_zero() {
            out.push('-');
        }
        if int_digits.is_empty() {
            out.push('0');
        } else {
            out.extend(int_digits.iter().map(|d| char::from(b'0' + d)));
        }
        if !frac_digits.is_empty() {
            out.push('.');
            out.extend(frac_digits.iter().map(|d| char::from(b'0' + d)));
        }
        out
    }
}

fn split_clauses(pattern: &str) -> (&str, Option<&str>) {
    let mut in_quote = false;
    for (i, c) in pattern.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ';' if !in_quote => return (&pattern[..i], Some(&pattern[i + 1..])),
            _ => {}
        }
    }
    (pattern, None)
}

fn parse_clause(clause: &str, symbols: &DecimalSymbols) -> FormatResult<Clause> {
    #[derive(PartialEq)]
    enum Phase {
        Prefix,
        Number,
        Suffix,
    }

    let mut out = Clause::default();
    let mut phase = Phase::Prefix;
    let mut chars = clause.chars().peekable();

    let mut int_placeholders = 0usize;
    let mut last_group_at: Option<usize> = None;
    let mut seen_decimal = false;

    while let Some(c) = chars.next() {
        if phase == Phase::Prefix && DIGIT_CHARS.contains(&c) {
            phase = Phase::Number;
        }

        if phase == Phase::Number {
            match c {
                '#' | '0' if !seen_decimal => {
                    out.has_digits = true;
                    int_placeholders += 1;
                    if c == '0' {
                        out.min_int += 1;
                    }
                    continue;
                }
                '#' | '0' => {
                    out.has_digits = true;
                    out.max_frac += 1;
                    if c == '0' {
                        out.min_frac += 1;
                    }
                    continue;
                }
                ',' if !seen_decimal => {
                    last_group_at = Some(int_placeholders);
                    continue;
                }
                '.' if !seen_decimal => {
                    seen_decimal = true;
                    continue;
                }
                _ => phase = Phase::Suffix,
            }
        }

        let target = if phase == Phase::Prefix {
            &mut out.prefix
        } else {
            &mut out.suffix
        };

        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    target.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            target.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    target.push(q);
                }
                if !closed {
                    return Err(FormatError::invalid(format!(
                        "unterminated quote in '{clause}'"
                    )));
                }
            }
            '\u{a4}' => target.push_str(&symbols.currency),
            '%' => {
                out.scale = 2;
                target.push('%');
            }
            '\u{2030}' => {
                out.scale = 3;
                target.push('\u{2030}');
            }
            _ => target.push(c),
        }
    }

    if let Some(at) = last_group_at {
        out.grouping_size = int_placeholders - at;
    }
    out.decimal_always_shown = seen_decimal && out.max_frac == 0;

    Ok(out)
}

fn starts_with(chars: &[char], at: usize, affix: &str) -> bool {
    let mut i = at;
    for c in affix.chars() {
        if i >= chars.len() || chars[i] != c {
            return false;
        }
        i += 1;
    }
    true
}

/// Largest exponent magnitude accepted in scientific input; anything wider
/// cannot be represented by any storage type.
const MAX_EXPONENT: u32 = 400;

fn parse_exponent(chars: &[char], mut pos: usize) -> Option<(i32, usize)> {
    let negative = match chars.get(pos) {
        Some('-') => {
            pos += 1;
            true
        }
        Some('+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let start = pos;
    let mut exp: i32 = 0;
    while let Some(d) = chars.get(pos).and_then(|c| c.to_digit(10)) {
        exp = exp.saturating_mul(10).saturating_add(d as i32);
        pos += 1;
    }
    if pos == start {
        return None;
    }
    Some((if negative { -exp } else { exp }, pos))
}
