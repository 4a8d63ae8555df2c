//! Date pattern engine for `yyyy/MM/dd HH:mm:ss.SSS` style masks.
//!
//! Supported letters: `G y Y M L d D E u a H k K h m s S z Z X`.
//! Runs of `S` longer than three are a nanosecond fraction truncated to the
//! run length; shorter runs are the millisecond count. Month and day names
//! are English.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use crate::format::errors::{FormatError, FormatResult};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Era,
    Year,
    Month,
    Day,
    DayOfYear,
    DayName,
    DayNumber,
    AmPm,
    Hour0To23,
    Hour1To24,
    Hour0To11,
    Hour1To12,
    Minute,
    Second,
    Fraction,
    ZoneName,
    ZoneRfc,
    ZoneIso,
}

impl Field {
    fn from_letter(c: char) -> Option<Self> {
        Some(match c {
            'G' => Field::Era,
            'y' | 'Y' => Field::Year,
            'M' | 'L' => Field::Month,
            'd' => Field::Day,
            'D' => Field::DayOfYear,
            'E' => Field::DayName,
            'u' => Field::DayNumber,
            'a' => Field::AmPm,
            'H' => Field::Hour0To23,
            'k' => Field::Hour1To24,
            'K' => Field::Hour0To11,
            'h' => Field::Hour1To12,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Fraction,
            'z' => Field::ZoneName,
            'Z' => Field::ZoneRfc,
            'X' => Field::ZoneIso,
            _ => return None,
        })
    }

    fn is_numeric(self, count: usize) -> bool {
        match self {
            Field::Month => count < 3,
            Field::Era | Field::DayName | Field::AmPm => false,
            Field::ZoneName | Field::ZoneRfc | Field::ZoneIso => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { field: Field, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    pattern: String,
    tokens: Vec<Token>,
}

/// Components gathered while parsing, before they become an instant.
#[derive(Debug, Default)]
struct Parsed {
    year: Option<(i64, usize)>,
    month: Option<(i64, usize)>,
    day: Option<(i64, usize)>,
    day_of_year: Option<(i64, usize)>,
    hour: Option<(i64, usize)>,
    pm: Option<bool>,
    twelve_hour: bool,
    minute: i64,
    second: i64,
    nanos: i64,
    nanos_at: usize,
    bc: bool,
    offset: Option<FixedOffset>,
    zone: Option<Tz>,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> FormatResult<Self> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    literal.push(q);
                }
                if !closed {
                    return Err(FormatError::invalid(format!(
                        "unterminated quote in '{pattern}'"
                    )));
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                literal.push(c);
                continue;
            }

            let field = Field::from_letter(c).ok_or_else(|| {
                FormatError::invalid(format!("illegal pattern character '{c}' in '{pattern}'"))
            })?;
            let mut count = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                count += 1;
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Field { field, count });
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, instant: &DateTime<Utc>, zone: Tz) -> String {
        let local = instant.with_timezone(&zone);
        let mut out = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(s) => out.push_str(s),
                Token::Field { field, count } => {
                    format_field(&mut out, &local, zone, *field, *count);
                }
            }
        }
        out
    }

    /// Parses `text` from the start, returning the instant and the char
    /// offset just past the consumed region.
    ///
    /// Lenient parsing lets out-of-range fields roll over (month 13 is
    /// January of the next year); strict parsing rejects them.
    pub fn parse(&self, text: &str, zone: Tz, lenient: bool) -> FormatResult<(DateTime<Utc>, usize)> {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0usize;
        let mut parsed = Parsed::default();

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Literal(lit) => {
                    for expected in lit.chars() {
                        match chars.get(pos) {
                            Some(&c) if c == expected => pos += 1,
                            _ => {
                                return Err(FormatError::unparseable(
                                    pos,
                                    format!("expected '{lit}'"),
                                ));
                            }
                        }
                    }
                }
                Token::Field { field, count } => {
                    // adjacent numeric fields consume exactly `count` digits
                    let fixed_width = matches!(
                        self.tokens.get(i + 1),
                        Some(Token::Field { field: next, count: next_count })
                            if next.is_numeric(*next_count)
                    );
                    pos = parse_field(&chars, pos, *field, *count, fixed_width, &mut parsed)?;
                }
            }
        }

        let instant = resolve(&parsed, zone, lenient)?;
        Ok((instant, pos))
    }
}

fn pad(out: &mut String, value: i64, width: usize) {
    let digits = value.unsigned_abs().to_string();
    if value < 0 {
        out.push('-');
    }
    for _ in digits.len()..width {
        out.push('0');
    }
    out.push_str(&digits);
}

fn format_field(out: &mut String, local: &DateTime<Tz>, zone: Tz, field: Field, count: usize) {
    match field {
        Field::Era => out.push_str(if local.year() > 0 { "AD" } else { "BC" }),
        Field::Year => {
            let year = i64::from(local.year());
            if count == 2 {
                pad(out, year.rem_euclid(100), 2);
            } else {
                pad(out, year, count);
            }
        }
        Field::Month => {
            let idx = local.month0() as usize;
            match count {
                1 | 2 => pad(out, idx as i64 + 1, count),
                3 => out.push_str(&MONTHS[idx][..3]),
                _ => out.push_str(MONTHS[idx]),
            }
        }
        Field::Day => pad(out, i64::from(local.day()), count),
        Field::DayOfYear => pad(out, i64::from(local.ordinal()), count),
        Field::DayName => {
            let idx = local.weekday().num_days_from_monday() as usize;
            if count >= 4 {
                out.push_str(WEEKDAYS[idx]);
            } else {
                out.push_str(&WEEKDAYS[idx][..3]);
            }
        }
        Field::DayNumber => pad(out, i64::from(local.weekday().number_from_monday()), count),
        Field::AmPm => out.push_str(if local.hour() < 12 { "AM" } else { "PM" }),
        Field::Hour0To23 => pad(out, i64::from(local.hour()), count),
        Field::Hour1To24 => {
            let h = local.hour();
            pad(out, i64::from(if h == 0 { 24 } else { h }), count);
        }
        Field::Hour0To11 => pad(out, i64::from(local.hour() % 12), count),
        Field::Hour1To12 => {
            let h = local.hour() % 12;
            pad(out, i64::from(if h == 0 { 12 } else { h }), count);
        }
        Field::Minute => pad(out, i64::from(local.minute()), count),
        Field::Second => pad(out, i64::from(local.second()), count),
        Field::Fraction => {
            let nanos = local.nanosecond() % 1_000_000_000;
            if count <= 3 {
                pad(out, i64::from(nanos / 1_000_000), count);
            } else {
                let mut frac = format!("{nanos:09}");
                if count < 9 {
                    frac.truncate(count);
                } else {
                    frac.extend(std::iter::repeat_n('0', count - 9));
                }
                out.push_str(&frac);
            }
        }
        Field::ZoneName => {
            if count >= 4 {
                out.push_str(zone.name());
            } else {
                out.push_str(&local.format("%Z").to_string());
            }
        }
        Field::ZoneRfc => {
            let secs = local.offset().fix().local_minus_utc();
            push_offset(out, secs, true, false);
        }
        Field::ZoneIso => {
            let secs = local.offset().fix().local_minus_utc();
            if secs == 0 {
                out.push('Z');
            } else {
                match count {
                    1 => {
                        out.push(if secs < 0 { '-' } else { '+' });
                        pad(out, i64::from(secs.abs() / 3600), 2);
                    }
                    2 => push_offset(out, secs, true, false),
                    _ => push_offset(out, secs, true, true),
                }
            }
        }
    }
}

fn push_offset(out: &mut String, secs: i32, with_minutes: bool, colon: bool) {
    out.push(if secs < 0 { '-' } else { '+' });
    let abs = secs.abs();
    pad(out, i64::from(abs / 3600), 2);
    if with_minutes {
        if colon {
            out.push(':');
        }
        pad(out, i64::from((abs % 3600) / 60), 2);
    }
}

fn read_number(chars: &[char], pos: usize, max_width: Option<usize>) -> FormatResult<(i64, usize, usize)> {
    let mut end = pos;
    let mut value: i64 = 0;
    while let Some(d) = chars.get(end).and_then(|c| c.to_digit(10)) {
        if max_width.is_some_and(|w| end - pos >= w) {
            break;
        }
        value = value.saturating_mul(10).saturating_add(i64::from(d));
        end += 1;
    }
    if end == pos {
        return Err(FormatError::unparseable(pos, "expected digits"));
    }
    Ok((value, end, end - pos))
}

fn match_name(chars: &[char], pos: usize, names: &[&str]) -> Option<(usize, usize)> {
    let rest: String = chars[pos.min(chars.len())..].iter().collect();
    let rest = rest.to_lowercase();

    let mut best: Option<(usize, usize)> = None;
    for (idx, name) in names.iter().enumerate() {
        let short = name.get(..3).unwrap_or(name);
        for candidate in [name.to_lowercase(), short.to_lowercase()] {
            if rest.starts_with(&candidate) {
                let len = candidate.chars().count();
                if best.is_none_or(|(_, l)| len > l) {
                    best = Some((idx, len));
                }
            }
        }
    }
    best
}

fn parse_field(
    chars: &[char],
    pos: usize,
    field: Field,
    count: usize,
    fixed_width: bool,
    parsed: &mut Parsed,
) -> FormatResult<usize> {
    let width = fixed_width.then_some(count);

    match field {
        Field::Era => {
            let (idx, len) = match_name(chars, pos, &["AD", "BC"])
                .ok_or_else(|| FormatError::unparseable(pos, "expected era"))?;
            parsed.bc = idx == 1;
            Ok(pos + len)
        }
        Field::Year => {
            let (mut year, end, digits) = read_number(chars, pos, width)?;
            if count <= 2 && digits == 2 {
                year = expand_two_digit_year(year);
            }
            parsed.year = Some((year, pos));
            Ok(end)
        }
        Field::Month if count >= 3 => {
            let (idx, len) = match_name(chars, pos, &MONTHS)
                .ok_or_else(|| FormatError::unparseable(pos, "expected month name"))?;
            parsed.month = Some((idx as i64 + 1, pos));
            Ok(pos + len)
        }
        Field::Month => {
            let (v, end, _) = read_number(chars, pos, width)?;
            parsed.month = Some((v, pos));
            Ok(end)
        }
        Field::Day => {
            let (v, end, _) = read_number(chars, pos, width)?;
            parsed.day = Some((v, pos));
            Ok(end)
        }
        Field::DayOfYear => {
            let (v, end, _) = read_number(chars, pos, width)?;
            parsed.day_of_year = Some((v, pos));
            Ok(end)
        }
        Field::DayName => {
            let (_, len) = match_name(chars, pos, &WEEKDAYS)
                .ok_or_else(|| FormatError::unparseable(pos, "expected day name"))?;
            Ok(pos + len)
        }
        Field::DayNumber => {
            let (_, end, _) = read_number(chars, pos, width)?;
            Ok(end)
        }
        Field::AmPm => {
            let (idx, len) = match_name(chars, pos, &["AM", "PM"])
                .ok_or_else(|| FormatError::unparseable(pos, "expected AM/PM"))?;
            parsed.pm = Some(idx == 1);
            Ok(pos + len)
        }
        Field::Hour0To23 | Field::Hour1To24 | Field::Hour0To11 | Field::Hour1To12 => {
            let (mut v, end, _) = read_number(chars, pos, width)?;
            match field {
                Field::Hour1To24 if v == 24 => v = 0,
                Field::Hour1To12 if v == 12 => v = 0,
                _ => {}
            }
            parsed.twelve_hour = matches!(field, Field::Hour0To11 | Field::Hour1To12);
            parsed.hour = Some((v, pos));
            Ok(end)
        }
        Field::Minute => {
            let (v, end, _) = read_number(chars, pos, width)?;
            parsed.minute = v;
            Ok(end)
        }
        Field::Second => {
            let (v, end, _) = read_number(chars, pos, width)?;
            parsed.second = v;
            Ok(end)
        }
        Field::Fraction => {
            let (v, end, digits) = read_number(chars, pos, width)?;
            parsed.nanos_at = pos;
            parsed.nanos = if count <= 3 {
                v.saturating_mul(1_000_000)
            } else {
                let text: String = chars[pos..end].iter().take(9).collect();
                let n: i64 = text.parse().unwrap_or(0);
                n * 10_i64.pow(9 - digits.min(9) as u32)
            };
            Ok(end)
        }
        Field::ZoneRfc | Field::ZoneIso => {
            if chars.get(pos) == Some(&'Z') {
                parsed.offset = FixedOffset::east_opt(0);
                return Ok(pos + 1);
            }
            let (offset, end) = parse_offset(chars, pos)?;
            parsed.offset = Some(offset);
            Ok(end)
        }
        Field::ZoneName => parse_zone_name(chars, pos, parsed),
    }
}

fn parse_offset(chars: &[char], pos: usize) -> FormatResult<(FixedOffset, usize)> {
    let sign = match chars.get(pos) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Err(FormatError::unparseable(pos, "expected zone offset")),
    };
    let (hours, mut end, _) = read_number(chars, pos + 1, Some(2))?;
    if chars.get(end) == Some(&':') {
        end += 1;
    }
    let mut minutes = 0;
    if chars.get(end).is_some_and(|c| c.is_ascii_digit()) {
        let (m, e, _) = read_number(chars, end, Some(2))?;
        minutes = m;
        end = e;
    }
    let secs = sign * (hours * 3600 + minutes * 60);
    let offset = i32::try_from(secs)
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| FormatError::unparseable(pos, "zone offset out of range"))?;
    Ok((offset, end))
}

fn parse_zone_name(chars: &[char], pos: usize, parsed: &mut Parsed) -> FormatResult<usize> {
    let mut end = pos;
    while chars
        .get(end)
        .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_'))
    {
        end += 1;
    }
    let name: String = chars[pos..end].iter().collect();

    if name.eq_ignore_ascii_case("GMT") || name.eq_ignore_ascii_case("UTC") || name == "Z" {
        if matches!(chars.get(end), Some('+') | Some('-')) {
            let (offset, after) = parse_offset(chars, end)?;
            parsed.offset = Some(offset);
            return Ok(after);
        }
        parsed.offset = FixedOffset::east_opt(0);
        return Ok(end);
    }

    if name.is_empty() && matches!(chars.get(pos), Some('+') | Some('-')) {
        let (offset, after) = parse_offset(chars, pos)?;
        parsed.offset = Some(offset);
        return Ok(after);
    }

    let zone: Tz = name
        .parse()
        .map_err(|_| FormatError::unparseable(pos, format!("unknown zone '{name}'")))?;
    parsed.zone = Some(zone);
    Ok(end)
}

/// Two-digit years land within 80 years before and 20 years after now.
fn expand_two_digit_year(year: i64) -> i64 {
    let now = i64::from(Utc::now().year());
    let start = now - 80;
    let century = start - start.rem_euclid(100);
    let candidate = century + year;
    if candidate < start { candidate + 100 } else { candidate }
}

fn resolve(p: &Parsed, zone: Tz, lenient: bool) -> FormatResult<DateTime<Utc>> {
    let mut year = p.year.map_or(1970, |(y, _)| y);
    if p.bc {
        year = 1 - year;
    }

    let mut hour = p.hour.map_or(0, |(h, _)| h);
    if !lenient && p.twelve_hour && !(0..12).contains(&hour) {
        let at = p.hour.map_or(0, |(_, at)| at);
        return Err(FormatError::unparseable(at, "hour out of range"));
    }
    if p.pm == Some(true) && (p.twelve_hour || hour < 12) {
        hour = hour.saturating_add(12);
    }

    let naive = if lenient {
        lenient_naive(p, year, hour)?
    } else {
        strict_naive(p, year, hour)?
    };

    let local = match (p.offset, p.zone) {
        (Some(offset), _) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        (None, Some(named)) => localize(named, naive, lenient),
        (None, None) => localize(zone, naive, lenient),
    };

    local.ok_or_else(|| FormatError::unparseable(0, "local time does not exist in zone"))
}

fn localize(zone: Tz, naive: NaiveDateTime, lenient: bool) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // inside a daylight-saving gap
        LocalResult::None if lenient => zone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Widest year a lenient roll-over may land on; chrono tops out near 262143.
const LENIENT_YEAR_LIMIT: i64 = 200_000;

fn lenient_naive(p: &Parsed, year: i64, hour: i64) -> FormatResult<NaiveDateTime> {
    let year_at = p.year.map_or(0, |(_, at)| at);
    let out_of_range = || FormatError::unparseable(year_at, "year out of range");

    let month = p.month.map_or(1, |(m, _)| m);
    let total_months = year
        .checked_mul(12)
        .and_then(|t| t.checked_add(month - 1))
        .ok_or_else(out_of_range)?;
    let y = total_months.div_euclid(12);
    let m = total_months.rem_euclid(12) + 1;
    if y.abs() > LENIENT_YEAR_LIMIT {
        return Err(out_of_range());
    }

    let base = NaiveDate::from_ymd_opt(y as i32, m as u32, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(NaiveDateTime::MIN);

    let days = match (p.day_of_year, p.month, p.day) {
        (Some((doy, _)), None, None) => doy - 1,
        _ => p.day.map_or(1, |(d, _)| d) - 1,
    };

    Ok(base
        + Duration::days(days.clamp(-1_000_000, 1_000_000))
        + Duration::hours(hour.clamp(-1_000_000, 1_000_000))
        + Duration::minutes(p.minute.clamp(-1_000_000, 1_000_000))
        + Duration::seconds(p.second.clamp(-1_000_000, 1_000_000))
        + Duration::nanoseconds(p.nanos.clamp(0, 1_000_000_000_000)))
}

fn strict_naive(p: &Parsed, year: i64, hour: i64) -> FormatResult<NaiveDateTime> {
    let year_at = p.year.map_or(0, |(_, at)| at);
    let year = i32::try_from(year).map_err(|_| FormatError::unparseable(year_at, "year out of range"))?;

    let date = match (p.day_of_year, p.month, p.day) {
        (Some((doy, at)), None, None) => u32::try_from(doy)
            .ok()
            .and_then(|doy| NaiveDate::from_yo_opt(year, doy))
            .ok_or_else(|| FormatError::unparseable(at, "day of year out of range"))?,
        _ => {
            let (month, month_at) = p.month.unwrap_or((1, 0));
            let (day, day_at) = p.day.unwrap_or((1, 0));
            if !(1..=12).contains(&month) {
                return Err(FormatError::unparseable(month_at, "month out of range"));
            }
            u32::try_from(day)
                .ok()
                .and_then(|d| NaiveDate::from_ymd_opt(year, month as u32, d))
                .ok_or_else(|| FormatError::unparseable(day_at, "day out of range"))?
        }
    };

    let hour_at = p.hour.map_or(0, |(_, at)| at);
    if !(0..24).contains(&hour) {
        return Err(FormatError::unparseable(hour_at, "hour out of range"));
    }

    let nanos = u32::try_from(p.nanos)
        .ok()
        .filter(|n| *n < 1_000_000_000)
        .ok_or_else(|| FormatError::unparseable(p.nanos_at, "fraction out of range"))?;

    date.and_hms_nano_opt(
        hour as u32,
        u32::try_from(p.minute).unwrap_or(u32::MAX),
        u32::try_from(p.second).unwrap_or(u32::MAX),
        nanos,
    )
    .ok_or_else(|| FormatError::unparseable(hour_at, "time of day out of range"))
}
