//! Permissive date and time parsing shared by the date coercers.
//!
//! Form input arrives in whatever shape the client produced. The parser tries,
//! in order:
//!
//! 1. caller-supplied `strftime` patterns,
//! 2. RFC 3339 and RFC 2822 timestamps,
//! 3. ISO `YYYY-MM-DDTHH:MM[:SS]`,
//! 4. a token scan that accepts `-`, `/`, `.`, space and comma separated dates
//!    with numeric or named months, optional weekday names, ordinal day
//!    suffixes and an optional `HH:MM[:SS]` clock with `am`/`pm`.
//!
//! Numeric-only dates need a four digit year at either end (`1986-08-25`,
//! `25/08/1986`) or the compact `19860825` form; day-first is assumed when the
//! year comes last.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};

use crate::value::Value;

const ISO_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

struct Parsed {
    date: NaiveDate,
    time: Option<NaiveTime>,
    offset: Option<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Word(&'a str),
}

/// Parse a calendar date. Any time component is accepted and dropped.
pub(crate) fn parse_date(input: &str, formats: &[String]) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }
    parse(input).map(|parsed| parsed.date)
}

/// Parse a date and time, normalised to UTC when the input carries an offset
/// and truncated to whole seconds. A bare date reads as midnight.
pub(crate) fn parse_datetime(input: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    for format in formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return datetime.with_nanosecond(0);
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    let parsed = parse(input)?;
    let local = parsed.date.and_time(parsed.time.unwrap_or(NaiveTime::MIN));
    let datetime = match parsed.offset {
        Some(offset) => offset.from_local_datetime(&local).single()?.naive_utc(),
        None => local,
    };
    datetime.with_nanosecond(0)
}

/// Build a date from positional `(year, month, day)` parts.
pub(crate) fn date_from_parts(parts: &[Value]) -> Option<NaiveDate> {
    let [year, month, day] = parts else {
        return None;
    };
    NaiveDate::from_ymd_opt(
        i32::try_from(whole_number(year)?).ok()?,
        u32::try_from(whole_number(month)?).ok()?,
        u32::try_from(whole_number(day)?).ok()?,
    )
}

/// Build a date and time from `(year, month, day[, hour, minute, second])`.
/// Missing trailing clock parts default to zero.
pub(crate) fn datetime_from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
    if parts.len() < 3 || parts.len() > 6 {
        return None;
    }
    let date = date_from_parts(&parts[..3])?;
    let mut clock = [0u32; 3];
    for (slot, part) in clock.iter_mut().zip(&parts[3..]) {
        *slot = u32::try_from(whole_number(part)?).ok()?;
    }
    let [hour, minute, second] = clock;
    date.and_hms_opt(hour, minute, second)
}

fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Some(f.trunc() as i64),
        _ => None,
    }
}

fn parse(input: &str) -> Option<Parsed> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(from_offset_datetime(datetime));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(input) {
        return Some(from_offset_datetime(datetime));
    }
    for format in ISO_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Parsed {
                date: datetime.date(),
                time: Some(datetime.time()),
                offset: None,
            });
        }
    }
    scan(input)
}

fn from_offset_datetime(datetime: DateTime<FixedOffset>) -> Parsed {
    Parsed {
        date: datetime.date_naive(),
        time: Some(datetime.time()),
        offset: Some(*datetime.offset()),
    }
}

fn scan(input: &str) -> Option<Parsed> {
    let mut tokens = Vec::new();
    let mut clock = None;
    let mut meridiem = None;
    let mut offset = None;

    let chunks = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|chunk| !chunk.is_empty());
    for chunk in chunks {
        match chunk.to_ascii_lowercase().as_str() {
            "am" | "a.m." => {
                meridiem = Some(false);
                continue;
            }
            "pm" | "p.m." => {
                meridiem = Some(true);
                continue;
            }
            "utc" | "gmt" | "z" => {
                offset = FixedOffset::east_opt(0);
                continue;
            }
            _ => {}
        }

        if chunk.contains(':') {
            if clock.is_some() {
                return None;
            }
            let (hms, utc) = match chunk.strip_suffix(['Z', 'z']) {
                Some(stripped) => (stripped, true),
                None => (chunk, false),
            };
            if utc {
                offset = FixedOffset::east_opt(0);
            }
            clock = Some(parse_clock(hms)?);
            continue;
        }

        for piece in chunk.split(['-', '/', '.']) {
            tokens.push(classify(piece)?);
        }
    }

    tokens.retain(|token| !matches!(token, Token::Word(word) if is_weekday(word)));
    let date = resolve_date(&tokens)?;

    let time = match clock {
        Some((hour, minute, second)) => {
            let hour = apply_meridiem(hour, meridiem)?;
            Some(NaiveTime::from_hms_opt(hour, minute, second)?)
        }
        None if meridiem.is_some() => return None,
        None => None,
    };

    Some(Parsed { date, time, offset })
}

fn classify(piece: &str) -> Option<Token<'_>> {
    if piece.is_empty() {
        return None;
    }
    if piece.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Token::Number(piece));
    }
    if piece.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(Token::Word(piece));
    }
    // Ordinal days: 1st, 22nd, 3rd, 25th.
    let digits_end = piece.find(|c: char| !c.is_ascii_digit())?;
    let (digits, suffix) = piece.split_at(digits_end);
    let suffix = suffix.to_ascii_lowercase();
    if !digits.is_empty() && matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
        Some(Token::Number(digits))
    } else {
        None
    }
}

fn parse_clock(hms: &str) -> Option<(u32, u32, u32)> {
    let mut parts = hms.split(':');
    let hour = parse_digits(parts.next()?)?;
    let minute = parse_digits(parts.next()?)?;
    let second = match parts.next() {
        Some(raw) => {
            let whole = raw.split_once('.').map_or(raw, |(whole, _)| whole);
            parse_digits(whole)?
        }
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn apply_meridiem(hour: u32, meridiem: Option<bool>) -> Option<u32> {
    match meridiem {
        None => Some(hour),
        Some(_) if hour == 0 || hour > 12 => None,
        Some(false) => Some(hour % 12),
        Some(true) => Some(hour % 12 + 12),
    }
}

fn resolve_date(tokens: &[Token<'_>]) -> Option<NaiveDate> {
    use Token::{Number, Word};

    let (year, month, day) = match *tokens {
        [Number(compact)] if compact.len() == 8 => {
            (&compact[..4], parse_digits(&compact[4..6])?, &compact[6..])
        }
        [Number(y), Number(m), Number(d)] if y.len() == 4 => (y, parse_digits(m)?, d),
        [Number(d), Number(m), Number(y)] if y.len() == 4 => (y, parse_digits(m)?, d),
        [Number(y), Word(m), Number(d)] if y.len() == 4 => (y, month_number(m)?, d),
        [Number(d), Word(m), Number(y)] => (y, month_number(m)?, d),
        [Word(m), Number(d), Number(y)] => (y, month_number(m)?, d),
        _ => return None,
    };
    let year = i32::try_from(parse_digits(year)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, parse_digits(day)?)
}

/// Full month names and any prefix of at least three letters (`Aug`, `Sept`).
fn month_number(word: &str) -> Option<u32> {
    let word = word.to_ascii_lowercase();
    if word.len() < 3 {
        return None;
    }
    let index = MONTHS.iter().position(|month| month.starts_with(&word))?;
    u32::try_from(index + 1).ok()
}

fn is_weekday(word: &str) -> bool {
    let word = word.to_ascii_lowercase();
    word.len() >= 3 && WEEKDAYS.iter().any(|day| day.starts_with(&word))
}
