//! Leading-number parsing for request strings.
//!
//! Form input routinely carries numbers with trailing junk (`"12px"`,
//! `"3 items"`). Both parsers read the longest numeric prefix and stop at the
//! first character that cannot extend it; a string without any numeric prefix
//! reads as zero.
//!
//! Accepted shape: optional leading whitespace, an optional sign, then digits.
//! A single underscore may separate two digits (`"1_000"`). The float parser
//! additionally accepts a fraction (`.5`) and an exponent (`e-3`), each only
//! when at least one digit follows.

/// Parse the integer prefix of `input`.
///
/// Returns `None` only when the prefix does not fit in an `i64`.
pub(crate) fn parse_int_prefix(input: &str) -> Option<i64> {
    let (negative, rest) = split_sign(input.trim_start());
    let mut total: i64 = 0;
    for digit in digit_run(rest).bytes().filter(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        total = total.checked_mul(10)?;
        total = if negative {
            total.checked_sub(digit)?
        } else {
            total.checked_add(digit)?
        };
    }
    Some(total)
}

/// Parse the decimal prefix of `input`.
pub(crate) fn parse_float_prefix(input: &str) -> f64 {
    let (negative, rest) = split_sign(input.trim_start());
    let mut literal = String::new();
    if negative {
        literal.push('-');
    }

    let integral = digit_run(rest);
    literal.extend(integral.chars().filter(char::is_ascii_digit));
    let mut rest = &rest[integral.len()..];

    if let Some(after_dot) = rest.strip_prefix('.') {
        let fraction = digit_run(after_dot);
        if !fraction.is_empty() {
            if integral.is_empty() {
                literal.push('0');
            }
            literal.push('.');
            literal.extend(fraction.chars().filter(char::is_ascii_digit));
            rest = &after_dot[fraction.len()..];
        }
    }

    if literal.trim_start_matches('-').is_empty() {
        return 0.0;
    }

    if let Some(after_e) = rest.strip_prefix(|c: char| c == 'e' || c == 'E') {
        let (exp_negative, exp_rest) = split_sign(after_e);
        let exponent = digit_run(exp_rest);
        if !exponent.is_empty() {
            literal.push('e');
            if exp_negative {
                literal.push('-');
            }
            literal.extend(exponent.chars().filter(char::is_ascii_digit));
        }
    }

    literal.parse().unwrap_or(0.0)
}

fn split_sign(input: &str) -> (bool, &str) {
    if let Some(rest) = input.strip_prefix('-') {
        (true, rest)
    } else {
        (false, input.strip_prefix('+').unwrap_or(input))
    }
}

/// Longest prefix made of digits with single underscores between them.
fn digit_run(input: &str) -> &str {
    let bytes = input.as_bytes();
    let mut end = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                i += 1;
                end = i;
            }
            b'_' if end == i && end > 0 && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                i += 1;
            }
            _ => break,
        }
    }
    &input[..end]
}

/// Truncate toward zero, `None` when the result does not fit in an `i64`.
pub(crate) fn truncate(f: f64) -> Option<i64> {
    let whole = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if whole.is_finite() && whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
        Some(whole as i64)
    } else {
        None
    }
}
