//! Date-math index name resolution.
//!
//! Expressions like `<logs-{now/d}>` are evaluated against the resolution
//! clock before any authorization check, yielding one concrete index name.
//! A template is the whole token wrapped in `<` and `>`; each `{...}`
//! section holds the anchor `now`, optional math (`+1d`, `-2w`, `/M` to
//! round down), and an optional `{format|zone}` block. Formats use a small
//! set of date tokens (`yyyy`, `MM`, `dd`, `HH`, `mm`, `ss`, `ww`); zones
//! are `UTC` or a numeric `+HH:MM` offset. The default format is
//! `yyyy.MM.dd` in UTC.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, Offset, Timelike, Utc};

use crate::error::{AuthzError, Result};

const DEFAULT_FORMAT: &str = "yyyy.MM.dd";

/// Whether a token (after sign stripping) is a date-math template.
pub fn is_date_math(token: &str) -> bool {
    token.starts_with('<')
}

/// Evaluate a `<...>` template against `now`, producing a concrete name.
///
/// # Errors
///
/// Returns [`AuthzError::MalformedExpression`] when the template cannot be
/// parsed; the error names the offending input and rule.
pub fn resolve(token: &str, now: DateTime<Utc>) -> Result<String> {
    let inner = token
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| malformed(token, "expected '<' and '>' delimiters"))?;

    let mut out = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(open) = rest.find('{') {
        let literal = &rest[..open];
        if literal.contains('}') {
            return Err(malformed(token, "unmatched '}'"));
        }
        out.push_str(literal);
        let after = &rest[open + 1..];
        let close = find_section_end(after).ok_or_else(|| malformed(token, "unclosed '{'"))?;
        out.push_str(&eval_section(&after[..close], token, now)?);
        rest = &after[close + 1..];
    }
    if rest.contains('}') {
        return Err(malformed(token, "unmatched '}'"));
    }
    out.push_str(rest);
    Ok(out)
}

/// Position of the `}` closing the current section, skipping one nested
/// format block.
fn find_section_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn eval_section(section: &str, token: &str, now: DateTime<Utc>) -> Result<String> {
    let (math, spec) = match section.find('{') {
        Some(open) => {
            let spec = section[open + 1..]
                .strip_suffix('}')
                .ok_or_else(|| malformed(token, "unclosed format block"))?;
            (&section[..open], spec)
        }
        None => (section, DEFAULT_FORMAT),
    };
    let (format, zone) = match spec.split_once('|') {
        Some((format, zone)) => (format, parse_zone(zone, token)?),
        None => (spec, Utc.fix()),
    };

    let ops = math
        .strip_prefix("now")
        .ok_or_else(|| malformed(token, "expression must start with 'now'"))?;

    let mut t = now.with_timezone(&zone);
    let mut chars = ops.chars().peekable();
    while let Some(op) = chars.next() {
        match op {
            '+' | '-' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let amount: i64 = if digits.is_empty() {
                    1
                } else {
                    digits
                        .parse()
                        .map_err(|_| malformed(token, "math amount out of range"))?
                };
                let amount = if op == '-' { -amount } else { amount };
                let unit = chars
                    .next()
                    .ok_or_else(|| malformed(token, "missing math unit"))?;
                t = shift(t, amount, unit)
                    .ok_or_else(|| malformed(token, "unsupported math unit or amount"))?;
            }
            '/' => {
                let unit = chars
                    .next()
                    .ok_or_else(|| malformed(token, "missing rounding unit"))?;
                t = floor_to(t, unit).ok_or_else(|| malformed(token, "unsupported rounding unit"))?;
            }
            _ => return Err(malformed(token, "expected '+', '-' or '/' after 'now'")),
        }
    }

    Ok(t.format(&translate_format(format, token)?).to_string())
}

fn shift(t: DateTime<FixedOffset>, amount: i64, unit: char) -> Option<DateTime<FixedOffset>> {
    match unit {
        'y' => shift_months(t, amount.checked_mul(12)?),
        'M' => shift_months(t, amount),
        'w' => t.checked_add_signed(Duration::try_weeks(amount)?),
        'd' => t.checked_add_signed(Duration::try_days(amount)?),
        'h' | 'H' => t.checked_add_signed(Duration::try_hours(amount)?),
        'm' => t.checked_add_signed(Duration::try_minutes(amount)?),
        's' => t.checked_add_signed(Duration::try_seconds(amount)?),
        _ => None,
    }
}

fn shift_months(t: DateTime<FixedOffset>, months: i64) -> Option<DateTime<FixedOffset>> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        t.checked_add_months(Months::new(magnitude))
    } else {
        t.checked_sub_months(Months::new(magnitude))
    }
}

/// Round down to the start of the given unit. Weeks start on Monday.
fn floor_to(t: DateTime<FixedOffset>, unit: char) -> Option<DateTime<FixedOffset>> {
    match unit {
        's' => t.with_nanosecond(0),
        'm' => t.with_second(0)?.with_nanosecond(0),
        'h' | 'H' => t.with_minute(0)?.with_second(0)?.with_nanosecond(0),
        'd' => start_of_day(t),
        'w' => {
            let day = start_of_day(t)?;
            let back = i64::from(day.weekday().num_days_from_monday());
            day.checked_sub_signed(Duration::try_days(back)?)
        }
        'M' => start_of_day(t)?.with_day(1),
        'y' => start_of_day(t)?.with_day(1)?.with_month(1),
        _ => None,
    }
}

fn start_of_day(t: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    t.with_hour(0)?.with_minute(0)?.with_second(0)?.with_nanosecond(0)
}

fn translate_format(pattern: &str, token: &str) -> Result<String> {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_alphabetic() {
            let mut run = 1usize;
            while chars.peek() == Some(&c) {
                chars.next();
                run += 1;
            }
            let directive = match (c, run) {
                ('y', 4) | ('u', 4) | ('Y', 4) => "%Y",
                ('y', 2) => "%y",
                ('M', 2) => "%m",
                ('d', 2) => "%d",
                ('H', 2) => "%H",
                ('m', 2) => "%M",
                ('s', 2) => "%S",
                ('w', 2) => "%V",
                _ => {
                    return Err(malformed(token, &format!("unsupported format token '{c}'")));
                }
            };
            out.push_str(directive);
        } else if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn parse_zone(zone: &str, token: &str) -> Result<FixedOffset> {
    if zone == "UTC" || zone == "Z" {
        return Ok(Utc.fix());
    }
    let (sign, rest) = match zone.as_bytes().first() {
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        _ => {
            return Err(malformed(
                token,
                "unsupported time zone (use UTC or a numeric offset)",
            ));
        }
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| malformed(token, "time zone offset must look like +HH:MM"))?;
    let hours: i32 = hours
        .parse()
        .map_err(|_| malformed(token, "time zone offset must look like +HH:MM"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| malformed(token, "time zone offset must look like +HH:MM"))?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| malformed(token, "time zone offset out of range"))
}

fn malformed(token: &str, why: &str) -> AuthzError {
    AuthzError::MalformedExpression(format!("{token} ({why})"))
}
