//! Offset date-times.
//!
//! Only the full RFC 3339 form with a zone is a date-time here:
//! `YYYY-MM-DDTHH:MM:SS[.fraction](Z|+HH:MM|-HH:MM)`. Local dates and times
//! are not recognised and surface as invalid values. The digits must also name
//! a real calendar instant; `2001-02-30T00:00:00Z` is rejected.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::de::context::Context;
use crate::de::readers::{take_while, ValueReader, ValueReaders};
use crate::Value;

pub(crate) struct DatetimeReader;

impl ValueReader for DatetimeReader {
    fn can_read(&self, rest: &str) -> bool {
        let bytes = rest.as_bytes();
        bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let line = ctx.line();
        let token = take_while(ctx, |c| {
            c.is_ascii_digit() || matches!(c, '-' | '+' | ':' | '.' | 'T' | 'Z')
        });

        let value = parse_datetime(token).map(Value::Datetime);
        if value.is_none() {
            let key = ctx.key_name().to_string();
            ctx.errors.invalid_value(&key, token, line);
        }
        value
    }
}

pub(crate) fn parse_datetime(token: &str) -> Option<DateTime<FixedOffset>> {
    let head = token.get(..19)?;
    let shape = b"dddd-dd-ddTdd:dd:dd";
    let matches_shape = head.bytes().zip(shape.iter()).all(|(b, s)| match s {
        b'd' => b.is_ascii_digit(),
        other => b == *other,
    });
    if !matches_shape {
        return None;
    }

    let number = |range: std::ops::Range<usize>| head[range].parse::<u32>().ok();
    let year = head[..4].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(5..7)?, number(8..10)?)?;

    let mut rest = &token[19..];
    let mut nanos = 0;
    if let Some(fraction) = rest.strip_prefix('.') {
        let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        nanos = fraction_nanos(&fraction[..digits])?;
        rest = &fraction[digits..];
    }
    let time = NaiveTime::from_hms_nano_opt(number(11..13)?, number(14..16)?, number(17..19)?, nanos)?;

    let offset = if rest.starts_with('Z') {
        FixedOffset::east_opt(0)?
    } else {
        parse_offset(rest.get(..6)?)?
    };

    offset.from_local_datetime(&date.and_time(time)).single()
}

fn fraction_nanos(digits: &str) -> Option<u32> {
    let significant = &digits[..digits.len().min(9)];
    let scale = 10u32.pow(9 - significant.len() as u32);
    significant.parse::<u32>().ok().map(|n| n * scale)
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let bytes = text.as_bytes();
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    if bytes[3] != b':' || ![1, 2, 4, 5].iter().all(|&i| bytes[i].is_ascii_digit()) {
        return None;
    }
    let hours = text[1..3].parse::<i32>().ok()?;
    let minutes = text[4..6].parse::<i32>().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
