//! Integers and floats.
//!
//! The whole token is consumed first, then checked as a unit. Underscores are
//! allowed only between digits, decimal integers may not carry leading zeros,
//! and prefixed integers (`0x`, `0o`, `0b`) take no sign.

use crate::de::context::Context;
use crate::de::readers::{take_while, ValueReader, ValueReaders};
use crate::Value;

pub(crate) struct NumberReader;

impl ValueReader for NumberReader {
    fn can_read(&self, rest: &str) -> bool {
        let unsigned = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        unsigned.starts_with(|c: char| c.is_ascii_digit())
            || unsigned.starts_with("inf")
            || unsigned.starts_with("nan")
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let line = ctx.line();
        let token = take_while(ctx, |c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.')
        });

        let value = parse_number(token);
        if value.is_none() {
            let key = ctx.key_name().to_string();
            ctx.errors.invalid_value(&key, token, line);
        }
        value
    }
}

pub(crate) fn parse_number(token: &str) -> Option<Value> {
    let (negative, signed, body) = match token.as_bytes().first() {
        Some(b'-') => (true, true, &token[1..]),
        Some(b'+') => (false, true, &token[1..]),
        _ => (false, false, token),
    };

    match body {
        "inf" => return Some(Value::Float(if negative { f64::NEG_INFINITY } else { f64::INFINITY })),
        "nan" => return Some(Value::Float(f64::NAN)),
        _ => {}
    }

    let radix = match body.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &body[2..];
        if signed || !valid_digits(digits, radix) {
            return None;
        }
        return i64::from_str_radix(&digits.replace('_', ""), radix)
            .ok()
            .map(Value::Integer);
    }

    if body.contains(['.', 'e', 'E']) {
        parse_float(token, body).map(Value::Float)
    } else {
        if !valid_decimal(body) {
            return None;
        }
        token.replace('_', "").parse::<i64>().ok().map(Value::Integer)
    }
}

fn parse_float(token: &str, body: &str) -> Option<f64> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(index) => (&body[..index], Some(&body[index + 1..])),
        None => (body, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    if !valid_decimal(whole) {
        return None;
    }
    if fraction.is_some_and(|f| !valid_digits(f, 10)) {
        return None;
    }
    if let Some(exponent) = exponent {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if !valid_digits(exponent, 10) {
            return None;
        }
    }

    // `inf` never reaches here, so an infinite result is an overflow
    token
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}

/// Digits of `radix` with single underscores only between digits.
fn valid_digits(digits: &str, radix: u32) -> bool {
    let bytes = digits.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) if *first != b'_' && *last != b'_' => {}
        _ => return false,
    }
    !digits.contains("__")
        && digits
            .chars()
            .all(|c| c == '_' || c.to_digit(radix).is_some())
}

fn valid_decimal(digits: &str) -> bool {
    valid_digits(digits, 10) && (digits == "0" || !digits.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(parse_number("42"), Some(Value::Integer(42)));
        assert_eq!(parse_number("+17"), Some(Value::Integer(17)));
        assert_eq!(parse_number("-0"), Some(Value::Integer(0)));
        assert_eq!(parse_number("1_000_000"), Some(Value::Integer(1_000_000)));
        assert_eq!(
            parse_number("-9223372036854775808"),
            Some(Value::Integer(i64::MIN))
        );
        assert_eq!(parse_number("0xDEAD_beef"), Some(Value::Integer(0xdead_beef)));
        assert_eq!(parse_number("0o755"), Some(Value::Integer(0o755)));
        assert_eq!(parse_number("0b1101"), Some(Value::Integer(13)));
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse_number("3.1415"), Some(Value::Float(3.1415)));
        assert_eq!(parse_number("-0.01"), Some(Value::Float(-0.01)));
        assert_eq!(parse_number("5e+22"), Some(Value::Float(5e22)));
        assert_eq!(parse_number("1e100"), Some(Value::Float(1e100)));
        assert_eq!(parse_number("6.626e-34"), Some(Value::Float(6.626e-34)));
        assert_eq!(parse_number("9_224_617.445_991"), Some(Value::Float(9_224_617.445_991)));
        assert_eq!(parse_number("-inf"), Some(Value::Float(f64::NEG_INFINITY)));
        assert!(parse_number("nan").and_then(|v| v.as_float()).is_some_and(f64::is_nan));
    }

    #[test]
    fn test_rejected_numbers() {
        for token in [
            "01", "1__0", "_1", "1_", "1.", ".5", "1.e5", "1e", "0x", "+0x1", "0b102",
            "1-2", "99999999999999999999", "3.14.15", "1e5.0",
            "1e400", "-1.8e308",
        ] {
            assert_eq!(parse_number(token), None, "{token}");
        }
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut ctx = Context::new("1__2 # comment");
        let value = NumberReader.read(&mut ctx, &ValueReaders::new());
        assert_eq!(value, None);
        assert_eq!(ctx.rest(), " # comment");
        assert_eq!(
            ctx.errors.iter().next().map(|d| d.message().to_string()),
            Some("Invalid value on line 1:  = 1__2".to_string())
        );
    }
}
