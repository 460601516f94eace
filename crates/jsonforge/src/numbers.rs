//! Numeric codecs: width-checked integer parsing, direct decimal digit
//! emission and float conversion.
//!
//! The lexer guarantees number tokens are well formed, so the parsers here
//! mostly guard against width overflow. They still reject malformed digits
//! because they are also fed the contents of force-stringified fields.
use alloc::{string::ToString, vec::Vec};
use core::fmt::{self, Write as _};

use crate::error::{EncodeError, NumberError};

const DIGITS01: &[u8; 100] =
    b"0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789";
const DIGITS10: &[u8; 100] =
    b"0000000000111111111122222222223333333333444444444455555555556666666666777777777788888888889999999999";

fn parse_magnitude(digits: &[u8], target: &'static str) -> Result<u64, NumberError> {
    if digits.is_empty() {
        return Err(NumberError::Invalid);
    }
    let mut acc: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(NumberError::Invalid);
        }
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(NumberError::Overflow { target })?;
    }
    Ok(acc)
}

/// Parses a base-10 signed integer into `T`.
///
/// # Errors
///
/// `Invalid` for anything but an optional `-` followed by digits, `Overflow`
/// when the value does not fit `T`.
pub fn parse_signed<T: TryFrom<i64>>(bytes: &[u8], target: &'static str) -> Result<T, NumberError> {
    let (neg, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };
    let magnitude = parse_magnitude(digits, target)?;
    let value = if neg {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(NumberError::Overflow { target });
        }
        0i64.wrapping_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).map_err(|_| NumberError::Overflow { target })?
    };
    T::try_from(value).map_err(|_| NumberError::Overflow { target })
}

/// Parses a base-10 unsigned integer into `T`.
///
/// # Errors
///
/// `Invalid` for anything but digits (a sign is rejected), `Overflow` when
/// the value does not fit `T`.
pub fn parse_unsigned<T: TryFrom<u64>>(
    bytes: &[u8],
    target: &'static str,
) -> Result<T, NumberError> {
    let value = parse_magnitude(bytes, target)?;
    T::try_from(value).map_err(|_| NumberError::Overflow { target })
}

/// Writes `u` (negated when `neg`) in decimal, two digits per step.
pub fn format_bits(dst: &mut Vec<u8>, mut u: u64, neg: bool) {
    let mut a = [0u8; 21];
    let mut i = a.len();

    while u >= 100 {
        i -= 2;
        let q = u / 100;
        let j = (u - q * 100) as usize;
        a[i + 1] = DIGITS01[j];
        a[i] = DIGITS10[j];
        u = q;
    }
    if u >= 10 {
        i -= 1;
        let q = u / 10;
        a[i] = b'0' + (u - q * 10) as u8;
        u = q;
    }
    i -= 1;
    a[i] = b'0' + u as u8;

    if neg {
        i -= 1;
        a[i] = b'-';
    }
    dst.extend_from_slice(&a[i..]);
}

/// Writes a signed integer in decimal.
pub fn format_i64(dst: &mut Vec<u8>, v: i64) {
    format_bits(dst, v.unsigned_abs(), v < 0);
}

/// Writes an unsigned integer in decimal.
pub fn format_u64(dst: &mut Vec<u8>, v: u64) {
    format_bits(dst, v, false);
}

/// Parses a JSON number into an `f64`.
///
/// # Errors
///
/// `Invalid` for malformed input, `Overflow` when the value is not finite.
pub fn parse_f64(bytes: &[u8]) -> Result<f64, NumberError> {
    let v: f64 = float_text(bytes)?
        .parse()
        .map_err(|_| NumberError::Invalid)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(NumberError::Overflow { target: "f64" })
    }
}

/// Parses a JSON number into an `f32`.
///
/// # Errors
///
/// `Invalid` for malformed input, `Overflow` when the value is not finite.
pub fn parse_f32(bytes: &[u8]) -> Result<f32, NumberError> {
    let v: f32 = float_text(bytes)?
        .parse()
        .map_err(|_| NumberError::Invalid)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(NumberError::Overflow { target: "f32" })
    }
}

/// Rust's float grammar also accepts `inf`, `nan` and a leading `+`; JSON
/// text never does.
fn float_text(bytes: &[u8]) -> Result<&str, NumberError> {
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    if !digits.first().is_some_and(u8::is_ascii_digit) {
        return Err(NumberError::Invalid);
    }
    core::str::from_utf8(bytes).map_err(|_| NumberError::Invalid)
}

struct VecWriter<'a>(&'a mut Vec<u8>);

impl fmt::Write for VecWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Writes the shortest representation of `v` that parses back to the same
/// `f64`.
///
/// # Errors
///
/// `UnsupportedFloat` for NaN and infinities.
pub fn format_f64(dst: &mut Vec<u8>, v: f64) -> Result<(), EncodeError> {
    if !v.is_finite() {
        return Err(EncodeError::UnsupportedFloat(v));
    }
    write!(VecWriter(dst), "{v:?}").map_err(|e| EncodeError::Custom(e.to_string()))
}

/// Writes the shortest representation of `v` that parses back to the same
/// `f32`.
///
/// # Errors
///
/// `UnsupportedFloat` for NaN and infinities.
pub fn format_f32(dst: &mut Vec<u8>, v: f32) -> Result<(), EncodeError> {
    if !v.is_finite() {
        return Err(EncodeError::UnsupportedFloat(f64::from(v)));
    }
    write!(VecWriter(dst), "{v:?}").map_err(|e| EncodeError::Custom(e.to_string()))
}
