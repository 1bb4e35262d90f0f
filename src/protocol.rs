//! Line protocol spoken by the microcontroller
//!
//! The board prints one reading per line, ASCII, terminated by `\n` or `\r`:
//!
//! ```text
//! T:23.5      temperature in degrees Celsius (float)
//! P:1013      pressure in hPa (integer)
//! ```
//!
//! Anything else on the line is noise. The numeric part is parsed the way C's
//! `atof`/`atoi` do it: leading whitespace is skipped, the longest valid
//! prefix is converted, trailing garbage is ignored and text with no valid
//! prefix yields `0`. There are no parse errors.

use core::fmt;

use serde::Serialize;

/// Prefix of a temperature line
pub const TEMPERATURE_PREFIX: &[u8; 2] = b"T:";

/// Prefix of a pressure line
pub const PRESSURE_PREFIX: &[u8; 2] = b"P:";

// ============================================================================
// Readings
// ============================================================================

/// One decoded reading
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ReadingValue {
    /// Temperature in Celsius
    Temperature(f32),
    /// Pressure in hPa
    Pressure(i32),
}

impl ReadingValue {
    /// Encode as a protocol line, without terminator
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Temperature(v) => write!(f, "T:{}", v),
            ReadingValue::Pressure(v) => write!(f, "P:{}", v),
        }
    }
}

// ============================================================================
// C-style numeric parsing
// ============================================================================

/// `isspace` in the "C" locale
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn skip_space(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_c_space(b))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn starts_with_ignore_case(bytes: &[u8], word: &[u8]) -> bool {
    bytes.len() >= word.len() && bytes[..word.len()].eq_ignore_ascii_case(word)
}

/// Length of the longest prefix of `bytes` that `strtod` would consume
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let rest = &bytes[i..];
    if starts_with_ignore_case(rest, b"infinity") {
        return i + 8;
    }
    if starts_with_ignore_case(rest, b"inf") || starts_with_ignore_case(rest, b"nan") {
        return i + 3;
    }

    let int_digits = count_digits(rest);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits + frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return 0;
    }

    // Exponent only counts when at least one digit follows
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j.min(bytes.len())..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}

/// Parse a float the way C's `atof` does
///
/// Hexadecimal floats are not recognised and parse as `0`.
pub fn parse_c_float(bytes: &[u8]) -> f32 {
    let bytes = skip_space(bytes);
    let len = float_prefix_len(bytes);
    if len == 0 {
        return 0.0;
    }

    core::str::from_utf8(&bytes[..len])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Parse an integer the way C's `atoi` does
///
/// Values outside the `i32` range saturate.
pub fn parse_c_int(bytes: &[u8]) -> i32 {
    let bytes = skip_space(bytes);
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }
    if negative {
        value = -value;
    }

    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_wire_format() {
        assert_eq!(ReadingValue::Temperature(23.5).encode(), "T:23.5");
        assert_eq!(ReadingValue::Pressure(-7).encode(), "P:-7");
    }

    #[test]
    fn test_float_permissive_parsing() {
        assert_eq!(parse_c_float(b"abc"), 0.0);
        assert_eq!(parse_c_float(b"12.5xyz"), 12.5);
        assert_eq!(parse_c_float(b"  -3.25"), -3.25);
        assert_eq!(parse_c_float(b"+.5"), 0.5);
        assert_eq!(parse_c_float(b"7."), 7.0);
        assert_eq!(parse_c_float(b"."), 0.0);
        assert_eq!(parse_c_float(b""), 0.0);
        assert_eq!(parse_c_float(b"- 1"), 0.0);
    }

    #[test]
    fn test_float_exponent_needs_digits() {
        assert_eq!(parse_c_float(b"1e3"), 1000.0);
        assert_eq!(parse_c_float(b"2.5E-1"), 0.25);
        assert_eq!(parse_c_float(b"4e"), 4.0);
        assert_eq!(parse_c_float(b"4e+"), 4.0);
        assert_eq!(parse_c_float(b"4ex"), 4.0);
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(parse_c_float(b"inf"), f32::INFINITY);
        assert_eq!(parse_c_float(b"-Infinity!"), f32::NEG_INFINITY);
        assert!(parse_c_float(b"NaN").is_nan());
        assert_eq!(parse_c_float(b"0x1A"), 0.0);
    }

    #[test]
    fn test_int_permissive_parsing() {
        assert_eq!(parse_c_int(b"1013"), 1013);
        assert_eq!(parse_c_int(b"  42kPa"), 42);
        assert_eq!(parse_c_int(b"-15"), -15);
        assert_eq!(parse_c_int(b"+8"), 8);
        assert_eq!(parse_c_int(b"12.9"), 12);
        assert_eq!(parse_c_int(b"junk"), 0);
        assert_eq!(parse_c_int(b""), 0);
    }

    #[test]
    fn test_int_saturates() {
        assert_eq!(parse_c_int(b"99999999999"), i32::MAX);
        assert_eq!(parse_c_int(b"-99999999999999999999999"), i32::MIN);
    }
}
