//! Decoding of numeric, character and string literal text.
//!
//! Numeric decoders take a `negative` flag so that a unary minus applied directly to a
//! literal folds into it; this is what makes `-2147483648` and
//! `-9223372036854775808L` representable.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LiteralError {
    pub message: String,
    /// Byte range within the provided literal text (not file offsets).
    pub span: Range<usize>,
}

fn err(message: impl Into<String>, span: Range<usize>) -> LiteralError {
    LiteralError {
        message: message.into(),
        span,
    }
}

pub fn parse_int_literal(text: &str, negative: bool) -> Result<i32, LiteralError> {
    let bytes = text.as_bytes();
    let Some(&last) = bytes.last() else {
        return Err(err("Empty int literal", 0..0));
    };
    if matches!(last, b'l' | b'L') {
        return Err(err(
            "Int literal must not have `L` suffix",
            bytes.len() - 1..bytes.len(),
        ));
    }

    let end = bytes.len();
    let (base, prefix_len, is_decimal) = integer_base(bytes, end);
    let limit = match (is_decimal, negative) {
        (true, false) => i32::MAX as u64,
        (true, true) => i32::MAX as u64 + 1,
        (false, _) => u32::MAX as u64,
    };

    let magnitude = parse_unsigned_integer(bytes, prefix_len, end, base, limit)?;
    let value = magnitude as u32 as i32;
    Ok(if negative { value.wrapping_neg() } else { value })
}

pub fn parse_long_literal(text: &str, negative: bool) -> Result<i64, LiteralError> {
    let bytes = text.as_bytes();
    let Some(&suffix) = bytes.last() else {
        return Err(err("Empty long literal", 0..0));
    };
    let suffix_pos = bytes.len() - 1;
    if !matches!(suffix, b'l' | b'L') {
        return Err(err(
            "Long literal is missing `L` suffix",
            suffix_pos..suffix_pos + 1,
        ));
    }
    if suffix_pos == 0 {
        return Err(err("Long literal is missing digits", 0..text.len()));
    }
    if bytes[suffix_pos - 1] == b'_' {
        return Err(err(
            "Underscore is not allowed immediately before long suffix",
            suffix_pos - 1..suffix_pos,
        ));
    }

    let (base, prefix_len, is_decimal) = integer_base(bytes, suffix_pos);
    let limit = match (is_decimal, negative) {
        (true, false) => i64::MAX as u64,
        (true, true) => i64::MAX as u64 + 1,
        (false, _) => u64::MAX,
    };

    let magnitude = parse_unsigned_integer(bytes, prefix_len, suffix_pos, base, limit)?;
    let value = magnitude as i64;
    Ok(if negative { value.wrapping_neg() } else { value })
}

/// `(radix, prefix length, is decimal)` for the digits in `bytes[..end]`.
fn integer_base(bytes: &[u8], end: usize) -> (u32, usize, bool) {
    if end == 0 || bytes[0] != b'0' {
        return (10, 0, true);
    }
    if end >= 2 {
        match bytes[1] {
            b'x' | b'X' => return (16, 2, false),
            b'b' | b'B' => return (2, 2, false),
            _ => {}
        }
    }
    if end > 1 {
        // Leading zero followed by more digits: octal.
        return (8, 1, false);
    }
    (10, 0, true)
}

fn parse_unsigned_integer(
    bytes: &[u8],
    prefix_len: usize,
    end: usize,
    base: u32,
    limit: u64,
) -> Result<u64, LiteralError> {
    if end == 0 {
        return Err(err("Missing digits", 0..0));
    }
    if bytes[end - 1] == b'_' {
        return Err(err(
            "Trailing underscore is not allowed in numeric literal",
            end - 1..end,
        ));
    }
    if prefix_len == 2 {
        if end == 2 {
            return Err(err("Missing digits after base prefix", 2..2));
        }
        if bytes[2] == b'_' {
            return Err(err(
                "Underscore is not allowed immediately after base prefix",
                2..3,
            ));
        }
    }

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for (idx, &b) in bytes[..end].iter().enumerate().skip(prefix_len) {
        if b == b'_' {
            continue;
        }
        let digit = (b as char)
            .to_digit(base)
            .ok_or_else(|| {
                err(
                    format!("Invalid digit `{}` in {} literal", b as char, base_name(base)),
                    idx..idx + 1,
                )
            })? as u64;

        seen_digit = true;
        value = value
            .checked_mul(base as u64)
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v <= limit)
            .ok_or_else(|| err("Integer literal is out of range", 0..end))?;
    }

    if !seen_digit {
        return Err(err("Missing digits", prefix_len..end));
    }
    Ok(value)
}

fn base_name(base: u32) -> &'static str {
    match base {
        2 => "binary",
        8 => "octal",
        16 => "hexadecimal",
        _ => "decimal",
    }
}

pub fn parse_float_literal(text: &str, negative: bool) -> Result<f32, LiteralError> {
    let main = strip_float_suffix(text, &[b'f', b'F'], true)?;
    let value = if is_hex(main) {
        parse_hex_floating(main)? as f32
    } else {
        validate_decimal_floating(main, true)?;
        sanitize(main)
            .parse::<f32>()
            .map_err(|_| err("Invalid float literal", 0..main.len()))?
    };
    check_float_range(value.is_infinite(), value == 0.0, main)?;
    Ok(if negative { -value } else { value })
}

pub fn parse_double_literal(text: &str, negative: bool) -> Result<f64, LiteralError> {
    let (main, had_suffix) = match text.as_bytes().last() {
        Some(b'd' | b'D') if !is_hex(text) || text.contains(['p', 'P']) => {
            (strip_float_suffix(text, &[b'd', b'D'], true)?, true)
        }
        Some(b'f' | b'F') if !is_hex(text) => {
            return Err(err(
                "Double literal must not use `f` suffix",
                text.len() - 1..text.len(),
            ))
        }
        _ => (text, false),
    };
    let value = if is_hex(main) {
        parse_hex_floating(main)?
    } else {
        validate_decimal_floating(main, had_suffix)?;
        sanitize(main)
            .parse::<f64>()
            .map_err(|_| err("Invalid double literal", 0..main.len()))?
    };
    check_float_range(value.is_infinite(), value == 0.0, main)?;
    Ok(if negative { -value } else { value })
}

fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

fn sanitize(main: &str) -> String {
    main.chars().filter(|&ch| ch != '_').collect()
}

fn strip_float_suffix<'a>(
    text: &'a str,
    suffixes: &[u8],
    required: bool,
) -> Result<&'a str, LiteralError> {
    let bytes = text.as_bytes();
    match bytes.last() {
        Some(last) if suffixes.contains(last) => {
            let end = bytes.len() - 1;
            if end > 0 && bytes[end - 1] == b'_' {
                return Err(err(
                    "Underscore is not allowed immediately before suffix",
                    end - 1..end,
                ));
            }
            if end == 0 {
                return Err(err("Missing digits", 0..text.len()));
            }
            Ok(&text[..end])
        }
        Some(_) if required => Err(err(
            "Floating literal is missing its suffix",
            bytes.len() - 1..bytes.len(),
        )),
        Some(_) => Ok(text),
        None => Err(err("Empty floating literal", 0..0)),
    }
}

/// A non-zero literal may round to neither infinity nor zero.
fn check_float_range(infinite: bool, zero: bool, main: &str) -> Result<(), LiteralError> {
    if infinite {
        return Err(err("Floating literal is too large", 0..main.len()));
    }
    let has_nonzero_digit = main
        .bytes()
        .take_while(|b| !matches!(b, b'e' | b'E' | b'p' | b'P'))
        .skip(if is_hex(main) { 2 } else { 0 })
        .any(|b| b.is_ascii_hexdigit() && b != b'0');
    if zero && has_nonzero_digit {
        return Err(err("Floating literal is too small", 0..main.len()));
    }
    Ok(())
}

fn validate_decimal_floating(main: &str, had_suffix: bool) -> Result<(), LiteralError> {
    let bytes = main.as_bytes();
    if bytes.is_empty() {
        return Err(err("Missing digits", 0..0));
    }
    if bytes[0] == b'_' {
        return Err(err(
            "Leading underscore is not allowed in numeric literal",
            0..1,
        ));
    }
    if bytes[bytes.len() - 1] == b'_' {
        return Err(err(
            "Trailing underscore is not allowed in numeric literal",
            bytes.len() - 1..bytes.len(),
        ));
    }

    let mut dot_idx: Option<usize> = None;
    let mut exp_idx: Option<usize> = None;
    for (idx, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' | b'_' => {}
            b'.' => {
                if exp_idx.is_some() || dot_idx.replace(idx).is_some() {
                    return Err(err("Misplaced decimal point", idx..idx + 1));
                }
            }
            b'e' | b'E' => {
                if exp_idx.replace(idx).is_some() {
                    return Err(err("Multiple exponents in literal", idx..idx + 1));
                }
            }
            b'+' | b'-' if exp_idx.is_some_and(|e| idx == e + 1) => {}
            _ => {
                return Err(err(
                    format!("Invalid character `{}` in floating literal", b as char),
                    idx..idx + 1,
                ))
            }
        }
    }

    for marker in [dot_idx, exp_idx].into_iter().flatten() {
        let before = marker.checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(marker + 1).copied();
        if before == Some(b'_') || after == Some(b'_') {
            return Err(err(
                "Underscore is not allowed next to `.` or exponent",
                marker..marker + 1,
            ));
        }
    }

    let sig_end = exp_idx.unwrap_or(bytes.len());
    if !bytes[..sig_end].iter().any(u8::is_ascii_digit) {
        return Err(err("Missing digits in literal", 0..sig_end));
    }
    if let Some(e) = exp_idx {
        if !bytes[e + 1..].iter().any(u8::is_ascii_digit) {
            return Err(err("Missing exponent digits", e..e + 1));
        }
    }
    if !had_suffix && dot_idx.is_none() && exp_idx.is_none() {
        return Err(err(
            "Floating literal without suffix must contain a decimal point or exponent",
            0..main.len(),
        ));
    }
    Ok(())
}

/// `0x<hex digits>[.<hex digits>]p<signed decimal exponent>`.
fn parse_hex_floating(main: &str) -> Result<f64, LiteralError> {
    let bytes = main.as_bytes();
    let p_idx = bytes
        .iter()
        .position(|b| matches!(b, b'p' | b'P'))
        .ok_or_else(|| {
            err(
                "Hexadecimal floating literal is missing binary exponent (`p`)",
                0..main.len(),
            )
        })?;

    let mut mantissa = 0f64;
    let mut frac_digits = 0i32;
    let mut seen_dot = false;
    let mut saw_digit = false;
    for (idx, &b) in bytes.iter().enumerate().take(p_idx).skip(2) {
        match b {
            b'_' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => {
                let digit = (b as char).to_digit(16).ok_or_else(|| {
                    err(
                        format!("Invalid character `{}` in hexadecimal literal", b as char),
                        idx..idx + 1,
                    )
                })?;
                saw_digit = true;
                mantissa = mantissa * 16.0 + digit as f64;
                if seen_dot {
                    frac_digits += 1;
                }
            }
        }
    }
    if !saw_digit {
        return Err(err(
            "Hexadecimal floating literal is missing significand digits",
            2..p_idx,
        ));
    }

    let exp_text = sanitize(&main[p_idx + 1..]);
    let exponent: i32 = exp_text
        .parse()
        .map_err(|_| err("Missing exponent digits", p_idx..main.len()))?;
    Ok(mantissa * 2f64.powi(exponent.saturating_sub(frac_digits.saturating_mul(4))))
}

/// Decode a character literal, quotes included, to its UTF-16 code unit.
pub fn unescape_char_literal(text: &str) -> Result<u16, LiteralError> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\'' || bytes[bytes.len() - 1] != b'\'' {
        return Err(err("Invalid char literal", 0..text.len()));
    }

    let mut units = Vec::with_capacity(1);
    unescape_java_string_like(text, 1, text.len() - 1, &mut units)?;
    match units.as_slice() {
        [unit] => Ok(*unit),
        [] => Err(err("Empty char literal", 0..text.len())),
        _ => Err(err(
            "Char literal must contain exactly one character",
            0..text.len(),
        )),
    }
}

/// Decode a string literal, quotes included.
pub fn unescape_string_literal(text: &str) -> Result<String, LiteralError> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return Err(err("Invalid string literal", 0..text.len()));
    }
    let mut units = Vec::with_capacity(text.len());
    unescape_java_string_like(text, 1, text.len() - 1, &mut units)?;
    Ok(String::from_utf16_lossy(&units))
}

/// Render a UTF-16 code unit as a Java character literal that decodes back to it.
pub fn escape_char_literal(unit: u16) -> String {
    let body = match unit {
        0x08 => "\\b".to_owned(),
        0x09 => "\\t".to_owned(),
        0x0A => "\\n".to_owned(),
        0x0C => "\\f".to_owned(),
        0x0D => "\\r".to_owned(),
        0x22 => "\\\"".to_owned(),
        0x27 => "\\'".to_owned(),
        0x5C => "\\\\".to_owned(),
        0x20..=0x7E => char::from(unit as u8).to_string(),
        _ => format!("\\u{unit:04x}"),
    };
    format!("'{body}'")
}

fn unescape_java_string_like(
    text: &str,
    start: usize,
    end: usize,
    out: &mut Vec<u16>,
) -> Result<(), LiteralError> {
    let bytes = text.as_bytes();
    let mut idx = start;
    while idx < end {
        match bytes[idx] {
            b'\\' => idx = unescape_java_escape(bytes, idx, end, out)?,
            b'\n' | b'\r' => {
                return Err(err(
                    "Line terminator is not allowed in string/char literal",
                    idx..idx + 1,
                ))
            }
            _ => {
                let ch = text[idx..end].chars().next().unwrap_or('\u{FFFD}');
                let mut buf = [0u16; 2];
                out.extend_from_slice(ch.encode_utf16(&mut buf));
                idx += ch.len_utf8();
            }
        }
    }
    Ok(())
}

fn unescape_java_escape(
    bytes: &[u8],
    idx: usize,
    end: usize,
    out: &mut Vec<u16>,
) -> Result<usize, LiteralError> {
    let Some(&next) = bytes.get(idx + 1).filter(|_| idx + 1 < end) else {
        return Err(err("Unterminated escape sequence", idx..end));
    };

    let simple = match next {
        b'b' => Some(0x08),
        b't' => Some(0x09),
        b'n' => Some(0x0A),
        b'f' => Some(0x0C),
        b'r' => Some(0x0D),
        b'"' => Some(0x22),
        b'\'' => Some(0x27),
        b'\\' => Some(0x5C),
        _ => None,
    };
    if let Some(unit) = simple {
        out.push(unit);
        return Ok(idx + 2);
    }

    match next {
        b'u' => {
            let digits_start = idx + 2;
            if digits_start + 4 > end {
                return Err(err("Incomplete unicode escape", idx..end));
            }
            let mut value: u16 = 0;
            for pos in digits_start..digits_start + 4 {
                let b = bytes[pos];
                let digit = (b as char).to_digit(16).ok_or_else(|| {
                    err(
                        format!("Invalid hex digit `{}` in unicode escape", b as char),
                        pos..pos + 1,
                    )
                })?;
                value = (value << 4) | digit as u16;
            }
            out.push(value);
            Ok(digits_start + 4)
        }
        b'0'..=b'7' => {
            let max_digits = if next <= b'3' { 3 } else { 2 };
            let mut j = idx + 1;
            let mut value: u16 = 0;
            while j < end && j < idx + 1 + max_digits && matches!(bytes[j], b'0'..=b'7') {
                value = value * 8 + (bytes[j] - b'0') as u16;
                j += 1;
            }
            out.push(value);
            Ok(j)
        }
        _ => Err(err(
            format!("Unknown escape sequence `\\{}`", next as char),
            idx..idx + 2,
        )),
    }
}
