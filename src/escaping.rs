//! Console escaping for raw byte strings.
//!
//! Printable ASCII is written as is, except for the bracket characters
//! `[`, `]`, `{` and `}`. Every other byte is written as its decimal value in
//! square brackets, so `[0]@[255]` is the three bytes `0x00 0x40 0xFF`.

use crate::errors::EscapeError;

/// Returns true for bytes that are written without an escape
fn is_literal(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7E) && !matches!(byte, b'[' | b']' | b'{' | b'}')
}

/// Renders bytes in the bracket escape syntax
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if is_literal(byte) {
            out.push(char::from(byte));
        } else {
            out.push('[');
            out.push_str(&byte.to_string());
            out.push(']');
        }
    }
    out
}

fn parse_byte(digits: &str) -> Result<u8, EscapeError> {
    if digits.is_empty() {
        return Err(EscapeError::EmptyEscape);
    }
    // Only digits reach here, so a failed parse means the value is above 255
    digits
        .parse::<u8>()
        .map_err(|_| EscapeError::OutOfRange(digits.to_string()))
}

/// Parses text in the bracket escape syntax back into raw bytes
pub fn unescape(text: &str) -> Result<Vec<u8>, EscapeError> {
    let mut buf = Vec::with_capacity(text.len());
    let mut escaping = false;
    let mut digits = String::new();

    for c in text.chars() {
        match c {
            '[' => {
                if escaping {
                    return Err(EscapeError::NestedOpen);
                }
                escaping = true;
            }
            ']' => {
                if !escaping {
                    return Err(EscapeError::UnmatchedClose);
                }
                buf.push(parse_byte(&digits)?);
                digits.clear();
                escaping = false;
            }
            _ if escaping => {
                if !c.is_ascii_digit() {
                    return Err(EscapeError::InvalidDigit(c));
                }
                digits.push(c);
            }
            _ => {
                if !c.is_ascii() {
                    return Err(EscapeError::NonAscii(c));
                }
                buf.push(c as u8);
            }
        }
    }

    if escaping {
        return Err(EscapeError::Unterminated);
    }
    Ok(buf)
}
