//! VL64: variable length, sign aware sextet integers.
//!
//! The header byte is laid out `0 1 L L L S V V` (MSB first): `LLL` is the
//! total token length in bytes (1..=6), `S` the sign and `VV` the two lowest
//! magnitude bits. Each continuation byte carries the next six magnitude bits,
//! least significant chunk first. Because the header states its own length a
//! run of tokens can be decoded back to back without any external index.
//!
//! Magnitudes are limited to 32 bits (`2 + 6 * 5`); larger values are rejected
//! with [`CodecError::MagnitudeOverflow`].

use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::errors::{Codec, CodecError};
use crate::shockwave::{check_sextet, is_sextet, sextet, SEXTET_BITS, SEXTET_MARKER};

/// Longest token the 3-bit length field may announce
pub const MAX_LEN: usize = 6;

/// Largest magnitude a [`MAX_LEN`] token can hold
pub const MAX_MAGNITUDE: u64 = u32::MAX as u64;

const SIGN_BIT: u8 = 0x04;
const LOW_BITS: u8 = 0x03;
const LENGTH_SHIFT: u32 = 3;
const LENGTH_MASK: u8 = 0x07;
// Magnitude bits held by the header itself
const HEADER_BITS: u32 = 2;

fn magnitude(v: i64) -> Result<u32, CodecError> {
    u32::try_from(v.unsigned_abs()).map_err(|_| CodecError::MagnitudeOverflow(v))
}

fn len_for(magnitude: u32) -> usize {
    let bits = u32::BITS - magnitude.leading_zeros();
    ((bits + 9) / SEXTET_BITS) as usize
}

/// Returns the number of bytes needed to encode `v`.
///
/// The sign never affects the length: `encoded_len(4) == encoded_len(-4) == 2`.
pub fn encoded_len(v: i64) -> Result<usize, CodecError> {
    magnitude(v).map(len_for)
}

/// Encodes `v` into `buf`, which must be exactly [`encoded_len`] bytes long.
///
/// Every byte of `buf` is overwritten.
pub fn encode(buf: &mut [u8], v: i64) -> Result<(), CodecError> {
    let abs = magnitude(v)?;
    let n = len_for(abs);
    if buf.len() != n {
        return Err(CodecError::BufferLength {
            expected: n,
            actual: buf.len(),
        });
    }

    let mut header = SEXTET_MARKER | (n as u8) << LENGTH_SHIFT | (abs as u8 & LOW_BITS);
    if v < 0 {
        header |= SIGN_BIT;
    }
    buf[0] = header;

    let abs = u64::from(abs);
    for (i, byte) in buf.iter_mut().enumerate().skip(1) {
        *byte = sextet(abs >> (HEADER_BITS + SEXTET_BITS * (i as u32 - 1)));
    }
    Ok(())
}

/// Encodes `v` into a freshly allocated, exactly sized buffer
pub fn encode_to_vec(v: i64) -> Result<Vec<u8>, CodecError> {
    let mut buf = vec![0u8; encoded_len(v)?];
    encode(&mut buf, v)?;
    Ok(buf)
}

/// Reads the token length (header included) announced by a header byte
pub fn decoded_len(header: u8) -> Result<usize, CodecError> {
    if !is_sextet(header) {
        return Err(CodecError::InvalidHighBits {
            codec: Codec::Vl64,
            byte: header,
        });
    }
    let length = header >> LENGTH_SHIFT & LENGTH_MASK;
    if length == 0 || length as usize > MAX_LEN {
        return Err(CodecError::InvalidLength {
            byte: header,
            length,
        });
    }
    Ok(length as usize)
}

/// Decodes the token at the front of `bytes`.
///
/// Returns the value and the number of bytes the token occupies; bytes past
/// the token are left untouched so the caller can continue from there.
pub fn decode(bytes: &[u8]) -> Result<(i64, usize), CodecError> {
    let header = *bytes
        .first()
        .ok_or(CodecError::InsufficientLength { need: 1, have: 0 })?;
    let n = decoded_len(header)?;
    if bytes.len() < n {
        return Err(CodecError::InsufficientLength {
            need: n,
            have: bytes.len(),
        });
    }

    let mut abs = u64::from(header & LOW_BITS);
    for (i, &byte) in bytes[1..n].iter().enumerate() {
        let chunk = check_sextet(Codec::Vl64, byte)?;
        abs |= u64::from(chunk) << (HEADER_BITS + SEXTET_BITS * i as u32);
    }

    // At most 32 magnitude bits, always representable
    let value = abs as i64;
    if header & SIGN_BIT != 0 {
        Ok((-value, n))
    } else {
        Ok((value, n))
    }
}

/// A single token decoded from a VL64 stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub value: i64,
    /// The encoded bytes of this token
    pub bytes: &'a [u8],
}

/// Iterator over a run of concatenated VL64 tokens.
///
/// Yields tokens until the input is exhausted. The first decode error is
/// yielded once, after which the iterator is finished.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> Tokens<'a> {
    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        match decode(self.rest) {
            Ok((value, n)) => {
                let (bytes, rest) = self.rest.split_at(n);
                self.rest = rest;
                trace!(value, len = n, "decoded vl64 token");
                Some(Ok(Token { value, bytes }))
            }
            Err(e) => {
                self.failed = true;
                debug!(error = %e, remaining = self.rest.len(), "vl64 stream aborted");
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}

/// Decodes every token of a concatenated VL64 run
pub fn tokens(bytes: &[u8]) -> Tokens<'_> {
    Tokens {
        rest: bytes,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_boundaries() {
        assert_eq!(encoded_len(0).unwrap(), 1);
        assert_eq!(encoded_len(3).unwrap(), 1);
        assert_eq!(encoded_len(-3).unwrap(), 1);
        assert_eq!(encoded_len(4).unwrap(), 2);
        assert_eq!(encoded_len(-4).unwrap(), 2);
        assert_eq!(encoded_len(5).unwrap(), 2);
        assert_eq!(encoded_len(255).unwrap(), 2);
        assert_eq!(encoded_len(256).unwrap(), 3);
        assert_eq!(encoded_len((1 << 14) - 1).unwrap(), 3);
        assert_eq!(encoded_len(1 << 14).unwrap(), 4);
        assert_eq!(encoded_len(1 << 20).unwrap(), 5);
        assert_eq!(encoded_len(1 << 26).unwrap(), 6);
        assert_eq!(encoded_len(MAX_MAGNITUDE as i64).unwrap(), 6);
        assert_eq!(encoded_len(-(MAX_MAGNITUDE as i64)).unwrap(), 6);
    }

    #[test]
    fn test_encoded_len_rejects_wide_magnitudes() {
        let too_big = MAX_MAGNITUDE as i64 + 1;
        assert_eq!(encoded_len(too_big), Err(CodecError::MagnitudeOverflow(too_big)));
        assert_eq!(encoded_len(i64::MIN), Err(CodecError::MagnitudeOverflow(i64::MIN)));
        assert_eq!(encode_to_vec(-too_big), Err(CodecError::MagnitudeOverflow(-too_big)));
        // Rejected before the buffer length is looked at
        let mut buf = [0u8; MAX_LEN];
        assert_eq!(encode(&mut buf, 1 << 40), Err(CodecError::MagnitudeOverflow(1 << 40)));
        assert_eq!(buf, [0u8; MAX_LEN]);
    }

    #[test]
    fn test_encode_known_tokens() {
        assert_eq!(encode_to_vec(0).unwrap(), vec![0b0100_1000]);
        assert_eq!(encode_to_vec(1).unwrap(), b"I");
        assert_eq!(encode_to_vec(-1).unwrap(), b"M");
        assert_eq!(encode_to_vec(3).unwrap(), b"K");
        assert_eq!(encode_to_vec(4).unwrap(), b"PA");
        assert_eq!(encode_to_vec(5).unwrap(), b"QA");
        assert_eq!(encode_to_vec(300).unwrap(), b"XKA");
        assert_eq!(
            encode_to_vec(MAX_MAGNITUDE as i64).unwrap(),
            vec![0x73, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F]
        );
    }

    #[test]
    fn test_encode_negative_sets_sign_flag() {
        let token = encode_to_vec(-5).unwrap();
        assert_eq!(token.len(), 2);
        assert_eq!(token[0] & SIGN_BIT, SIGN_BIT);
        assert_eq!(token[0] >> LENGTH_SHIFT & LENGTH_MASK, 2);
        assert_eq!(token, b"UA");
    }

    #[test]
    fn test_encode_checks_buffer_length() {
        let mut buf = [0u8; 1];
        assert_eq!(
            encode(&mut buf, 300),
            Err(CodecError::BufferLength {
                expected: 3,
                actual: 1
            })
        );

        let mut buf = [0xFFu8; 3];
        encode(&mut buf, 300).unwrap();
        assert_eq!(&buf, b"XKA");
    }

    #[test]
    fn test_decoded_len() {
        assert_eq!(decoded_len(b'I').unwrap(), 1);
        assert_eq!(decoded_len(b'X').unwrap(), 3);
        assert_eq!(decoded_len(0x70).unwrap(), 6);
        assert_eq!(
            decoded_len(0x80),
            Err(CodecError::InvalidHighBits {
                codec: Codec::Vl64,
                byte: 0x80
            })
        );
        assert_eq!(
            decoded_len(0x40),
            Err(CodecError::InvalidLength {
                byte: 0x40,
                length: 0
            })
        );
        assert_eq!(
            decoded_len(0x78),
            Err(CodecError::InvalidLength {
                byte: 0x78,
                length: 7
            })
        );
    }

    #[test]
    fn test_decode_known_tokens() {
        assert_eq!(decode(&[0x48]).unwrap(), (0, 1));
        assert_eq!(decode(b"UA").unwrap(), (-5, 2));
        assert_eq!(decode(b"XKA").unwrap(), (300, 3));
        // Trailing bytes belong to the next token
        assert_eq!(decode(b"XKA!!").unwrap(), (300, 3));
        // Negative zero collapses to zero
        assert_eq!(decode(&[0x4C]).unwrap(), (0, 1));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            decode(&[]),
            Err(CodecError::InsufficientLength { need: 1, have: 0 })
        );
        assert_eq!(
            decode(b"XK"),
            Err(CodecError::InsufficientLength { need: 3, have: 2 })
        );
        assert_eq!(
            decode(&[0x50, 0x01]),
            Err(CodecError::InvalidHighBits {
                codec: Codec::Vl64,
                byte: 0x01
            })
        );
        assert_eq!(
            decode(&[0x58, 0x41, 0xC1]),
            Err(CodecError::InvalidHighBits {
                codec: Codec::Vl64,
                byte: 0xC1
            })
        );
    }

    #[test]
    fn test_tokens_advance_by_declared_length() {
        let stream = b"XKAUAI";
        let decoded: Vec<_> = tokens(stream).map(|t| t.unwrap()).collect();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].value, 300);
        assert_eq!(decoded[0].bytes, b"XKA");
        assert_eq!(decoded[1].value, -5);
        assert_eq!(decoded[1].bytes, b"UA");
        assert_eq!(decoded[2].value, 1);
        assert_eq!(decoded[2].bytes, b"I");
    }

    #[test]
    fn test_tokens_stop_after_error() {
        let mut iter = tokens(b"IXK");
        assert_eq!(iter.next().unwrap().unwrap().value, 1);
        assert_eq!(
            iter.next().unwrap(),
            Err(CodecError::InsufficientLength { need: 3, have: 2 })
        );
        assert_eq!(iter.remaining(), b"XK");
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_tokens_empty_input() {
        assert_eq!(tokens(&[]).count(), 0);
    }
}
