//! B64: fixed width, unsigned sextet integers.
//!
//! A value occupies exactly as many bytes as the buffer handed in, most
//! significant chunk first. Nothing in the data records the width, so both
//! sides must agree on it out of band.
//!
//! Encoding is truncating by design: bits of the value above `6 * width` are
//! dropped without error, matching fixed-width fields whose values are bounded
//! by convention (a 2-byte field holds 12 bits).

use crate::errors::{Codec, CodecError};
use crate::shockwave::{check_sextet, sextet, SEXTET_BITS};

/// Widest field that round-trips every `u64` bit it can hold
pub const MAX_WIDTH: usize = 10;

/// Encodes `v` into every byte of `buf`, most significant chunk first
pub fn encode(buf: &mut [u8], v: u64) {
    let width = buf.len();
    for (i, byte) in buf.iter_mut().enumerate() {
        let shift = (width - i - 1) as u32 * SEXTET_BITS;
        *byte = sextet(v.checked_shr(shift).unwrap_or(0));
    }
}

/// Encodes `v` into a freshly allocated `width` byte buffer
pub fn encode_to_vec(v: u64, width: usize) -> Vec<u8> {
    let mut buf = vec![0u8; width];
    encode(&mut buf, v);
    buf
}

/// Decodes a value spanning all of `bytes`
pub fn decode(bytes: &[u8]) -> Result<u64, CodecError> {
    bytes.iter().try_fold(0u64, |acc, &byte| {
        let chunk = check_sextet(Codec::B64, byte)?;
        Ok(acc << SEXTET_BITS | u64::from(chunk))
    })
}
