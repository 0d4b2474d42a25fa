//! Shockwave sextet integer encodings.
//!
//! Every encoded byte is a "sextet byte" of the form `0b01xxxxxx`: the two
//! high bits are a fixed marker and the low six bits carry payload. Two
//! independent codecs are built on that convention:
//!
//! * [`vl64`] - variable length, signed and self delimiting (1 to 6 bytes)
//! * [`b64`] - fixed width, unsigned, width implied by the buffer length

pub mod b64;
pub mod vl64;

use crate::errors::{Codec, CodecError};

/// The `01` prefix every sextet byte carries
pub const SEXTET_MARKER: u8 = 0x40;

/// Selects the two marker bits of a byte
pub const MARKER_MASK: u8 = 0xC0;

/// Selects the six payload bits of a byte
pub const PAYLOAD_MASK: u8 = 0x3F;

/// Payload bits per sextet byte
pub const SEXTET_BITS: u32 = 6;

/// Returns true when the byte carries the `01` marker
#[inline]
pub fn is_sextet(byte: u8) -> bool {
    byte & MARKER_MASK == SEXTET_MARKER
}

/// Builds a sextet byte from the low six bits of `chunk`
#[inline]
pub fn sextet(chunk: u64) -> u8 {
    SEXTET_MARKER | (chunk as u8 & PAYLOAD_MASK)
}

/// Strips the marker bits, leaving the payload
#[inline]
pub fn payload(byte: u8) -> u8 {
    byte & PAYLOAD_MASK
}

/// Validates the marker bits, reporting the offending byte on failure
#[inline]
pub fn check_sextet(codec: Codec, byte: u8) -> Result<u8, CodecError> {
    if is_sextet(byte) {
        Ok(payload(byte))
    } else {
        Err(CodecError::InvalidHighBits { codec, byte })
    }
}
