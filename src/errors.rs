use std::fmt;

use thiserror::Error;

/// Which of the two sextet encodings raised an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Vl64,
    B64,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Vl64 => f.write_str("vl64"),
            Codec::B64 => f.write_str("b64"),
        }
    }
}

fn shown(byte: &u8) -> char {
    char::from(*byte)
}

/// Structural failures raised by the VL64 and B64 codecs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid high bits in {codec}: {:?} (0x{byte:02x})", shown(.byte))]
    InvalidHighBits { codec: Codec, byte: u8 },

    #[error("invalid length in vl64: {:?} ({length})", shown(.byte))]
    InvalidLength { byte: u8, length: u8 },

    #[error("insufficient length: need {need} bytes, have {have}")]
    InsufficientLength { need: usize, have: usize },

    #[error("magnitude of {0} exceeds the 32 bits a vl64 token can carry")]
    MagnitudeOverflow(i64),

    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },
}

/// Failures parsing the `[n]` byte escape syntax
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("character '[' inside escape sequence")]
    NestedOpen,

    #[error("character ']' outside escape sequence")]
    UnmatchedClose,

    #[error("empty escape sequence")]
    EmptyEscape,

    #[error("invalid character inside escape sequence: {0:?}")]
    InvalidDigit(char),

    #[error("byte value out of range: {0}")]
    OutOfRange(String),

    #[error("unterminated escape sequence")]
    Unterminated,

    #[error("non-ascii character must be escaped: {0:?}")]
    NonAscii(char),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Escape(#[from] EscapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an integer: {0:?}")]
    NotAnInteger(String),

    #[error("b64 must be {width} bytes, got {actual}: {input:?}")]
    WidthMismatch {
        width: usize,
        actual: usize,
        input: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
