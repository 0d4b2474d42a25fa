//! Shockwave VL64 and B64 sextet integer encodings in Rust.

// Error handling module
mod errors;

pub mod cli;
pub mod escaping;
pub mod shockwave;

// Re-export error types
pub use errors::Codec;
pub use errors::CodecError;
pub use errors::Error;
pub use errors::EscapeError;
pub use errors::Result;
pub use shockwave::{b64, vl64};
