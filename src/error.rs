//! Errors raised while parsing or marshaling OpenFlow statistics and queue messages.

use std::io;

use thiserror::Error;

/// Failures of the OpenFlow 0x01 stats/queue codec.
///
/// Every variant except `StructSizeAssertionFailed` can be produced by untrusted input
/// and is meant to be handled by the caller.
#[derive(Error, Debug)]
pub enum OfpSerializationError {
    /// Fewer bytes available than a fixed part requires.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    /// A declared length disagrees with the measured content.
    #[error("length mismatch in {what}: declared {declared} bytes, measured {actual}")]
    LengthMismatch {
        what: &'static str,
        declared: usize,
        actual: usize,
    },

    /// A list item declared a zero, unaligned, or too small length.
    #[error("invalid item length {len}: must be a multiple of 8 and at least {min}")]
    InvalidItemLength { len: usize, min: usize },

    /// A property tag that cannot be held as an opaque property, or that disagrees with the
    /// tag in the property's own bytes.
    #[error("invalid queue property type {property}")]
    InvalidProperty { property: u16 },

    #[error("invalid port number {port:#06x}")]
    InvalidPort { port: u16 },

    #[error("name too long: {len} bytes, at most {max} allowed")]
    NameTooLong { len: usize, max: usize },

    /// The codec emitted a different byte count than the protocol defines for a record.
    /// Raised only by the struct-size self check, never by decoding.
    #[error("struct size assertion failed for {record}: expected {expected} bytes, emitted {actual}")]
    StructSizeAssertionFailed {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported OpenFlow version {version:#04x}")]
    UnsupportedVersion { version: u8 },

    #[error("unsupported message type code {code}")]
    UnsupportedMessage { code: u8 },

    #[error("unknown stats type {code:#06x}")]
    UnknownStatsType { code: u16 },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OfpSerializationError>;
