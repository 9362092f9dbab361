//! Error types for capturing, reading and decoding bit sequences.

use thiserror::Error;

/// Errors produced by [crate::sequence::BitSequence] construction, bit reads and the decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitError {
    /// Capture length is not a whole number of bytes.
    #[error("bit length {bits} is not a multiple of 8")]
    InvalidLength { bits: usize },
    /// Requested bit is beyond the end of the data.
    #[error("bit {pos} is out of range for {bits} bits")]
    OutOfRange { pos: usize, bits: usize },
    /// Sequence holds more bits than the target integer type.
    #[error("{bits} bits do not fit into a {width}-bit integer")]
    WidthOverflow { bits: usize, width: usize },
    /// Float decoder was given a sequence of the wrong length.
    #[error("expected exactly {expected} bits, got {actual}")]
    WrongWidth { expected: usize, actual: usize },
    /// Bit range is reversed or wider than 64 bits.
    #[error("invalid bit range [{low}, {high}]")]
    InvalidRange { low: usize, high: usize },
}

pub type Result<T> = std::result::Result<T, BitError>;
