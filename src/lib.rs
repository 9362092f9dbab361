//! # bitpun
//!
//! Capture the raw bits of a memory region or a scalar value and reinterpret
//! them as an integer or an IEEE 754 float.
//!
//! A [BitSequence] owns a copy of the captured bytes, least significant byte
//! first, and is addressed bit by bit with bit 0 as the low bit of byte 0.
//! Floats are rebuilt from their sign, exponent and mantissa fields
//! arithmetically, without reinterpreting memory. NaN payloads are not
//! preserved; every NaN pattern decodes to the canonical NaN.
//!
//! ## Example
//!
//! ```
//! use bitpun::{BitSequence, BitError};
//!
//! let seq = BitSequence::capture(Some(&[0xFF]), 8).unwrap();
//! assert_eq!(seq.decode_int::<i8>(), Ok(-1));
//!
//! let seq = BitSequence::capture_value(0x3FF8_0000_0000_0000u64);
//! assert_eq!(seq.decode_f64(), Ok(1.5));
//!
//! assert_eq!(
//!     BitSequence::capture(Some(&[0xFF]), 5),
//!     Err(BitError::InvalidLength { bits: 5 })
//! );
//! ```

pub mod bits;
pub mod errors;
pub mod float;
pub mod integer;
pub mod sequence;

pub use errors::{BitError, Result};
pub use float::{
    FloatClass, FloatFields, FloatLayout, classify_f32, classify_f64, decode_f32, decode_f64,
    unpack_f32, unpack_f64,
};
pub use integer::{Integer, decode_int};
pub use sequence::{BitSequence, Scalar};
