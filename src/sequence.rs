//! [BitSequence]: an owned, immutable copy of raw bytes addressed bit by bit.

use std::fmt;

use tracing::trace;

use crate::{
    bits,
    errors::BitError,
    float,
    integer::{self, Integer},
};

/// Raw bits captured from memory or from a scalar value.
///
/// Byte 0 is the least significant byte. Bit `pos` lives in byte `pos / 8` at
/// offset `pos % 8`, counting from the low bit of that byte. The bit length is
/// always a multiple of 8.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BitSequence {
    bytes: Box<[u8]>,
}

impl BitSequence {
    /// Copies the first `bit_length / 8` bytes of `region`.
    ///
    /// A `None` region yields an empty sequence whatever `bit_length` is, but
    /// the length must still be a whole number of bytes.
    pub fn capture(region: Option<&[u8]>, bit_length: usize) -> Result<Self, BitError> {
        if bit_length % 8 != 0 {
            return Err(BitError::InvalidLength { bits: bit_length });
        }

        let Some(region) = region else {
            trace!(bit_length, "capture from absent region, sequence is empty");
            return Ok(Self::default());
        };

        let byte_len = bit_length / 8;
        if byte_len > region.len() {
            return Err(BitError::OutOfRange {
                pos: bit_length - 1,
                bits: region.len() * 8,
            });
        }

        trace!(byte_len, "captured bytes");

        Ok(Self {
            bytes: region[..byte_len].into(),
        })
    }

    /// Captures the bits of a scalar at its natural width, low byte first.
    pub fn capture_value<T: Scalar>(value: T) -> Self {
        let bytes = value.le_bytes();
        debug_assert_eq!(bytes.len() * 8, T::BITS);

        trace!(bits = T::BITS, "captured value");

        Self { bytes }
    }

    /// Total number of bits, always `byte_len() * 8`.
    pub fn bit_length(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns bit `pos`, where 0 is the least significant bit of byte 0.
    pub fn get_bit(&self, pos: usize) -> Result<bool, BitError> {
        bits::read_bit_at(&self.bytes, pos)
    }

    /// Reads bits `low_bit..=high_bit` as an unsigned value. See [bits::read_unsigned_range].
    pub fn read_unsigned_range(&self, low_bit: usize, high_bit: usize) -> Result<u64, BitError> {
        bits::read_unsigned_range(&self.bytes, low_bit, high_bit)
    }

    /// Iterates all bits from bit 0 upward.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bytes
            .iter()
            .flat_map(|byte| (0..8).map(move |offset| (byte >> offset) & 1 == 1))
    }

    /// Read-only view of the captured bytes, least significant first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Shorthand for [integer::decode_int].
    pub fn decode_int<T: Integer>(&self) -> Result<T, BitError> {
        integer::decode_int(self)
    }

    /// Shorthand for [float::decode_f32].
    pub fn decode_f32(&self) -> Result<f32, BitError> {
        float::decode_f32(self)
    }

    /// Shorthand for [float::decode_f64].
    pub fn decode_f64(&self) -> Result<f64, BitError> {
        float::decode_f64(self)
    }
}

impl AsRef<[u8]> for BitSequence {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Writes the bits as `0`/`1`, most significant bit first.
impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.bytes.iter().rev() {
            write!(f, "{byte:08b}")?;
        }

        Ok(())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Scalar types whose bits can be captured with [BitSequence::capture_value].
pub trait Scalar: sealed::Sealed + Copy {
    /// Natural width of the type in bits.
    const BITS: usize;

    /// The value's bytes in little-endian order.
    fn le_bytes(self) -> Box<[u8]>;
}

macro_rules! impl_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Scalar for $t {
                const BITS: usize = std::mem::size_of::<$t>() * 8;

                fn le_bytes(self) -> Box<[u8]> {
                    Box::from(self.to_le_bytes())
                }
            }

            impl From<$t> for BitSequence {
                fn from(value: $t) -> Self {
                    BitSequence::capture_value(value)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
