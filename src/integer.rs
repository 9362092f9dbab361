//! Reconstruction of fixed-width integers from a [BitSequence].

use tracing::trace;

use crate::{errors::BitError, sequence::BitSequence};

mod sealed {
    pub trait Sealed {}
}

/// Integer types that [decode_int] can produce.
pub trait Integer: sealed::Sealed + Copy {
    /// Width of the type in bits.
    const BITS: usize;
    const ZERO: Self;

    /// Shifts `self` up by one byte and places `byte` in the low 8 bits.
    /// Bits shifted out of the top are discarded.
    fn push_byte(self, byte: u8) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Integer for $t {
                const BITS: usize = <$t>::BITS as usize;
                const ZERO: Self = 0;

                #[inline]
                fn push_byte(self, byte: u8) -> Self {
                    self.checked_shl(8).unwrap_or(0) | byte as $t
                }
            }
        )*
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Reinterprets the bytes of `seq` as an integer of type `T`.
///
/// Bytes are accumulated from the most significant stored byte down, so the
/// stored pattern is read back exactly, with two's-complement wraparound for
/// signed targets. A sequence shorter than `T` is zero-extended and the empty
/// sequence decodes to 0.
///
/// Fails with [BitError::WidthOverflow] if `seq` holds more bits than `T`.
pub fn decode_int<T: Integer>(seq: &BitSequence) -> Result<T, BitError> {
    if seq.bit_length() > T::BITS {
        return Err(BitError::WidthOverflow {
            bits: seq.bit_length(),
            width: T::BITS,
        });
    }

    trace!(bits = seq.bit_length(), width = T::BITS, "decoding integer");

    Ok(seq
        .as_bytes()
        .iter()
        .rev()
        .fold(T::ZERO, |acc, &byte| acc.push_byte(byte)))
}
