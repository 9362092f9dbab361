//! Low-level bit read utilities for byte slices.
//!
//! Bits are addressed in LSB-first order: bit 0 is the low bit of the first byte,
//! and byte `i` holds bits `8 * i ..= 8 * i + 7`.

use crate::errors::BitError;

/// Reads a single bit at `bit_pos` (0 = LSB of first byte).
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<bool, BitError> {
    let bits = data.len() * 8;
    if bit_pos >= bits {
        return Err(BitError::OutOfRange { pos: bit_pos, bits });
    }

    let byte_index = bit_pos / 8;
    let bit_index = bit_pos % 8;

    Ok((data[byte_index] >> bit_index) & 1 == 1)
}

/// Reads the inclusive bit range `low_bit..=high_bit` as an unsigned value.
///
/// Bit `low_bit` becomes bit 0 of the result. The range may span byte
/// boundaries but must be at most 64 bits wide.
pub fn read_unsigned_range(data: &[u8], low_bit: usize, high_bit: usize) -> Result<u64, BitError> {
    if high_bit < low_bit || high_bit - low_bit >= 64 {
        return Err(BitError::InvalidRange {
            low: low_bit,
            high: high_bit,
        });
    }

    let bits = data.len() * 8;
    if high_bit >= bits {
        return Err(BitError::OutOfRange { pos: high_bit, bits });
    }

    let mut value = 0u64;
    for pos in (low_bit..=high_bit).rev() {
        value = (value << 1) | read_bit_at(data, pos)? as u64;
    }

    Ok(value)
}
