//! IEEE 754 reconstruction from raw bit patterns.
//!
//! The decoders never reinterpret memory as a float. They read the sign,
//! biased exponent and mantissa fields with [crate::bits::read_unsigned_range],
//! classify the pattern, and rebuild the magnitude arithmetically:
//!
//! | exponent `E`   | mantissa `M` | class     | magnitude                            |
//! |----------------|--------------|-----------|--------------------------------------|
//! | 0              | 0            | Zero      | 0                                    |
//! | 0              | != 0         | Subnormal | `M * 2^(emin - p)`                   |
//! | 0 < E < max    | any          | Normal    | `(2^p + M) * 2^(E - bias - p)`       |
//! | max            | 0            | Infinity  | inf                                  |
//! | max            | != 0         | Nan       | canonical NaN                        |
//!
//! where `p` is the mantissa width and `emin` the subnormal exponent. The
//! normal row is the implicit leading one plus the sum of `2^(i - p + E - bias)`
//! over the set mantissa bits `i`; scaling by an exact power of two yields the
//! same value with no rounding.
//!
//! NaN payloads and the quiet/signaling bit are not reconstructed: every NaN
//! pattern decodes to the same canonical NaN.

use tracing::{debug, trace};

use crate::{errors::BitError, sequence::BitSequence};

/// Field widths and exponent constants of an IEEE 754 binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatLayout {
    bits: usize,
    exponent_bits: usize,
    mantissa_bits: usize,
    bias: i32,
    subnormal_exponent: i32,
}

impl FloatLayout {
    /// Single precision: 1 sign, 8 exponent, 23 mantissa bits.
    pub const BINARY32: Self = Self {
        bits: 32,
        exponent_bits: 8,
        mantissa_bits: 23,
        bias: 127,
        subnormal_exponent: -126,
    };

    /// Double precision: 1 sign, 11 exponent, 52 mantissa bits.
    pub const BINARY64: Self = Self {
        bits: 64,
        exponent_bits: 11,
        mantissa_bits: 52,
        bias: 1023,
        subnormal_exponent: -1022,
    };

    pub const fn bits(&self) -> usize {
        self.bits
    }

    pub const fn exponent_bits(&self) -> usize {
        self.exponent_bits
    }

    pub const fn mantissa_bits(&self) -> usize {
        self.mantissa_bits
    }

    pub const fn bias(&self) -> i32 {
        self.bias
    }

    pub const fn subnormal_exponent(&self) -> i32 {
        self.subnormal_exponent
    }

    /// Biased exponent reserved for infinities and NaNs (255 or 2047).
    pub const fn exponent_all_ones(&self) -> u64 {
        (1u64 << self.exponent_bits) - 1
    }

    /// Splits `seq` into sign, biased exponent and mantissa fields.
    ///
    /// Fails with [BitError::WrongWidth] unless `seq` is exactly [Self::bits] long.
    pub fn unpack(&self, seq: &BitSequence) -> Result<FloatFields, BitError> {
        if seq.bit_length() != self.bits {
            return Err(BitError::WrongWidth {
                expected: self.bits,
                actual: seq.bit_length(),
            });
        }

        Ok(FloatFields {
            sign: seq.get_bit(self.bits - 1)?,
            exponent: seq.read_unsigned_range(self.mantissa_bits, self.bits - 2)?,
            mantissa: seq.read_unsigned_range(0, self.mantissa_bits - 1)?,
        })
    }

    /// Classifies unpacked fields of this layout.
    pub fn classify(&self, fields: &FloatFields) -> FloatClass {
        match (fields.exponent, fields.mantissa) {
            (0, 0) => FloatClass::Zero,
            (0, _) => FloatClass::Subnormal,
            (e, 0) if e == self.exponent_all_ones() => FloatClass::Infinity,
            (e, _) if e == self.exponent_all_ones() => FloatClass::Nan,
            _ => FloatClass::Normal,
        }
    }

    /// Rebuilds the value encoded by `seq` in this layout.
    ///
    /// The result is exact for both binary32 and binary64, since every value
    /// of either format is representable as an `f64`.
    pub fn decode(&self, seq: &BitSequence) -> Result<f64, BitError> {
        let fields = self.unpack(seq)?;
        let class = self.classify(&fields);

        trace!(
            bits = self.bits,
            exponent = fields.exponent,
            mantissa = fields.mantissa,
            ?class,
            "decoding float"
        );

        let magnitude = match class {
            FloatClass::Zero => 0.0,
            FloatClass::Subnormal => {
                fields.mantissa as f64 * pow2(self.subnormal_exponent - self.mantissa_bits as i32)
            }
            FloatClass::Normal => {
                let significand = (1u64 << self.mantissa_bits) | fields.mantissa;
                let exponent = fields.exponent as i32 - self.bias - self.mantissa_bits as i32;
                significand as f64 * pow2(exponent)
            }
            FloatClass::Infinity => f64::INFINITY,
            FloatClass::Nan => {
                debug!(
                    payload = fields.mantissa,
                    sign = fields.sign,
                    "NaN payload discarded"
                );
                return Ok(f64::NAN);
            }
        };

        Ok(if fields.sign { -magnitude } else { magnitude })
    }
}

/// Which kind of value a bit pattern encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatClass {
    Zero,
    Subnormal,
    Normal,
    Infinity,
    Nan,
}

/// Raw fields of a floating-point pattern, before bias subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatFields {
    /// True when the sign bit is set.
    pub sign: bool,
    /// Biased exponent `E`.
    pub exponent: u64,
    /// Mantissa field `M`, without the implicit leading bit.
    pub mantissa: u64,
}

impl FloatFields {
    /// Classifies these fields as a pattern of `layout`.
    pub fn class(&self, layout: &FloatLayout) -> FloatClass {
        layout.classify(self)
    }
}

/// Decodes a 32-bit pattern as an `f32`.
///
/// Fails with [BitError::WrongWidth] unless `seq` is exactly 32 bits. All NaN
/// patterns decode to [f32::NAN].
pub fn decode_f32(seq: &BitSequence) -> Result<f32, BitError> {
    let value = FloatLayout::BINARY32.decode(seq)?;
    if value.is_nan() {
        return Ok(f32::NAN);
    }

    Ok(value as f32)
}

/// Decodes a 64-bit pattern as an `f64`.
///
/// Fails with [BitError::WrongWidth] unless `seq` is exactly 64 bits. All NaN
/// patterns decode to [f64::NAN].
pub fn decode_f64(seq: &BitSequence) -> Result<f64, BitError> {
    FloatLayout::BINARY64.decode(seq)
}

pub fn unpack_f32(seq: &BitSequence) -> Result<FloatFields, BitError> {
    FloatLayout::BINARY32.unpack(seq)
}

pub fn unpack_f64(seq: &BitSequence) -> Result<FloatFields, BitError> {
    FloatLayout::BINARY64.unpack(seq)
}

pub fn classify_f32(seq: &BitSequence) -> Result<FloatClass, BitError> {
    let layout = FloatLayout::BINARY32;
    Ok(layout.classify(&layout.unpack(seq)?))
}

pub fn classify_f64(seq: &BitSequence) -> Result<FloatClass, BitError> {
    let layout = FloatLayout::BINARY64;
    Ok(layout.classify(&layout.unpack(seq)?))
}

/// Exact `2^exp` for `exp` in the binary64 range, down to the smallest subnormal.
///
/// Works in steps of `2^60` so every intermediate stays a normal power of two.
fn pow2(mut exp: i32) -> f64 {
    const STEP: i32 = 60;
    let up = (1u64 << STEP) as f64;
    let down = 1.0 / up;

    let mut value = 1.0f64;
    while exp >= STEP {
        value *= up;
        exp -= STEP;
    }
    while exp <= -STEP {
        value *= down;
        exp += STEP;
    }

    if exp >= 0 {
        value * (1u64 << exp) as f64
    } else {
        value / (1u64 << -exp) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq32(bits: u32) -> BitSequence {
        BitSequence::capture_value(bits)
    }

    fn seq64(bits: u64) -> BitSequence {
        BitSequence::capture_value(bits)
    }

    #[test]
    fn test_pow2() {
        assert_eq!(pow2(0), 1.0);
        assert_eq!(pow2(1), 2.0);
        assert_eq!(pow2(-1), 0.5);
        assert_eq!(pow2(60), 1152921504606846976.0);
        assert_eq!(pow2(1023), 2f64.powi(1023));
        assert_eq!(pow2(-1022), f64::MIN_POSITIVE);
        assert_eq!(pow2(-1074), f64::from_bits(1));
    }

    #[test]
    fn test_f32_zero() {
        let value = decode_f32(&seq32(0x0000_0000)).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn test_f32_negative_zero() {
        let value = decode_f32(&seq32(0x8000_0000)).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_negative());
        assert_eq!(value.to_bits(), 0x8000_0000);
    }

    #[test]
    fn test_f32_infinity() {
        assert_eq!(decode_f32(&seq32(0x7F80_0000)).unwrap(), f32::INFINITY);
        assert_eq!(decode_f32(&seq32(0xFF80_0000)).unwrap(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_f32_nan() {
        assert!(decode_f32(&seq32(0x7FC0_0000)).unwrap().is_nan());
        assert!(decode_f32(&seq32(0x7F80_0001)).unwrap().is_nan());
        assert!(decode_f32(&seq32(0xFFFF_FFFF)).unwrap().is_nan());
    }

    #[test]
    fn test_f32_normal() {
        assert_eq!(decode_f32(&seq32(0x3F80_0000)).unwrap(), 1.0);
        assert_eq!(
            decode_f32(&seq32(0x4049_0FDB)).unwrap(),
            std::f32::consts::PI
        );
        assert_eq!(decode_f32(&seq32(0xC120_0000)).unwrap(), -10.0);
        assert_eq!(decode_f32(&seq32(0x7F7F_FFFF)).unwrap(), f32::MAX);
        assert_eq!(decode_f32(&seq32(0x0080_0000)).unwrap(), f32::MIN_POSITIVE);
    }

    #[test]
    fn test_f32_subnormal() {
        let smallest = decode_f32(&seq32(0x0000_0001)).unwrap();
        assert!(smallest > 0.0);
        assert_eq!(smallest.to_bits(), 1);

        let largest = decode_f32(&seq32(0x007F_FFFF)).unwrap();
        assert_eq!(largest.to_bits(), 0x007F_FFFF);
        assert!(largest < f32::MIN_POSITIVE);
    }

    #[test]
    fn test_f32_wrong_width() {
        assert_eq!(
            decode_f32(&seq64(0)).unwrap_err(),
            BitError::WrongWidth {
                expected: 32,
                actual: 64
            }
        );
        assert_eq!(
            decode_f32(&BitSequence::capture(None, 0).unwrap()).unwrap_err(),
            BitError::WrongWidth {
                expected: 32,
                actual: 0
            }
        );
    }

    #[test]
    fn test_f64_normal() {
        assert_eq!(decode_f64(&seq64(0x3FF8_0000_0000_0000)).unwrap(), 1.5);
        assert_eq!(
            decode_f64(&seq64(0x4009_21FB_5444_2D18)).unwrap(),
            std::f64::consts::PI
        );
        assert_eq!(decode_f64(&seq64(0x7FEF_FFFF_FFFF_FFFF)).unwrap(), f64::MAX);
        assert_eq!(decode_f64(&seq64(0xFFEF_FFFF_FFFF_FFFF)).unwrap(), f64::MIN);
        assert_eq!(
            decode_f64(&seq64(0x0010_0000_0000_0000)).unwrap(),
            f64::MIN_POSITIVE
        );
    }

    #[test]
    fn test_f64_special() {
        let zero = decode_f64(&seq64(0)).unwrap();
        assert_eq!(zero.to_bits(), 0);

        let negative_zero = decode_f64(&seq64(0x8000_0000_0000_0000)).unwrap();
        assert_eq!(negative_zero.to_bits(), 0x8000_0000_0000_0000);

        assert_eq!(
            decode_f64(&seq64(0x7FF0_0000_0000_0000)).unwrap(),
            f64::INFINITY
        );
        assert_eq!(
            decode_f64(&seq64(0xFFF0_0000_0000_0000)).unwrap(),
            f64::NEG_INFINITY
        );
        assert!(decode_f64(&seq64(0x7FF8_0000_0000_0000)).unwrap().is_nan());
        assert!(decode_f64(&seq64(0xFFF0_0000_0000_0001)).unwrap().is_nan());
    }

    #[test]
    fn test_f64_subnormal() {
        assert_eq!(decode_f64(&seq64(1)).unwrap().to_bits(), 1);
        assert_eq!(
            decode_f64(&seq64(0x000F_FFFF_FFFF_FFFF)).unwrap().to_bits(),
            0x000F_FFFF_FFFF_FFFF
        );
        assert_eq!(
            decode_f64(&seq64(0x8000_0000_0000_0001)).unwrap().to_bits(),
            0x8000_0000_0000_0001
        );
    }

    #[test]
    fn test_f64_wrong_width() {
        assert_eq!(
            decode_f64(&seq32(0)).unwrap_err(),
            BitError::WrongWidth {
                expected: 64,
                actual: 32
            }
        );
    }

    #[test]
    fn test_unpack() {
        let fields = unpack_f32(&seq32(0xC0A0_0001)).unwrap();
        assert_eq!(
            fields,
            FloatFields {
                sign: true,
                exponent: 129,
                mantissa: 0x20_0001,
            }
        );

        let fields = unpack_f64(&seq64(0x3FF8_0000_0000_0000)).unwrap();
        assert_eq!(
            fields,
            FloatFields {
                sign: false,
                exponent: 1023,
                mantissa: 1 << 51,
            }
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_f32(&seq32(0x8000_0000)).unwrap(), FloatClass::Zero);
        assert_eq!(
            classify_f32(&seq32(0x0000_0010)).unwrap(),
            FloatClass::Subnormal
        );
        assert_eq!(classify_f32(&seq32(0x3F80_0000)).unwrap(), FloatClass::Normal);
        assert_eq!(
            classify_f32(&seq32(0xFF80_0000)).unwrap(),
            FloatClass::Infinity
        );
        assert_eq!(classify_f32(&seq32(0x7FC0_0000)).unwrap(), FloatClass::Nan);

        assert_eq!(
            classify_f64(&seq64(0x7FF0_0000_0000_0000)).unwrap(),
            FloatClass::Infinity
        );
        assert_eq!(
            classify_f64(&seq64(0x7FF0_0000_0000_0001)).unwrap(),
            FloatClass::Nan
        );
        assert_eq!(
            classify_f64(&seq64(0x0000_0000_0000_0001)).unwrap(),
            FloatClass::Subnormal
        );
    }

    #[test]
    fn test_fields_class() {
        let layout = FloatLayout::BINARY32;
        let fields = layout.unpack(&seq32(0xFF80_0000)).unwrap();
        assert_eq!(fields.class(&layout), FloatClass::Infinity);

        let fields = FloatFields {
            sign: false,
            exponent: 255,
            mantissa: 0,
        };
        assert_eq!(fields.class(&FloatLayout::BINARY32), FloatClass::Infinity);
        assert_eq!(fields.class(&FloatLayout::BINARY64), FloatClass::Normal);

        let fields = unpack_f64(&seq64(0x7FF0_0000_0000_0001)).unwrap();
        assert_eq!(fields.class(&FloatLayout::BINARY64), FloatClass::Nan);

        let fields = unpack_f64(&seq64(1)).unwrap();
        assert_eq!(fields.class(&FloatLayout::BINARY64), FloatClass::Subnormal);
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(FloatLayout::BINARY32.exponent_all_ones(), 255);
        assert_eq!(FloatLayout::BINARY64.exponent_all_ones(), 2047);
        assert_eq!(
            1 + FloatLayout::BINARY64.exponent_bits() + FloatLayout::BINARY64.mantissa_bits(),
            FloatLayout::BINARY64.bits()
        );
    }
}
