//! IEEE-754 binary32 and binary64 values.
//!
//! A [`FloatingPoint`] keeps the raw bit pattern in a `u64` together with its width. Byte stream
//! I/O, integer reinterpretation and the hexadecimal text format all operate on those bits, so a
//! value read from disk round-trips bit-exactly, NaN payloads and signed zeros included. Only
//! [`FloatingPoint::from_value`], [`FloatingPoint::copy_from_floating_point`] and
//! [`FloatingPoint::as_value`] convert through a native `f64`.
//!
//! # Decimal text
//!
//! The decimal format classifies the value by its exponent and mantissa fields (8/23 bits for
//! binary32, 11/52 bits for binary64):
//!
//! | Class | Text |
//! |---|---|
//! | zero, subnormal, normal | `[-]D.DDDDDDe[+-]EEE` |
//! | infinity | `Inf` or `-Inf` |
//! | negative quiet NaN without payload | `Ind` |
//! | any other NaN | `NaN` |
//!
//! # Examples
//!
//! ```rust
//! use fvalue::{Endianness, FloatingPoint, FloatingPointFormat};
//!
//! let mut value = FloatingPoint::new(64)?;
//! value.copy_from_byte_stream(
//!     &[0x40, 0xb3, 0x1a, 0x45, 0x1e, 0xb8, 0x51, 0xec],
//!     Endianness::Big,
//! )?;
//! assert_eq!(value.as_bits(), 0x40b3_1a45_1eb8_51ec);
//! assert_eq!(
//!     value.to_string_with_format(FloatingPointFormat::DECIMAL)?,
//!     "4.890270e+003"
//! );
//! # Ok::<(), fvalue::Error>(())
//! ```

use std::{fmt::Write, num::ParseFloatError};

use bitflags::bitflags;

use crate::{
    clone::TryClone,
    codec::{
        integer::parse_hexadecimal,
        text::{read_ascii_token, write_ascii_with_index, AsciiText, CodeUnit},
    },
    io::{read_with, write_with, Endianness},
    Result,
};

/// Presentation of a floating-point value as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatingPointFormatType {
    /// Scientific notation with six fractional digits
    Decimal,
    /// The raw bit pattern in base 16
    Hexadecimal,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Modifiers of a floating-point text format
    pub struct FloatingPointFormatFlags: u32 {
        /// Hexadecimal values are written without the `0x` prefix
        const NO_BASE_INDICATOR = 0x0001_0000;
    }
}

/// A complete floating-point text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatingPointFormat {
    /// Scientific or raw presentation
    pub format_type: FloatingPointFormatType,
    /// Prefix modifiers
    pub flags: FloatingPointFormatFlags,
}

impl FloatingPointFormat {
    /// Scientific decimal
    pub const DECIMAL: FloatingPointFormat = FloatingPointFormat {
        format_type: FloatingPointFormatType::Decimal,
        flags: FloatingPointFormatFlags::empty(),
    };

    /// Raw bit pattern with `0x` prefix
    pub const HEXADECIMAL: FloatingPointFormat = FloatingPointFormat {
        format_type: FloatingPointFormatType::Hexadecimal,
        flags: FloatingPointFormatFlags::empty(),
    };

    /// Decode a raw format word: the low byte selects the type (1 decimal, 2 hexadecimal),
    /// the remaining bits are [`FloatingPointFormatFlags`].
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an unknown type or unsupported flag bits.
    pub fn from_raw(raw: u32) -> Result<FloatingPointFormat> {
        let format_type = match raw & 0xff {
            0x01 => FloatingPointFormatType::Decimal,
            0x02 => FloatingPointFormatType::Hexadecimal,
            other => {
                return Err(invalid_argument_error!(
                    "Unsupported floating-point format type - 0x{:02x}",
                    other
                ))
            }
        };
        let Some(flags) = FloatingPointFormatFlags::from_bits(raw & !0xff) else {
            return Err(invalid_argument_error!(
                "Unsupported floating-point format flags - 0x{:08x}",
                raw
            ));
        };

        Ok(FloatingPointFormat { format_type, flags })
    }

    /// Encode this format as a raw format word.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        let format_type = match self.format_type {
            FloatingPointFormatType::Decimal => 0x01,
            FloatingPointFormatType::Hexadecimal => 0x02,
        };
        format_type | self.flags.bits()
    }
}

/// Field layout of one IEEE-754 width.
struct Layout {
    exponent_bits: u32,
    mantissa_bits: u32,
}

impl Layout {
    fn for_size(value_size: usize) -> Layout {
        if value_size == 32 {
            Layout {
                exponent_bits: 8,
                mantissa_bits: 23,
            }
        } else {
            Layout {
                exponent_bits: 11,
                mantissa_bits: 52,
            }
        }
    }

    fn sign(&self, bits: u64) -> bool {
        (bits >> (self.exponent_bits + self.mantissa_bits)) & 1 == 1
    }

    fn exponent(&self, bits: u64) -> u64 {
        (bits >> self.mantissa_bits) & ((1 << self.exponent_bits) - 1)
    }

    fn mantissa(&self, bits: u64) -> u64 {
        bits & ((1 << self.mantissa_bits) - 1)
    }

    fn exponent_all_ones(&self) -> u64 {
        (1 << self.exponent_bits) - 1
    }

    fn quiet_bit(&self) -> u64 {
        1 << (self.mantissa_bits - 1)
    }
}

/// Class of an IEEE-754 bit pattern, as far as text rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Finite,
    Infinite { negative: bool },
    Indeterminate,
    NotANumber,
}

/// An IEEE-754 value of 32 or 64 bits, stored as its raw bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatingPoint {
    value: u64,
    value_size: usize,
}

impl FloatingPoint {
    /// Create a positive zero of `value_size` bits.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 32 or 64.
    pub fn new(value_size: usize) -> Result<FloatingPoint> {
        check_value_size(value_size)?;
        Ok(FloatingPoint {
            value: 0,
            value_size,
        })
    }

    /// Create a value from its raw bit pattern; bits above `value_size` are discarded.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 32 or 64.
    pub fn from_bits(bits: u64, value_size: usize) -> Result<FloatingPoint> {
        let mut value = FloatingPoint::new(value_size)?;
        value.copy_from_integer(bits, value_size)?;
        Ok(value)
    }

    /// Create a value by numeric conversion, narrowing to binary32 when `value_size` is 32.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 32 or 64.
    pub fn from_value(value: f64, value_size: usize) -> Result<FloatingPoint> {
        let mut result = FloatingPoint::new(value_size)?;
        result.copy_from_floating_point(value, value_size)?;
        Ok(result)
    }

    /// The raw bit pattern.
    #[must_use]
    pub fn as_bits(&self) -> u64 {
        self.value
    }

    /// The value converted to a native `f64`. Widening from binary32 is exact.
    #[must_use]
    pub fn as_value(&self) -> f64 {
        if self.value_size == 32 {
            f64::from(f32::from_bits(self.value as u32))
        } else {
            f64::from_bits(self.value)
        }
    }

    /// Width of the value in bits.
    #[must_use]
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Read the value from 4 or 8 bytes; the width follows the length.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for any other length; the value is unchanged.
    pub fn copy_from_byte_stream(&mut self, bytes: &[u8], endianness: Endianness) -> Result<()> {
        match bytes.len() {
            4 => {
                self.value = u64::from(read_with::<u32>(bytes, endianness)?);
                self.value_size = 32;
            }
            8 => {
                self.value = read_with::<u64>(bytes, endianness)?;
                self.value_size = 64;
            }
            other => {
                return Err(invalid_argument_error!(
                    "Unsupported floating-point byte stream size - {}",
                    other
                ))
            }
        }
        Ok(())
    }

    /// Write the raw pattern into `bytes`, whose length must equal the width in bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the length does not match.
    pub fn copy_to_byte_stream(&self, bytes: &mut [u8], endianness: Endianness) -> Result<()> {
        if bytes.len() != self.value_size / 8 {
            return Err(invalid_argument_error!(
                "Byte stream of {} bytes does not match a {}-bit floating-point value",
                bytes.len(),
                self.value_size
            ));
        }

        if self.value_size == 32 {
            write_with(bytes, self.value as u32, endianness)
        } else {
            write_with(bytes, self.value, endianness)
        }
    }

    /// Reinterpret the low `value_size` bits of `bits` as a value of that width.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 32 or 64.
    pub fn copy_from_integer(&mut self, bits: u64, value_size: usize) -> Result<()> {
        check_value_size(value_size)?;

        self.value = if value_size == 32 {
            bits & 0xffff_ffff
        } else {
            bits
        };
        self.value_size = value_size;
        Ok(())
    }

    /// Returns `(bits, value_size)`.
    #[must_use]
    pub fn copy_to_integer(&self) -> (u64, usize) {
        (self.value, self.value_size)
    }

    /// Numeric conversion from a native `f64`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 32 or 64.
    pub fn copy_from_floating_point(&mut self, value: f64, value_size: usize) -> Result<()> {
        check_value_size(value_size)?;

        self.value = if value_size == 32 {
            u64::from((value as f32).to_bits())
        } else {
            value.to_bits()
        };
        self.value_size = value_size;
        Ok(())
    }

    /// Numeric conversion to a native `f64`.
    #[must_use]
    pub fn copy_to_floating_point(&self) -> f64 {
        self.as_value()
    }

    /// Exact number of code units, terminator included, that `format` renders to.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the value cannot be rendered.
    pub fn string_size(&self, format: FloatingPointFormat) -> Result<usize> {
        Ok(self.render(format)?.len() + 1)
    }

    /// Render the value into a UTF-8 buffer at `*index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the text does not fit; `index` and `buffer`
    /// are unchanged on error.
    pub fn copy_to_utf8_string_with_index(
        &self,
        buffer: &mut [u8],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Render the value into a UTF-16 buffer at `*index`.
    ///
    /// # Errors
    /// See [`FloatingPoint::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf16_string_with_index(
        &self,
        buffer: &mut [u16],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Render the value into a UTF-32 buffer at `*index`.
    ///
    /// # Errors
    /// See [`FloatingPoint::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf32_string_with_index(
        &self,
        buffer: &mut [u32],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-8 buffer at `*index`.
    ///
    /// Decimal text accepts `Inf`, `-Inf`, `NaN`, `Ind` and plain or scientific numbers;
    /// hexadecimal text is the raw bit pattern with an optional `0x` prefix.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for malformed text; `index` and the value are
    /// unchanged on error.
    pub fn copy_from_utf8_string_with_index(
        &mut self,
        buffer: &[u8],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-16 buffer at `*index`.
    ///
    /// # Errors
    /// See [`FloatingPoint::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf16_string_with_index(
        &mut self,
        buffer: &[u16],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-32 buffer at `*index`.
    ///
    /// # Errors
    /// See [`FloatingPoint::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf32_string_with_index(
        &mut self,
        buffer: &[u32],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Render the value as an owned string.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the value cannot be rendered.
    pub fn to_string_with_format(&self, format: FloatingPointFormat) -> Result<String> {
        Ok(self.render(format)?.as_str().to_string())
    }

    pub(crate) fn copy_to_string_with_index<U: CodeUnit>(
        &self,
        buffer: &mut [U],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        let text = self.render(format)?;
        write_ascii_with_index(text.as_str(), buffer, index)
    }

    fn copy_from_string_with_index<U: CodeUnit>(
        &mut self,
        buffer: &[U],
        index: &mut usize,
        format: FloatingPointFormat,
    ) -> Result<()> {
        let (token, next) = read_ascii_token(buffer, *index)?;
        let text = token.as_str();

        let value = match format.format_type {
            FloatingPointFormatType::Hexadecimal => parse_hexadecimal(text, self.value_size)?,
            FloatingPointFormatType::Decimal => self.parse_decimal(text)?,
        };

        self.value = value;
        *index = next;
        Ok(())
    }

    fn classify(&self) -> Class {
        let layout = Layout::for_size(self.value_size);
        let bits = self.value;

        if layout.exponent(bits) != layout.exponent_all_ones() {
            return Class::Finite;
        }

        let mantissa = layout.mantissa(bits);
        let negative = layout.sign(bits);
        if mantissa == 0 {
            Class::Infinite { negative }
        } else if negative && mantissa == layout.quiet_bit() {
            Class::Indeterminate
        } else {
            Class::NotANumber
        }
    }

    fn render(&self, format: FloatingPointFormat) -> Result<AsciiText> {
        let mut text = AsciiText::new();

        match format.format_type {
            FloatingPointFormatType::Hexadecimal => {
                if !format
                    .flags
                    .contains(FloatingPointFormatFlags::NO_BASE_INDICATOR)
                {
                    text.push_str("0x")?;
                }
                write!(text, "{:0width$x}", self.value, width = self.value_size / 4)
                    .map_err(|_| invalid_argument_error!("Unable to render hexadecimal value"))?;
            }
            FloatingPointFormatType::Decimal => match self.classify() {
                Class::Infinite { negative: false } => text.push_str("Inf")?,
                Class::Infinite { negative: true } => text.push_str("-Inf")?,
                Class::Indeterminate => text.push_str("Ind")?,
                Class::NotANumber => text.push_str("NaN")?,
                Class::Finite => push_scientific(&mut text, self.as_value())?,
            },
        }

        Ok(text)
    }

    fn parse_decimal(&self, text: &str) -> Result<u64> {
        let layout = Layout::for_size(self.value_size);
        let infinity = layout.exponent_all_ones() << layout.mantissa_bits;
        let sign = 1_u64 << (layout.exponent_bits + layout.mantissa_bits);

        match text {
            "Inf" => return Ok(infinity),
            "-Inf" => return Ok(sign | infinity),
            "NaN" => return Ok(infinity | layout.quiet_bit()),
            "Ind" => return Ok(sign | infinity | layout.quiet_bit()),
            _ => {}
        }

        check_decimal_syntax(text)?;
        let unsupported =
            |_: ParseFloatError| invalid_argument_error!("Unsupported decimal value - {}", text);

        if self.value_size == 32 {
            let value: f32 = text.parse().map_err(unsupported)?;
            Ok(u64::from(value.to_bits()))
        } else {
            let value: f64 = text.parse().map_err(unsupported)?;
            Ok(value.to_bits())
        }
    }
}

impl TryClone for FloatingPoint {
    fn try_clone(&self) -> Result<Self> {
        Ok(*self)
    }
}

fn check_value_size(value_size: usize) -> Result<()> {
    if value_size != 32 && value_size != 64 {
        return Err(invalid_argument_error!(
            "Unsupported floating-point value size - {}",
            value_size
        ));
    }
    Ok(())
}

/// Append `value` as `[-]D.DDDDDDe[+-]EEE`.
fn push_scientific(text: &mut AsciiText, value: f64) -> Result<()> {
    let mut native = AsciiText::new();
    write!(native, "{:.6e}", value)
        .map_err(|_| invalid_argument_error!("Unable to render decimal value"))?;

    let Some((mantissa, exponent)) = native.as_str().split_once('e') else {
        return Err(invalid_argument_error!(
            "Missing exponent in - {}",
            native.as_str()
        ));
    };
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| invalid_argument_error!("Unsupported exponent in - {}", native.as_str()))?;

    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    write!(
        text,
        "{}e{}{:03}",
        mantissa,
        exponent_sign,
        exponent.unsigned_abs()
    )
    .map_err(|_| invalid_argument_error!("Unable to render decimal value"))
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn check_decimal_syntax(text: &str) -> Result<()> {
    let reject = || invalid_argument_error!("Unsupported decimal value - {}", text);

    let bytes = text.as_bytes();
    let mut position = 0;

    let skip_sign = |position: &mut usize| {
        if matches!(bytes.get(*position), Some(b'+' | b'-')) {
            *position += 1;
        }
    };
    let count_digits = |position: &mut usize| {
        let start = *position;
        while matches!(bytes.get(*position), Some(b'0'..=b'9')) {
            *position += 1;
        }
        *position - start
    };

    skip_sign(&mut position);
    let mut mantissa_digits = count_digits(&mut position);
    if bytes.get(position) == Some(&b'.') {
        position += 1;
        mantissa_digits += count_digits(&mut position);
    }
    if mantissa_digits == 0 {
        return Err(reject());
    }

    if matches!(bytes.get(position), Some(b'e' | b'E')) {
        position += 1;
        skip_sign(&mut position);
        if count_digits(&mut position) == 0 {
            return Err(reject());
        }
    }

    if position != bytes.len() {
        return Err(reject());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clone::clone_optional, Error};

    fn decimal_32(bits: u64) -> (String, usize) {
        let value = FloatingPoint::from_bits(bits, 32).unwrap();
        (
            value
                .to_string_with_format(FloatingPointFormat::DECIMAL)
                .unwrap(),
            value.string_size(FloatingPointFormat::DECIMAL).unwrap(),
        )
    }

    #[test]
    fn decimal_boundaries_32() {
        assert_eq!(decimal_32(0x0000_0000), ("0.000000e+000".to_string(), 14));
        assert_eq!(decimal_32(0x7f80_0000), ("Inf".to_string(), 4));
        assert_eq!(decimal_32(0xff80_0000), ("-Inf".to_string(), 5));
        assert_eq!(decimal_32(0xffc0_0000), ("Ind".to_string(), 4));
        assert_eq!(decimal_32(0x7fff_ffff), ("NaN".to_string(), 4));
        assert_eq!(decimal_32(0x7fc0_0000), ("NaN".to_string(), 4));
        assert_eq!(decimal_32(0xffc0_0001), ("NaN".to_string(), 4));
        assert_eq!(decimal_32(0x807f_ffff), ("-1.175494e-038".to_string(), 15));
        assert_eq!(decimal_32(0x3f80_0000), ("1.000000e+000".to_string(), 14));
    }

    #[test]
    fn decimal_64() {
        let value = FloatingPoint::from_bits(0x40b3_1a45_1eb8_51ec, 64).unwrap();
        assert_eq!(
            value
                .to_string_with_format(FloatingPointFormat::DECIMAL)
                .unwrap(),
            "4.890270e+003"
        );

        let value = FloatingPoint::from_value(1e300, 64).unwrap();
        assert_eq!(
            value
                .to_string_with_format(FloatingPointFormat::DECIMAL)
                .unwrap(),
            "1.000000e+300"
        );

        let value = FloatingPoint::from_bits(1, 64).unwrap();
        assert_eq!(
            value
                .to_string_with_format(FloatingPointFormat::DECIMAL)
                .unwrap(),
            "4.940656e-324"
        );

        let value = FloatingPoint::from_bits(0xfff8_0000_0000_0000, 64).unwrap();
        assert_eq!(
            value
                .to_string_with_format(FloatingPointFormat::DECIMAL)
                .unwrap(),
            "Ind"
        );
    }

    #[test]
    fn hexadecimal_round_trip() {
        let mut value = FloatingPoint::new(64).unwrap();
        value
            .copy_from_byte_stream(
                &[0x40, 0xb3, 0x1a, 0x45, 0x1e, 0xb8, 0x51, 0xec],
                Endianness::Big,
            )
            .unwrap();
        assert_eq!(value.as_bits(), 0x40b3_1a45_1eb8_51ec);

        let format = FloatingPointFormat::HEXADECIMAL;
        let size = value.string_size(format).unwrap();
        assert_eq!(size, 19);

        let mut buffer = vec![0u8; size];
        let mut index = 0;
        value
            .copy_to_utf8_string_with_index(&mut buffer, &mut index, format)
            .unwrap();
        assert_eq!(buffer, b"0x40b31a451eb851ec\0");
        assert_eq!(index, size);

        let mut parsed = FloatingPoint::new(64).unwrap();
        let mut index = 0;
        parsed
            .copy_from_utf8_string_with_index(&buffer, &mut index, format)
            .unwrap();
        assert_eq!(parsed.as_bits(), 0x40b3_1a45_1eb8_51ec);
        assert_eq!(index, size);
    }

    #[test]
    fn hexadecimal_without_prefix() {
        let value = FloatingPoint::from_bits(0x3f80_0000, 32).unwrap();
        let format = FloatingPointFormat {
            format_type: FloatingPointFormatType::Hexadecimal,
            flags: FloatingPointFormatFlags::NO_BASE_INDICATOR,
        };
        assert_eq!(value.to_string_with_format(format).unwrap(), "3f800000");
        assert_eq!(value.string_size(format).unwrap(), 9);
        assert_eq!(
            FloatingPoint::from_bits(1, 32)
                .unwrap()
                .to_string_with_format(FloatingPointFormat::HEXADECIMAL)
                .unwrap(),
            "0x00000001"
        );
    }

    #[test]
    fn byte_stream_sizes() {
        let mut value = FloatingPoint::new(64).unwrap();
        value
            .copy_from_byte_stream(&[0x00, 0x00, 0x80, 0x3f], Endianness::Little)
            .unwrap();
        assert_eq!(value.copy_to_integer(), (0x3f80_0000, 32));
        assert_eq!(value.as_value(), 1.0);

        assert!(matches!(
            value.copy_from_byte_stream(&[0; 2], Endianness::Little),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(value.copy_to_integer(), (0x3f80_0000, 32));

        let mut out = [0u8; 4];
        value
            .copy_to_byte_stream(&mut out, Endianness::Big)
            .unwrap();
        assert_eq!(out, [0x3f, 0x80, 0x00, 0x00]);
        assert!(value
            .copy_to_byte_stream(&mut [0u8; 8], Endianness::Big)
            .is_err());
    }

    #[test]
    fn integer_reinterpretation() {
        let mut value = FloatingPoint::new(32).unwrap();
        value.copy_from_integer(0x1_4049_0fdb, 32).unwrap();
        assert_eq!(value.copy_to_integer(), (0x4049_0fdb, 32));
        assert!((value.as_value() - std::f64::consts::PI).abs() < 1e-6);

        assert!(value.copy_from_integer(0, 16).is_err());
        assert!(FloatingPoint::new(80).is_err());
    }

    #[test]
    fn native_conversion() {
        let value = FloatingPoint::from_value(0.1, 32).unwrap();
        assert_eq!(value.as_bits(), u64::from(0.1_f32.to_bits()));
        assert_eq!(value.copy_to_floating_point(), f64::from(0.1_f32));

        let value = FloatingPoint::from_value(0.1, 64).unwrap();
        assert_eq!(value.as_bits(), 0.1_f64.to_bits());

        let value = FloatingPoint::from_value(-0.0, 64).unwrap();
        assert_eq!(value.as_bits(), 0x8000_0000_0000_0000);
    }

    #[test]
    fn parse_decimal_strings() {
        let mut value = FloatingPoint::new(64).unwrap();
        let format = FloatingPointFormat::DECIMAL;

        let mut index = 0;
        value
            .copy_from_utf8_string_with_index(b"1.500000e+000\0", &mut index, format)
            .unwrap();
        assert_eq!(value.as_bits(), 0x3ff8_0000_0000_0000);
        assert_eq!(index, 14);

        let buffer: Vec<u16> = "-2.5\0".encode_utf16().collect();
        let mut index = 0;
        value
            .copy_from_utf16_string_with_index(&buffer, &mut index, format)
            .unwrap();
        assert_eq!(value.as_value(), -2.5);

        for (text, bits) in [
            (&b"Inf"[..], 0x7ff0_0000_0000_0000),
            (b"-Inf", 0xfff0_0000_0000_0000),
            (b"NaN", 0x7ff8_0000_0000_0000),
            (b"Ind", 0xfff8_0000_0000_0000),
        ] {
            let mut index = 0;
            value
                .copy_from_utf8_string_with_index(text, &mut index, format)
                .unwrap();
            assert_eq!(value.as_bits(), bits);
        }

        let mut narrow = FloatingPoint::new(32).unwrap();
        let mut index = 0;
        narrow
            .copy_from_utf8_string_with_index(b"Ind", &mut index, format)
            .unwrap();
        assert_eq!(narrow.as_bits(), 0xffc0_0000);
    }

    #[test]
    fn parse_decimal_rounds_once_32() {
        let format = FloatingPointFormat::DECIMAL;
        for (text, bits) in [
            // just above the midpoint of 1.0 and the next binary32 value
            (&b"1.0000000596046447753906250008673617"[..], 0x3f80_0001),
            (b"1.000000059604644775390625", 0x3f80_0000),
            (b"1.0000000596046447753906249", 0x3f80_0000),
            (b"3.4028235e38", 0x7f7f_ffff),
        ] {
            let mut value = FloatingPoint::new(32).unwrap();
            let mut index = 0;
            value
                .copy_from_utf8_string_with_index(text, &mut index, format)
                .unwrap();
            assert_eq!(value.as_bits(), bits, "{:?}", text);
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        let mut value = FloatingPoint::from_bits(0x3ff0_0000_0000_0000, 64).unwrap();
        let format = FloatingPointFormat::DECIMAL;

        for text in [
            &b"inf"[..],
            b"nan",
            b"infinity",
            b"",
            b".",
            b"1e",
            b"1e+",
            b"1.0x",
            b"--1",
            b"1.2.3",
            b" 1",
        ] {
            let mut index = 0;
            assert!(
                value
                    .copy_from_utf8_string_with_index(text, &mut index, format)
                    .is_err(),
                "{:?} should be rejected",
                text
            );
            assert_eq!(index, 0);
        }
        assert_eq!(value.as_bits(), 0x3ff0_0000_0000_0000);

        let mut index = 0;
        assert!(value
            .copy_from_utf8_string_with_index(
                b"0x12345678123456789",
                &mut index,
                FloatingPointFormat::HEXADECIMAL
            )
            .is_err());
    }

    #[test]
    fn copy_to_small_buffer() {
        let value = FloatingPoint::from_bits(0x807f_ffff, 32).unwrap();
        let mut buffer = [0u32; 14];
        let mut index = 0;

        let result = value.copy_to_utf32_string_with_index(
            &mut buffer,
            &mut index,
            FloatingPointFormat::DECIMAL,
        );
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 15,
                available: 14
            })
        ));
        assert_eq!(index, 0);
    }

    #[test]
    fn format_words() {
        assert_eq!(
            FloatingPointFormat::from_raw(0x01).unwrap(),
            FloatingPointFormat::DECIMAL
        );
        assert_eq!(
            FloatingPointFormat::from_raw(0x0001_0002).unwrap().flags,
            FloatingPointFormatFlags::NO_BASE_INDICATOR
        );
        assert_eq!(FloatingPointFormat::HEXADECIMAL.to_raw(), 0x02);
        assert!(FloatingPointFormat::from_raw(0x03).is_err());
        assert!(FloatingPointFormat::from_raw(0x0000_0101).is_err());
    }

    #[test]
    fn clone() {
        let value = FloatingPoint::from_bits(0x7ff8_0000_0000_0001, 64).unwrap();
        assert_eq!(value.try_clone().unwrap().as_bits(), 0x7ff8_0000_0000_0001);

        let nothing: Option<&FloatingPoint> = None;
        assert!(clone_optional(nothing).unwrap().is_none());
    }
}
