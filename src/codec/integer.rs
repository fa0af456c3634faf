//! Fixed-width integer values and their binary and textual representations.
//!
//! An [`Integer`] stores its value in a `u64` container together with the width it was read
//! with (8, 16, 32 or 64 bits). Signedness is not a property of the value but of the
//! presentation: the same bits render as `255` or `-1` depending on the [`IntegerFormat`].
//!
//! # Text formats
//!
//! | Format | Example (8-bit `0xff`) |
//! |---|---|
//! | Decimal, unsigned | `255` |
//! | Decimal, signed | `-1` |
//! | Hexadecimal | `0xff` (always `bits / 4` digits) |
//! | Boolean | `true` |
//!
//! Text is produced with the two-phase API: [`Integer::string_size`] returns the exact number of
//! code units including the terminator, then `copy_to_utf*_string_with_index` writes them.
//!
//! # Examples
//!
//! ```rust
//! use fvalue::{Endianness, Integer, IntegerFormat};
//!
//! let mut integer = Integer::new(32)?;
//! integer.copy_from_byte_stream(&[0x78, 0x56, 0x34, 0x12], Endianness::Little)?;
//!
//! let format = IntegerFormat::HEXADECIMAL;
//! let mut text = vec![0u8; integer.string_size(format)?];
//! let mut index = 0;
//! integer.copy_to_utf8_string_with_index(&mut text, &mut index, format)?;
//! assert_eq!(text, b"0x12345678\0");
//! # Ok::<(), fvalue::Error>(())
//! ```

use bitflags::bitflags;

use crate::{
    clone::TryClone,
    codec::text::{read_ascii_token, write_ascii_with_index, AsciiText, CodeUnit},
    io::{read_with, write_with, Endianness},
    Result,
};

/// Integer widths, in bits, that the codec supports.
pub const SUPPORTED_INTEGER_SIZES: [usize; 4] = [8, 16, 32, 64];

/// Presentation of an integer as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerFormatType {
    /// Base 10
    Decimal,
    /// Base 16 with a fixed number of digits
    Hexadecimal,
    /// `true` or `false`
    Boolean,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Modifiers of an integer text format
    pub struct IntegerFormatFlags: u32 {
        /// Decimal values are unsigned
        const UNSIGNED = 0x0000_0000;
        /// Decimal values are two's complement signed
        const SIGNED = 0x0000_0100;
        /// Hexadecimal values are written without the `0x` prefix
        const NO_BASE_INDICATOR = 0x0001_0000;
    }
}

/// A complete integer text format: presentation plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerFormat {
    /// Base or boolean presentation
    pub format_type: IntegerFormatType,
    /// Signedness and prefix modifiers
    pub flags: IntegerFormatFlags,
}

impl IntegerFormat {
    /// Unsigned decimal
    pub const DECIMAL_UNSIGNED: IntegerFormat = IntegerFormat {
        format_type: IntegerFormatType::Decimal,
        flags: IntegerFormatFlags::UNSIGNED,
    };

    /// Signed decimal
    pub const DECIMAL_SIGNED: IntegerFormat = IntegerFormat {
        format_type: IntegerFormatType::Decimal,
        flags: IntegerFormatFlags::SIGNED,
    };

    /// Hexadecimal with `0x` prefix
    pub const HEXADECIMAL: IntegerFormat = IntegerFormat {
        format_type: IntegerFormatType::Hexadecimal,
        flags: IntegerFormatFlags::UNSIGNED,
    };

    /// Boolean
    pub const BOOLEAN: IntegerFormat = IntegerFormat {
        format_type: IntegerFormatType::Boolean,
        flags: IntegerFormatFlags::UNSIGNED,
    };

    /// Decode a raw format word: the low byte selects the type (1 decimal, 2 hexadecimal,
    /// 3 boolean), the remaining bits are [`IntegerFormatFlags`].
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an unknown type or unsupported flag bits.
    pub fn from_raw(raw: u32) -> Result<IntegerFormat> {
        let format_type = match raw & 0xff {
            0x01 => IntegerFormatType::Decimal,
            0x02 => IntegerFormatType::Hexadecimal,
            0x03 => IntegerFormatType::Boolean,
            other => {
                return Err(invalid_argument_error!(
                    "Unsupported integer format type - 0x{:02x}",
                    other
                ))
            }
        };
        let Some(flags) = IntegerFormatFlags::from_bits(raw & !0xff) else {
            return Err(invalid_argument_error!(
                "Unsupported integer format flags - 0x{:08x}",
                raw
            ));
        };

        Ok(IntegerFormat { format_type, flags })
    }

    /// Encode this format as a raw format word.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        let format_type = match self.format_type {
            IntegerFormatType::Decimal => 0x01,
            IntegerFormatType::Hexadecimal => 0x02,
            IntegerFormatType::Boolean => 0x03,
        };
        format_type | self.flags.bits()
    }

    fn is_signed(self) -> bool {
        self.flags.contains(IntegerFormatFlags::SIGNED)
    }

    fn has_base_indicator(self) -> bool {
        !self.flags.contains(IntegerFormatFlags::NO_BASE_INDICATOR)
    }
}

/// A fixed-width integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    value: u64,
    value_size: usize,
}

impl Integer {
    /// Create a zero integer of `value_size` bits.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not 8, 16, 32 or 64.
    pub fn new(value_size: usize) -> Result<Integer> {
        check_value_size(value_size)?;
        Ok(Integer {
            value: 0,
            value_size,
        })
    }

    /// Create an integer of `value_size` bits from the low bits of `value`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not supported.
    pub fn from_value(value: u64, value_size: usize) -> Result<Integer> {
        let mut integer = Integer::new(value_size)?;
        integer.copy_from_integer(value, value_size)?;
        Ok(integer)
    }

    /// Width of the value in bits.
    #[must_use]
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// The value sign-extended from its width.
    #[must_use]
    pub fn signed_value(&self) -> i64 {
        let shift = 64 - self.value_size;
        ((self.value << shift) as i64) >> shift
    }

    /// Read the value from `bytes`, whose length must equal the width in bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the length does not match the width. The
    /// value is unchanged on error.
    pub fn copy_from_byte_stream(&mut self, bytes: &[u8], endianness: Endianness) -> Result<()> {
        self.check_byte_stream_size(bytes.len())?;

        self.value = match self.value_size {
            8 => u64::from(bytes[0]),
            16 => u64::from(read_with::<u16>(bytes, endianness)?),
            32 => u64::from(read_with::<u32>(bytes, endianness)?),
            _ => read_with::<u64>(bytes, endianness)?,
        };

        Ok(())
    }

    /// Write the value into `bytes`, whose length must equal the width in bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the length does not match the width;
    /// `bytes` is unchanged on error.
    pub fn copy_to_byte_stream(&self, bytes: &mut [u8], endianness: Endianness) -> Result<()> {
        self.check_byte_stream_size(bytes.len())?;

        match self.value_size {
            8 => bytes[0] = self.value as u8,
            16 => write_with(bytes, self.value as u16, endianness)?,
            32 => write_with(bytes, self.value as u32, endianness)?,
            _ => write_with(bytes, self.value, endianness)?,
        }

        Ok(())
    }

    /// Set value and width; bits above the width are discarded.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `value_size` is not supported.
    pub fn copy_from_integer(&mut self, value: u64, value_size: usize) -> Result<()> {
        check_value_size(value_size)?;

        self.value = value & mask(value_size);
        self.value_size = value_size;
        Ok(())
    }

    /// Returns `(value, value_size)`.
    #[must_use]
    pub fn copy_to_integer(&self) -> (u64, usize) {
        (self.value, self.value_size)
    }

    /// Exact number of code units, terminator included, that `format` renders to.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the format cannot be applied.
    pub fn string_size(&self, format: IntegerFormat) -> Result<usize> {
        let length = match format.format_type {
            IntegerFormatType::Decimal => {
                if format.is_signed() && self.signed_value() < 0 {
                    1 + decimal_digits(self.signed_value().unsigned_abs())
                } else if format.is_signed() {
                    decimal_digits(self.signed_value() as u64)
                } else {
                    decimal_digits(self.value)
                }
            }
            IntegerFormatType::Hexadecimal => {
                let prefix = if format.has_base_indicator() { 2 } else { 0 };
                prefix + self.value_size / 4
            }
            IntegerFormatType::Boolean => {
                if self.value == 0 {
                    5
                } else {
                    4
                }
            }
        };

        Ok(length + 1)
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
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Render the value into a UTF-16 buffer at `*index`.
    ///
    /// # Errors
    /// See [`Integer::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf16_string_with_index(
        &self,
        buffer: &mut [u16],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Render the value into a UTF-32 buffer at `*index`.
    ///
    /// # Errors
    /// See [`Integer::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf32_string_with_index(
        &self,
        buffer: &mut [u32],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-8 buffer at `*index`.
    ///
    /// The text must be a complete token in `format`, followed by a NUL or the end of the buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for malformed text or a value that does not fit
    /// the width; `index` and the value are unchanged on error.
    pub fn copy_from_utf8_string_with_index(
        &mut self,
        buffer: &[u8],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-16 buffer at `*index`.
    ///
    /// # Errors
    /// See [`Integer::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf16_string_with_index(
        &mut self,
        buffer: &[u16],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Parse a value of the current width from a UTF-32 buffer at `*index`.
    ///
    /// # Errors
    /// See [`Integer::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf32_string_with_index(
        &mut self,
        buffer: &[u32],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index, format)
    }

    /// Render the value as an owned string.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the format cannot be applied.
    pub fn to_string_with_format(&self, format: IntegerFormat) -> Result<String> {
        Ok(self.render(format)?.as_str().to_string())
    }

    pub(crate) fn copy_to_string_with_index<U: CodeUnit>(
        &self,
        buffer: &mut [U],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        let text = self.render(format)?;
        write_ascii_with_index(text.as_str(), buffer, index)
    }

    fn copy_from_string_with_index<U: CodeUnit>(
        &mut self,
        buffer: &[U],
        index: &mut usize,
        format: IntegerFormat,
    ) -> Result<()> {
        let (token, next) = read_ascii_token(buffer, *index)?;
        let value = parse(token.as_str(), self.value_size, format)?;

        self.value = value;
        *index = next;
        Ok(())
    }

    fn render(&self, format: IntegerFormat) -> Result<AsciiText> {
        let mut text = AsciiText::new();

        match format.format_type {
            IntegerFormatType::Decimal => {
                let magnitude = if format.is_signed() && self.signed_value() < 0 {
                    text.push(b'-')?;
                    self.signed_value().unsigned_abs()
                } else if format.is_signed() {
                    self.signed_value() as u64
                } else {
                    self.value
                };
                push_decimal(&mut text, magnitude)?;
            }
            IntegerFormatType::Hexadecimal => {
                if format.has_base_indicator() {
                    text.push_str("0x")?;
                }
                for nibble in (0..self.value_size / 4).rev() {
                    let digit = ((self.value >> (nibble * 4)) & 0x0f) as u8;
                    text.push(HEX_DIGITS[usize::from(digit)])?;
                }
            }
            IntegerFormatType::Boolean => {
                text.push_str(if self.value == 0 { "false" } else { "true" })?;
            }
        }

        Ok(text)
    }

    fn check_byte_stream_size(&self, size: usize) -> Result<()> {
        if size != self.value_size / 8 {
            return Err(invalid_argument_error!(
                "Byte stream of {} bytes does not match a {}-bit integer",
                size,
                self.value_size
            ));
        }
        Ok(())
    }
}

impl TryClone for Integer {
    fn try_clone(&self) -> Result<Self> {
        Ok(*self)
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn check_value_size(value_size: usize) -> Result<()> {
    if !SUPPORTED_INTEGER_SIZES.contains(&value_size) {
        return Err(invalid_argument_error!(
            "Unsupported integer value size - {}",
            value_size
        ));
    }
    Ok(())
}

fn mask(value_size: usize) -> u64 {
    if value_size >= 64 {
        u64::MAX
    } else {
        (1_u64 << value_size) - 1
    }
}

fn decimal_digits(mut value: u64) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

fn push_decimal(text: &mut AsciiText, value: u64) -> Result<()> {
    let mut digits = [0u8; 20];
    let mut count = 0;
    let mut remainder = value;

    loop {
        digits[count] = b'0' + (remainder % 10) as u8;
        count += 1;
        remainder /= 10;
        if remainder == 0 {
            break;
        }
    }

    digits[..count]
        .iter()
        .rev()
        .try_for_each(|&digit| text.push(digit))
}

/// Parse `text` as an integer of `value_size` bits in `format`.
fn parse(text: &str, value_size: usize, format: IntegerFormat) -> Result<u64> {
    match format.format_type {
        IntegerFormatType::Decimal => parse_decimal(text, value_size, format.is_signed()),
        IntegerFormatType::Hexadecimal => parse_hexadecimal(text, value_size),
        IntegerFormatType::Boolean => match text {
            "true" => Ok(1),
            "false" => Ok(0),
            _ => Err(invalid_argument_error!("Unsupported boolean string - {}", text)),
        },
    }
}

fn parse_decimal(text: &str, value_size: usize, signed: bool) -> Result<u64> {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') if signed => (true, &bytes[1..]),
        Some(b'+') if signed => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    if digits.is_empty() {
        return Err(invalid_argument_error!("Missing decimal digits in - {}", text));
    }

    let mut magnitude: u64 = 0;
    for &byte in digits {
        if !(b'0'..=b'9').contains(&byte) {
            return Err(invalid_argument_error!(
                "Unsupported decimal digit '{}' in - {}",
                char::from(byte),
                text
            ));
        }
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|value| value.checked_add(u64::from(byte - b'0')))
            .ok_or_else(|| invalid_argument_error!("Decimal value too large - {}", text))?;
    }

    if !signed {
        if magnitude > mask(value_size) {
            return Err(invalid_argument_error!(
                "Decimal value {} exceeds {} bits",
                text,
                value_size
            ));
        }
        return Ok(magnitude);
    }

    let limit = 1_u64 << (value_size - 1);
    if negative {
        if magnitude > limit {
            return Err(invalid_argument_error!(
                "Decimal value {} below the {}-bit minimum",
                text,
                value_size
            ));
        }
        Ok(magnitude.wrapping_neg() & mask(value_size))
    } else {
        if magnitude >= limit {
            return Err(invalid_argument_error!(
                "Decimal value {} above the {}-bit maximum",
                text,
                value_size
            ));
        }
        Ok(magnitude)
    }
}

/// Parse up to `value_size / 4` hexadecimal digits with an optional `0x` or `0X` prefix.
pub(crate) fn parse_hexadecimal(text: &str, value_size: usize) -> Result<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || digits.len() > value_size / 4 {
        return Err(invalid_argument_error!(
            "Unsupported number of hexadecimal digits for {} bits - {}",
            value_size,
            text
        ));
    }

    let mut value: u64 = 0;
    for byte in digits.bytes() {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => {
                return Err(invalid_argument_error!(
                    "Unsupported hexadecimal digit '{}' in - {}",
                    char::from(byte),
                    text
                ))
            }
        };
        value = (value << 4) | u64::from(nibble);
    }

    Ok(value)
}
