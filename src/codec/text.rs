//! Code unit abstraction and index-based text I/O shared by the numeric and string codecs.
//!
//! Text is exchanged with callers as NUL-terminated sequences of 8, 16 or 32-bit code units
//! (UTF-8, UTF-16 or UTF-32). [`CodeUnit`] lets every codec be written once and instantiated for
//! the three widths. [`write_ascii_with_index`] and [`read_ascii_token`] implement the shared
//! `*_with_index` contract:
//!
//! - Writing starts at `*index`, includes the terminator, and advances `*index` past it.
//! - Reading starts at `*index`, stops at a NUL or at the end of the buffer, and advances
//!   `*index` past the consumed text and the NUL if there is one.
//! - On error `*index` and the destination buffer are left untouched.

use std::fmt;

use crate::{Error, Result};

/// Longest numeric token accepted by [`read_ascii_token`].
pub const MAX_TOKEN_LENGTH: usize = 64;

/// A fixed-width code unit of a Unicode encoding form.
pub trait CodeUnit: Copy + Default + PartialEq + fmt::Debug {
    /// Encoding form name, used in diagnostics
    const NAME: &'static str;

    /// Widen an ASCII byte to a code unit.
    fn from_ascii(byte: u8) -> Self;

    /// The numeric value of the code unit.
    fn to_u32(self) -> u32;

    /// Number of code units needed to encode `c`.
    fn units_for(c: char) -> usize;

    /// Encode `c` into the start of `out`, which holds at least [`CodeUnit::units_for`] units.
    fn encode(c: char, out: &mut [Self]);

    /// Decode a run of code units that contains no terminator, calling `emit` for each
    /// character.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] for malformed input, or the first error `emit` returns.
    fn decode_units<F>(units: &[Self], emit: F) -> Result<()>
    where
        F: FnMut(char) -> Result<()>;

    /// Returns true for the NUL terminator.
    fn is_nul(self) -> bool {
        self.to_u32() == 0
    }
}

impl CodeUnit for u8 {
    const NAME: &'static str = "UTF-8";

    fn from_ascii(byte: u8) -> Self {
        byte
    }

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn units_for(c: char) -> usize {
        c.len_utf8()
    }

    fn encode(c: char, out: &mut [Self]) {
        c.encode_utf8(out);
    }

    fn decode_units<F>(units: &[Self], emit: F) -> Result<()>
    where
        F: FnMut(char) -> Result<()>,
    {
        let text = std::str::from_utf8(units).map_err(|error| {
            encoding_error!(
                "Invalid UTF-8 sequence at byte {}",
                error.valid_up_to()
            )
        })?;
        text.chars().try_for_each(emit)
    }
}

impl CodeUnit for u16 {
    const NAME: &'static str = "UTF-16";

    fn from_ascii(byte: u8) -> Self {
        u16::from(byte)
    }

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn units_for(c: char) -> usize {
        c.len_utf16()
    }

    fn encode(c: char, out: &mut [Self]) {
        c.encode_utf16(out);
    }

    fn decode_units<F>(units: &[Self], mut emit: F) -> Result<()>
    where
        F: FnMut(char) -> Result<()>,
    {
        for decoded in char::decode_utf16(units.iter().copied()) {
            let c = decoded.map_err(|error| {
                encoding_error!(
                    "Unpaired UTF-16 surrogate 0x{:04x}",
                    error.unpaired_surrogate()
                )
            })?;
            emit(c)?;
        }
        Ok(())
    }
}

impl CodeUnit for u32 {
    const NAME: &'static str = "UTF-32";

    fn from_ascii(byte: u8) -> Self {
        u32::from(byte)
    }

    fn to_u32(self) -> u32 {
        self
    }

    fn units_for(_c: char) -> usize {
        1
    }

    fn encode(c: char, out: &mut [Self]) {
        out[0] = u32::from(c);
    }

    fn decode_units<F>(units: &[Self], mut emit: F) -> Result<()>
    where
        F: FnMut(char) -> Result<()>,
    {
        for &unit in units {
            let c = char::from_u32(unit)
                .ok_or_else(|| encoding_error!("Invalid UTF-32 code point 0x{:08x}", unit))?;
            emit(c)?;
        }
        Ok(())
    }
}

/// Split the terminated string at `index` off `buffer`.
///
/// Returns the units before the first NUL (or up to the end of the buffer) and the index just past
/// them, past the NUL when there is one.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `index` lies beyond the buffer.
pub fn terminated_units<U: CodeUnit>(buffer: &[U], index: usize) -> Result<(&[U], usize)> {
    if index > buffer.len() {
        return Err(invalid_argument_error!(
            "{} string index {} beyond buffer of {} units",
            U::NAME,
            index,
            buffer.len()
        ));
    }

    let rest = &buffer[index..];
    match rest.iter().position(|unit| unit.is_nul()) {
        Some(length) => Ok((&rest[..length], index + length + 1)),
        None => Ok((rest, buffer.len())),
    }
}

/// Verify that `required` code units fit in `buffer` from `index` on.
///
/// # Errors
/// Returns [`Error::BufferTooSmall`] if they do not.
pub fn check_capacity<U>(buffer: &[U], index: usize, required: usize) -> Result<()> {
    let available = buffer.len().saturating_sub(index);
    if required > available {
        return Err(Error::BufferTooSmall {
            required,
            available,
        });
    }
    Ok(())
}

/// Write the ASCII `text` and a NUL terminator into `buffer` at `*index`.
///
/// # Errors
/// Returns [`Error::BufferTooSmall`] if `text.len() + 1` units do not fit; nothing is written.
pub fn write_ascii_with_index<U: CodeUnit>(
    text: &str,
    buffer: &mut [U],
    index: &mut usize,
) -> Result<()> {
    let required = text.len() + 1;
    check_capacity(buffer, *index, required)?;

    let target = &mut buffer[*index..*index + required];
    for (unit, byte) in target.iter_mut().zip(text.bytes()) {
        *unit = U::from_ascii(byte);
    }
    target[required - 1] = U::default();

    *index += required;
    Ok(())
}

/// Fixed-capacity ASCII text, used for numeric tokens in both directions without allocating.
///
/// Holds ASCII bytes only; [`AsciiText::push`] rejects anything else.
#[derive(Clone, Copy)]
pub struct AsciiText {
    bytes: [u8; MAX_TOKEN_LENGTH],
    length: usize,
}

impl AsciiText {
    /// Create empty text.
    #[must_use]
    pub fn new() -> Self {
        AsciiText {
            bytes: [0; MAX_TOKEN_LENGTH],
            length: 0,
        }
    }

    /// Append an ASCII byte.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the byte is not ASCII or the text is full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if !byte.is_ascii() {
            return Err(invalid_argument_error!("Unsupported character 0x{:02x}", byte));
        }
        if self.length == MAX_TOKEN_LENGTH {
            return Err(invalid_argument_error!(
                "Text exceeds {} characters",
                MAX_TOKEN_LENGTH
            ));
        }

        self.bytes[self.length] = byte;
        self.length += 1;
        Ok(())
    }

    /// Append every byte of the ASCII string `text`.
    ///
    /// # Errors
    /// See [`AsciiText::push`].
    pub fn push_str(&mut self, text: &str) -> Result<()> {
        text.bytes().try_for_each(|byte| self.push(byte))
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if no characters were pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.length]).unwrap_or_default()
    }
}

impl Default for AsciiText {
    fn default() -> Self {
        AsciiText::new()
    }
}

impl fmt::Write for AsciiText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for AsciiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AsciiText").field(&self.as_str()).finish()
    }
}

/// Read an ASCII token from `buffer` at `*index`, up to a NUL or the end of the buffer.
///
/// Returns the token and the index just past it (past the NUL when one terminates it). The caller
/// commits the new index only once the token has been parsed successfully.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `*index` is past the buffer, a unit outside ASCII is
/// found, or the token is longer than [`MAX_TOKEN_LENGTH`].
pub fn read_ascii_token<U: CodeUnit>(buffer: &[U], index: usize) -> Result<(AsciiText, usize)> {
    if index > buffer.len() {
        return Err(invalid_argument_error!(
            "{} string index {} beyond buffer of {} units",
            U::NAME,
            index,
            buffer.len()
        ));
    }

    let mut token = AsciiText::new();
    let mut position = index;

    while position < buffer.len() {
        let unit = buffer[position];
        if unit.is_nul() {
            return Ok((token, position + 1));
        }

        let Ok(byte) = u8::try_from(unit.to_u32()) else {
            return Err(invalid_argument_error!(
                "Unsupported character 0x{:x} at {} string index {}",
                unit.to_u32(),
                U::NAME,
                position
            ));
        };
        token.push(byte)?;
        position += 1;
    }

    Ok((token, position))
}
