//! String values stored as byte streams in one of several codepages.
//!
//! A [`StringValue`] keeps the bytes exactly as they were read and transcodes lazily: nothing is
//! decoded until a size query or a copy asks for UTF-8, UTF-16 or UTF-32 output. Decoding stops at
//! the first U+0000, so streams with and without a trailing terminator read the same, and output
//! is always terminated.
//!
//! # Key Components
//!
//! - [`crate::string::Codepage`] - the supported encodings and their code page numbers
//! - [`crate::string::StringValue`] - the stored byte stream plus its codepage
//! - Per-encoding transcoders for Latin-1 derived codepages, UTF-7, UTF-8/16/32 and SCSU
//! - Table-driven ISO 8859, KOI8, Windows single-byte and East Asian double-byte codepages
//!
//! # Strictness
//!
//! Malformed input is an [`crate::Error::Encoding`], never replaced with U+FFFD: bytes above
//! `0x7f` in ASCII, bytes a codepage table leaves unassigned, truncated double-byte sequences,
//! invalid UTF-8, unpaired surrogates and UTF-16 or UTF-32 streams whose length is not a multiple
//! of the unit width. This keeps encoding
//! failures distinguishable from [`crate::Error::BufferTooSmall`].
//!
//! # Examples
//!
//! ```rust
//! use fvalue::{Codepage, StringValue};
//!
//! let mut string = StringValue::new(Codepage::Scsu);
//! let compressed = [0xd6, 0x6c, 0x20, 0x66, 0x6c, 0x69, 0x65, 0xdf, 0x74];
//! string.copy_from_byte_stream(&compressed, Codepage::Scsu)?;
//!
//! let mut utf8 = vec![0u8; string.utf8_string_size()?];
//! let mut index = 0;
//! string.copy_to_utf8_string_with_index(&mut utf8, &mut index)?;
//! assert_eq!(utf8, "Öl fließt\0".as_bytes());
//! # Ok::<(), fvalue::Error>(())
//! ```

mod codepage;
mod legacy;
mod scsu;
mod single_byte;
mod unicode;
mod utf7;

pub use codepage::Codepage;

use std::ops::ControlFlow;

use widestring::{U16CString, U32CString};

use crate::{
    clone::TryClone,
    codec::text::{check_capacity, terminated_units, CodeUnit},
    memory, Error, Result,
};

/// Decode `bytes` in `codepage`, handing each character to `emit` until it breaks.
fn decode<F>(bytes: &[u8], codepage: Codepage, mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    match codepage {
        Codepage::Ascii
        | Codepage::Iso8859_1
        | Codepage::Iso8859_9
        | Codepage::Iso8859_11
        | Codepage::Iso8859_15
        | Codepage::Windows1252 => {
            for &byte in bytes {
                if emit(single_byte::decode_byte(codepage, byte)?).is_break() {
                    break;
                }
            }
            Ok(())
        }
        Codepage::Utf7 => utf7::decode(bytes, emit),
        Codepage::Utf8 => unicode::decode_utf8(bytes, emit),
        Codepage::Utf16BigEndian => unicode::decode_utf16(bytes, true, emit),
        Codepage::Utf16LittleEndian => unicode::decode_utf16(bytes, false, emit),
        Codepage::Utf32BigEndian => unicode::decode_utf32(bytes, true, emit),
        Codepage::Utf32LittleEndian => unicode::decode_utf32(bytes, false, emit),
        Codepage::Scsu => scsu::decode(bytes, emit),
        Codepage::Utf16Mixed => {
            let (detected, start) = unicode::detect_mixed(bytes);
            decode(&bytes[start..], detected, emit)
        }
        _ => legacy::decode(bytes, codepage, emit),
    }
}

/// Per-codepage encoding state.
enum Encoder {
    SingleByte(Codepage),
    Legacy(legacy::Encoder),
    Utf7(utf7::Encoder),
    Utf8,
    Utf16 { big_endian: bool },
    Utf32 { big_endian: bool },
    Scsu(scsu::Encoder),
}

impl Encoder {
    fn new(codepage: Codepage) -> Result<Encoder> {
        Ok(match codepage {
            Codepage::Ascii
            | Codepage::Iso8859_1
            | Codepage::Iso8859_9
            | Codepage::Iso8859_11
            | Codepage::Iso8859_15
            | Codepage::Windows1252 => Encoder::SingleByte(codepage),
            Codepage::Utf7 => Encoder::Utf7(utf7::Encoder::default()),
            Codepage::Utf8 => Encoder::Utf8,
            Codepage::Utf16BigEndian => Encoder::Utf16 { big_endian: true },
            Codepage::Utf16LittleEndian => Encoder::Utf16 { big_endian: false },
            Codepage::Utf32BigEndian => Encoder::Utf32 { big_endian: true },
            Codepage::Utf32LittleEndian => Encoder::Utf32 { big_endian: false },
            Codepage::Scsu => Encoder::Scsu(scsu::Encoder::default()),
            Codepage::Utf16Mixed => return Err(Error::NotSupported),
            _ => Encoder::Legacy(legacy::Encoder::new(codepage)?),
        })
    }

    fn push<F: FnMut(u8)>(&mut self, c: char, emit: &mut F) -> Result<()> {
        match self {
            Encoder::SingleByte(codepage) => emit(single_byte::encode_char(*codepage, c)?),
            Encoder::Legacy(encoder) => encoder.push(c, emit)?,
            Encoder::Utf7(encoder) => encoder.push(c, emit),
            Encoder::Utf8 => unicode::encode_utf8(c, emit),
            Encoder::Utf16 { big_endian } => unicode::encode_utf16(c, *big_endian, emit),
            Encoder::Utf32 { big_endian } => unicode::encode_utf32(c, *big_endian, emit),
            Encoder::Scsu(encoder) => encoder.push(c, emit),
        }
        Ok(())
    }

    fn finish<F: FnMut(u8)>(&mut self, emit: &mut F) {
        if let Encoder::Utf7(encoder) = self {
            encoder.finish(emit);
        }
    }
}

/// Encode the caller's code units into `codepage`, handing each byte to `emit`.
fn encode<U, F>(units: &[U], codepage: Codepage, mut emit: F) -> Result<()>
where
    U: CodeUnit,
    F: FnMut(u8),
{
    let mut encoder = Encoder::new(codepage)?;
    U::decode_units(units, |c| encoder.push(c, &mut emit))?;
    encoder.finish(&mut emit);
    Ok(())
}

/// A string stored as a byte stream in a known codepage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    data: Vec<u8>,
    codepage: Codepage,
}

impl StringValue {
    /// Create an empty string that will be stored in `codepage`.
    #[must_use]
    pub fn new(codepage: Codepage) -> Self {
        StringValue {
            data: Vec::new(),
            codepage,
        }
    }

    /// Encode `text` into `codepage`.
    ///
    /// # Errors
    /// See [`StringValue::copy_from_utf8_string_with_index`].
    pub fn from_utf8(text: &str, codepage: Codepage) -> Result<Self> {
        let mut string = StringValue::new(codepage);
        let mut index = 0;
        string.copy_from_utf8_string_with_index(text.as_bytes(), &mut index)?;
        Ok(string)
    }

    /// The stored byte stream.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The codepage of the stored byte stream.
    #[must_use]
    pub fn codepage(&self) -> Codepage {
        self.codepage
    }

    /// Replace the stored bytes with a copy of `bytes` in `codepage`. No transcoding takes place.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] or [`Error::CopyFailure`] if the copy cannot be made;
    /// the string is unchanged on error.
    pub fn copy_from_byte_stream(&mut self, bytes: &[u8], codepage: Codepage) -> Result<()> {
        self.data = memory::duplicate(bytes)?;
        self.codepage = codepage;
        Ok(())
    }

    /// Number of UTF-8 code units, terminator included, of the decoded string.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn utf8_string_size(&self) -> Result<usize> {
        self.string_size::<u8>()
    }

    /// Number of UTF-16 code units, terminator included, of the decoded string.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn utf16_string_size(&self) -> Result<usize> {
        self.string_size::<u16>()
    }

    /// Number of UTF-32 code units, terminator included, of the decoded string.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn utf32_string_size(&self) -> Result<usize> {
        self.string_size::<u32>()
    }

    /// Decode into a UTF-8 buffer at `*index` and advance `*index` past the terminator.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed and
    /// [`Error::BufferTooSmall`] if the output does not fit; `buffer` and `index` are unchanged
    /// on error.
    pub fn copy_to_utf8_string_with_index(
        &self,
        buffer: &mut [u8],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index)
    }

    /// Decode into a UTF-16 buffer at `*index`.
    ///
    /// # Errors
    /// See [`StringValue::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf16_string_with_index(
        &self,
        buffer: &mut [u16],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index)
    }

    /// Decode into a UTF-32 buffer at `*index`.
    ///
    /// # Errors
    /// See [`StringValue::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf32_string_with_index(
        &self,
        buffer: &mut [u32],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(buffer, index)
    }

    /// Encode the UTF-8 string at `*index` into the string's codepage, replacing the stored bytes.
    ///
    /// The source runs to the first NUL or the end of `buffer`; `*index` advances past it and its
    /// terminator. The stored stream carries no terminator.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the codepage is read only, [`Error::Encoding`] for
    /// malformed input or characters the codepage cannot represent, and
    /// [`Error::AllocationFailure`] if the stream cannot be allocated. The string and `index` are
    /// unchanged on error.
    pub fn copy_from_utf8_string_with_index(
        &mut self,
        buffer: &[u8],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index)
    }

    /// Encode the UTF-16 string at `*index` into the string's codepage.
    ///
    /// # Errors
    /// See [`StringValue::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf16_string_with_index(
        &mut self,
        buffer: &[u16],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index)
    }

    /// Encode the UTF-32 string at `*index` into the string's codepage.
    ///
    /// # Errors
    /// See [`StringValue::copy_from_utf8_string_with_index`].
    pub fn copy_from_utf32_string_with_index(
        &mut self,
        buffer: &[u32],
        index: &mut usize,
    ) -> Result<()> {
        self.copy_from_string_with_index(buffer, index)
    }

    /// Decode into an owned [`String`].
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn to_utf8_string(&self) -> Result<String> {
        let mut buffer = memory::allocate(self.utf8_string_size()?)?;
        let mut index = 0;
        self.copy_to_utf8_string_with_index(&mut buffer, &mut index)?;
        buffer.pop();

        String::from_utf8(buffer).map_err(|error| {
            encoding_error!("Decoded string is not UTF-8: {}", error.utf8_error())
        })
    }

    /// Decode into an owned, terminated UTF-16 string.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn to_utf16_string(&self) -> Result<U16CString> {
        let buffer = self.to_units::<u16>()?;
        Ok(U16CString::from_vec_truncate(buffer))
    }

    /// Decode into an owned, terminated UTF-32 string.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the stored bytes are malformed.
    pub fn to_utf32_string(&self) -> Result<U32CString> {
        let buffer = self.to_units::<u32>()?;
        Ok(U32CString::from_vec_truncate(buffer))
    }

    /// Call `f` for every character before the first U+0000.
    fn for_each_char<F: FnMut(char)>(&self, mut f: F) -> Result<()> {
        decode(&self.data, self.codepage, |c| {
            if c == '\0' {
                return ControlFlow::Break(());
            }
            f(c);
            ControlFlow::Continue(())
        })
    }

    pub(crate) fn string_size<U: CodeUnit>(&self) -> Result<usize> {
        let mut size = 1;
        self.for_each_char(|c| size += U::units_for(c))?;
        Ok(size)
    }

    pub(crate) fn copy_to_string_with_index<U: CodeUnit>(
        &self,
        buffer: &mut [U],
        index: &mut usize,
    ) -> Result<()> {
        let required = self.string_size::<U>()?;
        check_capacity(buffer, *index, required)?;

        let mut position = *index;
        self.for_each_char(|c| {
            U::encode(c, &mut buffer[position..]);
            position += U::units_for(c);
        })?;
        buffer[position] = U::default();

        *index = position + 1;
        Ok(())
    }

    fn copy_from_string_with_index<U: CodeUnit>(
        &mut self,
        buffer: &[U],
        index: &mut usize,
    ) -> Result<()> {
        if !self.codepage.is_writable() {
            return Err(Error::NotSupported);
        }

        let (units, next) = terminated_units(buffer, *index)?;

        let mut size = 0;
        encode(units, self.codepage, |_| size += 1)?;

        let mut data = memory::allocate(size)?;
        let mut position = 0;
        encode(units, self.codepage, |byte| {
            data[position] = byte;
            position += 1;
        })?;

        self.data = data;
        *index = next;
        Ok(())
    }

    fn to_units<U: CodeUnit>(&self) -> Result<Vec<U>> {
        let size = self.string_size::<U>()?;
        let mut buffer = Vec::new();
        memory::reserve(&mut buffer, size)?;
        buffer.resize(size, U::default());

        let mut index = 0;
        self.copy_to_string_with_index(&mut buffer, &mut index)?;
        Ok(buffer)
    }
}

impl TryClone for StringValue {
    fn try_clone(&self) -> Result<Self> {
        Ok(StringValue {
            data: memory::duplicate(&self.data)?,
            codepage: self.codepage,
        })
    }
}
