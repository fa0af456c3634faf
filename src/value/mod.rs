//! Typed values over data handles.
//!
//! A [`Value`] names a [`DataHandle`] and fixes how its entries are read: every entry of the
//! handle is decoded with the same [`ValueType`]. The handle's [`Encoding`] supplies the detail
//! the type leaves open, the byte order of numbers and wide strings or the codepage of a byte
//! stream string. Without an encoding numbers are little-endian and byte streams are ASCII.
//!
//! [`Value::instance`] decodes one entry into a [`ValueInstance`], the closed set of codec
//! objects; the text accessors render an entry directly. Integers render as decimal, signed or
//! not per the value type, and floating-point numbers in scientific notation, unless
//! [`Value::set_integer_format`] or [`Value::set_floating_point_format`] selects another format.
//!
//! # Examples
//!
//! ```rust
//! use fvalue::{DataFlags, Encoding, Endianness, Value, ValueType};
//!
//! let record = [0xff, 0xfe, 0x00, 0x2a];
//! let mut value = Value::new("offsets", ValueType::Integer16);
//! value.set_data(
//!     &record,
//!     Encoding::ByteOrder(Endianness::Big),
//!     DataFlags::NON_MANAGED,
//! )?;
//! value.append_value_entry(0, 2)?;
//! value.append_value_entry(2, 2)?;
//!
//! assert_eq!(value.to_utf8_string(0)?, "-2");
//! assert_eq!(value.to_utf8_string(1)?, "42");
//! # Ok::<(), fvalue::Error>(())
//! ```

mod value_type;

pub use value_type::ValueType;

use std::fmt::Write;

use uguid::Guid;

use crate::{
    clone::TryClone,
    codec::{
        floating_point::{FloatingPoint, FloatingPointFormat},
        integer::{Integer, IntegerFormat},
        text::{check_capacity, write_ascii_with_index, AsciiText, CodeUnit},
    },
    data_handle::{DataFlags, DataHandle, Encoding, ValueEntry},
    io::Endianness,
    memory,
    string::{Codepage, StringValue},
    Error, Result,
};

const GUID_SIZE: usize = 16;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// One decoded entry of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueInstance {
    /// A copy of the entry bytes
    Binary(Vec<u8>),
    /// Boolean, signed and unsigned integer types
    Integer(Integer),
    /// Floating-point types
    FloatingPoint(FloatingPoint),
    /// String types
    String(StringValue),
    /// A GUID in its canonical field order
    Guid(Guid),
}

impl TryClone for ValueInstance {
    fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            ValueInstance::Binary(bytes) => ValueInstance::Binary(memory::duplicate(bytes)?),
            ValueInstance::Integer(integer) => ValueInstance::Integer(integer.try_clone()?),
            ValueInstance::FloatingPoint(value) => ValueInstance::FloatingPoint(value.try_clone()?),
            ValueInstance::String(string) => ValueInstance::String(string.try_clone()?),
            ValueInstance::Guid(guid) => ValueInstance::Guid(*guid),
        })
    }
}

/// A named, typed view over a data handle.
#[derive(Debug)]
pub struct Value<'a> {
    identifier: String,
    value_type: ValueType,
    data_handle: DataHandle<'a>,
    integer_format: Option<IntegerFormat>,
    floating_point_format: Option<FloatingPointFormat>,
}

impl<'a> Value<'a> {
    /// Create a value without data.
    #[must_use]
    pub fn new(identifier: &str, value_type: ValueType) -> Self {
        Value {
            identifier: identifier.to_string(),
            value_type,
            data_handle: DataHandle::new(Encoding::Unspecified),
            integer_format: None,
            floating_point_format: None,
        }
    }

    /// The identifier of the value.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Replace the identifier of the value.
    pub fn set_identifier(&mut self, identifier: &str) {
        self.identifier.clear();
        self.identifier.push_str(identifier);
    }

    /// The type every entry is decoded as.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The text format integer entries render in.
    #[must_use]
    pub fn integer_format(&self) -> IntegerFormat {
        if let Some(format) = self.integer_format {
            return format;
        }
        match self.value_type {
            ValueType::Boolean => IntegerFormat::BOOLEAN,
            value_type if value_type.is_signed() => IntegerFormat::DECIMAL_SIGNED,
            _ => IntegerFormat::DECIMAL_UNSIGNED,
        }
    }

    /// Render integer entries in `format` instead of the value type's default.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not an integer type.
    pub fn set_integer_format(&mut self, format: IntegerFormat) -> Result<()> {
        if !self.value_type.is_integer() {
            return Err(Error::NotSupported);
        }
        self.integer_format = Some(format);
        Ok(())
    }

    /// The text format floating-point entries render in.
    #[must_use]
    pub fn floating_point_format(&self) -> FloatingPointFormat {
        self.floating_point_format
            .unwrap_or(FloatingPointFormat::DECIMAL)
    }

    /// Render floating-point entries in `format`.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not a floating-point type.
    pub fn set_floating_point_format(&mut self, format: FloatingPointFormat) -> Result<()> {
        self.floating_point_size()?;
        self.floating_point_format = Some(format);
        Ok(())
    }

    /// Select the text format from a raw format word, read as an integer format word for
    /// integer types and a floating-point format word for floating-point types.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a word the value type's format rejects and
    /// [`Error::NotSupported`] for value types without a selectable format.
    pub fn set_format_flags(&mut self, raw: u32) -> Result<()> {
        if self.value_type.is_integer() {
            self.set_integer_format(IntegerFormat::from_raw(raw)?)
        } else if self.value_type.floating_point_size().is_some() {
            self.set_floating_point_format(FloatingPointFormat::from_raw(raw)?)
        } else {
            Err(Error::NotSupported)
        }
    }

    /// The data handle behind the value.
    #[must_use]
    pub fn data_handle(&self) -> &DataHandle<'a> {
        &self.data_handle
    }

    /// Mutable access to the data handle behind the value.
    pub fn data_handle_mut(&mut self) -> &mut DataHandle<'a> {
        &mut self.data_handle
    }

    /// Install the data of the value. See [`DataHandle::set_data`].
    ///
    /// # Errors
    /// Propagates the errors of [`DataHandle::set_data`].
    pub fn set_data(&mut self, data: &'a [u8], encoding: Encoding, flags: DataFlags) -> Result<()> {
        self.data_handle.set_data(data, encoding, flags)
    }

    /// Install an owned buffer as the data of the value. See [`DataHandle::set_data_owned`].
    ///
    /// # Errors
    /// Propagates the errors of [`DataHandle::set_data_owned`].
    pub fn set_data_owned(&mut self, data: Vec<u8>, encoding: Encoding) -> Result<()> {
        self.data_handle.set_data_owned(data, encoding)
    }

    /// Number of entries in the value.
    #[must_use]
    pub fn number_of_value_entries(&self) -> usize {
        self.data_handle.number_of_value_entries()
    }

    /// The `(offset, size)` pair of the entry at `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an invalid index.
    pub fn value_entry(&self, index: usize) -> Result<ValueEntry> {
        self.data_handle.value_entry(index)
    }

    /// Define a new entry over the existing data.
    ///
    /// # Errors
    /// Propagates the errors of [`DataHandle::append_value_entry`].
    pub fn append_value_entry(&mut self, offset: usize, size: usize) -> Result<usize> {
        self.data_handle.append_value_entry(offset, size)
    }

    /// The raw bytes of the entry at `index`.
    ///
    /// # Errors
    /// Propagates the errors of [`DataHandle::value_entry_data`].
    pub fn value_entry_data(&self, index: usize) -> Result<&[u8]> {
        self.data_handle.value_entry_data(index)
    }

    /// Decode the entry at `index` according to the value type.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an invalid index or an entry whose size does not
    /// fit the value type, [`Error::OutOfBounds`] for an entry outside the data, and memory
    /// errors for the copied bytes.
    pub fn instance(&self, index: usize) -> Result<ValueInstance> {
        let bytes = self.data_handle.value_entry_data(index)?;
        let value_type = self.value_type;

        tracing::trace!(
            identifier = %self.identifier,
            %value_type,
            index,
            size = bytes.len(),
            "decoding value entry"
        );

        let instance = match value_type {
            ValueType::Binary => ValueInstance::Binary(memory::duplicate(bytes)?),
            ValueType::Boolean
            | ValueType::Integer8
            | ValueType::Integer16
            | ValueType::Integer32
            | ValueType::Integer64
            | ValueType::UnsignedInteger8
            | ValueType::UnsignedInteger16
            | ValueType::UnsignedInteger32
            | ValueType::UnsignedInteger64 => {
                let mut integer = Integer::new(self.integer_size(bytes.len())?)?;
                integer.copy_from_byte_stream(bytes, self.byte_order())?;
                ValueInstance::Integer(integer)
            }
            ValueType::FloatingPoint32 | ValueType::FloatingPoint64 => {
                let value_size = self.floating_point_size()?;
                let mut value = FloatingPoint::new(value_size)?;
                if bytes.len() != value_size / 8 {
                    return Err(invalid_argument_error!(
                        "Entry {} of {} bytes does not hold a {}-bit floating-point value",
                        index,
                        bytes.len(),
                        value_size
                    ));
                }
                value.copy_from_byte_stream(bytes, self.byte_order())?;
                ValueInstance::FloatingPoint(value)
            }
            ValueType::StringByteStream
            | ValueType::StringUtf16
            | ValueType::StringUtf32 => {
                let mut string = StringValue::new(self.codepage());
                string.copy_from_byte_stream(bytes, self.codepage())?;
                ValueInstance::String(string)
            }
            ValueType::Guid => ValueInstance::Guid(self.guid(bytes)?),
        };

        Ok(instance)
    }

    /// The integer of the entry at `index` and its width in bits.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not an integer type, plus the errors
    /// of [`Value::instance`].
    pub fn copy_to_integer(&self, index: usize) -> Result<(u64, usize)> {
        if !self.value_type.is_integer() {
            return Err(Error::NotSupported);
        }
        match self.instance(index)? {
            ValueInstance::Integer(integer) => Ok(integer.copy_to_integer()),
            _ => Err(Error::NotSupported),
        }
    }

    /// Serialise `value` into the entry at `index` in the byte order of the value.
    ///
    /// Bits above the integer width of the value type are discarded. The entry keeps its size
    /// and must be exactly as wide as the integer.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not an integer type,
    /// [`Error::InvalidArgument`] for an invalid index or an entry of another width, and the errors of
    /// [`DataHandle::set_value_entry_data`].
    pub fn copy_from_integer(&mut self, index: usize, value: u64) -> Result<()> {
        if !self.value_type.is_integer() {
            return Err(Error::NotSupported);
        }

        let entry = self.data_handle.value_entry(index)?;
        let value_size = self.integer_size(entry.size)?;
        let integer = Integer::from_value(value, value_size)?;

        let mut bytes = [0u8; 8];
        let bytes = &mut bytes[..value_size / 8];
        integer.copy_to_byte_stream(bytes, self.byte_order())?;
        self.data_handle.set_value_entry_data(index, bytes)
    }

    /// The floating-point number of the entry at `index`.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not a floating-point type, plus the
    /// errors of [`Value::instance`].
    pub fn copy_to_floating_point(&self, index: usize) -> Result<f64> {
        match self.instance(index)? {
            ValueInstance::FloatingPoint(value) => Ok(value.copy_to_floating_point()),
            _ => Err(Error::NotSupported),
        }
    }

    /// Serialise `value` into the entry at `index`, narrowing to binary32 for
    /// [`ValueType::FloatingPoint32`].
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the value type is not a floating-point type, and the
    /// errors of [`DataHandle::set_value_entry_data`].
    pub fn copy_from_floating_point(&mut self, index: usize, value: f64) -> Result<()> {
        let value_size = self.floating_point_size()?;
        let value = FloatingPoint::from_value(value, value_size)?;

        let mut bytes = [0u8; 8];
        let bytes = &mut bytes[..value_size / 8];
        value.copy_to_byte_stream(bytes, self.byte_order())?;
        self.data_handle.set_value_entry_data(index, bytes)
    }

    /// Number of UTF-8 code units, terminator included, of the text of the entry at `index`.
    ///
    /// # Errors
    /// Propagates the errors of [`Value::instance`] and of the entry's codec.
    pub fn utf8_string_size(&self, index: usize) -> Result<usize> {
        self.string_size::<u8>(index)
    }

    /// Number of UTF-16 code units, terminator included, of the text of the entry at `index`.
    ///
    /// # Errors
    /// See [`Value::utf8_string_size`].
    pub fn utf16_string_size(&self, index: usize) -> Result<usize> {
        self.string_size::<u16>(index)
    }

    /// Number of UTF-32 code units, terminator included, of the text of the entry at `index`.
    ///
    /// # Errors
    /// See [`Value::utf8_string_size`].
    pub fn utf32_string_size(&self, index: usize) -> Result<usize> {
        self.string_size::<u32>(index)
    }

    /// Write the text of the entry at `index` with a terminator into `buffer` at `string_index`,
    /// and advance `string_index` past the terminator.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the text does not fit, plus the errors of
    /// [`Value::instance`]. `buffer` and `string_index` are unchanged on error.
    pub fn copy_to_utf8_string_with_index(
        &self,
        index: usize,
        buffer: &mut [u8],
        string_index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(index, buffer, string_index)
    }

    /// UTF-16 counterpart of [`Value::copy_to_utf8_string_with_index`].
    ///
    /// # Errors
    /// See [`Value::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf16_string_with_index(
        &self,
        index: usize,
        buffer: &mut [u16],
        string_index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(index, buffer, string_index)
    }

    /// UTF-32 counterpart of [`Value::copy_to_utf8_string_with_index`].
    ///
    /// # Errors
    /// See [`Value::copy_to_utf8_string_with_index`].
    pub fn copy_to_utf32_string_with_index(
        &self,
        index: usize,
        buffer: &mut [u32],
        string_index: &mut usize,
    ) -> Result<()> {
        self.copy_to_string_with_index(index, buffer, string_index)
    }

    /// The text of the entry at `index` as an owned string.
    ///
    /// # Errors
    /// See [`Value::utf8_string_size`].
    pub fn to_utf8_string(&self, index: usize) -> Result<String> {
        let mut buffer = memory::allocate(self.utf8_string_size(index)?)?;
        let mut string_index = 0;
        self.copy_to_utf8_string_with_index(index, &mut buffer, &mut string_index)?;

        buffer.truncate(string_index.saturating_sub(1));
        String::from_utf8(buffer).map_err(|error| {
            encoding_error!(
                "Rendered text is not UTF-8 at byte {}",
                error.utf8_error().valid_up_to()
            )
        })
    }

    /// Create an independent, owned copy of the value.
    ///
    /// # Errors
    /// Returns memory errors if the data cannot be copied.
    pub fn try_clone(&self) -> Result<Value<'static>> {
        let identifier = String::from_utf8(memory::duplicate(self.identifier.as_bytes())?)
            .map_err(|_| Error::CopyFailure)?;

        Ok(Value {
            identifier,
            value_type: self.value_type,
            data_handle: self.data_handle.try_clone()?,
            integer_format: self.integer_format,
            floating_point_format: self.floating_point_format,
        })
    }

    fn string_size<U: CodeUnit>(&self, index: usize) -> Result<usize> {
        match self.instance(index)? {
            ValueInstance::Binary(bytes) => Ok(bytes.len() * 2 + 1),
            ValueInstance::Integer(integer) => integer.string_size(self.integer_format()),
            ValueInstance::FloatingPoint(value) => value.string_size(self.floating_point_format()),
            ValueInstance::String(string) => string.string_size::<U>(),
            ValueInstance::Guid(guid) => Ok(render_guid(guid)?.len() + 1),
        }
    }

    fn copy_to_string_with_index<U: CodeUnit>(
        &self,
        index: usize,
        buffer: &mut [U],
        string_index: &mut usize,
    ) -> Result<()> {
        match self.instance(index)? {
            ValueInstance::Binary(bytes) => write_base16(&bytes, buffer, string_index),
            ValueInstance::Integer(integer) => {
                integer.copy_to_string_with_index(buffer, string_index, self.integer_format())
            }
            ValueInstance::FloatingPoint(value) => {
                value.copy_to_string_with_index(buffer, string_index, self.floating_point_format())
            }
            ValueInstance::String(string) => string.copy_to_string_with_index(buffer, string_index),
            ValueInstance::Guid(guid) => {
                write_ascii_with_index(render_guid(guid)?.as_str(), buffer, string_index)
            }
        }
    }

    /// Width in bits of an integer entry of `entry_size` bytes.
    fn integer_size(&self, entry_size: usize) -> Result<usize> {
        let Some(value_size) = self.value_type.integer_size() else {
            // Boolean: the entry decides
            return entry_size
                .checked_mul(8)
                .ok_or_else(|| invalid_argument_error!("Entry of {} bytes", entry_size));
        };
        Ok(value_size)
    }

    fn floating_point_size(&self) -> Result<usize> {
        self.value_type
            .floating_point_size()
            .ok_or(Error::NotSupported)
    }

    fn byte_order(&self) -> Endianness {
        match self.data_handle.encoding() {
            Encoding::ByteOrder(endianness) => endianness.resolve(),
            Encoding::Codepage(Codepage::Utf16BigEndian | Codepage::Utf32BigEndian) => {
                Endianness::Big
            }
            _ => Endianness::Little,
        }
    }

    fn codepage(&self) -> Codepage {
        let big_endian = self.byte_order() == Endianness::Big;
        match self.value_type {
            ValueType::StringUtf16 if big_endian => Codepage::Utf16BigEndian,
            ValueType::StringUtf16 => Codepage::Utf16LittleEndian,
            ValueType::StringUtf32 if big_endian => Codepage::Utf32BigEndian,
            ValueType::StringUtf32 => Codepage::Utf32LittleEndian,
            _ => match self.data_handle.encoding() {
                Encoding::Codepage(codepage) => codepage,
                _ => Codepage::Ascii,
            },
        }
    }

    /// Build a GUID from 16 entry bytes. Little-endian data uses the mixed-endian Windows
    /// layout; big-endian data stores every field in network order.
    fn guid(&self, bytes: &[u8]) -> Result<Guid> {
        let Ok(mut raw) = <[u8; GUID_SIZE]>::try_from(bytes) else {
            return Err(invalid_argument_error!(
                "GUID entry of {} bytes, expected {}",
                bytes.len(),
                GUID_SIZE
            ));
        };

        if self.byte_order() == Endianness::Big {
            raw[0..4].reverse();
            raw[4..6].reverse();
            raw[6..8].reverse();
        }
        Ok(Guid::from_bytes(raw))
    }
}

impl<'a> TryClone for Value<'a> {
    fn try_clone(&self) -> Result<Self> {
        Value::try_clone(self)
    }
}

fn render_guid(guid: Guid) -> Result<AsciiText> {
    let mut text = AsciiText::new();
    write!(text, "{guid}").map_err(|_| invalid_argument_error!("GUID text exceeds buffer"))?;
    Ok(text)
}

fn write_base16<U: CodeUnit>(bytes: &[u8], buffer: &mut [U], index: &mut usize) -> Result<()> {
    let required = bytes
        .len()
        .checked_mul(2)
        .and_then(|digits| digits.checked_add(1))
        .ok_or_else(|| invalid_argument_error!("Binary entry of {} bytes", bytes.len()))?;
    check_capacity(buffer, *index, required)?;

    let mut position = *index;
    for &byte in bytes {
        buffer[position] = U::from_ascii(HEX_DIGITS[usize::from(byte >> 4)]);
        buffer[position + 1] = U::from_ascii(HEX_DIGITS[usize::from(byte & 0x0f)]);
        position += 2;
    }
    buffer[position] = U::default();

    *index = position + 1;
    Ok(())
}
