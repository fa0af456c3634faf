//! Byte order handling and bounds-checked reading/writing of primitive values.
//!
//! This module provides endian-aware conversion between byte slices and the primitive types the
//! codecs work with. Every helper checks the buffer length before touching it and reports
//! [`crate::Error::OutOfBounds`] instead of panicking.
//!
//! # Key Components
//!
//! - [`crate::io::ByteOrderIO`] - Trait tying a primitive to its fixed-size byte array
//! - [`crate::io::Endianness`] - Big, little or host byte order, as selected by the caller
//! - [`crate::io::read_le`] / [`crate::io::read_be`] - Read from the start of a buffer
//! - [`crate::io::read_le_at`] / [`crate::io::read_be_at`] - Read at an offset and advance it
//! - [`crate::io::write_le`] / [`crate::io::write_be`] - Write to the start of a buffer
//! - [`crate::io::read_with`] / [`crate::io::write_with`] - Dispatch on an [`Endianness`]
//!
//! # Examples
//!
//! ```rust
//! use fvalue::io::{read_with, write_with, Endianness};
//!
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let value: u32 = read_with(&data, Endianness::Big)?;
//! assert_eq!(value, 0x0102_0304);
//!
//! let mut out = [0u8; 4];
//! write_with(&mut out, value, Endianness::Little)?;
//! assert_eq!(out, [0x04, 0x03, 0x02, 0x01]);
//! # Ok::<(), fvalue::Error>(())
//! ```

use std::fmt;

use crate::{Error::OutOfBounds, Result};

/// Byte order of a binary field.
///
/// [`Endianness::Native`] is resolved to the byte order of the host at call time through
/// [`Endianness::resolve`]; the codecs never store it unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
    /// Byte order of the host
    Native,
}

impl Endianness {
    /// Resolve [`Endianness::Native`] to [`Endianness::Big`] or [`Endianness::Little`].
    #[must_use]
    pub fn resolve(self) -> Endianness {
        match self {
            Endianness::Native => {
                if cfg!(target_endian = "big") {
                    Endianness::Big
                } else {
                    Endianness::Little
                }
            }
            other => other,
        }
    }

    /// The single character tag used for this byte order (`b`, `l` or `n`).
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Endianness::Big => b'b',
            Endianness::Little => b'l',
            Endianness::Native => b'n',
        }
    }
}

impl TryFrom<u8> for Endianness {
    type Error = crate::Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            b'b' => Ok(Endianness::Big),
            b'l' => Ok(Endianness::Little),
            b'n' => Ok(Endianness::Native),
            _ => Err(invalid_argument_error!("Unsupported byte order tag - 0x{:02x}", tag)),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endianness::Big => "big-endian",
            Endianness::Little => "little-endian",
            Endianness::Native => "native",
        };
        f.write_str(name)
    }
}

/// Trait for primitives that can be converted from and to a fixed-size byte array.
///
/// Each implementation names its `Bytes` array type (e.g. `[u8; 4]` for `u32`), which is what the
/// reading functions convert a checked sub-slice into.
pub trait ByteOrderIO: Sized {
    /// Byte array type holding one value of this type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_byte_order_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl ByteOrderIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_byte_order_io!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

/// Safely reads a value of type `T` in little-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: ByteOrderIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes; `offset` is unchanged.
pub fn read_le_at<T: ByteOrderIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let bytes = take::<T>(data, *offset)?;
    *offset += std::mem::size_of::<T>();
    Ok(T::from_le_bytes(bytes))
}

/// Safely reads a value of type `T` in big-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be<T: ByteOrderIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a value of type `T` in big-endian byte order at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes; `offset` is unchanged.
pub fn read_be_at<T: ByteOrderIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let bytes = take::<T>(data, *offset)?;
    *offset += std::mem::size_of::<T>();
    Ok(T::from_be_bytes(bytes))
}

/// Reads a value of type `T` from the start of `data` in the given byte order.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_with<T: ByteOrderIO>(data: &[u8], endianness: Endianness) -> Result<T> {
    match endianness.resolve() {
        Endianness::Big => read_be(data),
        _ => read_le(data),
    }
}

/// Writes `value` in little-endian byte order to the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too small; `data` is unchanged.
pub fn write_le<T: ByteOrderIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_le_at(data, &mut offset, value)
}

/// Writes `value` in little-endian byte order at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too small; nothing is written.
pub fn write_le_at<T: ByteOrderIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    put(data, offset, value.to_le_bytes())
}

/// Writes `value` in big-endian byte order to the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too small; `data` is unchanged.
pub fn write_be<T: ByteOrderIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_be_at(data, &mut offset, value)
}

/// Writes `value` in big-endian byte order at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too small; nothing is written.
pub fn write_be_at<T: ByteOrderIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    put(data, offset, value.to_be_bytes())
}

/// Writes `value` to the start of `data` in the given byte order.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too small.
pub fn write_with<T: ByteOrderIO>(data: &mut [u8], value: T, endianness: Endianness) -> Result<()> {
    match endianness.resolve() {
        Endianness::Big => write_be(data, value),
        _ => write_le(data, value),
    }
}

fn take<T: ByteOrderIO>(data: &[u8], offset: usize) -> Result<T::Bytes> {
    let Some(end) = offset.checked_add(std::mem::size_of::<T>()) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    Ok(read)
}

fn put<B: AsRef<[u8]>>(data: &mut [u8], offset: &mut usize, bytes: B) -> Result<()> {
    let bytes = bytes.as_ref();
    let Some(end) = offset.checked_add(bytes.len()) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(bytes);
    *offset = end;

    Ok(())
}
