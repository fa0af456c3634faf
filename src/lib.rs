// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # fvalue
//!
//! Typed values over raw byte buffers. `fvalue` reads the fields of binary records (integers,
//! floating-point numbers, strings in legacy and Unicode codepages, GUIDs) out of byte buffers
//! and converts them to and from UTF-8, UTF-16 and UTF-32 text without ever panicking on
//! malformed input.
//!
//! ## Features
//!
//! - **Borrowed or owned data** - A [`DataHandle`] either borrows the caller's bytes or owns a
//!   copy, and splits them into value entries
//! - **Byte order aware integers and floats** - 8 to 64-bit integers and IEEE-754 binary32/64
//!   in big, little or native byte order, with decimal, hexadecimal and boolean text formats
//! - **Codepages** - ASCII, the ISO-8859 family, KOI8, the Windows single-byte code pages,
//!   Shift JIS, GBK, Unified Hangul Code, Big5, UTF-7, UTF-8, UTF-16, UTF-32, SCSU and
//!   BOM-detected mixed UTF-16
//! - **Caller-owned buffers** - Every text conversion offers an exact size query and a copy into
//!   a caller buffer at an index, next to an owned-string convenience
//! - **Fallible everything** - Allocation, copy and format failures are reported as [`Error`]
//!   and leave the destination untouched
//!
//! ## Quick Start
//!
//! ```rust
//! use fvalue::prelude::*;
//!
//! let record = [0x2a, 0x00, 0x00, 0x00, b'o', b'k', 0x00];
//!
//! let mut value = Value::new("status", ValueType::UnsignedInteger32);
//! value.set_data(&record[..4], Encoding::Unspecified, DataFlags::NON_MANAGED)?;
//! assert_eq!(value.to_utf8_string(0)?, "42");
//!
//! let mut string = StringValue::new(Codepage::Ascii);
//! string.copy_from_byte_stream(&record[4..], Codepage::Ascii)?;
//! assert_eq!(string.utf8_string_size()?, 3);
//! assert_eq!(string.to_utf8_string()?, "ok");
//! # Ok::<(), fvalue::Error>(())
//! ```
//!
//! ## Two-phase text conversion
//!
//! ```rust
//! use fvalue::{Integer, IntegerFormat};
//!
//! let integer = Integer::from_value(0xbeef, 16)?;
//! let size = integer.string_size(IntegerFormat::HEXADECIMAL)?;
//!
//! let mut buffer = vec![0u16; size];
//! let mut index = 0;
//! integer.copy_to_utf16_string_with_index(&mut buffer, &mut index, IntegerFormat::HEXADECIMAL)?;
//! assert_eq!(index, size);
//! assert_eq!(String::from_utf16_lossy(&buffer[..size - 1]), "0xbeef");
//! # Ok::<(), fvalue::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events at `debug` and `trace` level, for example when borrowed data
//! is copied before a write or when the byte order of a mixed UTF-16 stream is detected. No
//! subscriber is installed.

#[macro_use]
pub(crate) mod error;

pub(crate) mod memory;

/// Fallible deep copies shared by every value object
pub mod clone;

/// Byte order handling for fixed-size numbers
pub mod io;

/// Byte buffers and the value entries defined over them
pub mod data_handle;

/// Numeric codecs and the code unit abstraction for text buffers
pub mod codec;

/// Strings stored as byte streams in a codepage
pub mod string;

/// Typed views over data handles
pub mod value;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use fvalue::prelude::*;
///
/// let value = FloatingPoint::from_bits(0x7f80_0000, 32)?;
/// assert_eq!(value.to_string_with_format(FloatingPointFormat::DECIMAL)?, "Inf");
/// # Ok::<(), fvalue::Error>(())
/// ```
pub mod prelude;

/// `fvalue` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `fvalue` Error type
///
/// # Examples
///
/// ```rust
/// use fvalue::{Error, Integer};
///
/// match Integer::new(12) {
///     Err(Error::InvalidArgument { message, .. }) => println!("rejected: {}", message),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
pub use error::Error;

pub use clone::{clone_optional, TryClone};
pub use codec::{
    floating_point::{
        FloatingPoint, FloatingPointFormat, FloatingPointFormatFlags, FloatingPointFormatType,
    },
    integer::{Integer, IntegerFormat, IntegerFormatFlags, IntegerFormatType},
};
pub use data_handle::{DataFlags, DataHandle, Encoding, ValueEntry};
pub use io::Endianness;
pub use string::{Codepage, StringValue};
pub use value::{Value, ValueInstance, ValueType};
