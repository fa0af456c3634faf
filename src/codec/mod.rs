//! Numeric codecs: binary and textual representations of integers and IEEE-754 values.
//!
//! # Key Components
//!
//! - [`crate::codec::integer::Integer`] - 8, 16, 32 and 64-bit integers with decimal,
//!   hexadecimal and boolean text formats
//! - [`crate::codec::floating_point::FloatingPoint`] - binary32 and binary64 values kept as raw
//!   bit patterns, with hexadecimal and scientific decimal text formats
//! - [`crate::codec::text`] - the [`crate::codec::text::CodeUnit`] abstraction over UTF-8,
//!   UTF-16 and UTF-32 buffers and the shared index-based read/write helpers
//!
//! # Text API
//!
//! Every codec follows the same two-phase pattern:
//!
//! 1. `string_size(format)` returns the exact number of code units, terminator included
//! 2. `copy_to_utf{8,16,32}_string_with_index(buffer, &mut index, format)` writes them at
//!    `*index` and advances the cursor past the terminator
//!
//! Parsing mirrors it with `copy_from_utf{8,16,32}_string_with_index`. A failed call leaves both
//! the cursor and the value untouched.

pub mod floating_point;
pub mod integer;
pub mod text;
