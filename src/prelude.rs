//! # fvalue Prelude
//!
//! The types needed to read typed values out of byte buffers and render them as text.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all fvalue operations
pub use crate::Error;

/// The result type used throughout fvalue
pub use crate::Result;

/// Fallible deep copies
pub use crate::{clone_optional, TryClone};

// ================================================================================================
// Data
// ================================================================================================

/// Byte buffers, their ownership and entries
pub use crate::{DataFlags, DataHandle, Encoding, ValueEntry};

/// Byte order of fixed-size numbers
pub use crate::Endianness;

// ================================================================================================
// Codecs
// ================================================================================================

/// Integers and their text formats
pub use crate::{Integer, IntegerFormat, IntegerFormatFlags, IntegerFormatType};

/// IEEE-754 values and their text formats
pub use crate::{
    FloatingPoint, FloatingPointFormat, FloatingPointFormatFlags, FloatingPointFormatType,
};

/// Strings and codepages
pub use crate::{Codepage, StringValue};

// ================================================================================================
// Values
// ================================================================================================

/// Typed views over data handles
pub use crate::{Value, ValueInstance, ValueType};
