//! Value types and the entry widths they imply.

use strum::{Display, EnumCount, EnumIter};

/// The interpretation applied to every entry of a [`crate::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum ValueType {
    /// Opaque bytes, rendered as lowercase base 16
    #[strum(serialize = "binary")]
    Binary,
    /// An integer of the entry's width, rendered as `true` or `false`
    #[strum(serialize = "boolean")]
    Boolean,
    /// Signed 8-bit integer
    #[strum(serialize = "int8")]
    Integer8,
    /// Signed 16-bit integer
    #[strum(serialize = "int16")]
    Integer16,
    /// Signed 32-bit integer
    #[strum(serialize = "int32")]
    Integer32,
    /// Signed 64-bit integer
    #[strum(serialize = "int64")]
    Integer64,
    /// Unsigned 8-bit integer
    #[strum(serialize = "uint8")]
    UnsignedInteger8,
    /// Unsigned 16-bit integer
    #[strum(serialize = "uint16")]
    UnsignedInteger16,
    /// Unsigned 32-bit integer
    #[strum(serialize = "uint32")]
    UnsignedInteger32,
    /// Unsigned 64-bit integer
    #[strum(serialize = "uint64")]
    UnsignedInteger64,
    /// IEEE-754 binary32
    #[strum(serialize = "float32")]
    FloatingPoint32,
    /// IEEE-754 binary64
    #[strum(serialize = "float64")]
    FloatingPoint64,
    /// A string in the codepage named by the data handle encoding
    #[strum(serialize = "string")]
    StringByteStream,
    /// A UTF-16 string in the byte order named by the data handle encoding
    #[strum(serialize = "utf16-string")]
    StringUtf16,
    /// A UTF-32 string in the byte order named by the data handle encoding
    #[strum(serialize = "utf32-string")]
    StringUtf32,
    /// A 16-byte GUID
    #[strum(serialize = "guid")]
    Guid,
}

impl ValueType {
    /// Width in bits of the fixed-size integer types. [`ValueType::Boolean`] takes the width of
    /// its entry and returns `None`, as do all non-integer types.
    #[must_use]
    pub fn integer_size(self) -> Option<usize> {
        match self {
            ValueType::Integer8 | ValueType::UnsignedInteger8 => Some(8),
            ValueType::Integer16 | ValueType::UnsignedInteger16 => Some(16),
            ValueType::Integer32 | ValueType::UnsignedInteger32 => Some(32),
            ValueType::Integer64 | ValueType::UnsignedInteger64 => Some(64),
            _ => None,
        }
    }

    /// Width in bits of the floating-point types.
    #[must_use]
    pub fn floating_point_size(self) -> Option<usize> {
        match self {
            ValueType::FloatingPoint32 => Some(32),
            ValueType::FloatingPoint64 => Some(64),
            _ => None,
        }
    }

    /// True for the signed integer types.
    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ValueType::Integer8 | ValueType::Integer16 | ValueType::Integer32 | ValueType::Integer64
        )
    }

    /// True for the types decoded into an [`crate::Integer`].
    #[must_use]
    pub fn is_integer(self) -> bool {
        self == ValueType::Boolean || self.integer_size().is_some()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn widths() {
        assert_eq!(ValueType::Integer16.integer_size(), Some(16));
        assert_eq!(ValueType::UnsignedInteger64.integer_size(), Some(64));
        assert_eq!(ValueType::Boolean.integer_size(), None);
        assert_eq!(ValueType::FloatingPoint32.floating_point_size(), Some(32));
        assert_eq!(ValueType::Guid.floating_point_size(), None);
    }

    #[test]
    fn classification() {
        let signed: Vec<ValueType> = ValueType::iter().filter(|t| t.is_signed()).collect();
        assert_eq!(signed.len(), 4);

        let integers = ValueType::iter().filter(|t| t.is_integer()).count();
        assert_eq!(integers, 9);
        assert_eq!(ValueType::COUNT, 16);
    }

    #[test]
    fn display() {
        assert_eq!(ValueType::StringUtf16.to_string(), "utf16-string");
        assert_eq!(ValueType::UnsignedInteger8.to_string(), "uint8");
    }
}
