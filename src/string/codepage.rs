//! Supported codepages and their Windows code page numbers.

use strum::{Display, EnumCount, EnumIter};

use crate::Result;

/// Encodings a stored string byte stream can be in.
///
/// Numeric identifiers follow the Windows code page numbering. SCSU and the byte-order detecting
/// UTF-16 variant have no such number.
///
/// ## Categories
///
/// ### Single byte
/// - **`Ascii`**: 7-bit, bytes above `0x7f` are rejected
/// - **`Iso8859_1`** to **`Iso8859_16`**: every ISO 8859 part except the abandoned part 12
/// - **`Koi8R`**, **`Koi8U`**: Cyrillic
/// - **`Windows874`** and **`Windows1250`** to **`Windows1258`**
///
/// Bytes a single-byte table leaves unassigned are rejected when decoding.
///
/// ### Double byte
/// - **`Windows932`** (Shift JIS), **`Windows936`** (GBK), **`Windows949`** (Unified Hangul Code)
///   and **`Windows950`** (Big5)
///
/// A lead byte without a valid trail byte is rejected when decoding.
///
/// ### Unicode transformation formats
/// - **`Utf7`**, **`Utf8`**, **`Utf16BigEndian`**, **`Utf16LittleEndian`**,
///   **`Utf32BigEndian`**, **`Utf32LittleEndian`**
///
/// ### Compressed and detected
/// - **`Scsu`**: the Standard Compression Scheme for Unicode
/// - **`Utf16Mixed`**: read only; the byte order is detected from a byte order mark, and streams
///   without one are UTF-16 little-endian when their length is even and ASCII otherwise
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumCount)]
pub enum Codepage {
    /// US-ASCII
    #[strum(serialize = "ascii")]
    Ascii,
    /// ISO 8859-1, Latin-1
    #[strum(serialize = "iso-8859-1")]
    Iso8859_1,
    /// ISO 8859-2, Central European
    #[strum(serialize = "iso-8859-2")]
    Iso8859_2,
    /// ISO 8859-3, South European
    #[strum(serialize = "iso-8859-3")]
    Iso8859_3,
    /// ISO 8859-4, North European
    #[strum(serialize = "iso-8859-4")]
    Iso8859_4,
    /// ISO 8859-5, Cyrillic
    #[strum(serialize = "iso-8859-5")]
    Iso8859_5,
    /// ISO 8859-6, Arabic
    #[strum(serialize = "iso-8859-6")]
    Iso8859_6,
    /// ISO 8859-7, Greek
    #[strum(serialize = "iso-8859-7")]
    Iso8859_7,
    /// ISO 8859-8, Hebrew
    #[strum(serialize = "iso-8859-8")]
    Iso8859_8,
    /// ISO 8859-9, Turkish
    #[strum(serialize = "iso-8859-9")]
    Iso8859_9,
    /// ISO 8859-10, Nordic
    #[strum(serialize = "iso-8859-10")]
    Iso8859_10,
    /// ISO 8859-11, Thai
    #[strum(serialize = "iso-8859-11")]
    Iso8859_11,
    /// ISO 8859-13, Baltic
    #[strum(serialize = "iso-8859-13")]
    Iso8859_13,
    /// ISO 8859-14, Celtic
    #[strum(serialize = "iso-8859-14")]
    Iso8859_14,
    /// ISO 8859-15, Latin-9
    #[strum(serialize = "iso-8859-15")]
    Iso8859_15,
    /// ISO 8859-16, South-Eastern European
    #[strum(serialize = "iso-8859-16")]
    Iso8859_16,
    /// KOI8-R, Russian
    #[strum(serialize = "koi8-r")]
    Koi8R,
    /// KOI8-U, Ukrainian
    #[strum(serialize = "koi8-u")]
    Koi8U,
    /// Windows 874, Thai
    #[strum(serialize = "windows-874")]
    Windows874,
    /// Windows 932, Japanese Shift JIS
    #[strum(serialize = "windows-932")]
    Windows932,
    /// Windows 936, Simplified Chinese GBK
    #[strum(serialize = "windows-936")]
    Windows936,
    /// Windows 949, Korean Unified Hangul Code
    #[strum(serialize = "windows-949")]
    Windows949,
    /// Windows 950, Traditional Chinese Big5
    #[strum(serialize = "windows-950")]
    Windows950,
    /// Windows 1250, Central European
    #[strum(serialize = "windows-1250")]
    Windows1250,
    /// Windows 1251, Cyrillic
    #[strum(serialize = "windows-1251")]
    Windows1251,
    /// Windows 1252, Western European
    #[strum(serialize = "windows-1252")]
    Windows1252,
    /// Windows 1253, Greek
    #[strum(serialize = "windows-1253")]
    Windows1253,
    /// Windows 1254, Turkish
    #[strum(serialize = "windows-1254")]
    Windows1254,
    /// Windows 1255, Hebrew
    #[strum(serialize = "windows-1255")]
    Windows1255,
    /// Windows 1256, Arabic
    #[strum(serialize = "windows-1256")]
    Windows1256,
    /// Windows 1257, Baltic
    #[strum(serialize = "windows-1257")]
    Windows1257,
    /// Windows 1258, Vietnamese
    #[strum(serialize = "windows-1258")]
    Windows1258,
    /// UTF-7
    #[strum(serialize = "utf-7")]
    Utf7,
    /// UTF-8
    #[strum(serialize = "utf-8")]
    Utf8,
    /// UTF-16 big-endian
    #[strum(serialize = "utf-16be")]
    Utf16BigEndian,
    /// UTF-16 little-endian
    #[strum(serialize = "utf-16le")]
    Utf16LittleEndian,
    /// UTF-32 big-endian
    #[strum(serialize = "utf-32be")]
    Utf32BigEndian,
    /// UTF-32 little-endian
    #[strum(serialize = "utf-32le")]
    Utf32LittleEndian,
    /// Standard Compression Scheme for Unicode
    #[strum(serialize = "scsu")]
    Scsu,
    /// UTF-16 with detected byte order, read only
    #[strum(serialize = "1200-mixed")]
    Utf16Mixed,
}

impl Codepage {
    /// The Windows code page number, if the encoding has one.
    #[must_use]
    pub fn id(self) -> Option<u32> {
        match self {
            Codepage::Ascii => Some(20127),
            Codepage::Iso8859_1 => Some(28591),
            Codepage::Iso8859_2 => Some(28592),
            Codepage::Iso8859_3 => Some(28593),
            Codepage::Iso8859_4 => Some(28594),
            Codepage::Iso8859_5 => Some(28595),
            Codepage::Iso8859_6 => Some(28596),
            Codepage::Iso8859_7 => Some(28597),
            Codepage::Iso8859_8 => Some(28598),
            Codepage::Iso8859_9 => Some(28599),
            Codepage::Iso8859_10 => Some(28600),
            Codepage::Iso8859_11 => Some(28601),
            Codepage::Iso8859_13 => Some(28603),
            Codepage::Iso8859_14 => Some(28604),
            Codepage::Iso8859_15 => Some(28605),
            Codepage::Iso8859_16 => Some(28606),
            Codepage::Koi8R => Some(20866),
            Codepage::Koi8U => Some(21866),
            Codepage::Windows874 => Some(874),
            Codepage::Windows932 => Some(932),
            Codepage::Windows936 => Some(936),
            Codepage::Windows949 => Some(949),
            Codepage::Windows950 => Some(950),
            Codepage::Windows1250 => Some(1250),
            Codepage::Windows1251 => Some(1251),
            Codepage::Windows1252 => Some(1252),
            Codepage::Windows1253 => Some(1253),
            Codepage::Windows1254 => Some(1254),
            Codepage::Windows1255 => Some(1255),
            Codepage::Windows1256 => Some(1256),
            Codepage::Windows1257 => Some(1257),
            Codepage::Windows1258 => Some(1258),
            Codepage::Utf7 => Some(65000),
            Codepage::Utf8 => Some(65001),
            Codepage::Utf16BigEndian => Some(1201),
            Codepage::Utf16LittleEndian => Some(1200),
            Codepage::Utf32BigEndian => Some(12001),
            Codepage::Utf32LittleEndian => Some(12000),
            Codepage::Scsu | Codepage::Utf16Mixed => None,
        }
    }

    /// Look up a codepage by its Windows code page number.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for numbers outside the supported set.
    pub fn from_id(id: u32) -> Result<Codepage> {
        match id {
            20127 => Ok(Codepage::Ascii),
            28591 => Ok(Codepage::Iso8859_1),
            28592 => Ok(Codepage::Iso8859_2),
            28593 => Ok(Codepage::Iso8859_3),
            28594 => Ok(Codepage::Iso8859_4),
            28595 => Ok(Codepage::Iso8859_5),
            28596 => Ok(Codepage::Iso8859_6),
            28597 => Ok(Codepage::Iso8859_7),
            28598 => Ok(Codepage::Iso8859_8),
            28599 => Ok(Codepage::Iso8859_9),
            28600 => Ok(Codepage::Iso8859_10),
            28601 => Ok(Codepage::Iso8859_11),
            28603 => Ok(Codepage::Iso8859_13),
            28604 => Ok(Codepage::Iso8859_14),
            28605 => Ok(Codepage::Iso8859_15),
            28606 => Ok(Codepage::Iso8859_16),
            20866 => Ok(Codepage::Koi8R),
            21866 => Ok(Codepage::Koi8U),
            874 => Ok(Codepage::Windows874),
            932 => Ok(Codepage::Windows932),
            936 => Ok(Codepage::Windows936),
            949 => Ok(Codepage::Windows949),
            950 => Ok(Codepage::Windows950),
            1250 => Ok(Codepage::Windows1250),
            1251 => Ok(Codepage::Windows1251),
            1252 => Ok(Codepage::Windows1252),
            1253 => Ok(Codepage::Windows1253),
            1254 => Ok(Codepage::Windows1254),
            1255 => Ok(Codepage::Windows1255),
            1256 => Ok(Codepage::Windows1256),
            1257 => Ok(Codepage::Windows1257),
            1258 => Ok(Codepage::Windows1258),
            65000 => Ok(Codepage::Utf7),
            65001 => Ok(Codepage::Utf8),
            1201 => Ok(Codepage::Utf16BigEndian),
            1200 => Ok(Codepage::Utf16LittleEndian),
            12001 => Ok(Codepage::Utf32BigEndian),
            12000 => Ok(Codepage::Utf32LittleEndian),
            _ => Err(invalid_argument_error!("Unsupported codepage - {}", id)),
        }
    }

    /// Returns false for encodings that can only be read.
    #[must_use]
    pub fn is_writable(self) -> bool {
        self != Codepage::Utf16Mixed
    }
}
