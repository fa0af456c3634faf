//! Single-byte codepages derived from Latin-1: ASCII, ISO 8859-1, 8859-9, 8859-11, 8859-15 and
//! Windows 1252.

use crate::{string::Codepage, Result};

/// Windows 1252 characters for bytes `0x80..=0x9f`; `None` marks unassigned bytes.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20ac}'),
    None,
    Some('\u{201a}'),
    Some('\u{0192}'),
    Some('\u{201e}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02c6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017d}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201c}'),
    Some('\u{201d}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02dc}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203a}'),
    Some('\u{0153}'),
    None,
    Some('\u{017e}'),
    Some('\u{0178}'),
];

/// Positions where ISO 8859-15 differs from ISO 8859-1.
const ISO_8859_15_DIFFERENCES: [(u8, char); 8] = [
    (0xa4, '\u{20ac}'),
    (0xa6, '\u{0160}'),
    (0xa8, '\u{0161}'),
    (0xb4, '\u{017d}'),
    (0xb8, '\u{017e}'),
    (0xbc, '\u{0152}'),
    (0xbd, '\u{0153}'),
    (0xbe, '\u{0178}'),
];

/// Positions where ISO 8859-9 differs from ISO 8859-1.
const ISO_8859_9_DIFFERENCES: [(u8, char); 6] = [
    (0xd0, '\u{011e}'),
    (0xdd, '\u{0130}'),
    (0xde, '\u{015e}'),
    (0xf0, '\u{011f}'),
    (0xfd, '\u{0131}'),
    (0xfe, '\u{015f}'),
];

/// ISO 8859-11 maps `0xa1..=0xda` and `0xdf..=0xfb` onto the Thai block in order.
const THAI_OFFSET: u32 = 0x0e01 - 0xa1;

fn is_thai_byte(byte: u8) -> bool {
    matches!(byte, 0xa1..=0xda | 0xdf..=0xfb)
}

/// Latin-1 with `differences` replacing some positions.
fn decode_latin1_variant(differences: &[(u8, char)], byte: u8) -> char {
    differences
        .iter()
        .find(|(position, _)| *position == byte)
        .map_or(char::from(byte), |(_, c)| *c)
}

fn encode_latin1_variant(differences: &[(u8, char)], c: char) -> Option<u8> {
    if let Some((byte, _)) = differences.iter().find(|(_, d)| *d == c) {
        return Some(*byte);
    }
    u8::try_from(u32::from(c))
        .ok()
        .filter(|byte| !differences.iter().any(|(p, _)| p == byte))
}

/// Decode one byte of a single-byte codepage.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] for bytes the codepage leaves unassigned, and
/// [`crate::Error::NotSupported`] if `codepage` is not a single-byte codepage.
pub(crate) fn decode_byte(codepage: Codepage, byte: u8) -> Result<char> {
    match codepage {
        Codepage::Ascii => {
            if byte.is_ascii() {
                Ok(char::from(byte))
            } else {
                Err(encoding_error!("Byte 0x{:02x} is not ASCII", byte))
            }
        }
        Codepage::Iso8859_1 => Ok(char::from(byte)),
        Codepage::Iso8859_9 => Ok(decode_latin1_variant(&ISO_8859_9_DIFFERENCES, byte)),
        Codepage::Iso8859_11 => match byte {
            0x00..=0xa0 => Ok(char::from(byte)),
            _ => Some(byte)
                .filter(|&byte| is_thai_byte(byte))
                .and_then(|byte| char::from_u32(u32::from(byte) + THAI_OFFSET))
                .ok_or_else(|| encoding_error!("Byte 0x{:02x} is unassigned in {}", byte, codepage)),
        },
        Codepage::Iso8859_15 => Ok(decode_latin1_variant(&ISO_8859_15_DIFFERENCES, byte)),
        Codepage::Windows1252 => match byte {
            0x80..=0x9f => WINDOWS_1252_HIGH[usize::from(byte - 0x80)].ok_or_else(|| {
                encoding_error!("Byte 0x{:02x} is unassigned in windows-1252", byte)
            }),
            _ => Ok(char::from(byte)),
        },
        _ => Err(crate::Error::NotSupported),
    }
}

/// Encode one character into a single-byte codepage.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] if the codepage cannot represent `c`, and
/// [`crate::Error::NotSupported`] if `codepage` is not a single-byte codepage.
pub(crate) fn encode_char(codepage: Codepage, c: char) -> Result<u8> {
    let unrepresentable = || {
        encoding_error!(
            "U+{:04X} cannot be encoded in {}",
            u32::from(c),
            codepage
        )
    };
    let code_point = u32::from(c);

    match codepage {
        Codepage::Ascii => u8::try_from(code_point)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(unrepresentable),
        Codepage::Iso8859_1 => u8::try_from(code_point).map_err(|_| unrepresentable()),
        Codepage::Iso8859_9 => {
            encode_latin1_variant(&ISO_8859_9_DIFFERENCES, c).ok_or_else(unrepresentable)
        }
        Codepage::Iso8859_11 => match code_point {
            0x00..=0xa0 => Ok(code_point as u8),
            0x0e01..=0x0e5b => u8::try_from(code_point - THAI_OFFSET)
                .ok()
                .filter(|&byte| is_thai_byte(byte))
                .ok_or_else(unrepresentable),
            _ => Err(unrepresentable()),
        },
        Codepage::Iso8859_15 => {
            encode_latin1_variant(&ISO_8859_15_DIFFERENCES, c).ok_or_else(unrepresentable)
        }
        Codepage::Windows1252 => {
            if let Some(position) = WINDOWS_1252_HIGH.iter().position(|d| *d == Some(c)) {
                return Ok(0x80 + position as u8);
            }
            match u8::try_from(code_point) {
                Ok(byte) if !(0x80..=0x9f).contains(&byte) => Ok(byte),
                _ => Err(unrepresentable()),
            }
        }
        _ => Err(crate::Error::NotSupported),
    }
}
