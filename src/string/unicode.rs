//! UTF-8, UTF-16 and UTF-32 byte streams, and byte-order detection for `1200-mixed` streams.

use std::ops::ControlFlow;

use crate::{string::Codepage, Result};

/// Decode a UTF-8 byte stream up to its first NUL byte.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] if the bytes before the terminator are not valid UTF-8.
pub(crate) fn decode_utf8<F>(bytes: &[u8], mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    let length = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = std::str::from_utf8(&bytes[..length]).map_err(|error| {
        encoding_error!(
            "Invalid UTF-8 sequence at byte {}",
            error.valid_up_to()
        )
    })?;

    for c in text.chars() {
        if emit(c).is_break() {
            break;
        }
    }
    Ok(())
}

/// Decode a UTF-16 byte stream.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] for an odd byte count or an unpaired surrogate before
/// `emit` asks to stop.
pub(crate) fn decode_utf16<F>(bytes: &[u8], big_endian: bool, mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    if bytes.len() % 2 != 0 {
        return Err(encoding_error!(
            "UTF-16 stream of {} bytes is not a multiple of 2",
            bytes.len()
        ));
    }

    let units = bytes.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });

    for decoded in char::decode_utf16(units) {
        let c = decoded.map_err(|error| {
            encoding_error!(
                "Unpaired UTF-16 surrogate 0x{:04x}",
                error.unpaired_surrogate()
            )
        })?;
        if emit(c).is_break() {
            break;
        }
    }
    Ok(())
}

/// Decode a UTF-32 byte stream.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] for a byte count that is not a multiple of four, or a
/// value that is not a Unicode scalar value, before `emit` asks to stop.
pub(crate) fn decode_utf32<F>(bytes: &[u8], big_endian: bool, mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    if bytes.len() % 4 != 0 {
        return Err(encoding_error!(
            "UTF-32 stream of {} bytes is not a multiple of 4",
            bytes.len()
        ));
    }

    for chunk in bytes.chunks_exact(4) {
        let quad = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let value = if big_endian {
            u32::from_be_bytes(quad)
        } else {
            u32::from_le_bytes(quad)
        };
        let c = char::from_u32(value)
            .ok_or_else(|| encoding_error!("Invalid UTF-32 code point 0x{:08x}", value))?;
        if emit(c).is_break() {
            break;
        }
    }
    Ok(())
}

/// Resolve a `1200-mixed` stream to a concrete codepage and the offset its content starts at.
///
/// A byte order mark selects UTF-16 of that byte order and is skipped. Without one, an even
/// length reads as UTF-16 little-endian and an odd length as ASCII.
pub(crate) fn detect_mixed(bytes: &[u8]) -> (Codepage, usize) {
    let detected = match bytes {
        [0xfe, 0xff, ..] => (Codepage::Utf16BigEndian, 2),
        [0xff, 0xfe, ..] => (Codepage::Utf16LittleEndian, 2),
        _ if bytes.len() % 2 == 0 => (Codepage::Utf16LittleEndian, 0),
        _ => (Codepage::Ascii, 0),
    };

    tracing::debug!(
        size = bytes.len(),
        codepage = %detected.0,
        "detected byte order of mixed UTF-16 stream"
    );
    detected
}

/// Append the UTF-16 encoding of `c` in the given byte order.
pub(crate) fn encode_utf16<F: FnMut(u8)>(c: char, big_endian: bool, emit: &mut F) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        let bytes = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        bytes.into_iter().for_each(&mut *emit);
    }
}

/// Append the UTF-32 encoding of `c` in the given byte order.
pub(crate) fn encode_utf32<F: FnMut(u8)>(c: char, big_endian: bool, emit: &mut F) {
    let value = u32::from(c);
    let bytes = if big_endian {
        value.to_be_bytes()
    } else {
        value.to_le_bytes()
    };
    bytes.into_iter().for_each(&mut *emit);
}

/// Append the UTF-8 encoding of `c`.
pub(crate) fn encode_utf8<F: FnMut(u8)>(c: char, emit: &mut F) {
    let mut buffer = [0u8; 4];
    c.encode_utf8(&mut buffer).bytes().for_each(&mut *emit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn collect_utf16(bytes: &[u8], big_endian: bool) -> Result<String> {
        let mut text = String::new();
        decode_utf16(bytes, big_endian, |c| {
            text.push(c);
            ControlFlow::Continue(())
        })?;
        Ok(text)
    }

    #[test]
    fn utf16_byte_orders() {
        assert_eq!(
            collect_utf16(&[0x00, 0x74, 0xd8, 0x3d, 0xde, 0x00], true).unwrap(),
            "t\u{1f600}"
        );
        assert_eq!(collect_utf16(&[0x74, 0x00], false).unwrap(), "t");
    }

    #[test]
    fn utf16_rejects_malformed() {
        assert!(matches!(
            collect_utf16(&[0x74, 0x00, 0x65], false),
            Err(Error::Encoding { .. })
        ));
        assert!(matches!(
            collect_utf16(&[0x3d, 0xd8, 0x74, 0x00], false),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn stops_on_break() {
        let mut seen = Vec::new();
        decode_utf32(&[0x61, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff], false, |c| {
            if c == '\0' {
                return ControlFlow::Break(());
            }
            seen.push(c);
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(seen, vec!['a']);

        assert!(decode_utf32(&[0; 6], false, |_| ControlFlow::Continue(())).is_err());
    }

    #[test]
    fn utf8_stops_at_nul() {
        let mut seen = String::new();
        decode_utf8(b"ab\0\xff", |c| {
            seen.push(c);
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(seen, "ab");
        assert!(decode_utf8(b"a\xc3", |_| ControlFlow::Continue(())).is_err());
    }

    #[test]
    fn mixed_detection() {
        assert_eq!(
            detect_mixed(&[0xfe, 0xff, 0x00, 0x74]),
            (Codepage::Utf16BigEndian, 2)
        );
        assert_eq!(
            detect_mixed(&[0xff, 0xfe, 0x74, 0x00]),
            (Codepage::Utf16LittleEndian, 2)
        );
        assert_eq!(detect_mixed(b"te"), (Codepage::Utf16LittleEndian, 0));
        assert_eq!(detect_mixed(b"tes"), (Codepage::Ascii, 0));
    }

    #[test]
    fn encoders() {
        let mut bytes = Vec::new();
        let mut push = |b: u8| bytes.push(b);
        encode_utf16('\u{1f600}', true, &mut push);
        encode_utf32('t', false, &mut push);
        encode_utf8('\u{e9}', &mut push);
        assert_eq!(
            bytes,
            vec![0xd8, 0x3d, 0xde, 0x00, 0x74, 0x00, 0x00, 0x00, 0xc3, 0xa9]
        );
    }
}
