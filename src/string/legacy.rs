//! Table-driven legacy code pages: the remaining ISO 8859 parts, KOI8, the Windows 874 and
//! 1250-1258 families and the double-byte East Asian code pages.
//!
//! The mapping tables are the WHATWG indexes shipped with `encoding_rs`. Decoding runs without
//! replacement, so a byte sequence a table leaves unassigned is an error instead of U+FFFD.

use std::ops::ControlFlow;

use encoding_rs::EncoderResult;

use crate::{string::Codepage, Error, Result};

/// The `encoding_rs` table behind a legacy codepage.
///
/// # Errors
/// Returns [`Error::NotSupported`] for codepages not backed by a table.
pub(crate) fn encoding(codepage: Codepage) -> Result<&'static encoding_rs::Encoding> {
    Ok(match codepage {
        Codepage::Iso8859_2 => encoding_rs::ISO_8859_2,
        Codepage::Iso8859_3 => encoding_rs::ISO_8859_3,
        Codepage::Iso8859_4 => encoding_rs::ISO_8859_4,
        Codepage::Iso8859_5 => encoding_rs::ISO_8859_5,
        Codepage::Iso8859_6 => encoding_rs::ISO_8859_6,
        Codepage::Iso8859_7 => encoding_rs::ISO_8859_7,
        Codepage::Iso8859_8 => encoding_rs::ISO_8859_8,
        Codepage::Iso8859_10 => encoding_rs::ISO_8859_10,
        Codepage::Iso8859_13 => encoding_rs::ISO_8859_13,
        Codepage::Iso8859_14 => encoding_rs::ISO_8859_14,
        Codepage::Iso8859_16 => encoding_rs::ISO_8859_16,
        Codepage::Koi8R => encoding_rs::KOI8_R,
        Codepage::Koi8U => encoding_rs::KOI8_U,
        Codepage::Windows874 => encoding_rs::WINDOWS_874,
        Codepage::Windows1250 => encoding_rs::WINDOWS_1250,
        Codepage::Windows1251 => encoding_rs::WINDOWS_1251,
        Codepage::Windows1253 => encoding_rs::WINDOWS_1253,
        Codepage::Windows1254 => encoding_rs::WINDOWS_1254,
        Codepage::Windows1255 => encoding_rs::WINDOWS_1255,
        Codepage::Windows1256 => encoding_rs::WINDOWS_1256,
        Codepage::Windows1257 => encoding_rs::WINDOWS_1257,
        Codepage::Windows1258 => encoding_rs::WINDOWS_1258,
        Codepage::Windows932 => encoding_rs::SHIFT_JIS,
        Codepage::Windows936 => encoding_rs::GBK,
        Codepage::Windows949 => encoding_rs::EUC_KR,
        Codepage::Windows950 => encoding_rs::BIG5,
        _ => return Err(Error::NotSupported),
    })
}

/// Decode `bytes` with a table-driven codepage.
///
/// No trail byte of the supported double-byte code pages is `0x00`, so the stream is cut at its
/// first zero byte before the table sees it.
pub(crate) fn decode<F>(bytes: &[u8], codepage: Codepage, mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    let table = encoding(codepage)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());

    let text = table
        .decode_without_bom_handling_and_without_replacement(&bytes[..end])
        .ok_or_else(|| encoding_error!("Byte stream is not valid {}", codepage))?;

    for c in text.chars() {
        if emit(c).is_break() {
            break;
        }
    }
    Ok(())
}

/// Character-at-a-time encoder over an `encoding_rs` table.
pub(crate) struct Encoder {
    codepage: Codepage,
    inner: encoding_rs::Encoder,
}

impl Encoder {
    pub(crate) fn new(codepage: Codepage) -> Result<Self> {
        Ok(Encoder {
            codepage,
            inner: encoding(codepage)?.new_encoder(),
        })
    }

    pub(crate) fn push<F: FnMut(u8)>(&mut self, c: char, emit: &mut F) -> Result<()> {
        let mut source = [0u8; 4];
        let mut bytes = [0u8; 8];

        let (result, _, written) = self.inner.encode_from_utf8_without_replacement(
            c.encode_utf8(&mut source),
            &mut bytes,
            false,
        );

        match result {
            EncoderResult::InputEmpty => {
                bytes[..written].iter().for_each(|&b| emit(b));
                Ok(())
            }
            EncoderResult::Unmappable(_) | EncoderResult::OutputFull => Err(encoding_error!(
                "U+{:04X} cannot be encoded in {}",
                u32::from(c),
                self.codepage
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(bytes: &[u8], codepage: Codepage) -> Result<String> {
        let mut text = String::new();
        decode(bytes, codepage, |c| {
            text.push(c);
            ControlFlow::Continue(())
        })?;
        Ok(text)
    }

    fn encoded(text: &str, codepage: Codepage) -> Result<Vec<u8>> {
        let mut encoder = Encoder::new(codepage)?;
        let mut bytes = Vec::new();
        for c in text.chars() {
            encoder.push(c, &mut |b| bytes.push(b))?;
        }
        Ok(bytes)
    }

    #[test]
    fn single_byte_tables() {
        assert_eq!(decoded(&[0xa3, 0xb1], Codepage::Iso8859_2).unwrap(), "\u{141}\u{105}");
        assert_eq!(decoded(&[0xc1, 0xc2], Codepage::Iso8859_5).unwrap(), "\u{421}\u{422}");
        assert_eq!(decoded(&[0xe1], Codepage::Iso8859_7).unwrap(), "\u{3b1}");
        assert_eq!(decoded(&[0xc1, 0xd7], Codepage::Koi8R).unwrap(), "\u{430}\u{432}");
        assert_eq!(decoded(&[0xa4], Codepage::Koi8U).unwrap(), "\u{454}");
        assert_eq!(decoded(&[0xa1], Codepage::Windows874).unwrap(), "\u{e01}");
        assert_eq!(decoded(&[0x8a, 0x9a], Codepage::Windows1250).unwrap(), "\u{160}\u{161}");
        assert_eq!(decoded(&[0xc0], Codepage::Windows1251).unwrap(), "\u{410}");
        assert_eq!(decoded(&[0xd0], Codepage::Windows1254).unwrap(), "\u{11e}");

        assert_eq!(encoded("\u{141}", Codepage::Iso8859_2).unwrap(), [0xa3]);
        assert_eq!(encoded("\u{410}", Codepage::Windows1251).unwrap(), [0xc0]);
        assert!(encoded("\u{410}", Codepage::Windows1250).is_err());
    }

    #[test]
    fn unassigned_bytes() {
        assert!(matches!(
            decoded(&[0xa1], Codepage::Iso8859_6),
            Err(Error::Encoding { .. })
        ));
        assert!(decoded(&[0xff], Codepage::Iso8859_8).is_err());
    }

    #[test]
    fn double_byte_tables() {
        assert_eq!(decoded(&[0x82, 0xa0], Codepage::Windows932).unwrap(), "\u{3042}");
        assert_eq!(decoded(&[0xc4, 0xe3], Codepage::Windows936).unwrap(), "\u{4f60}");
        assert_eq!(decoded(&[0xb0, 0xa1], Codepage::Windows949).unwrap(), "\u{ac00}");
        assert_eq!(decoded(&[0xa4, 0x40], Codepage::Windows950).unwrap(), "\u{4e00}");

        assert_eq!(
            encoded("a\u{3042}", Codepage::Windows932).unwrap(),
            [0x61, 0x82, 0xa0]
        );
        assert_eq!(encoded("\u{ac00}", Codepage::Windows949).unwrap(), [0xb0, 0xa1]);
        assert!(encoded("\u{e01}", Codepage::Windows950).is_err());
    }

    #[test]
    fn truncated_lead_byte() {
        assert!(decoded(&[0x61, 0x82], Codepage::Windows932).is_err());
        assert!(decoded(&[0x82, 0x00, 0x61], Codepage::Windows932).is_err());
        assert_eq!(decoded(&[0x61, 0x00, 0x82], Codepage::Windows932).unwrap(), "a");
    }

    #[test]
    fn not_table_driven() {
        assert!(matches!(encoding(Codepage::Utf8), Err(Error::NotSupported)));
        assert!(Encoder::new(Codepage::Windows1252).is_err());
    }
}
