//! UTF-7 (RFC 2152).
//!
//! Characters outside the directly encoded set are written as modified base64 of their UTF-16
//! code units between `+` and `-`. `+-` stands for a literal `+`.

use std::ops::ControlFlow;

use crate::Result;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_value(byte: u8) -> Option<u32> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u32::from(value))
}

/// Characters the encoder writes as themselves.
fn is_direct(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '\'' | '(' | ')' | ',' | '-' | '.' | '/' | ':' | '?')
        || matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Pairs UTF-16 code units coming out of base64 runs into characters.
#[derive(Default)]
struct Surrogates {
    high: Option<u16>,
}

impl Surrogates {
    fn push(&mut self, unit: u16) -> Result<Option<char>> {
        match (unit, self.high.take()) {
            (0xd800..=0xdbff, None) => {
                self.high = Some(unit);
                Ok(None)
            }
            (0xdc00..=0xdfff, Some(high)) => {
                let code_point =
                    0x1_0000 + ((u32::from(high) - 0xd800) << 10) + (u32::from(unit) - 0xdc00);
                char::from_u32(code_point)
                    .map(Some)
                    .ok_or_else(|| encoding_error!("Invalid UTF-7 code point 0x{:x}", code_point))
            }
            (_, Some(high)) => Err(encoding_error!(
                "Unpaired UTF-16 surrogate 0x{:04x} in UTF-7 stream",
                high
            )),
            (_, None) => char::from_u32(u32::from(unit))
                .map(Some)
                .ok_or_else(|| {
                    encoding_error!("Unpaired UTF-16 surrogate 0x{:04x} in UTF-7 stream", unit)
                }),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.high {
            Some(high) => Err(encoding_error!(
                "Unpaired UTF-16 surrogate 0x{:04x} in UTF-7 stream",
                high
            )),
            None => Ok(()),
        }
    }
}

/// Decode a UTF-7 byte stream.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] for bytes above `0x7f`, a `+` followed by neither base64
/// nor `-`, non-zero padding bits at the end of a base64 run, or unpaired surrogates.
pub(crate) fn decode<F>(bytes: &[u8], mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    let mut in_base64 = false;
    let mut run_length = 0;
    let mut bits: u32 = 0;
    let mut bit_count: u32 = 0;
    let mut surrogates = Surrogates::default();

    for (position, &byte) in bytes.iter().enumerate() {
        if !byte.is_ascii() {
            return Err(encoding_error!(
                "Byte 0x{:02x} at offset {} is not valid UTF-7",
                byte,
                position
            ));
        }

        if in_base64 {
            if let Some(value) = base64_value(byte) {
                bits = (bits << 6) | value;
                bit_count += 6;
                run_length += 1;

                if bit_count >= 16 {
                    bit_count -= 16;
                    let unit = (bits >> bit_count) as u16;
                    bits &= (1 << bit_count) - 1;

                    if let Some(c) = surrogates.push(unit)? {
                        if emit(c).is_break() {
                            return Ok(());
                        }
                    }
                }
                continue;
            }

            in_base64 = false;
            if run_length == 0 {
                if byte != b'-' {
                    return Err(encoding_error!(
                        "UTF-7 shift at offset {} is followed by 0x{:02x}",
                        position - 1,
                        byte
                    ));
                }
                if emit('+').is_break() {
                    return Ok(());
                }
                continue;
            }

            check_padding(bits, bit_count)?;
            surrogates.finish()?;
            bits = 0;
            bit_count = 0;
            if byte == b'-' {
                continue;
            }
        } else if byte == b'+' {
            in_base64 = true;
            run_length = 0;
            continue;
        }

        if emit(char::from(byte)).is_break() {
            return Ok(());
        }
    }

    if in_base64 {
        if run_length == 0 {
            return Err(encoding_error!("UTF-7 stream ends with a bare shift"));
        }
        check_padding(bits, bit_count)?;
    }
    surrogates.finish()
}

fn check_padding(bits: u32, bit_count: u32) -> Result<()> {
    if bit_count >= 6 || bits != 0 {
        return Err(encoding_error!(
            "UTF-7 base64 run ends with {} non-zero or excess bits",
            bit_count
        ));
    }
    Ok(())
}

/// Incremental UTF-7 encoder.
#[derive(Default)]
pub(crate) struct Encoder {
    in_base64: bool,
    bits: u32,
    bit_count: u32,
}

impl Encoder {
    pub(crate) fn push<F: FnMut(u8)>(&mut self, c: char, emit: &mut F) {
        if is_direct(c) {
            self.end_run(emit);
            emit(c as u8);
            return;
        }

        if c == '+' && !self.in_base64 {
            emit(b'+');
            emit(b'-');
            return;
        }

        if !self.in_base64 {
            emit(b'+');
            self.in_base64 = true;
        }

        let mut units = [0u16; 2];
        for &mut unit in c.encode_utf16(&mut units) {
            self.bits = (self.bits << 16) | u32::from(unit);
            self.bit_count += 16;
            while self.bit_count >= 6 {
                self.bit_count -= 6;
                emit(BASE64[((self.bits >> self.bit_count) & 0x3f) as usize]);
            }
            self.bits &= (1 << self.bit_count) - 1;
        }
    }

    pub(crate) fn finish<F: FnMut(u8)>(&mut self, emit: &mut F) {
        self.end_run(emit);
    }

    fn end_run<F: FnMut(u8)>(&mut self, emit: &mut F) {
        if !self.in_base64 {
            return;
        }
        if self.bit_count > 0 {
            emit(BASE64[((self.bits << (6 - self.bit_count)) & 0x3f) as usize]);
        }
        emit(b'-');

        self.in_base64 = false;
        self.bits = 0;
        self.bit_count = 0;
    }
}
