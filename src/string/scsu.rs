//! Standard Compression Scheme for Unicode (Unicode Technical Standard #6).
//!
//! The decoder implements the complete scheme: static and dynamic windows, single-byte and
//! Unicode modes, quoting, window definition and extended (supplementary plane) windows. The
//! encoder produces a valid but simple stream that only uses the default dynamic windows and
//! quotes everything else.

use std::ops::ControlFlow;

use crate::Result;

const STATIC_WINDOWS: [u32; 8] = [
    0x0000, 0x0080, 0x0100, 0x0300, 0x2000, 0x2080, 0x2100, 0x3000,
];

const DEFAULT_DYNAMIC_WINDOWS: [u32; 8] = [
    0x0080, 0x00c0, 0x0400, 0x0600, 0x0900, 0x3040, 0x30a0, 0xff00,
];

// Single-byte mode tags
const SQ0: u8 = 0x01;
const SQ7: u8 = 0x08;
const SDX: u8 = 0x0b;
const SQU: u8 = 0x0e;
const SCU: u8 = 0x0f;
const SC0: u8 = 0x10;
const SC7: u8 = 0x17;
const SD0: u8 = 0x18;
const SD7: u8 = 0x1f;

// Unicode mode tags
const UC0: u8 = 0xe0;
const UC7: u8 = 0xe7;
const UD0: u8 = 0xe8;
const UD7: u8 = 0xef;
const UQU: u8 = 0xf0;
const UDX: u8 = 0xf1;

/// Offset selected by the window byte of an `SDn`/`UDn` tag.
fn window_offset(selector: u8) -> Result<u32> {
    match selector {
        0x01..=0x67 => Ok(u32::from(selector) * 0x80),
        0x68..=0xa7 => Ok(u32::from(selector) * 0x80 + 0xac00),
        0xf9 => Ok(0x00c0),
        0xfa => Ok(0x0250),
        0xfb => Ok(0x0370),
        0xfc => Ok(0x0530),
        0xfd => Ok(0x3040),
        0xfe => Ok(0x30a0),
        0xff => Ok(0xff60),
        _ => Err(encoding_error!(
            "Reserved SCSU window offset selector 0x{:02x}",
            selector
        )),
    }
}

/// Byte cursor over the compressed stream.
struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl Reader<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.position).copied();
        self.position += 1;
        byte
    }

    fn argument(&mut self) -> Result<u8> {
        self.read_byte().ok_or_else(|| {
            encoding_error!(
                "SCSU stream truncated inside a tag at offset {}",
                self.bytes.len()
            )
        })
    }

    fn unit(&mut self) -> Result<u16> {
        let high = self.argument()?;
        let low = self.argument()?;
        Ok(u16::from_be_bytes([high, low]))
    }
}

/// Decoder state plus the surrogate pairing of 16-bit units.
struct Decoder {
    windows: [u32; 8],
    active: usize,
    unicode_mode: bool,
    high_surrogate: Option<u16>,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            windows: DEFAULT_DYNAMIC_WINDOWS,
            active: 0,
            unicode_mode: false,
            high_surrogate: None,
        }
    }

    /// Resolve a code point or UTF-16 unit to a character, pairing surrogates.
    fn resolve(&mut self, value: u32) -> Result<Option<char>> {
        let pending = self.high_surrogate.take();
        match (value, pending) {
            (0xd800..=0xdbff, None) => {
                self.high_surrogate = Some(value as u16);
                Ok(None)
            }
            (0xdc00..=0xdfff, Some(high)) => {
                let code_point = 0x1_0000 + ((u32::from(high) - 0xd800) << 10) + (value - 0xdc00);
                Ok(char::from_u32(code_point))
            }
            (_, Some(high)) => Err(encoding_error!(
                "Unpaired UTF-16 surrogate 0x{:04x} in SCSU stream",
                high
            )),
            (_, None) => char::from_u32(value).map(Some).ok_or_else(|| {
                encoding_error!("Invalid code point 0x{:x} in SCSU stream", value)
            }),
        }
    }

    fn define_extended(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let high = reader.argument()?;
        let low = reader.argument()?;
        let window = usize::from(high >> 5);
        let index = (u32::from(high & 0x1f) << 8) | u32::from(low);

        self.windows[window] = 0x1_0000 + index * 0x80;
        self.active = window;
        Ok(())
    }

    /// Decode the next item; `None` when the tag only changed state.
    fn step(&mut self, lead: u8, reader: &mut Reader<'_>) -> Result<Option<u32>> {
        if self.unicode_mode {
            return self.step_unicode(lead, reader);
        }

        match lead {
            0x00 | 0x09 | 0x0a | 0x0d | 0x20..=0x7f => Ok(Some(u32::from(lead))),
            SQ0..=SQ7 => {
                let window = usize::from(lead - SQ0);
                let byte = reader.argument()?;
                if byte < 0x80 {
                    Ok(Some(STATIC_WINDOWS[window] + u32::from(byte)))
                } else {
                    Ok(Some(self.windows[window] + u32::from(byte - 0x80)))
                }
            }
            SDX => {
                self.define_extended(reader)?;
                Ok(None)
            }
            SQU => Ok(Some(u32::from(reader.unit()?))),
            SCU => {
                self.unicode_mode = true;
                Ok(None)
            }
            SC0..=SC7 => {
                self.active = usize::from(lead - SC0);
                Ok(None)
            }
            SD0..=SD7 => {
                let window = usize::from(lead - SD0);
                self.windows[window] = window_offset(reader.argument()?)?;
                self.active = window;
                Ok(None)
            }
            0x80..=0xff => Ok(Some(self.windows[self.active] + u32::from(lead - 0x80))),
            _ => Err(encoding_error!("Reserved SCSU tag 0x{:02x}", lead)),
        }
    }

    fn step_unicode(&mut self, lead: u8, reader: &mut Reader<'_>) -> Result<Option<u32>> {
        match lead {
            UC0..=UC7 => {
                self.active = usize::from(lead - UC0);
                self.unicode_mode = false;
                Ok(None)
            }
            UD0..=UD7 => {
                let window = usize::from(lead - UD0);
                self.windows[window] = window_offset(reader.argument()?)?;
                self.active = window;
                self.unicode_mode = false;
                Ok(None)
            }
            UQU => Ok(Some(u32::from(reader.unit()?))),
            UDX => {
                self.define_extended(reader)?;
                self.unicode_mode = false;
                Ok(None)
            }
            0xf2 => Err(encoding_error!("Reserved SCSU tag 0x{:02x}", lead)),
            _ => {
                let low = reader.argument()?;
                Ok(Some(u32::from(u16::from_be_bytes([lead, low]))))
            }
        }
    }
}

/// Decode an SCSU byte stream.
///
/// # Errors
/// Returns [`crate::Error::Encoding`] for reserved tags, truncated tags, reserved window
/// selectors and unpaired surrogates encountered before `emit` asks to stop.
pub(crate) fn decode<F>(bytes: &[u8], mut emit: F) -> Result<()>
where
    F: FnMut(char) -> ControlFlow<()>,
{
    let mut reader = Reader { bytes, position: 0 };
    let mut decoder = Decoder::new();

    while let Some(lead) = reader.read_byte() {
        let Some(value) = decoder.step(lead, &mut reader)? else {
            continue;
        };
        if let Some(c) = decoder.resolve(value)? {
            if emit(c).is_break() {
                return Ok(());
            }
        }
    }

    match decoder.high_surrogate {
        Some(high) => Err(encoding_error!(
            "Unpaired UTF-16 surrogate 0x{:04x} at end of SCSU stream",
            high
        )),
        None => Ok(()),
    }
}

/// Incremental SCSU encoder, single-byte mode only.
#[derive(Default)]
pub(crate) struct Encoder {
    active: usize,
}

impl Encoder {
    pub(crate) fn push<F: FnMut(u8)>(&mut self, c: char, emit: &mut F) {
        let code_point = u32::from(c);

        match code_point {
            0x00 | 0x09 | 0x0a | 0x0d | 0x20..=0x7f => {
                emit(code_point as u8);
                return;
            }
            0x01..=0x1f => {
                emit(SQ0);
                emit(code_point as u8);
                return;
            }
            _ => {}
        }

        let in_window = |offset: u32| (offset..offset + 0x80).contains(&code_point);

        if in_window(DEFAULT_DYNAMIC_WINDOWS[self.active]) {
            emit(0x80 + (code_point - DEFAULT_DYNAMIC_WINDOWS[self.active]) as u8);
            return;
        }

        if let Some(window) = DEFAULT_DYNAMIC_WINDOWS
            .iter()
            .position(|&offset| in_window(offset))
        {
            self.active = window;
            emit(SC0 + window as u8);
            emit(0x80 + (code_point - DEFAULT_DYNAMIC_WINDOWS[window]) as u8);
            return;
        }

        let mut units = [0u16; 2];
        for &mut unit in c.encode_utf16(&mut units) {
            let [high, low] = unit.to_be_bytes();
            emit(SQU);
            emit(high);
            emit(low);
        }
    }
}
