#![no_main]

use fvalue::{Codepage, StringValue};
use libfuzzer_sys::fuzz_target;
use strum::IntoEnumIterator;

fuzz_target!(|data: &[u8]| {
    for codepage in Codepage::iter() {
        let mut string = StringValue::new(codepage);
        if string.copy_from_byte_stream(data, codepage).is_err() {
            continue;
        }

        let Ok(size) = string.utf16_string_size() else {
            continue;
        };
        let mut buffer = vec![0u16; size];
        let mut index = 0;
        string
            .copy_to_utf16_string_with_index(&mut buffer, &mut index)
            .expect("sized buffer must hold the decoded string");
        assert_eq!(index, size);

        if let Ok(text) = string.to_utf8_string() {
            if codepage.is_writable() && !text.contains('\0') {
                let _ = StringValue::from_utf8(&text, codepage);
            }
        }
    }
});
