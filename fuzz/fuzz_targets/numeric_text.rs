#![no_main]

use fvalue::{FloatingPoint, FloatingPointFormat, Integer, IntegerFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for value_size in [8, 16, 32, 64] {
        for format in [
            IntegerFormat::DECIMAL_SIGNED,
            IntegerFormat::DECIMAL_UNSIGNED,
            IntegerFormat::HEXADECIMAL,
            IntegerFormat::BOOLEAN,
        ] {
            let mut integer = Integer::new(value_size).expect("supported width");
            let mut index = 0;
            if integer
                .copy_from_utf8_string_with_index(data, &mut index, format)
                .is_ok()
            {
                assert!(index <= data.len());
            }
        }
    }

    for value_size in [32, 64] {
        for format in [FloatingPointFormat::DECIMAL, FloatingPointFormat::HEXADECIMAL] {
            let mut value = FloatingPoint::new(value_size).expect("supported width");
            let mut index = 0;
            if value
                .copy_from_utf8_string_with_index(data, &mut index, format)
                .is_ok()
            {
                let size = value.string_size(format).expect("renderable");
                let text = value.to_string_with_format(format).expect("renderable");
                assert_eq!(text.len() + 1, size);
            }
        }
    }
});
