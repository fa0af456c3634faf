//! Benchmarks for the value codecs.
//!
//! Tests conversion performance for:
//! - Integer byte stream reads and decimal/hexadecimal rendering
//! - Floating-point scientific rendering and parsing
//! - String transcoding from single-byte, double-byte, UTF-16 and SCSU streams
//! - Entry decoding through a typed value

extern crate fvalue;

use criterion::{criterion_group, criterion_main, Criterion};
use fvalue::{
    Codepage, DataFlags, Encoding, Endianness, FloatingPoint, FloatingPointFormat, Integer,
    IntegerFormat, StringValue, Value, ValueType,
};
use std::hint::black_box;

/// Benchmark reading a big-endian 64-bit integer and rendering it as signed decimal.
fn bench_integer_decimal(c: &mut Criterion) {
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x80];

    c.bench_function("integer_decimal", |b| {
        b.iter(|| {
            let mut integer = Integer::new(64).unwrap();
            integer
                .copy_from_byte_stream(black_box(&bytes), Endianness::Big)
                .unwrap();
            black_box(integer.to_string_with_format(IntegerFormat::DECIMAL_SIGNED).unwrap())
        });
    });
}

/// Benchmark rendering a 32-bit integer as hexadecimal into a caller buffer.
fn bench_integer_hexadecimal_utf16(c: &mut Criterion) {
    let integer = Integer::from_value(0xdead_beef, 32).unwrap();
    let mut buffer = [0u16; 16];

    c.bench_function("integer_hexadecimal_utf16", |b| {
        b.iter(|| {
            let mut index = 0;
            integer
                .copy_to_utf16_string_with_index(
                    black_box(&mut buffer),
                    &mut index,
                    IntegerFormat::HEXADECIMAL,
                )
                .unwrap();
            black_box(index)
        });
    });
}

/// Benchmark scientific rendering of a binary64 value.
fn bench_floating_point_decimal(c: &mut Criterion) {
    let value = FloatingPoint::from_bits(0x40b3_1a45_1eb8_51ec, 64).unwrap();

    c.bench_function("floating_point_decimal", |b| {
        b.iter(|| {
            black_box(
                black_box(value)
                    .to_string_with_format(FloatingPointFormat::DECIMAL)
                    .unwrap(),
            )
        });
    });
}

/// Benchmark parsing scientific text into a binary64 value.
fn bench_floating_point_parse(c: &mut Criterion) {
    let text = b"4.890270e+003\0";

    c.bench_function("floating_point_parse", |b| {
        b.iter(|| {
            let mut value = FloatingPoint::new(64).unwrap();
            let mut index = 0;
            value
                .copy_from_utf8_string_with_index(
                    black_box(text),
                    &mut index,
                    FloatingPointFormat::DECIMAL,
                )
                .unwrap();
            black_box(value)
        });
    });
}

/// Benchmark decoding a Windows-1252 stream to UTF-8.
fn bench_string_windows_1252(c: &mut Criterion) {
    let mut bytes = b"Caf\xe9 \x80 menu, \x93quoted\x94 text ".repeat(16);
    bytes.push(0);
    let mut string = StringValue::new(Codepage::Windows1252);
    string
        .copy_from_byte_stream(&bytes, Codepage::Windows1252)
        .unwrap();

    c.bench_function("string_windows_1252_to_utf8", |b| {
        b.iter(|| black_box(black_box(&string).to_utf8_string().unwrap()));
    });
}

/// Benchmark encoding Japanese text into Windows-932 and decoding it back to UTF-16.
fn bench_string_windows_932(c: &mut Criterion) {
    let text = "\u{65e5}\u{672c}\u{8a9e}\u{306e}\u{6587}\u{5b57}\u{5217} abc ".repeat(32);

    c.bench_function("string_windows_932_roundtrip", |b| {
        b.iter(|| {
            let string = StringValue::from_utf8(black_box(&text), Codepage::Windows932).unwrap();
            black_box(string.to_utf16_string().unwrap())
        });
    });
}

/// Benchmark decoding a UTF-16 little-endian stream to UTF-32.
fn bench_string_utf16(c: &mut Criterion) {
    let bytes: Vec<u8> = "Gr\u{fc}\u{df}e aus \u{65e5}\u{672c} \u{1f600} "
        .repeat(16)
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let mut string = StringValue::new(Codepage::Utf16LittleEndian);
    string
        .copy_from_byte_stream(&bytes, Codepage::Utf16LittleEndian)
        .unwrap();

    c.bench_function("string_utf16_to_utf32", |b| {
        b.iter(|| black_box(black_box(&string).to_utf32_string().unwrap()));
    });
}

/// Benchmark a UTF-8 to SCSU to UTF-8 round trip.
fn bench_string_scsu(c: &mut Criterion) {
    let text = "\u{d6}l flie\u{df}t ".repeat(32);

    c.bench_function("string_scsu_roundtrip", |b| {
        b.iter(|| {
            let string = StringValue::from_utf8(black_box(&text), Codepage::Scsu).unwrap();
            black_box(string.to_utf8_string().unwrap())
        });
    });
}

/// Benchmark decoding every entry of a little-endian 32-bit integer value.
fn bench_value_entries(c: &mut Criterion) {
    let data: Vec<u8> = (0u32..256).flat_map(u32::to_le_bytes).collect();
    let mut value = Value::new("counters", ValueType::UnsignedInteger32);
    value
        .set_data(&data, Encoding::ByteOrder(Endianness::Little), DataFlags::NON_MANAGED)
        .unwrap();
    for offset in (0..data.len()).step_by(4) {
        value.append_value_entry(offset, 4).unwrap();
    }

    c.bench_function("value_integer_entries", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for index in 0..value.number_of_value_entries() {
                sum += value.copy_to_integer(black_box(index)).unwrap().0;
            }
            black_box(sum)
        });
    });
}

criterion_group!(
    benches,
    // Integers
    bench_integer_decimal,
    bench_integer_hexadecimal_utf16,
    // Floating point
    bench_floating_point_decimal,
    bench_floating_point_parse,
    // Strings
    bench_string_windows_1252,
    bench_string_windows_932,
    bench_string_utf16,
    bench_string_scsu,
    // Values
    bench_value_entries,
);
criterion_main!(benches);
