//! Value integration tests.
//!
//! Reads a small binary record with mixed field types through typed values that share one
//! borrowed buffer, and checks the rendering and write-back paths.

use fvalue::prelude::*;

/// A record with a big-endian header, a GUID and a Windows-1252 name
const RECORD: [u8; 36] = [
    // 0: int16 -2, uint32 0x01020304
    0xff, 0xfe, 0x01, 0x02, 0x03, 0x04,
    // 6: float32 -1.175494e-38
    0x80, 0x80, 0x00, 0x00,
    // 10: GUID d437908e-65e6-487c-9735-7bdff699bea5
    0xd4, 0x37, 0x90, 0x8e, 0x65, 0xe6, 0x48, 0x7c, 0x97, 0x35, 0x7b, 0xdf, 0xf6, 0x99, 0xbe,
    0xa5,
    // 26: windows-1252 "Caf\u{e9} \u{20ac}5"
    b'C', b'a', b'f', 0xe9, b' ', 0x80, b'5', 0x00,
    // 34: boolean
    0x00, 0x01,
];

/// Helper creating a value over one field of the record
fn field(
    identifier: &str,
    value_type: ValueType,
    encoding: Encoding,
    offset: usize,
    size: usize,
) -> Result<Value<'static>> {
    let mut value = Value::new(identifier, value_type);
    value.set_data(&RECORD, encoding, DataFlags::NON_MANAGED)?;
    value.append_value_entry(offset, size)?;
    Ok(value)
}

const BIG: Encoding = Encoding::ByteOrder(Endianness::Big);

#[test]
fn test_record_fields() -> Result<()> {
    let delta = field("delta", ValueType::Integer16, BIG, 0, 2)?;
    assert_eq!(delta.to_utf8_string(0)?, "-2");
    assert_eq!(delta.copy_to_integer(0)?, (0xfffe, 16));

    let flags = field("flags", ValueType::UnsignedInteger32, BIG, 2, 4)?;
    assert_eq!(flags.to_utf8_string(0)?, "16909060");

    let minimum = field("minimum", ValueType::FloatingPoint32, BIG, 6, 4)?;
    assert_eq!(minimum.to_utf8_string(0)?, "-1.175494e-038");
    assert_eq!(minimum.utf8_string_size(0)?, 15);

    let guid = field("id", ValueType::Guid, BIG, 10, 16)?;
    assert_eq!(guid.to_utf8_string(0)?, "d437908e-65e6-487c-9735-7bdff699bea5");

    let name = field(
        "name",
        ValueType::StringByteStream,
        Encoding::Codepage(Codepage::Windows1252),
        26,
        8,
    )?;
    assert_eq!(name.to_utf8_string(0)?, "Caf\u{e9} \u{20ac}5");
    assert_eq!(name.utf8_string_size(0)?, 11);

    let enabled = field("enabled", ValueType::Boolean, BIG, 34, 2)?;
    assert_eq!(enabled.to_utf8_string(0)?, "true");

    let raw = field("raw", ValueType::Binary, Encoding::Unspecified, 0, 6)?;
    assert_eq!(raw.to_utf8_string(0)?, "fffe01020304");

    Ok(())
}

#[test]
fn test_multiple_entries_share_buffer() -> Result<()> {
    let mut value = Value::new("bytes", ValueType::UnsignedInteger8);
    value.set_data(&RECORD, Encoding::Unspecified, DataFlags::NON_MANAGED)?;
    for offset in 26..30 {
        value.append_value_entry(offset, 1)?;
    }

    assert_eq!(value.number_of_value_entries(), 4);
    let rendered: Vec<String> = (0..4)
        .map(|index| value.to_utf8_string(index))
        .collect::<Result<_>>()?;
    assert_eq!(rendered, ["67", "97", "102", "233"]);

    assert!(matches!(
        value.instance(4),
        Err(Error::InvalidArgument { .. })
    ));

    Ok(())
}

#[test]
fn test_instances() -> Result<()> {
    let minimum = field("minimum", ValueType::FloatingPoint32, BIG, 6, 4)?;
    match minimum.instance(0)? {
        ValueInstance::FloatingPoint(value) => {
            assert_eq!(value.as_bits(), 0x8080_0000);
            assert_eq!(value.value_size(), 32);
        }
        other => panic!("unexpected instance {other:?}"),
    }

    let name = field(
        "name",
        ValueType::StringByteStream,
        Encoding::Codepage(Codepage::Windows1252),
        26,
        8,
    )?;
    match name.instance(0)? {
        ValueInstance::String(string) => {
            assert_eq!(string.codepage(), Codepage::Windows1252);
            assert_eq!(string.data(), &RECORD[26..34]);
        }
        other => panic!("unexpected instance {other:?}"),
    }

    Ok(())
}

#[test]
fn test_write_back_leaves_record_untouched() -> Result<()> {
    let mut flags = field("flags", ValueType::UnsignedInteger32, BIG, 2, 4)?;
    flags.copy_from_integer(0, 0xdead_beef)?;

    assert_eq!(flags.value_entry_data(0)?, &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(flags.to_utf8_string(0)?, "3735928559");
    assert_eq!(&RECORD[2..6], &[0x01, 0x02, 0x03, 0x04]);

    let mut minimum = field("minimum", ValueType::FloatingPoint32, BIG, 6, 4)?;
    minimum.copy_from_floating_point(0, 2.0)?;
    assert_eq!(minimum.value_entry_data(0)?, &[0x40, 0x00, 0x00, 0x00]);
    assert_eq!(minimum.copy_to_floating_point(0)?, 2.0);

    Ok(())
}

#[test]
fn test_clone_value() -> Result<()> {
    let mut name = field(
        "name",
        ValueType::StringByteStream,
        Encoding::Codepage(Codepage::Windows1252),
        26,
        8,
    )?;
    let copy = name.try_clone()?;
    name.set_identifier("renamed");

    assert_eq!(copy.identifier(), "name");
    assert_eq!(copy.data_handle().data_flags(), DataFlags::MANAGED);
    assert_eq!(copy.to_utf8_string(0)?, "Caf\u{e9} \u{20ac}5");

    let nothing: Option<&Value<'static>> = None;
    assert!(clone_optional(nothing)?.is_none());

    Ok(())
}
