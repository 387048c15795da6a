use crate::address::Address;
use crate::decoder::{RecordStreamDecoder, StreamScope, Tag};
use crate::error::DecodeError;
use crate::record::{Coords, IdPair, IdTriple, InteractionMode, RecordKind};
use test_log::test;

// Streams in these tests live in bank 0, where offsets are linear
fn at(offset: u16) -> Address {
    Address::new(0, offset)
}

fn image(parts: &[(u16, &[u8])]) -> Vec<u8> {
    let mut memory = vec![0u8; 0x100];
    for (offset, bytes) in parts {
        let start = *offset as usize;
        memory[start..start + bytes.len()].copy_from_slice(bytes);
    }
    memory
}

#[test]
fn test_empty_room() {
    let memory = image(&[(0, &[0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_random_entities_is_a_single_record() {
    // three random entities, param 2, then bytes that would be entries if
    // the group repeated
    let memory = image(&[(0, &[0xf6, 0x62, 0x09, 0x01, 0x10, 0x20, 0x30, 0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, at(1));
    assert_eq!(
        records[0].kind,
        RecordKind::RandomEntities {
            count: 3,
            param: 2,
            id: IdPair::new(0x09, 0x01),
        }
    );
}

#[test]
fn test_double_value_coords_are_row_first() {
    let memory = image(&[(0, &[0xf2, 0xdc, 0x01, 0x18, 0x28, 0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, at(1));
    assert_eq!(records[0].coords(), Some(Coords::new(0x18, 0x28)));
    assert_eq!(records[0].primary_id(), 0xdc);
    assert_eq!(records[0].sub_id(), Some(0x01));
}

#[test]
fn test_groups_repeat_until_a_mode_byte() {
    let memory = image(&[(
        0,
        &[
            0xf7, 0x00, // param
            0x09, 0x01, 0x58, 0x48, // entry one
            0x31, 0x00, 0x28, 0x38, // entry two
            0xf1, 0x12, 0x00, 0xff,
        ],
    )]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    let modes: Vec<InteractionMode> = records.iter().map(|r| r.mode()).collect();
    assert_eq!(
        modes,
        vec![
            InteractionMode::SpecificEntity,
            InteractionMode::SpecificEntity,
            InteractionMode::NoValue
        ]
    );
    let addresses: Vec<Address> = records.iter().map(|r| r.address).collect();
    assert_eq!(addresses, vec![at(2), at(6), at(11)]);
}

#[test]
fn test_part_unpacks_position() {
    let memory = image(&[(0, &[0xf8, 0x13, 0x00, 0x23, 0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(
        records[0].kind,
        RecordKind::Part {
            id: IdPair::new(0x13, 0x00),
            coords: Coords::new(0x28, 0x38),
        }
    );
}

#[test]
fn test_param_object_and_item_drops() {
    let memory = image(&[(
        0,
        &[
            0xf9, 0x01, 0x40, 0x00, 0x07, 0x38, 0x48, // one param object
            0xfa, 0x02, 0x05, 0x23, 0x06, 0x45, // two drops
            0xff,
        ],
    )]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0].kind,
        RecordKind::ParamObject {
            param: 0x01,
            id: IdTriple {
                id: 0x40,
                sub_id: 0x00,
                extra: 0x07
            },
            coords: Coords::new(0x38, 0x48),
        }
    );
    assert_eq!(records[1].address, at(9));
    assert_eq!(
        records[2].kind,
        RecordKind::ItemDrop {
            param: 0x02,
            id: 0x06,
            coords: Coords::unpack(0x45),
        }
    );
    assert_eq!(records[2].address, at(11));
}

#[test]
fn test_pointer_resumes_after_itself() {
    let memory = image(&[
        (0, &[0xf3, 0x40, 0x00, 0xf7, 0x00, 0x09, 0x01, 0x58, 0x48, 0xff]),
        (0x40, &[0xf1, 0xaa, 0xbb, 0xfe]),
    ]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(records.len(), 2);
    // spliced records come first, in place of the pointer
    assert_eq!(records[0].address, at(0x41));
    assert_eq!(records[0].mode(), InteractionMode::NoValue);
    assert_eq!(records[1].address, at(5));
    assert_eq!(records[1].mode(), InteractionMode::SpecificEntity);
}

#[test]
fn test_all_pointer_tags_splice() {
    for tag in [0xf3u8, 0xf4, 0xf5] {
        assert_eq!(Tag::from_byte(tag), Tag::Pointer);
        let memory = image(&[
            (0, &[tag, 0x40, 0x00, 0xff]),
            (0x40, &[0xf1, 0x01, 0x02, 0xff]),
        ]);
        let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
        assert_eq!(records.len(), 1, "tag {:#04x}", tag);
    }
}

#[test]
fn test_nested_stream_stops_at_either_terminator() {
    let memory = image(&[(0, &[0xf1, 0x01, 0x02, 0xfe, 0x00, 0xf1, 0x03, 0x04, 0xff])]);
    let decoder = RecordStreamDecoder::new(&memory);

    let mut records = Vec::new();
    let end = decoder
        .decode_stream(at(0), StreamScope::Nested, &mut records)
        .unwrap();
    assert_eq!(end, at(3));
    assert_eq!(records.len(), 1);

    let mut records = Vec::new();
    let end = decoder
        .decode_stream(at(0), StreamScope::TopLevel, &mut records)
        .unwrap();
    assert_eq!(end, at(8));
    assert_eq!(records.len(), 2);
}

#[test]
fn test_end_of_pointer_at_top_level_skips_one_byte() {
    // 0x99 after the 0xfe is consumed with it, not read as a tag
    let memory = image(&[(0, &[0xf1, 0x01, 0x02, 0xfe, 0x99, 0xf1, 0x03, 0x04, 0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    let addresses: Vec<Address> = records.iter().map(|r| r.address).collect();
    assert_eq!(addresses, vec![at(1), at(6)]);
}

#[test]
fn test_unknown_tags_are_skipped() {
    let memory = image(&[(
        0,
        &[
            0xf0, 0x01, 0x02, // not decoded
            0xfb, 0x03, // unknown
            0xf1, 0x05, 0x06, 0xff,
        ],
    )]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, at(6));
    assert_eq!(Tag::from_byte(0xf0), Tag::Unsupported);
    assert_eq!(Tag::from_byte(0xfc), Tag::Unknown(0xfc));
}

#[test]
fn test_unknown_tag_before_end_of_room() {
    let memory = image(&[(0, &[0xfd, 0xff])]);
    let records = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_truncated_entry_is_an_error() {
    let memory = vec![0xf2, 0x01, 0x02];
    let err = RecordStreamDecoder::new(&memory).decode(at(0)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::OutOfBounds {
            linear: 1,
            width: 4,
            len: 3
        }
    );
}

#[test]
fn test_missing_terminator_is_an_error() {
    let memory = vec![0xf1, 0x01, 0x02];
    assert!(matches!(
        RecordStreamDecoder::new(&memory).decode(at(0)),
        Err(DecodeError::OutOfBounds { .. })
    ));
}

#[test]
fn test_self_referencing_pointer() {
    let memory = image(&[(0x10, &[0xf3, 0x10, 0x00, 0xff])]);
    assert_eq!(
        RecordStreamDecoder::new(&memory).decode(at(0x10)).unwrap_err(),
        DecodeError::NestingTooDeep(at(0x10))
    );
}

#[test]
fn test_decode_is_repeatable() {
    let memory = image(&[
        (0, &[0xf6, 0x40, 0x32, 0x00, 0xf4, 0x40, 0x00, 0xff]),
        (0x40, &[0xf8, 0x13, 0x00, 0x23, 0xfe]),
    ]);
    let decoder = RecordStreamDecoder::new(&memory);
    assert_eq!(decoder.decode(at(0)).unwrap(), decoder.decode(at(0)).unwrap());
}
