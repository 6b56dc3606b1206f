//! Wire-level round-trip tests for the element reader and writer.

use dcmio_core::element::find_by_tag;
use dcmio_core::tag::{tags, Tag};
use dcmio_core::value::{PixelFragmentSequence, Value};
use dcmio_core::vr::VR;
use dcmio_core::{DataElement, Error};
use dcmio_encoding::{Decoder, Encoder, Endianness};
use dcmio_parser::{
    read_element, read_file_header, write_element, write_file_header, ReadOptions,
};

fn write_all(endianness: Endianness, implicit: bool, elements: &[DataElement]) -> Vec<u8> {
    let mut e = Encoder::new(endianness, implicit);
    for element in elements {
        write_element(&mut e, element);
    }
    e.finish().unwrap()
}

fn read_all(bytes: &[u8], endianness: Endianness, implicit: bool) -> Vec<DataElement> {
    let mut d = Decoder::from_bytes(bytes, endianness, implicit);
    let mut elements = Vec::new();
    while d.remaining() > 0 && !d.has_error() {
        match read_element(&mut d, ReadOptions::default()) {
            Some(element) => elements.push(element),
            None => break,
        }
    }
    d.finish().unwrap();
    elements
}

#[test]
fn two_scalars_roundtrip_in_implicit_little_endian() {
    let filtering = DataElement::for_tag(Tag(0x0018, 0x9755), "FooHah").unwrap();
    let positions =
        DataElement::for_tag(tags::IN_STACK_POSITION_NUMBER, vec![1234u32, 2345]).unwrap();

    let bytes = write_all(Endianness::Little, true, &[filtering, positions]);
    let elements = read_all(&bytes, Endianness::Little, true);

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].tag(), Tag(0x0018, 0x9755));
    assert_eq!(elements[0].strings().unwrap(), ["FooHah"]);
    assert_eq!(elements[1].tag(), tags::IN_STACK_POSITION_NUMBER);
    assert_eq!(elements[1].uint32s().unwrap(), [1234, 2345]);
}

#[test]
fn explicit_big_endian_wire_form() {
    let rows = DataElement::for_tag(tags::ROWS, 512u16).unwrap();
    let bytes = write_all(Endianness::Big, false, &[rows]);
    assert_eq!(
        bytes,
        [0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02, 0x02, 0x00]
    );

    let elements = read_all(&bytes, Endianness::Big, false);
    assert_eq!(elements[0].uint16().unwrap(), 512);
}

#[test]
fn odd_string_payloads_are_padded_to_even() {
    let modality = DataElement::for_tag(tags::MODALITY, "OT!").unwrap();
    let bytes = write_all(Endianness::Little, true, &[modality]);
    // 8-byte implicit header plus payload padded from 3 to 4 bytes
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[8..], b"OT!\0");

    let elements = read_all(&bytes, Endianness::Little, true);
    assert_eq!(elements[0].strings().unwrap(), ["OT!"]);
}

#[test]
fn multi_valued_strings_join_with_backslash() {
    let sets = DataElement::for_tag(
        tags::SPECIFIC_CHARACTER_SET,
        vec!["ISO 2022 IR 6".to_owned(), "ISO 2022 IR 87".to_owned()],
    )
    .unwrap();
    let bytes = write_all(Endianness::Little, true, &[sets]);
    assert_eq!(&bytes[8..], b"ISO 2022 IR 6\\ISO 2022 IR 87");

    let elements = read_all(&bytes, Endianness::Little, true);
    assert_eq!(
        elements[0].strings().unwrap(),
        ["ISO 2022 IR 6", "ISO 2022 IR 87"]
    );
}

#[test]
fn undefined_length_sequence_roundtrips_with_delimiter() {
    let item_one = DataElement::for_tag(
        tags::ITEM,
        vec![DataElement::for_tag(tags::PATIENT_ID, "P-123").unwrap()],
    )
    .unwrap();
    let item_two = DataElement::for_tag(
        tags::ITEM,
        vec![DataElement::for_tag(tags::PATIENT_ID, "P-456").unwrap()],
    )
    .unwrap()
    .with_undefined_length();
    let sequence = DataElement::for_tag(Tag(0x0008, 0x1140), vec![item_one, item_two])
        .unwrap()
        .with_undefined_length();

    let bytes = write_all(Endianness::Little, false, &[sequence]);
    // the sequence delimitation item closes the stream exactly once
    assert_eq!(
        &bytes[bytes.len() - 8..],
        [0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00]
    );

    let elements = read_all(&bytes, Endianness::Little, false);
    assert_eq!(elements.len(), 1);
    let read = &elements[0];
    assert_eq!(read.vr(), VR::SQ);
    assert!(read.undefined_length());
    let items = read.items().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item.tag(), tags::ITEM);
    }
    assert_eq!(
        items[1].items().unwrap()[0].strings().unwrap(),
        ["P-456"]
    );
}

#[test]
fn defined_length_sequence_reads_to_exhaustion() {
    let item = DataElement::for_tag(
        tags::ITEM,
        vec![
            DataElement::for_tag(tags::ROWS, 2u16).unwrap(),
            DataElement::for_tag(tags::COLUMNS, 3u16).unwrap(),
        ],
    )
    .unwrap();
    let sequence = DataElement::for_tag(Tag(0x0008, 0x1140), vec![item]).unwrap();

    let bytes = write_all(Endianness::Little, true, &[sequence]);
    let elements = read_all(&bytes, Endianness::Little, true);
    let items = elements[0].items().unwrap();
    assert_eq!(items.len(), 1);
    assert!(!elements[0].undefined_length());
    let children = items[0].items().unwrap();
    assert_eq!(children[0].uint16().unwrap(), 2);
    assert_eq!(children[1].uint16().unwrap(), 3);
}

#[test]
fn encapsulated_pixel_data_roundtrips() {
    let fragments = PixelFragmentSequence::new(vec![0, 4], vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
    let pixel_data = DataElement::for_tag(tags::PIXEL_DATA, Value::PixelSequence(fragments))
        .unwrap()
        .with_undefined_length();

    let bytes = write_all(Endianness::Little, false, &[pixel_data]);
    let elements = read_all(&bytes, Endianness::Little, false);

    let read = elements[0].pixel_sequence().unwrap();
    assert_eq!(read.offsets, [0, 4]);
    assert_eq!(read.frames, [vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
    assert!(elements[0].undefined_length());
}

#[test]
fn empty_offset_table_reads_as_single_logical_frame() {
    let fragments = PixelFragmentSequence::new(Vec::new(), vec![vec![9, 9, 8, 8]]);
    let pixel_data = DataElement::for_tag(tags::PIXEL_DATA, Value::PixelSequence(fragments))
        .unwrap()
        .with_undefined_length();

    let bytes = write_all(Endianness::Little, true, &[pixel_data]);
    let elements = read_all(&bytes, Endianness::Little, true);

    let read = elements[0].pixel_sequence().unwrap();
    assert_eq!(read.offsets, [0]);
    assert_eq!(read.frames, [vec![9, 9, 8, 8]]);
}

#[test]
fn defined_length_pixel_data_is_one_frame() {
    let pixel_data = DataElement::for_tag(
        tags::PIXEL_DATA,
        Value::PixelSequence(PixelFragmentSequence::single_frame(vec![7, 7, 7, 7])),
    )
    .unwrap();

    let bytes = write_all(Endianness::Little, false, &[pixel_data]);
    let elements = read_all(&bytes, Endianness::Little, false);

    let read = elements[0].pixel_sequence().unwrap();
    assert!(read.offsets.is_empty());
    assert_eq!(read.frames, [vec![7, 7, 7, 7]]);
    assert!(!elements[0].undefined_length());
}

#[test]
fn file_header_roundtrips_its_uids() {
    let meta = [
        DataElement::for_tag(tags::TRANSFER_SYNTAX_UID, "1.2.840.10008.1.2").unwrap(),
        DataElement::for_tag(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            "1.2.840.10008.5.1.4.1.1.1.2",
        )
        .unwrap(),
        DataElement::for_tag(tags::MEDIA_STORAGE_SOP_INSTANCE_UID, "1.2.3.4.5.6.7").unwrap(),
    ];
    let mut e = Encoder::new(Endianness::Little, false);
    write_file_header(&mut e, &meta);
    let bytes = e.finish().unwrap();
    assert_eq!(&bytes[128..132], b"DICM");

    let mut d = Decoder::from_bytes(&bytes, Endianness::Little, false);
    let elements = read_file_header(&mut d);
    d.finish().unwrap();

    assert_eq!(
        find_by_tag(&elements, tags::TRANSFER_SYNTAX_UID)
            .unwrap()
            .string()
            .unwrap(),
        "1.2.840.10008.1.2"
    );
    assert_eq!(
        find_by_tag(&elements, tags::MEDIA_STORAGE_SOP_CLASS_UID)
            .unwrap()
            .string()
            .unwrap(),
        "1.2.840.10008.5.1.4.1.1.1.2"
    );
    assert_eq!(
        find_by_tag(&elements, tags::MEDIA_STORAGE_SOP_INSTANCE_UID)
            .unwrap()
            .string()
            .unwrap(),
        "1.2.3.4.5.6.7"
    );
}

#[test]
fn date_elements_accept_the_dotted_legacy_form() {
    let mut raw = vec![0x08, 0x00, 0x20, 0x00, 0x0A, 0x00, 0x00, 0x00];
    raw.extend_from_slice(b"1993.08.22");
    let elements = read_all(&raw, Endianness::Little, true);
    assert_eq!(elements[0].strings().unwrap(), ["1993.08.22"]);

    let mut raw = vec![0x08, 0x00, 0x20, 0x00, 0x08, 0x00, 0x00, 0x00];
    raw.extend_from_slice(b"19930822");
    let elements = read_all(&raw, Endianness::Little, true);
    assert_eq!(elements[0].strings().unwrap(), ["19930822"]);
}

#[test]
fn specific_character_set_switches_string_decoding() {
    // (0008,0005) CS "ISO_IR 100" followed by a latin-1 patient name
    let mut raw = vec![0x08, 0x00, 0x05, 0x00, 0x0A, 0x00, 0x00, 0x00];
    raw.extend_from_slice(b"ISO_IR 100");
    raw.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, 0x04, 0x00, 0x00, 0x00]);
    raw.extend_from_slice(&[0x47, 0x72, 0xE9, 0x65]);

    let elements = read_all(&raw, Endianness::Little, true);
    assert_eq!(elements[1].tag(), tags::PATIENT_NAME);
    assert_eq!(elements[1].strings().unwrap(), ["Grée"]);
}

#[test]
fn odd_length_ob_payload_is_accepted() {
    let raw = [
        0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0xAB, 0xCD, 0xEF,
    ];
    let elements = read_all(&raw, Endianness::Little, false);
    assert_eq!(elements[0].vr(), VR::OB);
    assert_eq!(elements[0].bytes().unwrap(), [0xAB, 0xCD, 0xEF]);
}

#[test]
fn odd_length_is_rejected_elsewhere() {
    let mut raw = vec![0x10, 0x00, 0x20, 0x00, 0x03, 0x00, 0x00, 0x00];
    raw.extend_from_slice(b"ab\0");
    let mut d = Decoder::from_bytes(&raw, Endianness::Little, true);
    assert!(read_element(&mut d, ReadOptions::default()).is_none());
    assert!(matches!(
        d.error(),
        Some(Error::OddLength { length: 3, .. })
    ));
}

#[test]
fn unknown_tags_read_as_un_blobs() {
    let raw = [0x09, 0x00, 0x01, 0x00, 0x04, 0x00, 0x00, 0x00, 1, 2, 3, 4];
    let elements = read_all(&raw, Endianness::Little, true);
    assert_eq!(elements[0].vr(), VR::UN);
    assert_eq!(elements[0].bytes().unwrap(), [1, 2, 3, 4]);
}

#[test]
fn dropped_pixel_data_returns_no_element() {
    let pixel_data = DataElement::for_tag(
        tags::PIXEL_DATA,
        Value::PixelSequence(PixelFragmentSequence::single_frame(vec![1, 2])),
    )
    .unwrap();
    let bytes = write_all(Endianness::Little, true, &[pixel_data]);
    let mut d = Decoder::from_bytes(&bytes, Endianness::Little, true);
    let options = ReadOptions {
        drop_pixel_data: true,
    };
    assert!(read_element(&mut d, options).is_none());
    assert!(d.error().is_none());
}

#[test]
fn ow_payloads_swap_through_big_endian() {
    // OW under big endian: words are decoded into native order and
    // re-encoded on write, so the round-trip is byte-exact on the wire
    let raw = [
        0x00, 0x09, 0x00, 0x02, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x12, 0x34, 0x56,
        0x78,
    ];
    let mut d = Decoder::from_bytes(&raw, Endianness::Big, false);
    let element = read_element(&mut d, ReadOptions::default()).unwrap();
    d.finish().unwrap();
    assert_eq!(element.vr(), VR::OW);
    assert_eq!(
        element.bytes().unwrap(),
        [0x1234u16.to_ne_bytes(), 0x5678u16.to_ne_bytes()].concat()
    );

    let mut e = Encoder::new(Endianness::Big, false);
    write_element(&mut e, &element);
    assert_eq!(e.finish().unwrap(), raw);
}
