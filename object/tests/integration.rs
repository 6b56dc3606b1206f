//! Whole-file read/write tests over in-memory buffers.

use dcmio_core::tag::{tags, Tag};
use dcmio_core::value::{PixelFragmentSequence, Value};
use dcmio_core::DataElement;
use dcmio_object::{DataSet, ReadOptions};

fn element(tag: Tag, value: impl Into<Value>) -> DataElement {
    DataElement::for_tag(tag, value).unwrap()
}

fn sample_data_set(transfer_syntax: &str) -> DataSet {
    DataSet::from_elements(vec![
        element(tags::MEDIA_STORAGE_SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.7"),
        element(tags::MEDIA_STORAGE_SOP_INSTANCE_UID, "1.2.3.4.5"),
        element(tags::TRANSFER_SYNTAX_UID, transfer_syntax),
        element(tags::SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.7"),
        element(tags::SOP_INSTANCE_UID, "1.2.3.4.5"),
        element(tags::MODALITY, "OT"),
        element(tags::PATIENT_NAME, "Doe^John"),
        element(tags::STUDY_INSTANCE_UID, "1.2.840.113857.1907.192833.1115.220048"),
        element(tags::ROWS, 2u16),
        element(tags::COLUMNS, 2u16),
    ])
}

#[test]
fn data_set_roundtrips_under_implicit_little_endian() {
    let original = sample_data_set("1.2.840.10008.1.2");
    let bytes = original.to_vec().unwrap();
    let parsed = DataSet::from_bytes(&bytes, ReadOptions::default()).unwrap();

    // body elements survive with their values
    for tag in [
        tags::SOP_CLASS_UID,
        tags::SOP_INSTANCE_UID,
        tags::MODALITY,
        tags::PATIENT_NAME,
        tags::STUDY_INSTANCE_UID,
    ] {
        assert_eq!(
            parsed.element(tag).unwrap().strings().unwrap(),
            original.element(tag).unwrap().strings().unwrap(),
            "values of {tag} must round-trip"
        );
    }
    assert_eq!(parsed.element(tags::ROWS).unwrap().uint16().unwrap(), 2);

    // the meta group is part of the element list and carries the defaults
    assert_eq!(
        parsed
            .element(tags::TRANSFER_SYNTAX_UID)
            .unwrap()
            .string()
            .unwrap(),
        "1.2.840.10008.1.2"
    );
    assert!(parsed.element(tags::IMPLEMENTATION_CLASS_UID).is_ok());
    assert!(parsed.element(tags::FILE_META_INFORMATION_VERSION).is_ok());
}

#[test]
fn data_set_roundtrips_under_explicit_big_endian() {
    let original = sample_data_set("1.2.840.10008.1.2.2");
    let bytes = original.to_vec().unwrap();
    let parsed = DataSet::from_bytes(&bytes, ReadOptions::default()).unwrap();

    assert_eq!(
        parsed.element(tags::PATIENT_NAME).unwrap().strings().unwrap(),
        ["Doe^John"]
    );
    assert_eq!(parsed.element(tags::COLUMNS).unwrap().uint16().unwrap(), 2);
}

#[test]
fn meta_group_stays_explicit_little_endian() {
    // with an implicit-VR body, the meta group bytes must still carry
    // explicit VR markers ("UI" after the TransferSyntaxUID tag)
    let bytes = sample_data_set("1.2.840.10008.1.2").to_vec().unwrap();
    let position = bytes
        .windows(4)
        .position(|w| w == [0x02, 0x00, 0x10, 0x00])
        .expect("meta group holds the transfer syntax element");
    assert_eq!(&bytes[position + 4..position + 6], b"UI");
}

#[test]
fn elements_can_be_found_by_dictionary_name() {
    let bytes = sample_data_set("1.2.840.10008.1.2.1").to_vec().unwrap();
    let parsed = DataSet::from_bytes(&bytes, ReadOptions::default()).unwrap();
    assert_eq!(
        parsed
            .element_by_name("PatientName")
            .unwrap()
            .strings()
            .unwrap(),
        ["Doe^John"]
    );
    assert!(parsed.element_by_name("PatientWeight").is_err());
}

#[test]
fn lookup_returns_the_first_of_duplicate_tags() {
    let ds = DataSet::from_elements(vec![
        element(tags::MODALITY, "MR"),
        element(tags::MODALITY, "CT"),
    ]);
    assert_eq!(ds.element(tags::MODALITY).unwrap().string().unwrap(), "MR");
}

#[test]
fn encapsulated_pixel_data_survives_a_file_roundtrip() {
    let mut elements = sample_data_set("1.2.840.10008.1.2.1").elements().to_vec();
    elements.push(
        DataElement::for_tag(
            tags::PIXEL_DATA,
            Value::PixelSequence(PixelFragmentSequence::new(
                vec![0],
                vec![vec![0xDE, 0xAD, 0xBE, 0xEF]],
            )),
        )
        .unwrap()
        .with_undefined_length(),
    );
    let bytes = DataSet::from_elements(elements).to_vec().unwrap();
    let parsed = DataSet::from_bytes(&bytes, ReadOptions::default()).unwrap();

    let pixel = parsed
        .element(tags::PIXEL_DATA)
        .unwrap()
        .pixel_sequence()
        .unwrap();
    assert_eq!(pixel.offsets, [0]);
    assert_eq!(pixel.frames, [vec![0xDE, 0xAD, 0xBE, 0xEF]]);
}

#[test]
fn drop_pixel_data_stops_before_the_value() {
    let mut elements = sample_data_set("1.2.840.10008.1.2").elements().to_vec();
    elements.push(
        DataElement::for_tag(
            tags::PIXEL_DATA,
            Value::PixelSequence(PixelFragmentSequence::single_frame(vec![1, 2, 3, 4])),
        )
        .unwrap(),
    );
    let bytes = DataSet::from_elements(elements).to_vec().unwrap();

    let options = ReadOptions {
        drop_pixel_data: true,
    };
    let parsed = DataSet::from_bytes(&bytes, options).unwrap();
    assert!(parsed.element(tags::PIXEL_DATA).is_err());
    assert!(parsed.element(tags::PATIENT_NAME).is_ok());
}

#[test]
fn missing_magic_code_is_rejected() {
    let bytes = vec![0u8; 200];
    assert!(DataSet::from_bytes(&bytes, ReadOptions::default()).is_err());
}

#[test]
fn writing_without_required_meta_fails() {
    let ds = DataSet::from_elements(vec![element(tags::MODALITY, "OT")]);
    assert!(ds.to_vec().is_err());
}
