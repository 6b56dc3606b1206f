//! File meta group assembly for the write path.

use dcmio_core::error::{MissingMetaElementSnafu, Result};
use dcmio_core::tag::{tags, Tag};
use dcmio_core::value::Value;
use dcmio_core::vr::VR;
use dcmio_core::DataElement;

/// Implementation Class UID written into files this library produces.
/// Issued under the freely obtainable Medical Connections root.
pub const IMPLEMENTATION_CLASS_UID: &str = "1.2.826.0.1.3680043.9.7133.1.1";

/// Implementation Version Name written into files this library produces.
pub const IMPLEMENTATION_VERSION_NAME: &str = "DCMIO_0_1";

fn find(elements: &[DataElement], tag: Tag) -> Option<&DataElement> {
    elements.iter().find(|e| e.tag() == tag)
}

fn required(elements: &[DataElement], tag: Tag, name: &'static str) -> Result<DataElement> {
    find(elements, tag)
        .cloned()
        .ok_or_else(|| MissingMetaElementSnafu { name }.build())
}

/// Assemble the meta group to be written for a data set.
///
/// `TransferSyntaxUID`, `MediaStorageSOPClassUID` and
/// `MediaStorageSOPInstanceUID` must be present among the given elements.
/// `FileMetaInformationVersion`, `ImplementationClassUID` and
/// `ImplementationVersionName` are defaulted when absent. Any further group
/// 2 elements are carried over; the group length element is not included
/// (the file header writer computes it).
pub fn assemble_meta(elements: &[DataElement]) -> Result<Vec<DataElement>> {
    let version = find(elements, tags::FILE_META_INFORMATION_VERSION)
        .cloned()
        .unwrap_or_else(|| {
            DataElement::new(
                tags::FILE_META_INFORMATION_VERSION,
                VR::OB,
                Value::Bytes(vec![0x00, 0x01]),
            )
        });
    let sop_class = required(
        elements,
        tags::MEDIA_STORAGE_SOP_CLASS_UID,
        "MediaStorageSOPClassUID",
    )?;
    let sop_instance = required(
        elements,
        tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
        "MediaStorageSOPInstanceUID",
    )?;
    let transfer_syntax = required(elements, tags::TRANSFER_SYNTAX_UID, "TransferSyntaxUID")?;
    let implementation_class = find(elements, tags::IMPLEMENTATION_CLASS_UID)
        .cloned()
        .unwrap_or_else(|| {
            DataElement::new(
                tags::IMPLEMENTATION_CLASS_UID,
                VR::UI,
                Value::from(IMPLEMENTATION_CLASS_UID),
            )
        });
    let implementation_version = find(elements, tags::IMPLEMENTATION_VERSION_NAME)
        .cloned()
        .unwrap_or_else(|| {
            DataElement::new(
                tags::IMPLEMENTATION_VERSION_NAME,
                VR::SH,
                Value::from(IMPLEMENTATION_VERSION_NAME),
            )
        });

    let mut meta = vec![
        version,
        sop_class,
        sop_instance,
        transfer_syntax,
        implementation_class,
        implementation_version,
    ];
    // carry over any remaining group 2 elements in file order
    let known_tags: Vec<_> = meta.iter().map(|m| m.tag()).collect();
    meta.extend(
        elements
            .iter()
            .filter(|e| {
                e.tag().group() == 0x0002
                    && e.tag() != tags::FILE_META_INFORMATION_GROUP_LENGTH
                    && known_tags.iter().all(|t| *t != e.tag())
            })
            .cloned(),
    );
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::assemble_meta;
    use dcmio_core::error::Error;
    use dcmio_core::tag::tags;
    use dcmio_core::DataElement;

    fn uid(tag: dcmio_core::Tag, value: &str) -> DataElement {
        DataElement::for_tag(tag, value).unwrap()
    }

    #[test]
    fn defaults_are_injected() {
        let elements = vec![
            uid(tags::MEDIA_STORAGE_SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.7"),
            uid(tags::MEDIA_STORAGE_SOP_INSTANCE_UID, "1.2.3.4"),
            uid(tags::TRANSFER_SYNTAX_UID, "1.2.840.10008.1.2.1"),
        ];
        let meta = assemble_meta(&elements).unwrap();
        assert_eq!(meta[0].tag(), tags::FILE_META_INFORMATION_VERSION);
        assert_eq!(meta[0].bytes().unwrap(), [0x00, 0x01]);
        assert!(meta
            .iter()
            .any(|e| e.tag() == tags::IMPLEMENTATION_CLASS_UID));
        assert!(meta
            .iter()
            .any(|e| e.tag() == tags::IMPLEMENTATION_VERSION_NAME));
    }

    #[test]
    fn missing_required_elements_are_reported_by_name() {
        let elements = vec![uid(tags::TRANSFER_SYNTAX_UID, "1.2.840.10008.1.2")];
        match assemble_meta(&elements) {
            Err(Error::MissingMetaElement { name, .. }) => {
                assert_eq!(name, "MediaStorageSOPClassUID")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
