//! The data element writer.

use crate::read::UNDEFINED_LENGTH;
use dcmio_core::dictionary;
use dcmio_core::error::{
    InvalidPixelDataSnafu, MultiFramePixelDataSnafu, NonItemInSequenceSnafu,
    UndefinedScalarLengthSnafu, ValueTypeSnafu, VrMismatchSnafu,
};
use dcmio_core::tag::{tags, Tag};
use dcmio_core::value::Value;
use dcmio_core::vr::{VrKind, VR};
use dcmio_core::DataElement;
use dcmio_encoding::encode::Encoder;
use dcmio_encoding::Endianness;

/// Emit one element header: tag, then VR and VL in the form the active
/// transfer syntax demands. Elements of group `0xFFFE` are always
/// implicitly framed. `None` encodes the undefined-length sentinel.
pub(crate) fn write_header(e: &mut Encoder, tag: Tag, vr: VR, length: Option<u32>) {
    debug_assert!(
        length.map_or(true, |l| l % 2 == 0),
        "odd value length in header of {tag}"
    );
    e.write_u16(tag.group());
    e.write_u16(tag.element());
    let (_, implicit) = e.transfer_syntax();
    let implicit = implicit || tag.is_item_group();
    let raw_length = length.unwrap_or(UNDEFINED_LENGTH);
    if implicit {
        e.write_u32(raw_length);
        return;
    }
    let vr = if vr == VR::OX { VR::OW } else { vr };
    e.write_bytes(&vr.to_bytes());
    if vr.is_long_form() {
        e.write_zeros(2);
        e.write_u32(raw_length);
    } else {
        debug_assert!(raw_length <= 0xFFFF, "length overflows the short form");
        e.write_u16(raw_length as u16);
    }
}

/// The VR an element is written with: the element's own (with `OX`
/// normalized away), cross-checked against the dictionary. A dictionary
/// disagreement within the same value kind is accepted; across kinds it is
/// an error.
fn effective_vr(e: &mut Encoder, element: &DataElement) -> Option<VR> {
    let vr = if element.vr() == VR::OX {
        VR::OW
    } else {
        element.vr()
    };
    if vr == VR::UN {
        return Some(vr);
    }
    if let Ok(entry) = dictionary::lookup_tag(element.tag()) {
        let dict_vr = if entry.vr == VR::OX { VR::OW } else { entry.vr };
        if dict_vr != vr
            && dict_vr != VR::UN
            && VrKind::of(element.tag(), vr) != VrKind::of(element.tag(), dict_vr)
        {
            e.set_error(
                VrMismatchSnafu {
                    tag: element.tag(),
                    stream: vr,
                    dictionary: dict_vr,
                }
                .build(),
            );
            return None;
        }
    }
    Some(vr)
}

/// Write one data element in the encoder's active transfer syntax.
///
/// Defined-length containers and scalar payloads are serialized into a
/// nested encoder first, so that the header always carries the exact byte
/// count. Errors are recorded on the encoder's sticky slot.
pub fn write_element(e: &mut Encoder, element: &DataElement) {
    let Some(vr) = effective_vr(e, element) else {
        return;
    };
    let tag = element.tag();
    let kind = VrKind::of(tag, vr);
    if !element.value().conforms_to(kind) {
        e.set_error(
            ValueTypeSnafu {
                tag,
                vr,
                found: element.value().type_name(),
            }
            .build(),
        );
        return;
    }
    if tag == tags::PIXEL_DATA {
        write_pixel_data(e, element, vr);
    } else if kind == VrKind::Sequence {
        write_items(e, element, vr, true);
    } else if kind == VrKind::Item {
        write_items(e, element, vr, false);
    } else {
        write_scalars(e, element, vr);
    }
}

/// Write the children of a sequence or item element. Sequences require
/// every child to be an Item and close with the sequence delimiter; items
/// hold arbitrary children and close with the item delimiter.
fn write_items(e: &mut Encoder, element: &DataElement, vr: VR, sequence: bool) {
    let children = match element.items() {
        Ok(children) => children,
        Err(err) => {
            e.set_error(err);
            return;
        }
    };
    if sequence {
        if let Some(stray) = children.iter().find(|c| c.tag() != tags::ITEM) {
            e.set_error(NonItemInSequenceSnafu { tag: stray.tag() }.build());
            return;
        }
    }
    if element.undefined_length() {
        write_header(e, element.tag(), vr, None);
        for child in children {
            write_element(e, child);
        }
        let delimiter = if sequence {
            tags::SEQUENCE_DELIMITATION
        } else {
            tags::ITEM_DELIMITATION
        };
        write_header(e, delimiter, VR::NA, Some(0));
    } else {
        let (endianness, implicit) = e.transfer_syntax();
        let mut sub = Encoder::new(endianness, implicit);
        for child in children {
            write_element(&mut sub, child);
        }
        match sub.finish() {
            Ok(payload) => {
                write_header(e, element.tag(), vr, Some(payload.len() as u32));
                e.write_bytes(&payload);
            }
            Err(err) => e.set_error(err),
        }
    }
}

/// Write one raw item wrapping the given payload, padded to even length.
fn write_raw_item(e: &mut Encoder, payload: &[u8]) {
    let padded = payload.len() % 2 == 1;
    let length = payload.len() as u32 + u32::from(padded);
    write_header(e, tags::ITEM, VR::NA, Some(length));
    e.write_bytes(payload);
    if padded {
        e.write_u8(0);
    }
}

/// Write a pixel data element. The undefined-length form is encapsulated:
/// basic offset table item, one item per frame, and a closing sequence
/// delimiter. The defined-length form carries exactly one frame inline.
fn write_pixel_data(e: &mut Encoder, element: &DataElement, vr: VR) {
    let sequence = match element.value() {
        Value::PixelSequence(sequence) => sequence,
        Value::Bytes(blob) if !element.undefined_length() => {
            // native cell data held as a plain blob
            let padded = blob.len() % 2 == 1;
            write_header(e, element.tag(), vr, Some(blob.len() as u32 + u32::from(padded)));
            e.write_bytes(blob);
            if padded {
                e.write_u8(0);
            }
            return;
        }
        _ => {
            e.set_error(InvalidPixelDataSnafu.build());
            return;
        }
    };
    if element.undefined_length() {
        write_header(e, element.tag(), vr, None);
        let (endianness, _) = e.transfer_syntax();
        let mut sub = Encoder::new(endianness, true);
        for offset in &sequence.offsets {
            sub.write_u32(*offset);
        }
        match sub.finish() {
            Ok(table) => write_raw_item(e, &table),
            Err(err) => {
                e.set_error(err);
                return;
            }
        }
        for frame in &sequence.frames {
            write_raw_item(e, frame);
        }
        write_header(e, tags::SEQUENCE_DELIMITATION, VR::NA, Some(0));
    } else {
        if sequence.frames.len() != 1 {
            e.set_error(
                MultiFramePixelDataSnafu {
                    frames: sequence.frames.len(),
                }
                .build(),
            );
            return;
        }
        let frame = &sequence.frames[0];
        let padded = frame.len() % 2 == 1;
        write_header(e, element.tag(), vr, Some(frame.len() as u32 + u32::from(padded)));
        e.write_bytes(frame);
        if padded {
            e.write_u8(0);
        }
    }
}

/// Write a scalar value list: serialize the values by VR width and kind
/// into a nested encoder, pad to even length, then emit header and payload.
fn write_scalars(e: &mut Encoder, element: &DataElement, vr: VR) {
    if element.undefined_length() {
        e.set_error(
            UndefinedScalarLengthSnafu {
                tag: element.tag(),
                vr,
            }
            .build(),
        );
        return;
    }
    let (endianness, _) = e.transfer_syntax();
    let mut sub = Encoder::new(endianness, true);
    match element.value() {
        Value::U16s(values) => {
            for v in values {
                sub.write_u16(*v);
            }
        }
        Value::U32s(values) => {
            for v in values {
                sub.write_u32(*v);
            }
        }
        Value::I16s(values) => {
            for v in values {
                sub.write_i16(*v);
            }
        }
        Value::I32s(values) => {
            for v in values {
                sub.write_i32(*v);
            }
        }
        Value::F32s(values) => {
            for v in values {
                sub.write_f32(*v);
            }
        }
        Value::F64s(values) => {
            for v in values {
                sub.write_f64(*v);
            }
        }
        Value::Tags(values) => {
            for t in values {
                sub.write_u16(t.group());
                sub.write_u16(t.element());
            }
        }
        Value::Bytes(blob) if vr == VR::OW => {
            // the blob is held in native word order; re-emit word by word
            // in the active byte order
            for chunk in blob.chunks_exact(2) {
                sub.write_u16(u16::from_ne_bytes([chunk[0], chunk[1]]));
            }
        }
        Value::Bytes(blob) => sub.write_bytes(blob),
        Value::Strs(values) => sub.write_str(&values.join("\\")),
        Value::Items(_) | Value::PixelSequence(_) => {
            e.set_error(
                ValueTypeSnafu {
                    tag: element.tag(),
                    vr,
                    found: element.value().type_name(),
                }
                .build(),
            );
            return;
        }
    }
    let mut payload = match sub.finish() {
        Ok(payload) => payload,
        Err(err) => {
            e.set_error(err);
            return;
        }
    };
    if payload.len() % 2 == 1 {
        payload.push(0);
    }
    write_header(e, element.tag(), vr, Some(payload.len() as u32));
    e.write_bytes(&payload);
}

/// Write the file preamble, the `DICM` magic code and the given meta group
/// elements (which must not include the group length element, computed
/// here), all under explicit VR little endian.
pub fn write_file_header(e: &mut Encoder, meta: &[DataElement]) {
    e.push_transfer_syntax(Endianness::Little, false);
    let mut sub = Encoder::new(Endianness::Little, false);
    for element in meta {
        write_element(&mut sub, element);
    }
    match sub.finish() {
        Ok(payload) => {
            e.write_zeros(128);
            e.write_str("DICM");
            let group_length = DataElement::new(
                tags::FILE_META_INFORMATION_GROUP_LENGTH,
                VR::UL,
                Value::from(payload.len() as u32),
            );
            write_element(e, &group_length);
            e.write_bytes(&payload);
        }
        Err(err) => e.set_error(err),
    }
    e.pop_transfer_syntax();
}
