//! The streaming data element reader.

use dcmio_core::dictionary;
use dcmio_core::error::{
    InvalidFormatSnafu, NonItemInSequenceSnafu, OddLengthSnafu, UndefinedLengthForbiddenSnafu,
    UndefinedScalarLengthSnafu, UnexpectedDelimiterLengthSnafu, UnexpectedTagSnafu,
    VrMismatchSnafu,
};
use dcmio_core::tag::{tags, Tag};
use dcmio_core::value::{PixelFragmentSequence, Value, C};
use dcmio_core::vr::{VrKind, VR};
use dcmio_core::DataElement;
use dcmio_encoding::decode::Decoder;
use dcmio_encoding::text::CodingSystem;
use dcmio_encoding::Endianness;
use std::io::Read;

/// The on-disk sentinel for an undefined value length.
pub(crate) const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// Options controlling the element reader.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Return no element when PixelData is encountered, *without consuming
    /// its value*. Since pixel data is in practice the trailing element,
    /// dataset readers stop at that point.
    pub drop_pixel_data: bool,
}

/// Read the `(group, element)` pair at the current position.
pub fn read_tag<R: Read>(d: &mut Decoder<R>) -> Tag {
    let group = d.read_u16();
    let element = d.read_u16();
    Tag(group, element)
}

/// Read VR and VL under implicit framing: the VR comes from the dictionary
/// (`UN` when unknown) and the length is a 32-bit word.
fn read_header_implicit<R: Read>(d: &mut Decoder<R>, tag: Tag) -> (VR, Option<u32>) {
    let vr = dictionary::lookup_tag(tag).map_or(VR::UN, |entry| entry.vr);
    let vl = d.read_u32();
    let length = if vl == UNDEFINED_LENGTH { None } else { Some(vl) };
    check_even(d, tag, vr, length);
    (vr, length)
}

/// Read VR and VL under explicit framing. Long-form VRs carry two reserved
/// bytes and a 32-bit length; the rest use a 16-bit length.
fn read_header_explicit<R: Read>(d: &mut Decoder<R>, tag: Tag) -> (VR, Option<u32>) {
    let vr_bytes = d.read_bytes(2);
    if d.has_error() {
        return (VR::UN, Some(0));
    }
    let (vr, long_form) = match VR::from_binary([vr_bytes[0], vr_bytes[1]]) {
        Some(vr) => (vr, vr.is_long_form()),
        None => {
            tracing::warn!(
                "unknown VR {:?} in element {}, reading as UN",
                String::from_utf8_lossy(&vr_bytes),
                tag
            );
            (VR::UN, false)
        }
    };
    let length = if long_form {
        d.skip(2);
        let vl = d.read_u32();
        if vl == UNDEFINED_LENGTH {
            if vr.forbids_undefined_length() {
                d.set_error(UndefinedLengthForbiddenSnafu { vr }.build());
                Some(0)
            } else {
                None
            }
        } else {
            Some(vl)
        }
    } else {
        let vl = d.read_u16();
        if vl == 0xFFFF {
            None
        } else {
            Some(u32::from(vl))
        }
    };
    check_even(d, tag, vr, length);
    (vr, length)
}

fn check_even<R: Read>(d: &mut Decoder<R>, tag: Tag, vr: VR, length: Option<u32>) {
    // OB tolerates an odd length; the trailing pad byte stays in the blob
    if let Some(length) = length {
        if length % 2 != 0 && vr != VR::OB {
            d.set_error(OddLengthSnafu { tag, length }.build());
        }
    }
}

/// Read one data element at the current position.
///
/// Returns `None` when an error was recorded on the decoder (callers check
/// [`Decoder::error`] once per element) or when PixelData was dropped by
/// request. Sequence and item delimiters of enclosing undefined-length
/// containers are returned as empty `(FFFE,*)` elements and consumed by the
/// recursion, never stored in parsed values.
pub fn read_element<R: Read>(d: &mut Decoder<R>, options: ReadOptions) -> Option<DataElement> {
    let tag = read_tag(d);
    if d.has_error() {
        return None;
    }
    if tag == tags::PIXEL_DATA && options.drop_pixel_data {
        return None;
    }

    // elements of group 0xFFFE are always implicitly framed
    let (_, implicit) = d.transfer_syntax();
    let implicit = implicit || tag.is_item_group();
    let (vr, length) = if implicit {
        read_header_implicit(d, tag)
    } else {
        read_header_explicit(d, tag)
    };
    if d.has_error() {
        return None;
    }

    if tag.is_item_group() && tag != tags::ITEM {
        // a delimiter of an enclosing undefined-length container
        if length != Some(0) {
            d.set_error(
                UnexpectedDelimiterLengthSnafu {
                    tag,
                    length: length.unwrap_or(UNDEFINED_LENGTH),
                }
                .build(),
            );
            return None;
        }
        return Some(DataElement::new(tag, VR::NA, Value::Items(Vec::new())));
    }

    if !implicit && vr != VR::UN {
        if let Ok(entry) = dictionary::lookup_tag(tag) {
            let dict_vr = if entry.vr == VR::OX { VR::OW } else { entry.vr };
            if dict_vr != vr && dict_vr != VR::UN {
                if VrKind::of(tag, vr) == VrKind::of(tag, dict_vr) {
                    tracing::warn!(
                        "element {} read with VR {} where the dictionary expects {}",
                        tag,
                        vr,
                        dict_vr
                    );
                } else {
                    d.set_error(
                        VrMismatchSnafu {
                            tag,
                            stream: vr,
                            dictionary: dict_vr,
                        }
                        .build(),
                    );
                    return None;
                }
            }
        }
    }
    let vr = if vr == VR::OX { VR::OW } else { vr };

    let value = if tag == tags::PIXEL_DATA {
        read_pixel_data(d, length)
    } else if vr == VR::SQ {
        read_sequence(d, length, options)
    } else if tag == tags::ITEM {
        read_item(d, length, options)
    } else {
        read_scalars(d, tag, vr, length)?
    };
    if d.has_error() {
        return None;
    }

    let mut element = DataElement::new(tag, vr, value);
    if length.is_none() {
        element = element.with_undefined_length();
    }

    // string reads from here on honor the declared repertoires
    if tag == tags::SPECIFIC_CHARACTER_SET {
        if let Ok(names) = element.strings() {
            d.set_coding_system(CodingSystem::from_names(names));
        }
    }
    Some(element)
}

/// Read the items of a sequence. Every child must carry the Item tag; an
/// undefined-length sequence ends at its sequence delimiter, a
/// defined-length one at the exhaustion of its byte limit.
fn read_sequence<R: Read>(
    d: &mut Decoder<R>,
    length: Option<u32>,
    options: ReadOptions,
) -> Value {
    let mut items = Vec::new();
    match length {
        None => loop {
            let Some(item) = read_element(d, options) else {
                break;
            };
            if item.tag() == tags::SEQUENCE_DELIMITATION {
                break;
            }
            if item.tag() != tags::ITEM {
                d.set_error(NonItemInSequenceSnafu { tag: item.tag() }.build());
                break;
            }
            items.push(item);
        },
        Some(length) => {
            d.push_limit(u64::from(length));
            while d.remaining() > 0 && !d.has_error() {
                let Some(item) = read_element(d, options) else {
                    break;
                };
                if item.tag() != tags::ITEM {
                    d.set_error(NonItemInSequenceSnafu { tag: item.tag() }.build());
                    break;
                }
                items.push(item);
            }
            d.pop_limit();
        }
    }
    Value::Items(items)
}

/// Read the contents of one item: arbitrary sub-elements up to the item
/// delimiter or the exhaustion of the declared length.
fn read_item<R: Read>(d: &mut Decoder<R>, length: Option<u32>, options: ReadOptions) -> Value {
    let mut children = Vec::new();
    match length {
        None => loop {
            let Some(child) = read_element(d, options) else {
                break;
            };
            if child.tag() == tags::ITEM_DELIMITATION {
                break;
            }
            children.push(child);
        },
        Some(length) => {
            d.push_limit(u64::from(length));
            while d.remaining() > 0 && !d.has_error() {
                let Some(child) = read_element(d, options) else {
                    break;
                };
                children.push(child);
            }
            d.pop_limit();
        }
    }
    Value::Items(children)
}

/// Read one raw (unparsed) item, as used inside encapsulated pixel data.
/// Returns the payload, or `(None, true)` at the closing sequence delimiter.
fn read_raw_item<R: Read>(d: &mut Decoder<R>) -> (Option<Vec<u8>>, bool) {
    let tag = read_tag(d);
    // items are always implicitly framed
    let (vr, length) = read_header_implicit(d, tag);
    if d.has_error() {
        return (None, true);
    }
    if tag == tags::SEQUENCE_DELIMITATION {
        if length != Some(0) {
            d.set_error(
                UnexpectedDelimiterLengthSnafu {
                    tag,
                    length: length.unwrap_or(UNDEFINED_LENGTH),
                }
                .build(),
            );
        }
        return (None, true);
    }
    if tag != tags::ITEM {
        d.set_error(NonItemInSequenceSnafu { tag }.build());
        return (None, false);
    }
    let Some(length) = length else {
        d.set_error(UndefinedScalarLengthSnafu { tag, vr }.build());
        return (None, false);
    };
    if vr != VR::NA {
        d.set_error(UnexpectedTagSnafu { tag }.build());
        return (None, true);
    }
    (Some(d.read_bytes(length as usize)), false)
}

/// Read the basic offset table, the first item of an encapsulated pixel
/// data element. An empty table yields a single offset of zero.
fn read_basic_offset_table<R: Read>(d: &mut Decoder<R>) -> Vec<u32> {
    let (data, end) = read_raw_item(d);
    if end {
        d.set_error(InvalidFormatSnafu.build());
        return Vec::new();
    }
    let data = data.unwrap_or_default();
    if data.is_empty() {
        return vec![0];
    }
    // the payload is a run of 32-bit offsets in the active byte order
    let (endianness, _) = d.transfer_syntax();
    let mut sub = Decoder::from_bytes(&data, endianness, true);
    let mut offsets = Vec::with_capacity(data.len() / 4);
    while sub.remaining() > 0 && !sub.has_error() {
        offsets.push(sub.read_u32());
    }
    offsets
}

/// Read a pixel data payload. Undefined length means the encapsulated form:
/// one basic offset table item, data items, and a sequence delimiter.
fn read_pixel_data<R: Read>(d: &mut Decoder<R>, length: Option<u32>) -> Value {
    match length {
        None => {
            let offsets = read_basic_offset_table(d);
            if offsets.len() > 1 {
                tracing::warn!(
                    "pixel data declares {} frame offsets; fragments are not regrouped by frame",
                    offsets.len()
                );
            }
            let mut frames = Vec::new();
            while d.remaining() > 0 && !d.has_error() {
                let (chunk, end) = read_raw_item(d);
                if end || d.has_error() {
                    break;
                }
                if let Some(chunk) = chunk {
                    frames.push(chunk);
                }
            }
            Value::PixelSequence(PixelFragmentSequence::new(offsets, frames))
        }
        Some(length) => {
            tracing::warn!("defined-length pixel data is read as a single frame");
            Value::PixelSequence(PixelFragmentSequence::single_frame(
                d.read_bytes(length as usize),
            ))
        }
    }
}

/// Read the scalar value list of a non-nested element. The length must be
/// defined; the payload interpretation follows the VR.
fn read_scalars<R: Read>(
    d: &mut Decoder<R>,
    tag: Tag,
    vr: VR,
    length: Option<u32>,
) -> Option<Value> {
    let Some(length) = length else {
        d.set_error(UndefinedScalarLengthSnafu { tag, vr }.build());
        return None;
    };
    d.push_limit(u64::from(length));
    let value = match vr {
        VR::DA => {
            // 8-byte "YYYYMMDD", or the 10-byte dotted "YYYY.MM.DD" form
            // that predates it and still occurs in the wild
            let mut dates = C::new();
            while d.remaining() > 0 && !d.has_error() {
                let mut date = d.read_str(8);
                if date.contains('.') {
                    date.push_str(&d.read_str(2));
                }
                dates.push(date);
            }
            Value::Strs(dates)
        }
        VR::AT => {
            let mut tags = C::new();
            while d.remaining() > 0 && !d.has_error() {
                tags.push(Tag(d.read_u16(), d.read_u16()));
            }
            Value::Tags(tags)
        }
        VR::OW => {
            if length % 2 != 0 {
                d.set_error(OddLengthSnafu { tag, length }.build());
                Value::Bytes(Vec::new())
            } else {
                // words are consumed in the active byte order and kept as
                // one blob in native order
                let mut blob = Vec::with_capacity(length as usize);
                for _ in 0..length / 2 {
                    if d.has_error() {
                        break;
                    }
                    blob.extend_from_slice(&d.read_u16().to_ne_bytes());
                }
                Value::Bytes(blob)
            }
        }
        VR::OB | VR::OD | VR::OF | VR::OL | VR::UN => {
            Value::Bytes(d.read_bytes(length as usize))
        }
        VR::LT | VR::UT => {
            // one unsplit, untrimmed string over the whole payload
            Value::Strs(smallvec::smallvec![d.read_str(length as usize)])
        }
        VR::UL => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_u32());
            }
            Value::U32s(values)
        }
        VR::SL => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_i32());
            }
            Value::I32s(values)
        }
        VR::US => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_u16());
            }
            Value::U16s(values)
        }
        VR::SS => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_i16());
            }
            Value::I16s(values)
        }
        VR::FL => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_f32());
            }
            Value::F32s(values)
        }
        VR::FD => {
            let mut values = C::new();
            while d.remaining() > 0 && !d.has_error() {
                values.push(d.read_f64());
            }
            Value::F64s(values)
        }
        _ => {
            let text = if vr == VR::PN {
                d.read_person_name(length as usize)
            } else {
                d.read_str(length as usize)
            };
            let trimmed = text.trim_end_matches(|c| c == ' ' || c == '\0');
            let mut values = C::new();
            if !trimmed.is_empty() {
                values.extend(trimmed.split('\\').map(str::to_owned));
            }
            Value::Strs(values)
        }
    };
    d.pop_limit();
    Some(value)
}

/// Consume the 128-byte preamble, the `DICM` magic code and the file meta
/// group, which is always framed by the group length element `(0002,0000)`
/// and encoded as explicit VR little endian.
///
/// Errors are reported through the decoder; the elements read so far are
/// returned either way.
pub fn read_file_header<R: Read>(d: &mut Decoder<R>) -> Vec<DataElement> {
    let mut meta = Vec::new();
    d.push_transfer_syntax(Endianness::Little, false);
    d.skip(128);
    let magic = d.read_bytes(4);
    if d.has_error() || magic != *b"DICM" {
        if !d.has_error() {
            d.set_error(InvalidFormatSnafu.build());
        }
        d.pop_transfer_syntax();
        return meta;
    }

    let group_length = match read_element(d, ReadOptions::default()) {
        Some(element) if element.tag() == tags::FILE_META_INFORMATION_GROUP_LENGTH => element,
        Some(element) => {
            d.set_error(UnexpectedTagSnafu { tag: element.tag() }.build());
            d.pop_transfer_syntax();
            return meta;
        }
        None => {
            d.pop_transfer_syntax();
            return meta;
        }
    };
    let remaining_meta = match group_length.uint32() {
        Ok(value) => value,
        Err(e) => {
            d.set_error(e);
            d.pop_transfer_syntax();
            return meta;
        }
    };
    meta.push(group_length);

    d.push_limit(u64::from(remaining_meta));
    while d.remaining() > 0 && !d.has_error() {
        match read_element(d, ReadOptions::default()) {
            Some(element) => meta.push(element),
            None => break,
        }
    }
    d.pop_limit();
    d.pop_transfer_syntax();
    meta
}
