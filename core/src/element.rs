//! The owned DICOM data element.

use crate::dictionary;
use crate::error::{CastValueSnafu, Result, ValueMultiplicitySnafu, ValueTypeSnafu};
use crate::tag::Tag;
use crate::value::{PixelFragmentSequence, Value};
use crate::vr::{VrKind, VR};
use snafu::ensure;

/// A single data element: tag, value representation, the undefined-length
/// marker, and the value.
///
/// Elements are immutable once built. The codec creates them while reading;
/// callers create them with [`DataElement::for_tag`], which resolves the VR
/// from the dictionary and validates the value shape, or with
/// [`DataElement::new`] when the VR is already known.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
    tag: Tag,
    vr: VR,
    undefined_length: bool,
    value: Value,
}

impl DataElement {
    /// Create a data element from its raw parts.
    ///
    /// The value shape is not checked against the VR; prefer
    /// [`DataElement::for_tag`] unless the parts are already known to agree.
    pub fn new(tag: Tag, vr: VR, value: Value) -> DataElement {
        DataElement {
            tag,
            vr,
            undefined_length: false,
            value,
        }
    }

    /// Create a data element for the given tag, resolving the value
    /// representation from the standard dictionary (`UN` when unknown) and
    /// validating that the value shape agrees with it.
    pub fn for_tag(tag: Tag, value: impl Into<Value>) -> Result<DataElement> {
        let vr = match dictionary::lookup_tag(tag) {
            Ok(entry) if entry.vr == VR::OX => VR::OW,
            Ok(entry) => entry.vr,
            Err(_) => VR::UN,
        };
        let value = value.into();
        ensure!(
            value.conforms_to(VrKind::of(tag, vr)),
            ValueTypeSnafu {
                tag,
                vr,
                found: value.type_name(),
            }
        );
        Ok(DataElement {
            tag,
            vr,
            undefined_length: false,
            value,
        })
    }

    /// Mark this element as stored with the undefined-length sentinel,
    /// so that the writer emits delimited rather than length-prefixed form.
    pub fn with_undefined_length(mut self) -> DataElement {
        self.undefined_length = true;
        self
    }

    /// The element's tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The element's value representation.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Whether the element was read from, or should be written in,
    /// undefined-length (delimited) form.
    #[inline]
    pub fn undefined_length(&self) -> bool {
        self.undefined_length
    }

    /// The element's value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Move the value out of the element.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Retrieve the single string value of this element.
    /// Fails if the element is not string-typed or holds more than one value.
    pub fn string(&self) -> Result<&str> {
        let strings = self.strings()?;
        ensure!(
            strings.len() == 1,
            ValueMultiplicitySnafu {
                tag: self.tag,
                count: strings.len(),
            }
        );
        Ok(&strings[0])
    }

    /// Retrieve the string values of this element.
    pub fn strings(&self) -> Result<&[String]> {
        match &self.value {
            Value::Strs(v) => Ok(v),
            other => self.cast_error("strings", other),
        }
    }

    /// Retrieve the single `u32` value of this element.
    pub fn uint32(&self) -> Result<u32> {
        let values = self.uint32s()?;
        ensure!(
            values.len() == 1,
            ValueMultiplicitySnafu {
                tag: self.tag,
                count: values.len(),
            }
        );
        Ok(values[0])
    }

    /// Retrieve the `u32` values of this element.
    pub fn uint32s(&self) -> Result<&[u32]> {
        match &self.value {
            Value::U32s(v) => Ok(v),
            other => self.cast_error("u32 list", other),
        }
    }

    /// Retrieve the single `u16` value of this element.
    pub fn uint16(&self) -> Result<u16> {
        match &self.value {
            Value::U16s(v) if v.len() == 1 => Ok(v[0]),
            Value::U16s(v) => ValueMultiplicitySnafu {
                tag: self.tag,
                count: v.len(),
            }
            .fail(),
            other => self.cast_error("u16 list", other),
        }
    }

    /// Retrieve the byte blob of this element.
    pub fn bytes(&self) -> Result<&[u8]> {
        match &self.value {
            Value::Bytes(v) => Ok(v),
            other => self.cast_error("bytes", other),
        }
    }

    /// Retrieve the nested elements of a sequence or item.
    pub fn items(&self) -> Result<&[DataElement]> {
        match &self.value {
            Value::Items(v) => Ok(v),
            other => self.cast_error("items", other),
        }
    }

    /// Retrieve the pixel fragment sequence of a pixel data element.
    pub fn pixel_sequence(&self) -> Result<&PixelFragmentSequence> {
        match &self.value {
            Value::PixelSequence(v) => Ok(v),
            other => self.cast_error("pixel sequence", other),
        }
    }

    fn cast_error<T>(&self, requested: &'static str, found: &Value) -> Result<T> {
        CastValueSnafu {
            tag: self.tag,
            requested,
            found: found.type_name(),
        }
        .fail()
    }
}

impl std::fmt::Display for DataElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = if self.undefined_length {
            "u".to_owned()
        } else {
            self.value.multiplicity().to_string()
        };
        write!(f, "{} {} #{}", self.tag, self.vr, len)
    }
}

/// Locate the first element with the given tag in a slice of elements.
pub fn find_by_tag(elements: &[DataElement], tag: Tag) -> Option<&DataElement> {
    elements.iter().find(|e| e.tag() == tag)
}

/// Locate an element by its dictionary name in a slice of elements.
pub fn find_by_name<'a>(elements: &'a [DataElement], name: &str) -> Result<&'a DataElement> {
    let entry = dictionary::lookup_name(name)?;
    find_by_tag(elements, entry.tag).ok_or_else(|| {
        crate::error::NoSuchDataElementSnafu { tag: entry.tag }
            .build()
    })
}

#[cfg(test)]
mod tests {
    use super::DataElement;
    use crate::error::Error;
    use crate::tag::tags;
    use crate::value::Value;
    use crate::vr::VR;

    #[test]
    fn for_tag_resolves_vr_from_dictionary() {
        let elem = DataElement::for_tag(tags::STUDY_INSTANCE_UID, "1.2.3.4").unwrap();
        assert_eq!(elem.vr(), VR::UI);
        assert_eq!(elem.string().unwrap(), "1.2.3.4");

        let elem = DataElement::for_tag(tags::IN_STACK_POSITION_NUMBER, 42u32).unwrap();
        assert_eq!(elem.vr(), VR::UL);
        assert_eq!(elem.uint32().unwrap(), 42);
    }

    #[test]
    fn for_tag_rejects_mismatched_value_shape() {
        let err = DataElement::for_tag(tags::IN_STACK_POSITION_NUMBER, "not a number")
            .expect_err("UL must not accept strings");
        assert!(matches!(err, Error::ValueType { .. }));
    }

    #[test]
    fn for_tag_normalizes_pixel_data_vr() {
        let elem = DataElement::for_tag(
            tags::PIXEL_DATA,
            Value::PixelSequence(crate::value::PixelFragmentSequence::single_frame(vec![
                0, 1, 2, 3,
            ])),
        )
        .unwrap();
        assert_eq!(elem.vr(), VR::OW);
    }

    #[test]
    fn accessors_enforce_shape_and_multiplicity() {
        let elem = DataElement::for_tag(
            tags::SPECIFIC_CHARACTER_SET,
            vec!["A".to_owned(), "B".to_owned()],
        )
        .unwrap();
        assert_eq!(elem.strings().unwrap().len(), 2);
        assert!(matches!(
            elem.string(),
            Err(Error::ValueMultiplicity { count: 2, .. })
        ));
        assert!(matches!(elem.uint32(), Err(Error::CastValue { .. })));
    }
}
