//! The heterogeneous value container of a data element.

use crate::element::DataElement;
use crate::tag::Tag;
use crate::vr::VrKind;
use smallvec::SmallVec;

/// Type alias for the in-element list of values.
pub type C<T> = SmallVec<[T; 2]>;

/// The payload of an encapsulated pixel data element: a basic offset table
/// followed by the encoded frames.
///
/// When the element was stored with a defined length, `offsets` is empty and
/// `frames` holds the raw cell data as a single frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PixelFragmentSequence {
    /// Byte offsets declared by the basic offset table. An encapsulated
    /// stream with an empty table is read as a single logical frame at
    /// offset zero.
    pub offsets: Vec<u32>,
    /// The fragment payloads, one per item.
    pub frames: Vec<Vec<u8>>,
}

impl PixelFragmentSequence {
    /// Create a fragment sequence from the offset table and frame payloads.
    pub fn new(offsets: Vec<u32>, frames: Vec<Vec<u8>>) -> Self {
        PixelFragmentSequence { offsets, frames }
    }

    /// Create a fragment sequence holding a single native (non-encapsulated)
    /// frame, with no offset table.
    pub fn single_frame(data: Vec<u8>) -> Self {
        PixelFragmentSequence {
            offsets: Vec::new(),
            frames: vec![data],
        }
    }
}

/// An element value: a tagged sum over typed value lists.
///
/// The active variant is dictated by the element's [`VrKind`], never by
/// runtime inspection of the payload. String-typed representations (UI, PN,
/// LO, DA, ...) use `Strs`; the "other" representations (OB, OW, UN, ...)
/// use a single `Bytes` blob; sequences and items nest further elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A list of text values.
    Strs(C<String>),
    /// A list of unsigned 16-bit values (US).
    U16s(C<u16>),
    /// A list of unsigned 32-bit values (UL).
    U32s(C<u32>),
    /// A list of signed 16-bit values (SS).
    I16s(C<i16>),
    /// A list of signed 32-bit values (SL).
    I32s(C<i32>),
    /// A list of single-precision floats (FL).
    F32s(C<f32>),
    /// A list of double-precision floats (FD).
    F64s(C<f64>),
    /// A list of attribute tags (AT).
    Tags(C<Tag>),
    /// One opaque byte blob (OB, OW, UN and friends).
    Bytes(Vec<u8>),
    /// Nested elements: the items of an SQ, or the contents of one item.
    Items(Vec<DataElement>),
    /// Encapsulated pixel data.
    PixelSequence(PixelFragmentSequence),
}

impl Value {
    /// The number of individual values held (the value multiplicity).
    /// Blobs and pixel sequences count as one.
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Strs(v) => v.len(),
            Value::U16s(v) => v.len(),
            Value::U32s(v) => v.len(),
            Value::I16s(v) => v.len(),
            Value::I32s(v) => v.len(),
            Value::F32s(v) => v.len(),
            Value::F64s(v) => v.len(),
            Value::Tags(v) => v.len(),
            Value::Bytes(_) | Value::PixelSequence(_) => 1,
            Value::Items(v) => v.len(),
        }
    }

    /// Whether the value holds nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Bytes(v) => v.is_empty(),
            Value::PixelSequence(v) => v.frames.is_empty(),
            _ => self.multiplicity() == 0,
        }
    }

    /// A short name of the active variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Strs(_) => "strings",
            Value::U16s(_) => "u16 list",
            Value::U32s(_) => "u32 list",
            Value::I16s(_) => "i16 list",
            Value::I32s(_) => "i32 list",
            Value::F32s(_) => "f32 list",
            Value::F64s(_) => "f64 list",
            Value::Tags(_) => "tag list",
            Value::Bytes(_) => "bytes",
            Value::Items(_) => "items",
            Value::PixelSequence(_) => "pixel sequence",
        }
    }

    /// Whether the active variant agrees with the given value kind.
    pub fn conforms_to(&self, kind: VrKind) -> bool {
        matches!(
            (self, kind),
            (Value::Strs(_), VrKind::Strings)
                | (Value::U16s(_), VrKind::U16)
                | (Value::U32s(_), VrKind::U32)
                | (Value::I16s(_), VrKind::I16)
                | (Value::I32s(_), VrKind::I32)
                | (Value::F32s(_), VrKind::F32)
                | (Value::F64s(_), VrKind::F64)
                | (Value::Tags(_), VrKind::Tags)
                | (Value::Bytes(_), VrKind::Bytes)
                | (Value::Items(_), VrKind::Sequence)
                | (Value::Items(_), VrKind::Item)
                | (Value::PixelSequence(_), VrKind::PixelData)
                | (Value::Bytes(_), VrKind::PixelData)
        )
    }

    /// An empty value of the shape demanded by the given kind.
    pub fn empty_of(kind: VrKind) -> Value {
        match kind {
            VrKind::Strings => Value::Strs(C::new()),
            VrKind::U16 => Value::U16s(C::new()),
            VrKind::U32 => Value::U32s(C::new()),
            VrKind::I16 => Value::I16s(C::new()),
            VrKind::I32 => Value::I32s(C::new()),
            VrKind::F32 => Value::F32s(C::new()),
            VrKind::F64 => Value::F64s(C::new()),
            VrKind::Tags => Value::Tags(C::new()),
            VrKind::Bytes => Value::Bytes(Vec::new()),
            VrKind::Sequence | VrKind::Item => Value::Items(Vec::new()),
            VrKind::PixelData => Value::PixelSequence(PixelFragmentSequence::default()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Strs(smallvec::smallvec![v.to_owned()])
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Strs(smallvec::smallvec![v])
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Strs(v.into())
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16s(smallvec::smallvec![v])
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32s(smallvec::smallvec![v])
    }
}

impl From<Vec<u16>> for Value {
    fn from(v: Vec<u16>) -> Self {
        Value::U16s(v.into())
    }
}

impl From<Vec<u32>> for Value {
    fn from(v: Vec<u32>) -> Self {
        Value::U32s(v.into())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<DataElement>> for Value {
    fn from(v: Vec<DataElement>) -> Self {
        Value::Items(v)
    }
}

impl From<PixelFragmentSequence> for Value {
    fn from(v: PixelFragmentSequence) -> Self {
        Value::PixelSequence(v)
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelFragmentSequence, Value};
    use crate::vr::VrKind;

    #[test]
    fn conformance_follows_the_kind_table() {
        assert!(Value::from("ORIGINAL").conforms_to(VrKind::Strings));
        assert!(Value::from(vec![1u32, 2]).conforms_to(VrKind::U32));
        assert!(Value::from(vec![0u8; 4]).conforms_to(VrKind::Bytes));
        assert!(Value::Items(vec![]).conforms_to(VrKind::Sequence));
        assert!(!Value::from(7u16).conforms_to(VrKind::U32));
        assert!(
            Value::PixelSequence(PixelFragmentSequence::default()).conforms_to(VrKind::PixelData)
        );
    }

    #[test]
    fn multiplicity_counts_individual_values() {
        assert_eq!(Value::from(vec![1u32, 2, 3]).multiplicity(), 3);
        assert_eq!(Value::from(vec![1u8, 2, 3]).multiplicity(), 1);
        assert!(Value::Strs(Default::default()).is_empty());
    }
}
