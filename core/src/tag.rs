//! The DICOM attribute tag and the well-known tag constants.

use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error raised when parsing a textual tag of the form `(GGGG,EEEE)`.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ParseTagError {
    /// The text is not shaped like a parenthesized group/element pair.
    #[snafu(display("tag `{text}` is not of the form (GGGG,EEEE)"))]
    MissingPair { text: String, backtrace: Backtrace },
    /// One of the two components is not valid 16-bit hexadecimal.
    #[snafu(display("invalid hexadecimal component in tag `{text}`"))]
    InvalidComponent {
        text: String,
        source: std::num::ParseIntError,
    },
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// A DICOM data element tag, an ordered `(group, element)` pair of 16-bit
/// numbers.
///
/// Tags order and compare lexicographically on `(group, element)`.
/// Even groups carry standard attributes, odd groups are private, group 2 is
/// file meta information, and group `0xFFFE` carries the item and delimiter
/// pseudo-tags used by the nesting machinery.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group number.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element number.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Whether this tag belongs to the item/delimiter pseudo-group.
    #[inline]
    pub fn is_item_group(self) -> bool {
        self.0 == 0xFFFE
    }

    /// Whether this tag belongs to an odd, privately defined group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// Parse a diagnostic tag string such as `"(7FE0,0010)"`.
/// Hexadecimal digits are accepted in either case,
/// and the surrounding parentheses may be omitted.
impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (group, element) = trimmed.split_once(',').context(MissingPairSnafu {
            text: s.to_owned(),
        })?;
        let group = u16::from_str_radix(group.trim(), 16).context(InvalidComponentSnafu {
            text: s.to_owned(),
        })?;
        let element = u16::from_str_radix(element.trim(), 16).context(InvalidComponentSnafu {
            text: s.to_owned(),
        })?;
        Ok(Tag(group, element))
    }
}

/// Compare a tag against a `(group, element)` tuple.
impl PartialOrd<(u16, u16)> for Tag {
    fn partial_cmp(&self, other: &(u16, u16)) -> Option<Ordering> {
        Some((self.0, self.1).cmp(other))
    }
}

/// Well-known attribute tags used throughout the codec.
pub mod tags {
    use super::Tag;

    /// Item pseudo-tag, opening one item of a sequence or pixel data chunk.
    pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
    /// Closes an undefined-length item.
    pub const ITEM_DELIMITATION: Tag = Tag(0xFFFE, 0xE00D);
    /// Closes an undefined-length sequence or encapsulated pixel data.
    pub const SEQUENCE_DELIMITATION: Tag = Tag(0xFFFE, 0xE0DD);

    /// File Meta Information Group Length, always the first element of a file.
    pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
    pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
    pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
    pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
    pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
    pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
    pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);

    pub const FILE_SET_ID: Tag = Tag(0x0004, 0x1130);
    pub const DIRECTORY_RECORD_SEQUENCE: Tag = Tag(0x0004, 0x1220);
    pub const DIRECTORY_RECORD_TYPE: Tag = Tag(0x0004, 0x1430);
    pub const REFERENCED_FILE_ID: Tag = Tag(0x0004, 0x1500);

    pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
    pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
    pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
    pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
    pub const QUERY_RETRIEVE_LEVEL: Tag = Tag(0x0008, 0x0052);
    pub const MODALITY: Tag = Tag(0x0008, 0x0060);

    pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
    pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);

    pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
    pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
    pub const IN_STACK_POSITION_NUMBER: Tag = Tag(0x0020, 0x9057);

    pub const ROWS: Tag = Tag(0x0028, 0x0010);
    pub const COLUMNS: Tag = Tag(0x0028, 0x0011);

    pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
}
