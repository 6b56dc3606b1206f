//! Value representation codes and their classification into value kinds.

use crate::tag::{tags, Tag};
use std::fmt;
use std::str::{from_utf8, FromStr};

/// A DICOM value representation, identified on the wire by a two-letter
/// uppercase code.
///
/// `NA` is the pseudo-representation of items and delimiters, which carry no
/// VR of their own. `OX` is a dictionary artifact standing for "OB or OW";
/// the reader normalizes it to `OW` and the writer never emits it.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Not Applicable (items and delimiters)
    NA,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Word
    OW,
    /// Other Byte or Other Word (legacy dictionary entry for pixel data)
    OX,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Locator
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes,
    /// as they appear in an explicit-VR element header.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_str(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            NA => "NA",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OW => "OW",
            OX => "OX",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
        }
    }

    /// Retrieve this VR's two-byte wire representation.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_str().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Whether an explicit-VR header for this representation uses the long
    /// form: two reserved bytes followed by a 32-bit value length.
    pub fn is_long_form(self) -> bool {
        use VR::*;
        matches!(self, NA | OB | OD | OF | OL | OW | SQ | UN | UC | UR | UT)
    }

    /// Whether the undefined-length sentinel is disallowed for this VR.
    pub fn forbids_undefined_length(self) -> bool {
        matches!(self, VR::UC | VR::UR | VR::UT)
    }
}

impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "NA" => Ok(NA),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OW" => Ok(OW),
            "OX" => Ok(OX),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// The concrete value shape of an element, determined by its tag and VR.
///
/// Reader and writer dispatch on this classification rather than on the
/// runtime contents of the value container.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum VrKind {
    /// A list of strings.
    Strings,
    /// A single byte blob.
    Bytes,
    /// A list of unsigned 16-bit integers.
    U16,
    /// A list of unsigned 32-bit integers.
    U32,
    /// A list of signed 16-bit integers.
    I16,
    /// A list of signed 32-bit integers.
    I32,
    /// A list of 32-bit floats.
    F32,
    /// A list of 64-bit floats.
    F64,
    /// A list of attribute tags.
    Tags,
    /// A sequence of items.
    Sequence,
    /// One item holding arbitrary sub-elements.
    Item,
    /// The pixel data container: offset table plus frames.
    PixelData,
}

impl VrKind {
    /// Classify an element by its tag and value representation.
    pub fn of(tag: Tag, vr: VR) -> VrKind {
        if tag == tags::ITEM {
            return VrKind::Item;
        }
        if tag == tags::PIXEL_DATA {
            return VrKind::PixelData;
        }
        match vr {
            VR::AT => VrKind::Tags,
            VR::OB | VR::OD | VR::OF | VR::OL | VR::OW | VR::OX | VR::UN => VrKind::Bytes,
            VR::UL => VrKind::U32,
            VR::SL => VrKind::I32,
            VR::US => VrKind::U16,
            VR::SS => VrKind::I16,
            VR::FL => VrKind::F32,
            VR::FD => VrKind::F64,
            VR::SQ => VrKind::Sequence,
            VR::NA => VrKind::Item,
            _ => VrKind::Strings,
        }
    }
}
