//! Character repertoire handling for DICOM text values.
//!
//! A SpecificCharacterSet element names up to three repertoires. They fill
//! the three slots of a [`CodingSystem`]: alphabetic, ideographic and
//! phonetic. Person Name values use all three for their respective
//! component groups; every other string VR decodes with the ideographic
//! slot.
//!
//! The coding system is installed globally on the decoder when the element
//! is parsed, including when it appears inside a sequence item; per-item
//! scoping is deliberately not implemented.

use dcmio_core::error::{DecodeTextSnafu, Result};
use encoding::all::{
    GB18030, ISO_2022_JP, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6,
    ISO_8859_7, ISO_8859_8, UTF_8, WINDOWS_1254, WINDOWS_31J, WINDOWS_874, WINDOWS_949,
};
use encoding::{DecoderTrap, EncodingRef};
use std::fmt;

/// Selects one of the three decoder slots of a [`CodingSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CodingSystemKind {
    /// The first component group of a Person Name.
    Alphabetic,
    /// The slot used by every string VR other than PN.
    Ideographic,
    /// The third component group of a Person Name.
    Phonetic,
}

/// How raw bytes are translated into text.
///
/// Each slot holds a decoder, or `None` for the default repertoire, in which
/// case bytes are taken as UTF-8 (a superset of the 7-bit default).
#[derive(Clone, Default)]
pub struct CodingSystem {
    alphabetic: Option<EncodingRef>,
    ideographic: Option<EncodingRef>,
    phonetic: Option<EncodingRef>,
}

impl fmt::Debug for CodingSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = |slot: &Option<EncodingRef>| slot.map_or("default", |e| e.name());
        f.debug_struct("CodingSystem")
            .field("alphabetic", &name(&self.alphabetic))
            .field("ideographic", &name(&self.ideographic))
            .field("phonetic", &name(&self.phonetic))
            .finish()
    }
}

/// Map a DICOM repertoire name to a decoder.
/// `Some(None)` is the default 7-bit repertoire; `None` means the name is
/// not recognized.
fn repertoire_for(name: &str) -> Option<Option<EncodingRef>> {
    let decoder: Option<EncodingRef> = match name {
        "" | "ISO_IR 6" | "ISO 2022 IR 6" => None,
        "ISO_IR 100" | "ISO 2022 IR 100" => Some(ISO_8859_1),
        "ISO_IR 101" | "ISO 2022 IR 101" => Some(ISO_8859_2),
        "ISO_IR 109" | "ISO 2022 IR 109" => Some(ISO_8859_3),
        "ISO_IR 110" | "ISO 2022 IR 110" => Some(ISO_8859_4),
        "ISO_IR 144" | "ISO 2022 IR 144" => Some(ISO_8859_5),
        "ISO_IR 127" | "ISO 2022 IR 127" => Some(ISO_8859_6),
        "ISO_IR 126" | "ISO 2022 IR 126" => Some(ISO_8859_7),
        "ISO_IR 138" | "ISO 2022 IR 138" => Some(ISO_8859_8),
        "ISO_IR 148" | "ISO 2022 IR 148" => Some(WINDOWS_1254),
        "ISO_IR 166" | "ISO 2022 IR 166" => Some(WINDOWS_874),
        "ISO_IR 13" | "ISO 2022 IR 13" => Some(WINDOWS_31J),
        "ISO 2022 IR 87" | "ISO 2022 IR 159" => Some(ISO_2022_JP),
        "ISO 2022 IR 149" => Some(WINDOWS_949),
        "ISO_IR 192" => Some(UTF_8),
        "GB18030" => Some(GB18030),
        _ => return None,
    };
    Some(decoder)
}

impl CodingSystem {
    /// Build a coding system from the values of a SpecificCharacterSet
    /// element.
    ///
    /// With a single name all three slots share it; with two, the second
    /// fills the ideographic and phonetic slots; with three, each slot gets
    /// its own. Unrecognized names are reported and decode as UTF-8.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> CodingSystem {
        let mut decoders = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            match repertoire_for(name) {
                Some(decoder) => decoders.push(decoder),
                None => {
                    tracing::warn!("unknown character set `{}`, assuming UTF-8", name);
                    decoders.push(None);
                }
            }
        }
        match decoders.as_slice() {
            [] => CodingSystem::default(),
            [only] => CodingSystem {
                alphabetic: *only,
                ideographic: *only,
                phonetic: *only,
            },
            [first, second] => CodingSystem {
                alphabetic: *first,
                ideographic: *second,
                phonetic: *second,
            },
            [first, second, third, ..] => CodingSystem {
                alphabetic: *first,
                ideographic: *second,
                phonetic: *third,
            },
        }
    }

    /// Decode raw bytes with the decoder of the given slot.
    pub fn decode(&self, kind: CodingSystemKind, bytes: &[u8]) -> Result<String> {
        let decoder = match kind {
            CodingSystemKind::Alphabetic => &self.alphabetic,
            CodingSystemKind::Ideographic => &self.ideographic,
            CodingSystemKind::Phonetic => &self.phonetic,
        };
        match decoder {
            None => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Some(decoder) => decoder
                .decode(bytes, DecoderTrap::Strict)
                .map_err(|message| {
                    DecodeTextSnafu {
                        message: message.into_owned(),
                    }
                    .build()
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CodingSystem, CodingSystemKind};

    #[test]
    fn single_name_fills_all_slots() {
        let cs = CodingSystem::from_names(&["ISO_IR 100"]);
        // 0xE9 is é in latin-1
        for kind in [
            CodingSystemKind::Alphabetic,
            CodingSystemKind::Ideographic,
            CodingSystemKind::Phonetic,
        ] {
            assert_eq!(cs.decode(kind, &[0x47, 0xE9]).unwrap(), "Gé");
        }
    }

    #[test]
    fn two_names_share_the_second() {
        let cs = CodingSystem::from_names(&["ISO_IR 100", "ISO_IR 144"]);
        // 0xC4 is Ä in latin-1, Ф in ISO-8859-5
        assert_eq!(
            cs.decode(CodingSystemKind::Alphabetic, &[0xC4]).unwrap(),
            "Ä"
        );
        assert_eq!(
            cs.decode(CodingSystemKind::Ideographic, &[0xC4]).unwrap(),
            "Ф"
        );
        assert_eq!(
            cs.decode(CodingSystemKind::Phonetic, &[0xC4]).unwrap(),
            "Ф"
        );
    }

    #[test]
    fn empty_name_is_seven_bit_default() {
        let cs = CodingSystem::from_names(&[""]);
        assert_eq!(
            cs.decode(CodingSystemKind::Ideographic, b"ASCII only")
                .unwrap(),
            "ASCII only"
        );
    }

    #[test]
    fn unknown_names_fall_back_to_utf8() {
        let cs = CodingSystem::from_names(&["ISO_IR 99999"]);
        assert_eq!(
            cs.decode(CodingSystemKind::Ideographic, "héllo".as_bytes())
                .unwrap(),
            "héllo"
        );
    }
}
