#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! Byte-level encoding and decoding for the `dcmio` DICOM codec.
//!
//! This crate hosts the bounded streaming [`Decoder`](crate::decode::Decoder)
//! and the accumulating [`Encoder`](crate::encode::Encoder), both of which
//! track the active transfer syntax on an explicit stack and record the first
//! error they encounter in a sticky slot; the
//! [character repertoire machinery](crate::text); and the
//! [transfer syntax resolver](crate::transfer_syntax).

pub mod decode;
pub mod encode;
pub mod text;
pub mod transfer_syntax;

pub use byteordered::Endianness;

pub use crate::decode::Decoder;
pub use crate::encode::Encoder;
pub use crate::text::{CodingSystem, CodingSystemKind};
pub use crate::transfer_syntax::{canonical_transfer_syntax, parse_transfer_syntax};
