#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! Data element parsing and printing for the `dcmio` DICOM codec.
//!
//! [`read_element`](crate::read::read_element) decodes one element, with
//! full recursion into sequences, items and encapsulated pixel data, from a
//! [`Decoder`](dcmio_encoding::Decoder) positioned at a tag boundary, and
//! [`write_element`](crate::write::write_element) is its inverse. The
//! file-level framing (preamble, magic code, meta group) lives in
//! [`read_file_header`](crate::read::read_file_header) and
//! [`write_file_header`](crate::write::write_file_header).

pub mod read;
pub mod write;

pub use crate::read::{read_element, read_file_header, ReadOptions};
pub use crate::write::{write_element, write_file_header};
