#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! High-level DICOM object handling for the `dcmio` codec.
//!
//! A [`DataSet`] is the ordered list of data elements of one DICOM file,
//! meta group included. This crate provides the whole-file entry points
//! ([`DataSet::from_bytes`], [`DataSet::from_reader`], [`open_file`],
//! [`DataSet::write_to`]), the file meta defaults applied on writing, the
//! [query-by-example matcher](crate::query) and
//! [DICOMDIR path extraction](crate::dicomdir).

pub mod dicomdir;
pub mod mem;
pub mod meta;
pub mod query;

pub use dcmio_parser::ReadOptions;

pub use crate::dicomdir::{read_dicomdir, DirectoryRecord};
pub use crate::mem::{open_file, DataSet};
pub use crate::query::query;
