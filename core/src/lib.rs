#![deny(trivial_numeric_casts, unsafe_code)]
#![warn(missing_debug_implementations, unused_qualifications)]
//! Core data model of the `dcmio` DICOM codec.
//!
//! This crate hosts the types that every other layer of the library is built
//! upon: the attribute [tag](crate::Tag), the [value representation]
//! (crate::VR) codes and their [kind classifier](crate::VrKind), the
//! heterogeneous [value](crate::Value) container, the owned
//! [data element](crate::DataElement), the standard
//! [tag dictionary](crate::dictionary) and [UID registry]
//! (crate::dictionary::uid), and the shared [error type](crate::error::Error)
//! used by the sticky error channel of the byte I/O layer.

pub mod dictionary;
pub mod element;
pub mod error;
pub mod tag;
pub mod value;
pub mod vr;

pub use crate::element::DataElement;
pub use crate::error::{Error, Result};
pub use crate::tag::{tags, Tag};
pub use crate::value::{PixelFragmentSequence, Value};
pub use crate::vr::{VrKind, VR};
