//! The library-wide error type.
//!
//! A single enum covers every failure the codec can report, because the byte
//! I/O layer keeps a *sticky* first-error slot: the first error recorded by
//! any layer wins, later operations observe it and return placeholder
//! values, and callers check once per logical operation. Splitting the error
//! space per crate would force lossy conversions at the point where the
//! parser records an error on the decoder it is driving.

use crate::dictionary::uid::UidType;
use crate::tag::Tag;
use crate::vr::VR;
use snafu::{Backtrace, Snafu};

/// Type alias for a result using the library-wide error.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type of the codec.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    /// Raised when the content does not look like DICOM at all,
    /// such as a missing `DICM` marker or a missing group length element.
    #[snafu(display("content is not DICOM or is corrupted"))]
    InvalidFormat { backtrace: Backtrace },

    /// The element at the current position carries a tag other than the one
    /// the structure requires.
    #[snafu(display("unexpected tag {tag}"))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },

    /// A read overran the active byte limit.
    #[snafu(display("requested {requested} bytes with only {remaining} remaining"))]
    NotEnoughData {
        requested: u64,
        remaining: u64,
        backtrace: Backtrace,
    },

    /// Bytes were left unconsumed inside the outermost limit.
    #[snafu(display("unconsumed trailing data ({remaining} bytes remaining)"))]
    TrailingData { remaining: u64, backtrace: Backtrace },

    /// A defined value length was not an even number of bytes.
    #[snafu(display("odd value length {length} in element {tag}"))]
    OddLength {
        tag: Tag,
        length: u32,
        backtrace: Backtrace,
    },

    /// The undefined-length sentinel was used with a VR that disallows it.
    #[snafu(display("undefined length is not allowed for VR {vr}"))]
    UndefinedLengthForbidden { vr: VR, backtrace: Backtrace },

    /// A scalar element declared the undefined-length sentinel.
    #[snafu(display("element {tag} with VR {vr} requires a defined length"))]
    UndefinedScalarLength {
        tag: Tag,
        vr: VR,
        backtrace: Backtrace,
    },

    /// A sequence contained a child whose tag is not Item.
    #[snafu(display("non-item element {tag} inside a sequence"))]
    NonItemInSequence { tag: Tag, backtrace: Backtrace },

    /// A delimiter declared a non-zero length.
    #[snafu(display("delimiter {tag} has non-zero length {length}"))]
    UnexpectedDelimiterLength {
        tag: Tag,
        length: u32,
        backtrace: Backtrace,
    },

    /// Two VRs that must agree belong to different value kinds, such as the
    /// VR found on the stream against the dictionary's.
    #[snafu(display("VR mismatch for element {tag}: {stream} does not agree with {dictionary}"))]
    VrMismatch {
        tag: Tag,
        stream: VR,
        dictionary: VR,
        backtrace: Backtrace,
    },

    /// An element value does not have the shape its VR demands (write path).
    #[snafu(display("element {tag} holds {found} where VR {vr} was expected"))]
    ValueType {
        tag: Tag,
        vr: VR,
        found: &'static str,
        backtrace: Backtrace,
    },

    /// Pixel data must carry exactly one fragment sequence value.
    #[snafu(display("pixel data element must hold one fragment sequence"))]
    InvalidPixelData { backtrace: Backtrace },

    /// A defined-length pixel data element must hold exactly one frame.
    #[snafu(display("defined-length pixel data with {frames} frames cannot be encoded"))]
    MultiFramePixelData { frames: usize, backtrace: Backtrace },

    /// The UID is not present in the registry.
    #[snafu(display("unknown UID `{uid}`"))]
    UnknownUid { uid: String, backtrace: Backtrace },

    /// The UID is registered, but does not name a transfer syntax.
    #[snafu(display("UID `{uid}` is not a transfer syntax (is {kind})"))]
    NotATransferSyntax {
        uid: String,
        kind: UidType,
        backtrace: Backtrace,
    },

    /// A strict dictionary lookup failed.
    #[snafu(display("tag {tag} not found in the dictionary"))]
    TagNotFound { tag: Tag, backtrace: Backtrace },

    /// No dictionary entry carries the given name.
    #[snafu(display("no attribute named `{name}`"))]
    NoSuchAttributeName { name: String, backtrace: Backtrace },

    /// Lookup of an element in a data set failed.
    #[snafu(display("no element {tag} in data set"))]
    NoSuchDataElement { tag: Tag, backtrace: Backtrace },

    /// A typed accessor was used on a value of another shape.
    #[snafu(display("requested {requested} but element {tag} holds {found}"))]
    CastValue {
        tag: Tag,
        requested: &'static str,
        found: &'static str,
        backtrace: Backtrace,
    },

    /// A typed accessor expected exactly one value.
    #[snafu(display("expected one value in element {tag}, found {count}"))]
    ValueMultiplicity {
        tag: Tag,
        count: usize,
        backtrace: Backtrace,
    },

    /// A required file meta element is absent.
    #[snafu(display("missing required meta element `{name}`"))]
    MissingMetaElement {
        name: &'static str,
        backtrace: Backtrace,
    },

    /// A query filter for a non-UID element carried more than one value.
    #[snafu(display("filter for element {tag} carries multiple values"))]
    AmbiguousFilter { tag: Tag, backtrace: Backtrace },

    /// Text could not be decoded under the active character repertoire.
    #[snafu(display("could not decode text: {message}"))]
    DecodeText {
        message: String,
        backtrace: Backtrace,
    },

    /// An error from the underlying byte source or sink.
    #[snafu(display("I/O error"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}
