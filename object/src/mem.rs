//! The in-memory data set and its whole-file entry points.

use crate::meta;
use dcmio_core::dictionary;
use dcmio_core::error::{IoSnafu, NoSuchDataElementSnafu, Result};
use dcmio_core::tag::{tags, Tag};
use dcmio_core::DataElement;
use dcmio_encoding::{parse_transfer_syntax, Decoder, Encoder, Endianness};
use dcmio_parser::{read_element, read_file_header, write_element, write_file_header, ReadOptions};
use snafu::ResultExt;
use std::io::{Read, Write};
use std::path::Path;

/// The parsed contents of one DICOM file: its data elements in the order
/// they appeared on disk, meta group (group 2) included.
///
/// Duplicate tags are not rejected; lookups return the first match.
/// Elements are never mutated once the set is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    elements: Vec<DataElement>,
}

impl DataSet {
    /// Assemble a data set from elements already in file order.
    pub fn from_elements(elements: Vec<DataElement>) -> DataSet {
        DataSet { elements }
    }

    /// The elements in file order.
    pub fn elements(&self) -> &[DataElement] {
        &self.elements
    }

    /// Iterate over the elements in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataElement> {
        self.elements.iter()
    }

    /// Find the first element with the given tag.
    pub fn element(&self, tag: Tag) -> Result<&DataElement> {
        self.elements
            .iter()
            .find(|e| e.tag() == tag)
            .ok_or_else(|| NoSuchDataElementSnafu { tag }.build())
    }

    /// Find the first element whose tag carries the given dictionary name,
    /// e.g. `"PatientName"`.
    pub fn element_by_name(&self, name: &str) -> Result<&DataElement> {
        let entry = dictionary::lookup_name(name)?;
        self.element(entry.tag)
    }

    /// Parse a data set from an in-memory buffer holding a complete file.
    pub fn from_bytes(data: &[u8], options: ReadOptions) -> Result<DataSet> {
        DataSet::from_reader(data, data.len() as u64, options)
    }

    /// Parse a data set from a byte source delivering `length` bytes.
    ///
    /// The file header is read first (always explicit VR little endian),
    /// the transfer syntax named by the meta group is resolved, and the body
    /// is read under it until the source is exhausted. With
    /// `drop_pixel_data` set, reading stops at the PixelData element.
    pub fn from_reader<R: Read>(source: R, length: u64, options: ReadOptions) -> Result<DataSet> {
        let mut d = Decoder::new(source, length, Endianness::Little, false);
        let mut elements = read_file_header(&mut d);
        if let Some(error) = d.take_error() {
            return Err(error);
        }

        let transfer_syntax_uid = dcmio_core::element::find_by_tag(&elements, tags::TRANSFER_SYNTAX_UID)
            .ok_or_else(|| {
                dcmio_core::error::MissingMetaElementSnafu {
                    name: "TransferSyntaxUID",
                }
                .build()
            })?
            .string()?
            .to_owned();
        let (endianness, implicit) = parse_transfer_syntax(&transfer_syntax_uid)?;

        d.push_transfer_syntax(endianness, implicit);
        let mut dropped = false;
        while d.remaining() > 0 && !d.has_error() {
            match read_element(&mut d, options) {
                Some(element) => elements.push(element),
                None => {
                    dropped = !d.has_error();
                    break;
                }
            }
        }
        d.pop_transfer_syntax();

        if dropped {
            // pixel data was dropped without consuming its value, so the
            // trailing-data check does not apply
            tracing::warn!(
                "stopped at pixel data, leaving {} bytes unread",
                d.remaining()
            );
            if let Some(error) = d.take_error() {
                return Err(error);
            }
        } else {
            d.finish()?;
        }
        Ok(DataSet::from_elements(elements))
    }

    /// Serialize the data set to a complete DICOM file.
    ///
    /// The meta group is reassembled from the set's group 2 elements with
    /// defaults injected (see [`meta::assemble_meta`]); the body is written
    /// under the transfer syntax named by the meta group.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        let meta_elements = meta::assemble_meta(&self.elements)?;
        let transfer_syntax_uid = dcmio_core::element::find_by_tag(&meta_elements, tags::TRANSFER_SYNTAX_UID)
            .ok_or_else(|| {
                dcmio_core::error::MissingMetaElementSnafu {
                    name: "TransferSyntaxUID",
                }
                .build()
            })?
            .string()?
            .to_owned();
        let (endianness, implicit) = parse_transfer_syntax(&transfer_syntax_uid)?;

        let mut e = Encoder::new(Endianness::Little, false);
        write_file_header(&mut e, &meta_elements);
        e.push_transfer_syntax(endianness, implicit);
        for element in self.elements.iter().filter(|el| el.tag().group() != 0x0002) {
            write_element(&mut e, element);
        }
        e.pop_transfer_syntax();
        let bytes = e.finish()?;
        out.write_all(&bytes).context(IoSnafu)
    }

    /// Serialize the data set into a byte vector.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Serialize the data set to a file on disk.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path).context(IoSnafu)?;
        self.write_to(std::io::BufWriter::new(file))
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a DataElement;
    type IntoIter = std::slice::Iter<'a, DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse the DICOM file at the given path.
pub fn open_file<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<DataSet> {
    let file = std::fs::File::open(path).context(IoSnafu)?;
    let length = file.metadata().context(IoSnafu)?.len();
    DataSet::from_reader(std::io::BufReader::new(file), length, options)
}
