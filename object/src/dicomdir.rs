//! Extraction of referenced file paths from a DICOMDIR data set.

use crate::mem::{open_file, DataSet};
use dcmio_core::error::Result;
use dcmio_core::tag::tags;
use dcmio_parser::ReadOptions;
use std::path::Path;

/// One file referenced by a DICOMDIR directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// The referenced file path, with the ReferencedFileID components
    /// joined by `/`.
    pub path: String,
}

/// Parse the DICOMDIR file at the given path and return the file paths its
/// directory records reference.
pub fn read_dicomdir<P: AsRef<Path>>(path: P) -> Result<Vec<DirectoryRecord>> {
    directory_records(&open_file(path, ReadOptions::default())?)
}

/// Collect the referenced file paths of a parsed DICOMDIR data set.
///
/// Every item of the DirectoryRecordSequence contributes one record when it
/// carries a ReferencedFileID; records without one (directory-level records,
/// for instance) are skipped.
pub fn directory_records(data_set: &DataSet) -> Result<Vec<DirectoryRecord>> {
    let sequence = data_set.element(tags::DIRECTORY_RECORD_SEQUENCE)?;
    let mut records = Vec::new();
    for item in sequence.items()? {
        for child in item.items()? {
            if child.tag() == tags::REFERENCED_FILE_ID {
                let path = child.strings()?.join("/");
                if !path.is_empty() {
                    records.push(DirectoryRecord { path });
                }
            }
        }
    }
    Ok(records)
}
