//! The registry of well-known unique identifiers.

use crate::error::{Result, UnknownUidSnafu};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// The category a registered UID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UidType {
    /// A transfer syntax specifier.
    TransferSyntax,
    /// A storage or service SOP class.
    SopClass,
    /// A well-known SOP instance.
    SopInstance,
    /// An application context name.
    ApplicationContextName,
    /// An LDAP object identifier from the configuration management profile.
    LdapOid,
}

impl fmt::Display for UidType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            UidType::TransferSyntax => "Transfer Syntax",
            UidType::SopClass => "SOP Class",
            UidType::SopInstance => "SOP Instance",
            UidType::ApplicationContextName => "Application Context Name",
            UidType::LdapOid => "LDAP OID",
        };
        f.write_str(name)
    }
}

/// One registered UID with its human-readable name and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UidInfo {
    pub uid: &'static str,
    pub name: &'static str,
    pub kind: UidType,
}

const fn entry(uid: &'static str, name: &'static str, kind: UidType) -> UidInfo {
    UidInfo { uid, name, kind }
}

/// String constants for UIDs referenced directly by the codec.
pub mod uids {
    /// Implicit VR Little Endian: Default Transfer Syntax for DICOM
    pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
    /// Explicit VR Little Endian
    pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
    /// Deflated Explicit VR Little Endian
    pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
    /// Explicit VR Big Endian
    pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
    /// Media Storage Directory Storage (the DICOMDIR SOP class)
    pub const MEDIA_STORAGE_DIRECTORY_STORAGE: &str = "1.2.840.10008.1.3.10";
    /// Patient Root Query/Retrieve Information Model - FIND
    pub const PATIENT_ROOT_QR_FIND: &str = "1.2.840.10008.5.1.4.1.2.1.1";
    /// Study Root Query/Retrieve Information Model - FIND
    pub const STUDY_ROOT_QR_FIND: &str = "1.2.840.10008.5.1.4.1.2.2.1";
}

static ENTRIES: &[UidInfo] = &[
    entry("1.2.840.10008.1.1", "Verification SOP Class", UidType::SopClass),
    entry(
        uids::IMPLICIT_VR_LITTLE_ENDIAN,
        "Implicit VR Little Endian",
        UidType::TransferSyntax,
    ),
    entry(
        uids::EXPLICIT_VR_LITTLE_ENDIAN,
        "Explicit VR Little Endian",
        UidType::TransferSyntax,
    ),
    entry(
        uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
        "Deflated Explicit VR Little Endian",
        UidType::TransferSyntax,
    ),
    entry(
        uids::EXPLICIT_VR_BIG_ENDIAN,
        "Explicit VR Big Endian",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.50",
        "JPEG Baseline (Process 1)",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.51",
        "JPEG Extended (Process 2 & 4)",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.57",
        "JPEG Lossless, Non-Hierarchical (Process 14)",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.70",
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.80",
        "JPEG-LS Lossless Image Compression",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.81",
        "JPEG-LS Lossy (Near-Lossless) Image Compression",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.90",
        "JPEG 2000 Image Compression (Lossless Only)",
        UidType::TransferSyntax,
    ),
    entry(
        "1.2.840.10008.1.2.4.91",
        "JPEG 2000 Image Compression",
        UidType::TransferSyntax,
    ),
    entry("1.2.840.10008.1.2.5", "RLE Lossless", UidType::TransferSyntax),
    entry(
        uids::MEDIA_STORAGE_DIRECTORY_STORAGE,
        "Media Storage Directory Storage",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.1.20.1.1",
        "Storage Commitment Push Model SOP Instance",
        UidType::SopInstance,
    ),
    entry(
        "1.2.840.10008.3.1.1.1",
        "DICOM Application Context Name",
        UidType::ApplicationContextName,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.1",
        "Computed Radiography Image Storage",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.1.2",
        "Digital Mammography X-Ray Image Storage - For Presentation",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.2",
        "CT Image Storage",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.4",
        "MR Image Storage",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.6.1",
        "Ultrasound Image Storage",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.1.7",
        "Secondary Capture Image Storage",
        UidType::SopClass,
    ),
    entry(
        uids::PATIENT_ROOT_QR_FIND,
        "Patient Root Query/Retrieve Information Model - FIND",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.2.1.2",
        "Patient Root Query/Retrieve Information Model - MOVE",
        UidType::SopClass,
    ),
    entry(
        uids::STUDY_ROOT_QR_FIND,
        "Study Root Query/Retrieve Information Model - FIND",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.5.1.4.1.2.2.2",
        "Study Root Query/Retrieve Information Model - MOVE",
        UidType::SopClass,
    ),
    entry(
        "1.2.840.10008.15.0.4.8",
        "dicomTransferCapability",
        UidType::LdapOid,
    ),
];

static BY_UID: Lazy<HashMap<&'static str, &'static UidInfo>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.uid, e)).collect());

/// Find the registry record of the given UID.
/// Trailing spaces and NUL padding are ignored.
pub fn lookup_uid(uid: &str) -> Result<&'static UidInfo> {
    let trimmed = uid.trim_end_matches(|c| c == '\0' || c == ' ');
    BY_UID
        .get(trimmed)
        .copied()
        .ok_or_else(|| UnknownUidSnafu { uid: trimmed.to_owned() }.build())
}
