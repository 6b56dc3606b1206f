//! Resolution of transfer syntax UIDs into decoding parameters.

use byteordered::Endianness;
use dcmio_core::dictionary::uid::{self, uids, UidType};
use dcmio_core::error::{NotATransferSyntaxSnafu, Result};
use snafu::ensure;

/// Return the canonical transfer syntax UID with the same element encoding
/// as the given UID.
///
/// The four standard syntaxes map to themselves. Any other UID registered
/// as a transfer syntax (compressed pixel data syntaxes, for instance)
/// encodes its elements as explicit VR little endian. UIDs of any other
/// category are an error.
pub fn canonical_transfer_syntax(uid: &str) -> Result<&'static str> {
    match uid.trim_end_matches(|c| c == '\0' || c == ' ') {
        uids::IMPLICIT_VR_LITTLE_ENDIAN => Ok(uids::IMPLICIT_VR_LITTLE_ENDIAN),
        uids::EXPLICIT_VR_LITTLE_ENDIAN => Ok(uids::EXPLICIT_VR_LITTLE_ENDIAN),
        uids::EXPLICIT_VR_BIG_ENDIAN => Ok(uids::EXPLICIT_VR_BIG_ENDIAN),
        uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN => Ok(uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN),
        other => {
            let info = uid::lookup_uid(other)?;
            ensure!(
                info.kind == UidType::TransferSyntax,
                NotATransferSyntaxSnafu {
                    uid: other.to_owned(),
                    kind: info.kind,
                }
            );
            Ok(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        }
    }
}

/// Resolve a transfer syntax UID into its `(byte order, implicit VR)`
/// element encoding.
///
/// Deflated explicit VR little endian resolves like its inflated
/// counterpart: the codec expects the caller to hand it decompressed input.
pub fn parse_transfer_syntax(uid: &str) -> Result<(Endianness, bool)> {
    match canonical_transfer_syntax(uid)? {
        uids::IMPLICIT_VR_LITTLE_ENDIAN => Ok((Endianness::Little, true)),
        uids::EXPLICIT_VR_BIG_ENDIAN => Ok((Endianness::Big, false)),
        _ => Ok((Endianness::Little, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_transfer_syntax, parse_transfer_syntax};
    use byteordered::Endianness;
    use dcmio_core::error::Error;

    #[test]
    fn standard_syntaxes_resolve() {
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2").unwrap(),
            (Endianness::Little, true)
        );
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2.1").unwrap(),
            (Endianness::Little, false)
        );
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2.1.99").unwrap(),
            (Endianness::Little, false)
        );
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2.2").unwrap(),
            (Endianness::Big, false)
        );
    }

    #[test]
    fn registered_compressed_syntaxes_fall_back_to_explicit_le() {
        assert_eq!(
            canonical_transfer_syntax("1.2.840.10008.1.2.4.50").unwrap(),
            "1.2.840.10008.1.2.1"
        );
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2.4.91").unwrap(),
            (Endianness::Little, false)
        );
    }

    #[test]
    fn non_transfer_syntax_uids_are_rejected() {
        // a registered LDAP OID is not a transfer syntax
        assert!(matches!(
            parse_transfer_syntax("1.2.840.10008.15.0.4.8"),
            Err(Error::NotATransferSyntax { .. })
        ));
        // unregistered UIDs fail the registry lookup
        assert!(matches!(
            parse_transfer_syntax("1.2.3.4"),
            Err(Error::UnknownUid { .. })
        ));
    }

    #[test]
    fn padding_is_ignored() {
        assert_eq!(
            parse_transfer_syntax("1.2.840.10008.1.2\0").unwrap(),
            (Endianness::Little, true)
        );
    }
}
