//! Text decoding helpers for subprocess output.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Decode pdftk output as strict UTF-8.
///
/// A leading UTF-8 BOM is dropped. Malformed input is an error rather than
/// being replaced, since replacement characters would be written back into
/// bookmark titles on save.
pub fn decode_utf8(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let body = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == encoding_rs::UTF_8 => &bytes[bom_len..],
        _ => bytes,
    };

    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            let valid = encoding_rs::Encoding::utf8_valid_up_to(body);
            Error::Utf8(format!("invalid byte sequence at offset {valid}"))
        })
}

/// Decode diagnostic output, replacing malformed sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (result, _encoding, _malformed) = encoding_rs::UTF_8.decode(bytes);
    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_utf8() {
        assert_eq!(decode_utf8("Kapitel Ü".as_bytes()).unwrap(), "Kapitel Ü");
    }

    #[test]
    fn test_decode_strips_bom() {
        assert_eq!(decode_utf8(b"\xEF\xBB\xBFInfoBegin").unwrap(), "InfoBegin");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let err = decode_utf8(b"ok\xFFbad").unwrap_err();
        assert!(err.to_string().contains("offset 2"));
    }

    #[test]
    fn test_decode_lossy_replaces_and_trims() {
        assert_eq!(decode_lossy(b"Error: \xFF\n"), "Error: \u{FFFD}");
    }
}
