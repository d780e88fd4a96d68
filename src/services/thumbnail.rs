//! Thumbnail decoding.
//!
//! The front-end sends thumbnails as data URIs (`data:image/png;base64,...`).
//! Everything up to and including the first comma is the media-type prefix;
//! the remainder is the standard-base64 payload.

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("thumbnail is not a data URI (no comma separator)")]
    MissingComma,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Decode a data-URI thumbnail into raw image bytes.
pub fn decode_data_uri(input: &str) -> Result<Vec<u8>, ThumbnailError> {
    let (_, payload) = input.split_once(',').ok_or(ThumbnailError::MissingComma)?;
    Ok(STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_prefix_through_first_comma() {
        // "hello" base64-encoded
        let decoded = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_keeps_commas_after_the_first_out_of_prefix() {
        // Prefix detection is positional, not semantic
        let decoded = decode_data_uri("anything,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_without_comma_fails() {
        assert!(matches!(
            decode_data_uri("aGVsbG8="),
            Err(ThumbnailError::MissingComma)
        ));
    }

    #[test]
    fn test_decode_invalid_base64_fails() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,not!!valid"),
            Err(ThumbnailError::InvalidBase64(_))
        ));
    }
}
