//! Decoded video frames.
//!
//! A `video_frame` message carries an image (usually JPEG) as standard
//! base64. Decoding yields a [`Frame`] owning the raw image bytes, which the
//! host hands to its own image decoder.

// ============================================================================
// Imports
// ============================================================================

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use image::ImageFormat;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Standard alphabet; trailing `=` padding optional.
const FRAME_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ============================================================================
// Frame
// ============================================================================

/// One decoded image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Decodes a standard (not URL-safe) base64 payload.
    ///
    /// ASCII whitespace is ignored, so line-wrapped payloads are accepted.
    /// Padding may be present or omitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameDecode`](crate::Error::FrameDecode) if the
    /// payload is not valid base64.
    pub fn decode(data: &str) -> Result<Self> {
        let bytes = if data.bytes().any(|b| b.is_ascii_whitespace()) {
            let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            FRAME_ENGINE.decode(compact)?
        } else {
            FRAME_ENGINE.decode(data)?
        };

        Ok(Self { bytes })
    }

    /// Returns the frame bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the frame, returning its bytes.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the frame size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the frame carries no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Guesses the image container format from the leading magic bytes.
    ///
    /// Does not decode pixels. Returns `None` for unrecognized data.
    #[must_use]
    pub fn image_format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }
}

impl From<Vec<u8>> for Frame {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
    use proptest::prelude::*;

    use crate::error::Error;

    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_decode_known_payload() {
        let frame = Frame::decode("aGVsbG8=").expect("valid base64");
        assert_eq!(frame.as_bytes(), b"hello");
        assert_eq!(frame.len(), 5);
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        let frame = Frame::decode("aGVs\nbG8=\r\n").expect("wrapped base64");
        assert_eq!(frame.into_bytes(), b"hello".to_vec());
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        assert_eq!(Frame::decode("aGVsbG8").unwrap().as_bytes(), b"hello");
        assert_eq!(Frame::decode("aGk").unwrap().as_bytes(), b"hi");
        assert_eq!(Frame::decode("aGVs\nbG8").unwrap().as_bytes(), b"hello");
    }

    #[test]
    fn test_decode_rejects_impossible_length() {
        // A single trailing symbol cannot encode a whole byte.
        assert!(Frame::decode("aGVsb").is_err());
    }

    #[test]
    fn test_decode_rejects_url_safe_alphabet() {
        // 0xFB 0xFF encodes to "-_8=" in the URL-safe alphabet.
        let err = Frame::decode("-_8=").unwrap_err();
        assert!(matches!(err, Error::FrameDecode(_)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Frame::decode("not base64!").is_err());
    }

    #[test]
    fn test_empty_payload() {
        let frame = Frame::decode("").expect("empty is valid base64");
        assert!(frame.is_empty());
        assert_eq!(frame.image_format(), None);
    }

    #[test]
    fn test_image_format_sniffing() {
        let mut bytes = JPEG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0; 16]);
        let frame = Frame::from(bytes);
        assert_eq!(frame.image_format(), Some(ImageFormat::Jpeg));

        let png = Frame::from(b"\x89PNG\r\n\x1a\n\0\0\0\0".to_vec());
        assert_eq!(png.image_format(), Some(ImageFormat::Png));
    }

    proptest! {
        #[test]
        fn prop_base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let encoded = STANDARD.encode(&bytes);
            let frame = Frame::decode(&encoded).expect("encoder output must decode");
            prop_assert_eq!(frame.as_bytes(), bytes.as_slice());
        }

        #[test]
        fn prop_unpadded_base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let encoded = STANDARD_NO_PAD.encode(&bytes);
            let frame = Frame::decode(&encoded).expect("unpadded output must decode");
            prop_assert_eq!(frame.as_bytes(), bytes.as_slice());
        }
    }
}
