//! Render fingerprints.
//!
//! A fingerprint is a SHA-256 over the parameters a render ran with and the
//! 8-bit anaglyph it produced. Two runs share a fingerprint only when both
//! agree, so a matching output rendered with different settings still shows
//! up as a different run.

use sha2::{Digest, Sha256};

use crate::config::AnaglyphParams;
use crate::frame::FrameBuffer;

const TAG: &[u8] = b"anaglyph-render/1";

/// SHA-256 identity of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Fingerprint of `frame` as rendered with `params`.
///
/// Parameters are hashed by their bit patterns, the frame by its size,
/// pixel format and raw bytes.
pub fn fingerprint(params: &AnaglyphParams, frame: &FrameBuffer) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(TAG);
    for value in [
        params.min_disparity,
        params.max_disparity,
        params.left_factor,
        params.right_factor,
    ] {
        hasher.update(value.to_bits().to_le_bytes());
    }
    hasher.update([params.swap_left_right as u8]);

    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update([frame.format as u8]);
    hasher.update(&frame.data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    #[test]
    fn test_fingerprint_is_stable() {
        let params = AnaglyphParams::default();
        let frame = FrameBuffer::solid_gray(8, 8, 90, 255);
        assert_eq!(fingerprint(&params, &frame), fingerprint(&params, &frame.clone()));
    }

    #[test]
    fn test_fingerprint_tracks_pixels() {
        let params = AnaglyphParams::default();
        let a = FrameBuffer::solid_gray(8, 8, 90, 255);
        let b = FrameBuffer::solid_gray(8, 8, 91, 255);
        assert_ne!(fingerprint(&params, &a), fingerprint(&params, &b));
    }

    #[test]
    fn test_fingerprint_tracks_params_for_identical_output() {
        let frame = FrameBuffer::new(4, 4, PixelFormat::Rgba8);
        let base = AnaglyphParams::default();
        let swapped = AnaglyphParams {
            swap_left_right: true,
            ..base
        };
        let wider = AnaglyphParams {
            max_disparity: 3.0,
            ..base
        };
        let fp = fingerprint(&base, &frame);
        assert_ne!(fp, fingerprint(&swapped, &frame));
        assert_ne!(fp, fingerprint(&wider, &frame));
    }

    #[test]
    fn test_fingerprint_tracks_shape() {
        // Same byte count, different layout.
        let params = AnaglyphParams::default();
        let a = FrameBuffer::new(2, 1, PixelFormat::GrayAlpha8);
        let b = FrameBuffer::new(4, 1, PixelFormat::Gray8);
        assert_ne!(fingerprint(&params, &a), fingerprint(&params, &b));
    }

    #[test]
    fn test_fingerprint_hex_form() {
        let fp = fingerprint(&AnaglyphParams::default(), &FrameBuffer::solid_gray(1, 1, 0, 0));
        let full = fp.to_string();
        assert_eq!(full.len(), 64);
        assert!(full.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
