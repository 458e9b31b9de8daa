use std::io::Write;
use std::path::Path;

use anaglyph_core::{AnaglyphError, AnaglyphResult, FrameBuffer, PixelFormat};

/// Lossless PNG encoder using the `png` crate.
///
/// Gray, gray+alpha and RGBA buffers are written with their own color type,
/// 8 bits per channel.
pub struct PngEncoder;

impl PngEncoder {
    /// Encode a frame buffer to a PNG file, creating parent directories.
    pub fn encode(frame: &FrameBuffer, output_path: &Path) -> AnaglyphResult<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = Self::encode_to_vec(frame)?;
        std::fs::write(output_path, &bytes)
            .map_err(|e| AnaglyphError::Encode(format!("failed to write PNG file: {}", e)))?;

        tracing::info!(
            "Encoded {}x{} {:?} frame to PNG at {} ({} bytes)",
            frame.width,
            frame.height,
            frame.format,
            output_path.display(),
            bytes.len(),
        );
        Ok(())
    }

    /// Encode a frame buffer to PNG bytes in memory.
    pub fn encode_to_vec(frame: &FrameBuffer) -> AnaglyphResult<Vec<u8>> {
        let mut out = Vec::new();
        Self::write(frame, &mut out)?;
        Ok(out)
    }

    fn write<W: Write>(frame: &FrameBuffer, writer: W) -> AnaglyphResult<()> {
        if frame.width == 0 || frame.height == 0 {
            return Err(AnaglyphError::Encode(format!(
                "cannot encode an empty {}x{} frame",
                frame.width, frame.height
            )));
        }
        let expected = frame.pixel_count() * frame.format.bytes_per_pixel();
        if frame.data.len() != expected {
            return Err(AnaglyphError::Encode(format!(
                "frame holds {} bytes, expected {}",
                frame.data.len(),
                expected
            )));
        }

        let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
        encoder.set_color(color_type(frame.format));
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| AnaglyphError::Encode(format!("failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(&frame.data)
            .map_err(|e| AnaglyphError::Encode(format!("failed to write PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| AnaglyphError::Encode(format!("failed to finalize PNG: {}", e)))?;
        Ok(())
    }
}

fn color_type(format: PixelFormat) -> png::ColorType {
    match format {
        PixelFormat::Gray8 => png::ColorType::Grayscale,
        PixelFormat::GrayAlpha8 => png::ColorType::GrayscaleAlpha,
        PixelFormat::Rgba8 => png::ColorType::Rgba,
    }
}
