use serde::{Deserialize, Serialize};

use crate::error::{AnaglyphError, AnaglyphResult};
use crate::plane::Plane;

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit gray (1 byte per pixel, implicitly opaque).
    Gray8,
    /// 8-bit gray with alpha (2 bytes per pixel).
    GrayAlpha8,
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha8 => 2,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Whether the format stores an alpha channel.
    pub fn has_alpha(&self) -> bool {
        !matches!(self, PixelFormat::Gray8)
    }
}

/// An 8-bit interleaved pixel buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Wrap existing pixel data, checking its length against the dimensions.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> AnaglyphResult<Self> {
        let expected = (width as usize) * (height as usize) * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(AnaglyphError::InvalidArgument(format!(
                "{:?} buffer of {}x{} needs {} bytes, got {}",
                format,
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Create a gray+alpha buffer with every pixel set to `(luminance, alpha)`.
    pub fn solid_gray(width: u32, height: u32, luminance: u8, alpha: u8) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 2);
        for _ in 0..pixel_count {
            data.push(luminance);
            data.push(alpha);
        }
        Self {
            data,
            width,
            height,
            format: PixelFormat::GrayAlpha8,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel at a coordinate expanded to RGBA. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Gray8 => {
                let l = self.data[offset];
                Some([l, l, l, 255])
            }
            PixelFormat::GrayAlpha8 => {
                let l = self.data[offset];
                Some([l, l, l, self.data[offset + 1]])
            }
            PixelFormat::Rgba8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                self.data[offset + 3],
            ]),
        }
    }

    /// Set a pixel from an RGBA value. Gray formats keep the red channel as
    /// luminance. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Gray8 => {
                self.data[offset] = rgba[0];
            }
            PixelFormat::GrayAlpha8 => {
                self.data[offset] = rgba[0];
                self.data[offset + 1] = rgba[3];
            }
            PixelFormat::Rgba8 => {
                self.data[offset..offset + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Extract one channel as a float plane.
    pub fn channel_plane(&self, channel: usize) -> AnaglyphResult<Plane> {
        let bpp = self.format.bytes_per_pixel();
        if channel >= bpp {
            return Err(AnaglyphError::InvalidArgument(format!(
                "channel {} does not exist in {:?}",
                channel, self.format
            )));
        }
        let data = self
            .data
            .chunks_exact(bpp)
            .map(|px| px[channel] as f64)
            .collect();
        Plane::from_vec(self.width, self.height, data)
    }

    /// Luminance (first channel) as a float plane.
    pub fn luminance_plane(&self) -> AnaglyphResult<Plane> {
        self.channel_plane(0)
    }

    /// Alpha as a float plane; opaque for formats without alpha.
    pub fn alpha_plane(&self) -> AnaglyphResult<Plane> {
        if !self.format.has_alpha() {
            return Ok(Plane::filled(self.width, self.height, 255.0));
        }
        self.channel_plane(self.format.bytes_per_pixel() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_new() {
        let fb = FrameBuffer::new(640, 480, PixelFormat::GrayAlpha8);
        assert_eq!(fb.width, 640);
        assert_eq!(fb.height, 480);
        assert_eq!(fb.data.len(), 640 * 480 * 2);
        assert_eq!(fb.pixel_count(), 640 * 480);
    }

    #[test]
    fn test_frame_buffer_from_raw_length_check() {
        assert!(FrameBuffer::from_raw(2, 2, PixelFormat::Gray8, vec![0; 4]).is_ok());
        assert!(FrameBuffer::from_raw(2, 2, PixelFormat::GrayAlpha8, vec![0; 4]).is_err());
    }

    #[test]
    fn test_frame_buffer_solid_gray() {
        let fb = FrameBuffer::solid_gray(2, 2, 100, 200);
        assert_eq!(fb.get_pixel(0, 0), Some([100, 100, 100, 200]));
        assert_eq!(fb.get_pixel(1, 1), Some([100, 100, 100, 200]));
    }

    #[test]
    fn test_frame_buffer_get_set_pixel() {
        let mut fb = FrameBuffer::new(10, 10, PixelFormat::Rgba8);
        fb.set_pixel(5, 5, [128, 64, 32, 255]);
        assert_eq!(fb.get_pixel(5, 5), Some([128, 64, 32, 255]));
    }

    #[test]
    fn test_frame_buffer_out_of_bounds() {
        let fb = FrameBuffer::new(10, 10, PixelFormat::Gray8);
        assert_eq!(fb.get_pixel(10, 0), None);
        assert_eq!(fb.get_pixel(0, 10), None);
    }

    #[test]
    fn test_gray_alpha_is_opaque() {
        let fb = FrameBuffer::from_raw(3, 1, PixelFormat::Gray8, vec![10, 20, 30]).unwrap();
        let alpha = fb.alpha_plane().unwrap();
        assert!(alpha.data().iter().all(|&a| a == 255.0));
        let lum = fb.luminance_plane().unwrap();
        assert_eq!(lum.data(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_channel_planes_split_gray_alpha() {
        let fb =
            FrameBuffer::from_raw(2, 1, PixelFormat::GrayAlpha8, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(fb.luminance_plane().unwrap().data(), &[1.0, 3.0]);
        assert_eq!(fb.alpha_plane().unwrap().data(), &[2.0, 4.0]);
        assert!(fb.channel_plane(2).is_err());
    }
}
