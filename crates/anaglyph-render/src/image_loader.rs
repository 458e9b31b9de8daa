//! Image loading module.
//! Decodes PNG, JPEG, and other formats into gray+alpha layers.

use std::path::{Path, PathBuf};

use anaglyph_core::{AnaglyphError, AnaglyphResult, FrameBuffer, Layer, LayerStack, PixelFormat};

fn to_frame_buffer(img: image::DynamicImage) -> FrameBuffer {
    let gray = img.to_luma_alpha8();
    let (width, height) = gray.dimensions();
    let mut fb = FrameBuffer::new(width, height, PixelFormat::GrayAlpha8);
    fb.data = gray.into_raw();
    fb
}

/// Load an image file as a gray+alpha frame buffer.
///
/// Color images are reduced to luminance.
pub fn load_image(path: &Path) -> AnaglyphResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        AnaglyphError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;
    Ok(to_frame_buffer(img))
}

/// Load named layer images, listed top to bottom, into a stack.
///
/// Every layer must have the size of the first one.
pub fn load_stack(entries: &[(String, PathBuf)]) -> AnaglyphResult<LayerStack> {
    let mut layers = Vec::with_capacity(entries.len());
    for (name, path) in entries {
        let pixels = load_image(path)?;
        tracing::debug!(
            "Loaded layer '{}' from {} ({}x{})",
            name,
            path.display(),
            pixels.width,
            pixels.height
        );
        if let Some(first) = layers.first().map(|l: &Layer| l.pixels.dimensions()) {
            if pixels.dimensions() != first {
                return Err(AnaglyphError::asset(
                    format!(
                        "layer '{}' is {}x{} but the image is {}x{}",
                        name, pixels.width, pixels.height, first.0, first.1
                    ),
                    path,
                ));
            }
        }
        layers.push(Layer::new(name.clone(), pixels));
    }
    LayerStack::from_layers(layers)
}
