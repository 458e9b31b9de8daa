use anaglyph_core::hash::{self, Fingerprint};
use anaglyph_core::{AnaglyphParams, AnaglyphResult, FrameBuffer, LayerStack};
use anaglyph_depth::DepthAssigner;

use crate::compositor::{AnaglyphImage, Compositor};

/// Result of a complete render.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The float RGBA anaglyph.
    pub image: AnaglyphImage,
    /// Number of layers that were composited.
    pub composited_layers: usize,
    /// Number of depth maps that were defined.
    pub depth_maps: usize,
    /// Parameters the image was rendered with.
    pub params: AnaglyphParams,
}

impl RenderResult {
    /// The anaglyph as 8-bit RGBA.
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        self.image.to_frame_buffer()
    }

    /// Fingerprint of the 8-bit output together with its parameters.
    pub fn fingerprint(&self) -> Fingerprint {
        hash::fingerprint(&self.params, &self.to_frame_buffer())
    }
}

/// Renders a layer stack into an anaglyph.
///
/// One run builds the depth assignment for the whole stack, then feeds every
/// compositable layer from the bottom of the stack to the top into a fresh
/// compositor. The order is part of the result: nearer layers must be
/// blended after farther ones.
#[derive(Debug, Clone, Default)]
pub struct AnaglyphPipeline {
    params: AnaglyphParams,
}

impl AnaglyphPipeline {
    pub fn new(params: AnaglyphParams) -> Self {
        Self { params }
    }

    /// Render the stack.
    pub fn render(&self, stack: &LayerStack) -> AnaglyphResult<RenderResult> {
        self.render_with_progress(stack, |_, _| {})
    }

    /// Render the stack, calling `progress(done, total)` after each composited
    /// layer. `total` counts every layer, depth-map definitions included.
    pub fn render_with_progress(
        &self,
        stack: &LayerStack,
        mut progress: impl FnMut(usize, usize),
    ) -> AnaglyphResult<RenderResult> {
        let assigner = DepthAssigner::from_params(stack, &self.params)?;
        let mut compositor = Compositor::from_params(&self.params);
        let total = stack.len();
        let mut done = 0;

        for (index, layer) in stack.back_to_front() {
            if assigner.policy(index)?.is_depth_map_definition() {
                continue;
            }
            let disparity = assigner.disparity(index)?;
            let (lo, hi) = disparity.range();
            tracing::debug!(
                "layer {} '{}': {} disparity {}..{} px",
                index,
                layer.name,
                assigner.policy(index)?,
                lo,
                hi
            );
            compositor.apply(&layer.pixels, &disparity)?;
            done += 1;
            progress(done, total);
        }

        let image = compositor.result(self.params.swap_left_right)?;
        tracing::info!(
            "Composited {} of {} layers into a {}x{} anaglyph ({} depth maps)",
            done,
            total,
            image.width(),
            image.height(),
            assigner.registry().count()
        );

        Ok(RenderResult {
            image,
            composited_layers: done,
            depth_maps: assigner.registry().count(),
            params: self.params,
        })
    }
}
