//! Stereo accumulation of shifted layers.
//!
//! Layers are fed back to front. Each one is shifted left and right by its
//! disparity and blended into a left and a right luminance accumulator with
//! the "new on top" rule
//!
//! ```text
//! acc   = (acc * (255 - alpha) + layer * alpha) / 255
//! acc_a = max(acc_a, alpha)
//! ```
//!
//! The running alpha of the accumulator is not used as a weight, so this is
//! not Porter-Duff "over"; the output depends on it being exactly this rule.

use anaglyph_core::{AnaglyphError, AnaglyphParams, AnaglyphResult, FrameBuffer, PixelFormat, Plane};
use anaglyph_depth::Disparity;

use crate::resample::{shift_x, shift_x_field};

/// The four accumulation planes, all of one shape.
#[derive(Debug, Clone)]
struct Accumulators {
    left: Plane,
    right: Plane,
    left_alpha: Plane,
    right_alpha: Plane,
}

impl Accumulators {
    fn zeroed(width: u32, height: u32) -> Self {
        Self {
            left: Plane::new(width, height),
            right: Plane::new(width, height),
            left_alpha: Plane::new(width, height),
            right_alpha: Plane::new(width, height),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        self.left.dimensions()
    }
}

#[derive(Debug, Clone)]
enum AccumulationState {
    Empty,
    Accumulating(Accumulators),
}

/// Final RGBA anaglyph as float channels.
#[derive(Debug, Clone, PartialEq)]
pub struct AnaglyphImage {
    width: u32,
    height: u32,
    /// Interleaved RGBA.
    data: Vec<f64>,
}

impl AnaglyphImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGBA samples.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// RGBA at `(x, y)`. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f64; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [0.0; 4];
        px.copy_from_slice(&self.data[offset..offset + 4]);
        Some(px)
    }

    /// Convert to 8-bit RGBA, clamping every channel to [0, 255] and truncating.
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.width, self.height, PixelFormat::Rgba8);
        for (dst, &v) in fb.data.iter_mut().zip(&self.data) {
            *dst = v.clamp(0.0, 255.0) as u8;
        }
        fb
    }
}

/// Accumulates left/right views of a back-to-front layer sequence.
///
/// Starts empty; the first update fixes the image shape for the rest of the
/// run. Rendering the result does not change the state, so it may be called
/// repeatedly.
#[derive(Debug, Clone)]
pub struct Compositor {
    left_factor: f64,
    right_factor: f64,
    state: AccumulationState,
}

impl Compositor {
    /// Create a compositor with per-eye luminance correction factors in [0, 1].
    pub fn new(left_factor: f64, right_factor: f64) -> Self {
        Self {
            left_factor,
            right_factor,
            state: AccumulationState::Empty,
        }
    }

    pub fn from_params(params: &AnaglyphParams) -> Self {
        Self::new(params.left_factor, params.right_factor)
    }

    /// Shape fixed by the first accumulated layer.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match &self.state {
            AccumulationState::Empty => None,
            AccumulationState::Accumulating(acc) => Some(acc.dimensions()),
        }
    }

    /// Accumulated left and right luminance, if any layer was added.
    pub fn views(&self) -> Option<(&Plane, &Plane)> {
        match &self.state {
            AccumulationState::Empty => None,
            AccumulationState::Accumulating(acc) => Some((&acc.left, &acc.right)),
        }
    }

    /// Accumulated left and right alpha, if any layer was added.
    pub fn alphas(&self) -> Option<(&Plane, &Plane)> {
        match &self.state {
            AccumulationState::Empty => None,
            AccumulationState::Accumulating(acc) => Some((&acc.left_alpha, &acc.right_alpha)),
        }
    }

    /// Accumulators of the given shape, allocating them on first use.
    fn accumulators(&mut self, dims: (u32, u32)) -> AnaglyphResult<&mut Accumulators> {
        match self.dimensions() {
            None => {
                tracing::debug!("allocating {}x{} accumulators", dims.0, dims.1);
                self.state =
                    AccumulationState::Accumulating(Accumulators::zeroed(dims.0, dims.1));
            }
            Some(current) if current != dims => {
                return Err(AnaglyphError::shape_mismatch(current, dims));
            }
            Some(_) => {}
        }
        match &mut self.state {
            AccumulationState::Accumulating(acc) => Ok(acc),
            AccumulationState::Empty => unreachable!("accumulators allocated above"),
        }
    }

    /// Add a layer shifted uniformly by `disparity` pixels.
    ///
    /// The left view is shifted by `-disparity`, the right by `+disparity`.
    /// Layers without an alpha channel are fully opaque.
    pub fn update(&mut self, pixels: &FrameBuffer, disparity: i64) -> AnaglyphResult<()> {
        let luminance = pixels.luminance_plane()?;
        let alpha = pixels.alpha_plane()?;
        let acc = self.accumulators(pixels.dimensions())?;

        let left = shift_x(&luminance, disparity.saturating_neg());
        let right = shift_x(&luminance, disparity);
        let left_alpha = shift_x(&alpha, disparity.saturating_neg());
        let right_alpha = shift_x(&alpha, disparity);

        blend(&mut acc.left, &mut acc.left_alpha, &left, &left_alpha);
        blend(&mut acc.right, &mut acc.right_alpha, &right, &right_alpha);
        Ok(())
    }

    /// Add a layer shifted per pixel by `disparity`.
    ///
    /// See [`shift_x_field`] for the sampling rule; the field must match the
    /// layer's shape.
    pub fn update_field(&mut self, pixels: &FrameBuffer, disparity: &Plane) -> AnaglyphResult<()> {
        if disparity.dimensions() != pixels.dimensions() {
            return Err(AnaglyphError::shape_mismatch(
                pixels.dimensions(),
                disparity.dimensions(),
            ));
        }
        let luminance = pixels.luminance_plane()?;
        let alpha = pixels.alpha_plane()?;
        let acc = self.accumulators(pixels.dimensions())?;

        let left = shift_x_field(&luminance, disparity, -1.0);
        let right = shift_x_field(&luminance, disparity, 1.0);
        let left_alpha = shift_x_field(&alpha, disparity, -1.0);
        let right_alpha = shift_x_field(&alpha, disparity, 1.0);

        blend(&mut acc.left, &mut acc.left_alpha, &left, &left_alpha);
        blend(&mut acc.right, &mut acc.right_alpha, &right, &right_alpha);
        Ok(())
    }

    /// Add a layer with whichever kind of disparity it was assigned.
    pub fn apply(&mut self, pixels: &FrameBuffer, disparity: &Disparity) -> AnaglyphResult<()> {
        match disparity {
            Disparity::Uniform(d) => self.update(pixels, *d),
            Disparity::Field(field) => self.update_field(pixels, field),
        }
    }

    /// Combine the views into the red/cyan anaglyph.
    ///
    /// Red carries the left view, green and blue the right; `swap_left_right`
    /// exchanges them. Each view is scaled by its factor `f` and lifted by
    /// `(1 - f) / 2`. Alpha is the larger of the two accumulated alphas.
    pub fn result(&self, swap_left_right: bool) -> AnaglyphResult<AnaglyphImage> {
        let acc = match &self.state {
            AccumulationState::Empty => return Err(AnaglyphError::EmptyComposition),
            AccumulationState::Accumulating(acc) => acc,
        };
        let (l, r) = if swap_left_right {
            (&acc.right, &acc.left)
        } else {
            (&acc.left, &acc.right)
        };
        let f1 = self.left_factor;
        let f2 = self.right_factor;
        let (width, height) = acc.dimensions();

        let mut data = Vec::with_capacity(l.data().len() * 4);
        let samples = l
            .data()
            .iter()
            .zip(r.data())
            .zip(acc.left_alpha.data().iter().zip(acc.right_alpha.data()));
        for ((&lv, &rv), (&la, &ra)) in samples {
            let red = lv * f1 + (1.0 - f1) / 2.0;
            let cyan = rv * f2 + (1.0 - f2) / 2.0;
            data.extend_from_slice(&[red, cyan, cyan, la.max(ra)]);
        }

        Ok(AnaglyphImage {
            width,
            height,
            data,
        })
    }
}

fn blend(acc: &mut Plane, acc_alpha: &mut Plane, layer: &Plane, alpha: &Plane) {
    for (a, (&v, &w)) in acc.data_mut().iter_mut().zip(layer.data().iter().zip(alpha.data())) {
        *a = (*a * (255.0 - w) + v * w) / 255.0;
    }
    for (a, &w) in acc_alpha.data_mut().iter_mut().zip(alpha.data()) {
        *a = w.max(*a);
    }
}
