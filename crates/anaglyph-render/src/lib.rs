//! # anaglyph-render
//!
//! The Anaglyph rendering engine. Takes a layer stack and produces the
//! red/cyan image: layers are shifted by their disparities and accumulated
//! into left and right views, strictly back to front, on a single thread.

pub mod compositor;
pub mod image_loader;
pub mod pipeline;
pub mod resample;

pub use compositor::{AnaglyphImage, Compositor};
pub use pipeline::{AnaglyphPipeline, RenderResult};
