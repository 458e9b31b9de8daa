//! # anaglyph-core
//!
//! Core types and primitives for the Anaglyph stereo compositor.
//! This crate contains foundational types shared across all Anaglyph crates:
//! pixel buffers, float planes, layers, run parameters, and error types.

pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod layer;
pub mod plane;

pub use config::{AnaglyphParams, LayerEntry, Manifest};
pub use error::{AnaglyphError, AnaglyphResult};
pub use frame::{FrameBuffer, PixelFormat};
pub use layer::{Layer, LayerStack};
pub use plane::Plane;
