//! # anaglyph-encode
//!
//! Encoding module. Writes finished frame buffers to lossless PNG files.

pub mod png;

pub use crate::png::PngEncoder;
