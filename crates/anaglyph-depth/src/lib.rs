//! # anaglyph-depth
//!
//! Turns layer metadata into disparities. Layer names are classified into
//! [`DepthPolicy`] values, depth-map layers are collected into a
//! [`DepthMapRegistry`], and [`DepthAssigner`] resolves each remaining layer to
//! a uniform or per-pixel [`Disparity`].

pub mod assigner;
pub mod policy;
pub mod registry;

pub use assigner::{Depth, DepthAssigner, Disparity, LayerDepthInfo};
pub use policy::DepthPolicy;
pub use registry::DepthMapRegistry;
