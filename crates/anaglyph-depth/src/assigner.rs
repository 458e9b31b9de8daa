//! Depth and disparity resolution for a layer stack.
//!
//! Depth is a unitless value where 0 is the nearest layer and 1 the farthest.
//! It is mapped linearly onto `[min_disparity, max_disparity]` (percent of
//! the image width) and rounded to whole pixels.

use anaglyph_core::{AnaglyphError, AnaglyphParams, AnaglyphResult, LayerStack, Plane};
use serde::Serialize;

use crate::policy::DepthPolicy;
use crate::registry::DepthMapRegistry;

/// Depth of a layer before conversion to pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Depth {
    Scalar(f64),
    Field(Plane),
}

/// Horizontal shift of a layer, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Disparity {
    /// The whole layer moves by the same amount.
    Uniform(i64),
    /// Per-pixel shift, rounded to whole pixels but stored as float.
    Field(Plane),
}

impl Disparity {
    /// Smallest and largest shift of this disparity.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Disparity::Uniform(d) => (*d as f64, *d as f64),
            Disparity::Field(field) => field.min_max().unwrap_or((0.0, 0.0)),
        }
    }
}

/// Per-layer report used by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct LayerDepthInfo {
    pub index: usize,
    pub name: String,
    pub policy: DepthPolicy,
    /// `None` for depth-map definitions, which are not composited.
    pub disparity: Option<(f64, f64)>,
}

/// Assigns every layer of a stack a disparity.
///
/// Construction classifies all layer names and builds the depth-map registry
/// up front, so every map exists before any disparity is resolved regardless
/// of where its definition sits in the stack.
#[derive(Debug, Clone)]
pub struct DepthAssigner {
    width: u32,
    min_disparity: f64,
    max_disparity: f64,
    names: Vec<String>,
    policies: Vec<DepthPolicy>,
    registry: DepthMapRegistry,
    /// Stack indices of the normal layers, top to bottom.
    normal_layers: Vec<usize>,
}

impl DepthAssigner {
    pub fn new(stack: &LayerStack, min_disparity: f64, max_disparity: f64) -> AnaglyphResult<Self> {
        let mut policies = vec![DepthPolicy::Normal; stack.len()];
        let mut registry = DepthMapRegistry::new();
        let mut normal_layers = Vec::new();

        for (index, layer) in stack.back_to_front() {
            let policy = DepthPolicy::classify(&layer.name)?;
            if policy.is_normal() {
                normal_layers.push(index);
            }
            if let DepthPolicy::DepthMapDefinition { name, lo, hi } = &policy {
                let source = layer.pixels.luminance_plane()?;
                if registry.define(name, &source, *lo, *hi)?.is_some() {
                    tracing::warn!(
                        "depth map '{}' redefined by layer {} ('{}')",
                        name,
                        index,
                        layer.name
                    );
                }
                tracing::debug!("registered depth map '{}' ({} to {})", name, lo, hi);
            }
            policies[index] = policy;
        }
        normal_layers.reverse();

        tracing::debug!(
            "{} layers, {} normal, {} depth maps",
            stack.len(),
            normal_layers.len(),
            registry.count()
        );

        Ok(Self {
            width: stack.width,
            min_disparity,
            max_disparity,
            names: stack.layers().iter().map(|l| l.name.clone()).collect(),
            policies,
            registry,
            normal_layers,
        })
    }

    pub fn from_params(stack: &LayerStack, params: &AnaglyphParams) -> AnaglyphResult<Self> {
        Self::new(stack, params.min_disparity, params.max_disparity)
    }

    /// Classification of the layer at stack position `index`.
    pub fn policy(&self, index: usize) -> AnaglyphResult<&DepthPolicy> {
        self.policies
            .get(index)
            .ok_or(AnaglyphError::LayerIndexOutOfRange {
                index,
                len: self.policies.len(),
            })
    }

    pub fn registry(&self) -> &DepthMapRegistry {
        &self.registry
    }

    /// Number of normal layers, `n`.
    pub fn normal_count(&self) -> usize {
        self.normal_layers.len()
    }

    /// Stack indices of the normal layers, top to bottom.
    pub fn normal_layers(&self) -> &[usize] {
        &self.normal_layers
    }

    /// Depth spacing between neighbouring normal layers, `1/(n-1)`, or None
    /// when fewer than two normal layers exist.
    fn step(&self) -> Option<f64> {
        let n = self.normal_layers.len();
        (n > 1).then(|| 1.0 / (n - 1) as f64)
    }

    /// Depth implied by a position in the order, `position/(n-1)`.
    fn order_depth(&self, position: usize) -> f64 {
        match self.normal_layers.len() {
            n if n > 1 => position as f64 / (n - 1) as f64,
            _ => 0.0,
        }
    }

    /// Depth of the layer at `index`.
    pub fn depth(&self, index: usize) -> AnaglyphResult<Depth> {
        let policy = self.policy(index)?;
        let depth = match policy {
            DepthPolicy::RelativeMapRef(name) => {
                let map = self.registry.require(name)?;
                // The window is centred on the layer's stack index, not its
                // normal-layer position.
                let centre = self.order_depth(index);
                let step = self.step().unwrap_or_else(|| {
                    tracing::warn!(
                        "layer '{}' uses a relative depth map but there are fewer than two normal layers; the map collapses to depth {}",
                        self.names[index],
                        centre
                    );
                    0.0
                });
                let d0 = centre - step;
                let d1 = centre + step;
                Depth::Field(map.map(|v| d0 + v * (d1 - d0)))
            }
            DepthPolicy::FixedMapRef(name) => Depth::Field(self.registry.require(name)?.clone()),
            DepthPolicy::FixedDepth(d) => Depth::Scalar(*d),
            DepthPolicy::Background => Depth::Scalar(0.0),
            DepthPolicy::Normal => {
                // `normal_layers` is sorted, and every Normal layer is in it.
                let position = self
                    .normal_layers
                    .binary_search(&index)
                    .unwrap_or_else(|p| p);
                Depth::Scalar(self.order_depth(position))
            }
            DepthPolicy::DepthMapDefinition { .. } => {
                return Err(AnaglyphError::NotCompositable(
                    self.names[index].clone(),
                ))
            }
        };
        Ok(depth)
    }

    /// Disparity of the layer at `index`, in pixels.
    pub fn disparity(&self, index: usize) -> AnaglyphResult<Disparity> {
        let disparity = match self.depth(index)? {
            Depth::Scalar(d) => {
                // Any shift of a full width or more already blanks the layer.
                let w = self.width as f64;
                Disparity::Uniform(self.to_pixels(d).clamp(-w, w) as i64)
            }
            Depth::Field(field) => Disparity::Field(field.map(|d| self.to_pixels(d))),
        };
        Ok(disparity)
    }

    /// `floor(0.5 + (min + (max - min) * depth) * width / 100)`
    fn to_pixels(&self, depth: f64) -> f64 {
        let d = self.min_disparity + (self.max_disparity - self.min_disparity) * depth;
        (0.5 + d * self.width as f64 / 100.0).floor()
    }

    /// Policy and disparity range of every layer, top to bottom.
    pub fn describe(&self) -> AnaglyphResult<Vec<LayerDepthInfo>> {
        self.policies
            .iter()
            .enumerate()
            .map(|(index, policy)| {
                let disparity = if policy.is_depth_map_definition() {
                    None
                } else {
                    Some(self.disparity(index)?.range())
                };
                Ok(LayerDepthInfo {
                    index,
                    name: self.names[index].clone(),
                    policy: policy.clone(),
                    disparity,
                })
            })
            .collect()
    }
}
