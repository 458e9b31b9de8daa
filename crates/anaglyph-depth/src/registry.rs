use std::collections::HashMap;

use anaglyph_core::{AnaglyphError, AnaglyphResult, Plane};

/// Named depth maps declared by `depthmap <name> <lo> to <hi>` layers.
///
/// Each stored map has been normalized to [0, 1] over its source layer and
/// rescaled to its declared `[lo, hi]` range.
#[derive(Debug, Clone, Default)]
pub struct DepthMapRegistry {
    maps: HashMap<String, Plane>,
}

impl DepthMapRegistry {
    pub fn new() -> Self {
        Self {
            maps: HashMap::new(),
        }
    }

    /// Normalize `source` and store it under `name`, rescaled to `[lo, hi]`.
    ///
    /// Returns the previously stored map of the same name, if any.
    pub fn define(
        &mut self,
        name: &str,
        source: &Plane,
        lo: f64,
        hi: f64,
    ) -> AnaglyphResult<Option<Plane>> {
        let (min, max) = source
            .min_max()
            .ok_or_else(|| AnaglyphError::DegenerateDepthMap(name.to_string()))?;
        if max <= min {
            return Err(AnaglyphError::DegenerateDepthMap(name.to_string()));
        }
        if hi <= lo {
            return Err(AnaglyphError::InvalidRange {
                name: name.to_string(),
                lo,
                hi,
            });
        }
        let map = source.map(|v| lo + (v - min) / (max - min) * (hi - lo));
        Ok(self.maps.insert(name.to_string(), map))
    }

    /// Get a map by name.
    pub fn get(&self, name: &str) -> Option<&Plane> {
        self.maps.get(name)
    }

    /// Get a map by name, failing if it was never defined.
    pub fn require(&self, name: &str) -> AnaglyphResult<&Plane> {
        self.get(name)
            .ok_or_else(|| AnaglyphError::MissingDepthMap(name.to_string()))
    }

    /// Whether a map of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Names of all registered maps.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Number of registered maps.
    pub fn count(&self) -> usize {
        self.maps.len()
    }
}
