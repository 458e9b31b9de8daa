use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnaglyphError, AnaglyphResult};

/// Scalar parameters of one composition run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnaglyphParams {
    /// Disparity of the nearest depth, in percent of the image width.
    pub min_disparity: f64,
    /// Disparity of the farthest depth, in percent of the image width.
    pub max_disparity: f64,
    /// Luminance correction of the left (red) view, 1.0 = unchanged.
    pub left_factor: f64,
    /// Luminance correction of the right (cyan) view, 1.0 = unchanged.
    pub right_factor: f64,
    /// Exchange the left and right views.
    pub swap_left_right: bool,
}

impl Default for AnaglyphParams {
    fn default() -> Self {
        Self {
            min_disparity: 0.0,
            max_disparity: 2.0,
            left_factor: 1.0,
            right_factor: 0.8,
            swap_left_right: false,
        }
    }
}

impl AnaglyphParams {
    /// Reject non-finite values and correction factors outside [0, 1].
    ///
    /// `max_disparity > min_disparity` is the usual setup but an inverted
    /// range is allowed and simply reverses the depth impression.
    pub fn validate(&self) -> AnaglyphResult<()> {
        let values = [
            ("min_disparity", self.min_disparity),
            ("max_disparity", self.max_disparity),
            ("left_factor", self.left_factor),
            ("right_factor", self.right_factor),
        ];
        for (key, value) in values {
            if !value.is_finite() {
                return Err(AnaglyphError::InvalidArgument(format!(
                    "{} must be finite, got {}",
                    key, value
                )));
            }
        }
        for (key, value) in [("left_factor", self.left_factor), ("right_factor", self.right_factor)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnaglyphError::InvalidArgument(format!(
                    "{} must lie in 0.0..=1.0, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

/// One layer of a manifest, listed top to bottom.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayerEntry {
    /// Layer name; carries the depth annotations (`depth=0.5`, `background`, ...).
    pub name: String,
    /// Image file, relative to the manifest.
    pub path: PathBuf,
}

/// A TOML description of a layered image and the parameters to render it with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub params: AnaglyphParams,
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

impl Manifest {
    pub fn from_toml_str(contents: &str) -> AnaglyphResult<Self> {
        toml::from_str(contents).map_err(|e| AnaglyphError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> AnaglyphResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Layer paths resolved against the directory holding the manifest.
    pub fn resolved_layers(&self, manifest_path: &Path) -> Vec<(String, PathBuf)> {
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        self.layers
            .iter()
            .map(|entry| (entry.name.clone(), base.join(&entry.path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = AnaglyphParams::default();
        assert_eq!(params.min_disparity, 0.0);
        assert_eq!(params.max_disparity, 2.0);
        assert_eq!(params.left_factor, 1.0);
        assert_eq!(params.right_factor, 0.8);
        assert!(!params.swap_left_right);
    }

    #[test]
    fn test_params_validate_rejects_factor_out_of_range() {
        let params = AnaglyphParams {
            right_factor: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(AnaglyphParams::default().validate().is_ok());
    }

    #[test]
    fn test_params_validate_rejects_nan() {
        let params = AnaglyphParams {
            min_disparity: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_manifest_parse_partial_params() {
        let manifest = Manifest::from_toml_str(
            r#"
            [params]
            max_disparity = 3.5
            swap_left_right = true

            [[layers]]
            name = "front"
            path = "front.png"

            [[layers]]
            name = "background"
            path = "bg/sky.png"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.params.max_disparity, 3.5);
        assert_eq!(manifest.params.right_factor, 0.8);
        assert!(manifest.params.swap_left_right);
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[1].name, "background");
    }

    #[test]
    fn test_manifest_invalid_toml() {
        let err = Manifest::from_toml_str("[params\nmin_disparity = ").unwrap_err();
        assert!(matches!(err, AnaglyphError::Config(_)));
    }

    #[test]
    fn test_manifest_resolves_relative_paths() {
        let manifest = Manifest {
            params: AnaglyphParams::default(),
            layers: vec![LayerEntry {
                name: "front".into(),
                path: PathBuf::from("front.png"),
            }],
        };
        let resolved = manifest.resolved_layers(Path::new("/scenes/forest/anaglyph.toml"));
        assert_eq!(resolved[0].1, PathBuf::from("/scenes/forest/front.png"));
    }
}
