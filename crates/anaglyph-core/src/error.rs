/// Core error types for the Anaglyph compositor.
use std::path::PathBuf;

/// A specialized Result type for Anaglyph operations.
pub type AnaglyphResult<T> = Result<T, AnaglyphError>;

/// Top-level error type encompassing all Anaglyph subsystems.
///
/// Every variant is fatal to a composition run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AnaglyphError {
    #[error("depth map '{0}' is referenced but never defined")]
    MissingDepthMap(String),

    #[error("depth map '{0}' has no dynamic range (min == max)")]
    DegenerateDepthMap(String),

    #[error("depth map '{name}' declares an empty range {lo} to {hi}")]
    InvalidRange { name: String, lo: f64, hi: f64 },

    #[error("no layer was composited")]
    EmptyComposition,

    #[error("shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid layer name '{name}': {reason}")]
    InvalidLayerName { name: String, reason: String },

    #[error("layer '{0}' defines a depth map and cannot be composited")]
    NotCompositable(String),

    #[error("layer index {index} out of range (stack has {len} layers)")]
    LayerIndexOutOfRange { index: usize, len: usize },

    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AnaglyphError {
    /// Create a shape mismatch error from expected and actual dimensions.
    pub fn shape_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        AnaglyphError::ShapeMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            width: actual.0,
            height: actual.1,
        }
    }

    /// Create an invalid layer name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnaglyphError::InvalidLayerName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        AnaglyphError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = AnaglyphError::shape_mismatch((100, 50), (80, 50));
        assert_eq!(err.to_string(), "shape mismatch: expected 100x50, got 80x50");
    }

    #[test]
    fn test_missing_depth_map_display() {
        let err = AnaglyphError::MissingDepthMap("fog".into());
        assert!(err.to_string().contains("'fog'"));
    }

    #[test]
    fn test_asset_error_display() {
        let err = AnaglyphError::asset("file not found", "/layers/front.png");
        assert!(err.to_string().contains("file not found"));
    }
}
