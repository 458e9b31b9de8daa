use crate::error::{AnaglyphError, AnaglyphResult};
use crate::frame::FrameBuffer;

/// One input layer: a name carrying depth annotations and its gray(+alpha) pixels.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer name, e.g. `"tree"`, `"depth=0.3"`, `"reldepthmap=hill"`.
    pub name: String,
    /// `Gray8` or `GrayAlpha8` pixel data.
    pub pixels: FrameBuffer,
}

impl Layer {
    pub fn new(name: impl Into<String>, pixels: FrameBuffer) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }
}

/// The ordered layers of one image, topmost (nearest) first.
#[derive(Debug, Clone)]
pub struct LayerStack {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Build a stack from top-to-bottom layers, taking the image size from the first one.
    pub fn from_layers(layers: Vec<Layer>) -> AnaglyphResult<Self> {
        let (width, height) = layers
            .first()
            .map(|l| l.pixels.dimensions())
            .ok_or_else(|| AnaglyphError::InvalidArgument("layer stack is empty".into()))?;
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers with their stack positions, from the bottom (farthest) up.
    pub fn back_to_front(&self) -> impl Iterator<Item = (usize, &Layer)> {
        self.layers.iter().enumerate().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[&str]) -> LayerStack {
        LayerStack::from_layers(
            names
                .iter()
                .map(|n| Layer::new(*n, FrameBuffer::solid_gray(4, 2, 0, 255)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_stack_takes_size_from_first_layer() {
        let stack = stack_of(&["a", "b"]);
        assert_eq!((stack.width, stack.height), (4, 2));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_empty_stack_rejected() {
        assert!(LayerStack::from_layers(Vec::new()).is_err());
    }

    #[test]
    fn test_back_to_front_order() {
        let stack = stack_of(&["top", "middle", "bottom"]);
        let order: Vec<(usize, &str)> = stack
            .back_to_front()
            .map(|(i, l)| (i, l.name.as_str()))
            .collect();
        assert_eq!(order, vec![(2, "bottom"), (1, "middle"), (0, "top")]);
    }
}
