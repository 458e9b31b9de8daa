//! Layer-name classification.
//!
//! A layer's name decides how its depth is obtained. Recognized forms, all
//! matched as prefixes (anything after the match is ignored):
//!
//! | name                                 | policy                      |
//! |--------------------------------------|-----------------------------|
//! | `depthmap <name> <lo> to <hi>`       | [`DepthPolicy::DepthMapDefinition`] |
//! | `reldepthmap=<name>`                 | [`DepthPolicy::RelativeMapRef`] |
//! | `fixdepthmap=<name>`                 | [`DepthPolicy::FixedMapRef`] |
//! | `background...`                      | [`DepthPolicy::Background`] |
//! | `depth=<value>`                      | [`DepthPolicy::FixedDepth`] |
//! | anything else                        | [`DepthPolicy::Normal`]     |
//!
//! Whitespace is allowed around the `=` of the map references. Map names are
//! runs of alphanumerics and `_`; numbers are an optional `-` followed by
//! digits and dots.

use serde::Serialize;

use anaglyph_core::{AnaglyphError, AnaglyphResult};

/// How a layer's depth is determined, decided once from its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DepthPolicy {
    /// Depth follows the layer's position among the normal layers.
    Normal,
    /// Fixed depth 0.
    Background,
    /// Explicit depth; 0 is nearest, 1 farthest, other values extrapolate.
    FixedDepth(f64),
    /// Declares a named depth map over `[lo, hi]`; not composited itself.
    DepthMapDefinition { name: String, lo: f64, hi: f64 },
    /// Named map rescaled into the window between the neighbouring layer depths.
    RelativeMapRef(String),
    /// Named map used as absolute depth.
    FixedMapRef(String),
}

impl DepthPolicy {
    /// Classify a layer name.
    ///
    /// Fails only when a recognized form carries a number that does not parse
    /// (for example `depth=0.5.1`).
    pub fn classify(layer_name: &str) -> AnaglyphResult<Self> {
        if let Some((name, lo, hi)) = match_depth_map(layer_name) {
            return Ok(DepthPolicy::DepthMapDefinition {
                name: name.to_string(),
                lo: parse_number(layer_name, lo)?,
                hi: parse_number(layer_name, hi)?,
            });
        }
        if let Some(name) = match_map_ref(layer_name, "reldepthmap") {
            return Ok(DepthPolicy::RelativeMapRef(name.to_string()));
        }
        if let Some(name) = match_map_ref(layer_name, "fixdepthmap") {
            return Ok(DepthPolicy::FixedMapRef(name.to_string()));
        }
        if layer_name.starts_with("background") {
            return Ok(DepthPolicy::Background);
        }
        if let Some(value) = layer_name
            .strip_prefix("depth=")
            .and_then(|rest| Scanner::new(rest).number())
        {
            return Ok(DepthPolicy::FixedDepth(parse_number(layer_name, value)?));
        }
        Ok(DepthPolicy::Normal)
    }

    /// Layers counted for the even spacing of order-derived depths.
    pub fn is_normal(&self) -> bool {
        matches!(self, DepthPolicy::Normal)
    }

    pub fn is_depth_map_definition(&self) -> bool {
        matches!(self, DepthPolicy::DepthMapDefinition { .. })
    }
}

impl std::fmt::Display for DepthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthPolicy::Normal => write!(f, "normal"),
            DepthPolicy::Background => write!(f, "background"),
            DepthPolicy::FixedDepth(d) => write!(f, "depth={}", d),
            DepthPolicy::DepthMapDefinition { name, lo, hi } => {
                write!(f, "depthmap {} {} to {}", name, lo, hi)
            }
            DepthPolicy::RelativeMapRef(name) => write!(f, "reldepthmap={}", name),
            DepthPolicy::FixedMapRef(name) => write!(f, "fixdepthmap={}", name),
        }
    }
}

fn parse_number(layer_name: &str, text: &str) -> AnaglyphResult<f64> {
    text.parse::<f64>()
        .map_err(|_| AnaglyphError::invalid_name(layer_name, format!("'{}' is not a number", text)))
}

/// `depthmap\s+<word>\s+<number>\s+to\s+<number>`
fn match_depth_map(input: &str) -> Option<(&str, &str, &str)> {
    let mut s = Scanner::new(input);
    s.keyword("depthmap")?;
    s.whitespace1()?;
    let name = s.word()?;
    s.whitespace1()?;
    let lo = s.number()?;
    s.whitespace1()?;
    s.keyword("to")?;
    s.whitespace1()?;
    let hi = s.number()?;
    Some((name, lo, hi))
}

/// `<keyword>\s*=\s*<word>`
fn match_map_ref<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let mut s = Scanner::new(input);
    s.keyword(keyword)?;
    s.whitespace0();
    s.keyword("=")?;
    s.whitespace0();
    s.word()
}

/// Forward-only cursor over a layer name.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn keyword(&mut self, kw: &str) -> Option<()> {
        if self.rest().starts_with(kw) {
            self.pos += kw.len();
            Some(())
        } else {
            None
        }
    }

    /// Consume the longest prefix whose chars satisfy `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn whitespace0(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn whitespace1(&mut self) -> Option<()> {
        (!self.take_while(char::is_whitespace).is_empty()).then_some(())
    }

    fn word(&mut self) -> Option<&'a str> {
        let w = self.take_while(|c| c.is_alphanumeric() || c == '_');
        (!w.is_empty()).then_some(w)
    }

    fn number(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let _ = self.keyword("-");
        if self.take_while(|c| c.is_ascii_digit() || c == '.').is_empty() {
            self.pos = start;
            return None;
        }
        Some(&self.input[start..self.pos])
    }
}
