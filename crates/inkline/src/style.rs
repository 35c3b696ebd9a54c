use crate::color::{css, Color};
use crate::error::{Error, Result};

/// Default miter limit, the SVG `stroke-miterlimit` initial value.
///
/// At 4.0 joints sharper than about 29 degrees are capped.
pub const DEFAULT_MITER_LIMIT: f32 = 4.0;

/// Per-draw configuration of the glyph pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphStyle {
    /// Solid text color, emitted as blend source 0.
    pub color: Color,
}

impl GlyphStyle {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self::new(css::WHITE)
    }
}

/// Per-draw configuration of both line pipelines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    miter_limit: f32,
}

impl LineStyle {
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }

    /// Set the miter limit. Values below 1.0 would shorten straight joints.
    pub fn with_miter_limit(mut self, miter_limit: f32) -> Result<Self> {
        if !miter_limit.is_finite() || miter_limit < 1.0 {
            return Err(Error::InvalidMiterLimit(miter_limit));
        }
        self.miter_limit = miter_limit;
        Ok(self)
    }

    /// Longest allowed miter, as a multiple of the line thickness.
    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(css::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miter_limit_validation() {
        let style = LineStyle::default();
        assert_eq!(style.miter_limit(), DEFAULT_MITER_LIMIT);
        assert_eq!(style.with_miter_limit(10.0).unwrap().miter_limit(), 10.0);
        assert_eq!(
            style.with_miter_limit(0.5),
            Err(Error::InvalidMiterLimit(0.5))
        );
        assert!(style.with_miter_limit(f32::INFINITY).is_err());
    }
}
