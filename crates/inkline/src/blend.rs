//! Glyph fragment stage and the dual-source blend it feeds.
//!
//! The fragment stage never touches alpha for anti-aliasing. It hands the
//! blend unit a solid color and a per-channel coverage value, and the blend
//! state computes `color * blend + dst * (1 - blend)` independently for each
//! channel. Folding coverage into alpha would collapse the three subpixel
//! channels into one.

use glam::{Vec2, Vec4};

use crate::color::Color;
use crate::coverage::{CoverageBitmap, CoverageKind};

/// The two outputs written to color attachment 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphFragmentOutput {
    /// Blend source 0: the draw's foreground color.
    pub color: Vec4,
    /// Blend source 1: sampled coverage, alpha forced to 1.
    pub blend: Vec4,
}

/// CPU mirror of the glyph fragment stage.
///
/// `tex_coords` are texel units; they are normalized by the bitmap size before
/// sampling, like `textureDimensions` does on the GPU.
pub fn shade_glyph(
    tex_coords: Vec2,
    coverage: &CoverageBitmap,
    foreground: Color,
) -> GlyphFragmentOutput {
    let sample = coverage.sample(tex_coords / coverage.size_px());
    let blend = match coverage.kind() {
        CoverageKind::Grayscale => Vec4::new(sample.x, sample.x, sample.x, 1.0),
        CoverageKind::Subpixel => sample.extend(1.0),
    };
    GlyphFragmentOutput {
        color: foreground.into(),
        blend,
    }
}

/// The fixed-function blend equation configured for the glyph pipeline:
/// `src_factor = Src1`, `dst_factor = OneMinusSrc1`, operation add.
pub fn composite(output: GlyphFragmentOutput, background: Vec4) -> Vec4 {
    output.color * output.blend + background * (Vec4::ONE - output.blend)
}
