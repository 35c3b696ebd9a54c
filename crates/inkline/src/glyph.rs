use glam::{Vec2, Vec4};

use crate::surface::SurfaceDimensions;
use crate::transform::px_to_clip;

/// Vertex format for glyph quads.
///
/// `caret_position` and `px_bounds_offset` are logical pixels in the centered,
/// y-up convention of [`px_to_clip`]. `tex_coords` are raw texel coordinates
/// into the coverage atlas; the fragment stage normalizes them.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct GlyphVertex {
    pub caret_position: [f32; 2],
    pub px_bounds_offset: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl GlyphVertex {
    pub const fn new(
        caret_position: [f32; 2],
        px_bounds_offset: [f32; 2],
        tex_coords: [f32; 2],
    ) -> Self {
        Self {
            caret_position,
            px_bounds_offset,
            tex_coords,
        }
    }
}

/// Output of the glyph vertex stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphVaryings {
    pub clip_position: Vec4,
    pub tex_coords: Vec2,
}

/// CPU mirror of the glyph vertex stage.
pub fn assemble_glyph_vertex(vertex: &GlyphVertex, surface: &SurfaceDimensions) -> GlyphVaryings {
    let px = Vec2::from(vertex.caret_position) + Vec2::from(vertex.px_bounds_offset);
    let clip = px_to_clip(surface, px);
    GlyphVaryings {
        clip_position: Vec4::new(clip.x, clip.y, 0.0, 1.0),
        tex_coords: Vec2::from(vertex.tex_coords),
    }
}

/// Pixel bounds of a rasterized glyph relative to its caret.
///
/// Rasterizers report these y-down (`min.y` is the top edge, usually
/// negative above the baseline).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl PixelBounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Texel rectangle of a glyph inside the coverage atlas (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TexelRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl TexelRect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }
}

/// One glyph's screen quad: four vertices sharing the caret position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    pub vertices: [GlyphVertex; 4],
}

impl GlyphQuad {
    /// Triangle list indices for a quad, relative to its first vertex.
    pub const INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

    /// Build a quad from a caret position, y-down glyph bounds and the
    /// glyph's texel rectangle in the atlas.
    ///
    /// Vertex order is top-left, bottom-left, bottom-right, top-right.
    pub fn new(caret: Vec2, bounds: PixelBounds, texels: TexelRect) -> Self {
        let caret = caret.to_array();
        // Flip the rasterizer's y-down bounds into the y-up pixel space.
        let top = -bounds.min.y;
        let bottom = -bounds.max.y;
        Self {
            vertices: [
                GlyphVertex::new(caret, [bounds.min.x, top], [texels.min.x, texels.min.y]),
                GlyphVertex::new(caret, [bounds.min.x, bottom], [texels.min.x, texels.max.y]),
                GlyphVertex::new(caret, [bounds.max.x, bottom], [texels.max.x, texels.max.y]),
                GlyphVertex::new(caret, [bounds.max.x, top], [texels.max.x, texels.min.y]),
            ],
        }
    }

    /// Indices for this quad when its first vertex sits at `base`.
    pub fn indices(base: u32) -> [u32; 6] {
        Self::INDICES.map(|i| base + i)
    }
}
