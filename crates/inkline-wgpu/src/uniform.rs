use inkline::{GlyphStyle, LineStyle, SurfaceDimensions};

/// Surface dimensions as seen by every shader (group 0, binding 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniform {
    pub size_px: [f32; 2],
    pub scale_factor: f32,
    pub _padding: f32,
}

impl From<&SurfaceDimensions> for SurfaceUniform {
    fn from(surface: &SurfaceDimensions) -> Self {
        Self {
            size_px: surface.size_px().to_array(),
            scale_factor: surface.scale_factor(),
            _padding: 0.0,
        }
    }
}

/// Per-draw style, bound with a dynamic offset.
///
/// Glyph draws only read `color`; line draws also read `miter_limit`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StyleUniform {
    pub color: [f32; 4],
    pub miter_limit: f32,
    pub _padding: [f32; 3],
}

/// Binding size of [`StyleUniform`]. Slots in the style buffer are this
/// size rounded up to the device's uniform offset alignment.
pub const STYLE_UNIFORM_SIZE: u64 = std::mem::size_of::<StyleUniform>() as u64;

impl From<&GlyphStyle> for StyleUniform {
    fn from(style: &GlyphStyle) -> Self {
        Self {
            color: style.color.to_array(),
            miter_limit: 0.0,
            _padding: [0.0; 3],
        }
    }
}

impl From<&LineStyle> for StyleUniform {
    fn from(style: &LineStyle) -> Self {
        Self {
            color: style.color.to_array(),
            miter_limit: style.miter_limit(),
            _padding: [0.0; 3],
        }
    }
}

/// Round `size` up to a multiple of `alignment`.
pub(crate) fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}
