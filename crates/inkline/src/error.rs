use crate::coverage::CoverageKind;

/// Errors raised while preparing data for the GPU core.
///
/// The shaders themselves have no error channel; everything that would turn
/// into non-finite geometry on the GPU is rejected here instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid surface {width}x{height} at scale {scale_factor}: all values must be positive")]
    InvalidSurface {
        width: u32,
        height: u32,
        scale_factor: f32,
    },

    #[error("line thickness must be positive and finite, got {0}")]
    InvalidThickness(f32),

    #[error("miter limit must be finite and at least 1.0, got {0}")]
    InvalidMiterLimit(f32),

    #[error("polyline needs at least two distinct points, got {0}")]
    DegeneratePolyline(usize),

    #[error(
        "coverage data is {actual} bytes, expected {expected} for a {width}x{height} {kind:?} bitmap"
    )]
    CoverageSize {
        kind: CoverageKind,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check a line thickness before it reaches a vertex buffer.
pub(crate) fn check_thickness(thickness: f32) -> Result<f32> {
    if thickness.is_finite() && thickness > 0.0 {
        Ok(thickness)
    } else {
        Err(Error::InvalidThickness(thickness))
    }
}
