//! Pixel to clip space conversions.
//!
//! Pixel positions use a centered origin with y pointing up, the same
//! orientation as clip space, so no shift or flip is applied here. Callers that
//! start from a top-left origin must center their coordinates first.

use glam::Vec2;

use crate::surface::SurfaceDimensions;

/// Map an absolute logical pixel position to clip space.
///
/// `clip = 2 * px * scale_factor / surface_px`. Linear and unclamped.
pub fn px_to_clip(surface: &SurfaceDimensions, px: Vec2) -> Vec2 {
    2.0 * px * surface.scale_factor() / surface.size_px()
}

/// Inverse of [`px_to_clip`].
pub fn clip_to_px(surface: &SurfaceDimensions, clip: Vec2) -> Vec2 {
    clip * surface.size_px() / (2.0 * surface.scale_factor())
}

/// Map a physical pixel offset to a clip space offset.
///
/// `clip_offset = px_offset / surface_px`. One clip unit spans half the
/// surface, so an offset of `n` here moves a vertex `n / 2` physical pixels.
pub fn px_offset_to_clip(surface: &SurfaceDimensions, px_offset: Vec2) -> Vec2 {
    px_offset / surface.size_px()
}

/// Scale a clip space direction into on-screen proportions and renormalize.
///
/// Returns `None` for a zero (or non-finite) direction.
pub fn aspect_correct(surface: &SurfaceDimensions, clip_dir: Vec2) -> Option<Vec2> {
    let scaled = clip_dir * surface.size_px();
    let length = scaled.length();
    if length > 0.0 && length.is_finite() {
        Some(scaled / length)
    } else {
        None
    }
}
