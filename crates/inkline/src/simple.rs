//! Unjoined line segments drawn by distance test.
//!
//! Each segment is a screen-aligned quad covering its endpoints plus the line
//! thickness; the fragment stage keeps pixels closer than the thickness to the
//! infinite line through the segment. The test has no notion of segment
//! extent, so only the quad bounds the band: near the ends it stays square
//! instead of rounding off, and corners between segments are not joined.
//! Meant for debug overlays and short segments.

use glam::Vec2;

use crate::error::{check_thickness, Result};

/// One segment for the simple line pipeline, in clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct SimplePolylineVertex {
    pub line_start: [f32; 2],
    pub line_end: [f32; 2],
    /// Coverage radius in clip units.
    pub thickness: f32,
}

impl SimplePolylineVertex {
    pub fn new(line_start: Vec2, line_end: Vec2, thickness: f32) -> Result<Self> {
        Ok(Self {
            line_start: line_start.to_array(),
            line_end: line_end.to_array(),
            thickness: check_thickness(thickness)?,
        })
    }
}

/// Corner order of the per-segment quad, as two triangles.
///
/// Each entry picks `(max_x, max_y)` when true, `min` otherwise.
pub const SIMPLE_QUAD_CORNERS: [(bool, bool); 6] = [
    (false, false),
    (true, false),
    (true, true),
    (false, false),
    (true, true),
    (false, true),
];

/// Clip space `(min, max)` of the quad drawn for a segment: its bounding box
/// grown by the thickness.
pub fn simple_quad_bounds(vertex: &SimplePolylineVertex) -> (Vec2, Vec2) {
    let start = Vec2::from(vertex.line_start);
    let end = Vec2::from(vertex.line_end);
    (
        start.min(end) - Vec2::splat(vertex.thickness),
        start.max(end) + Vec2::splat(vertex.thickness),
    )
}

/// Clip space corner `index` (0..6) of the quad that bounds a segment.
///
/// Indices past the end wrap around.
pub fn simple_quad_corner(vertex: &SimplePolylineVertex, index: usize) -> Vec2 {
    let (min, max) = simple_quad_bounds(vertex);
    let (use_max_x, use_max_y) = SIMPLE_QUAD_CORNERS[index % SIMPLE_QUAD_CORNERS.len()];
    Vec2::new(
        if use_max_x { max.x } else { min.x },
        if use_max_y { max.y } else { min.y },
    )
}

/// Per-segment values handed from the vertex to the fragment stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleLineVaryings {
    pub line_start: Vec2,
    pub line_end: Vec2,
    /// Unit direction from start to end; zero for a point segment.
    pub line_direction: Vec2,
    pub thickness: f32,
}

impl SimpleLineVaryings {
    pub fn from_vertex(vertex: &SimplePolylineVertex) -> Self {
        let line_start = Vec2::from(vertex.line_start);
        let line_end = Vec2::from(vertex.line_end);
        let delta = line_end - line_start;
        let length = delta.length();
        let line_direction = if length > 0.0 {
            delta / length
        } else {
            Vec2::ZERO
        };
        Self {
            line_start,
            line_end,
            line_direction,
            thickness: vertex.thickness,
        }
    }

    /// Squared distance from `point` to the infinite line through
    /// `line_start` along `line_direction`.
    ///
    /// A point segment has no direction and measures to `line_start`.
    pub fn distance_squared(&self, point: Vec2) -> f32 {
        let offset = point - self.line_start;
        let residual = offset - self.line_direction * offset.dot(self.line_direction);
        residual.length_squared()
    }

    /// Whether a fragment at `point` is drawn. A point exactly `thickness`
    /// away is outside.
    pub fn covers(&self, point: Vec2) -> bool {
        self.distance_squared(point) < self.thickness * self.thickness
    }
}

/// CPU mirror of the simple line vertex stage for one quad corner.
pub fn expand_simple_vertex(
    vertex: &SimplePolylineVertex,
    index: usize,
) -> (Vec2, SimpleLineVaryings) {
    (
        simple_quad_corner(vertex, index),
        SimpleLineVaryings::from_vertex(vertex),
    )
}
