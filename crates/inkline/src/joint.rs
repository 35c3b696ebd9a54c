//! Mitered ribbon expansion for polylines.
//!
//! Every path point is emitted twice, once per [`MiterDir`], and the vertex
//! stage pushes each copy out along the joint's miter. Consecutive segments
//! share those vertices, so corners have no seams.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{check_thickness, Result};
use crate::surface::SurfaceDimensions;
use crate::transform::{aspect_correct, px_offset_to_clip};

/// x coordinate written for a missing previous point in sentinel encoded data.
pub const NO_PREVIOUS_X: f32 = -2.0;
/// x coordinate written for a missing next point in sentinel encoded data.
pub const NO_NEXT_X: f32 = 2.0;

/// Which side of the centerline a ribbon vertex is pushed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MiterDir {
    Left,
    Right,
}

impl MiterDir {
    pub const fn sign(self) -> f32 {
        match self {
            MiterDir::Left => -1.0,
            MiterDir::Right => 1.0,
        }
    }

    /// Decode a stored sign. Only exactly `-1.0` and `1.0` are valid.
    pub fn from_sign(sign: f32) -> Option<Self> {
        if sign == -1.0 {
            Some(MiterDir::Left)
        } else if sign == 1.0 {
            Some(MiterDir::Right)
        } else {
            None
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            MiterDir::Left => MiterDir::Right,
            MiterDir::Right => MiterDir::Left,
        }
    }
}

/// Path neighbors of a ribbon vertex, in clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Neighbors {
    Interior { previous: Vec3, next: Vec3 },
    PathStart { next: Vec3 },
    PathEnd { previous: Vec3 },
}

impl Neighbors {
    /// Decode sentinel encoded neighbors.
    ///
    /// `previous.x < -1` marks a path start and `next.x > 1` a path end; only
    /// the x axis is inspected. Returns `None` when both are missing, since an
    /// isolated point has no direction to expand along.
    pub fn from_sentinel(previous: Vec3, next: Vec3) -> Option<Self> {
        match (previous.x < -1.0, next.x > 1.0) {
            (false, false) => Some(Neighbors::Interior { previous, next }),
            (true, false) => Some(Neighbors::PathStart { next }),
            (false, true) => Some(Neighbors::PathEnd { previous }),
            (true, true) => None,
        }
    }

    /// Encode into the sentinel form used by legacy vertex data.
    pub fn to_sentinel(self) -> (Vec3, Vec3) {
        match self {
            Neighbors::Interior { previous, next } => (previous, next),
            Neighbors::PathStart { next } => (Vec3::new(NO_PREVIOUS_X, 0.0, 0.0), next),
            Neighbors::PathEnd { previous } => (previous, Vec3::new(NO_NEXT_X, 0.0, 0.0)),
        }
    }

    /// Resolve to a concrete `(previous, next)` pair.
    ///
    /// A missing neighbor is synthesized by reflecting the existing one
    /// through `position`, which extends the path straight past its end.
    pub fn resolve(self, position: Vec3) -> (Vec3, Vec3) {
        match self {
            Neighbors::Interior { previous, next } => (previous, next),
            Neighbors::PathStart { next } => (position + (position - next), next),
            Neighbors::PathEnd { previous } => (previous, position + (position - previous)),
        }
    }
}

/// Vertex format for the joined polyline pipeline.
///
/// `previous_point` and `next_point` are always real points: endpoints are
/// resolved on the host by [`Neighbors::resolve`] before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct JointPolylineVertex {
    pub position: [f32; 3],
    pub previous_point: [f32; 3],
    pub next_point: [f32; 3],
    pub miter_dir: f32,
    /// Full ribbon width in physical pixels.
    pub thickness: f32,
}

impl JointPolylineVertex {
    pub fn new(
        position: Vec3,
        neighbors: Neighbors,
        miter_dir: MiterDir,
        thickness: f32,
    ) -> Result<Self> {
        let thickness = check_thickness(thickness)?;
        let (previous, next) = neighbors.resolve(position);
        Ok(Self {
            position: position.to_array(),
            previous_point: previous.to_array(),
            next_point: next.to_array(),
            miter_dir: miter_dir.sign(),
            thickness,
        })
    }

    /// Both sides of one path point.
    pub fn pair(position: Vec3, neighbors: Neighbors, thickness: f32) -> Result<[Self; 2]> {
        Ok([
            Self::new(position, neighbors, MiterDir::Left, thickness)?,
            Self::new(position, neighbors, MiterDir::Right, thickness)?,
        ])
    }
}

/// Joint geometry shared by both vertices of a path point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointGeometry {
    /// Aspect corrected direction of the incoming segment.
    pub tangent_in: Vec2,
    /// Aspect corrected direction of the outgoing segment.
    pub tangent_out: Vec2,
    /// Unit vector along which the vertex is offset.
    pub miter: Vec2,
    /// Secant of half the turn angle, capped at the miter limit.
    pub miter_length: f32,
}

/// Compute the miter for a path point with resolved neighbors.
///
/// A zero-length neighbor segment borrows the other segment's direction.
/// Returns `None` when both adjacent segments have zero length. Limits below
/// 1.0 are raised to 1.0 so a straight joint keeps its full width.
pub fn joint_geometry(
    position: Vec3,
    previous: Vec3,
    next: Vec3,
    surface: &SurfaceDimensions,
    miter_limit: f32,
) -> Option<JointGeometry> {
    let tangent_in = aspect_correct(surface, (position - previous).truncate());
    let tangent_out = aspect_correct(surface, (next - position).truncate());
    let (tangent_in, tangent_out) = match (tangent_in, tangent_out) {
        (Some(t_in), Some(t_out)) => (t_in, t_out),
        (Some(t), None) | (None, Some(t)) => (t, t),
        (None, None) => return None,
    };

    let miter_limit = miter_limit.max(1.0);
    let normal_in = tangent_in.perp();
    let bisector = tangent_in + tangent_out;
    let bisector_length = bisector.length();

    // A full reversal has no bisector; cap it like any over-limit joint.
    let (miter, miter_length) = if bisector_length > 0.0 {
        let miter = (bisector / bisector_length).perp();
        let cos_half_angle = miter.dot(normal_in);
        if cos_half_angle > 1.0 / miter_limit {
            (miter, 1.0 / cos_half_angle)
        } else {
            (miter, miter_limit)
        }
    } else {
        (normal_in, miter_limit)
    };

    Some(JointGeometry {
        tangent_in,
        tangent_out,
        miter,
        miter_length,
    })
}

/// Physical pixel offset of one ribbon vertex from its path point.
pub fn joint_offset_px(
    vertex: &JointPolylineVertex,
    surface: &SurfaceDimensions,
    miter_limit: f32,
) -> Vec2 {
    joint_geometry(
        Vec3::from(vertex.position),
        Vec3::from(vertex.previous_point),
        Vec3::from(vertex.next_point),
        surface,
        miter_limit,
    )
    .map_or(Vec2::ZERO, |g| {
        vertex.miter_dir * g.miter * vertex.thickness * g.miter_length
    })
}

/// CPU mirror of the joined polyline vertex stage.
pub fn expand_joint_vertex(
    vertex: &JointPolylineVertex,
    surface: &SurfaceDimensions,
    miter_limit: f32,
) -> Vec4 {
    let position = Vec3::from(vertex.position);
    let offset = px_offset_to_clip(surface, joint_offset_px(vertex, surface, miter_limit));
    let xy = position.truncate() + offset;
    Vec4::new(xy.x, xy.y, position.z, 1.0)
}
