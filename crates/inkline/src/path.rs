//! Host-side polyline preparation.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::joint::{JointPolylineVertex, MiterDir, Neighbors};
use crate::simple::SimplePolylineVertex;

/// An open path of clip space points.
///
/// Consecutive duplicates are dropped on construction so every segment has a
/// direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Vec3>,
}

impl Polyline {
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Result<Self> {
        let mut deduped: Vec<Vec3> = Vec::new();
        let mut total = 0;
        for point in points {
            total += 1;
            if deduped.last() != Some(&point) {
                deduped.push(point);
            }
        }

        if deduped.len() < 2 {
            return Err(Error::DegeneratePolyline(total));
        }
        Ok(Self { points: deduped })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a polyline holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Neighbors of point `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn neighbors(&self, index: usize) -> Neighbors {
        let last = self.points.len() - 1;
        match index {
            0 => Neighbors::PathStart {
                next: self.points[1],
            },
            i if i == last => Neighbors::PathEnd {
                previous: self.points[i - 1],
            },
            i => Neighbors::Interior {
                previous: self.points[i - 1],
                next: self.points[i + 1],
            },
        }
    }

    /// Two vertices per point, [`MiterDir::Left`] first.
    pub fn ribbon_vertices(&self, thickness: f32) -> Result<Vec<JointPolylineVertex>> {
        let mut vertices = Vec::with_capacity(self.points.len() * 2);
        for (i, &point) in self.points.iter().enumerate() {
            let neighbors = self.neighbors(i);
            vertices.push(JointPolylineVertex::new(point, neighbors, MiterDir::Left, thickness)?);
            vertices.push(JointPolylineVertex::new(point, neighbors, MiterDir::Right, thickness)?);
        }
        Ok(vertices)
    }

    /// Triangle list over [`Self::ribbon_vertices`], offset by `base`.
    ///
    /// Segment `i` uses the two vertices of point `i` and point `i + 1`, so
    /// neighboring segments share their joint vertices.
    pub fn ribbon_indices(&self, base: u32) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.segment_count() * 6);
        for segment in 0..self.segment_count() as u32 {
            let left = base + segment * 2;
            let right = left + 1;
            let next_left = left + 2;
            let next_right = left + 3;
            indices.extend_from_slice(&[left, right, next_left, right, next_right, next_left]);
        }
        indices
    }

    /// One unjoined segment per consecutive point pair. `thickness` is in
    /// clip units.
    pub fn segments(&self, thickness: f32) -> Result<Vec<SimplePolylineVertex>> {
        self.points
            .windows(2)
            .map(|pair| SimplePolylineVertex::new(pair[0].truncate(), pair[1].truncate(), thickness))
            .collect()
    }
}
