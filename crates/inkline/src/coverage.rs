//! Prebuilt coverage masks.
//!
//! Rasterizing and packing glyphs is somebody else's job: a [`CoverageBitmap`]
//! only carries the finished mask and knows how to sample it the way the
//! glyph fragment stage does.

use glam::{Vec2, Vec3};

use crate::error::{Error, Result};

/// Coverage channel layout of a glyph atlas.
///
/// Selects both the atlas texture format and the fragment entry point, so a
/// grayscale atlas can never be paired with the subpixel shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoverageKind {
    /// One coverage value per texel, replicated to all color channels.
    Grayscale,
    /// Independent R, G, B coverage per texel (LCD-style subpixel AA).
    Subpixel,
}

impl CoverageKind {
    /// Bytes per texel in the source data.
    pub const fn channels(self) -> usize {
        match self {
            CoverageKind::Grayscale => 1,
            CoverageKind::Subpixel => 3,
        }
    }
}

/// A coverage mask in row-major order, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageBitmap {
    kind: CoverageKind,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CoverageBitmap {
    pub fn new(kind: CoverageKind, width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * kind.channels();
        if width == 0 || height == 0 || data.len() != expected {
            return Err(Error::CoverageSize {
                kind,
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            kind,
            width,
            height,
            data,
        })
    }

    /// An empty (fully uncovered) bitmap.
    pub fn zeroed(kind: CoverageKind, width: u32, height: u32) -> Result<Self> {
        let len = width as usize * height as usize * kind.channels();
        Self::new(kind, width, height, vec![0; len])
    }

    pub fn kind(&self) -> CoverageKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size_px(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Set the coverage of one texel. Grayscale bitmaps store only `rgb[0]`.
    ///
    /// Out of bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let channels = self.kind.channels();
        let idx = (y as usize * self.width as usize + x as usize) * channels;
        self.data[idx..idx + channels].copy_from_slice(&rgb[..channels]);
    }

    /// Coverage of one texel, normalized to [0, 1].
    pub fn texel(&self, x: u32, y: u32) -> Vec3 {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let channels = self.kind.channels();
        let idx = (y * self.width as usize + x) * channels;
        let texel = &self.data[idx..idx + channels];
        match self.kind {
            CoverageKind::Grayscale => Vec3::splat(texel[0] as f32 / 255.0),
            CoverageKind::Subpixel => Vec3::new(
                texel[0] as f32 / 255.0,
                texel[1] as f32 / 255.0,
                texel[2] as f32 / 255.0,
            ),
        }
    }

    /// Nearest-neighbor sample at a normalized coordinate with clamp-to-edge
    /// addressing, matching the atlas sampler.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let texel = (uv * self.size_px()).floor();
        let x = texel.x.clamp(0.0, (self.width - 1) as f32) as u32;
        let y = texel.y.clamp(0.0, (self.height - 1) as f32) as u32;
        self.texel(x, y)
    }

    /// Data laid out as four bytes per texel, the layout the GPU atlas uses
    /// for subpixel coverage (there is no three channel 8-bit texture format).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let channels = self.kind.channels();
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for texel in self.data.chunks_exact(channels) {
            match self.kind {
                CoverageKind::Grayscale => out.extend_from_slice(&[texel[0]; 3]),
                CoverageKind::Subpixel => out.extend_from_slice(texel),
            }
            out.push(u8::MAX);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_is_rejected() {
        let err = CoverageBitmap::new(CoverageKind::Subpixel, 2, 2, vec![0; 4]).unwrap_err();
        assert_eq!(
            err,
            Error::CoverageSize {
                kind: CoverageKind::Subpixel,
                width: 2,
                height: 2,
                expected: 12,
                actual: 4,
            }
        );
        assert!(CoverageBitmap::new(CoverageKind::Grayscale, 0, 2, vec![]).is_err());
    }

    #[test]
    fn test_sample_is_nearest_with_clamp() {
        let mut bitmap = CoverageBitmap::zeroed(CoverageKind::Grayscale, 4, 2).unwrap();
        bitmap.set(3, 1, [255, 0, 0]);

        assert_eq!(bitmap.sample(Vec2::new(0.9, 0.9)), Vec3::ONE);
        assert_eq!(bitmap.sample(Vec2::new(0.1, 0.1)), Vec3::ZERO);
        // Outside [0, 1] clamps to the edge texel.
        assert_eq!(bitmap.sample(Vec2::new(4.0, 7.0)), Vec3::ONE);
        assert_eq!(bitmap.sample(Vec2::new(-1.0, -1.0)), Vec3::ZERO);
    }

    #[test]
    fn test_subpixel_channels_are_independent() {
        let mut bitmap = CoverageBitmap::zeroed(CoverageKind::Subpixel, 1, 1).unwrap();
        bitmap.set(0, 0, [51, 102, 204]);

        let c = bitmap.texel(0, 0);
        assert!((c - Vec3::new(0.2, 0.4, 0.8)).length() < 1e-6);
        assert_eq!(bitmap.to_rgba8(), vec![51, 102, 204, 255]);
    }

    #[test]
    fn test_grayscale_expands_to_rgba() {
        let bitmap = CoverageBitmap::new(CoverageKind::Grayscale, 2, 1, vec![10, 200]).unwrap();
        assert_eq!(
            bitmap.to_rgba8(),
            vec![10, 10, 10, 255, 200, 200, 200, 255]
        );
    }
}
