use glam::Vec2;

use crate::error::{Error, Result};

/// Pixel size and DPI scale of the render target.
///
/// Owned by the host and read by every vertex stage. Construction and updates
/// validate that all three values are strictly positive, so a value of this
/// type never causes a division by zero in the clip-space transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDimensions {
    width: u32,
    height: u32,
    scale_factor: f32,
}

impl SurfaceDimensions {
    pub fn new(width: u32, height: u32, scale_factor: f32) -> Result<Self> {
        Self::check(width, height, scale_factor)?;
        Ok(Self {
            width,
            height,
            scale_factor,
        })
    }

    fn check(width: u32, height: u32, scale_factor: f32) -> Result<()> {
        if width == 0 || height == 0 || !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(Error::InvalidSurface {
                width,
                height,
                scale_factor,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Physical size of the surface as a float vector.
    pub fn size_px(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Apply a new physical size, keeping the scale factor.
    ///
    /// On error the previous dimensions are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        Self::check(width, height, self.scale_factor)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Apply a new DPI scale factor, keeping the physical size.
    pub fn set_scale_factor(&mut self, scale_factor: f32) -> Result<()> {
        Self::check(self.width, self.height, scale_factor)?;
        self.scale_factor = scale_factor;
        Ok(())
    }
}
