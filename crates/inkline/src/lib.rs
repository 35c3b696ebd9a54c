//! # inkline
//!
//! Backend agnostic geometry for GPU text and ribbon rendering.
//!
//! This crate owns the vertex formats, coordinate conventions and CPU mirrors
//! of the shader stages. It has no dependency on a graphics API; the wgpu
//! pipelines live in `inkline-wgpu`.
//!
//! ## Coordinates
//!
//! - [`SurfaceDimensions`] - Render target size and scale factor
//! - [`px_to_clip`] / [`px_offset_to_clip`] - Pixel to clip space mapping
//!
//! ## Glyphs
//!
//! - [`GlyphVertex`] / [`GlyphQuad`] - Textured glyph quads
//! - [`CoverageBitmap`] - Grayscale or subpixel coverage masks
//! - [`shade_glyph`] / [`composite`] - Dual-source blend mirror
//!
//! ## Polylines
//!
//! - [`Polyline`] - Deduplicated open path
//! - [`JointPolylineVertex`] - Mitered ribbon vertices
//! - [`SimplePolylineVertex`] - Unjoined distance-tested segments

mod blend;
mod color;
mod coverage;
mod error;
mod glyph;
mod joint;
mod path;
mod simple;
mod style;
mod surface;
mod transform;

pub use blend::*;
pub use color::*;
pub use coverage::*;
pub use error::{Error, Result};
pub use glyph::*;
pub use joint::*;
pub use path::*;
pub use simple::*;
pub use style::*;
pub use surface::*;
pub use transform::*;
