//! # inkline-wgpu
//!
//! WGPU rendering backend for inkline.
//!
//! [`Renderer`] owns the glyph and polyline pipelines and draws queued
//! batches into an existing render target. Glyphs use dual-source blending,
//! so the device must be created with [`Renderer::required_features`].

mod atlas;
mod buffer;
mod pipeline;
mod renderer;
mod uniform;
mod vertex;

pub use atlas::CoverageAtlas;
pub use pipeline::{glyph_fragment_entry, DUAL_SOURCE_BLENDING};
pub use renderer::{Renderer, RendererConfig};
pub use uniform::{StyleUniform, SurfaceUniform, STYLE_UNIFORM_SIZE};
pub use vertex::VertexLayout;

/// WGSL sources of the pipelines, as compiled by [`Renderer`].
pub mod shaders {
    /// Glyph quads. Entry points `vs_main`, `fs_grayscale`, `fs_subpixel`.
    pub const GLYPH: &str = include_str!("shaders/glyph.wgsl");
    /// Mitered ribbons. Entry points `vs_main`, `fs_main`.
    pub const JOINT_LINE: &str = include_str!("shaders/joint_line.wgsl");
    /// Instanced segment quads. Entry points `vs_main`, `fs_main`.
    pub const SIMPLE_LINE: &str = include_str!("shaders/simple_line.wgsl");
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] inkline::Error),

    #[error("device is missing required features {0:?}")]
    MissingFeature(wgpu::Features),

    #[error(
        "cannot update a {atlas_width}x{atlas_height} {atlas_kind:?} atlas with a {width}x{height} {kind:?} bitmap"
    )]
    AtlasMismatch {
        atlas_kind: inkline::CoverageKind,
        atlas_width: u32,
        atlas_height: u32,
        kind: inkline::CoverageKind,
        width: u32,
        height: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
