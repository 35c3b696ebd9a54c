use std::ops::Range;

use inkline::{
    CoverageBitmap, CoverageKind, GlyphQuad, GlyphStyle, GlyphVertex, JointPolylineVertex,
    LineStyle, Polyline, SimplePolylineVertex, SurfaceDimensions,
};

use crate::atlas::{self, CoverageAtlas};
use crate::buffer::GrowableBuffer;
use crate::pipeline::{BindGroupLayouts, Pipelines};
use crate::uniform::{align_to, StyleUniform, SurfaceUniform, STYLE_UNIFORM_SIZE};
use crate::{Error, Result};

/// Initial buffer sizes, in elements. Buffers grow on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    pub glyph_vertex_capacity: usize,
    pub glyph_index_capacity: usize,
    pub line_vertex_capacity: usize,
    pub line_index_capacity: usize,
    pub segment_capacity: usize,
    pub style_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            glyph_vertex_capacity: 4096,
            glyph_index_capacity: 8192,
            line_vertex_capacity: 1024,
            line_index_capacity: 2048,
            segment_capacity: 256,
            style_capacity: 64,
        }
    }
}

/// Which pipeline a batch is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PipelineKind {
    Glyph(CoverageKind),
    JointLine,
    SimpleLine,
}

#[derive(Debug)]
struct Batch {
    pipeline: PipelineKind,
    /// Coverage bind group, glyph batches only.
    atlas: Option<wgpu::BindGroup>,
    style_slot: u32,
    /// Index range for indexed batches, instance range for segments.
    range: Range<u32>,
}

/// Draws glyph runs and polylines in submission order.
///
/// Draw calls only record work. [`Renderer::render`] uploads everything
/// queued since the last frame and records a single render pass that loads
/// the existing target contents.
pub struct Renderer {
    surface: SurfaceDimensions,
    surface_dirty: bool,

    layouts: BindGroupLayouts,
    pipelines: Pipelines,
    coverage_sampler: wgpu::Sampler,

    surface_buffer: wgpu::Buffer,
    surface_bind_group: wgpu::BindGroup,

    style_stride: u64,
    style_buffer: GrowableBuffer,
    style_bind_group: wgpu::BindGroup,

    glyph_vertex_buffer: GrowableBuffer,
    glyph_index_buffer: GrowableBuffer,
    line_vertex_buffer: GrowableBuffer,
    line_index_buffer: GrowableBuffer,
    segment_buffer: GrowableBuffer,

    // Frame data, cleared after every render
    glyph_vertices: Vec<GlyphVertex>,
    glyph_indices: Vec<u32>,
    line_vertices: Vec<JointPolylineVertex>,
    line_indices: Vec<u32>,
    segments: Vec<SimplePolylineVertex>,
    styles: Vec<StyleUniform>,
    batches: Vec<Batch>,
}

impl Renderer {
    /// Features the device must be created with.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::DUAL_SOURCE_BLENDING
    }

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        surface: SurfaceDimensions,
    ) -> Result<Self> {
        Self::with_config(device, surface_format, surface, RendererConfig::default())
    }

    pub fn with_config(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        surface: SurfaceDimensions,
        config: RendererConfig,
    ) -> Result<Self> {
        let required = Self::required_features();
        if !device.features().contains(required) {
            return Err(Error::MissingFeature(required));
        }

        let layouts = BindGroupLayouts::new(device);
        let pipelines = Pipelines::new(device, surface_format, &layouts);
        let coverage_sampler = atlas::create_sampler(device);

        let surface_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Inkline Surface Uniform Buffer"),
            size: std::mem::size_of::<SurfaceUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let surface_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Inkline Surface Bind Group"),
            layout: &layouts.surface,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: surface_buffer.as_entire_binding(),
            }],
        });

        let style_stride = align_to(
            STYLE_UNIFORM_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let style_buffer = GrowableBuffer::new(
            device,
            "Inkline Style Uniform Buffer",
            wgpu::BufferUsages::UNIFORM,
            style_stride,
            config.style_capacity,
        );
        let style_bind_group = create_style_bind_group(device, &layouts, style_buffer.buffer());

        let glyph_vertex_buffer = GrowableBuffer::new(
            device,
            "Inkline Glyph Vertex Buffer",
            wgpu::BufferUsages::VERTEX,
            std::mem::size_of::<GlyphVertex>() as u64,
            config.glyph_vertex_capacity,
        );
        let glyph_index_buffer = GrowableBuffer::new(
            device,
            "Inkline Glyph Index Buffer",
            wgpu::BufferUsages::INDEX,
            std::mem::size_of::<u32>() as u64,
            config.glyph_index_capacity,
        );
        let line_vertex_buffer = GrowableBuffer::new(
            device,
            "Inkline Line Vertex Buffer",
            wgpu::BufferUsages::VERTEX,
            std::mem::size_of::<JointPolylineVertex>() as u64,
            config.line_vertex_capacity,
        );
        let line_index_buffer = GrowableBuffer::new(
            device,
            "Inkline Line Index Buffer",
            wgpu::BufferUsages::INDEX,
            std::mem::size_of::<u32>() as u64,
            config.line_index_capacity,
        );
        let segment_buffer = GrowableBuffer::new(
            device,
            "Inkline Segment Instance Buffer",
            wgpu::BufferUsages::VERTEX,
            std::mem::size_of::<SimplePolylineVertex>() as u64,
            config.segment_capacity,
        );

        Ok(Self {
            surface,
            surface_dirty: true,
            layouts,
            pipelines,
            coverage_sampler,
            surface_buffer,
            surface_bind_group,
            style_stride,
            style_buffer,
            style_bind_group,
            glyph_vertex_buffer,
            glyph_index_buffer,
            line_vertex_buffer,
            line_index_buffer,
            segment_buffer,
            glyph_vertices: Vec::new(),
            glyph_indices: Vec::new(),
            line_vertices: Vec::new(),
            line_indices: Vec::new(),
            segments: Vec::new(),
            styles: Vec::new(),
            batches: Vec::new(),
        })
    }

    pub fn surface(&self) -> &SurfaceDimensions {
        &self.surface
    }

    /// Replace the surface dimensions used by the next frame.
    pub fn set_surface(&mut self, surface: SurfaceDimensions) {
        self.surface = surface;
        self.surface_dirty = true;
    }

    /// Resize the target. Zero sizes are rejected and leave the old size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface.resize(width, height)?;
        self.surface_dirty = true;
        Ok(())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) -> Result<()> {
        self.surface.set_scale_factor(scale_factor)?;
        self.surface_dirty = true;
        Ok(())
    }

    /// Upload a coverage bitmap for use with [`Renderer::draw_glyphs`].
    pub fn create_atlas(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bitmap: &CoverageBitmap,
    ) -> CoverageAtlas {
        CoverageAtlas::new(
            device,
            queue,
            &self.layouts.coverage,
            &self.coverage_sampler,
            bitmap,
        )
    }

    /// Queue a run of glyph quads sampling `atlas`.
    pub fn draw_glyphs(&mut self, atlas: &CoverageAtlas, quads: &[GlyphQuad], style: &GlyphStyle) {
        if quads.is_empty() {
            log::warn!("Skipping empty glyph run");
            return;
        }

        let index_start = self.glyph_indices.len() as u32;
        for quad in quads {
            let base = self.glyph_vertices.len() as u32;
            self.glyph_vertices.extend_from_slice(&quad.vertices);
            self.glyph_indices.extend_from_slice(&GlyphQuad::indices(base));
        }
        let index_end = self.glyph_indices.len() as u32;

        let style_slot = self.push_style(style.into());
        self.batches.push(Batch {
            pipeline: PipelineKind::Glyph(atlas.kind()),
            atlas: Some(atlas.bind_group().clone()),
            style_slot,
            range: index_start..index_end,
        });
    }

    /// Queue a mitered ribbon along `polyline`. `thickness` is in physical
    /// pixels.
    pub fn draw_polyline(
        &mut self,
        polyline: &Polyline,
        thickness: f32,
        style: &LineStyle,
    ) -> Result<()> {
        let vertices = polyline.ribbon_vertices(thickness)?;
        let base = self.line_vertices.len() as u32;
        let index_start = self.line_indices.len() as u32;
        self.line_vertices.extend(vertices);
        self.line_indices.extend(polyline.ribbon_indices(base));
        let index_end = self.line_indices.len() as u32;

        let style_slot = self.push_style(style.into());
        self.batches.push(Batch {
            pipeline: PipelineKind::JointLine,
            atlas: None,
            style_slot,
            range: index_start..index_end,
        });
        Ok(())
    }

    /// Queue unjoined segments, one instanced quad each.
    pub fn draw_simple_segments(&mut self, segments: &[SimplePolylineVertex], style: &LineStyle) {
        if segments.is_empty() {
            log::warn!("Skipping empty segment batch");
            return;
        }

        let instance_start = self.segments.len() as u32;
        self.segments.extend_from_slice(segments);
        let instance_end = self.segments.len() as u32;

        let style_slot = self.push_style(style.into());
        self.batches.push(Batch {
            pipeline: PipelineKind::SimpleLine,
            atlas: None,
            style_slot,
            range: instance_start..instance_end,
        });
    }

    fn push_style(&mut self, style: StyleUniform) -> u32 {
        self.styles.push(style);
        (self.styles.len() - 1) as u32
    }

    /// Drop everything queued since the last render.
    pub fn clear(&mut self) {
        self.glyph_vertices.clear();
        self.glyph_indices.clear();
        self.line_vertices.clear();
        self.line_indices.clear();
        self.segments.clear();
        self.styles.clear();
        self.batches.clear();
    }

    /// Upload queued work and draw it into `target`, then clear the queue.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        if self.surface_dirty {
            let uniform = SurfaceUniform::from(&self.surface);
            queue.write_buffer(&self.surface_buffer, 0, bytemuck::bytes_of(&uniform));
            self.surface_dirty = false;
        }

        if self.batches.is_empty() {
            return;
        }

        self.upload(device, queue);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Inkline Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // Preserve existing content
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_bind_group(0, &self.surface_bind_group, &[]);

        // Track current pipeline state to avoid redundant switches
        let mut current_pipeline = None;
        for batch in &self.batches {
            if current_pipeline != Some(batch.pipeline) {
                match batch.pipeline {
                    PipelineKind::Glyph(kind) => {
                        render_pass.set_pipeline(self.pipelines.glyph(kind));
                        render_pass
                            .set_vertex_buffer(0, self.glyph_vertex_buffer.buffer().slice(..));
                        render_pass.set_index_buffer(
                            self.glyph_index_buffer.buffer().slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                    }
                    PipelineKind::JointLine => {
                        render_pass.set_pipeline(&self.pipelines.joint_line);
                        render_pass
                            .set_vertex_buffer(0, self.line_vertex_buffer.buffer().slice(..));
                        render_pass.set_index_buffer(
                            self.line_index_buffer.buffer().slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                    }
                    PipelineKind::SimpleLine => {
                        render_pass.set_pipeline(&self.pipelines.simple_line);
                        render_pass.set_vertex_buffer(0, self.segment_buffer.buffer().slice(..));
                    }
                }
                current_pipeline = Some(batch.pipeline);
            }

            let style_offset = (batch.style_slot as u64 * self.style_stride) as u32;
            match batch.pipeline {
                PipelineKind::Glyph(_) => {
                    if let Some(atlas) = &batch.atlas {
                        render_pass.set_bind_group(1, atlas, &[]);
                    }
                    render_pass.set_bind_group(2, &self.style_bind_group, &[style_offset]);
                    render_pass.draw_indexed(batch.range.clone(), 0, 0..1);
                }
                PipelineKind::JointLine => {
                    render_pass.set_bind_group(1, &self.style_bind_group, &[style_offset]);
                    render_pass.draw_indexed(batch.range.clone(), 0, 0..1);
                }
                PipelineKind::SimpleLine => {
                    render_pass.set_bind_group(1, &self.style_bind_group, &[style_offset]);
                    render_pass.draw(0..6, batch.range.clone());
                }
            }
        }

        drop(render_pass);
        self.clear();
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.glyph_vertex_buffer.write(device, queue, &self.glyph_vertices);
        self.glyph_index_buffer.write(device, queue, &self.glyph_indices);
        self.line_vertex_buffer.write(device, queue, &self.line_vertices);
        self.line_index_buffer.write(device, queue, &self.line_indices);
        self.segment_buffer.write(device, queue, &self.segments);

        let bytes = pack_styles(&self.styles, self.style_stride);
        if self.style_buffer.write_bytes(device, queue, &bytes) {
            self.style_bind_group =
                create_style_bind_group(device, &self.layouts, self.style_buffer.buffer());
        }
    }
}

fn create_style_bind_group(
    device: &wgpu::Device,
    layouts: &BindGroupLayouts,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Inkline Style Bind Group"),
        layout: &layouts.style,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(STYLE_UNIFORM_SIZE),
            }),
        }],
    })
}

/// Lay styles out one per `stride` bytes, the spacing dynamic offsets need.
fn pack_styles(styles: &[StyleUniform], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; styles.len() * stride];
    for (slot, style) in bytes.chunks_exact_mut(stride).zip(styles) {
        slot[..STYLE_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(style));
    }
    bytes
}
