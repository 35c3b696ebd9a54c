use inkline::{CoverageKind, GlyphVertex, JointPolylineVertex, SimplePolylineVertex};

use crate::shaders;
use crate::uniform::STYLE_UNIFORM_SIZE;
use crate::vertex::VertexLayout;

/// `color * blend + dst * (1 - blend)`, per channel, alpha included.
pub const DUAL_SOURCE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Src1,
        dst_factor: wgpu::BlendFactor::OneMinusSrc1,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Src1,
        dst_factor: wgpu::BlendFactor::OneMinusSrc1,
        operation: wgpu::BlendOperation::Add,
    },
};

pub(crate) struct BindGroupLayouts {
    pub surface: wgpu::BindGroupLayout,
    pub coverage: wgpu::BindGroupLayout,
    pub style: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let surface = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Inkline Surface Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let coverage = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Inkline Coverage Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let style = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Inkline Style Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(STYLE_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        Self {
            surface,
            coverage,
            style,
        }
    }
}

/// Every render pipeline the renderer switches between.
pub(crate) struct Pipelines {
    pub glyph_grayscale: wgpu::RenderPipeline,
    pub glyph_subpixel: wgpu::RenderPipeline,
    pub joint_line: wgpu::RenderPipeline,
    pub simple_line: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layouts: &BindGroupLayouts,
    ) -> Self {
        let glyph_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Inkline Glyph Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GLYPH.into()),
        });
        let joint_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Inkline Joint Line Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::JOINT_LINE.into()),
        });
        let simple_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Inkline Simple Line Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SIMPLE_LINE.into()),
        });

        let glyph_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Inkline Glyph Pipeline Layout"),
            bind_group_layouts: &[&layouts.surface, &layouts.coverage, &layouts.style],
            immediate_size: 0,
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Inkline Line Pipeline Layout"),
            bind_group_layouts: &[&layouts.surface, &layouts.style],
            immediate_size: 0,
        });

        let pipelines = Self {
            glyph_grayscale: create_pipeline(
                device,
                PipelineDesc {
                    label: "Inkline Grayscale Glyph Pipeline",
                    layout: &glyph_layout,
                    shader: &glyph_shader,
                    fragment_entry: glyph_fragment_entry(CoverageKind::Grayscale),
                    vertex_layout: GlyphVertex::desc(),
                    format,
                    blend: DUAL_SOURCE_BLENDING,
                },
            ),
            glyph_subpixel: create_pipeline(
                device,
                PipelineDesc {
                    label: "Inkline Subpixel Glyph Pipeline",
                    layout: &glyph_layout,
                    shader: &glyph_shader,
                    fragment_entry: glyph_fragment_entry(CoverageKind::Subpixel),
                    vertex_layout: GlyphVertex::desc(),
                    format,
                    blend: DUAL_SOURCE_BLENDING,
                },
            ),
            joint_line: create_pipeline(
                device,
                PipelineDesc {
                    label: "Inkline Joint Line Pipeline",
                    layout: &line_layout,
                    shader: &joint_shader,
                    fragment_entry: "fs_main",
                    vertex_layout: JointPolylineVertex::desc(),
                    format,
                    blend: wgpu::BlendState::ALPHA_BLENDING,
                },
            ),
            simple_line: create_pipeline(
                device,
                PipelineDesc {
                    label: "Inkline Simple Line Pipeline",
                    layout: &line_layout,
                    shader: &simple_shader,
                    fragment_entry: "fs_main",
                    vertex_layout: SimplePolylineVertex::desc(),
                    format,
                    blend: wgpu::BlendState::ALPHA_BLENDING,
                },
            ),
        };
        log::debug!("Created inkline pipelines for {format:?}");
        pipelines
    }

    pub fn glyph(&self, kind: CoverageKind) -> &wgpu::RenderPipeline {
        match kind {
            CoverageKind::Grayscale => &self.glyph_grayscale,
            CoverageKind::Subpixel => &self.glyph_subpixel,
        }
    }
}

/// Fragment entry point reading a coverage texture of `kind`.
pub fn glyph_fragment_entry(kind: CoverageKind) -> &'static str {
    match kind {
        CoverageKind::Grayscale => "fs_grayscale",
        CoverageKind::Subpixel => "fs_subpixel",
    }
}

struct PipelineDesc<'a> {
    label: &'static str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    fragment_entry: &'static str,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
