use inkline::{GlyphVertex, JointPolylineVertex, SimplePolylineVertex};

/// Vertex buffer layout of a type uploaded to one of the pipelines.
pub trait VertexLayout: bytemuck::Pod {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl VertexLayout for GlyphVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
            // caret_position: vec2<f32> at location 0
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // px_bounds_offset: vec2<f32> at location 1
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // tex_coords: vec2<f32> at location 2
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

impl VertexLayout for JointPolylineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
            // position: vec3<f32> at location 0
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // previous_point: vec3<f32> at location 1
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // next_point: vec3<f32> at location 2
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
            // miter_dir: f32 at location 3
            wgpu::VertexAttribute {
                offset: 36,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32,
            },
            // thickness: f32 at location 4
            wgpu::VertexAttribute {
                offset: 40,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<JointPolylineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

impl VertexLayout for SimplePolylineVertex {
    /// One instance per segment; the quad corners come from `vertex_index`.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
            // line_start: vec2<f32> at location 0
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // line_end: vec2<f32> at location 1
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // thickness: f32 at location 2
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SimplePolylineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_packed<T: VertexLayout>() {
        let layout = T::desc();
        assert_eq!(layout.array_stride as usize, std::mem::size_of::<T>());

        let mut end = 0;
        for (i, attribute) in layout.attributes.iter().enumerate() {
            assert_eq!(attribute.shader_location as usize, i);
            assert_eq!(attribute.offset, end, "gap before location {i}");
            end = attribute.offset + attribute.format.size();
        }
        assert_eq!(end, layout.array_stride);
    }

    #[test]
    fn test_glyph_layout_is_packed() {
        assert_packed::<GlyphVertex>();
        assert_eq!(std::mem::size_of::<GlyphVertex>(), 24);
    }

    #[test]
    fn test_joint_layout_is_packed() {
        assert_packed::<JointPolylineVertex>();
        assert_eq!(std::mem::size_of::<JointPolylineVertex>(), 44);
    }

    #[test]
    fn test_simple_layout_steps_per_instance() {
        assert_packed::<SimplePolylineVertex>();
        assert_eq!(
            SimplePolylineVertex::desc().step_mode,
            wgpu::VertexStepMode::Instance
        );
    }
}
