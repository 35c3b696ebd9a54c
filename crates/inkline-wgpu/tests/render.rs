//! Renders through the real pipelines on a headless adapter and compares the
//! pixels with the CPU mirrors in `inkline`.
//!
//! Machines without an adapter, or without dual-source blending, skip these
//! tests instead of failing.

use glam::{Vec2, Vec3, Vec4};
use inkline::{
    composite, expand_joint_vertex, shade_glyph, simple_quad_bounds, Color, CoverageBitmap,
    CoverageKind, GlyphQuad, GlyphStyle, LineStyle, PixelBounds, Polyline, SimpleLineVaryings,
    SimplePolylineVertex, SurfaceDimensions, TexelRect,
};
use inkline_wgpu::Renderer;

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

fn gpu() -> Option<Gpu> {
    let instance = wgpu::Instance::default();
    let adapter = match pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        force_fallback_adapter: false,
        compatible_surface: None,
    })) {
        Ok(adapter) => adapter,
        Err(err) => {
            eprintln!("skipping: no adapter available ({err})");
            return None;
        }
    };

    let required = Renderer::required_features();
    if !adapter.features().contains(required) {
        eprintln!("skipping: adapter lacks {required:?}");
        return None;
    }

    match pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Inkline Test Device"),
        required_features: required,
        ..Default::default()
    })) {
        Ok((device, queue)) => Some(Gpu { device, queue }),
        Err(err) => {
            eprintln!("skipping: device request failed ({err})");
            None
        }
    }
}

fn surface() -> SurfaceDimensions {
    SurfaceDimensions::new(SIZE, SIZE, 1.0).unwrap()
}

fn renderer(gpu: &Gpu) -> Renderer {
    Renderer::new(&gpu.device, FORMAT, surface()).unwrap()
}

/// Clear a target to opaque black, render the queued work and read it back
/// row-major, top row first.
fn render(gpu: &Gpu, renderer: &mut Renderer) -> Vec<[u8; 4]> {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Inkline Test Target"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Inkline Test Encoder"),
        });
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Inkline Test Clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
    renderer.render(&gpu.device, &gpu.queue, &mut encoder, &view);

    // 64 texels of 4 bytes is already a multiple of COPY_BYTES_PER_ROW_ALIGNMENT.
    let bytes_per_row = SIZE * 4;
    let readback = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Inkline Test Readback"),
        size: u64::from(bytes_per_row) * u64::from(SIZE),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
    );
    gpu.queue.submit([encoder.finish()]);

    readback
        .slice(..)
        .map_async(wgpu::MapMode::Read, |result| {
            if let Err(err) = result {
                panic!("Failed to map readback buffer: {err}");
            }
        });
    gpu.device
        .poll(wgpu::PollType::wait_indefinitely())
        .unwrap();

    let pixels = readback
        .slice(..)
        .get_mapped_range()
        .chunks_exact(4)
        .map(|texel| [texel[0], texel[1], texel[2], texel[3]])
        .collect();
    readback.unmap();
    pixels
}

/// Clip space position of a pixel centre.
fn pixel_center(x: u32, y: u32) -> Vec2 {
    let half = SIZE as f32 / 2.0;
    Vec2::new(
        (x as f32 + 0.5) / half - 1.0,
        1.0 - (y as f32 + 0.5) / half,
    )
}

fn pixels() -> impl Iterator<Item = (u32, u32)> {
    (0..SIZE).flat_map(|y| (0..SIZE).map(move |x| (x, y)))
}

fn at(image: &[[u8; 4]], x: u32, y: u32) -> [u8; 4] {
    image[(y * SIZE + x) as usize]
}

#[derive(Debug, PartialEq)]
enum Coverage {
    Inside,
    Outside,
    /// Too close to a triangle edge to predict the rasterizer's choice.
    Edge,
}

fn classify(point: Vec2, triangles: &[[Vec2; 3]]) -> Coverage {
    const MARGIN: f32 = 1e-3;

    let mut near_edge = false;
    for &[a, b, c] in triangles {
        let area = (b - a).perp_dot(c - a);
        if area.abs() < 1e-9 {
            continue;
        }
        let nearest = [(a, b), (b, c), (c, a)]
            .into_iter()
            .map(|(from, to)| area.signum() * (to - from).perp_dot(point - from) / from.distance(to))
            .fold(f32::INFINITY, f32::min);
        if nearest > MARGIN {
            return Coverage::Inside;
        }
        if nearest > -MARGIN {
            near_edge = true;
        }
    }
    if near_edge {
        Coverage::Edge
    } else {
        Coverage::Outside
    }
}

#[test]
fn test_simple_segment_matches_cpu_coverage() {
    let Some(gpu) = gpu() else { return };
    let mut renderer = renderer(&gpu);

    // Edges of the quad and of the distance band sit on multiples of 1/4,
    // never on a pixel centre.
    let segment =
        SimplePolylineVertex::new(Vec2::new(-0.5, 0.0), Vec2::new(0.25, 0.0), 0.25).unwrap();
    renderer.draw_simple_segments(&[segment], &LineStyle::new(Color::rgb(1.0, 0.0, 0.0)));
    let image = render(&gpu, &mut renderer);

    let (min, max) = simple_quad_bounds(&segment);
    let line = SimpleLineVaryings::from_vertex(&segment);
    for (x, y) in pixels() {
        let point = pixel_center(x, y);
        let in_quad = point.cmpgt(min).all() && point.cmplt(max).all();
        let expected = if in_quad && line.covers(point) { RED } else { BLACK };
        assert_eq!(at(&image, x, y), expected, "pixel ({x}, {y}) at {point}");
    }

    // Past the end point, still within the thickness of the line.
    assert!(pixel_center(46, 27).x > 0.25);
    assert_eq!(at(&image, 46, 27), RED);
}

#[test]
fn test_mitered_ribbon_matches_cpu_expansion() {
    let Some(gpu) = gpu() else { return };
    let mut renderer = renderer(&gpu);

    let polyline = Polyline::new([
        Vec3::new(-0.5, -0.25, 0.0),
        Vec3::new(0.25, -0.25, 0.0),
        Vec3::new(0.25, 0.5, 0.0),
    ])
    .unwrap();
    let thickness = 6.0;
    let style = LineStyle::new(Color::rgb(1.0, 0.0, 0.0));
    renderer.draw_polyline(&polyline, thickness, &style).unwrap();
    let image = render(&gpu, &mut renderer);

    let surface = surface();
    let positions: Vec<Vec2> = polyline
        .ribbon_vertices(thickness)
        .unwrap()
        .iter()
        .map(|vertex| {
            let clip = expand_joint_vertex(vertex, &surface, style.miter_limit());
            Vec2::new(clip.x, clip.y)
        })
        .collect();
    let triangles: Vec<[Vec2; 3]> = polyline
        .ribbon_indices(0)
        .chunks_exact(3)
        .map(|tri| [0, 1, 2].map(|i| positions[tri[i] as usize]))
        .collect();

    let mut inside = 0;
    for (x, y) in pixels() {
        let expected = match classify(pixel_center(x, y), &triangles) {
            Coverage::Inside => RED,
            Coverage::Outside => BLACK,
            Coverage::Edge => continue,
        };
        if expected == RED {
            inside += 1;
        }
        assert_eq!(at(&image, x, y), expected, "pixel ({x}, {y})");
    }
    assert!(inside > 100, "only {inside} covered pixels");

    // The outer corner of the miter.
    assert_eq!(at(&image, 41, 42), RED);
}

#[test]
fn test_subpixel_glyph_matches_cpu_blend() {
    let Some(gpu) = gpu() else { return };
    let mut renderer = renderer(&gpu);

    let mut bitmap = CoverageBitmap::zeroed(CoverageKind::Subpixel, 1, 1).unwrap();
    bitmap.set(0, 0, [128, 51, 204]);
    let atlas = renderer.create_atlas(&gpu.device, &gpu.queue, &bitmap);

    // 16x16 px centred on the origin: clip space [-0.25, 0.25] on a 64 px target.
    let quad = GlyphQuad::new(
        Vec2::ZERO,
        PixelBounds::new(Vec2::splat(-8.0), Vec2::splat(8.0)),
        TexelRect::new(Vec2::ZERO, Vec2::ONE),
    );
    let style = GlyphStyle::new(Color::rgb(1.0, 1.0, 1.0));
    renderer.draw_glyphs(&atlas, &[quad], &style);
    let image = render(&gpu, &mut renderer);

    let output = shade_glyph(Vec2::splat(0.5), &bitmap, style.color);
    let expected = composite(output, Vec4::new(0.0, 0.0, 0.0, 1.0));
    let expected = expected.to_array().map(|c| (c * 255.0).round() as i32);

    for (x, y) in [(24, 24), (32, 32), (39, 39)] {
        let actual = at(&image, x, y).map(i32::from);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= 1, "pixel ({x}, {y}): {actual:?} vs {expected:?}");
        }
    }
    assert_eq!(at(&image, 23, 32), BLACK);
    assert_eq!(at(&image, 40, 32), BLACK);
}
