//! Draws an animated mitered ribbon and a line of subpixel text.
//!
//! Controls:
//! - `D` toggles the unjoined segment overlay
//! - `G` switches between subpixel and grayscale coverage
//! - `Escape` exits

use std::sync::Arc;
use std::time::Instant;

use glam::{Vec2, Vec3};
use inkline::{
    css, Color, CoverageBitmap, CoverageKind, GlyphQuad, GlyphStyle, LineStyle, PixelBounds,
    Polyline, SurfaceDimensions, TexelRect,
};
use inkline_wgpu::{CoverageAtlas, Renderer};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const TEXT: &str = "INKLINE";

/// Atlas texels per font pixel.
const FONT_SCALE: u32 = 4;
/// Logical pixels per atlas texel.
const TEXEL_SIZE: f32 = 2.0;
const GLYPH_COLUMNS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
const CELL_PADDING: u32 = 1;

/// 5x7 bitmaps, one `u8` per row with the leftmost pixel in bit 4.
fn glyph_rows(c: char) -> Option<[u8; 7]> {
    Some(match c {
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        _ => return None,
    })
}

struct FontAtlas {
    chars: Vec<char>,
    cell_width: u32,
    cell_height: u32,
}

impl FontAtlas {
    fn new() -> Self {
        let mut chars: Vec<char> = TEXT.chars().filter(|c| glyph_rows(*c).is_some()).collect();
        chars.sort_unstable();
        chars.dedup();
        Self {
            chars,
            cell_width: GLYPH_COLUMNS * FONT_SCALE + 2 * CELL_PADDING,
            cell_height: GLYPH_ROWS * FONT_SCALE + 2 * CELL_PADDING,
        }
    }

    fn texels(&self, c: char) -> Option<TexelRect> {
        let index = self.chars.iter().position(|&other| other == c)? as u32;
        Some(TexelRect::from_min_size(
            Vec2::new(
                (index * self.cell_width + CELL_PADDING) as f32,
                CELL_PADDING as f32,
            ),
            Vec2::new(
                (GLYPH_COLUMNS * FONT_SCALE) as f32,
                (GLYPH_ROWS * FONT_SCALE) as f32,
            ),
        ))
    }

    /// Rasterize every glyph. Subpixel masks soften the left and right edge
    /// of each stroke one channel at a time, like an LCD filter would.
    fn rasterize(&self, kind: CoverageKind) -> CoverageBitmap {
        let width = self.cell_width * self.chars.len() as u32;
        let mut bitmap = CoverageBitmap::zeroed(kind, width, self.cell_height)
            .expect("atlas size is nonzero");

        for (index, &c) in self.chars.iter().enumerate() {
            let Some(rows) = glyph_rows(c) else { continue };
            let lit = |col: i32, row: u32| {
                (0..GLYPH_COLUMNS as i32).contains(&col)
                    && rows[row as usize] & (1 << (GLYPH_COLUMNS as i32 - 1 - col)) != 0
            };

            for ty in 0..GLYPH_ROWS * FONT_SCALE {
                for tx in 0..GLYPH_COLUMNS * FONT_SCALE {
                    let (col, row) = ((tx / FONT_SCALE) as i32, ty / FONT_SCALE);
                    if !lit(col, row) {
                        continue;
                    }
                    let left_edge = tx % FONT_SCALE == 0 && !lit(col - 1, row);
                    let right_edge = tx % FONT_SCALE == FONT_SCALE - 1 && !lit(col + 1, row);
                    let rgb = match (kind, left_edge, right_edge) {
                        (CoverageKind::Subpixel, true, false) => [85, 170, 255],
                        (CoverageKind::Subpixel, false, true) => [255, 170, 85],
                        (_, true, _) | (_, _, true) => [192; 3],
                        _ => [255; 3],
                    };
                    let x = index as u32 * self.cell_width + CELL_PADDING + tx;
                    bitmap.set(x, CELL_PADDING + ty, rgb);
                }
            }
        }
        bitmap
    }

    /// Lay `text` out on one line starting at `origin`, in centered y-up
    /// logical pixels.
    fn layout(&self, text: &str, origin: Vec2) -> Vec<GlyphQuad> {
        let advance = (GLYPH_COLUMNS + 1) as f32 * FONT_SCALE as f32 * TEXEL_SIZE;
        let size = Vec2::new(
            (GLYPH_COLUMNS * FONT_SCALE) as f32,
            (GLYPH_ROWS * FONT_SCALE) as f32,
        ) * TEXEL_SIZE;

        let mut caret = origin;
        let mut quads = Vec::new();
        for c in text.chars() {
            if let Some(texels) = self.texels(c) {
                // Glyphs sit on the baseline, so their top is at -height.
                let bounds = PixelBounds::new(Vec2::new(0.0, -size.y), Vec2::new(size.x, 0.0));
                quads.push(GlyphQuad::new(caret, bounds, texels));
            }
            caret.x += advance;
        }
        quads
    }
}

/// Five point path with two oscillating joints and a spinning tail.
fn animated_path(seconds: f32, surface: &SurfaceDimensions) -> Vec<Vec3> {
    let t = seconds * 2.0;
    let moving_x_one = 0.25 + 0.125 * t.sin();
    let moving_x_two = 0.5 + 0.125 * t.cos();

    let angle = std::f32::consts::TAU * (t / 4.0);
    let tail = Vec2::new(angle.cos() / surface.aspect_ratio(), angle.sin());

    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(moving_x_one, 0.5, 0.0),
        Vec3::new(moving_x_one, 0.0, 0.0),
        Vec3::new(moving_x_two, 0.5, 0.0),
        Vec3::new(moving_x_two + 0.125 * tail.x, 0.5 + 0.125 * tail.y, 0.0),
    ]
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let required_features = Renderer::required_features();
        if !adapter.features().contains(required_features) {
            log::error!("Adapter does not support {required_features:?}");
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let dimensions =
            SurfaceDimensions::new(config.width, config.height, window.scale_factor() as f32)
                .unwrap();
        let renderer = Renderer::new(&device, surface_format, dimensions).unwrap();

        Self {
            surface,
            device,
            queue,
            config,
            renderer,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            if let Err(err) = self.renderer.resize(new_size.width, new_size.height) {
                log::warn!("Ignoring resize: {err}");
            }
        }
    }
}

struct Atlases {
    font: FontAtlas,
    grayscale: CoverageAtlas,
    subpixel: CoverageAtlas,
}

struct RibbonText {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    atlases: Option<Atlases>,
    start: Instant,
    show_segments: bool,
    subpixel_text: bool,
}

impl RibbonText {
    fn new() -> Self {
        Self {
            window: None,
            gpu_state: None,
            atlases: None,
            start: Instant::now(),
            show_segments: false,
            subpixel_text: true,
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(atlases)) = (&mut self.gpu_state, &self.atlases) else {
            return;
        };

        let surface = *gpu.renderer.surface();
        let points = animated_path(self.start.elapsed().as_secs_f32(), &surface);
        match Polyline::new(points) {
            Ok(path) => {
                let ribbon = LineStyle::new(Color::rgb(0.95, 0.55, 0.2));
                if let Err(err) = gpu.renderer.draw_polyline(&path, 6.0, &ribbon) {
                    log::warn!("Skipping ribbon: {err}");
                }
                if self.show_segments {
                    match path.segments(0.004) {
                        Ok(segments) => gpu
                            .renderer
                            .draw_simple_segments(&segments, &LineStyle::new(css::AQUA)),
                        Err(err) => log::warn!("Skipping segments: {err}"),
                    }
                }
            }
            Err(err) => log::warn!("Skipping path: {err}"),
        }

        let atlas = if self.subpixel_text {
            &atlases.subpixel
        } else {
            &atlases.grayscale
        };
        let quads = atlases.font.layout(TEXT, Vec2::new(-300.0, -150.0));
        gpu.renderer
            .draw_glyphs(atlas, &quads, &GlyphStyle::new(css::WHITE));

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err) => {
                log::warn!("Dropping frame: {err}");
                gpu.renderer.clear();
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for RibbonText {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Inkline - Ribbon and Text")
            .with_inner_size(winit::dpi::LogicalSize::new(1000, 700));
        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let gpu = pollster::block_on(GpuState::new(window.clone()));
        let font = FontAtlas::new();
        let grayscale = gpu.renderer.create_atlas(
            &gpu.device,
            &gpu.queue,
            &font.rasterize(CoverageKind::Grayscale),
        );
        let subpixel = gpu.renderer.create_atlas(
            &gpu.device,
            &gpu.queue,
            &font.rasterize(CoverageKind::Subpixel),
        );

        self.atlases = Some(Atlases {
            font,
            grayscale,
            subpixel,
        });
        self.gpu_state = Some(gpu);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event: ref key_event,
                ..
            } if key_event.state == ElementState::Pressed => match key_event.physical_key {
                PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                PhysicalKey::Code(KeyCode::KeyD) => {
                    self.show_segments = !self.show_segments;
                    log::info!("Segment overlay: {}", self.show_segments);
                }
                PhysicalKey::Code(KeyCode::KeyG) => {
                    self.subpixel_text = !self.subpixel_text;
                    log::info!("Subpixel text: {}", self.subpixel_text);
                }
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    if let Err(err) = gpu_state.renderer.set_scale_factor(scale_factor as f32) {
                        log::warn!("Ignoring scale factor: {err}");
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }

        // Always request redraw for Poll mode
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = RibbonText::new();
    event_loop.run_app(&mut app).unwrap();
}
