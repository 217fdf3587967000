//! WebGPU render pipeline setup

use super::shapes::frame_vertices;
use super::vertex::{Vertex, colors};
use crate::view::Frame;

/// Map a field-space point to normalized device coordinates
///
/// The field keeps its aspect ratio and is centered in the viewport; the
/// leftover bands are letterboxed. Both spaces have y pointing up.
pub fn field_to_ndc(viewport: (u32, u32), field: [f32; 2], x: f32, y: f32) -> (f32, f32) {
    let (w, h) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let scale = (w / field[0]).min(h / field[1]);
    let offset_x = (w - field[0] * scale) / 2.0;
    let offset_y = (h - field[1] * scale) / 2.0;

    let px = offset_x + x * scale;
    let py = offset_y + y * scale;
    (px / w * 2.0 - 1.0, py / h * 2.0 - 1.0)
}

/// Vertices the first buffer can hold before it has to grow
const INITIAL_VERTEX_CAPACITY: usize = 256;

/// Prefer an sRGB format so the palette renders as authored
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .unwrap_or(caps.formats[0]);
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// Flat-colored, alpha-blended triangle list
fn flat_color_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("flat_color_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flat_color_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flat_color_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Quads are emitted without a consistent winding
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Buffer size (in vertices) needed to hold `needed`, or None if `current` fits
fn grown_capacity(current: usize, needed: usize) -> Option<usize> {
    (needed > current).then(|| needed.next_power_of_two())
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("frame_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = colors::LETTERBOX.map(f64::from);
    wgpu::Color { r, g, b, a }
}

/// GPU side of the game: one pipeline, one growable vertex buffer
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    /// Vertices `vertices` can hold
    capacity: usize,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gate-flyer-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let config = surface_config(&surface.get_capabilities(adapter), width, height);
        surface.configure(&device, &config);
        let pipeline = flat_color_pipeline(&device, config.format);
        let vertices = vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        log::info!("Renderer ready: {}x{} ({:?})", width, height, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertices,
            capacity: INITIAL_VERTEX_CAPACITY,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.size = (new_width, new_height);
        self.config.width = new_width;
        self.config.height = new_height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Copy `data` into the vertex buffer, growing it if needed
    fn upload(&mut self, data: &[Vertex]) {
        if let Some(capacity) = grown_capacity(self.capacity, data.len()) {
            self.capacity = capacity;
            self.vertices = vertex_buffer(&self.device, self.capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.capacity);
        }
        self.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(data));
    }

    /// Draw one frame snapshot
    pub fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let size = self.size;
        let ndc: Vec<Vertex> = frame_vertices(frame)
            .into_iter()
            .map(|v| {
                let (x, y) = field_to_ndc(size, frame.field, v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();
        self.upload(&ndc);

        let output = self.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.vertices.slice(..));
            pass.draw(0..ndc.len() as u32, 0..1);
        }

        self.queue.submit([encoder.finish()]);
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn test_exact_fit_maps_corners() {
        let field = [360.0, 640.0];
        assert!(close(field_to_ndc((360, 640), field, 0.0, 0.0), (-1.0, -1.0)));
        assert!(close(field_to_ndc((360, 640), field, 360.0, 640.0), (1.0, 1.0)));
        assert!(close(field_to_ndc((720, 1280), field, 180.0, 320.0), (0.0, 0.0)));
    }

    #[test]
    fn test_wide_viewport_letterboxes_sides() {
        // 1280x640: field scaled 1:1 and centered horizontally
        let field = [360.0, 640.0];
        let (x0, y0) = field_to_ndc((1280, 640), field, 0.0, 0.0);
        let (x1, y1) = field_to_ndc((1280, 640), field, 360.0, 640.0);
        assert!((y0 + 1.0).abs() < 1e-5 && (y1 - 1.0).abs() < 1e-5);
        assert!(x0 > -1.0 && x1 < 1.0);
        assert!((x0 + x1).abs() < 1e-5);
    }

    #[test]
    fn test_vertex_buffer_grows_to_power_of_two() {
        assert_eq!(grown_capacity(256, 48), None);
        assert_eq!(grown_capacity(256, 256), None);
        assert_eq!(grown_capacity(256, 257), Some(512));
        assert_eq!(grown_capacity(512, 1500), Some(2048));
    }

    #[test]
    fn test_zero_viewport_does_not_divide_by_zero() {
        let (x, y) = field_to_ndc((0, 0), [360.0, 640.0], 10.0, 10.0);
        assert!(x.is_finite() && y.is_finite());
    }
}
