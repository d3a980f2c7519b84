use anyhow::{anyhow, Context, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;
use wgpu::TextureFormatFeatureFlags;
use winit::dpi::PhysicalSize;

use crate::compile::{compile_fragment_shader, compile_vertex_shader};
use crate::params::GrainParams;
use crate::shaders;
use crate::types::{Antialiasing, Background, MarbleGrid};

use super::uniforms::SceneUniforms;

/// Everything the shader needs that changes frame to frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameInputs {
    /// Seconds since the renderer came up.
    pub time: f32,
    /// Theme background color, 0..1 RGB.
    pub base_rgb: [f32; 3],
    /// First-paint reveal level in [0, 1].
    pub reveal: f32,
    /// Pointer position in surface pixels while a drag is live.
    pub drag: Option<(f32, f32)>,
}

/// Owns the GPU resources required to draw the background.
///
/// The layout mirrors the lifetime relationship between objects: the
/// surface outlives the device's pipeline and buffers, and everything is
/// released exactly once when the state drops with the event loop.
pub(crate) struct GpuState {
    /// `wgpu` instance that produced the surface; kept alive for the surface lifetime.
    _instance: wgpu::Instance,
    /// Limits advertised by the adapter; used to validate resize requests.
    limits: wgpu::Limits,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Current backing-surface size in pixels (already pixel-ratio capped).
    size: PhysicalSize<u32>,
    sample_count: u32,
    multisample_target: Option<MultisampleTarget>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// CPU copy of the uniform block mirrored into the buffer each frame.
    uniforms: SceneUniforms,
}

impl GpuState {
    /// Creates a GPU pipeline targeting the supplied surface and size.
    #[allow(clippy::too_many_arguments)]
    pub fn new<T>(
        target: &T,
        backing: PhysicalSize<u32>,
        pixel_ratio: f64,
        background: Background,
        antialiasing: Antialiasing,
        grain: GrainParams,
        grid: MarbleGrid,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::default();
        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let limits = adapter.limits();
        let max_dimension = limits.max_texture_dimension_2d;
        let width = backing.width.max(1);
        let height = backing.height.max(1);
        if width > max_dimension || height > max_dimension {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            );
        }

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let sample_count = resolve_sample_count(&adapter, surface_format, antialiasing);
        tracing::info!(?antialiasing, sample_count, "resolved MSAA configuration");

        let mut required_features = wgpu::Features::empty();
        if sample_count > 4 {
            required_features |= wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES;
        }

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("colorfield device"),
            required_features,
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        };
        let (device, queue) = pollster::block_on(adapter.request_device(&device_descriptor))
            .context("failed to create GPU device")?;

        let size = PhysicalSize::new(width, height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let fragment_body = match background {
            Background::Grain => shaders::GRAIN_FRAGMENT,
            Background::Marble => shaders::MARBLE_FRAGMENT,
        };
        let vertex_module = compile_vertex_shader(&device)?;
        let fragment_module = compile_fragment_shader(&device, fragment_body)
            .context("failed to compile background shader")?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..wgpu::MultisampleState::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        let uniforms =
            SceneUniforms::new(size.width, size.height, pixel_ratio as f32, grain, grid);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene uniform buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let multisample_target = if sample_count > 1 {
            Some(MultisampleTarget::new(
                &device,
                surface_format,
                size,
                sample_count,
            ))
        } else {
            None
        };

        Ok(Self {
            _instance: instance,
            limits,
            surface,
            device,
            queue,
            config,
            size,
            sample_count,
            multisample_target,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
        })
    }

    /// Current backing-surface size.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the swapchain for a new backing size without touching
    /// the pipeline or the render loop.
    pub fn resize(&mut self, backing: PhysicalSize<u32>, pixel_ratio: f64) {
        if backing.width == 0 || backing.height == 0 {
            return;
        }
        let max_dimension = self.limits.max_texture_dimension_2d;
        if backing.width > max_dimension || backing.height > max_dimension {
            tracing::warn!(
                width = backing.width,
                height = backing.height,
                max_dimension,
                "resize exceeds GPU max texture dimension; keeping previous size"
            );
            return;
        }

        self.size = backing;
        self.config.width = backing.width;
        self.config.height = backing.height;
        self.surface.configure(&self.device, &self.config);
        self.multisample_target = if self.sample_count > 1 {
            Some(MultisampleTarget::new(
                &self.device,
                self.config.format,
                backing,
                self.sample_count,
            ))
        } else {
            None
        };
        self.uniforms.set_resolution(
            backing.width as f32,
            backing.height as f32,
            pixel_ratio as f32,
        );
    }

    /// Re-applies the current configuration after a lost/outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Uploads this frame's uniforms and submits one full-screen draw.
    pub fn render_frame(&mut self, inputs: FrameInputs) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.set_time(inputs.time);
        self.uniforms.set_base_color(inputs.base_rgb, inputs.reveal);
        self.uniforms.set_drag(inputs.drag);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("background encoder"),
            });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("background pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            "presented frame size={}x{}",
            self.size.width,
            self.size.height
        );
        Ok(())
    }
}

/// Picks an MSAA sample count the surface format can actually resolve.
fn resolve_sample_count(
    adapter: &wgpu::Adapter,
    format: wgpu::TextureFormat,
    antialiasing: Antialiasing,
) -> u32 {
    let format_features = adapter.get_texture_format_features(format);
    let mut supported = format_features.flags.supported_sample_counts();
    if !supported.contains(&1) {
        supported.push(1);
    }
    supported.sort_unstable();
    supported.dedup();

    let chosen = match antialiasing {
        Antialiasing::Auto => *supported.last().unwrap_or(&1),
        Antialiasing::Off => 1,
        Antialiasing::Samples(requested) => {
            if supported.contains(&requested) {
                requested
            } else {
                let fallback = supported
                    .iter()
                    .copied()
                    .filter(|&count| count <= requested)
                    .max()
                    .unwrap_or(1);
                tracing::warn!(
                    requested,
                    fallback,
                    ?supported,
                    "requested MSAA sample count not supported; falling back"
                );
                fallback
            }
        }
    };

    if chosen > 1
        && !format_features
            .flags
            .contains(TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE)
    {
        tracing::warn!(?format, "surface format does not support MSAA resolve; disabling MSAA");
        return 1;
    }

    if chosen > 4
        && !adapter
            .features()
            .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES)
    {
        let fallback = supported
            .iter()
            .copied()
            .filter(|&count| count <= 4)
            .max()
            .unwrap_or(1);
        tracing::warn!(
            chosen,
            fallback,
            "adapter lacks TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES; clamping MSAA"
        );
        return fallback;
    }

    chosen
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("colorfield msaa color"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}
