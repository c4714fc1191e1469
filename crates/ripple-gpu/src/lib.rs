//! wgpu implementation of [`ripple_core::RenderDevice`].
//!
//! Render-target binding is emulated on top of wgpu's pass model: a bound
//! target plus an optional pending clear. Every draw opens its own render
//! pass on the frame's command encoder, so the recorded order of passes is
//! exactly the order the pipeline issued them in.

use ripple_core::{
    BackgroundQuad, CompositeUniforms, ImageSlot, PhysicalSize, RenderDevice, RenderTarget,
    RgbaImage, StampBatch,
};

mod background;
mod composite;
mod helpers;
mod stamps;
mod targets;

use background::{create_background_resources, BackgroundResources};
use composite::{create_composite_resources, CompositeResources};
use stamps::{create_stamp_resources, StampResources};
use targets::RenderTargets;

struct FrameInFlight {
    surface_tex: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

pub struct GpuDevice<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    stamps: StampResources,
    background: BackgroundResources,
    composite: CompositeResources,

    frame: Option<FrameInFlight>,
    bound: RenderTarget,
    pending_clear: Option<wgpu::Color>,
    released: bool,
}

impl<'w> GpuDevice<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: PhysicalSize,
        stamp_capacity: usize,
    ) -> anyhow::Result<Self> {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let targets = RenderTargets::new(&device, PhysicalSize { width, height });
        let stamps = create_stamp_resources(&device, stamp_capacity);
        let background = create_background_resources(&device);
        let composite = create_composite_resources(&device, format, &targets, &linear_sampler);
        log::info!("[gpu] surface {:?} {}x{}", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            linear_sampler,
            stamps,
            background,
            composite,
            frame: None,
            bound: RenderTarget::Screen,
            pending_clear: None,
            released: false,
        })
    }

    pub fn size(&self) -> PhysicalSize {
        self.targets.size
    }

    fn take_load(&mut self) -> wgpu::LoadOp<wgpu::Color> {
        self.pending_clear
            .take()
            .map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear)
    }

    // A clear with no draw after it still has to reach the target.
    fn flush_clear(&mut self) {
        let Some(color) = self.pending_clear.take() else {
            return;
        };
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        let view = target_view(&self.targets, &frame.view, self.bound);
        drop(begin_pass(
            &mut frame.encoder,
            "clear",
            view,
            wgpu::LoadOp::Clear(color),
        ));
    }
}

fn target_view<'a>(
    targets: &'a RenderTargets,
    screen: &'a wgpu::TextureView,
    target: RenderTarget,
) -> &'a wgpu::TextureView {
    match target {
        RenderTarget::Displacement => &targets.displacement_view,
        RenderTarget::Background => &targets.background_view,
        RenderTarget::Screen => screen,
    }
}

fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

impl<'w> RenderDevice for GpuDevice<'w> {
    fn begin_frame(&mut self) -> bool {
        if self.released {
            return false;
        }
        let surface_tex = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return false;
            }
            Err(e) => {
                log::error!("render error: {:?}", e);
                return false;
            }
        };
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.frame = Some(FrameInFlight {
            surface_tex,
            view,
            encoder,
        });
        self.bound = RenderTarget::Screen;
        self.pending_clear = None;
        true
    }

    fn end_frame(&mut self) {
        self.flush_clear();
        if let Some(frame) = self.frame.take() {
            self.queue.submit(Some(frame.encoder.finish()));
            frame.surface_tex.present();
        }
    }

    fn bound_target(&self) -> RenderTarget {
        self.bound
    }

    fn bind_target(&mut self, target: RenderTarget) {
        if target != self.bound {
            self.flush_clear();
        }
        self.bound = target;
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.pending_clear = Some(wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        });
    }

    fn draw_stamps(&mut self, batch: &StampBatch<'_>) {
        if self.frame.is_none() || self.stamps.brush.is_none() || batch.stamps.is_empty() {
            return;
        }
        let count = self.stamps.prepare(&self.device, &self.queue, batch);
        let load = self.take_load();
        let (Some(frame), Some((_, bind_group))) =
            (self.frame.as_mut(), self.stamps.brush.as_ref())
        else {
            return;
        };
        let FrameInFlight { encoder, view, .. } = frame;
        let mut pass = begin_pass(
            encoder,
            "displacement_pass",
            target_view(&self.targets, view, self.bound),
            load,
        );
        pass.set_pipeline(&self.stamps.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.stamps.instance_buffer.slice(..));
        pass.draw(0..6, 0..count);
    }

    fn draw_background(&mut self, quad: &BackgroundQuad) {
        if self.frame.is_none() || self.background.image.is_none() {
            return;
        }
        self.background.prepare(&self.queue, quad);
        let load = self.take_load();
        let (Some(frame), Some((_, bind_group))) =
            (self.frame.as_mut(), self.background.image.as_ref())
        else {
            return;
        };
        let FrameInFlight { encoder, view, .. } = frame;
        let mut pass = begin_pass(
            encoder,
            "background_pass",
            target_view(&self.targets, view, self.bound),
            load,
        );
        pass.set_pipeline(&self.background.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..6, 0..1);
    }

    fn draw_composite(&mut self, uniforms: &CompositeUniforms) {
        if self.frame.is_none() {
            return;
        }
        self.composite.prepare(&self.queue, uniforms);
        let load = self
            .pending_clear
            .take()
            .map_or(wgpu::LoadOp::Clear(wgpu::Color::BLACK), wgpu::LoadOp::Clear);
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        let FrameInFlight { encoder, view, .. } = frame;
        let mut pass = begin_pass(
            encoder,
            "composite",
            target_view(&self.targets, view, self.bound),
            load,
        );
        pass.set_pipeline(&self.composite.pipeline);
        pass.set_bind_group(0, &self.composite.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn resize_targets(&mut self, size: PhysicalSize) {
        if size.width == 0 || size.height == 0 || self.released {
            return;
        }
        if size == self.targets.size {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);

        // Recreate offscreen render targets and the bind group that samples them
        self.targets.recreate(&self.device, size);
        self.composite
            .rebuild_bind_group(&self.device, &self.targets, &self.linear_sampler);
        log::debug!("[gpu] targets resized to {}x{}", size.width, size.height);
    }

    fn upload_image(&mut self, slot: ImageSlot, image: &RgbaImage) {
        if self.released {
            return;
        }
        match slot {
            ImageSlot::Brush => {
                self.stamps
                    .set_brush(&self.device, &self.queue, &self.linear_sampler, image)
            }
            ImageSlot::Background => {
                self.background
                    .set_image(&self.device, &self.queue, &self.linear_sampler, image)
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        // An unpresented frame is simply dropped.
        self.frame = None;
        self.pending_clear = None;
        self.stamps.destroy();
        self.background.destroy();
        self.composite.destroy();
        self.targets.destroy();
        self.released = true;
        log::info!("[gpu] resources released");
    }
}

impl<'w> Drop for GpuDevice<'w> {
    fn drop(&mut self) {
        self.release();
    }
}
