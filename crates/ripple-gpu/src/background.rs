use super::helpers;
use super::targets::BACKGROUND_FORMAT;
use ripple_core::{BackgroundQuad, RgbaImage};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct BackgroundUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) scale: [f32; 2],
    pub(crate) _pad: [f32; 2],
}

pub(crate) struct BackgroundResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) image: Option<(wgpu::Texture, wgpu::BindGroup)>,
}

pub(crate) fn create_background_resources(device: &wgpu::Device) -> BackgroundResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("background_shader"),
        source: wgpu::ShaderSource::Wgsl(ripple_core::BACKGROUND_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("background_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX),
            helpers::texture_entry(1),
            helpers::sampler_entry(2),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("background_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_pipeline(
        device,
        "background_pipeline",
        &pl,
        &shader,
        "vs_background",
        "fs_background",
        &[],
        BACKGROUND_FORMAT,
        Some(wgpu::BlendState::REPLACE),
    );
    BackgroundResources {
        pipeline,
        bgl,
        uniform_buffer: helpers::uniform_buffer::<BackgroundUniforms>(
            device,
            "background_uniforms",
        ),
        image: None,
    }
}

impl BackgroundResources {
    pub(crate) fn set_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        image: &RgbaImage,
    ) {
        let (tex, view) = helpers::upload_rgba_texture(
            device,
            queue,
            "background_image",
            image,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        if let Some((old, _)) = self.image.replace((tex, bind_group)) {
            old.destroy();
        }
    }

    pub(crate) fn prepare(&self, queue: &wgpu::Queue, quad: &BackgroundQuad) {
        let u = BackgroundUniforms {
            view_proj: quad.view_proj.to_cols_array_2d(),
            scale: quad.scale.to_array(),
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn destroy(&mut self) {
        self.uniform_buffer.destroy();
        if let Some((tex, _)) = self.image.take() {
            tex.destroy();
        }
    }
}
