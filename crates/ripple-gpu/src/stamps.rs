use super::helpers;
use super::targets::DISPLACEMENT_FORMAT;
use ripple_core::{RgbaImage, StampBatch, StampDraw};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct StampUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) stamp_size: f32,
    pub(crate) _pad: [f32; 3],
}

const STAMP_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x2,
    2 => Float32,
    3 => Float32
];

/// Instanced brush-quad pipeline writing into the displacement target.
pub(crate) struct StampResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) instance_buffer: wgpu::Buffer,
    pub(crate) instance_capacity: usize,
    // Set once a brush texture has been uploaded.
    pub(crate) brush: Option<(wgpu::Texture, wgpu::BindGroup)>,
}

pub(crate) fn create_stamp_resources(device: &wgpu::Device, capacity: usize) -> StampResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("stamp_shader"),
        source: wgpu::ShaderSource::Wgsl(ripple_core::STAMP_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stamp_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX),
            helpers::texture_entry(1),
            helpers::sampler_entry(2),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("stamp_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<StampDraw>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &STAMP_ATTRIBUTES,
    };
    let pipeline = helpers::make_pipeline(
        device,
        "stamp_pipeline",
        &pl,
        &shader,
        "vs_stamp",
        "fs_stamp",
        &[instance_layout],
        DISPLACEMENT_FORMAT,
        Some(wgpu::BlendState::ALPHA_BLENDING),
    );
    StampResources {
        pipeline,
        bgl,
        uniform_buffer: helpers::uniform_buffer::<StampUniforms>(device, "stamp_uniforms"),
        instance_buffer: create_instance_buffer(device, capacity),
        instance_capacity: capacity.max(1),
        brush: None,
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("stamp_instances"),
        size: (std::mem::size_of::<StampDraw>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl StampResources {
    pub(crate) fn set_brush(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        image: &RgbaImage,
    ) {
        // Brush alpha is a mask, not a color; keep it linear.
        let (tex, view) = helpers::upload_rgba_texture(
            device,
            queue,
            "brush_tex",
            image,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stamp_bg"),
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
        if let Some((old, _)) = self.brush.replace((tex, bind_group)) {
            old.destroy();
        }
    }

    /// Write uniforms and instances for this frame; returns the instance count.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        batch: &StampBatch<'_>,
    ) -> u32 {
        if batch.stamps.len() > self.instance_capacity {
            self.instance_buffer.destroy();
            self.instance_buffer = create_instance_buffer(device, batch.stamps.len());
            self.instance_capacity = batch.stamps.len();
        }
        let u = StampUniforms {
            view_proj: batch.view_proj.to_cols_array_2d(),
            stamp_size: batch.stamp_size,
            _pad: [0.0; 3],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(batch.stamps));
        batch.stamps.len() as u32
    }

    pub(crate) fn destroy(&mut self) {
        self.uniform_buffer.destroy();
        self.instance_buffer.destroy();
        if let Some((tex, _)) = self.brush.take() {
            tex.destroy();
        }
    }
}
