use super::helpers;
use super::targets::RenderTargets;
use ripple_core::CompositeUniforms;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CompositeParams {
    pub(crate) resolution: [f32; 2],
    pub(crate) strength: f32,
    pub(crate) _pad: f32,
}

pub(crate) struct CompositeResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) fn create_composite_resources(
    device: &wgpu::Device,
    swap_format: wgpu::TextureFormat,
    targets: &RenderTargets,
    sampler: &wgpu::Sampler,
) -> CompositeResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("composite_shader"),
        source: wgpu::ShaderSource::Wgsl(ripple_core::COMPOSITE_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("composite_bgl"),
        entries: &[
            helpers::texture_entry(0),
            helpers::texture_entry(1),
            helpers::sampler_entry(2),
            helpers::uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("composite_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_pipeline(
        device,
        "composite_pipeline",
        &pl,
        &shader,
        "vs_fullscreen",
        "fs_composite",
        &[],
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );
    let uniform_buffer = helpers::uniform_buffer::<CompositeParams>(device, "composite_uniforms");
    let bind_group = build_bind_group(device, &bgl, targets, sampler, &uniform_buffer);
    CompositeResources {
        pipeline,
        bgl,
        uniform_buffer,
        bind_group,
    }
}

fn build_bind_group(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    targets: &RenderTargets,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("composite_bg"),
        layout: bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.displacement_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&targets.background_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    })
}

impl CompositeResources {
    /// Target views change on every resize, so the bind group follows them.
    pub(crate) fn rebuild_bind_group(
        &mut self,
        device: &wgpu::Device,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) {
        self.bind_group =
            build_bind_group(device, &self.bgl, targets, sampler, &self.uniform_buffer);
    }

    pub(crate) fn prepare(&self, queue: &wgpu::Queue, uniforms: &CompositeUniforms) {
        let p = CompositeParams {
            resolution: uniforms.resolution.to_array(),
            strength: uniforms.strength,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&p));
    }

    pub(crate) fn destroy(&self) {
        self.uniform_buffer.destroy();
    }
}
