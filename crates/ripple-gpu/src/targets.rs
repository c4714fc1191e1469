use super::helpers;
use ripple_core::PhysicalSize;

pub(crate) const DISPLACEMENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub(crate) const BACKGROUND_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// The two offscreen color buffers, both at full device-pixel resolution.
///
/// - `displacement_*` receives the stamps and is sampled as a uv offset.
/// - `background_*` receives the cover-fit image and is sampled for color.
pub(crate) struct RenderTargets {
    pub(crate) displacement_tex: wgpu::Texture,
    pub(crate) displacement_view: wgpu::TextureView,
    pub(crate) background_tex: wgpu::Texture,
    pub(crate) background_view: wgpu::TextureView,
    pub(crate) size: PhysicalSize,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, size: PhysicalSize) -> Self {
        let (displacement_tex, displacement_view) =
            create(device, "displacement_tex", size, DISPLACEMENT_FORMAT);
        let (background_tex, background_view) =
            create(device, "background_tex", size, BACKGROUND_FORMAT);
        Self {
            displacement_tex,
            displacement_view,
            background_tex,
            background_view,
            size,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, size: PhysicalSize) {
        self.destroy();
        *self = Self::new(device, size);
    }

    pub(crate) fn destroy(&self) {
        self.displacement_tex.destroy();
        self.background_tex.destroy();
    }
}

fn create(
    device: &wgpu::Device,
    label: &str,
    size: PhysicalSize,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_color_texture(
        device,
        label,
        size.width,
        size.height,
        format,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    )
}
