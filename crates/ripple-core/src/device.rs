//! Thin render-device abstraction used by the passes.
//!
//! The passes only ever talk to a [`RenderDevice`]: bind a target, clear it,
//! issue a draw, restore the previous binding. The wgpu implementation lives
//! in `ripple-gpu`; tests use a recording implementation to check pass order
//! without a GPU.

use crate::image::{ImageSlot, RgbaImage};
use crate::viewport::PhysicalSize;
use glam::{Mat4, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// Offscreen buffer the stamps are drawn into.
    Displacement,
    /// Offscreen buffer holding the cover-fit background.
    Background,
    /// The default display target.
    Screen,
}

/// Per-stamp instance data, laid out for direct upload as a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StampDraw {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub rotation: f32,
    pub opacity: f32,
}

/// Explicit draw list for one displacement pass.
#[derive(Clone, Copy, Debug)]
pub struct StampBatch<'a> {
    pub view_proj: Mat4,
    pub stamp_size: f32,
    pub stamps: &'a [StampDraw],
}

/// Centered background quad of `scale` scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundQuad {
    pub view_proj: Mat4,
    pub scale: Vec2,
}

/// Inputs of the composite shader, rebuilt every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeUniforms {
    pub displacement: RenderTarget,
    pub color: RenderTarget,
    /// Viewport size multiplied by the device pixel ratio.
    pub resolution: Vec2,
    pub strength: f32,
}

pub trait RenderDevice {
    /// Prepare a frame. `false` means the display target is unavailable and
    /// the frame must be skipped.
    fn begin_frame(&mut self) -> bool;
    /// Submit everything recorded since `begin_frame` and present.
    fn end_frame(&mut self);

    fn bound_target(&self) -> RenderTarget;
    fn bind_target(&mut self, target: RenderTarget);
    fn clear(&mut self, color: [f32; 4]);

    fn draw_stamps(&mut self, batch: &StampBatch<'_>);
    fn draw_background(&mut self, quad: &BackgroundQuad);
    fn draw_composite(&mut self, uniforms: &CompositeUniforms);

    /// Resize both offscreen targets and the display target.
    fn resize_targets(&mut self, size: PhysicalSize);
    fn upload_image(&mut self, slot: ImageSlot, image: &RgbaImage);
    /// Free every GPU resource. The device is unusable afterwards.
    fn release(&mut self);
}
