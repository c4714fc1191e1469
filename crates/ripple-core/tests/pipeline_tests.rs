// Host-side tests for frame ordering, driven through a recording device.

use glam::Vec2;
use ripple_core::constants::{BACKGROUND_CLEAR, DISPLACEMENT_CLEAR};
use ripple_core::{
    BackgroundQuad, CompositeUniforms, FrameOutcome, ImageSlot, PhysicalSize, RenderDevice,
    RenderTarget, RgbaImage, RippleParams, RipplePipeline, SkipReason, StampBatch,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Begin,
    End,
    Bind(RenderTarget),
    Clear([f32; 4]),
    Stamps(usize),
    Background(Vec2),
    Composite(CompositeUniforms),
    Resize(PhysicalSize),
    Upload(ImageSlot),
    Release,
}

struct RecordingDevice {
    calls: Vec<Call>,
    bound: RenderTarget,
    surface_ok: bool,
}

impl RecordingDevice {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            bound: RenderTarget::Screen,
            surface_ok: true,
        }
    }

    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderDevice for RecordingDevice {
    fn begin_frame(&mut self) -> bool {
        if self.surface_ok {
            self.calls.push(Call::Begin);
        }
        self.surface_ok
    }
    fn end_frame(&mut self) {
        self.calls.push(Call::End);
    }
    fn bound_target(&self) -> RenderTarget {
        self.bound
    }
    fn bind_target(&mut self, target: RenderTarget) {
        self.bound = target;
        self.calls.push(Call::Bind(target));
    }
    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(Call::Clear(color));
    }
    fn draw_stamps(&mut self, batch: &StampBatch<'_>) {
        self.calls.push(Call::Stamps(batch.stamps.len()));
    }
    fn draw_background(&mut self, quad: &BackgroundQuad) {
        self.calls.push(Call::Background(quad.scale));
    }
    fn draw_composite(&mut self, uniforms: &CompositeUniforms) {
        self.calls.push(Call::Composite(*uniforms));
    }
    fn resize_targets(&mut self, size: PhysicalSize) {
        self.calls.push(Call::Resize(size));
    }
    fn upload_image(&mut self, slot: ImageSlot, _image: &RgbaImage) {
        self.calls.push(Call::Upload(slot));
    }
    fn release(&mut self) {
        self.calls.push(Call::Release);
    }
}

fn image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height, vec![255; (width * height * 4) as usize]).unwrap()
}

fn ready_pipeline(dev: &mut RecordingDevice) -> RipplePipeline {
    let mut p = RipplePipeline::new(RippleParams::default(), 3).unwrap();
    p.set_image(dev, ImageSlot::Brush, &image(4, 4));
    p.set_image(dev, ImageSlot::Background, &image(400, 100));
    p.resize(800.0, 600.0, 2.0);
    dev.take();
    p
}

fn composite_for(resolution: Vec2) -> CompositeUniforms {
    CompositeUniforms {
        displacement: RenderTarget::Displacement,
        color: RenderTarget::Background,
        resolution,
        strength: 0.075,
    }
}

#[test]
fn frame_before_any_resize_is_skipped_without_device_work() {
    let mut dev = RecordingDevice::new();
    let mut p = RipplePipeline::new(RippleParams::default(), 0).unwrap();
    p.pointer_moved(10.0, 10.0);
    assert_eq!(
        p.frame(&mut dev),
        FrameOutcome::Skipped(SkipReason::ViewportPending)
    );
    assert!(dev.calls.is_empty());
    assert_eq!(p.pool().active_count(), 0);
}

#[test]
fn first_frame_resizes_targets_then_renders_passes_in_order() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.pointer_moved(410.0, 300.0);

    let outcome = p.frame(&mut dev);
    let resolution = Vec2::new(1600.0, 1200.0);
    assert_eq!(
        outcome,
        FrameOutcome::Rendered {
            stamps: 1,
            composite: composite_for(resolution),
        }
    );
    assert_eq!(
        dev.take(),
        vec![
            Call::Resize(PhysicalSize {
                width: 1600,
                height: 1200
            }),
            Call::Begin,
            Call::Bind(RenderTarget::Displacement),
            Call::Clear(DISPLACEMENT_CLEAR),
            Call::Stamps(1),
            Call::Bind(RenderTarget::Screen),
            Call::Bind(RenderTarget::Background),
            Call::Clear(BACKGROUND_CLEAR),
            Call::Background(Vec2::new(2400.0, 600.0)),
            Call::Bind(RenderTarget::Screen),
            Call::Bind(RenderTarget::Screen),
            Call::Composite(composite_for(resolution)),
            Call::End,
        ]
    );
    assert_eq!(dev.bound, RenderTarget::Screen);
    assert_eq!(p.frames_rendered(), 1);
}

#[test]
fn empty_pool_still_clears_displacement() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.frame(&mut dev);
    let calls = dev.take();
    assert!(calls.contains(&Call::Clear(DISPLACEMENT_CLEAR)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Stamps(_))));
}

#[test]
fn unchanged_size_does_not_resize_again() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.frame(&mut dev);
    dev.take();
    p.resize(800.0, 600.0, 2.0);
    p.frame(&mut dev);
    assert!(!dev.take().iter().any(|c| matches!(c, Call::Resize(_))));
}

#[test]
fn zero_size_after_layout_pauses_until_a_positive_size() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.pointer_moved(410.0, 300.0);
    p.frame(&mut dev);
    dev.take();
    let opacity = p.pool().slot(0).unwrap().opacity;

    p.resize(0.0, 0.0, 2.0);
    for _ in 0..3 {
        assert_eq!(
            p.frame(&mut dev),
            FrameOutcome::Skipped(SkipReason::ViewportPending)
        );
    }
    assert!(dev.take().is_empty());
    assert_eq!(p.pool().slot(0).unwrap().opacity, opacity);
    assert_eq!(
        p.projection().image_scale(),
        Some(Vec2::new(2400.0, 600.0))
    );

    p.resize(800.0, 0.0, 2.0);
    assert_eq!(
        p.frame(&mut dev),
        FrameOutcome::Skipped(SkipReason::ViewportPending)
    );

    // Same size as before: targets and cover scale are reused as they are.
    p.resize(800.0, 600.0, 2.0);
    let outcome = p.frame(&mut dev);
    let calls = dev.take();
    assert!(!calls.iter().any(|c| matches!(c, Call::Resize(_))));
    assert!(calls.contains(&Call::Background(Vec2::new(2400.0, 600.0))));
    assert!(matches!(outcome, FrameOutcome::Rendered { stamps: 1, .. }));
}

#[test]
fn first_layout_at_zero_then_real_size_sizes_every_buffer() {
    let mut dev = RecordingDevice::new();
    let mut p = RipplePipeline::new(RippleParams::default(), 0).unwrap();
    p.set_image(&mut dev, ImageSlot::Brush, &image(4, 4));
    p.set_image(&mut dev, ImageSlot::Background, &image(400, 100));
    dev.take();

    p.resize(0.0, 0.0, 1.5);
    assert_eq!(
        p.frame(&mut dev),
        FrameOutcome::Skipped(SkipReason::ViewportPending)
    );
    assert!(dev.calls.is_empty());

    p.resize(800.0, 600.0, 1.5);
    let outcome = p.frame(&mut dev);
    let resolution = Vec2::new(1200.0, 900.0);
    assert_eq!(
        outcome,
        FrameOutcome::Rendered {
            stamps: 0,
            composite: composite_for(resolution),
        }
    );
    let calls = dev.take();
    assert_eq!(
        calls[0],
        Call::Resize(PhysicalSize {
            width: 1200,
            height: 900
        })
    );
    assert!(calls.contains(&Call::Composite(composite_for(resolution))));
}

#[test]
fn missing_assets_skip_rendering_but_not_simulation() {
    let mut dev = RecordingDevice::new();
    let mut p = RipplePipeline::new(RippleParams::default(), 0).unwrap();
    p.resize(800.0, 600.0, 1.0);
    p.pointer_moved(100.0, 100.0);

    assert_eq!(
        p.frame(&mut dev),
        FrameOutcome::Skipped(SkipReason::AssetsPending)
    );
    assert_eq!(
        dev.take(),
        vec![Call::Resize(PhysicalSize {
            width: 800,
            height: 600
        })]
    );
    assert_eq!(p.pool().active_count(), 1);
    assert!(p.pool().slot(0).unwrap().opacity < 1.0);
}

#[test]
fn unavailable_surface_skips_the_frame() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    dev.surface_ok = false;
    assert_eq!(
        p.frame(&mut dev),
        FrameOutcome::Skipped(SkipReason::SurfaceUnavailable)
    );
    assert!(!dev.take().contains(&Call::End));
    assert_eq!(p.frames_rendered(), 0);
}

#[test]
fn stamps_follow_the_pointer_across_frames() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.pointer_moved(410.0, 290.0);
    p.frame(&mut dev);
    p.pointer_moved(410.2, 290.0);
    p.frame(&mut dev);
    // Resting pointer: no further spawns.
    p.frame(&mut dev);
    assert_eq!(p.pool().cursor(), 2);
    assert_eq!(p.pool().slot(0).unwrap().position, Vec2::new(10.0, 10.0));
    let outcome = p.frame(&mut dev);
    assert!(matches!(outcome, FrameOutcome::Rendered { stamps: 2, .. }));
}

#[test]
fn background_upload_updates_cover_scale() {
    let mut dev = RecordingDevice::new();
    let mut p = ready_pipeline(&mut dev);
    p.frame(&mut dev);
    dev.take();
    p.set_image(&mut dev, ImageSlot::Background, &image(100, 400));
    assert_eq!(dev.take(), vec![Call::Upload(ImageSlot::Background)]);
    assert_eq!(
        p.projection().image_scale(),
        Some(Vec2::new(800.0, 3200.0))
    );
}

#[test]
fn shutdown_releases_device_resources() {
    let mut dev = RecordingDevice::new();
    let p = ready_pipeline(&mut dev);
    p.shutdown(&mut dev);
    assert_eq!(dev.take(), vec![Call::Release]);
}
