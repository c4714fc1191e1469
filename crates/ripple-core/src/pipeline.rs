use crate::cover::ProjectionState;
use crate::device::{CompositeUniforms, RenderDevice};
use crate::error::Result;
use crate::image::{ImageSize, ImageSlot, RgbaImage};
use crate::params::RippleParams;
use crate::passes::{BackgroundPass, CompositeStage, DisplacementPass};
use crate::pointer::PointerTracker;
use crate::pool::StampPool;
use crate::viewport::ViewportController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The latest reported window size has a zero dimension, or none has
    /// been reported yet.
    ViewportPending,
    /// Brush or background image not uploaded yet.
    AssetsPending,
    /// The device could not provide a display target this frame.
    SurfaceUnavailable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    Rendered {
        stamps: usize,
        composite: CompositeUniforms,
    },
}

/// Owns all effect state and runs one ordered frame per display refresh.
///
/// Input providers push pointer samples and window sizes at any time; they are
/// only consumed inside [`RipplePipeline::frame`], which is the single place
/// where the pool, projections and device are touched.
pub struct RipplePipeline {
    params: RippleParams,
    tracker: PointerTracker,
    pool: StampPool,
    viewport: ViewportController,
    projection: ProjectionState,
    displacement: DisplacementPass,
    background: BackgroundPass,
    composite: CompositeStage,
    brush: Option<ImageSize>,
    background_image: Option<ImageSize>,
    frames: u64,
}

impl RipplePipeline {
    pub fn new(params: RippleParams, seed: u64) -> Result<Self> {
        let pool = StampPool::new(&params, seed)?;
        Ok(Self {
            tracker: PointerTracker::new(),
            pool,
            viewport: ViewportController::new(),
            projection: ProjectionState::new(),
            displacement: DisplacementPass::new(params.capacity, params.stamp_size),
            background: BackgroundPass::new(),
            composite: CompositeStage::new(params.displacement_strength),
            brush: None,
            background_image: None,
            frames: 0,
            params,
        })
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.tracker.record(x, y);
    }

    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport.resize(width, height, device_pixel_ratio);
    }

    pub fn set_image<D: RenderDevice + ?Sized>(
        &mut self,
        device: &mut D,
        slot: ImageSlot,
        image: &RgbaImage,
    ) {
        device.upload_image(slot, image);
        match slot {
            ImageSlot::Brush => self.brush = Some(image.size()),
            ImageSlot::Background => {
                self.background_image = Some(image.size());
                self.projection.set_image(image.size());
            }
        }
        log::info!(
            "[assets] {:?} image {}x{}",
            slot,
            image.width(),
            image.height()
        );
    }

    pub fn frame<D: RenderDevice + ?Sized>(&mut self, device: &mut D) -> FrameOutcome {
        if let Some(change) = self.viewport.sync() {
            if change.physical_changed {
                device.resize_targets(change.physical);
            }
            self.projection.set_viewport(change.viewport.scene_size());
        }
        let Some(viewport) = self.viewport.current() else {
            return FrameOutcome::Skipped(SkipReason::ViewportPending);
        };

        if let Some(pointer) = self.tracker.sample(viewport.scene_size()) {
            self.pool.spawn_if_moved(pointer.current.x, pointer.current.y);
        }
        self.pool.decay_all();

        if self.brush.is_none() || self.background_image.is_none() {
            return FrameOutcome::Skipped(SkipReason::AssetsPending);
        }
        if !device.begin_frame() {
            return FrameOutcome::Skipped(SkipReason::SurfaceUnavailable);
        }
        let stamps = self
            .displacement
            .render(device, &self.pool, self.viewport.camera().view_proj());
        self.background.render(device, &self.projection);
        let composite = self.composite.render(device, &viewport);
        device.end_frame();

        self.frames += 1;
        if self.frames == 1 {
            log::info!(
                "[frame] first frame at {}x{} px",
                composite.resolution.x,
                composite.resolution.y
            );
        }
        FrameOutcome::Rendered { stamps, composite }
    }

    /// Release every device resource. Called once when the host view goes away.
    pub fn shutdown<D: RenderDevice + ?Sized>(self, device: &mut D) {
        log::info!("[pipeline] shutdown after {} frames", self.frames);
        device.release();
    }

    pub fn pool(&self) -> &StampPool {
        &self.pool
    }

    pub fn projection(&self) -> &ProjectionState {
        &self.projection
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}
