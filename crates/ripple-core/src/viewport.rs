//! Window dimensions, device-pixel sizing and the main scene camera.

use crate::constants::{CAMERA_FAR, CAMERA_NEAR};
use glam::{Mat4, Vec2};

/// Window size in CSS/logical pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

/// Backbuffer and offscreen target size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Both dimensions positive and finite.
    pub fn is_ready(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.physical_size().width > 0
            && self.physical_size().height > 0
    }

    /// Scene-space extent; one scene unit is one logical pixel.
    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Device-pixel size. The ratio is applied once here and every consumer
    /// (surface, offscreen targets, composite resolution) derives from it.
    pub fn physical_size(&self) -> PhysicalSize {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        PhysicalSize {
            width: to_px(self.width * dpr),
            height: to_px(self.height * dpr),
        }
    }

    /// Resolution uniform for the composite shader.
    pub fn resolution(&self) -> Vec2 {
        let px = self.physical_size();
        Vec2::new(px.width as f32, px.height as f32)
    }
}

#[inline]
fn to_px(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round() as u32
    } else {
        0
    }
}

/// Orthographic camera symmetric around the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoCamera {
    pub half_extent: Vec2,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            half_extent: Vec2::splat(0.5),
        }
    }
}

impl OrthoCamera {
    pub fn resize(&mut self, width: f32, height: f32) {
        self.half_extent = Vec2::new(width / 2.0, height / 2.0);
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_extent.x,
            self.half_extent.x,
            -self.half_extent.y,
            self.half_extent.y,
            CAMERA_NEAR,
            CAMERA_FAR,
        )
    }
}

/// Emitted when the applied viewport changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportChange {
    pub viewport: Viewport,
    pub physical: PhysicalSize,
    pub physical_changed: bool,
}

/// Tracks the latest reported window size and applies it at frame start.
///
/// Resize events only record the pending size; [`ViewportController::sync`]
/// runs inside the frame so targets, cameras and the cover fit all change in
/// the same place. A zero-sized report is never applied: it suspends the
/// controller until a positive size arrives, and the last applied size is
/// kept so targets can be reused when the same size comes back.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
    pending: Option<Viewport>,
    applied: Option<Viewport>,
    suspended: bool,
    camera: OrthoCamera,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.pending = Some(Viewport::new(width, height, device_pixel_ratio));
    }

    pub fn sync(&mut self) -> Option<ViewportChange> {
        let next = self.pending?;
        if !next.is_ready() {
            if !self.suspended {
                log::debug!("[viewport] {}x{} not ready; suspended", next.width, next.height);
            }
            self.suspended = true;
            return None;
        }
        self.suspended = false;
        if self.applied == Some(next) {
            return None;
        }
        let physical = next.physical_size();
        let physical_changed = self.applied.map(|v| v.physical_size()) != Some(physical);
        self.applied = Some(next);
        self.camera.resize(next.width, next.height);
        log::debug!(
            "[viewport] {}x{} @{} -> {}x{} px",
            next.width,
            next.height,
            next.device_pixel_ratio,
            physical.width,
            physical.height
        );
        Some(ViewportChange {
            viewport: next,
            physical,
            physical_changed,
        })
    }

    /// Viewport to render with; `None` while the latest reported size is empty.
    pub fn current(&self) -> Option<Viewport> {
        self.applied.filter(|_| !self.suspended)
    }

    /// Last positive size that was applied, even while suspended.
    pub fn last_applied(&self) -> Option<Viewport> {
        self.applied
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }
}
