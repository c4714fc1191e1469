//! The three render stages, each a set-target / draw / restore sequence
//! against a [`RenderDevice`].

use crate::constants::{BACKGROUND_CLEAR, DISPLACEMENT_CLEAR};
use crate::cover::ProjectionState;
use crate::device::{
    BackgroundQuad, CompositeUniforms, RenderDevice, RenderTarget, StampBatch, StampDraw,
};
use crate::pool::StampPool;
use crate::viewport::Viewport;
use glam::Mat4;

/// Draws every visible stamp into the displacement buffer.
pub struct DisplacementPass {
    draws: Vec<StampDraw>,
    stamp_size: f32,
}

impl DisplacementPass {
    pub fn new(capacity: usize, stamp_size: f32) -> Self {
        Self {
            draws: Vec::with_capacity(capacity),
            stamp_size,
        }
    }

    /// Returns the number of stamps drawn.
    pub fn render<D: RenderDevice + ?Sized>(
        &mut self,
        device: &mut D,
        pool: &StampPool,
        view_proj: Mat4,
    ) -> usize {
        pool.fill_draw_list(&mut self.draws);
        let prior = device.bound_target();
        device.bind_target(RenderTarget::Displacement);
        device.clear(DISPLACEMENT_CLEAR);
        if !self.draws.is_empty() {
            device.draw_stamps(&StampBatch {
                view_proj,
                stamp_size: self.stamp_size,
                stamps: &self.draws,
            });
        }
        device.bind_target(prior);
        self.draws.len()
    }
}

/// Draws the cover-fit background into its own buffer.
#[derive(Default)]
pub struct BackgroundPass;

impl BackgroundPass {
    pub fn new() -> Self {
        Self
    }

    /// Returns `false` when no cover-fit scale is available yet; the buffer
    /// is still cleared so the composite never samples stale content.
    pub fn render<D: RenderDevice + ?Sized>(
        &self,
        device: &mut D,
        projection: &ProjectionState,
    ) -> bool {
        let prior = device.bound_target();
        device.bind_target(RenderTarget::Background);
        device.clear(BACKGROUND_CLEAR);
        let drawn = match projection.image_scale() {
            Some(scale) => {
                device.draw_background(&BackgroundQuad {
                    view_proj: projection.view_proj(),
                    scale,
                });
                true
            }
            None => false,
        };
        device.bind_target(prior);
        drawn
    }
}

/// Full-viewport refraction of the background by the displacement buffer.
pub struct CompositeStage {
    strength: f32,
}

impl CompositeStage {
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    pub fn uniforms(&self, viewport: &Viewport) -> CompositeUniforms {
        CompositeUniforms {
            displacement: RenderTarget::Displacement,
            color: RenderTarget::Background,
            resolution: viewport.resolution(),
            strength: self.strength,
        }
    }

    pub fn render<D: RenderDevice + ?Sized>(
        &self,
        device: &mut D,
        viewport: &Viewport,
    ) -> CompositeUniforms {
        let uniforms = self.uniforms(viewport);
        device.bind_target(RenderTarget::Screen);
        device.draw_composite(&uniforms);
        uniforms
    }
}
