use crate::constants::*;
use crate::error::{Result, RippleError};

/// Tunable behaviour of the ripple effect.
///
/// Defaults come from `constants.rs`. Front-ends may override individual
/// fields (e.g. from command-line flags) and must call [`RippleParams::validate`]
/// before handing the params to the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleParams {
    pub capacity: usize,
    pub spawn_threshold: f32,
    pub spawn_scale: f32,
    pub rotation_step: f32,
    pub opacity_decay: f32,
    pub scale_ease: f32,
    pub scale_gain: f32,
    pub rest_factor: f32,
    pub visibility_epsilon: f32,
    pub stamp_size: f32,
    pub displacement_strength: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            capacity: POOL_CAPACITY,
            spawn_threshold: SPAWN_THRESHOLD,
            spawn_scale: SPAWN_SCALE,
            rotation_step: ROTATION_STEP,
            opacity_decay: OPACITY_DECAY,
            scale_ease: SCALE_EASE,
            scale_gain: SCALE_GAIN,
            rest_factor: REST_FACTOR,
            visibility_epsilon: VISIBILITY_EPSILON,
            stamp_size: STAMP_SIZE,
            displacement_strength: DISPLACEMENT_STRENGTH,
        }
    }
}

impl RippleParams {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RippleError::ZeroCapacity);
        }
        non_negative("spawn_threshold", self.spawn_threshold)?;
        positive("spawn_scale", self.spawn_scale)?;
        non_negative("rotation_step", self.rotation_step)?;
        unit_open("opacity_decay", self.opacity_decay)?;
        unit_open("scale_ease", self.scale_ease)?;
        non_negative("scale_gain", self.scale_gain)?;
        non_negative("rest_factor", self.rest_factor)?;
        unit_open("visibility_epsilon", self.visibility_epsilon)?;
        positive("stamp_size", self.stamp_size)?;
        non_negative("displacement_strength", self.displacement_strength)?;
        Ok(())
    }

    /// Scale a visible stamp converges to while it decays.
    pub fn rest_scale(&self) -> f32 {
        self.scale_gain * self.rest_factor / (1.0 - self.scale_ease)
    }
}

fn positive(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(RippleError::InvalidParams {
            field,
            reason: format!("expected a positive finite value, got {v}"),
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(RippleError::InvalidParams {
            field,
            reason: format!("expected a finite value >= 0, got {v}"),
        })
    }
}

// Decay factors must shrink the value every frame.
fn unit_open(field: &'static str, v: f32) -> Result<()> {
    if v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(RippleError::InvalidParams {
            field,
            reason: format!("expected a value in (0, 1), got {v}"),
        })
    }
}
