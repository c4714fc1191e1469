//! Fixed-capacity ring of ripple stamps.
//!
//! Every slot is allocated up front and lives for the whole session. Spawning
//! rewrites the slot under the recycling cursor in place and advances the
//! cursor, so an older stamp is overwritten even if it is still fading.
//! Consumers address stamps by slot index and must not keep references
//! across frames.

use crate::constants::SPAWN_OPACITY;
use crate::device::StampDraw;
use crate::error::Result;
use crate::params::RippleParams;
use glam::Vec2;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampInstance {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub opacity: f32,
    pub visible: bool,
}

impl StampInstance {
    fn dormant(rotation: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            rotation,
            scale: Vec2::ONE,
            opacity: 0.0,
            visible: false,
        }
    }

    #[inline]
    pub fn to_draw(&self) -> StampDraw {
        StampDraw {
            position: self.position.to_array(),
            scale: self.scale.to_array(),
            rotation: self.rotation,
            opacity: self.opacity,
        }
    }
}

pub struct StampPool {
    slots: Vec<StampInstance>,
    cursor: usize,
    // Position of the last accepted spawn; movement is measured against it.
    previous: Vec2,
    params: RippleParams,
}

impl StampPool {
    /// Pre-allocate `params.capacity` dormant stamps. Initial rotations are
    /// drawn from an RNG seeded with `seed` so stamps do not start aligned.
    pub fn new(params: &RippleParams, seed: u64) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let slots = (0..params.capacity)
            .map(|_| StampInstance::dormant(rng.gen::<f32>()))
            .collect();
        Ok(Self {
            slots,
            cursor: 0,
            previous: Vec2::ZERO,
            params: *params,
        })
    }

    /// Spawn at `(x, y)` if it moved more than the threshold on either axis
    /// since the last spawn. Returns the slot that was (re)initialised.
    pub fn spawn_if_moved(&mut self, x: f32, y: f32) -> Option<usize> {
        let dx = x - self.previous.x;
        let dy = y - self.previous.y;
        let t = self.params.spawn_threshold;
        if dx.abs() <= t && dy.abs() <= t {
            return None;
        }
        let slot = self.cursor;
        let stamp = &mut self.slots[slot];
        stamp.position = Vec2::new(x, y);
        stamp.visible = true;
        stamp.opacity = SPAWN_OPACITY;
        stamp.scale = Vec2::splat(self.params.spawn_scale);
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.previous = Vec2::new(x, y);
        Some(slot)
    }

    /// Advance every visible stamp by one frame.
    pub fn decay_all(&mut self) {
        let p = &self.params;
        let target = p.scale_gain * p.rest_factor;
        for stamp in self.slots.iter_mut().filter(|s| s.visible) {
            stamp.rotation += p.rotation_step;
            stamp.opacity *= p.opacity_decay;
            stamp.scale = stamp.scale * p.scale_ease + Vec2::splat(target);
            if stamp.opacity < p.visibility_epsilon {
                stamp.visible = false;
            }
        }
    }

    /// Replace `out` with the draw records of all visible stamps, in slot order.
    pub fn fill_draw_list(&self, out: &mut Vec<StampDraw>) {
        out.clear();
        out.extend(self.slots.iter().filter(|s| s.visible).map(|s| s.to_draw()));
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &StampInstance)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.visible)
    }

    pub fn slot(&self, index: usize) -> Option<&StampInstance> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[StampInstance] {
        &self.slots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.visible).count()
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }
}
