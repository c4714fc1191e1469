//! Procedural brush sprite used when the host does not supply one.

use crate::image::{ImageSize, RgbaImage};

/// Build a square white brush whose alpha falls off radially from the center.
///
/// The falloff is a smoothstep ring so the stamp reads as a soft-edged wave
/// front rather than a flat disc. Pixels outside the inscribed circle are
/// fully transparent.
pub fn radial_brush(size: u32) -> RgbaImage {
    let size = size.max(2);
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let a = brush_alpha(d);
            pixels.extend_from_slice(&[255, 255, 255, (a * 255.0).round() as u8]);
        }
    }
    RgbaImage::from_parts(ImageSize::new(size, size), pixels)
}

#[inline]
fn brush_alpha(d: f32) -> f32 {
    if d >= 1.0 {
        return 0.0;
    }
    let outer = 1.0 - smoothstep(0.7, 1.0, d);
    let inner = smoothstep(0.0, 0.6, d);
    (outer * (0.25 + 0.75 * inner)).clamp(0.0, 1.0)
}

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
