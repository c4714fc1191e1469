//! Cover-fit scaling and the background's own projection.

use crate::image::ImageSize;
use crate::viewport::OrthoCamera;
use glam::{Mat4, Vec2};

/// Size, in scene units, of an image scaled to cover `viewport` completely.
///
/// The image keeps its aspect ratio: a relatively wider image fills the
/// viewport height and overflows on x, otherwise it fills the width and
/// overflows on y. The quad stays centered so the overflow is cropped
/// evenly on both sides.
///
/// Returns `None` for an unknown image size or a zero / non-finite viewport
/// aspect.
pub fn cover_fit(image: ImageSize, viewport: Vec2) -> Option<Vec2> {
    let image_aspect = image.aspect()?;
    let viewport_aspect = viewport.x / viewport.y;
    if viewport_aspect == 0.0 || !viewport_aspect.is_finite() {
        return None;
    }
    if image_aspect > viewport_aspect {
        Some(Vec2::new(viewport.y * image_aspect, viewport.y))
    } else {
        Some(Vec2::new(viewport.x, viewport.x / image_aspect))
    }
}

/// Background camera and cover-fit scale.
///
/// Kept separate from the main scene camera so resizing the background never
/// moves stamp placement. A degenerate viewport leaves both the camera and
/// the last valid scale untouched.
#[derive(Clone, Debug, Default)]
pub struct ProjectionState {
    camera: OrthoCamera,
    viewport: Option<Vec2>,
    image: Option<ImageSize>,
    image_scale: Option<Vec2>,
}

impl ProjectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = Some(viewport);
        self.recompute();
    }

    pub fn set_image(&mut self, image: ImageSize) {
        self.image = Some(image);
        self.recompute();
    }

    fn recompute(&mut self) {
        let (Some(viewport), Some(image)) = (self.viewport, self.image) else {
            return;
        };
        match cover_fit(image, viewport) {
            Some(scale) => {
                self.camera.resize(viewport.x, viewport.y);
                self.image_scale = Some(scale);
            }
            None => log::warn!(
                "[cover] skipping scale update: viewport {}x{} image {}x{}",
                viewport.x,
                viewport.y,
                image.width,
                image.height
            ),
        }
    }

    /// Scaled image size in scene units; `None` until both sizes are known.
    pub fn image_scale(&self) -> Option<Vec2> {
        self.image_scale
    }

    /// Overflow cropped from each side of the viewport, in scene units.
    pub fn crop_per_side(&self) -> Option<Vec2> {
        let scale = self.image_scale?;
        // Camera extent is only updated together with the scale.
        let viewport = self.camera.half_extent * 2.0;
        Some(((scale - viewport) / 2.0).max(Vec2::ZERO))
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.view_proj()
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }
}
