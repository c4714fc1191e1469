use glam::Vec2;

/// Pointer position in scene space (origin at viewport center, y-up) for the
/// current and the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub current: Vec2,
    pub previous: Vec2,
}

impl PointerState {
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.current - self.previous
    }
}

/// Holds the most recent raw pointer sample and converts it to scene space
/// once per frame. Samples arriving between frames overwrite each other.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    latest_px: Option<Vec2>,
    state: Option<PointerState>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample in window pixels (origin top-left, y-down).
    pub fn record(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.latest_px = Some(Vec2::new(x, y));
        }
    }

    /// Convert the latest sample for a viewport of `viewport` scene units.
    ///
    /// Returns `None` until the first sample has been recorded.
    pub fn sample(&mut self, viewport: Vec2) -> Option<PointerState> {
        let raw = self.latest_px?;
        let current = window_to_scene(raw, viewport);
        let previous = self.state.map_or(current, |s| s.current);
        let state = PointerState { current, previous };
        self.state = Some(state);
        Some(state)
    }

    pub fn state(&self) -> Option<PointerState> {
        self.state
    }
}

#[inline]
pub fn window_to_scene(px: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(px.x - viewport.x / 2.0, -px.y + viewport.y / 2.0)
}
