// Host-side tests for pointer sampling and window-to-scene conversion.

use glam::Vec2;
use ripple_core::pointer::{window_to_scene, PointerTracker};

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

#[test]
fn window_center_maps_to_scene_origin() {
    assert_eq!(window_to_scene(Vec2::new(400.0, 300.0), VIEWPORT), Vec2::ZERO);
}

#[test]
fn window_corners_map_to_scene_extents() {
    assert_eq!(
        window_to_scene(Vec2::new(0.0, 0.0), VIEWPORT),
        Vec2::new(-400.0, 300.0)
    );
    assert_eq!(
        window_to_scene(Vec2::new(800.0, 600.0), VIEWPORT),
        Vec2::new(400.0, -300.0)
    );
}

#[test]
fn no_sample_before_first_event() {
    let mut t = PointerTracker::new();
    assert_eq!(t.sample(VIEWPORT), None);
    assert_eq!(t.state(), None);
}

#[test]
fn first_sample_has_equal_current_and_previous() {
    let mut t = PointerTracker::new();
    t.record(500.0, 200.0);
    let s = t.sample(VIEWPORT).unwrap();
    assert_eq!(s.current, Vec2::new(100.0, 100.0));
    assert_eq!(s.previous, s.current);
    assert_eq!(s.delta(), Vec2::ZERO);
}

#[test]
fn previous_is_last_frames_position() {
    let mut t = PointerTracker::new();
    t.record(400.0, 300.0);
    t.sample(VIEWPORT);
    t.record(410.0, 290.0);
    let s = t.sample(VIEWPORT).unwrap();
    assert_eq!(s.previous, Vec2::ZERO);
    assert_eq!(s.current, Vec2::new(10.0, 10.0));
    assert_eq!(s.delta(), Vec2::new(10.0, 10.0));

    // No new event: the pointer is treated as resting.
    let s = t.sample(VIEWPORT).unwrap();
    assert_eq!(s.previous, s.current);
}

#[test]
fn latest_event_between_frames_wins() {
    let mut t = PointerTracker::new();
    t.record(0.0, 0.0);
    t.record(100.0, 100.0);
    t.record(400.0, 300.0);
    assert_eq!(t.sample(VIEWPORT).unwrap().current, Vec2::ZERO);
}

#[test]
fn non_finite_samples_are_ignored() {
    let mut t = PointerTracker::new();
    t.record(f32::NAN, 10.0);
    assert_eq!(t.sample(VIEWPORT), None);
    t.record(400.0, 300.0);
    t.record(f32::INFINITY, 0.0);
    assert_eq!(t.sample(VIEWPORT).unwrap().current, Vec2::ZERO);
}

#[test]
fn conversion_uses_the_current_viewport() {
    let mut t = PointerTracker::new();
    t.record(100.0, 100.0);
    assert_eq!(
        t.sample(Vec2::new(200.0, 200.0)).unwrap().current,
        Vec2::ZERO
    );
}
