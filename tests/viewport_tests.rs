//! Viewport Tests
//!
//! Tests for:
//! - Letterboxing to the target aspect ratio
//! - Physical sizes at a pixel ratio

use gift_reveal::gift::{RenderSize, letterbox};

const ASPECT: f32 = 4.0 / 3.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-2
}

#[test]
fn exact_aspect_is_unchanged() {
    let size = letterbox(800.0, 600.0, ASPECT);
    assert!(approx(size.width, 800.0));
    assert!(approx(size.height, 600.0));
}

#[test]
fn wide_container_pillarboxes() {
    let size = letterbox(800.0, 400.0, ASPECT);
    assert!(approx(size.width, 533.33), "got {}", size.width);
    assert!(approx(size.height, 400.0));
}

#[test]
fn tall_container_letterboxes() {
    let size = letterbox(400.0, 900.0, ASPECT);
    assert!(approx(size.width, 400.0));
    assert!(approx(size.height, 300.0));
}

#[test]
fn result_never_exceeds_container() {
    for (w, h) in [(1.0, 1.0), (1920.0, 1080.0), (320.0, 640.0), (1000.0, 750.0)] {
        let size = letterbox(w, h, ASPECT);
        assert!(size.width <= w + 1e-3 && size.height <= h + 1e-3);
        assert!(approx(size.width / size.height, ASPECT));
    }
}

#[test]
fn physical_size_applies_pixel_ratio() {
    assert_eq!(RenderSize::new(800.0, 600.0).physical(1.5), (1200, 900));
}
