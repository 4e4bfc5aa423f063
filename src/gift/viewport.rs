/// Output size in CSS-style pixels, before the pixel ratio is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSize {
    pub width: f32,
    pub height: f32,
}

impl RenderSize {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Backing-store size at `pixel_ratio`, rounded to whole pixels.
    #[must_use]
    pub fn physical(&self, pixel_ratio: f32) -> (u32, u32) {
        (
            (self.width * pixel_ratio).round().max(0.0) as u32,
            (self.height * pixel_ratio).round().max(0.0) as u32,
        )
    }
}

/// Largest `aspect` rectangle that fits the container.
///
/// The full container width is tried first; when that would be taller than
/// the container, the height is clamped and the width derived from it.
#[must_use]
pub fn letterbox(container_width: f32, container_height: f32, aspect: f32) -> RenderSize {
    let mut width = container_width;
    let mut height = width / aspect;
    if height > container_height {
        height = container_height;
        width = height * aspect;
    }
    RenderSize { width, height }
}
