use glam::Vec2;

use crate::errors::Result;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    /// Decodes PNG, JPEG or WebP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        })
    }

    /// Multiplies colour channels by alpha in place.
    pub fn premultiply_alpha(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * a + 127) / 255) as u8;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrapping {
    #[default]
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

/// A texture slot registered before its image arrives.
///
/// Materials point at the slot immediately; the loader fills in the image
/// when decoding finishes.
#[derive(Debug, Clone)]
pub struct Texture {
    pub path: String,
    pub repeat: Vec2,
    pub wrap: Wrapping,
    pub srgb: bool,
    pub flip_y: bool,
    pub premultiply_alpha: bool,
    image: Option<Image>,
    state: TextureState,
}

impl Texture {
    /// Repeat-wrapped sRGB texture with no vertical flip.
    #[must_use]
    pub fn pending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repeat: Vec2::ONE,
            wrap: Wrapping::Repeat,
            srgb: true,
            flip_y: false,
            premultiply_alpha: false,
            image: None,
            state: TextureState::Pending,
        }
    }

    #[must_use]
    pub fn with_repeat(mut self, x: f32, y: f32) -> Self {
        self.repeat = Vec2::new(x, y);
        self
    }

    #[must_use]
    pub fn with_premultiplied_alpha(mut self) -> Self {
        self.premultiply_alpha = true;
        self
    }

    pub fn fill(&mut self, mut image: Image) {
        if self.premultiply_alpha {
            image.premultiply_alpha();
        }
        self.image = Some(image);
        self.state = TextureState::Ready;
    }

    pub fn mark_failed(&mut self) {
        self.state = TextureState::Failed;
    }

    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> TextureState {
        self.state
    }
}
