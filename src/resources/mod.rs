//! Core resource definitions, independent of any GPU backend:
//! - Color: linear RGB
//! - Mesh: geometry bookkeeping and bounds
//! - Material: shared materials and the slot registry
//! - Texture: pending/decoded texture slots

pub mod color;
pub mod material;
pub mod mesh;
pub mod texture;

pub use color::Color;
pub use material::{Material, MaterialKind, MaterialRegistry, MaterialSlot, Side};
pub use mesh::{BoundingBox, Mesh};
pub use texture::{Image, Texture, TextureState, Wrapping};
