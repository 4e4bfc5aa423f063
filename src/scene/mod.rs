//! Scene graph
//!
//! - [`Node`]: named node with hierarchy, transform and optional components
//! - [`Transform`]: TRS with cached local/world matrices
//! - [`Scene`]: node arena plus mesh, material and texture pools
//! - [`Camera`]: perspective camera used for picking
//! - [`raycast`]: ray construction and nearest-hit queries

pub mod camera;
pub mod node;
pub mod raycast;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::{Node, ShadowFlags};
pub use raycast::{Ray, RayHit};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct MaterialHandle;
    pub struct TextureHandle;
}
