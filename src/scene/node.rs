use bitflags::bitflags;
use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{MaterialHandle, MeshKey, NodeHandle};
use crate::text::TextBlock;

bitflags! {
    /// Shadow participation of a mesh node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u8 {
        const CAST    = 1 << 0;
        const RECEIVE = 1 << 1;
    }
}

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a tree: `parent` is `None` for scene roots, `children` keeps the
/// authored order. Children are owned by their parent, so removing a node
/// through [`Scene::remove_node`](crate::scene::Scene::remove_node) removes
/// the whole subtree.
///
/// # Components
///
/// A node optionally carries a mesh, a material and a text block. Names come
/// from the authoring tool and may be empty or repeated.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    pub mesh: Option<MeshKey>,
    pub material: Option<MaterialHandle>,
    pub text: Option<TextBlock>,

    pub shadows: ShadowFlags,
    pub visible: bool,
    pub frustum_culled: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            material: None,
            text: None,
            shadows: ShadowFlags::empty(),
            visible: true,
            frustum_culled: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
