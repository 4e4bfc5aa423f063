use glam::{Quat, Vec3};

use crate::animation::clip::AnimationClip;
use crate::resources::color::Color;
use crate::resources::mesh::Mesh;

/// Bundle node: plain data, children referenced by index.
#[derive(Debug, Clone)]
pub struct BundleNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Indices into [`AssetBundle::nodes`].
    pub children: Vec<usize>,
    pub mesh: Option<Mesh>,
    /// Index into [`AssetBundle::materials`].
    pub material: Option<usize>,
}

impl BundleNode {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            children: Vec::new(),
            mesh: None,
            material: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.translation = position;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BundleMaterial {
    pub name: String,
    pub color: Color,
}

/// One loaded model file: a node tree plus its animation clips.
///
/// A bundle is thread-safe plain data with no scene handles; loaders build it
/// off the main thread and [`Scene::instantiate`](crate::scene::Scene::instantiate)
/// turns it into live nodes.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    /// Path the bundle was requested with.
    pub path: String,
    /// Name given to the group node that holds the bundle in the scene.
    pub scene_name: String,
    pub nodes: Vec<BundleNode>,
    pub roots: Vec<usize>,
    pub materials: Vec<BundleMaterial>,
    pub clips: Vec<AnimationClip>,
}

impl AssetBundle {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scene_name: "Scene".to_string(),
            ..Default::default()
        }
    }

    /// Adds a root node and returns its index.
    pub fn add_root(&mut self, node: BundleNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.roots.push(index);
        index
    }

    /// Adds a node under `parent` and returns its index.
    pub fn add_child(&mut self, parent: usize, node: BundleNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(index);
        }
        index
    }

    pub fn add_material(&mut self, name: &str, color: Color) -> usize {
        self.materials.push(BundleMaterial {
            name: name.to_string(),
            color,
        });
        self.materials.len() - 1
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.push(clip);
    }
}
