use glam::Vec3;
use slotmap::SlotMap;

use crate::assets::bundle::AssetBundle;
use crate::config::SceneOptions;
use crate::resources::color::Color;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::resources::texture::Texture;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{MaterialHandle, MeshKey, NodeHandle, TextureHandle};

/// The single point light that lights and shadows the present.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    pub shadow_bias: f32,
}

/// Scene graph container.
///
/// Owns the node arena and the pools of meshes, materials and textures that
/// nodes reference by key. Materials are shared: every node holding the same
/// [`MaterialHandle`] sees the same instance.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub materials: SlotMap<MaterialHandle, Material>,
    pub textures: SlotMap<TextureHandle, Texture>,

    pub background: Color,
    pub ambient_color: Color,
    pub light: Option<PointLight>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            background: Color::BLACK,
            ambient_color: Color::WHITE,
            light: None,
        }
    }

    #[must_use]
    pub fn from_options(options: &SceneOptions) -> Self {
        let mut scene = Self::new();
        scene.background = options.background;
        scene.ambient_color = options.ambient_color;
        scene.light = Some(PointLight {
            color: options.light_color,
            intensity: options.light_intensity,
            range: options.light_range,
            position: Vec3::from_array(options.light_position),
            cast_shadow: options.light_shadows,
            shadow_map_size: options.shadow_map_size,
            shadow_bias: options.shadow_bias,
        });
        scene
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node not found, adding '{}' as a root", child.name);
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Moves `child` under `parent`, detaching it from its previous place.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    fn detach(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p) {
                n.children.retain(|&x| x != handle);
            }
        } else {
            self.root_nodes.retain(|&x| x != handle);
        }
    }

    /// Removes `handle` and its whole subtree, releasing their meshes.
    /// Returns the number of nodes removed.
    pub fn remove_node(&mut self, handle: NodeHandle) -> usize {
        if !self.nodes.contains_key(handle) {
            return 0;
        }
        self.detach(handle);

        let subtree = self.descendants(handle);
        for &h in &subtree {
            if let Some(node) = self.nodes.remove(h)
                && let Some(mesh_key) = node.mesh
            {
                self.meshes.remove(mesh_key);
            }
        }
        subtree.len()
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// `root` followed by all its descendants, depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Depth-first pre-order walk over `root` and its descendants.
    pub fn traverse(&self, root: NodeHandle, mut f: impl FnMut(NodeHandle, &Node)) {
        for handle in self.descendants(root) {
            if let Some(node) = self.nodes.get(handle) {
                f(handle, node);
            }
        }
    }

    /// First node named `name`, searching each root tree depth-first in
    /// insertion order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.root_nodes
            .iter()
            .flat_map(|&root| self.descendants(root))
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    /// Name of the node's immediate parent.
    #[must_use]
    pub fn parent_name(&self, handle: NodeHandle) -> Option<&str> {
        let parent = self.nodes.get(handle)?.parent?;
        self.nodes.get(parent).map(|p| p.name.as_str())
    }

    // ========================================================================
    // Matrix update
    // ========================================================================

    /// Recomputes world matrices for the whole scene.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.transform.world_position())
    }

    // ========================================================================
    // Resource pools
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.insert(material)
    }

    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureHandle {
        self.textures.insert(texture)
    }

    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    pub fn texture_mut(&mut self, handle: TextureHandle) -> Option<&mut Texture> {
        self.textures.get_mut(handle)
    }

    /// Material of a node, if any.
    #[must_use]
    pub fn node_material(&self, handle: NodeHandle) -> Option<&Material> {
        let key = self.nodes.get(handle)?.material?;
        self.materials.get(key)
    }

    // ========================================================================
    // Bundles
    // ========================================================================

    /// Copies a loaded bundle into the scene under a new root group and
    /// returns that root.
    ///
    /// Authored materials become scene materials shared by the bundle's
    /// nodes. Animation clips are not consumed here.
    pub fn instantiate(&mut self, bundle: &AssetBundle) -> NodeHandle {
        let root = self.add_node(Node::new(&bundle.scene_name));

        let materials: Vec<MaterialHandle> = bundle
            .materials
            .iter()
            .map(|m| self.add_material(Material::authored(&m.name, m.color)))
            .collect();

        let mut stack: Vec<(usize, NodeHandle)> =
            bundle.roots.iter().rev().map(|&i| (i, root)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(source) = bundle.nodes.get(index) else {
                log::warn!("Bundle '{}' references missing node {index}", bundle.path);
                continue;
            };

            let mut node = Node::new(&source.name);
            node.transform.position = source.translation;
            node.transform.rotation = source.rotation;
            node.transform.scale = source.scale;
            if let Some(mesh) = &source.mesh {
                node.mesh = Some(self.add_mesh(mesh.clone()));
            }
            node.material = source.material.and_then(|i| materials.get(i).copied());

            let handle = self.add_to_parent(node, parent);
            for &child in source.children.iter().rev() {
                stack.push((child, handle));
            }
        }

        log::debug!(
            "Instantiated '{}': {} nodes, {} materials",
            bundle.path,
            bundle.nodes.len(),
            bundle.materials.len()
        );

        root
    }
}
