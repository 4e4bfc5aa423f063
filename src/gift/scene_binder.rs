use crate::gift::render::FrameRenderer;
use crate::resources::material::{MaterialRegistry, MaterialSlot, Side};
use crate::scene::{NodeHandle, Scene, ShadowFlags};

/// Nodes eligible for the hover outline, plus the subset currently drawn.
#[derive(Debug, Default, Clone)]
pub struct OutlineSet {
    members: Vec<NodeHandle>,
    highlighted: Vec<NodeHandle>,
}

impl OutlineSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` once.
    pub fn insert(&mut self, node: NodeHandle) {
        if !self.members.contains(&node) {
            self.members.push(node);
        }
    }

    #[must_use]
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.members.contains(&node)
    }

    #[must_use]
    pub fn members(&self) -> &[NodeHandle] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Highlights every member.
    pub fn highlight_all(&mut self) {
        self.highlighted.clone_from(&self.members);
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    #[must_use]
    pub fn highlighted(&self) -> &[NodeHandle] {
        &self.highlighted
    }

    /// Drops all members and the highlight.
    pub fn clear(&mut self) {
        self.members.clear();
        self.highlighted.clear();
    }
}

/// What one bind pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindReport {
    /// Mesh nodes whose material was swapped for a shared one.
    pub replaced: usize,
    /// Nodes added to the outline set.
    pub outlined: usize,
    /// Mesh nodes with a material name no slot knows about.
    pub unmapped: usize,
    /// Nodes that carry the tag material and want the name text.
    pub tag_nodes: Vec<NodeHandle>,
}

/// Applies the shared slot materials to an instantiated bundle.
pub struct SceneGraphBinder;

impl SceneGraphBinder {
    /// Walks `root` depth-first and rebinds every mesh whose material name
    /// maps to a [`MaterialSlot`]. Finishes by asking `renderer` to compile
    /// the subtree.
    pub fn bind<R: FrameRenderer + ?Sized>(
        scene: &mut Scene,
        root: NodeHandle,
        registry: &MaterialRegistry,
        outline: &mut OutlineSet,
        renderer: &mut R,
    ) -> BindReport {
        let mut report = BindReport::default();

        for handle in scene.descendants(root) {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };
            if node.mesh.is_none() {
                continue;
            }
            let Some(material) = node.material.and_then(|m| scene.material(m)) else {
                continue;
            };
            let Some(slot) = MaterialSlot::from_name(&material.name) else {
                log::debug!(
                    "'{}' uses unmapped material '{}'",
                    node.name,
                    material.name
                );
                report.unmapped += 1;
                continue;
            };
            let Some(shared) = registry.get(slot) else {
                continue;
            };

            if let Some(node) = scene.get_node_mut(handle) {
                node.material = Some(shared);
                report.replaced += 1;

                match slot {
                    MaterialSlot::Ribbon
                    | MaterialSlot::LidTop
                    | MaterialSlot::BoxWrap
                    | MaterialSlot::BoxInside => {
                        node.shadows = ShadowFlags::CAST | ShadowFlags::RECEIVE;
                    }
                    MaterialSlot::Floor => node.shadows |= ShadowFlags::RECEIVE,
                    _ => {}
                }
            }

            match slot {
                s if s.is_structural() => {
                    outline.insert(handle);
                    report.outlined += 1;
                    if let Some(material) = scene.material_mut(shared) {
                        material.shadow_side = Some(Side::Front);
                    }
                }
                MaterialSlot::Outline => {
                    outline.insert(handle);
                    report.outlined += 1;
                }
                MaterialSlot::Tag => report.tag_nodes.push(handle),
                _ => {}
            }
        }

        scene.update_subtree(root);
        renderer.compile(scene, root);

        log::debug!(
            "Bound subtree: {} replaced, {} outlined, {} unmapped",
            report.replaced,
            report.outlined,
            report.unmapped
        );
        report
    }
}
