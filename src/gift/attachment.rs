use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene};

pub const TAG_NODE: &str = "SanteeTag";
pub const SUNBURST_NODE: &str = "Sunburst";
pub const SUNRAYS_NODE: &str = "Sunrays";

const ANCHOR_NAME: &str = "SanteeTagAnchor";

/// Keeps the sunburst and sunrays on the tag's position without taking on
/// its rotation.
///
/// An identity child (the anchor) is parented under the tag once; every sync
/// copies the anchor's world translation into both decorations' local
/// positions and leaves their rotation alone.
#[derive(Debug, Default)]
pub struct AttachmentUpdater {
    anchor: Option<NodeHandle>,
}

impl AttachmentUpdater {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn anchor(&self) -> Option<NodeHandle> {
        self.anchor
    }

    /// Returns true when the decorations were moved. Does nothing until all
    /// three named nodes exist. World matrices must be current.
    pub fn sync(&mut self, scene: &mut Scene) -> bool {
        let (Some(tag), Some(sunburst), Some(sunrays)) = (
            scene.find_by_name(TAG_NODE),
            scene.find_by_name(SUNBURST_NODE),
            scene.find_by_name(SUNRAYS_NODE),
        ) else {
            return false;
        };

        let anchor = match self.anchor.filter(|&a| scene.contains(a)) {
            Some(anchor) => anchor,
            None => {
                let anchor = scene.add_to_parent(Node::new(ANCHOR_NAME), tag);
                scene.update_subtree(tag);
                log::debug!("Tag anchor created");
                self.anchor = Some(anchor);
                anchor
            }
        };

        let Some(position) = scene.world_position(anchor) else {
            return false;
        };
        for handle in [sunburst, sunrays] {
            if let Some(node) = scene.get_node_mut(handle) {
                node.transform.position = position;
            }
        }
        true
    }
}
