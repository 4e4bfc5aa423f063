use glam::Vec3;

use crate::config::TextOptions;
use crate::resources::material::Material;
use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene};
use crate::text::shaper::{TextBounds, TextShaper};

/// Shrink attempts before giving up on a name.
pub const FIT_MAX_TRIES: u32 = 20;
/// Font size factor applied per attempt.
pub const FIT_SHRINK: f32 = 0.9;
/// Shown when the name cannot be made to fit.
pub const TOO_LONG_TEXT: &str = "[ERROR]\nToo Long";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorX {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorY {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Text carried by a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub font_size: f32,
    pub max_width: f32,
    pub anchor_x: AnchorX,
    pub anchor_y: AnchorY,
    /// Result of the last layout.
    pub bounds: TextBounds,
}

impl TextBlock {
    #[must_use]
    pub fn new(content: impl Into<String>, font_size: f32, max_width: f32) -> Self {
        Self {
            content: content.into(),
            font_size,
            max_width,
            anchor_x: AnchorX::Center,
            anchor_y: AnchorY::Middle,
            bounds: TextBounds::default(),
        }
    }

    pub fn relayout(&mut self, shaper: &dyn TextShaper) {
        self.bounds = shaper.layout(&self.content, self.font_size, self.max_width);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// The text fits after this many shrinks.
    Fitted { shrinks: u32 },
    /// The budget ran out; the block now shows [`TOO_LONG_TEXT`].
    TooLong,
}

/// Shrinks `block` until it fits `max_width` x `max_height`.
///
/// Starts from the block's current font size. After [`FIT_MAX_TRIES`]
/// shrinks that still overflow, the content is replaced with
/// [`TOO_LONG_TEXT`] at `base_font_size`.
pub fn fit_text(
    block: &mut TextBlock,
    shaper: &dyn TextShaper,
    max_width: f32,
    max_height: f32,
    base_font_size: f32,
) -> FitOutcome {
    block.relayout(shaper);

    let mut shrinks = 0;
    while block.bounds.exceeds(max_width, max_height) {
        if shrinks == FIT_MAX_TRIES {
            log::warn!(
                "'{}' does not fit the tag after {FIT_MAX_TRIES} shrinks",
                block.content
            );
            block.content = TOO_LONG_TEXT.to_string();
            block.font_size = base_font_size;
            block.relayout(shaper);
            return FitOutcome::TooLong;
        }
        block.font_size *= FIT_SHRINK;
        shrinks += 1;
        block.relayout(shaper);
    }

    FitOutcome::Fitted { shrinks }
}

/// The name written on the tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanteeIdentity {
    name: String,
}

impl SanteeIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The name as displayed: wrapped in parentheses.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("({})", self.name)
    }
}

/// Owns the text node attached under the tag mesh.
#[derive(Debug)]
pub struct TagText {
    options: TextOptions,
    node: Option<NodeHandle>,
}

impl TagText {
    #[must_use]
    pub fn new(options: TextOptions) -> Self {
        Self {
            options,
            node: None,
        }
    }

    #[must_use]
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.node.is_some()
    }

    /// Creates the text node under `parent` and fits it. Attaching twice
    /// returns the existing node.
    pub fn attach(
        &mut self,
        scene: &mut Scene,
        parent: NodeHandle,
        identity: &SanteeIdentity,
        shaper: &dyn TextShaper,
    ) -> Option<(NodeHandle, FitOutcome)> {
        if let Some(node) = self.node {
            log::debug!("Tag text already attached");
            return Some((node, self.current_outcome(scene)));
        }
        if !scene.contains(parent) {
            return None;
        }

        let mut block = TextBlock::new(
            identity.display_text(),
            self.options.font_size,
            self.options.max_width,
        );
        let outcome = self.fit(&mut block, shaper);

        let material = scene.add_material(Material::basic(self.options.color));
        let mut node = Node::new("TagText");
        node.transform.position = Vec3::from_array(self.options.position);
        let [x, y, z] = self.options.rotation;
        node.transform.set_rotation_euler(x, y, z);
        node.material = Some(material);
        node.text = Some(block);
        node.frustum_culled = false;

        let handle = scene.add_to_parent(node, parent);
        self.node = Some(handle);
        log::info!("Tag text attached: {outcome:?}");
        Some((handle, outcome))
    }

    /// Rewrites the text for a new name. The fit resumes from the current
    /// font size, so repeated renames only ever shrink.
    pub fn set_text(
        &mut self,
        scene: &mut Scene,
        identity: &SanteeIdentity,
        shaper: &dyn TextShaper,
    ) -> Option<FitOutcome> {
        let handle = self.node?;
        let mut block = scene.get_node(handle)?.text.clone()?;
        block.content = identity.display_text();
        let outcome = self.fit(&mut block, shaper);
        scene.get_node_mut(handle)?.text = Some(block);
        Some(outcome)
    }

    fn fit(&self, block: &mut TextBlock, shaper: &dyn TextShaper) -> FitOutcome {
        fit_text(
            block,
            shaper,
            self.options.max_width,
            self.options.max_height,
            self.options.font_size,
        )
    }

    fn current_outcome(&self, scene: &Scene) -> FitOutcome {
        let too_long = self
            .node
            .and_then(|h| scene.get_node(h))
            .and_then(|n| n.text.as_ref())
            .is_some_and(|t| t.content == TOO_LONG_TEXT);
        if too_long {
            FitOutcome::TooLong
        } else {
            FitOutcome::Fitted { shrinks: 0 }
        }
    }
}
