//! Renderer seam
//!
//! The widget never rasterizes anything itself. Each frame it hands a
//! [`FrameContext`] to a [`FrameRenderer`], which owns shading, shadows,
//! and the outline/bloom/SMAA chain configured through
//! [`PostProcessSettings`].
//!
//! [`HeadlessRenderer`] records what it was asked to do and is what the
//! demo app and the tests run against.

use crate::config::{BloomOptions, PostProcessOptions};
use crate::gift::viewport::RenderSize;
use crate::resources::color::Color;
use crate::scene::{Camera, NodeHandle, Scene};

/// Post-processing chain parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessSettings {
    /// Visible and hidden edge colour of the outline pass.
    pub highlight_color: Color,
    pub bloom: BloomOptions,
    pub smaa: bool,
}

impl From<&PostProcessOptions> for PostProcessSettings {
    fn from(options: &PostProcessOptions) -> Self {
        Self {
            highlight_color: options.highlight_color,
            bloom: options.bloom.clone(),
            smaa: true,
        }
    }
}

/// Everything one frame needs.
pub struct FrameContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    /// Nodes the outline pass should draw.
    pub highlighted: &'a [NodeHandle],
    /// Canvas opacity in `[0, 1]`.
    pub opacity: f32,
    pub frame: u64,
}

pub trait FrameRenderer {
    /// Whether the host can render at all. Checked once at construction.
    fn is_supported(&self) -> bool;

    fn configure(&mut self, settings: &PostProcessSettings);

    /// New output size for the renderer and every post-processing stage.
    fn resize(&mut self, size: RenderSize, pixel_ratio: f32);

    /// Prepares pipelines for a freshly added subtree to avoid a stall on
    /// its first frame.
    fn compile(&mut self, scene: &Scene, root: NodeHandle);

    fn render(&mut self, frame: &FrameContext<'_>);
}

/// Last frame seen by a [`HeadlessRenderer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub frame: u64,
    pub visible_nodes: usize,
    pub highlighted: usize,
    pub opacity: f32,
}

/// Renderer that draws nothing and remembers every call.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub settings: Option<PostProcessSettings>,
    pub size: Option<(RenderSize, f32)>,
    pub compiled: Vec<NodeHandle>,
    pub frames_rendered: u64,
    pub last_frame: Option<FrameSummary>,
    supported: bool,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            supported: true,
            ..Self::default()
        }
    }

    /// A renderer that reports missing capabilities.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::default()
    }
}

impl FrameRenderer for HeadlessRenderer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn configure(&mut self, settings: &PostProcessSettings) {
        self.settings = Some(settings.clone());
    }

    fn resize(&mut self, size: RenderSize, pixel_ratio: f32) {
        self.size = Some((size, pixel_ratio));
    }

    fn compile(&mut self, _scene: &Scene, root: NodeHandle) {
        self.compiled.push(root);
    }

    fn render(&mut self, frame: &FrameContext<'_>) {
        let visible_nodes = frame.scene.nodes.values().filter(|n| n.visible).count();
        self.frames_rendered += 1;
        self.last_frame = Some(FrameSummary {
            frame: frame.frame,
            visible_nodes,
            highlighted: frame.highlighted.len(),
            opacity: frame.opacity,
        });
    }
}
