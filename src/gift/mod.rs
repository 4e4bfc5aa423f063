//! The reveal itself
//!
//! - [`ClipCatalog`]: every loaded clip, looked up by name or fragment
//! - [`SceneGraphBinder`]: swaps authored materials for shared slot materials
//! - [`AnimationDirector`]: which clips play on load and on open
//! - [`InteractionRouter`]: pointer to hover/open decisions
//! - [`AttachmentUpdater`]: keeps the glow decorations on the tag
//! - [`GiftWidget`]: the per-instance context tying them together

pub mod attachment;
pub mod audio;
pub mod catalog;
pub mod director;
pub mod interaction;
pub mod render;
pub mod scene_binder;
pub mod viewport;
pub mod widget;

pub use attachment::AttachmentUpdater;
pub use audio::{AudioCue, AudioCues, AudioSink, LogAudioSink};
pub use catalog::ClipCatalog;
pub use director::{AnimationDirector, DirectorEvent, DirectorState, FinishAction, TriggerOutcome};
pub use interaction::{ContainerRect, InteractionRouter, InteractionState, PointerOutcome};
pub use render::{FrameContext, FrameRenderer, FrameSummary, HeadlessRenderer, PostProcessSettings};
pub use scene_binder::{BindReport, OutlineSet, SceneGraphBinder};
pub use viewport::{RenderSize, letterbox};
pub use widget::{GiftWidget, OpenCallback};
