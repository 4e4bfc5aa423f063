#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Scene lifecycle and animation-clip orchestration for an interactive gift
//! box reveal.
//!
//! Several glTF bundles load in the background; their clips merge into one
//! [`ClipCatalog`](gift::ClipCatalog), their materials are swapped for shared
//! slot materials, and a small state machine plays the drop on load and the
//! opening on the first click on the present. Rendering, audio output and
//! glyph rasterization stay behind traits so the whole lifecycle runs
//! headless.

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod gift;
pub mod resources;
pub mod scene;
pub mod text;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, BlendMode, LoopMode};
pub use assets::{AssetBundle, AssetReader, GltfLoader, LoadEvent, ResourceLoader};
pub use config::GiftConfig;
pub use errors::{GiftError, Result};
pub use gift::{
    AnimationDirector, ClipCatalog, ContainerRect, FrameRenderer, GiftWidget, HeadlessRenderer,
};
pub use resources::{Color, Material, MaterialRegistry, MaterialSlot};
pub use scene::{Camera, Node, NodeHandle, Scene};

pub mod prelude {
    pub use crate::animation::{AnimationEvent, BlendMode, LoopMode};
    pub use crate::assets::{AssetReader, MemoryAssetReader};
    pub use crate::config::GiftConfig;
    pub use crate::errors::{GiftError, Result};
    pub use crate::gift::{
        AudioCue, AudioSink, ContainerRect, DirectorState, FrameContext, FrameRenderer,
        GiftWidget, HeadlessRenderer, LogAudioSink, PointerOutcome, PostProcessSettings,
        RenderSize,
    };
    pub use crate::scene::{NodeHandle, Scene};
    pub use crate::text::{SanteeIdentity, TextShaper};
    pub use glam::{Vec2, Vec3};
}
