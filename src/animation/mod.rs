//! Keyframe animation: clips, actions and the per-scene mixer.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
mod values;

pub use action::{ActionEvent, AnimationAction, BlendMode, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionHandle, AnimationEvent, AnimationMixer};
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
