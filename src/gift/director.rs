//! Animation Director
//!
//! Decides which clips play for each lifecycle event and runs the cleanup
//! tied to clip completion.
//!
//! ```text
//! Loading ──LoadComplete──▶ Dropping ──"BoxDrop" finished──▶ Idle
//!    │                         │                              │
//!    └────────────UserOpen─────┴──────────────────────────────┴──▶ Opened
//! ```
//!
//! `Opened` is terminal. Clips are resolved from the [`ClipCatalog`] at
//! trigger time; a clip that is not there is skipped.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::{
    AnimationAction, AnimationClip, AnimationEvent, AnimationMixer, BlendMode, LoopMode,
};
use crate::gift::catalog::ClipCatalog;
use crate::scene::{MaterialHandle, NodeHandle, Scene};

/// Clip started once everything has loaded.
pub const DROP_CLIP: &str = "BoxDrop";
/// Ambient clips started alongside the drop.
pub const RAYS_FRAGMENT: &str = "RaysRotation";
/// A clip plays on open when its name contains any of these.
pub const OPEN_FRAGMENTS: [&str; 7] = [
    "BoxOpen",
    "TopOpen",
    "ExplosionScale",
    "ExplosionKey",
    "ChargeEffect",
    "LootBeam",
    "SanteeTag",
];
/// When this clip finishes the effects scene is torn down.
pub const CHARGE_EFFECT_CLIP: &str = "ChargeEffect";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorState {
    Loading,
    Dropping,
    /// The drop has settled; waiting for the user.
    Idle,
    Opened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorEvent {
    LoadComplete,
    UserOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Names of the clips started, in play order.
    Started(Vec<String>),
    /// The event was already handled.
    Ignored,
}

/// Work scheduled for when a clip finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    /// Leave `Dropping`.
    DropSettled,
    /// Remove the effects scene and dispose the shared effect material.
    DisposeEffects,
}

pub struct AnimationDirector {
    state: DirectorState,
    load_complete: bool,
    opened: bool,
    effects_root: Option<NodeHandle>,
    effect_material: Option<MaterialHandle>,
    finish_handlers: FxHashMap<String, FinishAction>,
}

impl Default for AnimationDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDirector {
    #[must_use]
    pub fn new() -> Self {
        let mut finish_handlers = FxHashMap::default();
        finish_handlers.insert(DROP_CLIP.to_string(), FinishAction::DropSettled);
        finish_handlers.insert(CHARGE_EFFECT_CLIP.to_string(), FinishAction::DisposeEffects);

        Self {
            state: DirectorState::Loading,
            load_complete: false,
            opened: false,
            effects_root: None,
            effect_material: None,
            finish_handlers,
        }
    }

    #[must_use]
    pub fn state(&self) -> DirectorState {
        self.state
    }

    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.opened
    }

    /// Registers `action` to run when `clip_name` finishes, replacing any
    /// previous handler for that clip.
    pub fn on_finish(&mut self, clip_name: impl Into<String>, action: FinishAction) {
        self.finish_handlers.insert(clip_name.into(), action);
    }

    /// Remembers the instantiated effects scene and the material its
    /// particles share, both released after the charge effect.
    pub fn set_effects(&mut self, root: NodeHandle, effect_material: Option<MaterialHandle>) {
        self.effects_root = Some(root);
        self.effect_material = effect_material;
    }

    #[must_use]
    pub fn effects_root(&self) -> Option<NodeHandle> {
        self.effects_root
    }

    pub fn trigger(
        &mut self,
        event: DirectorEvent,
        catalog: &mut ClipCatalog,
        mixer: &mut AnimationMixer,
        scene: &Scene,
    ) -> TriggerOutcome {
        match event {
            DirectorEvent::LoadComplete => self.load_complete(catalog, mixer, scene),
            DirectorEvent::UserOpen => self.user_open(catalog, mixer, scene),
        }
    }

    fn load_complete(
        &mut self,
        catalog: &mut ClipCatalog,
        mixer: &mut AnimationMixer,
        scene: &Scene,
    ) -> TriggerOutcome {
        if self.load_complete {
            log::debug!("LoadComplete already handled");
            return TriggerOutcome::Ignored;
        }
        self.load_complete = true;
        if self.state == DirectorState::Loading {
            self.state = DirectorState::Dropping;
        }

        let mut started = Vec::new();

        match catalog.find_exact(DROP_CLIP) {
            Some(clip) => {
                play(mixer, scene, clip, |action| {
                    action.set_loop(LoopMode::Once);
                    action.clamp_when_finished = true;
                });
                started.push(DROP_CLIP.to_string());
            }
            None => log::debug!("No '{DROP_CLIP}' clip, skipping"),
        }

        for clip in catalog.make_additive_matching(&[RAYS_FRAGMENT]) {
            play(mixer, scene, &clip, |action| {
                action.blend_mode = BlendMode::Additive;
                action.set_loop(LoopMode::Repeat);
                action.clamp_when_finished = true;
            });
            started.push(clip.name.clone());
        }

        log::info!("Drop started: {started:?}");
        TriggerOutcome::Started(started)
    }

    fn user_open(
        &mut self,
        catalog: &mut ClipCatalog,
        mixer: &mut AnimationMixer,
        scene: &Scene,
    ) -> TriggerOutcome {
        if self.opened {
            return TriggerOutcome::Ignored;
        }
        self.opened = true;
        self.state = DirectorState::Opened;

        let started: Vec<String> = catalog
            .make_additive_matching(&OPEN_FRAGMENTS)
            .into_iter()
            .map(|clip| {
                play(mixer, scene, &clip, |action| {
                    action.blend_mode = BlendMode::Additive;
                    action.set_loop(LoopMode::Once);
                    action.clamp_when_finished = true;
                });
                clip.name.clone()
            })
            .collect();

        if started.is_empty() {
            log::debug!("No opening clips in the catalog");
        }
        log::info!("Opened: {} clips", started.len());
        TriggerOutcome::Started(started)
    }

    /// Runs the finish handler registered for the event's clip. Returns
    /// the action taken, if any.
    pub fn handle_event(
        &mut self,
        event: &AnimationEvent,
        scene: &mut Scene,
    ) -> Option<FinishAction> {
        let AnimationEvent::Finished { clip_name } = event;
        let action = *self.finish_handlers.get(clip_name)?;

        match action {
            FinishAction::DropSettled => {
                if self.state == DirectorState::Dropping {
                    self.state = DirectorState::Idle;
                    log::debug!("Drop settled");
                }
            }
            FinishAction::DisposeEffects => self.dispose_effects(scene),
        }

        Some(action)
    }

    fn dispose_effects(&mut self, scene: &mut Scene) {
        if let Some(root) = self.effects_root.take() {
            let removed = scene.remove_node(root);
            log::info!("Effects removed ({removed} nodes)");
        }
        if let Some(material) = self.effect_material.take()
            && let Some(material) = scene.material_mut(material)
        {
            material.dispose();
        }
    }
}

fn play(
    mixer: &mut AnimationMixer,
    scene: &Scene,
    clip: &Arc<AnimationClip>,
    configure: impl FnOnce(&mut AnimationAction),
) {
    let handle = mixer.clip_action(clip, scene);
    if let Some(action) = mixer.action_mut(handle) {
        configure(action);
        action.play();
    }
}
