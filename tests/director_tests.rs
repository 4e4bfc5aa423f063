//! Animation Director Tests
//!
//! Tests for:
//! - LoadComplete: drop clip plus additive ray clips, handled once
//! - UserOpen: every opening clip once, additive, missing clips skipped
//! - Finish handlers: drop settling and effects teardown

mod common;

use gift_reveal::animation::{AnimationEvent, AnimationMixer, BlendMode, LoopMode};
use gift_reveal::gift::{
    AnimationDirector, ClipCatalog, DirectorEvent, DirectorState, FinishAction, TriggerOutcome,
};
use gift_reveal::resources::{Color, Material};
use gift_reveal::scene::Scene;

use common::{effects_bundle, named_clip, present_bundle, rays_bundle};

struct Fixture {
    scene: Scene,
    catalog: ClipCatalog,
    mixer: AnimationMixer,
    director: AnimationDirector,
}

fn fixture() -> Fixture {
    let mut scene = Scene::new();
    let mut catalog = ClipCatalog::new();
    for bundle in [
        present_bundle("present.glb"),
        effects_bundle("effects.glb"),
        rays_bundle("rays.glb"),
    ] {
        scene.instantiate(&bundle);
        catalog.add_all(bundle.clips);
    }
    Fixture {
        scene,
        catalog,
        mixer: AnimationMixer::new(),
        director: AnimationDirector::new(),
    }
}

impl Fixture {
    fn trigger(&mut self, event: DirectorEvent) -> TriggerOutcome {
        self.director
            .trigger(event, &mut self.catalog, &mut self.mixer, &self.scene)
    }

    fn finish(&mut self, clip: &str) -> Option<FinishAction> {
        self.director.handle_event(
            &AnimationEvent::Finished {
                clip_name: clip.to_string(),
            },
            &mut self.scene,
        )
    }
}

fn started(outcome: TriggerOutcome) -> Vec<String> {
    match outcome {
        TriggerOutcome::Started(clips) => clips,
        TriggerOutcome::Ignored => panic!("event was ignored"),
    }
}

// ============================================================================
// LoadComplete
// ============================================================================

#[test]
fn starts_in_loading() {
    let director = AnimationDirector::new();
    assert_eq!(director.state(), DirectorState::Loading);
    assert!(!director.is_opened());
}

#[test]
fn load_complete_plays_drop_and_rays() {
    let mut f = fixture();
    let clips = started(f.trigger(DirectorEvent::LoadComplete));

    assert_eq!(clips, ["BoxDrop", "RaysRotation_Burst", "RaysRotation_Rays"]);
    assert_eq!(f.director.state(), DirectorState::Dropping);

    let drop = f.mixer.action_by_clip("BoxDrop").expect("drop action");
    assert_eq!(drop.loop_mode, LoopMode::Once);
    assert!(drop.clamp_when_finished);
    assert_eq!(drop.blend_mode, BlendMode::Normal);
    assert!(drop.is_running());

    for name in ["RaysRotation_Burst", "RaysRotation_Rays"] {
        let rays = f.mixer.action_by_clip(name).expect("rays action");
        assert_eq!(rays.loop_mode, LoopMode::Repeat);
        assert_eq!(rays.blend_mode, BlendMode::Additive);
        assert!(rays.clip().is_additive());
        assert!(rays.is_running());
    }
}

#[test]
fn load_complete_twice_is_ignored() {
    let mut f = fixture();
    f.trigger(DirectorEvent::LoadComplete);
    assert_eq!(f.trigger(DirectorEvent::LoadComplete), TriggerOutcome::Ignored);
    assert_eq!(f.mixer.len(), 3);
}

#[test]
fn load_complete_without_drop_clip() {
    let mut catalog = ClipCatalog::new();
    catalog.add_all([named_clip("IdleSway")]);
    let scene = Scene::new();
    let mut mixer = AnimationMixer::new();
    let mut director = AnimationDirector::new();

    let outcome = director.trigger(DirectorEvent::LoadComplete, &mut catalog, &mut mixer, &scene);
    assert_eq!(outcome, TriggerOutcome::Started(vec![]));
    assert_eq!(director.state(), DirectorState::Dropping);
    assert!(mixer.is_empty());
}

// ============================================================================
// UserOpen
// ============================================================================

#[test]
fn user_open_plays_opening_clips_additively() {
    let mut f = fixture();
    f.trigger(DirectorEvent::LoadComplete);
    let clips = started(f.trigger(DirectorEvent::UserOpen));

    assert_eq!(
        clips,
        ["TopOpen", "SanteeTagRise", "ChargeEffect", "LootBeam", "ExplosionScale_Sparks"]
    );
    assert_eq!(f.director.state(), DirectorState::Opened);
    assert!(f.director.is_opened());

    for name in &clips {
        let action = f.mixer.action_by_clip(name).expect("open action");
        assert_eq!(action.blend_mode, BlendMode::Additive);
        assert_eq!(action.loop_mode, LoopMode::Once);
        assert!(action.clamp_when_finished);
        assert!(action.clip().is_additive());
    }

    // Clips matching no opening fragment stay untouched.
    assert!(f.mixer.action_by_clip("IdleSway").is_none());
    assert!(!f.catalog.find_exact("IdleSway").unwrap().is_additive());
}

#[test]
fn user_open_is_idempotent() {
    let mut f = fixture();
    f.trigger(DirectorEvent::LoadComplete);
    f.trigger(DirectorEvent::UserOpen);
    let actions = f.mixer.len();

    assert_eq!(f.trigger(DirectorEvent::UserOpen), TriggerOutcome::Ignored);
    assert_eq!(f.mixer.len(), actions);
}

#[test]
fn user_open_with_empty_catalog() {
    let mut catalog = ClipCatalog::new();
    let scene = Scene::new();
    let mut mixer = AnimationMixer::new();
    let mut director = AnimationDirector::new();

    let outcome = director.trigger(DirectorEvent::UserOpen, &mut catalog, &mut mixer, &scene);
    assert_eq!(outcome, TriggerOutcome::Started(vec![]));
    assert_eq!(director.state(), DirectorState::Opened);
}

#[test]
fn opened_is_terminal() {
    let mut f = fixture();
    f.trigger(DirectorEvent::UserOpen);
    f.trigger(DirectorEvent::LoadComplete);
    assert_eq!(f.director.state(), DirectorState::Opened);

    f.finish("BoxDrop");
    assert_eq!(f.director.state(), DirectorState::Opened);
}

// ============================================================================
// Finish handlers
// ============================================================================

#[test]
fn drop_finish_settles_to_idle() {
    let mut f = fixture();
    f.trigger(DirectorEvent::LoadComplete);

    assert_eq!(f.finish("BoxDrop"), Some(FinishAction::DropSettled));
    assert_eq!(f.director.state(), DirectorState::Idle);
}

#[test]
fn unregistered_clip_has_no_handler() {
    let mut f = fixture();
    assert_eq!(f.finish("TopOpen"), None);
}

#[test]
fn charge_effect_finish_removes_effects() {
    let mut f = fixture();
    let root = f.scene.find_by_name("Effects").and_then(|h| {
        f.scene.get_node(h).and_then(|n| n.parent())
    });
    let root = root.expect("effects scene root");
    let material = f.scene.add_material(Material::basic(Color::WHITE).with_name("Effect"));
    f.director.set_effects(root, Some(material));

    let before = f.scene.node_count();
    assert_eq!(f.finish("ChargeEffect"), Some(FinishAction::DisposeEffects));

    assert!(!f.scene.contains(root));
    assert!(f.scene.find_by_name("ChargeEffect").is_none());
    assert!(f.scene.find_by_name("LootBeam").is_none());
    assert_eq!(f.scene.node_count(), before - 4);
    assert!(f.scene.material(material).unwrap().is_disposed());
    assert!(f.director.effects_root().is_none());

    // A second finish finds nothing left to remove.
    assert_eq!(f.finish("ChargeEffect"), Some(FinishAction::DisposeEffects));
    assert_eq!(f.scene.node_count(), before - 4);
}

#[test]
fn custom_finish_handler_replaces_default() {
    let mut f = fixture();
    f.trigger(DirectorEvent::LoadComplete);
    f.director.on_finish("LootBeam", FinishAction::DropSettled);

    assert_eq!(f.finish("LootBeam"), Some(FinishAction::DropSettled));
    assert_eq!(f.director.state(), DirectorState::Idle);
}
