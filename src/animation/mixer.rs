use std::sync::Arc;

use glam::Quat;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{ActionEvent, AnimationAction, BlendMode, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

/// Notifications emitted by [`AnimationMixer::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    Finished { clip_name: String },
}

type PropertyKey = (NodeHandle, TargetPath);

#[derive(Default)]
struct Accumulator {
    normal_weight: f32,
    normal: Option<TrackValue>,
    additive: Vec<(TrackValue, f32)>,
}

/// Drives every action of one scene.
///
/// One action is cached per clip name. Normal actions are blended by weight
/// against the rest pose captured when their node was first bound; additive
/// actions are layered on top of that result.
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    by_clip: FxHashMap<String, ActionHandle>,
    rest_pose: FxHashMap<PropertyKey, TrackValue>,
    touched: FxHashSet<PropertyKey>,
    pub time_scale: f32,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: SlotMap::with_key(),
            by_clip: FxHashMap::default(),
            rest_pose: FxHashMap::default(),
            touched: FxHashSet::default(),
            time_scale: 1.0,
        }
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        if let Some(&handle) = self.by_clip.get(&clip.name) {
            return handle;
        }

        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = Binder::bind(scene, clip);

        for binding in &action.bindings {
            let key = (binding.node_handle, binding.target);
            if self.rest_pose.contains_key(&key) {
                continue;
            }
            if let Some(node) = scene.get_node(binding.node_handle) {
                self.rest_pose.insert(key, binding.target.read(&node.transform));
            }
        }

        log::debug!(
            "Bound clip '{}' ({} of {} tracks)",
            clip.name,
            action.bindings.len(),
            clip.tracks.len()
        );

        let handle = self.actions.insert(action);
        self.by_clip.insert(clip.name.clone(), handle);
        handle
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    #[must_use]
    pub fn action_by_clip(&self, clip_name: &str) -> Option<&AnimationAction> {
        self.by_clip
            .get(clip_name)
            .and_then(|&handle| self.actions.get(handle))
    }

    /// Number of cached actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn stop_all(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances all actions by `dt` seconds and writes the blended pose into
    /// `scene`. Returns the clips that finished during this step.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> Vec<AnimationEvent> {
        let dt = dt * self.time_scale;
        let mut events = Vec::new();

        for action in self.actions.values_mut() {
            if let Some(ActionEvent::Finished) = action.update(dt) {
                events.push(AnimationEvent::Finished {
                    clip_name: action.clip().name.clone(),
                });
            }
        }

        let mut accumulators: FxHashMap<PropertyKey, Accumulator> = FxHashMap::default();

        for action in self.actions.values_mut() {
            if !action.is_effective() {
                continue;
            }
            let weight = action.weight;
            let blend_mode = action.blend_mode;

            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(value) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let acc = accumulators
                    .entry((binding.node_handle, binding.target))
                    .or_default();

                match blend_mode {
                    BlendMode::Normal => accumulate_normal(acc, value, weight),
                    BlendMode::Additive => acc.additive.push((value, weight)),
                }
            }
        }

        let released: Vec<PropertyKey> = self
            .touched
            .iter()
            .filter(|key| !accumulators.contains_key(*key))
            .copied()
            .collect();

        for key in released {
            self.touched.remove(&key);
            if let Some(&rest) = self.rest_pose.get(&key) {
                write_property(scene, key, rest);
            }
        }

        for (key, acc) in accumulators {
            let Some(&rest) = self.rest_pose.get(&key) else {
                continue;
            };
            let value = resolve(rest, &acc);
            write_property(scene, key, value);
            self.touched.insert(key);
        }

        events
    }
}

fn accumulate_normal(acc: &mut Accumulator, value: TrackValue, weight: f32) {
    let total = acc.normal_weight + weight;
    acc.normal = Some(match (acc.normal, value) {
        (None, v) => match v {
            TrackValue::Vector3(v) => TrackValue::Vector3(v * weight),
            TrackValue::Quaternion(q) => TrackValue::Quaternion(q),
        },
        (Some(TrackValue::Vector3(sum)), TrackValue::Vector3(v)) => {
            TrackValue::Vector3(sum + v * weight)
        }
        (Some(TrackValue::Quaternion(current)), TrackValue::Quaternion(q)) => {
            TrackValue::Quaternion(current.slerp(q, weight / total))
        }
        (Some(existing), _) => existing,
    });
    acc.normal_weight = total;
}

fn resolve(rest: TrackValue, acc: &Accumulator) -> TrackValue {
    let weight = acc.normal_weight;

    let mut result = match (rest, acc.normal) {
        (TrackValue::Vector3(rest), Some(TrackValue::Vector3(sum))) if weight > 0.0 => {
            if weight < 1.0 {
                TrackValue::Vector3(sum + rest * (1.0 - weight))
            } else {
                TrackValue::Vector3(sum / weight)
            }
        }
        (TrackValue::Quaternion(rest), Some(TrackValue::Quaternion(q))) if weight > 0.0 => {
            TrackValue::Quaternion(rest.slerp(q, weight.min(1.0)))
        }
        _ => rest,
    };

    for &(delta, w) in &acc.additive {
        result = match (result, delta) {
            (TrackValue::Vector3(base), TrackValue::Vector3(d)) => {
                TrackValue::Vector3(base + d * w)
            }
            (TrackValue::Quaternion(base), TrackValue::Quaternion(d)) => {
                TrackValue::Quaternion((base * Quat::IDENTITY.slerp(d, w)).normalize())
            }
            (base, _) => base,
        };
    }

    result
}

fn write_property(scene: &mut Scene, (node_handle, target): PropertyKey, value: TrackValue) {
    if let Some(node) = scene.get_node_mut(node_handle) {
        target.write(&mut node.transform, value);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn additive_vector_layers_on_top_of_rest() {
        let rest = TrackValue::Vector3(Vec3::new(1.0, 2.0, 3.0));
        let acc = Accumulator {
            additive: vec![(TrackValue::Vector3(Vec3::new(0.0, 1.0, 0.0)), 0.5)],
            ..Default::default()
        };
        assert_eq!(
            resolve(rest, &acc),
            TrackValue::Vector3(Vec3::new(1.0, 2.5, 3.0))
        );
    }

    #[test]
    fn partial_normal_weight_mixes_rest() {
        let rest = TrackValue::Vector3(Vec3::ZERO);
        let mut acc = Accumulator::default();
        accumulate_normal(&mut acc, TrackValue::Vector3(Vec3::splat(2.0)), 0.5);
        assert_eq!(resolve(rest, &acc), TrackValue::Vector3(Vec3::splat(1.0)));
    }
}
