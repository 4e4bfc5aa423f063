use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::Scene;

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node in `scene` by name.
    ///
    /// Bundles arrive in any order, so binding happens when an action is
    /// first requested, by which time every node the clip names exists.
    /// Tracks whose node cannot be found are dropped.
    #[must_use]
    pub fn bind(scene: &Scene, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_idx, track) in clip.tracks.iter().enumerate() {
            let node_name = &track.meta.node_name;

            if let Some(node_handle) = scene.find_by_name(node_name) {
                bindings.push(PropertyBinding {
                    track_index: track_idx,
                    node_handle,
                    target: track.meta.target,
                });
            } else {
                log::debug!(
                    "Clip '{}' targets missing node '{}', track skipped",
                    clip.name,
                    node_name
                );
            }
        }

        bindings
    }
}
