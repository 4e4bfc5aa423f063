use std::sync::Arc;

use crate::animation::AnimationClip;

/// Every clip from every loaded bundle, in arrival order.
///
/// Clips are appended as bundles finish loading and looked up lazily at
/// playback time, so the order in which bundles arrive does not matter.
#[derive(Debug, Default, Clone)]
pub struct ClipCatalog {
    clips: Vec<Arc<AnimationClip>>,
}

impl ClipCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `clips`, keeping their order.
    pub fn add_all(&mut self, clips: impl IntoIterator<Item = AnimationClip>) {
        let before = self.clips.len();
        self.clips.extend(clips.into_iter().map(Arc::new));
        log::debug!(
            "Catalog: +{} clips ({} total)",
            self.clips.len() - before,
            self.clips.len()
        );
    }

    #[must_use]
    pub fn find_exact(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn find_all_containing(&self, fragment: &str) -> Vec<&Arc<AnimationClip>> {
        self.clips
            .iter()
            .filter(|c| c.name.contains(fragment))
            .collect()
    }

    /// Clips whose name contains at least one of `fragments`. Each clip is
    /// returned once, in catalog order.
    #[must_use]
    pub fn find_all_containing_any(&self, fragments: &[&str]) -> Vec<&Arc<AnimationClip>> {
        self.clips
            .iter()
            .filter(|c| fragments.iter().any(|f| c.name.contains(f)))
            .collect()
    }

    /// Converts every clip matching one of `fragments` to additive in place
    /// and returns them in catalog order. Clips already converted are left
    /// as they are.
    pub fn make_additive_matching(&mut self, fragments: &[&str]) -> Vec<Arc<AnimationClip>> {
        self.clips
            .iter_mut()
            .filter(|c| fragments.iter().any(|f| c.name.contains(f)))
            .map(|clip| {
                if !clip.is_additive() {
                    Arc::make_mut(clip).make_additive();
                }
                Arc::clone(clip)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AnimationClip>> {
        self.clips.iter()
    }
}
