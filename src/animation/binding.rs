use crate::animation::action::TrackValue;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// Transform channel a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

impl TargetPath {
    /// Current value of this channel on `transform`.
    #[must_use]
    pub fn read(self, transform: &Transform) -> TrackValue {
        match self {
            Self::Translation => TrackValue::Vector3(transform.position),
            Self::Rotation => TrackValue::Quaternion(transform.rotation),
            Self::Scale => TrackValue::Vector3(transform.scale),
        }
    }

    /// Writes `value` into this channel. A value of the wrong shape is
    /// ignored.
    pub fn write(self, transform: &mut Transform, value: TrackValue) {
        match (self, value) {
            (Self::Translation, TrackValue::Vector3(v)) => transform.position = v,
            (Self::Scale, TrackValue::Vector3(v)) => transform.scale = v,
            (Self::Rotation, TrackValue::Quaternion(q)) => transform.rotation = q,
            _ => {}
        }
    }
}

/// Track `track_index` of a clip, resolved to a node in one scene.
#[derive(Debug, Clone, Copy)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
