use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};

#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }
}

/// A track: metadata plus keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// Named, time-bounded animation data.
///
/// Clips are immutable once shared through an `Arc`; the only mutation,
/// [`AnimationClip::make_additive`], happens before the clip is handed to a
/// mixer.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
    additive: bool,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
            additive: false,
        }
    }

    /// Whether keyframes hold deltas against the first frame.
    #[must_use]
    pub fn is_additive(&self) -> bool {
        self.additive
    }

    /// Rewrites every keyframe as a delta against the track's first keyframe.
    ///
    /// Translation and scale keys subtract the reference value; rotation keys
    /// are pre-multiplied by the inverse reference rotation. Calling this on a
    /// clip that is already additive does nothing.
    pub fn make_additive(&mut self) {
        if self.additive {
            return;
        }

        for track in &mut self.tracks {
            match &mut track.data {
                TrackData::Vector3(data) => {
                    let Some(reference) = data.first_value() else {
                        continue;
                    };
                    rewrite_values(data, |v| *v -= reference);
                }
                TrackData::Quaternion(data) => {
                    let Some(reference) = data.first_value() else {
                        continue;
                    };
                    let inverse = reference.conjugate();
                    rewrite_values(data, |q| *q = (inverse * *q).normalize());
                }
            }
        }

        self.additive = true;
    }
}

/// Applies `f` to every keyframe value, leaving cubic spline tangents alone.
fn rewrite_values<T, F>(track: &mut KeyframeTrack<T>, mut f: F)
where
    T: crate::animation::values::Interpolatable,
    F: FnMut(&mut T),
{
    match track.interpolation {
        InterpolationMode::CubicSpline => {
            for chunk in track.values.chunks_mut(3) {
                if let Some(value) = chunk.get_mut(1) {
                    f(value);
                }
            }
        }
        _ => track.values.iter_mut().for_each(f),
    }
}
