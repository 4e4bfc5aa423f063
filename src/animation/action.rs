use std::sync::Arc;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play one cycle, then stop (or hold the last frame when clamped).
    Once,
    /// Repeat forever.
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Weighted against the other normal actions and the rest pose.
    Normal,
    /// Layered on top of the normal result.
    Additive,
}

/// Notification produced while advancing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// A play-once action reached the end of its cycle.
    Finished,
}

/// A live playback handle bound to one clip.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub blend_mode: BlendMode,
    /// Hold the final pose after a play-once cycle instead of releasing it.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    running: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            blend_mode: BlendMode::Normal,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            running: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Starts playback. Calling `play` on a running action has no effect.
    pub fn play(&mut self) -> &mut Self {
        if !self.running {
            self.running = true;
            self.enabled = true;
        }
        self
    }

    /// Stops playback and rewinds.
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.paused = false;
        self.time = 0.0;
        self.track_cursors.iter_mut().for_each(|c| c.last_index = 0);
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running && !self.paused && self.enabled
    }

    /// Whether the action currently contributes to the pose.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.running && self.enabled && self.weight > 0.0
    }

    /// Advances time and resolves the loop policy.
    pub fn update(&mut self, dt: f32) -> Option<ActionEvent> {
        if !self.running || self.paused || !self.enabled {
            return None;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return None;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                let finished = if self.time >= duration {
                    self.time = duration;
                    true
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    true
                } else {
                    false
                };

                if finished {
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                    return Some(ActionEvent::Finished);
                }
            }
            LoopMode::Repeat => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
        }

        None
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(glam::Vec3),
    Quaternion(glam::Quat),
}
