use rustc_hash::FxHashMap;

use crate::assets::server::AudioBuffer;
use crate::config::AssetPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// The box lands.
    Drop,
    /// The lid comes off.
    Open,
}

/// Host audio output. Playback may silently fail until the host has seen
/// a user gesture.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, buffer: &AudioBuffer, volume: f32);
}

/// Sink that logs and records cues instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudioSink {
    pub played: Vec<AudioCue>,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: AudioCue, buffer: &AudioBuffer, volume: f32) {
        log::info!(
            "Audio cue {cue:?} ({} bytes, volume {volume})",
            buffer.bytes.len()
        );
        self.played.push(cue);
    }
}

/// Loaded cue buffers keyed by cue.
#[derive(Debug)]
pub struct AudioCues {
    paths: [(AudioCue, String); 2],
    buffers: FxHashMap<AudioCue, AudioBuffer>,
    volume: f32,
}

impl AudioCues {
    #[must_use]
    pub fn new(paths: &AssetPaths, volume: f32) -> Self {
        Self {
            paths: [
                (AudioCue::Drop, paths.drop_sound.clone()),
                (AudioCue::Open, paths.open_sound.clone()),
            ],
            buffers: FxHashMap::default(),
            volume,
        }
    }

    /// Cue loaded from `path`, if any.
    #[must_use]
    pub fn cue_for_path(&self, path: &str) -> Option<AudioCue> {
        self.paths
            .iter()
            .find(|(_, p)| p == path)
            .map(|&(cue, _)| cue)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|(_, p)| p.as_str())
    }

    pub fn insert(&mut self, cue: AudioCue, buffer: AudioBuffer) {
        self.buffers.insert(cue, buffer);
    }

    #[must_use]
    pub fn is_loaded(&self, cue: AudioCue) -> bool {
        self.buffers.contains_key(&cue)
    }

    /// Plays `cue` on `sink`. Returns false when its buffer never loaded.
    pub fn play(&self, cue: AudioCue, sink: &mut dyn AudioSink) -> bool {
        match self.buffers.get(&cue) {
            Some(buffer) => {
                sink.play(cue, buffer, self.volume);
                true
            }
            None => {
                log::debug!("Audio cue {cue:?} not loaded, skipping");
                false
            }
        }
    }
}
