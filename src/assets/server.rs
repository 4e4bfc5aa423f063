use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;

use crate::assets::bundle::AssetBundle;
use crate::assets::io::AssetReader;
use crate::assets::loaders::GltfLoader;
use crate::errors::{GiftError, Result};
use crate::resources::texture::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    Texture,
    Audio,
    Font,
}

/// Encoded audio. Decoding belongs to the host's audio sink.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub bytes: Arc<[u8]>,
}

/// A parsed font, shareable across shapers.
#[derive(Clone)]
pub struct FontData(pub Arc<fontdue::Font>);

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData").finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum LoadedAsset {
    Model(Box<AssetBundle>),
    Texture(Image),
    Audio(AudioBuffer),
    Font(FontData),
}

impl LoadedAsset {
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Model(_) => AssetKind::Model,
            Self::Texture(_) => AssetKind::Texture,
            Self::Audio(_) => AssetKind::Audio,
            Self::Font(_) => AssetKind::Font,
        }
    }
}

/// Completion notice for one issued load.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded { path: String, asset: LoadedAsset },
    Failed { path: String, kind: AssetKind, error: String },
}

impl LoadEvent {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Loaded { path, .. } | Self::Failed { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Items that finished, successfully or not.
    pub loaded: usize,
    pub failed: usize,
    pub total: usize,
}

impl LoadProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }
}

/// Issues asset loads on a background runtime and reports completions.
///
/// Reading and decoding run on worker threads. Results come back through a
/// channel and are only handed out by [`ResourceLoader::poll`], so every
/// completion is handled on the caller's thread, one at a time.
pub struct ResourceLoader {
    reader: AssetReader,
    runtime: Runtime,
    sender: flume::Sender<LoadEvent>,
    receiver: flume::Receiver<LoadEvent>,
    progress: LoadProgress,
    all_loaded_reported: bool,
}

impl ResourceLoader {
    pub fn new(reader: AssetReader) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("gift-asset-loader")
            .build()?;
        let (sender, receiver) = flume::unbounded();
        Ok(Self {
            reader,
            runtime,
            sender,
            receiver,
            progress: LoadProgress::default(),
            all_loaded_reported: false,
        })
    }

    pub fn load_model(&mut self, path: &str) {
        self.spawn(path, AssetKind::Model);
    }

    pub fn load_texture(&mut self, path: &str) {
        self.spawn(path, AssetKind::Texture);
    }

    pub fn load_audio(&mut self, path: &str) {
        self.spawn(path, AssetKind::Audio);
    }

    pub fn load_font(&mut self, path: &str) {
        self.spawn(path, AssetKind::Font);
    }

    fn spawn(&mut self, path: &str, kind: AssetKind) {
        self.progress.total += 1;
        log::debug!("Loading {kind:?} '{path}'");

        let reader = self.reader.clone();
        let sender = self.sender.clone();
        let path = path.to_string();

        self.runtime.spawn(async move {
            let event = match fetch(&reader, &path, kind).await {
                Ok(asset) => LoadEvent::Loaded { path, asset },
                Err(e) => LoadEvent::Failed {
                    path,
                    kind,
                    error: e.to_string(),
                },
            };
            // The loader may already be gone; nothing to report to then.
            let _ = sender.send(event);
        });
    }

    /// Drains every completion that has arrived so far.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.receiver.try_iter().collect();
        for event in &events {
            self.record(event);
        }
        events
    }

    /// Blocks until every issued load has reported or `timeout` elapses.
    /// Meant for headless hosts; never call it from a frame callback.
    pub fn poll_blocking(&mut self, timeout: Duration) -> Vec<LoadEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while !self.progress.is_complete() {
            match self.receiver.recv_deadline(deadline) {
                Ok(event) => {
                    self.record(&event);
                    events.push(event);
                }
                Err(_) => break,
            }
        }
        events
    }

    fn record(&mut self, event: &LoadEvent) {
        self.progress.loaded += 1;
        match event {
            LoadEvent::Loaded { path, .. } => {
                log::info!(
                    "Loaded '{path}' ({}/{})",
                    self.progress.loaded,
                    self.progress.total
                );
            }
            LoadEvent::Failed { path, error, .. } => {
                self.progress.failed += 1;
                log::error!("Error Loading: {path} ({error})");
            }
        }
    }

    #[must_use]
    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    /// True exactly once: the first call after every issued load completed
    /// or failed.
    pub fn take_all_loaded(&mut self) -> bool {
        if self.all_loaded_reported || self.progress.total == 0 || !self.progress.is_complete() {
            return false;
        }
        self.all_loaded_reported = true;
        log::info!(
            "All resources ready ({} loaded, {} failed)",
            self.progress.loaded - self.progress.failed,
            self.progress.failed
        );
        true
    }
}

async fn fetch(reader: &AssetReader, path: &str, kind: AssetKind) -> Result<LoadedAsset> {
    let bytes = reader.read_bytes(path).await?;
    let owned_path = path.to_string();

    let asset = match kind {
        AssetKind::Audio => LoadedAsset::Audio(AudioBuffer {
            bytes: bytes.into(),
        }),
        AssetKind::Texture => {
            let image = tokio::task::spawn_blocking(move || Image::decode(&bytes)).await??;
            LoadedAsset::Texture(image)
        }
        AssetKind::Model => {
            let bundle =
                tokio::task::spawn_blocking(move || GltfLoader::load_from_bytes(&owned_path, &bytes))
                    .await??;
            LoadedAsset::Model(Box::new(bundle))
        }
        AssetKind::Font => {
            let font = tokio::task::spawn_blocking(move || {
                fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
                    .map_err(|e| GiftError::Font(e.to_string()))
            })
            .await??;
            LoadedAsset::Font(FontData(Arc::new(font)))
        }
    };

    Ok(asset)
}
