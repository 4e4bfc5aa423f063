//! The widget context
//!
//! [`GiftWidget`] owns one complete reveal: scene, camera, mixer, catalog,
//! director, pointer routing, tag text and the loader feeding them. Nothing
//! is shared between instances.
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let mut widget = GiftWidget::new(config, renderer, rect, "Alex")?;
//! widget.start(AssetReader::file("assets"))?;
//! loop {
//!     widget.frame();                 // once per display refresh
//! }
//! ```
//!
//! Load completions are drained at the top of every tick. Once every issued
//! load has finished (or failed) the reveal is scheduled: after
//! `timing.reveal_delay` seconds the drop cue plays, the drop and ray clips
//! start, and the canvas fades in over `timing.fade_in` seconds.

use std::time::Duration;

use crate::animation::AnimationMixer;
use crate::assets::bundle::AssetBundle;
use crate::assets::io::AssetReader;
use crate::assets::server::{AssetKind, LoadEvent, LoadProgress, LoadedAsset, ResourceLoader};
use crate::config::GiftConfig;
use crate::errors::{GiftError, Result};
use crate::gift::attachment::AttachmentUpdater;
use crate::gift::audio::{AudioCue, AudioCues, AudioSink, LogAudioSink};
use crate::gift::catalog::ClipCatalog;
use crate::gift::director::{AnimationDirector, DirectorEvent, DirectorState, TriggerOutcome};
use crate::gift::interaction::{ContainerRect, InteractionRouter, InteractionState, PointerOutcome};
use crate::gift::render::{FrameContext, FrameRenderer, PostProcessSettings};
use crate::gift::scene_binder::{OutlineSet, SceneGraphBinder};
use crate::gift::viewport::{RenderSize, letterbox};
use crate::resources::material::{MaterialRegistry, MaterialSlot};
use crate::scene::{Camera, NodeHandle, Scene};
use crate::text::{FontdueShaper, MonospaceShaper, SanteeIdentity, TagText, TextShaper};
use crate::utils::time::Timer;

/// Called once, when the present opens.
pub type OpenCallback = Box<dyn FnMut()>;

pub struct GiftWidget<R: FrameRenderer> {
    config: GiftConfig,
    renderer: R,

    scene: Scene,
    camera: Camera,
    mixer: AnimationMixer,
    catalog: ClipCatalog,
    registry: MaterialRegistry,
    director: AnimationDirector,
    router: InteractionRouter,
    outline: OutlineSet,
    attachments: AttachmentUpdater,

    identity: SanteeIdentity,
    tag_texts: Vec<TagText>,
    shaper: Option<Box<dyn TextShaper>>,
    pending_tags: Vec<NodeHandle>,

    loader: Option<ResourceLoader>,
    audio: AudioCues,
    audio_sink: Box<dyn AudioSink>,
    on_open: Option<OpenCallback>,

    timer: Timer,
    reveal_countdown: Option<f32>,
    since_reveal: Option<f32>,
    render_size: RenderSize,
    frame: u64,
}

impl<R: FrameRenderer> GiftWidget<R> {
    /// Validates `config` and checks the renderer. Nothing is loaded until
    /// [`GiftWidget::start`].
    pub fn new(
        config: GiftConfig,
        renderer: R,
        rect: ContainerRect,
        name: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;
        if !renderer.is_supported() {
            log::error!("Renderer is not supported on this host, not starting");
            return Err(GiftError::Unsupported(
                "the renderer reported missing capabilities".to_string(),
            ));
        }

        let scene = Scene::from_options(&config.scene);
        let camera = Camera::from_options(&config.camera);
        let audio = AudioCues::new(&config.assets, config.audio.volume);
        let render_size = letterbox(rect.width, rect.height, config.camera.aspect_ratio);

        Ok(Self {
            renderer,
            scene,
            camera,
            mixer: AnimationMixer::new(),
            catalog: ClipCatalog::new(),
            registry: MaterialRegistry::default(),
            director: AnimationDirector::new(),
            router: InteractionRouter::new(rect),
            outline: OutlineSet::new(),
            attachments: AttachmentUpdater::new(),
            identity: SanteeIdentity::new(name),
            tag_texts: Vec::new(),
            shaper: None,
            pending_tags: Vec::new(),
            loader: None,
            audio,
            audio_sink: Box::new(LogAudioSink::default()),
            on_open: None,
            timer: Timer::new(),
            reveal_countdown: None,
            since_reveal: None,
            render_size,
            frame: 0,
            config,
        })
    }

    #[must_use]
    pub fn with_audio_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio_sink = sink;
        self
    }

    #[must_use]
    pub fn with_open_callback(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(callback));
        self
    }

    /// Builds the shared materials, issues every load and sizes the output.
    /// Calling it again does nothing.
    pub fn start(&mut self, reader: AssetReader) -> Result<()> {
        if self.loader.is_some() {
            log::warn!("start() called twice, ignoring");
            return Ok(());
        }

        self.registry =
            MaterialRegistry::build(&mut self.scene, &self.config.colors, &self.config.assets);

        let mut loader = ResourceLoader::new(reader)?;
        for path in self.audio.paths() {
            loader.load_audio(path);
        }
        for (path, _) in self.registry.textures() {
            loader.load_texture(path);
        }
        for path in self.config.assets.models() {
            loader.load_model(path);
        }
        loader.load_font(&self.config.assets.font);
        log::info!("Loading {} resources", loader.progress().total);
        self.loader = Some(loader);

        self.renderer
            .configure(&PostProcessSettings::from(&self.config.post_process));
        self.resize(self.router.rect());
        Ok(())
    }

    /// Handles every load completion that has arrived. Schedules the reveal
    /// once all issued loads are done.
    pub fn poll(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        let events = loader.poll();
        let all_loaded = loader.take_all_loaded();
        self.apply_events(events, all_loaded);
    }

    /// Blocks until every load has reported or `timeout` passes. For
    /// headless hosts only.
    pub fn wait_for_loads(&mut self, timeout: Duration) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        let events = loader.poll_blocking(timeout);
        let all_loaded = loader.take_all_loaded();
        self.apply_events(events, all_loaded);
    }

    fn apply_events(&mut self, events: Vec<LoadEvent>, all_loaded: bool) {
        for event in events {
            self.handle_load_event(event);
        }
        if all_loaded {
            self.schedule_reveal();
        }
    }

    /// Applies one finished load to the scene.
    pub fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded { path, asset } => match asset {
                LoadedAsset::Model(bundle) => self.add_bundle(*bundle),
                LoadedAsset::Texture(image) => {
                    if let Some(texture) = self
                        .registry
                        .texture_for_path(&path)
                        .and_then(|h| self.scene.texture_mut(h))
                    {
                        texture.fill(image);
                    }
                }
                LoadedAsset::Audio(buffer) => {
                    if let Some(cue) = self.audio.cue_for_path(&path) {
                        self.audio.insert(cue, buffer);
                    }
                }
                LoadedAsset::Font(font) => {
                    self.shaper = Some(Box::new(FontdueShaper::new(font)));
                    self.attach_tag_text();
                }
            },
            LoadEvent::Failed { path, kind, .. } => match kind {
                AssetKind::Texture => {
                    if let Some(texture) = self
                        .registry
                        .texture_for_path(&path)
                        .and_then(|h| self.scene.texture_mut(h))
                    {
                        texture.mark_failed();
                    }
                }
                AssetKind::Font => {
                    log::warn!("Font '{path}' unavailable, measuring text with fixed metrics");
                    self.shaper = Some(Box::new(MonospaceShaper::default()));
                    self.attach_tag_text();
                }
                AssetKind::Model | AssetKind::Audio => {}
            },
        }
    }

    fn add_bundle(&mut self, mut bundle: AssetBundle) {
        let root = self.scene.instantiate(&bundle);
        let report = SceneGraphBinder::bind(
            &mut self.scene,
            root,
            &self.registry,
            &mut self.outline,
            &mut self.renderer,
        );

        if bundle.path == self.config.assets.effects_model {
            self.director
                .set_effects(root, self.registry.get(MaterialSlot::Effect));
        }

        self.catalog.add_all(std::mem::take(&mut bundle.clips));
        self.pending_tags.extend(report.tag_nodes);
        self.attach_tag_text();
    }

    /// Attaches the name text to every pending tag mesh once a shaper is
    /// available.
    fn attach_tag_text(&mut self) {
        let Some(shaper) = self.shaper.as_deref() else {
            return;
        };
        for parent in self.pending_tags.drain(..) {
            let mut tag_text = TagText::new(self.config.text.clone());
            if tag_text
                .attach(&mut self.scene, parent, &self.identity, shaper)
                .is_some()
            {
                self.tag_texts.push(tag_text);
            }
        }
    }

    /// Starts the reveal countdown. Later calls do nothing.
    pub fn schedule_reveal(&mut self) {
        if self.reveal_countdown.is_some() || self.since_reveal.is_some() {
            return;
        }
        log::debug!("Reveal in {}s", self.config.timing.reveal_delay);
        self.reveal_countdown = Some(self.config.timing.reveal_delay);
    }

    fn reveal(&mut self) {
        self.since_reveal = Some(0.0);
        self.audio.play(AudioCue::Drop, self.audio_sink.as_mut());
        self.director.trigger(
            DirectorEvent::LoadComplete,
            &mut self.catalog,
            &mut self.mixer,
            &self.scene,
        );
        self.scene.update_matrix_world();
        self.attachments.sync(&mut self.scene);
    }

    /// Advances everything by `dt` seconds and renders one frame.
    pub fn tick(&mut self, dt: f32) {
        self.poll();

        if let Some(remaining) = self.reveal_countdown {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.reveal_countdown = None;
                self.reveal();
            } else {
                self.reveal_countdown = Some(remaining);
            }
        } else if let Some(elapsed) = self.since_reveal.as_mut() {
            *elapsed += dt;
        }

        for event in self.mixer.update(dt, &mut self.scene) {
            self.director.handle_event(&event, &mut self.scene);
        }

        self.scene.update_matrix_world();
        if self.attachments.sync(&mut self.scene) {
            self.scene.update_matrix_world();
        }

        self.render();
    }

    /// [`GiftWidget::tick`] driven by wall-clock time.
    pub fn frame(&mut self) {
        self.timer.tick();
        self.tick(self.timer.dt_seconds());
    }

    fn render(&mut self) {
        self.frame += 1;
        let opacity = self.opacity();
        let context = FrameContext {
            scene: &self.scene,
            camera: &self.camera,
            highlighted: self.outline.highlighted(),
            opacity,
            frame: self.frame,
        };
        self.renderer.render(&context);
    }

    /// Every issued load has reported; the reveal is pending or done.
    fn loads_complete(&self) -> bool {
        self.reveal_countdown.is_some() || self.since_reveal.is_some()
    }

    /// Canvas opacity: 0 until the reveal, then fading in.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        let fade = self.config.timing.fade_in;
        match self.since_reveal {
            None => 0.0,
            Some(_) if fade <= 0.0 => 1.0,
            Some(t) => (t / fade).clamp(0.0, 1.0),
        }
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) -> PointerOutcome {
        if !self.loads_complete() {
            return PointerOutcome::Miss;
        }
        self.router.pointer_move(
            client_x,
            client_y,
            &self.scene,
            &self.camera,
            &mut self.outline,
        )
    }

    /// A qualifying click opens the present: open cue, open callback, the
    /// opening clips. Only the first one does anything.
    pub fn pointer_up(&mut self, client_x: f32, client_y: f32) -> PointerOutcome {
        if !self.loads_complete() {
            return PointerOutcome::Miss;
        }
        let outcome = self.router.pointer_up(
            client_x,
            client_y,
            &self.scene,
            &self.camera,
            &mut self.outline,
        );

        if outcome == PointerOutcome::Open {
            self.audio.play(AudioCue::Open, self.audio_sink.as_mut());
            if let Some(mut callback) = self.on_open.take() {
                callback();
            }
            if let TriggerOutcome::Started(clips) = self.director.trigger(
                DirectorEvent::UserOpen,
                &mut self.catalog,
                &mut self.mixer,
                &self.scene,
            ) {
                log::debug!("Opening clips: {clips:?}");
            }
        }

        outcome
    }

    /// Fits the output to a new container size, keeping the target aspect.
    pub fn resize(&mut self, rect: ContainerRect) {
        self.router.set_rect(rect);
        let aspect = self.config.camera.aspect_ratio;
        self.render_size = letterbox(rect.width, rect.height, aspect);

        self.camera.aspect = aspect;
        self.camera.update_projection_matrix();
        self.renderer
            .resize(self.render_size, self.config.post_process.pixel_ratio);
    }

    #[must_use]
    pub fn santee_name(&self) -> &str {
        self.identity.name()
    }

    /// Stores the name and refits every attached tag text.
    pub fn set_santee_name(&mut self, name: impl Into<String>) {
        self.identity.set_name(name);
        if let Some(shaper) = self.shaper.as_deref() {
            for tag_text in &mut self.tag_texts {
                tag_text.set_text(&mut self.scene, &self.identity, shaper);
            }
        }
    }

    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.router.state().opened
    }

    #[must_use]
    pub fn state(&self) -> DirectorState {
        self.director.state()
    }

    #[must_use]
    pub fn interaction_state(&self) -> InteractionState {
        self.router.state()
    }

    #[must_use]
    pub fn load_progress(&self) -> LoadProgress {
        self.loader
            .as_ref()
            .map(ResourceLoader::progress)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn render_size(&self) -> RenderSize {
        self.render_size
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn catalog(&self) -> &ClipCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn director(&self) -> &AnimationDirector {
        &self.director
    }

    #[must_use]
    pub fn outline(&self) -> &OutlineSet {
        &self.outline
    }

    #[must_use]
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    #[must_use]
    pub fn tag_texts(&self) -> &[TagText] {
        &self.tag_texts
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
