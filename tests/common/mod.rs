//! Shared fixtures: in-memory bundles shaped like the shipped models, a
//! widget config that looks straight at the present, and encoders for GLB
//! and PNG bytes.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use glam::{Quat, Vec3};

use gift_reveal::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use gift_reveal::assets::server::{AudioBuffer, LoadEvent, LoadedAsset};
use gift_reveal::assets::{AssetBundle, AssetReader, BundleNode, MemoryAssetReader};
use gift_reveal::config::GiftConfig;
use gift_reveal::gift::{AudioCue, AudioSink, ContainerRect, GiftWidget, HeadlessRenderer};
use gift_reveal::resources::{Color, Mesh};

pub const EPSILON: f32 = 1e-4;

/// Routes `log` output through the test harness. `RUST_LOG=debug` shows it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

pub const CONTAINER: ContainerRect = ContainerRect {
    left: 0.0,
    top: 0.0,
    width: 800.0,
    height: 600.0,
};

/// Client coordinates of the container centre.
pub const CENTER: (f32, f32) = (400.0, 300.0);

// ============================================================================
// Clip builders
// ============================================================================

pub fn translation_track(node: &str, times: Vec<f32>, values: Vec<Vec3>) -> Track {
    Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

pub fn scale_track(node: &str, times: Vec<f32>, values: Vec<Vec3>) -> Track {
    Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Scale,
        },
        data: TrackData::Vector3(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

pub fn rotation_track(node: &str, times: Vec<f32>, values: Vec<Quat>) -> Track {
    Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

/// A clip moving `node` from `from` to `to` over `duration` seconds.
pub fn move_clip(name: &str, node: &str, from: Vec3, to: Vec3, duration: f32) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![translation_track(node, vec![0.0, duration], vec![from, to])],
    )
}

pub fn named_clip(name: &str) -> AnimationClip {
    move_clip(name, "Nowhere", Vec3::ZERO, Vec3::X, 1.0)
}

// ============================================================================
// Bundles
// ============================================================================

fn mesh_child(bundle: &mut AssetBundle, parent: usize, name: &str, material: usize) -> usize {
    bundle.add_child(
        parent,
        BundleNode::new(name)
            .with_mesh(Mesh::unit_cube(name))
            .with_material(material),
    )
}

/// The present: box, lid and bow as groups holding one mesh each, plus the
/// floor, the tag and a few meshes the binder should treat specially.
pub fn present_bundle(path: &str) -> AssetBundle {
    let mut bundle = AssetBundle::new(path);
    let wrap = bundle.add_material("Box Wrapping", Color::WHITE);
    let lid = bundle.add_material("Box Wrapping Top", Color::WHITE);
    let ribbon = bundle.add_material("Ribbon", Color::WHITE);
    let inside = bundle.add_material("Box Inside", Color::WHITE);
    let outline = bundle.add_material("Outline", Color::WHITE);
    let floor = bundle.add_material("Floor", Color::WHITE);
    let tag = bundle.add_material("Tag", Color::WHITE);
    let unknown = bundle.add_material("Glitter", Color::WHITE);

    let present = bundle.add_root(BundleNode::new("Present_Box"));
    mesh_child(&mut bundle, present, "Present_Box_Mesh", wrap);
    mesh_child(&mut bundle, present, "Present_Box_Outline", outline);

    let top = bundle.add_root(BundleNode::new("Present_Top").with_position(Vec3::new(0.0, 0.75, 0.0)));
    mesh_child(&mut bundle, top, "Present_Top_Mesh", lid);

    let bow = bundle.add_root(BundleNode::new("Ribbon_Bow").with_position(Vec3::new(0.0, 1.5, 0.0)));
    mesh_child(&mut bundle, bow, "Ribbon_Bow_Mesh", ribbon);

    bundle.add_root(
        BundleNode::new("Box_Inside")
            .with_position(Vec3::new(6.0, 0.0, 0.0))
            .with_mesh(Mesh::unit_cube("Box_Inside"))
            .with_material(inside),
    );
    bundle.add_root(
        BundleNode::new("Floor")
            .with_position(Vec3::new(0.0, -4.0, 0.0))
            .with_mesh(Mesh::unit_cube("Floor"))
            .with_material(floor),
    );
    bundle.add_root(
        BundleNode::new("SanteeTag")
            .with_position(Vec3::new(0.0, -2.0, 2.0))
            .with_mesh(Mesh::unit_cube("SanteeTag"))
            .with_material(tag),
    );
    bundle.add_root(
        BundleNode::new("Sparkle")
            .with_position(Vec3::new(-6.0, 0.0, 0.0))
            .with_mesh(Mesh::unit_cube("Sparkle"))
            .with_material(unknown),
    );
    bundle.add_root(BundleNode::new("Empty").with_position(Vec3::new(0.0, 6.0, 0.0)));

    bundle.add_clip(move_clip(
        "BoxDrop",
        "Present_Box",
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::ZERO,
        1.0,
    ));
    bundle.add_clip(AnimationClip::new(
        "TopOpen",
        vec![rotation_track(
            "Present_Top",
            vec![0.0, 1.0],
            vec![Quat::IDENTITY, Quat::from_rotation_x(1.0)],
        )],
    ));
    bundle.add_clip(move_clip(
        "SanteeTagRise",
        "SanteeTag",
        Vec3::new(0.0, -2.0, 2.0),
        Vec3::new(0.0, 1.0, 2.0),
        2.0,
    ));
    bundle.add_clip(named_clip("IdleSway"));
    bundle
}

/// Charge effect and loot beam, removed once the charge effect ends.
pub fn effects_bundle(path: &str) -> AssetBundle {
    let mut bundle = AssetBundle::new(path);
    let effect = bundle.add_material("Effect", Color::WHITE);
    let beam = bundle.add_material("BeamEffect", Color::WHITE);

    let group = bundle.add_root(BundleNode::new("Effects").with_position(Vec3::new(-3.0, 3.0, 0.0)));
    mesh_child(&mut bundle, group, "ChargeEffect", effect);
    mesh_child(&mut bundle, group, "LootBeam", beam);

    bundle.add_clip(AnimationClip::new(
        "ChargeEffect",
        vec![scale_track(
            "ChargeEffect",
            vec![0.0, 0.5],
            vec![Vec3::ZERO, Vec3::ONE],
        )],
    ));
    bundle.add_clip(move_clip(
        "LootBeam",
        "LootBeam",
        Vec3::ZERO,
        Vec3::Y,
        1.5,
    ));
    bundle.add_clip(named_clip("ExplosionScale_Sparks"));
    bundle
}

/// Glow decorations and their rotation clips.
pub fn rays_bundle(path: &str) -> AssetBundle {
    let mut bundle = AssetBundle::new(path);
    let burst = bundle.add_material("Sunburst", Color::WHITE);
    let rays = bundle.add_material("Sunrays", Color::WHITE);

    bundle.add_root(
        BundleNode::new("Sunburst")
            .with_position(Vec3::new(0.0, 8.0, 0.0))
            .with_mesh(Mesh::unit_cube("Sunburst"))
            .with_material(burst),
    );
    bundle.add_root(
        BundleNode::new("Sunrays")
            .with_position(Vec3::new(0.0, 8.0, 0.0))
            .with_mesh(Mesh::unit_cube("Sunrays"))
            .with_material(rays),
    );

    for (clip, node) in [("RaysRotation_Burst", "Sunburst"), ("RaysRotation_Rays", "Sunrays")] {
        bundle.add_clip(AnimationClip::new(
            clip,
            vec![rotation_track(
                node,
                vec![0.0, 4.0],
                vec![Quat::IDENTITY, Quat::from_rotation_z(std::f32::consts::PI)],
            )],
        ));
    }
    bundle
}

// ============================================================================
// Widget harness
// ============================================================================

/// Default config with the camera on +Z looking at the origin, so the
/// container centre points at the present.
pub fn test_config() -> GiftConfig {
    let mut config = GiftConfig::default();
    config.camera.position = [0.0, 0.0, 10.0];
    config.camera.rotation = [0.0, 0.0, 0.0];
    config.camera.fov = 45.0;
    config
}

/// Records cues instead of playing them.
#[derive(Clone, Default)]
pub struct RecordingSink(pub Rc<RefCell<Vec<AudioCue>>>);

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: AudioCue, _buffer: &AudioBuffer, _volume: f32) {
        self.0.borrow_mut().push(cue);
    }
}

pub struct Harness {
    pub widget: GiftWidget<HeadlessRenderer>,
    pub cues: Rc<RefCell<Vec<AudioCue>>>,
    pub opened_calls: Rc<Cell<u32>>,
}

/// A started widget whose loader only has the audio cues. Every other load
/// fails, which also selects the fallback text metrics. The three bundles are
/// then handed over directly.
pub fn loaded_harness(config: GiftConfig, name: &str) -> Harness {
    init_logging();
    let reader = MemoryAssetReader::new()
        .with_file(config.assets.drop_sound.clone(), vec![1_u8, 2, 3])
        .with_file(config.assets.open_sound.clone(), vec![4_u8, 5, 6]);

    let cues = Rc::new(RefCell::new(Vec::new()));
    let opened_calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&opened_calls);

    let paths = config.assets.clone();
    let mut widget = GiftWidget::new(config, HeadlessRenderer::new(), CONTAINER, name)
        .expect("widget")
        .with_audio_sink(Box::new(RecordingSink(Rc::clone(&cues))))
        .with_open_callback(move || counter.set(counter.get() + 1));

    widget.start(AssetReader::memory(reader)).expect("start");
    widget.wait_for_loads(Duration::from_secs(10));

    for bundle in [
        present_bundle(&paths.present_model),
        effects_bundle(&paths.effects_model),
        rays_bundle(&paths.rays_model),
    ] {
        widget.handle_load_event(model_event(bundle));
    }

    Harness {
        widget,
        cues,
        opened_calls,
    }
}

pub fn model_event(bundle: AssetBundle) -> LoadEvent {
    LoadEvent::Loaded {
        path: bundle.path.clone(),
        asset: LoadedAsset::Model(Box::new(bundle)),
    }
}

/// Ticks at 60 Hz for `seconds`.
pub fn run_for(widget: &mut GiftWidget<HeadlessRenderer>, seconds: f32) {
    let step = 1.0 / 60.0;
    let steps = (seconds / step).ceil() as u32;
    for _ in 0..steps {
        widget.tick(step);
    }
}

// ============================================================================
// Encoders
// ============================================================================

pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A GLB holding `Present_Box` with two mesh primitives (wrapping and
/// inside), an unnamed node, and a `BoxDrop` translation clip.
pub fn present_glb() -> Vec<u8> {
    let positions = f32_bytes(&[-0.5, -0.5, -0.5, 0.5, 0.5, 0.5, 0.5, -0.5, 0.5]);
    let times = f32_bytes(&[0.0, 1.0]);
    let translations = f32_bytes(&[0.0, 5.0, 0.0, 0.0, 0.0, 0.0]);

    let mut bin = Vec::new();
    bin.extend(&positions);
    bin.extend(&times);
    bin.extend(&translations);

    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "PresentScene", "nodes": [0, 2] }],
        "nodes": [
            { "name": "Present_Box", "children": [1] },
            { "name": "Present_Box_Body", "mesh": 0 },
            { "translation": [1.0, 2.0, 3.0] }
        ],
        "meshes": [{
            "name": "BoxMesh",
            "primitives": [
                { "attributes": { "POSITION": 0 }, "material": 0 },
                { "attributes": { "POSITION": 0 }, "material": 1 }
            ]
        }],
        "materials": [
            { "name": "Box Wrapping", "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.5, 0.0, 1.0] } },
            { "name": "Box Inside" }
        ],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions.len() },
            { "buffer": 0, "byteOffset": positions.len(), "byteLength": times.len() },
            { "buffer": 0, "byteOffset": positions.len() + times.len(), "byteLength": translations.len() }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [-0.5, -0.5, -0.5], "max": [0.5, 0.5, 0.5] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [{
            "name": "BoxDrop",
            "samplers": [{ "input": 1, "output": 2, "interpolation": "LINEAR" }],
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }]
        }]
    });

    glb(&serde_json::to_vec(&json).expect("json"), &bin)
}

fn glb(json: &[u8], bin: &[u8]) -> Vec<u8> {
    fn padded(bytes: &[u8], pad: u8) -> Vec<u8> {
        let mut out = bytes.to_vec();
        while out.len() % 4 != 0 {
            out.push(pad);
        }
        out
    }

    let json = padded(json, b' ');
    let bin = padded(bin, 0);
    let total = 12 + 8 + json.len() + 8 + bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend(b"glTF");
    out.extend(2_u32.to_le_bytes());
    out.extend((total as u32).to_le_bytes());
    out.extend((json.len() as u32).to_le_bytes());
    out.extend(b"JSON");
    out.extend(&json);
    out.extend((bin.len() as u32).to_le_bytes());
    out.extend(b"BIN\0");
    out.extend(&bin);
    out
}
