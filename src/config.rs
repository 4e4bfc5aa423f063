//! Widget Configuration
//!
//! [`GiftConfig`] is the typed option set for one widget instance. Every
//! field has a default matching the shipped scene, and any subset can be
//! overridden from JSON:
//!
//! ```rust,ignore
//! let config = GiftConfig::from_json_str(r#"{ "text": { "font_size": 0.4 } }"#)?;
//! ```
//!
//! [`GiftConfig::validate`] runs on construction of the widget.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GiftError, Result};
use crate::resources::color::Color;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftConfig {
    pub scene: SceneOptions,
    pub camera: CameraOptions,
    pub assets: AssetPaths,
    pub colors: SlotColors,
    pub text: TextOptions,
    pub audio: AudioOptions,
    pub post_process: PostProcessOptions,
    pub timing: RevealTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub background: Color,
    pub ambient_color: Color,
    pub light_color: Color,
    pub light_intensity: f32,
    pub light_range: f32,
    pub light_position: [f32; 3],
    pub light_shadows: bool,
    pub shadow_map_size: u32,
    pub shadow_bias: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x0A_0E_10),
            ambient_color: Color::GRAY,
            light_color: Color::from_hex(0xFF_FF_FF),
            light_intensity: 200.0,
            light_range: 100.0,
            light_position: [3.04, 4.213, 4.948],
            light_shadows: true,
            shadow_map_size: 2048,
            shadow_bias: -0.0001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub position: [f32; 3],
    /// Euler angles (radians, XYZ order).
    pub rotation: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Render output keeps this width/height ratio by letterboxing.
    pub aspect_ratio: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [12.546, 4.350, 6.371],
            rotation: [-0.534, 1.037, 0.471],
            fov: 39.59,
            near: 0.1,
            far: 100.0,
            aspect_ratio: 4.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub present_model: String,
    pub effects_model: String,
    pub rays_model: String,
    pub box_texture: String,
    pub floor_texture: String,
    pub tag_texture: String,
    pub burst_texture: String,
    pub rays_texture: String,
    pub font: String,
    pub drop_sound: String,
    pub open_sound: String,
}

impl AssetPaths {
    /// Model paths in the order their loads are issued.
    #[must_use]
    pub fn models(&self) -> [&str; 3] {
        [
            self.present_model.as_str(),
            self.effects_model.as_str(),
            self.rays_model.as_str(),
        ]
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            present_model: "models/present.glb".to_string(),
            effects_model: "models/effects.glb".to_string(),
            rays_model: "models/rays.glb".to_string(),
            box_texture: "textures/wrap.webp".to_string(),
            floor_texture: "textures/floor.webp".to_string(),
            tag_texture: "textures/tag.webp".to_string(),
            burst_texture: "textures/sunburst.webp".to_string(),
            rays_texture: "textures/sunrays.webp".to_string(),
            font: "fonts/christmas_bell_regular.otf".to_string(),
            drop_sound: "audio/drop.ogg".to_string(),
            open_sound: "audio/open.ogg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotColors {
    pub outline: Color,
    pub ribbon: Color,
    pub lid: Color,
    pub inside: Color,
    pub effect: Color,
    pub beam: Color,
}

impl Default for SlotColors {
    fn default() -> Self {
        Self {
            outline: Color::from_hex(0x00_00_00),
            ribbon: Color::from_hex(0xFF_9C_00),
            lid: Color::from_hex(0x13_37_0A),
            inside: Color::from_hex(0xFF_FF_FF),
            effect: Color::from_hex(0xFF_C9_4A),
            beam: Color::from_hex(0xFF_C9_4A),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub font_size: f32,
    pub color: Color,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font_size: 0.5,
            color: Color::BLACK,
            position: [0.0, 0.01, -0.4],
            rotation: [-1.5708, 0.0, 1.5708],
            max_width: 2.5,
            max_height: 1.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    pub volume: f32,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomOptions {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
    pub exposure: f32,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            strength: 0.15,
            radius: 0.0,
            exposure: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessOptions {
    pub highlight_color: Color,
    pub bloom: BloomOptions,
    pub pixel_ratio: f32,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            highlight_color: Color::WHITE,
            bloom: BloomOptions::default(),
            pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    /// Seconds between "everything loaded" and the drop animation.
    pub reveal_delay: f32,
    /// Seconds for the canvas to fade from transparent to opaque.
    pub fade_in: f32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            reveal_delay: 1.0,
            fade_in: 1.0,
        }
    }
}

impl GiftConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GiftConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects values the widget cannot work with.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GiftError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        }

        positive("camera.aspect_ratio", self.camera.aspect_ratio)?;
        positive("camera.fov", self.camera.fov)?;
        positive("camera.near", self.camera.near)?;
        if self.camera.far <= self.camera.near {
            return Err(GiftError::InvalidConfig(format!(
                "camera.far ({}) must be greater than camera.near ({})",
                self.camera.far, self.camera.near
            )));
        }
        if self.camera.fov >= 180.0 {
            return Err(GiftError::InvalidConfig(format!(
                "camera.fov must be below 180 degrees, got {}",
                self.camera.fov
            )));
        }

        positive("text.font_size", self.text.font_size)?;
        positive("text.max_width", self.text.max_width)?;
        positive("text.max_height", self.text.max_height)?;
        positive("post_process.pixel_ratio", self.post_process.pixel_ratio)?;

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(GiftError::InvalidConfig(format!(
                "audio.volume must be within [0, 1], got {}",
                self.audio.volume
            )));
        }
        if self.timing.reveal_delay < 0.0 || self.timing.fade_in < 0.0 {
            return Err(GiftError::InvalidConfig(
                "timing values must not be negative".to_string(),
            ));
        }

        let models = self.assets.models();
        if models.iter().any(|p| p.is_empty()) {
            return Err(GiftError::InvalidConfig(
                "model paths must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
