use rustc_hash::FxHashMap;

use crate::config::{AssetPaths, SlotColors};
use crate::resources::color::Color;
use crate::resources::texture::Texture;
use crate::scene::{MaterialHandle, Scene, TextureHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit.
    Basic,
    /// Cel-shaded.
    Toon,
    /// As it came out of the model file.
    Authored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Authoring name; slot lookup keys off this.
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub map: Option<TextureHandle>,
    pub transparent: bool,
    pub opacity: f32,
    pub side: Side,
    /// Face used when rendering into the shadow map. `None` follows `side`.
    pub shadow_side: Option<Side>,
    disposed: bool,
}

impl Material {
    fn with_kind(kind: MaterialKind, name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color,
            map: None,
            transparent: false,
            opacity: 1.0,
            side: Side::Front,
            shadow_side: None,
            disposed: false,
        }
    }

    #[must_use]
    pub fn basic(color: Color) -> Self {
        Self::with_kind(MaterialKind::Basic, "", color)
    }

    #[must_use]
    pub fn toon(color: Color) -> Self {
        Self::with_kind(MaterialKind::Toon, "", color)
    }

    #[must_use]
    pub fn authored(name: &str, color: Color) -> Self {
        Self::with_kind(MaterialKind::Authored, name, color)
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }

    /// Marks the material transparent at `opacity`.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    /// Releases the GPU-side resources. The slot stays so handles remain
    /// valid, but renderers must skip disposed materials.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.map = None;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Semantic material categories, resolved once from the authoring name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    Effect,
    BeamEffect,
    Ribbon,
    LidTop,
    BoxWrap,
    BoxInside,
    Outline,
    Floor,
    Tag,
    Sunburst,
    Sunrays,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 11] = [
        MaterialSlot::Effect,
        MaterialSlot::BeamEffect,
        MaterialSlot::Ribbon,
        MaterialSlot::LidTop,
        MaterialSlot::BoxWrap,
        MaterialSlot::BoxInside,
        MaterialSlot::Outline,
        MaterialSlot::Floor,
        MaterialSlot::Tag,
        MaterialSlot::Sunburst,
        MaterialSlot::Sunrays,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Effect" => Self::Effect,
            "BeamEffect" => Self::BeamEffect,
            "Ribbon" => Self::Ribbon,
            "Box Wrapping Top" => Self::LidTop,
            "Box Wrapping" => Self::BoxWrap,
            "Box Inside" => Self::BoxInside,
            "Outline" => Self::Outline,
            "Floor" => Self::Floor,
            "Tag" => Self::Tag,
            "Sunburst" => Self::Sunburst,
            "Sunrays" => Self::Sunrays,
            _ => return None,
        })
    }

    /// The authoring name this slot is matched against.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Effect => "Effect",
            Self::BeamEffect => "BeamEffect",
            Self::Ribbon => "Ribbon",
            Self::LidTop => "Box Wrapping Top",
            Self::BoxWrap => "Box Wrapping",
            Self::BoxInside => "Box Inside",
            Self::Outline => "Outline",
            Self::Floor => "Floor",
            Self::Tag => "Tag",
            Self::Sunburst => "Sunburst",
            Self::Sunrays => "Sunrays",
        }
    }

    /// Solid parts of the present: outlined and shadowed.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Ribbon | Self::LidTop | Self::BoxWrap | Self::BoxInside
        )
    }
}

/// Shared replacement materials, one per slot.
///
/// Built once per scene. Textures are registered as pending so materials can
/// reference them before decoding finishes; [`MaterialRegistry::textures`]
/// lists what still has to be loaded.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    slots: FxHashMap<MaterialSlot, MaterialHandle>,
    textures: Vec<(String, TextureHandle)>,
}

impl MaterialRegistry {
    pub fn build(scene: &mut Scene, colors: &SlotColors, paths: &AssetPaths) -> Self {
        let mut registry = Self::default();

        let box_tex = registry.texture(scene, Texture::pending(&paths.box_texture).with_repeat(3.0, 3.0));
        let floor_tex = registry.texture(
            scene,
            Texture::pending(&paths.floor_texture).with_premultiplied_alpha(),
        );
        let tag_tex = registry.texture(scene, Texture::pending(&paths.tag_texture));
        let burst_tex = registry.texture(scene, Texture::pending(&paths.burst_texture));
        let rays_tex = registry.texture(scene, Texture::pending(&paths.rays_texture));

        for slot in MaterialSlot::ALL {
            let material = match slot {
                MaterialSlot::Effect => Material::basic(colors.effect).with_opacity(0.7),
                MaterialSlot::BeamEffect => Material::basic(colors.beam),
                MaterialSlot::Ribbon => Material::toon(colors.ribbon),
                MaterialSlot::LidTop => Material::toon(colors.lid),
                MaterialSlot::BoxWrap => Material::toon(Color::WHITE).with_map(box_tex),
                MaterialSlot::BoxInside => Material::basic(colors.inside),
                MaterialSlot::Outline => Material::basic(colors.outline),
                MaterialSlot::Floor => Material::toon(Color::WHITE)
                    .with_map(floor_tex)
                    .with_opacity(0.9),
                MaterialSlot::Tag => Material::basic(Color::WHITE).with_map(tag_tex),
                MaterialSlot::Sunburst => Material::basic(Color::WHITE)
                    .with_map(burst_tex)
                    .with_opacity(0.25),
                MaterialSlot::Sunrays => Material::basic(Color::WHITE)
                    .with_map(rays_tex)
                    .with_opacity(0.25),
            };
            let handle = scene.add_material(material.with_name(slot.name()));
            registry.slots.insert(slot, handle);
        }

        registry
    }

    fn texture(&mut self, scene: &mut Scene, texture: Texture) -> TextureHandle {
        let path = texture.path.clone();
        let handle = scene.add_texture(texture);
        self.textures.push((path, handle));
        handle
    }

    #[must_use]
    pub fn get(&self, slot: MaterialSlot) -> Option<MaterialHandle> {
        self.slots.get(&slot).copied()
    }

    /// Texture paths with the slot each decode should fill.
    #[must_use]
    pub fn textures(&self) -> &[(String, TextureHandle)] {
        &self.textures
    }

    /// Texture slot waiting on `path`.
    #[must_use]
    pub fn texture_for_path(&self, path: &str) -> Option<TextureHandle> {
        self.textures
            .iter()
            .find(|(p, _)| p == path)
            .map(|&(_, handle)| handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_round_trip() {
        for slot in MaterialSlot::ALL {
            assert_eq!(MaterialSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(MaterialSlot::from_name("Box"), None);
    }
}
