use serde::{Deserialize, Serialize};

/// An RGB colour with components in `[0, 1]`.
///
/// Parsed from `0xRRGGBB` integers or `"#RRGGBB"` strings in configuration
/// files, or written as a plain `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const GRAY: Color = Color::from_hex(0x80_80_80);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b }
    }

    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Text(String),
    Rgb([f32; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => Ok(Color::from_hex(hex)),
            ColorRepr::Rgb(rgb) => Ok(Color::from(rgb)),
            ColorRepr::Text(text) => {
                let digits = text
                    .strip_prefix('#')
                    .or_else(|| text.strip_prefix("0x"))
                    .unwrap_or(&text);
                if digits.len() != 6 {
                    return Err(format!("expected 6 hex digits in colour '{text}'"));
                }
                u32::from_str_radix(digits, 16)
                    .map(Color::from_hex)
                    .map_err(|e| format!("invalid colour '{text}': {e}"))
            }
        }
    }
}

impl From<Color> for ColorRepr {
    fn from(color: Color) -> Self {
        ColorRepr::Text(format!("#{:06X}", color.to_hex()))
    }
}
