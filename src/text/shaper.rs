use crate::assets::server::FontData;

/// Size of a laid-out text block, in the same units as the font size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
    pub lines: usize,
}

impl TextBounds {
    #[must_use]
    pub fn exceeds(&self, max_width: f32, max_height: f32) -> bool {
        self.width > max_width || self.height > max_height
    }
}

/// Measures text the way the renderer will draw it.
pub trait TextShaper {
    /// Lays out `text` at `font_size`, wrapping words at `max_width`.
    /// Explicit `\n` always breaks. A single word wider than `max_width`
    /// overflows its line rather than being split.
    fn layout(&self, text: &str, font_size: f32, max_width: f32) -> TextBounds;
}

/// Greedy word wrap over `advance` (per-character width at the target size).
/// Returns the width of every produced line.
fn wrap_lines(text: &str, max_width: f32, advance: impl Fn(char) -> f32) -> Vec<f32> {
    let measure = |s: &str| s.chars().map(&advance).sum::<f32>();
    let space = advance(' ');
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current: Option<f32> = None;
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let w = measure(word);
            current = Some(match current {
                Some(line) if line + space + w <= max_width => line + space + w,
                Some(line) => {
                    lines.push(line);
                    w
                }
                None => w,
            });
        }
        lines.push(current.unwrap_or(0.0));
    }

    lines
}

/// Fixed-advance metrics. Used when no font is available and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceShaper {
    /// Advance per character as a fraction of the font size.
    pub advance: f32,
    /// Line height as a fraction of the font size.
    pub line_height: f32,
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextShaper for MonospaceShaper {
    fn layout(&self, text: &str, font_size: f32, max_width: f32) -> TextBounds {
        let advance = self.advance * font_size;
        let lines = wrap_lines(text, max_width, |_| advance);
        TextBounds {
            width: lines.iter().copied().fold(0.0, f32::max),
            height: lines.len() as f32 * self.line_height * font_size,
            lines: lines.len(),
        }
    }
}

/// Glyph advances from a loaded font.
pub struct FontdueShaper {
    font: FontData,
}

/// Metrics are read at this pixel size and scaled, which keeps them free of
/// rounding at the small world-space sizes text is set in.
const REFERENCE_PX: f32 = 100.0;

impl FontdueShaper {
    #[must_use]
    pub fn new(font: FontData) -> Self {
        Self { font }
    }
}

impl TextShaper for FontdueShaper {
    fn layout(&self, text: &str, font_size: f32, max_width: f32) -> TextBounds {
        let font = &self.font.0;
        let scale = font_size / REFERENCE_PX;
        let lines = wrap_lines(text, max_width, |c| {
            font.metrics(c, REFERENCE_PX).advance_width * scale
        });
        let line_height = font
            .horizontal_line_metrics(REFERENCE_PX)
            .map_or(REFERENCE_PX * 1.2, |m| m.new_line_size)
            * scale;
        TextBounds {
            width: lines.iter().copied().fold(0.0, f32::max),
            height: lines.len() as f32 * line_height,
            lines: lines.len(),
        }
    }
}
