//! Render sink and art collaborators.
//!
//! The status bar never rasterizes anything itself. Every draw call ends up
//! as a command on a [`RenderSink`] in real screen pixels; textures and fonts
//! are looked up through [`TextureManager`] and [`HudFont`].

use crate::hud::blend::BlendColor;
use crate::hud::transform::{HudRect, PixelRect};

// ==============================================================================
// Basic Types
// ==============================================================================

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build from a packed `0xRRGGBB` value, fully opaque.
    pub const fn from_rgb24(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 255,
        }
    }

    pub const fn to_rgb24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Type-safe texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Scaled dimensions and offsets of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureInfo {
    pub width: f64,
    pub height: f64,
    pub left_offset: f64,
    pub top_offset: f64,
}

/// Text color range index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextColor(pub i32);

impl TextColor {
    pub const UNDEFINED: Self = Self(-1);
    pub const BRICK: Self = Self(0);
    pub const TAN: Self = Self(1);
    pub const GRAY: Self = Self(2);
    pub const GREEN: Self = Self(3);
    pub const BROWN: Self = Self(4);
    pub const GOLD: Self = Self(5);
    pub const RED: Self = Self(6);
    pub const BLUE: Self = Self(7);
    pub const ORANGE: Self = Self(8);
    pub const WHITE: Self = Self(9);
    pub const YELLOW: Self = Self(10);
    pub const UNTRANSLATED: Self = Self(11);
    pub const TEAL: Self = Self(25);

    pub const COUNT: i32 = 26;
}

impl Default for TextColor {
    fn default() -> Self {
        Self::UNTRANSLATED
    }
}

/// Starts an inline color change in HUD strings.
pub const TEXTCOLOR_ESCAPE: u8 = 0x1c;

/// Parse the color selector following [`TEXTCOLOR_ESCAPE`].
///
/// Letters select a range directly, `-` restores `default`, `+` selects
/// `bold`. Anything else yields [`TextColor::UNDEFINED`].
pub fn parse_font_color(selector: u8, default: TextColor, bold: TextColor) -> TextColor {
    match selector {
        b'A'..=b'Z' => TextColor((selector - b'A') as i32),
        b'a'..=b'z' => TextColor((selector - b'a') as i32),
        b'-' => default,
        b'+' => bold,
        _ => TextColor::UNDEFINED,
    }
}

/// One glyph of a HUD font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Horizontal advance in logical units.
    pub advance: i32,
    pub left_offset: i32,
    pub width: f64,
    pub height: f64,
}

// ==============================================================================
// Collaborator Traits
// ==============================================================================

/// Texture lookup.
pub trait TextureManager {
    /// Find a texture by its short name.
    fn find(&self, name: &str) -> Option<TextureId>;

    fn info(&self, texture: TextureId) -> Option<TextureInfo>;
}

/// Font metrics for HUD text.
pub trait HudFont {
    fn name(&self) -> &str;

    /// `None` for characters the font does not have.
    fn glyph(&self, ch: u8) -> Option<Glyph>;

    fn space_width(&self) -> i32;

    fn height(&self) -> i32;

    fn string_width(&self, text: &str) -> i32 {
        text.bytes()
            .map(|ch| {
                if ch == b' ' {
                    self.space_width()
                } else {
                    self.glyph(ch).map(|g| g.advance).unwrap_or(0)
                }
            })
            .sum()
    }
}

/// Parameters for a texture draw in real pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTextureArgs {
    pub texture: TextureId,
    pub rect: HudRect,
    pub translation: u32,
    pub color_overlay: Option<Color>,
    pub alpha: f64,
    pub alpha_channel: bool,
    /// Draw as a silhouette of this color.
    pub fill_color: Option<Color>,
    pub flip_x: bool,
}

/// Parameters for a single-character draw in real pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCharArgs {
    pub font: String,
    pub ch: u8,
    pub color: TextColor,
    pub rect: HudRect,
    pub alpha: f64,
    pub fill_color: Option<Color>,
}

/// Destination for everything the HUD draws.
pub trait RenderSink {
    fn draw_texture(&mut self, args: &DrawTextureArgs);

    fn draw_char(&mut self, args: &DrawCharArgs);

    /// Blend a solid color over a rectangle.
    fn dim(&mut self, color: Color, alpha: f64, rect: PixelRect);

    fn set_clip_rect(&mut self, rect: PixelRect);

    fn clear_clip_rect(&mut self);

    /// Refresh the view border in the given area.
    fn draw_border(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Hand the final screen blend to the renderer.
    fn set_blend(&mut self, blend: BlendColor);
}

// ==============================================================================
// Recording Sink
// ==============================================================================

/// A recorded render command.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Texture(DrawTextureArgs),
    Char(DrawCharArgs),
    Dim {
        color: Color,
        alpha: f64,
        rect: PixelRect,
    },
    SetClipRect(PixelRect),
    ClearClipRect,
    Border {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    },
    Blend(BlendColor),
}

/// Sink that stores commands in submission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<RenderCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn textures(&self) -> impl Iterator<Item = &DrawTextureArgs> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Texture(args) => Some(args),
            _ => None,
        })
    }

    pub fn chars(&self) -> impl Iterator<Item = &DrawCharArgs> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Char(args) => Some(args),
            _ => None,
        })
    }
}

impl RenderSink for RecordingSink {
    fn draw_texture(&mut self, args: &DrawTextureArgs) {
        self.commands.push(RenderCommand::Texture(*args));
    }

    fn draw_char(&mut self, args: &DrawCharArgs) {
        self.commands.push(RenderCommand::Char(args.clone()));
    }

    fn dim(&mut self, color: Color, alpha: f64, rect: PixelRect) {
        self.commands.push(RenderCommand::Dim { color, alpha, rect });
    }

    fn set_clip_rect(&mut self, rect: PixelRect) {
        self.commands.push(RenderCommand::SetClipRect(rect));
    }

    fn clear_clip_rect(&mut self) {
        self.commands.push(RenderCommand::ClearClipRect);
    }

    fn draw_border(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.commands.push(RenderCommand::Border { x1, y1, x2, y2 });
    }

    fn set_blend(&mut self, blend: BlendColor) {
        self.commands.push(RenderCommand::Blend(blend));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFont;

    impl HudFont for FixedFont {
        fn name(&self) -> &str {
            "fixed"
        }

        fn glyph(&self, ch: u8) -> Option<Glyph> {
            ch.is_ascii_alphanumeric().then_some(Glyph {
                advance: 8,
                left_offset: 0,
                width: 8.0,
                height: 8.0,
            })
        }

        fn space_width(&self) -> i32 {
            4
        }

        fn height(&self) -> i32 {
            8
        }
    }

    #[test]
    fn test_color_packing() {
        let c = Color::from_rgb24(0xff8000);
        assert_eq!(c, Color::rgb(255, 128, 0));
        assert_eq!(c.to_rgb24(), 0xff8000);
    }

    #[test]
    fn test_parse_font_color() {
        let default = TextColor::GOLD;
        let bold = TextColor::WHITE;
        assert_eq!(parse_font_color(b'A', default, bold), TextColor::BRICK);
        assert_eq!(parse_font_color(b'd', default, bold), TextColor::GREEN);
        assert_eq!(parse_font_color(b'Z', default, bold), TextColor::TEAL);
        assert_eq!(parse_font_color(b'-', default, bold), default);
        assert_eq!(parse_font_color(b'+', default, bold), bold);
        assert_eq!(parse_font_color(b'!', default, bold), TextColor::UNDEFINED);
    }

    #[test]
    fn test_default_string_width_skips_missing_glyphs() {
        assert_eq!(FixedFont.string_width("ab c"), 20);
        assert_eq!(FixedFont.string_width("a?"), 8);
    }

    #[test]
    fn test_recording_sink_order() {
        let mut sink = RecordingSink::new();
        sink.set_clip_rect(PixelRect::new(0, 0, 10, 10));
        sink.dim(Color::rgb(0, 0, 0), 0.5, PixelRect::new(1, 1, 2, 2));
        sink.clear_clip_rect();
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.commands()[2], RenderCommand::ClearClipRect);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.is_empty());
    }
}
