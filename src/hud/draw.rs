//! Drawing helpers used by status bar implementations.
//!
//! [`HudContext`] borrows the layout, the render sink and the texture
//! manager for the duration of one draw pass. Every helper routes logical
//! coordinates through the layout's transformer before emitting commands.

use crate::hud::error::{HudError, HudResult};
use crate::hud::layout::HudLayout;
use crate::hud::render::{
    parse_font_color, Color, DrawCharArgs, DrawTextureArgs, HudFont, RenderSink, TextColor,
    TextureId, TextureManager, TEXTCOLOR_ESCAPE,
};
use crate::hud::scale::Vec2;
use crate::hud::transform::{DrawFlags, DrawMode, HudRect, PixelRect};

/// Opacity of drop shadows relative to the text.
pub const SHADOW_ALPHA: f64 = 0x6800 as f64 / 65536.0;

/// Overlay applied by [`DrawFlags::DIM`].
pub const DIM_OVERLAY: Color = Color::new(0, 0, 0, 170);

/// Text rendering parameters of a HUD font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: TextColor,
    pub alpha: f64,
    /// Extra advance between characters; the full cell width when monospaced.
    pub spacing: i32,
    pub monospaced: bool,
    pub shadow_x: i32,
    pub shadow_y: i32,
    /// Break lines wider than this many units; 0 disables wrapping.
    pub wrap_width: i32,
    pub line_spacing: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: TextColor::UNTRANSLATED,
            alpha: 1.0,
            spacing: 0,
            monospaced: false,
            shadow_x: 0,
            shadow_y: 0,
            wrap_width: 0,
            line_spacing: 0,
        }
    }
}

/// Box fitting and scaling of a graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicStyle {
    pub alpha: f64,
    /// Fit into this box; non-positive components are unconstrained.
    pub box_size: Vec2,
    pub scale: Vec2,
}

impl Default for GraphicStyle {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            box_size: Vec2::new(-1.0, -1.0),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

/// Borrowed drawing state for one pass.
pub struct HudContext<'a> {
    pub layout: &'a mut HudLayout,
    pub sink: &'a mut dyn RenderSink,
    pub textures: &'a dyn TextureManager,
    /// Player color translation used with [`DrawFlags::TRANSLATABLE`].
    pub translation: u32,
    in_pass: bool,
}

impl<'a> HudContext<'a> {
    pub fn new(
        layout: &'a mut HudLayout,
        sink: &'a mut dyn RenderSink,
        textures: &'a dyn TextureManager,
    ) -> Self {
        Self {
            layout,
            sink,
            textures,
            translation: 0,
            in_pass: true,
        }
    }

    /// A context that rejects string drawing.
    pub fn outside_pass(mut self) -> Self {
        self.in_pass = false;
        self
    }

    pub fn in_pass(&self) -> bool {
        self.in_pass
    }

    // ==========================================================================
    // Pass control
    // ==========================================================================

    pub fn begin_statusbar(&mut self, res_w: i32, res_h: i32, rel_top: i32, forced: bool) {
        self.layout.begin_statusbar(res_w, res_h, rel_top, forced);
    }

    pub fn begin_hud(&mut self, res_w: i32, res_h: i32, alpha: f64, forced: bool) {
        self.layout.begin_hud(res_w, res_h, alpha, forced);
    }

    // ==========================================================================
    // Graphics
    // ==========================================================================

    /// Draw a texture by name; unknown names draw nothing.
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, flags: DrawFlags, style: &GraphicStyle) {
        if let Some(texture) = self.textures.find(name) {
            self.draw_graphic(texture, x, y, flags, style);
        }
    }

    /// Draw a texture at a logical position.
    pub fn draw_graphic(
        &mut self,
        texture: TextureId,
        x: f64,
        y: f64,
        flags: DrawFlags,
        style: &GraphicStyle,
    ) {
        let Some(info) = self.textures.info(texture) else {
            return;
        };
        let texwidth = info.width * style.scale.x;
        let texheight = info.height * style.scale.y;
        let (mut boxwidth, mut boxheight) = (style.box_size.x, style.box_size.y);

        if boxwidth > 0.0 || boxheight > 0.0 {
            if !flags.intersects(DrawFlags::FORCEFILL) {
                let force = flags.intersects(DrawFlags::FORCESCALE);
                let mut scale1 = 1.0;
                let mut scale2 = 1.0;
                if boxwidth > 0.0 && (boxwidth < texwidth || force) {
                    scale1 = boxwidth / texwidth;
                }
                if boxheight != -1.0 && (boxheight < texheight || force) {
                    scale2 = boxheight / texheight;
                }
                if force {
                    if boxwidth <= 0.0 || (boxheight > 0.0 && scale2 < scale1) {
                        scale1 = scale2;
                    }
                } else {
                    scale1 = f64::min(scale1, scale2);
                }
                boxwidth = texwidth * scale1;
                boxheight = texheight * scale1;
            }
        } else {
            boxwidth = texwidth;
            boxheight = texheight;
        }

        let flags = flags.resolve_auto(x, y);
        let alpha = style.alpha * self.layout.alpha();
        if alpha <= 0.0 {
            return;
        }

        let mut x = x;
        let mut y = y;
        match flags.masked(DrawFlags::ITEM_HMASK) {
            DrawFlags::ITEM_HCENTER => x -= boxwidth / 2.0,
            DrawFlags::ITEM_RIGHT => x -= boxwidth,
            DrawFlags::ITEM_HOFFSET if texwidth != 0.0 => {
                x -= info.left_offset * boxwidth / texwidth;
            }
            _ => {}
        }
        match flags.masked(DrawFlags::ITEM_VMASK) {
            DrawFlags::ITEM_VCENTER => y -= boxheight / 2.0,
            DrawFlags::ITEM_BOTTOM => y -= boxheight,
            DrawFlags::ITEM_VOFFSET if texheight != 0.0 => {
                y -= info.top_offset * boxheight / texheight;
            }
            _ => {}
        }

        let rect = self
            .layout
            .transform_rect(HudRect::new(x, y, boxwidth, boxheight), flags);
        let alpha_mapped = flags.intersects(DrawFlags::ALPHAMAPPED);
        self.sink.draw_texture(&DrawTextureArgs {
            texture,
            rect,
            translation: if flags.intersects(DrawFlags::TRANSLATABLE) {
                self.translation
            } else {
                0
            },
            color_overlay: flags.intersects(DrawFlags::DIM).then_some(DIM_OVERLAY),
            alpha,
            alpha_channel: alpha_mapped,
            fill_color: alpha_mapped.then_some(Color::new(0, 0, 0, 255)),
            flip_x: flags.intersects(DrawFlags::MIRROR),
        });
    }

    // ==========================================================================
    // Text
    // ==========================================================================

    /// Draw a string, wrapping it when `style.wrap_width` is positive.
    ///
    /// Drawing without a font or outside a draw pass is a contract violation.
    pub fn draw_string(
        &mut self,
        font: Option<&dyn HudFont>,
        text: &str,
        x: f64,
        y: f64,
        flags: DrawFlags,
        style: &TextStyle,
    ) -> HudResult<()> {
        let font = font.ok_or(HudError::MissingFont)?;
        if !self.in_pass {
            return Err(HudError::DrawOutsidePass);
        }

        let flags = flags.resolve_auto(x, y);
        if style.wrap_width > 0 {
            let mut y = y;
            for line in break_lines(font, style.wrap_width, text) {
                self.draw_line(font, &line, x, y, flags, style);
                y += (font.height() + style.line_spacing) as f64;
            }
        } else {
            self.draw_line(font, text, x, y, flags, style);
        }
        Ok(())
    }

    fn draw_line(
        &mut self,
        font: &dyn HudFont,
        text: &str,
        mut x: f64,
        y: f64,
        flags: DrawFlags,
        style: &TextStyle,
    ) {
        let len = text.len() as i32;
        let spacing = style.spacing;
        let width = if style.monospaced {
            spacing * len
        } else {
            font.string_width(text) + spacing * len
        };
        match flags.masked(DrawFlags::TEXT_ALIGN) {
            DrawFlags::TEXT_ALIGN_RIGHT => x -= width as f64,
            DrawFlags::TEXT_ALIGN_CENTER => x -= (width / 2) as f64,
            _ => {}
        }

        let (mut shadow_x, mut shadow_y) = (style.shadow_x, style.shadow_y);
        if self.layout.draw_mode() == DrawMode::FullscreenHudPass {
            let scale = self.layout.hud_scale();
            shadow_x *= scale.x as i32;
            shadow_y *= scale.y as i32;
        }
        let draw_shadow = (shadow_x != 0 || shadow_y != 0) && !flags.intersects(DrawFlags::NOSHADOW);

        let bold = if style.color.0 != 0 {
            TextColor(style.color.0 - 1)
        } else {
            TextColor(TextColor::COUNT - 1)
        };
        let mut color = style.color;
        let mut bytes = text.bytes();
        while let Some(ch) = bytes.next() {
            if ch == b' ' {
                x += if style.monospaced {
                    spacing
                } else {
                    font.space_width() + spacing
                } as f64;
                continue;
            }
            if ch == TEXTCOLOR_ESCAPE {
                if let Some(selector) = bytes.next() {
                    let parsed = parse_font_color(selector, style.color, bold);
                    if parsed != TextColor::UNDEFINED {
                        color = parsed;
                    }
                }
                continue;
            }
            let Some(glyph) = font.glyph(ch) else {
                continue;
            };

            if !style.monospaced {
                x += (glyph.left_offset + 1) as f64;
            }
            let rect = self
                .layout
                .transform_rect(HudRect::new(x, y, glyph.width, glyph.height), flags);

            if draw_shadow {
                self.sink.draw_char(&DrawCharArgs {
                    font: font.name().to_string(),
                    ch,
                    color: TextColor::UNTRANSLATED,
                    rect: HudRect::new(
                        rect.x + shadow_x as f64,
                        rect.y + shadow_y as f64,
                        rect.w,
                        rect.h,
                    ),
                    alpha: style.alpha * SHADOW_ALPHA,
                    fill_color: Some(Color::new(0, 0, 0, 255)),
                });
            }
            self.sink.draw_char(&DrawCharArgs {
                font: font.name().to_string(),
                ch,
                color,
                rect,
                alpha: style.alpha,
                fill_color: None,
            });

            x += if style.monospaced {
                spacing
            } else {
                glyph.advance + spacing - (glyph.left_offset + 1)
            } as f64;
        }
    }

    // ==========================================================================
    // Fills and clipping
    // ==========================================================================

    /// Dim a logical rectangle with `color`; its alpha is combined with the
    /// pass alpha.
    pub fn fill(&mut self, color: Color, x: f64, y: f64, w: f64, h: f64, flags: DrawFlags) {
        let alpha = color.a as f64 * self.layout.alpha() / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let rect = self.layout.transform_rect(HudRect::new(x, y, w, h), flags);
        self.sink.dim(color, alpha, PixelRect::from_real(rect));
    }

    pub fn set_clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64, flags: DrawFlags) {
        let rect = self.layout.transform_rect(HudRect::new(x, y, w, h), flags);
        self.sink.set_clip_rect(PixelRect::from_real(rect));
    }

    pub fn clear_clip_rect(&mut self) {
        self.sink.clear_clip_rect();
    }
}

/// Greedy word wrap by font width.
///
/// Newlines force a break. Color escapes are kept with their line and have
/// no width; a word wider than `max_width` gets a line of its own.
pub fn break_lines(font: &dyn HudFont, max_width: i32, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = visible_width(font, word);
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
                continue;
            }
            let candidate = line_width + font.space_width() + word_width;
            if candidate > max_width {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            } else {
                line.push(' ');
                line.push_str(word);
                line_width = candidate;
            }
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn visible_width(font: &dyn HudFont, word: &str) -> i32 {
    let mut width = 0;
    let mut bytes = word.bytes();
    while let Some(ch) = bytes.next() {
        if ch == TEXTCOLOR_ESCAPE {
            bytes.next();
            continue;
        }
        width += font.glyph(ch).map(|g| g.advance).unwrap_or(0);
    }
    width
}
