//! The popup log box (mission text and similar).

use crate::hud::aspect::{scale_int, ScreenSize};
use crate::hud::draw::break_lines;
use crate::hud::render::{
    parse_font_color, Color, DrawCharArgs, HudFont, RenderSink, TextColor, TEXTCOLOR_ESCAPE,
};
use crate::hud::transform::{virtual_to_real_coords, HudRect, PixelRect};

/// Widest text line on large virtual screens.
const MAX_LINE_LEN: i32 = 560;

/// Placement of the log box in console-scaled virtual space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBox {
    pub hud_width: i32,
    pub hud_height: i32,
    pub lines: Vec<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl LogBox {
    pub fn layout(text: &str, font: &dyn HudFont, screen: ScreenSize, scale: i32) -> Self {
        let scale = scale.max(1);
        let hud_width = screen.width / scale;
        let hud_height = screen.height / scale;

        let line_len = if hud_width < 640 {
            scale_int(hud_width, 9, 10) - 40
        } else {
            MAX_LINE_LEN
        };
        let lines = break_lines(font, line_len, text);
        let height = 20 + lines.len() as i32 * (font.height() + 1);

        let (x, y, width) = if line_len < MAX_LINE_LEN {
            let x = hud_width / 20;
            (x, hud_height / 8, hud_width - 2 * x)
        } else {
            let y = (hud_height * 3 / 10 - (height >> 1)).max(0);
            ((hud_width >> 1) - 300, y, 600)
        };

        Self {
            hud_width,
            hud_height,
            lines,
            x,
            y,
            width,
            height,
        }
    }

    /// Background rectangle in real pixels.
    pub fn background(&self, screen: ScreenSize) -> PixelRect {
        PixelRect::new(
            scale_int(self.x, screen.width, self.hud_width),
            scale_int(self.y, screen.height, self.hud_height),
            scale_int(self.width, screen.width, self.hud_width),
            scale_int(self.height, screen.height, self.hud_height),
        )
    }
}

/// Draw the log box. Empty text draws nothing.
pub fn draw_log(
    text: &str,
    font: &dyn HudFont,
    screen: ScreenSize,
    scale: i32,
    sink: &mut dyn RenderSink,
) {
    if text.is_empty() {
        return;
    }
    let log = LogBox::layout(text, font, screen, scale);
    sink.dim(Color::new(0, 0, 0, 255), 0.5, log.background(screen));

    let x = log.x + 20;
    let mut y = log.y + 10;
    for line in &log.lines {
        draw_virtual_text(font, line, x, y, &log, screen, sink);
        y += font.height() + 1;
    }
}

fn draw_virtual_text(
    font: &dyn HudFont,
    text: &str,
    mut x: i32,
    y: i32,
    log: &LogBox,
    screen: ScreenSize,
    sink: &mut dyn RenderSink,
) {
    let mut color = TextColor::UNTRANSLATED;
    let mut bytes = text.bytes();
    while let Some(ch) = bytes.next() {
        if ch == b' ' {
            x += font.space_width();
            continue;
        }
        if ch == TEXTCOLOR_ESCAPE {
            if let Some(selector) = bytes.next() {
                let parsed = parse_font_color(selector, TextColor::UNTRANSLATED, TextColor::WHITE);
                if parsed != TextColor::UNDEFINED {
                    color = parsed;
                }
            }
            continue;
        }
        let Some(glyph) = font.glyph(ch) else {
            continue;
        };
        let rect = virtual_to_real_coords(
            HudRect::new(x as f64, y as f64, glyph.width, glyph.height),
            log.hud_width as f64,
            log.hud_height as f64,
            screen,
            false,
            true,
        );
        sink.draw_char(&DrawCharArgs {
            font: font.name().to_string(),
            ch,
            color,
            rect,
            alpha: 1.0,
            fill_color: None,
        });
        x += glyph.advance;
    }
}
