//! A text message that holds, then fades out.

use std::any::Any;
use std::rc::Rc;

use crate::hud::blend::TICRATE;
use crate::hud::message::{HudMessage, MessageFrame};
use crate::hud::render::{DrawCharArgs, HudFont, RenderSink, TextColor};
use crate::hud::transform::HudRect;

/// Centred text shown for `hold` seconds and faded out over `fade`.
///
/// `x` and `y` are fractions of the usable area; an `x` above 1 selects
/// the same fraction with every line centred on it (`1.5` is the classic
/// "centred" position).
pub struct FadeOutMessage {
    text: String,
    font: Rc<dyn HudFont>,
    x: f64,
    y: f64,
    color: TextColor,
    scale: i32,
    hold_tics: i32,
    fade_tics: i32,
    tics: i32,
}

impl FadeOutMessage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        font: Rc<dyn HudFont>,
        text: impl Into<String>,
        x: f64,
        y: f64,
        color: TextColor,
        hold: f64,
        fade: f64,
        scale: i32,
    ) -> Self {
        Self {
            text: text.into(),
            font,
            x,
            y,
            color,
            scale: scale.max(1),
            hold_tics: (hold * TICRATE as f64) as i32,
            fade_tics: ((fade * TICRATE as f64) as i32).max(1),
            tics: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> TextColor {
        self.color
    }

    pub fn tics(&self) -> i32 {
        self.tics
    }

    /// Opacity at the given fractional tick.
    pub fn alpha(&self, tic_frac: f64) -> f64 {
        let into_fade = self.tics as f64 + tic_frac - self.hold_tics as f64;
        if into_fade <= 0.0 {
            1.0
        } else {
            (1.0 - into_fade / self.fade_tics as f64).clamp(0.0, 1.0)
        }
    }
}

impl HudMessage for FadeOutMessage {
    fn tick(&mut self) -> bool {
        self.tics += 1;
        self.tics > self.hold_tics + self.fade_tics
    }

    fn draw(&self, frame: &MessageFrame, sink: &mut dyn RenderSink) {
        let alpha = self.alpha(frame.tic_frac);
        if alpha <= 0.0 {
            return;
        }
        let scale = self.scale as f64;
        let line_height = self.font.height() as f64 * scale;
        let lines: Vec<&str> = self.text.split('\n').collect();
        let block_height = line_height * lines.len() as f64;

        let (fx, center_lines) = if self.x > 1.0 {
            (self.x - 1.0, true)
        } else {
            (self.x, false)
        };
        let widest = lines
            .iter()
            .map(|l| self.font.string_width(l))
            .max()
            .unwrap_or(0) as f64
            * scale;
        let area_w = frame.screen.width as f64;
        let block_x = (area_w - widest) * fx;
        let mut y = ((frame.bottom as f64 - block_height) * self.y).floor();

        for line in lines {
            let line_width = self.font.string_width(line) as f64 * scale;
            let mut x = if center_lines {
                block_x + (widest - line_width) / 2.0
            } else {
                block_x
            };
            for ch in line.bytes() {
                if ch == b' ' {
                    x += self.font.space_width() as f64 * scale;
                    continue;
                }
                let Some(glyph) = self.font.glyph(ch) else {
                    continue;
                };
                sink.draw_char(&DrawCharArgs {
                    font: self.font.name().to_string(),
                    ch,
                    color: self.color,
                    rect: HudRect::new(x, y, glyph.width * scale, glyph.height * scale),
                    alpha,
                    fill_color: None,
                });
                x += glyph.advance as f64 * scale;
            }
            y += line_height;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::aspect::ScreenSize;
    use crate::hud::message::Visibility;
    use crate::hud::render::{Glyph, RecordingSink};

    struct Small;

    impl HudFont for Small {
        fn name(&self) -> &str {
            "small"
        }

        fn glyph(&self, _ch: u8) -> Option<Glyph> {
            Some(Glyph {
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

    fn message() -> FadeOutMessage {
        FadeOutMessage::new(Rc::new(Small), "ab", 1.5, 0.5, TextColor::GOLD, 2.0, 0.35, 1)
    }

    #[test]
    fn test_lifetime() {
        let mut msg = message();
        // 70 hold tics + 12 fade tics
        for _ in 0..82 {
            assert!(!msg.tick());
        }
        assert!(msg.tick());
    }

    #[test]
    fn test_alpha_fades_after_hold() {
        let mut msg = message();
        assert_eq!(msg.alpha(0.0), 1.0);
        for _ in 0..76 {
            msg.tick();
        }
        assert!((msg.alpha(0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_draw_centred() {
        let msg = message();
        let mut sink = RecordingSink::new();
        let frame = MessageFrame {
            bottom: 200,
            visibility: Visibility::default(),
            screen: ScreenSize::new(320, 200),
            tic_frac: 0.0,
        };
        msg.draw(&frame, &mut sink);
        let xs: Vec<f64> = sink.chars().map(|c| c.rect.x).collect();
        assert_eq!(xs, vec![152.0, 160.0]);
        assert!(sink.chars().all(|c| c.rect.y == 96.0 && c.color == TextColor::GOLD));
    }
}
