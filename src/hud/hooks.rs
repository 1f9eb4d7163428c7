//! Overridable status bar behavior.
//!
//! A concrete status bar style implements [`StatusBarHooks`]. Every method
//! has a default, so [`BaseHooks`] is the plain status bar. Draw hooks get a
//! [`DrawFrame`] that exposes the drawing helpers and the generic pieces
//! (background refresh, crosshair) without handing out the status bar.

use crate::config::HudConfig;
use crate::hud::aspect::ScreenSize;
use crate::hud::crosshair::CrosshairState;
use crate::hud::draw::HudContext;
use crate::hud::error::HudResult;
use crate::hud::status_bar::{FrameState, PlayerInfo};

/// Which HUD is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudState {
    StatusBar,
    Fullscreen,
    None,
    /// Alternative HUD; the status bar only draws popups.
    AltHud,
}

/// Everything a draw hook works with during one pass.
pub struct DrawFrame<'a> {
    pub ctx: HudContext<'a>,
    pub crosshair: &'a mut CrosshairState,
    pub config: &'a HudConfig,
    pub frame: &'a FrameState,
}

impl DrawFrame<'_> {
    /// Redraw the view border around a statusbar narrower than the screen.
    pub fn refresh_background(&mut self) {
        let layout = &*self.ctx.layout;
        let screen = layout.screen();
        let (width, height) = (screen.width, screen.height);
        let y = layout.top_of_statusbar();
        let complete = layout.complete_border();
        let mut x = layout.scale_state().origin_x;

        let sink = &mut *self.ctx.sink;
        if !complete {
            if y < height {
                sink.draw_border(x + 1, y, width, y + 1);
                sink.draw_border(x + 1, height - 1, width, height);
            }
        } else {
            x = width;
        }

        if x > 0 {
            let x2 = if complete {
                width
            } else {
                width - layout.scale_state().origin_x
            };
            sink.draw_border(0, y, x + 1, height);
            sink.draw_border(x2 - 1, y, width, height);
        }
    }

    /// Draw the crosshair for the current view.
    pub fn draw_crosshair(&mut self) {
        let screen = self.ctx.layout.screen();
        self.crosshair.draw(
            &self.config.crosshair,
            &self.frame.crosshair,
            screen,
            self.ctx.textures,
            &mut *self.ctx.sink,
        );
    }
}

/// The generic frame: background, position readout, then either the
/// crosshair (3D view) or the automap HUD.
pub fn draw_base<H: StatusBarHooks + ?Sized>(
    hooks: &mut H,
    frame: &mut DrawFrame<'_>,
    state: HudState,
    tic_frac: f64,
) -> HudResult<()> {
    if state == HudState::AltHud {
        return Ok(());
    }
    if state == HudState::StatusBar {
        frame.refresh_background();
    }
    if frame.config.idmypos {
        hooks.draw_my_pos(frame)?;
    }
    if frame.frame.view_active {
        if frame.frame.camera_is_player {
            frame.draw_crosshair();
        }
    } else if frame.frame.automap_active {
        hooks.draw_automap_hud(frame, tic_frac)?;
    }
    Ok(())
}

/// Per-style status bar behavior.
pub trait StatusBarHooks {
    fn init(&mut self) {}

    /// Runs once per game tick after messages and timers advanced.
    fn tick(&mut self) {}

    /// Draw the status bar for `state`.
    fn draw(&mut self, frame: &mut DrawFrame<'_>, state: HudState, tic_frac: f64) -> HudResult<()> {
        draw_base(self, frame, state, tic_frac)
    }

    fn draw_automap_hud(&mut self, _frame: &mut DrawFrame<'_>, _tic_frac: f64) -> HudResult<()> {
        Ok(())
    }

    /// Position readout for `idmypos`.
    fn draw_my_pos(&mut self, _frame: &mut DrawFrame<'_>) -> HudResult<()> {
        Ok(())
    }

    /// Powerup icons; always drawn with fullscreen placement.
    fn draw_powerups(&mut self, _frame: &mut DrawFrame<'_>) -> HudResult<()> {
        Ok(())
    }

    fn must_draw_log(&self, _state: HudState) -> bool {
        true
    }

    fn set_mugshot_state(&mut self, _state_name: &str, _wait_till_done: bool, _reset: bool) {}

    fn new_game(&mut self) {}

    fn attach_to_player(&mut self, _player: &PlayerInfo) {}

    fn screen_size_changed(&mut self, _screen: ScreenSize) {}

    fn show_pop(&mut self, _pop: i32) {}
}

/// The plain status bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseHooks;

impl StatusBarHooks for BaseHooks {}

/// Secondary overlay HUD owned by the status bar.
pub trait AltHud {
    fn draw(&mut self, ctx: &mut HudContext<'_>, tic_frac: f64) -> HudResult<()>;
}
