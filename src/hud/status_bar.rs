//! The status bar: frame orchestration over the layout, the message queue,
//! the crosshair and the per-style hooks.
//!
//! A frame is drawn in this order by the caller:
//!
//! 1. [`StatusBar::draw_bottom_stuff`] (messages under the HUD)
//! 2. [`StatusBar::call_draw`] (the status bar or fullscreen HUD itself)
//! 3. [`StatusBar::draw_alt_hud`] when the alternative HUD is active
//! 4. [`StatusBar::draw_top_stuff`] (powerups, messages, popup log)
//!
//! [`StatusBar::tick`] runs once per game tick independently of drawing.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::config::{ConfigError, HudConfig};
use crate::hud::aspect::{con_scale, ui_scale, ScreenSize};
use crate::hud::blend::{
    compose_view_blend, BlendColor, EnvironmentBlend, PlayerBlendState, ViewBlendInputs,
};
use crate::hud::crosshair::{CrosshairState, CrosshairView, XHAIR_PICKUP_SIZE};
use crate::hud::draw::HudContext;
use crate::hud::error::{HudError, HudResult};
use crate::hud::fade_message::FadeOutMessage;
use crate::hud::format::{format_map_name, MapLabel};
use crate::hud::hooks::{AltHud, BaseHooks, DrawFrame, HudState, StatusBarHooks};
use crate::hud::layout::HudLayout;
use crate::hud::message::{
    make_id, HudMessage, MessageFrame, MessageHandle, MessageLayer, MessageQueue, Visibility,
};
use crate::hud::popup_log::draw_log;
use crate::hud::render::{Color, HudFont, RenderSink, TextColor, TextureManager};

/// Id of the player name message.
pub const PLAYER_NAME_ID: u32 = make_id(b"PNAM");

/// Ticks the artifact flash lasts.
pub const ARTIFLASH_TICS: i32 = 4;

/// Default tint of the pickup flash.
pub const DEFAULT_PICKUP_COLOR: Color = Color::rgb(0xd6, 0xba, 0x45);

/// The player the status bar is attached to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerInfo {
    pub name: String,
    pub is_console_player: bool,
    /// Popup log text; empty when there is none.
    pub log_text: String,
    /// Color translation for translatable graphics.
    pub translation: u32,
    pub blend: PlayerBlendState,
}

/// What the renderer is showing this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// A first-person 3D view is on screen.
    pub view_active: bool,
    pub automap_active: bool,
    /// The camera is a player (as opposed to a security camera or similar).
    pub camera_is_player: bool,
    pub crosshair: CrosshairView,
    pub tic_frac: f64,
}

impl FrameState {
    pub fn visibility(&self) -> Visibility {
        Visibility::for_view(self.view_active, self.automap_active)
    }
}

/// Renderer state that decides the view blend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewEnvironment {
    pub blend: EnvironmentBlend,
    /// Hardware 2D acceleration; the direct player blend always applies.
    pub accel_2d: bool,
    pub camera_present: bool,
    pub menu_active: bool,
    pub console_up: bool,
}

impl ViewEnvironment {
    /// Whether nothing covers the view, so the player's own blend shows.
    pub fn direct_visible(&self) -> bool {
        self.accel_2d || (self.camera_present && !self.menu_active && self.console_up)
    }
}

/// Status bar for one player.
pub struct StatusBar {
    layout: HudLayout,
    config: HudConfig,
    messages: MessageQueue,
    crosshair: CrosshairState,
    hooks: Box<dyn StatusBarHooks>,
    alt_hud: Option<Box<dyn AltHud>>,
    player: Option<PlayerInfo>,
    small_font: Option<Rc<dyn HudFont>>,
    show_log: bool,
    artiflash: i32,
    itemflash: f64,
    pickup_color: Color,
}

impl fmt::Debug for StatusBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusBar")
            .field("layout", &self.layout)
            .field("messages", &self.messages)
            .field("crosshair", &self.crosshair)
            .field("alt_hud", &self.alt_hud.is_some())
            .field("player", &self.player)
            .field("show_log", &self.show_log)
            .field("artiflash", &self.artiflash)
            .field("itemflash", &self.itemflash)
            .finish()
    }
}

impl StatusBar {
    /// Status bar with the plain hooks.
    pub fn new(screen: ScreenSize, config: HudConfig) -> Self {
        Self::with_hooks(screen, config, Box::new(BaseHooks))
    }

    pub fn with_hooks(screen: ScreenSize, config: HudConfig, hooks: Box<dyn StatusBarHooks>) -> Self {
        let mut layout = HudLayout::new(screen, config.scale_config());
        layout.set_fps_overlay(config.vid_fps);
        let mut bar = Self {
            layout,
            config,
            messages: MessageQueue::new(),
            crosshair: CrosshairState::new(),
            hooks,
            alt_hud: None,
            player: None,
            small_font: None,
            show_log: false,
            artiflash: 0,
            itemflash: 0.0,
            pickup_color: DEFAULT_PICKUP_COLOR,
        };
        bar.hooks.init();
        bar
    }

    // ==========================================================================
    // Setup
    // ==========================================================================

    pub fn set_alt_hud(&mut self, alt_hud: Option<Box<dyn AltHud>>) {
        self.alt_hud = alt_hud;
    }

    pub fn set_small_font(&mut self, font: Rc<dyn HudFont>) {
        self.small_font = Some(font);
    }

    pub fn set_pickup_color(&mut self, color: Color) {
        self.pickup_color = color;
    }

    /// See [`HudLayout::set_size`].
    pub fn set_size(&mut self, rel_top: i32, hres: i32, vres: i32, hud_hres: i32, hud_vres: i32) {
        self.layout.set_size(rel_top, hres, vres, hud_hres, hud_vres);
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: HudConfig) {
        self.config = config;
        self.sync_config();
    }

    /// Apply one `key = value` setting.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if self.config.apply(key, value)? {
            debug!("layout setting {} changed, rescaling", key);
        }
        self.sync_config();
        Ok(())
    }

    fn sync_config(&mut self) {
        self.layout.set_config(self.config.scale_config());
        self.layout.set_fps_overlay(self.config.vid_fps);
    }

    /// Attach to a player and let the hooks know.
    pub fn attach_to_player(&mut self, player: PlayerInfo) {
        self.hooks.attach_to_player(&player);
        self.player = Some(player);
    }

    pub fn new_game(&mut self) {
        self.hooks.new_game();
    }

    pub fn set_mugshot_state(&mut self, state_name: &str, wait_till_done: bool, reset: bool) {
        self.hooks.set_mugshot_state(state_name, wait_till_done, reset);
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn layout(&self) -> &HudLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut HudLayout {
        &mut self.layout
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageQueue {
        &self.messages
    }

    pub fn crosshair(&self) -> &CrosshairState {
        &self.crosshair
    }

    pub fn player(&self) -> Option<&PlayerInfo> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerInfo> {
        self.player.as_mut()
    }

    pub fn show_log(&self) -> bool {
        self.show_log
    }

    pub fn set_show_log(&mut self, show: bool) {
        self.show_log = show;
    }

    pub fn toggle_log(&mut self) {
        self.show_log = !self.show_log;
    }

    pub fn artiflash(&self) -> i32 {
        self.artiflash
    }

    pub fn itemflash(&self) -> f64 {
        self.itemflash
    }

    // ==========================================================================
    // Messages
    // ==========================================================================

    /// See [`MessageQueue::attach`].
    pub fn attach_message(&mut self, message: Box<dyn HudMessage>, id: u32, layer: i32) -> MessageHandle {
        self.messages.attach(message, id, layer)
    }

    pub fn detach_message(&mut self, id: u32) -> Option<Box<dyn HudMessage>> {
        self.messages.detach_id(id)
    }

    pub fn detach_message_handle(&mut self, handle: MessageHandle) -> Option<Box<dyn HudMessage>> {
        self.messages.detach(handle)
    }

    pub fn detach_all_messages(&mut self) {
        self.messages.detach_all();
    }

    /// Show the attached player's name centred near the bottom.
    pub fn show_player_name(&mut self) -> HudResult<MessageHandle> {
        let font = self.small_font.clone().ok_or(HudError::MissingFont)?;
        let (name, color) = match &self.player {
            Some(player) if player.is_console_player => (player.name.clone(), TextColor::GOLD),
            Some(player) => (player.name.clone(), TextColor::GREEN),
            None => (String::new(), TextColor::GOLD),
        };
        let scale = con_scale(self.config.con_scaletext, self.config.uiscale, self.layout.screen());
        let message = FadeOutMessage::new(font, name, 1.5, 0.92, color, 2.0, 0.35, scale);
        Ok(self.messages.attach(Box::new(message), PLAYER_NAME_ID, MessageLayer::OverHud as i32))
    }

    // ==========================================================================
    // Ticking
    // ==========================================================================

    /// Advance one game tick.
    pub fn tick(&mut self) {
        self.messages.tick();
        self.crosshair.tick();
        if self.artiflash > 0 {
            self.artiflash -= 1;
        }
        if self.itemflash > 0.0 {
            self.itemflash = (self.itemflash - 1.0 / 14.0).max(0.0);
        }
        self.hooks.tick();
    }

    /// Enlarge the crosshair for a pickup.
    pub fn flash_crosshair(&mut self) {
        self.crosshair.set_size(XHAIR_PICKUP_SIZE);
    }

    /// Flash the item box; `artifact` also starts the artifact flash.
    pub fn flash_item(&mut self, artifact: bool) {
        if artifact {
            self.artiflash = ARTIFLASH_TICS;
        }
        self.itemflash = 1.0;
    }

    /// Forward a popup number; negative values select no popup.
    pub fn show_pop(&mut self, pop: i32) {
        self.hooks.show_pop(pop.max(0));
    }

    // ==========================================================================
    // Drawing
    // ==========================================================================

    fn message_frame(&self, state: HudState, frame: &FrameState) -> MessageFrame {
        let screen = self.layout.screen();
        MessageFrame {
            bottom: if state == HudState::StatusBar {
                self.layout.top_of_statusbar()
            } else {
                screen.height
            },
            visibility: frame.visibility(),
            screen,
            tic_frac: frame.tic_frac,
        }
    }

    /// Messages drawn below the status bar.
    pub fn draw_bottom_stuff(&self, state: HudState, frame: &FrameState, sink: &mut dyn RenderSink) {
        let msg_frame = self.message_frame(state, frame);
        self.messages.draw(MessageLayer::UnderHud, &msg_frame, sink);
    }

    /// Draw the status bar for `state`, then restore the default pass.
    ///
    /// The alternative HUD state draws nothing here.
    pub fn call_draw(
        &mut self,
        state: HudState,
        frame: &FrameState,
        sink: &mut dyn RenderSink,
        textures: &dyn TextureManager,
    ) -> HudResult<()> {
        let translation = self.player.as_ref().map_or(0, |p| p.translation);
        let result = {
            let mut draw_frame = DrawFrame {
                ctx: HudContext::new(&mut self.layout, sink, textures),
                crosshair: &mut self.crosshair,
                config: &self.config,
                frame,
            };
            draw_frame.ctx.translation = translation;
            let result = if state == HudState::AltHud {
                Ok(())
            } else {
                self.hooks.draw(&mut draw_frame, state, frame.tic_frac)
            };
            draw_frame.ctx.clear_clip_rect();
            result
        };
        self.layout.reset_to_base();
        result
    }

    /// Draw the alternative HUD at UI scale, if there is one.
    pub fn draw_alt_hud(
        &mut self,
        frame: &FrameState,
        sink: &mut dyn RenderSink,
        textures: &dyn TextureManager,
    ) -> HudResult<()> {
        let Some(alt_hud) = self.alt_hud.as_mut() else {
            return Ok(());
        };
        let screen = self.layout.screen();
        let scale = ui_scale(0, self.config.uiscale, screen);
        let result = {
            let mut ctx = HudContext::new(&mut self.layout, sink, textures);
            ctx.translation = self.player.as_ref().map_or(0, |p| p.translation);
            ctx.begin_hud(screen.width / scale, screen.height / scale, 1.0, false);
            let result = alt_hud.draw(&mut ctx, frame.tic_frac);
            ctx.clear_clip_rect();
            result
        };
        self.layout.reset_to_base();
        result
    }

    /// Powerups, the map and HUD message layers, and the popup log.
    pub fn draw_top_stuff(
        &mut self,
        state: HudState,
        frame: &FrameState,
        sink: &mut dyn RenderSink,
        textures: &dyn TextureManager,
    ) -> HudResult<()> {
        if state != HudState::AltHud {
            let saved = self.layout.fullscreen_offsets();
            self.layout.set_fullscreen_offsets(true);
            let result = {
                let mut draw_frame = DrawFrame {
                    ctx: HudContext::new(&mut self.layout, &mut *sink, textures),
                    crosshair: &mut self.crosshair,
                    config: &self.config,
                    frame,
                };
                self.hooks.draw_powerups(&mut draw_frame)
            };
            self.layout.set_fullscreen_offsets(saved);
            result?;
        }

        let msg_frame = self.message_frame(state, frame);
        if frame.automap_active && !frame.view_active {
            self.messages.draw(MessageLayer::OverMap, &msg_frame, sink);
        }
        self.messages.draw(MessageLayer::OverHud, &msg_frame, sink);

        if self.show_log && self.hooks.must_draw_log(state) {
            self.draw_log(sink);
        }
        Ok(())
    }

    fn draw_log(&self, sink: &mut dyn RenderSink) {
        let (Some(player), Some(font)) = (&self.player, &self.small_font) else {
            return;
        };
        let screen = self.layout.screen();
        let scale = con_scale(self.config.con_scaletext, self.config.uiscale, screen);
        draw_log(&player.log_text, font.as_ref(), screen, scale, sink);
    }

    /// Compose the view blend and hand it to the renderer.
    pub fn blend_view(&self, env: &ViewEnvironment, sink: &mut dyn RenderSink) -> BlendColor {
        let fallback = PlayerBlendState::default();
        let player = self.player.as_ref().map_or(&fallback, |p| &p.blend);
        let blend = compose_view_blend(&ViewBlendInputs {
            environment: env.blend,
            underwater_scalar: self.config.underwater_fade_scalar,
            player,
            flash: self.config.paletteflash,
            pickup_color: self.pickup_color,
            direct_visible: env.direct_visible(),
        });
        sink.set_blend(blend);
        blend
    }

    /// Automap title under the current `am_showmaplabel` setting.
    pub fn map_title(&self, label: &MapLabel<'_>, color: &str) -> String {
        format_map_name(label, self.config.am_showmaplabel, color)
    }

    // ==========================================================================
    // Screen
    // ==========================================================================

    /// Recompute sizes for a new screen and notify messages and hooks.
    pub fn screen_size_changed(&mut self, screen: ScreenSize) {
        self.layout.screen_size_changed(screen);
        self.messages.screen_size_changed(screen);
        // Small and big crosshair art depend on the width.
        self.crosshair.unload();
        self.hooks.screen_size_changed(screen);
    }
}

impl Drop for StatusBar {
    fn drop(&mut self) {
        self.messages.detach_all();
        if self.alt_hud.take().is_some() {
            debug!("released alternative HUD");
        }
    }
}
