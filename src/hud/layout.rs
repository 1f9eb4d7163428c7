//! Per-instance layout state of a status bar.
//!
//! Keeps the base (statusbar and HUD) reference resolutions, the resolution
//! the current pass draws against, the cached [`ScaleState`] and the pass
//! parameters (placement mode, alpha, forced scaling, draw offset).

use crate::hud::aspect::{calc_clean_facs, ScreenSize};
use crate::hud::resolution::ReferenceResolution;
use crate::hud::scale::{hud_scale, recompute_scale, ScaleConfig, ScaleState, Vec2};
use crate::hud::transform::{transform_rect, DrawFlags, DrawMode, HudRect, TransformContext};

/// Layout and pass state owned by one status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct HudLayout {
    screen: ScreenSize,
    config: ScaleConfig,
    fps_overlay: bool,

    base_rel_top: i32,
    base_sbar: ReferenceResolution,
    base_hud: ReferenceResolution,

    rel_top: i32,
    resolution: ReferenceResolution,
    default_scale: Vec2,
    scale: ScaleState,

    forced: bool,
    fullscreen_offsets: bool,
    alpha: f64,
    complete_border: bool,
    draw_offset: Vec2,
}

impl HudLayout {
    pub fn new(screen: ScreenSize, config: ScaleConfig) -> Self {
        let mut layout = Self {
            screen,
            config,
            fps_overlay: false,
            base_rel_top: 0,
            base_sbar: ReferenceResolution::default(),
            base_hud: ReferenceResolution::default(),
            rel_top: 0,
            resolution: ReferenceResolution::default(),
            default_scale: Vec2::new(1.0, 1.0),
            scale: ScaleState::default(),
            forced: false,
            fullscreen_offsets: false,
            alpha: 1.0,
            complete_border: false,
            draw_offset: Vec2::default(),
        };
        layout.set_size(0, 0, 0, -1, -1);
        layout
    }

    // ==========================================================================
    // Sizing
    // ==========================================================================

    /// Store the base resolutions and apply the statusbar ones.
    ///
    /// Negative HUD values fall back to the statusbar resolution.
    pub fn set_size(&mut self, rel_top: i32, hres: i32, vres: i32, hud_hres: i32, hud_vres: i32) {
        let sbar = ReferenceResolution::new(hres, vres).validated();
        self.base_rel_top = rel_top;
        self.base_sbar = sbar;
        self.base_hud = ReferenceResolution::new(
            if hud_hres < 0 { sbar.horizontal } else { hud_hres },
            if hud_vres < 0 { sbar.vertical } else { hud_vres },
        );
        self.set_draw_size(rel_top, sbar.horizontal, sbar.vertical);
    }

    /// Set the resolution the current pass draws against.
    pub fn set_draw_size(&mut self, rel_top: i32, hres: i32, vres: i32) {
        let resolution = ReferenceResolution::new(hres, vres).validated();
        self.rel_top = rel_top;
        self.resolution = resolution;
        let (x, y) = calc_clean_facs(
            resolution.horizontal,
            resolution.vertical,
            self.screen.width,
            self.screen.height,
        );
        self.default_scale = Vec2::new(x as f64, y as f64);
        self.set_scale();
    }

    /// Recompute the cached [`ScaleState`].
    pub fn set_scale(&mut self) {
        self.scale = recompute_scale(
            self.screen,
            self.rel_top,
            self.resolution,
            &self.config,
            self.forced,
        );
    }

    /// Re-apply the current sizes after the screen changed.
    pub fn screen_size_changed(&mut self, screen: ScreenSize) {
        self.screen = screen;
        self.set_size(
            self.rel_top,
            self.resolution.horizontal,
            self.resolution.vertical,
            -1,
            -1,
        );
    }

    /// Swap in new scale configuration and recompute.
    pub fn set_config(&mut self, config: ScaleConfig) {
        if self.config != config {
            self.config = config;
            self.set_scale();
        }
    }

    pub fn set_fps_overlay(&mut self, on: bool) {
        self.fps_overlay = on;
    }

    // ==========================================================================
    // Passes
    // ==========================================================================

    /// Start drawing in statusbar placement. Negative values select the
    /// stored base values.
    pub fn begin_statusbar(&mut self, res_w: i32, res_h: i32, rel_top: i32, forced: bool) {
        // The flag goes first so the recomputation below sees it.
        self.forced = forced;
        self.set_draw_size(
            if rel_top < 0 { self.base_rel_top } else { rel_top },
            if res_w < 0 { self.base_sbar.horizontal } else { res_w },
            if res_h < 0 { self.base_sbar.vertical } else { res_h },
        );
        self.fullscreen_offsets = false;
    }

    /// Start drawing in fullscreen HUD placement.
    pub fn begin_hud(&mut self, res_w: i32, res_h: i32, alpha: f64, forced: bool) {
        self.forced = forced;
        self.set_draw_size(
            self.rel_top,
            if res_w < 0 { self.base_hud.horizontal } else { res_w },
            if res_h < 0 { self.base_hud.vertical } else { res_h },
        );
        self.alpha = alpha;
        self.complete_border = false;
        self.fullscreen_offsets = true;
    }

    /// Restore the default statusbar state after a frame.
    pub fn reset_to_base(&mut self) {
        self.begin_statusbar(
            self.base_sbar.horizontal,
            self.base_sbar.vertical,
            self.base_rel_top,
            false,
        );
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Per-axis scale for fullscreen HUD placement.
    pub fn hud_scale(&self) -> Vec2 {
        hud_scale(
            &self.config,
            self.forced,
            self.default_scale,
            self.resolution,
            self.screen,
        )
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.fullscreen_offsets {
            DrawMode::FullscreenHudPass
        } else {
            DrawMode::StatusBarPass
        }
    }

    pub fn transform_context(&self) -> TransformContext {
        TransformContext {
            mode: self.draw_mode(),
            scale: self.scale,
            forced: self.forced,
            hud_scale: self.hud_scale(),
            draw_offset: self.draw_offset,
            screen: self.screen,
            fps_overlay: self.fps_overlay,
        }
    }

    /// Logical rectangle to real pixels under the current pass.
    pub fn transform_rect(&self, rect: HudRect, flags: DrawFlags) -> HudRect {
        transform_rect(rect, flags, &self.transform_context())
    }

    /// Real-pixel row where the statusbar starts.
    pub fn top_of_statusbar(&self) -> i32 {
        self.scale.top
    }

    pub fn scale_state(&self) -> &ScaleState {
        &self.scale
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn resolution(&self) -> ReferenceResolution {
        self.resolution
    }

    pub fn base_resolution(&self) -> ReferenceResolution {
        self.base_sbar
    }

    pub fn base_hud_resolution(&self) -> ReferenceResolution {
        self.base_hud
    }

    pub fn rel_top(&self) -> i32 {
        self.rel_top
    }

    pub fn base_rel_top(&self) -> i32 {
        self.base_rel_top
    }

    pub fn default_scale(&self) -> Vec2 {
        self.default_scale
    }

    pub fn forced(&self) -> bool {
        self.forced
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn complete_border(&self) -> bool {
        self.complete_border
    }

    pub fn set_complete_border(&mut self, complete: bool) {
        self.complete_border = complete;
    }

    pub fn fullscreen_offsets(&self) -> bool {
        self.fullscreen_offsets
    }

    pub fn set_fullscreen_offsets(&mut self, on: bool) {
        self.fullscreen_offsets = on;
    }

    pub fn draw_offset(&self) -> Vec2 {
        self.draw_offset
    }

    pub fn set_draw_offset(&mut self, offset: Vec2) {
        self.draw_offset = offset;
    }
}
