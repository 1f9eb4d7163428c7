//! Status bar scale calculation.
//!
//! Derives the statusbar's screen origin, scale factors and vertical
//! displacement from the screen size and the configured scale mode, and the
//! independent per-axis scale used by fullscreen HUD elements.
//!
//! Two policies exist:
//! - fullscreen, aspect-corrected (`st_scale < 0` or a forced pass): the
//!   sentinel scale `-1` tells the transformer to run the full
//!   virtual-to-real letterbox mapping.
//! - discrete integer scale: a linear `origin + coord * scale` mapping with
//!   an optional 1.2 vertical stretch for legacy non-square pixels.

use log::debug;

use crate::hud::aspect::{
    active_ratio, aspect_taller_than_wide, clamp_lenient, scale_int, ui_scale, ScreenSize,
};
use crate::hud::resolution::ReferenceResolution;

/// Scale value marking "use the virtual-to-real mapping".
pub const SENTINEL_SCALE: f64 = -1.0;

/// Vertical stretch applied when aspect compensation is on.
pub const ASPECT_SCALE_FACTOR: f64 = 1.2;

/// Two-component double vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scale-related configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleConfig {
    /// Statusbar scale mode; negative selects the fullscreen policy.
    pub st_scale: i32,
    /// HUD scale mode; negative selects the clean scale factors.
    pub hud_scale: i32,
    /// Stretch vertically by 1.2 to mimic non-square pixels.
    pub aspect_scale: bool,
    /// Global UI scale, 0 for automatic.
    pub ui_scale: i32,
}

impl ScaleConfig {
    fn vertical_factor(&self) -> f64 {
        if self.aspect_scale {
            ASPECT_SCALE_FACTOR
        } else {
            1.0
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            st_scale: -1,
            hud_scale: 0,
            aspect_scale: false,
            ui_scale: 0,
        }
    }
}

/// Cached statusbar placement, recomputed only when its inputs change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    /// Horizontal screen origin of the statusbar (ST_X).
    pub origin_x: i32,
    /// Vertical screen origin of the statusbar coordinate space (ST_Y).
    pub origin_y: i32,
    /// Horizontal scale, or [`SENTINEL_SCALE`].
    pub scale_x: f64,
    pub scale_y: f64,
    /// Real-pixel row where the visible statusbar starts.
    pub top: i32,
    /// Vertical displacement for fullscreen elements that sit above the bar.
    pub displacement: f64,
    pub reference: ReferenceResolution,
    pub rel_top: i32,
}

impl ScaleState {
    /// Whether the sentinel (virtual-to-real) mapping is active.
    pub fn is_sentinel(&self) -> bool {
        self.scale_x == SENTINEL_SCALE
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            scale_x: SENTINEL_SCALE,
            scale_y: SENTINEL_SCALE,
            top: 0,
            displacement: 0.0,
            reference: ReferenceResolution::default(),
            rel_top: 0,
        }
    }
}

/// Recompute the statusbar placement.
///
/// `reference` is validated first, so an unset axis falls back to 320x200.
pub fn recompute_scale(
    screen: ScreenSize,
    rel_top: i32,
    reference: ReferenceResolution,
    config: &ScaleConfig,
    forced: bool,
) -> ScaleState {
    let reference = reference.validated();
    let hres = reference.horizontal;
    let vres = reference.vertical;
    let w = screen.width;
    let h = screen.height;

    let state = if config.st_scale < 0 || forced {
        // Classic fullscreen scale with aspect ratio compensation.
        let sby = vres - rel_top;
        let aspect = active_ratio(w, h);
        let (origin_x, top) = if !aspect_taller_than_wide(aspect) {
            // Wider than or equal to 4:3.
            let top = scale_int(sby, h, vres);
            let width4_3 = w as f64 * 1.333 / aspect as f64;
            (((w as f64 - width4_3) / 2.0) as i32, top)
        } else {
            // 5:4-like.
            let height4_3 = h as f64 * aspect as f64 / 1.333;
            let top = (h as f64 - height4_3 + sby as f64 * height4_3 / vres as f64) as i32;
            (0, top)
        };
        ScaleState {
            origin_x,
            origin_y: 0,
            scale_x: SENTINEL_SCALE,
            scale_y: SENTINEL_SCALE,
            top,
            displacement: 0.0,
            reference,
            rel_top,
        }
    } else {
        // Global scaling factors are for 320-wide resources, so layouts
        // designed for wider reference resolutions scale down accordingly.
        let realscale = clamp_lenient(
            (320 * ui_scale(config.st_scale, config.ui_scale, screen)) / hres,
            1,
            w / hres,
        );
        let realscaley = realscale as f64 * config.vertical_factor();

        let origin_x = (w - hres * realscale) / 2;
        let top = (h as f64 - rel_top as f64 * realscaley) as i32;
        let displacement = if rel_top > 0 && h > 0 {
            ((top * vres / h) - (vres - rel_top)) as f64 / rel_top as f64 / realscaley
        } else {
            0.0
        };
        ScaleState {
            origin_x,
            origin_y: (h as f64 - vres as f64 * realscaley) as i32,
            scale_x: realscale as f64,
            scale_y: realscaley,
            top,
            displacement,
            reference,
            rel_top,
        }
    };

    debug!(
        "statusbar scale for {}x{} (ref {}x{}, reltop {}): origin ({}, {}), scale ({}, {}), top {}",
        w,
        h,
        hres,
        vres,
        rel_top,
        state.origin_x,
        state.origin_y,
        state.scale_x,
        state.scale_y,
        state.top
    );
    state
}

/// Per-axis scale for fullscreen HUD elements.
///
/// A negative `hud_scale` or a forced pass uses `default_scale` (the clean
/// scale factors); otherwise an integer scale derived like the discrete
/// statusbar scale, independent of the bar's relative top.
pub fn hud_scale(
    config: &ScaleConfig,
    forced: bool,
    default_scale: Vec2,
    reference: ReferenceResolution,
    screen: ScreenSize,
) -> Vec2 {
    if config.hud_scale < 0 || forced {
        return default_scale;
    }
    let scale = ui_scale(config.hud_scale, config.ui_scale, screen);
    let hres = reference.validated().horizontal;

    let realscale = ((320 * scale) / hres).max(1);
    let y = realscale as f64 * config.vertical_factor();
    Vec2::new(realscale as f64, y)
}
