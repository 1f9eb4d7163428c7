//! Aspect ratio and clean scale factor helpers.
//!
//! The status bar math was designed around a 4:3 surface. These helpers
//! classify the real screen's aspect and derive the integer "clean" scale
//! factors used for HUD elements authored at a reference resolution.

/// Real screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f32 {
        active_ratio(self.width, self.height)
    }
}

/// Anything below this counts as "taller than wide" (5:4 and friends).
pub const ASPECT_4_3: f32 = 1.333;

/// Aspect ratio of the active screen.
pub fn active_ratio(width: i32, height: i32) -> f32 {
    if height <= 0 {
        return 4.0 / 3.0;
    }
    width as f32 / height as f32
}

pub fn aspect_taller_than_wide(aspect: f32) -> bool {
    aspect < ASPECT_4_3
}

/// Width of the 4:3-equivalent base surface, times three.
pub fn aspect_base_width(aspect: f32) -> i32 {
    (240.0f32 * aspect * 3.0).round() as i32
}

/// Height of the 4:3-equivalent base surface, times three.
pub fn aspect_base_height(aspect: f32) -> i32 {
    if !aspect_taller_than_wide(aspect) {
        (200.0f32 * (320.0 / (aspect_base_width(aspect) as f32 / 3.0)) * 3.0).round() as i32
    } else {
        ((200.0f32 * (4.0 / 3.0) / aspect) * 3.0).round() as i32
    }
}

/// Fraction of the screen the 4:3 area covers, in 48ths.
pub fn aspect_multiplier(aspect: f32) -> i32 {
    if !aspect_taller_than_wide(aspect) {
        (320.0f32 / (aspect_base_width(aspect) as f32 / 3.0) * 48.0).round() as i32
    } else {
        (200.0f32 / (aspect_base_height(aspect) as f32 / 3.0) * 48.0).round() as i32
    }
}

/// `a * b / c` with a 64-bit intermediate.
pub fn scale_int(a: i32, b: i32, c: i32) -> i32 {
    if c == 0 {
        return 0;
    }
    (a as i64 * b as i64 / c as i64) as i32
}

/// Clamp that never panics when `max < min`; `min` wins in that case.
pub fn clamp_lenient(value: i32, min: i32, max: i32) -> i32 {
    if value <= min {
        min
    } else if value >= max {
        max
    } else {
        value
    }
}

/// Compute the clean scale factors for a design resolution on a real screen.
///
/// Both factors come out equal. Of the aspect-corrected pair and the plain
/// pair, the one with the smaller x/y disparity is used, unless either is
/// already 4 or more.
pub fn calc_clean_facs(
    design_width: i32,
    design_height: i32,
    real_width: i32,
    real_height: i32,
) -> (i32, i32) {
    if design_width <= 0 || design_height <= 0 || real_width <= 0 || real_height <= 0 {
        return (1, 1);
    }

    let mut real_height = real_height;
    // Large screens use at least 16:9 for the clean factors.
    if real_width > 1280 && (real_width as f64 / real_height as f64) < 16.0 / 9.0 {
        real_height = real_width * 9 / 16;
    }

    let ratio = active_ratio(real_width, real_height);
    let (cwidth, cheight) = if aspect_taller_than_wide(ratio) {
        (real_width, real_height * aspect_multiplier(ratio) / 48)
    } else {
        (real_width * aspect_multiplier(ratio) / 48, real_height)
    };

    let cx1 = (cwidth / design_width).max(1);
    let cy1 = (cheight / design_height).max(1);
    let cx2 = (real_width / design_width).max(1);
    let cy2 = (real_height / design_height).max(1);

    let (x, y) = if (cx1 - cy1).abs() <= (cx2 - cy2).abs() || cx1.max(cx2) >= 4 {
        (cx1, cy1)
    } else {
        (cx2, cy2)
    };

    let clean = x.min(y);
    (clean, clean)
}

/// Integer UI scale.
///
/// A positive `altval` wins, then a non-zero global `uiscale`; otherwise the
/// scale that fits 640x400. The result never makes a 320x200 layout larger
/// than the screen and is at least 1.
pub fn ui_scale(altval: i32, uiscale: i32, screen: ScreenSize) -> i32 {
    let scaleval = if altval > 0 {
        altval
    } else if uiscale == 0 {
        let vscale = screen.height / 400;
        let hscale = screen.width / 640;
        clamp_lenient(vscale, 1, hscale)
    } else {
        uiscale
    };

    let vmax = screen.height / 200;
    let hmax = screen.width / 320;
    let max = vmax.max(hmax);
    scaleval.min(max).max(1)
}

/// Integer console-text scale; same shape as [`ui_scale`] at twice the size.
pub fn con_scale(altval: i32, uiscale: i32, screen: ScreenSize) -> i32 {
    let scaleval = if altval > 0 {
        altval
    } else if uiscale == 0 {
        let vscale = screen.height / 800;
        let hscale = screen.width / 1280;
        clamp_lenient(vscale, 1, hscale)
    } else {
        (uiscale + 1) / 2
    };

    let vmax = screen.height / 400;
    let hmax = screen.width / 640;
    let max = vmax.max(hmax);
    scaleval.min(max).max(1)
}
