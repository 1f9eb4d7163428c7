//! Coordinate transformation from logical HUD space to real screen pixels.
//!
//! Statusbar-pass coordinates are relative to the cached [`ScaleState`];
//! fullscreen-pass coordinates are relative to a screen anchor picked by the
//! alignment flags and multiplied by the HUD scale.

use crate::hud::aspect::{
    active_ratio, aspect_base_height, aspect_base_width, aspect_multiplier,
    aspect_taller_than_wide, ScreenSize,
};
use crate::hud::scale::{ScaleState, Vec2};

/// Logical units a top-right anchored element is pushed down while the
/// frame-rate counter is showing.
pub const FPS_OVERLAY_NUDGE: f64 = 10.0;

// ==============================================================================
// Draw Flags
// ==============================================================================

/// Placement and rendering flags for HUD draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawFlags(u32);

impl DrawFlags {
    pub const NONE: u32 = 0;
    pub const TRANSLATABLE: u32 = 0x20;
    pub const FORCESCALE: u32 = 0x40;
    pub const DIM: u32 = 0x80;
    pub const DONTANIMATE: u32 = 0x800;
    pub const MIRROR: u32 = 0x1000;

    pub const SCREEN_AUTO: u32 = 0;
    /// With this set the screen flags below are honored as given.
    pub const SCREEN_MANUAL_ALIGN: u32 = 0x4000;
    pub const SCREEN_TOP: u32 = Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_VCENTER: u32 = 0x8000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_BOTTOM: u32 = 0x10000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_VMASK: u32 = 0x18000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_LEFT: u32 = Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_HCENTER: u32 = 0x20000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_RIGHT: u32 = 0x40000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_HMASK: u32 = 0x60000 | Self::SCREEN_MANUAL_ALIGN;
    pub const SCREEN_LEFT_TOP: u32 = Self::SCREEN_TOP | Self::SCREEN_LEFT;
    pub const SCREEN_RIGHT_TOP: u32 = Self::SCREEN_TOP | Self::SCREEN_RIGHT;
    pub const SCREEN_LEFT_BOTTOM: u32 = Self::SCREEN_BOTTOM | Self::SCREEN_LEFT;
    pub const SCREEN_RIGHT_BOTTOM: u32 = Self::SCREEN_BOTTOM | Self::SCREEN_RIGHT;
    pub const SCREEN_CENTER: u32 = Self::SCREEN_VCENTER | Self::SCREEN_HCENTER;

    pub const ITEM_VCENTER: u32 = 0x80000;
    pub const ITEM_BOTTOM: u32 = 0x100000;
    pub const ITEM_VOFFSET: u32 = 0x180000;
    pub const ITEM_VMASK: u32 = 0x180000;
    pub const ITEM_HCENTER: u32 = 0x200000;
    pub const ITEM_RIGHT: u32 = 0x400000;
    pub const ITEM_HOFFSET: u32 = 0x600000;
    pub const ITEM_HMASK: u32 = 0x600000;
    pub const ITEM_CENTER: u32 = Self::ITEM_VCENTER | Self::ITEM_HCENTER;

    pub const TEXT_ALIGN_LEFT: u32 = 0;
    pub const TEXT_ALIGN_RIGHT: u32 = 0x800000;
    pub const TEXT_ALIGN_CENTER: u32 = 0x1000000;
    pub const TEXT_ALIGN: u32 = 0x1800000;

    pub const ALPHAMAPPED: u32 = 0x2000000;
    pub const NOSHADOW: u32 = 0x4000000;
    pub const FORCEFILL: u32 = 0x20000000;

    pub const fn new(flags: u32) -> Self {
        Self(flags)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) == flag
    }

    pub const fn intersects(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    pub const fn masked(self, mask: u32) -> u32 {
        self.0 & mask
    }

    /// Resolve automatic screen alignment from the sign of the position.
    ///
    /// Must run before any offset is added to `x`/`y`.
    pub fn resolve_auto(self, x: f64, y: f64) -> Self {
        if self.intersects(Self::SCREEN_MANUAL_ALIGN) {
            return self;
        }
        let horizontal = if x < 0.0 {
            Self::SCREEN_RIGHT
        } else {
            Self::SCREEN_LEFT
        };
        let vertical = if y < 0.0 {
            Self::SCREEN_BOTTOM
        } else {
            Self::SCREEN_TOP
        };
        self.with(horizontal).with(vertical)
    }
}

impl From<u32> for DrawFlags {
    fn from(flags: u32) -> Self {
        Self(flags)
    }
}

// ==============================================================================
// Rectangles
// ==============================================================================

/// Rectangle in floating point, logical or real depending on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HudRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl HudRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap a real-space rectangle to pixels.
    ///
    /// Extents are `round(x + w) - round(x)` so adjacent rectangles share an
    /// edge instead of leaving a one-pixel gap or overlap.
    pub fn from_real(rect: HudRect) -> Self {
        let x = rect.x.round() as i32;
        let y = rect.y.round() as i32;
        Self {
            x,
            y,
            width: (rect.x + rect.w).round() as i32 - x,
            height: (rect.y + rect.h).round() as i32 - y,
        }
    }
}

// ==============================================================================
// Transformation
// ==============================================================================

/// Which placement rules a draw call follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Relative to the statusbar's [`ScaleState`].
    #[default]
    StatusBarPass,
    /// Relative to a screen corner/centre, scaled by the HUD scale.
    FullscreenHudPass,
}

/// Everything the transformer reads for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub mode: DrawMode,
    pub scale: ScaleState,
    /// The active pass forces the virtual-to-real mapping.
    pub forced: bool,
    pub hud_scale: Vec2,
    pub draw_offset: Vec2,
    pub screen: ScreenSize,
    /// Frame-rate counter is drawn in the top right corner.
    pub fps_overlay: bool,
}

/// Map a rectangle in a virtual resolution onto the whole screen.
///
/// Wider-than-4:3 screens expand around the horizontal centre (21:9 and
/// wider are treated as 16:9, leaving side bars); 5:4-like screens compress
/// around the vertical centre and, with `vbottom`, are pushed to the bottom.
pub fn virtual_to_real_coords(
    rect: HudRect,
    vwidth: f64,
    vheight: f64,
    screen: ScreenSize,
    vbottom: bool,
    handle_aspect: bool,
) -> HudRect {
    let mut myratio = if handle_aspect {
        active_ratio(screen.width, screen.height)
    } else {
        4.0 / 3.0
    };
    if myratio > 1.7 {
        myratio = 16.0 / 9.0;
    }

    let width = screen.width as f64;
    let height = screen.height as f64;
    let right = rect.x + rect.w;
    let bottom = rect.y + rect.h;

    let (x, w) = if myratio > 1.334 {
        let base = vwidth * aspect_base_width(myratio) as f64;
        let x = (rect.x - vwidth * 0.5) * width * 960.0 / base + width * 0.5;
        let r = (right - vwidth * 0.5) * width * 960.0 / base + width * 0.5;
        (x, r - x)
    } else {
        let x = rect.x * width / vwidth;
        (x, right * width / vwidth - x)
    };

    let (y, h) = if aspect_taller_than_wide(myratio) {
        let base = vheight * aspect_base_height(myratio) as f64;
        let mut y = (rect.y - vheight * 0.5) * height * 600.0 / base + height * 0.5;
        let b = (bottom - vheight * 0.5) * height * 600.0 / base + height * 0.5;
        let h = b - y;
        if vbottom {
            y += (height - height * aspect_multiplier(myratio) as f64 / 48.0) * 0.5;
        }
        (y, h)
    } else {
        let y = rect.y * height / vheight;
        (y, bottom * height / vheight - y)
    };

    HudRect::new(x, y, w, h)
}

/// Statusbar-relative logical coordinates to real pixels.
pub fn statusbar_to_real(
    rect: HudRect,
    scale: &ScaleState,
    forced: bool,
    screen: ScreenSize,
) -> HudRect {
    if scale.is_sentinel() || forced {
        let reference = scale.reference.validated();
        virtual_to_real_coords(
            rect,
            reference.horizontal as f64,
            reference.vertical as f64,
            screen,
            true,
            true,
        )
    } else {
        HudRect::new(
            scale.origin_x as f64 + rect.x * scale.scale_x,
            scale.origin_y as f64 + rect.y * scale.scale_y,
            rect.w * scale.scale_x,
            rect.h * scale.scale_y,
        )
    }
}

/// Screen position the fullscreen-pass coordinates are relative to.
pub fn screen_anchor(flags: DrawFlags, screen: ScreenSize) -> Vec2 {
    let x = match flags.masked(DrawFlags::SCREEN_HMASK) {
        DrawFlags::SCREEN_HCENTER => (screen.width / 2) as f64,
        DrawFlags::SCREEN_RIGHT => screen.width as f64,
        _ => 0.0,
    };
    let y = match flags.masked(DrawFlags::SCREEN_VMASK) {
        DrawFlags::SCREEN_VCENTER => (screen.height / 2) as f64,
        DrawFlags::SCREEN_BOTTOM => screen.height as f64,
        _ => 0.0,
    };
    Vec2::new(x, y)
}

/// Apply the fullscreen placement to an already offset rectangle.
///
/// `flags` must already have automatic alignment resolved.
pub fn fullscreen_to_real(mut rect: HudRect, flags: DrawFlags, ctx: &TransformContext) -> HudRect {
    let origin = screen_anchor(flags, ctx.screen);

    let corner = flags.masked(DrawFlags::SCREEN_HMASK | DrawFlags::SCREEN_VMASK);
    if corner == DrawFlags::SCREEN_RIGHT_TOP && ctx.fps_overlay {
        rect.y += FPS_OVERLAY_NUDGE;
    }

    HudRect::new(
        rect.x * ctx.hud_scale.x + origin.x,
        rect.y * ctx.hud_scale.y + origin.y,
        rect.w * ctx.hud_scale.x,
        rect.h * ctx.hud_scale.y,
    )
}

/// Transform a logical rectangle into real screen space.
pub fn transform_rect(rect: HudRect, flags: DrawFlags, ctx: &TransformContext) -> HudRect {
    let flags = flags.resolve_auto(rect.x, rect.y);
    let rect = HudRect::new(
        rect.x + ctx.draw_offset.x,
        rect.y + ctx.draw_offset.y,
        rect.w,
        rect.h,
    );
    match ctx.mode {
        DrawMode::StatusBarPass => statusbar_to_real(rect, &ctx.scale, ctx.forced, ctx.screen),
        DrawMode::FullscreenHudPass => fullscreen_to_real(rect, flags, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::resolution::ReferenceResolution;
    use crate::hud::scale::{recompute_scale, ScaleConfig};
    use rstest::rstest;

    fn ctx(mode: DrawMode, scale: ScaleState, screen: ScreenSize) -> TransformContext {
        TransformContext {
            mode,
            scale,
            forced: false,
            hud_scale: Vec2::new(2.0, 2.0),
            draw_offset: Vec2::default(),
            screen,
            fps_overlay: false,
        }
    }

    fn discrete_state(screen: ScreenSize) -> ScaleState {
        let config = ScaleConfig {
            st_scale: 3,
            ..ScaleConfig::default()
        };
        recompute_scale(screen, 32, ReferenceResolution::new(320, 200), &config, false)
    }

    #[test]
    fn test_pixel_rounding_shares_edges() {
        let px = PixelRect::from_real(HudRect::new(3.5, 3.5, 5.5, 5.5));
        assert_eq!(px, PixelRect::new(4, 4, 5, 5));
        assert_ne!(px.width, 5.5f64.round() as i32);
    }

    #[test]
    fn test_adjacent_rects_do_not_gap() {
        let a = PixelRect::from_real(HudRect::new(0.4, 0.0, 2.7, 1.0));
        let b = PixelRect::from_real(HudRect::new(3.1, 0.0, 2.7, 1.0));
        assert_eq!(a.x + a.width, b.x);
    }

    #[rstest]
    #[case(10.0, 10.0, DrawFlags::SCREEN_LEFT_TOP)]
    #[case(-10.0, 10.0, DrawFlags::SCREEN_RIGHT_TOP)]
    #[case(10.0, -10.0, DrawFlags::SCREEN_LEFT_BOTTOM)]
    #[case(-10.0, -10.0, DrawFlags::SCREEN_RIGHT_BOTTOM)]
    #[case(0.0, 0.0, DrawFlags::SCREEN_LEFT_TOP)]
    fn test_auto_alignment(#[case] x: f64, #[case] y: f64, #[case] expected: u32) {
        let flags = DrawFlags::new(DrawFlags::SCREEN_AUTO).resolve_auto(x, y);
        assert_eq!(
            flags.masked(DrawFlags::SCREEN_HMASK | DrawFlags::SCREEN_VMASK),
            expected
        );
    }

    #[test]
    fn test_manual_alignment_is_kept() {
        let flags = DrawFlags::new(DrawFlags::SCREEN_CENTER).resolve_auto(-5.0, -5.0);
        assert_eq!(flags.bits(), DrawFlags::SCREEN_CENTER);
    }

    #[test]
    fn test_statusbar_linear_mapping() {
        let screen = ScreenSize::new(1920, 1080);
        let c = ctx(DrawMode::StatusBarPass, discrete_state(screen), screen);
        let real = transform_rect(HudRect::new(10.0, 170.0, 20.0, 8.0), DrawFlags::default(), &c);
        assert_eq!(real, HudRect::new(480.0 + 30.0, 480.0 + 510.0, 60.0, 24.0));
    }

    #[test]
    fn test_statusbar_sentinel_mapping_on_4_3() {
        let screen = ScreenSize::new(640, 400);
        let mut state = ScaleState::default();
        state.reference = ReferenceResolution::new(320, 200);
        let c = ctx(DrawMode::StatusBarPass, state, screen);
        // 1.6 aspect: expanded horizontally around the centre.
        let real = transform_rect(HudRect::new(160.0, 100.0, 10.0, 10.0), DrawFlags::default(), &c);
        assert!((real.x - 320.0).abs() < 1e-9);
        assert!((real.y - 200.0).abs() < 1e-9);
        // 960 / 1152 of the plain 2x factor.
        assert!((real.w - 20.0 * 960.0 / 1152.0).abs() < 1e-9);
        assert!((real.h - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_virtual_to_real_plain_4_3() {
        let real = virtual_to_real_coords(
            HudRect::new(32.0, 20.0, 64.0, 40.0),
            320.0,
            200.0,
            ScreenSize::new(640, 480),
            true,
            true,
        );
        assert!((real.x - 64.0).abs() < 1e-9);
        assert!((real.w - 128.0).abs() < 1e-9);
        assert!((real.y - 48.0).abs() < 1e-9);
        assert!((real.h - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_virtual_to_real_ultrawide_uses_16_9() {
        let screen = ScreenSize::new(2560, 1080);
        let real = virtual_to_real_coords(
            HudRect::new(0.0, 0.0, 320.0, 200.0),
            320.0,
            200.0,
            screen,
            true,
            true,
        );
        // Side bars: the 4:3 area is narrower than the screen.
        assert!(real.x > 0.0);
        assert!((real.x + real.w / 2.0 - 1280.0).abs() < 1e-6);
    }

    #[test]
    fn test_virtual_to_real_tall_screen_pushed_to_bottom() {
        let screen = ScreenSize::new(1280, 1024);
        let top = virtual_to_real_coords(
            HudRect::new(0.0, 0.0, 320.0, 200.0),
            320.0,
            200.0,
            screen,
            false,
            true,
        );
        let bottom = virtual_to_real_coords(
            HudRect::new(0.0, 0.0, 320.0, 200.0),
            320.0,
            200.0,
            screen,
            true,
            true,
        );
        assert!((top.h - bottom.h).abs() < 1e-9);
        assert!(bottom.y > top.y);
        assert!((bottom.y + bottom.h - 1024.0).abs() < 1.0);
    }

    #[test]
    fn test_fullscreen_anchor_and_scale() {
        let screen = ScreenSize::new(1920, 1080);
        let c = ctx(DrawMode::FullscreenHudPass, ScaleState::default(), screen);
        let real = transform_rect(HudRect::new(-40.0, -20.0, 30.0, 10.0), DrawFlags::default(), &c);
        assert_eq!(real, HudRect::new(1920.0 - 80.0, 1080.0 - 40.0, 60.0, 20.0));

        let centered = transform_rect(
            HudRect::new(0.0, 0.0, 8.0, 8.0),
            DrawFlags::new(DrawFlags::SCREEN_CENTER),
            &c,
        );
        assert_eq!(centered, HudRect::new(960.0, 540.0, 16.0, 16.0));
    }

    #[test]
    fn test_fps_overlay_nudges_top_right_only() {
        let screen = ScreenSize::new(1920, 1080);
        let mut c = ctx(DrawMode::FullscreenHudPass, ScaleState::default(), screen);
        c.fps_overlay = true;

        let top_right = transform_rect(HudRect::new(-40.0, 4.0, 30.0, 10.0), DrawFlags::default(), &c);
        assert_eq!(top_right.y, (4.0 + FPS_OVERLAY_NUDGE) * 2.0);

        let top_left = transform_rect(HudRect::new(40.0, 4.0, 30.0, 10.0), DrawFlags::default(), &c);
        assert_eq!(top_left.y, 8.0);
    }

    #[test]
    fn test_offset_applied_after_alignment() {
        let screen = ScreenSize::new(1920, 1080);
        let mut c = ctx(DrawMode::FullscreenHudPass, ScaleState::default(), screen);
        c.draw_offset = Vec2::new(-50.0, 0.0);
        // x = 10 resolves to left alignment even though the offset makes it negative.
        let real = transform_rect(HudRect::new(10.0, 0.0, 1.0, 1.0), DrawFlags::default(), &c);
        assert_eq!(real.x, -80.0);
    }

    #[test]
    fn test_same_input_same_output() {
        let screen = ScreenSize::new(1366, 768);
        let c = ctx(DrawMode::StatusBarPass, discrete_state(screen), screen);
        let rect = HudRect::new(12.25, 7.5, 33.0, 9.0);
        assert_eq!(
            transform_rect(rect, DrawFlags::default(), &c),
            transform_rect(rect, DrawFlags::default(), &c)
        );
    }
}
