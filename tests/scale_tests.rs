//! Statusbar placement through the public layout API.

use hudbar::hud::scale::ScaleConfig;
use hudbar::hud::transform::PixelRect;
use hudbar::hud::{DrawFlags, HudLayout, HudRect, ScreenSize};
use proptest::prelude::*;

fn make_layout(width: i32, height: i32, st_scale: i32) -> HudLayout {
    let config = ScaleConfig {
        st_scale,
        ..ScaleConfig::default()
    };
    HudLayout::new(ScreenSize::new(width, height), config)
}

#[test]
fn fullscreen_wide_screen_letterboxes() {
    let mut layout = make_layout(1920, 1080, -1);
    layout.set_size(32, 320, 200, -1, -1);

    let state = layout.scale_state();
    assert!(state.is_sentinel());
    assert_eq!(state.scale_x, -1.0);
    assert_eq!(state.origin_x, 240);
    assert_eq!(state.top, 907);
    assert_eq!(layout.top_of_statusbar(), 907);

    // The reference centre stays at the screen centre.
    let centre = layout.transform_rect(HudRect::new(160.0, 100.0, 0.0, 0.0), DrawFlags::default());
    assert!((centre.x - 960.0).abs() < 1e-6);
}

#[test]
fn discrete_scale_clamps_to_screen_width() {
    let mut layout = make_layout(1920, 1080, 10);
    layout.set_size(32, 320, 200, -1, -1);
    assert_eq!(layout.scale_state().scale_x, 6.0);

    let mut layout = make_layout(1920, 1080, 3);
    layout.set_size(32, 320, 200, -1, -1);
    let state = layout.scale_state();
    assert_eq!(state.scale_x, 3.0);
    assert_eq!(state.origin_x, 480);

    let rect = layout.transform_rect(HudRect::new(10.0, 20.0, 5.0, 5.0), DrawFlags::default());
    assert_eq!(rect, HudRect::new(510.0, 540.0, 15.0, 15.0));
}

#[test]
fn pixel_rounding_shares_edges() {
    let rect = PixelRect::from_real(HudRect::new(3.5, 0.0, 5.5, 1.0));
    assert_eq!(rect.x, 4);
    assert_eq!(rect.width, 5);
}

#[test]
fn config_change_rescales_only_when_different() {
    let mut layout = make_layout(640, 400, -1);
    layout.set_size(0, 320, 200, -1, -1);
    let before = *layout.scale_state();

    layout.set_config(ScaleConfig::default());
    assert_eq!(*layout.scale_state(), before);

    layout.set_config(ScaleConfig {
        st_scale: 1,
        ..ScaleConfig::default()
    });
    assert_eq!(layout.scale_state().scale_x, 1.0);
    assert_eq!(layout.scale_state().origin_x, 160);
}

#[test]
fn hud_pass_and_reset() {
    let mut layout = make_layout(1280, 800, -1);
    layout.set_size(32, 320, 200, 640, 400);
    layout.begin_hud(-1, -1, 0.75, false);
    assert_eq!(layout.resolution().horizontal, 640);
    assert_eq!(layout.alpha(), 0.75);
    assert!(layout.fullscreen_offsets());

    layout.reset_to_base();
    assert_eq!(layout.resolution().horizontal, 320);
    assert_eq!(layout.rel_top(), 32);
    assert!(!layout.fullscreen_offsets());
}

proptest! {
    /// Scaling reference and point together leaves the real position alone.
    #[test]
    fn sentinel_mapping_is_linear_in_reference(
        width in 320i32..4000,
        height in 200i32..3000,
        k in 1i32..5,
        x in 0.0f64..320.0,
        y in 0.0f64..200.0,
    ) {
        let mut base = make_layout(width, height, -1);
        base.set_size(0, 320, 200, -1, -1);
        let mut scaled = make_layout(width, height, -1);
        scaled.set_size(0, 320 * k, 200 * k, -1, -1);

        let kf = k as f64;
        let a = base.transform_rect(HudRect::new(x, y, 0.0, 0.0), DrawFlags::default());
        let b = scaled.transform_rect(HudRect::new(x * kf, y * kf, 0.0, 0.0), DrawFlags::default());
        prop_assert!((a.x - b.x).abs() < 1e-6);
        prop_assert!((a.y - b.y).abs() < 1e-6);
    }

    #[test]
    fn statusbar_top_never_below_screen(
        width in 320i32..4000,
        height in 200i32..3000,
        rel_top in 0i32..200,
    ) {
        let mut layout = make_layout(width, height, -1);
        layout.set_size(rel_top, 320, 200, -1, -1);
        prop_assert!(layout.top_of_statusbar() <= height);
    }
}
