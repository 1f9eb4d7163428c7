//! Settings files driving a status bar.

use std::io::Write;

use hudbar::config::load_config;
use hudbar::hud::{ScreenSize, StatusBar};
use rstest::rstest;

fn settings(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn loaded_settings_drive_the_layout() {
    let file = settings(&["# statusbar", "st_scale = 3", "hud_aspectscale = yes", "vid_fps = 1"]);
    let config = load_config(file.path()).unwrap();
    let mut bar = StatusBar::new(ScreenSize::new(1920, 1080), config);
    bar.set_size(32, 320, 200, -1, -1);

    let state = bar.layout().scale_state();
    assert_eq!(state.scale_x, 3.0);
    assert!((state.scale_y - 3.6).abs() < 1e-12);
}

#[test]
fn live_setting_changes_rescale() {
    let mut bar = StatusBar::new(ScreenSize::new(1920, 1080), Default::default());
    bar.set_size(32, 320, 200, -1, -1);
    assert!(bar.layout().scale_state().is_sentinel());

    bar.apply_setting("st_scale", "2").unwrap();
    assert_eq!(bar.layout().scale_state().scale_x, 2.0);

    bar.apply_setting("st_scale", "-9").unwrap();
    assert_eq!(bar.config().st_scale, -1);
    assert!(bar.layout().scale_state().is_sentinel());
}

#[rstest]
#[case("st_scale = wide")]
#[case("crosshairhealth = sometimes")]
#[case("crosshaircolor = 12 34")]
fn malformed_values_fail_with_location(#[case] line: &str) {
    let file = settings(&["idmypos = 0", line]);
    let err = load_config(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains(":2"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config(&dir.path().join("absent.cfg")).is_err());
}
