use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::hud::blend::PaletteFlash;
use crate::hud::crosshair::CrosshairSettings;
use crate::hud::scale::ScaleConfig;
use crate::propfile;

/// Configuration errors for values that cannot be understood at all.
///
/// Values that parse but are out of range are clamped instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("resolution must be in WIDTHxHEIGHT format: '{0}'")]
    InvalidResolution(String),

    #[error("point must be in X,Y format: '{0}'")]
    InvalidPoint(String),
}

/// Console variables read by the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct HudConfig {
    /// Statusbar scale; -1 is the aspect-corrected fullscreen scale.
    pub st_scale: i32,
    /// HUD scale; negative uses the clean scale factors.
    pub hud_scale: i32,
    pub hud_aspectscale: bool,
    pub uiscale: i32,
    pub con_scaletext: i32,
    pub crosshair: CrosshairSettings,
    /// 0 never prefixes the map label, 1 always, 2 only outside hubs.
    pub am_showmaplabel: i32,
    pub idmypos: bool,
    pub underwater_fade_scalar: f32,
    pub paletteflash: PaletteFlash,
    pub vid_fps: bool,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            st_scale: -1,
            hud_scale: 0,
            hud_aspectscale: false,
            uiscale: 0,
            con_scaletext: 0,
            crosshair: CrosshairSettings::default(),
            am_showmaplabel: 2,
            idmypos: false,
            underwater_fade_scalar: 1.0,
            paletteflash: PaletteFlash::default(),
            vid_fps: false,
        }
    }
}

impl HudConfig {
    /// Values the scale calculator reads.
    pub fn scale_config(&self) -> ScaleConfig {
        ScaleConfig {
            st_scale: self.st_scale,
            hud_scale: self.hud_scale,
            aspect_scale: self.hud_aspectscale,
            ui_scale: self.uiscale,
        }
    }

    /// Returns whether the layout must be recomputed.
    pub fn set_st_scale(&mut self, value: i32) -> bool {
        let value = value.max(-1);
        let changed = self.st_scale != value;
        self.st_scale = value;
        changed
    }

    pub fn set_hud_scale(&mut self, value: i32) -> bool {
        let changed = self.hud_scale != value;
        self.hud_scale = value;
        changed
    }

    pub fn set_hud_aspectscale(&mut self, value: bool) -> bool {
        let changed = self.hud_aspectscale != value;
        self.hud_aspectscale = value;
        changed
    }

    pub fn set_uiscale(&mut self, value: i32) -> bool {
        let value = value.max(0);
        let changed = self.uiscale != value;
        self.uiscale = value;
        changed
    }

    pub fn set_am_showmaplabel(&mut self, value: i32) {
        self.am_showmaplabel = if (0..=2).contains(&value) { value } else { 2 };
    }

    /// Apply one `key = value` setting.
    ///
    /// Returns whether the layout must be recomputed. Unknown keys are
    /// logged and ignored.
    pub fn apply(&mut self, key: &str, value: &str) -> std::result::Result<bool, ConfigError> {
        let recompute = match key.to_ascii_lowercase().as_str() {
            "st_scale" => self.set_st_scale(parse_int(key, value)?),
            "hud_scale" => self.set_hud_scale(parse_int(key, value)?),
            "hud_aspectscale" => self.set_hud_aspectscale(parse_bool(key, value)?),
            "uiscale" => self.set_uiscale(parse_int(key, value)?),
            "con_scaletext" => {
                self.con_scaletext = parse_int(key, value)?.max(0);
                false
            }
            "crosshair" => {
                self.crosshair.crosshair = parse_int(key, value)?;
                false
            }
            "crosshairforce" => {
                self.crosshair.force = parse_bool(key, value)?;
                false
            }
            "crosshaircolor" => {
                self.crosshair.color = parse_color(key, value)?;
                false
            }
            "crosshairhealth" => {
                self.crosshair.health = parse_bool(key, value)?;
                false
            }
            "crosshairscale" => {
                self.crosshair.scale = parse_float(key, value)?;
                false
            }
            "crosshairgrow" => {
                self.crosshair.grow = parse_bool(key, value)?;
                false
            }
            "am_showmaplabel" => {
                self.set_am_showmaplabel(parse_int(key, value)?);
                false
            }
            "idmypos" => {
                self.idmypos = parse_bool(key, value)?;
                false
            }
            "underwater_fade_scalar" => {
                self.underwater_fade_scalar = parse_float(key, value)?;
                false
            }
            "paletteflash" => {
                self.paletteflash = PaletteFlash::new(parse_int(key, value)?.max(0) as u32);
                false
            }
            "vid_fps" => {
                self.vid_fps = parse_bool(key, value)?;
                false
            }
            _ => {
                warn!("ignoring unknown setting '{}'", key);
                false
            }
        };
        debug!("{} = {}", key, value);
        Ok(recompute)
    }
}

/// Load HUD settings from a property file.
pub fn load_config(path: &Path) -> Result<HudConfig> {
    let entries = propfile::read_file(path)?;
    let mut config = HudConfig::default();
    for entry in &entries {
        config
            .apply(&entry.key, &entry.value)
            .with_context(|| format!("{}:{}", path.display(), entry.line))?;
    }
    Ok(config)
}

fn parse_int(key: &str, value: &str) -> std::result::Result<i32, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_float(key: &str, value: &str) -> std::result::Result<f32, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

/// Accepts `0xRRGGBB`, `#RRGGBB` and `RR GG BB` (hex components).
fn parse_color(key: &str, value: &str) -> std::result::Result<u32, ConfigError> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix('#'));
    if let Some(hex) = hex {
        return u32::from_str_radix(hex, 16)
            .map(|c| c & 0xffffff)
            .map_err(|_| invalid(key, value));
    }

    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(invalid(key, value));
    }
    let mut color = 0u32;
    for part in parts {
        let component = u8::from_str_radix(part, 16).map_err(|_| invalid(key, value))?;
        color = (color << 8) | component as u32;
    }
    Ok(color)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Parse a resolution string in the format "WIDTHxHEIGHT"
pub fn parse_resolution(s: &str) -> std::result::Result<(i32, i32), ConfigError> {
    let err = || ConfigError::InvalidResolution(s.to_string());
    let (w, h) = s.split_once('x').ok_or_else(err)?;
    let width: i32 = w.trim().parse().map_err(|_| err())?;
    let height: i32 = h.trim().parse().map_err(|_| err())?;
    if width < 0 || height < 0 {
        return Err(err());
    }
    Ok((width, height))
}

/// Parse a logical point in the format "X,Y"
pub fn parse_point(s: &str) -> std::result::Result<(f64, f64), ConfigError> {
    let err = || ConfigError::InvalidPoint(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(err)?;
    let x: f64 = x.trim().parse().map_err(|_| err())?;
    let y: f64 = y.trim().parse().map_err(|_| err())?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HudConfig::default();
        assert_eq!(config.st_scale, -1);
        assert_eq!(config.am_showmaplabel, 2);
        assert_eq!(config.crosshair.color, 0xff0000);
        assert!(config.crosshair.health);
        assert_eq!(config.underwater_fade_scalar, 1.0);
    }

    #[test]
    fn test_st_scale_clamps_and_reports_change() {
        let mut config = HudConfig::default();
        assert!(!config.set_st_scale(-5));
        assert_eq!(config.st_scale, -1);
        assert!(config.set_st_scale(3));
        assert!(!config.set_st_scale(3));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(3, 2)]
    #[case(-1, 2)]
    fn test_map_label_clamp(#[case] input: i32, #[case] expected: i32) {
        let mut config = HudConfig::default();
        config.set_am_showmaplabel(input);
        assert_eq!(config.am_showmaplabel, expected);
    }

    #[test]
    fn test_apply_reports_layout_changes() {
        let mut config = HudConfig::default();
        assert!(config.apply("st_scale", "2").unwrap());
        assert!(config.apply("HUD_AspectScale", "true").unwrap());
        assert!(!config.apply("crosshair", "4").unwrap());
        assert!(!config.apply("no_such_thing", "1").unwrap());
        assert_eq!(config.scale_config().st_scale, 2);
        assert!(config.scale_config().aspect_scale);
        assert_eq!(config.crosshair.crosshair, 4);
    }

    #[rstest]
    #[case("0xff8000", 0xff8000)]
    #[case("#00ff00", 0x00ff00)]
    #[case("ff 80 00", 0xff8000)]
    fn test_colors(#[case] value: &str, #[case] expected: u32) {
        let mut config = HudConfig::default();
        config.apply("crosshaircolor", value).unwrap();
        assert_eq!(config.crosshair.color, expected);
    }

    #[test]
    fn test_malformed_values_error() {
        let mut config = HudConfig::default();
        assert_eq!(
            config.apply("st_scale", "big"),
            Err(ConfigError::InvalidValue {
                key: "st_scale".into(),
                value: "big".into()
            })
        );
        assert!(config.apply("crosshairgrow", "maybe").is_err());
        assert!(config.apply("crosshaircolor", "red").is_err());
    }

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# hud settings").unwrap();
        writeln!(file, "st_scale = 3").unwrap();
        writeln!(file, "am_showmaplabel = 9").unwrap();
        writeln!(file, "paletteflash = 6").unwrap();
        writeln!(file, "mystery = 1").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.st_scale, 3);
        assert_eq!(config.am_showmaplabel, 2);
        assert!(config.paletteflash.contains(PaletteFlash::POISON));
        assert!(config.paletteflash.contains(PaletteFlash::ICE));
    }

    #[test]
    fn test_load_config_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "st_scale = 1").unwrap();
        writeln!(file, "uiscale = lots").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains(":2"));
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("640x480"), Ok((640, 480)));
        assert_eq!(parse_resolution("0x0"), Ok((0, 0)));
        assert!(parse_resolution("640-480").is_err());
        assert!(parse_resolution("640x480x120").is_err());
        assert!(parse_resolution("abcxdef").is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("-10, 20.5"), Ok((-10.0, 20.5)));
        assert!(parse_point("10").is_err());
    }
}
