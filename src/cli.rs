use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{parse_point, parse_resolution, HudConfig};
use crate::logging::LogLevel;

/// Compute status bar placement for a screen and show where a point lands
#[derive(Parser, Debug, Default)]
#[command(name = "hudbar")]
#[command(version)]
#[command(about = "HUD status bar scale and placement calculator", long_about = None)]
pub struct Cli {
    /// Screen resolution (e.g., 1920x1080)
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub res: Option<String>,

    /// Statusbar reference resolution (default 320x200)
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub reference: Option<String>,

    /// Height of the visible statusbar in reference units
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub reltop: i32,

    /// Statusbar scale (-1 for fullscreen aspect-corrected)
    #[arg(long = "st-scale", value_name = "N", allow_hyphen_values = true)]
    pub st_scale: Option<i32>,

    /// HUD scale (negative for clean scaling)
    #[arg(long = "hud-scale", value_name = "N", allow_hyphen_values = true)]
    pub hud_scale: Option<i32>,

    /// Stretch vertically by 1.2
    #[arg(long = "aspect-scale")]
    pub aspect_scale: bool,

    /// HUD settings file (key = value)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logical point to transform (e.g., 160,100)
    #[arg(short, long, value_name = "X,Y", allow_hyphen_values = true)]
    pub point: Option<String>,

    /// Size of the transformed rectangle
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Use fullscreen HUD placement instead of the statusbar
    #[arg(long)]
    pub hud: bool,

    /// Run the showpop command with this argument
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub showpop: Option<String>,

    /// Log verbosity (0 = nothing .. 6 = all)
    #[arg(long = "log-level", value_name = "N")]
    pub log_level: Option<i32>,
}

impl Cli {
    /// Merge CLI arguments into the settings
    pub fn merge_into_config(&self, mut config: HudConfig) -> Result<HudConfig> {
        if let Some(st_scale) = self.st_scale {
            config.set_st_scale(st_scale);
        }
        if let Some(hud_scale) = self.hud_scale {
            config.set_hud_scale(hud_scale);
        }
        if self.aspect_scale {
            config.set_hud_aspectscale(true);
        }
        Ok(config)
    }

    /// Screen size; 640x480 when not given.
    pub fn screen(&self) -> Result<(i32, i32)> {
        Self::resolution_or(&self.res, (640, 480)).context("Invalid resolution format")
    }

    /// Reference resolution; 0x0 lets the layout pick its default.
    pub fn reference(&self) -> Result<(i32, i32)> {
        Self::resolution_or(&self.reference, (0, 0)).context("Invalid reference resolution")
    }

    pub fn point(&self) -> Result<Option<(f64, f64)>> {
        self.point
            .as_deref()
            .map(parse_point)
            .transpose()
            .context("Invalid point")
    }

    pub fn rect_size(&self) -> Result<(i32, i32)> {
        Self::resolution_or(&self.size, (1, 1)).context("Invalid size")
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.map(LogLevel::from_i32).unwrap_or_default()
    }

    fn resolution_or(value: &Option<String>, default: (i32, i32)) -> Result<(i32, i32)> {
        match value {
            Some(s) => Ok(parse_resolution(s)?),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from([
            "hudbar",
            "--res",
            "1920x1080",
            "--st-scale",
            "-1",
            "--point",
            "-10,20",
            "--hud",
        ]);
        assert_eq!(cli.screen().unwrap(), (1920, 1080));
        assert_eq!(cli.st_scale, Some(-1));
        assert_eq!(cli.point().unwrap(), Some((-10.0, 20.0)));
        assert!(cli.hud);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::default();
        assert_eq!(cli.screen().unwrap(), (640, 480));
        assert_eq!(cli.reference().unwrap(), (0, 0));
        assert_eq!(cli.rect_size().unwrap(), (1, 1));
        assert_eq!(cli.point().unwrap(), None);
        assert_eq!(cli.log_level(), LogLevel::Warning);
    }

    #[test]
    fn test_merge_config() {
        let cli = Cli {
            st_scale: Some(-7),
            hud_scale: Some(2),
            aspect_scale: true,
            ..Default::default()
        };
        let config = cli.merge_into_config(HudConfig::default()).unwrap();
        assert_eq!(config.st_scale, -1);
        assert_eq!(config.hud_scale, 2);
        assert!(config.hud_aspectscale);
    }

    #[test]
    fn test_invalid_resolution() {
        let cli = Cli {
            res: Some("invalid".to_string()),
            ..Default::default()
        };
        let err = cli.screen().unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid resolution format"));
    }
}
