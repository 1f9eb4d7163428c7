// hudbar library
// Status bar scaling, HUD coordinate transformation and message queue

pub mod cli;
pub mod commands;
pub mod config;
pub mod hud;
pub mod logging;
pub mod propfile;

pub use cli::Cli;
pub use config::{HudConfig, ConfigError};
pub use hud::StatusBar;
pub use logging::LogLevel;
