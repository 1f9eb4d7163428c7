//! HUD status bar core.
//!
//! Scale calculation, coordinate transformation, the timed message queue and
//! per-frame orchestration of the status bar.

pub mod aspect;
pub mod blend;
pub mod crosshair;
pub mod draw;
pub mod error;
pub mod fade_message;
pub mod format;
pub mod hooks;
pub mod layout;
pub mod message;
pub mod popup_log;
pub mod render;
pub mod resolution;
pub mod scale;
pub mod status_bar;
pub mod transform;

pub use aspect::ScreenSize;
pub use error::{HudError, HudResult};
pub use hooks::{AltHud, BaseHooks, DrawFrame, HudState, StatusBarHooks};
pub use layout::HudLayout;
pub use message::{HudMessage, MessageHandle, MessageLayer, MessageQueue, Visibility};
pub use render::{RecordingSink, RenderCommand, RenderSink};
pub use resolution::ReferenceResolution;
pub use scale::{ScaleConfig, ScaleState, Vec2};
pub use status_bar::{FrameState, PlayerInfo, StatusBar, ViewEnvironment};
pub use transform::{DrawFlags, HudRect, PixelRect};
