//! Crosshair selection, pickup flash and drawing.

use log::warn;

use crate::hud::aspect::ScreenSize;
use crate::hud::render::{Color, DrawTextureArgs, RenderSink, TextureId, TextureManager};
use crate::hud::transform::HudRect;

/// Size change per tick while shrinking back after a pickup flash.
pub const XHAIR_SHRINK_SIZE: f64 = 1.0 / 18.0;
/// Size a pickup flash enlarges the crosshair to.
pub const XHAIR_PICKUP_SIZE: f64 = 2.0 + XHAIR_SHRINK_SIZE;

/// Crosshair-related console settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairSettings {
    /// Configured crosshair number; 0 disables it.
    pub crosshair: i32,
    /// Ignore the weapon's own crosshair.
    pub force: bool,
    /// `0xRRGGBB`
    pub color: u32,
    /// Color by the player's health instead of `color`.
    pub health: bool,
    pub scale: f32,
    /// Enlarge on item pickup.
    pub grow: bool,
}

impl Default for CrosshairSettings {
    fn default() -> Self {
        Self {
            crosshair: 0,
            force: false,
            color: 0xff0000,
            health: true,
            scale: 1.0,
            grow: false,
        }
    }
}

/// What the crosshair needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrosshairView {
    /// Crosshair number of the ready weapon, 0 for none.
    pub weapon_crosshair: i32,
    pub chasecam: bool,
    pub title_level: bool,
    pub camera_health: i32,
    /// Player health as a percentage of its spawn health.
    pub health_percent: i32,
    /// Centre of the 3D view in real pixels.
    pub view_center: (i32, i32),
}

/// Currently loaded crosshair and its pickup-flash size.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairState {
    selector: i32,
    image: Option<TextureId>,
    image_size: (f64, f64),
    size: f64,
}

impl Default for CrosshairState {
    fn default() -> Self {
        Self {
            selector: 0,
            image: None,
            image_size: (0.0, 0.0),
            size: 1.0,
        }
    }
}

impl CrosshairState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn selector(&self) -> i32 {
        self.selector
    }

    pub fn image(&self) -> Option<TextureId> {
        self.image
    }

    /// Enlarge for an item pickup.
    pub fn flash(&mut self) {
        self.size = XHAIR_PICKUP_SIZE;
    }

    /// Set the current size directly; never below 1.
    pub fn set_size(&mut self, size: f64) {
        self.size = size.max(1.0);
    }

    /// Shrink one step back toward normal size.
    pub fn tick(&mut self) {
        if self.size > 1.0 {
            self.size = (self.size - XHAIR_SHRINK_SIZE).max(1.0);
        }
    }

    pub fn unload(&mut self) {
        self.selector = 0;
        self.image = None;
    }

    /// Load the crosshair image, if the wanted one is not loaded already.
    pub fn load(
        &mut self,
        settings: &CrosshairSettings,
        weapon_crosshair: i32,
        screen: ScreenSize,
        textures: &dyn TextureManager,
    ) {
        let mut num = if !settings.force && weapon_crosshair != 0 {
            weapon_crosshair
        } else {
            settings.crosshair
        };
        num = num.abs();

        if self.selector == num && self.image.is_some() {
            return;
        }
        if num == 0 {
            self.unload();
            return;
        }

        let size = if screen.width < 640 { 'S' } else { 'B' };
        let candidates = [
            format!("XHAIR{}{}", size, num),
            format!("XHAIR{}1", size),
            "XHAIRS1".to_string(),
        ];
        let found = candidates.iter().find_map(|name| {
            let id = textures.find(name)?;
            textures.info(id).map(|info| (id, info))
        });

        match found {
            Some((id, info)) => {
                self.selector = num;
                self.image = Some(id);
                self.image_size = (info.width, info.height);
            }
            None => {
                warn!("no crosshair image for selector {}", num);
                self.unload();
            }
        }
    }

    /// Load the right image and draw it centred on the view.
    pub fn draw(
        &mut self,
        settings: &CrosshairSettings,
        view: &CrosshairView,
        screen: ScreenSize,
        textures: &dyn TextureManager,
        sink: &mut dyn RenderSink,
    ) {
        if view.chasecam {
            return;
        }
        self.load(settings, view.weapon_crosshair, screen, textures);
        let Some(image) = self.image else {
            return;
        };
        if view.title_level || view.camera_health <= 0 {
            return;
        }

        let mut size = if settings.scale > 0.0 {
            screen.height as f64 * settings.scale as f64 / 200.0
        } else {
            1.0
        };
        if settings.grow {
            size *= self.size;
        }
        let w = (self.image_size.0 * size) as i32;
        let h = (self.image_size.1 * size) as i32;

        let color = if settings.health {
            health_color(view.health_percent)
        } else {
            settings.color & 0xffffff
        };

        let (cx, cy) = view.view_center;
        sink.draw_texture(&DrawTextureArgs {
            texture: image,
            rect: HudRect::new(
                cx as f64 - (w / 2) as f64,
                cy as f64 - (h / 2) as f64,
                w as f64,
                h as f64,
            ),
            translation: 0,
            color_overlay: None,
            alpha: 1.0,
            alpha_channel: true,
            fill_color: Some(Color::from_rgb24(color)),
            flip_x: false,
        });
    }
}

/// Crosshair color for a health percentage: green when healthy, then a
/// ramp through yellow to red.
pub fn health_color(health_percent: i32) -> u32 {
    if health_percent >= 85 {
        return 0x00ff00;
    }
    let health = (health_percent - 25).max(0);
    let (red, green) = if health < 30 {
        (255, health * 255 / 30)
    } else {
        ((60 - health) * 255 / 30, 255)
    };
    ((red as u32) << 16) | ((green as u32) << 8)
}
