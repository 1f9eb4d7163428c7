//! Full-screen color blending.
//!
//! Each frame the view blend is accumulated from the environment (e.g.
//! underwater), the player's status effects and flashes, and the player's own
//! blend color, then clamped and handed to the renderer.

/// Game ticks per second.
pub const TICRATE: i32 = 35;

/// Upper bound on the pain flash alpha (out of 255).
pub const MAX_PAIN_BLEND: i32 = 228;

/// Damage count to pain flash alpha.
const DAMAGE_TO_ALPHA: [u8; 114] = [
    0, 8, 16, 23, 30, 36, 42, 47, 53, 58, 62, 67, 71, 75, 79, 83, 87, 90, 94, 97, 100, 103, 107,
    109, 112, 115, 118, 120, 123, 125, 128, 130, 133, 135, 137, 139, 141, 143, 145, 147, 149, 151,
    153, 155, 157, 159, 160, 162, 164, 165, 167, 169, 170, 172, 173, 175, 176, 178, 179, 181, 182,
    183, 185, 186, 187, 189, 190, 191, 192, 194, 195, 196, 197, 198, 200, 201, 202, 203, 204, 205,
    206, 207, 209, 210, 211, 212, 213, 214, 215, 216, 217, 218, 219, 220, 221, 221, 222, 223, 224,
    225, 226, 227, 228, 229, 229, 230, 231, 232, 233, 234, 235, 235, 236, 237,
];

/// Palette-flash compatibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteFlash(u32);

impl PaletteFlash {
    pub const HEXEN_WEAPONS: u32 = 1 << 0;
    pub const POISON: u32 = 1 << 1;
    pub const ICE: u32 = 1 << 2;
    pub const HAZARD: u32 = 1 << 3;

    pub const fn new(flags: u32) -> Self {
        Self(flags)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) == flag
    }
}

/// Final blend in renderer units: color 0..=255, alpha 0..=256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendColor {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

/// Four-component blend accumulator, each component in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenBlend {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ScreenBlend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a color on top of the accumulated blend.
    ///
    /// Non-positive alpha leaves the blend untouched.
    pub fn add(&mut self, r: f32, g: f32, b: f32, a: f32) {
        if a <= 0.0 {
            return;
        }
        let a2 = self.a + (1.0 - self.a) * a;
        let a3 = self.a / a2;
        self.r = self.r * a3 + r * (1.0 - a3);
        self.g = self.g * a3 + g * (1.0 - a3);
        self.b = self.b * a3 + b * (1.0 - a3);
        self.a = a2;
    }

    /// Convert to renderer units, clamped.
    pub fn to_color(&self) -> BlendColor {
        BlendColor {
            r: ((self.r * 255.0) as i32).clamp(0, 255),
            g: ((self.g * 255.0) as i32).clamp(0, 255),
            b: ((self.b * 255.0) as i32).clamp(0, 255),
            a: ((self.a * 256.0) as i32).clamp(0, 256),
        }
    }
}

/// Environmental base blend (e.g. the sector the view is in).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvironmentBlend {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: f32,
}

/// Damage type that tints the view blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DamageKind {
    #[default]
    Normal,
    Ice,
}

/// Player-side inputs of the view blend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerBlendState {
    /// Blend colors of active powerups; alpha 0 entries are ignored.
    pub powerup_blends: Vec<crate::hud::render::Color>,
    /// Ticks left on the item pickup flash.
    pub bonus_count: i32,
    /// Ticks left on the damage flash.
    pub damage_count: i32,
    pub pain_flash: crate::hud::render::Color,
    pub poison_count: i32,
    pub hazard_count: i32,
    pub damage_kind: DamageKind,
    /// Direct player blend (r, g, b, a in 0..1).
    pub direct: [f32; 4],
}

/// Add the player's flashes and status tints.
pub fn add_player_blend(
    blend: &mut ScreenBlend,
    player: &PlayerBlendState,
    flash: PaletteFlash,
    pickup_color: crate::hud::render::Color,
    max_inv_alpha: f32,
    max_pain_blend: i32,
) {
    for color in player.powerup_blends.iter().filter(|c| c.a != 0) {
        blend.add(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
            color.a as f32 / 255.0,
        );
    }

    if player.bonus_count > 0 {
        let cnt = player.bonus_count << 3;
        blend.add(
            pickup_color.r as f32 / 255.0,
            pickup_color.g as f32 / 255.0,
            pickup_color.b as f32 / 255.0,
            if cnt > 128 { 0.5 } else { cnt as f32 / 255.0 },
        );
    }

    let pain = player.pain_flash;
    if pain.a != 0 && player.damage_count > 0 {
        let index = (player.damage_count * pain.a as i32 / 255).clamp(0, 113) as usize;
        let cnt = (DAMAGE_TO_ALPHA[index] as i32).min(max_pain_blend);
        if cnt > 0 {
            blend.add(
                pain.r as f32 / 255.0,
                pain.g as f32 / 255.0,
                pain.b as f32 / 255.0,
                cnt as f32 / 255.0,
            );
        }
    }

    if player.poison_count > 0 {
        let cnt = player.poison_count.min(64);
        if flash.contains(PaletteFlash::POISON) {
            blend.add(
                44.0 / 255.0,
                92.0 / 255.0,
                36.0 / 255.0,
                ((cnt + 7) >> 3) as f32 * 0.1,
            );
        } else {
            blend.add(0.04, 0.2571, 0.0, cnt as f32 / 93.257_14);
        }
    }

    if player.hazard_count > 0 {
        if flash.contains(PaletteFlash::HAZARD) {
            if player.hazard_count > 16 * TICRATE || (player.hazard_count & 8) != 0 {
                blend.add(0.0, 1.0, 0.0, 0.125);
            }
        } else {
            let cnt = (player.hazard_count / 8).min(64);
            blend.add(0.0, 0.2571, 0.0, cnt as f32 / 93.257_14);
        }
    }

    if player.damage_kind == DamageKind::Ice {
        if flash.contains(PaletteFlash::ICE) {
            blend.add(0.0, 0.0, 224.0 / 255.0, 0.5);
        } else {
            blend.add(0.0, 0.0, 0.5, 0.4);
        }
    }

    if blend.a > max_inv_alpha {
        blend.a = max_inv_alpha;
    }
}

/// Inputs for one frame's view blend.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBlendInputs<'a> {
    pub environment: EnvironmentBlend,
    /// User multiplier on the environment alpha.
    pub underwater_scalar: f32,
    pub player: &'a PlayerBlendState,
    pub flash: PaletteFlash,
    pub pickup_color: crate::hud::render::Color,
    /// The direct player blend is only applied when nothing covers the view.
    pub direct_visible: bool,
}

/// Compose the view blend in its fixed order and clamp it.
pub fn compose_view_blend(inputs: &ViewBlendInputs<'_>) -> BlendColor {
    let mut blend = ScreenBlend::new();
    let env = inputs.environment;
    blend.add(
        env.r as f32 / 255.0,
        env.g as f32 / 255.0,
        env.b as f32 / 255.0,
        env.a * inputs.underwater_scalar,
    );
    add_player_blend(
        &mut blend,
        inputs.player,
        inputs.flash,
        inputs.pickup_color,
        1.0,
        MAX_PAIN_BLEND,
    );
    if inputs.direct_visible {
        let [r, g, b, a] = inputs.player.direct;
        blend.add(r, g, b, a);
    }
    blend.to_color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::render::Color;

    fn inputs(player: &PlayerBlendState) -> ViewBlendInputs<'_> {
        ViewBlendInputs {
            environment: EnvironmentBlend::default(),
            underwater_scalar: 1.0,
            player,
            flash: PaletteFlash::default(),
            pickup_color: Color::from_rgb24(0xd6ba45),
            direct_visible: true,
        }
    }

    #[test]
    fn test_add_blend_first_layer_takes_color() {
        let mut blend = ScreenBlend::new();
        blend.add(1.0, 0.5, 0.0, 0.25);
        assert_eq!(blend, ScreenBlend { r: 1.0, g: 0.5, b: 0.0, a: 0.25 });
    }

    #[test]
    fn test_add_blend_ignores_zero_alpha() {
        let mut blend = ScreenBlend::new();
        blend.add(1.0, 1.0, 1.0, 0.0);
        assert_eq!(blend, ScreenBlend::new());
    }

    #[test]
    fn test_add_blend_combines_alpha() {
        let mut blend = ScreenBlend::new();
        blend.add(1.0, 0.0, 0.0, 0.5);
        blend.add(0.0, 0.0, 1.0, 0.5);
        assert!((blend.a - 0.75).abs() < 1e-6);
        // Old color keeps 0.5 / 0.75 of the weight.
        assert!((blend.r - 2.0 / 3.0).abs() < 1e-6);
        assert!((blend.b - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_color_clamps() {
        let blend = ScreenBlend { r: 1.5, g: -0.2, b: 0.5, a: 1.2 };
        assert_eq!(
            blend.to_color(),
            BlendColor { r: 255, g: 0, b: 127, a: 256 }
        );
    }

    #[test]
    fn test_empty_view_blend() {
        let player = PlayerBlendState::default();
        assert_eq!(compose_view_blend(&inputs(&player)), BlendColor::default());
    }

    #[test]
    fn test_underwater_scalar_scales_environment() {
        let player = PlayerBlendState::default();
        let mut i = inputs(&player);
        i.environment = EnvironmentBlend { r: 0, g: 0, b: 255, a: 0.5 };
        i.underwater_scalar = 0.5;
        assert_eq!(compose_view_blend(&i), BlendColor { r: 0, g: 0, b: 255, a: 64 });
        i.underwater_scalar = 0.0;
        assert_eq!(compose_view_blend(&i), BlendColor::default());
    }

    #[test]
    fn test_direct_blend_only_when_visible() {
        let player = PlayerBlendState {
            direct: [1.0, 0.0, 0.0, 0.5],
            ..PlayerBlendState::default()
        };
        let mut i = inputs(&player);
        assert_eq!(compose_view_blend(&i), BlendColor { r: 255, g: 0, b: 0, a: 128 });
        i.direct_visible = false;
        assert_eq!(compose_view_blend(&i), BlendColor::default());
    }

    #[test]
    fn test_poison_palette_flash_variant() {
        let player = PlayerBlendState {
            poison_count: 20,
            ..PlayerBlendState::default()
        };
        let mut plain = ScreenBlend::new();
        add_player_blend(&mut plain, &player, PaletteFlash::default(), Color::default(), 1.0, MAX_PAIN_BLEND);
        assert!((plain.a - 20.0 / 93.257_14).abs() < 1e-6);

        let mut hexen = ScreenBlend::new();
        add_player_blend(
            &mut hexen,
            &player,
            PaletteFlash::new(PaletteFlash::POISON),
            Color::default(),
            1.0,
            MAX_PAIN_BLEND,
        );
        // (20 + 7) >> 3 == 3
        assert!((hexen.a - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_hazard_flash_blinks() {
        let flash = PaletteFlash::new(PaletteFlash::HAZARD);
        let mut on = ScreenBlend::new();
        let player = PlayerBlendState {
            hazard_count: 8,
            ..PlayerBlendState::default()
        };
        add_player_blend(&mut on, &player, flash, Color::default(), 1.0, MAX_PAIN_BLEND);
        assert!((on.a - 0.125).abs() < 1e-6);

        let mut off = ScreenBlend::new();
        let player = PlayerBlendState {
            hazard_count: 16,
            ..PlayerBlendState::default()
        };
        add_player_blend(&mut off, &player, flash, Color::default(), 1.0, MAX_PAIN_BLEND);
        assert_eq!(off.a, 0.0);
    }

    #[test]
    fn test_pain_flash_capped() {
        let player = PlayerBlendState {
            damage_count: 500,
            pain_flash: Color::new(255, 0, 0, 255),
            ..PlayerBlendState::default()
        };
        let mut blend = ScreenBlend::new();
        add_player_blend(&mut blend, &player, PaletteFlash::default(), Color::default(), 1.0, 100);
        assert!((blend.a - 100.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_bonus_flash_saturates_at_half() {
        let player = PlayerBlendState {
            bonus_count: 30,
            ..PlayerBlendState::default()
        };
        let mut blend = ScreenBlend::new();
        add_player_blend(&mut blend, &player, PaletteFlash::default(), Color::rgb(255, 255, 0), 1.0, 228);
        assert_eq!(blend.a, 0.5);
    }

    #[test]
    fn test_max_inv_alpha_caps() {
        let player = PlayerBlendState {
            damage_kind: DamageKind::Ice,
            powerup_blends: vec![Color::new(255, 255, 255, 255)],
            ..PlayerBlendState::default()
        };
        let mut blend = ScreenBlend::new();
        add_player_blend(&mut blend, &player, PaletteFlash::default(), Color::default(), 0.75, 228);
        assert_eq!(blend.a, 0.75);
    }
}
