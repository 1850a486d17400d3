//! Level color scheme derived from the level's hue.
//!
//! The theme is a single resource threaded explicitly into the sprite color
//! sync; nothing reads or writes a process-wide "current color". Loading a
//! level replaces the resource wholesale.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::system::system_order::RenderSyncSet;

/// Which palette entry an entity's sprite is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    Background,
    StaticPlatform,
    DynamicPlatform,
    Player,
    Bullet,
    Point,
    Finish,
}

/// Binds a sprite to a palette slot so colors follow the level theme.
#[derive(Component, Debug, Clone, Copy)]
pub struct ThemeRole(pub PaletteSlot);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Theme {
    pub hue: f32,
    background: Color,
    static_platform: Color,
    dynamic_platform: Color,
    player: Color,
    bullet: Color,
    point: Color,
    finish: Color,
}

impl Theme {
    /// Derive the whole scheme from a single hue in degrees.
    pub fn from_hue(hue: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        Self {
            hue,
            background: Color::hsl(hue, 0.35, 0.12),
            static_platform: Color::hsl(hue, 0.30, 0.45),
            dynamic_platform: Color::hsl(hue, 0.55, 0.60),
            player: Color::hsl((hue + 180.0) % 360.0, 0.70, 0.60),
            bullet: Color::hsl((hue + 180.0) % 360.0, 0.80, 0.75),
            point: Color::hsl((hue + 60.0) % 360.0, 0.85, 0.65),
            finish: Color::hsl((hue + 120.0) % 360.0, 0.75, 0.55),
        }
    }

    pub fn color(&self, slot: PaletteSlot) -> Color {
        match slot {
            PaletteSlot::Background => self.background,
            PaletteSlot::StaticPlatform => self.static_platform,
            PaletteSlot::DynamicPlatform => self.dynamic_platform,
            PaletteSlot::Player => self.player,
            PaletteSlot::Bullet => self.bullet,
            PaletteSlot::Point => self.point,
            PaletteSlot::Finish => self.finish,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_hue(210.0)
    }
}

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        // Tests often run with only MinimalPlugins; make sure ClearColor exists.
        if app.world().get_resource::<ClearColor>().is_none() {
            app.init_resource::<ClearColor>();
        }
        app.init_resource::<Theme>().add_systems(
            Update,
            (apply_theme_colors, apply_clear_color)
                .in_set(RenderSyncSet)
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Re-tint bound sprites whenever the theme changes (level load/hue edit).
fn apply_theme_colors(theme: Res<Theme>, mut q: Query<(&ThemeRole, &mut Sprite)>) {
    if !theme.is_changed() {
        return;
    }
    for (role, mut sprite) in &mut q {
        sprite.color = theme.color(role.0);
    }
}

fn apply_clear_color(theme: Res<Theme>, mut clear: ResMut<ClearColor>) {
    if theme.is_changed() {
        clear.0 = theme.color(PaletteSlot::Background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_into_range() {
        assert_eq!(Theme::from_hue(370.0).hue, 10.0);
        assert_eq!(Theme::from_hue(-30.0).hue, 330.0);
    }

    #[test]
    fn slots_have_distinct_colors() {
        let t = Theme::from_hue(120.0);
        assert_ne!(
            t.color(PaletteSlot::Background),
            t.color(PaletteSlot::Player)
        );
        assert_ne!(
            t.color(PaletteSlot::StaticPlatform),
            t.color(PaletteSlot::DynamicPlatform)
        );
    }
}
