//! Pointer aim + bullet firing with recoil.
//!
//! Shooting is the movement verb: every shot applies an equal-and-opposite
//! impulse to the player's body, which is how the player traverses the level.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::app::state::AppState;
use crate::core::components::Player;
use crate::core::config::GameConfig;
use crate::core::system::system_order::InputSet;
use crate::gameplay::progress::SessionStats;
use crate::gameplay::spawn;
use crate::physics::world::PhysicsWorld;
use crate::rendering::theme::Theme;

/// Sampled pointer state, refreshed once per tick before firing.
#[derive(Resource, Debug, Default)]
pub struct AimInput {
    /// Pointer position in world pixels, if a pointer is over the window.
    pub target_px: Option<Vec2>,
}

pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AimInput>().add_systems(
            Update,
            (track_pointer, fire_bullet)
                .chain()
                .in_set(InputSet)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

fn cursor_world_pos(
    camera_q: &Query<(&Camera, &GlobalTransform)>,
    screen_pos: Vec2,
) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    touches: Res<Touches>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut aim: ResMut<AimInput>,
) {
    aim.target_px = None;
    let Some(window) = windows.iter().next() else {
        return;
    };
    let screen_pos = touches
        .iter()
        .next()
        .map(|t| t.position())
        .or_else(|| window.cursor_position());
    aim.target_px = screen_pos.and_then(|p| cursor_world_pos(&camera_q, p));
}

fn fire_bullet(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    aim: Res<AimInput>,
    cfg: Res<GameConfig>,
    theme: Res<Theme>,
    mut players: Query<(Entity, &Transform, &mut Player)>,
    mut physics: ResMut<PhysicsWorld>,
    mut stats: ResMut<SessionStats>,
    mut commands: Commands,
) {
    let fired = buttons.just_pressed(MouseButton::Left) || touches.any_just_pressed();
    if !fired {
        return;
    }
    let Some(target) = aim.target_px else {
        return;
    };
    let Some((entity, tf, mut player)) = players.iter_mut().next() else {
        return;
    };

    let origin = tf.translation.truncate();
    let mut dir = (target - origin).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let spread = cfg.bullet.spread;
    if spread > 0.0 {
        let jitter = rand::thread_rng().gen_range(-spread..spread);
        dir = Vec2::from_angle(jitter).rotate(dir);
    }

    let muzzle = origin + dir * (cfg.player.radius_px + cfg.bullet.radius_px + 1.0);
    spawn::spawn_bullet(&mut commands, &mut physics, &cfg, &theme, muzzle, dir);
    physics.apply_impulse(entity, -dir * cfg.player.recoil_impulse);
    player.shots_fired += 1;
    stats.shots_fired += 1;
}
