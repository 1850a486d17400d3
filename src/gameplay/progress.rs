//! Gameplay reaction systems: act on flags raised by contact/overlap
//! detection and on queued events. This is the only place entities and
//! bodies are removed during play.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{Bullet, Platform, Player, PointPickup};
use crate::core::config::GameConfig;
use crate::core::events::{GameEvent, GameEventQueue};
use crate::core::level::loader::{teardown_level, CurrentLevel, LevelEntity, LevelRequest};
use crate::core::system::system_order::{GameplaySet, InputSet};
use crate::physics::world::PhysicsWorld;

/// Terminal outcomes reported at the boundary; a preferences/leaderboard
/// store would persist these (out of scope here).
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub points_collected: u32,
    pub levels_finished: u32,
    pub rewards_granted: u32,
}

pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionStats>()
            .add_systems(
                Update,
                flow_hotkeys
                    .in_set(InputSet)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(
                Update,
                (
                    expire_bullets,
                    remove_spent_bullets,
                    remove_marked_platforms,
                    collect_points,
                    record_outcomes,
                    watch_kill_plane,
                    handle_level_flow,
                )
                    .chain()
                    .in_set(GameplaySet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// R restarts, N skips to the next level.
fn flow_hotkeys(keys: Res<ButtonInput<KeyCode>>, mut events: ResMut<GameEventQueue>) {
    if keys.just_pressed(KeyCode::KeyR) {
        events.push(GameEvent::RestartLevel);
    }
    if keys.just_pressed(KeyCode::KeyN) {
        events.push(GameEvent::LevelSkipRequested);
    }
}

fn expire_bullets(time: Res<Time>, mut bullets: Query<&mut Bullet>) {
    let dt = time.delta_secs();
    for mut bullet in &mut bullets {
        bullet.lifetime -= dt;
    }
}

/// Bullets flagged by contact resolution (or out of lifetime) leave the
/// simulation here: body detached first, then the entity despawned.
fn remove_spent_bullets(
    mut commands: Commands,
    mut physics: ResMut<PhysicsWorld>,
    bullets: Query<(Entity, &Bullet)>,
) {
    for (entity, bullet) in &bullets {
        if bullet.collided_with_platform || bullet.lifetime <= 0.0 {
            physics.destroy_body(entity);
            commands.entity(entity).try_despawn();
        }
    }
}

fn remove_marked_platforms(
    mut commands: Commands,
    mut physics: ResMut<PhysicsWorld>,
    platforms: Query<(Entity, &Platform)>,
) {
    for (entity, platform) in &platforms {
        if platform.remove {
            physics.destroy_body(entity);
            commands.entity(entity).try_despawn();
            debug!(target: "gameplay", "destructible platform {entity:?} removed");
        }
    }
}

/// Points marked by the overlap scan are despawned on the tick the flag is
/// first observed, so the counter can never double-count one pickup.
fn collect_points(
    mut commands: Commands,
    mut physics: ResMut<PhysicsWorld>,
    level: Option<ResMut<CurrentLevel>>,
    points: Query<(Entity, &PointPickup)>,
    mut events: ResMut<GameEventQueue>,
) {
    let Some(mut level) = level else {
        return;
    };
    for (entity, point) in &points {
        if !point.collected {
            continue;
        }
        physics.destroy_body(entity);
        commands.entity(entity).try_despawn();
        level.collect_point();
        events.push(GameEvent::PointCollected { point: entity });
        if level.is_finished() {
            events.push(GameEvent::RewardGranted);
        }
    }
}

/// Sole consumer of `PointCollected` and `RewardGranted`.
fn record_outcomes(mut events: ResMut<GameEventQueue>, mut stats: ResMut<SessionStats>) {
    for event in events.drain_matching(|e| {
        matches!(
            e,
            GameEvent::PointCollected { .. } | GameEvent::RewardGranted
        )
    }) {
        match event {
            GameEvent::PointCollected { .. } => stats.points_collected += 1,
            GameEvent::RewardGranted => {
                stats.rewards_granted += 1;
                info!(target: "gameplay", "all points collected, reward granted");
            }
            _ => {}
        }
    }
}

/// Falling below the kill plane restarts the level.
fn watch_kill_plane(
    cfg: Res<GameConfig>,
    players: Query<&Transform, With<Player>>,
    mut events: ResMut<GameEventQueue>,
) {
    for tf in &players {
        if tf.translation.y < cfg.player.kill_depth_px {
            events.push(GameEvent::RestartLevel);
        }
    }
}

/// Sole consumer of `RestartLevel`, `LevelFinished` and `LevelSkipRequested`:
/// tears the level down and routes back through `Loading`.
fn handle_level_flow(
    mut commands: Commands,
    mut physics: ResMut<PhysicsWorld>,
    mut events: ResMut<GameEventQueue>,
    mut stats: ResMut<SessionStats>,
    cfg: Res<GameConfig>,
    mut request: ResMut<LevelRequest>,
    level_entities: Query<Entity, With<LevelEntity>>,
    mut next: ResMut<NextState<AppState>>,
) {
    let mut reload = false;
    for event in events.drain_matching(|e| {
        matches!(
            e,
            GameEvent::RestartLevel | GameEvent::LevelFinished | GameEvent::LevelSkipRequested
        )
    }) {
        match event {
            GameEvent::RestartLevel => {
                info!(target: "gameplay", "restarting '{}'", request.id);
                reload = true;
            }
            GameEvent::LevelFinished => {
                stats.levels_finished += 1;
                let next_id = next_level_id(&cfg, &request.id);
                info!(target: "gameplay", "finished '{}', next '{}'", request.id, next_id);
                request.id = next_id;
                reload = true;
            }
            GameEvent::LevelSkipRequested => {
                request.id = next_level_id(&cfg, &request.id);
                reload = true;
            }
            _ => {}
        }
    }
    if reload {
        teardown_level(&mut commands, &mut physics, level_entities.iter());
        next.set(AppState::Loading);
    }
}

fn next_level_id(cfg: &GameConfig, current: &str) -> String {
    let order = &cfg.levels.order;
    order
        .iter()
        .position(|id| id == current)
        .map(|i| order[(i + 1) % order.len()].clone())
        .unwrap_or_else(|| cfg.levels.default_level_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_level_wraps_in_order() {
        let mut cfg = GameConfig::default();
        cfg.levels.order = vec!["a".into(), "b".into()];
        cfg.levels.default_level_id = "a".into();
        assert_eq!(next_level_id(&cfg, "a"), "b");
        assert_eq!(next_level_id(&cfg, "b"), "a");
        // Unknown id falls back to the configured default.
        assert_eq!(next_level_id(&cfg, "zz"), "a");
    }
}
