//! Level lifecycle: load, spawn, teardown.
//!
//! Loading runs on entering [`AppState::Loading`] and acts as the readiness
//! gate: gameplay systems only run in `Playing`, which is entered after every
//! body and entity of the level exists. A restart is a full teardown followed
//! by a reload, never an in-flight cancellation.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::config::GameConfig;
use crate::core::events::GameEventQueue;
use crate::core::level::layout::LevelFile;
use crate::gameplay::spawn;
use crate::physics::world::PhysicsWorld;
use crate::rendering::theme::Theme;

/// Marker on every entity spawned for the current level (platforms, points,
/// finish, player, bullets). Teardown queries this.
#[derive(Component)]
pub struct LevelEntity;

/// Which level id to load on the next pass through `Loading`.
#[derive(Resource, Debug, Clone)]
pub struct LevelRequest {
    pub id: String,
}

/// Counters and identity of the loaded level.
#[derive(Resource, Debug, Clone)]
pub struct CurrentLevel {
    pub id: String,
    pub hue: f32,
    total_points: u32,
    collected_points: u32,
}

impl CurrentLevel {
    pub fn new(id: String, hue: f32, total_points: u32) -> Self {
        Self {
            id,
            hue,
            total_points,
            collected_points: 0,
        }
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn collected_points(&self) -> u32 {
        self.collected_points
    }

    /// Monotonic within a level's lifetime; capped at the total.
    pub fn collect_point(&mut self) {
        self.collected_points = (self.collected_points + 1).min(self.total_points);
    }

    pub fn is_finished(&self) -> bool {
        self.collected_points == self.total_points
    }
}

pub struct LevelLoaderPlugin;

impl Plugin for LevelLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), load_level);
    }
}

/// Load the requested level and spawn its entities.
///
/// A missing or unparsable level file is fatal: the asset pipeline is assumed
/// correct by the time gameplay starts, so this indicates a broken install.
fn load_level(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    request: Res<LevelRequest>,
    mut physics: ResMut<PhysicsWorld>,
    mut theme: ResMut<Theme>,
    mut events: ResMut<GameEventQueue>,
    mut next: ResMut<NextState<AppState>>,
) {
    let path = format!("assets/levels/{}.ron", request.id);
    let level = match LevelFile::load_from_file(&path) {
        Ok(level) => level,
        Err(e) => panic!("required level asset '{}' unavailable: {e}", request.id),
    };

    *theme = Theme::from_hue(level.hue);
    events.clear();

    spawn::spawn_level(&mut commands, &mut physics, &cfg, &theme, &level);
    commands.insert_resource(CurrentLevel::new(
        request.id.clone(),
        level.hue,
        level.total_points(),
    ));

    info!(
        target: "level",
        "loaded '{}' ({}): {} static, {} dynamic, {} points",
        request.id,
        level.name,
        level.static_platforms.len(),
        level.dynamic_platforms.len(),
        level.total_points(),
    );
    next.set(AppState::Playing);
}

/// Destroy every body the level is responsible for, then despawn the
/// entities. Runs before the level data is replaced so no dangling bodies
/// stay in the world.
pub fn teardown_level(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    level_entities: impl Iterator<Item = Entity>,
) {
    let mut torn_down = 0usize;
    for entity in level_entities {
        physics.destroy_body(entity);
        commands.entity(entity).try_despawn();
        torn_down += 1;
    }
    debug!(target: "level", "teardown: removed {torn_down} level entities");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_collection_is_monotonic_and_capped() {
        let mut level = CurrentLevel::new("t".into(), 0.0, 2);
        assert!(!level.is_finished());
        level.collect_point();
        assert_eq!(level.collected_points(), 1);
        assert!(!level.is_finished());
        level.collect_point();
        assert!(level.is_finished());
        // Extra collections never push past the total or un-finish.
        level.collect_point();
        assert_eq!(level.collected_points(), 2);
        assert!(level.is_finished());
    }

    #[test]
    fn zero_point_level_is_immediately_finished() {
        let level = CurrentLevel::new("t".into(), 0.0, 0);
        assert!(level.is_finished());
    }
}
