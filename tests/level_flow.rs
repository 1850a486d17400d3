//! Level lifecycle against the real asset files: load, restart, skip.
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use recoil_runner::core::components::{Finish, Platform, Player, PointPickup};
use recoil_runner::core::level::loader::{CurrentLevel, LevelLoaderPlugin, LevelRequest};
use recoil_runner::gameplay::progress::ProgressPlugin;
use recoil_runner::physics::world::PhysicsWorld;
use recoil_runner::rendering::theme::Theme;
use recoil_runner::{AppState, GameConfig, GameEvent, GameEventQueue};

fn loader_app(level_id: &str) -> App {
    let mut cfg = GameConfig::default();
    cfg.levels.order = vec!["level01".into(), "level02".into()];
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<AppState>();
    app.insert_resource(PhysicsWorld::new(&cfg.physics));
    app.insert_resource(cfg);
    app.init_resource::<Theme>();
    app.init_resource::<GameEventQueue>();
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(LevelRequest {
        id: level_id.into(),
    });
    app.add_plugins((LevelLoaderPlugin, ProgressPlugin));
    app
}

fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<C>>()
        .iter(app.world())
        .count()
}

#[test]
fn loads_level01_and_enters_playing() {
    let mut app = loader_app("level01");
    app.update(); // OnEnter(Loading) loads and spawns
    app.update(); // transition into Playing applies

    assert_eq!(
        app.world().resource::<State<AppState>>().get(),
        &AppState::Playing
    );
    let level = app.world().resource::<CurrentLevel>();
    assert_eq!(level.id, "level01");
    assert_eq!(level.total_points(), 3);

    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Finish>(&mut app), 1);
    assert_eq!(count::<Platform>(&mut app), 5);
    assert_eq!(count::<PointPickup>(&mut app), 3);
    // One body per spawned object.
    assert_eq!(app.world().resource::<PhysicsWorld>().body_count(), 10);
}

#[test]
fn restart_rebuilds_the_same_level_from_scratch() {
    let mut app = loader_app("level01");
    app.update();
    app.update();

    app.world_mut()
        .resource_mut::<GameEventQueue>()
        .push(GameEvent::RestartLevel);
    app.update(); // flow handler tears down, requests Loading
    app.update(); // OnEnter(Loading) reloads

    let level = app.world().resource::<CurrentLevel>();
    assert_eq!(level.id, "level01");
    assert_eq!(level.collected_points(), 0);
    assert_eq!(count::<Platform>(&mut app), 5);
    assert_eq!(count::<PointPickup>(&mut app), 3);
    assert_eq!(app.world().resource::<PhysicsWorld>().body_count(), 10);
}

#[test]
fn skip_advances_through_the_level_order_and_wraps() {
    let mut app = loader_app("level01");
    app.update();
    app.update();

    app.world_mut()
        .resource_mut::<GameEventQueue>()
        .push(GameEvent::LevelSkipRequested);
    app.update();
    app.update();
    assert_eq!(app.world().resource::<CurrentLevel>().id, "level02");
    assert_eq!(app.world().resource::<CurrentLevel>().total_points(), 4);

    app.update(); // back in Playing before the next skip
    app.world_mut()
        .resource_mut::<GameEventQueue>()
        .push(GameEvent::LevelSkipRequested);
    app.update();
    app.update();
    assert_eq!(app.world().resource::<CurrentLevel>().id, "level01");
}
