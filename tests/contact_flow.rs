//! End-to-end through the tick pipeline: a fired bullet reaches a
//! destructible platform, contact resolution flags both, and the gameplay
//! pass removes them from the entity world and the physics world.
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use recoil_runner::core::components::{Bullet, Platform, PlatformKind};
use recoil_runner::core::level::layout::RectDef;
use recoil_runner::core::level::loader::LevelRequest;
use recoil_runner::core::system::system_order::{
    ContactSet, GameplaySet, InputSet, OverlapSet, PhysicsStepSet, RenderSyncSet,
};
use recoil_runner::gameplay::progress::ProgressPlugin;
use recoil_runner::gameplay::spawn;
use recoil_runner::physics::bridge::PhysicsBridgePlugin;
use recoil_runner::physics::contact::ContactResolutionPlugin;
use recoil_runner::physics::overlap::OverlapPlugin;
use recoil_runner::physics::world::PhysicsWorld;
use recoil_runner::rendering::theme::Theme;
use recoil_runner::{AppState, GameConfig, GameEventQueue};

fn pipeline_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(GameConfig::default());
    app.insert_state(AppState::Playing);
    app.init_resource::<Theme>();
    app.init_resource::<GameEventQueue>();
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(LevelRequest {
        id: "level01".into(),
    });
    app.configure_sets(
        Update,
        (
            InputSet,
            PhysicsStepSet,
            ContactSet,
            OverlapSet,
            GameplaySet,
            RenderSyncSet,
        )
            .chain(),
    );
    app.add_plugins((
        PhysicsBridgePlugin,
        ContactResolutionPlugin,
        OverlapPlugin,
        ProgressPlugin,
    ));
    app
}

fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<C>>()
        .iter(app.world())
        .count()
}

#[test]
fn bullet_destroys_dynamic_platform_and_itself() {
    let mut app = pipeline_app();
    app.add_systems(
        Startup,
        |mut commands: Commands,
         mut physics: ResMut<PhysicsWorld>,
         cfg: Res<GameConfig>,
         theme: Res<Theme>| {
            spawn::spawn_platform(
                &mut commands,
                &mut physics,
                &cfg,
                &theme,
                RectDef {
                    x: 0.0,
                    y: 0.0,
                    w: 140.0,
                    h: 16.0,
                },
                PlatformKind::Dynamic,
            );
            spawn::spawn_bullet(
                &mut commands,
                &mut physics,
                &cfg,
                &theme,
                Vec2::new(-120.0, 0.0),
                Vec2::X,
            );
        },
    );

    // Every update steps the solver at least once; the bullet covers the
    // ~0.5 m gap well within this allowance.
    for _ in 0..240 {
        app.update();
        if count::<Bullet>(&mut app) == 0 {
            break;
        }
    }

    assert_eq!(count::<Bullet>(&mut app), 0, "bullet should be consumed");
    assert_eq!(
        count::<Platform>(&mut app),
        0,
        "dynamic platform should be destroyed"
    );
    assert_eq!(
        app.world().resource::<PhysicsWorld>().body_count(),
        0,
        "both bodies should leave the physics world"
    );
}

#[test]
fn bullet_is_spent_on_static_platform_which_survives() {
    let mut app = pipeline_app();
    app.add_systems(
        Startup,
        |mut commands: Commands,
         mut physics: ResMut<PhysicsWorld>,
         cfg: Res<GameConfig>,
         theme: Res<Theme>| {
            spawn::spawn_platform(
                &mut commands,
                &mut physics,
                &cfg,
                &theme,
                RectDef {
                    x: 0.0,
                    y: 0.0,
                    w: 140.0,
                    h: 16.0,
                },
                PlatformKind::Static,
            );
            spawn::spawn_bullet(
                &mut commands,
                &mut physics,
                &cfg,
                &theme,
                Vec2::new(-120.0, 0.0),
                Vec2::X,
            );
        },
    );

    for _ in 0..240 {
        app.update();
        if count::<Bullet>(&mut app) == 0 {
            break;
        }
    }

    // The bullet is spent either way, but static geometry survives.
    assert_eq!(count::<Bullet>(&mut app), 0);
    assert_eq!(
        count::<Platform>(&mut app),
        1,
        "static platform must survive bullet hits"
    );
    assert_eq!(app.world().resource::<PhysicsWorld>().body_count(), 1);
}
