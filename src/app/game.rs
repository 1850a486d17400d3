//! Top-level plugin: state machine, system-set ordering, and the full
//! feature-plugin roster. Hosting apps (and tests) add `GamePlugin` on top
//! of whatever base plugins they need.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::config::GameConfig;
use crate::core::events::GameEventQueue;
use crate::core::level::loader::{LevelLoaderPlugin, LevelRequest};
use crate::core::system::system_order::{
    ContactSet, GameplaySet, InputSet, OverlapSet, PhysicsStepSet, RenderSyncSet,
};
use crate::editor::EditorPlugin;
use crate::gameplay::progress::ProgressPlugin;
use crate::gameplay::shooting::ShootingPlugin;
use crate::physics::bridge::PhysicsBridgePlugin;
use crate::physics::contact::ContactResolutionPlugin;
use crate::physics::overlap::OverlapPlugin;
use crate::rendering::camera::CameraPlugin;
use crate::rendering::theme::ThemePlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>();
        if app.world().get_resource::<GameConfig>().is_none() {
            warn!(target: "app", "no config inserted, using defaults");
            app.init_resource::<GameConfig>();
        }
        if app.world().get_resource::<LevelRequest>().is_none() {
            let id = app
                .world()
                .resource::<GameConfig>()
                .levels
                .default_level_id
                .clone();
            app.insert_resource(LevelRequest { id });
        }
        app.init_resource::<GameEventQueue>()
            .configure_sets(
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
            )
            .add_plugins((
                CameraPlugin,
                ThemePlugin,
                PhysicsBridgePlugin,
                ContactResolutionPlugin,
                OverlapPlugin,
                LevelLoaderPlugin,
                ShootingPlugin,
                ProgressPlugin,
                EditorPlugin,
            ))
            .add_systems(Update, toggle_editor.in_set(InputSet));
    }
}

/// E toggles between play and edit. Loading ignores the key; the gate
/// resolves on its own.
fn toggle_editor(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    if !keys.just_pressed(KeyCode::KeyE) {
        return;
    }
    match state.get() {
        AppState::Playing => next.set(AppState::Editor),
        AppState::Editor => next.set(AppState::Playing),
        AppState::Loading => {}
    }
}
