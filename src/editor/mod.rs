pub mod commands;
pub mod tools;
pub mod undo_redo;

use bevy::prelude::*;

use crate::app::state::AppState;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<tools::EditorTool>()
            .add_systems(OnEnter(AppState::Editor), tools::begin_session)
            .add_systems(OnExit(AppState::Editor), tools::end_session)
            .add_systems(
                Update,
                (
                    tools::handle_buttons,
                    tools::select_object,
                    tools::edit_selected,
                    tools::apply_armed_history,
                    tools::sync_editor_visibility,
                )
                    .chain()
                    .run_if(in_state(AppState::Editor)),
            );
    }
}
