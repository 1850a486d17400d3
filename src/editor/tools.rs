//! Editor session, tool selection, and the systems that record/replay
//! commands. All edits route through [`EditorCommand`]s so they stay
//! reversible; the physics body pose follows each applied command (the only
//! path by which render-side state reaches the physics world).
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::components::{EditorObject, MapObject};
use crate::core::config::GameConfig;
use crate::editor::commands::{CommandKind, DeleteSnapshot, Direction, EditorCommand};
use crate::editor::undo_redo::UndoRedoStack;
use crate::physics::world::PhysicsWorld;

/// Pixels moved per arrow-key press with the Move tool.
const MOVE_STEP_PX: f32 = 8.0;
/// Radians rotated per press with the Rotate tool.
const ROTATE_STEP: f32 = std::f32::consts::PI / 12.0;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EditorTool {
    #[default]
    Select,
    Move,
    Rotate,
    Delete,
}

/// Editor button behavior as a tagged value; one dispatch system reads the
/// binding table instead of a widget hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Undo,
    Redo,
    Tool(EditorTool),
}

pub const BUTTON_BINDINGS: &[(KeyCode, ButtonKind)] = &[
    (KeyCode::KeyZ, ButtonKind::Undo),
    (KeyCode::KeyY, ButtonKind::Redo),
    (KeyCode::Digit1, ButtonKind::Tool(EditorTool::Select)),
    (KeyCode::Digit2, ButtonKind::Tool(EditorTool::Move)),
    (KeyCode::Digit3, ButtonKind::Tool(EditorTool::Rotate)),
    (KeyCode::Digit4, ButtonKind::Tool(EditorTool::Delete)),
];

/// Marker for the per-session entity carrying the undo/redo stack.
#[derive(Component)]
pub struct EditorSession;

pub fn begin_session(mut commands: Commands, mut tool: ResMut<EditorTool>) {
    *tool = EditorTool::Select;
    commands.spawn((EditorSession, UndoRedoStack::default()));
    info!(target: "editor", "session started");
}

/// Leaving the editor drops the session entity and with it the whole
/// history (the reset contract for level/mode switches).
pub fn end_session(
    mut commands: Commands,
    sessions: Query<Entity, With<EditorSession>>,
    mut objects: Query<&mut EditorObject>,
) {
    for entity in &sessions {
        commands.entity(entity).try_despawn();
    }
    for mut obj in &mut objects {
        obj.selected = false;
    }
    info!(target: "editor", "session ended");
}

pub fn handle_buttons(
    keys: Res<ButtonInput<KeyCode>>,
    mut tool: ResMut<EditorTool>,
    mut stacks: Query<&mut UndoRedoStack, With<EditorSession>>,
) {
    let Some(mut stack) = stacks.iter_mut().next() else {
        return;
    };
    for (key, kind) in BUTTON_BINDINGS {
        if !keys.just_pressed(*key) {
            continue;
        }
        match kind {
            ButtonKind::Undo => stack.undo(),
            ButtonKind::Redo => stack.redo(),
            ButtonKind::Tool(t) => {
                *tool = *t;
                debug!(target: "editor", "tool -> {t:?}");
            }
        }
    }
}

fn pointer_world_pos(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.iter().next()?;
    let cursor = window.cursor_position()?;
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, cursor).ok()
}

/// Click with the Select tool picks the topmost touchable object under the
/// pointer. Clicks with any other tool active are ignored (no-op, not an
/// error).
pub fn select_object(
    buttons: Res<ButtonInput<MouseButton>>,
    tool: Res<EditorTool>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut objects: Query<(Entity, &Transform, &MapObject, &mut EditorObject)>,
) {
    if *tool != EditorTool::Select || !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(point) = pointer_world_pos(&windows, &camera_q) else {
        return;
    };
    // Highest z under the pointer wins; deleted objects are not touchable.
    let mut hit: Option<(Entity, f32)> = None;
    for (entity, tf, map_obj, obj) in objects.iter() {
        if !obj.touchable {
            continue;
        }
        let local = point - tf.translation.truncate();
        let half = map_obj.size_px * 0.5;
        if local.x.abs() > half.x || local.y.abs() > half.y {
            continue;
        }
        let z = tf.translation.z;
        if hit.map_or(true, |(_, best_z)| z > best_z) {
            hit = Some((entity, z));
        }
    }
    for (entity, _, _, mut obj) in &mut objects {
        let now_selected = hit.is_some_and(|(h, _)| h == entity);
        if obj.selected != now_selected {
            obj.selected = now_selected;
        }
    }
}

/// Keyboard edits on the selected object, gated by the active tool. The
/// command is applied forward, mirrored to the physics body, then recorded.
pub fn edit_selected(
    keys: Res<ButtonInput<KeyCode>>,
    tool: Res<EditorTool>,
    cfg: Res<GameConfig>,
    mut stacks: Query<&mut UndoRedoStack, With<EditorSession>>,
    mut objects: Query<(Entity, &mut Transform, &mut EditorObject)>,
    mut physics: ResMut<PhysicsWorld>,
) {
    let Some(mut stack) = stacks.iter_mut().next() else {
        return;
    };
    let Some((entity, mut tf, mut obj)) = objects.iter_mut().find(|(_, _, o)| o.selected)
    else {
        return;
    };

    let kind = match *tool {
        EditorTool::Move => {
            let mut delta = Vec2::ZERO;
            if keys.just_pressed(KeyCode::ArrowLeft) {
                delta.x -= MOVE_STEP_PX;
            }
            if keys.just_pressed(KeyCode::ArrowRight) {
                delta.x += MOVE_STEP_PX;
            }
            if keys.just_pressed(KeyCode::ArrowDown) {
                delta.y -= MOVE_STEP_PX;
            }
            if keys.just_pressed(KeyCode::ArrowUp) {
                delta.y += MOVE_STEP_PX;
            }
            (delta != Vec2::ZERO).then_some(CommandKind::Move { delta })
        }
        EditorTool::Rotate => {
            if keys.just_pressed(KeyCode::KeyQ) {
                Some(CommandKind::Rotate { radians: ROTATE_STEP })
            } else if keys.just_pressed(KeyCode::KeyW) {
                Some(CommandKind::Rotate {
                    radians: -ROTATE_STEP,
                })
            } else {
                None
            }
        }
        EditorTool::Delete => (keys.just_pressed(KeyCode::Delete)
            || keys.just_pressed(KeyCode::Backspace))
        .then(|| CommandKind::Delete {
            prior: DeleteSnapshot::from(&*obj),
        }),
        // Wrong tool for keyboard edits: deliberate no-op.
        EditorTool::Select => None,
    };
    let Some(kind) = kind else {
        return;
    };

    let command = EditorCommand {
        target: entity,
        kind,
    };
    command.apply(Direction::Forward, &mut tf, &mut obj);
    push_pose_to_body(&mut physics, &cfg, entity, &tf);
    stack.record(command);
}

/// Walk the stacks by their armed counts: reversal for undos, replay for
/// redos. Runs after input so arming and applying land in the same tick.
pub fn apply_armed_history(
    cfg: Res<GameConfig>,
    mut stacks: Query<&mut UndoRedoStack, With<EditorSession>>,
    mut objects: Query<(&mut Transform, &mut EditorObject)>,
    mut physics: ResMut<PhysicsWorld>,
) {
    let Some(mut stack) = stacks.iter_mut().next() else {
        return;
    };
    for command in stack.take_armed_undos() {
        if let Ok((mut tf, mut obj)) = objects.get_mut(command.target) {
            command.apply(Direction::Reverse, &mut tf, &mut obj);
            push_pose_to_body(&mut physics, &cfg, command.target, &tf);
        }
    }
    for command in stack.take_armed_redos() {
        if let Ok((mut tf, mut obj)) = objects.get_mut(command.target) {
            command.apply(Direction::Forward, &mut tf, &mut obj);
            push_pose_to_body(&mut physics, &cfg, command.target, &tf);
        }
    }
}

/// Deleted (invisible) objects hide their sprite but keep their entity so
/// the delete stays undoable.
pub fn sync_editor_visibility(
    mut objects: Query<(&EditorObject, &mut Visibility), Changed<EditorObject>>,
) {
    for (obj, mut visibility) in &mut objects {
        *visibility = if obj.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn push_pose_to_body(
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    entity: Entity,
    tf: &Transform,
) {
    let (z, _, _) = tf.rotation.to_euler(EulerRot::ZYX);
    physics.set_body_pose(
        entity,
        tf.translation.truncate() / cfg.physics.pixels_per_meter,
        z,
    );
}
