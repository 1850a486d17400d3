//! Reversible edit operations as a tagged variant.
//!
//! One `apply(direction)` over a match replaces the execute/unexecute class
//! pair per edit kind: the reverse of Move/Rotate is the algebraic inverse of
//! its delta, and the reverse of Delete restores the captured prior state.
use bevy::prelude::*;

use crate::core::components::EditorObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Editor state captured when a Delete is recorded, restored on reverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteSnapshot {
    pub visible: bool,
    pub touchable: bool,
    pub selected: bool,
}

impl From<&EditorObject> for DeleteSnapshot {
    fn from(obj: &EditorObject) -> Self {
        Self {
            visible: obj.visible,
            touchable: obj.touchable,
            selected: obj.selected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandKind {
    Move { delta: Vec2 },
    Rotate { radians: f32 },
    Delete { prior: DeleteSnapshot },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorCommand {
    pub target: Entity,
    pub kind: CommandKind,
}

impl EditorCommand {
    pub fn apply(&self, direction: Direction, transform: &mut Transform, state: &mut EditorObject) {
        match (self.kind, direction) {
            (CommandKind::Move { delta }, Direction::Forward) => {
                transform.translation += delta.extend(0.0);
            }
            (CommandKind::Move { delta }, Direction::Reverse) => {
                transform.translation -= delta.extend(0.0);
            }
            (CommandKind::Rotate { radians }, Direction::Forward) => {
                transform.rotate_z(radians);
            }
            (CommandKind::Rotate { radians }, Direction::Reverse) => {
                transform.rotate_z(-radians);
            }
            (CommandKind::Delete { .. }, Direction::Forward) => {
                state.visible = false;
                state.touchable = false;
                state.selected = false;
            }
            (CommandKind::Delete { prior }, Direction::Reverse) => {
                state.visible = prior.visible;
                state.touchable = prior.touchable;
                state.selected = prior.selected;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_pair(kind: CommandKind, transform: &mut Transform, state: &mut EditorObject) {
        let cmd = EditorCommand {
            target: Entity::from_raw(0),
            kind,
        };
        cmd.apply(Direction::Forward, transform, state);
        cmd.apply(Direction::Reverse, transform, state);
    }

    #[test]
    fn move_reverse_is_exact_inverse() {
        for delta in [
            Vec2::new(12.5, -3.25),
            Vec2::ZERO,
            Vec2::new(-0.125, 1024.0),
        ] {
            let mut tf = Transform::from_xyz(5.0, -7.0, 1.0);
            let before = tf.translation;
            let mut obj = EditorObject::default();
            apply_pair(CommandKind::Move { delta }, &mut tf, &mut obj);
            // Add-then-subtract of the same float delta is bit-exact.
            assert_eq!(tf.translation, before);
        }
    }

    #[test]
    fn rotate_reverse_restores_angle() {
        let mut tf = Transform::default();
        let mut obj = EditorObject::default();
        let cmd = EditorCommand {
            target: Entity::from_raw(0),
            kind: CommandKind::Rotate {
                radians: std::f32::consts::FRAC_PI_6,
            },
        };
        cmd.apply(Direction::Forward, &mut tf, &mut obj);
        cmd.apply(Direction::Reverse, &mut tf, &mut obj);
        let (z, _, _) = tf.rotation.to_euler(EulerRot::ZYX);
        assert!(z.abs() < 1e-6, "angle should return to zero, got {z}");
    }

    #[test]
    fn delete_reverse_restores_prior_state() {
        let mut tf = Transform::default();
        let mut obj = EditorObject {
            visible: true,
            touchable: true,
            selected: true,
        };
        let cmd = EditorCommand {
            target: Entity::from_raw(0),
            kind: CommandKind::Delete {
                prior: DeleteSnapshot::from(&obj),
            },
        };
        cmd.apply(Direction::Forward, &mut tf, &mut obj);
        assert!(!obj.visible && !obj.touchable && !obj.selected);
        cmd.apply(Direction::Reverse, &mut tf, &mut obj);
        assert!(obj.visible && obj.touchable && obj.selected);
    }
}
