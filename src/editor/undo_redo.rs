//! Two-stack undo/redo with "armed level" counters.
//!
//! `undo()`/`redo()` only arm a pending level; the editor's history system
//! walks the stack by the armed count once per tick and performs the actual
//! reversal. The counters lag behind the stack sizes so rapid button mashing
//! at a history boundary is a silent no-op, never an error.
use bevy::prelude::*;

use crate::editor::commands::EditorCommand;

#[derive(Component, Debug, Default)]
pub struct UndoRedoStack {
    commands_to_undo: Vec<EditorCommand>,
    commands_to_redo: Vec<EditorCommand>,
    levels_to_undo: usize,
    levels_to_redo: usize,
}

impl UndoRedoStack {
    pub fn can_undo(&self) -> bool {
        self.commands_to_undo.len() > self.levels_to_undo
    }

    pub fn can_redo(&self) -> bool {
        self.commands_to_redo.len() > self.levels_to_redo
    }

    /// Record a freshly-executed command. Any redoable branch is discarded:
    /// linear history semantics.
    pub fn record(&mut self, command: EditorCommand) {
        self.commands_to_undo.push(command);
        self.commands_to_redo.clear();
        self.levels_to_redo = 0;
    }

    /// Arm one more undo level. Beyond available history: silent no-op.
    pub fn undo(&mut self) {
        if self.can_undo() {
            self.levels_to_undo += 1;
        }
    }

    /// Arm one more redo level. Beyond available history: silent no-op.
    pub fn redo(&mut self) {
        if self.can_redo() {
            self.levels_to_redo += 1;
        }
    }

    /// Pop every armed undo level, moving each command onto the redo stack.
    /// The caller applies each returned command in `Reverse`.
    pub fn take_armed_undos(&mut self) -> Vec<EditorCommand> {
        let mut armed = Vec::with_capacity(self.levels_to_undo);
        while self.levels_to_undo > 0 {
            let Some(command) = self.commands_to_undo.pop() else {
                self.levels_to_undo = 0;
                break;
            };
            self.commands_to_redo.push(command);
            armed.push(command);
            self.levels_to_undo -= 1;
        }
        armed
    }

    /// Pop every armed redo level, moving each command back onto the undo
    /// stack. The caller applies each returned command in `Forward`.
    pub fn take_armed_redos(&mut self) -> Vec<EditorCommand> {
        let mut armed = Vec::with_capacity(self.levels_to_redo);
        while self.levels_to_redo > 0 {
            let Some(command) = self.commands_to_redo.pop() else {
                self.levels_to_redo = 0;
                break;
            };
            self.commands_to_undo.push(command);
            armed.push(command);
            self.levels_to_redo -= 1;
        }
        armed
    }

    /// Drop all history and armed levels (level/tool switches).
    pub fn reset(&mut self) {
        self.commands_to_undo.clear();
        self.commands_to_redo.clear();
        self.levels_to_undo = 0;
        self.levels_to_redo = 0;
    }

    pub fn undo_len(&self) -> usize {
        self.commands_to_undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.commands_to_redo.len()
    }
}
