use bevy::prelude::*;

/// High-level app lifecycle state.
/// Loading -> Playing <-> Editor
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Transitional state while (re)loading a level. Gameplay systems are
    /// gated off until the level data and its bodies exist.
    #[default]
    Loading,
    /// Active gameplay.
    Playing,
    /// Level editor over the same entity/component substrate.
    Editor,
}
