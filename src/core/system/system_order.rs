//! Central system ordering labels to make the update sequence explicit.
//! Stages (high-level):
//! 1. Input (pointer/keyboard sampling, bullet firing)
//! 2. PhysicsStep (fixed-step integration of the rigid-body world)
//! 3. Contact (classify contacts collected during the step into gameplay flags)
//! 4. Overlap (pairwise CollisionBox scan for sensor-style entities)
//! 5. Gameplay (consume flags + queued events: removal, collection, restart)
//! 6. RenderSync (body pose -> Transform, theme -> sprite colors)
//! 7. Rendering (implicit, Bevy's render schedule)
//!
//! Systems never call each other; cross-system communication goes through
//! component state or the [`GameEventQueue`](crate::core::events::GameEventQueue).
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PhysicsStepSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ContactSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct OverlapSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GameplaySet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct RenderSyncSet;
