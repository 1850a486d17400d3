//! Pairwise CollisionBox overlap scan, separate from the rigid-body world.
//!
//! The player must pass through finish/points without a physical collision
//! response, so their proximity is detected geometrically: an O(n^2) sweep
//! over every entity carrying a [`CollisionBox`], each tick. Entity counts
//! here are tiny (player + points + finish), so no broad phase is warranted.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{CollisionBox, Finish, PointPickup, Player};
use crate::core::events::{GameEvent, GameEventQueue};
use crate::core::system::system_order::OverlapSet;

pub struct OverlapPlugin;

impl Plugin for OverlapPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            detect_overlaps
                .in_set(OverlapSet)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

fn detect_overlaps(
    boxes: Query<(Entity, &CollisionBox, &Transform)>,
    players: Query<(), With<Player>>,
    mut points: Query<&mut PointPickup>,
    mut finishes: Query<&mut Finish>,
    mut events: ResMut<GameEventQueue>,
) {
    let items: Vec<(Entity, CollisionBox, Vec2)> = boxes
        .iter()
        .map(|(e, b, t)| (e, *b, t.translation.truncate()))
        .collect();

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (ea, ba, pa) = items[i];
            let (eb, bb, pb) = items[j];
            if !ba.overlaps(pa, &bb, pb) {
                continue;
            }
            mark_pair(ea, eb, &players, &mut points, &mut finishes, &mut events);
            mark_pair(eb, ea, &players, &mut points, &mut finishes, &mut events);
        }
    }
}

fn mark_pair(
    player_side: Entity,
    other: Entity,
    players: &Query<(), With<Player>>,
    points: &mut Query<&mut PointPickup>,
    finishes: &mut Query<&mut Finish>,
    events: &mut GameEventQueue,
) {
    if !players.contains(player_side) {
        return;
    }
    if let Ok(mut point) = points.get_mut(other) {
        // Idempotent: the collection system despawns on first observation.
        point.collected = true;
    }
    if let Ok(mut finish) = finishes.get_mut(other) {
        if !finish.reached {
            finish.reached = true;
            events.push(GameEvent::LevelFinished);
        }
    }
}
