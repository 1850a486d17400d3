//! Stateless classifier turning begin-contact pairs into gameplay flags.
//!
//! Decision table:
//! - Bullet x Platform: flag the bullet, record the platform, mark a dynamic
//!   platform for removal.
//! - Player x Finish: latch the finish signal.
//! - anything else: no-op.
//!
//! Invariant: this system only writes component flags and queue events. It
//! never creates or destroys bodies/entities; the removal systems act on the
//! flags later in the same tick. (The solver forbids topology changes while
//! contacts are reported, so the deferral is a contract, not an accident.)
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{Bullet, Finish, Platform, PlatformKind, Player};
use crate::core::events::{GameEvent, GameEventQueue};
use crate::core::system::system_order::ContactSet;
use crate::physics::bridge::ContactPairs;

pub struct ContactResolutionPlugin;

impl Plugin for ContactResolutionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            resolve_contacts
                .in_set(ContactSet)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

fn resolve_contacts(
    pairs: Res<ContactPairs>,
    mut bullets: Query<&mut Bullet>,
    mut platforms: Query<&mut Platform>,
    mut finishes: Query<&mut Finish>,
    players: Query<(), With<Player>>,
    mut events: ResMut<GameEventQueue>,
) {
    for pair in pairs.0.iter() {
        classify(
            pair.a,
            pair.b,
            &mut bullets,
            &mut platforms,
            &mut finishes,
            &players,
            &mut events,
        );
        classify(
            pair.b,
            pair.a,
            &mut bullets,
            &mut platforms,
            &mut finishes,
            &players,
            &mut events,
        );
    }
}

fn classify(
    first: Entity,
    second: Entity,
    bullets: &mut Query<&mut Bullet>,
    platforms: &mut Query<&mut Platform>,
    finishes: &mut Query<&mut Finish>,
    players: &Query<(), With<Player>>,
    events: &mut GameEventQueue,
) {
    if let Ok(mut bullet) = bullets.get_mut(first) {
        if let Ok(mut platform) = platforms.get_mut(second) {
            bullet.collided_with_platform = true;
            bullet.hit_platform = Some(second);
            if platform.kind == PlatformKind::Dynamic {
                platform.remove = true;
            }
            debug!(target: "physics", "bullet {first:?} hit platform {second:?}");
        }
    }
    if players.contains(first) {
        if let Ok(mut finish) = finishes.get_mut(second) {
            if !finish.reached {
                finish.reached = true;
                events.push(GameEvent::LevelFinished);
            }
        }
    }
}
