//! Frame driver for the rigid-body world plus the physics -> render sync.
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::config::GameConfig;
use crate::core::system::system_order::{PhysicsStepSet, RenderSyncSet};
use crate::physics::world::{BodyHandle, ContactPair, PhysicsWorld};

/// Begin-contact pairs collected during this tick's step, for the contact
/// resolution system. Replaced wholesale every tick.
#[derive(Resource, Debug, Default)]
pub struct ContactPairs(pub Vec<ContactPair>);

pub struct PhysicsBridgePlugin;

impl Plugin for PhysicsBridgePlugin {
    fn build(&self, app: &mut App) {
        let cfg = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        app.insert_resource(PhysicsWorld::new(&cfg.physics))
            .init_resource::<ContactPairs>()
            .add_systems(
                Update,
                step_physics
                    .in_set(PhysicsStepSet)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(
                Update,
                sync_body_transforms
                    .in_set(RenderSyncSet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// Fixed-step integration of accumulated frame time. Contact events are
/// collected during the step and only *published* here; acting on them is
/// deferred to later sets because the world must not be mutated while the
/// solver is reporting contacts.
fn step_physics(
    time: Res<Time>,
    mut world: ResMut<PhysicsWorld>,
    mut pairs: ResMut<ContactPairs>,
) {
    pairs.0 = world.step_frame(time.delta_secs());
}

/// One-directional sync: body world pose -> render transform, every tick, for
/// every entity carrying both. Render state never writes back to physics;
/// user-authored editor moves go through the command layer instead.
fn sync_body_transforms(
    world: Res<PhysicsWorld>,
    cfg: Res<GameConfig>,
    mut q: Query<(&BodyHandle, &mut Transform)>,
) {
    let ppm = cfg.physics.pixels_per_meter;
    for (handle, mut tf) in &mut q {
        if let Some((pos, angle)) = world.body_pose(handle.0) {
            tf.translation.x = pos.x * ppm;
            tf.translation.y = pos.y * ppm;
            tf.rotation = Quat::from_rotation_z(angle);
        }
    }
}
