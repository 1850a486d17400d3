//! Entity factory: every creation function spawns a fully-composed entity
//! (components + rigid body + sprite) in one pass; nothing partially
//! constructed is ever visible to systems. Sprite transforms start at the
//! body's world center and are kept in sync by the render-sync system.
use bevy::prelude::*;

use crate::core::components::{
    Bullet, CollisionBox, EditorObject, Finish, LayerKind, MapObject, Platform, PlatformKind,
    Player, PointPickup,
};
use crate::core::config::GameConfig;
use crate::core::level::layout::{LevelFile, RectDef};
use crate::core::level::loader::LevelEntity;
use crate::physics::categories::{EntityCategory, OBSTACLE_MASK};
use crate::physics::world::{BodyHandle, BodyKind, BodyShape, BodySpec, PhysicsWorld};
use crate::rendering::theme::{PaletteSlot, Theme, ThemeRole};

// Draw order, back to front.
pub const Z_PLATFORM: f32 = 1.0;
pub const Z_FINISH: f32 = 1.5;
pub const Z_POINT: f32 = 2.0;
pub const Z_BULLET: f32 = 2.5;
pub const Z_PLAYER: f32 = 3.0;

/// Spawn every entity a level file describes.
pub fn spawn_level(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    level: &LevelFile,
) {
    for rect in &level.static_platforms {
        spawn_platform(commands, physics, cfg, theme, *rect, PlatformKind::Static);
    }
    for rect in &level.dynamic_platforms {
        spawn_platform(commands, physics, cfg, theme, *rect, PlatformKind::Dynamic);
    }
    for rect in &level.points {
        spawn_point(commands, physics, cfg, theme, *rect);
    }
    spawn_finish(commands, physics, cfg, theme, level.finish);
    spawn_player(commands, physics, cfg, theme, level.player.into());
}

pub fn spawn_platform(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    rect: RectDef,
    kind: PlatformKind,
) -> Entity {
    let ppm = cfg.physics.pixels_per_meter;
    let (slot, layer, body_kind, density, friction) = match kind {
        PlatformKind::Static => (
            PaletteSlot::StaticPlatform,
            LayerKind::StaticPlatforms,
            BodyKind::Static,
            1.0,
            0.8,
        ),
        PlatformKind::Dynamic => (
            PaletteSlot::DynamicPlatform,
            LayerKind::DynamicPlatforms,
            BodyKind::Dynamic,
            0.8,
            0.6,
        ),
    };
    // Destructible platforms float in place until hit; they respond to
    // impacts but are not pulled down by gravity.
    let gravity_scale = match kind {
        PlatformKind::Static => 1.0,
        PlatformKind::Dynamic => 0.0,
    };
    let entity = commands
        .spawn((
            Platform::new(kind),
            MapObject {
                layer,
                origin_px: rect.center(),
                size_px: rect.size(),
            },
            EditorObject::default(),
            LevelEntity,
            ThemeRole(slot),
            Sprite::from_color(theme.color(slot), rect.size()),
            Transform::from_translation(rect.center().extend(Z_PLATFORM)),
        ))
        .id();
    let handle = physics.spawn_body(
        entity,
        BodySpec {
            position: rect.center() / ppm,
            kind: body_kind,
            shape: BodyShape::Cuboid {
                half_x: rect.w * 0.5 / ppm,
                half_y: rect.h * 0.5 / ppm,
            },
            memberships: EntityCategory::Platform.bits(),
            filter: OBSTACLE_MASK,
            density,
            friction,
            gravity_scale,
            ..Default::default()
        },
    );
    commands.entity(entity).insert(BodyHandle(handle));
    entity
}

pub fn spawn_player(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    position_px: Vec2,
) -> Entity {
    let ppm = cfg.physics.pixels_per_meter;
    let r = cfg.player.radius_px;
    let entity = commands
        .spawn((
            Player::default(),
            CollisionBox::new(2.0 * r, 2.0 * r),
            MapObject {
                layer: LayerKind::Player,
                origin_px: position_px,
                size_px: Vec2::splat(2.0 * r),
            },
            LevelEntity,
            ThemeRole(PaletteSlot::Player),
            Sprite::from_color(theme.color(PaletteSlot::Player), Vec2::splat(2.0 * r)),
            Transform::from_translation(position_px.extend(Z_PLAYER)),
        ))
        .id();
    let handle = physics.spawn_body(
        entity,
        BodySpec {
            position: position_px / ppm,
            kind: BodyKind::Dynamic,
            shape: BodyShape::Ball { radius: r / ppm },
            memberships: EntityCategory::Player.bits(),
            // The player only collides with platforms; finish and points are
            // detected by the overlap scan so there is no physical response.
            filter: EntityCategory::Platform.bits(),
            density: cfg.player.density,
            friction: cfg.player.friction,
            ccd: true,
            lock_rotations: true,
            ..Default::default()
        },
    );
    commands.entity(entity).insert(BodyHandle(handle));
    entity
}

/// `direction` must be a unit vector; the bullet leaves at configured muzzle
/// speed and expires after its lifetime.
pub fn spawn_bullet(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    origin_px: Vec2,
    direction: Vec2,
) -> Entity {
    let ppm = cfg.physics.pixels_per_meter;
    let r = cfg.bullet.radius_px;
    let entity = commands
        .spawn((
            Bullet {
                lifetime: cfg.bullet.lifetime,
                ..Default::default()
            },
            LevelEntity,
            ThemeRole(PaletteSlot::Bullet),
            Sprite::from_color(theme.color(PaletteSlot::Bullet), Vec2::splat(2.0 * r)),
            Transform::from_translation(origin_px.extend(Z_BULLET)),
        ))
        .id();
    let handle = physics.spawn_body(
        entity,
        BodySpec {
            position: origin_px / ppm,
            kind: BodyKind::Dynamic,
            shape: BodyShape::Ball { radius: r / ppm },
            memberships: EntityCategory::Bullet.bits(),
            filter: EntityCategory::Platform.bits(),
            density: cfg.bullet.density,
            linvel: direction * cfg.bullet.speed,
            ccd: true,
            ..Default::default()
        },
    );
    commands.entity(entity).insert(BodyHandle(handle));
    entity
}

pub fn spawn_point(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    rect: RectDef,
) -> Entity {
    spawn_sensor(
        commands,
        physics,
        cfg,
        theme,
        rect,
        PaletteSlot::Point,
        LayerKind::Points,
        EntityCategory::Point,
        Z_POINT,
    )
}

pub fn spawn_finish(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    rect: RectDef,
) -> Entity {
    spawn_sensor(
        commands,
        physics,
        cfg,
        theme,
        rect,
        PaletteSlot::Finish,
        LayerKind::Finish,
        EntityCategory::Finish,
        Z_FINISH,
    )
}

/// Finish and points share a shape: a static sensor body (no physical
/// response, category bit only) plus a CollisionBox for the overlap scan.
#[allow(clippy::too_many_arguments)]
fn spawn_sensor(
    commands: &mut Commands,
    physics: &mut PhysicsWorld,
    cfg: &GameConfig,
    theme: &Theme,
    rect: RectDef,
    slot: PaletteSlot,
    layer: LayerKind,
    category: EntityCategory,
    z: f32,
) -> Entity {
    let ppm = cfg.physics.pixels_per_meter;
    let entity = commands
        .spawn((
            CollisionBox::new(rect.w, rect.h),
            MapObject {
                layer,
                origin_px: rect.center(),
                size_px: rect.size(),
            },
            LevelEntity,
            ThemeRole(slot),
            Sprite::from_color(theme.color(slot), rect.size()),
            Transform::from_translation(rect.center().extend(z)),
        ))
        .id();
    match layer {
        LayerKind::Points => {
            commands.entity(entity).insert(PointPickup::default());
        }
        LayerKind::Finish => {
            commands.entity(entity).insert(Finish::default());
        }
        _ => {}
    }
    let handle = physics.spawn_body(
        entity,
        BodySpec {
            position: rect.center() / ppm,
            kind: BodyKind::Static,
            shape: BodyShape::Cuboid {
                half_x: rect.w * 0.5 / ppm,
                half_y: rect.h * 0.5 / ppm,
            },
            memberships: category.bits(),
            filter: EntityCategory::None.bits(),
            sensor: true,
            ..Default::default()
        },
    );
    commands.entity(entity).insert(BodyHandle(handle));
    entity
}
