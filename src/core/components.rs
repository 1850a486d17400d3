use bevy::prelude::*;

/// Marker + counters for the player entity (holds physics body & collider).
#[derive(Component, Debug, Default)]
pub struct Player {
    pub shots_fired: u32,
}

/// A fired bullet. Contact resolution only flags outcomes here; a later
/// gameplay system acts on the flags (the physics world must not be mutated
/// while contacts are being reported).
#[derive(Component, Debug, Default)]
pub struct Bullet {
    pub collided_with_platform: bool,
    pub hit_platform: Option<Entity>,
    /// Seconds remaining before the bullet expires on its own.
    pub lifetime: f32,
}

/// Platform kind decides body type and destructibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Immovable level geometry.
    Static,
    /// Simulated body; destroyed when hit by a bullet.
    Dynamic,
}

#[derive(Component, Debug)]
pub struct Platform {
    pub kind: PlatformKind,
    /// Set by contact resolution, consumed by the platform-removal system.
    pub remove: bool,
}

impl Platform {
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            kind,
            remove: false,
        }
    }
}

/// Level finish marker. `reached` latches on first player overlap.
#[derive(Component, Debug, Default)]
pub struct Finish {
    pub reached: bool,
}

/// Collectible point. `collected` is idempotent; the collection system
/// despawns the entity on the tick it first observes the flag.
#[derive(Component, Debug, Default)]
pub struct PointPickup {
    pub collected: bool,
}

/// Axis-aligned box used for logical proximity checks outside the rigid-body
/// world (player vs. finish/points must not collide physically).
/// Extents and offset are in pixel space, matching `Transform` translations.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub half_extents: Vec2,
    pub offset: Vec2,
}

impl CollisionBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_extents: Vec2::new(width * 0.5, height * 0.5),
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// (min, max) of the box centered on the given entity position.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let center = position + self.offset;
        (center - self.half_extents, center + self.half_extents)
    }

    /// AABB vs AABB overlap test against another box at a different position.
    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }
}

/// Which level-file layer an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    StaticPlatforms,
    DynamicPlatforms,
    Points,
    Finish,
    Player,
}

/// Source map object: layer + original pixel-space rectangle. Kept so the
/// editor can write level files back out and restarts can respawn exactly.
#[derive(Component, Debug, Clone, Copy)]
pub struct MapObject {
    pub layer: LayerKind,
    pub origin_px: Vec2,
    pub size_px: Vec2,
}

/// Editor-facing state of a placeable object. Delete commands toggle
/// visibility/touchability instead of despawning so they stay reversible.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EditorObject {
    pub visible: bool,
    pub touchable: bool,
    pub selected: bool,
}

impl Default for EditorObject {
    fn default() -> Self {
        Self {
            visible: true,
            touchable: true,
            selected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_box_overlap_is_symmetric() {
        let a = CollisionBox::new(20.0, 10.0);
        let b = CollisionBox::new(8.0, 8.0).with_offset(Vec2::new(2.0, -1.0));
        let pa = Vec2::new(0.0, 0.0);
        let pb = Vec2::new(9.0, 4.0);
        assert_eq!(a.overlaps(pa, &b, pb), b.overlaps(pb, &a, pa));
        assert!(a.overlaps(pa, &b, pb));

        let far = Vec2::new(100.0, 0.0);
        assert_eq!(a.overlaps(pa, &b, far), b.overlaps(far, &a, pa));
        assert!(!a.overlaps(pa, &b, far));
    }

    #[test]
    fn collision_box_touching_edges_do_not_overlap() {
        let a = CollisionBox::new(10.0, 10.0);
        let b = CollisionBox::new(10.0, 10.0);
        // Exactly touching along x: strict inequality means no overlap.
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(10.0, 0.0)));
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(9.9, 0.0)));
    }
}
