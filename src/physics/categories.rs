//! Collision category/mask bits for body filtering.
//!
//! One consistent table: finish and points get distinct bits so sharing a
//! category is never relied upon. Player/bullet colliders filter on platforms
//! only; finish and point bodies are sensors that filter nothing (logical
//! proximity is handled by the CollisionBox overlap scan instead).
use rapier2d::prelude::{Group, InteractionGroups};

/// Category membership bit of an entity's collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EntityCategory {
    None = 0,
    Finish = 1,
    Player = 2,
    Bullet = 4,
    Platform = 8,
    Point = 16,
}

impl EntityCategory {
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Everything a platform physically blocks: player, bullet, other platforms.
pub const OBSTACLE_MASK: u32 =
    EntityCategory::Player as u32 | EntityCategory::Bullet as u32 | EntityCategory::Platform as u32;

pub fn interaction_groups(memberships: u32, filter: u32) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(memberships),
        Group::from_bits_truncate(filter),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_bits_are_distinct_powers_of_two() {
        let cats = [
            EntityCategory::Finish,
            EntityCategory::Player,
            EntityCategory::Bullet,
            EntityCategory::Platform,
            EntityCategory::Point,
        ];
        for (i, a) in cats.iter().enumerate() {
            assert!(a.bits().is_power_of_two());
            for b in &cats[i + 1..] {
                assert_eq!(a.bits() & b.bits(), 0);
            }
        }
    }

    #[test]
    fn obstacle_mask_matches_table() {
        assert_eq!(OBSTACLE_MASK, 14);
    }
}
