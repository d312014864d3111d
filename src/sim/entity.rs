//! Track entities: obstacles and pickups
//!
//! Coordinates follow the track: `x` is lateral, `y` is up, `z` is depth with
//! the player at `z = 0` and the unseen track ahead at negative `z`. Entity
//! positions are local to the scrolling world; the world scroll depth and the
//! player's lateral offset convert them to what the player sees.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Entity category, used for spawn requests and event classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Obstacle,
    Bonus,
    Health,
}

/// Category plus its per-category payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Costs health on contact
    Obstacle,
    /// Adds `value` to the score when collected
    Bonus { value: u32 },
    /// Restores health when collected; `value` only drives its size
    Health { value: u32 },
}

impl EntityKind {
    pub fn category(&self) -> Category {
        match self {
            EntityKind::Obstacle => Category::Obstacle,
            EntityKind::Bonus { .. } => Category::Bonus,
            EntityKind::Health { .. } => Category::Health,
        }
    }
}

/// A pooled obstacle or pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Local position (world-space depth = `position.z` + world scroll depth)
    pub position: Vec3,
    pub scale: Vec3,
}

impl Entity {
    /// An unplaced entity of the given category. Pickups start at value 0
    /// until their first placement rolls one.
    pub fn new(id: u32, category: Category) -> Self {
        let kind = match category {
            Category::Obstacle => EntityKind::Obstacle,
            Category::Bonus => EntityKind::Bonus { value: 0 },
            Category::Health => EntityKind::Health { value: 0 },
        };
        Self {
            id,
            kind,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Pickup value, `None` for obstacles
    pub fn value(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Obstacle => None,
            EntityKind::Bonus { value } | EntityKind::Health { value } => Some(value),
        }
    }

    /// Depth as seen by the player
    #[inline]
    pub fn world_depth(&self, scroll_depth: f32) -> f32 {
        self.position.z + scroll_depth
    }

    /// Lateral position as seen by the player
    #[inline]
    pub fn world_lateral(&self, lateral_offset: f32) -> f32 {
        self.position.x + lateral_offset
    }

    /// Display hue in [0, 1]. Pickups shift from cyan toward red as their
    /// value approaches `max_value`; obstacles are a fixed pale blue.
    pub fn hue(&self, max_value: u32) -> f32 {
        match self.value() {
            Some(value) => pickup_hue(value_ratio(value, max_value)),
            None => 0.58,
        }
    }
}

/// `value / max_value`, or 0 when `max_value` is 0
#[inline]
pub fn value_ratio(value: u32, max_value: u32) -> f32 {
    if max_value == 0 {
        0.0
    } else {
        value as f32 / max_value as f32
    }
}

/// Uniform pickup scale for a value: bigger rewards are bigger targets
#[inline]
pub fn pickup_scale(value: u32, max_value: u32, size_factor: f32) -> f32 {
    value_ratio(value, max_value) * size_factor
}

#[inline]
pub fn pickup_hue(ratio: f32) -> f32 {
    0.5 + 0.5 * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pickup_scale_max_value_is_size_factor() {
        assert_eq!(pickup_scale(20, 20, 0.5), 0.5);
        assert_eq!(pickup_scale(10, 20, 0.5), 0.25);
        assert_eq!(pickup_scale(5, 0, 0.5), 0.0);
    }

    #[test]
    fn test_kind_category() {
        assert_eq!(Entity::new(1, Category::Obstacle).category(), Category::Obstacle);
        assert_eq!(Entity::new(2, Category::Bonus).category(), Category::Bonus);
        assert_eq!(Entity::new(3, Category::Health).category(), Category::Health);
        assert_eq!(Entity::new(1, Category::Obstacle).value(), None);
        assert_eq!(Entity::new(2, Category::Bonus).value(), Some(0));
    }

    #[test]
    fn test_hue() {
        let mut bonus = Entity::new(1, Category::Bonus);
        bonus.kind = EntityKind::Bonus { value: 20 };
        assert_eq!(bonus.hue(20), 1.0);
        bonus.kind = EntityKind::Bonus { value: 0 };
        assert_eq!(bonus.hue(20), 0.5);
    }

    proptest! {
        #[test]
        fn prop_pickup_scale_monotonic(a in 0u32..=20, b in 0u32..=20) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(pickup_scale(lo, 20, 0.5) <= pickup_scale(hi, 20, 0.5));
            prop_assert!(pickup_scale(hi, 20, 0.5) <= 0.5);
        }
    }
}
