//! Entity pool and track recycler
//!
//! The track is infinite but the pool is not: a fixed set of entities is
//! spawned once, and every entity that scrolls past the player is moved back
//! into the unseen window ahead with fresh random placement. Entities are
//! mutated in place, so a run of any length touches the same allocations.

use glam::Vec3;

use super::entity::{Category, Entity, EntityKind, pickup_scale};
use super::rng::{SimRng, random_float, random_int};
use crate::config::GameConfig;

/// Fixed-size collection of track entities (stable order by id)
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Build the full pool for a config: obstacles, then bonuses, then health pickups
    pub fn populate(config: &GameConfig, rng: &mut SimRng) -> Self {
        let mut pool = Self::new();
        pool.entities.reserve_exact(config.total_entities());
        pool.spawn(Category::Obstacle, config.obstacle_count, config, rng);
        pool.spawn(Category::Bonus, config.bonus_count, config, rng);
        pool.spawn(Category::Health, config.health_pickup_count, config, rng);
        pool
    }

    /// Add `count` entities of `category`, each placed in the ahead window
    pub fn spawn(
        &mut self,
        category: Category,
        count: usize,
        config: &GameConfig,
        rng: &mut SimRng,
    ) {
        for _ in 0..count {
            let id = self.next_entity_id();
            let mut entity = Entity::new(id, category);
            recycle(&mut entity, 0.0, 0.0, config, rng);
            self.entities.push(entity);
        }
    }

    /// Re-place every entity as if freshly spawned, without reallocating
    pub fn respawn_in_place(&mut self, config: &GameConfig, rng: &mut SimRng) {
        for entity in &mut self.entities {
            recycle(entity, 0.0, 0.0, config, rng);
        }
    }

    /// Recycle every entity the player has passed (world depth > 0).
    ///
    /// `lateral_offset` and `scroll_depth` are the translation applied this
    /// frame; their negations are the references for new placements so a
    /// recycled entity lands in the ahead window as of this frame.
    /// Returns the number of entities recycled.
    pub fn recycle_passed(
        &mut self,
        lateral_offset: f32,
        scroll_depth: f32,
        config: &GameConfig,
        rng: &mut SimRng,
    ) -> usize {
        let mut recycled = 0;
        for entity in &mut self.entities {
            if entity.world_depth(scroll_depth) > 0.0 {
                recycle(entity, -lateral_offset, -scroll_depth, config, rng);
                recycled += 1;
            }
        }
        recycled
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities of one category
    pub fn count(&self, category: Category) -> usize {
        self.entities
            .iter()
            .filter(|e| e.category() == category)
            .count()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }
}

/// Place an entity at a fresh random slot ahead of the references.
///
/// Lateral: `lateral_ref ± lateral_spread`. Depth: within
/// `[depth_ref - far_bound - depth_spread, depth_ref - far_bound]`.
/// Obstacles roll a per-axis scale; pickups roll a new value and take the
/// uniform scale derived from it. The entity keeps its category.
pub fn recycle(
    entity: &mut Entity,
    lateral_ref: f32,
    depth_ref: f32,
    config: &GameConfig,
    rng: &mut SimRng,
) {
    match &mut entity.kind {
        EntityKind::Obstacle => {
            entity.scale = Vec3::new(
                random_float(rng, config.obstacle_scale_min, config.obstacle_scale_max),
                random_float(rng, config.obstacle_scale_min, config.obstacle_scale_max),
                random_float(rng, config.obstacle_scale_min, config.obstacle_scale_max),
            );
        }
        EntityKind::Bonus { value } | EntityKind::Health { value } => {
            *value = random_int(rng, config.pickup_value_min, config.pickup_value_max);
            let size = pickup_scale(*value, config.pickup_value_max, config.pickup_size_factor);
            entity.scale = Vec3::splat(size);
        }
    }

    entity.position = Vec3::new(
        lateral_ref + random_float(rng, -config.lateral_spread, config.lateral_spread),
        entity.scale.y * 0.5,
        depth_ref - config.far_bound - random_float(rng, 0.0, config.depth_spread),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;
    use proptest::prelude::*;

    fn in_window(entity: &Entity, lateral_ref: f32, depth_ref: f32, config: &GameConfig) -> bool {
        let dz = entity.position.z - depth_ref;
        let dx = entity.position.x - lateral_ref;
        dz <= -config.far_bound
            && dz >= -(config.far_bound + config.depth_spread)
            && dx.abs() <= config.lateral_spread
    }

    #[test]
    fn test_populate_counts() {
        let config = GameConfig::default();
        let mut rng = seeded(7);
        let pool = EntityPool::populate(&config, &mut rng);

        assert_eq!(pool.len(), config.total_entities());
        assert_eq!(pool.count(Category::Obstacle), config.obstacle_count);
        assert_eq!(pool.count(Category::Bonus), config.bonus_count);
        assert_eq!(pool.count(Category::Health), config.health_pickup_count);
        for entity in pool.entities() {
            assert!(in_window(entity, 0.0, 0.0, &config));
        }
    }

    #[test]
    fn test_ids_unique_and_ordered() {
        let config = GameConfig::default();
        let mut rng = seeded(7);
        let pool = EntityPool::populate(&config, &mut rng);
        let ids: Vec<u32> = pool.entities().iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_recycle_passed_only_moves_passed_entities() {
        let config = GameConfig::default();
        let mut rng = seeded(3);
        let mut pool = EntityPool::populate(&config, &mut rng);

        // Push one entity behind the player, leave the rest far ahead
        let scroll_depth = 50.0;
        pool.entities_mut()[0].position.z = -40.0;
        let untouched = pool.entities()[1].clone();

        let recycled = pool.recycle_passed(0.0, scroll_depth, &config, &mut rng);
        assert_eq!(recycled, 1);
        assert!(in_window(&pool.entities()[0], 0.0, -scroll_depth, &config));
        assert_eq!(pool.entities()[1], untouched);
    }

    #[test]
    fn test_recycle_passed_uses_negated_translation() {
        // Narrow spread so the windows around +7.5 and -7.5 cannot overlap
        let config = GameConfig {
            lateral_spread: 1.0,
            ..Default::default()
        };
        let mut rng = seeded(4);
        let mut pool = EntityPool::populate(&config, &mut rng);
        for entity in pool.entities_mut() {
            entity.position.z = -40.0;
        }

        let recycled = pool.recycle_passed(7.5, 50.0, &config, &mut rng);
        assert_eq!(recycled, pool.len());
        for entity in pool.entities() {
            assert!(in_window(entity, -7.5, -50.0, &config));
            // World position lands back in front of the player
            assert!(entity.world_lateral(7.5).abs() <= config.lateral_spread + 1e-3);
            assert!(entity.world_depth(50.0) <= -config.far_bound + 1e-3);
        }
    }

    #[test]
    fn test_recycle_keeps_category() {
        let config = GameConfig::default();
        let mut rng = seeded(11);
        let mut pool = EntityPool::populate(&config, &mut rng);
        let before: Vec<Category> = pool.entities().iter().map(|e| e.category()).collect();

        for entity in pool.entities_mut() {
            entity.position.z = 10.0;
        }
        pool.recycle_passed(0.0, 0.0, &config, &mut rng);

        let after: Vec<Category> = pool.entities().iter().map(|e| e.category()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_respawn_in_place_keeps_allocation() {
        let config = GameConfig::default();
        let mut rng = seeded(5);
        let mut pool = EntityPool::populate(&config, &mut rng);
        let ptr = pool.entities().as_ptr();
        let ids: Vec<u32> = pool.entities().iter().map(|e| e.id).collect();

        for entity in pool.entities_mut() {
            entity.position.z = 500.0;
        }
        pool.respawn_in_place(&config, &mut rng);

        assert_eq!(pool.entities().as_ptr(), ptr);
        assert_eq!(pool.entities().iter().map(|e| e.id).collect::<Vec<_>>(), ids);
        assert!(pool.entities().iter().all(|e| in_window(e, 0.0, 0.0, &config)));
    }

    #[test]
    fn test_obstacle_scale_range() {
        let config = GameConfig::default();
        let mut rng = seeded(9);
        let mut entity = Entity::new(1, Category::Obstacle);
        for _ in 0..100 {
            recycle(&mut entity, 0.0, 0.0, &config, &mut rng);
            for s in entity.scale.to_array() {
                assert!(s >= config.obstacle_scale_min && s <= config.obstacle_scale_max);
            }
            assert_eq!(entity.position.y, entity.scale.y * 0.5);
        }
    }

    proptest! {
        #[test]
        fn prop_recycle_lands_in_window(
            seed in any::<u64>(),
            lateral_ref in -500.0f32..500.0,
            depth_ref in -10_000.0f32..0.0,
            category in prop_oneof![
                Just(Category::Obstacle),
                Just(Category::Bonus),
                Just(Category::Health)
            ],
        ) {
            let config = GameConfig::default();
            let mut rng = seeded(seed);
            let mut entity = Entity::new(1, category);
            recycle(&mut entity, lateral_ref, depth_ref, &config, &mut rng);

            let dz = entity.position.z - depth_ref;
            prop_assert!(dz <= -config.far_bound + 1e-2);
            prop_assert!(dz >= -(config.far_bound + config.depth_spread) - 1e-2);
            prop_assert!((entity.position.x - lateral_ref).abs() <= config.lateral_spread + 1e-2);
            prop_assert_eq!(entity.category(), category);
        }

        #[test]
        fn prop_pickup_value_and_scale_coupled(seed in any::<u64>()) {
            let config = GameConfig::default();
            let mut rng = seeded(seed);
            let mut entity = Entity::new(1, Category::Bonus);
            recycle(&mut entity, 0.0, 0.0, &config, &mut rng);

            let value = entity.value().unwrap();
            prop_assert!(value >= config.pickup_value_min && value <= config.pickup_value_max);
            let expected = pickup_scale(value, config.pickup_value_max, config.pickup_size_factor);
            prop_assert_eq!(entity.scale, Vec3::splat(expected));
        }
    }
}
