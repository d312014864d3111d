//! Player/entity collision detection and response
//!
//! The player is treated as a point at the origin with a small tunable
//! half-extent (`collision_threshold`). An entity hits when its world depth
//! has reached the player's depth band and its world lateral position is
//! within the band on the lateral axis. Only the lateral and depth axes are
//! checked; entity height is ignored.

use super::entity::{Entity, EntityKind};
use super::pool::recycle;
use super::state::{GameEvent, GameState};

/// Whether an entity overlaps the player this frame
#[inline]
pub fn overlaps_player(
    entity: &Entity,
    lateral_offset: f32,
    scroll_depth: f32,
    threshold: f32,
) -> bool {
    let threshold_z = threshold + entity.scale.z / 2.0;
    let threshold_x = threshold + entity.scale.x / 2.0;
    entity.world_depth(scroll_depth) > -threshold_z
        && entity.world_lateral(lateral_offset).abs() < threshold_x
}

/// What the player ran into. `index` is the entity's slot in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Obstacle { index: usize, id: u32 },
    Bonus { index: usize, id: u32, value: u32 },
    Health { index: usize, id: u32 },
}

impl Hit {
    fn classify(index: usize, entity: &Entity) -> Self {
        let id = entity.id;
        match entity.kind {
            EntityKind::Obstacle => Hit::Obstacle { index, id },
            EntityKind::Bonus { value } => Hit::Bonus { index, id, value },
            EntityKind::Health { .. } => Hit::Health { index, id },
        }
    }
}

/// All entities overlapping the player, in pool order
pub fn detect_hits(state: &GameState) -> Vec<Hit> {
    let threshold = state.config.collision_threshold;
    state
        .pool
        .entities()
        .iter()
        .enumerate()
        .filter(|(_, e)| overlaps_player(e, state.lateral_offset, state.scroll_depth, threshold))
        .map(|(index, e)| Hit::classify(index, e))
        .collect()
}

/// Detect and resolve collisions for this frame.
///
/// Obstacles cost health and are recycled. Bonuses add their value to the
/// score and are recycled with a new value. Health pickups heal (clamped to
/// max) and are recycled, unless health is already full, in which case they
/// stay where they are. Resolution stops at the hit that empties health.
///
/// Returns true if health reached zero this frame.
pub fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    for hit in detect_hits(state) {
        match hit {
            Hit::Obstacle { index, id } => {
                let damage = state.config.obstacle_damage;
                state.health = state.health.saturating_sub(damage);
                log::debug!("Obstacle {} hit, health {}", id, state.health);
                events.push(GameEvent::DamageTaken {
                    amount: damage,
                    health: state.health,
                });
                recycle_entity(state, index);

                if state.health == 0 {
                    return true;
                }
            }
            Hit::Bonus { index, id, value } => {
                state.score = state.score.saturating_add(u64::from(value));
                log::debug!("Bonus {} collected for {}, score {}", id, value, state.score);
                events.push(GameEvent::BonusCollected { value });
                recycle_entity(state, index);
            }
            Hit::Health { index, id } => {
                let max = state.config.max_health;
                if state.health >= max {
                    continue;
                }
                let before = state.health;
                state.health = state
                    .health
                    .saturating_add(state.config.health_pickup_heal)
                    .min(max);
                log::debug!("Health {} collected, health {}", id, state.health);
                events.push(GameEvent::HealthCollected {
                    amount: state.health - before,
                    health: state.health,
                });
                recycle_entity(state, index);
            }
        }
    }
    false
}

/// Send the entity in pool slot `index` back ahead, relative to the
/// current translation
fn recycle_entity(state: &mut GameState, index: usize) {
    let lateral_ref = -state.lateral_offset;
    let depth_ref = -state.scroll_depth;
    let GameState {
        pool, config, rng, ..
    } = state;
    if let Some(entity) = pool.entities_mut().get_mut(index) {
        recycle(entity, lateral_ref, depth_ref, config, rng);
    }
}
