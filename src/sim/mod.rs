//! Simulation core
//!
//! All gameplay logic lives here. This module stays free of rendering,
//! DOM and audio:
//! - Seeded RNG only
//! - Stable iteration order (pool order, by entity ID)
//! - Entities are recycled in place, never reallocated mid-run

pub mod collision;
pub mod entity;
pub mod pool;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Hit, detect_hits, overlaps_player, resolve_collisions};
pub use entity::{Category, Entity, EntityKind, pickup_hue, pickup_scale, value_ratio};
pub use pool::{EntityPool, recycle};
pub use rng::{SimRng, random_float, random_int, seeded};
pub use state::{GameEvent, GameState, HudSnapshot, RunPhase, Steer};
pub use tick::{InputCommand, TickInput, TickReport, tick};
