//! Grid Runner - an endless runner on a scrolling lane grid
//!
//! Core modules:
//! - `sim`: Simulation core (entity pool, track recycling, collisions, state machine)
//! - `config`: Tunable gameplay constants with startup validation
//! - `session`: Frame host wiring the simulation to presentation collaborators
//! - `leaderboard`: In-session score table and the final-score record
//! - `audio`: Sound cues for game events

pub mod audio;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::{CollaboratorError, ConfigError};
pub use leaderboard::{Leaderboard, ScoreRecord};
pub use session::{Animator, LeaderboardClient, PresentationSink, Session};

/// Default gameplay constants
pub mod consts {
    /// Fixed host frame step (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta a host forwards to the simulation (tab-switch hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scroll speed at the start of a run (units/s)
    pub const INITIAL_SCROLL_SPEED: f32 = 20.0;
    /// Scroll speed added every running tick
    pub const SCROLL_SPEED_RAMP: f32 = 0.002;
    /// Lateral distance moved per tick while steering
    pub const LATERAL_STEP: f32 = 0.05;

    /// Player half-extent added to every entity's half-scale
    pub const COLLISION_THRESHOLD: f32 = 0.2;

    /// Obstacle scale range (per axis)
    pub const OBSTACLE_SCALE_MIN: f32 = 0.5;
    pub const OBSTACLE_SCALE_MAX: f32 = 2.0;

    /// Pickup value range (inclusive)
    pub const PICKUP_VALUE_MIN: u32 = 5;
    pub const PICKUP_VALUE_MAX: u32 = 20;
    /// Pickup scale at the maximum value
    pub const PICKUP_SIZE_FACTOR: f32 = 0.5;

    /// Placement window: lateral spread either side of the reference
    pub const LATERAL_SPREAD: f32 = 30.0;
    /// Placement window: nearest depth ahead of the player
    pub const FAR_BOUND: f32 = 100.0;
    /// Placement window: extra depth beyond the far bound
    pub const DEPTH_SPREAD: f32 = 100.0;

    /// Health
    pub const MAX_HEALTH: u32 = 50;
    pub const OBSTACLE_DAMAGE: u32 = 10;
    pub const HEALTH_PICKUP_HEAL: u32 = 10;

    /// Pool sizes
    pub const OBSTACLE_COUNT: usize = 15;
    pub const BONUS_COUNT: usize = 10;
    pub const HEALTH_PICKUP_COUNT: usize = 3;

    /// Real-time delay between game over and the automatic reset (seconds)
    pub const RESET_DELAY: f32 = 1.0;
}
