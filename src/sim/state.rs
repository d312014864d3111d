//! Game state and run phases
//!
//! `GameState` is the single owner of everything the simulation mutates.
//! Presentation reads it (or the `HudSnapshot` built from it) and never
//! writes back.

use serde::{Deserialize, Serialize};

use super::pool::EntityPool;
use super::rng::{SimRng, seeded};
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Coarse game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the start signal; nothing advances
    Intro,
    /// Simulation advances every tick
    Running,
    /// Frozen until resumed
    Paused,
    /// Run ended; a reset is pending
    GameOver,
}

/// Lateral steering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    #[default]
    Idle,
    Right,
}

impl Steer {
    /// Per-tick lateral velocity applied to the world offset. The offset
    /// translates the world, so steering right moves everything left.
    pub fn lateral_velocity(self) -> f32 {
        match self {
            Steer::Left => 1.0,
            Steer::Idle => 0.0,
            Steer::Right => -1.0,
        }
    }
}

/// Notifications for presentation (feedback, audio, popups)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    DamageTaken { amount: u32, health: u32 },
    BonusCollected { value: u32 },
    HealthCollected { amount: u32, health: u32 },
    GameOver { score: u64, distance: f32 },
    Paused,
    Resumed,
    Reset,
}

/// Plain data handed to presentation after every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
    pub distance: f32,
    pub phase: RunPhase,
}

impl HudSnapshot {
    /// Health as a fraction of max, for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Validated tuning constants
    pub config: GameConfig,
    pub rng: SimRng,
    pub phase: RunPhase,
    /// Seconds spent Running this run
    pub elapsed: f32,
    /// Current scroll speed (only grows while Running)
    pub scroll_speed: f32,
    /// World translation along the track (distance traveled)
    pub scroll_depth: f32,
    /// World translation across the track
    pub lateral_offset: f32,
    pub steer: Steer,
    pub health: u32,
    pub score: u64,
    pub pool: EntityPool,
    /// Real seconds left before a game over resets the run
    pub reset_timer: f32,
}

impl GameState {
    /// Validate `config` and build a fresh session in `Intro`
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// Fresh session with the default config
    pub fn with_seed(seed: u64) -> Self {
        Self::build(GameConfig::default(), seed)
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let pool = EntityPool::populate(&config, &mut rng);
        log::info!(
            "New session (seed {}, {} entities)",
            seed,
            pool.len()
        );
        Self {
            rng,
            phase: RunPhase::Intro,
            elapsed: 0.0,
            scroll_speed: config.initial_scroll_speed,
            scroll_depth: 0.0,
            lateral_offset: 0.0,
            steer: Steer::Idle,
            health: config.max_health,
            score: 0,
            pool,
            reset_timer: 0.0,
            config,
        }
    }

    /// Distance traveled this run
    #[inline]
    pub fn distance(&self) -> f32 {
        self.scroll_depth
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            health: self.health,
            max_health: self.config.max_health,
            distance: self.distance(),
            phase: self.phase,
        }
    }

    /// Intro -> Running. Returns whether the phase changed.
    pub fn start(&mut self) -> bool {
        if self.phase != RunPhase::Intro {
            return false;
        }
        self.phase = RunPhase::Running;
        log::info!("Run started");
        true
    }

    /// Running -> Paused. Idempotent: pausing while paused does nothing.
    pub fn pause(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Paused;
        log::info!("Paused at {:.1}", self.distance());
        true
    }

    /// Paused -> Running. Idempotent.
    pub fn resume(&mut self) -> bool {
        if self.phase != RunPhase::Paused {
            return false;
        }
        self.phase = RunPhase::Running;
        log::info!("Resumed");
        true
    }

    /// Running -> GameOver, arming the reset timer. Only fires from Running,
    /// so a run ends at most once.
    pub(crate) fn end_run(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::GameOver;
        self.reset_timer = self.config.reset_delay;
        self.steer = Steer::Idle;
        log::info!(
            "Game over: score {}, distance {:.1}",
            self.score,
            self.distance()
        );
        true
    }

    /// Full reset back to `Intro`: health to max, score and time zeroed,
    /// speed back to initial, every pooled entity re-placed in place.
    pub fn reset(&mut self) {
        self.phase = RunPhase::Intro;
        self.elapsed = 0.0;
        self.scroll_speed = self.config.initial_scroll_speed;
        self.scroll_depth = 0.0;
        self.lateral_offset = 0.0;
        self.steer = Steer::Idle;
        self.health = self.config.max_health;
        self.score = 0;
        self.reset_timer = 0.0;
        self.pool.respawn_in_place(&self.config, &mut self.rng);
        log::info!("Run reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Category;

    #[test]
    fn test_new_state() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase, RunPhase::Intro);
        assert_eq!(state.health, state.config.max_health);
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_speed, state.config.initial_scroll_speed);
        assert_eq!(state.pool.len(), state.config.total_entities());
    }

    #[test]
    fn test_invalid_config_rejected_before_first_tick() {
        let config = GameConfig {
            obstacle_scale_min: -2.0,
            obstacle_scale_max: -1.0,
            ..Default::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = GameState::with_seed(1);
        assert!(!state.pause(), "cannot pause from intro");
        assert!(state.start());
        assert!(!state.start());
        assert!(state.pause());
        assert!(!state.pause());
        assert_eq!(state.phase, RunPhase::Paused);
        assert!(state.resume());
        assert!(!state.resume());
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.end_run());
        assert!(!state.end_run());
        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.reset_timer, state.config.reset_delay);
    }

    #[test]
    fn test_reset_restores_run() {
        let mut state = GameState::with_seed(2);
        state.start();
        state.health = 0;
        state.score = 99;
        state.elapsed = 12.0;
        state.scroll_speed = 30.0;
        state.scroll_depth = 360.0;
        state.lateral_offset = 4.0;
        state.end_run();

        state.reset();
        assert_eq!(state.phase, RunPhase::Intro);
        assert_eq!(state.health, state.config.max_health);
        assert_eq!(state.score, 0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.scroll_speed, state.config.initial_scroll_speed);
        assert_eq!(state.pool.count(Category::Obstacle), state.config.obstacle_count);
        for e in state.pool.entities() {
            assert!(e.position.z <= -state.config.far_bound);
        }
    }

    #[test]
    fn test_steer_velocity() {
        assert_eq!(Steer::Left.lateral_velocity(), 1.0);
        assert_eq!(Steer::Idle.lateral_velocity(), 0.0);
        assert_eq!(Steer::Right.lateral_velocity(), -1.0);
    }

    #[test]
    fn test_health_fraction() {
        let state = GameState::with_seed(3);
        assert_eq!(state.hud().health_fraction(), 1.0);
    }
}
