//! Per-frame simulation tick
//!
//! One call per display frame. Commands are applied first, then the phase
//! decides what advances: only `Running` moves the world, and `GameOver`
//! only counts down to its reset.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::state::{GameEvent, GameState, HudSnapshot, RunPhase, Steer};

/// Edge-triggered input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputCommand {
    MoveLeft,
    MoveRight,
    /// Directional input released
    MoveIdle,
    PauseToggle,
    /// Pause if running, otherwise nothing; safe to send repeatedly
    Pause,
    StartGame,
    /// Dismiss the game-over screen and reset immediately
    AcknowledgeGameOver,
}

/// Commands received since the previous tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<InputCommand>,
}

impl TickInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(command: InputCommand) -> Self {
        Self {
            commands: vec![command],
        }
    }

    pub fn push(&mut self, command: InputCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// What a tick produced for presentation
#[derive(Debug, Clone)]
pub struct TickReport {
    pub hud: HudSnapshot,
    pub events: Vec<GameEvent>,
}

/// Advance the game by one frame of `dt` seconds.
///
/// Never fails: a non-finite or negative `dt` is treated as zero.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    for &command in &input.commands {
        apply_command(state, command, &mut events);
    }

    match state.phase {
        RunPhase::Intro | RunPhase::Paused => {}
        RunPhase::Running => step_running(state, dt, &mut events),
        RunPhase::GameOver => {
            state.reset_timer -= dt;
            if state.reset_timer <= 0.0 {
                state.reset();
                events.push(GameEvent::Reset);
            }
        }
    }

    debug_assert!(state.health <= state.config.max_health);
    debug_assert!(state.scroll_speed >= state.config.initial_scroll_speed);

    TickReport {
        hud: state.hud(),
        events,
    }
}

fn apply_command(state: &mut GameState, command: InputCommand, events: &mut Vec<GameEvent>) {
    match command {
        InputCommand::MoveLeft => set_steer(state, Steer::Left),
        InputCommand::MoveRight => set_steer(state, Steer::Right),
        InputCommand::MoveIdle => set_steer(state, Steer::Idle),
        InputCommand::PauseToggle => match state.phase {
            RunPhase::Running => {
                if state.pause() {
                    events.push(GameEvent::Paused);
                }
            }
            RunPhase::Paused => {
                if state.resume() {
                    events.push(GameEvent::Resumed);
                }
            }
            RunPhase::Intro | RunPhase::GameOver => {}
        },
        InputCommand::Pause => {
            if state.pause() {
                events.push(GameEvent::Paused);
            }
        }
        InputCommand::StartGame => {
            if state.start() {
                events.push(GameEvent::Started);
            }
        }
        InputCommand::AcknowledgeGameOver => {
            if state.phase == RunPhase::GameOver {
                state.reset();
                events.push(GameEvent::Reset);
            }
        }
    }
}

fn set_steer(state: &mut GameState, steer: Steer) {
    if state.phase != RunPhase::GameOver {
        state.steer = steer;
    }
}

/// Advance time, speed and translation, then recycle and collide
fn step_running(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    state.elapsed += dt;
    state.lateral_offset += state.steer.lateral_velocity() * state.config.lateral_step;
    state.scroll_speed += state.config.scroll_speed_ramp;
    state.scroll_depth = state.scroll_speed * state.elapsed;

    state.pool.recycle_passed(
        state.lateral_offset,
        state.scroll_depth,
        &state.config,
        &mut state.rng,
    );

    if resolve_collisions(state, events) && state.end_run() {
        events.push(GameEvent::GameOver {
            score: state.score,
            distance: state.distance(),
        });
    }
}
