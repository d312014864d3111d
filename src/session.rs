//! Session host
//!
//! Wires one `GameState` to its external collaborators. The simulation never
//! waits on any of them: sinks are plain callbacks, the animator is optional
//! until an asynchronous load hands one over, and leaderboard submission is
//! fire-and-forget.

use crate::config::GameConfig;
use crate::consts::MAX_FRAME_DT;
use crate::error::{CollaboratorError, ConfigError};
use crate::leaderboard::{Leaderboard, ScoreRecord};
use crate::sim::{
    GameEvent, GameState, HudSnapshot, InputCommand, RunPhase, TickInput, TickReport, tick,
};

/// Receives plain data after every frame
pub trait PresentationSink {
    fn on_hud(&mut self, hud: &HudSnapshot);
    fn on_event(&mut self, event: &GameEvent);
}

/// Avatar animation mixer, available once its model has loaded
pub trait Animator {
    fn advance(&mut self, dt: f32);
}

/// Remote score submission. Implementations must return without waiting
/// for the remote side; the result only reports that the request could
/// not be issued at all.
pub trait LeaderboardClient {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), CollaboratorError>;
}

pub struct Session {
    state: GameState,
    player_name: String,
    input: TickInput,
    sinks: Vec<Box<dyn PresentationSink>>,
    animator: Option<Box<dyn Animator>>,
    leaderboard_client: Option<Box<dyn LeaderboardClient>>,
    leaderboard: Leaderboard,
    warned_no_animator: bool,
}

impl Session {
    pub fn new(
        config: GameConfig,
        seed: u64,
        player_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::new(config, seed)?, player_name))
    }

    pub fn from_state(state: GameState, player_name: impl Into<String>) -> Self {
        Self {
            state,
            player_name: player_name.into(),
            input: TickInput::default(),
            sinks: Vec::new(),
            animator: None,
            leaderboard_client: None,
            leaderboard: Leaderboard::new(),
            warned_no_animator: false,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn PresentationSink>) {
        self.sinks.push(sink);
    }

    /// Hand over the animation mixer once its model finished loading
    pub fn attach_animator(&mut self, animator: Box<dyn Animator>) {
        log::info!("Animator attached");
        self.animator = Some(animator);
    }

    /// The avatar model never arrived; keep running without animation
    pub fn animator_failed(&mut self, err: CollaboratorError) {
        log::warn!("{}", err);
        self.warned_no_animator = true;
    }

    pub fn set_leaderboard_client(&mut self, client: Box<dyn LeaderboardClient>) {
        self.leaderboard_client = Some(client);
    }

    /// Queue a command for the next frame
    pub fn queue(&mut self, command: InputCommand) {
        self.input.push(command);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Run one display frame
    pub fn frame(&mut self, dt: f32) -> TickReport {
        let dt = dt.min(MAX_FRAME_DT);
        let report = tick(&mut self.state, &self.input, dt);
        self.input.clear();

        if self.state.phase == RunPhase::Running {
            match self.animator.as_mut() {
                Some(animator) => animator.advance(dt),
                None if !self.warned_no_animator => {
                    log::warn!("No animator yet, running without avatar animation");
                    self.warned_no_animator = true;
                }
                None => {}
            }
        }

        for sink in &mut self.sinks {
            for event in &report.events {
                sink.on_event(event);
            }
            sink.on_hud(&report.hud);
        }

        for event in &report.events {
            if let GameEvent::GameOver { score, distance } = *event {
                self.finish_run(score, distance);
            }
        }

        report
    }

    fn finish_run(&mut self, score: u64, distance: f32) {
        let record = ScoreRecord {
            player_name: self.player_name.clone(),
            score,
            distance,
        };

        if let Some(rank) = self.leaderboard.record(record.clone()) {
            log::info!("Run ranked #{} this session", rank);
        }

        if let Some(client) = self.leaderboard_client.as_mut() {
            if let Err(e) = client.submit(&record) {
                log::warn!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        advanced: Rc<RefCell<f32>>,
    }

    impl Animator for Counter {
        fn advance(&mut self, dt: f32) {
            *self.advanced.borrow_mut() += dt;
        }
    }

    #[test]
    fn test_frame_without_animator_is_fine() {
        let mut session = Session::from_state(GameState::with_seed(1), "p1");
        session.queue(InputCommand::StartGame);
        let report = session.frame(1.0 / 60.0);
        assert_eq!(report.hud.phase, RunPhase::Running);
    }

    #[test]
    fn test_animator_only_advances_while_running() {
        let advanced = Rc::new(RefCell::new(0.0));
        let mut session = Session::from_state(GameState::with_seed(1), "p1");
        session.attach_animator(Box::new(Counter {
            advanced: advanced.clone(),
        }));

        session.frame(0.02);
        assert_eq!(*advanced.borrow(), 0.0);

        session.queue(InputCommand::StartGame);
        session.frame(0.02);
        assert!((*advanced.borrow() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_failed_model_load_keeps_running() {
        let mut session = Session::from_state(GameState::with_seed(1), "p1");
        session.animator_failed(CollaboratorError::AssetLoad("runner.glb".to_string()));
        session.queue(InputCommand::StartGame);
        for _ in 0..10 {
            session.frame(1.0 / 60.0);
        }
        assert_eq!(session.state().phase, RunPhase::Running);
        assert!(session.state().distance() > 0.0);
    }

    #[test]
    fn test_frame_clamps_hitches() {
        let mut session = Session::from_state(GameState::with_seed(1), "p1");
        session.queue(InputCommand::StartGame);
        session.frame(5.0);
        assert!((session.state().elapsed - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_commands_are_consumed() {
        let mut session = Session::from_state(GameState::with_seed(1), "p1");
        session.queue(InputCommand::StartGame);
        session.queue(InputCommand::PauseToggle);
        session.frame(0.01);
        assert_eq!(session.state().phase, RunPhase::Paused);
        session.frame(0.01);
        assert_eq!(session.state().phase, RunPhase::Paused);
    }
}
