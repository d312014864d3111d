//! Audio cues
//!
//! Game events map to procedurally generated Web Audio sounds, so there are
//! no sound files to load. Without an audio context the game runs silent.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ran into an obstacle
    Crash,
    /// Bonus collected
    BonusCollect,
    /// Health pickup collected
    Heal,
    /// Run started
    Launch,
    /// Health ran out
    GameOver,
    /// Pause / resume blip
    Toggle,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(SoundEffect::Launch),
            GameEvent::DamageTaken { .. } => Some(SoundEffect::Crash),
            GameEvent::BonusCollected { .. } => Some(SoundEffect::BonusCollect),
            GameEvent::HealthCollected { .. } => Some(SoundEffect::Heal),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Paused | GameEvent::Resumed => Some(SoundEffect::Toggle),
            GameEvent::Reset => None,
        }
    }
}

/// One oscillator voice: a pitch glide under a fast attack and an
/// exponential release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Seconds after the cue starts
    pub at: f64,
    pub len: f64,
    pub from_hz: f32,
    pub to_hz: f32,
    /// Peak gain before master volume
    pub peak: f32,
    pub wave: Wave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

const fn note(at: f64, len: f64, from_hz: f32, to_hz: f32, peak: f32, wave: Wave) -> Note {
    Note {
        at,
        len,
        from_hz,
        to_hz,
        peak,
        wave,
    }
}

const CRASH: &[Note] = &[
    note(0.0, 0.25, 90.0, 35.0, 0.6, Wave::Square),
    note(0.0, 0.12, 220.0, 60.0, 0.3, Wave::Sawtooth),
];
const BONUS: &[Note] = &[
    note(0.0, 0.09, 660.0, 660.0, 0.2, Wave::Triangle),
    note(0.06, 0.12, 990.0, 1040.0, 0.2, Wave::Triangle),
];
const HEAL: &[Note] = &[
    note(0.0, 0.3, 330.0, 495.0, 0.25, Wave::Sine),
    note(0.1, 0.3, 415.0, 622.0, 0.15, Wave::Sine),
];
const LAUNCH: &[Note] = &[note(0.0, 0.4, 110.0, 880.0, 0.25, Wave::Sawtooth)];
const GAME_OVER: &[Note] = &[
    note(0.0, 0.3, 392.0, 370.0, 0.3, Wave::Triangle),
    note(0.3, 0.3, 311.0, 294.0, 0.3, Wave::Triangle),
    note(0.6, 0.7, 262.0, 131.0, 0.3, Wave::Triangle),
];
const TOGGLE: &[Note] = &[note(0.0, 0.05, 720.0, 720.0, 0.15, Wave::Square)];

impl SoundEffect {
    /// Voices that make up the cue
    pub fn notes(self) -> &'static [Note] {
        match self {
            SoundEffect::Crash => CRASH,
            SoundEffect::BonusCollect => BONUS,
            SoundEffect::Heal => HEAL,
            SoundEffect::Launch => LAUNCH,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::Toggle => TOGGLE,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{Note, SoundEffect, Wave};
    use crate::error::CollaboratorError;
    use crate::session::PresentationSink;
    use crate::sim::{GameEvent, HudSnapshot};

    const MASTER_VOLUME: f32 = 0.7;
    /// Attack time for every voice, short enough to avoid clicks
    const ATTACK: f64 = 0.008;
    /// Exponential ramps cannot reach zero
    const SILENT: f32 = 0.0001;

    /// Plays event cues through the Web Audio API
    pub struct AudioManager {
        ctx: Option<AudioContext>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = match AudioContext::new() {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    log::warn!("{}", CollaboratorError::Audio(format!("{:?}", e)));
                    None
                }
            };
            Self { ctx }
        }

        pub fn play(&self, effect: SoundEffect) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let now = ctx.current_time();
            for note in effect.notes() {
                if let Err(e) = voice(ctx, now, note) {
                    log::debug!("{}", CollaboratorError::Audio(format!("{:?}", e)));
                }
            }
        }
    }

    fn voice(ctx: &AudioContext, now: f64, note: &Note) -> Result<(), wasm_bindgen::JsValue> {
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.set_type(match note.wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let start = now + note.at;
        let end = start + note.len;

        let freq = osc.frequency();
        freq.set_value_at_time(note.from_hz, start)?;
        if note.to_hz != note.from_hz {
            freq.exponential_ramp_to_value_at_time(note.to_hz, end)?;
        }

        let env = gain.gain();
        env.set_value_at_time(SILENT, start)?;
        env.linear_ramp_to_value_at_time(note.peak * MASTER_VOLUME, start + ATTACK)?;
        env.exponential_ramp_to_value_at_time(SILENT, end)?;

        osc.start_with_when(start)?;
        osc.stop_with_when(end + 0.02)?;
        Ok(())
    }

    impl PresentationSink for AudioManager {
        fn on_hud(&mut self, _hud: &HudSnapshot) {}

        fn on_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }
}
