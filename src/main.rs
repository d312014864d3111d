//! Grid Runner entry point
//!
//! Browser build: wires keyboard, DOM HUD, audio and leaderboard to a
//! `Session` and drives it from `requestAnimationFrame`.
//! Native build: runs a headless autopilot session and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Request, RequestInit, RequestMode, Response};

    use grid_runner::audio::AudioManager;
    use grid_runner::consts::FRAME_DT;
    use grid_runner::sim::{GameEvent, HudSnapshot, InputCommand, RunPhase};
    use grid_runner::{
        CollaboratorError, GameConfig, LeaderboardClient, PresentationSink, ScoreRecord, Session,
    };

    const PLAYER_KEY: &str = "grid_runner_player";
    const LEADERBOARD_URL_KEY: &str = "grid_runner_leaderboard_url";

    /// Game instance: the session plus frame timing
    struct Game {
        session: Session,
        last_time: f64,
    }

    /// Writes the HUD and overlays into the page
    struct DomHud {
        document: Document,
        last_phase: Option<RunPhase>,
    }

    impl DomHud {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    impl PresentationSink for DomHud {
        fn on_hud(&mut self, hud: &HudSnapshot) {
            self.set_text("#hud-score .hud-value", &hud.score.to_string());
            self.set_text(
                "#hud-health .hud-value",
                &format!("{}/{}", hud.health, hud.max_health),
            );
            self.set_text("#hud-distance .hud-value", &format!("{:.0}", hud.distance));

            if self.last_phase != Some(hud.phase) {
                self.set_visible("intro", hud.phase == RunPhase::Intro);
                self.set_visible("pause-menu", hud.phase == RunPhase::Paused);
                self.set_visible("game-over", hud.phase == RunPhase::GameOver);
                self.last_phase = Some(hud.phase);
            }
        }

        fn on_event(&mut self, event: &GameEvent) {
            if let GameEvent::GameOver { score, distance } = *event {
                self.set_text("#final-score", &score.to_string());
                self.set_text("#final-distance", &format!("{:.0}", distance));
            }
        }
    }

    /// POSTs score records as JSON, without waiting for the response
    struct FetchLeaderboard {
        url: String,
    }

    impl LeaderboardClient for FetchLeaderboard {
        fn submit(&mut self, record: &ScoreRecord) -> Result<(), CollaboratorError> {
            let fail = |e: JsValue| CollaboratorError::Leaderboard(format!("{:?}", e));

            let body = serde_json::to_string(record)
                .map_err(|e| CollaboratorError::Leaderboard(e.to_string()))?;
            let init = RequestInit::new();
            init.set_method("POST");
            init.set_mode(RequestMode::Cors);
            init.set_body(&JsValue::from_str(&body));

            let request = Request::new_with_str_and_init(&self.url, &init).map_err(fail)?;
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(fail)?;

            let window = web_sys::window()
                .ok_or_else(|| CollaboratorError::Leaderboard("no window".to_string()))?;
            let promise = window.fetch_with_request(&request);

            wasm_bindgen_futures::spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(value) => match value.dyn_into::<Response>() {
                        Ok(resp) if resp.ok() => log::info!("Score submitted"),
                        Ok(resp) => log::warn!(
                            "{}",
                            CollaboratorError::Leaderboard(format!("HTTP {}", resp.status()))
                        ),
                        Err(e) => log::warn!("{}", fail(e)),
                    },
                    Err(e) => log::warn!("{}", fail(e)),
                }
            });
            Ok(())
        }
    }

    fn storage_item(key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(key).ok()?
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Grid Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = match GameConfig::load() {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid config, refusing to start: {}", e);
                if let Some(el) = document.get_element_by_id("loading") {
                    el.set_text_content(Some(&format!("Invalid config: {}", e)));
                }
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let player = storage_item(PLAYER_KEY).unwrap_or_else(|| "Runner".to_string());
        let mut session = match Session::new(config, seed, player) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start session: {}", e);
                return;
            }
        };

        session.add_sink(Box::new(DomHud {
            document: document.clone(),
            last_phase: None,
        }));
        session.add_sink(Box::new(AudioManager::new()));
        if let Some(url) = storage_item(LEADERBOARD_URL_KEY) {
            log::info!("Submitting scores to {}", url);
            session.set_leaderboard_client(Box::new(FetchLeaderboard { url }));
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Grid Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let command = match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => InputCommand::MoveLeft,
                    "ArrowRight" | "d" | "D" => InputCommand::MoveRight,
                    "Escape" | "p" | "P" => InputCommand::PauseToggle,
                    " " | "Enter" => {
                        if g.session.state().phase == RunPhase::GameOver {
                            InputCommand::AcknowledgeGameOver
                        } else {
                            InputCommand::StartGame
                        }
                    }
                    _ => return,
                };
                g.session.queue(command);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if matches!(
                    event.key().as_str(),
                    "ArrowLeft" | "ArrowRight" | "a" | "A" | "d" | "D"
                ) {
                    game.borrow_mut().session.queue(InputCommand::MoveIdle);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.session.frame(dt);
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab switch, minimize
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.queue(InputCommand::Pause);
                    log::info!("Auto-pause requested (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Click outside the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                // Tab switches fire this and visibilitychange in the same frame
                game.borrow_mut().session.queue(InputCommand::Pause);
                log::info!("Auto-pause requested (window blur)");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Grid Runner (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let config = match grid_runner::GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match headless::run(config, seed, 3) {
        Ok(board) => {
            println!("\nSession leaderboard:");
            for (i, entry) in board.entries.iter().enumerate() {
                println!(
                    "{:>2}. {:<10} {:>6} pts {:>8.0} m",
                    i + 1,
                    entry.player_name,
                    entry.score,
                    entry.distance
                );
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use grid_runner::consts::FRAME_DT;
    use grid_runner::sim::{Category, GameEvent, GameState, HudSnapshot, InputCommand, RunPhase};
    use grid_runner::{ConfigError, GameConfig, Leaderboard, PresentationSink, Session};

    /// Upper bound on simulated time, in case the autopilot never dies
    const MAX_SIM_SECONDS: f32 = 600.0;

    struct LogSink;

    impl PresentationSink for LogSink {
        fn on_hud(&mut self, _hud: &HudSnapshot) {}

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::GameOver { score, distance } => {
                    log::info!("Run over: {} pts, {:.0} m", score, distance)
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    /// Dodge the nearest obstacle ahead, otherwise drift toward the nearest bonus
    fn autopilot(state: &GameState) -> InputCommand {
        let threshold = state.config.collision_threshold;
        let ahead = |depth: f32| depth < 0.0 && depth > -30.0;

        let threat = state
            .pool
            .entities()
            .iter()
            .filter(|e| e.category() == Category::Obstacle)
            .filter(|e| ahead(e.world_depth(state.scroll_depth)))
            .filter(|e| {
                e.world_lateral(state.lateral_offset).abs() < threshold + e.scale.x / 2.0 + 0.5
            })
            .max_by(|a, b| a.position.z.total_cmp(&b.position.z));

        if let Some(obstacle) = threat {
            // Steering left raises every entity's world lateral position
            return if obstacle.world_lateral(state.lateral_offset) >= 0.0 {
                InputCommand::MoveLeft
            } else {
                InputCommand::MoveRight
            };
        }

        let target = state
            .pool
            .entities()
            .iter()
            .filter(|e| e.category() == Category::Bonus)
            .filter(|e| ahead(e.world_depth(state.scroll_depth)))
            .max_by(|a, b| a.position.z.total_cmp(&b.position.z));

        match target.map(|e| e.world_lateral(state.lateral_offset)) {
            Some(x) if x > 0.2 => InputCommand::MoveRight,
            Some(x) if x < -0.2 => InputCommand::MoveLeft,
            _ => InputCommand::MoveIdle,
        }
    }

    pub fn run(config: GameConfig, seed: u64, runs: u32) -> Result<Leaderboard, ConfigError> {
        let mut session = Session::new(config, seed, "autopilot")?;
        session.add_sink(Box::new(LogSink));
        log::info!("Headless session, seed {}", seed);

        let mut finished = 0;
        let mut sim_time = 0.0;
        while finished < runs && sim_time < MAX_SIM_SECONDS {
            match session.state().phase {
                RunPhase::Intro => session.queue(InputCommand::StartGame),
                RunPhase::Running => {
                    let command = autopilot(session.state());
                    session.queue(command);
                }
                RunPhase::Paused | RunPhase::GameOver => {}
            }

            let report = session.frame(FRAME_DT);
            sim_time += FRAME_DT;
            finished += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count() as u32;
        }

        log::info!("{} runs in {:.0} simulated seconds", finished, sim_time);
        Ok(session.leaderboard().clone())
    }
}
