//! Maze Ball entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use maze_ball::consts::*;
    use maze_ball::renderer::{CanvasRenderer, RenderOptions};
    use maze_ball::sim::{FixedStep, GameEvent, Key, Session, TickInput};
    use maze_ball::{Settings, SimError};

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        stepper: FixedStep,
        input: TickInput,
        last_time: f64,
        document: Document,
    }

    impl Game {
        /// Run simulation ticks and react to their events
        fn update(&mut self, dt: f32) -> Result<(), SimError> {
            self.stepper
                .advance(&mut self.session, &mut self.input, dt)?;

            for event in self.session.drain_events() {
                match event {
                    GameEvent::Won { ticks } => {
                        log::info!("Winner! ({} ticks)", ticks);
                        self.show_winner(true);
                    }
                    GameEvent::GoalReached | GameEvent::BallStopped => {
                        log::debug!("{:?}", event);
                    }
                }
            }
            Ok(())
        }

        fn render(&self) {
            if let Err(e) = self.renderer.render(&self.session.world) {
                log::error!("Render failed: {:?}", e);
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.input.restart = Some(seed);
            self.stepper.reset();
            self.show_winner(false);
            log::info!("Restarting with seed: {}", seed);
        }

        fn toggle_wireframes(&mut self) {
            let settings = &mut self.session.settings;
            settings.wireframes = !settings.wireframes;
            settings.save();
            self.renderer.set_options(RenderOptions::from(&*settings));
        }

        /// Show or hide the winner banner
        fn show_winner(&self, visible: bool) {
            let Ok(Some(banner)) = self.document.query_selector(".winner") else {
                return;
            };
            let classes = banner.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Maze Ball starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let options = RenderOptions::from(&settings);
        let seed = js_sys::Date::now() as u64;
        let session =
            Session::new(settings, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        let renderer = CanvasRenderer::new(&canvas, options)?;
        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            stepper: FixedStep::new(),
            input: TickInput::default(),
            last_time: 0.0,
            document,
        }));
        game.borrow().show_winner(false);

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Maze Ball running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let code = event.key();
            if let Some(key) = Key::from_code(&code) {
                event.prevent_default();
                g.input.keys.push(key);
                return;
            }
            match code.as_str() {
                "r" | "R" => g.restart(),
                "w" | "W" => g.toggle_wireframes(),
                "i" | "I" => {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
                SIM_DT
            };
            g.last_time = time;

            if let Err(e) = g.update(dt) {
                // Stop the loop
                log::error!("Simulation halted: {}", e);
                return;
            }
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Maze Ball (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays one maze in simulated time
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};

    use maze_ball::consts::SIM_DT;
    use maze_ball::sim::{FixedStep, GameEvent, Session, TickInput};
    use maze_ball::{Settings, SizePreset};

    /// Simulated time before the demo gives up (seconds)
    const DEMO_SECONDS: f32 = 120.0;
    /// Simulated frame length
    const FRAME_DT: f32 = 1.0 / 60.0;

    /// What the command line asked for
    #[derive(Debug)]
    enum Command {
        /// `maze-ball [small|medium|large|settings.json]`
        Play(Settings),
        /// `maze-ball --dump-settings <path> [small|medium|large|settings.json]`
        DumpSettings { path: String, settings: Settings },
    }

    fn settings_from_arg(arg: Option<&str>) -> Result<Settings> {
        let Some(arg) = arg else {
            return Ok(Settings::default());
        };
        if let Some(preset) = SizePreset::from_str(arg) {
            log::info!("Using {} preset", preset.as_str());
            return Ok(Settings::from_preset(preset));
        }
        log::info!("Loading settings from {}", arg);
        Settings::load_from_path(arg).with_context(|| format!("reading settings from {arg}"))
    }

    fn parse_args(args: &[String]) -> Result<Command> {
        match args.first().map(String::as_str) {
            Some("--dump-settings") => {
                let path = args
                    .get(1)
                    .context("--dump-settings needs an output path")?
                    .clone();
                let settings = settings_from_arg(args.get(2).map(String::as_str))?;
                Ok(Command::DumpSettings { path, settings })
            }
            other => Ok(Command::Play(settings_from_arg(other)?)),
        }
    }

    /// `MAZE_SEED` if set, else the clock
    fn parse_seed(value: Option<String>) -> Result<u64> {
        match value {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("MAZE_SEED must be an unsigned integer (got {value:?})")),
            None => Ok(SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock is before the Unix epoch")?
                .as_millis() as u64),
        }
    }

    pub fn run() -> Result<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match parse_args(&args)? {
            Command::DumpSettings { path, settings } => {
                settings
                    .save_to_path(&path)
                    .with_context(|| format!("writing settings to {path}"))?;
                log::info!("Settings written to {}", path);
                Ok(())
            }
            Command::Play(settings) => {
                let seed = parse_seed(std::env::var("MAZE_SEED").ok())?;
                play(settings, seed)
            }
        }
    }

    fn play(settings: Settings, seed: u64) -> Result<()> {
        let mut session = Session::new(settings, seed).context("building the maze")?;
        log::info!("Maze:\n{}", session.maze);

        let mut stepper = FixedStep::new();
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let frames = (DEMO_SECONDS / FRAME_DT) as u32;
        let mut goal_contacts = 0;
        let mut won_at = None;
        for _ in 0..frames {
            stepper
                .advance(&mut session, &mut input, FRAME_DT)
                .context("simulation failed")?;
            for event in session.drain_events() {
                match event {
                    GameEvent::GoalReached => goal_contacts += 1,
                    GameEvent::Won { ticks } => won_at = Some(ticks),
                    GameEvent::BallStopped => {}
                }
            }
            if won_at.is_some() {
                break;
            }
        }

        match won_at {
            Some(ticks) => println!(
                "Seed {} solved in {:.2}s ({} goal contact(s))",
                seed,
                ticks as f32 * SIM_DT,
                goal_contacts
            ),
            None => {
                let cell = session.ball_cell()?;
                println!(
                    "Seed {} unsolved after {}s, ball stuck in cell ({}, {})",
                    seed, DEMO_SECONDS, cell.row, cell.col
                );
            }
        }
        Ok(())
    }

}
