//! Game session state
//!
//! A session owns everything one maze needs: the settings it was built from,
//! the generated maze, the physics world and the handles into it. Restarting
//! builds a fresh session state in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::compiler::{Installed, Layout, compile};
use super::input::{Key, apply_key};
use super::maze::{Cell, Maze, generate};
use super::rules::WinObserver;
use super::world::World;
use crate::error::{ConfigError, SimError};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball is being steered toward the goal
    Playing,
    /// Goal reached
    Won,
}

/// Things the host should react to (banner, sounds, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball started touching the goal (every contact)
    GoalReached,
    /// The game was won (once per session)
    Won { ticks: u64 },
    /// Ball stopped dead against a wall (win effects only)
    BallStopped,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One game on one maze
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the maze was generated from
    pub rng_state: RngState,
    pub settings: Settings,
    pub layout: Layout,
    pub maze: Maze,
    pub world: World,
    pub bodies: Installed,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) observer: WinObserver,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Validate settings, generate a maze from `seed` and populate the world
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let maze = generate(settings.rows, settings.cols, &mut rng)?;
        Ok(Self::from_maze(settings, rng_state, maze))
    }

    /// Build a session around an existing maze (settings must be valid)
    pub fn from_maze(settings: Settings, rng_state: RngState, maze: Maze) -> Self {
        let layout = Layout::new(&settings, maze.rows, maze.cols);
        let plan = compile(&maze, &layout);
        log::info!(
            "New {}x{} maze (seed {}): {} obstacles, traversal from ({}, {})",
            maze.rows,
            maze.cols,
            rng_state.seed,
            plan.obstacle_count(),
            maze.start.row,
            maze.start.col
        );
        log::debug!("\n{maze}");

        let mut world = World::new(settings.restitution);
        let bodies = plan.install(&mut world);

        Self {
            rng_state,
            settings,
            layout,
            maze,
            world,
            bodies,
            phase: GamePhase::Playing,
            time_ticks: 0,
            observer: WinObserver::new(),
            events: Vec::new(),
        }
    }

    /// Throw the current maze away and start over with a new seed
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        *self = Self::new(self.settings.clone(), seed)?;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn has_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn ball_position(&self) -> Result<Vec2, SimError> {
        self.world
            .body(self.bodies.ball)
            .map(|b| b.position)
            .ok_or(SimError::UnknownBody(self.bodies.ball))
    }

    pub fn ball_velocity(&self) -> Result<Vec2, SimError> {
        self.world
            .body(self.bodies.ball)
            .map(|b| b.velocity)
            .ok_or(SimError::UnknownBody(self.bodies.ball))
    }

    /// Grid cell the ball's centre is in
    pub fn ball_cell(&self) -> Result<Cell, SimError> {
        let position = self.ball_position()?;
        let (row, col) = self.layout.cell_at(position, self.maze.rows, self.maze.cols);
        Ok(Cell::new(row, col))
    }

    /// Apply an arrow key to the ball
    pub fn press(&mut self, key: Key) -> Result<(), SimError> {
        let velocity = apply_key(self.ball_velocity()?, key, self.settings.move_speed);
        self.world.set_velocity(self.bodies.ball, velocity)
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Label, Shape};

    #[test]
    fn test_new_session_populates_world() {
        let session = Session::new(Settings::default(), 12345).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.seed(), 12345);

        let balls = session
            .world
            .bodies()
            .iter()
            .filter(|b| b.label == Label::Ball)
            .count();
        assert_eq!(balls, 1);

        let expected = 4
            + session.maze.closed_horizontal_count()
            + session.maze.closed_vertical_count()
            + 1;
        let obstacles = session.world.bodies().iter().filter(|b| b.is_static).count();
        assert_eq!(obstacles, expected);

        let goal = session.world.body(session.bodies.goal).unwrap();
        assert_eq!(goal.position, Vec2::new(500.0, 500.0));
        assert!(matches!(goal.shape, Shape::Rect { .. }));

        assert_eq!(session.ball_position().unwrap(), Vec2::new(100.0, 100.0));
        assert_eq!(session.ball_cell().unwrap(), Cell::new(0, 0));
    }

    #[test]
    fn test_invalid_settings_fail_before_world_exists() {
        let settings = Settings {
            height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(settings, 1),
            Err(ConfigError::NotPositive { name: "height", .. })
        ));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = Session::new(Settings::default(), 777).unwrap();
        let b = Session::new(Settings::default(), 777).unwrap();
        assert_eq!(a.maze, b.maze);
    }

    #[test]
    fn test_press_overrides_axis() {
        let mut session = Session::new(Settings::default(), 5).unwrap();
        session.press(Key::Right).unwrap();
        session.press(Key::Right).unwrap();
        assert_eq!(session.ball_velocity().unwrap(), Vec2::new(300.0, 0.0));
        session.press(Key::Up).unwrap();
        assert_eq!(session.ball_velocity().unwrap(), Vec2::new(300.0, -300.0));
    }

    #[test]
    fn test_restart_resets_state() {
        let mut session = Session::new(Settings::default(), 5).unwrap();
        session.press(Key::Down).unwrap();
        session.phase = GamePhase::Won;
        session.time_ticks = 99;

        session.restart(6).unwrap();
        assert_eq!(session.seed(), 6);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.time_ticks, 0);
        assert_eq!(session.ball_velocity().unwrap(), Vec2::ZERO);
        assert!(session.drain_events().is_empty());
    }
}
