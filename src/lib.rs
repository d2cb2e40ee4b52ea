//! Maze Ball - roll a ball through a random maze to the goal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze generation, world compilation, physics, win rules)
//! - `renderer`: Draw-list extraction and the browser canvas backend
//! - `settings`: Runtime configuration
//! - `error`: Configuration and simulation errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::{Settings, SizePreset};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default grid size (rows and columns)
    pub const DEFAULT_CELLS: usize = 3;
    /// World dimensions in pixels
    pub const WORLD_WIDTH: f32 = 600.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Interior wall thickness
    pub const WALL_THICKNESS: f32 = 5.0;
    /// Boundary wall thickness
    pub const BORDER_THICKNESS: f32 = 2.0;

    /// Goal side as a fraction of a grid unit
    pub const GOAL_RATIO: f32 = 0.7;
    /// Ball radius as a fraction of the smaller grid unit
    pub const BALL_RATIO: f32 = 0.25;

    /// Axis speed set by an arrow key (pixels/s)
    pub const MOVE_SPEED: f32 = 300.0;
    /// Gravity once the walls collapse (pixels/s²)
    pub const WIN_GRAVITY: f32 = 600.0;
}
