//! Error types
//!
//! Configuration problems are reported before any body is created.
//! Simulation errors mean the physics world broke its own contract and are fatal.

use crate::sim::BodyHandle;

/// Invalid or unreadable configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("start cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    StartOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{name} must be a finite number greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be a finite number (got {value})")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must be within {min}..={max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("wall thickness {thickness} does not fit in a {unit} pixel grid unit")]
    WallTooThick { thickness: f32, unit: f32 },

    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal simulation errors
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("collision pair names unknown body {0:?}")]
    UnknownBody(BodyHandle),

    #[error("could not restart: {0}")]
    Restart(#[from] ConfigError),
}
