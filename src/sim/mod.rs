//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod compiler;
pub mod input;
pub mod maze;
pub mod rules;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, BodyDesc, BodyHandle, Label, Shape};
pub use collision::{CollisionResult, body_collision, reflect_velocity};
pub use compiler::{Installed, Layout, WorldPlan, compile};
pub use input::{Key, apply_key};
pub use maze::{Cell, Direction, Maze, generate, generate_from, shuffle};
pub use rules::{LabelPair, Observation, PairKind, WinObserver};
pub use state::{GameEvent, GamePhase, RngState, Session};
pub use tick::{Autopilot, FixedStep, TickInput, tick};
pub use world::{CollisionPair, PairBody, World};
