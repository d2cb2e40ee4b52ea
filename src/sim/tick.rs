//! Fixed timestep simulation tick
//!
//! Applies input, steps the world and turns collision starts into game events.

use glam::Vec2;

use super::input::Key;
use super::maze::{Cell, Direction};
use super::rules::Observation;
use super::state::{GameEvent, GamePhase, Session};
use super::world::CollisionPair;
use crate::consts::*;
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Arrow keys pressed since the last tick, in order
    pub keys: Vec<Key>,
    /// Start a new maze with this seed
    pub restart: Option<u64>,
    /// Idle/demo mode - the autopilot steers the ball
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Result<(), SimError> {
    if let Some(seed) = input.restart {
        session.restart(seed)?;
    }

    for &key in &input.keys {
        session.press(key)?;
    }
    if input.idle_mode && session.phase == GamePhase::Playing {
        for key in Autopilot::default().keys(session)? {
            session.press(key)?;
        }
    }

    let started = session.world.step(dt);
    session.time_ticks += 1;
    handle_collisions(session, &started)
}

/// Feed collision starts to the win observer and apply their effects
pub(crate) fn handle_collisions(
    session: &mut Session,
    pairs: &[CollisionPair],
) -> Result<(), SimError> {
    for pair in pairs {
        for side in [pair.a, pair.b] {
            if session.world.body(side.handle).is_none() {
                return Err(SimError::UnknownBody(side.handle));
            }
        }

        match session.observer.observe(pair) {
            Observation::Won => {
                log::info!(
                    "Goal reached after {} ticks (seed {})",
                    session.time_ticks,
                    session.seed()
                );
                session.phase = GamePhase::Won;
                session.events.push(GameEvent::GoalReached);
                session.events.push(GameEvent::Won {
                    ticks: session.time_ticks,
                });
                if session.settings.win_effects {
                    collapse_walls(session)?;
                }
            }
            Observation::GoalTouched => session.events.push(GameEvent::GoalReached),
            Observation::BallHitWall { ball, .. } => {
                if session.settings.win_effects {
                    session.world.set_velocity(ball, Vec2::ZERO)?;
                    session.events.push(GameEvent::BallStopped);
                }
            }
            Observation::Ignored => {}
        }
    }

    Ok(())
}

/// Let every wall fall
fn collapse_walls(session: &mut Session) -> Result<(), SimError> {
    let walls: Vec<_> = session.bodies.all_walls().collect();
    log::debug!("Collapsing {} walls", walls.len());
    for handle in walls {
        session.world.set_static(handle, false)?;
    }
    session
        .world
        .set_gravity(Vec2::new(0.0, session.settings.win_gravity));
    Ok(())
}

/// Runs `tick` at `SIM_DT` regardless of the frame rate
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `frame_dt` seconds of simulation and return the substeps run
    ///
    /// One-shot inputs (keys, restart) are cleared after the first substep.
    pub fn advance(
        &mut self,
        session: &mut Session,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> Result<u32, SimError> {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(session, input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            input.keys.clear();
            input.restart = None;
        }

        Ok(substeps)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Demo-mode driver that steers the ball along the shortest path to the goal
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Off-centre distance tolerated before correcting, as a fraction of a grid unit
    pub tolerance: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

impl Autopilot {
    /// Cell the ball should head for next
    pub fn waypoint(&self, session: &Session) -> Result<Cell, SimError> {
        let here = session.ball_cell()?;
        let goal = session.maze.last_cell();
        let next = session
            .maze
            .path(here, goal)
            .and_then(|path| path.get(1).copied())
            .unwrap_or(goal);
        Ok(next)
    }

    /// Key toward the next path cell, `None` once in the goal cell
    pub fn heading(&self, session: &Session) -> Result<Option<Key>, SimError> {
        let here = session.ball_cell()?;
        let target = self.waypoint(session)?;
        Ok(Direction::between(here, target).map(Key::from))
    }

    /// Keys to press this tick: the heading, plus a correction toward the
    /// waypoint's centre on any other axis that is off target
    pub fn keys(&self, session: &Session) -> Result<Vec<Key>, SimError> {
        let target = self.waypoint(session)?;
        let heading = self.heading(session)?;
        let layout = &session.layout;
        let delta = layout.cell_center(target.row, target.col) - session.ball_position()?;

        let mut keys = Vec::with_capacity(2);
        keys.extend(heading);
        let along_x = matches!(heading, Some(Key::Left | Key::Right));
        let along_y = matches!(heading, Some(Key::Up | Key::Down));
        if !along_x && delta.x.abs() > layout.unit_x * self.tolerance {
            keys.push(if delta.x > 0.0 { Key::Right } else { Key::Left });
        }
        if !along_y && delta.y.abs() > layout.unit_y * self.tolerance {
            keys.push(if delta.y > 0.0 { Key::Down } else { Key::Up });
        }
        Ok(keys)
    }
}
