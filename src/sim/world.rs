//! Physics world
//!
//! A small rigid-body container: bodies are created from descriptors, dynamic
//! bodies are integrated with a fixed timestep, overlaps are resolved, and the
//! pairs that start touching during a step are reported back to the caller.

use std::collections::HashSet;

use glam::Vec2;

use super::body::{Body, BodyDesc, BodyHandle, Label};
use super::collision::{body_collision, reflect_velocity};
use crate::error::SimError;

/// One side of a collision pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairBody {
    pub handle: BodyHandle,
    pub label: Label,
}

/// Two bodies that started touching this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: PairBody,
    pub b: PairBody,
}

impl CollisionPair {
    /// The other body of the pair, if `handle` is one of them
    pub fn other(&self, handle: BodyHandle) -> Option<PairBody> {
        if self.a.handle == handle {
            Some(self.b)
        } else if self.b.handle == handle {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Container for every body of a session
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Sorted by handle (handles are never reused)
    bodies: Vec<Body>,
    next_id: u32,
    gravity: Vec2,
    restitution: f32,
    /// Pairs touching at the end of the last step
    contacts: HashSet<(BodyHandle, BodyHandle)>,
}

impl World {
    pub fn new(restitution: f32) -> Self {
        Self {
            restitution,
            ..Default::default()
        }
    }

    /// Create a body and add it to the world
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body::from_desc(handle, desc));
        handle
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.index_of(handle).map(|i| &mut self.bodies[i])
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.handle).ok()
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<(), SimError> {
        let body = self.body_mut(handle).ok_or(SimError::UnknownBody(handle))?;
        body.velocity = velocity;
        Ok(())
    }

    /// Switch a body between static (immovable) and dynamic
    pub fn set_static(&mut self, handle: BodyHandle, is_static: bool) -> Result<(), SimError> {
        let body = self.body_mut(handle).ok_or(SimError::UnknownBody(handle))?;
        body.is_static = is_static;
        if is_static {
            body.velocity = Vec2::ZERO;
        }
        Ok(())
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Advance every dynamic body by `dt` and return the new contacts
    pub fn step(&mut self, dt: f32) -> Vec<CollisionPair> {
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;
        }

        let mut touching = HashSet::with_capacity(self.contacts.len());
        let mut started = Vec::new();

        for j in 1..self.bodies.len() {
            for i in 0..j {
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                if a.is_static && b.is_static {
                    continue;
                }

                let result = body_collision(a, b);
                if !result.hit {
                    continue;
                }

                if result.penetration > 0.0 {
                    resolve(a, b, result.normal, result.penetration, self.restitution);
                }

                let key = (a.handle, b.handle);
                touching.insert(key);
                if !self.contacts.contains(&key) {
                    log::trace!("collision start: {:?} / {:?}", a.label, b.label);
                    started.push(CollisionPair {
                        a: PairBody {
                            handle: a.handle,
                            label: a.label,
                        },
                        b: PairBody {
                            handle: b.handle,
                            label: b.label,
                        },
                    });
                }
            }
        }

        self.contacts = touching;
        started
    }
}

/// Mutable access to two distinct bodies, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    let (left, right) = bodies.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

/// Push overlapping bodies apart and remove their approaching velocity
///
/// `normal` points from `b` toward `a`. Bodies are treated as equal mass.
fn resolve(a: &mut Body, b: &mut Body, normal: Vec2, penetration: f32, restitution: f32) {
    match (a.is_static, b.is_static) {
        (false, true) => {
            a.position += normal * penetration;
            a.velocity = reflect_velocity(a.velocity, normal, restitution);
        }
        (true, false) => {
            b.position -= normal * penetration;
            b.velocity = reflect_velocity(b.velocity, -normal, restitution);
        }
        (false, false) => {
            a.position += normal * (penetration / 2.0);
            b.position -= normal * (penetration / 2.0);
            let approach = (a.velocity - b.velocity).dot(normal);
            if approach < 0.0 {
                let impulse = -(1.0 + restitution) * approach / 2.0;
                a.velocity += normal * impulse;
                b.velocity -= normal * impulse;
            }
        }
        (true, true) => {}
    }
}
