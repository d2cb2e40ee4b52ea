//! Collision detection and response for circles and axis-aligned rectangles
//!
//! Every test is written from the point of view of the first shape: the normal
//! points from the other shape toward it, so moving the first shape by
//! `normal * penetration` separates the two.

use glam::Vec2;

use super::body::{Body, Shape};

/// Distance at which two shapes still count as touching
///
/// Keeps a resting contact alive after positional correction so it does not
/// report a fresh collision every step.
pub const CONTACT_SLOP: f32 = 0.5;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Shapes overlap or touch within [`CONTACT_SLOP`]
    pub hit: bool,
    /// Surface normal pointing toward the first shape
    pub normal: Vec2,
    /// Overlap depth (negative while merely touching)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn contact(normal: Vec2, penetration: f32) -> Self {
        if penetration > -CONTACT_SLOP {
            Self {
                hit: true,
                normal,
                penetration,
            }
        } else {
            Self::miss()
        }
    }
}

/// Circle against an axis-aligned rectangle
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half: Vec2,
) -> CollisionResult {
    let local = center - rect_center;
    let clamped = local.clamp(-half, half);

    if clamped != local {
        // Centre outside the rectangle: nearest point on the boundary
        let offset = local - clamped;
        let dist = offset.length();
        return CollisionResult::contact(offset / dist, radius - dist);
    }

    // Centre inside: push out through the nearest face
    let to_right = half.x - local.x;
    let to_left = half.x + local.x;
    let to_bottom = half.y - local.y;
    let to_top = half.y + local.y;
    let nearest = to_right.min(to_left).min(to_bottom).min(to_top);

    let normal = if nearest == to_right {
        Vec2::X
    } else if nearest == to_left {
        Vec2::NEG_X
    } else if nearest == to_bottom {
        Vec2::Y
    } else {
        Vec2::NEG_Y
    };

    CollisionResult::contact(normal, radius + nearest)
}

/// Rectangle against rectangle, separated along the axis of least overlap
pub fn rect_rect_collision(
    a_center: Vec2,
    a_half: Vec2,
    b_center: Vec2,
    b_half: Vec2,
) -> CollisionResult {
    let delta = a_center - b_center;
    let overlap = a_half + b_half - delta.abs();
    if overlap.min_element() <= -CONTACT_SLOP {
        return CollisionResult::miss();
    }

    if overlap.x < overlap.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult::contact(Vec2::new(sign, 0.0), overlap.x)
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult::contact(Vec2::new(0.0, sign), overlap.y)
    }
}

/// Circle against circle
pub fn circle_circle_collision(
    a_center: Vec2,
    a_radius: f32,
    b_center: Vec2,
    b_radius: f32,
) -> CollisionResult {
    let offset = a_center - b_center;
    let dist = offset.length();
    let normal = if dist > f32::EPSILON { offset / dist } else { Vec2::Y };
    CollisionResult::contact(normal, a_radius + b_radius - dist)
}

/// Check two bodies; the normal points toward `a`
pub fn body_collision(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_rect_collision(a.position, radius, b.position, b.shape.half_extents())
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            let mut result =
                circle_rect_collision(b.position, radius, a.position, a.shape.half_extents());
            result.normal = -result.normal;
            result
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect_collision(
            a.position,
            a.shape.half_extents(),
            b.position,
            b.shape.half_extents(),
        ),
        (Shape::Circle { radius: a_radius }, Shape::Circle { radius: b_radius }) => {
            circle_circle_collision(a.position, a_radius, b.position, b_radius)
        }
    }
}

/// Reflect the part of `velocity` heading into a surface
///
/// `restitution` 0 stops motion along the normal, 1 is a perfect bounce.
/// Velocity already moving away from the surface is returned unchanged.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach < 0.0 {
        velocity - (1.0 + restitution) * approach * normal
    } else {
        velocity
    }
}
