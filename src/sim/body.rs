//! Rigid bodies of the physics world

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque reference to a body in a [`World`](super::World)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) u32);

/// Semantic tag carried by every body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Ball,
    Goal,
    Wall,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ball => "ball",
            Label::Goal => "goal",
            Label::Wall => "wall",
        }
    }
}

/// Collision shape, centred on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle
    Rect { size: Vec2 },
    Circle { radius: f32 },
}

impl Shape {
    /// Half-size of the shape's bounding box
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Rect { size } => size / 2.0,
            Shape::Circle { radius } => Vec2::splat(radius),
        }
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Centre of the shape
    pub position: Vec2,
    pub shape: Shape,
    pub is_static: bool,
    pub label: Label,
    /// Fill colour override (RGBA)
    pub style: Option<[f32; 4]>,
}

impl BodyDesc {
    /// A static rectangle
    pub fn rectangle(center: Vec2, size: Vec2, label: Label) -> Self {
        Self {
            position: center,
            shape: Shape::Rect { size },
            is_static: true,
            label,
            style: None,
        }
    }

    /// A dynamic circle
    pub fn circle(center: Vec2, radius: f32, label: Label) -> Self {
        Self {
            position: center,
            shape: Shape::Circle { radius },
            is_static: false,
            label,
            style: None,
        }
    }

    pub fn with_style(mut self, color: [f32; 4]) -> Self {
        self.style = Some(color);
        self
    }
}

/// A live body owned by the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub label: Label,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_static: bool,
    pub style: Option<[f32; 4]>,
}

impl Body {
    pub(crate) fn from_desc(handle: BodyHandle, desc: BodyDesc) -> Self {
        Self {
            handle,
            label: desc.label,
            shape: desc.shape,
            position: desc.position,
            velocity: Vec2::ZERO,
            is_static: desc.is_static,
            style: desc.style,
        }
    }
}
