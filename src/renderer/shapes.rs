//! Draw-command generation for world bodies

use glam::Vec2;

use super::{RenderOptions, colors};
use crate::sim::{Body, Label, Shape, World};

/// Fill or outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill([f32; 4]),
    Stroke([f32; 4]),
}

/// One primitive to draw, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Rect { center: Vec2, size: Vec2, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
}

/// Default color of a body without a style override
fn label_color(label: Label) -> [f32; 4] {
    match label {
        Label::Ball => colors::BALL,
        Label::Goal => colors::GOAL,
        Label::Wall => colors::BORDER,
    }
}

fn paint_for(body: &Body, options: &RenderOptions) -> Paint {
    if options.wireframes {
        Paint::Stroke(colors::WIREFRAME)
    } else {
        Paint::Fill(body.style.unwrap_or_else(|| label_color(body.label)))
    }
}

/// Build the draw list for every body, in world order
pub fn draw_list(world: &World, options: &RenderOptions) -> Vec<DrawCommand> {
    world
        .bodies()
        .iter()
        .map(|body| {
            let paint = paint_for(body, options);
            match body.shape {
                Shape::Rect { size } => DrawCommand::Rect {
                    center: body.position,
                    size,
                    paint,
                },
                Shape::Circle { radius } => DrawCommand::Circle {
                    center: body.position,
                    radius,
                    paint,
                },
            }
        })
        .collect()
}
