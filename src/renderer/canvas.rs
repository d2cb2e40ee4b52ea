//! Canvas 2D backend (web only)

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCommand, Paint, RenderOptions, colors, draw_list};
use crate::sim::World;

/// Paints draw lists onto a canvas element
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    options: RenderOptions,
}

impl CanvasRenderer {
    /// Size the canvas to the world and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, options: RenderOptions) -> Result<Self, JsValue> {
        canvas.set_width(options.width as u32);
        canvas.set_height(options.height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { context, options })
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Draw one frame
    pub fn render(&self, world: &World) -> Result<(), JsValue> {
        let ctx = &self.context;
        let (w, h) = (self.options.width as f64, self.options.height as f64);

        ctx.set_fill_style_str(&colors::css(colors::BACKGROUND));
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_line_width(1.0);

        for command in draw_list(world, &self.options) {
            match command {
                DrawCommand::Rect {
                    center,
                    size,
                    paint,
                } => {
                    let x = (center.x - size.x / 2.0) as f64;
                    let y = (center.y - size.y / 2.0) as f64;
                    match paint {
                        Paint::Fill(color) => {
                            ctx.set_fill_style_str(&colors::css(color));
                            ctx.fill_rect(x, y, size.x as f64, size.y as f64);
                        }
                        Paint::Stroke(color) => {
                            ctx.set_stroke_style_str(&colors::css(color));
                            ctx.stroke_rect(x, y, size.x as f64, size.y as f64);
                        }
                    }
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    paint,
                } => {
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    match paint {
                        Paint::Fill(color) => {
                            ctx.set_fill_style_str(&colors::css(color));
                            ctx.fill();
                        }
                        Paint::Stroke(color) => {
                            ctx.set_stroke_style_str(&colors::css(color));
                            ctx.stroke();
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
