//! Rendering module
//!
//! The simulation is turned into a flat list of draw commands each frame.
//! On the web the list is painted onto a 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{DrawCommand, Paint, draw_list};

use crate::settings::Settings;

/// Display options for the render loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Outline every body instead of filling it
    pub wireframes: bool,
    pub width: f32,
    pub height: f32,
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            wireframes: settings.wireframes,
            width: settings.width,
            height: settings.height,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.07, 0.07, 0.1, 1.0];
    pub const WIREFRAME: [f32; 4] = [0.6, 0.6, 0.65, 1.0];
    pub const WALL: [f32; 4] = [0.9, 0.3, 0.3, 1.0];
    pub const BORDER: [f32; 4] = [0.5, 0.5, 0.55, 1.0];
    pub const GOAL: [f32; 4] = [0.3, 0.85, 0.4, 1.0];
    pub const BALL: [f32; 4] = [0.3, 0.6, 1.0, 1.0];

    /// CSS `rgba()` string for canvas styles
    pub fn css(color: [f32; 4]) -> String {
        let [r, g, b, a] = color;
        format!(
            "rgba({}, {}, {}, {})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(colors::css([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1)");
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            wireframes: false,
            width: 800.0,
            ..Default::default()
        };
        let options = RenderOptions::from(&settings);
        assert!(!options.wireframes);
        assert_eq!(options.width, 800.0);
        assert_eq!(options.height, 600.0);
    }
}
