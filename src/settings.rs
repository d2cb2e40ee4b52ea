//! Game settings
//!
//! Every tunable of a session lives here. Persisted as JSON: in LocalStorage on
//! the web, in a file passed on the command line natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Maze size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SizePreset {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizePreset::Small => "Small",
            SizePreset::Medium => "Medium",
            SizePreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(SizePreset::Small),
            "medium" | "med" => Some(SizePreset::Medium),
            "large" => Some(SizePreset::Large),
            _ => None,
        }
    }

    /// Grid dimensions as (rows, cols)
    pub fn grid(&self) -> (usize, usize) {
        match self {
            SizePreset::Small => (3, 3),
            SizePreset::Medium => (6, 8),
            SizePreset::Large => (10, 14),
        }
    }
}

/// Runtime configuration of a maze session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,

    // === World ===
    /// World width in pixels
    pub width: f32,
    /// World height in pixels
    pub height: f32,
    /// Thickness of interior maze walls
    pub wall_thickness: f32,
    /// Thickness of the four boundary walls
    pub border_thickness: f32,
    /// Goal side length as a fraction of a grid unit
    pub goal_ratio: f32,
    /// Ball radius as a fraction of the smaller grid unit
    pub ball_ratio: f32,

    // === Motion ===
    /// Speed set on an axis by an arrow key (pixels/s)
    pub move_speed: f32,
    /// Fraction of normal velocity kept after hitting a wall (0 = dead stop)
    pub restitution: f32,

    // === Presentation ===
    /// Draw outlines instead of filled shapes
    pub wireframes: bool,
    /// Walls collapse and the ball stops on contact once the goal is reached
    pub win_effects: bool,
    /// Gravity switched on by the win effects (pixels/s²)
    pub win_gravity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_CELLS,
            cols: DEFAULT_CELLS,

            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            border_thickness: BORDER_THICKNESS,
            goal_ratio: GOAL_RATIO,
            ball_ratio: BALL_RATIO,

            move_speed: MOVE_SPEED,
            restitution: 0.0,

            wireframes: true,
            win_effects: false,
            win_gravity: WIN_GRAVITY,
        }
    }
}

impl Settings {
    /// Create settings from a size preset
    pub fn from_preset(preset: SizePreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a size preset (only the grid dimensions change)
    pub fn apply_preset(&mut self, preset: SizePreset) {
        let (rows, cols) = preset.grid();
        self.rows = rows;
        self.cols = cols;
    }

    /// Width of one grid cell
    #[inline]
    pub fn unit_x(&self) -> f32 {
        self.width / self.cols as f32
    }

    /// Height of one grid cell
    #[inline]
    pub fn unit_y(&self) -> f32 {
        self.height / self.rows as f32
    }

    /// Check every field; a session is only ever built from valid settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("wall_thickness", self.wall_thickness)?;
        positive("border_thickness", self.border_thickness)?;
        positive("move_speed", self.move_speed)?;
        in_range("goal_ratio", self.goal_ratio, 0.05, 1.0)?;
        in_range("ball_ratio", self.ball_ratio, 0.05, 0.5)?;
        in_range("restitution", self.restitution, 0.0, 1.0)?;
        if !self.win_gravity.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "win_gravity",
                value: self.win_gravity,
            });
        }

        let unit = self.unit_x().min(self.unit_y());
        if self.wall_thickness >= unit {
            return Err(ConfigError::WallTooThick {
                thickness: self.wall_thickness,
                unit,
            });
        }

        Ok(())
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "maze_ball_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!((settings.rows, settings.cols), (3, 3));
        assert!((settings.unit_x() - 200.0).abs() < 0.001);
        assert!((settings.unit_y() - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_presets() {
        for preset in [SizePreset::Small, SizePreset::Medium, SizePreset::Large] {
            let settings = Settings::from_preset(preset);
            assert_eq!((settings.rows, settings.cols), preset.grid());
            assert!(settings.validate().is_ok());
            assert_eq!(SizePreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(SizePreset::from_str("med"), Some(SizePreset::Medium));
        assert_eq!(SizePreset::from_str("huge"), None);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let settings = Settings {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::EmptyGrid { rows: 0, cols: 3 })
        ));

        let settings = Settings {
            cols: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn test_non_finite_dimensions_rejected() {
        for width in [f32::NAN, f32::INFINITY, 0.0, -10.0] {
            let settings = Settings {
                width,
                ..Default::default()
            };
            assert!(
                matches!(
                    settings.validate(),
                    Err(ConfigError::NotPositive { name: "width", .. })
                ),
                "width {width} should be rejected"
            );
        }
    }

    #[test]
    fn test_ratios_checked() {
        let settings = Settings {
            ball_ratio: 0.75,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutOfRange { name: "ball_ratio", .. })
        ));
    }

    #[test]
    fn test_wall_must_fit_unit() {
        let settings = Settings {
            rows: 100,
            cols: 100,
            width: 300.0,
            height: 300.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::WallTooThick { .. })
        ));
    }

    #[test]
    fn test_json_partial_fields_use_defaults() {
        let settings = Settings::from_json(r#"{ "rows": 10, "cols": 14, "win_effects": true }"#)
            .expect("valid json");
        assert_eq!(settings.rows, 10);
        assert_eq!(settings.cols, 14);
        assert!(settings.win_effects);
        assert_eq!(settings.width, WORLD_WIDTH);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "rows": 0 }"#),
            Err(ConfigError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_win_gravity_must_be_finite() {
        let upward = Settings {
            win_gravity: -300.0,
            ..Default::default()
        };
        assert!(upward.validate().is_ok());

        let settings = Settings {
            win_gravity: f32::INFINITY,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NotFinite { name: "win_gravity", .. }));
        assert!(!err.to_string().contains("greater than zero"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "maze_ball_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            win_effects: true,
            ..Settings::from_preset(SizePreset::Large)
        };
        settings.save_to_path(&path).unwrap();
        let loaded = Settings::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);

        assert!(matches!(
            Settings::load_from_path(&path),
            Err(ConfigError::Io(_))
        ));
    }
}
