/// Viewer configuration loaded from TOML
use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub models: Vec<ModelEntry>,
    pub controls: Controls,
    pub render: RenderSettings,
    pub logging: LoggingSettings,
}

impl ViewerConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

/// A mesh to load at start-up
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub anchor: [f32; 3],
    #[serde(default = "default_division_factor")]
    pub division_factor: f32,
}

impl ModelEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            anchor: [0.0; 3],
            division_factor: default_division_factor(),
        }
    }

    pub fn anchor(&self) -> Point3<f32> {
        Point3::from(self.anchor)
    }
}

fn default_division_factor() -> f32 {
    1.0
}

/// Step sizes for keyboard and mouse navigation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub zoom_in: f32,
    pub zoom_out: f32,
    pub move_step: f32,
    pub mouse_sensitivity: f32,
    /// Fixed point every model is turned around during mouse-look
    pub eye_pivot: [f32; 3],
}

impl Controls {
    pub fn eye_pivot(&self) -> Point3<f32> {
        Point3::from(self.eye_pivot)
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            zoom_in: 1.01,
            zoom_out: 0.99,
            move_step: 0.01,
            mouse_sensitivity: 0.1,
            eye_pivot: [0.0, 0.0, -1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub target_fps: u32,
    pub light_direction: [f32; 3],
}

impl RenderSettings {
    /// Normalized light direction; falls back to looking down +z from the eye.
    pub fn light(&self) -> Vector3<f32> {
        Vector3::from(self.light_direction)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, -1.0))
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            target_fps: 30,
            light_direction: [0.0, 0.0, -1.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter string, e.g. "debug" or "meshview_core=debug"
    pub filter: Option<String>,
    /// Write log lines here instead of stderr
    pub file: Option<PathBuf>,
}
