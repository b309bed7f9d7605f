use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::canvas::MIN_BRUSH_SIZE;
use crate::capture::{DEFAULT_HIDE_GRACE, DEFAULT_MAX_DELAY_SECS, MAX_CONFIGURABLE_DELAY_SECS};
use crate::editor::StrokeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "slimshot";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) max_capture_delay_secs: f32,
    pub(crate) hide_grace_ms: u64,
    pub(crate) interpolate_strokes: bool,
    pub(crate) default_brush_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_capture_delay_secs: DEFAULT_MAX_DELAY_SECS,
            hide_grace_ms: DEFAULT_HIDE_GRACE.as_millis() as u64,
            interpolate_strokes: false,
            default_brush_size: MIN_BRUSH_SIZE,
        }
    }
}

impl AppConfig {
    pub(crate) fn max_capture_delay_secs(&self) -> f32 {
        if (0.0..=MAX_CONFIGURABLE_DELAY_SECS).contains(&self.max_capture_delay_secs) {
            self.max_capture_delay_secs
        } else {
            DEFAULT_MAX_DELAY_SECS
        }
    }

    pub(crate) fn hide_grace(&self) -> Duration {
        Duration::from_millis(self.hide_grace_ms)
    }

    pub(crate) fn stroke_mode(&self) -> StrokeMode {
        if self.interpolate_strokes {
            StrokeMode::Interpolated
        } else {
            StrokeMode::Dots
        }
    }

    pub(crate) fn default_brush_size(&self) -> f32 {
        if self.default_brush_size.is_finite() {
            self.default_brush_size.clamp(MIN_BRUSH_SIZE, 1.0)
        } else {
            MIN_BRUSH_SIZE
        }
    }
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
