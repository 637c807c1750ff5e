use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{WindowError, WindowResult};
use crate::native::{WindowDesc, WindowFlags};
use crate::state::PollRate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_coord")]
    pub x: i32,

    #[serde(default = "default_coord")]
    pub y: i32,

    #[serde(default = "default_width")]
    pub width: i32,

    #[serde(default = "default_height")]
    pub height: i32,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default = "default_true")]
    pub resizable: bool,

    #[serde(default)]
    pub borderless: bool,

    /// Run creation and the pump loop on a dedicated thread.
    #[serde(default)]
    pub threaded: bool,

    #[serde(default)]
    pub limit_poll_rate: bool,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: f32,
}

fn default_title() -> String {
    "NewEngine".to_string()
}
fn default_coord() -> i32 {
    100
}
fn default_width() -> i32 {
    1280
}
fn default_height() -> i32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_poll_interval_ms() -> f32 {
    1000.0 / 120.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            x: default_coord(),
            y: default_coord(),
            width: default_width(),
            height: default_height(),
            visible: default_true(),
            resizable: default_true(),
            borderless: false,
            threaded: false,
            limit_poll_rate: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WindowConfig {
    /// Defaults when `path` does not exist; a present but malformed file is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> WindowResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s)
                .map_err(|e| WindowError::Config(format!("{}: {}", path.display(), e))),
            Err(_) => {
                log::debug!("window: no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(s: &str) -> WindowResult<Self> {
        toml::from_str(s).map_err(|e| WindowError::Config(format!("parse: {}", e)))
    }

    pub fn to_desc(&self) -> WindowDesc {
        let mut flags = WindowFlags::empty();
        flags.set(WindowFlags::SHOWN, self.visible);
        flags.set(WindowFlags::HIDDEN, !self.visible);
        flags.set(WindowFlags::RESIZABLE, self.resizable);
        flags.set(WindowFlags::BORDERLESS, self.borderless);

        WindowDesc {
            title: self.title.clone(),
            position: IVec2::new(self.x, self.y),
            size: IVec2::new(self.width, self.height),
            flags,
        }
    }

    pub(crate) fn poll_rate(&self) -> PollRate {
        PollRate {
            limit: self.limit_poll_rate,
            interval: interval_from_ms(self.poll_interval_ms),
        }
    }
}

/// Negative, NaN and non-finite intervals collapse to zero.
pub(crate) fn interval_from_ms(ms: f32) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f32(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}
