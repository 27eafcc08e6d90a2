use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaiterConfig {
    /// Broadcast buffer for the event bus; 0 is treated as 1.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    #[serde(default)]
    pub menu: MenuDefaults,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: default_event_buffer_size(),
            menu: MenuDefaults::default(),
        }
    }
}

/// Defaults applied to menus built from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuDefaults {
    #[serde(default = "default_menu_timeout", with = "duration_ms")]
    pub timeout: Duration,

    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    #[serde(default)]
    pub bulk_skip: usize,

    #[serde(default)]
    pub wrap_page_ends: bool,
}

impl Default for MenuDefaults {
    fn default() -> Self {
        Self {
            timeout: default_menu_timeout(),
            items_per_page: default_items_per_page(),
            bulk_skip: 0,
            wrap_page_ends: false,
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let file = File::open(path.as_ref()).map_err(|e| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        message: e.to_string(),
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> ConfigResult<T> {
    let config = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(config)
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to open config file {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_event_buffer_size() -> usize {
    1000
}
fn default_menu_timeout() -> Duration {
    Duration::from_secs(60)
}
fn default_items_per_page() -> usize {
    10
}

pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
