use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Per-instance settings supplied by the host layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceConfig {
    /// Directory that holds live parameter segments.
    pub channel_dir: PathBuf,
    /// First component of every segment name.
    pub channel_prefix: String,
    /// Create the live channel from `run()` on the first block with a nonzero
    /// channel name instead of only during activation. Touches the file system
    /// on the audio thread.
    pub lazy_channel_setup: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            channel_dir: PathBuf::from("/dev/shm"),
            channel_prefix: "t5".to_string(),
            lazy_channel_setup: false,
        }
    }
}

impl InstanceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilterError::Config(format!("failed to parse instance config: {e}")))
    }
}

/// A named plugin plus control values keyed by port symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preset {
    pub plugin: String,
    #[serde(default)]
    pub controls: HashMap<String, f32>,
    #[serde(default)]
    pub config: InstanceConfig,
}

impl Preset {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilterError::Config(format!("failed to parse preset: {e}")))
    }
}
