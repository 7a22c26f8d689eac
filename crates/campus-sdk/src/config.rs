use std::fs;
use std::path::{Path, PathBuf};

use campus_assistant::AssistantConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Shell configuration, read from a TOML file.
///
/// ```toml
/// data_dir = ".campus"
/// seed_demo = true
///
/// [assistant]
/// model = "gemini-1.5-flash"
/// temperature = 0.7
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusConfig {
    /// Directory holding one JSON file per store key.
    pub data_dir: PathBuf,
    /// Fill never-written collections with the demo catalog.
    pub seed_demo: bool,
    pub assistant: AssistantConfig,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".campus"),
            seed_demo: true,
            assistant: AssistantConfig::default(),
        }
    }
}

impl CampusConfig {
    /// Load from `path`. Missing fields take their defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> SdkResult<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}
