//! Run configuration loaded from TOML

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::PipelineError;

/// Header the access tag column is renamed to in review workbooks
pub const DEFAULT_ACCESS_ROLE_HEADER: &str = "IT-AMS Role\n(please specify using dropdown)";

/// Settings that shape a run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Working directory used when none is given on the command line
    pub default_folder: PathBuf,
    /// Output directory name, created inside the working directory and
    /// cleared at the start of every run
    pub output_dir_name: String,
    /// Regional extracts a complete run is expected to contain
    pub expected_regional_files: usize,
    pub access_role_header: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_folder: PathBuf::from("UVR_Files"),
            output_dir_name: "processed_files".to_string(),
            expected_regional_files: 12,
            access_role_header: DEFAULT_ACCESS_ROLE_HEADER.to_string(),
        }
    }
}

impl RunConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// The output directory must be one plain folder name: it is removed
    /// recursively before each run
    pub fn validate(&self) -> Result<(), PipelineError> {
        if is_plain_dir_name(&self.output_dir_name) {
            Ok(())
        } else {
            Err(PipelineError::InvalidOutputDir {
                name: self.output_dir_name.clone(),
            })
        }
    }

    /// Load from an explicit path, which must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// `--config` path, else the user config file if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using config file: {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Exactly one normal path component (no `.`, `..`, root or separators)
fn is_plain_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// `<config dir>/uvr-cli/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("uvr-cli").join("config.toml"))
}
