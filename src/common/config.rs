//! Configuration file handling

use serde::Deserialize;

use super::paths::config_path;
use super::Result;
use crate::breakpoint::DEFAULT_CREATOR;
use crate::xml::DEFAULT_INDENT;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Creator signature settings
    #[serde(default)]
    pub creator: CreatorConfig,

    /// Output formatting settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Signature stamped on the breakpoints this tool creates
#[derive(Debug, Deserialize)]
pub struct CreatorConfig {
    /// Written to the `creator` attribute, and dropped by `regenerate` on load
    #[serde(default = "default_signature")]
    pub signature: String,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            signature: default_signature(),
        }
    }
}

fn default_signature() -> String {
    DEFAULT_CREATOR.to_string()
}

/// Output formatting configuration
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Spaces per indentation level when writing the file
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return Self::from_toml(&content);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        if config.creator.signature.is_empty() {
            return Err(super::Error::Config(
                "creator.signature must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
