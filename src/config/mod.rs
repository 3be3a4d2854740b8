use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::state::Perspective;
use crate::layout::LayoutMode;

pub const CONFIG_FILE: &str = "delver.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field} in config: {value}")]
    InvalidValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// CLI defaults, loadable from `delver.toml`. Command-line flags always win
/// over file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    pub api_url: Option<String>,
    pub layout: Option<String>,
    pub perspective: Option<String>,
    #[serde(default)]
    pub hidden_types: Vec<String>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path wins; otherwise pick up `delver.toml` from the working
    /// directory when present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn layout_mode(&self) -> Result<Option<LayoutMode>> {
        self.layout
            .as_deref()
            .map(|raw| {
                LayoutMode::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
                    field: "layout",
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    pub fn perspective(&self) -> Result<Option<Perspective>> {
        self.perspective
            .as_deref()
            .map(|raw| {
                Perspective::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
                    field: "perspective",
                    value: raw.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CliConfig;
    use crate::core::state::Perspective;
    use crate::layout::LayoutMode;

    #[test]
    fn parses_a_full_config() {
        let config: CliConfig = toml::from_str(
            r#"
api_url = "http://localhost:8000/solutions/1/graph"
layout = "tb"
perspective = "architect"
hidden_types = ["SCRIPT", "FILE"]
"#,
        )
        .expect("parse config");

        assert_eq!(
            config.layout_mode().expect("layout"),
            Some(LayoutMode::TopBottom)
        );
        assert_eq!(
            config.perspective().expect("perspective"),
            Some(Perspective::Architect)
        );
        assert_eq!(config.hidden_types, vec!["SCRIPT", "FILE"]);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let config: CliConfig = toml::from_str(r#"layout = "spiral""#).expect("parse config");
        assert!(config.layout_mode().is_err());
    }

    #[test]
    fn empty_config_means_defaults() {
        let config: CliConfig = toml::from_str("").expect("parse config");
        assert_eq!(config.layout_mode().expect("layout"), None);
        assert_eq!(config.perspective().expect("perspective"), None);
        assert!(config.hidden_types.is_empty());
    }
}
