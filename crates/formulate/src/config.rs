//! Configuration loaded from TOML.
//!
//! ```toml
//! [lower]
//! max_depth = 256
//! keep_groups = false
//!
//! [render]
//! power = "function"   # "function" | "caret" | "double-star"
//! max_depth = 256
//! ```

use crate::lower::LowerOptions;
use crate::output::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulateConfig {
    pub lower: LowerOptions,
    pub render: RenderOptions,
}

impl FormulateConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PowerStyle;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            FormulateConfig::from_toml_str("").unwrap(),
            FormulateConfig::default()
        );
    }

    #[test]
    fn test_partial_config() {
        let config = FormulateConfig::from_toml_str(
            r#"
            [render]
            power = "double-star"

            [lower]
            keep_groups = true
            "#,
        )
        .unwrap();
        assert_eq!(config.render.power, PowerStyle::DoubleStar);
        assert_eq!(config.render.max_depth, 256);
        assert!(config.lower.keep_groups);
        assert_eq!(config.lower.max_depth, 256);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            FormulateConfig::from_toml_str("[render]\npower = \"cube\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = FormulateConfig::load(Path::new("/nonexistent/formulate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
