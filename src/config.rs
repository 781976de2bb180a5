//! Sanitizer options from a TOML file.
//!
//! ```toml
//! [sanitizer]
//! warnings = "report"          # or "reject" (default)
//! element-paths = "indexed"    # or "shared" (default)
//! max-depth = 32
//! ```
//!
//! Every key is optional; a missing `[sanitizer]` table yields the defaults.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitizer::Options;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sanitizer: Options,
}

impl ConfigFile {
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&src)?;
        tracing::debug!(path = %path.display(), options = ?config.sanitizer, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::{DEFAULT_MAX_DEPTH, WarningPolicy};
    use crate::validate::ElementPaths;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = ConfigFile::from_toml("").unwrap();
        assert_eq!(config.sanitizer, Options::default());
    }

    #[test]
    fn reads_the_sanitizer_table() {
        let config = ConfigFile::from_toml(
            r#"
            [sanitizer]
            warnings = "report"
            element-paths = "indexed"
            max-depth = 32
            "#,
        )
        .unwrap();
        assert_eq!(config.sanitizer.warnings, WarningPolicy::Report);
        assert_eq!(config.sanitizer.element_paths, ElementPaths::Indexed);
        assert_eq!(config.sanitizer.max_depth, 32);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = ConfigFile::from_toml("[sanitizer]\nwarnings = \"report\"\n").unwrap();
        assert_eq!(config.sanitizer.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.sanitizer.element_paths, ElementPaths::Shared);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = ConfigFile::from_toml("[sanitizer]\nwarnings = \"ignore\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = ConfigFile::load("definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.toml"));
    }
}
