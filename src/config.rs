//! Settings for the demo composer, read from `mention.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MentionConfig {
    /// Directory the file and folder groups index. Defaults to the cwd.
    pub root: Option<PathBuf>,
    /// Personas TOML file. Built-in personas are used when unset.
    pub personas: Option<PathBuf>,
    /// Documentation registry JSON file. Built-ins are used when unset.
    pub docs: Option<PathBuf>,
    /// How deep the file index walks below the root.
    pub index_depth: usize,
}

impl Default for MentionConfig {
    fn default() -> Self {
        MentionConfig {
            root: None,
            personas: None,
            docs: None,
            index_depth: 6,
        }
    }
}

/// Load `mention.toml` from `dir`; a missing file yields the defaults.
pub fn load(dir: &Path) -> Result<MentionConfig, ConfigError> {
    let path = dir.join("mention.toml");
    if !path.exists() {
        return Ok(MentionConfig::default());
    }
    load_file(&path)
}

/// Load an explicitly named config file.
pub fn load_file(path: &Path) -> Result<MentionConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
