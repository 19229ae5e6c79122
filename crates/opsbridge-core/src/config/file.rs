//! File-based configuration provider (YAML)
//!
//! Reads the user-level file (~/.config/opsbridge/config.yaml) or a path given
//! with `--config`.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::error::{ConfigError, ConfigResult};
use super::settings::Settings;

/// File-based configuration provider
///
/// A missing file is not an error: it yields default settings.
///
/// # Example
///
/// ```no_run
/// use opsbridge_core::config::FileConfigProvider;
///
/// let settings = FileConfigProvider::user().settings()?.with_env_overrides()?;
/// # Ok::<(), opsbridge_core::config::ConfigError>(())
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    cache: RwLock<Option<Settings>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// User-level config (~/.config/opsbridge/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("opsbridge").join("config.yaml"))
    }

    /// A path given explicitly (e.g. `--config`)
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Cached settings, loading from disk on first use
    pub fn settings(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }

        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolExecution;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"));

        assert!(!provider.exists());
        assert_eq!(provider.settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_explicit_file_is_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "gateway:\n  url: https://gw.example/mcp\norchestration:\n  tool_execution: concurrent\n",
        )
        .unwrap();

        let settings = FileConfigProvider::explicit(&path).settings().unwrap();
        assert_eq!(settings.gateway.url, "https://gw.example/mcp");
        assert_eq!(settings.orchestration.tool_execution, ToolExecution::Concurrent);
        assert_eq!(settings.orchestration.max_tool_rounds, 10);
    }

    #[test]
    fn test_settings_are_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let provider = FileConfigProvider::explicit(&path);

        assert_eq!(provider.settings().unwrap().orchestration.max_tool_rounds, 10);
        fs::write(&path, "orchestration:\n  max_tool_rounds: 4\n").unwrap();
        assert_eq!(provider.settings().unwrap().orchestration.max_tool_rounds, 10);
        assert_eq!(FileConfigProvider::explicit(&path).settings().unwrap().orchestration.max_tool_rounds, 4);
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "gateway: [not, a, map").unwrap();

        let err = FileConfigProvider::explicit(&path).settings().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
