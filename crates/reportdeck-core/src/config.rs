//! Configuration for reportdeck
//!
//! Settings live in a TOML file (`--config PATH`, or `config.toml` under
//! `$REPORTDECK_CONFIG_DIR`, or the platform config directory). A missing
//! implicit file yields defaults; environment variables override the file.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};

pub use types::{
    BundleConfig, DeckConfig, LiveConfig, ReportsConfig, RunControlConfig, DEFAULT_BUNDLE_DIR,
    DEFAULT_LIVE_OUTPUT, DEFAULT_REPORT_DIR,
};

const CONFIG_DIR: &str = "reportdeck";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "REPORTDECK_CONFIG_DIR";

/// Overrides the report corpus root
pub const REPORT_DIR_ENV_VAR: &str = "REPORTDECK_REPORT_DIR";

/// Overrides the run-control endpoint
pub const RUN_CONTROL_URL_ENV_VAR: &str = "REPORTDECK_RUN_CONTROL_URL";

impl DeckConfig {
    /// Implicit config location, if one can be determined
    fn implicit_path() -> Option<PathBuf> {
        if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Some(PathBuf::from(env_dir).join(CONFIG_FILE));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeckError::not_found("config file", path.display())
            } else {
                DeckError::io_at("read config", path, e)
            }
        })?;
        toml::from_str(&content).map_err(|e| DeckError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Resolve the effective configuration: explicit file, implicit file, then env.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::implicit_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through the given lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(REPORT_DIR_ENV_VAR).filter(|s| !s.trim().is_empty()) {
            self.reports.dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(RUN_CONTROL_URL_ENV_VAR).filter(|s| !s.trim().is_empty()) {
            self.run_control.endpoint = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::default();
        assert_eq!(config.reports.dir, PathBuf::from("reports"));
        assert_eq!(config.live.interval_secs, 5);
        assert_eq!(config.bundle.output_dir, PathBuf::from("site"));
        assert!(!config.run_control.is_configured());
        assert_eq!(config.run_control.poll_interval_secs, 2);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[reports]\ndir = \"/srv/reports\"\n\n[run_control]\nendpoint = \"http://localhost:5000\"\n",
        )
        .unwrap();

        let config = DeckConfig::load(&path).unwrap();
        assert_eq!(config.reports.dir, PathBuf::from("/srv/reports"));
        assert_eq!(config.run_control.endpoint, "http://localhost:5000");
        assert_eq!(config.run_control.timeout_secs, 1800);
        assert_eq!(config.live.output, PathBuf::from("dashboard.html"));
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[reports\n").unwrap();

        let err = DeckConfig::load(&path).unwrap_err();
        assert!(matches!(err, DeckError::Config { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = DeckConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_env_overrides() {
        let config = DeckConfig::default().with_env_overrides(|key| match key {
            REPORT_DIR_ENV_VAR => Some("/data/reports".to_string()),
            RUN_CONTROL_URL_ENV_VAR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.reports.dir, PathBuf::from("/data/reports"));
        assert!(config.run_control.endpoint.is_empty());
    }
}
