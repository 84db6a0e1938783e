//! Resolver configuration.
//!
//! Configuration is optional: without a file every setting has a default. When
//! present it is read from `~/.vcs-resolver/config.toml` (on Windows,
//! `%LOCALAPPDATA%\vcs-resolver\config.toml`) or from an explicit path.
//!
//! # File Format
//!
//! ```toml
//! [git]
//! command = "/usr/bin/git"
//! timeout_secs = 30          # 0 disables the timeout
//!
//! [git.env]
//! GIT_SSH_COMMAND = "ssh -o BatchMode=yes"
//! ```
//!
//! # Environment Variables
//!
//! `VCS_RESOLVER_GIT_TIMEOUT` overrides `git.timeout_secs` after the file is
//! read.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vcs_resolver::config::ResolverConfig;
//! use vcs_resolver::git::GitLister;
//! use vcs_resolver::resolver::Resolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ResolverConfig::load().await?;
//! let resolver = Resolver::with_lister(GitLister::from_config(&config.git));
//! # Ok(())
//! # }
//! ```

use crate::constants::{GIT_LIST_REMOTE_TIMEOUT, GIT_TIMEOUT_ENV};
use crate::git::command_builder::default_git_command;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How `git ls-remote` is run
    pub git: GitConfig,
}

/// The `[git]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Git executable
    pub command: String,

    /// Listing timeout in seconds; 0 disables it
    pub timeout_secs: u64,

    /// Extra environment variables for git
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            command: default_git_command().to_string(),
            timeout_secs: GIT_LIST_REMOTE_TIMEOUT.as_secs(),
            env: BTreeMap::new(),
        }
    }
}

impl GitConfig {
    /// The configured timeout, or `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl ResolverConfig {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// `VCS_RESOLVER_GIT_TIMEOUT` is not a number.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Loads from `path` if given, otherwise from the default location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default().with_timeout_override(std::env::var(GIT_TIMEOUT_ENV).ok())
        }
    }

    /// Loads the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML, or if
    /// `VCS_RESOLVER_GIT_TIMEOUT` is not a number.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.with_timeout_override(std::env::var(GIT_TIMEOUT_ENV).ok())
    }

    /// Applies a `VCS_RESOLVER_GIT_TIMEOUT` value, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a whole number of seconds.
    pub fn with_timeout_override(mut self, value: Option<String>) -> Result<Self> {
        if let Some(value) = value {
            self.git.timeout_secs = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {GIT_TIMEOUT_ENV} value: {value}"))?;
        }
        Ok(self)
    }

    /// The default configuration file location.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("vcs-resolver")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".vcs-resolver")
        };

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.git.timeout_secs, 60);
        assert_eq!(config.git.timeout(), Some(Duration::from_secs(60)));

        let disabled = GitConfig {
            timeout_secs: 0,
            ..GitConfig::default()
        };
        assert_eq!(disabled.timeout(), None);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: ResolverConfig = toml::from_str(
            r#"
            [git]
            timeout_secs = 5

            [git.env]
            GIT_SSH_COMMAND = "ssh -o BatchMode=yes"
            "#,
        )
        .unwrap();

        assert_eq!(config.git.command, default_git_command());
        assert_eq!(config.git.timeout_secs, 5);
        assert_eq!(config.git.env["GIT_SSH_COMMAND"], "ssh -o BatchMode=yes");
    }

    #[test]
    fn test_timeout_override() {
        let config = ResolverConfig::default().with_timeout_override(Some(" 15 ".to_string())).unwrap();
        assert_eq!(config.git.timeout_secs, 15);

        let config = ResolverConfig::default().with_timeout_override(None).unwrap();
        assert_eq!(config.git.timeout_secs, 60);

        assert!(ResolverConfig::default().with_timeout_override(Some("soon".to_string())).is_err());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[git]\ncommand = \"git-custom\"\n").await.unwrap();

        let config = ResolverConfig::load_from(&path).await.unwrap();
        assert_eq!(config.git.command, "git-custom");
        assert_eq!(config.git.timeout_secs, 60);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            ResolverConfig::load_with_optional(Some(temp.path().join("absent.toml"))).await.unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[git\n").await.unwrap();

        let err = ResolverConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[tokio::test]
    #[serial]
    async fn test_env_timeout_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[git]\ntimeout_secs = 10\n").await.unwrap();

        // SAFETY: serialized with the other tests that read the environment
        unsafe { std::env::set_var(GIT_TIMEOUT_ENV, "3") };
        let result = ResolverConfig::load_from(&path).await;
        unsafe { std::env::remove_var(GIT_TIMEOUT_ENV) };

        assert_eq!(result.unwrap().git.timeout_secs, 3);
    }
}
