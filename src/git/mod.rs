//! Reference listing through the system `git` executable.
//!
//! The resolver only needs the reference advertisement of a remote, which
//! `git ls-remote` prints without cloning anything. Using the installed git
//! means SSH agents, credential helpers, and `~/.gitconfig` rewrites all apply
//! exactly as they do on the command line.
//!
//! # Environment
//!
//! Listings run with:
//! - `LC_ALL=C`, so output and error messages are not localized
//! - `GIT_TERMINAL_PROMPT=0`, so a missing credential fails fast instead of
//!   waiting for input that will never come
//!
//! plus any variables configured in [`GitConfig::env`](crate::config::GitConfig).
//!
//! # Examples
//!
//! ```rust,no_run
//! use vcs_resolver::git::GitLister;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let lister = GitLister::new();
//! for remote in lister.list_remote("https://github.com/example/repo.git").await? {
//!     println!("{} {}", remote.commit, remote.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod command_builder;

use crate::config::GitConfig;
use crate::constants::GIT_LIST_REMOTE_TIMEOUT;
use crate::resolver::{RefLister, RemoteRef};
use anyhow::Result;
use command_builder::{GitCommand, default_git_command};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Lists remote references by running `git ls-remote`.
#[derive(Debug, Clone)]
pub struct GitLister {
    program: String,
    timeout: Option<Duration>,
    env: Vec<(String, String)>,
}

impl Default for GitLister {
    fn default() -> Self {
        Self::new()
    }
}

impl GitLister {
    /// Creates a lister using the platform's git executable and the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: default_git_command().to_string(),
            timeout: Some(GIT_LIST_REMOTE_TIMEOUT),
            env: Vec::new(),
        }
    }

    /// Creates a lister from the `[git]` section of the configuration.
    #[must_use]
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            program: config.command.clone(),
            timeout: config.timeout(),
            env: config.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Overrides the listing timeout; `None` disables it.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The timeout applied to each listing.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs `git ls-remote` against `uri` and parses its output.
    ///
    /// # Errors
    ///
    /// Returns a [`GitError`](crate::core::GitError) (inside `anyhow`) if git is
    /// missing, fails, or times out.
    pub async fn list_remote(&self, uri: &str) -> Result<Vec<RemoteRef>> {
        let display_uri = strip_auth_from_url(uri);
        let mut command = GitCommand::ls_remote(uri)
            .program(&self.program)
            .with_timeout(self.timeout)
            .with_context(format!("Listing {display_uri}"))
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &self.env {
            command = command.env(key, value);
        }

        let stdout = command.execute_stdout().await?;
        let refs = parse_ls_remote(&stdout);
        tracing::debug!(target: "git", "{} advertises {} references", display_uri, refs.len());
        Ok(refs)
    }
}

impl RefLister for GitLister {
    fn list_refs<'a>(
        &'a self,
        uri: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RemoteRef>>> + Send + 'a>> {
        Box::pin(self.list_remote(uri))
    }
}

/// Parses `git ls-remote` output into `(commit, name)` pairs.
///
/// Each line is `<commit><TAB><ref name>`. Lines that do not split into exactly
/// two whitespace-separated fields are skipped.
#[must_use]
pub fn parse_ls_remote(output: &str) -> Vec<RemoteRef> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(commit), Some(name), None) => Some(RemoteRef::new(commit, name)),
                _ => None,
            }
        })
        .collect()
}

/// Removes credentials from an HTTP(S) URL for logging.
///
/// `https://token@github.com/org/repo.git` becomes `https://github.com/org/repo.git`.
/// Other URLs, including scp-style `git@host:path`, are returned unchanged.
#[must_use]
pub fn strip_auth_from_url(url: &str) -> String {
    let Some(scheme_end) = ["https://", "http://"]
        .iter()
        .find(|scheme| url.starts_with(*scheme))
        .map(|scheme| scheme.len())
    else {
        return url.to_string();
    };

    let rest = &url[scheme_end..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}{}", &url[..scheme_end], &rest[at + 1..]),
        None => url.to_string(),
    }
}
