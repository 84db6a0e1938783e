//! Git test helper utilities
//!
//! Builds small real repositories on disk so the git-backed lister can be
//! exercised end to end with `git ls-remote <path>`.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::process::Command;

/// Git command wrapper for tests
///
/// Runs synchronous git commands inside one repository directory and turns
/// failures into errors carrying git's stderr.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    /// Create a new TestGit instance for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// The repository as a URI `git ls-remote` accepts
    pub fn uri(&self) -> String {
        self.repo_path.display().to_string()
    }

    /// Initialize a repository whose initial branch is `main`
    pub fn init(&self) -> Result<()> {
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        self.set_head("main")
    }

    /// Configure a git user and disable signing for tests
    pub fn config_user(&self) -> Result<()> {
        self.run_git_command(
            &["config", "user.email", "test@vcs-resolver.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(
            &["config", "user.name", "Test User"],
            "Failed to configure git user name",
        )?;
        self.run_git_command(
            &["config", "commit.gpgsign", "false"],
            "Failed to disable commit signing",
        )?;
        self.run_git_command(&["config", "tag.gpgsign", "false"], "Failed to disable tag signing")?;
        Ok(())
    }

    /// Create an empty commit with the given message
    pub fn commit_empty(&self, message: &str) -> Result<()> {
        self.run_git_command(
            &["commit", "--allow-empty", "-m", message],
            "Failed to create git commit",
        )?;
        Ok(())
    }

    /// Create a lightweight tag at HEAD
    pub fn tag(&self, tag_name: &str) -> Result<()> {
        self.run_git_command(&["tag", tag_name], &format!("Failed to create tag: {tag_name}"))?;
        Ok(())
    }

    /// Create an annotated tag at HEAD
    pub fn tag_annotated(&self, tag_name: &str, message: &str) -> Result<()> {
        self.run_git_command(
            &["tag", "-a", tag_name, "-m", message],
            &format!("Failed to create annotated tag: {tag_name}"),
        )?;
        Ok(())
    }

    /// Create and checkout a branch
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(
            &["checkout", "-b", branch_name],
            &format!("Failed to create branch: {branch_name}"),
        )?;
        Ok(())
    }

    /// Checkout a branch or commit
    pub fn checkout(&self, ref_name: &str) -> Result<()> {
        self.run_git_command(&["checkout", ref_name], &format!("Failed to checkout: {ref_name}"))?;
        Ok(())
    }

    /// Get current commit SHA
    pub fn rev_parse_head(&self) -> Result<String> {
        let output =
            self.run_git_command(&["rev-parse", "HEAD"], "Failed to get current commit SHA")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Point HEAD at a branch
    pub fn set_head(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(
            &["symbolic-ref", "HEAD", &format!("refs/heads/{branch_name}")],
            &format!("Failed to set HEAD to branch: {branch_name}"),
        )?;
        Ok(())
    }
}
