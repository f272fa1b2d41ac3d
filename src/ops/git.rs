#![allow(async_fn_in_trait)]

use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GitOps trait

/// Read-only history queries against a Git repository.
///
/// `Err` means git could not answer; an empty value means it answered with
/// nothing.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Symbolic name of the checked-out branch (`HEAD` when detached).
    async fn current_branch(&self) -> Result<String>;

    /// Commit at which `branch` diverged from `reference`.
    async fn merge_base(&self, branch: &str, reference: &str) -> Result<String>;

    /// One `<short-hash> <subject>` line per merge commit in
    /// `merge_base..branch`, newest first.
    async fn merge_commits(&self, merge_base: &str, branch: &str) -> Result<Vec<String>>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: path::PathBuf,
}

impl RealGit {
    pub fn new(path: path::PathBuf) -> Self {
        Self { path }
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

impl GitOps for RealGit {
    #[instrument(skip_all)]
    async fn current_branch(&self) -> Result<String> {
        let stdout = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(stdout.trim().to_string())
    }

    #[instrument(skip(self))]
    async fn merge_base(&self, branch: &str, reference: &str) -> Result<String> {
        let stdout = self.git(&["merge-base", branch, reference]).await?;
        Ok(stdout.trim().to_string())
    }

    #[instrument(skip(self))]
    async fn merge_commits(&self, merge_base: &str, branch: &str) -> Result<Vec<String>> {
        let range = format!("{}..{}", merge_base, branch);
        let stdout = self
            .git(&["log", "--merges", "--pretty=format:%h %s", &range])
            .await?;

        Ok(stdout
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}
