#![allow(async_fn_in_trait)]

use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GithubOps trait

/// Pull-request lookups against GitHub
#[cfg_attr(test, automock)]
pub trait GithubOps {
    /// URL of the first pull request whose head branch is `branch`, or `None`
    /// when there is no such pull request.
    async fn pr_url_for_head(&self, branch: &str) -> Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    url: String,
}

// -----------------------------------------------------------------------------
// RealGithub

/// Real implementation that calls the gh CLI
pub struct RealGithub {
    path: path::PathBuf,
    /// Value passed to `gh pr list --state` (open, closed, merged or all)
    state: String,
}

impl RealGithub {
    pub fn new(path: path::PathBuf, state: String) -> Self {
        Self { path, state }
    }
}

impl GithubOps for RealGithub {
    #[instrument(skip(self))]
    async fn pr_url_for_head(&self, branch: &str) -> Result<Option<String>> {
        let output = Command::new("gh")
            .current_dir(&self.path)
            .args([
                "pr", "list", "--head", branch, "--state", &self.state, "--json", "url",
            ])
            .output()
            .await
            .context("Failed to execute gh command")?;

        if !output.status.success() {
            bail!(
                "gh command failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        parse_pr_list(&String::from_utf8(output.stdout)?)
    }
}

/// Pick the first URL out of `gh pr list --json url` output.
fn parse_pr_list(stdout: &str) -> Result<Option<String>> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    let prs: Vec<PullRequest> =
        serde_json::from_str(stdout).context("Unexpected gh pr list output")?;
    Ok(prs
        .into_iter()
        .map(|pr| pr.url)
        .find(|url| !url.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pr_list_takes_first_url() {
        let stdout = r#"[{"url":"https://github.com/acme/web/pull/7"},{"url":"https://github.com/acme/web/pull/9"}]"#;
        assert_eq!(
            parse_pr_list(stdout).unwrap().as_deref(),
            Some("https://github.com/acme/web/pull/7")
        );
    }

    #[test]
    fn test_parse_pr_list_empty() {
        assert_eq!(parse_pr_list("[]\n").unwrap(), None);
        assert_eq!(parse_pr_list("").unwrap(), None);
    }

    #[test]
    fn test_parse_pr_list_rejects_garbage() {
        assert!(parse_pr_list("not json").is_err());
    }
}
