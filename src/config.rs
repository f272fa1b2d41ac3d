use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use log::warn;

pub const DEFAULT_BASE_BRANCH: &str = "develop";
pub const DEFAULT_ISSUE_BASE_URL: &str = "https://perfectsense.atlassian.net/browse/";
pub const DEFAULT_PR_STATE: &str = "open";
pub const DEFAULT_PING_HOST: &str = "8.8.8.8";
pub const DEFAULT_LOG_FILE_NAME: &str = "updatemac_log.txt";

#[derive(Debug, Clone)]
pub struct Config {
    /// Branch the current branch is compared against for merge-base.
    pub base_branch: String,
    /// Ticket ids are appended to this to form the issue link.
    pub issue_base_url: String,
    /// `gh pr list --state` filter.
    pub pr_state: String,
    pub ping_host: String,
    pub update_log: PathBuf,
}

impl Config {
    /// Load config from git config (`zfuncs.*` keys), falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_with("git")
    }

    /// A `git` that cannot be spawned is treated like a config with no keys
    /// set, so commands that never touch git still run without it.
    fn load_with(git: &str) -> Result<Self> {
        let mut values = Vec::new();
        for key in [
            "zfuncs.baseBranch",
            "zfuncs.issueBaseUrl",
            "zfuncs.prState",
            "zfuncs.pingHost",
            "zfuncs.updateLog",
        ] {
            let output = match std::process::Command::new(git)
                .args(["config", "--get", key])
                .output()
            {
                Ok(output) => output,
                Err(err) => {
                    warn!("Could not read git config, using defaults: {}", err);
                    break;
                }
            };

            // Exit code 1 means the key is not set
            if output.status.success() {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                values.push((key, value));
            }
        }

        Self::from_lookup(|key| {
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
    }

    /// Build a config from a key lookup, using defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let update_log = match lookup("zfuncs.updateLog").filter(|value| !value.is_empty()) {
            Some(path) => expand_home(&path)?,
            None => Self::default_update_log()?,
        };

        Ok(Self {
            base_branch: get("zfuncs.baseBranch", DEFAULT_BASE_BRANCH),
            issue_base_url: get("zfuncs.issueBaseUrl", DEFAULT_ISSUE_BASE_URL),
            pr_state: get("zfuncs.prState", DEFAULT_PR_STATE),
            ping_host: get("zfuncs.pingHost", DEFAULT_PING_HOST),
            update_log,
        })
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            issue_base_url: DEFAULT_ISSUE_BASE_URL.to_string(),
            pr_state: DEFAULT_PR_STATE.to_string(),
            ping_host: DEFAULT_PING_HOST.to_string(),
            update_log: PathBuf::from(DEFAULT_LOG_FILE_NAME),
        }
    }

    /// `~/updatemac_log.txt`
    pub fn default_update_log() -> Result<PathBuf> {
        let home = home::home_dir().context("Could not determine home directory")?;
        Ok(home.join(DEFAULT_LOG_FILE_NAME))
    }
}

fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = home::home_dir().context("Could not determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_tests() {
        let config = Config::default_for_tests();
        assert_eq!(config.base_branch, "develop");
        assert_eq!(config.pr_state, "open");
    }

    #[test]
    fn test_from_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_branch, DEFAULT_BASE_BRANCH);
        assert_eq!(config.issue_base_url, DEFAULT_ISSUE_BASE_URL);
        assert_eq!(config.ping_host, DEFAULT_PING_HOST);
        assert!(config.update_log.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(|key| match key {
            "zfuncs.baseBranch" => Some("main".to_string()),
            "zfuncs.issueBaseUrl" => Some("https://jira.example.com/browse/".to_string()),
            "zfuncs.prState" => Some("all".to_string()),
            "zfuncs.updateLog" => Some("/tmp/updates.log".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_branch, "main");
        assert_eq!(config.issue_base_url, "https://jira.example.com/browse/");
        assert_eq!(config.pr_state, "all");
        assert_eq!(config.ping_host, DEFAULT_PING_HOST);
        assert_eq!(config.update_log, PathBuf::from("/tmp/updates.log"));
    }

    #[test]
    fn test_missing_git_falls_back_to_defaults() {
        let config = Config::load_with("zfuncs-no-such-git").unwrap();
        assert_eq!(config.base_branch, DEFAULT_BASE_BRANCH);
        assert_eq!(config.pr_state, DEFAULT_PR_STATE);
        assert_eq!(config.ping_host, DEFAULT_PING_HOST);
        assert!(config.update_log.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let config = Config::from_lookup(|key| match key {
            "zfuncs.baseBranch" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_branch, DEFAULT_BASE_BRANCH);
    }
}
