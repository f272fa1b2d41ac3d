use anyhow::Result;
use log::warn;

use crate::config::Config;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::ops::process::CommandRunner;

pub struct App<G: GitOps, H: GithubOps, R: CommandRunner> {
    pub config: Config,
    pub git: G,
    pub gh: H,
    pub runner: R,
}

impl<G: GitOps, H: GithubOps, R: CommandRunner> App<G, H, R> {
    pub fn new(config: Config, git: G, gh: H, runner: R) -> Self {
        Self {
            config,
            git,
            gh,
            runner,
        }
    }
}

/// Shared helper methods for App
impl<G: GitOps, H: GithubOps, R: CommandRunner> App<G, H, R> {
    /// Collapse a failed query to its empty value, or propagate it when
    /// `strict` is set.
    pub(crate) fn or_empty<T: Default>(
        &self,
        what: &str,
        result: Result<T>,
        strict: bool,
    ) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if strict => Err(err.context(format!("Failed to {}", what))),
            Err(err) => {
                warn!("Failed to {}: {:#}", what, err);
                Ok(T::default())
            }
        }
    }
}
