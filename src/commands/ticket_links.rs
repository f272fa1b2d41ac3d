use anyhow::Result;
use log::debug;
use log::warn;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::ops::process::CommandRunner;
use crate::tickets;
use crate::tickets::TicketReference;

impl<G: GitOps, H: GithubOps, R: CommandRunner> App<G, H, R> {
    /// Print a Markdown table linking the tickets merged into the current
    /// branch (since it left `base`) to their pull requests.
    pub async fn cmd_ticket_links(
        &self,
        base: Option<&str>,
        strict: bool,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let reference = base.unwrap_or(self.config.base_branch.as_str());

        let branch = self.resolve_current_branch(strict).await?;
        writeln!(stdout, "Current branch: {}", branch)?;

        let merge_base = self.resolve_merge_base(&branch, reference, strict).await?;
        writeln!(stdout, "Merge base with '{}': {}", reference, merge_base)?;

        let lines = self.list_merge_commits(&merge_base, &branch, strict).await?;
        debug!("{} merge commits since {:?}", lines.len(), merge_base);

        let pairs = tickets::extract_ticket_branch_pairs(&lines);
        for pair in &pairs {
            debug!("Found {}", pair);
        }
        if pairs.is_empty() {
            writeln!(stdout, "No Jira tickets or PRs found in the merged commits.")?;
            return Ok(());
        }

        let table = self.render_markdown_table(&pairs).await;
        writeln!(stdout, "Generated Markdown table:")?;
        writeln!(stdout)?;
        writeln!(stdout, "{}", table)?;

        Ok(())
    }

    pub async fn resolve_current_branch(&self, strict: bool) -> Result<String> {
        let result = self.git.current_branch().await;
        self.or_empty("resolve the current branch", result, strict)
    }

    pub async fn resolve_merge_base(
        &self,
        branch: &str,
        reference: &str,
        strict: bool,
    ) -> Result<String> {
        let result = self.git.merge_base(branch, reference).await;
        self.or_empty(
            &format!("find the merge-base of {:?} and {:?}", branch, reference),
            result,
            strict,
        )
    }

    pub async fn list_merge_commits(
        &self,
        merge_base: &str,
        branch: &str,
        strict: bool,
    ) -> Result<Vec<String>> {
        let result = self.git.merge_commits(merge_base, branch).await;
        self.or_empty("list merge commits", result, strict)
    }

    /// PR URL for `branch`, or the "not found" placeholder. Lookup failures
    /// are logged and treated as not found.
    pub async fn resolve_pr_url(&self, branch: &str) -> String {
        match self.gh.pr_url_for_head(branch).await {
            Ok(Some(url)) => url,
            Ok(None) => tickets::missing_pr_placeholder(branch),
            Err(err) => {
                warn!("PR lookup for {} failed: {:#}", branch, err);
                tickets::missing_pr_placeholder(branch)
            }
        }
    }

    /// Rows follow the order of `pairs`; lookups run one after another.
    pub async fn render_markdown_table(&self, pairs: &[TicketReference]) -> String {
        let mut rows = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let pr = self.resolve_pr_url(&pair.branch).await;
            rows.push(tickets::table_row(
                &pair.ticket,
                &self.config.issue_base_url,
                &pr,
            ));
        }
        tickets::table(&rows)
    }
}
