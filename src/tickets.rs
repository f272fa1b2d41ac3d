use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+-\d+)").expect("valid ticket regex"));

// Matches both "Merge remote-tracking branch" and "merged remote-tracking branch".
static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:remote-tracking branch) 'origin/(.+?)'").expect("valid branch regex")
});

pub const TABLE_HEADER: &str = "| Jira Ticket | Pull Request |\n|-------------|--------------|";

/// A ticket id and the branch whose merge mentioned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReference {
    pub ticket: String,
    pub branch: String,
}

impl TicketReference {
    pub fn new(ticket: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            ticket: ticket.into(),
            branch: branch.into(),
        }
    }

    /// Parse a `<short-hash> <subject>` merge commit line.
    ///
    /// Returns `None` unless the line carries both a ticket id and an
    /// `origin/<branch>` merge phrase.
    pub fn from_merge_line(line: &str) -> Option<Self> {
        let ticket = TICKET_RE.captures(line)?.get(1)?.as_str();
        let branch = BRANCH_RE.captures(line)?.get(1)?.as_str();
        Some(Self::new(ticket, branch))
    }
}

impl Display for TicketReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.ticket, self.branch)
    }
}

/// Extract ticket/branch pairs in input order, without deduplication
pub fn extract_ticket_branch_pairs<S: AsRef<str>>(lines: &[S]) -> Vec<TicketReference> {
    lines
        .iter()
        .filter_map(|line| TicketReference::from_merge_line(line.as_ref()))
        .collect()
}

/// Placeholder shown in the PR column when no pull request was found
pub fn missing_pr_placeholder(branch: &str) -> String {
    format!("(PR for {} not found)", branch)
}

/// One Markdown table row linking the ticket to the issue tracker
pub fn table_row(ticket: &str, issue_base_url: &str, pr: &str) -> String {
    format!("| [{ticket}]({issue_base_url}{ticket}) | {pr} |")
}

/// Assemble the table from already formatted rows
pub fn table(rows: &[String]) -> String {
    let mut out = TABLE_HEADER.to_string();
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out
}
