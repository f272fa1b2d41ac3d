//! Subcommand entry points, implemented as `App` methods.
//!
//! - [`ticket_links`]: Markdown table of merged Jira tickets and their PRs
//! - [`update_mac`]: check and apply macOS, App Store and Homebrew updates

pub mod ticket_links;
pub mod update_mac;
