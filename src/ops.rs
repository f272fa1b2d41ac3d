//! Operations modules for interacting with external tools.
//!
//! - [`git`]: history queries (current branch, merge-base, merge commits)
//! - [`github`]: pull-request lookup via the GitHub CLI
//! - [`process`]: generic "run a command, capture its output" seam used by the
//!   update run
//! - [`prompt`]: the yes/no question asked before applying updates
//!
//! Each submodule provides a trait with a real implementation and a mockall
//! mock for tests.

pub mod git;
pub mod github;
pub mod process;
pub mod prompt;
