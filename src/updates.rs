use std::fmt::Display;

use crate::ops::process::CommandOutput;
use crate::ops::process::Invocation;
use crate::run_log::Tone;

/// A place software updates come from, in the order they are checked and
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    MacOs,
    AppStore,
    Homebrew,
    OutdatedPackages,
}

/// What a probe's output says about one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub pending: bool,
    /// Log entries describing the outcome, in order.
    pub entries: Vec<(Tone, String)>,
}

/// Sources with pending updates, in [`UpdateSource::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCheckResult {
    pub pending: Vec<UpdateSource>,
}

/// How an update run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The connectivity check failed; nothing was probed.
    Offline,
    NothingPending,
    Declined,
    Applied { succeeded: usize, failed: usize },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Offline => false,
            Self::Applied { failed, .. } => *failed == 0,
            Self::NothingPending | Self::Declined => true,
        }
    }
}

impl UpdateCheckResult {
    pub fn any_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl UpdateSource {
    pub const ALL: [UpdateSource; 4] = [
        UpdateSource::MacOs,
        UpdateSource::AppStore,
        UpdateSource::Homebrew,
        UpdateSource::OutdatedPackages,
    ];

    /// Read-only command whose output tells whether updates are pending
    pub fn probe_invocation(self) -> Invocation {
        match self {
            Self::MacOs => Invocation::new("softwareupdate", &["-l"]),
            Self::AppStore => Invocation::new("mas", &["outdated"]),
            Self::Homebrew => Invocation::new("brew", &["update", "--auto-update"]),
            Self::OutdatedPackages => Invocation::new("brew", &["outdated", "--verbose"]),
        }
    }

    pub fn apply_invocation(self) -> Invocation {
        match self {
            Self::MacOs => Invocation::new("softwareupdate", &["-ia"]),
            Self::AppStore => Invocation::new("mas", &["upgrade"]),
            Self::Homebrew => Invocation::new("brew", &["update"]),
            Self::OutdatedPackages => Invocation::new("brew", &["upgrade"]),
        }
    }

    pub fn checking_message(self) -> &'static str {
        match self {
            Self::MacOs => "Checking for macOS updates...",
            Self::AppStore => "Checking for App Store updates...",
            Self::Homebrew => "Checking for Homebrew updates...",
            Self::OutdatedPackages => "Checking for outdated casks and packages...",
        }
    }

    pub fn applying_message(self) -> &'static str {
        match self {
            Self::MacOs => "Updating macOS...",
            Self::AppStore => "Updating App Store apps...",
            Self::Homebrew => "Updating Homebrew...",
            Self::OutdatedPackages => "Upgrading outdated casks and packages...",
        }
    }

    pub fn applied_message(self) -> &'static str {
        match self {
            Self::MacOs => "macOS update complete.",
            Self::AppStore => "App Store update complete.",
            Self::Homebrew => "Homebrew update complete.",
            Self::OutdatedPackages => "Cask and package upgrade complete.",
        }
    }

    pub fn failed_message(self) -> &'static str {
        match self {
            Self::MacOs => "macOS update failed.",
            Self::AppStore => "App Store update failed.",
            Self::Homebrew => "Homebrew update failed.",
            Self::OutdatedPackages => "Cask and package upgrade failed.",
        }
    }

    /// Interpret probe output. Only the captured text matters, never the exit
    /// code.
    pub fn assess(self, output: &CommandOutput) -> Assessment {
        let stdout = output.stdout.trim_end();
        match self {
            Self::MacOs => {
                // softwareupdate prints the "nothing to do" notice on stderr
                let up_to_date = [&output.stdout, &output.stderr]
                    .iter()
                    .any(|text| text.contains("No new software available"));
                if up_to_date {
                    Assessment::up_to_date("macOS is up to date.")
                } else {
                    Assessment::pending(vec![(Tone::Warning, "macOS update is available.")])
                }
            }
            Self::AppStore => {
                // Outdated apps are listed as "<app id> <name> (<old> -> <new>)"
                let outdated = stdout
                    .lines()
                    .any(|line| line.trim_start().starts_with(|c: char| c.is_ascii_digit()));
                if outdated {
                    Assessment::pending(vec![(Tone::Warning, "App Store updates are available.")])
                } else {
                    Assessment::up_to_date("App Store apps are up to date.")
                }
            }
            Self::Homebrew => {
                let up_to_date = stdout.contains("Auto-updated Homebrew")
                    || stdout.contains("Already up-to-date");
                // Both outcomes are reported as warnings
                let mut assessment = if up_to_date {
                    Assessment {
                        pending: false,
                        entries: vec![(Tone::Warning, "Homebrew is updated.".to_string())],
                    }
                } else {
                    Assessment::pending(vec![(Tone::Warning, "Homebrew updates are available.")])
                };
                if !stdout.is_empty() {
                    assessment.entries.insert(0, (Tone::Plain, stdout.to_string()));
                }
                assessment
            }
            Self::OutdatedPackages => {
                if stdout.trim().is_empty() {
                    Assessment::up_to_date("No outdated casks or packages found.")
                } else {
                    Assessment::pending(vec![
                        (Tone::Warning, "Outdated casks and packages found:"),
                        (Tone::Plain, stdout),
                    ])
                }
            }
        }
    }
}

impl Display for UpdateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacOs => f.write_str("macOS"),
            Self::AppStore => f.write_str("App Store"),
            Self::Homebrew => f.write_str("Homebrew"),
            Self::OutdatedPackages => f.write_str("outdated casks and packages"),
        }
    }
}

impl Assessment {
    fn up_to_date(message: &str) -> Self {
        Self {
            pending: false,
            entries: vec![(Tone::Success, message.to_string())],
        }
    }

    fn pending(entries: Vec<(Tone, &str)>) -> Self {
        Self {
            pending: true,
            entries: entries
                .into_iter()
                .map(|(tone, message)| (tone, message.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stdout(text: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(0),
            stdout: text.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_fixed_order() {
        assert_eq!(
            UpdateSource::ALL,
            [
                UpdateSource::MacOs,
                UpdateSource::AppStore,
                UpdateSource::Homebrew,
                UpdateSource::OutdatedPackages,
            ]
        );
    }

    #[test]
    fn test_macos_up_to_date_on_stderr() {
        let output = CommandOutput {
            exit_code: Some(0),
            stdout: "Software Update Tool\n\nFinding available software\n".to_string(),
            stderr: "No new software available.\n".to_string(),
        };
        assert!(!UpdateSource::MacOs.assess(&output).pending);
    }

    #[test]
    fn test_macos_pending() {
        let output = stdout(
            "Software Update Tool\n\nFinding available software\nSoftware Update found the following new or updated software:\n* Label: macOS Sonoma 14.6.1-23G93\n",
        );
        let assessment = UpdateSource::MacOs.assess(&output);
        assert!(assessment.pending);
        assert_eq!(
            assessment.entries,
            vec![(Tone::Warning, "macOS update is available.".to_string())]
        );
    }

    #[test]
    fn test_macos_ignores_exit_code() {
        let output = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "No new software available.\n".to_string(),
        };
        assert!(!UpdateSource::MacOs.assess(&output).pending);
    }

    #[test]
    fn test_app_store_pending_when_line_starts_with_app_id() {
        let output = stdout("497799835 Xcode (15.4 -> 16.0)\n");
        assert!(UpdateSource::AppStore.assess(&output).pending);
    }

    #[test]
    fn test_app_store_up_to_date() {
        let output = stdout("");
        let assessment = UpdateSource::AppStore.assess(&output);
        assert!(!assessment.pending);
        assert_eq!(
            assessment.entries,
            vec![(Tone::Success, "App Store apps are up to date.".to_string())]
        );
    }

    #[test]
    fn test_app_store_warning_lines_are_not_updates() {
        let output = stdout("Warning: mas is not signed in\n");
        assert!(!UpdateSource::AppStore.assess(&output).pending);
    }

    #[test]
    fn test_homebrew_auto_updated() {
        let output = stdout("==> Auto-updated Homebrew!\nUpdated 2 taps.\n");
        let assessment = UpdateSource::Homebrew.assess(&output);
        assert!(!assessment.pending);
        assert_eq!(
            assessment.entries,
            vec![
                (
                    Tone::Plain,
                    "==> Auto-updated Homebrew!\nUpdated 2 taps.".to_string()
                ),
                (Tone::Warning, "Homebrew is updated.".to_string()),
            ]
        );
    }

    #[test]
    fn test_homebrew_already_up_to_date() {
        let output = stdout("Already up-to-date.\n");
        assert!(!UpdateSource::Homebrew.assess(&output).pending);
    }

    #[test]
    fn test_homebrew_pending_without_output() {
        let assessment = UpdateSource::Homebrew.assess(&stdout(""));
        assert!(assessment.pending);
        assert_eq!(
            assessment.entries,
            vec![(Tone::Warning, "Homebrew updates are available.".to_string())]
        );
    }

    #[test]
    fn test_outdated_packages_listed() {
        let output = stdout("git (2.45.0) < 2.46.0\nfirefox (128.0) != 129.0\n");
        let assessment = UpdateSource::OutdatedPackages.assess(&output);
        assert!(assessment.pending);
        assert_eq!(
            assessment.entries,
            vec![
                (Tone::Warning, "Outdated casks and packages found:".to_string()),
                (
                    Tone::Plain,
                    "git (2.45.0) < 2.46.0\nfirefox (128.0) != 129.0".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_outdated_packages_blank_output() {
        assert!(!UpdateSource::OutdatedPackages.assess(&stdout("\n")).pending);
    }

    #[test]
    fn test_invocations() {
        assert_eq!(
            UpdateSource::Homebrew.probe_invocation().to_string(),
            "brew update --auto-update"
        );
        assert_eq!(
            UpdateSource::OutdatedPackages.apply_invocation().to_string(),
            "brew upgrade"
        );
        assert_eq!(
            UpdateSource::MacOs.apply_invocation().to_string(),
            "softwareupdate -ia"
        );
    }
}
