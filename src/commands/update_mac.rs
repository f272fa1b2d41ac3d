use std::io::Write;
use std::path::Path;

use anyhow::Result;
use log::debug;
use log::warn;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::ops::process::CommandRunner;
use crate::ops::process::Invocation;
use crate::ops::prompt::PromptOps;
use crate::run_log::RunLog;
use crate::run_log::Tone;
use crate::updates::UpdateCheckResult;
use crate::updates::UpdateOutcome;
use crate::updates::UpdateSource;

const CONFIRM_PROMPT: &str = "Do you want to proceed with updates? (y/n)";

impl<G: GitOps, H: GithubOps, R: CommandRunner> App<G, H, R> {
    /// Check every update source, ask once, then apply what is pending.
    ///
    /// Only a failed connectivity check stops the run early; any other
    /// failure is logged and the run moves on to the next source.
    pub async fn cmd_update_mac(
        &self,
        log_path: &Path,
        assume_yes: bool,
        prompt: &impl PromptOps,
        stdout: &mut impl Write,
    ) -> Result<UpdateOutcome> {
        let log = RunLog::create(log_path)?;

        if !self.check_connectivity().await {
            log.write(
                Tone::Error,
                "Error: No internet connection. Aborting updates.",
                stdout,
            )?;
            return Ok(UpdateOutcome::Offline);
        }
        log.write(Tone::Info, "Internet connection detected.", stdout)?;

        let checks = self.check_updates(&log, stdout).await?;
        if !checks.any_pending() {
            log.write(Tone::Success, "No updates pending. Exiting.", stdout)?;
            return Ok(UpdateOutcome::NothingPending);
        }

        if !assume_yes && !confirm(prompt, stdout)? {
            log.write(Tone::Error, "Updates aborted by user.", stdout)?;
            return Ok(UpdateOutcome::Declined);
        }

        let mut succeeded = 0;
        let mut failed = 0;
        for source in &checks.pending {
            if self.apply(*source, &log, stdout).await? {
                succeeded += 1;
            } else {
                failed += 1;
            }
        }

        let tone = if failed == 0 {
            Tone::Success
        } else {
            Tone::Warning
        };
        writeln!(stdout)?;
        log.write(
            tone,
            &format!("Updates finished: {} succeeded, {} failed.", succeeded, failed),
            stdout,
        )?;
        log.write(Tone::Info, "To view the log, run the following command:", stdout)?;
        log.write(Tone::Info, &format!("bat {}", log.path().display()), stdout)?;

        Ok(UpdateOutcome::Applied { succeeded, failed })
    }

    /// A single ping; any failure, including a missing `ping`, counts as
    /// offline.
    pub async fn check_connectivity(&self) -> bool {
        let invocation = Invocation::new("ping", &["-c", "1", &self.config.ping_host]);
        match self.runner.run(&invocation).await {
            Ok(output) => output.success(),
            Err(err) => {
                warn!("Connectivity check failed: {:#}", err);
                false
            }
        }
    }

    /// Probe all sources in fixed order
    pub async fn check_updates(
        &self,
        log: &RunLog,
        stdout: &mut impl Write,
    ) -> Result<UpdateCheckResult> {
        let mut result = UpdateCheckResult::default();
        for source in UpdateSource::ALL {
            if self.probe(source, log, stdout).await? {
                result.pending.push(source);
            }
        }
        Ok(result)
    }

    /// Returns whether `source` has pending updates. Errors only come from
    /// writing the log.
    pub async fn probe(
        &self,
        source: UpdateSource,
        log: &RunLog,
        stdout: &mut impl Write,
    ) -> Result<bool> {
        log.section(source.checking_message(), stdout)?;

        let invocation = source.probe_invocation();
        let output = match self.runner.run(&invocation).await {
            Ok(output) => output,
            Err(err) => {
                log.write(
                    Tone::Warning,
                    &format!("Could not run `{}`: {:#}", invocation, err),
                    stdout,
                )?;
                return Ok(false);
            }
        };

        let assessment = source.assess(&output);
        debug!("{} pending: {}", source, assessment.pending);
        for (tone, message) in &assessment.entries {
            log.write(*tone, message, stdout)?;
        }
        Ok(assessment.pending)
    }

    /// Returns whether the update command exited with status zero.
    pub async fn apply(
        &self,
        source: UpdateSource,
        log: &RunLog,
        stdout: &mut impl Write,
    ) -> Result<bool> {
        log.write(Tone::Info, source.applying_message(), stdout)?;

        let invocation = source.apply_invocation();
        let detail = match self.runner.run(&invocation).await {
            Ok(output) if output.success() => {
                log.write(Tone::Success, source.applied_message(), stdout)?;
                return Ok(true);
            }
            Ok(output) => output.stderr.trim().to_string(),
            Err(err) => format!("{:#}", err),
        };

        log.write(Tone::Error, source.failed_message(), stdout)?;
        if !detail.is_empty() {
            log.write(Tone::Plain, &detail, stdout)?;
        }
        Ok(false)
    }
}

/// Only "y" or "yes" (any case) confirm; no answer declines.
fn confirm(prompt: &impl PromptOps, stdout: &mut impl Write) -> Result<bool> {
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(is_confirmation(prompt.ask(CONFIRM_PROMPT).as_deref()))
}

fn is_confirmation(answer: Option<&str>) -> bool {
    answer.is_some_and(|answer| {
        let answer = answer.trim().to_lowercase();
        answer == "y" || answer == "yes"
    })
}
