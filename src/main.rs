use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::level_filters::LevelFilter;
use zfuncs::App;
use zfuncs::Config;
use zfuncs::ops::git::RealGit;
use zfuncs::ops::github::RealGithub;
use zfuncs::ops::process::SystemRunner;
use zfuncs::ops::prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "zfuncs")]
#[command(about = "Operator utilities: ticket/PR link tables and macOS update runs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a Markdown table of Jira tickets merged since the branch left its base
    TicketLinks {
        /// Branch to compute the merge-base against (defaults to zfuncs.baseBranch or "develop")
        #[arg(short, long)]
        base: Option<String>,
        /// Fail on git errors instead of treating them as empty results
        #[arg(long)]
        strict: bool,
    },
    /// Check for and apply macOS, App Store and Homebrew updates
    UpdateMac {
        /// Log file, truncated on every run (defaults to ~/updatemac_log.txt)
        #[arg(short, long)]
        log_file: Option<PathBuf>,
        /// Apply pending updates without asking
        #[arg(short, long)]
        yes: bool,
    },
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging()?;

    let cli = Cli::parse();
    let config = Config::load()?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    let app = App::new(
        config.clone(),
        RealGit::new(cwd.clone()),
        RealGithub::new(cwd, config.pr_state.clone()),
        SystemRunner,
    );

    match cli.command {
        Commands::TicketLinks { base, strict } => {
            app.cmd_ticket_links(base.as_deref(), strict, &mut std::io::stdout())
                .await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::UpdateMac { log_file, yes } => {
            let log_file = log_file.unwrap_or(config.update_log);
            let outcome = app
                .cmd_update_mac(
                    &log_file,
                    yes,
                    &TerminalPrompt,
                    &mut std::io::stdout(),
                )
                .await?;
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
