use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use colored::ColoredString;
use colored::Colorize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Console colour of a log entry. `Plain` entries are printed uncoloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
    Plain,
}

impl Tone {
    fn paint(self, message: &str) -> ColoredString {
        match self {
            Self::Info => message.blue().bold(),
            Self::Success => message.green().bold(),
            Self::Warning => message.yellow().bold(),
            Self::Error => message.red().bold(),
            Self::Plain => message.normal(),
        }
    }
}

/// The log file of one update run.
///
/// The file is truncated when the run starts and reopened in append mode for
/// every entry, so no handle is held between writes.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Truncate (or create) the file and stamp it with the start time
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::write(&path, format!("Updating log on: {}\n", timestamp()))
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a timestamped entry to the file and echo it to the console
    pub fn write(&self, tone: Tone, message: &str, console: &mut impl Write) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        writeln!(file, "[{}]: {}", timestamp(), message)?;

        writeln!(console, "{}", tone.paint(message))?;
        Ok(())
    }

    /// Like [`RunLog::write`], preceded by a blank console line
    pub fn section(&self, message: &str, console: &mut impl Write) -> Result<()> {
        writeln!(console)?;
        self.write(Tone::Info, message, console)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
