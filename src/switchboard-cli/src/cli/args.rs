//! Command-line argument structures.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CONFIG_FILE;

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Switchboard - operator console
///
/// Without a subcommand, reads command lines from stdin until EOF or `quit`.
#[derive(Debug, Parser)]
#[command(name = "switchboard")]
#[command(author, version, about = "Switchboard operator console", long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Front-end configuration file
    #[arg(long = "config", short = 'c', global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Permissions file (overrides the configuration file)
    #[arg(long = "permissions", short = 'p', global = true)]
    pub permissions: Option<PathBuf>,

    /// User id commands run as
    #[arg(long = "uid", global = true, allow_negative_numbers = true)]
    pub uid: Option<i64>,

    /// Group id commands run as
    #[arg(long = "gid", global = true, allow_negative_numbers = true)]
    pub gid: Option<i64>,

    /// Log level (overrides the configuration file and RUST_LOG)
    #[arg(long = "log-level", short = 'l', global = true, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute one command line and exit
    #[command(visible_alias = "x")]
    Exec(ExecArgs),

    /// Print the completions of a partial command line
    Complete(CompleteArgs),
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Command words, joined with spaces
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CompleteArgs {
    /// The line typed so far
    pub line: String,

    /// The word under the cursor (defaults to the last word of the line)
    pub word: Option<String>,
}

impl CompleteArgs {
    /// The word being completed: as given, or the text after the last space.
    pub fn word(&self) -> &str {
        match &self.word {
            Some(word) => word,
            None => self
                .line
                .rsplit([' ', '\t'])
                .next()
                .unwrap_or_default(),
        }
    }
}
