//! CLI argument parsing and command dispatch.
//!
//! - `args` - Command-line argument structures
//! - `handlers` - Settings resolution, logging and subcommand execution

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands, CompleteArgs, ExecArgs, GlobalOptions, LogLevel};
pub use handlers::{Settings, build_console, dispatch_command, init_logging};
