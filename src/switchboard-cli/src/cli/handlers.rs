//! Command execution handlers.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use switchboard_console::{Console, WriterSink};
use switchboard_perms::{PermissionStore, Principal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::args::{Cli, Commands, CompleteArgs, ExecArgs, GlobalOptions, LogLevel};
use crate::config::{ConsoleConfig, PrincipalConfig};
use crate::session::{PROMPT, run_session};

/// Effective settings after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub permissions: Option<PathBuf>,
    pub principal: Principal,
    pub log_level: Option<LogLevel>,
}

impl Settings {
    pub fn resolve(options: &GlobalOptions, config: &ConsoleConfig) -> Self {
        let log_level = options.log_level.or_else(|| {
            config
                .log_level
                .as_deref()
                .and_then(LogLevel::from_str_loose)
        });
        let principal = PrincipalConfig {
            uid: options.uid.or(config.principal.uid),
            gid: options.gid.or(config.principal.gid),
        };

        Self {
            permissions: options.permissions.clone().or_else(|| config.permissions.clone()),
            principal: principal.principal(),
            log_level,
        }
    }
}

/// Initialises logging to stderr.
///
/// An explicit level wins; otherwise `RUST_LOG` applies, then `warn`.
pub fn init_logging(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_filter_str()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::default().as_filter_str())),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the console, loading the permissions file if one is configured.
///
/// A permissions file that cannot be loaded is logged and the console
/// starts with the permissive default table.
pub fn build_console(settings: &Settings) -> Console {
    let mut store = PermissionStore::system();
    if let Some(path) = &settings.permissions {
        store = store.with_source(path);
        match store.reload() {
            Ok(()) => info!(path = %path.display(), "permissions loaded"),
            Err(err) => warn!(path = %path.display(), %err, "permissions not loaded"),
        }
    }
    Console::new(Arc::new(store))
}

/// Runs the selected subcommand, or the interactive session.
pub fn dispatch_command(cli: Cli, settings: &Settings) -> Result<ExitCode> {
    let console = build_console(settings);
    match cli.command {
        Some(Commands::Exec(args)) => run_exec(&console, settings.principal, &args),
        Some(Commands::Complete(args)) => run_complete(&console, &args),
        None => run_interactive(&console, settings.principal),
    }
}

fn run_exec(console: &Console, principal: Principal, args: &ExecArgs) -> Result<ExitCode> {
    let line = args.words.join(" ");
    let mut out = WriterSink::stdout();
    let result = console.execute(principal, &mut out, &line);
    Ok(match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

fn run_complete(console: &Console, args: &CompleteArgs) -> Result<ExitCode> {
    let candidates = console.complete_all(&args.line, args.word());
    for candidate in &candidates {
        println!("{candidate}");
    }
    Ok(if candidates.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_interactive(console: &Console, principal: Principal) -> Result<ExitCode> {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal().then_some(PROMPT);
    let executed = run_session(console, principal, stdin.lock(), io::stdout(), prompt)?;
    info!(executed, "session finished");
    Ok(ExitCode::SUCCESS)
}
