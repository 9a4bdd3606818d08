//! Built-in console commands.
//!
//! Registered by [`Console::new`](crate::Console::new):
//!
//! - `core show help [topic]` - list commands or show usage for one
//! - `core show uptime [seconds]` - time since start and last reload
//! - `cli show permissions` - dump the permission table
//! - `cli reload permissions` - re-read `cli_permissions.conf`
//! - `cli check permissions` - evaluate the table for a user or group
//! - `_command matchesarray` - every completion of a line, for clients

mod help;
mod matches;
mod permissions;
mod uptime;

pub use help::{HelpCommand, NO_DESCRIPTION};
pub use matches::{COMPLETE_EOF, MatchesArrayCommand};
pub use permissions::{CheckPermissionsCommand, ReloadPermissionsCommand, ShowPermissionsCommand};
pub use uptime::UptimeCommand;

pub(crate) use help::write_command_list;

use tracing::warn;

use crate::command::CommandSpec;
use crate::registry::CommandRegistry;

/// Specs for every built-in command.
pub fn builtin_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::from_handler(HelpCommand),
        CommandSpec::from_handler(UptimeCommand),
        CommandSpec::from_handler(ShowPermissionsCommand),
        CommandSpec::from_handler(ReloadPermissionsCommand),
        CommandSpec::from_handler(CheckPermissionsCommand),
        CommandSpec::from_handler(MatchesArrayCommand),
    ]
}

pub(crate) fn register_builtins(registry: &CommandRegistry) {
    for result in registry.register_all(builtin_commands()) {
        if let Err(err) = result {
            warn!(error = %err, "failed to register built-in command");
        }
    }
}

/// The part of a normalized completion line after its first `skip` words.
fn words_after(line: &str, skip: usize) -> &str {
    line.splitn(skip + 1, ' ').nth(skip).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_after() {
        assert_eq!(words_after("core show help ", 3), "");
        assert_eq!(words_after("core show help co", 3), "co");
        assert_eq!(words_after("core show help core sh", 3), "core sh");
        assert_eq!(words_after("core show", 3), "");
    }

    #[test]
    fn test_builtins_register_cleanly() {
        let registry = CommandRegistry::new();
        register_builtins(&registry);
        assert_eq!(registry.len(), builtin_commands().len());
    }
}
