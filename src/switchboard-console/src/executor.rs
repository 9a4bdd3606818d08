//! Command dispatch.

use std::fmt::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};

use switchboard_perms::Principal;
use tracing::{debug, error, info};

use crate::component::OwnerGuard;
use crate::console::Console;
use crate::error::DispatchError;
use crate::handler::{CommandArgs, CommandStatus};
use crate::output::OutputSink;
use crate::resolver::MatchMode;
use crate::tokenizer::tokenize;

/// Printed when a command returns [`CommandStatus::ShowUsage`] without
/// usage text.
pub const NO_USAGE: &str = "Invalid usage, but no usage information available.";

impl Console {
    /// Run one command line for `principal`, writing to `out`.
    ///
    /// Every failure is reported on `out` before the error is returned.
    pub fn execute(
        &self,
        principal: Principal,
        out: &mut dyn OutputSink,
        line: &str,
    ) -> Result<(), DispatchError> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Err(DispatchError::Empty);
        }
        let argv: &[String] = &tokens.words;

        let Some(entry) = self.registry().acquire(argv, MatchMode::AtLeastAsLong) else {
            let suggestion = self.registry().closest(argv);
            let _ = writeln!(
                out,
                "No such command '{line}' (type 'core show help {suggestion}' for other possible commands)"
            );
            debug!(command = line, %suggestion, "no such command");
            return Err(DispatchError::NotFound {
                command: line.to_string(),
                suggestion,
            });
        };

        if !self.permissions().is_allowed(principal, entry.full_text()) {
            let joined = tokens.joined();
            let _ = writeln!(out, "You don't have permissions to run '{joined}' command");
            info!(
                uid = principal.uid,
                gid = principal.gid,
                command = %joined,
                "console command denied"
            );
            return Err(DispatchError::PermissionDenied(joined));
        }

        if self.is_shutting_down() && !entry.allowed_during_shutdown() {
            let _ = writeln!(out, "Command '{line}' cannot be run during shutdown");
            return Err(DispatchError::ShutdownRestricted(line.to_string()));
        }

        let status = match OwnerGuard::enter(entry.owner()) {
            Some(_owner) => panic::catch_unwind(AssertUnwindSafe(|| {
                let mut args = CommandArgs {
                    console: self,
                    entry: &entry,
                    argv,
                    principal,
                    out: &mut *out,
                };
                entry.handler().run(&mut args)
            }))
            .unwrap_or_else(|_| {
                error!(command = entry.full_text(), "command handler panicked");
                CommandStatus::Failure
            }),
            None => CommandStatus::Failure,
        };
        debug!(command = entry.full_text(), ?status, "command finished");

        match status {
            CommandStatus::Success => Ok(()),
            CommandStatus::ShowUsage => {
                let _ = write_usage(out, entry.usage());
                Err(DispatchError::Usage(entry.full_text().to_string()))
            }
            CommandStatus::Failure => {
                let _ = writeln!(out, "Command '{line}' failed.");
                Err(DispatchError::Failed(line.to_string()))
            }
        }
    }

    /// Run each NUL-terminated command in `buffer`, in order.
    ///
    /// Returns how many commands were run. Text after the last NUL is not a
    /// complete command and is ignored.
    pub fn execute_batch(&self, principal: Principal, out: &mut dyn OutputSink, buffer: &str) -> usize {
        let Some((complete, _)) = buffer.rsplit_once('\0') else {
            return 0;
        };
        let mut count = 0;
        for line in complete.split('\0') {
            let _ = self.execute(principal, out, line);
            count += 1;
        }
        count
    }
}

fn write_usage(out: &mut dyn OutputSink, usage: Option<&str>) -> fmt::Result {
    match usage {
        Some(usage) if !usage.is_empty() => {
            out.write_str(usage)?;
            if !usage.ends_with('\n') {
                out.write_char('\n')?;
            }
            Ok(())
        }
        _ => writeln!(out, "{NO_USAGE}"),
    }
}
