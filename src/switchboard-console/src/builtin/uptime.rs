//! `core show uptime`.

use std::fmt::Write as _;
use std::time::Duration;

use crate::handler::{CommandArgs, CommandHandler, CommandStatus, Descriptor};
use crate::helpers::format_duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct UptimeCommand;

impl CommandHandler for UptimeCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("core show uptime [seconds]", "Show uptime information").with_usage(
            "Usage: core show uptime [seconds]\n       \
             Shows the console uptime and the time since the last permissions reload.\n       \
             The seconds word returns the uptime in seconds only.\n",
        )
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        let words = args.entry.word_count();
        let seconds_only = if args.argc() == words
            && args.arg(words - 1).is_some_and(|w| w.eq_ignore_ascii_case("seconds"))
        {
            true
        } else if args.argc() + 1 == words {
            false
        } else {
            return CommandStatus::ShowUsage;
        };

        let print = |elapsed: Duration| {
            if seconds_only {
                elapsed.as_secs().to_string()
            } else {
                format_duration(elapsed.as_secs())
            }
        };

        let _ = writeln!(args.out, "System uptime: {}", print(args.console.uptime()));
        if let Some(reloaded) = args.console.permissions().last_reload() {
            let _ = writeln!(args.out, "Last reload: {}", print(reloaded.elapsed()));
        }
        CommandStatus::Success
    }
}
