//! `_command matchesarray`, used by remote consoles to fetch completions.

use std::fmt::Write as _;

use crate::handler::{CommandArgs, CommandHandler, CommandStatus, Descriptor};

/// Terminates the candidate list.
pub const COMPLETE_EOF: &str = "_EOF_";

#[derive(Debug, Default, Clone, Copy)]
pub struct MatchesArrayCommand;

impl CommandHandler for MatchesArrayCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("_command matchesarray", "Returns command matches array").with_usage(
            "Usage: _command matchesarray \"<line>\" text \n       \
             This function is used internally to help with command completion and should\n       \
             never be called by the user directly.\n",
        )
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        let (Some(line), Some(word), 4) = (args.arg(2), args.arg(3), args.argc()) else {
            return CommandStatus::ShowUsage;
        };

        let mut buf = String::new();
        for candidate in args.console.complete_all(line, word) {
            buf.push_str(&candidate);
            buf.push(' ');
        }
        let _ = write!(args.out, "{buf}{COMPLETE_EOF}");
        CommandStatus::Success
    }
}
