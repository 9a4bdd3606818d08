//! `core show help`.

use std::fmt::Write as _;

use crate::console::Console;
use crate::handler::{CommandArgs, CommandHandler, CommandStatus, Descriptor, SuggestArgs};
use crate::output::OutputSink;
use crate::resolver::MatchMode;

use super::words_after;

/// Shown in listings for commands registered without a summary.
pub const NO_DESCRIPTION: &str = "<no description available>";

/// Lists commands, or prints the usage of one.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("core show help", "Display help list, or specific help on a command")
            .with_usage(
                "Usage: core show help [topic]\n       \
                 When called with a topic as an argument, displays usage\n       \
                 information on the given command. If called without a\n       \
                 topic, it provides a list of commands.\n",
            )
    }

    fn suggest(&self, args: &SuggestArgs<'_>) -> Option<String> {
        let rest = words_after(args.line, args.entry.word_count());
        args.console.complete(rest, args.word, args.n)
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        let topic = args.argv.get(args.entry.word_count()..).unwrap_or_default();
        if topic.is_empty() {
            write_command_list(args.console, args.out, "");
            return CommandStatus::Success;
        }

        let joined = topic.join(" ");
        match args.console.registry().find(topic, MatchMode::ExactOnly) {
            Some(entry) => {
                let _ = match entry.usage() {
                    Some(usage) if usage.ends_with('\n') => write!(args.out, "{usage}"),
                    Some(usage) => writeln!(args.out, "{usage}"),
                    None => writeln!(args.out, "No help text available for '{joined}'."),
                };
            }
            None => {
                write_command_list(args.console, args.out, &joined);
            }
        }
        CommandStatus::Success
    }
}

/// Writes one line per visible command starting with `filter`; returns the
/// number of commands listed.
pub(crate) fn write_command_list(console: &Console, out: &mut dyn OutputSink, filter: &str) -> usize {
    let entries = console.registry().list(filter);
    for entry in &entries {
        let summary = match entry.summary() {
            "" => NO_DESCRIPTION,
            summary => summary,
        };
        let _ = writeln!(out, "{:<30} -- {}", entry.full_text(), summary);
    }
    if entries.is_empty() && !filter.is_empty() {
        let _ = writeln!(out, "No such command '{filter}'.");
    }
    entries.len()
}
