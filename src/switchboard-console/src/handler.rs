//! The interface command implementations provide.

use std::fmt;

use switchboard_perms::Principal;

use crate::command::CommandEntry;
use crate::console::Console;
use crate::output::OutputSink;

/// Result of running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Arguments had the wrong shape; the console prints the usage text.
    ShowUsage,
    /// The command failed; the console prints a generic failure line.
    Failure,
}

/// Metadata a handler reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Pattern text, e.g. `core show uptime [seconds]`.
    pub command: String,
    pub summary: String,
    pub usage: Option<String>,
}

impl Descriptor {
    pub fn new(command: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            summary: summary.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }
}

/// Arguments for [`CommandHandler::run`].
pub struct CommandArgs<'a> {
    pub console: &'a Console,
    pub entry: &'a CommandEntry,
    /// Every typed word, including the ones that matched the pattern.
    pub argv: &'a [String],
    pub principal: Principal,
    pub out: &'a mut dyn OutputSink,
}

impl CommandArgs<'_> {
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    /// Typed word at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.argv.get(index).map(String::as_str)
    }
}

impl fmt::Debug for CommandArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandArgs")
            .field("command", &self.entry.full_text())
            .field("argv", &self.argv)
            .field("principal", &self.principal)
            .field("sink", &self.out.id())
            .finish()
    }
}

/// Arguments for [`CommandHandler::suggest`].
#[derive(Clone, Copy)]
pub struct SuggestArgs<'a> {
    pub console: &'a Console,
    pub entry: &'a CommandEntry,
    /// Typed words joined by single spaces, with a trailing space when the
    /// cursor is on a fresh word.
    pub line: &'a str,
    /// The partial word being completed.
    pub word: &'a str,
    /// Index of the word being completed.
    pub pos: usize,
    /// Requested candidate, counted from zero for this handler.
    pub n: usize,
    pub argv: &'a [String],
}

impl fmt::Debug for SuggestArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestArgs")
            .field("command", &self.entry.full_text())
            .field("line", &self.line)
            .field("word", &self.word)
            .field("pos", &self.pos)
            .field("n", &self.n)
            .finish()
    }
}

/// A console command implementation.
pub trait CommandHandler: Send + Sync {
    /// Pattern and help text, used when registering from the handler alone.
    fn describe(&self) -> Descriptor {
        Descriptor::default()
    }

    /// Returns the `n`-th completion candidate for the word at `pos`.
    fn suggest(&self, _args: &SuggestArgs<'_>) -> Option<String> {
        None
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus;
}

/// Adapts a closure into a [`CommandHandler`] with no completions.
pub struct FnHandler<F>(F);

/// Wraps `f` as a command handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut CommandArgs<'_>) -> CommandStatus + Send + Sync,
{
    FnHandler(f)
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&mut CommandArgs<'_>) -> CommandStatus + Send + Sync,
{
    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        (self.0)(args)
    }
}
