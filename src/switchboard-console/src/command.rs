//! Registered commands.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use switchboard_perms::INTERNAL_PREFIX;

use crate::component::Component;
use crate::error::RegistryError;
use crate::handler::CommandHandler;
use crate::pattern::RESERVED;

/// Handle returned by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to register a command.
pub struct CommandSpec {
    pattern: String,
    summary: String,
    usage: Option<String>,
    handler: Arc<dyn CommandHandler>,
    owner: Option<Arc<dyn Component>>,
    allowed_during_shutdown: bool,
}

impl CommandSpec {
    /// A command for `pattern` with no help text and no owner.
    pub fn new(pattern: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            pattern: pattern.into(),
            summary: String::new(),
            usage: None,
            handler: Arc::new(handler),
            owner: None,
            allowed_during_shutdown: false,
        }
    }

    /// Takes the pattern and help text from [`CommandHandler::describe`].
    pub fn from_handler(handler: impl CommandHandler + 'static) -> Self {
        let descriptor = handler.describe();
        Self {
            pattern: descriptor.command,
            summary: descriptor.summary,
            usage: descriptor.usage,
            handler: Arc::new(handler),
            owner: None,
            allowed_during_shutdown: false,
        }
    }

    /// One-line description shown by `help`.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Full usage text.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Ties the command to a component for ref-counting and unload.
    pub fn with_owner(mut self, owner: Arc<dyn Component>) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Lets the command run after shutdown has begun.
    pub fn allow_during_shutdown(mut self) -> Self {
        self.allowed_during_shutdown = true;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("pattern", &self.pattern)
            .field("summary", &self.summary)
            .field("owner", &self.owner.as_ref().map(|o| o.name().to_string()))
            .finish_non_exhaustive()
    }
}

/// A command in the registry.
pub struct CommandEntry {
    id: CommandId,
    pattern: Vec<String>,
    full_text: String,
    prefix_len: usize,
    required_words: usize,
    summary: String,
    usage: Option<String>,
    handler: Arc<dyn CommandHandler>,
    owner: Option<Arc<dyn Component>>,
    in_use: AtomicUsize,
    allowed_during_shutdown: AtomicBool,
}

impl CommandEntry {
    pub(crate) fn from_spec(id: CommandId, spec: CommandSpec) -> Result<Self, RegistryError> {
        let pattern: Vec<String> = spec.pattern.split_whitespace().map(str::to_string).collect();
        if pattern.is_empty() {
            return Err(RegistryError::EmptyPattern);
        }

        let full_text = pattern.join(" ");
        let prefix_len = full_text.find(RESERVED).unwrap_or(full_text.len());
        let required_words = pattern.iter().filter(|w| !w.starts_with('[')).count();

        Ok(Self {
            id,
            pattern,
            full_text,
            prefix_len,
            required_words,
            summary: spec.summary,
            usage: spec.usage,
            handler: spec.handler,
            owner: spec.owner,
            in_use: AtomicUsize::new(0),
            allowed_during_shutdown: AtomicBool::new(spec.allowed_during_shutdown),
        })
    }

    /// Registry-assigned id.
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Pattern words in order.
    pub fn pattern(&self) -> &[String] {
        &self.pattern
    }

    /// Pattern words joined by single spaces.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Length of the leading text before the first reserved character.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    pub fn word_count(&self) -> usize {
        self.pattern.len()
    }

    /// Pattern words that are not optional groups.
    pub fn required_word_count(&self) -> usize {
        self.required_words
    }

    /// One-line description, possibly empty.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Name of the owning component, if any.
    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.name())
    }

    /// Hidden from listings and completion.
    pub fn is_internal(&self) -> bool {
        self.full_text.starts_with(INTERNAL_PREFIX)
    }

    /// Dispatches currently running this command.
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Whether the command may run once shutdown has begun.
    pub fn allowed_during_shutdown(&self) -> bool {
        self.allowed_during_shutdown.load(Ordering::Acquire)
    }

    pub(crate) fn set_allowed_during_shutdown(&self, allowed: bool) {
        self.allowed_during_shutdown.store(allowed, Ordering::Release);
    }

    pub(crate) fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    pub(crate) fn owner(&self) -> Option<&Arc<dyn Component>> {
        self.owner.as_ref()
    }

    /// Returns true if a non-optional pattern word remains from `index` on.
    pub(crate) fn has_more_required_after(&self, index: usize) -> bool {
        self.pattern
            .get(index..)
            .is_some_and(|rest| rest.iter().any(|w| !w.starts_with('[')))
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("id", &self.id)
            .field("full_text", &self.full_text)
            .field("summary", &self.summary)
            .field("owner", &self.owner_name())
            .field("in_use", &self.in_use())
            .finish_non_exhaustive()
    }
}

/// Marks a command in use until dropped.
pub struct InUseGuard {
    entry: Arc<CommandEntry>,
}

impl InUseGuard {
    pub(crate) fn new(entry: Arc<CommandEntry>) -> Self {
        entry.in_use.fetch_add(1, Ordering::AcqRel);
        Self { entry }
    }

    pub fn entry(&self) -> &Arc<CommandEntry> {
        &self.entry
    }
}

impl Deref for InUseGuard {
    type Target = CommandEntry;

    fn deref(&self) -> &CommandEntry {
        &self.entry
    }
}

impl Drop for InUseGuard {
    fn drop(&mut self) {
        self.entry.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{CommandStatus, handler_fn};
    use pretty_assertions::assert_eq;

    fn entry(pattern: &str) -> Result<CommandEntry, RegistryError> {
        let spec = CommandSpec::new(pattern, handler_fn(|_| CommandStatus::Success));
        CommandEntry::from_spec(CommandId(1), spec)
    }

    #[test]
    fn test_entry_metadata() {
        let e = entry("  core  show uptime [seconds] ").unwrap();
        assert_eq!(e.pattern(), ["core", "show", "uptime", "[seconds]"]);
        assert_eq!(e.full_text(), "core show uptime [seconds]");
        assert_eq!(e.prefix_len(), "core show uptime ".len());
        assert_eq!(e.word_count(), 4);
        assert_eq!(e.required_word_count(), 3);
        assert!(!e.is_internal());
    }

    #[test]
    fn test_prefix_len_without_reserved() {
        let e = entry("module show").unwrap();
        assert_eq!(e.prefix_len(), e.full_text().len());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(entry("   ").unwrap_err(), RegistryError::EmptyPattern);
    }

    #[test]
    fn test_internal_entry() {
        assert!(entry("_command matchesarray").unwrap().is_internal());
    }

    #[test]
    fn test_more_required_words() {
        let e = entry("sip set debug {on|off} [peer]").unwrap();
        assert!(e.has_more_required_after(3));
        assert!(!e.has_more_required_after(4));
        assert!(!e.has_more_required_after(9));
    }

    #[test]
    fn test_in_use_guard() {
        let e = Arc::new(entry("core show uptime").unwrap());
        {
            let _a = InUseGuard::new(Arc::clone(&e));
            let b = InUseGuard::new(Arc::clone(&e));
            assert_eq!(b.in_use(), 2);
        }
        assert_eq!(e.in_use(), 0);
    }
}
