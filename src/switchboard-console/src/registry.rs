//! Command registry for managing registered commands.

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::command::{CommandEntry, CommandId, CommandSpec, InUseGuard};
use crate::error::RegistryError;
use crate::pattern::{cmp_ignore_case, cmp_prefix_ignore_case, starts_with_ignore_case};
use crate::resolver::{MatchMode, closest_match, resolve};

/// Result of removing the commands of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnloadReport {
    /// Commands removed from the registry.
    pub removed: Vec<String>,
    /// Commands kept because a dispatch was running them.
    pub in_use: Vec<String>,
}

impl UnloadReport {
    /// Returns true if every command of the component was removed.
    pub fn is_complete(&self) -> bool {
        self.in_use.is_empty()
    }
}

/// Ordered table of registered commands.
///
/// Entries are kept sorted by the text before their first reserved
/// character, compared case-insensitively, with new entries placed before
/// the first entry that sorts after them. Lookups share a read lock;
/// changes take the write lock. No lock is held while a handler runs.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: RwLock<Vec<Arc<CommandEntry>>>,
    next_id: AtomicU64,
}

impl CommandRegistry {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command.
    ///
    /// Fails if the pattern is empty or if an existing command already
    /// matches the new pattern exactly.
    pub fn register(&self, spec: CommandSpec) -> Result<CommandId, RegistryError> {
        let id = CommandId(self.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        let entry = CommandEntry::from_spec(id, spec)?;

        let mut entries = self.entries.write();
        let existing = entries
            .iter()
            .find(|e| same_pattern(e.pattern(), entry.pattern()))
            .or_else(|| resolve(&entries, entry.pattern(), MatchMode::ExactOnly));
        if let Some(existing) = existing {
            warn!(
                command = entry.full_text(),
                existing = existing.full_text(),
                "command already registered (or something close enough)"
            );
            return Err(RegistryError::Duplicate(entry.full_text().to_string()));
        }

        let index = insertion_index(&entries, &entry);
        debug!(command = entry.full_text(), %id, index, "registered command");
        entries.insert(index, Arc::new(entry));
        Ok(id)
    }

    /// Register several commands, continuing past failures.
    pub fn register_all<I>(&self, specs: I) -> Vec<Result<CommandId, RegistryError>>
    where
        I: IntoIterator<Item = CommandSpec>,
    {
        specs.into_iter().map(|spec| self.register(spec)).collect()
    }

    /// Remove a command regardless of whether it is running.
    pub fn unregister(&self, id: CommandId) -> Result<Arc<CommandEntry>, RegistryError> {
        let mut entries = self.entries.write();
        let index = entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or(RegistryError::NotRegistered(id))?;
        let entry = entries.remove(index);
        if entry.in_use() > 0 {
            warn!(command = entry.full_text(), in_use = entry.in_use(), "removed command that is in use");
        }
        debug!(command = entry.full_text(), %id, "unregistered command");
        Ok(entry)
    }

    /// Remove several commands; returns how many were removed.
    pub fn unregister_all<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = CommandId>,
    {
        ids.into_iter()
            .filter(|id| self.unregister(*id).is_ok())
            .count()
    }

    /// Remove every command owned by the component named `owner`.
    ///
    /// Commands that are currently running are left in place and reported.
    pub fn unload_owned(&self, owner: &str) -> UnloadReport {
        let mut report = UnloadReport::default();
        let mut entries = self.entries.write();
        entries.retain(|entry| {
            if entry.owner_name() != Some(owner) {
                return true;
            }
            if entry.in_use() > 0 {
                warn!(command = entry.full_text(), owner, "can't remove command that is in use");
                report.in_use.push(entry.full_text().to_string());
                return true;
            }
            report.removed.push(entry.full_text().to_string());
            false
        });
        info!(owner, removed = report.removed.len(), kept = report.in_use.len(), "unloaded component commands");
        report
    }

    /// Mark a command as runnable (or not) once shutdown has begun.
    pub fn set_allowed_during_shutdown(
        &self,
        id: CommandId,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        let entry = self.get(id).ok_or(RegistryError::NotRegistered(id))?;
        entry.set_allowed_during_shutdown(allowed);
        Ok(())
    }

    /// Looks up a command by id.
    pub fn get(&self, id: CommandId) -> Option<Arc<CommandEntry>> {
        self.entries.read().iter().find(|e| e.id() == id).cloned()
    }

    /// Resolve `words` against the table.
    pub fn find<S: AsRef<str>>(&self, words: &[S], mode: MatchMode) -> Option<Arc<CommandEntry>> {
        resolve(&self.entries.read(), words, mode).cloned()
    }

    /// Resolve `words` and mark the result in use before the read lock is
    /// released, so a cooperative unload cannot slip in between.
    pub(crate) fn acquire<S: AsRef<str>>(&self, words: &[S], mode: MatchMode) -> Option<InUseGuard> {
        let entries = self.entries.read();
        resolve(&entries, words, mode).map(|entry| InUseGuard::new(Arc::clone(entry)))
    }

    /// Closest command text for a "did you mean" hint.
    pub fn closest<S: AsRef<str>>(&self, words: &[S]) -> String {
        closest_match(&self.entries.read(), words)
    }

    /// Copy of the table in registry order.
    pub fn snapshot(&self) -> Vec<Arc<CommandEntry>> {
        self.entries.read().clone()
    }

    /// Non-internal commands whose text starts with `filter`.
    pub fn list(&self, filter: &str) -> Vec<Arc<CommandEntry>> {
        self.entries
            .read()
            .iter()
            .filter(|e| !e.is_internal() && starts_with_ignore_case(e.full_text(), filter))
            .cloned()
            .collect()
    }

    /// Number of registered commands, internal ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Word-by-word, case-insensitive equality of two patterns.
fn same_pattern(a: &[String], b: &[String]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| cmp_ignore_case(x, y) == Ordering::Equal)
}

fn insertion_index(entries: &[Arc<CommandEntry>], entry: &CommandEntry) -> usize {
    entries
        .iter()
        .position(|cur| {
            let len = entry.prefix_len().min(cur.prefix_len());
            cmp_prefix_ignore_case(entry.full_text(), cur.full_text(), len) == Ordering::Less
        })
        .unwrap_or(entries.len())
}
