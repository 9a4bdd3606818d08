//! The console: registry, permissions and process state in one place.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use switchboard_perms::PermissionStore;
use tracing::info;

use crate::builtin;
use crate::command::{CommandEntry, CommandId, CommandSpec};
use crate::error::RegistryError;
use crate::output::OutputSink;
use crate::registry::{CommandRegistry, UnloadReport};
use crate::resolver::MatchMode;

/// Command console shared by every session.
///
/// Owns the command table and the shutdown state, and shares the
/// permission store with whoever reloads it.
#[derive(Debug)]
pub struct Console {
    registry: CommandRegistry,
    permissions: Arc<PermissionStore>,
    shutting_down: AtomicBool,
    started_at: Instant,
}

impl Console {
    /// Creates a console with the built-in commands registered.
    pub fn new(permissions: Arc<PermissionStore>) -> Self {
        let console = Self::without_builtins(permissions);
        builtin::register_builtins(&console.registry);
        console
    }

    /// Creates a console with an empty command table.
    pub fn without_builtins(permissions: Arc<PermissionStore>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            permissions,
            shutting_down: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    /// The command table.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    /// Adds a command; see [`CommandRegistry::register`].
    pub fn register(&self, spec: CommandSpec) -> Result<CommandId, RegistryError> {
        self.registry.register(spec)
    }

    /// Removes a command even while it runs.
    pub fn unregister(&self, id: CommandId) -> Result<Arc<CommandEntry>, RegistryError> {
        self.registry.unregister(id)
    }

    /// Removes the commands of an unloading component, keeping running ones.
    pub fn unload_component(&self, name: &str) -> UnloadReport {
        self.registry.unload_owned(name)
    }

    /// Lets `id` run after [`Console::begin_shutdown`].
    pub fn allow_during_shutdown(&self, id: CommandId) -> Result<(), RegistryError> {
        self.registry.set_allowed_during_shutdown(id, true)
    }

    /// From now on only commands allowed during shutdown may run.
    pub fn begin_shutdown(&self) {
        if !self.shutting_down.swap(true, Ordering::AcqRel) {
            info!("console shutting down");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// When the console was created.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time elapsed since [`Console::started_at`].
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Writes the visible commands starting with `filter`, one per line with
    /// their summary. Returns how many were listed.
    pub fn help(&self, out: &mut dyn OutputSink, filter: &str) -> usize {
        builtin::write_command_list(self, out, filter)
    }

    /// Usage text for the command exactly matching `words`.
    ///
    /// Returns `None` if no command matches; a matching command without
    /// usage text yields an empty string.
    pub fn usage<S: AsRef<str>>(&self, words: &[S]) -> Option<String> {
        self.registry
            .find(words, MatchMode::ExactOnly)
            .map(|entry| entry.usage().unwrap_or_default().to_string())
    }
}
