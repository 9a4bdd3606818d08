//! Reloadable permission table shared by all console sessions.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::PermissionsConfig;
use crate::directory::{PrincipalDirectory, SystemDirectory};
use crate::error::PermissionError;
use crate::rules::{Principal, RuleSet};

/// Holds the active [`RuleSet`] and swaps it atomically on reload.
///
/// Readers take a cheap snapshot of the current table and never observe a
/// partially built one. Reloads are serialized by a separate lock; a reload
/// attempted while another is running is rejected rather than queued.
pub struct PermissionStore {
    active: RwLock<Arc<RuleSet>>,
    reload_lock: Mutex<()>,
    directory: Arc<dyn PrincipalDirectory>,
    source: Option<PathBuf>,
    last_reload: RwLock<Option<Instant>>,
}

impl PermissionStore {
    /// Creates a store that permits everything until rules are loaded.
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self {
            active: RwLock::new(Arc::new(RuleSet::default())),
            reload_lock: Mutex::new(()),
            directory,
            source: None,
            last_reload: RwLock::new(None),
        }
    }

    /// Creates a store backed by the system user database.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemDirectory))
    }

    /// Sets the file read by [`PermissionStore::reload`].
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn directory(&self) -> &dyn PrincipalDirectory {
        self.directory.as_ref()
    }

    /// Snapshot of the active table.
    pub fn rules(&self) -> Arc<RuleSet> {
        self.active.read().clone()
    }

    /// Decides whether `principal` may run `command` against the active table.
    pub fn is_allowed(&self, principal: Principal, command: &str) -> bool {
        self.rules().is_allowed(principal, command)
    }

    /// Instant of the last successful reload.
    pub fn last_reload(&self) -> Option<Instant> {
        *self.last_reload.read()
    }

    /// Re-reads the configured permissions file.
    pub fn reload(&self) -> Result<(), PermissionError> {
        let path = self.source.clone().ok_or(PermissionError::NoSource)?;
        self.reload_with(|| {
            let config = PermissionsConfig::load(&path)?;
            Ok(RuleSet::from_config(&config, self.directory()))
        })?;
        info!(path = %path.display(), "permissions reloaded");
        Ok(())
    }

    /// Replaces the table with one parsed from `text`.
    pub fn reload_from_str(&self, text: &str) -> Result<(), PermissionError> {
        self.reload_with(|| {
            let config = PermissionsConfig::parse(text)?;
            Ok(RuleSet::from_config(&config, self.directory()))
        })
    }

    /// Runs `build` under the reload lock and installs its result.
    ///
    /// Fails with [`PermissionError::ReloadInProgress`] without calling
    /// `build` if another reload holds the lock. The active table is left
    /// untouched when `build` fails.
    pub fn reload_with<F>(&self, build: F) -> Result<(), PermissionError>
    where
        F: FnOnce() -> Result<RuleSet, PermissionError>,
    {
        let Some(_guard) = self.reload_lock.try_lock() else {
            warn!("permissions reload requested while another one is running");
            return Err(PermissionError::ReloadInProgress);
        };

        let rules = build()?;
        debug!(groups = rules.groups().len(), default = %rules.default_access(), "installing permissions");
        self.install(rules);
        Ok(())
    }

    /// Installs a prebuilt table.
    pub fn install(&self, rules: RuleSet) {
        *self.active.write() = Arc::new(rules);
        *self.last_reload.write() = Some(Instant::now());
    }
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for PermissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("source", &self.source)
            .field("rules", &self.rules())
            .finish_non_exhaustive()
    }
}
