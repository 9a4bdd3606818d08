//! Front-end configuration (`switchboard.toml`).
//!
//! ```toml
//! permissions = "/etc/switchboard/cli_permissions.conf"
//! log_level = "debug"
//!
//! [principal]
//! uid = 1000
//! gid = 50
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use switchboard_perms::{NO_PERMS, Principal};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "switchboard.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Path to the permissions file.
    pub permissions: Option<PathBuf>,
    /// Log level name, e.g. `info`.
    pub log_level: Option<String>,
    pub principal: PrincipalConfig,
}

/// Identity commands run as when the command line does not say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrincipalConfig {
    pub uid: Option<i64>,
    pub gid: Option<i64>,
}

impl PrincipalConfig {
    /// Missing ids mean "no id"; with both missing the principal is
    /// unrestricted.
    pub fn principal(&self) -> Principal {
        Principal::new(self.uid.unwrap_or(NO_PERMS), self.gid.unwrap_or(NO_PERMS))
    }
}

impl ConsoleConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid console configuration")
    }

    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full() {
        let config = ConsoleConfig::parse(
            r#"
permissions = "/etc/switchboard/cli_permissions.conf"
log_level = "debug"

[principal]
uid = 1000
gid = 50
"#,
        )
        .unwrap();

        assert_eq!(
            config.permissions.as_deref(),
            Some(Path::new("/etc/switchboard/cli_permissions.conf"))
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.principal.principal(), Principal::new(1000, 50));
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::parse("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.principal.principal(), Principal::UNRESTRICTED);
    }

    #[test]
    fn test_partial_principal() {
        let config = ConsoleConfig::parse("[principal]\ngid = 7\n").unwrap();
        assert_eq!(config.principal.principal(), Principal::new(NO_PERMS, 7));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ConsoleConfig::parse("colour = true\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let config = ConsoleConfig::load(&path).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "log_level = 3\n").unwrap();

        let err = ConsoleConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE));
    }
}
