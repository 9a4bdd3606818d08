//! Parser for the `cli_permissions.conf` file.
//!
//! The file is a sequence of `[section]` headers, each followed by
//! `key = value` lines. Keys may repeat inside a section and their order is
//! preserved, which is what gives later `permit`/`deny` lines priority over
//! earlier ones.
//!
//! ```text
//! [general]
//! default_perm = deny
//!
//! [@operators]
//! permit = all
//!
//! [alice]
//! deny = module load
//! ```

use std::path::Path;

use tracing::warn;

use crate::error::PermissionError;

/// Conventional file name of the permissions configuration.
pub const PERMISSIONS_FILE: &str = "cli_permissions.conf";

/// A single `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    /// 1-based line number in the source text.
    pub line: usize,
}

/// A named section and its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSection {
    pub name: String,
    pub entries: Vec<ConfigEntry>,
}

impl ConfigSection {
    /// Iterates the values of every entry whose key matches `key`
    /// case-insensitively.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value.as_str())
    }
}

/// Parsed permissions configuration, sections in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionsConfig {
    pub sections: Vec<ConfigSection>,
}

impl PermissionsConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, PermissionError> {
        let text = std::fs::read_to_string(path).map_err(|source| PermissionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> Result<Self, PermissionError> {
        let mut sections: Vec<ConfigSection> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(end) = rest.find(']') else {
                    return Err(PermissionError::Parse {
                        line: line_no,
                        message: format!("unterminated section header '{line}'"),
                    });
                };
                let name = rest[..end].trim();
                if name.is_empty() {
                    return Err(PermissionError::Parse {
                        line: line_no,
                        message: "empty section name".to_string(),
                    });
                }
                sections.push(ConfigSection {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let Some(section) = sections.last_mut() else {
                return Err(PermissionError::Parse {
                    line: line_no,
                    message: format!("'{line}' appears before any section"),
                });
            };

            let Some((key, value)) = line.split_once('=') else {
                warn!(line = line_no, "no '=' in permissions line, ignoring");
                continue;
            };
            // `key => value` is accepted as a synonym.
            let value = value.strip_prefix('>').unwrap_or(value);

            section.entries.push(ConfigEntry {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
                line: line_no,
            });
        }

        Ok(Self { sections })
    }

    /// Returns the first section with the given name.
    pub fn section(&self, name: &str) -> Option<&ConfigSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Cuts the line at the first unescaped `;` or at a leading `#`.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            ';' if !escaped => return &line[..i],
            _ => escaped = false,
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_sections_in_order() {
        let text = "\
[general]
default_perm = deny

[@ops]
permit = all
deny => core restart

[alice]
deny = module load
permit = module load chan_sip
";
        let config = PermissionsConfig::parse(text).unwrap();
        let names: Vec<_> = config.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["general", "@ops", "alice"]);

        let ops = config.section("@OPS").unwrap();
        assert_eq!(ops.entries[1].key, "deny");
        assert_eq!(ops.entries[1].value, "core restart");
        assert_eq!(ops.entries[1].line, 6);

        let alice = config.section("alice").unwrap();
        let denies: Vec<_> = alice.values("DENY").collect();
        assert_eq!(denies, vec!["module load"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let text = "; leading comment\n# hash comment\n[general]\ndefault_perm = permit ; trailing\n";
        let config = PermissionsConfig::parse(text).unwrap();
        let general = config.section("general").unwrap();
        assert_eq!(general.entries.len(), 1);
        assert_eq!(general.entries[0].value, "permit");
    }

    #[test]
    fn test_entry_before_section_is_an_error() {
        let err = PermissionsConfig::parse("permit = all\n").unwrap_err();
        assert!(matches!(err, PermissionError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unterminated_header_is_an_error() {
        let err = PermissionsConfig::parse("[general\n").unwrap_err();
        assert!(matches!(err, PermissionError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_line_without_equals_is_skipped() {
        let config = PermissionsConfig::parse("[alice]\npermit all\ndeny = x\n").unwrap();
        assert_eq!(config.sections[0].entries.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PermissionsConfig::load(&dir.path().join(PERMISSIONS_FILE)).unwrap_err();
        assert!(matches!(err, PermissionError::Io { .. }));
    }
}
