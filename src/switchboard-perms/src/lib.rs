#![allow(clippy::missing_errors_doc, clippy::doc_markdown)]
//! Switchboard Perms - permission policy for console commands.
//!
//! Decides whether a principal (user id, group id) may run a console command.
//! Rules come from `cli_permissions.conf`:
//!
//! ```text
//! [general]
//! default_perm = deny        ; global default
//!
//! [@operators]               ; rules for a group
//! permit = all
//!
//! [alice]                    ; rules for a user
//! deny = module load
//! ```
//!
//! # Resolution
//!
//! ```text
//!   uid == gid == NO_PERMS, or command starts with '_'  -> permit
//!   uid < 0 and gid < 0                                 -> global default
//!   otherwise
//!     last matching rule of the user's rule-groups      -> wins
//!     else last matching rule of the group's rule-groups -> wins
//!     else                                               -> global default
//! ```


mod config;
mod decision;
mod directory;
mod error;
mod rules;
mod store;

pub use config::{ConfigEntry, ConfigSection, PERMISSIONS_FILE, PermissionsConfig};
pub use decision::Access;
pub use directory::{PrincipalDirectory, StaticDirectory, SystemDirectory};
pub use error::PermissionError;
pub use rules::{
    INTERNAL_PREFIX, NO_CREDENTIALS, NO_PERMS, Principal, Rule, RuleGroup, RuleSet, Subject,
};
pub use store::PermissionStore;
