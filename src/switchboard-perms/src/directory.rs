//! Resolution of user and group names to numeric ids.

use std::collections::HashMap;

/// Maps the names used in the permissions file to numeric ids.
pub trait PrincipalDirectory: Send + Sync {
    /// Looks up a user id by login name.
    fn user_id(&self, name: &str) -> Option<i64>;

    /// Looks up a group id by group name.
    fn group_id(&self, name: &str) -> Option<i64>;
}

/// Directory backed by the operating system's user and group database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDirectory;

#[cfg(unix)]
impl PrincipalDirectory for SystemDirectory {
    fn user_id(&self, name: &str) -> Option<i64> {
        nix::unistd::User::from_name(name)
            .ok()
            .flatten()
            .map(|user| i64::from(user.uid.as_raw()))
    }

    fn group_id(&self, name: &str) -> Option<i64> {
        nix::unistd::Group::from_name(name)
            .ok()
            .flatten()
            .map(|group| i64::from(group.gid.as_raw()))
    }
}

#[cfg(not(unix))]
impl PrincipalDirectory for SystemDirectory {
    fn user_id(&self, _name: &str) -> Option<i64> {
        None
    }

    fn group_id(&self, _name: &str) -> Option<i64> {
        None
    }
}

/// In-memory directory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashMap<String, i64>,
    groups: HashMap<String, i64>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    pub fn with_user(mut self, name: impl Into<String>, uid: i64) -> Self {
        self.users.insert(name.into(), uid);
        self
    }

    /// Adds a group.
    pub fn with_group(mut self, name: impl Into<String>, gid: i64) -> Self {
        self.groups.insert(name.into(), gid);
        self
    }
}

impl PrincipalDirectory for StaticDirectory {
    fn user_id(&self, name: &str) -> Option<i64> {
        self.users.get(name).copied()
    }

    fn group_id(&self, name: &str) -> Option<i64> {
        self.groups.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_directory_lookup() {
        let dir = StaticDirectory::new()
            .with_user("alice", 1000)
            .with_group("ops", 50);

        assert_eq!(dir.user_id("alice"), Some(1000));
        assert_eq!(dir.user_id("bob"), None);
        assert_eq!(dir.group_id("ops"), Some(50));
        assert_eq!(dir.group_id("alice"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_directory_knows_root() {
        assert_eq!(SystemDirectory.user_id("root"), Some(0));
        assert_eq!(SystemDirectory.user_id("no-such-user-for-switchboard"), None);
    }
}
