//! Rule table and the permission decision.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::config::PermissionsConfig;
use crate::decision::Access;
use crate::directory::PrincipalDirectory;

/// Id value meaning "skip permission checks entirely" when used for both
/// the user and the group.
pub const NO_PERMS: i64 = -1;

/// Id value sent by clients that supplied no credentials; the global
/// default applies.
pub const NO_CREDENTIALS: i64 = -2;

/// Commands starting with this marker are internal: never listed and never
/// subject to permission checks.
pub const INTERNAL_PREFIX: char = '_';

/// The (user id, group id) pair a decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal {
    pub uid: i64,
    pub gid: i64,
}

impl Principal {
    /// Trusted caller, bypasses every rule.
    pub const UNRESTRICTED: Principal = Principal {
        uid: NO_PERMS,
        gid: NO_PERMS,
    };

    /// Caller without credentials, gets the global default.
    pub const ANONYMOUS: Principal = Principal {
        uid: NO_CREDENTIALS,
        gid: NO_CREDENTIALS,
    };

    pub fn new(uid: i64, gid: i64) -> Self {
        Self { uid, gid }
    }

    /// Returns true if rules must not be consulted at all.
    pub fn is_unrestricted(&self) -> bool {
        self.uid == NO_PERMS && self.gid == NO_PERMS
    }

    /// Returns true if neither id identifies anyone.
    pub fn is_anonymous(&self) -> bool {
        self.uid < 0 && self.gid < 0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}

/// Who a rule-group applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    User(i64),
    Group(i64),
}

/// One `permit`/`deny` line.
#[derive(Debug, Clone)]
pub struct Rule {
    command: String,
    access: Access,
    pattern: Option<Regex>,
}

impl Rule {
    /// Builds a rule, compiling `command` as a case-insensitive regex when
    /// it is one.
    pub fn new(command: impl Into<String>, access: Access) -> Self {
        let command = command.into();
        let pattern = RegexBuilder::new(&command)
            .case_insensitive(true)
            .build()
            .ok();
        Self {
            command,
            access,
            pattern,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Returns true if this rule applies to `command`.
    ///
    /// A rule applies when it is `all`, when its text is a case-insensitive
    /// prefix of the command, or when its regex matches anywhere in it.
    pub fn matches(&self, command: &str) -> bool {
        if self.command.eq_ignore_ascii_case("all") {
            return true;
        }
        let prefix_len = self.command.len();
        if command.len() >= prefix_len
            && command.as_bytes()[..prefix_len].eq_ignore_ascii_case(self.command.as_bytes())
        {
            return true;
        }
        self.pattern.as_ref().is_some_and(|re| re.is_match(command))
    }
}

/// Ordered rules for a single user or group.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    subject: Subject,
    name: String,
    rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(subject: Subject, name: impl Into<String>) -> Self {
        Self {
            subject,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Appends a rule; later rules win over earlier ones.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Name as written in the configuration (without the `@`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Decision of the last matching rule, if any.
    fn last_match(&self, command: &str) -> Option<Access> {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(command))
            .map(Rule::access)
    }
}

/// The complete permission table.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    default: Access,
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    /// Creates an empty table with the given global default.
    pub fn new(default: Access) -> Self {
        Self {
            default,
            groups: Vec::new(),
        }
    }

    /// Builds a table from parsed configuration.
    ///
    /// Unknown users or groups are logged and their sections skipped.
    /// Sections naming the same principal twice are merged in file order.
    pub fn from_config(config: &PermissionsConfig, directory: &dyn PrincipalDirectory) -> Self {
        let mut set = RuleSet::default();

        for section in &config.sections {
            if section.name.eq_ignore_ascii_case("general") {
                for value in section.values("default_perm") {
                    set.default = Access::from_config_value(value);
                }
                continue;
            }

            let (subject, name) = if let Some(group) = section.name.strip_prefix('@') {
                match directory.group_id(group) {
                    Some(gid) => (Subject::Group(gid), group),
                    None => {
                        warn!(group, "unknown group in permissions file");
                        continue;
                    }
                }
            } else {
                match directory.user_id(&section.name) {
                    Some(uid) => (Subject::User(uid), section.name.as_str()),
                    None => {
                        warn!(user = %section.name, "unknown user in permissions file");
                        continue;
                    }
                }
            };

            let group = set.group_mut(subject, name);
            for entry in &section.entries {
                if entry.value.is_empty() {
                    warn!(section = %section.name, line = entry.line, "empty permit/deny option");
                    continue;
                }
                let access = if entry.key.eq_ignore_ascii_case("permit") {
                    Access::Permit
                } else if entry.key.eq_ignore_ascii_case("deny") {
                    Access::Deny
                } else {
                    warn!(option = %entry.key, line = entry.line, "unknown permissions option");
                    continue;
                };
                group.push(Rule::new(entry.value.clone(), access));
            }
        }

        set
    }

    /// Returns the rule-group for `subject`, creating it if needed.
    pub fn group_mut(&mut self, subject: Subject, name: &str) -> &mut RuleGroup {
        let index = match self.groups.iter().position(|g| g.subject == subject) {
            Some(index) => index,
            None => {
                self.groups.push(RuleGroup::new(subject, name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn default_access(&self) -> Access {
        self.default
    }

    pub fn set_default_access(&mut self, access: Access) {
        self.default = access;
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Decides whether `principal` may run `command`.
    ///
    /// A matching user rule beats any group rule; a matching group rule
    /// beats the global default. Within one rule-group the last matching
    /// line wins.
    pub fn is_allowed(&self, principal: Principal, command: &str) -> bool {
        if principal.is_unrestricted() || command.starts_with(INTERNAL_PREFIX) {
            return true;
        }
        if principal.is_anonymous() {
            return self.default.is_permit();
        }

        let mut user_access = None;
        let mut group_access = None;
        for group in &self.groups {
            let slot = match group.subject {
                Subject::User(uid) if uid == principal.uid => &mut user_access,
                Subject::Group(gid) if gid == principal.gid => &mut group_access,
                _ => continue,
            };
            if let Some(access) = group.last_match(command) {
                *slot = Some(access);
            }
        }

        user_access
            .or(group_access)
            .unwrap_or(self.default)
            .is_permit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_all_matches_everything() {
        let rule = Rule::new("ALL", Access::Deny);
        assert!(rule.matches("core show uptime"));
    }

    #[test]
    fn test_rule_prefix_is_case_insensitive() {
        let rule = Rule::new("Module Load", Access::Deny);
        assert!(rule.matches("module load chan_sip.so"));
        assert!(!rule.matches("module show"));
    }

    #[test]
    fn test_rule_regex() {
        let rule = Rule::new("^core (show|set) ", Access::Permit);
        assert!(rule.matches("core show uptime"));
        assert!(rule.matches("CORE SET verbose"));
        assert!(!rule.matches("core reload"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_prefix() {
        let rule = Rule::new("core show help [topic", Access::Permit);
        assert!(rule.matches("core show help [topic]"));
        assert!(!rule.matches("core show uptime"));
    }

    #[test]
    fn test_principal_flags() {
        assert!(Principal::UNRESTRICTED.is_unrestricted());
        assert!(Principal::UNRESTRICTED.is_anonymous());
        assert!(!Principal::ANONYMOUS.is_unrestricted());
        assert!(Principal::ANONYMOUS.is_anonymous());
        assert!(!Principal::new(1000, -1).is_anonymous());
    }
}
