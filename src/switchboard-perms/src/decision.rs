//! Permit/deny decisions.

/// Outcome of a single permission rule or of the global default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// The command may run.
    Permit,
    /// The command is refused.
    Deny,
}

impl Access {
    /// Parses a `default_perm` value. Anything but `permit` denies.
    pub fn from_config_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("permit") {
            Access::Permit
        } else {
            Access::Deny
        }
    }

    /// Returns true if this decision lets the command run.
    pub fn is_permit(self) -> bool {
        matches!(self, Access::Permit)
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::Permit
    }
}

impl From<bool> for Access {
    fn from(allowed: bool) -> Self {
        if allowed { Access::Permit } else { Access::Deny }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Permit => write!(f, "permit"),
            Access::Deny => write!(f, "deny"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_value() {
        assert_eq!(Access::from_config_value("permit"), Access::Permit);
        assert_eq!(Access::from_config_value(" PERMIT "), Access::Permit);
        assert_eq!(Access::from_config_value("deny"), Access::Deny);
        assert_eq!(Access::from_config_value("yes"), Access::Deny);
    }

    #[test]
    fn test_display() {
        assert_eq!(Access::Permit.to_string(), "permit");
        assert_eq!(Access::Deny.to_string(), "deny");
    }
}
