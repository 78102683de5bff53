use core::str::FromStr;

use serde::{Deserialize, Serialize};

use worksphere_core::DomainError;

/// Role granted to a user account.
///
/// Declaration order is precedence order: when a user holds several roles the
/// smallest one is their primary role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Hr,
    Manager,
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Hr, Role::Manager, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Hr => "HR",
            Role::Manager => "MANAGER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// Spring-style authority name (`ROLE_HR`), used in account summaries.
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Hr => "ROLE_HR",
            Role::Manager => "ROLE_MANAGER",
            Role::Employee => "ROLE_EMPLOYEE",
        }
    }

    /// Whether accounts holding this role get an employee profile.
    pub fn has_employee_profile(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `HR`, `hr`, `ROLE_HR`; anything else is [`DomainError::InvalidRole`].
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let name = normalized.strip_prefix("ROLE_").unwrap_or(&normalized);
        match name {
            "ADMIN" => Ok(Role::Admin),
            "HR" => Ok(Role::Hr),
            "MANAGER" => Ok(Role::Manager),
            "EMPLOYEE" => Ok(Role::Employee),
            _ => Err(DomainError::InvalidRole(format!(
                "'{}' (valid roles are ADMIN, HR, MANAGER, EMPLOYEE)",
                s.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_names() {
        assert_eq!("HR".parse::<Role>().unwrap(), Role::Hr);
        assert_eq!("ROLE_MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(" employee ".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!("role_admin".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn rejects_unknown_roles() {
        for input in ["", "ROLE_", "SUPERUSER", "ROLE_ROLE_HR"] {
            let err = input.parse::<Role>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidRole(_)), "input {input:?}");
        }
    }

    #[test]
    fn precedence_follows_declaration_order() {
        let mut roles = vec![Role::Employee, Role::Manager, Role::Admin, Role::Hr];
        roles.sort();
        assert_eq!(roles, Role::ALL.to_vec());
    }

    #[test]
    fn serializes_as_screaming_case() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"HR\"");
        let back: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(back, Role::Manager);
    }
}
