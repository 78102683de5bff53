use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Role;

/// The authenticated identity making a request.
///
/// Built by the caller's auth layer and passed explicitly into every
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    username: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Highest-precedence role, if any.
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.iter().next().copied()
    }

    /// Which slice of the hierarchy this principal may see.
    pub fn visibility(&self) -> Visibility {
        Visibility::for_roles(&self.roles)
    }
}

/// Hierarchy slice visible to a principal.
///
/// - `All`: ADMIN and HR see every (non-admin) record.
/// - `Managed`: MANAGER sees records where they are the assigned manager.
/// - `Own`: EMPLOYEE sees their own record and projects they belong to.
/// - `Nothing`: no recognised role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    All,
    Managed,
    Own,
    Nothing,
}

impl Visibility {
    pub fn for_roles(roles: &BTreeSet<Role>) -> Self {
        match roles.iter().next() {
            Some(Role::Admin) | Some(Role::Hr) => Visibility::All,
            Some(Role::Manager) => Visibility::Managed,
            Some(Role::Employee) => Visibility::Own,
            None => Visibility::Nothing,
        }
    }
}
