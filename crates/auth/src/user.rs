//! User account record: credentials and granted roles.
//!
//! An account may exist without an employee profile (administrators never
//! have one). Authentication itself happens outside this crate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub enabled: bool,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validate and build an unsaved account (id 0 until the store assigns one).
    pub fn new(input: NewUser, now: DateTime<Utc>) -> DomainResult<Self> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_ascii_lowercase();

        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if !is_plausible_email(&email) {
            return Err(DomainError::validation(format!("invalid email '{email}'")));
        }
        if input.password_hash.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }

        Ok(Self {
            id: UserId::new(0),
            username,
            email,
            password_hash: input.password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            enabled: true,
            roles: BTreeSet::from([input.role]),
            created_at: now,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.roles.iter().next().copied()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Replace the whole role set with a single role.
    pub fn set_role(&mut self, role: Role) {
        self.roles = BTreeSet::from([role]);
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }
}

pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
