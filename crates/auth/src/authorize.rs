use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use worksphere_core::DomainError;

use crate::{Permission, Principal, Role, role_permissions};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("principal '{0}' has no recognised role")]
    NoRoles(String),

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        DomainError::Forbidden(err.to_string())
    }
}

/// Check that any of the principal's roles grants `required`.
///
/// - No IO
/// - No panics
/// - No scope check (see [`crate::Visibility`])
pub fn authorize(principal: &Principal, required: Permission) -> Result<(), AuthzError> {
    if principal.roles().is_empty() {
        tracing::debug!(username = principal.username(), permission = %required, "denied: no roles");
        return Err(AuthzError::NoRoles(principal.username().to_string()));
    }

    let granted = principal
        .roles()
        .iter()
        .any(|role| role_permissions(*role).contains(&required));

    if granted {
        Ok(())
    } else {
        tracing::debug!(username = principal.username(), permission = %required, "denied");
        Err(AuthzError::Forbidden(required))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: Permission,
    pub granted: bool,
    pub reason: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub effective_permissions: Vec<Permission>,
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub message: String,
    /// Roles that would grant the missing permission.
    pub granting_roles: Vec<Role>,
}

/// Explain why an authorization decision was made (or would be made).
///
/// Agrees with [`authorize`] on every input.
pub fn explain_authorization(principal: &Principal, required: Permission) -> AuthorizationExplanation {
    let roles: Vec<Role> = principal.roles().iter().copied().collect();
    let effective: BTreeSet<Permission> = roles
        .iter()
        .flat_map(|role| role_permissions(*role).iter().copied())
        .collect();

    let granting_role = roles
        .iter()
        .find(|role| role_permissions(**role).contains(&required))
        .copied();

    let (granted, reason, denial_reason) = match granting_role {
        Some(role) => (
            true,
            format!("Role {role} grants '{required}'"),
            None,
        ),
        None => {
            let granting_roles: Vec<Role> = Role::ALL
                .into_iter()
                .filter(|role| role_permissions(*role).contains(&required))
                .collect();
            let message = if roles.is_empty() {
                "Principal has no recognised role".to_string()
            } else {
                format!("Missing required permission: '{required}'")
            };
            (
                false,
                format!("None of {roles:?} grants '{required}'"),
                Some(DenialReason { message, granting_roles }),
            )
        }
    };

    AuthorizationExplanation {
        required_permission: required,
        granted,
        reason,
        username: principal.username().to_string(),
        roles,
        effective_permissions: effective.into_iter().collect(),
        denial_reason,
    }
}

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub description: &'static str,
}

/// Complete view of the role model for auditing.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: Vec<RoleDefinition>,
}

impl RbacRegistry {
    pub fn new() -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| RoleDefinition {
                role,
                permissions: role_permissions(role).to_vec(),
                description: role_description(role),
            })
            .collect();
        Self { roles }
    }

    pub fn role(&self, role: Role) -> Option<&RoleDefinition> {
        self.roles.iter().find(|def| def.role == role)
    }
}

impl Default for RbacRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::Admin => "System administrator with every permission",
        Role::Hr => "Human resources staff managing the whole organisation",
        Role::Manager => "Line manager acting on direct reports and managed projects",
        Role::Employee => "Staff member acting on their own records",
    }
}
