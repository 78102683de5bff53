//! `worksphere-auth`: pure authorization boundary.
//!
//! Roles are a closed enumeration with a total role → permission mapping.
//! This crate is decoupled from HTTP, tokens and storage: callers hand in an
//! already-authenticated [`Principal`].

pub mod authorize;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialReason, RbacRegistry, RoleDefinition, authorize,
    explain_authorization,
};
pub use password::PasswordHasher;
pub use permissions::{Permission, role_permissions};
pub use principal::{Principal, Visibility};
pub use roles::Role;
pub use user::{NewUser, User};
