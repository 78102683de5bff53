use worksphere_auth::{Principal, Role};
use worksphere_core::DomainResult;

/// Principal context for a request (authenticated identity + roles).
///
/// Built by the caller once authentication has succeeded; immutable for the
/// duration of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    principal: Principal,
}

impl RequestContext {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            principal: Principal::new(username, roles),
        }
    }

    /// Build from authority strings as a token layer would carry them
    /// (`ROLE_HR`, `manager`, ...). Unknown names are `InvalidRole`.
    pub fn from_authorities<S: AsRef<str>>(username: impl Into<String>, authorities: &[S]) -> DomainResult<Self> {
        let roles = authorities
            .iter()
            .map(|a| a.as_ref().parse::<Role>())
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self::new(username, roles))
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn username(&self) -> &str {
        self.principal.username()
    }
}
