//! Request authorization: role permission first, then hierarchy scope.
//!
//! Role checks are delegated to `worksphere-auth`. Scope needs the caller's
//! employee profile, so it is resolved here against the stores.

use tracing::debug;

use worksphere_auth::{Permission, User, Visibility, authorize};
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind};
use worksphere_directory::Employee;
use worksphere_feedback::PerformanceFeedback;
use worksphere_infra::EntityStore;
use worksphere_leave::LeaveRequest;
use worksphere_staffing::Project;

use crate::app::services::Services;
use crate::context::RequestContext;

/// Slice of the hierarchy a request may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// ADMIN / HR.
    All,
    /// MANAGER: records they manage, plus their own.
    Managed(EmployeeId),
    /// EMPLOYEE, for projects: projects they are a member of.
    Member(EmployeeId),
    /// EMPLOYEE: their own records.
    Own(EmployeeId),
}

impl Scope {
    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    /// Employee behind the scope, if any.
    pub fn subject(&self) -> Option<EmployeeId> {
        match self {
            Scope::All => None,
            Scope::Managed(id) | Scope::Member(id) | Scope::Own(id) => Some(*id),
        }
    }

    pub fn covers_employee(&self, employee: &Employee) -> bool {
        match self {
            Scope::All => true,
            Scope::Managed(m) => employee.id == *m || employee.reports_to(*m),
            Scope::Member(me) | Scope::Own(me) => employee.id == *me,
        }
    }

    pub fn covers_project(&self, project: &Project) -> bool {
        match self {
            Scope::All => true,
            Scope::Managed(m) => project.is_managed_by(*m),
            Scope::Member(me) | Scope::Own(me) => project.has_member(*me),
        }
    }

    pub fn covers_leave(&self, leave: &LeaveRequest) -> bool {
        match self {
            Scope::All => true,
            Scope::Managed(m) => leave.manager_id == *m || leave.employee_id == *m,
            Scope::Member(me) | Scope::Own(me) => leave.employee_id == *me,
        }
    }

    pub fn covers_feedback(&self, feedback: &PerformanceFeedback) -> bool {
        match self {
            Scope::All => true,
            Scope::Managed(m) => feedback.manager_id == *m || feedback.employee_id == *m,
            Scope::Member(me) | Scope::Own(me) => feedback.employee_id == *me,
        }
    }
}

pub(crate) fn out_of_scope(what: &str) -> DomainError {
    DomainError::forbidden(format!("{what} is outside your scope"))
}

impl Services {
    pub(crate) fn require(&self, ctx: &RequestContext, permission: Permission) -> DomainResult<()> {
        authorize(ctx.principal(), permission)?;
        Ok(())
    }

    /// The employee profile of the authenticated user.
    ///
    /// Matches the linked account's username; a username that looks like an
    /// email also matches the employee email. No match is
    /// [`DomainError::UnresolvedPrincipal`].
    pub fn current_employee(&self, ctx: &RequestContext) -> DomainResult<Employee> {
        let username = ctx.username().trim();
        if let Some(employee) = self.employee_by_login(username)? {
            return Ok(employee);
        }
        Err(DomainError::UnresolvedPrincipal(username.to_string()))
    }

    pub(crate) fn employee_by_login(&self, login: &str) -> DomainResult<Option<Employee>> {
        let wanted = login.to_ascii_lowercase();
        let user = self
            .stores
            .users
            .find_one(&|u: &User| u.username.to_ascii_lowercase() == wanted)?;
        if let Some(user) = user {
            let user_id = user.id;
            if let Some(employee) = self.stores.employees.find_one(&|e: &Employee| e.user_id == user_id)? {
                return Ok(Some(employee));
            }
        }
        if wanted.contains('@') {
            return Ok(self.stores.employees.find_one(&|e: &Employee| e.email == wanted)?);
        }
        Ok(None)
    }

    /// Scope for employee, leave and feedback records.
    pub fn scope(&self, ctx: &RequestContext) -> DomainResult<Scope> {
        let scope = match ctx.principal().visibility() {
            Visibility::All => Scope::All,
            Visibility::Managed => Scope::Managed(self.current_employee(ctx)?.id),
            Visibility::Own => Scope::Own(self.current_employee(ctx)?.id),
            Visibility::Nothing => {
                return Err(DomainError::forbidden(format!(
                    "principal '{}' has no recognised role",
                    ctx.username()
                )));
            }
        };
        debug!(username = ctx.username(), ?scope, "resolved scope");
        Ok(scope)
    }

    /// Scope for project records: employees see the projects they belong to.
    pub fn project_scope(&self, ctx: &RequestContext) -> DomainResult<Scope> {
        Ok(match self.scope(ctx)? {
            Scope::Own(me) => Scope::Member(me),
            other => other,
        })
    }

    /// Permission check followed by scope resolution.
    pub(crate) fn authorize_scoped(&self, ctx: &RequestContext, permission: Permission) -> DomainResult<Scope> {
        self.require(ctx, permission)?;
        self.scope(ctx)
    }

    /// Permission check requiring organisation-wide scope.
    pub(crate) fn require_all(&self, ctx: &RequestContext, permission: Permission) -> DomainResult<()> {
        if self.authorize_scoped(ctx, permission)?.is_all() {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "'{permission}' requires organisation-wide access"
            )))
        }
    }

    /// Employee by id, checked against `scope`. Absent is NotFound, present
    /// but foreign is Forbidden.
    pub(crate) fn scoped_employee(&self, scope: Scope, id: EmployeeId) -> DomainResult<Employee> {
        let employee = self.employee(id)?;
        if scope.covers_employee(&employee) {
            Ok(employee)
        } else {
            Err(out_of_scope(&format!("{} {}", EntityKind::Employee, employee.code)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use worksphere_core::{ProjectId, UserId};
    use worksphere_directory::{EmployeeCode, EmployeeProfile, NewEmployee};
    use worksphere_staffing::ProjectInput;

    use super::*;

    fn employee(id: u64, manager: Option<u64>) -> Employee {
        let mut e = Employee::new(
            NewEmployee {
                user_id: UserId::new(id),
                code: EmployeeCode::from_number(id),
                first_name: "F".to_string(),
                last_name: "L".to_string(),
                email: format!("e{id}@x.io"),
                profile: EmployeeProfile::default(),
                manager_id: manager.map(EmployeeId::new),
                department_id: None,
            },
            Utc::now(),
        )
        .unwrap();
        e.id = EmployeeId::new(id);
        e
    }

    fn project(manager: Option<u64>, members: &[u64]) -> Project {
        let mut p = Project::new(
            "PRJ1",
            ProjectInput {
                name: "Apollo".to_string(),
                ..ProjectInput::default()
            },
            Utc::now(),
        )
        .unwrap();
        p.id = ProjectId::new(1);
        p.manager_id = manager.map(EmployeeId::new);
        p.member_ids = members.iter().map(|m| EmployeeId::new(*m)).collect::<BTreeSet<_>>();
        p
    }

    #[test]
    fn manager_covers_self_and_direct_reports_only() {
        let scope = Scope::Managed(EmployeeId::new(1));
        assert!(scope.covers_employee(&employee(1, None)));
        assert!(scope.covers_employee(&employee(2, Some(1))));
        assert!(!scope.covers_employee(&employee(3, Some(2))));
    }

    #[test]
    fn manager_project_scope_is_managed_projects() {
        let scope = Scope::Managed(EmployeeId::new(1));
        assert!(scope.covers_project(&project(Some(1), &[])));
        assert!(!scope.covers_project(&project(Some(9), &[1])));
    }

    #[test]
    fn member_scope_follows_membership() {
        let scope = Scope::Member(EmployeeId::new(4));
        assert!(scope.covers_project(&project(Some(1), &[4, 5])));
        assert!(!scope.covers_project(&project(Some(1), &[5])));
        assert_eq!(scope.subject(), Some(EmployeeId::new(4)));
        assert_eq!(Scope::All.subject(), None);
    }
}
