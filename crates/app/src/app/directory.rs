//! Employee directory operations.

use std::collections::BTreeSet;

use tracing::{info, warn};

use worksphere_auth::{NewUser, PasswordHasher, Permission, Role, User};
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind};
use worksphere_directory::{Employee, EmployeeCode, EmployeePatch, NewEmployee, ensure_no_cycle};
use worksphere_feedback::PerformanceFeedback;
use worksphere_infra::EntityStore;
use worksphere_leave::LeaveRequest;
use worksphere_staffing::Project;

use crate::app::dto::{CreateEmployeeRequest, EmployeeSummary, EmployeeView, UpdateEmployeeRequest};
use crate::app::services::Services;
use crate::authz::{Scope, out_of_scope};
use crate::context::RequestContext;

impl Services {
    /// HR/Admin: create an account (username = email, default password, role
    /// EMPLOYEE) and its employee profile.
    pub fn create_employee(&self, ctx: &RequestContext, req: CreateEmployeeRequest) -> DomainResult<EmployeeView> {
        self.require_all(ctx, Permission::EmployeeWrite)?;

        if let Some(manager_id) = req.manager_id {
            self.manager(manager_id)?;
        }
        if let Some(department_id) = req.department_id {
            self.department(department_id)?;
        }

        let hash = self.hasher.hash(&self.settings.default_employee_password)?;
        let user = User::new(
            NewUser {
                username: req.email.clone(),
                email: req.email.clone(),
                password_hash: hash,
                first_name: req.first_name.clone(),
                last_name: req.last_name.clone(),
                role: Role::Employee,
            },
            Self::now(),
        )?;
        let user = self.stores.users.save(user)?;

        match self.create_profile(&user, req) {
            Ok(employee) => {
                info!(employee = %employee.code, created_by = ctx.username(), "employee created");
                self.employee_view(employee)
            }
            Err(err) => {
                // Keep account and profile creation all-or-nothing.
                if let Err(cleanup) = self.stores.users.delete(user.id) {
                    warn!(user_id = %user.id, error = %cleanup, "failed to roll back account");
                }
                Err(err)
            }
        }
    }

    fn create_profile(&self, user: &User, req: CreateEmployeeRequest) -> DomainResult<Employee> {
        let employee = Employee::new(
            NewEmployee {
                user_id: user.id,
                code: EmployeeCode::from_number(0),
                first_name: req.first_name,
                last_name: req.last_name,
                email: user.email.clone(),
                profile: req.profile,
                manager_id: req.manager_id,
                department_id: req.department_id,
            },
            Self::now(),
        )?;
        self.insert_employee(employee)
    }

    pub fn get_employee(&self, ctx: &RequestContext, id: EmployeeId) -> DomainResult<EmployeeView> {
        let scope = self.authorize_scoped(ctx, Permission::EmployeeRead)?;
        let employee = self.scoped_employee(scope, id)?;
        self.employee_view(employee)
    }

    pub fn get_employee_by_username(&self, ctx: &RequestContext, username: &str) -> DomainResult<EmployeeView> {
        let scope = self.authorize_scoped(ctx, Permission::EmployeeRead)?;
        let employee = self
            .employee_by_login(username)?
            .ok_or(DomainError::NotFound(EntityKind::Employee))?;
        self.scoped_view(scope, employee)
    }

    pub fn get_employee_by_email(&self, ctx: &RequestContext, email: &str) -> DomainResult<EmployeeView> {
        let scope = self.authorize_scoped(ctx, Permission::EmployeeRead)?;
        let wanted = email.trim().to_ascii_lowercase();
        let employee = self
            .stores
            .employees
            .find_one(&|e: &Employee| e.email == wanted)?
            .ok_or(DomainError::NotFound(EntityKind::Employee))?;
        self.scoped_view(scope, employee)
    }

    pub fn my_profile(&self, ctx: &RequestContext) -> DomainResult<EmployeeView> {
        self.require(ctx, Permission::ProfileRead)?;
        let me = self.current_employee(ctx)?;
        self.employee_view(me)
    }

    /// HR/Admin: patch profile fields, code, role, manager and department.
    pub fn update_employee(
        &self,
        ctx: &RequestContext,
        id: EmployeeId,
        req: UpdateEmployeeRequest,
    ) -> DomainResult<EmployeeView> {
        self.require_all(ctx, Permission::EmployeeWrite)?;
        let mut employee = self.employee(id)?;

        let role = req.role.as_deref().map(str::trim).filter(|r| !r.is_empty()).map(str::parse::<Role>).transpose()?;
        if role == Some(Role::Admin) {
            return Err(DomainError::InvalidRole(
                "ADMIN cannot hold an employee profile (valid roles are HR, MANAGER, EMPLOYEE)".to_string(),
            ));
        }

        if let Some(manager_id) = req.manager_id {
            self.manager(manager_id)?;
            let employees = &self.stores.employees;
            ensure_no_cycle(employee.id, Some(manager_id), |e| {
                Ok(employees.find(e)?.and_then(|x| x.manager_id))
            })?;
            employee.set_manager(Some(manager_id))?;
        }
        if let Some(department_id) = req.department_id {
            self.department(department_id)?;
            employee.set_department(Some(department_id));
        }

        let new_code = req
            .patch
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != employee.code.as_str());
        let code_changed = new_code.is_some();
        if let Some(code) = new_code {
            if !EmployeeCode::new(code)?.has_successor() {
                return Err(DomainError::validation(format!("employee code '{code}' leaves no room for later codes")));
            }
        }
        employee.apply_patch(req.patch, Self::now())?;
        let saved = self.stores.employees.save(employee)?;
        if code_changed {
            self.allocator.observe(&saved.code);
        }

        if let Some(role) = role {
            let mut user = self
                .stores
                .users
                .find(saved.user_id)?
                .ok_or(DomainError::NotFound(EntityKind::User))?;
            user.set_role(role);
            self.stores.users.save(user)?;
            info!(employee = %saved.code, %role, "role changed");
        }

        info!(employee = %saved.code, updated_by = ctx.username(), "employee updated");
        self.employee_view(saved)
    }

    /// Self-service profile edit. Code, email and joining date stay with HR.
    pub fn update_my_profile(&self, ctx: &RequestContext, patch: EmployeePatch) -> DomainResult<EmployeeView> {
        self.require(ctx, Permission::ProfileWrite)?;
        if patch.touches_restricted_fields() {
            return Err(DomainError::forbidden(
                "employee code, email and joining date can only be changed by HR",
            ));
        }
        let mut me = self.current_employee(ctx)?;
        me.apply_patch(patch, Self::now())?;
        let saved = self.stores.employees.save(me)?;
        self.employee_view(saved)
    }

    /// Remove an employee with everything hanging off them: reports are
    /// detached, memberships and managed projects released, their leave and
    /// feedback records and their account deleted.
    pub fn delete_employee(&self, ctx: &RequestContext, id: EmployeeId) -> DomainResult<()> {
        self.require_all(ctx, Permission::EmployeeDelete)?;
        let employee = self.employee(id)?;

        for mut report in self.stores.employees.find_where(&|e: &Employee| e.reports_to(id))? {
            report.manager_id = None;
            self.stores.employees.save(report)?;
        }
        for mut project in self
            .stores
            .projects
            .find_where(&|p: &Project| p.has_member(id) || p.is_managed_by(id))?
        {
            project.remove(id);
            if project.is_managed_by(id) {
                project.manager_id = None;
            }
            self.stores.projects.save(project)?;
        }
        for leave in self
            .stores
            .leaves
            .find_where(&|l: &LeaveRequest| l.employee_id == id || l.manager_id == id)?
        {
            self.stores.leaves.delete(leave.id)?;
        }
        for fb in self
            .stores
            .feedback
            .find_where(&|f: &PerformanceFeedback| f.employee_id == id || f.manager_id == id)?
        {
            self.stores.feedback.delete(fb.id)?;
        }

        self.stores.employees.delete(id)?;
        self.stores.users.delete(employee.user_id)?;
        info!(employee = %employee.code, deleted_by = ctx.username(), "employee deleted");
        Ok(())
    }

    /// Everyone for HR/Admin, direct reports for a manager, self for an employee.
    pub fn list_employees(&self, ctx: &RequestContext) -> DomainResult<Vec<EmployeeView>> {
        let scope = self.authorize_scoped(ctx, Permission::EmployeeRead)?;
        let employees = match scope {
            Scope::All => self.stores.employees.list()?,
            Scope::Managed(m) => self.stores.employees.find_where(&|e: &Employee| e.reports_to(m))?,
            Scope::Member(me) | Scope::Own(me) => vec![self.employee(me)?],
        };
        self.employee_views(employees)
    }

    /// Colleagues sharing at least one project with `employee_id` (default:
    /// the caller), excluding that employee.
    pub fn team_members(&self, ctx: &RequestContext, employee_id: Option<EmployeeId>) -> DomainResult<Vec<EmployeeView>> {
        let scope = self.authorize_scoped(ctx, Permission::EmployeeRead)?;
        let subject = match employee_id {
            Some(id) => self.scoped_employee(scope, id)?,
            None => self.current_employee(ctx)?,
        };

        let subject_id = subject.id;
        let mates: BTreeSet<EmployeeId> = self
            .stores
            .projects
            .find_where(&|p: &Project| p.has_member(subject_id))?
            .into_iter()
            .flat_map(|p| p.member_ids.into_iter())
            .filter(|id| *id != subject_id)
            .collect();

        let mut members = Vec::with_capacity(mates.len());
        for id in mates {
            if let Some(e) = self.stores.employees.find(id)? {
                members.push(e);
            }
        }
        self.employee_views(members)
    }

    /// Most recently created employees, newest first.
    pub fn recent_employees(&self, ctx: &RequestContext, limit: Option<usize>) -> DomainResult<Vec<EmployeeView>> {
        self.require_all(ctx, Permission::EmployeeRead)?;
        let limit = limit.unwrap_or(self.settings.recent_employees_limit);
        self.newest_employees(limit)
    }

    pub(crate) fn newest_employees(&self, limit: usize) -> DomainResult<Vec<EmployeeView>> {
        let mut employees = self.stores.employees.list()?;
        employees.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        employees.truncate(limit);
        self.employee_views(employees)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────

    fn scoped_view(&self, scope: Scope, employee: Employee) -> DomainResult<EmployeeView> {
        if scope.covers_employee(&employee) {
            self.employee_view(employee)
        } else {
            Err(out_of_scope(&format!("employee {}", employee.code)))
        }
    }

    pub(crate) fn employee_view(&self, e: Employee) -> DomainResult<EmployeeView> {
        let manager_name = match e.manager_id {
            Some(m) => self.full_name_of(m)?,
            None => None,
        };
        let department = match e.department_id {
            Some(d) => self.stores.departments.find(d)?,
            None => None,
        };
        let role = self.stores.users.find(e.user_id)?.and_then(|u| u.primary_role());
        let employee_id = e.id;
        let project_ids = self
            .stores
            .projects
            .find_where(&|p: &Project| p.has_member(employee_id))?
            .into_iter()
            .map(|p| p.id)
            .collect();

        Ok(EmployeeView {
            full_name: e.full_name(),
            id: e.id,
            code: e.code,
            user_id: e.user_id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            profile: e.profile,
            manager_id: e.manager_id,
            manager_name,
            department_id: e.department_id,
            department_name: department.as_ref().map(|d| d.name.clone()),
            department_code: department.map(|d| d.code),
            project_ids,
            role,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }

    pub(crate) fn employee_views(&self, employees: Vec<Employee>) -> DomainResult<Vec<EmployeeView>> {
        employees.into_iter().map(|e| self.employee_view(e)).collect()
    }

    pub(crate) fn summary(e: &Employee) -> EmployeeSummary {
        EmployeeSummary {
            id: e.id,
            code: e.code.clone(),
            full_name: e.full_name(),
            email: e.email.clone(),
        }
    }
}
