//! Project staffing operations. Membership lives only on the project;
//! employee views derive their project list from it.

use tracing::{info, warn};

use worksphere_auth::Permission;
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind, ProjectId};
use worksphere_directory::Employee;
use worksphere_infra::EntityStore;
use worksphere_staffing::{Project, ProjectStatus, generate_project_code};

use crate::app::dto::{CreateProjectRequest, EmployeeView, ProjectView, UpdateProjectRequest};
use crate::app::services::Services;
use crate::authz::{Scope, out_of_scope};
use crate::context::RequestContext;

impl Services {
    fn project(&self, id: ProjectId) -> DomainResult<Project> {
        self.stores
            .projects
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::Project))
    }

    /// Project by id for a mutating call: absent is NotFound, outside the
    /// scope is Forbidden.
    fn scoped_project(&self, scope: Scope, id: ProjectId) -> DomainResult<Project> {
        let project = self.project(id)?;
        if scope.covers_project(&project) {
            Ok(project)
        } else {
            Err(out_of_scope(&format!("project {}", project.code)))
        }
    }

    /// Create a project. Unknown manager or member ids are skipped with a
    /// warning rather than failing the request.
    pub fn create_project(&self, ctx: &RequestContext, req: CreateProjectRequest) -> DomainResult<ProjectView> {
        self.require_all(ctx, Permission::ProjectWrite)?;
        let now = Self::now();

        let code = match req.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => code.to_string(),
            None => {
                let projects = &self.stores.projects;
                generate_project_code(now, |candidate| {
                    projects
                        .find_one(&|p: &Project| p.code == candidate)
                        .map(|found| found.is_some())
                })?
            }
        };

        let mut project = Project::new(code, req.details, now)?;
        if let Some(manager_id) = req.manager_id {
            match self.stores.employees.find(manager_id)? {
                Some(_) => project.manager_id = Some(manager_id),
                None => warn!(%manager_id, project = %project.code, "manager not found; creating project without one"),
            }
        }
        for member_id in req.member_ids {
            if self.stores.employees.find(member_id)?.is_some() {
                project.assign(member_id);
            } else {
                warn!(%member_id, project = %project.code, "member not found; skipping");
            }
        }

        let saved = self.stores.projects.save(project)?;
        info!(project = %saved.code, members = saved.member_ids.len(), "project created");
        self.project_view(saved)
    }

    pub fn get_project(&self, ctx: &RequestContext, id: ProjectId) -> DomainResult<ProjectView> {
        self.require(ctx, Permission::ProjectRead)?;
        let scope = self.project_scope(ctx)?;
        let project = self.scoped_project(scope, id)?;
        self.project_view(project)
    }

    /// Projects visible to the caller: all, managed, or joined.
    pub fn list_projects(&self, ctx: &RequestContext) -> DomainResult<Vec<ProjectView>> {
        self.visible_projects(ctx, |_| true)
    }

    pub fn projects_by_status(&self, ctx: &RequestContext, status: ProjectStatus) -> DomainResult<Vec<ProjectView>> {
        self.visible_projects(ctx, |p| p.status == status)
    }

    pub fn projects_by_manager(&self, ctx: &RequestContext, manager_id: EmployeeId) -> DomainResult<Vec<ProjectView>> {
        self.visible_projects(ctx, |p| p.is_managed_by(manager_id))
    }

    pub fn projects_by_employee(&self, ctx: &RequestContext, employee_id: EmployeeId) -> DomainResult<Vec<ProjectView>> {
        self.visible_projects(ctx, |p| p.has_member(employee_id))
    }

    fn visible_projects<F>(&self, ctx: &RequestContext, filter: F) -> DomainResult<Vec<ProjectView>>
    where
        F: Fn(&Project) -> bool,
    {
        self.require(ctx, Permission::ProjectRead)?;
        let scope = self.project_scope(ctx)?;
        self.stores
            .projects
            .find_where(&|p: &Project| scope.covers_project(p) && filter(p))?
            .into_iter()
            .map(|p| self.project_view(p))
            .collect()
    }

    /// Overwrite the descriptive fields and optionally move the project to
    /// another manager. A manager may edit their own projects but not hand
    /// them over.
    pub fn update_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
        req: UpdateProjectRequest,
    ) -> DomainResult<ProjectView> {
        self.require(ctx, Permission::ProjectWrite)?;
        let scope = self.project_scope(ctx)?;
        let mut project = self.scoped_project(scope, id)?;

        if let Some(manager_id) = req.manager_id {
            if let Scope::Managed(me) = scope {
                if manager_id != me {
                    return Err(DomainError::forbidden("only HR can reassign a project's manager"));
                }
            }
            self.manager(manager_id)?;
            project.manager_id = Some(manager_id);
        }
        project.update(req.details, Self::now())?;

        let saved = self.stores.projects.save(project)?;
        info!(project = %saved.code, updated_by = ctx.username(), "project updated");
        self.project_view(saved)
    }

    pub fn delete_project(&self, ctx: &RequestContext, id: ProjectId) -> DomainResult<()> {
        self.require_all(ctx, Permission::ProjectDelete)?;
        let project = self.project(id)?;
        self.stores.projects.delete(id)?;
        info!(project = %project.code, deleted_by = ctx.username(), "project deleted");
        Ok(())
    }

    /// Add an employee to a project. Assigning an existing member changes
    /// nothing.
    pub fn assign_employee(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> DomainResult<ProjectView> {
        let (mut project, employee) = self.staffing_pair(ctx, project_id, employee_id)?;
        if project.assign(employee.id) {
            project = self.stores.projects.save(project)?;
            info!(project = %project.code, employee = %employee.code, "employee assigned");
        }
        self.project_view(project)
    }

    /// Take an employee off a project. Removing a non-member returns the
    /// project unchanged.
    pub fn remove_employee(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> DomainResult<ProjectView> {
        let (mut project, employee) = self.staffing_pair(ctx, project_id, employee_id)?;
        if project.remove(employee.id) {
            project = self.stores.projects.save(project)?;
            info!(project = %project.code, employee = %employee.code, "employee removed");
        }
        self.project_view(project)
    }

    /// Members of a project. Managers may list only projects they manage.
    pub fn project_members(&self, ctx: &RequestContext, project_id: ProjectId) -> DomainResult<Vec<EmployeeView>> {
        self.require(ctx, Permission::ProjectRead)?;
        let scope = self.project_scope(ctx)?;
        let project = self.scoped_project(scope, project_id)?;
        let mut members = Vec::with_capacity(project.member_ids.len());
        for id in &project.member_ids {
            if let Some(e) = self.stores.employees.find(*id)? {
                members.push(e);
            }
        }
        self.employee_views(members)
    }

    fn staffing_pair(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> DomainResult<(Project, Employee)> {
        self.require(ctx, Permission::ProjectStaff)?;
        let scope = self.project_scope(ctx)?;
        let project = self.project(project_id)?;
        let employee = self.employee(employee_id)?;
        if !scope.covers_project(&project) {
            return Err(out_of_scope(&format!("project {}", project.code)));
        }
        Ok((project, employee))
    }

    fn project_view(&self, p: Project) -> DomainResult<ProjectView> {
        let manager_name = match p.manager_id {
            Some(m) => self.full_name_of(m)?,
            None => None,
        };
        let mut members = Vec::with_capacity(p.member_ids.len());
        for id in &p.member_ids {
            if let Some(e) = self.stores.employees.find(*id)? {
                members.push(Self::summary(&e));
            }
        }
        Ok(ProjectView {
            id: p.id,
            code: p.code,
            name: p.name,
            description: p.description,
            status: p.status,
            start_date: p.start_date,
            end_date: p.end_date,
            manager_id: p.manager_id,
            manager_name,
            members,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
    }
}
