use tracing::info;

use worksphere_auth::Permission;
use worksphere_core::{DepartmentId, DomainError, DomainResult, EntityKind};
use worksphere_directory::{Department, DepartmentInput, Employee};
use worksphere_infra::EntityStore;

use crate::app::dto::DepartmentView;
use crate::app::services::Services;
use crate::context::RequestContext;

impl Services {
    pub(crate) fn department(&self, id: DepartmentId) -> DomainResult<Department> {
        self.stores
            .departments
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::Department))
    }

    pub fn create_department(&self, ctx: &RequestContext, input: DepartmentInput) -> DomainResult<DepartmentView> {
        self.require(ctx, Permission::DepartmentWrite)?;
        let saved = self.stores.departments.save(Department::new(input, Self::now())?)?;
        info!(department = %saved.code, created_by = ctx.username(), "department created");
        self.department_view(saved)
    }

    pub fn get_department(&self, ctx: &RequestContext, id: DepartmentId) -> DomainResult<DepartmentView> {
        self.require(ctx, Permission::DepartmentRead)?;
        let department = self.department(id)?;
        self.department_view(department)
    }

    pub fn list_departments(&self, ctx: &RequestContext) -> DomainResult<Vec<DepartmentView>> {
        self.require(ctx, Permission::DepartmentRead)?;
        self.stores
            .departments
            .list()?
            .into_iter()
            .map(|d| self.department_view(d))
            .collect()
    }

    pub fn update_department(
        &self,
        ctx: &RequestContext,
        id: DepartmentId,
        input: DepartmentInput,
    ) -> DomainResult<DepartmentView> {
        self.require(ctx, Permission::DepartmentWrite)?;
        let mut department = self.department(id)?;
        department.update(input, Self::now())?;
        let saved = self.stores.departments.save(department)?;
        self.department_view(saved)
    }

    /// Refused while any employee still belongs to the department.
    pub fn delete_department(&self, ctx: &RequestContext, id: DepartmentId) -> DomainResult<()> {
        self.require(ctx, Permission::DepartmentDelete)?;
        let department = self.department(id)?;
        let staffed = self
            .stores
            .employees
            .count_where(&|e: &Employee| e.department_id == Some(id))?;
        if staffed > 0 {
            return Err(DomainError::conflict(format!(
                "department {} still has {staffed} employee(s)",
                department.code
            )));
        }
        self.stores.departments.delete(id)?;
        info!(department = %department.code, deleted_by = ctx.username(), "department deleted");
        Ok(())
    }

    fn department_view(&self, d: Department) -> DomainResult<DepartmentView> {
        let id = d.id;
        let employees = self
            .stores
            .employees
            .find_where(&|e: &Employee| e.department_id == Some(id))?
            .iter()
            .map(Self::summary)
            .collect();
        Ok(DepartmentView {
            id: d.id,
            name: d.name,
            code: d.code,
            description: d.description,
            employees,
            created_at: d.created_at,
            updated_at: d.updated_at,
        })
    }
}
