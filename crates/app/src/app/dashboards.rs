use worksphere_auth::{Permission, Role, User};
use worksphere_core::DomainResult;
use worksphere_directory::Employee;
use worksphere_infra::EntityStore;
use worksphere_leave::{LeaveRequest, LeaveStatus};
use worksphere_staffing::Project;

use crate::app::dto::{AdminDashboard, HrDashboard};
use crate::app::services::Services;
use crate::context::RequestContext;

impl Services {
    pub fn hr_dashboard(&self, ctx: &RequestContext) -> DomainResult<HrDashboard> {
        self.require(ctx, Permission::HrDashboard)?;
        Ok(HrDashboard {
            total_employees: self.stores.employees.list()?.len(),
            active_projects: self.stores.projects.count_where(&|p: &Project| p.is_active())?,
            pending_leaves: self
                .stores
                .leaves
                .count_where(&|l: &LeaveRequest| l.status == LeaveStatus::Pending)?,
        })
    }

    /// Head counts by role plus the newest employees.
    pub fn admin_dashboard(&self, ctx: &RequestContext) -> DomainResult<AdminDashboard> {
        self.require(ctx, Permission::AdminDashboard)?;
        let projects = self.stores.projects.list()?;
        Ok(AdminDashboard {
            total_employees: self.stores.employees.list()?.len(),
            total_hrs: self.profiles_with_role(Role::Hr)?,
            total_managers: self.profiles_with_role(Role::Manager)?,
            total_projects: projects.len(),
            active_projects: projects.iter().filter(|p| p.is_active()).count(),
            recent_employees: self.newest_employees(self.settings.recent_employees_limit)?,
        })
    }

    /// Employee profiles whose account holds `role`.
    fn profiles_with_role(&self, role: Role) -> DomainResult<usize> {
        let users = self.stores.users.find_where(&|u: &User| u.has_role(role))?;
        let mut count = 0;
        for user in users {
            let user_id = user.id;
            if self
                .stores
                .employees
                .find_one(&|e: &Employee| e.user_id == user_id)?
                .is_some()
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
