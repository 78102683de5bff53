use serde::{Deserialize, Serialize};

use crate::Role;

/// Operation-level permission.
///
/// Permissions say *what kind* of operation a role may attempt. Whether the
/// target falls inside the principal's slice of the hierarchy is a separate
/// check (see [`crate::Visibility`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    EmployeeRead,
    EmployeeWrite,
    EmployeeDelete,
    DepartmentRead,
    DepartmentWrite,
    DepartmentDelete,
    ProjectRead,
    ProjectWrite,
    ProjectDelete,
    ProjectStaff,
    LeaveApply,
    LeaveRead,
    LeaveDecide,
    LeaveDelete,
    FeedbackRead,
    FeedbackWrite,
    FeedbackDelete,
    ProfileRead,
    ProfileWrite,
    HrDashboard,
    AdminDashboard,
}

impl Permission {
    pub const ALL: [Permission; 21] = [
        Permission::EmployeeRead,
        Permission::EmployeeWrite,
        Permission::EmployeeDelete,
        Permission::DepartmentRead,
        Permission::DepartmentWrite,
        Permission::DepartmentDelete,
        Permission::ProjectRead,
        Permission::ProjectWrite,
        Permission::ProjectDelete,
        Permission::ProjectStaff,
        Permission::LeaveApply,
        Permission::LeaveRead,
        Permission::LeaveDecide,
        Permission::LeaveDelete,
        Permission::FeedbackRead,
        Permission::FeedbackWrite,
        Permission::FeedbackDelete,
        Permission::ProfileRead,
        Permission::ProfileWrite,
        Permission::HrDashboard,
        Permission::AdminDashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::EmployeeRead => "employee.read",
            Permission::EmployeeWrite => "employee.write",
            Permission::EmployeeDelete => "employee.delete",
            Permission::DepartmentRead => "department.read",
            Permission::DepartmentWrite => "department.write",
            Permission::DepartmentDelete => "department.delete",
            Permission::ProjectRead => "project.read",
            Permission::ProjectWrite => "project.write",
            Permission::ProjectDelete => "project.delete",
            Permission::ProjectStaff => "project.staff",
            Permission::LeaveApply => "leave.apply",
            Permission::LeaveRead => "leave.read",
            Permission::LeaveDecide => "leave.decide",
            Permission::LeaveDelete => "leave.delete",
            Permission::FeedbackRead => "feedback.read",
            Permission::FeedbackWrite => "feedback.write",
            Permission::FeedbackDelete => "feedback.delete",
            Permission::ProfileRead => "profile.read",
            Permission::ProfileWrite => "profile.write",
            Permission::HrDashboard => "dashboard.hr",
            Permission::AdminDashboard => "dashboard.admin",
        }
    }

    /// Module prefix of the permission name ("employee", "leave", ...).
    pub fn category(&self) -> &'static str {
        let name = self.as_str();
        name.split('.').next().unwrap_or(name)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total role → permission mapping.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    use Permission::*;

    match role {
        Role::Admin => &Permission::ALL,
        Role::Hr => &[
            EmployeeRead,
            EmployeeWrite,
            EmployeeDelete,
            DepartmentRead,
            DepartmentWrite,
            DepartmentDelete,
            ProjectRead,
            ProjectWrite,
            ProjectDelete,
            ProjectStaff,
            LeaveApply,
            LeaveRead,
            LeaveDecide,
            LeaveDelete,
            FeedbackRead,
            ProfileRead,
            ProfileWrite,
            HrDashboard,
        ],
        Role::Manager => &[
            EmployeeRead,
            DepartmentRead,
            ProjectRead,
            ProjectWrite,
            ProjectStaff,
            LeaveApply,
            LeaveRead,
            LeaveDecide,
            FeedbackRead,
            FeedbackWrite,
            FeedbackDelete,
            ProfileRead,
            ProfileWrite,
        ],
        Role::Employee => &[
            EmployeeRead,
            DepartmentRead,
            ProjectRead,
            LeaveApply,
            LeaveRead,
            FeedbackRead,
            ProfileRead,
            ProfileWrite,
        ],
    }
}
