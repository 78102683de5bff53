use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use worksphere_auth::Role;
use worksphere_core::{DepartmentId, EmployeeId, FeedbackId, LeaveRequestId, ProjectId, UserId};
use worksphere_directory::{EmployeeCode, EmployeePatch, EmployeeProfile};
use worksphere_feedback::FeedbackInput;
use worksphere_leave::{LeaveStatus, LeaveType};
use worksphere_staffing::{ProjectInput, ProjectStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Doubles as the username.
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// `HR`, `MANAGER`, `EMPLOYEE`, `ADMIN` (optionally `ROLE_`-prefixed).
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    #[serde(flatten)]
    pub patch: EmployeePatch,
    /// Replaces the account's role set.
    pub role: Option<String>,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Generated as `PRJ<millis>` when absent.
    pub code: Option<String>,
    #[serde(flatten)]
    pub details: ProjectInput,
    pub manager_id: Option<EmployeeId>,
    #[serde(default)]
    pub member_ids: Vec<EmployeeId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(flatten)]
    pub details: ProjectInput,
    pub manager_id: Option<EmployeeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyLeaveRequest {
    /// Defaults to the caller.
    pub employee_id: Option<EmployeeId>,
    /// Defaults to the requester's current manager.
    pub manager_id: Option<EmployeeId>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    /// Defaults to the calling manager.
    pub manager_id: Option<EmployeeId>,
    pub employee_id: EmployeeId,
    #[serde(flatten)]
    pub input: FeedbackInput,
}

// -------------------------
// Response DTOs
// -------------------------

/// Compact employee reference embedded in other views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: EmployeeId,
    pub code: EmployeeCode,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub code: EmployeeCode,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    pub manager_id: Option<EmployeeId>,
    pub manager_name: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub department_name: Option<String>,
    pub department_code: Option<String>,
    pub project_ids: BTreeSet<ProjectId>,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentView {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub employees: Vec<EmployeeSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: ProjectId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<EmployeeId>,
    pub manager_name: Option<String>,
    pub members: Vec<EmployeeSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectView {
    pub fn member_ids(&self) -> Vec<EmployeeId> {
        self.members.iter().map(|m| m.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveView {
    pub id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub employee_name: Option<String>,
    pub manager_id: EmployeeId,
    pub manager_name: Option<String>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub id: FeedbackId,
    pub manager_id: EmployeeId,
    pub manager_name: Option<String>,
    pub employee_id: EmployeeId,
    pub employee_name: Option<String>,
    pub sprint: String,
    pub score: i32,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Account summary returned after authentication (no token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Authority names (`ROLE_HR`).
    pub roles: BTreeSet<String>,
    pub user_type: Option<Role>,
    pub employee_id: Option<EmployeeId>,
    pub employee_code: Option<EmployeeCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub admin_created: bool,
    pub departments_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrDashboard {
    pub total_employees: usize,
    pub active_projects: usize,
    pub pending_leaves: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub total_employees: usize,
    pub total_hrs: usize,
    pub total_managers: usize,
    pub total_projects: usize,
    pub active_projects: usize,
    pub recent_employees: Vec<EmployeeView>,
}
