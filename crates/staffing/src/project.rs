use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult, EmployeeId, Entity, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "ACTIVE" => Ok(ProjectStatus::Active),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "ON_HOLD" => Ok(ProjectStatus::OnHold),
            "CANCELLED" => Ok(ProjectStatus::Cancelled),
            other => Err(DomainError::validation(format!("unknown project status '{other}'"))),
        }
    }
}

/// Descriptive fields of a project (create and full update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProjectInput {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("project name cannot be empty"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DomainError::validation(format!(
                    "project end date {end} is before start date {start}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<EmployeeId>,
    pub member_ids: BTreeSet<EmployeeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(code: impl Into<String>, input: ProjectInput, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(DomainError::validation("project code cannot be empty"));
        }
        Ok(Self {
            id: ProjectId::new(0),
            code,
            name: input.name.trim().to_string(),
            description: input.description,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
            manager_id: None,
            member_ids: BTreeSet::new(),
            created_at: now,
            updated_at: None,
        })
    }

    /// Overwrite the descriptive fields. Code, manager and members are untouched.
    pub fn update(&mut self, input: ProjectInput, now: DateTime<Utc>) -> DomainResult<()> {
        input.validate()?;
        self.name = input.name.trim().to_string();
        self.description = input.description;
        self.status = input.status;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.updated_at = Some(now);
        Ok(())
    }

    pub fn is_managed_by(&self, manager: EmployeeId) -> bool {
        self.manager_id == Some(manager)
    }

    pub fn has_member(&self, employee: EmployeeId) -> bool {
        self.member_ids.contains(&employee)
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    /// Add a member. Returns `false` when already a member.
    pub fn assign(&mut self, employee: EmployeeId) -> bool {
        self.member_ids.insert(employee)
    }

    /// Remove a member. Returns `false` (and changes nothing) for a non-member.
    pub fn remove(&mut self, employee: EmployeeId) -> bool {
        self.member_ids.remove(&employee)
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn assign_id(&mut self, id: ProjectId) {
        self.id = id;
    }
}
