use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DepartmentId, DomainError, DomainResult, EmployeeId, Entity, UserId};

use crate::EmployeeCode;

/// Free-form profile attributes of an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub contact: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub blood_group: Option<String>,
    pub photo_url: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<u32>,
    pub education: Option<String>,
    pub hobbies: Option<String>,
    pub certifications: Option<String>,
    pub achievements: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
}

/// Input for a new employee profile. The account (`user_id`) and the code
/// are resolved by the caller.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub user_id: UserId,
    pub code: EmployeeCode,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: EmployeeProfile,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<DepartmentId>,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub code: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub blood_group: Option<String>,
    pub photo_url: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<u32>,
    pub education: Option<String>,
    pub hobbies: Option<String>,
    pub certifications: Option<String>,
    pub achievements: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
}

impl EmployeePatch {
    /// Whether the patch touches fields only HR may change.
    pub fn touches_restricted_fields(&self) -> bool {
        self.code.is_some() || self.email.is_some() || self.date_of_joining.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub user_id: UserId,
    pub code: EmployeeCode,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn new(input: NewEmployee, now: DateTime<Utc>) -> DomainResult<Self> {
        let first_name = required("first name", &input.first_name)?;
        let last_name = required("last name", &input.last_name)?;
        let email = required("email", &input.email)?.to_ascii_lowercase();

        Ok(Self {
            id: EmployeeId::new(0),
            user_id: input.user_id,
            code: input.code,
            first_name,
            last_name,
            email,
            profile: input.profile,
            manager_id: input.manager_id,
            department_id: input.department_id,
            created_at: now,
            updated_at: None,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn reports_to(&self, manager: EmployeeId) -> bool {
        self.manager_id == Some(manager)
    }

    /// Apply a partial update. A blank contact keeps the current one.
    pub fn apply_patch(&mut self, patch: EmployeePatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(first) = patch.first_name {
            self.first_name = required("first name", &first)?;
        }
        if let Some(last) = patch.last_name {
            self.last_name = required("last name", &last)?;
        }
        if let Some(email) = patch.email {
            self.email = required("email", &email)?.to_ascii_lowercase();
        }
        if let Some(code) = patch.code.filter(|c| !c.trim().is_empty()) {
            self.code = EmployeeCode::new(code)?;
        }
        if let Some(contact) = patch.contact.filter(|c| !c.trim().is_empty()) {
            self.profile.contact = contact.trim().to_string();
        }

        let p = &mut self.profile;
        overwrite(&mut p.address, patch.address);
        overwrite(&mut p.city, patch.city);
        overwrite(&mut p.blood_group, patch.blood_group);
        overwrite(&mut p.photo_url, patch.photo_url);
        overwrite(&mut p.skills, patch.skills);
        overwrite(&mut p.education, patch.education);
        overwrite(&mut p.hobbies, patch.hobbies);
        overwrite(&mut p.certifications, patch.certifications);
        overwrite(&mut p.achievements, patch.achievements);
        if patch.experience_years.is_some() {
            p.experience_years = patch.experience_years;
        }
        if patch.date_of_birth.is_some() {
            p.date_of_birth = patch.date_of_birth;
        }
        if patch.date_of_joining.is_some() {
            p.date_of_joining = patch.date_of_joining;
        }

        self.updated_at = Some(now);
        Ok(())
    }

    /// Set the manager. Cycle checks are the caller's job (see
    /// [`crate::ensure_no_cycle`]); only self-management is caught here.
    pub fn set_manager(&mut self, manager: Option<EmployeeId>) -> DomainResult<()> {
        if manager == Some(self.id) {
            return Err(DomainError::invariant("an employee cannot manage themselves"));
        }
        self.manager_id = manager;
        Ok(())
    }

    pub fn set_department(&mut self, department: Option<DepartmentId>) {
        self.department_id = department;
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn assign_id(&mut self, id: EmployeeId) {
        self.id = id;
    }
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(DomainError::validation(format!("{field} cannot be empty")))
    } else {
        Ok(value.to_string())
    }
}

fn overwrite(slot: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        let v = v.trim().to_string();
        *slot = if v.is_empty() { None } else { Some(v) };
    }
}
