use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DepartmentId, DomainError, DomainResult, Entity};

/// Name, code and description of a department (create and full update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl DepartmentInput {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn normalized(self) -> DomainResult<(String, String, Option<String>)> {
        let name = self.name.trim().to_string();
        let code = self.code.trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err(DomainError::validation("department name cannot be empty"));
        }
        if code.is_empty() {
            return Err(DomainError::validation("department code cannot be empty"));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok((name, code, description))
    }
}

/// Organisational unit. Name and code are unique across departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Department {
    pub fn new(input: DepartmentInput, now: DateTime<Utc>) -> DomainResult<Self> {
        let (name, code, description) = input.normalized()?;
        Ok(Self {
            id: DepartmentId::new(0),
            name,
            code,
            description,
            created_at: now,
            updated_at: None,
        })
    }

    pub fn update(&mut self, input: DepartmentInput, now: DateTime<Utc>) -> DomainResult<()> {
        let (name, code, description) = input.normalized()?;
        self.name = name;
        self.code = code;
        self.description = description;
        self.updated_at = Some(now);
        Ok(())
    }
}

impl Entity for Department {
    type Id = DepartmentId;

    fn id(&self) -> DepartmentId {
        self.id
    }

    fn assign_id(&mut self, id: DepartmentId) {
        self.id = id;
    }
}
