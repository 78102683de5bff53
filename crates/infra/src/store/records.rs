//! Unique constraints per stored entity.

use worksphere_auth::User;
use worksphere_core::{Entity, EntityKind};
use worksphere_directory::{Department, Employee};
use worksphere_feedback::PerformanceFeedback;
use worksphere_leave::LeaveRequest;
use worksphere_staffing::Project;

/// `(field, normalized value)` that must be unique within a store.
pub type UniqueKey = (&'static str, String);

/// An entity the store knows how to constrain.
pub trait Record: Entity {
    const KIND: EntityKind;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            ("username", self.username.to_ascii_lowercase()),
            ("email", self.email.to_ascii_lowercase()),
        ]
    }
}

impl Record for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            ("code", self.code.as_str().to_string()),
            ("user_id", self.user_id.to_string()),
        ]
    }
}

impl Record for Department {
    const KIND: EntityKind = EntityKind::Department;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            ("name", self.name.to_lowercase()),
            ("code", self.code.to_ascii_uppercase()),
        ]
    }
}

impl Record for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![("code", self.code.clone())]
    }
}

impl Record for LeaveRequest {
    const KIND: EntityKind = EntityKind::LeaveRequest;
}

impl Record for PerformanceFeedback {
    const KIND: EntityKind = EntityKind::Feedback;
}
