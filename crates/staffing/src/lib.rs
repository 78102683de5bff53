//! Project staffing domain module.
//!
//! Projects, their lifecycle status and membership. Membership is a set: an
//! employee is on a project at most once.

pub mod code;
pub mod project;

pub use code::{PROJECT_CODE_PREFIX, generate_project_code};
pub use project::{Project, ProjectInput, ProjectStatus};
