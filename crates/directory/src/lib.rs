//! Directory domain module (employees, departments, reporting hierarchy).
//!
//! Pure, deterministic domain logic: no IO, no storage. Persistence and
//! allocation state live in `worksphere-infra`.

pub mod code;
pub mod department;
pub mod employee;
pub mod hierarchy;

pub use code::EmployeeCode;
pub use department::{Department, DepartmentInput};
pub use employee::{Employee, EmployeePatch, EmployeeProfile, NewEmployee};
pub use hierarchy::ensure_no_cycle;
