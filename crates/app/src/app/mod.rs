//! Application services: wiring plus one operation module per area.

pub mod accounts;
pub mod dashboards;
pub mod departments;
pub mod directory;
pub mod dto;
pub mod errors;
pub mod feedback;
pub mod leaves;
pub mod projects;
pub mod services;
