//! `worksphere-app`: the operation surface.
//!
//! Every operation takes an explicit [`RequestContext`], authorizes by role
//! permission and then by hierarchy scope, and returns a serializable view.

pub mod app;
pub mod authz;
pub mod context;

pub use app::services::{NotificationBus, Services, Settings, Stores};
pub use authz::Scope;
pub use context::RequestContext;
