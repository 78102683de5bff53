//! Leave workflow domain module.
//!
//! A leave request starts `PENDING` and is decided exactly once, to
//! `APPROVED` or `REJECTED`. Decisions emit [`LeaveEvent`]s which the
//! application layer turns into notifications.

pub mod events;
pub mod request;

pub use events::{LeaveApplied, LeaveDecided, LeaveEvent};
pub use request::{Decision, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};
