use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{EmployeeId, LeaveRequestId};
use worksphere_events::Event;

use crate::{LeaveStatus, LeaveType};

/// Event: LeaveApplied. Addressed to the approving manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplied {
    pub leave_id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub leave_type: LeaveType,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LeaveDecided. Addressed to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDecided {
    pub leave_id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub status: LeaveStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveEvent {
    Applied(LeaveApplied),
    Decided(LeaveDecided),
}

impl LeaveEvent {
    /// Employee who should hear about this event.
    pub fn recipient(&self) -> EmployeeId {
        match self {
            LeaveEvent::Applied(e) => e.manager_id,
            LeaveEvent::Decided(e) => e.employee_id,
        }
    }

    pub fn leave_id(&self) -> LeaveRequestId {
        match self {
            LeaveEvent::Applied(e) => e.leave_id,
            LeaveEvent::Decided(e) => e.leave_id,
        }
    }
}

impl Event for LeaveEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LeaveEvent::Applied(_) => "leave.applied",
            LeaveEvent::Decided(_) => "leave.decided",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LeaveEvent::Applied(e) => e.occurred_at,
            LeaveEvent::Decided(e) => e.occurred_at,
        }
    }
}
