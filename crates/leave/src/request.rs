use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult, EmployeeId, Entity, LeaveRequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    #[serde(rename = "SICK_LEAVE", alias = "SICK")]
    Sick,
    #[serde(rename = "PAID_LEAVE", alias = "PAID")]
    Paid,
    #[serde(rename = "UNPAID_LEAVE", alias = "UNPAID")]
    Unpaid,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Sick => "SICK_LEAVE",
            LeaveType::Paid => "PAID_LEAVE",
            LeaveType::Unpaid => "UNPAID_LEAVE",
        }
    }
}

impl core::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `SICK`, `sick_leave`, `SICK_LEAVE`.
impl core::str::FromStr for LeaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.strip_suffix("_LEAVE").unwrap_or(&normalized) {
            "SICK" => Ok(LeaveType::Sick),
            "PAID" => Ok(LeaveType::Paid),
            "UNPAID" => Ok(LeaveType::Unpaid),
            _ => Err(DomainError::validation(format!("unknown leave type '{}'", s.trim()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }
}

impl core::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for LeaveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LeaveStatus::Pending),
            "APPROVED" => Ok(LeaveStatus::Approved),
            "REJECTED" => Ok(LeaveStatus::Rejected),
            _ => Err(DomainError::validation(format!("unknown leave status '{}'", s.trim()))),
        }
    }
}

/// Outcome of a manager's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn outcome(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Build a `PENDING` request.
    pub fn apply(input: NewLeaveRequest, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.end_date < input.start_date {
            return Err(DomainError::validation(format!(
                "leave end date {} is before start date {}",
                input.end_date, input.start_date
            )));
        }
        let reason = input.reason.trim().to_string();
        if reason.is_empty() {
            return Err(DomainError::validation("leave reason cannot be empty"));
        }
        if input.employee_id == input.manager_id {
            return Err(DomainError::invariant("an employee cannot approve their own leave"));
        }

        Ok(Self {
            id: LeaveRequestId::new(0),
            employee_id: input.employee_id,
            manager_id: input.manager_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            reason,
            status: LeaveStatus::Pending,
            created_at: now,
            updated_at: None,
        })
    }

    /// Inclusive length in days.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Move `PENDING` to the decided state. Terminal requests are never re-decided.
    pub fn decide(&mut self, decision: Decision, now: DateTime<Utc>) -> DomainResult<LeaveStatus> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant("leave request already decided"));
        }
        self.status = decision.outcome();
        self.updated_at = Some(now);
        Ok(self.status)
    }

    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<LeaveStatus> {
        self.decide(Decision::Approve, now)
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<LeaveStatus> {
        self.decide(Decision::Reject, now)
    }
}

impl Entity for LeaveRequest {
    type Id = LeaveRequestId;

    fn id(&self) -> LeaveRequestId {
        self.id
    }

    fn assign_id(&mut self, id: LeaveRequestId) {
        self.id = id;
    }
}
