//! Leave workflow: apply, decide, query.

use tracing::{debug, info};

use worksphere_auth::Permission;
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind, LeaveRequestId};
use worksphere_events::Event;
use worksphere_infra::{EntityStore, Notification};
use worksphere_leave::{
    Decision, LeaveApplied, LeaveDecided, LeaveEvent, LeaveRequest, LeaveStatus, NewLeaveRequest,
};

use crate::app::dto::{ApplyLeaveRequest, LeaveView};
use crate::app::services::Services;
use crate::authz::{Scope, out_of_scope};
use crate::context::RequestContext;

impl Services {
    fn leave(&self, id: LeaveRequestId) -> DomainResult<LeaveRequest> {
        self.stores
            .leaves
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::LeaveRequest))
    }

    /// File a PENDING request and notify the approving manager.
    ///
    /// The requester defaults to the caller; only HR/Admin may file on behalf
    /// of someone else. The manager defaults to the requester's current one.
    pub fn apply_for_leave(&self, ctx: &RequestContext, req: ApplyLeaveRequest) -> DomainResult<LeaveView> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveApply)?;
        let requester = match (req.employee_id, scope) {
            (Some(id), Scope::All) => self.employee(id)?,
            (Some(id), _) => {
                let me = self.current_employee(ctx)?;
                if me.id != id {
                    return Err(DomainError::forbidden("leave can only be requested for yourself"));
                }
                me
            }
            (None, _) => self.current_employee(ctx)?,
        };

        let manager_id = match req.manager_id {
            Some(m) => {
                if requester.manager_id != Some(m) {
                    debug!(employee = %requester.code, requested = %m, current = ?requester.manager_id,
                        "leave routed to a manager other than the current one");
                }
                m
            }
            None => requester.manager_id.ok_or(DomainError::NotFound(EntityKind::Manager))?,
        };
        let manager = self.manager(manager_id)?;

        let leave = LeaveRequest::apply(
            NewLeaveRequest {
                employee_id: requester.id,
                manager_id: manager.id,
                leave_type: req.leave_type,
                start_date: req.start_date,
                end_date: req.end_date,
                reason: req.reason,
            },
            Self::now(),
        )?;
        let saved = self.stores.leaves.save(leave)?;
        info!(leave_id = %saved.id, employee = %requester.code, manager = %manager.code, "leave applied");

        let event = LeaveEvent::Applied(LeaveApplied {
            leave_id: saved.id,
            employee_id: requester.id,
            manager_id: manager.id,
            leave_type: saved.leave_type,
            occurred_at: saved.created_at,
        });
        let message = format!(
            "Notification sent to manager {} about leave request from {}",
            manager.full_name(),
            requester.full_name()
        );
        self.notify_leave(&event, manager.full_name(), message);

        self.leave_view(saved)
    }

    pub fn approve_leave(&self, ctx: &RequestContext, id: LeaveRequestId) -> DomainResult<LeaveView> {
        self.decide_leave(ctx, id, Decision::Approve)
    }

    pub fn reject_leave(&self, ctx: &RequestContext, id: LeaveRequestId) -> DomainResult<LeaveView> {
        self.decide_leave(ctx, id, Decision::Reject)
    }

    fn decide_leave(&self, ctx: &RequestContext, id: LeaveRequestId, decision: Decision) -> DomainResult<LeaveView> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveDecide)?;
        let mut leave = self.leave(id)?;
        match scope {
            Scope::All => {}
            Scope::Managed(m) if leave.manager_id == m => {}
            _ => return Err(out_of_scope(&format!("leave request {id}"))),
        }

        let status = leave.decide(decision, Self::now())?;
        let saved = self.stores.leaves.save(leave)?;
        info!(leave_id = %saved.id, %status, decided_by = ctx.username(), "leave decided");

        let employee_name = self.full_name_of(saved.employee_id)?.unwrap_or_default();
        let event = LeaveEvent::Decided(LeaveDecided {
            leave_id: saved.id,
            employee_id: saved.employee_id,
            manager_id: saved.manager_id,
            status,
            occurred_at: saved.updated_at.unwrap_or(saved.created_at),
        });
        let message = format!("Notification sent to employee {employee_name} about leave request status: {status}");
        self.notify_leave(&event, employee_name, message);

        self.leave_view(saved)
    }

    pub fn get_leave(&self, ctx: &RequestContext, id: LeaveRequestId) -> DomainResult<LeaveView> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveRead)?;
        let leave = self.leave(id)?;
        if !scope.covers_leave(&leave) {
            return Err(out_of_scope(&format!("leave request {id}")));
        }
        self.leave_view(leave)
    }

    pub fn delete_leave(&self, ctx: &RequestContext, id: LeaveRequestId) -> DomainResult<()> {
        self.require_all(ctx, Permission::LeaveDelete)?;
        let leave = self.leave(id)?;
        self.stores.leaves.delete(leave.id)?;
        info!(leave_id = %id, deleted_by = ctx.username(), "leave deleted");
        Ok(())
    }

    pub fn leaves_by_employee(&self, ctx: &RequestContext, employee_id: EmployeeId) -> DomainResult<Vec<LeaveView>> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveRead)?;
        self.scoped_employee(scope, employee_id)?;
        self.leave_views(&|l: &LeaveRequest| l.employee_id == employee_id)
    }

    pub fn my_leaves(&self, ctx: &RequestContext) -> DomainResult<Vec<LeaveView>> {
        self.require(ctx, Permission::LeaveRead)?;
        let me = self.current_employee(ctx)?.id;
        self.leave_views(&|l: &LeaveRequest| l.employee_id == me)
    }

    /// Requests routed to a manager (default: the caller), optionally
    /// filtered by status.
    pub fn leaves_by_manager(
        &self,
        ctx: &RequestContext,
        manager_id: Option<EmployeeId>,
        status: Option<LeaveStatus>,
    ) -> DomainResult<Vec<LeaveView>> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveRead)?;
        let manager_id = match (scope, manager_id) {
            (Scope::All, Some(m)) => self.manager(m)?.id,
            (Scope::Managed(me), None) => me,
            (Scope::Managed(me), Some(m)) if m == me => me,
            (Scope::All, None) => self.current_employee(ctx)?.id,
            _ => return Err(DomainError::forbidden("leave queues are visible to their manager and HR only")),
        };
        self.leave_views(&|l: &LeaveRequest| l.manager_id == manager_id && status.is_none_or(|s| l.status == s))
    }

    /// The caller's approval queue: every PENDING request for HR/Admin, the
    /// ones routed to them for a manager.
    pub fn pending_leaves(&self, ctx: &RequestContext) -> DomainResult<Vec<LeaveView>> {
        let scope = self.authorize_scoped(ctx, Permission::LeaveDecide)?;
        match scope {
            Scope::All => self.leave_views(&|l: &LeaveRequest| l.status == LeaveStatus::Pending),
            Scope::Managed(m) => {
                self.leave_views(&|l: &LeaveRequest| l.manager_id == m && l.status == LeaveStatus::Pending)
            }
            _ => Err(DomainError::forbidden("no approval queue for this role")),
        }
    }

    fn notify_leave(&self, event: &LeaveEvent, recipient_name: String, message: String) {
        self.publish(Notification {
            recipient: event.recipient(),
            recipient_name,
            topic: event.event_type(),
            message,
            occurred_at: event.occurred_at(),
        });
    }

    fn leave_views(&self, predicate: &dyn Fn(&LeaveRequest) -> bool) -> DomainResult<Vec<LeaveView>> {
        self.stores
            .leaves
            .find_where(predicate)?
            .into_iter()
            .map(|l| self.leave_view(l))
            .collect()
    }

    fn leave_view(&self, l: LeaveRequest) -> DomainResult<LeaveView> {
        Ok(LeaveView {
            employee_name: self.full_name_of(l.employee_id)?,
            manager_name: self.full_name_of(l.manager_id)?,
            days: l.days(),
            id: l.id,
            employee_id: l.employee_id,
            manager_id: l.manager_id,
            leave_type: l.leave_type,
            start_date: l.start_date,
            end_date: l.end_date,
            reason: l.reason,
            status: l.status,
            created_at: l.created_at,
            updated_at: l.updated_at,
        })
    }
}
