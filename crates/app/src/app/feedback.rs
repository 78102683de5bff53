use tracing::info;

use worksphere_auth::Permission;
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind, FeedbackId};
use worksphere_feedback::{FeedbackInput, PerformanceFeedback};
use worksphere_infra::EntityStore;

use crate::app::dto::{CreateFeedbackRequest, FeedbackView};
use crate::app::services::Services;
use crate::authz::{Scope, out_of_scope};
use crate::context::RequestContext;

impl Services {
    fn feedback_entry(&self, id: FeedbackId) -> DomainResult<PerformanceFeedback> {
        self.stores
            .feedback
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::Feedback))
    }

    /// Entry by id for a write: a manager may only touch entries they wrote.
    fn owned_feedback(&self, scope: Scope, id: FeedbackId) -> DomainResult<PerformanceFeedback> {
        let entry = self.feedback_entry(id)?;
        match scope {
            Scope::All => Ok(entry),
            Scope::Managed(m) if entry.manager_id == m => Ok(entry),
            _ => Err(out_of_scope(&format!("feedback {id}"))),
        }
    }

    /// Record sprint feedback. A manager writes as themselves and only for
    /// direct reports; HR/Admin must name the manager.
    pub fn create_feedback(&self, ctx: &RequestContext, req: CreateFeedbackRequest) -> DomainResult<FeedbackView> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackWrite)?;
        let manager_id = match (scope, req.manager_id) {
            (Scope::Managed(me), None) => me,
            (Scope::Managed(me), Some(m)) if m == me => me,
            (Scope::Managed(_), Some(_)) => {
                return Err(DomainError::forbidden("feedback can only be written under your own name"));
            }
            (_, Some(m)) => m,
            (_, None) => return Err(DomainError::validation("manager id is required")),
        };
        let manager = self.manager(manager_id)?;
        let employee = self.employee(req.employee_id)?;
        if matches!(scope, Scope::Managed(_)) && !employee.reports_to(manager.id) {
            return Err(out_of_scope(&format!("employee {}", employee.code)));
        }

        let entry = PerformanceFeedback::new(manager.id, employee.id, req.input, Self::now())?;
        let saved = self.stores.feedback.save(entry)?;
        info!(feedback_id = %saved.id, manager = %manager.code, employee = %employee.code, sprint = %saved.sprint, "feedback recorded");
        self.feedback_view(saved)
    }

    pub fn update_feedback(&self, ctx: &RequestContext, id: FeedbackId, input: FeedbackInput) -> DomainResult<FeedbackView> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackWrite)?;
        let mut entry = self.owned_feedback(scope, id)?;
        entry.revise(input, Self::now())?;
        let saved = self.stores.feedback.save(entry)?;
        info!(feedback_id = %saved.id, updated_by = ctx.username(), "feedback revised");
        self.feedback_view(saved)
    }

    pub fn delete_feedback(&self, ctx: &RequestContext, id: FeedbackId) -> DomainResult<()> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackDelete)?;
        let entry = self.owned_feedback(scope, id)?;
        self.stores.feedback.delete(entry.id)?;
        info!(feedback_id = %id, deleted_by = ctx.username(), "feedback deleted");
        Ok(())
    }

    pub fn get_feedback(&self, ctx: &RequestContext, id: FeedbackId) -> DomainResult<FeedbackView> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackRead)?;
        let entry = self.feedback_entry(id)?;
        if !scope.covers_feedback(&entry) {
            return Err(out_of_scope(&format!("feedback {id}")));
        }
        self.feedback_view(entry)
    }

    pub fn feedback_by_employee(&self, ctx: &RequestContext, employee_id: EmployeeId) -> DomainResult<Vec<FeedbackView>> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackRead)?;
        self.scoped_employee(scope, employee_id)?;
        self.feedback_views(&|f: &PerformanceFeedback| f.employee_id == employee_id && scope.covers_feedback(f))
    }

    /// Entries written by a manager (default: the caller).
    pub fn feedback_by_manager(
        &self,
        ctx: &RequestContext,
        manager_id: Option<EmployeeId>,
    ) -> DomainResult<Vec<FeedbackView>> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackRead)?;
        let manager_id = match (scope, manager_id) {
            (Scope::All, Some(m)) => self.manager(m)?.id,
            (Scope::Managed(me), None) => me,
            (Scope::Managed(me), Some(m)) if m == me => me,
            (Scope::All, None) => self.current_employee(ctx)?.id,
            _ => return Err(DomainError::forbidden("feedback by manager is visible to that manager and HR only")),
        };
        self.feedback_views(&|f: &PerformanceFeedback| f.manager_id == manager_id)
    }

    pub fn feedback_by_sprint(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
        sprint: &str,
    ) -> DomainResult<Vec<FeedbackView>> {
        let scope = self.authorize_scoped(ctx, Permission::FeedbackRead)?;
        self.scoped_employee(scope, employee_id)?;
        self.feedback_views(&|f: &PerformanceFeedback| {
            f.employee_id == employee_id && f.is_for_sprint(sprint) && scope.covers_feedback(f)
        })
    }

    pub fn my_feedback(&self, ctx: &RequestContext) -> DomainResult<Vec<FeedbackView>> {
        self.require(ctx, Permission::FeedbackRead)?;
        let me = self.current_employee(ctx)?.id;
        self.feedback_views(&|f: &PerformanceFeedback| f.employee_id == me)
    }

    fn feedback_views(&self, predicate: &dyn Fn(&PerformanceFeedback) -> bool) -> DomainResult<Vec<FeedbackView>> {
        self.stores
            .feedback
            .find_where(predicate)?
            .into_iter()
            .map(|f| self.feedback_view(f))
            .collect()
    }

    fn feedback_view(&self, f: PerformanceFeedback) -> DomainResult<FeedbackView> {
        Ok(FeedbackView {
            manager_name: self.full_name_of(f.manager_id)?,
            employee_name: self.full_name_of(f.employee_id)?,
            id: f.id,
            manager_id: f.manager_id,
            employee_id: f.employee_id,
            sprint: f.sprint,
            score: f.score,
            comments: f.comments,
            created_at: f.created_at,
            updated_at: f.updated_at,
        })
    }
}
