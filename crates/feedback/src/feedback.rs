use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult, EmployeeId, Entity, FeedbackId};

/// Scores carry no upper bound; only negative values are rejected.
pub const MIN_SCORE: i32 = 0;

/// Mutable part of a feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackInput {
    pub sprint: String,
    pub score: i32,
    pub comments: Option<String>,
}

impl FeedbackInput {
    fn validate(self) -> DomainResult<Self> {
        let sprint = self.sprint.trim().to_string();
        if sprint.is_empty() {
            return Err(DomainError::validation("sprint cannot be empty"));
        }
        if self.score < MIN_SCORE {
            return Err(DomainError::validation(format!("score {} is negative", self.score)));
        }
        Ok(Self {
            sprint,
            score: self.score,
            comments: self.comments.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceFeedback {
    pub id: FeedbackId,
    pub manager_id: EmployeeId,
    pub employee_id: EmployeeId,
    pub sprint: String,
    pub score: i32,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PerformanceFeedback {
    pub fn new(
        manager_id: EmployeeId,
        employee_id: EmployeeId,
        input: FeedbackInput,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if manager_id == employee_id {
            return Err(DomainError::invariant("a manager cannot review themselves"));
        }
        let input = input.validate()?;
        Ok(Self {
            id: FeedbackId::new(0),
            manager_id,
            employee_id,
            sprint: input.sprint,
            score: input.score,
            comments: input.comments,
            created_at: now,
            updated_at: None,
        })
    }

    /// Overwrite sprint, score and comments.
    pub fn revise(&mut self, input: FeedbackInput, now: DateTime<Utc>) -> DomainResult<()> {
        let input = input.validate()?;
        self.sprint = input.sprint;
        self.score = input.score;
        self.comments = input.comments;
        self.updated_at = Some(now);
        Ok(())
    }

    pub fn is_for_sprint(&self, sprint: &str) -> bool {
        self.sprint == sprint.trim()
    }
}

impl Entity for PerformanceFeedback {
    type Id = FeedbackId;

    fn id(&self) -> FeedbackId {
        self.id
    }

    fn assign_id(&mut self, id: FeedbackId) {
        self.id = id;
    }
}
