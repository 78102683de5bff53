//! Performance feedback ledger: per-sprint scores a manager records for a
//! direct report.

pub mod feedback;

pub use feedback::{FeedbackInput, MIN_SCORE, PerformanceFeedback};
