//! Audit records for answer status transitions

use crate::status::{AnswerStatus, AnswerTrigger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One state transition in an answer's lifecycle.
///
/// Created once per successful transition and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransitionHistory {
    /// Unique identifier for this transition
    pub id: Uuid,
    /// The answer this transition belongs to
    pub answer_id: Uuid,
    /// Status before the transition
    pub from_state: AnswerStatus,
    /// Status after the transition
    pub to_state: AnswerStatus,
    /// Trigger that caused the transition
    pub trigger: AnswerTrigger,
    /// When the transition occurred (UTC)
    pub transitioned_at: DateTime<Utc>,
    /// Actor who triggered the transition, if known
    pub transitioned_by: Option<String>,
    /// Optional notes or reason for the transition
    pub notes: Option<String>,
}

impl StateTransitionHistory {
    /// Create a record stamped with a fresh id and the current UTC time.
    #[must_use]
    pub fn new(
        answer_id: Uuid,
        from_state: AnswerStatus,
        to_state: AnswerStatus,
        trigger: AnswerTrigger,
        transitioned_by: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            answer_id,
            from_state,
            to_state,
            trigger,
            transitioned_at: Utc::now(),
            transitioned_by,
            notes,
        }
    }
}
