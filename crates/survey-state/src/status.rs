//! Answer statuses, triggers, and the transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an answer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerStatus {
    /// Respondent is still working on the survey
    Unfinished,
    /// Submitted and awaiting review
    Pending,
    /// Approved; terminal
    Completed,
    /// Abandoned; terminal
    Cancelled,
}

impl AnswerStatus {
    /// Whether this status has no outgoing transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        permitted_transitions(self).is_empty()
    }
}

impl fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Trigger that may cause a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerTrigger {
    /// Start working on the survey; present in the vocabulary but never
    /// permitted by the table
    Start,
    /// Submit the survey for review (Unfinished -> Pending)
    Complete,
    /// Approve a pending survey (Pending -> Completed)
    Approve,
    /// Reject a pending survey, sending it back (Pending -> Unfinished)
    Reject,
    /// Cancel the survey (Unfinished/Pending -> Cancelled)
    Cancel,
}

impl fmt::Display for AnswerTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Permitted transitions from a status, as `(trigger, target)` pairs.
///
/// Terminal statuses return an empty slice.
#[must_use]
pub fn permitted_transitions(from: AnswerStatus) -> &'static [(AnswerTrigger, AnswerStatus)] {
    use AnswerStatus::{Cancelled, Completed, Pending, Unfinished};
    use AnswerTrigger::{Approve, Cancel, Complete, Reject};
    match from {
        Unfinished => &[(Complete, Pending), (Cancel, Cancelled)],
        Pending => &[
            (Approve, Completed),
            (Reject, Unfinished),
            (Cancel, Cancelled),
        ],
        Completed | Cancelled => &[],
    }
}

/// Target status for firing `trigger` from `from`, or `None` if not permitted.
#[must_use]
pub fn transition_target(from: AnswerStatus, trigger: AnswerTrigger) -> Option<AnswerStatus> {
    permitted_transitions(from)
        .iter()
        .find(|(t, _)| *t == trigger)
        .map(|(_, to)| *to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_lifecycle() {
        assert_eq!(
            transition_target(AnswerStatus::Unfinished, AnswerTrigger::Complete),
            Some(AnswerStatus::Pending)
        );
        assert_eq!(
            transition_target(AnswerStatus::Unfinished, AnswerTrigger::Cancel),
            Some(AnswerStatus::Cancelled)
        );
        assert_eq!(
            transition_target(AnswerStatus::Pending, AnswerTrigger::Approve),
            Some(AnswerStatus::Completed)
        );
        assert_eq!(
            transition_target(AnswerStatus::Pending, AnswerTrigger::Reject),
            Some(AnswerStatus::Unfinished)
        );
        assert_eq!(
            transition_target(AnswerStatus::Pending, AnswerTrigger::Cancel),
            Some(AnswerStatus::Cancelled)
        );
    }

    #[test]
    fn terminal_states_permit_nothing() {
        assert!(permitted_transitions(AnswerStatus::Completed).is_empty());
        assert!(permitted_transitions(AnswerStatus::Cancelled).is_empty());
        assert!(AnswerStatus::Completed.is_terminal());
        assert!(AnswerStatus::Cancelled.is_terminal());
        assert!(!AnswerStatus::Unfinished.is_terminal());
    }

    #[test]
    fn start_is_never_permitted() {
        for from in [
            AnswerStatus::Unfinished,
            AnswerStatus::Pending,
            AnswerStatus::Completed,
            AnswerStatus::Cancelled,
        ] {
            assert_eq!(transition_target(from, AnswerTrigger::Start), None);
        }
    }
}
