//! Per-answer state machine enforcing the transition table

use crate::history::StateTransitionHistory;
use crate::status::{permitted_transitions, transition_target, AnswerStatus, AnswerTrigger};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// State machine for one answer session.
///
/// Owns exactly one answer id, the current status, and an append-only
/// transition history. Replaying the history from its first entry's
/// `from_state` always reconstructs the current status.
#[derive(Debug)]
pub struct AnswerStateMachine {
    answer_id: Uuid,
    current: AnswerStatus,
    actor: Option<String>,
    history: Vec<StateTransitionHistory>,
}

impl AnswerStateMachine {
    /// Create a machine for `answer_id` starting at `initial_state`.
    ///
    /// The initial state need not be `Unfinished`; a machine may be
    /// rehydrated mid-lifecycle from a persisted status.
    #[must_use]
    pub fn new(answer_id: Uuid, initial_state: AnswerStatus) -> Self {
        info!(%answer_id, state = %initial_state, "answer state machine initialized");
        Self {
            answer_id,
            current: initial_state,
            actor: None,
            history: Vec::new(),
        }
    }

    /// The answer this machine is managing
    #[inline]
    #[must_use]
    pub fn answer_id(&self) -> Uuid {
        self.answer_id
    }

    /// Current status of the answer
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> AnswerStatus {
        self.current
    }

    /// Actor stamped into history records, if set
    #[inline]
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Set the actor associated with this answer session.
    pub fn set_actor(&mut self, actor: impl Into<String>) {
        self.actor = Some(actor.into());
    }

    /// Transition history, oldest first. Read-only for callers.
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[StateTransitionHistory] {
        &self.history
    }

    /// Whether `trigger` is permitted from the current status.
    #[inline]
    #[must_use]
    pub fn can_fire(&self, trigger: AnswerTrigger) -> bool {
        transition_target(self.current, trigger).is_some()
    }

    /// All triggers permitted from the current status (empty for terminal
    /// statuses).
    #[must_use]
    pub fn permitted_triggers(&self) -> Vec<AnswerTrigger> {
        permitted_transitions(self.current)
            .iter()
            .map(|(t, _)| *t)
            .collect()
    }

    /// Fire a trigger, transitioning to a new status.
    ///
    /// Returns `false` without side effects if the trigger is not permitted
    /// from the current status; an invalid transition is a routine outcome,
    /// not a fault. On success the status and the history record commit
    /// together.
    pub fn fire(&mut self, trigger: AnswerTrigger, notes: Option<&str>) -> bool {
        let from = self.current;

        let Some(to) = transition_target(from, trigger) else {
            warn!(
                answer_id = %self.answer_id,
                %trigger,
                state = %from,
                "invalid transition: trigger not permitted from state"
            );
            return false;
        };

        let record = StateTransitionHistory::new(
            self.answer_id,
            from,
            to,
            trigger,
            self.actor.clone(),
            notes.map(str::to_string),
        );

        debug!(answer_id = %self.answer_id, state = %from, "exiting state");
        self.current = to;
        self.history.push(record);
        debug!(answer_id = %self.answer_id, state = %to, "entering state");

        info!(
            answer_id = %self.answer_id,
            from = %from,
            to = %to,
            %trigger,
            "state transition"
        );
        true
    }

    /// Human-readable description of the current status and permitted
    /// triggers, for display.
    #[must_use]
    pub fn state_description(&self) -> String {
        let permitted = self
            .permitted_triggers()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Current: {}, Permitted: [{permitted}]", self.current)
    }
}
