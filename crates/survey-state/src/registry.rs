//! Per-answer registry producing one machine instance per answer id

use crate::machine::AnswerStateMachine;
use crate::status::AnswerStatus;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Registry handing out one [`AnswerStateMachine`] per answer id.
///
/// Access to a given machine is serialized through its mutex; the registry
/// itself is safe to share between callers.
#[derive(Debug, Default)]
pub struct AnswerStateMachineRegistry {
    machines: DashMap<Uuid, Arc<Mutex<AnswerStateMachine>>>,
}

impl AnswerStateMachineRegistry {
    /// Create an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the machine for `answer_id`, creating it at `initial_state` with
    /// the given actor on first use.
    ///
    /// `initial_state` and `actor` are ignored when the machine already
    /// exists; the live instance wins.
    pub fn get_or_create(
        &self,
        answer_id: Uuid,
        initial_state: AnswerStatus,
        actor: Option<&str>,
    ) -> Arc<Mutex<AnswerStateMachine>> {
        let entry = self.machines.entry(answer_id).or_insert_with(|| {
            debug!(%answer_id, state = %initial_state, "creating state machine");
            let mut machine = AnswerStateMachine::new(answer_id, initial_state);
            if let Some(actor) = actor {
                machine.set_actor(actor);
            }
            Arc::new(Mutex::new(machine))
        });
        Arc::clone(entry.value())
    }

    /// Look up the machine for `answer_id` without creating one.
    #[must_use]
    pub fn get(&self, answer_id: Uuid) -> Option<Arc<Mutex<AnswerStateMachine>>> {
        self.machines
            .get(&answer_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the machine for `answer_id`, e.g. when its session closes.
    pub fn remove(&self, answer_id: Uuid) {
        self.machines.remove(&answer_id);
    }

    /// Number of live machines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether the registry holds no machines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::AnswerTrigger;

    #[test]
    fn same_answer_id_yields_same_machine() {
        let registry = AnswerStateMachineRegistry::new();
        let answer_id = Uuid::new_v4();

        let first = registry.get_or_create(answer_id, AnswerStatus::Unfinished, None);
        first.lock().fire(AnswerTrigger::Complete, None);

        let second = registry.get_or_create(answer_id, AnswerStatus::Unfinished, None);
        assert_eq!(second.lock().current_state(), AnswerStatus::Pending);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_answers_get_distinct_machines() {
        let registry = AnswerStateMachineRegistry::new();
        let a = registry.get_or_create(Uuid::new_v4(), AnswerStatus::Unfinished, None);
        let b = registry.get_or_create(Uuid::new_v4(), AnswerStatus::Pending, None);

        a.lock().fire(AnswerTrigger::Cancel, None);
        assert_eq!(b.lock().current_state(), AnswerStatus::Pending);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_forgets_the_machine() {
        let registry = AnswerStateMachineRegistry::new();
        let answer_id = Uuid::new_v4();
        registry.get_or_create(answer_id, AnswerStatus::Unfinished, Some("alex"));

        registry.remove(answer_id);
        assert!(registry.get(answer_id).is_none());
        assert!(registry.is_empty());
    }
}
