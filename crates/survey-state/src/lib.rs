//! Survey State - Answer lifecycle state machine
//!
//! Guards every status change to an answer session behind an explicit
//! transition table and records an auditable trail:
//! - Legal transitions only (invalid triggers are a routine `false`, not a fault)
//! - Append-only transition history per answer
//! - Per-answer registry for one machine instance per answer id
//!
//! # Example
//!
//! ```rust
//! use survey_state::{AnswerStateMachine, AnswerStatus, AnswerTrigger};
//! use uuid::Uuid;
//!
//! let mut machine = AnswerStateMachine::new(Uuid::new_v4(), AnswerStatus::Unfinished);
//! assert!(machine.fire(AnswerTrigger::Complete, None));
//! assert_eq!(machine.current_state(), AnswerStatus::Pending);
//! assert_eq!(machine.history().len(), 1);
//! ```

pub mod history;
pub mod machine;
pub mod registry;
pub mod status;

pub use history::StateTransitionHistory;
pub use machine::AnswerStateMachine;
pub use registry::AnswerStateMachineRegistry;
pub use status::{permitted_transitions, transition_target, AnswerStatus, AnswerTrigger};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
