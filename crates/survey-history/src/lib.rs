//! Survey History - branching undo/redo over a tree of executed commands
//!
//! Sequences reversible operations with unlimited linear undo/redo and safe
//! branching, bounded by a configurable maximum depth:
//! - Executing after an undo branches the tree; the old forward path stays
//!   inspectable but is no longer reachable via redo
//! - Command failures are routine boolean outcomes, never faults
//! - A watch channel publishes undo/redo availability for binding glue
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_history::CommandHistoryManager;
//!
//! # async fn example(command: std::sync::Arc<dyn survey_history::UndoableCommand>) {
//! let mut manager = CommandHistoryManager::new();
//! assert!(manager.execute(command).await);
//! assert!(manager.can_undo());
//! assert!(manager.undo().await);
//! # }
//! ```

pub mod command;
pub mod manager;
pub mod node;

pub use command::{UndoRedoAvailability, UndoableCommand};
pub use manager::{CommandHistoryManager, DEFAULT_MAX_DEPTH};
pub use node::{CommandHistoryNode, HistoryNodeId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
