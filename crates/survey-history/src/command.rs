//! The reversible command capability

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A command that can be executed, undone, and redone.
///
/// Implementations live in the hosting application (e.g. add/delete
/// question operations backed by API calls). The operations may perform
/// asynchronous work of their own; the history manager only awaits them.
/// Failures are reported through `Result` and converted to boolean
/// outcomes by the manager.
#[async_trait]
pub trait UndoableCommand: Send + Sync {
    /// Unique identifier for this command
    fn id(&self) -> Uuid;

    /// Human-readable description of what the command does
    fn description(&self) -> &str;

    /// When this command was executed
    fn executed_at(&self) -> DateTime<Utc>;

    /// Apply the command's effect.
    async fn execute(&self) -> anyhow::Result<()>;

    /// Revert the command's effect.
    async fn undo(&self) -> anyhow::Result<()>;

    /// Re-apply the command after an undo.
    async fn redo(&self) -> anyhow::Result<()>;
}

/// Undo/redo availability published after every history change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoRedoAvailability {
    /// Whether a command is available to undo
    pub can_undo: bool,
    /// Whether a command is available to redo
    pub can_redo: bool,
}
