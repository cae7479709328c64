//! Nodes of the command history tree

use crate::command::UndoableCommand;
use std::fmt;
use std::sync::Arc;

/// Identifier of a node in the history tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryNodeId(pub(crate) u64);

/// One executed command in the history tree.
///
/// The parent link is `None` only for the root. Multiple children indicate
/// branching; at most one child is active at any time.
pub struct CommandHistoryNode {
    pub(crate) command: Arc<dyn UndoableCommand>,
    pub(crate) parent: Option<HistoryNodeId>,
    pub(crate) children: Vec<HistoryNodeId>,
    pub(crate) is_active: bool,
}

impl CommandHistoryNode {
    pub(crate) fn new(command: Arc<dyn UndoableCommand>, parent: Option<HistoryNodeId>) -> Self {
        Self {
            command,
            parent,
            children: Vec::new(),
            is_active: true,
        }
    }

    /// The command this node wraps
    #[inline]
    #[must_use]
    pub fn command(&self) -> &Arc<dyn UndoableCommand> {
        &self.command
    }

    /// The node for the command executed before this one (`None` for the
    /// root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<HistoryNodeId> {
        self.parent
    }

    /// Nodes for commands executed after this one, in execution order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[HistoryNodeId] {
        &self.children
    }

    /// Whether this node lies on the currently reachable redo path
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl fmt::Debug for CommandHistoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistoryNode")
            .field("command", &self.command.description())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("is_active", &self.is_active)
            .finish()
    }
}
