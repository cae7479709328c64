//! Command history manager with branching undo/redo

use crate::command::{UndoRedoAvailability, UndoableCommand};
use crate::node::{CommandHistoryNode, HistoryNodeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Default bound on the depth of the reachable root-to-current path.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Undo/redo engine over a tree of executed commands.
///
/// The tree is rooted at the first-ever executed command; one current
/// pointer marks the position in history (`None` when history is empty).
/// Executing a new command while not positioned at a leaf branches the
/// tree: the old forward path is deactivated but kept for inspection.
///
/// Single-writer: execute/undo/redo mutate the current pointer and tree
/// and are expected to be called from one sequential control flow.
#[derive(Debug)]
pub struct CommandHistoryManager {
    nodes: HashMap<HistoryNodeId, CommandHistoryNode>,
    root: Option<HistoryNodeId>,
    current: Option<HistoryNodeId>,
    next_id: u64,
    max_depth: usize,
    availability_tx: watch::Sender<UndoRedoAvailability>,
}

impl CommandHistoryManager {
    /// Create a manager bounded by [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a manager bounded by `max_depth` steps of reachable history.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        let (availability_tx, _) = watch::channel(UndoRedoAvailability::default());
        Self {
            nodes: HashMap::new(),
            root: None,
            current: None,
            next_id: 0,
            max_depth,
            availability_tx,
        }
    }

    /// Whether a command is available to undo
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current.is_some()
    }

    /// Whether a command is available to redo
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.current
            .map(|id| self.active_children(id).next().is_some())
            .unwrap_or(false)
    }

    /// Subscribe to undo/redo availability changes.
    ///
    /// The channel holds the latest availability; a new value is published
    /// after every successful execute/undo/redo and after `clear`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UndoRedoAvailability> {
        self.availability_tx.subscribe()
    }

    /// Node id of the current position, `None` when history is empty
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<HistoryNodeId> {
        self.current
    }

    /// Root of the full history tree, including inactive branches
    #[inline]
    #[must_use]
    pub fn history_graph(&self) -> Option<HistoryNodeId> {
        self.root
    }

    /// Look up a node for inspection or visualization.
    #[must_use]
    pub fn node(&self, id: HistoryNodeId) -> Option<&CommandHistoryNode> {
        self.nodes.get(&id)
    }

    /// Execute `command` and record it in the history.
    ///
    /// Returns `false` with the history unchanged when the command's
    /// execute fails. On success the node becomes the new current position;
    /// executing away from a leaf deactivates the entire old forward
    /// subtree first.
    pub async fn execute(&mut self, command: Arc<dyn UndoableCommand>) -> bool {
        info!(description = command.description(), "executing command");

        if let Err(fault) = command.execute().await {
            error!(
                description = command.description(),
                %fault,
                "command execution failed"
            );
            return false;
        }

        let id = self.allocate(Arc::clone(&command), self.current);
        match self.current {
            None => {
                // First command, or history was undone past the root: the
                // node becomes both root and current and any detached old
                // tree is dropped.
                self.nodes.retain(|node_id, _| *node_id == id);
                self.root = Some(id);
                self.current = Some(id);
            }
            Some(current_id) => {
                let stale: Vec<HistoryNodeId> = self.active_children(current_id).collect();
                for child in stale {
                    self.deactivate_branch(child);
                }
                if let Some(node) = self.nodes.get_mut(&current_id) {
                    node.children.push(id);
                }
                self.current = Some(id);
            }
        }

        self.trim();
        self.notify();

        info!(description = command.description(), "command executed");
        true
    }

    /// Undo the current command and move back in history.
    ///
    /// Returns `false` with history unchanged when nothing is undoable or
    /// the command's undo fails.
    pub async fn undo(&mut self) -> bool {
        let Some(current_id) = self.current else {
            warn!("cannot undo: no command to undo");
            return false;
        };

        let command = Arc::clone(&self.nodes[&current_id].command);
        info!(description = command.description(), "undoing command");

        if let Err(fault) = command.undo().await {
            error!(
                description = command.description(),
                %fault,
                "command undo failed"
            );
            return false;
        }

        self.current = self.nodes[&current_id].parent;
        self.notify();

        info!("command undone");
        true
    }

    /// Redo the active child of the current position.
    ///
    /// Returns `false` with history unchanged when no active child exists
    /// or the command's redo fails.
    pub async fn redo(&mut self) -> bool {
        let Some(current_id) = self.current else {
            warn!("cannot redo: no command to redo");
            return false;
        };

        let active: Vec<HistoryNodeId> = self.active_children(current_id).collect();
        debug_assert!(
            active.len() <= 1,
            "history invariant violated: {} active children under one node",
            active.len()
        );
        let Some(next_id) = active.first().copied() else {
            warn!("cannot redo: no active child");
            return false;
        };

        let command = Arc::clone(&self.nodes[&next_id].command);
        info!(description = command.description(), "redoing command");

        if let Err(fault) = command.redo().await {
            error!(
                description = command.description(),
                %fault,
                "command redo failed"
            );
            return false;
        }

        self.current = Some(next_id);
        self.notify();

        info!("command redone");
        true
    }

    /// Drop the entire tree and reset the current position.
    ///
    /// A hard reset: nothing is undone.
    pub fn clear(&mut self) {
        info!("clearing command history");
        self.nodes.clear();
        self.root = None;
        self.current = None;
        self.notify();
    }

    /// The currently applied commands, oldest first (root-to-current path).
    #[must_use]
    pub fn history(&self) -> Vec<Arc<dyn UndoableCommand>> {
        let mut commands = Vec::new();
        let mut cursor = self.current;
        while let Some(id) = cursor {
            let node = &self.nodes[&id];
            commands.push(Arc::clone(&node.command));
            cursor = node.parent;
        }
        commands.reverse();
        commands
    }

    fn allocate(
        &mut self,
        command: Arc<dyn UndoableCommand>,
        parent: Option<HistoryNodeId>,
    ) -> HistoryNodeId {
        let id = HistoryNodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, CommandHistoryNode::new(command, parent));
        id
    }

    fn active_children(&self, id: HistoryNodeId) -> impl Iterator<Item = HistoryNodeId> + '_ {
        self.nodes[&id]
            .children
            .iter()
            .copied()
            .filter(|child| self.nodes[child].is_active)
    }

    /// Mark `id` and all its descendants inactive.
    fn deactivate_branch(&mut self, id: HistoryNodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.is_active = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Bound the reachable path by dropping everything more than
    /// `max_depth` steps above current, along with its unreachable
    /// siblings.
    fn trim(&mut self) {
        let depth = self.depth_of(self.current);
        if depth <= self.max_depth {
            return;
        }

        debug!(depth, max_depth = self.max_depth, "trimming history");

        let mut cursor = self.current;
        for _ in 0..self.max_depth {
            cursor = cursor.and_then(|id| self.nodes[&id].parent);
        }
        let Some(new_root) = cursor else { return };
        if self.nodes[&new_root].parent.is_none() {
            return;
        }

        let keep = self.subtree(new_root);
        let Some(old_root) = self.root else { return };
        let dropped: Vec<HistoryNodeId> = self
            .subtree(old_root)
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in dropped {
            self.nodes.remove(&id);
        }

        if let Some(node) = self.nodes.get_mut(&new_root) {
            node.parent = None;
        }
        self.root = Some(new_root);
    }

    /// Distance from root to `cursor`, counted in nodes.
    fn depth_of(&self, cursor: Option<HistoryNodeId>) -> usize {
        let mut depth = 0;
        let mut node = cursor;
        while let Some(id) = node {
            depth += 1;
            node = self.nodes[&id].parent;
        }
        depth
    }

    /// Every node reachable downward from `id`, itself included.
    fn subtree(&self, id: HistoryNodeId) -> HashSet<HistoryNodeId> {
        let mut members = HashSet::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if members.insert(node_id) {
                if let Some(node) = self.nodes.get(&node_id) {
                    stack.extend(node.children.iter().copied());
                }
            }
        }
        members
    }

    fn notify(&self) {
        self.availability_tx.send_replace(UndoRedoAvailability {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        });
    }
}

impl Default for CommandHistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
