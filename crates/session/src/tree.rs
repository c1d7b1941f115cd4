//! Branching record of a game.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so the
//! parent link needs no shared ownership. No node stores a position: the
//! board at a node is the start position with every move and edit on the
//! root-to-node path replayed, see [`MoveTree::position_at`].

use chess_core::{Move, Position};

use crate::error::SessionError;
use crate::setup::{self, SetupEdit};

/// Handle to a node of one [`MoveTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveNode {
    /// `None` only for the root
    pub mv: Option<Move>,
    /// The board edit a null-move node stands for
    pub edit: Option<SetupEdit>,
    pub comment: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl MoveNode {
    fn new(mv: Option<Move>, edit: Option<SetupEdit>, parent: Option<NodeId>) -> Self {
        Self {
            mv,
            edit,
            comment: String::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Insertion order; index 0 is the main line.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// What a new move does to the cursor's existing children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchMode {
    /// Discard them; the new move becomes the only child.
    #[default]
    Prune,
    /// Keep them as variations. Playing a move that already exists
    /// re-enters that child instead of duplicating it.
    Keep,
}

/// Arena-backed move tree with one write cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
    cursor: NodeId,
    mode: BranchMode,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

const ROOT: NodeId = NodeId(0);

impl MoveTree {
    pub fn new() -> Self {
        Self::with_mode(BranchMode::Prune)
    }

    pub fn with_mode(mode: BranchMode) -> Self {
        Self {
            nodes: vec![MoveNode::new(None, None, None)],
            cursor: ROOT,
            mode,
        }
    }

    pub fn mode(&self) -> BranchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BranchMode) {
        self.mode = mode;
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &MoveNode {
        &self.nodes[id.0]
    }

    /// Whether `id` belongs to this tree and was not pruned.
    pub fn is_reachable(&self, id: NodeId) -> bool {
        let mut at = id;
        loop {
            if at == ROOT {
                return true;
            }
            match self.nodes.get(at.0).and_then(|n| n.parent) {
                Some(parent) => at = parent,
                None => return false,
            }
        }
    }

    /// Moves the write cursor to `id` if it is reachable.
    pub fn set_cursor(&mut self, id: NodeId) -> bool {
        if !self.is_reachable(id) {
            return false;
        }
        self.cursor = id;
        true
    }

    /// Appends `mv` below the cursor and advances to it. Legality is the
    /// caller's business.
    pub fn apply_move(&mut self, mv: Move) -> NodeId {
        self.push(mv, None)
    }

    /// Records a board edit as a null-move node.
    pub fn apply_edit(&mut self, edit: SetupEdit) -> NodeId {
        self.push(Move::NULL, Some(edit))
    }

    fn push(&mut self, mv: Move, edit: Option<SetupEdit>) -> NodeId {
        match self.mode {
            BranchMode::Prune => {
                self.truncate_future();
            }
            BranchMode::Keep => {
                let existing = self.nodes[self.cursor.0]
                    .children
                    .iter()
                    .copied()
                    .find(|&c| self.nodes[c.0].mv == Some(mv) && self.nodes[c.0].edit == edit);
                if let Some(child) = existing {
                    self.cursor = child;
                    return child;
                }
            }
        }
        let id = self.attach(self.cursor, mv, edit);
        self.cursor = id;
        id
    }

    /// Appends a child to `parent` without pruning or moving the cursor.
    /// Used to build variations, e.g. when reading a game record.
    pub fn add_child(&mut self, parent: NodeId, mv: Move) -> NodeId {
        self.attach(parent, mv, None)
    }

    fn attach(&mut self, parent: NodeId, mv: Move, edit: Option<SetupEdit>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MoveNode::new(Some(mv), edit, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Attaches an edit to an existing null-move node.
    pub fn set_edit(&mut self, id: NodeId, edit: SetupEdit) {
        self.nodes[id.0].edit = Some(edit);
    }

    /// Whether a new move at the cursor would prune anything in
    /// [`BranchMode::Prune`].
    pub fn has_future(&self) -> bool {
        !self.nodes[self.cursor.0].children.is_empty()
    }

    /// Discards the cursor's children and returns how many nodes became
    /// unreachable.
    pub fn truncate_future(&mut self) -> usize {
        let children = std::mem::take(&mut self.nodes[self.cursor.0].children);
        let mut discarded = 0;
        let mut stack = children.clone();
        while let Some(id) = stack.pop() {
            discarded += 1;
            stack.extend_from_slice(&self.nodes[id.0].children);
        }
        // Detached nodes stay in the arena but no longer lead back to the root.
        for id in children {
            self.nodes[id.0].parent = None;
        }
        discarded
    }

    /// Drops the nodes [`MoveTree::truncate_future`] cut off and renumbers
    /// the rest in depth-first order, so ids taken before the call are
    /// stale. Returns how many nodes were freed.
    pub fn compact(&mut self) -> usize {
        let mut remap = vec![None; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            remap[id.0] = Some(NodeId(order.len()));
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        let freed = self.nodes.len() - order.len();
        if freed == 0 {
            return 0;
        }

        let mut old = std::mem::take(&mut self.nodes);
        self.nodes = order
            .into_iter()
            .map(|id| {
                let mut node = std::mem::replace(&mut old[id.0], MoveNode::new(None, None, None));
                node.parent = node.parent.and_then(|p| remap[p.0]);
                node.children = node.children.iter().filter_map(|c| remap[c.0]).collect();
                node
            })
            .collect();
        self.cursor = remap[self.cursor.0].unwrap_or(ROOT);
        freed
    }

    /// Nodes held by the arena, detached ones included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Moves the cursor to its parent; false at the root.
    pub fn undo(&mut self) -> bool {
        match self.nodes[self.cursor.0].parent {
            Some(parent) => {
                self.cursor = parent;
                true
            }
            None => false,
        }
    }

    /// Moves the cursor to its main-line child; false at a leaf.
    pub fn redo(&mut self) -> bool {
        match self.nodes[self.cursor.0].children.first() {
            Some(&child) => {
                self.cursor = child;
                true
            }
            None => false,
        }
    }

    pub fn rewind_to_start(&mut self) {
        while self.undo() {}
    }

    pub fn fast_forward_to_end(&mut self) {
        while self.redo() {}
    }

    /// Moves the cursor `ply` moves from the root along the line through the
    /// cursor, which continues past it on main-line children. False when
    /// the line is shorter.
    pub fn go_to_ply(&mut self, ply: usize) -> bool {
        let mut line = self.path_to(self.cursor);
        let mut at = self.cursor;
        while let Some(&child) = self.nodes[at.0].children.first() {
            line.push(child);
            at = child;
        }
        let target = match ply.checked_sub(1) {
            None => ROOT,
            Some(index) => match line.get(index) {
                Some(&id) => id,
                None => return false,
            },
        };
        self.cursor = target;
        true
    }

    /// Number of moves between the root and the cursor.
    pub fn depth(&self) -> usize {
        self.depth_of(self.cursor)
    }

    pub fn depth_of(&self, id: NodeId) -> usize {
        self.path_to(id).len()
    }

    /// Node ids from the root (exclusive) to `id` (inclusive).
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut at = id;
        while let Some(parent) = self.nodes[at.0].parent {
            path.push(at);
            at = parent;
        }
        path.reverse();
        path
    }

    /// Moves along root to cursor.
    pub fn path_from_root(&self) -> Vec<Move> {
        self.moves_to(self.cursor)
    }

    pub fn moves_to(&self, id: NodeId) -> Vec<Move> {
        self.path_to(id)
            .into_iter()
            .filter_map(|n| self.nodes[n.0].mv)
            .collect()
    }

    /// Node ids from the root to the end of the main line.
    pub fn main_line_nodes(&self) -> Vec<NodeId> {
        let mut line = Vec::new();
        let mut at = ROOT;
        while let Some(&child) = self.nodes[at.0].children.first() {
            line.push(child);
            at = child;
        }
        line
    }

    /// Moves from the root following index 0 to a leaf.
    pub fn main_line(&self) -> Vec<Move> {
        self.main_line_nodes()
            .into_iter()
            .filter_map(|n| self.nodes[n.0].mv)
            .collect()
    }

    /// Last node of the main line.
    pub fn main_line_end(&self) -> NodeId {
        self.main_line_nodes().last().copied().unwrap_or(ROOT)
    }

    pub fn set_comment(&mut self, text: impl Into<String>) {
        self.set_comment_at(self.cursor, text);
    }

    pub fn set_comment_at(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].comment = text.into();
    }

    /// Board at `id`: `start` with every move and edit on the path replayed.
    pub fn position_at(&self, start: &Position, id: NodeId) -> Result<Position, SessionError> {
        let mut pos = start.clone();
        for node in self.path_to(id) {
            self.step(&mut pos, node)?;
        }
        Ok(pos)
    }

    /// Applies the single move or edit stored on `id` to `pos`.
    pub fn step(&self, pos: &mut Position, id: NodeId) -> Result<(), SessionError> {
        let node = &self.nodes[id.0];
        if let Some(edit) = node.edit {
            setup::apply_edit(pos, edit).map_err(|e| SessionError::CorruptHistory {
                reason: format!("edit \"{edit}\" no longer applies: {e}"),
            })?;
            return Ok(());
        }
        if let Some(mv) = node.mv {
            pos.play(mv).map_err(|e| SessionError::CorruptHistory {
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Standard notation of the main line, replayed from `start`.
    pub fn main_line_san(&self, start: &Position) -> Vec<String> {
        let mut pos = start.clone();
        let mut sans = Vec::new();
        for id in self.main_line_nodes() {
            let node = &self.nodes[id.0];
            let text = match (node.edit, node.mv) {
                (Some(edit), _) => format!("[{edit}]"),
                (None, Some(mv)) => pos.san(mv),
                (None, None) => continue,
            };
            if self.step(&mut pos, id).is_err() {
                break;
            }
            sans.push(text);
        }
        sans
    }
}

/// A read-only cursor owned by a viewer.
///
/// It navigates a tree without touching the tree's write cursor, so a
/// display can browse while another party appends moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewCursor {
    node: NodeId,
}

impl Default for ViewCursor {
    fn default() -> Self {
        Self { node: ROOT }
    }
}

impl ViewCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(node: NodeId) -> Self {
        Self { node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn forward(&mut self, tree: &MoveTree) -> bool {
        match tree.node(self.node).children().first() {
            Some(&child) => {
                self.node = child;
                true
            }
            None => false,
        }
    }

    pub fn backward(&mut self, tree: &MoveTree) -> bool {
        match tree.node(self.node).parent() {
            Some(parent) => {
                self.node = parent;
                true
            }
            None => false,
        }
    }

    pub fn to_start(&mut self) {
        self.node = ROOT;
    }

    pub fn to_end(&mut self, tree: &MoveTree) {
        while self.forward(tree) {}
    }

    /// Jumps to the tree's write cursor.
    pub fn follow(&mut self, tree: &MoveTree) {
        self.node = tree.cursor();
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
