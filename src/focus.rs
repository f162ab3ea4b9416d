//! Drill-down editing of a single expression.
//!
//! The user edits one node at a time. Clicking a function or a scope inside
//! the focused node descends into it; the builder then works on a snapshot
//! of that child while the tree above it stays untouched. Ascending merges
//! the edited snapshot into its parent; cancelling throws all snapshots away.
//!
//! ```text
//! root:        amount > (...)           path: []
//! descend(item-2)
//! snapshot 0:  (...)                    path: [item-2]
//! add amount, +, 1
//! snapshot 0:  (amount + 1)
//! merge_up
//! root:        amount > (amount + 1)    path: []
//! ```

use std::rc::Rc;

use tracing::{debug, warn};

use crate::{
    ast::{Coordinate, ExpressionNode, ScopeNode},
    error::{BuilderError, Result},
    types::ConcreteType,
};

/// Path from the root to the focused node, with a snapshot per level.
///
/// `snapshots[i]` is the node reached by following `path[..=i]`, captured
/// when it was descended into and edited in isolation since.
#[derive(Debug, Clone)]
pub struct FocusStack {
    root: ExpressionNode,
    required_types: Vec<ConcreteType>,
    path: Vec<Coordinate>,
    snapshots: Vec<Rc<ExpressionNode>>,
}

impl FocusStack {
    pub fn new(root: ScopeNode) -> Self {
        FocusStack {
            required_types: root.allowed_return_types.clone(),
            root: root.into(),
            path: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Committed tree; nested edits become visible here only after a merge.
    pub fn root(&self) -> &ExpressionNode {
        &self.root
    }

    pub fn into_root(self) -> ExpressionNode {
        self.root
    }

    /// Consume the stack, returning the root scope. Unmerged snapshots are dropped.
    pub fn into_scope(self) -> ScopeNode {
        match self.root {
            ExpressionNode::Scope(scope) => scope,
            // Merges only write into child slots, so the root stays a scope.
            other => ScopeNode::new(self.required_types).with(other),
        }
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Snapshots from the outermost to the focused one
    pub fn snapshots(&self) -> impl Iterator<Item = &ExpressionNode> {
        self.snapshots.iter().map(Rc::as_ref)
    }

    /// The node candidate insertions target
    pub fn current_focus(&self) -> &ExpressionNode {
        self.snapshots.last().map(Rc::as_ref).unwrap_or(&self.root)
    }

    pub fn current_focus_mut(&mut self) -> &mut ExpressionNode {
        match self.snapshots.last_mut() {
            Some(snapshot) => Rc::make_mut(snapshot),
            None => &mut self.root,
        }
    }

    /// Focus the child at `coordinate` of the current focus.
    ///
    /// Only functions and scopes can be focused. Anything else is logged and
    /// ignored; returns whether the focus moved.
    pub fn descend(&mut self, coordinate: Coordinate) -> bool {
        let child = match self.current_focus().child(coordinate) {
            Ok(child) if child.is_container() => Rc::clone(child),
            Ok(child) => {
                warn!(%coordinate, kind = %child.kind(), "cannot descend into a terminal node");
                return false;
            }
            Err(err) => {
                warn!(error = %err, "ignoring descend");
                return false;
            }
        };

        debug!(%coordinate, depth = self.path.len() + 1, "descend");
        self.path.push(coordinate);
        self.snapshots.push(child);
        true
    }

    /// Write the focused snapshot back into its parent and focus the parent.
    ///
    /// Returns `false` when already at the root.
    pub fn merge_up(&mut self) -> bool {
        let (Some(coordinate), Some(edited)) = (self.path.pop(), self.snapshots.pop()) else {
            return false;
        };

        let parent = self.current_focus_mut();
        match parent.child_mut(coordinate) {
            Ok(slot) => {
                *slot = edited;
                debug!(%coordinate, depth = self.path.len(), "merge up");
            }
            // Unreachable while `descend` is the only way to push.
            Err(err) => warn!(error = %err, "dropping snapshot that no longer fits its parent"),
        }
        true
    }

    /// Merge every pending snapshot into the root.
    pub fn merge_all(&mut self) {
        while self.merge_up() {}
    }

    /// Drop every snapshot without merging.
    pub fn reset(&mut self) {
        if !self.path.is_empty() {
            debug!(discarded = self.path.len(), "reset focus");
        }
        self.path.clear();
        self.snapshots.clear();
    }

    /// Replace the whole expression with an empty scope of the original type.
    pub fn clear(&mut self) {
        self.reset();
        self.root = ScopeNode::new(self.required_types.clone()).into();
    }

    /// Append `node` to the focused scope.
    pub fn add_node(&mut self, node: ExpressionNode) -> Result<()> {
        let focus = self.current_focus_mut();
        let kind = focus.kind();
        let scope = focus.as_scope_mut().ok_or(BuilderError::FocusNotScope(kind))?;
        scope.push(node);
        Ok(())
    }

    /// Empty the scope at `coordinate` inside the focus, keeping its types.
    pub fn clear_child(&mut self, coordinate: Coordinate) -> Result<()> {
        let focus = self.current_focus_mut();
        let kind = focus.kind();
        let slot = focus.child_mut(coordinate)?;
        let types = match slot.as_ref() {
            ExpressionNode::Scope(scope) => scope.allowed_return_types.clone(),
            _ => return Err(BuilderError::out_of_range(coordinate, kind)),
        };
        *slot = Rc::new(ScopeNode::new(types).into());
        Ok(())
    }

    /// Add one variadic parameter to the focused function.
    pub fn add_parameter(&mut self) -> Result<()> {
        self.current_focus_mut()
            .as_function_mut()
            .ok_or(BuilderError::NotVariadic)?
            .push_variadic()
    }
}
