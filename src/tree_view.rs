//! Expand/collapse state for the category tree and its text rendering.
//!
//! Each node owns a single `open` flag keyed by its id. A node that has never
//! been toggled is open, so a freshly built forest renders fully expanded.

use std::collections::HashMap;
use std::fmt::Write;

use crate::constants::{TOGGLE_CLOSED, TOGGLE_OPEN, TOGGLE_PLACEHOLDER, TREE_INDENT};
use crate::tree::CategoryNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowToggle {
    Open,
    Closed,
    /// Leaf rows get an inert placeholder so names stay aligned.
    Placeholder,
}

impl RowToggle {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, RowToggle::Placeholder)
    }

    pub fn marker(&self) -> char {
        match self {
            RowToggle::Open => TOGGLE_OPEN,
            RowToggle::Closed => TOGGLE_CLOSED,
            RowToggle::Placeholder => TOGGLE_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub node: &'a CategoryNode,
    pub toggle: RowToggle,
}

#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    open: HashMap<String, bool>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.get(id).copied().unwrap_or(true)
    }

    /// Flips one node and returns its new state. No other node is touched.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_open(id);
        self.open.insert(id.to_string(), next);
        next
    }

    pub fn set_open(&mut self, id: &str, open: bool) {
        self.open.insert(id.to_string(), open);
    }

    pub fn collapse_all(&mut self, forest: &[CategoryNode]) {
        self.set_all(forest, false);
    }

    pub fn expand_all(&mut self, forest: &[CategoryNode]) {
        self.set_all(forest, true);
    }

    fn set_all(&mut self, forest: &[CategoryNode], open: bool) {
        let mut stack: Vec<&CategoryNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if node.has_children() {
                self.set_open(node.id(), open);
            }
            stack.extend(node.children.iter());
        }
    }

    /// Drops state for ids no longer present after a rebuild.
    pub fn retain_known(&mut self, forest: &[CategoryNode]) {
        self.open
            .retain(|id, _| crate::tree::find_in_forest(forest, id).is_some());
    }

    pub fn toggle_for(&self, node: &CategoryNode) -> RowToggle {
        if !node.has_children() {
            RowToggle::Placeholder
        } else if self.is_open(node.id()) {
            RowToggle::Open
        } else {
            RowToggle::Closed
        }
    }

    /// Depth-first rows, skipping the children of closed nodes.
    pub fn visible_rows<'a>(&self, forest: &'a [CategoryNode]) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &CategoryNode)> =
            forest.iter().rev().map(|node| (0, node)).collect();

        while let Some((depth, node)) = stack.pop() {
            let toggle = self.toggle_for(node);
            rows.push(TreeRow {
                depth,
                node,
                toggle,
            });
            if toggle == RowToggle::Open {
                stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            }
        }
        rows
    }

    pub fn render_text(&self, forest: &[CategoryNode]) -> String {
        let mut out = String::new();
        for row in self.visible_rows(forest) {
            let category = &row.node.category;
            let _ = writeln!(
                out,
                "{}{} {} [{}] ({})",
                TREE_INDENT.repeat(row.depth),
                row.toggle.marker(),
                category.name,
                category.status.label(),
                category.id
            );
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    AddSubcategory,
    Edit,
    Delete,
}

type NodeCallback<'a> = Box<dyn FnMut(&CategoryNode) + 'a>;

/// Per-node action handlers supplied by whoever coordinates the tree.
#[derive(Default)]
pub struct TreeCallbacks<'a> {
    pub on_add_subcategory: Option<NodeCallback<'a>>,
    pub on_edit: Option<NodeCallback<'a>>,
    pub on_delete: Option<NodeCallback<'a>>,
}

impl<'a> TreeCallbacks<'a> {
    /// Invokes the handler for `action` with the full node. Returns false
    /// when no handler is registered.
    pub fn dispatch(&mut self, action: TreeAction, node: &CategoryNode) -> bool {
        let handler = match action {
            TreeAction::AddSubcategory => self.on_add_subcategory.as_mut(),
            TreeAction::Edit => self.on_edit.as_mut(),
            TreeAction::Delete => self.on_delete.as_mut(),
        };
        match handler {
            Some(handler) => {
                handler(node);
                true
            }
            None => false,
        }
    }
}
