use std::collections::HashMap;

use serde::Serialize;

use crate::models::Category;

/// A category together with its subcategories, in input order.
///
/// Nodes are rebuilt from the flat list on every load and are never patched
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn id(&self) -> &str {
        &self.category.id
    }

    pub fn name(&self) -> &str {
        &self.category.name
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }

    /// Depth-first, parents before children, siblings in order.
    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Ids of every node below this one, depth-first.
    pub fn descendant_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack: Vec<&CategoryNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            ids.push(node.id().to_string());
            stack.extend(node.children.iter().rev());
        }
        ids
    }
}

// Unlinks children level by level so dropping a deep chain does not recurse.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Groups a flat category list into a forest by the `parent` relation.
///
/// A category whose parent is absent, or does not resolve to any record in
/// the input, becomes a root. Roots and children keep their input order.
/// Cycles are not detected: records on (or hanging off) a cyclic parent chain
/// are reachable from no root and are left out.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let index: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, cat)| (cat.id.as_str(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots = Vec::new();

    for (i, cat) in categories.iter().enumerate() {
        match cat.parent.as_deref().and_then(|parent| index.get(parent)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    // Post-order with an explicit stack: a node is assembled once all of its
    // children are. Chains of any depth stay off the call stack.
    let mut built: Vec<Option<CategoryNode>> = (0..categories.len()).map(|_| None).collect();
    let mut stack: Vec<(usize, bool)> = roots.iter().map(|&i| (i, false)).collect();
    while let Some((i, ready)) = stack.pop() {
        if ready {
            let nodes = children[i]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[i] = Some(CategoryNode {
                category: categories[i].clone(),
                children: nodes,
            });
        } else {
            stack.push((i, true));
            stack.extend(children[i].iter().map(|&child| (child, false)));
        }
    }

    roots
        .into_iter()
        .filter_map(|i| built[i].take())
        .collect()
}

/// Total number of nodes in the forest.
pub fn forest_len(forest: &[CategoryNode]) -> usize {
    forest.iter().map(CategoryNode::count).sum()
}

pub fn find_in_forest<'a>(forest: &'a [CategoryNode], id: &str) -> Option<&'a CategoryNode> {
    forest.iter().find_map(|root| root.find(id))
}
