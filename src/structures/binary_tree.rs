//! Unbalanced binary search tree
//!
//! Nodes are addressed in snapshots by their level-order index: the root is 0
//! and the children of `i` are `2i + 1` and `2i + 2`. Each operation first
//! computes the path it will take, animates it, then applies the change.
//! Equal values go to the right subtree.

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, RunToken, StateContainer, Visualization};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub value: i64,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: i64) -> Box<Self> {
        Box::new(TreeNode {
            value,
            left: None,
            right: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeView {
    pub root: Option<Box<TreeNode>>,
    /// Level-order indices of highlighted nodes
    pub highlight: Vec<usize>,
}

impl TreeView {
    /// Level-order layout with `None` for gaps, trailing gaps trimmed.
    /// Its length grows with 2^depth.
    pub fn tree_array(&self) -> Vec<Option<i64>> {
        let mut out = Vec::new();
        let mut level: Vec<Option<&TreeNode>> = vec![self.root.as_deref()];
        while level.iter().any(Option::is_some) {
            let mut next = Vec::with_capacity(level.len() * 2);
            for slot in &level {
                out.push(slot.map(|n| n.value));
                next.push(slot.and_then(|n| n.left.as_deref()));
                next.push(slot.and_then(|n| n.right.as_deref()));
            }
            level = next;
        }
        while out.last() == Some(&None) {
            out.pop();
        }
        out
    }

    /// Present nodes level by level as (level-order index, value).
    /// Linear in the node count, unlike `tree_array`.
    pub fn levels(&self) -> Vec<Vec<(usize, i64)>> {
        let mut levels = Vec::new();
        let mut level: Vec<(usize, &TreeNode)> =
            self.root.as_deref().map(|n| (0, n)).into_iter().collect();
        while !level.is_empty() {
            let mut next = Vec::new();
            for &(index, node) in &level {
                if let Some(left) = node.left.as_deref() {
                    next.push((child_index(index, true), left));
                }
                if let Some(right) = node.right.as_deref() {
                    next.push((child_index(index, false), right));
                }
            }
            levels.push(level.iter().map(|&(index, n)| (index, n.value)).collect());
            level = next;
        }
        levels
    }

    pub fn depth(&self) -> usize {
        fn depth(node: Option<&TreeNode>) -> usize {
            node.map_or(0, |n| 1 + depth(n.left.as_deref()).max(depth(n.right.as_deref())))
        }
        depth(self.root.as_deref())
    }

    pub fn size(&self) -> usize {
        fn size(node: Option<&TreeNode>) -> usize {
            node.map_or(0, |n| 1 + size(n.left.as_deref()) + size(n.right.as_deref()))
        }
        size(self.root.as_deref())
    }

    /// In-order values
    pub fn values(&self) -> Vec<i64> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut node = self.root.as_deref();
        while node.is_some() || !stack.is_empty() {
            while let Some(n) = node {
                stack.push(n);
                node = n.left.as_deref();
            }
            if let Some(n) = stack.pop() {
                out.push(n.value);
                node = n.right.as_deref();
            }
        }
        out
    }

    /// Nodes compared while looking for `value`, as (index, node value);
    /// the flag tells whether the last one matched
    fn search_path(&self, value: i64) -> (Vec<(usize, i64)>, bool) {
        let mut path = Vec::new();
        let mut node = self.root.as_deref();
        let mut index = 0;
        while let Some(n) = node {
            path.push((index, n.value));
            if value == n.value {
                return (path, true);
            }
            let go_left = value < n.value;
            node = if go_left {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
            index = child_index(index, go_left);
        }
        (path, false)
    }

    /// Path from the right child of the node at `path` down to its in-order successor
    fn successor_path(&self, value: i64, index: usize) -> Vec<(usize, i64)> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            if n.value == value {
                break;
            }
            node = if value < n.value {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
        }
        let mut path = Vec::new();
        let mut index = child_index(index, false);
        let mut cursor = node.and_then(|n| n.right.as_deref());
        while let Some(n) = cursor {
            path.push((index, n.value));
            cursor = n.left.as_deref();
            index = child_index(index, true);
        }
        path
    }
}

fn child_index(index: usize, left: bool) -> usize {
    index
        .saturating_mul(2)
        .saturating_add(if left { 1 } else { 2 })
}

fn insert_value(mut link: &mut Option<Box<TreeNode>>, value: i64) {
    while let Some(node) = link {
        link = if value < node.value {
            &mut node.left
        } else {
            &mut node.right
        };
    }
    *link = Some(TreeNode::leaf(value));
}

fn remove_value(link: &mut Option<Box<TreeNode>>, value: i64) -> bool {
    let Some(node) = link else {
        return false;
    };
    if value < node.value {
        return remove_value(&mut node.left, value);
    }
    if value > node.value {
        return remove_value(&mut node.right, value);
    }
    match (node.left.take(), node.right.take()) {
        (None, None) => *link = None,
        (Some(child), None) | (None, Some(child)) => *link = Some(child),
        (Some(left), Some(right)) => {
            node.left = Some(left);
            node.right = Some(right);
            if let Some(successor) = take_min(&mut node.right) {
                node.value = successor;
            }
        }
    }
    true
}

/// Detach the leftmost node under `link`, returning its value
fn take_min(link: &mut Option<Box<TreeNode>>) -> Option<i64> {
    if link.as_ref()?.left.is_some() {
        return take_min(&mut link.as_mut()?.left);
    }
    let node = link.take()?;
    *link = node.right;
    Some(node.value)
}

#[derive(Debug, Clone, Copy)]
pub struct BinaryTreeFamily;

impl Visualization for BinaryTreeFamily {
    type Kind = Op;
    type Snapshot = TreeView;
    type Output = ();
    type Solution = ();
    type View = TreeView;
}

pub struct BinaryTreeDriver {
    state: StateContainer<BinaryTreeFamily>,
}

impl BinaryTreeDriver {
    pub fn new(initial: &[i64]) -> Self {
        Self::with_config(initial, &EngineConfig::default())
    }

    pub fn with_config(initial: &[i64], config: &EngineConfig) -> Self {
        let mut view = TreeView::default();
        for &value in initial {
            insert_value(&mut view.root, value);
        }
        BinaryTreeDriver {
            state: StateContainer::new(view, config.delay),
        }
    }

    pub fn view(&self) -> &TreeView {
        self.state.view()
    }

    pub fn tree_array(&self) -> Vec<Option<i64>> {
        self.view().tree_array()
    }

    pub fn depth(&self) -> usize {
        self.view().depth()
    }

    pub fn size(&self) -> usize {
        self.view().size()
    }

    pub async fn insert(&mut self, value: i64) -> Result<()> {
        let run = self.state.continue_run();
        let (path, _) = self.view().search_path(value);
        let mut index = 0;
        for &(at, node) in &path {
            let side = if value < node { "left" } else { "right" };
            self.mark(at, Op::Compare, format!("{} vs {}: go {}", value, node, side));
            self.state.wait(&run).await?;
            index = child_index(at, value < node);
        }

        insert_value(&mut self.state.view_mut().root, value);
        self.mark(index, Op::Insert, format!("Insert {} at node {}", value, index));
        self.state.wait(&run).await?;
        self.done(format!("Inserted {}", value));
        Ok(())
    }

    pub async fn search(&mut self, value: i64) -> Result<bool> {
        let run = self.state.continue_run();
        let (path, found) = self.view().search_path(value);
        self.animate(&run, &path, value).await?;

        match path.last() {
            Some(&(index, _)) if found => {
                self.mark(index, Op::Found, format!("Found {}", value));
                self.state.wait(&run).await?;
            }
            _ => {
                self.state.view_mut().highlight.clear();
                self.record(Op::NotFound, format!("{} is not in the tree", value));
            }
        }
        self.done(format!("Search for {} finished", value));
        Ok(found)
    }

    /// Returns `false`, recording nothing, when `value` is absent
    pub async fn delete(&mut self, value: i64) -> Result<bool> {
        let (path, found) = self.view().search_path(value);
        let Some(&(index, _)) = path.last().filter(|_| found) else {
            return Ok(false);
        };
        let run = self.state.continue_run();
        self.animate(&run, &path, value).await?;

        let two_children = matches!(
            self.find(value),
            Some(TreeNode {
                left: Some(_),
                right: Some(_),
                ..
            })
        );
        if two_children {
            let successors = self.view().successor_path(value, index);
            for &(at, node) in &successors {
                self.mark(at, Op::Visit, format!("Successor candidate {}", node));
                self.state.wait(&run).await?;
            }
        }

        self.mark(index, Op::Delete, format!("Delete {}", value));
        self.state.wait(&run).await?;
        let view = self.state.view_mut();
        remove_value(&mut view.root, value);
        view.highlight.clear();
        self.record(Op::Done, format!("Removed {}", value));
        self.done(format!("Deleted {}", value));
        Ok(true)
    }

    async fn animate(&mut self, run: &RunToken, path: &[(usize, i64)], value: i64) -> Result<()> {
        for &(at, node) in path {
            self.mark(at, Op::Compare, format!("Compare {} with {}", value, node));
            self.state.wait(run).await?;
        }
        Ok(())
    }

    fn find(&self, value: i64) -> Option<&TreeNode> {
        let mut node = self.view().root.as_deref();
        while let Some(n) = node {
            if n.value == value {
                return Some(n);
            }
            node = if value < n.value {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
        }
        None
    }

    fn mark(&mut self, index: usize, op: Op, description: String) {
        self.state.view_mut().highlight = vec![index];
        self.record(op, description);
    }

    fn record(&mut self, op: Op, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        self.state.view_mut().highlight.clear();
        self.state.finish(None, message);
    }
}

impl Driver for BinaryTreeDriver {
    type Family = BinaryTreeFamily;

    fn container(&self) -> &StateContainer<BinaryTreeFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<BinaryTreeFamily> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(initial: &[i64]) -> BinaryTreeDriver {
        BinaryTreeDriver::with_config(initial, &EngineConfig::instant())
    }

    #[test]
    fn test_tree_array_layout() {
        let t = tree(&[50, 30, 70, 20, 80]);
        assert_eq!(
            t.tree_array(),
            vec![Some(50), Some(30), Some(70), Some(20), None, None, Some(80)]
        );
        assert_eq!(t.depth(), 3);
        assert_eq!(t.size(), 5);
        assert!(tree(&[]).tree_array().is_empty());
    }

    #[test]
    fn test_levels_skip_gaps() {
        let t = tree(&[50, 30, 70, 20, 80]);
        assert_eq!(
            t.view().levels(),
            vec![vec![(0, 50)], vec![(1, 30), (2, 70)], vec![(3, 20), (6, 80)]]
        );

        let values: Vec<i64> = (1..=40).collect();
        let chain = tree(&values);
        let levels = chain.view().levels();
        assert_eq!(levels.len(), 40);
        assert!(levels.iter().all(|level| level.len() == 1));
        assert_eq!(levels[39][0].1, 40);
    }

    #[tokio::test]
    async fn test_insert_highlights_new_slot() {
        let mut t = tree(&[50, 30]);
        t.insert(40).await.unwrap();

        let state = t.get_state();
        let last = state.log.current_step().unwrap();
        assert_eq!(last.kind, Op::Insert);
        assert_eq!(last.snapshot.highlight, vec![4]);
        assert_eq!(t.view().values(), vec![30, 40, 50]);
    }

    #[tokio::test]
    async fn test_delete_cases() {
        let mut t = tree(&[50, 30, 70, 20, 40, 60, 80, 65]);

        assert!(t.delete(20).await.unwrap());
        assert!(t.delete(60).await.unwrap());
        assert!(t.delete(50).await.unwrap());
        assert_eq!(t.view().values(), vec![30, 40, 65, 70, 80]);
        assert_eq!(t.view().root.as_ref().map(|n| n.value), Some(65));

        let steps = t.get_state().log.len();
        assert!(!t.delete(999).await.unwrap());
        assert_eq!(t.get_state().log.len(), steps);
    }

    #[tokio::test]
    async fn test_search() {
        let mut t = tree(&[8, 3, 10, 1, 6]);
        assert!(t.search(6).await.unwrap());
        assert!(!t.search(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicates_go_right() {
        let mut t = tree(&[5]);
        t.insert(5).await.unwrap();
        assert_eq!(t.tree_array(), vec![Some(5), None, Some(5)]);
    }
}
