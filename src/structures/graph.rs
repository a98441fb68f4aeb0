//! Undirected weighted graph with DFS and BFS
//!
//! Adjacency lists keep insertion order, and both traversals visit neighbors in
//! that order. Each traversal step carries the cumulative visited nodes and
//! edges so a replay can show everything explored so far.

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, RunToken, StateContainer, Visualization};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphView {
    /// In insertion order
    pub nodes: Vec<GraphNode>,
    /// Each undirected edge once
    pub edges: Vec<GraphEdge>,
    /// Traversal order so far
    pub visited: Vec<String>,
    pub visited_edges: Vec<(String, String)>,
    pub highlight_nodes: Vec<String>,
    pub highlight_edges: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy)]
pub struct GraphFamily;

impl Visualization for GraphFamily {
    type Kind = Op;
    type Snapshot = GraphView;
    type Output = ();
    type Solution = Vec<String>;
    type View = GraphView;
}

pub struct GraphDriver {
    adjacency: FxHashMap<String, Vec<(String, i64)>>,
    state: StateContainer<GraphFamily>,
}

impl Default for GraphDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        GraphDriver {
            adjacency: FxHashMap::default(),
            state: StateContainer::new(GraphView::default(), config.delay),
        }
    }

    pub fn view(&self) -> &GraphView {
        self.state.view()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    /// Neighbors of `id` with edge weights, in insertion order
    pub fn neighbors(&self, id: &str) -> &[(String, i64)] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `false` when the id is taken
    pub async fn add_node(&mut self, id: &str, label: &str) -> Result<bool> {
        if self.contains(id) {
            return Ok(false);
        }
        let run = self.state.continue_run();
        self.adjacency.insert(id.to_string(), Vec::new());
        self.state.view_mut().nodes.push(GraphNode {
            id: id.to_string(),
            label: label.to_string(),
        });
        self.highlight(&[id], &[]);
        self.record(Op::AddNode, format!("Add node {}", label));
        self.state.wait(&run).await?;
        self.done(format!("Added node {}", id));
        Ok(true)
    }

    /// Connect `a` and `b` with `weight` (default 1). An existing edge keeps its
    /// place in both adjacency lists and only changes weight.
    ///
    /// Returns `false` when an endpoint is missing or `a == b`.
    pub async fn add_edge(&mut self, a: &str, b: &str, weight: Option<i64>) -> Result<bool> {
        if a == b || !self.contains(a) || !self.contains(b) {
            return Ok(false);
        }
        let weight = weight.unwrap_or(1);
        let run = self.state.continue_run();
        self.link(a, b, weight);
        self.link(b, a, weight);
        self.highlight(&[a, b], &[(a, b)]);
        self.record(Op::AddEdge, format!("Add edge {} - {} ({})", a, b, weight));
        self.state.wait(&run).await?;
        self.done(format!("Added edge {} - {}", a, b));
        Ok(true)
    }

    /// Remove `id` and every edge touching it
    pub async fn remove_node(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        let run = self.state.continue_run();
        self.highlight(&[id], &[]);
        self.record(Op::RemoveNode, format!("Remove node {}", id));
        self.state.wait(&run).await?;

        self.adjacency.remove(id);
        for list in self.adjacency.values_mut() {
            list.retain(|(n, _)| n != id);
        }
        self.state.view_mut().nodes.retain(|n| n.id != id);
        self.highlight(&[], &[]);
        self.record(Op::Done, format!("Removed node {}", id));
        self.done(format!("Removed node {}", id));
        Ok(true)
    }

    /// Returns `false` when there is no edge between `a` and `b`
    pub async fn remove_edge(&mut self, a: &str, b: &str) -> Result<bool> {
        if !self.neighbors(a).iter().any(|(n, _)| n == b) {
            return Ok(false);
        }
        let run = self.state.continue_run();
        self.highlight(&[a, b], &[(a, b)]);
        self.record(Op::RemoveEdge, format!("Remove edge {} - {}", a, b));
        self.state.wait(&run).await?;

        self.unlink(a, b);
        self.unlink(b, a);
        self.highlight(&[], &[]);
        self.record(Op::Done, format!("Removed edge {} - {}", a, b));
        self.done(format!("Removed edge {} - {}", a, b));
        Ok(true)
    }

    /// Depth-first traversal from `start`. Returns the visit order, or `None`
    /// when `start` is not a node.
    pub async fn dfs(&mut self, start: &str) -> Result<Option<Vec<String>>> {
        if !self.contains(start) {
            return Ok(None);
        }
        let run = self.state.continue_run();
        let mut visited = FxHashSet::default();
        self.begin_traversal();
        self.visit(&run, &mut visited, start, "DFS").await?;

        // each frame is a node and the index of the next neighbor to try
        let mut stack: Vec<(String, usize)> = vec![(start.to_string(), 0)];
        while let Some((node, next)) = stack.last_mut() {
            let neighbor = self
                .adjacency
                .get(node.as_str())
                .and_then(|list| list.get(*next))
                .map(|(n, _)| n.clone());
            *next += 1;
            let from = node.clone();

            match neighbor {
                None => {
                    stack.pop();
                }
                Some(to) if visited.contains(&to) => {}
                Some(to) => {
                    self.traverse(&run, &from, &to).await?;
                    self.visit(&run, &mut visited, &to, "DFS").await?;
                    stack.push((to, 0));
                }
            }
        }
        Ok(Some(self.end_traversal("DFS")))
    }

    /// Breadth-first traversal from `start`. A node counts as visited once it
    /// is discovered, so each node is enqueued at most once.
    pub async fn bfs(&mut self, start: &str) -> Result<Option<Vec<String>>> {
        if !self.contains(start) {
            return Ok(None);
        }
        let run = self.state.continue_run();
        let mut discovered = FxHashSet::default();
        discovered.insert(start.to_string());
        let mut frontier = VecDeque::from([start.to_string()]);
        self.begin_traversal();

        while let Some(node) = frontier.pop_front() {
            let view = self.state.view_mut();
            view.visited.push(node.clone());
            view.highlight_nodes = vec![node.clone()];
            view.highlight_edges.clear();
            self.record(Op::Visit, format!("BFS visit {}", node));
            self.state.wait(&run).await?;

            let neighbors: Vec<String> = self.neighbors(&node).iter().map(|(n, _)| n.clone()).collect();
            for to in neighbors {
                if discovered.insert(to.clone()) {
                    self.traverse(&run, &node, &to).await?;
                    frontier.push_back(to);
                }
            }
        }
        Ok(Some(self.end_traversal("BFS")))
    }

    async fn visit(
        &mut self,
        run: &RunToken,
        visited: &mut FxHashSet<String>,
        node: &str,
        name: &str,
    ) -> Result<()> {
        visited.insert(node.to_string());
        let view = self.state.view_mut();
        view.visited.push(node.to_string());
        view.highlight_nodes = vec![node.to_string()];
        view.highlight_edges.clear();
        self.record(Op::Visit, format!("{} visit {}", name, node));
        self.state.wait(run).await
    }

    async fn traverse(&mut self, run: &RunToken, from: &str, to: &str) -> Result<()> {
        let edge = (from.to_string(), to.to_string());
        let view = self.state.view_mut();
        view.visited_edges.push(edge.clone());
        view.highlight_nodes = vec![from.to_string(), to.to_string()];
        view.highlight_edges = vec![edge];
        self.record(Op::TraverseEdge, format!("Follow edge {} - {}", from, to));
        self.state.wait(run).await
    }

    fn begin_traversal(&mut self) {
        let view = self.state.view_mut();
        view.visited.clear();
        view.visited_edges.clear();
    }

    fn end_traversal(&mut self, name: &str) -> Vec<String> {
        let view = self.state.view_mut();
        let order = std::mem::take(&mut view.visited);
        view.visited_edges.clear();
        view.highlight_nodes.clear();
        view.highlight_edges.clear();
        let message = format!("{} order: {}", name, order.join(" -> "));
        self.state.finish(Some(order.clone()), message);
        order
    }

    fn link(&mut self, from: &str, to: &str, weight: i64) {
        if let Some(list) = self.adjacency.get_mut(from) {
            match list.iter_mut().find(|(n, _)| n == to) {
                Some(entry) => entry.1 = weight,
                None => list.push((to.to_string(), weight)),
            }
        }
    }

    fn unlink(&mut self, from: &str, to: &str) {
        if let Some(list) = self.adjacency.get_mut(from) {
            list.retain(|(n, _)| n != to);
        }
    }

    /// Rebuild the published edge list, each undirected edge once
    fn sync_edges(&mut self) {
        let view = self.state.view_mut();
        let position: FxHashMap<&str, usize> = view
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let mut edges = Vec::new();
        for node in &view.nodes {
            let here = position[node.id.as_str()];
            for (to, weight) in self.adjacency.get(&node.id).into_iter().flatten() {
                if position.get(to.as_str()).is_some_and(|&there| there > here) {
                    edges.push(GraphEdge {
                        source: node.id.clone(),
                        target: to.clone(),
                        weight: *weight,
                    });
                }
            }
        }
        view.edges = edges;
    }

    fn highlight(&mut self, nodes: &[&str], edges: &[(&str, &str)]) {
        let view = self.state.view_mut();
        view.highlight_nodes = nodes.iter().map(|n| n.to_string()).collect();
        view.highlight_edges = edges
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
    }

    fn record(&mut self, op: Op, description: String) {
        self.sync_edges();
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        self.sync_edges();
        let view = self.state.view_mut();
        view.highlight_nodes.clear();
        view.highlight_edges.clear();
        self.state.finish(None, message);
    }
}

impl Driver for GraphDriver {
    type Family = GraphFamily;

    fn container(&self) -> &StateContainer<GraphFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<GraphFamily> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a - b - d, a - c, c - d
    async fn diamond() -> GraphDriver {
        let mut g = GraphDriver::with_config(&EngineConfig::instant());
        for id in ["a", "b", "c", "d"] {
            assert!(g.add_node(id, &id.to_uppercase()).await.unwrap());
        }
        for (x, y) in [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")] {
            assert!(g.add_edge(x, y, None).await.unwrap());
        }
        g
    }

    #[tokio::test]
    async fn test_counts_and_degree() {
        let g = diamond().await;
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.degree("a"), 2);
        assert_eq!(g.view().edges.len(), 4);
    }

    #[tokio::test]
    async fn test_misuse_records_nothing() {
        let mut g = diamond().await;
        let steps = g.get_state().log.len();

        assert!(!g.add_node("a", "again").await.unwrap());
        assert!(!g.add_edge("a", "z", None).await.unwrap());
        assert!(!g.add_edge("a", "a", None).await.unwrap());
        assert!(!g.remove_edge("a", "d").await.unwrap());
        assert!(!g.remove_node("z").await.unwrap());
        assert_eq!(g.dfs("z").await.unwrap(), None);
        assert_eq!(g.get_state().log.len(), steps);
    }

    #[tokio::test]
    async fn test_update_weight_keeps_order() {
        let mut g = diamond().await;
        assert!(g.add_edge("a", "b", Some(7)).await.unwrap());
        assert_eq!(g.neighbors("a")[0], ("b".to_string(), 7));
        assert_eq!(g.neighbors("b")[0], ("a".to_string(), 7));
        assert_eq!(g.edge_count(), 4);
    }

    #[tokio::test]
    async fn test_dfs_and_bfs_order() {
        let mut g = diamond().await;
        assert_eq!(g.dfs("a").await.unwrap().unwrap(), vec!["a", "b", "d", "c"]);
        assert_eq!(g.bfs("a").await.unwrap().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_dfs_steps_accumulate() {
        let mut g = diamond().await;
        g.reset();
        g.dfs("a").await.unwrap();

        let state = g.get_state();
        assert_eq!(state.log.count_kind(Op::Visit), 4);
        assert_eq!(state.log.count_kind(Op::TraverseEdge), 3);
        let last = state.log.steps().last().unwrap();
        assert_eq!(last.snapshot.visited, vec!["a", "b", "d", "c"]);
        assert_eq!(last.snapshot.visited_edges.len(), 3);
        assert_eq!(state.solution, Some(vec!["a".to_string(), "b".into(), "d".into(), "c".into()]));
    }

    #[tokio::test]
    async fn test_remove_node_drops_edges() {
        let mut g = diamond().await;
        assert!(g.remove_node("d").await.unwrap());
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree("b"), 1);
        assert_eq!(g.view().edges.len(), 2);
    }
}
