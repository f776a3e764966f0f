//! Per-invocation dependency graph.
//!
//! Arena of nodes plus an id -> index map. Built once per request and
//! dropped with it; nothing is cached between calls.
//!
//! Adjacency lists keep edge input order so that "first predecessor" and
//! "first successor" lookups are stable for a given input.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::task::{DependencyEdge, Task};

#[derive(Debug, Clone)]
struct Node<'a> {
    task: &'a Task,
    /// Scoped task (from `tasks`) rather than graph-only context.
    in_scope: bool,
    predecessors: Vec<usize>,
    successors: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<Node<'a>>,
    index: HashMap<&'a str, usize>,
    dropped_edges: usize,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph from scoped tasks, graph-only context and edges.
    ///
    /// - first occurrence of an id wins (`tasks` before `related`)
    /// - edges touching unknown ids are dropped
    /// - exact duplicate edges collapse to the first one
    /// - self-loops are kept; the classifier treats them as unsatisfiable
    pub fn build(tasks: &'a [Task], related: &'a [Task], edges: &'a [DependencyEdge]) -> Self {
        let mut nodes: Vec<Node<'a>> = Vec::with_capacity(tasks.len() + related.len());
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(nodes.capacity());

        let scoped = tasks.iter().map(|t| (t, true));
        let context = related.iter().map(|t| (t, false));
        for (task, in_scope) in scoped.chain(context) {
            if index.contains_key(task.id.as_str()) {
                warn!(task_id = %task.id, "duplicate task id in snapshot, keeping first occurrence");
                continue;
            }
            index.insert(task.id.as_str(), nodes.len());
            nodes.push(Node {
                task,
                in_scope,
                predecessors: Vec::new(),
                successors: Vec::new(),
            });
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        let mut dropped_edges = 0usize;

        for edge in edges {
            let (Some(&pred), Some(&succ)) = (
                index.get(edge.predecessor.as_str()),
                index.get(edge.successor.as_str()),
            ) else {
                debug!(
                    predecessor = %edge.predecessor,
                    successor = %edge.successor,
                    "dropping edge to unknown task"
                );
                dropped_edges += 1;
                continue;
            };

            if !seen.insert((pred, succ)) {
                continue;
            }

            nodes[succ].predecessors.push(pred);
            nodes[pred].successors.push(succ);
        }

        Self {
            nodes,
            index,
            dropped_edges,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges dropped because one endpoint was not in the snapshot.
    pub fn dropped_edge_count(&self) -> usize {
        self.dropped_edges
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn task(&self, id: &str) -> Option<&'a Task> {
        self.index.get(id).map(|&i| self.nodes[i].task)
    }

    /// Direct predecessors, in edge input order.
    pub fn predecessors(&self, id: &str) -> impl Iterator<Item = &'a Task> + '_ {
        self.neighbours(id, |n| n.predecessors.as_slice())
    }

    /// Direct successors, in edge input order.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &'a Task> + '_ {
        self.neighbours(id, |n| n.successors.as_slice())
    }

    /// Unknown ids count as unresolved.
    pub fn is_resolved(&self, id: &str) -> bool {
        self.task(id).is_some_and(Task::is_resolved)
    }

    /// Direct successors that are still open, not counting the task itself.
    pub fn open_successor_count(&self, id: &str) -> usize {
        self.successors(id)
            .filter(|s| s.id != id && !s.is_resolved())
            .count()
    }

    /// Scoped, open tasks in input order. These are the ones that get ranked.
    pub fn candidates(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.in_scope && !n.task.is_resolved())
            .map(|n| n.task)
    }

    fn neighbours<F>(&self, id: &str, pick: F) -> impl Iterator<Item = &'a Task> + '_
    where
        F: for<'n> Fn(&'n Node<'a>) -> &'n [usize],
    {
        let adj: &[usize] = match self.index.get(id) {
            Some(&i) => pick(&self.nodes[i]),
            None => &[],
        };
        adj.iter().map(move |&j| self.nodes[j].task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn ids<'a>(it: impl Iterator<Item = &'a Task>) -> Vec<&'a str> {
        it.map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn builds_adjacency_in_input_order() {
        let tasks = vec![Task::new("a", "a"), Task::new("b", "b"), Task::new("c", "c")];
        let edges = vec![
            DependencyEdge::new("a", "c"),
            DependencyEdge::new("b", "c"),
            DependencyEdge::new("a", "b"),
        ];
        let g = DependencyGraph::build(&tasks, &[], &edges);

        assert_eq!(g.len(), 3);
        assert_eq!(ids(g.predecessors("c")), vec!["a", "b"]);
        assert_eq!(ids(g.successors("a")), vec!["c", "b"]);
        assert!(g.predecessors("a").next().is_none());
    }

    #[test]
    fn drops_edges_to_unknown_tasks() {
        let tasks = vec![Task::new("a", "a")];
        let edges = vec![DependencyEdge::new("ghost", "a"), DependencyEdge::new("a", "ghost")];
        let g = DependencyGraph::build(&tasks, &[], &edges);

        assert_eq!(g.dropped_edge_count(), 2);
        assert!(g.predecessors("a").next().is_none());
        assert!(g.successors("a").next().is_none());
    }

    #[test]
    fn collapses_duplicate_edges() {
        let tasks = vec![Task::new("a", "a"), Task::new("b", "b")];
        let edges = vec![DependencyEdge::new("a", "b"), DependencyEdge::new("a", "b")];
        let g = DependencyGraph::build(&tasks, &[], &edges);

        assert_eq!(ids(g.predecessors("b")), vec!["a"]);
        assert_eq!(g.open_successor_count("a"), 1);
    }

    #[test]
    fn first_duplicate_id_wins() {
        let tasks = vec![Task::new("a", "scoped")];
        let related = vec![Task::new("a", "context")];
        let g = DependencyGraph::build(&tasks, &related, &[]);

        assert_eq!(g.len(), 1);
        assert_eq!(g.task("a").unwrap().content, "scoped");
    }

    #[test]
    fn candidates_skip_resolved_and_context_tasks() {
        let tasks = vec![
            Task::new("open", "o"),
            Task::new("done", "d").with_status(TaskStatus::Completed),
        ];
        let related = vec![Task::new("ctx", "c")];
        let g = DependencyGraph::build(&tasks, &related, &[]);

        assert_eq!(ids(g.candidates()), vec!["open"]);
        assert!(g.contains("ctx"));
    }

    #[test]
    fn open_successor_count_ignores_self_and_resolved() {
        let tasks = vec![
            Task::new("a", "a"),
            Task::new("b", "b"),
            Task::new("c", "c").with_status(TaskStatus::Discarded),
        ];
        let edges = vec![
            DependencyEdge::new("a", "a"),
            DependencyEdge::new("a", "b"),
            DependencyEdge::new("a", "c"),
        ];
        let g = DependencyGraph::build(&tasks, &[], &edges);

        assert_eq!(g.open_successor_count("a"), 1);
        assert_eq!(ids(g.predecessors("a")), vec!["a"]);
    }

    #[test]
    fn unknown_ids_are_unresolved_and_empty() {
        let g = DependencyGraph::build(&[], &[], &[]);
        assert!(g.is_empty());
        assert!(!g.is_resolved("nope"));
        assert_eq!(g.open_successor_count("nope"), 0);
    }
}
